use providers::ProviderError;
use storage::StorageError;
use thiserror::Error;

/// Failures surfaced by the library service.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("movie not found: {title:?}")]
    NotFound { title: String },
    #[error("corrupt data: {0}")]
    CorruptData(String),
    #[error("movie title is empty")]
    EmptyTitle,
    #[error("unsupported: {0}")]
    Unsupported(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ProviderError> for LibraryError {
    fn from(e: ProviderError) -> Self {
        match e {
            ProviderError::Network(msg) => LibraryError::Network(msg),
            ProviderError::Status { .. } => LibraryError::Network(e.to_string()),
            ProviderError::Auth(msg) => LibraryError::Auth(msg),
            ProviderError::InvalidResponse(msg) => {
                LibraryError::CorruptData(format!("metadata provider response: {msg}"))
            }
            ProviderError::NotImplemented | ProviderError::UnknownProvider(_) => {
                LibraryError::Unsupported(e.to_string())
            }
        }
    }
}

impl From<StorageError> for LibraryError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::Io(io) => LibraryError::Io(io),
            StorageError::CorruptData { .. }
            | StorageError::InvalidPosterId(_)
            | StorageError::Serialize(_) => LibraryError::CorruptData(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_map_onto_taxonomy() {
        let status = ProviderError::Status {
            status: 502,
            url: "https://api.example/3/search/movie".into(),
        };
        assert!(matches!(LibraryError::from(status), LibraryError::Network(m) if m.contains("502")));
        assert!(matches!(
            LibraryError::from(ProviderError::Auth("bad key".into())),
            LibraryError::Auth(_)
        ));
        assert!(matches!(
            LibraryError::from(ProviderError::InvalidResponse("x".into())),
            LibraryError::CorruptData(_)
        ));
        assert!(matches!(
            LibraryError::from(ProviderError::NotImplemented),
            LibraryError::Unsupported(_)
        ));
    }

    #[test]
    fn storage_errors_map_onto_taxonomy() {
        let corrupt = StorageError::CorruptData {
            path: "/data/lib.json".into(),
            reason: "expected value".into(),
        };
        match LibraryError::from(corrupt) {
            LibraryError::CorruptData(msg) => assert!(msg.contains("/data/lib.json")),
            other => panic!("unexpected {other:?}"),
        }
        let io = StorageError::Io(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro"));
        assert!(matches!(LibraryError::from(io), LibraryError::Io(_)));
    }
}
