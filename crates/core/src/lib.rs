//! Core library: configuration, the library service, grid layout and video discovery.

pub mod config;
pub mod error;
pub mod grid;
pub mod models;
pub mod scanner;
pub mod service;
pub mod setup;

pub use error::LibraryError;
pub use service::LibraryService;
