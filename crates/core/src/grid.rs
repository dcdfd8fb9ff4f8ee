/// Row-major poster grid, recomputed from the library length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    columns: usize,
}

pub const DEFAULT_COLUMNS: usize = 5;

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(DEFAULT_COLUMNS)
    }
}

impl GridLayout {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(row, column)` of the entry at `index`.
    pub fn cell(&self, index: usize) -> (usize, usize) {
        (index / self.columns, index % self.columns)
    }

    pub fn rows(&self, len: usize) -> usize {
        len.div_ceil(self.columns)
    }
}
