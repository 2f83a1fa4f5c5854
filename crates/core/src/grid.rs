//! Grid module - filled/empty state of every cell of the play field
//!
//! The field is a `rows x cols` matrix of booleans stored as a flat row-major
//! vector. Row 0 is the floor and rows grow upward. The topmost `hidden_rows`
//! rows are a buffer above the visible area: pieces spawn there, and anything
//! left filled there after a settle means the field overflowed.
//!
//! Columns outside `[0, cols)` are never stored. Reads resolve through the
//! field's [`Boundary`] policy, writes are dropped.

/// How reads of columns outside `[0, cols)` resolve.
///
/// The policy is fixed when the field is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Boundary {
    /// Out-of-range columns read as filled, so the field edges behave like walls.
    #[default]
    Blocked,
    /// Out-of-range columns read as empty. Wide mode needs this because a
    /// clone lives entirely outside the stored columns. This is the one
    /// mode-specific read rule; see open question 1 in `DESIGN.md`.
    Open,
}

impl Boundary {
    fn value(self) -> bool {
        matches!(self, Boundary::Blocked)
    }
}

/// The play field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridField {
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<bool>,
    rows: usize,
    cols: usize,
    visible_rows: usize,
    boundary: Boundary,
}

impl GridField {
    /// Create an empty field with `visible_rows + hidden_rows` rows.
    pub fn new(visible_rows: usize, hidden_rows: usize, cols: usize, boundary: Boundary) -> Self {
        let rows = visible_rows + hidden_rows;
        Self {
            cells: vec![false; rows * cols],
            rows,
            cols,
            visible_rows,
            boundary,
        }
    }

    /// Calculate flat index from (row, col); `None` when out of range
    #[inline(always)]
    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row as usize >= self.rows || col as usize >= self.cols {
            return None;
        }
        Some(row as usize * self.cols + col as usize)
    }

    /// Total rows, hidden buffer included
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn hidden_rows(&self) -> usize {
        self.rows - self.visible_rows
    }

    pub fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Whether the cell at (row, col) is filled.
    ///
    /// Columns outside `[0, cols)` return the boundary value. Rows below the
    /// floor read as filled and rows above the top read as empty.
    pub fn is_filled(&self, row: i32, col: i32) -> bool {
        if col < 0 || col as usize >= self.cols {
            return self.boundary.value();
        }
        if row < 0 {
            return true;
        }
        match self.index(row, col) {
            Some(idx) => self.cells[idx],
            None => false,
        }
    }

    /// Mark a cell filled. Out-of-range addresses are ignored.
    pub fn set_filled(&mut self, row: i32, col: i32) {
        if let Some(idx) = self.index(row, col) {
            self.cells[idx] = true;
        }
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: i32) -> bool {
        if row < 0 || row as usize >= self.rows {
            return false;
        }
        let start = row as usize * self.cols;
        self.cells[start..start + self.cols].iter().all(|&c| c)
    }

    /// Copy every row above `from_row` one step down.
    ///
    /// For each row `r` in `[from_row, rows - 1)` the content of `r + 1` moves
    /// into `r`. The topmost row keeps its content.
    pub fn shift_rows_down(&mut self, from_row: i32) {
        let from = from_row.max(0) as usize;
        if self.rows == 0 || from >= self.rows - 1 {
            return;
        }
        let width = self.cols;
        // copy_within handles the overlapping ranges
        self.cells
            .copy_within((from + 1) * width..self.rows * width, from * width);
    }

    /// Whether any cell of the hidden buffer is filled
    pub fn hidden_filled(&self) -> bool {
        self.cells[self.visible_rows * self.cols..].iter().any(|&c| c)
    }

    /// Number of filled cells on the whole field
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Cells of one row, left to right
    pub fn row(&self, row: usize) -> &[bool] {
        let start = row * self.cols;
        &self.cells[start..start + self.cols]
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }
}
