//! Symbol grid

use serde::{Deserialize, Serialize};

use crate::error::{MathError, MathResult};
use crate::symbols::Symbol;

/// Cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Flattened index `col * rows + row`
    pub fn flat_index(self, rows: usize) -> usize {
        self.col * rows + self.row
    }

    /// Inverse of [`Position::flat_index`]
    pub fn from_flat_index(index: usize, rows: usize) -> Self {
        Self {
            row: index % rows,
            col: index / rows,
        }
    }
}

/// Column-major symbol grid (`columns[col][row]`), rectangular by construction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Symbol>>", into = "Vec<Vec<Symbol>>")]
pub struct Grid {
    columns: Vec<Vec<Symbol>>,
}

impl Grid {
    /// Build from columns, rejecting empty or ragged input
    pub fn from_columns(columns: Vec<Vec<Symbol>>) -> MathResult<Self> {
        let rows = columns.first().map(Vec::len).unwrap_or(0);
        if rows == 0 {
            return Err(MathError::InvalidGrid("grid has no cells".into()));
        }
        if let Some((col, column)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(MathError::InvalidGrid(format!(
                "column {col} has {} rows, expected {rows}",
                column.len()
            )));
        }
        Ok(Self { columns })
    }

    pub fn cols(&self) -> usize {
        self.columns.len()
    }

    pub fn rows(&self) -> usize {
        self.columns[0].len()
    }

    /// Total cell count
    pub fn len(&self) -> usize {
        self.cols() * self.rows()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, pos: Position) -> Option<Symbol> {
        self.columns.get(pos.col).and_then(|c| c.get(pos.row)).copied()
    }

    pub fn columns(&self) -> &[Vec<Symbol>] {
        &self.columns
    }

    /// Cells in column-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, Symbol)> + '_ {
        self.columns.iter().enumerate().flat_map(|(col, column)| {
            column
                .iter()
                .enumerate()
                .map(move |(row, &symbol)| (Position::new(row, col), symbol))
        })
    }

    /// Occurrences of every symbol, indexed by [`Symbol::index`]
    pub fn counts(&self) -> [usize; Symbol::COUNT] {
        let mut counts = [0usize; Symbol::COUNT];
        for (_, symbol) in self.cells() {
            counts[symbol.index()] += 1;
        }
        counts
    }

    pub fn count(&self, symbol: Symbol) -> usize {
        self.cells().filter(|&(_, s)| s == symbol).count()
    }

    /// Flattened indices of a symbol, ascending
    pub fn positions_of(&self, symbol: Symbol) -> Vec<usize> {
        let rows = self.rows();
        self.cells()
            .filter(|&(_, s)| s == symbol)
            .map(|(pos, _)| pos.flat_index(rows))
            .collect()
    }
}

impl TryFrom<Vec<Vec<Symbol>>> for Grid {
    type Error = MathError;

    fn try_from(columns: Vec<Vec<Symbol>>) -> MathResult<Self> {
        Self::from_columns(columns)
    }
}

impl From<Grid> for Vec<Vec<Symbol>> {
    fn from(grid: Grid) -> Self {
        grid.columns
    }
}
