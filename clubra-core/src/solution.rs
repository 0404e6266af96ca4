//! Fractional LP-relaxation solutions over the depot and customers.

use thiserror::Error;

use crate::error::define_error_codes;

/// Tolerance used when checking that an input matrix is symmetric.
const SYMMETRY_TOLERANCE: f64 = 1e-9;

/// Errors raised while building a [`FractionalSolution`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SolutionError {
    /// A row length differs from the number of rows.
    #[error("row {row} has {got} entries but the matrix has {expected} rows")]
    NotSquare {
        /// Offending row index.
        row: usize,
        /// Number of rows in the matrix.
        expected: usize,
        /// Entries found in the row.
        got: usize,
    },
    /// An entry is NaN or infinite.
    #[error("entry ({row}, {column}) is not finite")]
    NonFinite {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },
    /// `X[i][j]` and `X[j][i]` differ.
    #[error("entries ({row}, {column}) and ({column}, {row}) differ")]
    Asymmetric {
        /// Row index.
        row: usize,
        /// Column index.
        column: usize,
    },
    /// An edge endpoint lies outside the matrix.
    #[error("edge ({row}, {column}) lies outside a {node_count}-node solution")]
    EdgeOutOfRange {
        /// First endpoint.
        row: usize,
        /// Second endpoint.
        column: usize,
        /// Number of nodes in the solution.
        node_count: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`SolutionError`] variants.
    enum SolutionErrorCode for SolutionError {
        /// A row length differs from the number of rows.
        NotSquare => NotSquare { .. } => "SOLUTION_NOT_SQUARE",
        /// An entry is NaN or infinite.
        NonFinite => NonFinite { .. } => "SOLUTION_NON_FINITE",
        /// `X[i][j]` and `X[j][i]` differ.
        Asymmetric => Asymmetric { .. } => "SOLUTION_ASYMMETRIC",
        /// An edge endpoint lies outside the matrix.
        EdgeOutOfRange => EdgeOutOfRange { .. } => "SOLUTION_EDGE_OUT_OF_RANGE",
    }
}

/// Symmetric edge-usage matrix `X` over nodes `0..node_count`, node `0`
/// being the depot. The diagonal is always zero.
#[derive(Clone, Debug, PartialEq)]
pub struct FractionalSolution {
    values: Vec<Vec<f64>>,
}

impl FractionalSolution {
    /// Creates an all-zero solution over `node_count` nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            values: vec![vec![0.0; node_count]; node_count],
        }
    }

    /// Builds a solution from a dense matrix.
    ///
    /// The diagonal is cleared.
    ///
    /// # Errors
    /// Returns [`SolutionError::NotSquare`], [`SolutionError::NonFinite`] or
    /// [`SolutionError::Asymmetric`] when the matrix is malformed.
    pub fn from_rows(mut values: Vec<Vec<f64>>) -> Result<Self, SolutionError> {
        let size = values.len();
        for (row, entries) in values.iter().enumerate() {
            if entries.len() != size {
                return Err(SolutionError::NotSquare {
                    row,
                    expected: size,
                    got: entries.len(),
                });
            }
            if let Some(column) = entries.iter().position(|value| !value.is_finite()) {
                return Err(SolutionError::NonFinite { row, column });
            }
        }
        for row in 0..size {
            for column in row + 1..size {
                if (values[row][column] - values[column][row]).abs() > SYMMETRY_TOLERANCE {
                    return Err(SolutionError::Asymmetric { row, column });
                }
            }
            values[row][row] = 0.0;
        }
        Ok(Self { values })
    }

    /// Builds a solution from `(i, j, value)` triples, mirroring each entry.
    /// Later triples overwrite earlier ones and self-loops are ignored.
    ///
    /// # Errors
    /// Returns [`SolutionError::EdgeOutOfRange`] for endpoints outside
    /// `0..node_count` and [`SolutionError::NonFinite`] for NaN or infinite
    /// values.
    pub fn from_edges(
        node_count: usize,
        edges: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, SolutionError> {
        let mut solution = Self::new(node_count);
        for (row, column, value) in edges {
            if row >= node_count || column >= node_count {
                return Err(SolutionError::EdgeOutOfRange {
                    row,
                    column,
                    node_count,
                });
            }
            if !value.is_finite() {
                return Err(SolutionError::NonFinite { row, column });
            }
            solution.set(row, column, value);
        }
        Ok(solution)
    }

    /// Returns the number of nodes, depot included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.values.len()
    }

    /// Returns the number of customers (`node_count - 1`).
    #[must_use]
    pub fn customer_count(&self) -> usize {
        self.values.len().saturating_sub(1)
    }

    /// Returns `X[i][j]`, or `0.0` outside the matrix.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values
            .get(i)
            .and_then(|row| row.get(j))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sets `X[i][j]` and `X[j][i]`. Diagonal and out-of-range writes are
    /// ignored.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        let size = self.values.len();
        if i == j || i >= size || j >= size {
            return;
        }
        self.values[i][j] = value;
        self.values[j][i] = value;
    }

    /// Returns the dense rows of the matrix.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.values
    }

    /// Returns every `(i, j, X[i][j])` with `i < j` and a strictly positive
    /// value, in row-major order.
    #[must_use]
    pub fn positive_edges(&self) -> Vec<(usize, usize, f64)> {
        let mut edges = Vec::new();
        for (i, row) in self.values.iter().enumerate() {
            for (j, &value) in row.iter().enumerate().skip(i + 1) {
                if value > 0.0 {
                    edges.push((i, j, value));
                }
            }
        }
        edges
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{FractionalSolution, SolutionError};

    #[test]
    fn from_edges_mirrors_entries() {
        let solution = FractionalSolution::from_edges(3, [(0, 2, 1.5), (1, 2, 0.5)])
            .expect("valid edges");
        assert_eq!(solution.get(2, 0), 1.5);
        assert_eq!(solution.get(2, 1), 0.5);
        assert_eq!(solution.customer_count(), 2);
        assert_eq!(solution.positive_edges(), vec![(0, 2, 1.5), (1, 2, 0.5)]);
    }

    #[rstest]
    #[case::ragged(vec![vec![0.0, 1.0], vec![1.0]], "SOLUTION_NOT_SQUARE")]
    #[case::nan(vec![vec![0.0, f64::NAN], vec![f64::NAN, 0.0]], "SOLUTION_NON_FINITE")]
    #[case::asymmetric(vec![vec![0.0, 1.0], vec![0.5, 0.0]], "SOLUTION_ASYMMETRIC")]
    fn rejects_malformed_matrices(#[case] rows: Vec<Vec<f64>>, #[case] code: &str) {
        let err = FractionalSolution::from_rows(rows).expect_err("malformed matrix");
        assert_eq!(err.code().as_str(), code);
    }

    #[test]
    fn clears_the_diagonal() {
        let solution = FractionalSolution::from_rows(vec![vec![3.0, 1.0], vec![1.0, 2.0]])
            .expect("valid matrix");
        assert_eq!(solution.get(0, 0), 0.0);
        assert_eq!(solution.get(1, 1), 0.0);
    }

    #[test]
    fn rejects_edges_outside_the_matrix() {
        let err = FractionalSolution::from_edges(2, [(0, 2, 1.0)]).expect_err("outside");
        assert_eq!(
            err,
            SolutionError::EdgeOutOfRange {
                row: 0,
                column: 2,
                node_count: 2
            }
        );
    }
}
