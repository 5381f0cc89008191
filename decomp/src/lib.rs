//! Complete graph decomposition using the dlx library
/*

decomp crate for Rust - complete graph decomposition solver
Copyright (C) 2021 Ulrik Sverdrup "bluss"

This program is free software: you can redistribute it and/or modify
it under the terms of the GNU General Public License as published by
the Free Software Foundation, either version 3 of the License, or
(at your option) any later version.

This program is distributed in the hope that it will be useful,
but WITHOUT ANY WARRANTY; without even the implied warranty of
MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
GNU General Public License for more details.

You should have received a copy of the GNU General Public License
along with this program.  If not, see <https://www.gnu.org/licenses/>.

*/

//! Splits the complete graph K_n into edge-disjoint copies of K_m, an
//! "(n, m)-decomposition", optionally keeping a set of required blocks.
//!
//! The request is encoded as an exact cover problem: one column per edge not
//! already covered by a required block, one row per candidate block whose
//! edges are all uncovered. Algorithm X on the Dancing Links matrix then picks
//! rows that cover every column exactly once.
//!
//! ```
//! use decomp::{Block, DecompositionProblem};
//!
//! let problem = DecompositionProblem::new(7, 3, vec![Block::from(vec![1, 2, 3])]).unwrap();
//! let decomposition = problem.solve().unwrap();
//! assert_eq!(decomposition.len(), 7);
//! assert!(decomposition.verify().is_ok());
//! ```

pub mod combinations;
pub mod config;
pub mod encode;
pub mod error;
pub mod graph;
pub mod problem;

pub use crate::combinations::{binomial, Combinations};
pub use crate::error::{BlockDefect, CoverDefect, DecompError};
pub use crate::graph::{Block, Edge, Vertex};
pub use crate::problem::{admissible, Decomposition, DecompositionDlx, DecompositionProblem, SolveOptions};
