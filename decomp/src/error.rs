use std::fmt;

use dlx::DlxError;
use thiserror::Error;

use crate::graph::{Block, Edge, Vertex};

/// What is wrong with a block
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BlockDefect {
    WrongArity { expected: usize, found: usize },
    DuplicateVertex(Vertex),
    VertexOutOfRange(Vertex),
}

impl fmt::Display for BlockDefect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::WrongArity { expected, found } =>
                write!(f, "expected {} vertices, found {}", expected, found),
            Self::DuplicateVertex(x) => write!(f, "vertex {} appears more than once", x),
            Self::VertexOutOfRange(x) => write!(f, "vertex {} is out of range", x),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Error)]
pub enum DecompError {
    #[error("invalid parameters n={order}, m={decomp_order}: {reason}")]
    InvalidParameters { order: Vertex, decomp_order: Vertex, reason: &'static str },
    #[error("required block {index} ({block}): {defect}")]
    MalformedRequiredBlock { index: usize, block: Block, defect: BlockDefect },
    #[error("required blocks {first} and {second} share the edge {edge}")]
    ConflictingRequiredBlocks { first: usize, second: usize, edge: Edge },
    #[error("no solution")]
    NoSolution,
    #[error("search interrupted before a solution was found")]
    Interrupted,
    #[error("matrix construction failed: {0}")]
    Matrix(#[from] DlxError),
}

impl DecompError {
    /// True for errors in the request itself, which are reported before any search.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InvalidParameters { .. }
            | Self::MalformedRequiredBlock { .. }
            | Self::ConflictingRequiredBlocks { .. } => true,
            Self::NoSolution | Self::Interrupted | Self::Matrix(_) => false,
        }
    }
}

/// Why a set of blocks is not a decomposition of K_n
#[derive(Clone, Debug, PartialEq, Error)]
pub enum CoverDefect {
    #[error("block {index} ({block}): {defect}")]
    BadBlock { index: usize, block: Block, defect: BlockDefect },
    #[error("edge {0} is covered more than once")]
    CoveredTwice(Edge),
    #[error("edge {0} is not covered")]
    Uncovered(Edge),
}
