//! Decomposition requests, solving and the resulting decompositions.

use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use dlx::{AlgoXConfig, AlgoXStats, Dlx, SearchStatus, UInt};
use log::{debug, info};

use crate::combinations::{binomial, Combinations};
use crate::encode::{self, check_block, Encoding};
use crate::error::{CoverDefect, DecompError};
use crate::graph::{Block, Edge, Vertex};

/// True if K_n passes the divisibility conditions for a K_m decomposition:
/// m - 1 divides n - 1 (vertex degrees) and m(m - 1) divides n(n - 1) (edge count).
///
/// These are necessary, not sufficient; the solver does not rely on them.
pub fn admissible(order: Vertex, decomp_order: Vertex) -> bool {
    let (n, m) = (u64::from(order), u64::from(decomp_order));
    if m < 2 || m > n {
        return false;
    }
    (n - 1) % (m - 1) == 0 && (n * (n - 1)) % (m * (m - 1)) == 0
}

fn check_parameters(order: Vertex, decomp_order: Vertex) -> Result<(), DecompError> {
    let invalid = |reason| Err(DecompError::InvalidParameters { order, decomp_order, reason });
    if decomp_order < 2 {
        return invalid("decomposition order must be at least 2");
    }
    if order < decomp_order {
        return invalid("decomposition order must not exceed the order");
    }
    // every edge must get a column number
    match binomial(u64::from(order), 2) {
        Some(edges) if edges <= u64::from(UInt::MAX) => Ok(()),
        _otherwise => invalid("order too large"),
    }
}

/// Request to decompose K_n into copies of K_m containing the required blocks.
///
/// The input is checked when the problem is created; a problem that exists
/// has valid parameters and pairwise edge-disjoint, well formed required blocks.
#[derive(Clone, Debug)]
pub struct DecompositionProblem {
    order: Vertex,
    decomp_order: Vertex,
    required: Vec<Block>,
    covered: HashSet<Edge>,
}

/// Options for a single solve
#[derive(Clone, Debug, Default)]
pub struct SolveOptions {
    /// Raising this flag stops the search at the next choice point.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Record search statistics in the decomposition
    pub collect_stats: bool,
}

impl DecompositionProblem {
    pub fn new(order: Vertex, decomp_order: Vertex, required: Vec<Block>) -> Result<Self, DecompError> {
        check_parameters(order, decomp_order)?;
        let covered = encode::covered_edges(order, decomp_order, &required)?;
        Ok(DecompositionProblem {
            order,
            decomp_order,
            required,
            covered,
        })
    }

    /// Order n of the host graph K_n
    pub fn order(&self) -> Vertex { self.order }

    /// Order m of the blocks K_m
    pub fn decomp_order(&self) -> Vertex { self.decomp_order }

    pub fn required(&self) -> &[Block] { &self.required }

    /// Edges already covered by the required blocks
    pub fn covered_edges(&self) -> &HashSet<Edge> { &self.covered }

    /// Columns and rows of the exact cover matrix
    pub fn to_encoding(&self) -> Encoding {
        encode::encode_covered(self.order, self.decomp_order, &self.required, &self.covered)
    }

    pub fn to_dlx(&self) -> Result<DecompositionDlx, DecompError> {
        let (dlx, row_blocks) = self.to_encoding().into_dlx()?;
        Ok(DecompositionDlx {
            dlx,
            row_blocks,
            order: self.order,
            decomp_order: self.decomp_order,
            required: self.required.clone(),
        })
    }

    /// Find the first decomposition
    pub fn solve(&self) -> Result<Decomposition, DecompError> {
        self.solve_with(&SolveOptions::default())
    }

    pub fn solve_with(&self, options: &SolveOptions) -> Result<Decomposition, DecompError> {
        info!("decomposing K_{} into K_{} with {} required block(s)",
              self.order, self.decomp_order, self.required.len());
        self.to_dlx()?.solve_first(options)
    }
}

/// The problem in Dlx form, with the block behind each row
#[derive(Clone, Debug)]
pub struct DecompositionDlx {
    dlx: Dlx,
    row_blocks: Vec<Block>,
    order: Vertex,
    decomp_order: Vertex,
    required: Vec<Block>,
}

impl DecompositionDlx {
    /// Get Dlx matrix
    pub fn dlx(&self) -> &Dlx { &self.dlx }

    /// The candidate block of each Dlx row
    pub fn row_blocks(&self) -> &[Block] { &self.row_blocks }

    /// Get the first found decomposition.
    ///
    /// The problem is unmodified after the end of this method, and could be solved
    /// the same way again.
    pub fn solve_first(&mut self, options: &SolveOptions) -> Result<Decomposition, DecompError> {
        let mut config = AlgoXConfig::first_solution();
        config.cancel = options.cancel.clone();
        if options.collect_stats {
            config.stats = Some(AlgoXStats::default());
        }

        let mut found = None;
        let report = dlx::algox_config(&mut self.dlx, &mut config, |rows| {
            found = Some(rows);
            ControlFlow::Break(())
        });
        debug!("search finished: {:?}", report);

        match (found, report.status) {
            (Some(rows), _) => Ok(Decomposition {
                order: self.order,
                decomp_order: self.decomp_order,
                required: self.required.clone(),
                discovered: rows.iter().map(|&r| self.row_blocks[r as usize].clone()).collect(),
                stats: report.stats,
            }),
            (None, SearchStatus::Cancelled) => Err(DecompError::Interrupted),
            (None, _) => Err(DecompError::NoSolution),
        }
    }
}

/// A decomposition of K_n: the required blocks followed by the blocks the
/// search selected, in selection order.
#[derive(Clone, Debug)]
pub struct Decomposition {
    order: Vertex,
    decomp_order: Vertex,
    required: Vec<Block>,
    discovered: Vec<Block>,
    stats: Option<AlgoXStats>,
}

impl Decomposition {
    pub fn order(&self) -> Vertex { self.order }

    pub fn decomp_order(&self) -> Vertex { self.decomp_order }

    /// Required blocks, as given
    pub fn required(&self) -> &[Block] { &self.required }

    /// Blocks found by the search
    pub fn discovered(&self) -> &[Block] { &self.discovered }

    /// All blocks, required first
    pub fn blocks(&self) -> impl Iterator<Item=&Block> {
        self.required.iter().chain(&self.discovered)
    }

    /// Total number of blocks
    pub fn len(&self) -> usize {
        self.required.len() + self.discovered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Search statistics, if they were requested
    pub fn stats(&self) -> Option<&AlgoXStats> {
        self.stats.as_ref()
    }

    /// Check that the blocks cover every edge of K_n exactly once.
    pub fn verify(&self) -> Result<(), CoverDefect> {
        let mut seen = HashSet::new();
        for (index, block) in self.blocks().enumerate() {
            check_block(self.order, self.decomp_order, block).map_err(|defect| {
                CoverDefect::BadBlock { index, block: block.clone(), defect }
            })?;
            for edge in block.edges() {
                if !seen.insert(edge) {
                    return Err(CoverDefect::CoveredTwice(edge));
                }
            }
        }
        for pair in Combinations::new(self.order, 2) {
            let edge = Edge::new(pair[0], pair[1]);
            if !seen.contains(&edge) {
                return Err(CoverDefect::Uncovered(edge));
            }
        }
        Ok(())
    }
}

/// One block per line, vertices separated by spaces.
impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for block in self.blocks() {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(list: &[&[Vertex]]) -> Vec<Block> {
        list.iter().map(|b| Block::from(b.to_vec())).collect()
    }

    #[test]
    fn admissibility() {
        let triples: Vec<_> = (3..=21).filter(|&n| admissible(n, 3)).collect();
        assert_eq!(triples, [3, 7, 9, 13, 15, 19, 21]);
        let quads: Vec<_> = (4..=40).filter(|&n| admissible(n, 4)).collect();
        assert_eq!(quads, [4, 13, 16, 25, 28, 37, 40]);
        let quints: Vec<_> = (5..=41).filter(|&n| admissible(n, 5)).collect();
        assert_eq!(quints, [5, 21, 25, 41]);
        assert!(admissible(6, 2));
        assert!(!admissible(3, 4));
        assert!(!admissible(3, 1));
    }

    #[test]
    fn parameter_errors() {
        let err = DecompositionProblem::new(3, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, DecompError::InvalidParameters { order: 3, decomp_order: 4, .. }));
        assert!(err.is_input_error());
        let err = DecompositionProblem::new(5, 1, Vec::new()).unwrap_err();
        assert!(matches!(err, DecompError::InvalidParameters { .. }));
        let err = DecompositionProblem::new(0, 0, Vec::new()).unwrap_err();
        assert!(matches!(err, DecompError::InvalidParameters { .. }));
        let err = DecompositionProblem::new(UInt::MAX, 3, Vec::new()).unwrap_err();
        assert!(matches!(err, DecompError::InvalidParameters { reason: "order too large", .. }));
    }

    #[test]
    fn input_errors_before_search() {
        let err = DecompositionProblem::new(7, 3, blocks(&[&[1, 2, 3], &[1, 2, 4]])).unwrap_err();
        assert!(matches!(err, DecompError::ConflictingRequiredBlocks { first: 0, second: 1, .. }));
        assert!(err.is_input_error());
        let err = DecompositionProblem::new(7, 3, blocks(&[&[1, 2, 3], &[1, 2, 3]])).unwrap_err();
        assert!(matches!(err, DecompError::ConflictingRequiredBlocks { .. }));
        assert!(!DecompError::NoSolution.is_input_error());
    }

    #[test]
    fn whole_graph_is_one_block() {
        let d = DecompositionProblem::new(5, 5, Vec::new()).unwrap().solve().unwrap();
        assert!(d.required().is_empty());
        assert_eq!(d.discovered(), [Block::from(vec![1, 2, 3, 4, 5])]);
        d.verify().unwrap();
    }

    #[test]
    fn required_block_covers_everything() {
        let problem = DecompositionProblem::new(3, 3, blocks(&[&[3, 1, 2]])).unwrap();
        assert!(problem.to_encoding().columns.is_empty());
        let d = problem.solve().unwrap();
        assert!(d.discovered().is_empty());
        assert_eq!(d.to_string(), "3 1 2\n");
        d.verify().unwrap();
    }

    #[test]
    fn edges_as_blocks() {
        let d = DecompositionProblem::new(4, 2, Vec::new()).unwrap().solve().unwrap();
        assert_eq!(d.len(), 6);
        assert_eq!(d.to_string(), "1 2\n1 3\n1 4\n2 3\n2 4\n3 4\n");
        d.verify().unwrap();
    }

    #[test]
    fn uncoverable_edge_is_no_solution() {
        // every other triangle of K4 shares an edge with 1 2 3
        let problem = DecompositionProblem::new(4, 3, blocks(&[&[1, 2, 3]])).unwrap();
        assert_eq!(problem.solve().unwrap_err(), DecompError::NoSolution);
    }

    #[test]
    fn solve_first_leaves_matrix_intact() {
        let problem = DecompositionProblem::new(7, 3, Vec::new()).unwrap();
        let mut pdlx = problem.to_dlx().unwrap();
        let before = pdlx.dlx().clone();
        let first = pdlx.solve_first(&SolveOptions::default()).unwrap();
        assert_eq!(pdlx.dlx(), &before);
        let second = pdlx.solve_first(&SolveOptions::default()).unwrap();
        assert_eq!(first.discovered(), second.discovered());
    }

    #[test]
    fn fano_plane() {
        let d = DecompositionProblem::new(7, 3, Vec::new()).unwrap().solve().unwrap();
        assert_eq!(d.len(), 7);
        d.verify().unwrap();
    }

    #[test]
    fn cancelled_search_is_interrupted() {
        let problem = DecompositionProblem::new(7, 3, Vec::new()).unwrap();
        let options = SolveOptions {
            cancel: Some(Arc::new(AtomicBool::new(true))),
            collect_stats: false,
        };
        assert_eq!(problem.solve_with(&options).unwrap_err(), DecompError::Interrupted);
    }

    #[test]
    fn stats_on_request() {
        let problem = DecompositionProblem::new(7, 3, Vec::new()).unwrap();
        assert!(problem.solve().unwrap().stats().is_none());
        let options = SolveOptions { collect_stats: true, ..SolveOptions::default() };
        let d = problem.solve_with(&options).unwrap();
        let stats = d.stats().unwrap();
        assert!(stats.calls >= 7);
    }

    #[test]
    fn verify_finds_defects() {
        let d = Decomposition {
            order: 4,
            decomp_order: 2,
            required: blocks(&[&[1, 2]]),
            discovered: blocks(&[&[1, 3], &[2, 1]]),
            stats: None,
        };
        assert_eq!(d.verify(), Err(CoverDefect::CoveredTwice(Edge::new(1, 2))));

        let d = Decomposition {
            discovered: blocks(&[&[1, 3], &[1, 4], &[2, 3], &[2, 4]]),
            ..d
        };
        assert_eq!(d.verify(), Err(CoverDefect::Uncovered(Edge::new(3, 4))));

        let d = Decomposition {
            discovered: blocks(&[&[1, 3, 4]]),
            ..d
        };
        assert!(matches!(d.verify(), Err(CoverDefect::BadBlock { index: 1, .. })));
    }
}
