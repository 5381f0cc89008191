// from bluss dlx solver

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::Direction::*;
use crate::{Dlx, Index, UInt};

/// Where a search stands, or how it ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SearchStatus {
    /// Still running; never part of a finished report.
    Searching,
    /// Stopped after a solution, because of the solution limit or the callback.
    Solved,
    /// Every branch was explored.
    Exhausted,
    /// The cancellation flag was raised.
    Cancelled,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AlgoXStats {
    pub calls: u64,
    pub cover: u64,
    pub col_seek: u64,
    pub backtracks: u64,
}

#[derive(Clone, Debug, Default)]
pub struct AlgoXConfig {
    /// Stop after this many solutions; `None` explores everything.
    pub max_solutions: Option<u64>,
    /// Checked between choices; raising it stops the search with the matrix restored.
    pub cancel: Option<Arc<AtomicBool>>,
    pub stats: Option<AlgoXStats>,
}

impl AlgoXConfig {
    /// Configuration that stops at the first solution
    pub fn first_solution() -> Self {
        AlgoXConfig {
            max_solutions: Some(1),
            ..AlgoXConfig::default()
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, |flag| flag.load(Ordering::Relaxed))
    }

    fn limit_reached(&self, solutions: u64) -> bool {
        self.max_solutions.map_or(false, |max| solutions >= max)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlgoXReport {
    pub status: SearchStatus,
    pub solutions: u64,
    pub stats: Option<AlgoXStats>,
}

/// Knuth's “Algorithm X”, a constraint satisfaction problem solver for the exact cover problem.
///
/// Implemented using Dancing Links.
///
/// - dlx: Problem formulation in terms of a dancing links graph
/// - out: Solution callback, called once for each solution with the
///   zero-based row indexes in the order they were selected.
///   Returning `ControlFlow::Break` stops the search.
///
/// The matrix is restored to its original state when the search returns.
pub fn algox(dlx: &mut Dlx, out: impl FnMut(Vec<UInt>) -> ControlFlow<()>) -> AlgoXReport {
    let mut config = AlgoXConfig::default();
    if cfg!(feature = "stats") {
        config.stats = Some(AlgoXStats::default());
    }
    algox_config(dlx, &mut config, out)
}

pub fn algox_config(dlx: &mut Dlx, config: &mut AlgoXConfig, mut out: impl FnMut(Vec<UInt>) -> ControlFlow<()>)
    -> AlgoXReport
{
    debug!("Algorithm X start: {} columns, {} rows", dlx.columns(), dlx.rows());
    let mut solutions = 0;
    let status = match algox_inner(dlx, &mut Vec::new(), config, &mut solutions, &mut out) {
        ControlFlow::Continue(()) => SearchStatus::Exhausted,
        ControlFlow::Break(status) => status,
    };
    debug!("Algorithm X end: {:?} with {} solution(s)", status, solutions);
    if let Some(ref st) = config.stats {
        debug!("{:?}", st);
    }
    AlgoXReport {
        status,
        solutions,
        stats: config.stats.clone(),
    }
}

macro_rules! stat {
    ($c:expr, $field:ident, $($t:tt)*) => {
        if let Some(ref mut st) = $c.stats {
            st . $field $($t)*;
        }
    }
}

fn algox_inner<F>(dlx: &mut Dlx, partial_solution: &mut Vec<Index>, config: &mut AlgoXConfig,
                  solutions: &mut u64, out: &mut F)
    -> ControlFlow<SearchStatus>
where
    F: FnMut(Vec<UInt>) -> ControlFlow<()>
{
    /*
    1. If the matrix A has no columns, the current partial solution is a valid solution; terminate successfully.
    2. Otherwise choose a column c (deterministically).
    3. Choose a row r such that Ar, c = 1 (nondeterministically). [This means: all possibilities are explored]
    4. Include row r in the partial solution.
    5. For each column j such that Ar, j = 1,

        for each row i such that Ai, j = 1,

            delete row i from matrix A.

        delete column j from matrix A.

    6. Repeat this algorithm recursively on the reduced matrix A.
    */
    stat!(config, calls, += 1);
    trace!("Enter algo X with exploring from partial_solution {:?}", partial_solution);
    if_trace!(trace!("{}", dlx.format(false)));

    if config.is_cancelled() {
        return ControlFlow::Break(SearchStatus::Cancelled);
    }

    // 1. is the matrix empty
    if dlx.is_empty() {
        // We have a solution
        let sol = dlx.solution_to_rows(partial_solution);
        trace!("==> Valid solution: {:?} (index {:?})", sol, partial_solution);
        *solutions += 1;
        if out(sol).is_break() || config.limit_reached(*solutions) {
            return ControlFlow::Break(SearchStatus::Solved);
        }
        return ControlFlow::Continue(());
    }

    // 2. Pick the least populated column
    let (choice, seeks) = dlx.choose_column_seek();
    stat!(config, col_seek, += seeks);
    let col_index = match choice {
        Some((index, count)) if count > 0 => index,
        _otherwise => {
            trace!("Column {:?} unsatisfied, backtracking", choice);
            stat!(config, backtracks, += 1);
            return ControlFlow::Continue(());
        }
    };

    trace!("Selected col_index = {}", col_index);

    // 3. Explore the rows in the chosen column

    // cover column
    dlx.cover(col_index);
    stat!(config, cover, += 1);

    let mut flow = ControlFlow::Continue(());

    // now cover other columns sharing a one with this one
    let mut col_iter = dlx.walk_from(col_index);
    while let Some(col_i) = col_iter.next(dlx, Down) {
        if config.is_cancelled() {
            flow = ControlFlow::Break(SearchStatus::Cancelled);
            break;
        }

        // 4. Include row r in the partial solution
        partial_solution.push(col_i);
        trace!("partial_solution {:?}", partial_solution);

        // 5. Cover each column
        let mut row_iter = dlx.walk_from(col_i);
        while let Some(row_j) = row_iter.next(dlx, Next) {
            if let Ok(chead) = dlx.col_head_of(row_j) {
                dlx.cover(chead);
                stat!(config, cover, += 1);
            }
        }

        // 6. Repeat this algorithm recursively on the reduced matrix A.
        trace!("Recurse!");
        flow = algox_inner(dlx, partial_solution, config, solutions, out);

        let _ = partial_solution.pop();
        trace!("partial_solution {:?}", partial_solution);

        let mut row_iter = dlx.walk_from(col_i);
        while let Some(row_j) = row_iter.next(dlx, Next.opp()) {
            if let Ok(chead) = dlx.col_head_of(row_j) {
                dlx.uncover(chead);
            }
        }

        // covers of this level are undone before the break propagates
        if flow.is_break() {
            break;
        }
    }
    dlx.uncover(col_index);
    if flow.is_continue() {
        stat!(config, backtracks, += 1);
    }
    flow
}
