//! Encoding of a decomposition request as an exact cover matrix.
//!
//! For an (n, m)-decomposition with required blocks:
//!
//! - Columns: every edge {u, v} of K_n not covered by a required block,
//!   in lexicographic order. Column `c` (1-based) is `columns[c - 1]`.
//! - Rows: every m-subset of `1..=n`, in lexicographic order, that is not a
//!   required block and whose C(m, 2) edges are all columns.
//!
//! A candidate that touches a covered edge is dropped entirely, so every row
//! has exactly C(m, 2) items and is edge-disjoint from the required blocks.
//!
//! For n = 4, m = 3 without required blocks the columns are
//! 12 13 14 23 24 34 and the rows are
//!
//! ```text
//! 1 2 3 => 1 2 . 4 . .
//! 1 2 4 => 1 . 3 . 5 .
//! 1 3 4 => . 2 3 . . 6
//! 2 3 4 => . . . 4 5 6
//! ```

use std::collections::{HashMap, HashSet};

use dlx::{Dlx, DlxError, UInt};
use indexmap::IndexSet;
use log::debug;

use crate::combinations::Combinations;
use crate::error::{BlockDefect, DecompError};
use crate::graph::{Block, Edge, Vertex};

/// Candidate block with its columns (1-based, ascending)
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub block: Block,
    pub columns: Vec<UInt>,
}

/// Columns and rows of the exact cover matrix
#[derive(Clone, Debug)]
pub struct Encoding {
    pub columns: IndexSet<Edge>,
    pub rows: Vec<Row>,
}

impl Encoding {
    /// Column number of an uncovered edge
    pub fn column_of(&self, edge: &Edge) -> Option<UInt> {
        column_of(&self.columns, edge)
    }

    /// Build the Dlx matrix; the row labels are returned in row order.
    pub fn into_dlx(self) -> Result<(Dlx, Vec<Block>), DlxError> {
        let mut dlx = Dlx::new(self.columns.len() as UInt);
        let mut labels = Vec::with_capacity(self.rows.len());
        for row in self.rows {
            dlx.append_row(row.columns)?;
            labels.push(row.block);
        }
        Ok((dlx, labels))
    }
}

fn column_of(columns: &IndexSet<Edge>, edge: &Edge) -> Option<UInt> {
    columns.get_index_of(edge).map(|i| i as UInt + 1)
}

/// Check that `block` has `m` distinct vertices in `1..=n`.
pub(crate) fn check_block(order: Vertex, decomp_order: Vertex, block: &Block) -> Result<(), BlockDefect> {
    if block.len() != decomp_order as usize {
        return Err(BlockDefect::WrongArity { expected: decomp_order as usize, found: block.len() });
    }
    if let Some(&x) = block.vertices().iter().find(|&&x| x == 0 || x > order) {
        return Err(BlockDefect::VertexOutOfRange(x));
    }
    let sorted = block.sorted();
    if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
        return Err(BlockDefect::DuplicateVertex(w[0]));
    }
    Ok(())
}

/// Edges covered by the required blocks.
///
/// Every block is checked before its edges are taken; two blocks sharing an
/// edge is an error. Blocks sharing only vertices are fine.
pub fn covered_edges(order: Vertex, decomp_order: Vertex, required: &[Block])
    -> Result<HashSet<Edge>, DecompError>
{
    let mut owner = HashMap::new();
    for (index, block) in required.iter().enumerate() {
        check_block(order, decomp_order, block).map_err(|defect| {
            DecompError::MalformedRequiredBlock { index, block: block.clone(), defect }
        })?;
        for edge in block.edges() {
            if let Some(&first) = owner.get(&edge) {
                return Err(DecompError::ConflictingRequiredBlocks { first, second: index, edge });
            }
            owner.insert(edge, index);
        }
    }
    Ok(owner.into_iter().map(|(edge, _)| edge).collect())
}

/// One column per edge of K_n that is not covered, in lexicographic order.
pub fn build_columns(order: Vertex, covered: &HashSet<Edge>) -> IndexSet<Edge> {
    Combinations::new(order, 2)
        .map(|pair| Edge::new(pair[0], pair[1]))
        .filter(|edge| !covered.contains(edge))
        .collect()
}

/// One row per candidate block that is not required and has all its edges
/// among `columns`, in lexicographic order of the candidates.
pub fn build_rows(order: Vertex, decomp_order: Vertex, required: &[Block], columns: &IndexSet<Edge>)
    -> Vec<Row>
{
    let required: HashSet<Vec<Vertex>> = required.iter().map(Block::sorted).collect();
    let mut rows = Vec::new();
    let mut dropped = 0usize;
    for candidate in Combinations::new(order, decomp_order as usize) {
        if required.contains(&candidate) {
            continue;
        }
        let block = Block::from(candidate);
        // candidates are ascending, so the columns come out ascending
        let row_columns = block.edges()
            .map(|edge| column_of(columns, &edge))
            .collect::<Option<Vec<_>>>();
        match row_columns {
            Some(row_columns) => rows.push(Row { block, columns: row_columns }),
            None => dropped += 1,
        }
    }
    debug!("{} candidate rows, {} dropped for touching a covered edge", rows.len(), dropped);
    rows
}

/// Run the whole encoding: covered edges, then columns, then rows.
pub fn encode(order: Vertex, decomp_order: Vertex, required: &[Block]) -> Result<Encoding, DecompError> {
    let covered = covered_edges(order, decomp_order, required)?;
    Ok(encode_covered(order, decomp_order, required, &covered))
}

pub(crate) fn encode_covered(order: Vertex, decomp_order: Vertex, required: &[Block], covered: &HashSet<Edge>)
    -> Encoding
{
    let columns = build_columns(order, covered);
    debug!("K_{}: {} edges covered by required blocks, {} columns", order, covered.len(), columns.len());
    let rows = build_rows(order, decomp_order, required, &columns);
    Encoding { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(list: &[&[Vertex]]) -> Vec<Block> {
        list.iter().map(|b| Block::from(b.to_vec())).collect()
    }

    #[test]
    fn k4_triangles() {
        let enc = encode(4, 3, &[]).unwrap();
        assert_eq!(enc.columns.len(), 6);
        assert_eq!(enc.column_of(&Edge::new(1, 2)), Some(1));
        assert_eq!(enc.column_of(&Edge::new(4, 3)), Some(6));
        let rows: Vec<_> = enc.rows.iter().map(|r| (r.block.vertices().to_vec(), r.columns.clone())).collect();
        assert_eq!(rows, vec![
            (vec![1, 2, 3], vec![1, 2, 4]),
            (vec![1, 2, 4], vec![1, 3, 5]),
            (vec![1, 3, 4], vec![2, 3, 6]),
            (vec![2, 3, 4], vec![4, 5, 6]),
        ]);
    }

    #[test]
    fn covered_edges_are_not_columns() {
        let required = blocks(&[&[1, 2, 3]]);
        let covered = covered_edges(4, 3, &required).unwrap();
        assert_eq!(covered.len(), 3);
        assert!(covered.contains(&Edge::new(3, 1)));

        let columns = build_columns(4, &covered);
        let columns: Vec<_> = columns.into_iter().collect();
        assert_eq!(columns, vec![Edge::new(1, 4), Edge::new(2, 4), Edge::new(3, 4)]);
    }

    #[test]
    fn partially_covered_candidates_are_dropped() {
        let required = blocks(&[&[1, 2, 3]]);
        let enc = encode(4, 3, &required).unwrap();
        // every other triangle of K4 shares an edge with 1 2 3
        assert!(enc.rows.is_empty());

        let enc = encode(5, 3, &required).unwrap();
        assert_eq!(enc.columns.len(), 7);
        assert!(enc.rows.iter().all(|r| r.columns.len() == 3));
        let labels: Vec<_> = enc.rows.iter().map(|r| r.block.to_string()).collect();
        assert_eq!(labels, ["1 4 5", "2 4 5", "3 4 5"]);
    }

    #[test]
    fn required_block_is_skipped_in_any_order() {
        // m = 2 required blocks are single edges; the candidate equal to
        // the block must be skipped even though its order differs
        let required = blocks(&[&[3, 1]]);
        let enc = encode(3, 2, &required).unwrap();
        let labels: Vec<_> = enc.rows.iter().map(|r| r.block.to_string()).collect();
        assert_eq!(labels, ["1 2", "2 3"]);
    }

    #[test]
    fn shared_vertex_is_not_a_conflict() {
        let required = blocks(&[&[1, 2, 3], &[3, 4, 5]]);
        let covered = covered_edges(7, 3, &required).unwrap();
        assert_eq!(covered.len(), 6);
    }

    #[test]
    fn shared_edge_is_a_conflict() {
        let required = blocks(&[&[1, 2, 3], &[4, 5, 6], &[2, 1, 4]]);
        let err = covered_edges(7, 3, &required).unwrap_err();
        assert_eq!(err, DecompError::ConflictingRequiredBlocks {
            first: 0,
            second: 2,
            edge: Edge::new(1, 2),
        });
    }

    #[test]
    fn malformed_blocks() {
        let check = |list: &[&[Vertex]]| covered_edges(5, 3, &blocks(list)).unwrap_err();
        assert!(matches!(check(&[&[1, 2]]),
            DecompError::MalformedRequiredBlock { index: 0, defect: BlockDefect::WrongArity { expected: 3, found: 2 }, .. }));
        assert!(matches!(check(&[&[1, 2, 3], &[1, 4, 6]]),
            DecompError::MalformedRequiredBlock { index: 1, defect: BlockDefect::VertexOutOfRange(6), .. }));
        assert!(matches!(check(&[&[0, 4, 5]]),
            DecompError::MalformedRequiredBlock { defect: BlockDefect::VertexOutOfRange(0), .. }));
        assert!(matches!(check(&[&[4, 2, 4]]),
            DecompError::MalformedRequiredBlock { defect: BlockDefect::DuplicateVertex(4), .. }));
    }

    #[test]
    fn into_dlx_keeps_row_order() {
        let enc = encode(4, 2, &[]).unwrap();
        let (dlx, labels) = enc.into_dlx().unwrap();
        assert_eq!(dlx.columns(), 6);
        assert_eq!(dlx.rows(), 6);
        assert_eq!(labels[0].vertices(), [1, 2]);
        assert_eq!(labels[5].vertices(), [3, 4]);
        for col in 1..=6 {
            assert_eq!(dlx.column_count(col), 1);
        }
    }
}
