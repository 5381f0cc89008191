// from bluss dlx solver

//! Dancing Links exact cover matrix and Knuth's Algorithm X.
//!
//! The matrix is an arena of nodes addressed by index. Removing a node from a
//! list only rewrites the links of its neighbours, the node keeps its own links,
//! so it can be restored in O(1) as long as removals are undone in reverse order.

#[cfg(feature="trace")]
macro_rules! trace {
    ($($t:tt)*) => { log::trace!($($t)*) }
}

#[cfg(feature="trace")]
macro_rules! if_trace {
    ($($t:tt)*) => { $($t)* }
}

#[cfg(not(feature="trace"))]
macro_rules! trace {
    ($($t:tt)*) => { }
}

#[cfg(not(feature="trace"))]
macro_rules! if_trace {
    ($($t:tt)*) => { }
}

mod algox;

pub use crate::algox::{algox, algox_config, AlgoXConfig, AlgoXReport, AlgoXStats, SearchStatus};

use std::cmp::Ordering;
use std::fmt;
use std::fmt::Write as _;
use std::iter::repeat;

use thiserror::Error;

type Index = usize;

// Direction of list link
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Prev,
    Next,
    Up,
    Down,
}
use Direction::*;

impl Direction {
    /// Get opposite direction.
    ///
    /// Opposites:
    /// - Prev and Next
    /// - Up and Down
    #[inline(always)]
    fn opp(self) -> Direction {
        match self {
            Prev => Next,
            Next => Prev,
            Up => Down,
            Down => Up,
        }
    }
}

/// Link node in the Dancing Links structure,
/// which is linked along two axes - prev/next and up/down.
#[derive(Copy, Clone, Default, PartialEq)]
pub(crate) struct Node<T> {
    /// Prev, Next, Up, Down
    link: [usize; 4],
    pub(crate) value: T,
}

macro_rules! lfmt {
    ($x:expr) => {
        if $x == !0 { -1 } else { $x as isize }
    }
}

impl<T> fmt::Debug for Node<T> where T: fmt::Debug
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct(stringify!(Node))
            .field(stringify!(link), &format_args!("[{}, {}; {}, {}]",
                lfmt!(self.link[0]), lfmt!(self.link[1]), lfmt!(self.link[2]), lfmt!(self.link[3])))
            .field(stringify!(value), &format_args!("{:?}", self.value))
            .finish()
    }
}

impl<T> Node<T> {
    /// Create a new node from the value.
    fn new(value: T) -> Self {
        Node {
            value,
            link: [!0; 4], // invalid link values to start with
        }
    }

    /// Get link in the given direction
    fn get(&self, dir: Direction) -> Index {
        self.link[dir as usize]
    }

    /// Set link in the given direction
    fn set(&mut self, dir: Direction, index: Index) -> &mut Self {
        self.link[dir as usize] = index;
        self
    }
}

pub type UInt = u32;
pub type Int = i32;

/// Exact cover matrix in Dancing Links form.
///
/// Columns are numbered `1..=columns`, rows are numbered from zero in the
/// order they were appended.
#[derive(Debug, Clone, PartialEq)]
pub struct Dlx {
    /// Node layout in DLX:
    /// [ Head ]    [ Columns ... ]
    /// [ Row items ... ]
    /// [ Row items ... ]
    /// ... etc.
    ///
    /// Doubly linked list in two dimensions: Prev, Next and Up, Down.
    pub(crate) nodes: Vec<Node<Point>>,
    columns: UInt,
    rows: UInt,
    /// Index with the start of each row (sorted, ascending order);
    /// used for lookup from node index to row index.
    row_table: Vec<Index>,
}

/// Value stored inside the node.
///
/// The variant indentifies the kind of node,
/// and the number is used as indicated.
#[derive(Debug, Copy, Clone, PartialEq)]
enum Point {
    /// Singleton head node before all columns; value ignored.
    Head(UInt),
    /// Column head with counter for items alive in the column
    Column(UInt),
    /// Row body item, with column number for reference to column header
    Body(UInt),
}

impl Point {
    #[inline]
    pub(crate) fn value(&self) -> UInt {
        use Point::*;

        match *self {
            Head(x) | Column(x) | Body(x) => x
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DlxError {
    #[error("invalid row: {0}")]
    InvalidRow(&'static str),
    #[error("column {0} is not in the matrix")]
    InvalidColumn(UInt),
}

impl Dlx {
    /// Create a new Dlx with the universe of points in 1..=universe
    pub fn new(universe: UInt) -> Self {
        // Insert head node and the column row.
        let mut nodes = vec![Node::new(Point::Head(0))];
        nodes.extend(repeat(Node::new(Point::Column(0))).take(universe as usize));

        // header ring: head and column heads, each column empty
        let ring = nodes.len();
        for (index, node) in nodes.iter_mut().enumerate() {
            node.set(Up, index)
                .set(Down, index)
                .set(Prev, (index + ring - 1) % ring)
                .set(Next, (index + 1) % ring);
        }

        Dlx {
            nodes,
            columns: universe,
            rows: 0,
            row_table: Vec::new(),
        }
    }

    /// Number of columns the matrix was created with
    pub fn columns(&self) -> UInt { self.columns }

    /// Number of rows appended so far
    pub fn rows(&self) -> UInt { self.rows }

    fn head(&self) -> Index { 0 }

    fn head_node(&self) -> &Node<Point> {
        &self.nodes[0]
    }

    fn column_head(&self, col: UInt) -> Index {
        debug_assert!(col <= self.columns);
        col as Index
    }

    /// Live item count of column `col` (1-based).
    ///
    /// ***Panics*** if `col` is zero or larger than the number of columns.
    pub fn column_count(&self, col: UInt) -> UInt {
        assert!(col != 0 && col <= self.columns, "column {} out of range", col);
        self.nodes[self.column_head(col)].value.value()
    }

    /// Return true if no columns are left in the header ring
    pub fn is_empty(&self) -> bool {
        self.head_node().get(Next) == self.head()
    }

    pub(crate) fn walk_from(&self, index: Index) -> Walker {
        Walker {
            index,
            start: index,
        }
    }

    pub(crate) fn get_value(&self, index: Index) -> UInt {
        self.nodes[index].value.value()
    }

    /// Get the column head for row item `index`
    pub(crate) fn col_head_of(&self, index: Index) -> Result<Index, DlxError> {
        let col_head = match self.nodes[index].value {
            Point::Body(c) => self.column_head(c),
            _otherwise => return Err(DlxError::InvalidRow("Expected body point")),
        };
        Ok(col_head)
    }

    fn modify_col_head_of(&mut self, index: Index, incr: Int) {
        debug_assert!(matches!(self.nodes[index].value, Point::Body(_)));
        if let Point::Body(c) = self.nodes[index].value {
            if let Point::Column(ref mut v) = self.nodes[c as Index].value {
                *v = (*v as Int + incr) as UInt;
            }
        }
    }

    fn append_to_column(&mut self, col: UInt, new_index: Index) {
        debug_assert!(col <= self.columns && col != 0, "invalid column {}", col);
        debug_assert!(new_index < self.nodes.len(), "invalid index {}", new_index);
        debug_assert!(matches!(self.nodes[new_index].value, Point::Body(_)));
        let head_index = col as Index;
        let head = &mut self.nodes[head_index];
        let old_end = head.get(Up);
        head.set(Up, new_index);
        if let Point::Column(ref mut count) = head.value {
            *count += 1;
        }
        self.nodes[old_end].set(Down, new_index);
        self.nodes[new_index].set(Up, old_end);
        self.nodes[new_index].set(Down, head_index);
    }

    /// Append a row (a subset) to the Dlx
    ///
    /// The items of the row use one-based indexing and must be in ascending order;
    /// the items must be in 1..=universe.
    ///
    /// On error the matrix is left as it was before the call.
    pub fn append_row(&mut self, row: impl IntoIterator<Item=UInt>) -> Result<(), DlxError> {
        // try creating nodes for all items
        let start_index = self.nodes.len();
        let try_append = (|| {
            let mut max_seen = None;
            for r in row {
                if let Some(ms) = max_seen {
                    if ms >= r {
                        return Err(DlxError::InvalidRow("invalid order"));
                    }
                }
                if r == 0 {
                    return Err(DlxError::InvalidRow("invalid column zero"));
                }
                if r > self.columns {
                    return Err(DlxError::InvalidRow("row larger than column count"));
                }
                max_seen = Some(r);
                let body_node = Node::new(Point::Body(r));
                self.nodes.push(body_node);
            }

            if max_seen.is_none() {
                return Err(DlxError::InvalidRow("must not be empty"));
            }
            Ok(())
        })();

        if try_append.is_err() {
            // roll back changes on error (only changes are .push() calls so far)
            self.nodes.truncate(start_index);
            return try_append;
        }

        // after error checks,
        // append new items to each column
        for index in start_index..self.nodes.len() {
            self.append_to_column(self.nodes[index].value.value(), index);
        }

        // now link prev-next axis
        let width = self.nodes.len() - start_index;
        for (offset, node) in self.nodes[start_index..].iter_mut().enumerate() {
            node.set(Prev, start_index + (offset + width - 1) % width)
                .set(Next, start_index + (offset + 1) % width);
        }
        self.rows += 1;
        self.row_table.push(start_index);

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn assert_links(&self) {
        for (node_i, node) in self.nodes.iter().enumerate() {
            for &i in &node.link {
                assert_ne!(i, !0, "Uninitialized link {} for node {}", i, node_i);
                assert!(i < self.nodes.len(), "Out of bounds link {} for node {}", i, node_i);
            }
        }
    }

    /// Get row index for node index
    pub(crate) fn row_index_of(&self, index: Index) -> usize {
        let pos = self.row_table.binary_search_by(move |&x| {
            if x <= index {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }).unwrap_err(); /* never equal */
        debug_assert_ne!(pos, 0, "solution contains index before first row");
        pos - 1
    }

    /// Return solution as the row indexes (zero-indexed)
    pub(crate) fn solution_to_rows(&self, sol: &[Index]) -> Vec<UInt> {
        // Given a table like
        // [8, 11, 13, 17]
        // we map indexes to:
        // 8, 9, 10 => 0
        // 11, 12 => 1
        // 13 => 2
        // 17, 18 => 3
        let mut res = Vec::with_capacity(sol.len());
        for &s in sol {
            let pos = self.row_index_of(s);
            res.push(pos as UInt);
        }
        res
    }

    /// Remove `x` from the list in direction `dir`, where the list is doubly linked.
    ///
    /// x.left.right ← x.right;
    /// x.right.left ← x.left;
    pub(crate) fn remove(&mut self, index: Index, dir: Direction) {
        let right = dir;
        let left = dir.opp();
        let x = &self.nodes[index];
        let xr = x.get(right);
        let xl = x.get(left);

        self.nodes[xl].set(right, xr);
        self.nodes[xr].set(left, xl);
    }

    /// Restore `x` to the list, reversing a previous removal.
    ///
    /// x.left.right ← x;
    /// x.right.left ← x;
    pub(crate) fn restore(&mut self, index: Index, dir: Direction) {
        let right = dir;
        let left = dir.opp();
        let x = index;
        let xr = self.nodes[x].get(right);
        let xl = self.nodes[x].get(left);

        self.nodes[xl].set(right, x);
        self.nodes[xr].set(left, x);
    }

    /// Cover column c
    pub(crate) fn cover(&mut self, c: Index) {
        // cover column
        //
        // start from column head c
        // column head c unlinked in Prev/Next
        // step Down in rows to i
        //   Go Next in row and unlink in Up/Down
        //   (Not unlinking i itself)
        //   Decrement column's count
        trace!("cover column {}", c);
        debug_assert!(c > 0 && c <= self.columns as _,
                      "Not a column head: {}", c);

        self.remove(c, Next);
        let mut rows = self.walk_from(c);
        while let Some(row_i) = rows.next(self, Down) {
            let mut row_i_walk = self.walk_from(row_i);
            while let Some(row_i_j) = row_i_walk.next(self, Next) {
                self.remove(row_i_j, Down);
                self.modify_col_head_of(row_i_j, -1);
            }
        }
    }

    /// Uncover column c
    pub(crate) fn uncover(&mut self, c: Index) {
        // uncover column
        //
        // steps taken in the reverse order of cover.
        //
        // start from column head c
        // step Up in rows to i
        //   Go Prev in row and unlink in Up/Down
        //   (Not unlinking i itself)
        //   Increment column's count
        // column head c restored in Prev/Next
        trace!("uncover column {}", c);
        debug_assert!(c > 0 && c <= self.columns as _,
                      "Not a column head: {}", c);

        let mut rows = self.walk_from(c);
        while let Some(row_i) = rows.next(self, Down.opp()) {
            let mut row_i_walk = self.walk_from(row_i);
            while let Some(row_i_j) = row_i_walk.next(self, Next.opp()) {
                self.restore(row_i_j, Down);
                self.modify_col_head_of(row_i_j, 1);
            }
        }
        self.restore(c, Next);
    }

    /// Cover column `col` (1-based), removing it and every row that intersects it.
    ///
    /// Covers must be undone with `uncover_column` in the reverse order they
    /// were made; the link structure is corrupted otherwise.
    pub fn cover_column(&mut self, col: UInt) -> Result<(), DlxError> {
        if col == 0 || col > self.columns {
            return Err(DlxError::InvalidColumn(col));
        }
        self.cover(self.column_head(col));
        Ok(())
    }

    /// Undo the most recent `cover_column(col)`.
    pub fn uncover_column(&mut self, col: UInt) -> Result<(), DlxError> {
        if col == 0 || col > self.columns {
            return Err(DlxError::InvalidColumn(col));
        }
        self.uncover(self.column_head(col));
        Ok(())
    }

    /// Pick the live column with the fewest live items.
    ///
    /// Ties go to the column met first in the header ring, which is the
    /// lowest numbered one. Returns the column number and its count.
    pub fn choose_column(&self) -> Option<(UInt, UInt)> {
        self.choose_column_seek().0
            .map(|(index, count)| (index as UInt, count))
    }

    /// Column choice as (column head index, count), plus how many column
    /// heads were visited.
    pub(crate) fn choose_column_seek(&self) -> (Option<(Index, UInt)>, u64) {
        let mut best = None;
        let mut seeks = 0;
        let mut col_heads = self.walk_from(self.head());
        let mut min = !0;
        while let Some(index) = col_heads.next(self, Next) {
            seeks += 1;
            let count = self.get_value(index);
            if count < min {
                min = count;
                best = Some((index, count));
                if min == 0 { break; } // found a minimum
            }
        }
        (best, seeks)
    }

    /// Format a debug representation of the Dlx
    pub fn format(&self, include_rows: bool) -> String {
        let mut out = String::new();
        // writing into a String does not fail
        let _ = self.write_to(&mut out, include_rows);
        out
    }

    /// Log a debug representation of the Dlx, including rows
    pub fn debug_print(&self) {
        log::debug!("{}", self.format(true));
    }

    fn write_to(&self, out: &mut String, include_rows: bool) -> fmt::Result {
        let n_blocks = self.nodes.len().saturating_sub(1 + self.columns as usize);
        writeln!(out, "Dlx columns={}, rows={}, nodes={} (blocks={})",
            self.columns, self.rows, self.nodes.len(), n_blocks)?;

        let mut visible_rows = vec![None; self.rows as usize];

        let mut headings = self.walk_from(0);
        write!(out, "Head  ")?;
        while let Some(col_head) = headings.next(self, Next) {
            write!(out, "{:4} ", self.nodes[col_head].value.value())?;

            let mut col_iter = self.walk_from(col_head);
            while let Some(r) = col_iter.next(self, Down) {
                let ri = self.row_index_of(r);
                visible_rows[ri].get_or_insert(r);
            }
        }
        writeln!(out)?;

        if !include_rows {
            return Ok(());
        }

        for row_head in visible_rows.iter().filter_map(|x| x.as_ref().copied()) {
            let index = self.row_index_of(row_head);
            write!(out, "Row({}) {:3}, ", index, self.nodes[row_head].value.value())?;
            let mut col = self.walk_from(row_head);
            while let Some(block) = col.next(self, Next) {
                let col_head = self.nodes[block].value.value();
                write!(out, "{:3}, ", col_head)?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

pub struct Walker {
    index: Index,
    start: Index,
}

impl Walker {
    pub(crate) fn next(&mut self, dlx: &Dlx, dir: Direction) -> Option<Index> {
        let next = dlx.nodes[self.index].get(dir);
        self.index = next;
        debug_assert_ne!(next, !0, "Invalid index found in traversal");
        if next == self.start {
            None
        } else {
            Some(next)
        }
    }
}
