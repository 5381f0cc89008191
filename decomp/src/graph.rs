//! Vertices, edges and blocks of the complete graph K_n.

use std::fmt;

/// Vertex of K_n, numbered `1..=n`.
pub type Vertex = dlx::UInt;

/// Unordered pair of distinct vertices, stored sorted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    u: Vertex,
    v: Vertex,
}

impl Edge {
    /// Canonical edge between `a` and `b`, which must differ.
    pub fn new(a: Vertex, b: Vertex) -> Self {
        debug_assert_ne!(a, b, "loop edge at {}", a);
        if a < b {
            Edge { u: a, v: b }
        } else {
            Edge { u: b, v: a }
        }
    }

    /// The endpoints, smallest first
    pub fn endpoints(&self) -> (Vertex, Vertex) {
        (self.u, self.v)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}, {}}}", self.u, self.v)
    }
}

/// A copy of K_m placed in the decomposition, given by its vertices.
///
/// The vertex order is kept as given, so required blocks are reported back
/// verbatim; use `same_set` to compare blocks as sets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    vertices: Vec<Vertex>,
}

impl Block {
    pub fn new(vertices: impl Into<Vec<Vertex>>) -> Self {
        Block { vertices: vertices.into() }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertices in ascending order
    pub fn sorted(&self) -> Vec<Vertex> {
        let mut v = self.vertices.clone();
        v.sort_unstable();
        v
    }

    /// True if both blocks hold the same vertices, in any order
    pub fn same_set(&self, other: &Block) -> bool {
        self.len() == other.len() && self.sorted() == other.sorted()
    }

    /// All C(m, 2) edges of the block, in lexicographic order of vertex
    /// positions. For an ascending block that is lexicographic edge order.
    ///
    /// The vertices must be distinct.
    pub fn edges(&self) -> impl Iterator<Item=Edge> + '_ {
        let v = &self.vertices;
        (0..v.len()).flat_map(move |i| (i + 1..v.len()).map(move |j| Edge::new(v[i], v[j])))
    }
}

impl From<Vec<Vertex>> for Block {
    fn from(vertices: Vec<Vertex>) -> Self {
        Block { vertices }
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, x) in self.vertices.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", x)?;
        }
        Ok(())
    }
}
