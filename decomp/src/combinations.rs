//! Fixed-width subsets of `1..=n` in lexicographic order.
//!
//! Both the edge columns and the candidate block rows are enumerated from
//! here, so this order decides the order of the whole matrix.

use std::convert::TryFrom;

use crate::graph::Vertex;

/// Iterator over all `k`-subsets of `1..=n`, each an ascending tuple,
/// ordered by first element, then second, and so on.
///
/// `k > n` gives nothing; `k == 0` gives the empty tuple once.
#[derive(Clone, Debug)]
pub struct Combinations {
    n: Vertex,
    current: Vec<Vertex>,
    done: bool,
}

impl Combinations {
    pub fn new(n: Vertex, k: usize) -> Self {
        let done = k > n as usize;
        let current = if done { Vec::new() } else { (1..=k as Vertex).collect() };
        Combinations { n, current, done }
    }

    /// Advance `current` to its successor, or mark the end.
    fn step(&mut self) {
        let k = self.current.len();
        // rightmost position that is not yet at its maximum n - (k - 1 - i)
        for i in (0..k).rev() {
            let max = self.n - (k - 1 - i) as Vertex;
            if self.current[i] < max {
                self.current[i] += 1;
                for j in i + 1..k {
                    self.current[j] = self.current[j - 1] + 1;
                }
                return;
            }
        }
        self.done = true;
    }
}

impl Iterator for Combinations {
    type Item = Vec<Vertex>;

    fn next(&mut self) -> Option<Vec<Vertex>> {
        if self.done {
            return None;
        }
        let item = self.current.clone();
        self.step();
        Some(item)
    }
}

impl std::iter::FusedIterator for Combinations { }

/// The binomial coefficient C(n, k), or `None` if it does not fit in `u64`.
pub fn binomial(n: u64, k: u64) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = Ord::min(k, n - k);
    let mut acc: u128 = 1;
    for i in 0..k {
        // exact: acc * (n - i) is divisible by i + 1 at every step
        acc = acc * u128::from(n - i) / u128::from(i + 1);
        if acc > u128::from(u64::MAX) {
            return None;
        }
    }
    u64::try_from(acc).ok()
}
