use std::collections::HashSet;

use itertools::Itertools;
use proptest::prelude::*;

use decomp::{admissible, binomial, Block, Combinations, DecompError, DecompositionProblem, Edge, Vertex};

/// (n, m) pairs that are known to decompose and solve quickly
fn solvable() -> impl Strategy<Value=(Vertex, Vertex)> {
    prop_oneof![
        (2..=12u32).prop_map(|n| (n, 2)),
        (2..=9u32).prop_map(|n| (n, n)),
        prop::sample::select(vec![3u32, 7, 9, 13]).prop_map(|n| (n, 3)),
    ]
}

/// A required block: m distinct vertices of 1..=n in arbitrary order
fn required_block(n: Vertex, m: Vertex) -> impl Strategy<Value=Vec<Vertex>> {
    Just((1..=n).collect::<Vec<_>>())
        .prop_shuffle()
        .prop_map(move |v| v[..m as usize].to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn combinations_in_lexicographic_order(n in 0..=9u32, k in 0..=10usize) {
        let ours: Vec<Vec<Vertex>> = Combinations::new(n, k).collect();
        let expected: Vec<Vec<Vertex>> = (1..=n).combinations(k).collect();
        prop_assert_eq!(ours.len() as u64, binomial(n.into(), k as u64).unwrap());
        prop_assert_eq!(ours, expected);
    }

    #[test]
    fn decompositions_cover_each_edge_once((n, m) in solvable()) {
        let d = DecompositionProblem::new(n, m, Vec::new()).unwrap().solve().unwrap();
        prop_assert!(d.verify().is_ok());
        let pairs = binomial(n.into(), 2).unwrap();
        let per_block = binomial(m.into(), 2).unwrap();
        prop_assert_eq!(d.len() as u64, pairs / per_block);
        for block in d.blocks() {
            prop_assert_eq!(block.len(), m as usize);
            prop_assert!(block.vertices().iter().all(|&x| 1 <= x && x <= n));
        }
    }

    #[test]
    fn solving_is_deterministic((n, m) in solvable()) {
        let problem = DecompositionProblem::new(n, m, Vec::new()).unwrap();
        let first = problem.solve().unwrap();
        let second = problem.solve().unwrap();
        prop_assert_eq!(first.discovered(), second.discovered());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn required_block_is_kept(
        (n, block) in prop::sample::select(vec![7u32, 9, 13])
            .prop_flat_map(|n| (Just(n), required_block(n, 3)))
    ) {
        let required = vec![Block::from(block.clone())];
        let d = DecompositionProblem::new(n, 3, required).unwrap().solve().unwrap();
        prop_assert_eq!(d.required()[0].vertices(), &block[..]);
        prop_assert_eq!(d.blocks().next().unwrap().vertices(), &block[..]);

        let covered: HashSet<Edge> = d.required()[0].edges().collect();
        for other in d.discovered() {
            prop_assert!(!other.same_set(&d.required()[0]));
            prop_assert!(other.edges().all(|e| !covered.contains(&e)));
        }
        prop_assert!(d.verify().is_ok());
    }
}

#[test]
fn found_only_when_admissible() {
    let cases = (3..=9).map(|n| (n, 3))
        .chain((4..=9).map(|n| (n, 4)))
        .chain((5..=9).map(|n| (n, 5)));
    for (n, m) in cases {
        let result = DecompositionProblem::new(n, m, Vec::new()).unwrap().solve();
        match result {
            Ok(d) => {
                assert!(admissible(n, m), "found a K_{} decomposition of K_{}", m, n);
                d.verify().unwrap();
            }
            Err(e) => {
                assert_eq!(e, DecompError::NoSolution, "n={} m={}", n, m);
                assert!(!admissible(n, m), "missed a K_{} decomposition of K_{}", m, n);
            }
        }
    }
}
