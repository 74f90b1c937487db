//! Structural guarantees that must hold after every add

use crate::common::*;
use proptest::prelude::*;

#[test]
fn test_reconstruct_round_trip() {
    let mut rng = seeded_rng(7);
    let vectors = random_vectors(&mut rng, 120, 5);
    let attributes = random_attributes(&mut rng, 120, 3);
    let mut index = AcornIndex::new(AcornConfig::with_dimension(5).unwrap()).unwrap();
    index.add(&vectors, &attributes).unwrap();

    for (i, expected) in vectors.chunks(5).enumerate() {
        let id = VectorId::from(i);
        assert_eq!(index.reconstruct(id).unwrap(), expected);
        assert_eq!(index.attribute(id), Some(attributes[i]));
    }
    let err = index.reconstruct(VectorId::new(120)).unwrap_err();
    assert_eq!(err, AcornError::NotFound { id: VectorId::new(120) });
}

#[test]
fn test_invariants_hold_after_every_add() {
    let mut rng = seeded_rng(11);
    let config = AcornConfig::new(3, 6, 3, 2, MetricKind::L2).unwrap();
    let mut index = AcornIndex::new(config).unwrap();
    for _ in 0..150 {
        let v = random_vectors(&mut rng, 1, 3);
        let attr = random_attributes(&mut rng, 1, 5)[0];
        index.add_one(&v, attr).unwrap();
        let violations = index.check_invariants();
        assert!(violations.is_empty(), "after {} adds: {:?}", index.len(), violations);
    }
}

#[test]
fn test_symmetry_of_both_lists() {
    let index = random_index(recall_config(4), 300, 4, 5);
    for i in 0..index.len() {
        let a = VectorId::from(i);
        for which in [NeighborList::Base, NeighborList::Augmented] {
            for &b in index.neighbors(a, which) {
                assert!(
                    index.neighbors(b, which).contains(&a),
                    "{:?} edge {} -> {} missing reverse",
                    which,
                    a,
                    b
                );
            }
        }
    }
}

#[test]
fn test_degree_bounds() {
    let config = recall_config(4);
    let index = random_index(config.clone(), 300, 4, 9);
    let stats = index.graph_stats();
    assert!(stats.base.max <= config.m_beta);
    assert!(stats.augmented.max <= config.m);
    assert_eq!(stats.base.histogram.iter().sum::<usize>(), 300);
}

#[test]
fn test_reset_then_rebuild() {
    let mut index = random_index(recall_config(4), 50, 2, 3);
    index.reset();
    assert!(index.is_empty());
    assert_eq!(index.entry_point(), None);
    assert_eq!(index.reconstruct(VectorId::new(0)), Err(AcornError::EmptyIndex));

    index.add(&[0.5, 0.5, 0.5, 0.5], &[1]).unwrap();
    assert_eq!(index.len(), 1);
    assert_eq!(index.entry_point(), Some(VectorId::new(0)));
    assert!(index.check_invariants().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn graph_invariants_and_filter_semantics(
        seed in any::<u64>(),
        n in 1usize..80,
        m in 2usize..8,
        selectivity in 0.05f64..1.0,
        k in 1usize..8,
    ) {
        let config = AcornConfig::new(3, m, (m / 2).max(1), 2, MetricKind::L2).unwrap();
        let index = random_index(config, n, 4, seed);
        prop_assert!(index.check_invariants().is_empty());

        let mut rng = seeded_rng(seed ^ 0x5eed);
        let mask = random_mask(&mut rng, n, selectivity);
        let query = random_vectors(&mut rng, 1, 3);
        let hits = index
            .search_one(&query, k, Some(&mask), &graph_only(&index))
            .unwrap();

        prop_assert!(hits.len() <= k);
        for pair in hits.windows(2) {
            prop_assert!(pair[0].distance <= pair[1].distance);
            prop_assert_ne!(pair[0].id, pair[1].id);
        }
        for hit in &hits {
            prop_assert!(mask.passes(hit.id));
        }
        if mask.count() <= k {
            let expected: Vec<u64> = hit_ids(&index.search_one(
                &query, k, Some(&mask), &SearchParams::from_config(index.config()),
            ).unwrap());
            let mut passing: Vec<u64> = mask.passing_ids().map(|id| id.as_u64()).collect();
            let mut got = expected.clone();
            got.sort_unstable();
            passing.sort_unstable();
            prop_assert_eq!(got, passing);
        }
    }
}
