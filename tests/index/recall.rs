//! Agreement with exhaustive search

use crate::common::*;

#[test]
fn test_small_index_matches_exhaustive() {
    init_tracing();
    // N=50, d=8, k=5: the beam covers the whole graph
    let index = random_index(AcornConfig::new(8, 16, 8, 4, MetricKind::L2).unwrap(), 50, 1, 21);
    let mut rng = seeded_rng(22);
    let queries = random_vectors(&mut rng, 20, 8);

    let params = graph_only(&index);
    let results = index.search_with_params(&queries, 5, None, &params).unwrap();
    let truth = exact(&index, &queries, 5, None);

    for q in 0..20 {
        let mut got = row_ids(&results, q);
        let mut expected = row_ids(&truth, q);
        got.sort_unstable();
        expected.sort_unstable();
        assert_eq!(got, expected, "query {}", q);
    }
}

#[test]
fn test_unfiltered_recall_at_10() {
    let index = random_index(recall_config(8), 1000, 4, 31);
    let mut rng = seeded_rng(32);
    let queries = random_vectors(&mut rng, 50, 8);

    let results = index
        .search_with_params(&queries, 10, None, &graph_only(&index))
        .unwrap();
    let truth = exact(&index, &queries, 10, None);

    let recall = eval::recall_at_k(&truth, &results, 10);
    assert!(recall >= 0.9, "recall@10 = {:.3}", recall);
    assert!(eval::recall_at(&truth, &results, 10) >= 0.9);
}

#[test]
fn test_filtered_recall_per_attribute() {
    let index = random_index(recall_config(8), 1000, 4, 41);
    let mut rng = seeded_rng(42);
    let queries = random_vectors(&mut rng, 40, 8);
    let masks: Vec<FilterMask> = (0..40)
        .map(|i| index.mask_for(&Predicate::Equals(i % 4)))
        .collect();

    let results = index
        .search_with_params(&queries, 10, Some(&masks), &graph_only(&index))
        .unwrap();
    let truth = exact(&index, &queries, 10, Some(&masks));

    let recall = eval::recall_at_k(&truth, &results, 10);
    assert!(recall >= 0.9, "filtered recall@10 = {:.3}", recall);
    for q in 0..40 {
        for hit in results.hits(q) {
            assert!(masks[q].passes(hit.id));
        }
    }
}

#[test]
fn test_selective_filter_recall() {
    let index = random_index(recall_config(8), 1000, 4, 51);
    let mut rng = seeded_rng(52);
    let queries = random_vectors(&mut rng, 30, 8);
    // About 5% of vectors pass, unrelated to attributes
    let masks: Vec<FilterMask> = (0..30).map(|_| random_mask(&mut rng, 1000, 0.05)).collect();

    let results = index
        .search_with_params(&queries, 5, Some(&masks), &graph_only(&index))
        .unwrap();
    let truth = exact(&index, &queries, 5, Some(&masks));
    let recall = eval::recall_at_k(&truth, &results, 5);
    assert!(recall >= 0.9, "selective recall@5 = {:.3}", recall);
}

// The scenario parameters (d=2, M=4, M_beta=2, gamma=2) leave every list
// nearly full, so back-edge shrinking runs on almost every insert.

#[test]
fn test_small_degree_graph_stays_reachable() {
    init_tracing();
    let index = random_index(small_config(), 2000, 4, 33);
    let stats = index.graph_stats();
    assert!(stats.reachable * 100 >= stats.nodes * 99, "{}", stats);
    assert_eq!(stats.isolated, 0, "{}", stats);
    assert!(index.check_invariants().is_empty());
}

#[test]
fn test_small_degree_recall_at_10() {
    let index = random_index(small_config(), 2000, 4, 34);
    let mut rng = seeded_rng(35);
    let queries = random_vectors(&mut rng, 50, 2);
    let params = graph_only(&index);

    let results = index.search_with_params(&queries, 10, None, &params).unwrap();
    let truth = exact(&index, &queries, 10, None);
    let recall = eval::recall_at_k(&truth, &results, 10);
    assert!(recall >= 0.9, "recall@10 = {:.3}", recall);

    let masks: Vec<FilterMask> = (0..50)
        .map(|i| index.mask_for(&Predicate::Equals(i % 4)))
        .collect();
    let results = index.search_with_params(&queries, 10, Some(&masks), &params).unwrap();
    let truth = exact(&index, &queries, 10, Some(&masks));
    let recall = eval::recall_at_k(&truth, &results, 10);
    assert!(recall >= 0.9, "filtered recall@10 = {:.3}", recall);
}
