//! Same inputs, same graph, same answers

use crate::common::*;

#[test]
fn test_identical_add_sequences_build_identical_graphs() {
    let a = random_index(recall_config(6), 400, 5, 71);
    let b = random_index(recall_config(6), 400, 5, 71);
    assert_eq!(a.to_parts(), b.to_parts());
}

#[test]
fn test_repeated_searches_are_identical() {
    let index = random_index(recall_config(6), 400, 5, 72);
    let mut rng = seeded_rng(73);
    let queries = random_vectors(&mut rng, 16, 6);
    let masks: Vec<FilterMask> = (0..16).map(|_| random_mask(&mut rng, 400, 0.3)).collect();
    let params = graph_only(&index);

    let first = index.search_with_params(&queries, 7, Some(&masks), &params).unwrap();
    let second = index.search_with_params(&queries, 7, Some(&masks), &params).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parallel_batch_matches_sequential_queries() {
    let index = random_index(recall_config(6), 400, 5, 74);
    let mut rng = seeded_rng(75);
    let queries = random_vectors(&mut rng, 32, 6);
    let params = graph_only(&index);

    let batch = index.search_with_params(&queries, 5, None, &params).unwrap();
    for (q, query) in queries.chunks(6).enumerate() {
        let hits = index.search_one(query, 5, None, &params).unwrap();
        assert_eq!(hits, batch.hits(q), "query {}", q);
    }
}

#[test]
fn test_insertion_order_changes_topology_not_contents() {
    let mut rng = seeded_rng(76);
    let vectors = random_vectors(&mut rng, 200, 4);
    let attributes = random_attributes(&mut rng, 200, 3);

    let mut forward = AcornIndex::new(recall_config(4)).unwrap();
    forward.add(&vectors, &attributes).unwrap();

    let reversed_vectors: Vec<f32> = vectors.chunks(4).rev().flatten().copied().collect();
    let reversed_attributes: Vec<i32> = attributes.iter().rev().copied().collect();
    let mut backward = AcornIndex::new(recall_config(4)).unwrap();
    backward.add(&reversed_vectors, &reversed_attributes).unwrap();

    assert_eq!(forward.len(), backward.len());
    assert_eq!(forward.reconstruct(VectorId::new(0)).unwrap(), backward.reconstruct(VectorId::new(199)).unwrap());
    assert!(forward.check_invariants().is_empty());
    assert!(backward.check_invariants().is_empty());
}
