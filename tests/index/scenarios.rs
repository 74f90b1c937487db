//! Hand-checked scenarios on the four-point fixture

use crate::common::*;

#[test]
fn test_unfiltered_nearest_two() {
    init_tracing();
    let index = four_point_index();
    let results = index.search(&[0.1, 0.1], 2, None).unwrap();
    // (1,0) and (0,1) tie at 0.82; the lower id wins
    assert_eq!(row_ids(&results, 0), vec![0, 1]);
    let (distances, _) = results.row(0);
    assert!((distances[0] - 0.02).abs() < 1e-6);
    assert!((distances[1] - 0.82).abs() < 1e-6);
}

#[test]
fn test_unfiltered_nearest_two_by_traversal() {
    let index = four_point_index();
    let hits = index
        .search_one(&[0.1, 0.1], 2, None, &graph_only(&index))
        .unwrap();
    assert_eq!(hit_ids(&hits), vec![0, 1]);
}

#[test]
fn test_filter_excluding_nearest_returns_far_vector() {
    let index = four_point_index();
    let mask = FilterMask::from_ids(4, [VectorId::new(2), VectorId::new(3)]);
    let results = index.search(&[0.1, 0.1], 2, Some(&[mask.clone()])).unwrap();
    assert_eq!(row_ids(&results, 0), vec![2, 3]);

    let hits = index
        .search_one(&[0.1, 0.1], 2, Some(&mask), &graph_only(&index))
        .unwrap();
    assert_eq!(hit_ids(&hits), vec![2, 3]);
}

#[test]
fn test_filter_with_fewer_than_k_passing_pads() {
    let index = four_point_index();
    let mask = FilterMask::from_ids(4, [VectorId::new(3)]);
    let results = index.search(&[0.1, 0.1], 3, Some(&[mask])).unwrap();
    let (distances, labels) = results.row(0);
    assert_eq!(labels, &[3, NO_RESULT_LABEL, NO_RESULT_LABEL]);
    assert_eq!(distances[1], f32::INFINITY);
    assert_eq!(distances[2], f32::INFINITY);
}

#[test]
fn test_filter_rejecting_everything() {
    let index = four_point_index();
    let mask = FilterMask::from_bools(vec![false; 4]);
    let results = index.search(&[0.1, 0.1], 2, Some(&[mask])).unwrap();
    assert_eq!(results.labels, vec![NO_RESULT_LABEL, NO_RESULT_LABEL]);
}

#[test]
fn test_batch_rows_follow_query_order() {
    let index = four_point_index();
    let masks = vec![
        FilterMask::all_pass(4),
        FilterMask::from_ids(4, [VectorId::new(1)]),
    ];
    let results = index
        .search(&[5.0, 5.0, 0.0, 0.0], 1, Some(&masks))
        .unwrap();
    assert_eq!(results.num_queries(), 2);
    assert_eq!(results.labels, vec![3, 1]);
}

#[test]
fn test_entry_point_is_first_vector() {
    let index = four_point_index();
    assert_eq!(index.entry_point(), Some(VectorId::new(0)));
    let stats = index.graph_stats();
    assert_eq!(stats.nodes, 4);
    assert_eq!(stats.isolated, 0);
    assert!(stats.base.max <= 2);
    assert!(stats.augmented.max <= 4);
}

#[test]
fn test_inner_product_reports_raw_scores() {
    let config = AcornConfig::new(2, 4, 2, 2, MetricKind::InnerProduct).unwrap();
    let mut index = AcornIndex::new(config).unwrap();
    index
        .add(&[1.0, 0.0, 3.0, 0.0, 0.0, 2.0], &[0, 0, 0])
        .unwrap();
    let results = index.search(&[1.0, 0.0], 4, None).unwrap();
    let (distances, labels) = results.row(0);
    assert_eq!(&labels[..2], &[1, 0]);
    assert_eq!(distances[0], 3.0);
    assert_eq!(distances[1], 1.0);
    // (0,2) scores 0.0 against the query
    assert_eq!(labels[2], 2);
    assert_eq!(labels[3], NO_RESULT_LABEL);
    assert_eq!(distances[3], f32::NEG_INFINITY);
}

#[test]
fn test_empty_index_search_returns_sentinels() {
    let index = AcornIndex::new(small_config()).unwrap();
    let mask = FilterMask::all_pass(0);
    let results = index.search(&[0.0, 0.0], 2, Some(&[mask])).unwrap();
    assert_eq!(results.labels, vec![NO_RESULT_LABEL; 2]);
    assert_eq!(index.entry_point(), None);
}

#[test]
fn test_zero_k_returns_empty_batch() {
    let index = four_point_index();
    let results = index.search(&[0.0, 0.0], 0, None).unwrap();
    assert!(results.labels.is_empty());
    assert!(results.distances.is_empty());
}
