//! Persistence payload round trips and rejection

use crate::common::*;

#[test]
fn test_json_round_trip_preserves_answers() {
    let index = random_index(recall_config(4), 250, 3, 91);
    let json = serde_json::to_string(&index.to_parts()).unwrap();
    let parts: IndexParts = serde_json::from_str(&json).unwrap();
    let restored = AcornIndex::from_parts(parts).unwrap();

    assert_eq!(restored.len(), 250);
    assert_eq!(restored.entry_point(), Some(VectorId::new(0)));
    assert!(restored.check_invariants().is_empty());

    let mut rng = seeded_rng(92);
    let queries = random_vectors(&mut rng, 10, 4);
    let masks: Vec<FilterMask> = (0..10).map(|_| random_mask(&mut rng, 250, 0.4)).collect();
    let params = graph_only(&index);
    assert_eq!(
        index.search_with_params(&queries, 6, Some(&masks), &params).unwrap(),
        restored.search_with_params(&queries, 6, Some(&masks), &params).unwrap()
    );
}

#[test]
fn test_restored_index_accepts_more_vectors() {
    let index = random_index(recall_config(4), 60, 3, 93);
    let mut restored = AcornIndex::from_parts(index.to_parts()).unwrap();
    let id = restored.add_one(&[0.1, 0.2, 0.3, 0.4], 2).unwrap();
    assert_eq!(id, VectorId::new(60));
    assert!(restored.check_invariants().is_empty());
}

#[test]
fn test_empty_parts() {
    let index = AcornIndex::new(small_config()).unwrap();
    let parts = index.to_parts();
    assert!(parts.is_empty());
    let restored = AcornIndex::from_parts(parts).unwrap();
    assert!(restored.is_empty());
    assert_eq!(restored.entry_point(), None);
}

#[test]
fn test_rejects_inconsistent_payloads() {
    let good = four_point_index().to_parts();

    let mut degree = good.clone();
    degree.base[0] = vec![VectorId::new(1), VectorId::new(2), VectorId::new(3)];
    assert!(matches!(AcornIndex::from_parts(degree), Err(AcornError::InvalidParts(_))));

    let mut dangling = good.clone();
    dangling.augmented[0].push(VectorId::new(42));
    assert!(matches!(AcornIndex::from_parts(dangling), Err(AcornError::InvalidParts(_))));

    let mut attributes = good.clone();
    attributes.attributes.pop();
    assert!(matches!(AcornIndex::from_parts(attributes), Err(AcornError::InvalidParts(_))));

    let mut entry = good.clone();
    entry.entry_point = None;
    assert!(matches!(AcornIndex::from_parts(entry), Err(AcornError::InvalidParts(_))));

    let mut config = good;
    config.config.m_beta = config.config.m + 1;
    assert!(matches!(AcornIndex::from_parts(config), Err(AcornError::InvalidParts(_))));
}
