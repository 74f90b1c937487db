//! Readers-writer discipline through SharedIndex

use std::sync::{Arc, Barrier};
use std::thread;

use crate::common::*;

#[test]
fn test_many_concurrent_searches() {
    let index = random_index(recall_config(4), 500, 4, 81);
    let expected = {
        let params = graph_only(&index);
        index.search_one(&[0.5; 4], 5, None, &params).unwrap()
    };
    let shared = SharedIndex::new(index);
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let shared = shared.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let guard = shared.read();
                let params = graph_only(&guard);
                (0..20)
                    .map(|_| guard.search_one(&[0.5; 4], 5, None, &params).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for hits in handle.join().unwrap() {
            assert_eq!(hits, expected);
        }
    }
}

#[test]
fn test_writer_interleaved_with_readers() {
    let shared = SharedIndex::with_config(recall_config(3)).unwrap();
    shared.add(&[0.0, 0.0, 0.0], &[0]).unwrap();

    let writer = {
        let shared = shared.clone();
        thread::spawn(move || {
            let mut rng = seeded_rng(82);
            for _ in 0..200 {
                let v = random_vectors(&mut rng, 1, 3);
                shared.add_one(&v, 1).unwrap();
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let shared = shared.clone();
            thread::spawn(move || {
                for _ in 0..50 {
                    let guard = shared.read();
                    // Every snapshot a reader sees is a complete index
                    assert!(guard.check_invariants().is_empty());
                    let mask = guard.mask_for(&Predicate::Equals(0));
                    let hits = guard
                        .search_one(&[0.0, 0.0, 0.0], 3, Some(&mask), &SearchParams::default())
                        .unwrap();
                    assert_eq!(hit_ids(&hits), vec![0]);
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for reader in readers {
        reader.join().unwrap();
    }
    assert_eq!(shared.len(), 201);
    assert!(shared.read().check_invariants().is_empty());
}

#[test]
fn test_shared_search_batch() {
    let shared = SharedIndex::new(four_point_index());
    let results = shared.search(&[0.1, 0.1], 2, None).unwrap();
    assert_eq!(row_ids(&results, 0), vec![0, 1]);

    let hits = shared
        .search_with_predicate(&[0.1, 0.1], 2, &Predicate::Equals(2))
        .unwrap();
    assert_eq!(hit_ids(&hits), vec![1, 3]);
}
