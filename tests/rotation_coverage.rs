// tests/rotation_coverage.rs
// Property-style checks for the rotation selector over seeded random shapes.

use content_scout::compose::{rotation_indices, RotationMode, RotationWindow};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const MODES: [RotationMode; 2] = [RotationMode::Disjoint, RotationMode::Sliding];

#[test]
fn disjoint_pairs_over_five_cycle() {
    let w = RotationWindow::ANGLE_PAIR;
    let got: Vec<Vec<usize>> = (0..3)
        .map(|i| rotation_indices(5, i, w, RotationMode::Disjoint))
        .collect();
    assert_eq!(got, vec![vec![0, 1], vec![2, 3], vec![4, 0]]);
}

#[test]
fn selections_are_in_range_distinct_and_sized() {
    let mut rng = StdRng::seed_from_u64(0x5C0_u64);
    for _ in 0..500 {
        let len = rng.random_range(0..25usize);
        let k = rng.random_range(1..6usize);
        let idx = rng.random_range(0..10_000usize);
        let w = RotationWindow::new(k).unwrap();
        for mode in MODES {
            let sel = rotation_indices(len, idx, w, mode);
            assert_eq!(sel.len(), len.min(k), "len={len} k={k} idx={idx}");
            assert!(sel.iter().all(|&i| i < len));
            let uniq: HashSet<_> = sel.iter().collect();
            assert_eq!(uniq.len(), sel.len());
            // deterministic
            assert_eq!(sel, rotation_indices(len, idx, w, mode));
        }
    }
}

#[test]
fn consecutive_indices_cover_every_candidate() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let k = rng.random_range(1..5usize);
        let len = rng.random_range(k + 1..30usize);
        let w = RotationWindow::new(k).unwrap();
        for mode in MODES {
            let seen: HashSet<usize> = (0..len)
                .flat_map(|i| rotation_indices(len, i, w, mode))
                .collect();
            assert_eq!(seen.len(), len, "len={len} k={k} mode={mode:?}");
        }
    }
}

#[test]
fn neighbouring_pieces_differ_when_there_is_room() {
    let w = RotationWindow::STAT_TRIPLE;
    for len in 4..12 {
        for i in 0..len {
            let a = rotation_indices(len, i, w, RotationMode::Sliding);
            let b = rotation_indices(len, i + 1, w, RotationMode::Sliding);
            assert_ne!(a, b, "len={len} i={i}");
        }
    }
}
