// src/compose/rotation.rs
//! Deterministic variety: each piece index gets a different cyclic window of the
//! candidate list, and a stable hash pick for single-element choices.

use anyhow::{anyhow, Result};
use std::num::NonZeroUsize;

use crate::hashing::fnv1a64_str;

/// Number of consecutive candidates taken per piece. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationWindow(NonZeroUsize);

impl RotationWindow {
    pub const ANGLE_PAIR: RotationWindow = RotationWindow::from_const(2);
    pub const STAT_TRIPLE: RotationWindow = RotationWindow::from_const(3);

    const fn from_const(k: usize) -> Self {
        match NonZeroUsize::new(k) {
            Some(n) => RotationWindow(n),
            None => panic!("rotation window must be non-zero"),
        }
    }

    pub fn new(k: usize) -> Result<Self> {
        NonZeroUsize::new(k)
            .map(RotationWindow)
            .ok_or_else(|| anyhow!("rotation window must be at least 1"))
    }

    pub fn get(self) -> usize {
        self.0.get()
    }
}

impl TryFrom<usize> for RotationWindow {
    type Error = anyhow::Error;

    fn try_from(k: usize) -> Result<Self> {
        Self::new(k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    /// Consecutive indices get non-overlapping windows: start = index * k.
    Disjoint,
    /// Consecutive indices shift the window by one: start = index.
    Sliding,
}

/// Indices into a list of `len` candidates for `piece_index`.
/// `len < k` yields every index in order; `len == 0` yields nothing.
pub fn rotation_indices(
    len: usize,
    piece_index: usize,
    window: RotationWindow,
    mode: RotationMode,
) -> Vec<usize> {
    let k = window.get();
    if len == 0 {
        return Vec::new();
    }
    if len < k {
        return (0..len).collect();
    }
    // reduce before multiplying so large piece indices cannot overflow
    let start = match mode {
        RotationMode::Disjoint => ((piece_index % len) * k) % len,
        RotationMode::Sliding => piece_index % len,
    };
    (0..k).map(|offset| (start + offset) % len).collect()
}

/// Clone the rotated window out of `items`.
pub fn select_rotated<T: Clone>(
    items: &[T],
    piece_index: usize,
    window: RotationWindow,
    mode: RotationMode,
) -> Vec<T> {
    rotation_indices(items.len(), piece_index, window, mode)
        .into_iter()
        .map(|i| items[i].clone())
        .collect()
}

/// Stable pick keyed by FNV-1a over the UTF-8 bytes of `key`; same key, same element.
pub fn pick_stable<'a, T>(items: &'a [T], key: &str) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let idx = (fnv1a64_str(key) % items.len() as u64) as usize;
    items.get(idx)
}
