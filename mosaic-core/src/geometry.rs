//! Per-size board geometry, computed once per size and shared process-wide.
//!
//! Everything in a [`Geometry`] is a pure function of the board size: layer
//! masks, the footprint row masks used by promotion, the shift tables for
//! the primitive symmetries and the canonical empty/filled/ground/neutral
//! boards. Each size is built on first use and never invalidated.

use std::collections::BTreeMap;

use log::debug;
use once_cell::sync::{Lazy, OnceCell};

use crate::bitvec::BitVector;
use crate::board::Board;
use crate::error::{Error, Result};

/// Largest supported board size (capacity 1496 bits).
pub const MAX_SIZE: usize = 16;

/// `(signed shift, destination mask)` pairs. Positive shifts move toward
/// higher offsets.
pub(crate) type ShiftTable = Vec<(isize, BitVector)>;

pub(crate) struct Geometry {
    pub(crate) capacity: usize,
    /// `layer_masks[k - 1]` covers layer `k`.
    pub(crate) layer_masks: Vec<BitVector>,
    /// `footprint_rows[n - 2][r]` covers the footprint origins `(r, 0..n-1)`
    /// of source layer `n`.
    pub(crate) footprint_rows: Vec<Vec<BitVector>>,
    pub(crate) mirror_horizontal: ShiftTable,
    pub(crate) flip_vertical: ShiftTable,
    pub(crate) flip_diagonal: ShiftTable,
    pub(crate) empty: Board,
    pub(crate) filled: Board,
    pub(crate) ground: Board,
    pub(crate) neutral: Board,
}

static GEOMETRIES: Lazy<Vec<OnceCell<Geometry>>> =
    Lazy::new(|| (0..MAX_SIZE).map(|_| OnceCell::new()).collect());

/// First offset of layer `k` (side `k`).
#[inline]
pub fn layer_offset(k: usize) -> usize {
    // Σ_{i<k} i²
    k.saturating_sub(1) * k * (2 * k).saturating_sub(1) / 6
}

/// Total cells of a board of the given size.
#[inline]
pub fn capacity_of(size: usize) -> usize {
    layer_offset(size + 1)
}

/// Geometry for `size`, or a range error.
pub(crate) fn lookup(size: usize) -> Result<&'static Geometry> {
    if size == 0 || size > MAX_SIZE {
        return Err(Error::SizeOutOfRange {
            size,
            max: MAX_SIZE,
        });
    }
    Ok(of(size))
}

/// Geometry for an already validated `size`.
pub(crate) fn of(size: usize) -> &'static Geometry {
    GEOMETRIES[size - 1].get_or_init(|| Geometry::build(size))
}

impl Geometry {
    fn build(size: usize) -> Geometry {
        let capacity = capacity_of(size);

        let layer_masks: Vec<BitVector> = (1..=size)
            .map(|k| {
                let base = layer_offset(k);
                BitVector::from_bits(capacity, base..base + k * k)
            })
            .collect();

        let footprint_rows = (2..=size)
            .map(|n| {
                let base = layer_offset(n);
                (0..n - 1)
                    .map(|r| {
                        let start = base + r * n;
                        BitVector::from_bits(capacity, start..start + n - 1)
                    })
                    .collect()
            })
            .collect();

        let mirror_horizontal = shift_table(size, capacity, |k, r, c| (r, k - 1 - c));
        let flip_vertical = shift_table(size, capacity, |k, r, c| (k - 1 - r, c));
        let flip_diagonal = shift_table(size, capacity, |k, r, c| (k - 1 - c, k - 1 - r));

        let filled = BitVector::filled(capacity);
        let ground = layer_masks[size - 1].clone();
        let neutral = if size % 2 == 1 {
            BitVector::from_bits(capacity, [layer_offset(size) + size * size / 2])
        } else {
            BitVector::empty(capacity)
        };

        debug!(
            "built geometry for size {}: capacity {}, shift entries {}/{}/{}",
            size,
            capacity,
            mirror_horizontal.len(),
            flip_vertical.len(),
            flip_diagonal.len()
        );

        Geometry {
            capacity,
            layer_masks,
            footprint_rows,
            mirror_horizontal,
            flip_vertical,
            flip_diagonal,
            empty: Board::from_parts(size, BitVector::empty(capacity)),
            filled: Board::from_parts(size, filled),
            ground: Board::from_parts(size, ground),
            neutral: Board::from_parts(size, neutral),
        }
    }
}

/// Group every cell move `(r, c) -> map(k, r, c)` by its offset delta.
fn shift_table(
    size: usize,
    capacity: usize,
    map: impl Fn(usize, usize, usize) -> (usize, usize),
) -> ShiftTable {
    let mut targets: BTreeMap<isize, Vec<usize>> = BTreeMap::new();

    for k in 1..=size {
        let base = layer_offset(k);
        for r in 0..k {
            for c in 0..k {
                let (tr, tc) = map(k, r, c);
                let src = base + r * k + c;
                let dst = base + tr * k + tc;
                targets
                    .entry(dst as isize - src as isize)
                    .or_default()
                    .push(dst);
            }
        }
    }

    targets
        .into_iter()
        .map(|(amount, cells)| (amount, BitVector::from_bits(capacity, cells)))
        .collect()
}
