//! Layered pyramid board on top of [`BitVector`].
//!
//! # Layout
//!
//! ```text
//! Layer k is a k×k grid; layer 1 is the apex, layer `size` the ground.
//! Cell (r, c) of layer k is offset Σ_{i<k} i² + r·k + c.
//!
//! Size 3 (capacity 14):
//!   layer 1:  0
//!   layer 2:  1  2        layer 3:  5  6  7
//!             3  4                  8  9 10
//!                                  11 12 13
//! ```
//!
//! A cell of layer `n - 1` at `(r, c)` rests on the footprint
//! `(r, c) (r, c+1) (r+1, c) (r+1, c+1)` of layer `n`.

use std::fmt;

use crate::bitvec::{BitVector, Iter, Ones};
use crate::error::{Error, Result};
use crate::geometry::{self, layer_offset, Geometry, ShiftTable};

pub use crate::geometry::MAX_SIZE;

/// Footprint predicate used by [`Board::promote`].
///
/// `k` is the number of occupied cells in a 2×2 footprint.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Promotion {
    /// `k == 0`
    Zero,
    /// `k == 1`
    One,
    /// `k == 2`
    Two,
    /// `k == 3`
    Three,
    /// `k == 4`
    Four,
    /// `k >= 3`
    Majority,
    /// `k >= 2`
    HalfOrMore,
}

impl Promotion {
    pub const ALL: [Promotion; 7] = [
        Promotion::Zero,
        Promotion::One,
        Promotion::Two,
        Promotion::Three,
        Promotion::Four,
        Promotion::Majority,
        Promotion::HalfOrMore,
    ];

    /// Reference predicate on an occupied-cell count.
    pub fn accepts(self, occupied: u32) -> bool {
        match self {
            Promotion::Zero => occupied == 0,
            Promotion::One => occupied == 1,
            Promotion::Two => occupied == 2,
            Promotion::Three => occupied == 3,
            Promotion::Four => occupied == 4,
            Promotion::Majority => occupied >= 3,
            Promotion::HalfOrMore => occupied >= 2,
        }
    }

    /// Zero and One are evaluated as Four and Three on the vacant cells.
    #[inline]
    fn reads_vacancies(self) -> bool {
        matches!(self, Promotion::Zero | Promotion::One)
    }

    /// Bit-parallel footprint test. `a b / c d` are the layer shifted so that
    /// each footprint corner lands on the footprint origin.
    fn footprint(self, a: &BitVector, b: &BitVector, c: &BitVector, d: &BitVector) -> BitVector {
        match self {
            Promotion::Zero | Promotion::Four => a.and(b).and(c).and(d),
            Promotion::One | Promotion::Three => {
                // Exactly one full row pair, with odd parity.
                let pairs = a.and(b).xor(&c.and(d));
                let parity = a.xor(b).xor(c).xor(d);
                pairs.and(&parity)
            }
            Promotion::Two => {
                let rows = a.xor(b).and(&c.xor(d));
                let cols = a.xor(c).and(&b.xor(d));
                rows.or(&cols)
            }
            Promotion::Majority => {
                let rows = a.and(b).or(&c.and(d));
                let cols = a.and(c).or(&b.and(d));
                rows.and(&cols)
            }
            Promotion::HalfOrMore => {
                let rows = a.or(b).and(&c.or(d));
                let cols = a.or(c).and(&b.or(d));
                rows.or(&cols)
            }
        }
    }
}

/// The eight symmetries of a square layer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum Symmetry {
    Identity,
    /// Clockwise.
    Rotate90,
    Rotate180,
    Rotate270,
    /// Reverse columns.
    MirrorHorizontal,
    /// Reverse rows.
    FlipVertical,
    /// Reflect across the anti-diagonal.
    FlipDiagonal,
    /// Reflect across the main diagonal.
    Transpose,
}

impl Symmetry {
    pub const ALL: [Symmetry; 8] = [
        Symmetry::Identity,
        Symmetry::Rotate90,
        Symmetry::Rotate180,
        Symmetry::Rotate270,
        Symmetry::MirrorHorizontal,
        Symmetry::FlipVertical,
        Symmetry::FlipDiagonal,
        Symmetry::Transpose,
    ];
}

/// Occupancy of a pyramid board of a given size.
///
/// Immutable; every operation returns a new board of the same size.
#[derive(Clone, Debug)]
pub struct Board {
    size: usize,
    bits: BitVector,
}

impl Board {
    /// Caller guarantees `bits.capacity() == capacity_of(size)`.
    pub(crate) fn from_parts(size: usize, bits: BitVector) -> Board {
        Board { size, bits }
    }

    #[inline]
    fn geometry(&self) -> &'static Geometry {
        geometry::of(self.size)
    }

    #[inline]
    fn with_bits(&self, bits: BitVector) -> Board {
        Board {
            size: self.size,
            bits,
        }
    }

    // ========== Canonical boards ==========

    /// No cell occupied.
    pub fn empty(size: usize) -> Result<Board> {
        Ok(geometry::lookup(size)?.empty.clone())
    }

    /// Every cell occupied.
    pub fn filled(size: usize) -> Result<Board> {
        Ok(geometry::lookup(size)?.filled.clone())
    }

    /// Ground layer (layer `size`) occupied.
    pub fn ground(size: usize) -> Result<Board> {
        Ok(geometry::lookup(size)?.ground.clone())
    }

    /// Obstacle at the centre of the ground layer for odd sizes, empty
    /// otherwise.
    pub fn neutral(size: usize) -> Result<Board> {
        Ok(geometry::lookup(size)?.neutral.clone())
    }

    // ========== Construction ==========

    /// Parse the MSB-first text form at this size's capacity.
    pub fn from_text(size: usize, text: &str) -> Result<Board> {
        let g = geometry::lookup(size)?;
        Ok(Board {
            size,
            bits: BitVector::from_text(g.capacity, text)?,
        })
    }

    /// Adopt a bit vector, dropping anything beyond this size's capacity.
    pub fn from_bit_vector(size: usize, vector: &BitVector) -> Result<Board> {
        let g = geometry::lookup(size)?;
        Ok(Board {
            size,
            bits: BitVector::empty(g.capacity).or(vector),
        })
    }

    /// Board with exactly one occupied cell.
    pub fn single(size: usize, offset: usize) -> Result<Board> {
        let g = geometry::lookup(size)?;
        if offset >= g.capacity {
            return Err(Error::IndexOutOfRange {
                index: offset,
                capacity: g.capacity,
            });
        }
        Ok(Board {
            size,
            bits: BitVector::from_bits(g.capacity, [offset]),
        })
    }

    // ========== Inspection ==========

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.bits.capacity()
    }

    /// Number of occupied cells.
    #[inline]
    pub fn count(&self) -> usize {
        self.bits.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, offset: usize) -> Result<bool> {
        self.bits.get(offset)
    }

    pub fn to_text(&self) -> String {
        self.bits.to_text()
    }

    /// Occupancy of every offset, offset 0 first.
    pub fn iter(&self) -> Iter<'_> {
        self.bits.iter()
    }

    /// Occupied offsets, ascending.
    pub fn offsets(&self) -> Ones<'_> {
        self.bits.ones()
    }

    pub fn bit_vector(&self) -> &BitVector {
        &self.bits
    }

    /// Layer containing `offset`, if it is on the board.
    pub fn layer_of(&self, offset: usize) -> Option<usize> {
        (1..=self.size).find(|&k| offset < layer_offset(k + 1))
    }

    /// Equal occupied offsets, regardless of size.
    pub fn equals_to(&self, other: &Board) -> bool {
        self.bits.equals(&other.bits)
    }

    // ========== Boolean algebra ==========

    pub fn and(&self, other: &Board) -> Board {
        self.with_bits(self.bits.and(&other.bits))
    }

    pub fn or(&self, other: &Board) -> Board {
        self.with_bits(self.bits.or(&other.bits))
    }

    pub fn xor(&self, other: &Board) -> Board {
        self.with_bits(self.bits.xor(&other.bits))
    }

    /// Swap occupied and vacant cells.
    pub fn flip(&self) -> Board {
        self.with_bits(self.bits.flip())
    }

    /// Keep only the `n` lowest occupied offsets.
    pub fn lowest(&self, n: usize) -> Board {
        self.with_bits(self.bits.lowest(n))
    }

    // ========== Symmetry & Canonicalization ==========

    fn apply_table(&self, table: &ShiftTable) -> Board {
        let bits = table
            .iter()
            .fold(BitVector::empty(self.capacity()), |acc, (amount, mask)| {
                acc.or(&mask.and(&self.bits.shifted(*amount)))
            });
        self.with_bits(bits)
    }

    pub fn mirror_horizontal(&self) -> Board {
        self.apply_table(&self.geometry().mirror_horizontal)
    }

    pub fn flip_vertical(&self) -> Board {
        self.apply_table(&self.geometry().flip_vertical)
    }

    pub fn flip_diagonal(&self) -> Board {
        self.apply_table(&self.geometry().flip_diagonal)
    }

    pub fn rotate90(&self) -> Board {
        self.flip_diagonal().flip_vertical()
    }

    pub fn rotate180(&self) -> Board {
        self.mirror_horizontal().flip_vertical()
    }

    pub fn rotate270(&self) -> Board {
        self.flip_vertical().flip_diagonal()
    }

    /// Apply one of the eight layer symmetries.
    pub fn transform(&self, symmetry: Symmetry) -> Board {
        match symmetry {
            Symmetry::Identity => self.clone(),
            Symmetry::Rotate90 => self.rotate90(),
            Symmetry::Rotate180 => self.rotate180(),
            Symmetry::Rotate270 => self.rotate270(),
            Symmetry::MirrorHorizontal => self.mirror_horizontal(),
            Symmetry::FlipVertical => self.flip_vertical(),
            Symmetry::FlipDiagonal => self.flip_diagonal(),
            Symmetry::Transpose => self.flip_diagonal().rotate180(),
        }
    }

    /// All eight images, in [`Symmetry::ALL`] order.
    pub fn symmetries(&self) -> [Board; 8] {
        Symmetry::ALL.map(|s| self.transform(s))
    }

    /// The image with the smallest numeric value.
    ///
    /// Symmetric positions share one canonical board.
    pub fn canonical(&self) -> Board {
        Symmetry::ALL[1..]
            .iter()
            .map(|&s| self.transform(s))
            .fold(self.clone(), |min, candidate| {
                if candidate.bits.numeric_cmp(&min.bits).is_lt() {
                    candidate
                } else {
                    min
                }
            })
    }

    // ========== Promotion ==========

    /// Mark every cell whose footprint satisfies `kind`, across all layers.
    pub fn promote(&self, kind: Promotion) -> Board {
        let g = self.geometry();
        let mut result = BitVector::empty(g.capacity);

        for n in (2..=self.size).rev() {
            let layer = &g.layer_masks[n - 1];
            let source = if kind.reads_vacancies() {
                self.bits.flip().and(layer)
            } else {
                self.bits.and(layer)
            };
            if source.is_empty() {
                continue;
            }

            let side = n as isize;
            let right = source.shifted(-1);
            let below = source.shifted(-side);
            let below_right = source.shifted(-side - 1);
            let hits = kind.footprint(&source, &right, &below, &below_right);
            if hits.is_empty() {
                continue;
            }

            // Row r of layer n drops by (n-1)² + r onto row r of layer n-1.
            let drop = (n - 1) * (n - 1);
            for (row, mask) in g.footprint_rows[n - 2].iter().enumerate() {
                let row_hits = hits.and(mask);
                if !row_hits.is_empty() {
                    result = result.or(&row_hits.shifted(-((drop + row) as isize)));
                }
            }
        }

        self.with_bits(result)
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Board) -> bool {
        self.equals_to(other)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn board(size: usize, text: &str) -> Board {
        Board::from_text(size, text).unwrap()
    }

    fn text(b: Board) -> String {
        b.to_text()
    }

    #[test]
    fn test_count() {
        assert_eq!(board(3, "11110010010011").count(), 8);
    }

    #[test]
    fn test_empty_board() {
        assert_eq!(text(Board::empty(1).unwrap()), "0");
        assert_eq!(text(Board::empty(2).unwrap()), "00000");
        assert_eq!(text(Board::empty(3).unwrap()), "00000000000000");
    }

    #[test]
    fn test_size_out_of_range() {
        assert!(Board::empty(MAX_SIZE).is_ok());
        assert_eq!(Board::empty(MAX_SIZE + 1).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Board::empty(0).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(Board::from_text(0, "0").unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_ground_board() {
        assert_eq!(text(Board::ground(1).unwrap()), "1");
        assert_eq!(text(Board::ground(2).unwrap()), "11110");
        assert_eq!(text(Board::ground(3).unwrap()), "11111111100000");
    }

    #[test]
    fn test_neutral_board() {
        assert_eq!(text(Board::neutral(1).unwrap()), "1");
        assert_eq!(text(Board::neutral(2).unwrap()), "00000");
        assert_eq!(text(Board::neutral(3).unwrap()), "00001000000000");
        assert_eq!(Board::neutral(4).unwrap(), Board::empty(4).unwrap());
        assert_eq!(Board::neutral(5).unwrap().offsets().collect::<Vec<_>>(), vec![42]);
    }

    #[test]
    fn test_filled_board() {
        assert_eq!(text(Board::filled(1).unwrap()), "1");
        assert_eq!(text(Board::filled(2).unwrap()), "11111");
        assert_eq!(text(Board::filled(3).unwrap()), "11111111111111");
    }

    #[test]
    fn test_single() {
        assert_eq!(text(Board::single(3, 13).unwrap()), "10000000000000");
        assert_eq!(Board::single(3, 14).unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_from_text_masks_capacity() {
        assert_eq!(text(board(2, "1111111")), "11111");
        assert_eq!(board(2, "1").count(), 1);
    }

    #[test]
    fn test_layer_of() {
        let b = Board::empty(3).unwrap();
        assert_eq!(b.layer_of(0), Some(1));
        assert_eq!(b.layer_of(4), Some(2));
        assert_eq!(b.layer_of(5), Some(3));
        assert_eq!(b.layer_of(13), Some(3));
        assert_eq!(b.layer_of(14), None);
    }

    // ========== Symmetry ==========

    #[test]
    fn test_mirror_horizontal() {
        assert_eq!(text(board(3, "11000100010010").mirror_horizontal()), "01110000001100");
        assert_eq!(text(board(3, "11110101001011").mirror_horizontal()), "11110101010101");
    }

    #[test]
    fn test_flip_vertical() {
        assert_eq!(text(board(3, "00010001110010").flip_vertical()), "01110000001100");
        assert_eq!(text(board(3, "11110101010101").flip_vertical()), "01010111110101");
    }

    #[test]
    fn test_flip_diagonal() {
        assert_eq!(text(board(3, "01110000001100").flip_diagonal()), "00100101001100");
        assert_eq!(text(board(3, "11110101010101").flip_diagonal()), "01110101100111");
    }

    #[test]
    fn test_rotate_90() {
        assert_eq!(text(board(3, "01110000001100").rotate90()), "01000100110010");
        assert_eq!(text(board(3, "11110101010101").rotate90()), "01110101111001");
    }

    #[test]
    fn test_rotate_180() {
        assert_eq!(text(board(3, "01110000001100").rotate180()), "00000111001100");
        assert_eq!(text(board(3, "11110101010101").rotate180()), "01010111101011");
    }

    #[test]
    fn test_rotate_270() {
        assert_eq!(text(board(3, "01110000001100").rotate270()), "10010001010010");
        assert_eq!(text(board(3, "11110101010101").rotate270()), "11010111000111");
    }

    #[test]
    fn test_rotate_90_is_clockwise() {
        // Top-left corner of the ground layer moves to the top-right corner.
        let rotated = Board::single(3, 5).unwrap().rotate90();
        assert_eq!(rotated.offsets().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_rotate_360_identity() {
        let b = board(5, "1011001110001011100101101110011100010110010110100111001");
        let mut current = b.clone();
        for _ in 0..4 {
            current = current.rotate90();
        }
        assert_eq!(current, b);
        assert_eq!(b.rotate90().rotate270(), b);
        assert_eq!(b.rotate180().rotate180(), b);
    }

    #[test]
    fn test_reflect_twice_identity() {
        let b = board(4, "101100111000101110010110111001");
        assert_eq!(b.mirror_horizontal().mirror_horizontal(), b);
        assert_eq!(b.flip_vertical().flip_vertical(), b);
        assert_eq!(b.flip_diagonal().flip_diagonal(), b);
        assert_eq!(b.transform(Symmetry::Transpose).transform(Symmetry::Transpose), b);
    }

    #[test]
    fn test_transpose_is_main_diagonal() {
        // (0, 1) of the ground layer goes to (1, 0).
        let b = Board::single(3, 6).unwrap().transform(Symmetry::Transpose);
        assert_eq!(b.offsets().collect::<Vec<_>>(), vec![8]);
    }

    #[test]
    fn test_transforms_preserve_count() {
        let b = board(4, "101100111000101110010110111001");
        for image in b.symmetries() {
            assert_eq!(image.count(), b.count());
            assert_eq!(image.size(), 4);
        }
    }

    #[test]
    fn test_canonical_is_symmetry_invariant() {
        let b = board(4, "000000000000010010000000100011");
        let canonical = b.canonical();
        for image in b.symmetries() {
            assert_eq!(image.canonical(), canonical);
        }
        for image in b.symmetries() {
            assert!(canonical.bit_vector().numeric_cmp(image.bit_vector()).is_le());
        }
    }

    // ========== Boolean algebra ==========

    #[test]
    fn test_flip() {
        assert_eq!(text(board(3, "01110000001100").flip()), "10001111110011");
    }

    #[test]
    fn test_and_or_xor() {
        let a = board(3, "11100010101101");
        let b = board(3, "01110100011011");
        assert_eq!(text(a.and(&b)), "01100000001001");
        assert_eq!(text(a.or(&b)), "11110110111111");
        assert_eq!(text(a.xor(&b)), "10010110110110");
    }

    #[test]
    fn test_lowest() {
        let b = board(3, "10010001010100");
        assert_eq!(text(b.lowest(2)), "00000000010100");
        assert_eq!(b.lowest(9), b);
        assert!(b.lowest(0).is_empty());
    }

    #[test]
    fn test_equals_to() {
        let a = board(3, "11100001001010");
        let b = board(3, "10100001001000").or(&board(3, "01000000000010"));
        let c = board(3, "10100001001000");
        assert!(a.equals_to(&b));
        assert!(!b.equals_to(&c));
        assert!(!a.equals_to(&c));
    }

    #[test]
    fn test_equals_across_sizes() {
        assert_eq!(Board::single(2, 3).unwrap(), Board::single(3, 3).unwrap());
        assert_ne!(Board::single(2, 3).unwrap(), Board::single(3, 4).unwrap());
    }

    // ========== Promotion ==========

    #[test]
    fn test_promotions() {
        let b = board(3, "00010011111111");
        let cases = [
            (Promotion::Zero, "00000000001000"),
            (Promotion::One, "00000000010000"),
            (Promotion::Two, "00000000000010"),
            (Promotion::Three, "00000000000100"),
            (Promotion::Four, "00000000000001"),
            (Promotion::Majority, "00000000000101"),
            (Promotion::HalfOrMore, "00000000000111"),
        ];
        for (kind, expected) in cases {
            assert_eq!(text(b.promote(kind)), expected, "{:?}", kind);
        }
    }

    #[test]
    fn test_promotion_truth_table() {
        // Size 2: the apex rests on the whole ground layer (offsets 1..=4).
        for pattern in 0u64..16 {
            let b = Board::from_bit_vector(2, &BitVector::from_words(5, &[pattern << 1])).unwrap();
            let occupied = pattern.count_ones();
            for kind in Promotion::ALL {
                let apex = b.promote(kind).get(0).unwrap();
                assert_eq!(apex, kind.accepts(occupied), "{:?} on {:04b}", kind, pattern);
            }
        }
    }

    #[test]
    fn test_promotion_ignores_apex_input() {
        // Occupancy of layer 1 never feeds a promotion.
        let b = board(2, "00001");
        assert!(b.promote(Promotion::Four).is_empty());
        assert_eq!(text(b.promote(Promotion::Zero)), "00001");
    }

    #[test]
    fn test_promotion_matches_brute_force() {
        let b = board(5, "1011001110001011100101101110011100010110010110100111001");
        for kind in Promotion::ALL {
            let promoted = b.promote(kind);
            for n in 2..=5 {
                let src = layer_offset(n);
                let dst = layer_offset(n - 1);
                for r in 0..n - 1 {
                    for c in 0..n - 1 {
                        let occupied = [(r, c), (r, c + 1), (r + 1, c), (r + 1, c + 1)]
                            .iter()
                            .filter(|&&(rr, cc)| b.get(src + rr * n + cc).unwrap())
                            .count() as u32;
                        let cell = dst + r * (n - 1) + c;
                        assert_eq!(promoted.get(cell).unwrap(), kind.accepts(occupied), "{:?} at {}", kind, cell);
                    }
                }
            }
            // The ground layer is never a promotion target.
            assert!(promoted.and(&Board::ground(5).unwrap()).is_empty());
        }
    }

    #[test]
    fn test_promotion_commutes_with_symmetry() {
        let b = board(4, "101100111000101110010110111001");
        for kind in Promotion::ALL {
            let promoted = b.promote(kind);
            for symmetry in Symmetry::ALL {
                assert_eq!(
                    b.transform(symmetry).promote(kind),
                    promoted.transform(symmetry),
                    "{:?} / {:?}",
                    kind,
                    symmetry
                );
            }
        }
    }

    #[test]
    fn test_iterator_and_offsets() {
        let b = board(2, "10010");
        assert_eq!(b.iter().collect::<Vec<_>>(), vec![false, true, false, false, true]);
        assert_eq!(b.offsets().collect::<Vec<_>>(), vec![1, 4]);
        assert_eq!(b.to_string(), "10010");
    }
}
