//! Immutable fixed-capacity bit vector.
//!
//! # Encoding
//!
//! ```text
//! Bit i lives in word i / 64 at bit position i % 64.
//! Bits at or above `capacity` are always zero.
//!
//! Text form is MSB first: for capacity 8, "10100110" has bits 1, 2, 5, 7 set.
//! ```

use std::cmp::Ordering;
use std::fmt;

use crate::error::{Error, Result};

const WORD_BITS: usize = 64;

#[inline]
fn words_for(capacity: usize) -> usize {
    capacity.div_ceil(WORD_BITS)
}

/// Mask for the valid bits of the last word.
#[inline]
fn tail_mask(capacity: usize) -> u64 {
    match capacity % WORD_BITS {
        0 => !0,
        rem => (1u64 << rem) - 1,
    }
}

/// A fixed-capacity sequence of bits.
///
/// Every operation returns a new vector. Equality compares only the indices
/// valid for both operands, so vectors of different capacity can be equal.
#[derive(Clone, Debug)]
pub struct BitVector {
    capacity: usize,
    words: Vec<u64>,
}

impl BitVector {
    // ========== Construction ==========

    /// All-zero vector.
    pub fn empty(capacity: usize) -> BitVector {
        BitVector {
            capacity,
            words: vec![0; words_for(capacity)],
        }
    }

    /// All-one vector.
    pub fn filled(capacity: usize) -> BitVector {
        BitVector {
            capacity,
            words: vec![!0; words_for(capacity)],
        }
        .masked()
    }

    /// Vector with exactly the given indices set.
    ///
    /// Indices at or beyond `capacity` are dropped without error.
    pub fn from_bits<I>(capacity: usize, indices: I) -> BitVector
    where
        I: IntoIterator<Item = usize>,
    {
        let mut vector = BitVector::empty(capacity);
        for index in indices {
            if index < capacity {
                vector.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
            }
        }
        vector
    }

    /// Vector built from little-endian 64-bit words.
    ///
    /// Surplus words and bits beyond `capacity` are discarded.
    pub fn from_words(capacity: usize, words: &[u64]) -> BitVector {
        let mut vector = BitVector::empty(capacity);
        for (dst, src) in vector.words.iter_mut().zip(words) {
            *dst = *src;
        }
        vector.masked()
    }

    /// Parse the MSB-first text form.
    ///
    /// Short text is zero-padded on the left. Digits that would land at or
    /// beyond `capacity` are dropped.
    pub fn from_text(capacity: usize, text: &str) -> Result<BitVector> {
        let digits: Vec<char> = text.chars().collect();
        let mut vector = BitVector::empty(capacity);

        for (position, &found) in digits.iter().enumerate() {
            let bit = match found {
                '0' => false,
                '1' => true,
                _ => return Err(Error::InvalidDigit { found, position }),
            };
            let index = digits.len() - 1 - position;
            if bit && index < capacity {
                vector.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
            }
        }

        Ok(vector)
    }

    /// Clear everything at or above `capacity`.
    fn masked(mut self) -> BitVector {
        let mask = tail_mask(self.capacity);
        if let Some(last) = self.words.last_mut() {
            *last &= mask;
        }
        self
    }

    // ========== Inspection ==========

    /// Fixed-width MSB-first text form.
    pub fn to_text(&self) -> String {
        (0..self.capacity)
            .rev()
            .map(|index| if self.bit(index) { '1' } else { '0' })
            .collect()
    }

    /// Declared capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// True when no bit is set.
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    fn bit(&self, index: usize) -> bool {
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    #[inline]
    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.capacity {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                capacity: self.capacity,
            })
        }
    }

    /// Read one bit.
    pub fn get(&self, index: usize) -> Result<bool> {
        self.check_index(index)?;
        Ok(self.bit(index))
    }

    /// Set indices in ascending order.
    pub fn ones(&self) -> Ones<'_> {
        Ones {
            words: &self.words,
            word: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }

    /// Booleans for every index, index 0 first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            vector: self,
            index: 0,
        }
    }

    /// Compare as unsigned integers (bit `capacity - 1` most significant).
    pub fn numeric_cmp(&self, other: &BitVector) -> Ordering {
        let len = self.words.len().max(other.words.len());
        for i in (0..len).rev() {
            let a = self.words.get(i).copied().unwrap_or(0);
            let b = other.words.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// True iff both vectors agree on every index valid for both.
    pub fn equals(&self, other: &BitVector) -> bool {
        let common = self.capacity.min(other.capacity);
        let full = common / WORD_BITS;
        if self.words[..full] != other.words[..full] {
            return false;
        }
        match common % WORD_BITS {
            0 => true,
            rem => {
                let mask = (1u64 << rem) - 1;
                (self.words[full] & mask) == (other.words[full] & mask)
            }
        }
    }

    // ========== Single-bit updates ==========

    /// Copy with the given indices set.
    pub fn set(&self, indices: &[usize]) -> Result<BitVector> {
        let mut vector = self.clone();
        for &index in indices {
            self.check_index(index)?;
            vector.words[index / WORD_BITS] |= 1 << (index % WORD_BITS);
        }
        Ok(vector)
    }

    /// Copy with the given indices cleared.
    pub fn clear(&self, indices: &[usize]) -> Result<BitVector> {
        let mut vector = self.clone();
        for &index in indices {
            self.check_index(index)?;
            vector.words[index / WORD_BITS] &= !(1 << (index % WORD_BITS));
        }
        Ok(vector)
    }

    pub fn set_all(&self) -> BitVector {
        BitVector::filled(self.capacity)
    }

    pub fn clear_all(&self) -> BitVector {
        BitVector::empty(self.capacity)
    }

    /// Keep only the `n` lowest set bits.
    pub fn lowest(&self, n: usize) -> BitVector {
        BitVector::from_bits(self.capacity, self.ones().take(n))
    }

    // ========== Boolean algebra ==========

    /// Combine word by word. `other` is read modulo this vector's capacity.
    fn zip_with(&self, other: &BitVector, f: impl Fn(u64, u64) -> u64) -> BitVector {
        let words = self
            .words
            .iter()
            .enumerate()
            .map(|(i, &w)| f(w, other.words.get(i).copied().unwrap_or(0)))
            .collect();
        BitVector {
            capacity: self.capacity,
            words,
        }
        .masked()
    }

    pub fn and(&self, other: &BitVector) -> BitVector {
        self.zip_with(other, |a, b| a & b)
    }

    pub fn or(&self, other: &BitVector) -> BitVector {
        self.zip_with(other, |a, b| a | b)
    }

    pub fn xor(&self, other: &BitVector) -> BitVector {
        self.zip_with(other, |a, b| a ^ b)
    }

    /// Complement within capacity.
    pub fn flip(&self) -> BitVector {
        BitVector {
            capacity: self.capacity,
            words: self.words.iter().map(|w| !w).collect(),
        }
        .masked()
    }

    // ========== Shifts ==========

    /// Move every bit toward higher indices. Bits pushed past capacity drop.
    pub fn shift_up(&self, amount: isize) -> Result<BitVector> {
        if amount < 0 {
            return Err(Error::NegativeShift(amount));
        }
        Ok(self.shift_toward_high(amount.unsigned_abs()))
    }

    /// Move every bit toward lower indices. Bits pushed below zero drop.
    pub fn shift_down(&self, amount: isize) -> Result<BitVector> {
        if amount < 0 {
            return Err(Error::NegativeShift(amount));
        }
        Ok(self.shift_toward_low(amount.unsigned_abs()))
    }

    /// Signed shift: positive toward higher indices, negative toward lower.
    pub(crate) fn shifted(&self, amount: isize) -> BitVector {
        if amount >= 0 {
            self.shift_toward_high(amount.unsigned_abs())
        } else {
            self.shift_toward_low(amount.unsigned_abs())
        }
    }

    fn shift_toward_high(&self, amount: usize) -> BitVector {
        let len = self.words.len();
        let word_shift = amount / WORD_BITS;
        let bit_shift = amount % WORD_BITS;
        let mut words = vec![0u64; len];

        for (i, slot) in words.iter_mut().enumerate().skip(word_shift) {
            let src = i - word_shift;
            let mut w = self.words[src] << bit_shift;
            if bit_shift > 0 && src > 0 {
                w |= self.words[src - 1] >> (WORD_BITS - bit_shift);
            }
            *slot = w;
        }

        BitVector {
            capacity: self.capacity,
            words,
        }
        .masked()
    }

    fn shift_toward_low(&self, amount: usize) -> BitVector {
        let len = self.words.len();
        let word_shift = amount / WORD_BITS;
        let bit_shift = amount % WORD_BITS;
        let mut words = vec![0u64; len];

        for (i, slot) in words.iter_mut().enumerate() {
            let src = i + word_shift;
            if src >= len {
                break;
            }
            let mut w = self.words[src] >> bit_shift;
            if bit_shift > 0 && src + 1 < len {
                w |= self.words[src + 1] << (WORD_BITS - bit_shift);
            }
            *slot = w;
        }

        BitVector {
            capacity: self.capacity,
            words,
        }
    }
}

impl PartialEq for BitVector {
    fn eq(&self, other: &BitVector) -> bool {
        self.equals(other)
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl<'a> IntoIterator for &'a BitVector {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator over every bit of a [`BitVector`], index 0 first.
pub struct Iter<'a> {
    vector: &'a BitVector,
    index: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.index >= self.vector.capacity {
            return None;
        }
        let bit = self.vector.bit(self.index);
        self.index += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.vector.capacity - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Iter<'_> {}

/// Iterator over the set indices of a [`BitVector`], ascending.
pub struct Ones<'a> {
    words: &'a [u64],
    word: usize,
    current: u64,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word * WORD_BITS + bit);
            }
            self.word += 1;
            self.current = *self.words.get(self.word)?;
        }
    }
}
