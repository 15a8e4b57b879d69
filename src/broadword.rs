//! Broadword bit-twiddling primitives used by the small bitset and (in a
//! full unary-coded index) by block-boundary decoding.
//!
//! Grounded in `pisa::broadword` as used from `bit_vector.hpp`
//! (`broadword::popcount`, `broadword::lsb`, `broadword::msb`,
//! `broadword::select_in_word`, `broadword::reverse_bits`). Rust's standard
//! library exposes the first three directly as inherent integer methods;
//! `select_in_word` and `reverse_bits` are reimplemented here.

/// Number of set bits in `x`.
#[inline]
#[must_use]
pub fn popcount(x: u64) -> u32 {
    x.count_ones()
}

/// Position of the least significant set bit, or `None` if `x == 0`.
#[inline]
#[must_use]
pub fn lsb(x: u64) -> Option<u32> {
    if x == 0 {
        None
    } else {
        Some(x.trailing_zeros())
    }
}

/// Position of the most significant set bit, or `None` if `x == 0`.
#[inline]
#[must_use]
pub fn msb(x: u64) -> Option<u32> {
    if x == 0 {
        None
    } else {
        Some(63 - x.leading_zeros())
    }
}

/// Position within `x` of the `k`-th set bit (0-indexed). Panics if `x` has
/// fewer than `k + 1` set bits, mirroring the original's `assert`-guarded
/// unary decoding usage.
#[inline]
#[must_use]
pub fn select_in_word(x: u64, k: u32) -> u32 {
    debug_assert!(popcount(x) > k, "fewer than k+1 set bits in word");
    let mut word = x;
    let mut remaining = k;
    loop {
        let pos = lsb(word).expect("word exhausted before k-th set bit");
        if remaining == 0 {
            return pos;
        }
        word &= word - 1; // clear lowest set bit
        remaining -= 1;
    }
}

/// Bit-reverse a 64-bit word.
#[inline]
#[must_use]
pub fn reverse_bits(x: u64) -> u64 {
    x.reverse_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn popcount_matches_count_ones() {
        assert_eq!(popcount(0), 0);
        assert_eq!(popcount(0b1011), 3);
        assert_eq!(popcount(u64::MAX), 64);
    }

    #[test]
    fn lsb_and_msb() {
        assert_eq!(lsb(0), None);
        assert_eq!(msb(0), None);
        assert_eq!(lsb(0b1000), Some(3));
        assert_eq!(msb(0b1000), Some(3));
        assert_eq!(lsb(0b1010), Some(1));
        assert_eq!(msb(0b1010), Some(3));
    }

    #[test]
    fn select_in_word_finds_kth_set_bit() {
        let x = 0b0010_1100u64; // bits 2, 3, 5 set
        assert_eq!(select_in_word(x, 0), 2);
        assert_eq!(select_in_word(x, 1), 3);
        assert_eq!(select_in_word(x, 2), 5);
    }

    #[test]
    fn reverse_bits_roundtrips() {
        let x = 0x1234_5678_9abc_def0u64;
        assert_eq!(reverse_bits(reverse_bits(x)), x);
    }
}
