// Sparse ternary secret vectors: dimension `d`, exactly `h/2` coefficients equal to +1, `h/2` equal
// to -1, all others zero. Two representations share one trait so the multiplication routines are
// written once:
//   * `IndexVector` keeps the positions of the nonzero coefficients and is fast but addresses memory
//     at secret positions.
//   * `BitsetVector` keeps one bit per coefficient and per sign; every operation scans all `d`
//     coefficients with masks, so timing and memory access do not depend on the secret.

use crate::error::Error;
use crate::helpers::try_zeroed_vec;
use alloc::vec::Vec;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};


/// Common interface of the secret vector representations.
pub(crate) trait TernaryVector: Sized + Zeroize {
    /// All-zero vector of dimension `d` prepared to hold `h` nonzero coefficients.
    fn empty(d: usize, h: usize) -> Result<Self, Error>;

    /// Places a nonzero coefficient (+1, or -1 when `negative`) at `index` unless that position is
    /// already occupied. Returns whether the coefficient was placed.
    fn try_place(&mut self, index: usize, negative: bool) -> bool;

    /// Dimension of the vector.
    #[cfg(test)]
    fn dimension(&self) -> usize;

    /// Coefficient at `index` in {-1, 0, 1}.
    #[cfg(test)]
    fn coefficient(&self, index: usize) -> i8;

    /// `sum over s with coefficient +1 of window(s)` minus the same over -1 coefficients, wrapping
    /// mod 2^16. `window` must accept every index below the dimension.
    fn signed_sum<F: Fn(usize) -> u16>(&self, window: F) -> u16;

    /// Number of nonzero coefficients.
    #[cfg(test)]
    fn weight(&self) -> usize { (0..self.dimension()).filter(|&i| self.coefficient(i) != 0).count() }
}


/// Positions of the +1 and -1 coefficients, in draw order.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub(crate) struct IndexVector {
    d: usize,
    occupied: Vec<bool>,
    positive: Vec<u16>,
    negative: Vec<u16>,
}


impl TernaryVector for IndexVector {
    fn empty(d: usize, h: usize) -> Result<Self, Error> {
        let mut positive = Vec::new();
        let mut negative = Vec::new();
        positive.try_reserve_exact(h / 2).map_err(|_| Error::ResourceExhausted)?;
        negative.try_reserve_exact(h / 2).map_err(|_| Error::ResourceExhausted)?;
        Ok(Self { d, occupied: try_zeroed_vec(d)?, positive, negative })
    }

    fn try_place(&mut self, index: usize, negative: bool) -> bool {
        debug_assert!(index < self.d && index <= usize::from(u16::MAX));
        if self.occupied[index] {
            return false;
        }
        self.occupied[index] = true;
        #[allow(clippy::cast_possible_truncation)] // d <= 65535
        let index = index as u16;
        if negative {
            self.negative.push(index);
        } else {
            self.positive.push(index);
        }
        true
    }

    #[cfg(test)]
    fn dimension(&self) -> usize { self.d }

    #[cfg(test)]
    fn coefficient(&self, index: usize) -> i8 {
        let matches = |list: &Vec<u16>| list.iter().any(|&s| usize::from(s) == index);
        i8::from(matches(&self.positive)) - i8::from(matches(&self.negative))
    }

    fn signed_sum<F: Fn(usize) -> u16>(&self, window: F) -> u16 {
        let add = self.positive.iter().fold(0u16, |acc, &s| acc.wrapping_add(window(usize::from(s))));
        self.negative.iter().fold(add, |acc, &s| acc.wrapping_sub(window(usize::from(s))))
    }
}


/// One bit per coefficient for each sign, packed into 64-bit words.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub(crate) struct BitsetVector {
    d: usize,
    positive: Vec<u64>,
    negative: Vec<u64>,
}


fn bit_of(words: &[u64], index: usize) -> u16 {
    #[allow(clippy::cast_possible_truncation)] // single bit
    let bit = ((words[index >> 6] >> (index & 63)) & 1) as u16;
    bit
}


impl TernaryVector for BitsetVector {
    fn empty(d: usize, _h: usize) -> Result<Self, Error> {
        let words = (d + 63) / 64;
        Ok(Self { d, positive: try_zeroed_vec(words)?, negative: try_zeroed_vec(words)? })
    }

    // Both passes touch every word; only the masks depend on `index`.
    fn try_place(&mut self, index: usize, negative: bool) -> bool {
        debug_assert!(index < self.d);
        let target = (index >> 6) as u64;
        let bit = 1u64 << (index & 63);

        let mut occupied = Choice::from(0);
        for (w, (pos, neg)) in self.positive.iter().zip(self.negative.iter()).enumerate() {
            let here = (w as u64).ct_eq(&target);
            occupied |= here & !((pos | neg) & bit).ct_eq(&0);
        }

        let accept = !occupied;
        let sign = Choice::from(u8::from(negative));
        let set_pos = accept & !sign;
        let set_neg = accept & sign;
        for (w, (pos, neg)) in self.positive.iter_mut().zip(self.negative.iter_mut()).enumerate() {
            let here = (w as u64).ct_eq(&target);
            *pos |= u64::conditional_select(&0, &bit, here & set_pos);
            *neg |= u64::conditional_select(&0, &bit, here & set_neg);
        }
        bool::from(accept)
    }

    #[cfg(test)]
    fn dimension(&self) -> usize { self.d }

    #[cfg(test)]
    fn coefficient(&self, index: usize) -> i8 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)] // single bits
        let c = bit_of(&self.positive, index) as i8 - bit_of(&self.negative, index) as i8;
        c
    }

    fn signed_sum<F: Fn(usize) -> u16>(&self, window: F) -> u16 {
        let mut sum = 0u16;
        for s in 0..self.d {
            let value = window(s);
            let add_mask = 0u16.wrapping_sub(bit_of(&self.positive, s));
            let sub_mask = 0u16.wrapping_sub(bit_of(&self.negative, s));
            sum = sum.wrapping_add(value & add_mask).wrapping_sub(value & sub_mask);
        }
        sum
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn fill<V: TernaryVector>(placements: &[(usize, bool)], d: usize) -> (V, Vec<bool>) {
        let mut v = V::empty(d, placements.len()).unwrap();
        let accepted = placements.iter().map(|&(i, neg)| v.try_place(i, neg)).collect();
        (v, accepted)
    }

    #[test]
    fn test_placement_and_rejection() {
        let placements = [(3, false), (70, true), (3, true), (129, false), (70, false), (0, true)];
        let (ix, acc_ix) = fill::<IndexVector>(&placements, 130);
        let (bs, acc_bs) = fill::<BitsetVector>(&placements, 130);
        assert_eq!(acc_ix, [true, true, false, true, false, true]);
        assert_eq!(acc_ix, acc_bs);
        for i in 0..130 {
            assert_eq!(ix.coefficient(i), bs.coefficient(i));
        }
        assert_eq!(ix.coefficient(3), 1);
        assert_eq!(ix.coefficient(70), -1);
        assert_eq!(ix.coefficient(0), -1);
        assert_eq!(bs.weight(), 4);
    }

    #[test]
    fn test_signed_sum_agrees() {
        let mut rng = rand::thread_rng();
        let d = 200;
        let window: Vec<u16> = (0..d).map(|_| rng.gen()).collect();
        let placements: Vec<(usize, bool)> = (0..40).map(|j| (rng.gen_range(0..d), j % 2 == 1)).collect();
        let (ix, _) = fill::<IndexVector>(&placements, d);
        let (bs, _) = fill::<BitsetVector>(&placements, d);
        let expected = (0..d).fold(0u16, |acc, i| match ix.coefficient(i) {
            1 => acc.wrapping_add(window[i]),
            -1 => acc.wrapping_sub(window[i]),
            _ => acc,
        });
        assert_eq!(ix.signed_sum(|s| window[s]), expected);
        assert_eq!(bs.signed_sum(|s| window[s]), expected);
    }
}
