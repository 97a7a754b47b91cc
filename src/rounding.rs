use crate::conversion::{BitReader, BitWriter};


// Compression between the moduli q > p > t > b (all powers of two) and the embedding of message
// bits into the top of the t-bit ciphertext coefficients. Values are kept unreduced in u16: the
// low a bits of a wrapping u16 are exactly the value mod 2^a, so reduction is left to the masks
// applied when a result is packed or extracted.


/// Rounds each coefficient from `a_bits` to `b_bits`: `x <- (x + h) >> (a - b)`, wrapping mod 2^16.
///
/// Input: `values` mod 2^a (upper bits ignored), rounding constant `h`. <br>
/// Output: `values` mod 2^b (upper bits ignored).
pub(crate) fn round_vector(values: &mut [u16], a_bits: u32, b_bits: u32, h: u16) {
    debug_assert!(b_bits < a_bits && a_bits <= 16, "round_vector: bad widths");
    let shift = a_bits - b_bits;
    values.iter_mut().for_each(|x| *x = x.wrapping_add(h) >> shift);
}


/// Scales coefficients back up from `from_bits` to `to_bits`: `x <- x << (to - from)`.
pub(crate) fn decompress_vector(values: &mut [u16], from_bits: u32, to_bits: u32) {
    debug_assert!(from_bits < to_bits && to_bits <= 16, "decompress_vector: bad widths");
    let shift = to_bits - from_bits;
    values.iter_mut().for_each(|x| *x <<= shift);
}


/// Adds message group `i` (the next `b_bits` bits of `msg`, LSB first) into the top `b_bits` of the
/// `t_bits`-bit coefficient `x[i]`. Missing message bits are zero.
pub(crate) fn add_msg(x: &mut [u16], msg: &[u8], t_bits: u32, b_bits: u32) {
    debug_assert!(b_bits < t_bits, "add_msg: bad widths");
    let mut reader = BitReader::new(msg);
    x.iter_mut().for_each(|x| *x = x.wrapping_add(reader.read_bits(b_bits) << (t_bits - b_bits)));
}


/// Subtracts `x_prime` from `v` coefficient-wise, wrapping.
pub(crate) fn diff_msg(v: &mut [u16], x_prime: &[u16]) {
    debug_assert_eq!(v.len(), x_prime.len(), "diff_msg: length mismatch");
    v.iter_mut().zip(x_prime).for_each(|(v, &x)| *v = v.wrapping_sub(x));
}


/// Rounds the noisy `p_bits` coefficients in `diff` down to `b_bits` with constant `h3` and writes the
/// resulting bit groups, LSB first, into `out` (which must be zeroed).
pub(crate) fn extract_msg(diff: &mut [u16], p_bits: u32, b_bits: u32, h3: u16, out: &mut [u8]) {
    round_vector(diff, p_bits, b_bits, h3);
    let mut writer = BitWriter::new(out);
    diff.iter().for_each(|&m| writer.write_bits(m, b_bits));
}
