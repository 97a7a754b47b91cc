// Dense little-endian bit packing. Coefficients are written least-significant bit first with no
// padding between them; a coefficient may straddle up to three bytes.

use crate::error::Error;
use crate::helpers::{bits_to_bytes, try_zeroed_vec};
use alloc::vec::Vec;


/// Write cursor over a zero-initialized byte buffer.
pub(crate) struct BitWriter<'a> {
    out: &'a mut [u8],
    bit_pos: usize,
}


impl<'a> BitWriter<'a> {
    pub(crate) fn new(out: &'a mut [u8]) -> Self { Self { out, bit_pos: 0 } }


    /// Appends the low `width` bits of `value`; higher bits are masked off.
    pub(crate) fn write_bits(&mut self, value: u16, width: u32) {
        debug_assert!((1..=16).contains(&width), "write_bits: bad width");
        debug_assert!(bits_to_bytes(self.bit_pos + width as usize) <= self.out.len(), "write_bits: overflow");
        let mut v = u32::from(value) & ((1u32 << width) - 1);
        let mut remaining = width;
        while remaining > 0 {
            let byte = self.bit_pos >> 3;
            #[allow(clippy::cast_possible_truncation)] // bit_pos & 7 < 8
            let offset = (self.bit_pos & 7) as u32;
            let take = (8 - offset).min(remaining);
            self.out[byte] |= ((v & ((1 << take) - 1)) << offset).to_le_bytes()[0];
            v >>= take;
            remaining -= take;
            self.bit_pos += take as usize;
        }
    }
}


/// Read cursor over a byte buffer. Bits past the end of the buffer read as zero.
pub(crate) struct BitReader<'a> {
    input: &'a [u8],
    bit_pos: usize,
}


impl<'a> BitReader<'a> {
    pub(crate) fn new(input: &'a [u8]) -> Self { Self { input, bit_pos: 0 } }


    /// Reads the next `width` bits as an unsigned value.
    pub(crate) fn read_bits(&mut self, width: u32) -> u16 {
        debug_assert!((1..=16).contains(&width), "read_bits: bad width");
        let mut v = 0u32;
        let mut done = 0;
        while done < width {
            let byte = self.input.get(self.bit_pos >> 3).copied().unwrap_or(0);
            #[allow(clippy::cast_possible_truncation)] // bit_pos & 7 < 8
            let offset = (self.bit_pos & 7) as u32;
            let take = (8 - offset).min(width - done);
            v |= ((u32::from(byte) >> offset) & ((1 << take) - 1)) << done;
            done += take;
            self.bit_pos += take as usize;
        }
        #[allow(clippy::cast_possible_truncation)] // width <= 16
        let v = v as u16;
        v
    }
}


/// Number of bytes needed to pack `count` values of `bits` bits each.
pub(crate) const fn packed_len(count: usize, bits: u32) -> usize { bits_to_bytes(count * bits as usize) }


/// Packs `values` at `bits` bits each into `out`, which must be exactly `packed_len` bytes.
pub(crate) fn pack(values: &[u16], bits: u32, out: &mut [u8]) {
    debug_assert_eq!(out.len(), packed_len(values.len(), bits), "pack: incorrect output size");
    out.iter_mut().for_each(|b| *b = 0);
    let mut writer = BitWriter::new(out);
    values.iter().for_each(|&v| writer.write_bits(v, bits));
}


/// Unpacks `count` values of `bits` bits each from `input`, masking each to `bits` bits.
pub(crate) fn unpack(input: &[u8], bits: u32, count: usize) -> Result<Vec<u16>, Error> {
    debug_assert_eq!(input.len(), packed_len(count, bits), "unpack: incorrect input size");
    let mut values = try_zeroed_vec::<u16>(count)?;
    let mut reader = BitReader::new(input);
    values.iter_mut().for_each(|v| *v = reader.read_bits(bits));
    Ok(values)
}


#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::{Rng, RngCore};

    #[test]
    fn test_pack_layout() {
        // 3-bit values 0b101, 0b011, 0b111 -> bits 101 110 111 (LSB first) = 0b11_011_101, 0b1
        let mut out = [0u8; 2];
        pack(&[0b101, 0b011, 0b111], 3, &mut out);
        assert_eq!(out, [0b1101_1101, 0b0000_0001]);
        // Values are masked on the way in
        pack(&[0xFFFD, 0x0003, 0xFFFF], 3, &mut out);
        assert_eq!(out, [0b1101_1101, 0b0000_0001]);
    }

    #[test]
    fn test_straddle_three_bytes() {
        // A 13-bit value starting at bit 7 touches bytes 0, 1 and 2
        let mut out = [0u8; 3];
        let mut writer = BitWriter::new(&mut out);
        writer.write_bits(0x7F, 7);
        writer.write_bits(0x1ABC, 13);
        let mut reader = BitReader::new(&out);
        assert_eq!(reader.read_bits(7), 0x7F);
        assert_eq!(reader.read_bits(13), 0x1ABC);
        assert_eq!(reader.read_bits(4), 0);
    }

    #[test]
    fn test_pack_unpack_random() {
        let mut rng = rand::thread_rng();
        for bits in [1u32, 3, 7, 8, 9, 12, 16] {
            let count = rng.gen_range(1..200);
            let values: Vec<u16> = (0..count).map(|_| rng.gen::<u16>()).collect();
            let mut packed = vec![0u8; packed_len(count, bits)];
            pack(&values, bits, &mut packed);
            let unpacked = unpack(&packed, bits, count).unwrap();
            let mask = ((1u32 << bits) - 1) as u16;
            assert!(values.iter().zip(unpacked.iter()).all(|(&v, &u)| v & mask == u));
        }
    }

    #[test]
    fn test_unpack_masks() {
        let mut bytes = [0u8; 9];
        rand::thread_rng().fill_bytes(&mut bytes);
        let values = unpack(&bytes, 9, 8).unwrap();
        assert!(values.iter().all(|&v| v < 512));
        let mut again = [0u8; 9];
        pack(&values, 9, &mut again);
        assert_eq!(bytes, again);
    }

    #[test]
    fn test_reader_past_end() {
        let mut reader = BitReader::new(&[0xFF]);
        assert_eq!(reader.read_bits(4), 0xF);
        assert_eq!(reader.read_bits(8), 0xF);
        assert_eq!(reader.read_bits(8), 0);
    }
}
