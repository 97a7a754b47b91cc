// Forward error correction over the message block. The block holds `payload_bytes` bytes of payload
// followed by the parity region. Payload bit `i` sits at `(x, y) = (i mod p, i / p)` of a `p x p`
// grid (p prime, p^2 >= payload bits). Parity register `c < p` has one bit per line `y + c*x = k`
// (mod p) and register `p` one bit per column, so every payload bit feeds one cell of every
// register. Two distinct grid points share exactly one line, hence two payload bits meet in at most
// one register: with `e` errors a flipped bit still sees at least `registers - (e - 1)` odd cells
// and a clean bit at most `e`. A threshold of `registers / 2 + 1` corrects `registers / 2` errors.
// Parity bits past `registers * p` are left unused.

use subtle::{ConditionallySelectable, ConstantTimeGreater};


/// An error-correcting code identified by `(f, xe)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Xef {
    p: usize,
    registers: usize,
}


fn bit(block: &[u8], pos: usize) -> u8 { (block[pos >> 3] >> (pos & 7)) & 1 }

fn flip(block: &mut [u8], pos: usize, value: u8) { block[pos >> 3] ^= (value & 1) << (pos & 7); }


impl Xef {
    /// Code for `(f, xe)`, if one exists.
    pub(crate) fn lookup(f: u32, xe: usize) -> Option<Self> {
        // (p, registers): p^2 covers the 128/192/256-bit payload and registers * p fits in xe
        let (p, registers) = match (f, xe) {
            (5, 190) => (13, 14),
            (5, 218) => (17, 12),
            (5, 234) => (17, 13),
            (2, 53) => (13, 4),
            (4, 163) => (17, 9),
            _ => return None,
        };
        let code = Self { p, registers };
        debug_assert!(code.parity_bits() <= xe && code.corrects() >= f as usize);
        Some(code)
    }


    /// Parity bits in use.
    fn parity_bits(&self) -> usize { self.p * self.registers }


    /// Number of errors that are always corrected.
    const fn corrects(&self) -> usize { self.registers / 2 }


    /// Cell of payload bit `i` in register `c`.
    fn cell(&self, i: usize, c: usize) -> usize {
        let (x, y) = (i % self.p, i / self.p);
        if c < self.p {
            (y + c * x) % self.p
        } else {
            x
        }
    }


    /// XORs the parity of the payload into the parity region. On a block whose parity region is
    /// zero this writes the parity; on a received block it leaves the syndrome behind.
    pub(crate) fn compute(&self, block: &mut [u8], payload_bytes: usize) {
        let payload_bits = 8 * payload_bytes;
        debug_assert!(payload_bits <= self.p * self.p, "xef: payload too long");
        debug_assert!(block.len() * 8 >= payload_bits + self.parity_bits(), "xef: block too short");
        for i in 0..payload_bits {
            let b = bit(block, i);
            for c in 0..self.registers {
                flip(block, payload_bits + c * self.p + self.cell(i, c), b);
            }
        }
    }


    /// Flips every payload bit whose syndrome cells are odd in more than half of the registers.
    /// Expects the syndrome left by [`Xef::compute`]. Runs in time independent of the block contents.
    pub(crate) fn fix_errors(&self, block: &mut [u8], payload_bytes: usize) {
        let payload_bits = 8 * payload_bytes;
        debug_assert!(block.len() * 8 >= payload_bits + self.parity_bits(), "xef: block too short");
        #[allow(clippy::cast_possible_truncation)] // at most 18 registers
        let majority = self.corrects() as u8;
        for i in 0..payload_bits {
            let mut hits = 0u8;
            for c in 0..self.registers {
                hits += bit(block, payload_bits + c * self.p + self.cell(i, c));
            }
            let correct = hits.ct_gt(&majority);
            flip(block, i, u8::conditional_select(&0, &1, correct));
        }
    }
}
