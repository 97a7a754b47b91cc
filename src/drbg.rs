// Deterministic random bit generation. Every pseudorandom value in the scheme (A, the secrets, the
// tau=1/tau=2 permutations, the KEM hashes) is squeezed from SHAKE/cSHAKE keyed by a seed.

use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{CShake128, CShake128Core, CShake128Reader, CShake256, CShake256Core, CShake256Reader};
use sha3::{Shake128, Shake128Reader, Shake256, Shake256Reader};


/// XOF reader matching the security level (`kappa_bytes <= 16` selects the 128-bit variants) and
/// whether a customization string separates the stream.
enum Reader {
    Shake128(Shake128Reader),
    Shake256(Shake256Reader),
    CShake128(CShake128Reader),
    CShake256(CShake256Reader),
}


/// Seeded deterministic byte and uint16 stream.
pub(crate) struct Drbg {
    reader: Reader,
}


impl Drbg {
    /// Initializes the stream from `seed` alone.
    pub(crate) fn new(kappa_bytes: usize, seed: &[u8]) -> Self {
        let reader = if kappa_bytes <= 16 {
            let mut hasher = Shake128::default();
            hasher.update(seed);
            Reader::Shake128(hasher.finalize_xof())
        } else {
            let mut hasher = Shake256::default();
            hasher.update(seed);
            Reader::Shake256(hasher.finalize_xof())
        };
        Self { reader }
    }


    /// Initializes a stream from `seed` that is domain-separated by `customization`. An empty
    /// customization yields the same stream as [`Drbg::new`].
    pub(crate) fn with_customization(kappa_bytes: usize, seed: &[u8], customization: &[u8]) -> Self {
        if customization.is_empty() {
            return Self::new(kappa_bytes, seed);
        }
        let reader = if kappa_bytes <= 16 {
            let mut hasher = CShake128::from_core(CShake128Core::new(customization));
            hasher.update(seed);
            Reader::CShake128(hasher.finalize_xof())
        } else {
            let mut hasher = CShake256::from_core(CShake256Core::new(customization));
            hasher.update(seed);
            Reader::CShake256(hasher.finalize_xof())
        };
        Self { reader }
    }


    /// Fills `out` with the next bytes of the stream.
    pub(crate) fn fill_bytes(&mut self, out: &mut [u8]) {
        match &mut self.reader {
            Reader::Shake128(r) => r.read(out),
            Reader::Shake256(r) => r.read(out),
            Reader::CShake128(r) => r.read(out),
            Reader::CShake256(r) => r.read(out),
        }
    }


    /// Next little-endian uint16 of the stream.
    pub(crate) fn next_u16(&mut self) -> u16 {
        let mut bytes = [0u8; 2];
        self.fill_bytes(&mut bytes);
        u16::from_le_bytes(bytes)
    }


    /// Uniform value in `[0, range)` for `1 <= range <= 2^16`, using scaled rejection sampling: a
    /// draw is rejected only when it lands in the final partial bucket, so well under 1% of draws
    /// are discarded for the dimensions in use (masking would discard up to half).
    pub(crate) fn next_uniform16(&mut self, range: u32) -> u16 {
        debug_assert!((1..=1 << 16).contains(&range), "uniform16: bad range");
        let div = (1u32 << 16) / range;
        let limit = range * div;
        loop {
            let x = u32::from(self.next_u16());
            if x < limit {
                #[allow(clippy::cast_possible_truncation)] // x / div < range <= 2^16
                return (x / div) as u16;
            }
        }
    }
}


/// Hashes the concatenation of `input` into `out`. The XOF follows the same kappa rule as [`Drbg`].
pub(crate) fn hash(kappa_bytes: usize, input: &[&[u8]], out: &mut [u8]) {
    if kappa_bytes <= 16 {
        let mut hasher = Shake128::default();
        input.iter().for_each(|b| hasher.update(b));
        hasher.finalize_xof().read(out);
    } else {
        let mut hasher = Shake256::default();
        input.iter().for_each(|b| hasher.update(b));
        hasher.finalize_xof().read(out);
    }
}
