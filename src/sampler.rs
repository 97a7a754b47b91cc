use crate::drbg::Drbg;
use crate::error::Error;
use crate::params::Parameters;
use crate::ternary::TernaryVector;
use alloc::vec::Vec;


/// Draws one secret vector of dimension `d` and weight `h` from `drbg`. Draw `j` lands on a uniform
/// free position; even draws become +1, odd draws -1. Occupied positions are redrawn.
pub(crate) fn sample_ternary<V: TernaryVector>(d: usize, h: usize, drbg: &mut Drbg) -> Result<V, Error> {
    debug_assert!(h <= d && d <= 1 << 16);
    let mut vector = V::empty(d, h)?;
    #[allow(clippy::cast_possible_truncation)] // d <= 65535 checked at parameter validation
    let range = d as u32;
    for j in 0..h {
        while !vector.try_place(usize::from(drbg.next_uniform16(range)), j % 2 == 1) {}
    }
    Ok(vector)
}


/// Derives `count` independent secret vectors from `seed`. With several vectors, vector `j` is drawn
/// from a stream customized by `j` as 8 little-endian bytes; a single vector uses the plain stream.
pub(crate) fn create_secret_vectors<V: TernaryVector>(
    params: &Parameters, seed: &[u8], count: usize,
) -> Result<Vec<V>, Error> {
    let mut vectors = Vec::new();
    vectors.try_reserve_exact(count).map_err(|_| Error::ResourceExhausted)?;
    for j in 0..count {
        let mut drbg = if count > 1 {
            Drbg::with_customization(params.kappa_bytes(), seed, &(j as u64).to_le_bytes())
        } else {
            Drbg::new(params.kappa_bytes(), seed)
        };
        vectors.push(sample_ternary(params.d(), params.h(), &mut drbg)?);
    }
    Ok(vectors)
}
