// Generation of the public matrix A from the seed sigma. A is never materialized row by row: each
// strategy produces a backing store plus the start offset of every row, so that row `i` is a
// contiguous window and the multiplier never reduces indices.
//
//   tau=0 ring:     lifted polynomial, reversed and doubled; row i starts at d+1-i (d+1 rows)
//   tau=0 non-ring: d*d fresh values, row i starts at i*d
//   tau=1:          process-wide pool with every row doubled, row i starts at 2*i*d + uniform(d)
//   tau=2:          per-key pool of tau2_len values (+ first d copied to the end), distinct row starts

use crate::drbg::Drbg;
use crate::error::Error;
use crate::helpers::{check_len, ensure, try_zeroed_vec};
use crate::multiply::lift;
use crate::params::Parameters;
use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::vec::Vec;
use once_cell::race::OnceBox;


// Customization string of the stream that draws tau=1 and tau=2 row offsets.
const PERMUTATION_CUSTOMIZATION: [u8; 2] = [0, 1];


/// The public matrix of one key, addressed through [`AMatrix::row`].
pub(crate) enum AMatrix<'a> {
    /// Freshly generated values laid out so that rows are fixed windows (tau=0).
    Dense { values: Vec<u16>, cols: usize, ring: bool },
    /// A pool shared across rows with per-row start offsets (tau=1 and tau=2).
    Permuted { pool: Cow<'a, [u16]>, permutation: Vec<u32>, cols: usize },
}


impl AMatrix<'_> {
    /// Ring-mode matrix of the polynomial `a` (d coefficients): the lifted polynomial reversed and
    /// stored twice, so that row i (0..=d) is the window starting at d+1-i.
    pub(crate) fn from_polynomial(a: &[u16]) -> Result<Self, Error> {
        let d = a.len();
        let aux = lift(a)?;
        let mut values = try_zeroed_vec::<u16>(2 * (d + 1))?;
        values[0] = aux[0];
        for i in 1..=d {
            values[i] = aux[d + 1 - i];
        }
        values.copy_within(0..=d, d + 1);
        Ok(Self::Dense { values, cols: d, ring: true })
    }


    /// Number of addressable rows: d+1 in ring mode, d otherwise.
    pub(crate) fn rows(&self) -> usize {
        match self {
            Self::Dense { cols, ring: true, .. } => cols + 1,
            Self::Dense { values, cols, ring: false } => values.len() / cols,
            Self::Permuted { permutation, .. } => permutation.len(),
        }
    }


    /// Row `i` as a window of `d` coefficients (unreduced, below q).
    pub(crate) fn row(&self, i: usize) -> &[u16] {
        match self {
            Self::Dense { values, cols, ring: true } => &values[cols + 1 - i..][..*cols],
            Self::Dense { values, cols, ring: false } => &values[i * cols..][..*cols],
            Self::Permuted { pool, permutation, cols } => &pool[permutation[i] as usize..][..*cols],
        }
    }
}


/// Draws `count` values from the plain stream of `seed`, masked to q.
fn random_values(params: &Parameters, seed: &[u8], count: usize) -> Result<Vec<u16>, Error> {
    let mut values = try_zeroed_vec::<u16>(count)?;
    let mut drbg = Drbg::new(params.kappa_bytes(), seed);
    #[allow(clippy::cast_possible_truncation)] // q_bits <= 16
    let q_mask = ((1u32 << params.q_bits()) - 1) as u16;
    values.iter_mut().for_each(|v| *v = drbg.next_u16() & q_mask);
    Ok(values)
}


/// Generates A for one key from `sigma` under the strategy selected by `params`. The tau=1 strategy
/// borrows its pool from `shared`, which must be initialized for the same dimensions.
pub(crate) fn generate<'a>(
    params: &Parameters, shared: Option<&'a SharedMatrix>, sigma: &[u8],
) -> Result<AMatrix<'a>, Error> {
    let d = params.d();
    log::trace!("{}: generating A with tau={}", params.name(), params.tau());
    match params.tau() {
        0 if params.is_ring() => AMatrix::from_polynomial(&random_values(params, sigma, d)?),
        0 => Ok(AMatrix::Dense { values: random_values(params, sigma, d * params.k())?, cols: d, ring: false }),
        1 => {
            let pool = shared.ok_or(Error::UninitializedSharedState)?.pool_for(params)?;
            let mut drbg = Drbg::with_customization(params.kappa_bytes(), sigma, &PERMUTATION_CUSTOMIZATION);
            #[allow(clippy::cast_possible_truncation)] // d <= 65535
            let d32 = d as u32;
            let mut permutation = try_zeroed_vec::<u32>(params.k())?;
            for (i, p) in (0u32..).zip(permutation.iter_mut()) {
                *p = 2 * i * d32 + u32::from(drbg.next_uniform16(d32));
            }
            Ok(AMatrix::Permuted { pool: Cow::Borrowed(pool), permutation, cols: d })
        }
        2 => {
            let len = params.tau2_len() as usize;
            let mut pool = random_values(params, sigma, len)?;
            pool.try_reserve_exact(d).map_err(|_| Error::ResourceExhausted)?;
            pool.extend_from_within(..d);

            let mut drbg = Drbg::with_customization(params.kappa_bytes(), sigma, &PERMUTATION_CUSTOMIZATION);
            let mut used = try_zeroed_vec::<bool>(len)?;
            let mut permutation = try_zeroed_vec::<u32>(params.k())?;
            let mask = params.tau2_len() - 1;
            for p in &mut permutation {
                let offset = loop {
                    let candidate = u32::from(drbg.next_u16()) & mask;
                    if !used[candidate as usize] {
                        break candidate;
                    }
                };
                used[offset as usize] = true;
                *p = offset;
            }
            Ok(AMatrix::Permuted { pool: Cow::Owned(pool), permutation, cols: d })
        }
        _ => Err(Error::InvalidParameters("tau must be 0, 1 or 2")),
    }
}


struct SharedPool {
    d: usize,
    k: usize,
    q_bits: u32,
    values: Vec<u16>,
}


/// The process-wide matrix pool used by tau=1. It is generated once from an independent seed and
/// is read-only afterwards; concurrent readers need no locking. Pass it to key generation and
/// encryption as `Some(&shared)`.
///
/// # Examples
/// ```rust
/// use round5::params::{Parameters, R5N1_1KEM_0C};
/// use round5::SharedMatrix;
///
/// static SHARED: SharedMatrix = SharedMatrix::new();
///
/// let params = Parameters::try_new(&R5N1_1KEM_0C, 1)?;
/// SHARED.init(&params, &[7u8; 16])?;
/// assert!(SHARED.is_initialized());
/// # Ok::<(), round5::Error>(())
/// ```
pub struct SharedMatrix {
    pool: OnceBox<SharedPool>,
}


impl SharedMatrix {
    /// An uninitialized shared matrix, usable in a `static`.
    #[must_use]
    pub const fn new() -> Self { Self { pool: OnceBox::new() } }


    /// Generates the pool for the dimensions of `params` from `seed` (`kappa_bytes` long). Each of
    /// the `k` rows of `d` values is stored twice in a row so every cyclic window is contiguous.
    ///
    /// # Errors
    /// Returns [`Error::SharedStateAlreadyInitialized`] on a second call, [`Error::InvalidParameters`]
    /// for ring parameters, and [`Error::MalformedInput`] for a seed of the wrong length.
    pub fn init(&self, params: &Parameters, seed: &[u8]) -> Result<(), Error> {
        ensure!(!params.is_ring(), Error::InvalidParameters("shared matrix requires non-ring parameters"));
        check_len("shared matrix seed", seed, params.kappa_bytes())?;
        if self.is_initialized() {
            log::warn!("{}: shared matrix already initialized", params.name());
            return Err(Error::SharedStateAlreadyInitialized);
        }
        let (d, k) = (params.d(), params.k());
        let fresh = random_values(params, seed, d * k)?;
        let mut values = try_zeroed_vec::<u16>(2 * d * k)?;
        for (row, doubled) in fresh.chunks_exact(d).zip(values.chunks_exact_mut(2 * d)) {
            doubled[..d].copy_from_slice(row);
            doubled[d..].copy_from_slice(row);
        }
        let pool = Box::new(SharedPool { d, k, q_bits: params.q_bits(), values });
        // A racing initializer may have won in the meantime; its pool stays in place
        if self.pool.set(pool).is_err() {
            log::warn!("{}: shared matrix already initialized", params.name());
            return Err(Error::SharedStateAlreadyInitialized);
        }
        log::info!("{}: shared matrix initialized ({} values)", params.name(), 2 * d * k);
        Ok(())
    }


    /// True once [`SharedMatrix::init`] has succeeded.
    #[must_use]
    pub fn is_initialized(&self) -> bool { self.pool.get().is_some() }


    fn pool_for(&self, params: &Parameters) -> Result<&[u16], Error> {
        let pool = self.pool.get().ok_or(Error::UninitializedSharedState)?;
        ensure!(
            pool.d == params.d() && pool.k == params.k() && pool.q_bits == params.q_bits(),
            Error::SharedStateMismatch
        );
        Ok(&pool.values)
    }
}


impl Default for SharedMatrix {
    fn default() -> Self { Self::new() }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{R5ND_1KEM_0C, R5N1_1KEM_0C, R5N1_TOY};

    #[test]
    fn test_dense_non_ring() {
        let params = Parameters::try_new(&R5N1_TOY, 0).unwrap();
        let a = generate(&params, None, &[1u8; 16]).unwrap();
        assert_eq!(a.rows(), 52);
        let values = random_values(&params, &[1u8; 16], 52 * 52).unwrap();
        assert_eq!(a.row(3), &values[3 * 52..4 * 52]);
        assert!(values.iter().all(|&v| v < 1 << 11));
    }

    #[test]
    fn test_dense_ring_windows() {
        let params = Parameters::try_new(&R5ND_1KEM_0C, 0).unwrap();
        let a = generate(&params, None, &[2u8; 16]).unwrap();
        assert_eq!(a.rows(), 619);
        // Row i is the reversed lifted polynomial rotated by i
        let lifted = lift(&random_values(&params, &[2u8; 16], 618).unwrap()).unwrap();
        for i in [0usize, 1, 300, 618] {
            for s in [0usize, 5, 617] {
                assert_eq!(a.row(i)[s], lifted[(619 + i - s) % 619]);
            }
        }
    }

    #[test]
    fn test_tau2_distinct_offsets() {
        let params = Parameters::try_with_tau2_len(&R5N1_TOY, 2, 64).unwrap();
        let a = generate(&params, None, &[3u8; 16]).unwrap();
        let AMatrix::Permuted { permutation, pool, .. } = &a else { panic!("expected permuted") };
        assert_eq!(pool.len(), 64 + 52);
        let mut seen = [false; 64];
        for &p in permutation {
            assert!(!seen[p as usize]);
            seen[p as usize] = true;
        }
        // Windows wrap around the pool
        for i in 0..a.rows() {
            for (c, &v) in a.row(i).iter().enumerate() {
                assert_eq!(v, pool[(permutation[i] as usize + c) % 64]);
            }
        }
    }

    #[test]
    fn test_shared_lifecycle() {
        let params = Parameters::try_new(&R5N1_TOY, 1).unwrap();
        let shared = SharedMatrix::new();
        assert!(!shared.is_initialized());
        assert_eq!(generate(&params, None, &[4u8; 16]).err(), Some(Error::UninitializedSharedState));
        assert_eq!(generate(&params, Some(&shared), &[4u8; 16]).err(), Some(Error::UninitializedSharedState));

        shared.init(&params, &[9u8; 16]).unwrap();
        assert!(shared.is_initialized());
        assert_eq!(shared.init(&params, &[9u8; 16]), Err(Error::SharedStateAlreadyInitialized));

        let a = generate(&params, Some(&shared), &[4u8; 16]).unwrap();
        let fresh = random_values(&params, &[9u8; 16], 52 * 52).unwrap();
        for i in 0..52 {
            let AMatrix::Permuted { permutation, .. } = &a else { panic!("expected permuted") };
            let start = permutation[i] as usize - 2 * i * 52;
            assert!(start < 52);
            for (c, &v) in a.row(i).iter().enumerate() {
                assert_eq!(v, fresh[i * 52 + (start + c) % 52]);
            }
        }

        let other = Parameters::try_new(&R5N1_1KEM_0C, 1).unwrap();
        assert_eq!(generate(&other, Some(&shared), &[4u8; 16]).err(), Some(Error::SharedStateMismatch));
    }

    #[test]
    fn test_shared_rejects_bad_input() {
        let shared = SharedMatrix::default();
        let ring = Parameters::try_new(&R5ND_1KEM_0C, 0).unwrap();
        assert!(matches!(shared.init(&ring, &[0u8; 16]), Err(Error::InvalidParameters(_))));
        let params = Parameters::try_new(&R5N1_TOY, 1).unwrap();
        assert!(matches!(shared.init(&params, &[0u8; 15]), Err(Error::MalformedInput { .. })));
        assert!(!shared.is_initialized());
    }
}
