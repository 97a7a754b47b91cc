// IND-CPA key encapsulation: encrypt a random message m with the CPA-PKE and derive the shared
// secret as H(m || ct). Keys are plain CPA-PKE keys. Decapsulation never fails on a well-formed
// ciphertext; a manipulated one simply yields a different secret.

use crate::a_matrix::SharedMatrix;
use crate::cpa_pke;
use crate::drbg::hash;
use crate::error::Error;
use crate::helpers::{check_len, try_zeroed_vec};
use crate::params::Parameters;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

#[cfg(feature = "default-rng")]
pub use crate::cpa_pke::try_keygen;
pub use crate::cpa_pke::{keygen_from_seed, try_keygen_with_rng};


/// Encapsulates a fresh shared secret to `pk`, drawing the message and then the encryption seed
/// from `rng`. Returns the ciphertext and the `kappa_bytes` long shared secret.
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, plus the errors of
/// [`encaps_from_seed`].
///
/// # Examples
/// ```rust
/// use rand_chacha::rand_core::SeedableRng;
/// use round5::cpa_kem;
/// use round5::params::{Parameters, R5ND_1KEM_5C};
///
/// let params = Parameters::try_new(&R5ND_1KEM_5C, 0)?;
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let (pk, sk) = cpa_kem::try_keygen_with_rng(&params, None, &mut rng)?;
///
/// let (ct, ssk_sender) = cpa_kem::try_encaps_with_rng(&params, None, &pk, &mut rng)?;
/// let ssk_receiver = cpa_kem::decaps(&params, &sk, &ct)?;
/// assert_eq!(ssk_sender, ssk_receiver);
/// # Ok::<(), round5::Error>(())
/// ```
pub fn try_encaps_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let kappa_bytes = params.kappa_bytes();
    let mut m = Zeroizing::new(try_zeroed_vec::<u8>(kappa_bytes)?);
    let mut rho = Zeroizing::new(try_zeroed_vec::<u8>(kappa_bytes)?);
    rng.try_fill_bytes(&mut m).map_err(|_| Error::Rng)?;
    rng.try_fill_bytes(&mut rho).map_err(|_| Error::Rng)?;
    encaps_from_seed(params, shared, pk, &m, &rho)
}


/// Encapsulates using the OS random number generator.
///
/// # Errors
/// As for [`try_encaps_with_rng`].
#[cfg(feature = "default-rng")]
pub fn try_encaps(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    try_encaps_with_rng(params, shared, pk, &mut rand_core::OsRng)
}


/// Deterministically encapsulates the message `m` to `pk` with encryption seed `rho`, both
/// `kappa_bytes` long.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `pk`, `m` or `rho` has the wrong length, plus the errors
/// of [`cpa_pke::encrypt`].
pub fn encaps_from_seed(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], m: &[u8], rho: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    log::trace!("{}: cpa encapsulate", params.name());
    let ct = cpa_pke::encrypt(params, shared, pk, m, rho)?;
    let k = shared_secret(params, m, &ct)?;
    Ok((ct, k))
}


/// Decapsulates `ct` with the CPA secret key `sk`.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `sk` or `ct` has the wrong length, and
/// [`Error::ResourceExhausted`] when allocation fails.
pub fn decaps(params: &Parameters, sk: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    log::trace!("{}: cpa decapsulate", params.name());
    let m = cpa_pke::decrypt(params, sk, ct)?;
    shared_secret(params, &m, ct)
}


// k <- H(m || ct)
fn shared_secret(params: &Parameters, m: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    check_len("ciphertext", ct, params.ct_size())?;
    let mut k = Zeroizing::new(try_zeroed_vec::<u8>(params.kappa_bytes())?);
    hash(params.kappa_bytes(), &[m, ct], &mut k);
    Ok(k)
}
