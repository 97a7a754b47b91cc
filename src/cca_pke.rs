// IND-CCA public-key encryption of arbitrary-length messages: a CCA KEM ciphertext c1 carries a
// fresh secret k, and the message travels as c2 = AES-GCM(k, msg). Keys are CCA KEM keys.
//
//   ct = c1 (ct_size + kappa_bytes) || c2 (msg.len() + 16)

use crate::a_matrix::SharedMatrix;
use crate::cca_kem;
use crate::dem::{self, TAG_LEN};
use crate::error::Error;
use crate::params::Parameters;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;

#[cfg(feature = "default-rng")]
pub use crate::cca_kem::try_keygen;
pub use crate::cca_kem::{keygen_from_seed, try_keygen_with_rng};


/// Ciphertext length for a message of `msg_len` bytes.
#[must_use]
pub const fn ciphertext_len(params: &Parameters, msg_len: usize) -> usize {
    params.set().cca_ct_size() + msg_len + TAG_LEN
}


/// Encrypts `msg` to `pk`, drawing the KEM message from `rng`.
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, plus the errors of
/// [`encrypt_from_seed`].
///
/// # Examples
/// ```rust
/// use rand_chacha::rand_core::SeedableRng;
/// use round5::cca_pke;
/// use round5::params::{Parameters, R5ND_1PKE_5C};
///
/// let params = Parameters::try_new(&R5ND_1PKE_5C, 0)?;
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let (pk, sk) = cca_pke::try_keygen_with_rng(&params, None, &mut rng)?;
///
/// let ct = cca_pke::try_encrypt_with_rng(&params, None, &pk, b"any length will do", &mut rng)?;
/// assert_eq!(ct.len(), cca_pke::ciphertext_len(&params, 18));
/// let msg = cca_pke::decrypt(&params, None, &sk, &ct)?;
/// assert_eq!(msg.as_slice(), b"any length will do");
/// # Ok::<(), round5::Error>(())
/// ```
pub fn try_encrypt_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    let (c1, k) = cca_kem::try_encaps_with_rng(params, shared, pk, rng)?;
    finish(c1, &k, msg)
}


/// Encrypts `msg` using the OS random number generator.
///
/// # Errors
/// As for [`try_encrypt_with_rng`].
#[cfg(feature = "default-rng")]
pub fn try_encrypt(params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8]) -> Result<Vec<u8>, Error> {
    try_encrypt_with_rng(params, shared, pk, msg, &mut rand_core::OsRng)
}


/// Deterministically encrypts `msg` to `pk` with the `kappa_bytes` long KEM message `m`.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `pk` or `m` has the wrong length, plus the errors of
/// [`cca_kem::encaps_from_seed`] and [`Error::Dem`] when the message is too long for AES-GCM.
pub fn encrypt_from_seed(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], m: &[u8],
) -> Result<Vec<u8>, Error> {
    let (c1, k) = cca_kem::encaps_from_seed(params, shared, pk, m)?;
    finish(c1, &k, msg)
}


/// Decrypts `ct` with the CCA secret key `sk`.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `sk` has the wrong length or `ct` is shorter than an
/// empty message's ciphertext, and [`Error::Dem`] when authentication fails (including every
/// ciphertext whose KEM part was manipulated).
pub fn decrypt(
    params: &Parameters, shared: Option<&SharedMatrix>, sk: &[u8], ct: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
    log::trace!("{}: cca decrypt", params.name());
    let c1_len = params.set().cca_ct_size();
    if ct.len() < c1_len + TAG_LEN {
        return Err(Error::MalformedInput { what: "ciphertext", expected: c1_len + TAG_LEN, found: ct.len() });
    }
    let (c1, c2) = ct.split_at(c1_len);
    let k = cca_kem::decaps(params, shared, sk, c1)?;
    dem::open(&k, c2)
}


// ct <- c1 || DEM(k, msg)
fn finish(mut c1: Vec<u8>, k: &[u8], msg: &[u8]) -> Result<Vec<u8>, Error> {
    let c2 = dem::seal(k, msg)?;
    c1.try_reserve_exact(c2.len()).map_err(|_| Error::ResourceExhausted)?;
    c1.extend_from_slice(&c2);
    Ok(c1)
}
