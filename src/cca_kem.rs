// IND-CCA key encapsulation built on the CPA-PKE with a Fujisaki-Okamoto style transform. The
// secret key carries the CPA secret, the rejection secret y and the public key; decapsulation
// re-encrypts the recovered message and derives the shared secret from y instead of L when the
// ciphertexts differ (implicit rejection).

use crate::a_matrix::SharedMatrix;
use crate::cpa_pke;
use crate::drbg::hash;
use crate::error::Error;
use crate::helpers::{check_len, try_zeroed_vec};
use crate::params::Parameters;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use subtle::{ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;


/// Generates a KEM key pair from fresh randomness drawn from `rng`. The secret key is
/// `sk_cpa || y || pk` ([`crate::params::ParameterSet::cca_sk_size`] bytes).
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, plus the errors of
/// [`cpa_pke::try_keygen_with_rng`].
///
/// # Examples
/// ```rust
/// use rand_chacha::rand_core::SeedableRng;
/// use round5::cca_kem;
/// use round5::params::{Parameters, R5ND_1KEM_0C};
///
/// let params = Parameters::try_new(&R5ND_1KEM_0C, 0)?;
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let (pk, sk) = cca_kem::try_keygen_with_rng(&params, None, &mut rng)?;
///
/// let (ct, ssk_sender) = cca_kem::try_encaps_with_rng(&params, None, &pk, &mut rng)?;
/// let ssk_receiver = cca_kem::decaps(&params, None, &sk, &ct)?;
/// assert_eq!(ssk_sender, ssk_receiver);
/// # Ok::<(), round5::Error>(())
/// ```
pub fn try_keygen_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let kappa_bytes = params.kappa_bytes();
    let mut seeds = Zeroizing::new(try_zeroed_vec::<u8>(3 * kappa_bytes)?);
    rng.try_fill_bytes(&mut seeds).map_err(|_| Error::Rng)?;
    let (sigma, rest) = seeds.split_at(kappa_bytes);
    let (sk_cpa, y) = rest.split_at(kappa_bytes);
    keygen_from_seed(params, shared, sigma, sk_cpa, y)
}


/// Generates a KEM key pair using the OS random number generator.
///
/// # Errors
/// As for [`try_keygen_with_rng`].
#[cfg(feature = "default-rng")]
pub fn try_keygen(
    params: &Parameters, shared: Option<&SharedMatrix>,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    try_keygen_with_rng(params, shared, &mut rand_core::OsRng)
}


/// Deterministically derives a KEM key pair from the seeds `sigma`, `sk_cpa` and `y`, each
/// `kappa_bytes` long.
///
/// # Errors
/// Returns [`Error::MalformedInput`] for seeds of the wrong length, plus the errors of
/// [`cpa_pke::keygen_from_seed`].
pub fn keygen_from_seed(
    params: &Parameters, shared: Option<&SharedMatrix>, sigma: &[u8], sk_cpa: &[u8], y: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    check_len("y", y, params.kappa_bytes())?;
    let (pk, sk_cpa) = cpa_pke::keygen_from_seed(params, shared, sigma, sk_cpa)?;
    let mut sk = Zeroizing::new(Vec::<u8>::new());
    sk.try_reserve_exact(params.set().cca_sk_size()).map_err(|_| Error::ResourceExhausted)?;
    sk.extend_from_slice(&sk_cpa);
    sk.extend_from_slice(y);
    sk.extend_from_slice(&pk);
    Ok((pk, sk))
}


/// Encapsulates a fresh shared secret to `pk`. Returns the ciphertext and the `kappa_bytes` long
/// shared secret.
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, plus the errors of
/// [`encaps_from_seed`].
pub fn try_encaps_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let mut m = Zeroizing::new(try_zeroed_vec::<u8>(params.kappa_bytes())?);
    rng.try_fill_bytes(&mut m).map_err(|_| Error::Rng)?;
    encaps_from_seed(params, shared, pk, &m)
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


/// Deterministically encapsulates the message `m` (`kappa_bytes` long) to `pk`.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `pk` or `m` has the wrong length, plus the errors of
/// [`cpa_pke::encrypt`].
pub fn encaps_from_seed(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], m: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    log::trace!("{}: encapsulate", params.name());
    check_len("public key", pk, params.pk_size())?;
    check_len("message", m, params.kappa_bytes())?;
    let (ct, l) = reencrypt(params, shared, pk, m)?;
    let mut k = Zeroizing::new(try_zeroed_vec::<u8>(params.kappa_bytes())?);
    hash(params.kappa_bytes(), &[l.as_slice(), ct.as_slice()], &mut k);
    Ok((ct, k))
}


/// Decapsulates `ct` with the KEM secret key `sk`. A ciphertext that does not re-encrypt to itself
/// yields a pseudorandom secret derived from `y` rather than an error.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `sk` or `ct` has the wrong length, plus the shared-state
/// and allocation errors of [`cpa_pke::encrypt`].
pub fn decaps(
    params: &Parameters, shared: Option<&SharedMatrix>, sk: &[u8], ct: &[u8],
) -> Result<Zeroizing<Vec<u8>>, Error> {
    log::trace!("{}: decapsulate", params.name());
    let kappa_bytes = params.kappa_bytes();
    check_len("secret key", sk, params.set().cca_sk_size())?;
    check_len("ciphertext", ct, params.set().cca_ct_size())?;
    let (sk_cpa, rest) = sk.split_at(kappa_bytes);
    let (y, pk) = rest.split_at(kappa_bytes);

    // m' <- Decrypt(sk, (U, v)), then ct' <- Encrypt(pk, m', rho') || g'
    let m_prime = cpa_pke::decrypt(params, sk_cpa, &ct[..params.ct_size()])?;
    let (ct_prime, l_prime) = reencrypt(params, shared, pk, &m_prime)?;

    // k <- H(L' || ct') on success, H(y || ct') on failure
    let matches = ct.ct_eq(&ct_prime);
    let mut prefix = Zeroizing::new(try_zeroed_vec::<u8>(kappa_bytes)?);
    for ((p, &l_i), &y_i) in prefix.iter_mut().zip(l_prime.iter()).zip(y) {
        *p = u8::conditional_select(&y_i, &l_i, matches);
    }
    let mut k = Zeroizing::new(try_zeroed_vec::<u8>(kappa_bytes)?);
    hash(kappa_bytes, &[prefix.as_slice(), ct_prime.as_slice()], &mut k);
    Ok(k)
}


// (L, g, rho) <- H(m || pk); returns (Encrypt(pk, m, rho) || g, L)
fn reencrypt(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], m: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let kappa_bytes = params.kappa_bytes();
    let mut l_g_rho = Zeroizing::new(try_zeroed_vec::<u8>(3 * kappa_bytes)?);
    hash(kappa_bytes, &[m, pk], &mut l_g_rho);
    let (l, g_rho) = l_g_rho.split_at(kappa_bytes);
    let (g, rho) = g_rho.split_at(kappa_bytes);

    let mut ct = cpa_pke::encrypt(params, shared, pk, m, rho)?;
    ct.try_reserve_exact(kappa_bytes).map_err(|_| Error::ResourceExhausted)?;
    ct.extend_from_slice(g);
    Ok((ct, Zeroizing::new(l.to_vec())))
}
