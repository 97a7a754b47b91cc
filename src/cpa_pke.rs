// CPA-secure public-key encryption: key generation, encryption and decryption over the validated
// runtime `Parameters`. The secret key is the seed of S; the public key is sigma || packed B; the
// ciphertext is packed U || packed v.
//
// The plain functions sample secrets in the constant-time bitset form. The `_vt` variants use the
// faster index form, whose timing and memory access depend on the secret.

use crate::a_matrix::{self, SharedMatrix};
use crate::conversion::{pack, packed_len, unpack};
use crate::error::Error;
use crate::helpers::{bits_to_bytes, check_len, try_zeroed_vec};
use crate::multiply::{compute_as, compute_btr, compute_rta, compute_stu};
use crate::params::Parameters;
use crate::rounding::{add_msg, decompress_vector, diff_msg, extract_msg, round_vector};
use crate::sampler::create_secret_vectors;
use crate::ternary::{BitsetVector, IndexVector, TernaryVector};
use crate::xef::Xef;
use alloc::vec::Vec;
use rand_core::CryptoRngCore;
use zeroize::Zeroizing;


/// Generates a key pair from fresh randomness drawn from `rng`.
///
/// Returns the serialized public key and the secret key.
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, [`Error::UninitializedSharedState`]
/// or [`Error::SharedStateMismatch`] for tau=1 without a matching `shared`, and
/// [`Error::ResourceExhausted`] when allocation fails.
///
/// # Examples
/// ```rust
/// use rand_chacha::rand_core::SeedableRng;
/// use round5::cpa_pke;
/// use round5::params::{Parameters, R5ND_1PKE_5C};
///
/// let params = Parameters::try_new(&R5ND_1PKE_5C, 0)?;
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let (pk, sk) = cpa_pke::try_keygen_with_rng(&params, None, &mut rng)?;
///
/// let msg = [0x55u8; 16];
/// let ct = cpa_pke::try_encrypt_with_rng(&params, None, &pk, &msg, &mut rng)?;
/// assert_eq!(cpa_pke::decrypt(&params, &sk, &ct)?.as_slice(), &msg);
/// # Ok::<(), round5::Error>(())
/// ```
pub fn try_keygen_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, rng: &mut impl CryptoRngCore,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let kappa_bytes = params.kappa_bytes();
    let mut sigma = try_zeroed_vec::<u8>(kappa_bytes)?;
    let mut sk = Zeroizing::new(try_zeroed_vec::<u8>(kappa_bytes)?);
    rng.try_fill_bytes(&mut sigma).map_err(|_| Error::Rng)?;
    rng.try_fill_bytes(&mut sk).map_err(|_| Error::Rng)?;
    let pk = keygen_internal::<BitsetVector>(params, shared, &sigma, &sk)?;
    Ok((pk, sk))
}


/// Generates a key pair using the OS random number generator.
///
/// # Errors
/// As for [`try_keygen_with_rng`].
#[cfg(feature = "default-rng")]
pub fn try_keygen(
    params: &Parameters, shared: Option<&SharedMatrix>,
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    try_keygen_with_rng(params, shared, &mut rand_core::OsRng)
}


/// Deterministically derives a key pair from the public seed `sigma` and secret seed `sk`, both
/// `kappa_bytes` long.
///
/// # Errors
/// Returns [`Error::MalformedInput`] for seeds of the wrong length, plus the shared-state and
/// allocation errors of [`try_keygen_with_rng`].
pub fn keygen_from_seed(
    params: &Parameters, shared: Option<&SharedMatrix>, sigma: &[u8], sk: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let pk = keygen_internal::<BitsetVector>(params, shared, sigma, sk)?;
    Ok((pk, Zeroizing::new(sk.to_vec())))
}


/// As [`keygen_from_seed`], but samples S with variable-time index lists.
///
/// # Errors
/// As for [`keygen_from_seed`].
pub fn keygen_from_seed_vt(
    params: &Parameters, shared: Option<&SharedMatrix>, sigma: &[u8], sk: &[u8],
) -> Result<(Vec<u8>, Zeroizing<Vec<u8>>), Error> {
    let pk = keygen_internal::<IndexVector>(params, shared, sigma, sk)?;
    Ok((pk, Zeroizing::new(sk.to_vec())))
}


/// Encrypts the `kappa_bytes` long message `msg` under `pk`, drawing the encryption seed from `rng`.
///
/// # Errors
/// Returns [`Error::Rng`] when the random number generator fails, plus the errors of [`encrypt`].
pub fn try_encrypt_with_rng(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], rng: &mut impl CryptoRngCore,
) -> Result<Vec<u8>, Error> {
    let mut rho = Zeroizing::new(try_zeroed_vec::<u8>(params.kappa_bytes())?);
    rng.try_fill_bytes(&mut rho).map_err(|_| Error::Rng)?;
    encrypt(params, shared, pk, msg, &rho)
}


/// Encrypts `msg` using the OS random number generator.
///
/// # Errors
/// As for [`try_encrypt_with_rng`].
#[cfg(feature = "default-rng")]
pub fn try_encrypt(params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8]) -> Result<Vec<u8>, Error> {
    try_encrypt_with_rng(params, shared, pk, msg, &mut rand_core::OsRng)
}


/// Deterministically encrypts `msg` under `pk` with the encryption seed `rho`. The same
/// `(pk, msg, rho)` always gives the same ciphertext.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `pk`, `msg` or `rho` has the wrong length, plus the
/// shared-state and allocation errors of [`try_keygen_with_rng`].
pub fn encrypt(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], rho: &[u8],
) -> Result<Vec<u8>, Error> {
    encrypt_internal::<BitsetVector>(params, shared, pk, msg, rho)
}


/// As [`encrypt`], but samples R with variable-time index lists.
///
/// # Errors
/// As for [`encrypt`].
pub fn encrypt_vt(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], rho: &[u8],
) -> Result<Vec<u8>, Error> {
    encrypt_internal::<IndexVector>(params, shared, pk, msg, rho)
}


/// Decrypts `ct` with the secret key `sk`, returning the `kappa_bytes` long message. There is no
/// integrity check at this layer: a modified ciphertext decrypts to some other message.
///
/// # Errors
/// Returns [`Error::MalformedInput`] when `sk` or `ct` has the wrong length, and
/// [`Error::ResourceExhausted`] when allocation fails.
pub fn decrypt(params: &Parameters, sk: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    decrypt_internal::<BitsetVector>(params, sk, ct)
}


/// As [`decrypt`], but samples S with variable-time index lists.
///
/// # Errors
/// As for [`decrypt`].
pub fn decrypt_vt(params: &Parameters, sk: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    decrypt_internal::<IndexVector>(params, sk, ct)
}


fn keygen_internal<V: TernaryVector>(
    params: &Parameters, shared: Option<&SharedMatrix>, sigma: &[u8], sk: &[u8],
) -> Result<Vec<u8>, Error> {
    log::trace!("{}: keygen", params.name());
    let kappa_bytes = params.kappa_bytes();
    check_len("sigma", sigma, kappa_bytes)?;
    check_len("secret key", sk, kappa_bytes)?;

    // 1: A <- generate_A(sigma)
    let a = a_matrix::generate(params, shared, sigma)?;

    // 2: S <- sample_secret(sk, n_bar)
    let s = create_secret_vectors::<V>(params, sk, params.n_bar())?;

    // 3: B <- round(A S, q -> p, h1)
    let mut b = compute_as(params, &a, &s)?;
    round_vector(&mut b, params.q_bits(), params.p_bits(), params.h1());

    // 4: pk <- sigma || pack(B, p)
    let mut pk = try_zeroed_vec::<u8>(params.pk_size())?;
    pk[..kappa_bytes].copy_from_slice(sigma);
    pack(&b, params.p_bits(), &mut pk[kappa_bytes..]);
    Ok(pk)
}


fn encrypt_internal<V: TernaryVector>(
    params: &Parameters, shared: Option<&SharedMatrix>, pk: &[u8], msg: &[u8], rho: &[u8],
) -> Result<Vec<u8>, Error> {
    log::trace!("{}: encrypt", params.name());
    let kappa_bytes = params.kappa_bytes();
    check_len("public key", pk, params.pk_size())?;
    check_len("message", msg, kappa_bytes)?;
    check_len("rho", rho, kappa_bytes)?;
    let (p_bits, t_bits, b_bits) = (params.p_bits(), params.t_bits(), params.b_bits());

    // 1: (sigma, B) <- unpack(pk)
    let (sigma, packed_b) = pk.split_at(kappa_bytes);
    let b = unpack(packed_b, p_bits, params.d() * params.n_bar())?;

    // 2: A <- generate_A(sigma)
    let a = a_matrix::generate(params, shared, sigma)?;

    // 3: R <- sample_secret(rho, m_bar)
    let r = create_secret_vectors::<V>(params, rho, params.m_bar())?;

    // 4: U <- round(A^T R, q -> p, h2)
    let mut u = compute_rta(params, &a, &r)?;
    round_vector(&mut u, params.q_bits(), p_bits, params.h2());

    // 5: X <- round(B^T R, p -> t, h2)
    let mut x = Zeroizing::new(compute_btr(params, &b, &r)?);
    round_vector(&mut x, p_bits, t_bits, params.h2());

    // 6: m1 <- msg || parity
    let mut m1 = Zeroizing::new(try_zeroed_vec::<u8>(bits_to_bytes(params.mu() * b_bits as usize))?);
    m1[..kappa_bytes].copy_from_slice(msg);
    if let Some(code) = Xef::lookup(params.f(), params.xe()) {
        code.compute(&mut m1, kappa_bytes);
    }

    // 7: v <- X + m1 << (t - b)
    add_msg(&mut x, &m1, t_bits, b_bits);

    // 8: ct <- pack(U, p) || pack(v, t)
    let u_len = packed_len(u.len(), p_bits);
    let mut ct = try_zeroed_vec::<u8>(params.ct_size())?;
    pack(&u, p_bits, &mut ct[..u_len]);
    pack(&x, t_bits, &mut ct[u_len..]);
    Ok(ct)
}


fn decrypt_internal<V: TernaryVector>(params: &Parameters, sk: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    log::trace!("{}: decrypt", params.name());
    let kappa_bytes = params.kappa_bytes();
    check_len("secret key", sk, kappa_bytes)?;
    check_len("ciphertext", ct, params.ct_size())?;
    let (p_bits, t_bits, b_bits) = (params.p_bits(), params.t_bits(), params.b_bits());

    // 1: S <- sample_secret(sk, n_bar)
    let s = create_secret_vectors::<V>(params, sk, params.n_bar())?;

    // 2: (U, v) <- unpack(ct)
    let u_count = params.d() * params.m_bar();
    let (packed_u, packed_v) = ct.split_at(packed_len(u_count, p_bits));
    let u = unpack(packed_u, p_bits, u_count)?;
    let mut v = Zeroizing::new(unpack(packed_v, t_bits, params.mu())?);

    // 3: v <- v << (p - t)
    decompress_vector(&mut v, t_bits, p_bits);

    // 4: X' <- S^T U
    let x_prime = Zeroizing::new(compute_stu(params, &u, &s)?);

    // 5: m2 <- round(v - X', p -> b, h3)
    diff_msg(&mut v, &x_prime);
    let mut m1 = Zeroizing::new(try_zeroed_vec::<u8>(bits_to_bytes(params.mu() * b_bits as usize))?);
    extract_msg(&mut v, p_bits, b_bits, params.h3(), &mut m1);

    // 6: correct errors and strip the parity
    if let Some(code) = Xef::lookup(params.f(), params.xe()) {
        code.compute(&mut m1, kappa_bytes);
        code.fix_errors(&mut m1, kappa_bytes);
    }
    Ok(Zeroizing::new(m1[..kappa_bytes].to_vec()))
}
