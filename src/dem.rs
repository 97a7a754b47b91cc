// Data encapsulation for the CCA-PKE: AES-GCM under a key and nonce expanded from the KEM secret.
// The AES key size follows kappa (128, 192 or 256 bits). Each KEM secret is used for exactly one
// message, so the derived nonce is never reused under a key.

use crate::drbg::hash;
use crate::error::Error;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use alloc::vec::Vec;
use zeroize::Zeroizing;


/// Length of the authentication tag appended to every DEM ciphertext.
pub(crate) const TAG_LEN: usize = 16;

const NONCE_LEN: usize = 12;

type Aes192Gcm = AesGcm<Aes192, U12>;


/// Encrypts `msg` under the KEM secret `key`; the output is `ciphertext || tag`.
pub(crate) fn seal(key: &[u8], msg: &[u8]) -> Result<Vec<u8>, Error> {
    let (aes_key, nonce) = expand(key)?;
    match key.len() {
        16 => encrypt_with::<Aes128Gcm>(&aes_key, &nonce, msg),
        24 => encrypt_with::<Aes192Gcm>(&aes_key, &nonce, msg),
        32 => encrypt_with::<Aes256Gcm>(&aes_key, &nonce, msg),
        _ => Err(Error::InvalidParameters("DEM key must be 16, 24 or 32 bytes")),
    }
}


/// Decrypts and authenticates `ct || tag` under the KEM secret `key`.
pub(crate) fn open(key: &[u8], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error> {
    let (aes_key, nonce) = expand(key)?;
    match key.len() {
        16 => decrypt_with::<Aes128Gcm>(&aes_key, &nonce, ct),
        24 => decrypt_with::<Aes192Gcm>(&aes_key, &nonce, ct),
        32 => decrypt_with::<Aes256Gcm>(&aes_key, &nonce, ct),
        _ => Err(Error::InvalidParameters("DEM key must be 16, 24 or 32 bytes")),
    }
}


// (aes_key, nonce) <- H(key), key.len() + 12 bytes
fn expand(key: &[u8]) -> Result<(Zeroizing<Vec<u8>>, [u8; NONCE_LEN]), Error> {
    let mut key_nonce = Zeroizing::new([0u8; 32 + NONCE_LEN]);
    let out = key_nonce.get_mut(..key.len() + NONCE_LEN).ok_or(Error::InvalidParameters("DEM key too long"))?;
    hash(key.len(), &[key], out);
    let (aes_key, nonce_bytes) = out.split_at(key.len());
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(nonce_bytes);
    Ok((Zeroizing::new(aes_key.to_vec()), nonce))
}


fn encrypt_with<C>(key: &[u8], nonce: &[u8; NONCE_LEN], msg: &[u8]) -> Result<Vec<u8>, Error>
where
    C: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidParameters("DEM key length"))?;
    cipher.encrypt(&GenericArray::from(*nonce), msg).map_err(|_| Error::Dem)
}


fn decrypt_with<C>(key: &[u8], nonce: &[u8; NONCE_LEN], ct: &[u8]) -> Result<Zeroizing<Vec<u8>>, Error>
where
    C: Aead + AeadCore<NonceSize = U12> + KeyInit,
{
    let cipher = C::new_from_slice(key).map_err(|_| Error::InvalidParameters("DEM key length"))?;
    cipher.decrypt(&GenericArray::from(*nonce), ct).map(Zeroizing::new).map_err(|_| Error::Dem)
}
