use crate::error::Error;
use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;
use zeroize::{Zeroize, Zeroizing};


/// The `KeyGen` trait is defined to allow trait objects.
pub trait KeyGen {
    /// A public key specific to the chosen parameter set, e.g., r5nd_1pke_0c or r5n1_1pke_0c
    type PublicKey;
    /// A private (secret) key specific to the chosen parameter set, e.g., r5nd_1pke_0c or r5n1_1pke_0c
    type PrivateKey;

    /// Generates a public and private key pair specific to this parameter set. <br>
    /// This function utilizes the OS default random number generator. Secret sampling runs in
    /// constant time.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), round5::Error> {
    /// use round5::r5nd_1pke_0c; // Could also be r5nd_1pke_5c, r5n1_1pke_0c, ...
    /// use round5::traits::{Decrypt, Encrypt, KeyGen};
    ///
    /// let msg = [0x42u8; r5nd_1pke_0c::MSG_LEN];
    ///
    /// let (pk, sk) = r5nd_1pke_0c::KG::try_keygen()?; // Generate both public and secret keys
    /// let ct = pk.try_encrypt(&msg)?; // Use the public key to encrypt the message
    /// assert_eq!(*sk.try_decrypt(&ct)?, msg);
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen() -> Result<(Self::PublicKey, Self::PrivateKey), Error> { Self::try_keygen_with_rng(&mut OsRng) }

    /// Generates a public and private key pair specific to this parameter set. <br>
    /// This function utilizes a supplied random number generator. Secret sampling runs in constant
    /// time.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), round5::Error> {
    /// use round5::r5nd_1pke_0c; // Could also be r5nd_1pke_5c, r5n1_1pke_0c, ...
    /// use round5::traits::{Decrypt, Encrypt, KeyGen};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let msg = [0x42u8; r5nd_1pke_0c::MSG_LEN];
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    ///
    /// let (pk, sk) = r5nd_1pke_0c::KG::try_keygen_with_rng(&mut rng)?;
    /// let ct = pk.try_encrypt_with_rng(&mut rng, &msg)?;
    /// assert_eq!(*sk.try_decrypt(&ct)?, msg);
    /// # Ok(())}
    /// ```
    fn try_keygen_with_rng(rng: &mut impl CryptoRngCore) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;

    /// Deterministically derives a key pair from the public seed `sigma` and the secret seed `sk`,
    /// each `MSG_LEN` bytes long.
    /// # Errors
    /// Returns an error when a seed has the wrong length; propagates internal errors.
    fn keygen_from_seed(sigma: &[u8], sk: &[u8]) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;
}


/// The `Encrypt` trait is implemented for the `PublicKey` struct on each of the parameter sets.
pub trait Encrypt {
    /// The ciphertext is specific to the chosen parameter set
    type CipherText;
    /// A fixed-size message of `MSG_LEN` bytes
    type Message;

    /// Encrypts `msg` with randomness from the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    #[cfg(feature = "default-rng")]
    fn try_encrypt(&self, msg: &Self::Message) -> Result<Self::CipherText, Error> {
        self.try_encrypt_with_rng(&mut OsRng, msg)
    }

    /// Encrypts `msg` with randomness from a supplied random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    fn try_encrypt_with_rng(&self, rng: &mut impl CryptoRngCore, msg: &Self::Message) -> Result<Self::CipherText, Error>;

    /// Deterministically encrypts `msg` with the encryption seed `rho` (`MSG_LEN` bytes). The same
    /// inputs always produce the same ciphertext.
    /// # Errors
    /// Returns an error when `rho` has the wrong length; propagates internal errors.
    fn encrypt_from_seed(&self, msg: &Self::Message, rho: &[u8]) -> Result<Self::CipherText, Error>;
}


/// The `Decrypt` trait is implemented for the `PrivateKey` struct on each of the parameter sets.
pub trait Decrypt {
    /// The ciphertext is specific to the chosen parameter set
    type CipherText;
    /// A fixed-size message of `MSG_LEN` bytes
    type Message: Zeroize;

    /// Decrypts `ct`. The result is wiped when dropped. Runs in constant time with respect to the
    /// private key. There is no integrity check: use [`crate::cca_kem`] where ciphertexts may be
    /// manipulated.
    /// # Errors
    /// Propagates internal errors.
    fn try_decrypt(&self, ct: &Self::CipherText) -> Result<Zeroizing<Self::Message>, Error>;
}


/// The `Encaps` trait is implemented for the `PublicKey` struct on the KEM parameter sets. The
/// shared secret is `H(m || ct)` for a fresh message `m`, which is IND-CPA secure only.
pub trait Encaps {
    /// The ciphertext is specific to the chosen parameter set
    type CipherText;
    /// A fixed-size shared secret of `SS_LEN` bytes
    type SharedSecret: Zeroize;

    /// Encapsulates a fresh shared secret with randomness from the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), round5::Error> {
    /// use round5::r5nd_1kem_5c; // Could also be r5nd_1kem_0c, r5n1_1kem_0c, ...
    /// use round5::traits::{Decaps, Encaps};
    ///
    /// let (pk, sk) = r5nd_1kem_5c::try_keygen()?;
    /// let (ct, ssk_sender) = pk.try_encaps()?;
    /// let ssk_receiver = sk.try_decaps(&ct)?;
    /// assert_eq!(*ssk_sender, *ssk_receiver);
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_encaps(&self) -> Result<(Self::CipherText, Zeroizing<Self::SharedSecret>), Error> {
        self.try_encaps_with_rng(&mut OsRng)
    }

    /// Encapsulates a fresh shared secret with randomness from a supplied random number generator.
    /// The message is drawn first, then the encryption seed.
    /// # Errors
    /// Returns an error when the random number generator fails; propagates internal errors.
    fn try_encaps_with_rng(
        &self, rng: &mut impl CryptoRngCore,
    ) -> Result<(Self::CipherText, Zeroizing<Self::SharedSecret>), Error>;

    /// Deterministically encapsulates the message `m` with the encryption seed `rho`, each
    /// `SS_LEN` bytes long.
    /// # Errors
    /// Returns an error when a seed has the wrong length; propagates internal errors.
    fn encaps_from_seed(&self, m: &[u8], rho: &[u8])
        -> Result<(Self::CipherText, Zeroizing<Self::SharedSecret>), Error>;
}


/// The `Decaps` trait is implemented for the `PrivateKey` struct on the KEM parameter sets.
pub trait Decaps {
    /// The ciphertext is specific to the chosen parameter set
    type CipherText;
    /// A fixed-size shared secret of `SS_LEN` bytes
    type SharedSecret: Zeroize;

    /// Recovers the shared secret from `ct`. A manipulated ciphertext yields an unrelated secret
    /// rather than an error; use [`crate::cca_kem`] where that matters.
    /// # Errors
    /// Propagates internal errors.
    fn try_decaps(&self, ct: &Self::CipherText) -> Result<Zeroizing<Self::SharedSecret>, Error>;
}


/// The `SerDes` trait provides for validated serialization and deserialization of fixed- and
/// correctly-sized elements. Round5 imposes no structure on keys and ciphertexts beyond their
/// length, so deserialization cannot fail today; a `Result` is returned so that checks may be added.
pub trait SerDes {
    /// The fixed-size byte array to be serialized or deserialized
    type ByteArray;

    /// Produces a byte array of fixed-size specific to the struct being serialized.
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), round5::Error> {
    /// use round5::r5nd_1pke_0c;
    /// use round5::traits::SerDes;
    ///
    /// let (pk, sk) = r5nd_1pke_0c::try_keygen()?;
    /// let pk_bytes = pk.into_bytes(); // Serialize the public key
    /// let sk_bytes = sk.into_bytes(); // Serialize the private key
    /// assert_eq!(pk_bytes.len(), r5nd_1pke_0c::PK_LEN);
    /// # Ok(())}
    /// ```
    fn into_bytes(self) -> Self::ByteArray;

    /// Consumes a byte array of fixed-size specific to the struct being deserialized.
    /// # Errors
    /// Returns an error on malformed input.
    /// # Examples
    /// ```rust
    /// # fn main() -> Result<(), round5::Error> {
    /// use round5::r5n1_1pke_0c;
    /// use round5::traits::SerDes;
    ///
    /// let (pk, sk) = r5n1_1pke_0c::try_keygen()?;
    /// let pk2 = r5n1_1pke_0c::PublicKey::try_from_bytes(pk.clone().into_bytes())?;
    /// let sk2 = r5n1_1pke_0c::PrivateKey::try_from_bytes(sk.into_bytes())?;
    /// assert_eq!(pk, pk2);
    /// # Ok(())}
    /// ```
    fn try_from_bytes(ba: Self::ByteArray) -> Result<Self, Error>
    where
        Self: Sized;
}
