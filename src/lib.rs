#![no_std]
#![deny(clippy::pedantic, warnings, missing_docs, unsafe_code)]
// Almost all of the 'allow' category...
#![deny(absolute_paths_not_starting_with_crate, dead_code)]
#![deny(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![deny(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![deny(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![deny(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![deny(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![deny(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![deny(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![deny(unused_qualifications, unused_results, variant_size_differences)]
//
#![doc = include_str!("../README.md")]

// Implements the Round5 CPA-PKE (General Learning With Rounding), the IND-CPA KEM built directly
// on it, the IND-CCA KEM obtained by a Fujisaki-Okamoto style transform, and the IND-CCA PKE that
// pairs the CCA KEM with an AES-GCM data encapsulation.

// Functionality map
//
// Parameter sets, validation, derived constants       --> params.rs
// DRBG (SHAKE/cSHAKE), uniform draws, hash            --> drbg.rs
// Random and permuted public matrix A (tau 0, 1, 2)   --> a_matrix.rs
// Ternary secret vectors (index and bitset forms)     --> ternary.rs
// create_secret_vector(s)                             --> sampler.rs
// lift / unlift, mult_matrix, mult_transpose          --> multiply.rs
// round / decompress / add_msg / diff_msg / extract   --> rounding.rs
// XEF forward error correction                        --> xef.rs
// Bit packing of vectors and messages                 --> conversion.rs
// r5_cpa_pke_keygen / encrypt / decrypt               --> cpa_pke.rs
// CPA KEM encaps / decaps                             --> cpa_kem.rs
// CCA KEM keygen / encaps / decaps                    --> cca_kem.rs
// CCA PKE encrypt / decrypt, AES-GCM DEM              --> cca_pke.rs, dem.rs
// Fixed-size keys and typed namespaces                --> types.rs, traits.rs, lib.rs

// Note that debug_assert! statements enforce correct program construction and are not involved
// in any operational dataflow. The ensure! statements implement conservative dataflow validation
// and do not panic. Intermediate arithmetic wraps modulo 2^16; reduction to the modulus in use
// happens where values are rounded or packed.

extern crate alloc;

/// The `rand_core` types are re-exported so that users of round5 do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

pub use crate::a_matrix::SharedMatrix;
pub use crate::error::Error;

mod a_matrix;
mod conversion;
mod dem;
mod drbg;
mod error;
mod helpers;
mod multiply;
mod rounding;
mod sampler;
mod ternary;
mod types;
mod xef;

/// Parameter sets and validated runtime configuration.
pub mod params;

/// Runtime-parameterized CPA-PKE on byte slices.
pub mod cpa_pke;

/// Runtime-parameterized IND-CPA key encapsulation on byte slices.
pub mod cpa_kem;

/// Runtime-parameterized IND-CCA key encapsulation on byte slices.
pub mod cca_kem;

/// Runtime-parameterized IND-CCA public-key encryption of arbitrary-length messages.
pub mod cca_pke;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;


// This common functionality is injected into each parameter set namespace, and is a lightweight
// wrapper into the cpa_pke functions with fixed-size types. Namespaces always use tau=0.
macro_rules! functionality {
    ($set:path) => {
        use crate::cpa_pke;
        use crate::error::Error;
        use crate::helpers;
        use crate::params::{ParameterSet, Parameters};
        use crate::traits::{Decrypt, Encrypt, KeyGen, SerDes};
        use crate::types;
        use rand_core::CryptoRngCore;
        use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

        const SET: ParameterSet = $set;

        /// Private (secret) key length in bytes.
        pub const SK_LEN: usize = SET.sk_size();
        /// Public key length in bytes.
        pub const PK_LEN: usize = SET.pk_size();
        /// Ciphertext length in bytes.
        pub const CT_LEN: usize = SET.ct_size();
        /// Message length in bytes; also the length of each key generation and encryption seed.
        pub const MSG_LEN: usize = SET.kappa_bytes;


        // ----- 'EXTERNAL' DATA TYPES -----

        /// Empty struct to enable `KeyGen` trait objects across parameter sets.
        /// Implements the [`crate::traits::KeyGen`] trait.
        #[derive(Zeroize, ZeroizeOnDrop)]
        pub struct KG();


        /// Private key specific to this parameter set.
        ///
        /// Implements the [`crate::traits::Decrypt`] and [`crate::traits::SerDes`] traits.
        // Note: the underlying struct is wiped on drop.
        pub type PrivateKey = types::PrivateKey<KG, SK_LEN>;


        /// Public key specific to this parameter set.
        ///
        /// Implements the [`crate::traits::Encrypt`] and [`crate::traits::SerDes`] traits.
        pub type PublicKey = types::PublicKey<KG, PK_LEN>;


        /// Ciphertext specific to this parameter set.
        ///
        /// Implements the [`crate::traits::SerDes`] trait.
        pub type CipherText = types::CipherText<KG, CT_LEN>;


        fn params() -> Result<Parameters, Error> { Parameters::try_new(&SET, 0) }


        // ----- PRIMARY FUNCTIONS ---

        /// Generates a public-private key pair specific to this parameter set.
        ///
        /// This function utilizes the **default OS** random number generator. Secret sampling
        /// operates in constant time relative to the secret seed.
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        #[cfg(feature = "default-rng")]
        pub fn try_keygen() -> Result<(PublicKey, PrivateKey), Error> { KG::try_keygen() }


        /// Generates a public-private key pair specific to this parameter set.
        ///
        /// This function utilizes the **provided** random number generator.
        ///
        /// # Errors
        /// Returns an error if the random number generator fails.
        pub fn try_keygen_with_rng(rng: &mut impl CryptoRngCore) -> Result<(PublicKey, PrivateKey), Error> {
            KG::try_keygen_with_rng(rng)
        }


        impl KeyGen for KG {
            type PrivateKey = PrivateKey;
            type PublicKey = PublicKey;

            fn try_keygen_with_rng(rng: &mut impl CryptoRngCore) -> Result<(PublicKey, PrivateKey), Error> {
                let (pk, sk) = cpa_pke::try_keygen_with_rng(&params()?, None, rng)?;
                Ok((
                    PublicKey::new(helpers::to_array("public key", &pk)?),
                    PrivateKey::new(helpers::to_array("secret key", &sk)?),
                ))
            }

            fn keygen_from_seed(sigma: &[u8], sk: &[u8]) -> Result<(PublicKey, PrivateKey), Error> {
                let (pk, sk) = cpa_pke::keygen_from_seed(&params()?, None, sigma, sk)?;
                Ok((
                    PublicKey::new(helpers::to_array("public key", &pk)?),
                    PrivateKey::new(helpers::to_array("secret key", &sk)?),
                ))
            }
        }


        impl Encrypt for PublicKey {
            type CipherText = CipherText;
            type Message = [u8; MSG_LEN];

            fn try_encrypt_with_rng(
                &self, rng: &mut impl CryptoRngCore, msg: &Self::Message,
            ) -> Result<CipherText, Error> {
                let ct = cpa_pke::try_encrypt_with_rng(&params()?, None, &self.0, msg, rng)?;
                Ok(CipherText::new(helpers::to_array("ciphertext", &ct)?))
            }

            fn encrypt_from_seed(&self, msg: &Self::Message, rho: &[u8]) -> Result<CipherText, Error> {
                let ct = cpa_pke::encrypt(&params()?, None, &self.0, msg, rho)?;
                Ok(CipherText::new(helpers::to_array("ciphertext", &ct)?))
            }
        }


        impl Decrypt for PrivateKey {
            type CipherText = CipherText;
            type Message = [u8; MSG_LEN];

            fn try_decrypt(&self, ct: &CipherText) -> Result<Zeroizing<Self::Message>, Error> {
                let msg = cpa_pke::decrypt(&params()?, &self.0, &ct.0)?;
                helpers::check_len("message", &msg, MSG_LEN)?;
                let mut out = Zeroizing::new([0u8; MSG_LEN]);
                out.copy_from_slice(&msg);
                Ok(out)
            }
        }


        impl SerDes for PrivateKey {
            type ByteArray = [u8; SK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(sk: Self::ByteArray) -> Result<Self, Error> { Ok(PrivateKey::new(sk)) }
        }


        impl SerDes for PublicKey {
            type ByteArray = [u8; PK_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(pk: Self::ByteArray) -> Result<Self, Error> { Ok(PublicKey::new(pk)) }
        }


        impl SerDes for CipherText {
            type ByteArray = [u8; CT_LEN];

            fn into_bytes(self) -> Self::ByteArray { self.0 }

            fn try_from_bytes(ct: Self::ByteArray) -> Result<Self, Error> { Ok(CipherText::new(ct)) }
        }


        #[cfg(test)]
        mod tests {
            use super::*;
            use rand_chacha::rand_core::SeedableRng;

            #[test]
            fn smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
                let msg = [0xA5u8; MSG_LEN];
                let (pk, sk) = try_keygen_with_rng(&mut rng).unwrap();
                let ct = pk.try_encrypt_with_rng(&mut rng, &msg).unwrap();
                assert_eq!(*sk.try_decrypt(&ct).unwrap(), msg);

                let pk2 = PublicKey::try_from_bytes(pk.clone().into_bytes()).unwrap();
                assert_eq!(pk, pk2);
                let ct2 = pk2.encrypt_from_seed(&msg, &[7u8; MSG_LEN]).unwrap();
                assert_eq!(ct2, pk.encrypt_from_seed(&msg, &[7u8; MSG_LEN]).unwrap());
            }
        }
    };
}


// Injected after `functionality!` into the KEM parameter set namespaces: the IND-CPA KEM of
// cpa_kem.rs over the same fixed-size keys and ciphertexts.
macro_rules! kem_functionality {
    () => {
        use crate::cpa_kem;
        use crate::traits::{Decaps, Encaps};

        /// Shared secret length in bytes.
        pub const SS_LEN: usize = SET.kappa_bytes;


        fn shared_secret(ss: &[u8]) -> Result<Zeroizing<[u8; SS_LEN]>, Error> {
            helpers::check_len("shared secret", ss, SS_LEN)?;
            let mut out = Zeroizing::new([0u8; SS_LEN]);
            out.copy_from_slice(ss);
            Ok(out)
        }


        impl Encaps for PublicKey {
            type CipherText = CipherText;
            type SharedSecret = [u8; SS_LEN];

            fn try_encaps_with_rng(
                &self, rng: &mut impl CryptoRngCore,
            ) -> Result<(CipherText, Zeroizing<Self::SharedSecret>), Error> {
                let (ct, ss) = cpa_kem::try_encaps_with_rng(&params()?, None, &self.0, rng)?;
                Ok((CipherText::new(helpers::to_array("ciphertext", &ct)?), shared_secret(&ss)?))
            }

            fn encaps_from_seed(
                &self, m: &[u8], rho: &[u8],
            ) -> Result<(CipherText, Zeroizing<Self::SharedSecret>), Error> {
                let (ct, ss) = cpa_kem::encaps_from_seed(&params()?, None, &self.0, m, rho)?;
                Ok((CipherText::new(helpers::to_array("ciphertext", &ct)?), shared_secret(&ss)?))
            }
        }


        impl Decaps for PrivateKey {
            type CipherText = CipherText;
            type SharedSecret = [u8; SS_LEN];

            fn try_decaps(&self, ct: &CipherText) -> Result<Zeroizing<Self::SharedSecret>, Error> {
                let ss = cpa_kem::decaps(&params()?, &self.0, &ct.0)?;
                shared_secret(&ss)
            }
        }


        #[cfg(test)]
        mod kem_tests {
            use super::*;
            use rand_chacha::rand_core::SeedableRng;

            #[test]
            fn kem_smoke_test() {
                let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(321);
                let (pk, sk) = try_keygen_with_rng(&mut rng).unwrap();
                let (ct, ssk_sender) = pk.try_encaps_with_rng(&mut rng).unwrap();
                assert_eq!(*sk.try_decaps(&ct).unwrap(), *ssk_sender);

                let (ct2, ssk2) = pk.encaps_from_seed(&[9u8; SS_LEN], &[7u8; SS_LEN]).unwrap();
                assert_eq!(ct2, pk.encaps_from_seed(&[9u8; SS_LEN], &[7u8; SS_LEN]).unwrap().0);
                assert_eq!(*sk.try_decaps(&ct2).unwrap(), *ssk2);
                assert!(pk.encaps_from_seed(&[9u8; SS_LEN - 1], &[7u8; SS_LEN]).is_err());
            }
        }
    };
}


/// # Functionality for the **`R5ND_1KEM_0c`** parameter set.
///
/// Ring variant without error correction, NIST security level 1.
///
/// **1)** An originator starts with [`crate::r5nd_1kem_0c::try_keygen`] to generate both
/// [`crate::r5nd_1kem_0c::PublicKey`] and [`crate::r5nd_1kem_0c::PrivateKey`] structs. The public key implements
/// the [`crate::traits::Encrypt`] trait and the private key implements the [`crate::traits::Decrypt`] trait.
///
/// **2)** Keys and ciphertexts implement the [`crate::traits::SerDes`] trait to convert to and from fixed
/// size byte arrays for storage and transmission.
///
/// **3)** KEM namespaces also implement [`crate::traits::Encaps`] on the public key and
/// [`crate::traits::Decaps`] on the private key. The shared secret is `H(m || ct)`, which is
/// IND-CPA secure. Use [`crate::cca_kem`] with [`crate::params::R5ND_1KEM_0C`] for key
/// encapsulation that tolerates manipulated ciphertexts.
pub mod r5nd_1kem_0c {
    functionality!(crate::params::R5ND_1KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_3KEM_0c`** parameter set.
///
/// Ring variant without error correction, NIST security level 3. Usage follows [`crate::r5nd_1kem_0c`].
pub mod r5nd_3kem_0c {
    functionality!(crate::params::R5ND_3KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_5KEM_0c`** parameter set.
///
/// Ring variant without error correction, NIST security level 5. Usage follows [`crate::r5nd_1kem_0c`].
pub mod r5nd_5kem_0c {
    functionality!(crate::params::R5ND_5KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_1PKE_0c`** parameter set.
///
/// Ring variant tuned for public-key encryption, NIST security level 1.
pub mod r5nd_1pke_0c {
    functionality!(crate::params::R5ND_1PKE_0C);
}

/// # Functionality for the **`R5ND_3PKE_0c`** parameter set.
pub mod r5nd_3pke_0c {
    functionality!(crate::params::R5ND_3PKE_0C);
}

/// # Functionality for the **`R5ND_5PKE_0c`** parameter set.
pub mod r5nd_5pke_0c {
    functionality!(crate::params::R5ND_5PKE_0C);
}

/// # Functionality for the **`R5ND_1KEM_5c`** parameter set.
///
/// Ring variant with XEF error correction (five errors), NIST security level 1. The ring product is
/// taken modulo `x^(n+1) - 1`.
pub mod r5nd_1kem_5c {
    functionality!(crate::params::R5ND_1KEM_5C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_3KEM_5c`** parameter set.
pub mod r5nd_3kem_5c {
    functionality!(crate::params::R5ND_3KEM_5C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_5KEM_5c`** parameter set.
pub mod r5nd_5kem_5c {
    functionality!(crate::params::R5ND_5KEM_5C);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_1PKE_5c`** parameter set.
pub mod r5nd_1pke_5c {
    functionality!(crate::params::R5ND_1PKE_5C);
}

/// # Functionality for the **`R5ND_3PKE_5c`** parameter set.
pub mod r5nd_3pke_5c {
    functionality!(crate::params::R5ND_3PKE_5C);
}

/// # Functionality for the **`R5ND_5PKE_5c`** parameter set.
pub mod r5nd_5pke_5c {
    functionality!(crate::params::R5ND_5PKE_5C);
}

/// # Functionality for the **`R5N1_1KEM_0c`** parameter set.
///
/// Non-ring (matrix) variant, NIST security level 1. Namespaces regenerate A from the seed in the
/// public key (tau=0); see [`crate::cpa_pke`] for the permuted tau=1 and tau=2 alternatives.
pub mod r5n1_1kem_0c {
    functionality!(crate::params::R5N1_1KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5N1_3KEM_0c`** parameter set.
pub mod r5n1_3kem_0c {
    functionality!(crate::params::R5N1_3KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5N1_5KEM_0c`** parameter set.
pub mod r5n1_5kem_0c {
    functionality!(crate::params::R5N1_5KEM_0C);
    kem_functionality!();
}

/// # Functionality for the **`R5N1_1PKE_0c`** parameter set.
pub mod r5n1_1pke_0c {
    functionality!(crate::params::R5N1_1PKE_0C);
}

/// # Functionality for the **`R5N1_3PKE_0c`** parameter set.
pub mod r5n1_3pke_0c {
    functionality!(crate::params::R5N1_3PKE_0C);
}

/// # Functionality for the **`R5N1_5PKE_0c`** parameter set.
pub mod r5n1_5pke_0c {
    functionality!(crate::params::R5N1_5PKE_0C);
}

/// # Functionality for the **`R5ND_0KEM_2iot`** parameter set.
///
/// Small ring variant with a two-error XEF code, aimed at constrained devices.
pub mod r5nd_0kem_2iot {
    functionality!(crate::params::R5ND_0KEM_2IOT);
    kem_functionality!();
}

/// # Functionality for the **`R5ND_1KEM_4longkey`** parameter set.
///
/// Ring variant with a four-error XEF code and a 192-bit shared secret.
pub mod r5nd_1kem_4longkey {
    functionality!(crate::params::R5ND_1KEM_4LONGKEY);
    kem_functionality!();
}

/// # Functionality for the **`R5N1_3PKE_0smallCT`** parameter set.
///
/// Non-ring variant with a single-column ciphertext matrix (`m_bar = 1`) and a large public key.
pub mod r5n1_3pke_0smallct {
    functionality!(crate::params::R5N1_3PKE_0SMALLCT);
}

/// # Functionality for the **`R5N1_TOY`** challenge parameter set.
///
/// Far too small to be secure. Useful for tests and demonstrations.
pub mod r5n1_toy {
    functionality!(crate::params::R5N1_TOY);
}
