use core::fmt;
use core::marker::PhantomData;
use zeroize::{Zeroize, ZeroizeOnDrop};


// The marker `S` is the `KG` type of the owning parameter-set namespace. It keeps keys of sets that
// happen to share a serialized length (e.g. R5ND_3KEM_5c and R5ND_3PKE_5c) from being mixed up.


/// Correctly sized private key specific to the target parameter set. <br>
/// Implements the [`crate::traits::Decrypt`] and [`crate::traits::SerDes`] traits.
pub struct PrivateKey<S, const SK_LEN: usize>(pub(crate) [u8; SK_LEN], PhantomData<fn() -> S>);


/// Correctly sized public key specific to the target parameter set. <br>
/// Implements the [`crate::traits::Encrypt`] and [`crate::traits::SerDes`] traits.
pub struct PublicKey<S, const PK_LEN: usize>(pub(crate) [u8; PK_LEN], PhantomData<fn() -> S>);


/// Correctly sized ciphertext specific to the target parameter set. <br>
/// Implements the [`crate::traits::SerDes`] trait.
pub struct CipherText<S, const CT_LEN: usize>(pub(crate) [u8; CT_LEN], PhantomData<fn() -> S>);


macro_rules! byte_container {
    ($name:ident) => {
        impl<S, const N: usize> $name<S, N> {
            pub(crate) const fn new(bytes: [u8; N]) -> Self { Self(bytes, PhantomData) }
        }

        impl<S, const N: usize> Clone for $name<S, N> {
            fn clone(&self) -> Self { Self::new(self.0) }
        }
    };
}

byte_container!(PrivateKey);
byte_container!(PublicKey);
byte_container!(CipherText);


impl<S, const N: usize> Zeroize for PrivateKey<S, N> {
    fn zeroize(&mut self) { self.0.zeroize(); }
}

impl<S, const N: usize> Drop for PrivateKey<S, N> {
    fn drop(&mut self) { self.zeroize(); }
}

impl<S, const N: usize> ZeroizeOnDrop for PrivateKey<S, N> {}


// Public data may be compared and printed
macro_rules! public_container {
    ($name:ident) => {
        impl<S, const N: usize> PartialEq for $name<S, N> {
            fn eq(&self, other: &Self) -> bool { self.0 == other.0 }
        }

        impl<S, const N: usize> Eq for $name<S, N> {}

        impl<S, const N: usize> fmt::Debug for $name<S, N> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({} bytes)", stringify!($name), N)
            }
        }
    };
}

public_container!(PublicKey);
public_container!(CipherText);
