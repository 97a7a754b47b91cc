use crate::error::Error;
use alloc::vec::Vec;


/// If the condition is not met, return the given error. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// Allocates a zero-filled vector of `len` elements, reporting allocation failure as an error
/// rather than aborting the process.
pub(crate) fn try_zeroed_vec<T: Clone + Default>(len: usize) -> Result<Vec<T>, Error> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| Error::ResourceExhausted)?;
    v.resize(len, T::default());
    Ok(v)
}


/// Checks the length of a serialized input supplied by the caller.
pub(crate) fn check_len(what: &'static str, input: &[u8], expected: usize) -> Result<(), Error> {
    ensure!(input.len() == expected, Error::MalformedInput { what, expected, found: input.len() });
    Ok(())
}


/// Copies a serialized value into a fixed-size array.
pub(crate) fn to_array<const N: usize>(what: &'static str, bytes: &[u8]) -> Result<[u8; N], Error> {
    check_len(what, bytes, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    Ok(out)
}


/// Number of bytes needed to hold `bits` bits.
pub(crate) const fn bits_to_bytes(bits: usize) -> usize { (bits + 7) / 8 }
