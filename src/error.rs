use displaydoc::Display;


/// Errors surfaced by the round5 API. Lower-level arithmetic (sampling, multiplication, rounding) is
/// infallible once parameters are validated; errors only originate at parameter construction, shared
/// state management, the random number generator, allocation, deserialization of untrusted input, and
/// authentication of CCA-PKE ciphertexts.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum Error {
    /// invalid parameters: {0}
    InvalidParameters(&'static str),

    /// tau=1 requires an initialized shared matrix
    UninitializedSharedState,

    /// shared matrix is already initialized
    SharedStateAlreadyInitialized,

    /// shared matrix was generated for different dimensions
    SharedStateMismatch,

    /// malformed {what}: expected {expected} bytes, found {found}
    MalformedInput {
        /// Which input was rejected
        what: &'static str,
        /// Required length in bytes
        expected: usize,
        /// Supplied length in bytes
        found: usize,
    },

    /// authenticated decryption failed
    Dem,

    /// random number generator failed
    Rng,

    /// allocation failed
    ResourceExhausted,
}


#[cfg(test)]
mod tests {
    use super::Error;
    use alloc::string::ToString;

    #[test]
    fn test_display() {
        assert_eq!(Error::InvalidParameters("h must be even").to_string(), "invalid parameters: h must be even");
        let err = Error::MalformedInput { what: "ciphertext", expected: 682, found: 681 };
        assert_eq!(err.to_string(), "malformed ciphertext: expected 682 bytes, found 681");
        assert_eq!(Error::Rng.to_string(), "random number generator failed");
        assert_eq!(Error::Dem.to_string(), "authenticated decryption failed");
    }
}
