// Parameter sets and their validation. A `ParameterSet` is a plain description; `Parameters` is the
// validated, immutable configuration (set + tau + derived constants) passed to every core function.

use crate::error::Error;
use crate::helpers::{bits_to_bytes, ensure};
use crate::xef;


/// Default size of the tau=2 pool.
pub const DEFAULT_TAU2_LEN: u32 = 1 << 11;


/// Unvalidated description of a Round5 parameter set.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ParameterSet {
    /// Human-readable name, e.g. `R5ND_1KEM_0c`
    pub name: &'static str,
    /// Size of seeds, shared secrets and messages in bytes
    pub kappa_bytes: usize,
    /// Dimension of the lattice
    pub d: usize,
    /// Polynomial degree: `n == d` selects ring mode, `n == 1` non-ring mode
    pub n: usize,
    /// Hamming weight of the secret ternary vectors
    pub h: usize,
    /// Bits of the modulus q
    pub q_bits: u32,
    /// Bits of the rounding modulus p
    pub p_bits: u32,
    /// Bits of the ciphertext modulus t
    pub t_bits: u32,
    /// Message bits carried per coefficient
    pub b_bits: u32,
    /// Number of columns of the secret S
    pub n_bar: usize,
    /// Number of columns of the secret R
    pub m_bar: usize,
    /// Number of bit errors corrected by XEF (0 disables it)
    pub f: u32,
    /// Number of XEF redundancy bits
    pub xe: usize,
}


impl ParameterSet {
    /// Module rank `d / n`.
    #[must_use]
    pub const fn k(&self) -> usize { self.d / self.n }

    /// True when this set uses the polynomial ring (`n == d`).
    #[must_use]
    pub const fn is_ring(&self) -> bool { self.n == self.d }

    /// Number of message-carrying coefficients `ceil((8 * kappa_bytes + xe) / b_bits)`.
    #[must_use]
    pub const fn mu(&self) -> usize {
        let b = self.b_bits as usize;
        (8 * self.kappa_bytes + self.xe + b - 1) / b
    }

    /// Serialized public key size: `sigma || packed B`.
    #[must_use]
    pub const fn pk_size(&self) -> usize {
        self.kappa_bytes + bits_to_bytes(self.d * self.n_bar * self.p_bits as usize)
    }

    /// Serialized CPA secret key size (the seed of S).
    #[must_use]
    pub const fn sk_size(&self) -> usize { self.kappa_bytes }

    /// Serialized ciphertext size: `packed U || packed v`.
    #[must_use]
    pub const fn ct_size(&self) -> usize {
        bits_to_bytes(self.d * self.m_bar * self.p_bits as usize) + bits_to_bytes(self.mu() * self.t_bits as usize)
    }

    /// CCA KEM secret key size: `sk || y || pk`.
    #[must_use]
    pub const fn cca_sk_size(&self) -> usize { 2 * self.kappa_bytes + self.pk_size() }

    /// CCA KEM ciphertext size: `ct || g`.
    #[must_use]
    pub const fn cca_ct_size(&self) -> usize { self.ct_size() + self.kappa_bytes }
}


macro_rules! parameter_set {
    ($id:ident, $name:literal, $kb:expr, $d:expr, $n:expr, $h:expr, $q:expr, $p:expr, $t:expr, $b:expr,
     $n_bar:expr, $m_bar:expr, $f:expr, $xe:expr) => {
        #[doc = concat!("The `", $name, "` parameter set.")]
        pub const $id: ParameterSet = ParameterSet {
            name: $name,
            kappa_bytes: $kb,
            d: $d,
            n: $n,
            h: $h,
            q_bits: $q,
            p_bits: $p,
            t_bits: $t,
            b_bits: $b,
            n_bar: $n_bar,
            m_bar: $m_bar,
            f: $f,
            xe: $xe,
        };
    };
}

//            identifier            name                   kb    d     n   h    q   p   t  b  n_bar m_bar f  xe
parameter_set!(R5ND_1KEM_0C,       "R5ND_1KEM_0c",        16, 618,  618, 104, 11, 8,  4, 1, 1,   1,    0, 0);
parameter_set!(R5ND_3KEM_0C,       "R5ND_3KEM_0c",        24, 786,  786, 384, 13, 9,  4, 1, 1,   1,    0, 0);
parameter_set!(R5ND_5KEM_0C,       "R5ND_5KEM_0c",        32, 1018, 1018, 428, 14, 9, 4, 1, 1,   1,    0, 0);
parameter_set!(R5ND_1PKE_0C,       "R5ND_1PKE_0c",        16, 586,  586, 182, 13, 9,  4, 1, 1,   1,    0, 0);
parameter_set!(R5ND_3PKE_0C,       "R5ND_3PKE_0c",        24, 852,  852, 212, 12, 9,  5, 1, 1,   1,    0, 0);
parameter_set!(R5ND_5PKE_0C,       "R5ND_5PKE_0c",        32, 1170, 1170, 222, 13, 9, 5, 1, 1,   1,    0, 0);
parameter_set!(R5ND_1KEM_5C,       "R5ND_1KEM_5c",        16, 490,  490, 162, 10, 7,  3, 1, 1,   1,    5, 190);
parameter_set!(R5ND_3KEM_5C,       "R5ND_3KEM_5c",        24, 756,  756, 242, 12, 8,  2, 1, 1,   1,    5, 218);
parameter_set!(R5ND_5KEM_5C,       "R5ND_5KEM_5c",        32, 940,  940, 414, 12, 8,  2, 1, 1,   1,    5, 234);
parameter_set!(R5ND_1PKE_5C,       "R5ND_1PKE_5c",        16, 508,  508, 136, 10, 7,  4, 1, 1,   1,    5, 190);
parameter_set!(R5ND_3PKE_5C,       "R5ND_3PKE_5c",        24, 756,  756, 242, 12, 8,  3, 1, 1,   1,    5, 218);
parameter_set!(R5ND_5PKE_5C,       "R5ND_5PKE_5c",        32, 940,  940, 414, 12, 8,  3, 1, 1,   1,    5, 234);
parameter_set!(R5N1_1KEM_0C,       "R5N1_1KEM_0c",        16, 594,  1,   238, 13, 10, 7, 3, 7,   7,    0, 0);
parameter_set!(R5N1_3KEM_0C,       "R5N1_3KEM_0c",        24, 881,  1,   238, 13, 10, 7, 3, 8,   8,    0, 0);
parameter_set!(R5N1_5KEM_0C,       "R5N1_5KEM_0c",        32, 1186, 1,   712, 15, 12, 7, 4, 8,   8,    0, 0);
parameter_set!(R5N1_1PKE_0C,       "R5N1_1PKE_0c",        16, 636,  1,   114, 12, 9,  6, 2, 8,   8,    0, 0);
parameter_set!(R5N1_3PKE_0C,       "R5N1_3PKE_0c",        24, 876,  1,   446, 15, 11, 7, 3, 8,   8,    0, 0);
parameter_set!(R5N1_5PKE_0C,       "R5N1_5PKE_0c",        32, 1217, 1,   462, 15, 12, 9, 4, 8,   8,    0, 0);
parameter_set!(R5ND_0KEM_2IOT,     "R5ND_0KEM_2iot",      16, 372,  372, 178, 11, 7,  3, 1, 1,   1,    2, 53);
parameter_set!(R5ND_1KEM_4LONGKEY, "R5ND_1KEM_4longkey",  24, 490,  490, 162, 10, 7,  3, 1, 1,   1,    4, 163);
parameter_set!(R5N1_3PKE_0SMALLCT, "R5N1_3PKE_0smallCT",  24, 757,  1,   378, 14, 9,  4, 1, 192, 1,    0, 0);
// Toy challenge set; far too small to be secure, intended for tests and demonstrations
parameter_set!(R5N1_TOY,           "R5N1_TOY",            16, 52,   1,   6,   11, 8,  6, 3, 7,   7,    0, 0);


/// Every named parameter set shipped with the crate.
pub const ALL_PARAMETER_SETS: [ParameterSet; 22] = [
    R5ND_1KEM_0C, R5ND_3KEM_0C, R5ND_5KEM_0C, R5ND_1PKE_0C, R5ND_3PKE_0C, R5ND_5PKE_0C,
    R5ND_1KEM_5C, R5ND_3KEM_5C, R5ND_5KEM_5C, R5ND_1PKE_5C, R5ND_3PKE_5C, R5ND_5PKE_5C,
    R5N1_1KEM_0C, R5N1_3KEM_0C, R5N1_5KEM_0C, R5N1_1PKE_0C, R5N1_3PKE_0C, R5N1_5PKE_0C,
    R5ND_0KEM_2IOT, R5ND_1KEM_4LONGKEY, R5N1_3PKE_0SMALLCT, R5N1_TOY,
];


/// Validated configuration: a parameter set, the A-generation strategy `tau`, and the constants
/// derived from them. Construct with [`Parameters::try_new`]; read-only afterwards.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Parameters {
    set: ParameterSet,
    tau: u8,
    tau2_len: u32,
    mu: usize,
    h1: u16,
    h2: u16,
    h3: u16,
}


impl Parameters {
    /// Validates `set` for use with A-generation strategy `tau` (0, 1 or 2), using the default tau=2
    /// pool size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] when the combination is not usable.
    ///
    /// # Examples
    /// ```rust
    /// use round5::params::{Parameters, R5N1_1PKE_0C};
    ///
    /// let params = Parameters::try_new(&R5N1_1PKE_0C, 2)?;
    /// assert_eq!(params.mu(), 64);
    /// # Ok::<(), round5::Error>(())
    /// ```
    pub fn try_new(set: &ParameterSet, tau: u8) -> Result<Self, Error> {
        Self::try_with_tau2_len(set, tau, DEFAULT_TAU2_LEN)
    }


    /// Validates `set` for use with A-generation strategy `tau` and an explicit tau=2 pool size.
    ///
    /// # Errors
    /// Returns [`Error::InvalidParameters`] when the combination is not usable.
    pub fn try_with_tau2_len(set: &ParameterSet, tau: u8, tau2_len: u32) -> Result<Self, Error> {
        let res = Self::validate(set, tau, tau2_len);
        match &res {
            Ok(params) => log::debug!("{}: validated parameters with tau={} mu={}", set.name, tau, params.mu),
            Err(err) => log::debug!("{}: rejected parameters: {}", set.name, err),
        }
        res
    }


    fn validate(set: &ParameterSet, tau: u8, tau2_len: u32) -> Result<Self, Error> {
        // Structure
        ensure!(set.d > 0 && set.d <= 0xFFFF, Error::InvalidParameters("d must be in 1..=65535"));
        ensure!(set.n == set.d || set.n == 1, Error::InvalidParameters("n must equal d or 1"));
        ensure!(set.h > 0 && set.h % 2 == 0, Error::InvalidParameters("h must be even and nonzero"));
        ensure!(set.h <= set.d, Error::InvalidParameters("h must not exceed d"));
        ensure!(set.n_bar > 0 && set.m_bar > 0, Error::InvalidParameters("n_bar and m_bar must be nonzero"));
        ensure!(
            !set.is_ring() || (set.n_bar == 1 && set.m_bar == 1),
            Error::InvalidParameters("ring mode requires n_bar == m_bar == 1")
        );
        ensure!(
            set.kappa_bytes > 0 && set.kappa_bytes <= 64,
            Error::InvalidParameters("kappa_bytes must be in 1..=64")
        );

        // Bit widths
        ensure!(set.q_bits <= 16, Error::InvalidParameters("q_bits must not exceed 16"));
        ensure!(set.b_bits > 0, Error::InvalidParameters("b_bits must be nonzero"));
        ensure!(
            set.b_bits < set.t_bits && set.t_bits < set.p_bits && set.p_bits < set.q_bits,
            Error::InvalidParameters("bit widths must satisfy b < t < p < q")
        );

        // Message capacity and error correction
        let mu = set.mu();
        ensure!(mu <= set.n_bar * set.m_bar * set.n, Error::InvalidParameters("mu exceeds available coefficients"));
        ensure!((set.f == 0) == (set.xe == 0), Error::InvalidParameters("f and xe must both be zero or nonzero"));
        ensure!(
            set.f == 0 || xef::Xef::lookup(set.f, set.xe).is_some(),
            Error::InvalidParameters("no error-correcting code for (f, xe)")
        );

        // A-generation strategy
        ensure!(tau <= 2, Error::InvalidParameters("tau must be 0, 1 or 2"));
        ensure!(tau == 0 || !set.is_ring(), Error::InvalidParameters("ring mode only supports tau=0"));
        if tau == 2 {
            ensure!(tau2_len.is_power_of_two(), Error::InvalidParameters("tau2_len must be a power of two"));
            ensure!(tau2_len as usize >= set.d, Error::InvalidParameters("tau2_len must be at least d"));
            ensure!(tau2_len <= 1 << 16, Error::InvalidParameters("tau2_len must not exceed 2^16"));
        }

        // Rounding constants
        let z_bits = (set.q_bits - set.p_bits + set.t_bits).max(set.p_bits);
        let h1 = 1u16 << (set.q_bits - set.p_bits - 1);
        let h2 = 1u16 << (set.q_bits - z_bits - 1);
        let h3 = (1u16 << (set.p_bits - set.t_bits - 1)) + (1u16 << (set.p_bits - set.b_bits - 1)) - h2;

        Ok(Self { set: *set, tau, tau2_len, mu, h1, h2, h3 })
    }


    /// The underlying parameter set.
    #[must_use]
    pub const fn set(&self) -> &ParameterSet { &self.set }

    /// Parameter-set name.
    #[must_use]
    pub const fn name(&self) -> &'static str { self.set.name }

    /// A-generation strategy.
    #[must_use]
    pub const fn tau(&self) -> u8 { self.tau }

    /// Size of the tau=2 pool.
    #[must_use]
    pub const fn tau2_len(&self) -> u32 { self.tau2_len }

    /// Number of message-carrying coefficients.
    #[must_use]
    pub const fn mu(&self) -> usize { self.mu }

    /// Serialized public key size.
    #[must_use]
    pub const fn pk_size(&self) -> usize { self.set.pk_size() }

    /// Serialized CPA secret key size.
    #[must_use]
    pub const fn sk_size(&self) -> usize { self.set.sk_size() }

    /// Serialized ciphertext size.
    #[must_use]
    pub const fn ct_size(&self) -> usize { self.set.ct_size() }

    /// True in ring mode.
    #[must_use]
    pub const fn is_ring(&self) -> bool { self.set.is_ring() }

    pub(crate) const fn kappa_bytes(&self) -> usize { self.set.kappa_bytes }

    pub(crate) const fn d(&self) -> usize { self.set.d }

    pub(crate) const fn k(&self) -> usize { self.set.k() }

    pub(crate) const fn h(&self) -> usize { self.set.h }

    pub(crate) const fn n_bar(&self) -> usize { self.set.n_bar }

    pub(crate) const fn m_bar(&self) -> usize { self.set.m_bar }

    pub(crate) const fn q_bits(&self) -> u32 { self.set.q_bits }

    pub(crate) const fn p_bits(&self) -> u32 { self.set.p_bits }

    pub(crate) const fn t_bits(&self) -> u32 { self.set.t_bits }

    pub(crate) const fn b_bits(&self) -> u32 { self.set.b_bits }

    pub(crate) const fn f(&self) -> u32 { self.set.f }

    pub(crate) const fn xe(&self) -> usize { self.set.xe }

    pub(crate) const fn h1(&self) -> u16 { self.h1 }

    pub(crate) const fn h2(&self) -> u16 { self.h2 }

    pub(crate) const fn h3(&self) -> u16 { self.h3 }

    /// Lift/unlift to the NTRU ring applies only without error correction.
    pub(crate) const fn lifts_closing_product(&self) -> bool { self.set.xe == 0 && self.set.f == 0 }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_sets_validate() {
        for set in &ALL_PARAMETER_SETS {
            let params = Parameters::try_new(set, 0).unwrap();
            assert_eq!(params.mu(), set.mu());
            assert!(params.mu() * set.b_bits as usize >= 8 * set.kappa_bytes + set.xe);
            if !set.is_ring() {
                assert!(Parameters::try_new(set, 1).is_ok());
                assert!(Parameters::try_new(set, 2).is_ok());
            }
        }
    }

    #[test]
    fn test_known_sizes() {
        // Published CPA sizes
        assert_eq!((R5ND_1KEM_0C.pk_size(), R5ND_1KEM_0C.ct_size()), (634, 682));
        assert_eq!((R5N1_1KEM_0C.pk_size(), R5N1_1KEM_0C.ct_size()), (5_214, 5_236));
        assert_eq!(R5ND_1KEM_0C.cca_sk_size(), 16 + 16 + 634);
        assert_eq!(R5ND_1KEM_0C.cca_ct_size(), 682 + 16);
        assert_eq!(R5N1_TOY.pk_size(), 380);
        assert_eq!(R5N1_TOY.ct_size(), 397);
        assert_eq!(R5N1_TOY.mu(), 43);
    }

    #[test]
    fn test_rounding_constants() {
        let params = Parameters::try_new(&R5ND_1KEM_0C, 0).unwrap();
        assert_eq!((params.h1(), params.h2(), params.h3()), (4, 4, 68));
        let params = Parameters::try_new(&R5N1_TOY, 0).unwrap();
        // z = max(11 - 8 + 6, 8) = 9
        assert_eq!((params.h1(), params.h2(), params.h3()), (4, 2, 16));
    }

    #[test]
    fn test_rejections() {
        let mut odd_h = R5N1_TOY;
        odd_h.h = 7;
        assert!(matches!(Parameters::try_new(&odd_h, 0), Err(Error::InvalidParameters(_))));

        let mut bad_bits = R5N1_TOY;
        bad_bits.t_bits = bad_bits.p_bits;
        assert!(Parameters::try_new(&bad_bits, 0).is_err());

        let mut bad_n = R5N1_TOY;
        bad_n.n = 4;
        assert!(Parameters::try_new(&bad_n, 0).is_err());

        let mut no_code = R5ND_1KEM_5C;
        no_code.xe = 191;
        assert!(Parameters::try_new(&no_code, 0).is_err());

        assert!(Parameters::try_new(&R5ND_1KEM_0C, 1).is_err());
        assert!(Parameters::try_new(&R5ND_1KEM_0C, 2).is_err());
        assert!(Parameters::try_new(&R5N1_TOY, 3).is_err());
        assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 48).is_err());
        assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 32).is_err());
        assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 1 << 17).is_err());
        assert!(Parameters::try_with_tau2_len(&R5N1_TOY, 2, 64).is_ok());
    }
}
