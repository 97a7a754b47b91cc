// The four products of the scheme. Every output coefficient is a signed sum of `h` window entries
// selected by a ternary secret, so the secret representation decides the memory access pattern.
// All arithmetic wraps mod 2^16; reduction to q, p or t happens when the result is rounded.
//
//   B  = A S      (d x n_bar)         key generation
//   U  = A^T R    (d x m_bar, as R^T A) encryption
//   X  = B^T R    (mu coefficients)   encryption
//   X' = S^T U    (mu coefficients)   decryption
//
// Ring mode works in Z[x]/(x^(d+1) - 1) after multiplying by (x - 1) ("lift"), where multiplication
// by a sparse polynomial is a sum of rotated windows; dividing by (x - 1) ("unlift") returns to the
// cyclotomic ring 1 + x + ... + x^d.

use crate::a_matrix::AMatrix;
use crate::error::Error;
use crate::helpers::try_zeroed_vec;
use crate::params::Parameters;
use crate::ternary::TernaryVector;
use alloc::vec::Vec;


/// Multiplies the polynomial `a` of degree < d by (x - 1), giving d+1 coefficients.
pub(crate) fn lift(a: &[u16]) -> Result<Vec<u16>, Error> {
    let d = a.len();
    debug_assert!(d > 0);
    let mut p = try_zeroed_vec::<u16>(d + 1)?;
    p[0] = a[0].wrapping_neg();
    for i in 1..d {
        p[i] = a[i - 1].wrapping_sub(a[i]);
    }
    p[d] = a[d - 1];
    Ok(p)
}


/// Divides by (x - 1), keeping the first `len` coefficients.
pub(crate) fn unlift(n: &[u16], len: usize) -> Result<Vec<u16>, Error> {
    debug_assert!(len > 0 && n.len() >= len);
    let mut c = try_zeroed_vec::<u16>(len)?;
    c[0] = n[0].wrapping_neg();
    for i in 1..len {
        c[i] = c[i - 1].wrapping_sub(n[i]);
    }
    Ok(c)
}


/// `B = A S`. Non-ring output is row-major `d x n_bar`.
pub(crate) fn compute_as<V: TernaryVector>(params: &Parameters, a: &AMatrix<'_>, s: &[V]) -> Result<Vec<u16>, Error> {
    if params.is_ring() {
        // unlift reads only the first d coefficients, so row d is never summed
        debug_assert_eq!(a.rows(), params.d() + 1);
        let mut b_aux = try_zeroed_vec::<u16>(params.d())?;
        for (i, b) in b_aux.iter_mut().enumerate() {
            *b = ring_row_sum(a, i, &s[0]);
        }
        return unlift(&b_aux, params.d());
    }
    let n_bar = params.n_bar();
    let mut b = try_zeroed_vec::<u16>(params.d() * n_bar)?;
    for (i, b_row) in b.chunks_exact_mut(n_bar).enumerate() {
        let row = a.row(i);
        for (b_ij, s_j) in b_row.iter_mut().zip(s) {
            *b_ij = s_j.signed_sum(|x| row[x]);
        }
    }
    Ok(b)
}


fn ring_row_sum<V: TernaryVector>(a: &AMatrix<'_>, i: usize, s: &V) -> u16 {
    let row = a.row(i);
    s.signed_sum(|x| row[x])
}


/// `U = A^T R`, computed as `R^T A`. Non-ring output holds column j of U at `[j*d, (j+1)*d)`. In
/// ring mode the product commutes and this is [`compute_as`].
pub(crate) fn compute_rta<V: TernaryVector>(params: &Parameters, a: &AMatrix<'_>, r: &[V]) -> Result<Vec<u16>, Error> {
    if params.is_ring() {
        return compute_as(params, a, r);
    }
    let d = params.d();
    let mut u_t = try_zeroed_vec::<u16>(d * params.m_bar())?;
    for (u_col, r_j) in u_t.chunks_exact_mut(d).zip(r) {
        for (i, u) in u_col.iter_mut().enumerate() {
            *u = r_j.signed_sum(|x| a.row(x)[i]);
        }
    }
    Ok(u_t)
}


/// `X = B^T R`, the first `mu` coefficients.
pub(crate) fn compute_btr<V: TernaryVector>(params: &Parameters, b: &[u16], r: &[V]) -> Result<Vec<u16>, Error> {
    if params.is_ring() {
        return ring_closing_product(params, b, &r[0]);
    }
    let (n_bar, m_bar) = (params.n_bar(), params.m_bar());
    let mut x = try_zeroed_vec::<u16>(params.mu())?;
    // Column i of B against each R_j in turn
    for (idx, x_idx) in x.iter_mut().enumerate() {
        let (i, j) = (idx / m_bar, idx % m_bar);
        *x_idx = r[j].signed_sum(|row| b[row * n_bar + i]);
    }
    Ok(x)
}


/// `X' = S^T U`, the first `mu` coefficients, ordered as in [`compute_btr`].
pub(crate) fn compute_stu<V: TernaryVector>(params: &Parameters, u_t: &[u16], s: &[V]) -> Result<Vec<u16>, Error> {
    if params.is_ring() {
        return ring_closing_product(params, u_t, &s[0]);
    }
    let (d, m_bar) = (params.d(), params.m_bar());
    let mut x = try_zeroed_vec::<u16>(params.mu())?;
    for (idx, x_idx) in x.iter_mut().enumerate() {
        let (j, i) = (idx / m_bar, idx % m_bar);
        let u_col = &u_t[i * d..(i + 1) * d];
        *x_idx = s[j].signed_sum(|row| u_col[row]);
    }
    Ok(x)
}


// Ring closing product shared by X and X'. Without error correction the operand is lifted and the
// result unlifted; with it the operand is zero-extended and the product stays in the NTRU ring.
fn ring_closing_product<V: TernaryVector>(params: &Parameters, b: &[u16], v: &V) -> Result<Vec<u16>, Error> {
    let (d, mu) = (params.d(), params.mu());
    let lifted = params.lifts_closing_product();

    let b_aux = if lifted {
        lift(b)?
    } else {
        let mut extended = try_zeroed_vec::<u16>(d + 1)?;
        extended[..d].copy_from_slice(b);
        extended
    };

    // Reversed and doubled so that every rotation is a contiguous window
    let mut c = try_zeroed_vec::<u16>(2 * (d + 1))?;
    c[0] = b_aux[0];
    for i in 1..=d {
        c[i] = b_aux[d + 1 - i];
    }
    c.copy_within(0..=d, d + 1);

    let mut x_aux = try_zeroed_vec::<u16>(mu + 1)?;
    x_aux[0] = v.signed_sum(|s| c[s]);
    for (idx, x) in x_aux.iter_mut().enumerate().skip(1) {
        let window = &c[d + 1 - idx..];
        *x = v.signed_sum(|s| window[s]);
    }

    if lifted {
        unlift(&x_aux, mu)
    } else {
        x_aux.copy_within(1.., 0);
        x_aux.truncate(mu);
        Ok(x_aux)
    }
}
