//! Dense linear algebra for the normal equations.
//!
//! The damped normal matrix `JᵀJ + λD` is symmetric positive definite for any
//! positive damping, so a plain Cholesky factorization without pivoting is
//! enough. A non-positive pivot reports the matrix as singular.

use ndarray::{Array1, Array2};

/// Lower-triangular Cholesky factor `L` with `A = L Lᵀ`.
pub fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return None;
    }
    let mut l = Array2::<f64>::zeros((n, n));

    for k in 0..n {
        let mut diag = a[[k, k]];
        for j in 0..k {
            diag -= l[[k, j]] * l[[k, j]];
        }
        if !(diag > 0.0) || !diag.is_finite() {
            return None;
        }
        let lkk = diag.sqrt();
        l[[k, k]] = lkk;

        for i in k + 1..n {
            let mut value = a[[i, k]];
            for j in 0..k {
                value -= l[[i, j]] * l[[k, j]];
            }
            l[[i, k]] = value / lkk;
        }
    }

    Some(l)
}

/// Solve `L Lᵀ x = b` given the factor `L`.
fn substitute(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = l.nrows();
    let mut y = b.clone();

    // Forward substitution (L * y = b)
    for i in 0..n {
        for j in 0..i {
            y[i] -= l[[i, j]] * y[j];
        }
        y[i] /= l[[i, i]];
    }

    // Backward substitution (L^T * x = y)
    let mut x = Array1::zeros(n);
    for i in (0..n).rev() {
        x[i] = y[i];
        for j in (i + 1)..n {
            x[i] -= l[[j, i]] * x[j];
        }
        x[i] /= l[[i, i]];
    }
    x
}

/// Solve `A x = b` for symmetric positive definite `A`.
pub fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    if b.len() != a.nrows() {
        return None;
    }
    let l = cholesky(a)?;
    Some(substitute(&l, b))
}

/// Inverse of a symmetric positive definite matrix.
pub fn cholesky_inverse(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let l = cholesky(a)?;
    let mut inverse = Array2::zeros((n, n));
    for col in 0..n {
        let mut e = Array1::zeros(n);
        e[col] = 1.0;
        inverse.column_mut(col).assign(&substitute(&l, &e));
    }
    Some(inverse)
}
