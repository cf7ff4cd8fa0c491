use super::FloatT;
use enum_dispatch::*;

// All internal math for the solver should go through these
// core traits, which are implemented generically for floats
// of type FloatT.

/// Scalar operations on [`FloatT`](crate::algebra::FloatT)

pub trait ScalarMath {
    type T: FloatT;
    /// Applies a threshold value.
    ///
    /// Returns `min_thresh` if `s < min_thresh`, `max_thresh` if
    /// `s > max_thresh` and `s` otherwise.
    fn clip(&self, min_thresh: Self::T, max_thresh: Self::T) -> Self::T;

    /// Nearest integer power of two, with ties in the exponent
    /// rounded away from zero.  Returns one for non-positive
    /// or non-finite values.
    fn nearest_pow2(&self) -> Self::T;
}

/// Vector operations on slices of [`FloatT`](crate::algebra::FloatT)

pub trait VectorMath {
    type T;

    /// Copy values from `src` to `self`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// Apply an elementwise operation on a vector.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise scaling.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise negation of entries.
    fn negate(&mut self) -> &mut Self;

    /// Elementwise scaling by another vector. Produces `self[i] = self[i] * y[i]`
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    /// Elementwise projection onto the box `[lo,up]`
    fn project(&mut self, lo: &Self, up: &Self) -> &mut Self;

    /// Dot product
    fn dot(&self, y: &Self) -> Self::T;

    /// Sum of elements.
    fn sum(&self) -> Self::T;

    /// Sum of squares of the elements.
    fn sumsq(&self) -> Self::T;

    /// 2-norm
    fn norm(&self) -> Self::T;

    /// Infinity norm
    fn norm_inf(&self) -> Self::T;

    /// Infinity norm of the difference `self - b`
    fn norm_inf_diff(&self, b: &Self) -> Self::T;

    /// Mean value in vector
    fn mean(&self) -> Self::T;

    /// Checks if all elements are finite, i.e. no Infs or NaNs
    fn is_finite(&self) -> bool;

    //blas-like vector ops
    //--------------------

    /// BLAS-like shift and scale in place.  Produces `self = a*x+b*self`
    fn axpby(&mut self, a: Self::T, x: &Self, b: Self::T) -> &mut Self;
}

/// Dimensions of a matrix

#[enum_dispatch]
pub trait ShapedMatrix {
    /// number of rows
    fn nrows(&self) -> usize;
    /// number of columns
    fn ncols(&self) -> usize;
    /// (rows, columns)
    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }
    /// true if rows == columns
    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }
}

/// Matrix-vector products for matrices of [`FloatT`](crate::algebra::FloatT)

#[enum_dispatch]
pub trait MatrixVectorMultiply<T>
where
    T: FloatT,
{
    /// BLAS-like general matrix-vector multiply.  Produces `y = a*self*x + b*y`
    fn gemv(&self, y: &mut [T], x: &[T], a: T, b: T);

    /// BLAS-like transposed matrix-vector multiply.  Produces `y = a*self'*x + b*y`
    fn gemv_t(&self, y: &mut [T], x: &[T], a: T, b: T);
}

/// Operations on matrices of [`FloatT`](crate::algebra::FloatT)

#[enum_dispatch]
pub trait MatrixMath<T>
where
    T: FloatT,
{
    /// Compute columnwise infinity norms of a matrix and
    /// assign the results to the vector `norms`
    fn col_norms(&self, norms: &mut [T]);

    /// Compute rowwise infinity norms of a matrix and
    /// assign the results to the vector `norms`
    fn row_norms(&self, norms: &mut [T]);

    /// Elementwise scaling
    fn scale(&mut self, c: T);

    /// Left and right multiply the matrix self by diagonal matrices,
    /// producing `A = Diagonal(l)*A*Diagonal(r)`
    fn lrscale(&mut self, l: &[T], r: &[T]);

    /// Checks if all stored values are finite
    fn is_finite(&self) -> bool;
}

/// Structural operations on sparse matrices of [`FloatT`](crate::algebra::FloatT)

#[enum_dispatch]
pub trait SparseMatrixOps<T>
where
    T: FloatT,
{
    /// number of stored entries
    fn nnz(&self) -> usize;

    /// Check that matrix data is correctly formatted.
    fn check_format(&self) -> Result<(), crate::algebra::SparseFormatError>;

    /// Visit every stored entry as `(row, col, value)`.  Duplicate
    /// entries (triplet format only) are visited individually.
    fn for_each_entry(&self, f: &mut dyn FnMut(usize, usize, T));

    /// Scatter row `i` into the dense vector `out`
    fn row_to_dense(&self, i: usize, out: &mut [T]);

    /// Scatter column `j` into the dense vector `out`
    fn col_to_dense(&self, j: usize, out: &mut [T]);

    /// Convert to compressed sparse column format, summing duplicates
    fn to_csc(&self) -> crate::algebra::CscMatrix<T>;
}
