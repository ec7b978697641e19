use std::num::NonZeroI32;

use crate::KernelError;

const SHARPEN_DIVISOR: NonZeroI32 = match NonZeroI32::new(4) {
    Some(divisor) => divisor,
    None => panic!("divisor must not be zero"),
};

/// Biggest supported dimension of kernel. Sum of products of a window
/// with this size always fits into `i32`.
pub const MAX_KERNEL_DIM: usize = 255;

/// Square convolution matrix with odd dimension and a non-zero divisor.
///
/// Weights are stored once, row-major (top-to-bottom, left-to-right).
/// The same storage serves as 2-D matrix for the software path
/// and as flattened sequence for uploading into the shared memory
/// of the accelerated runtime.
///
/// # Examples
///
/// ```
/// use frame_convolve::Kernel;
///
/// let kernel = Kernel::new(&[[0, -1, 0], [-1, 5, -1], [0, -1, 0]], 1).unwrap();
/// assert_eq!(kernel.dim(), 3);
/// assert_eq!(kernel.get(1, 1), 5);
/// assert_eq!(kernel.flat(), &[0, -1, 0, -1, 5, -1, 0, -1, 0]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kernel {
    dim: usize,
    weights: Vec<i8>,
    divisor: NonZeroI32,
}

impl Kernel {
    /// Creates kernel from rows of 2-D matrix.
    pub fn new<R: AsRef<[i8]>>(rows: &[R], divisor: i32) -> Result<Self, KernelError> {
        let dim = rows.len();
        if dim == 0 {
            return Err(KernelError::Empty);
        }
        if rows.iter().any(|row| row.as_ref().len() != dim) {
            return Err(KernelError::NotSquare);
        }
        let weights = rows
            .iter()
            .flat_map(|row| row.as_ref().iter().copied())
            .collect();
        Self::from_flat(dim, weights, divisor)
    }

    /// Creates kernel from row-major flattened weights.
    pub fn from_flat(dim: usize, weights: Vec<i8>, divisor: i32) -> Result<Self, KernelError> {
        if dim == 0 {
            return Err(KernelError::Empty);
        }
        if dim % 2 == 0 {
            return Err(KernelError::EvenDimension(dim));
        }
        if dim > MAX_KERNEL_DIM {
            return Err(KernelError::TooLarge(dim));
        }
        if weights.len() != dim * dim {
            return Err(KernelError::NotSquare);
        }
        let divisor = NonZeroI32::new(divisor).ok_or(KernelError::ZeroDivisor)?;
        Ok(Self {
            dim,
            weights,
            divisor,
        })
    }

    /// Sharpen-like kernel used by default:
    ///
    /// ```text
    /// -1 -1  1
    /// -1 14 -1
    ///  1 -1 -1
    /// ```
    ///
    /// with divisor 4.
    pub fn sharpen() -> Self {
        Self {
            dim: 3,
            weights: vec![-1, -1, 1, -1, 14, -1, 1, -1, -1],
            divisor: SHARPEN_DIVISOR,
        }
    }

    /// Kernel with 1 in the center and 0 elsewhere, divisor is 1.
    pub fn identity(dim: usize) -> Result<Self, KernelError> {
        let mut weights = vec![0; dim * dim];
        if let Some(center) = weights.get_mut(dim * dim / 2) {
            *center = 1;
        }
        Self::from_flat(dim, weights, 1)
    }

    #[inline(always)]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Width of the frame border that is not touched by the filter.
    #[inline(always)]
    pub fn half(&self) -> usize {
        self.dim / 2
    }

    #[inline(always)]
    pub fn divisor(&self) -> i32 {
        self.divisor.get()
    }

    #[inline(always)]
    pub(crate) fn non_zero_divisor(&self) -> NonZeroI32 {
        self.divisor
    }

    /// Weight in the given row and column.
    ///
    /// # Panics
    /// Panics if `row` or `col` is not less than `dim()`.
    #[inline(always)]
    pub fn get(&self, row: usize, col: usize) -> i8 {
        assert!(col < self.dim, "column {col} is out of kernel");
        self.weights[row * self.dim + col]
    }

    /// Iterator over rows of the matrix, from top to bottom.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[i8]> {
        self.weights.chunks_exact(self.dim)
    }

    /// Row-major flattened weights.
    #[inline(always)]
    pub fn flat(&self) -> &[i8] {
        &self.weights
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::sharpen()
    }
}
