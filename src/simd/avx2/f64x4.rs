//! AVX2 4-lane f64 vector wrapper.
//!
//! Double-precision sibling of [`super::f32x8::F32x8`], carrying the lanes
//! for the f64 arctangent kernel.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Sub};

use crate::simd::avx2::math::_mm256_atan_pd;
use crate::simd::traits::SimdVec;

/// Number of f64 elements in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// AVX2 SIMD vector containing 4 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x4 {
    /// Number of valid elements in the vector (1-4).
    pub size: usize,
    /// AVX2 256-bit register holding the lane values.
    pub elements: __m256d,
}

impl From<&[f64]> for F64x4 {
    fn from(slice: &[f64]) -> Self {
        debug_assert!(!slice.is_empty(), "data pointer can't be NULL");

        let size = slice.len();

        match slice.len().cmp(&LANE_COUNT) {
            std::cmp::Ordering::Less => unsafe { Self::load_partial(slice.as_ptr(), size) },
            std::cmp::Ordering::Equal | std::cmp::Ordering::Greater => unsafe {
                Self::load(slice.as_ptr(), LANE_COUNT)
            },
        }
    }
}

impl SimdVec<f64> for F64x4 {
    #[inline(always)]
    fn is_aligned(ptr: *const f64) -> bool {
        let ptr = ptr as usize;

        ptr % core::mem::align_of::<__m256d>() == 0
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64, size: usize) -> Self {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_load_pd(ptr),
            size: LANE_COUNT,
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f64) -> Self {
        Self {
            elements: _mm256_loadu_pd(ptr),
            size: LANE_COUNT,
        }
    }

    /// Loads fewer than 4 elements with `_mm256_maskload_pd`; lanes beyond
    /// `size` read as zero.
    #[inline(always)]
    unsafe fn load_partial(ptr: *const f64, size: usize) -> Self {
        debug_assert!(
            size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let mask = match size {
            1 => _mm256_setr_epi64x(-1, 0, 0, 0),
            2 => _mm256_setr_epi64x(-1, -1, 0, 0),
            3 => _mm256_setr_epi64x(-1, -1, -1, 0),
            _ => unreachable!(),
        };

        Self {
            elements: _mm256_maskload_pd(ptr, mask),
            size,
        }
    }

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(
            self.size <= LANE_COUNT,
            "{}",
            format!("Size must be <= {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => _mm256_store_pd(ptr, self.elements),
            false => _mm256_storeu_pd(ptr, self.elements),
        }
    }

    #[inline(always)]
    unsafe fn store_at_partial(&self, ptr: *mut f64) {
        debug_assert!(
            self.size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let mask = match self.size {
            1 => _mm256_setr_epi64x(-1, 0, 0, 0),
            2 => _mm256_setr_epi64x(-1, -1, 0, 0),
            3 => _mm256_setr_epi64x(-1, -1, -1, 0),
            _ => unreachable!(),
        };

        _mm256_maskstore_pd(ptr, mask, self.elements);
    }

    #[inline(always)]
    fn to_vec(self) -> Vec<f64> {
        let mut out = vec![0.0f64; LANE_COUNT];

        unsafe { _mm256_storeu_pd(out.as_mut_ptr(), self.elements) };
        out.truncate(self.size);

        out
    }
}

impl F64x4 {
    /// Element-wise arctangent.
    #[inline(always)]
    pub fn atan(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { _mm256_atan_pd(self.elements) },
        }
    }
}

impl Add for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self::Output {
        assert!(
            self.size == rhs.size,
            "Operands must have the same size (expected {} lanes, got {} and {})",
            LANE_COUNT,
            self.size,
            rhs.size
        );

        Self {
            size: self.size,
            elements: unsafe { _mm256_add_pd(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self::Output {
        assert!(
            self.size == rhs.size,
            "Operands must have the same size (expected {} lanes, got {} and {})",
            LANE_COUNT,
            self.size,
            rhs.size
        );

        Self {
            size: self.size,
            elements: unsafe { _mm256_sub_pd(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self::Output {
        assert!(
            self.size == rhs.size,
            "Operands must have the same size (expected {} lanes, got {} and {})",
            LANE_COUNT,
            self.size,
            rhs.size
        );

        Self {
            size: self.size,
            elements: unsafe { _mm256_mul_pd(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x4 {
    type Output = Self;

    #[inline(always)]
    fn div(self, rhs: Self) -> Self::Output {
        assert!(
            self.size == rhs.size,
            "Operands must have the same size (expected {} lanes, got {} and {})",
            LANE_COUNT,
            self.size,
            rhs.size
        );

        Self {
            size: self.size,
            elements: unsafe { _mm256_div_pd(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_and_roundtrip() {
        let data = [1.0f64, 2.0, 3.0, 4.0];
        let v = F64x4::from(data.as_slice());

        assert_eq!(v.size, LANE_COUNT);
        assert_eq!(v.to_vec(), data.to_vec());
    }

    #[test]
    fn load_partial_various_sizes() {
        let data = [1.0f64, 2.0, 3.0];

        for len in 1..LANE_COUNT {
            let v = unsafe { F64x4::load_partial(data.as_ptr(), len) };
            assert_eq!(v.size, len);
            assert_eq!(v.to_vec(), data[..len].to_vec());
        }
    }

    #[test]
    fn atan_matches_scalar() {
        let data = [0.0f64, 0.5, -1.0, 100.0];
        let v = F64x4::from(data.as_slice()).atan();

        for (x, y) in data.iter().zip(v.to_vec().iter()) {
            assert!((y - x.atan()).abs() < 1e-15, "atan({x}) = {y}");
        }
    }

    #[test]
    fn arithmetic_operators() {
        let a = F64x4::from([1.0f64; 4].as_slice());
        let b = F64x4::from([2.0f64; 4].as_slice());

        assert_eq!((a + b).to_vec(), vec![3.0; 4]);
        assert_eq!((a - b).to_vec(), vec![-1.0; 4]);
        assert_eq!((a * b).to_vec(), vec![2.0; 4]);
        assert_eq!((a / b).to_vec(), vec![0.5; 4]);
    }
}
