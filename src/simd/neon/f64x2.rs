//! NEON 2-lane f64 vector wrapper.
//!
//! Double-precision sibling of [`super::f32x4::F32x4`], carrying the lanes
//! for the f64 arctangent kernel.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Add, Div, Mul, Sub};

use crate::simd::neon::math::vatanq_f64;
use crate::simd::traits::SimdVec;

/// Number of f64 elements in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 2;

/// NEON SIMD vector containing 2 packed f64 values.
#[derive(Copy, Clone, Debug)]
pub struct F64x2 {
    /// Number of valid elements in the vector (1-2).
    pub size: usize,
    /// NEON 128-bit register holding the lane values.
    pub elements: float64x2_t,
}

impl From<&[f64]> for F64x2 {
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

impl SimdVec<f64> for F64x2 {
    /// `vld1q` has no alignment requirement, so the aligned/unaligned split
    /// never applies on NEON.
    #[inline(always)]
    fn is_aligned(_ptr: *const f64) -> bool {
        unreachable!()
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f64, size: usize) -> Self {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: vld1q_f64(ptr),
            size,
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(_ptr: *const f64) -> Self {
        unreachable!()
    }

    #[inline(always)]
    unsafe fn load_unaligned(_ptr: *const f64) -> Self {
        unreachable!()
    }

    /// Loads a single element; the upper lane reads as zero.
    #[inline(always)]
    unsafe fn load_partial(ptr: *const f64, size: usize) -> Self {
        debug_assert!(
            size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let elements = match size {
            1 => vsetq_lane_f64(*ptr.add(0), vdupq_n_f64(0.0), 0),
            _ => unreachable!(),
        };

        Self { elements, size }
    }

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f64) {
        debug_assert!(
            self.size <= LANE_COUNT,
            "{}",
            format!("Size must be <= {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        vst1q_f64(ptr, self.elements);
    }

    #[inline(always)]
    unsafe fn store_at_partial(&self, ptr: *mut f64) {
        debug_assert!(
            self.size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match self.size {
            1 => {
                *ptr = vgetq_lane_f64(self.elements, 0);
            }
            _ => unreachable!(),
        }
    }

    #[inline(always)]
    fn to_vec(self) -> Vec<f64> {
        let mut out = vec![0.0f64; LANE_COUNT];

        unsafe { vst1q_f64(out.as_mut_ptr(), self.elements) };
        out.truncate(self.size);

        out
    }
}

impl F64x2 {
    /// Element-wise arctangent.
    #[inline(always)]
    pub fn atan(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { vatanq_f64(self.elements) },
        }
    }
}

impl Add for F64x2 {
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
            elements: unsafe { vaddq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F64x2 {
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
            elements: unsafe { vsubq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F64x2 {
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
            elements: unsafe { vmulq_f64(self.elements, rhs.elements) },
        }
    }
}

impl Div for F64x2 {
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
            elements: unsafe { vdivq_f64(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_and_roundtrip() {
        let data = [1.0f64, 2.0];
        let v = F64x2::from(data.as_slice());

        assert_eq!(v.size, LANE_COUNT);
        assert_eq!(v.to_vec(), data.to_vec());
    }

    #[test]
    fn load_partial_single_lane() {
        let data = [7.0f64];
        let v = unsafe { F64x2::load_partial(data.as_ptr(), 1) };

        assert_eq!(v.size, 1);
        assert_eq!(v.to_vec(), vec![7.0]);
    }

    #[test]
    fn atan_matches_scalar() {
        let data = [0.5f64, -100.0];
        let v = F64x2::from(data.as_slice()).atan();

        for (x, y) in data.iter().zip(v.to_vec().iter()) {
            assert!((y - x.atan()).abs() < 1e-15, "atan({x}) = {y}");
        }
    }

    #[test]
    fn arithmetic_operators() {
        let a = F64x2::from([1.0f64; 2].as_slice());
        let b = F64x2::from([2.0f64; 2].as_slice());

        assert_eq!((a + b).to_vec(), vec![3.0; 2]);
        assert_eq!((a - b).to_vec(), vec![-1.0; 2]);
        assert_eq!((a * b).to_vec(), vec![2.0; 2]);
        assert_eq!((a / b).to_vec(), vec![0.5; 2]);
    }
}
