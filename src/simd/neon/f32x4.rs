//! NEON 4-lane f32 vector wrapper.
//!
//! `F32x4` wraps ARM's `float32x4_t` register together with the count of
//! valid lanes, so slices whose length is not a multiple of 4 can flow
//! through the same kernels via lane-wise partial loads and stores.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

use std::ops::{Add, Div, Mul, Sub};

use crate::simd::neon::math::{vatanq_f32, vcosq_f32, vsinq_f32};
use crate::simd::traits::SimdVec;

/// Number of f32 elements in a 128-bit register.
pub(crate) const LANE_COUNT: usize = 4;

/// NEON SIMD vector containing 4 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x4 {
    /// Number of valid elements in the vector (1-4).
    pub size: usize,
    /// NEON 128-bit register holding the lane values.
    pub elements: float32x4_t,
}

impl From<&[f32]> for F32x4 {
    /// Loads from a slice, selecting a lane-wise partial load when the slice
    /// holds fewer than 4 elements.
    fn from(slice: &[f32]) -> Self {
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

impl SimdVec<f32> for F32x4 {
    /// `vld1q` has no alignment requirement, so the aligned/unaligned split
    /// never applies on NEON.
    #[inline(always)]
    fn is_aligned(_ptr: *const f32) -> bool {
        unreachable!()
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        Self {
            elements: vld1q_f32(ptr),
            size,
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(_ptr: *const f32) -> Self {
        unreachable!()
    }

    #[inline(always)]
    unsafe fn load_unaligned(_ptr: *const f32) -> Self {
        unreachable!()
    }

    /// Loads fewer than 4 elements lane by lane; lanes beyond `size` read as
    /// zero.
    #[inline(always)]
    unsafe fn load_partial(ptr: *const f32, size: usize) -> Self {
        debug_assert!(
            size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let elements = match size {
            1 => {
                let v = vdupq_n_f32(0.0);
                vsetq_lane_f32(*ptr.add(0), v, 0)
            }
            2 => {
                let mut v = vdupq_n_f32(0.0);
                v = vsetq_lane_f32(*ptr.add(0), v, 0);
                vsetq_lane_f32(*ptr.add(1), v, 1)
            }
            3 => {
                let mut v = vdupq_n_f32(0.0);
                v = vsetq_lane_f32(*ptr.add(0), v, 0);
                v = vsetq_lane_f32(*ptr.add(1), v, 1);
                vsetq_lane_f32(*ptr.add(2), v, 2)
            }
            _ => unreachable!(),
        };

        Self { elements, size }
    }

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(
            self.size <= LANE_COUNT,
            "{}",
            format!("Size must be <= {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        vst1q_f32(ptr, self.elements);
    }

    /// Stores only the valid lanes, using a 64-bit store for the low pair
    /// and lane extracts for the rest.
    #[inline(always)]
    unsafe fn store_at_partial(&self, ptr: *mut f32) {
        debug_assert!(
            self.size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match self.size {
            3 => {
                vst1_f32(ptr, vget_low_f32(self.elements));
                *ptr.add(2) = vgetq_lane_f32(self.elements, 2);
            }
            2 => {
                vst1_f32(ptr, vget_low_f32(self.elements));
            }
            1 => {
                *ptr = vgetq_lane_f32(self.elements, 0);
            }
            _ => unreachable!(),
        }
    }

    #[inline(always)]
    fn to_vec(self) -> Vec<f32> {
        let mut out = vec![0.0f32; LANE_COUNT];

        unsafe { vst1q_f32(out.as_mut_ptr(), self.elements) };
        out.truncate(self.size);

        out
    }
}

impl F32x4 {
    /// Element-wise cosine.
    #[inline(always)]
    pub fn cos(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { vcosq_f32(self.elements) },
        }
    }

    /// Element-wise sine.
    #[inline(always)]
    pub fn sin(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { vsinq_f32(self.elements) },
        }
    }

    /// Element-wise arctangent.
    #[inline(always)]
    pub fn atan(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { vatanq_f32(self.elements) },
        }
    }
}

impl Add for F32x4 {
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
            elements: unsafe { vaddq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F32x4 {
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
            elements: unsafe { vsubq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x4 {
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
            elements: unsafe { vmulq_f32(self.elements, rhs.elements) },
        }
    }
}

impl Div for F32x4 {
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
            elements: unsafe { vdivq_f32(self.elements, rhs.elements) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_full_and_roundtrip() {
        let data = [1.0f32, 2.0, 3.0, 4.0];
        let v = F32x4::from(data.as_slice());

        assert_eq!(v.size, LANE_COUNT);
        assert_eq!(v.to_vec(), data.to_vec());
    }

    #[test]
    fn load_partial_various_sizes() {
        let data = [1.0f32, 2.0, 3.0];

        for len in 1..LANE_COUNT {
            let v = unsafe { F32x4::load_partial(data.as_ptr(), len) };
            assert_eq!(v.size, len);
            assert_eq!(v.to_vec(), data[..len].to_vec());
        }
    }

    #[test]
    fn store_at_partial_writes_only_valid_lanes() {
        let data = [1.0f32, 2.0, 3.0];
        let v = unsafe { F32x4::load_partial(data.as_ptr(), 3) };

        let mut out = [9.0f32; 4];
        unsafe { v.store_at_partial(out.as_mut_ptr()) };

        assert_eq!(&out[..3], &data);
        assert_eq!(out[3], 9.0);
    }

    #[test]
    fn cos_matches_scalar() {
        let data = [0.0f32, 0.5, -1.0, 10.0];
        let v = F32x4::from(data.as_slice()).cos();

        for (x, y) in data.iter().zip(v.to_vec().iter()) {
            assert!((y - x.cos()).abs() < 1e-6, "cos({x}) = {y}");
        }
    }

    #[test]
    fn atan_matches_scalar() {
        let data = [0.0f32, 0.5, -1.0, 100.0];
        let v = F32x4::from(data.as_slice()).atan();

        for (x, y) in data.iter().zip(v.to_vec().iter()) {
            assert!((y - x.atan()).abs() < 1e-6, "atan({x}) = {y}");
        }
    }

    #[test]
    fn arithmetic_operators() {
        let a = F32x4::from([1.0f32; 4].as_slice());
        let b = F32x4::from([2.0f32; 4].as_slice());

        assert_eq!((a + b).to_vec(), vec![3.0; 4]);
        assert_eq!((a - b).to_vec(), vec![-1.0; 4]);
        assert_eq!((a * b).to_vec(), vec![2.0; 4]);
        assert_eq!((a / b).to_vec(), vec![0.5; 4]);
    }
}
