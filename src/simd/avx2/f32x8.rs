//! AVX2 8-lane f32 vector wrapper.
//!
//! `F32x8` wraps Intel's `__m256` register together with the count of valid
//! lanes, so slices whose length is not a multiple of 8 can flow through the
//! same kernels via masked partial loads and stores.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use std::ops::{Add, Div, Mul, Sub};

use crate::simd::avx2::math::{_mm256_atan_ps, _mm256_cos_ps, _mm256_sin_ps};
use crate::simd::traits::SimdVec;

/// Number of f32 elements in a 256-bit register.
pub(crate) const LANE_COUNT: usize = 8;

/// AVX2 SIMD vector containing 8 packed f32 values.
#[derive(Copy, Clone, Debug)]
pub struct F32x8 {
    /// Number of valid elements in the vector (1-8).
    pub size: usize,
    /// AVX2 256-bit register holding the lane values.
    pub elements: __m256,
}

impl From<&[f32]> for F32x8 {
    /// Loads from a slice, selecting a masked partial load when the slice
    /// holds fewer than 8 elements.
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

impl SimdVec<f32> for F32x8 {
    #[inline(always)]
    fn is_aligned(ptr: *const f32) -> bool {
        let ptr = ptr as usize;

        ptr % core::mem::align_of::<__m256>() == 0
    }

    #[inline(always)]
    unsafe fn load(ptr: *const f32, size: usize) -> Self {
        debug_assert!(size == LANE_COUNT, "Size must be == {LANE_COUNT}");
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => unsafe { Self::load_aligned(ptr) },
            false => unsafe { Self::load_unaligned(ptr) },
        }
    }

    #[inline(always)]
    unsafe fn load_aligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_load_ps(ptr),
            size: LANE_COUNT,
        }
    }

    #[inline(always)]
    unsafe fn load_unaligned(ptr: *const f32) -> Self {
        Self {
            elements: _mm256_loadu_ps(ptr),
            size: LANE_COUNT,
        }
    }

    /// Loads fewer than 8 elements with `_mm256_maskload_ps`; lanes beyond
    /// `size` read as zero.
    #[inline(always)]
    unsafe fn load_partial(ptr: *const f32, size: usize) -> Self {
        debug_assert!(
            size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let mask = match size {
            1 => _mm256_setr_epi32(-1, 0, 0, 0, 0, 0, 0, 0),
            2 => _mm256_setr_epi32(-1, -1, 0, 0, 0, 0, 0, 0),
            3 => _mm256_setr_epi32(-1, -1, -1, 0, 0, 0, 0, 0),
            4 => _mm256_setr_epi32(-1, -1, -1, -1, 0, 0, 0, 0),
            5 => _mm256_setr_epi32(-1, -1, -1, -1, -1, 0, 0, 0),
            6 => _mm256_setr_epi32(-1, -1, -1, -1, -1, -1, 0, 0),
            7 => _mm256_setr_epi32(-1, -1, -1, -1, -1, -1, -1, 0),
            _ => unreachable!(),
        };

        Self {
            elements: _mm256_maskload_ps(ptr, mask),
            size,
        }
    }

    #[inline(always)]
    unsafe fn store_at(&self, ptr: *mut f32) {
        debug_assert!(
            self.size <= LANE_COUNT,
            "{}",
            format!("Size must be <= {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        match Self::is_aligned(ptr) {
            true => _mm256_store_ps(ptr, self.elements),
            false => _mm256_storeu_ps(ptr, self.elements),
        }
    }

    /// Stores only the valid lanes with `_mm256_maskstore_ps`.
    #[inline(always)]
    unsafe fn store_at_partial(&self, ptr: *mut f32) {
        debug_assert!(
            self.size < LANE_COUNT,
            "{}",
            format!("Size must be < {LANE_COUNT}")
        );
        debug_assert!(!ptr.is_null(), "Pointer must not be null");

        let mask = match self.size {
            1 => _mm256_setr_epi32(-1, 0, 0, 0, 0, 0, 0, 0),
            2 => _mm256_setr_epi32(-1, -1, 0, 0, 0, 0, 0, 0),
            3 => _mm256_setr_epi32(-1, -1, -1, 0, 0, 0, 0, 0),
            4 => _mm256_setr_epi32(-1, -1, -1, -1, 0, 0, 0, 0),
            5 => _mm256_setr_epi32(-1, -1, -1, -1, -1, 0, 0, 0),
            6 => _mm256_setr_epi32(-1, -1, -1, -1, -1, -1, 0, 0),
            7 => _mm256_setr_epi32(-1, -1, -1, -1, -1, -1, -1, 0),
            _ => unreachable!(),
        };

        _mm256_maskstore_ps(ptr, mask, self.elements);
    }

    #[inline(always)]
    fn to_vec(self) -> Vec<f32> {
        let mut out = vec![0.0f32; LANE_COUNT];

        unsafe { _mm256_storeu_ps(out.as_mut_ptr(), self.elements) };
        out.truncate(self.size);

        out
    }
}

impl F32x8 {
    /// Element-wise cosine.
    #[inline(always)]
    pub fn cos(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { _mm256_cos_ps(self.elements) },
        }
    }

    /// Element-wise sine.
    #[inline(always)]
    pub fn sin(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { _mm256_sin_ps(self.elements) },
        }
    }

    /// Element-wise arctangent.
    #[inline(always)]
    pub fn atan(&self) -> Self {
        Self {
            size: self.size,
            elements: unsafe { _mm256_atan_ps(self.elements) },
        }
    }
}

impl Add for F32x8 {
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
            elements: unsafe { _mm256_add_ps(self.elements, rhs.elements) },
        }
    }
}

impl Sub for F32x8 {
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
            elements: unsafe { _mm256_sub_ps(self.elements, rhs.elements) },
        }
    }
}

impl Mul for F32x8 {
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
            elements: unsafe { _mm256_mul_ps(self.elements, rhs.elements) },
        }
    }
}

impl Div for F32x8 {
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
            elements: unsafe { _mm256_div_ps(self.elements, rhs.elements) },
        }
    }
}
