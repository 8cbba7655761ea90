use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::simd::{
    neon::f32x4::{self, F32x4},
    neon::f64x2::{self, F64x2},
    neon::NEON_ALIGNMENT,
    traits::{SimdAtan, SimdVec},
    utils::alloc_uninit_vec,
};

#[inline(always)]
fn scalar_atan_f32(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.iter().map(|x| x.atan()).collect()
}

#[target_feature(enable = "neon")]
fn simd_atan_f32(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, NEON_ALIGNMENT);

    let step = f32x4::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    for i in (0..nb_lanes).step_by(step) {
        simd_atan_f32_block(&a[i], &mut c[i]);
    }

    if rem_lanes > 0 {
        simd_atan_f32_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

#[inline(always)]
fn simd_atan_f32_block(a: *const f32, c: *mut f32) {
    let a_chunk_simd = unsafe { F32x4::load(a, f32x4::LANE_COUNT) };
    unsafe { a_chunk_simd.atan().store_at(c) };
}

#[inline(always)]
fn simd_atan_f32_partial_block(a: *const f32, c: *mut f32, size: usize) {
    let a_chunk_simd = unsafe { F32x4::load_partial(a, size) };
    unsafe { a_chunk_simd.atan().store_at_partial(c) };
}

#[target_feature(enable = "neon")]
fn parallel_simd_atan_f32(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, NEON_ALIGNMENT);

    let step = f32x4::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    c.par_chunks_exact_mut(step)
        .enumerate()
        .for_each(|(i, c_chunk)| {
            simd_atan_f32_block(&a[i * step], &mut c_chunk[0]);
        });

    if rem_lanes > 0 {
        simd_atan_f32_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

impl SimdAtan<&[f32]> for &[f32] {
    type Output = Vec<f32>;

    #[inline(always)]
    fn simd_atan(self) -> Self::Output {
        unsafe { simd_atan_f32(self) }
    }

    #[inline(always)]
    fn par_simd_atan(self) -> Self::Output {
        unsafe { parallel_simd_atan_f32(self) }
    }

    #[inline(always)]
    fn scalar_atan(self) -> Self::Output {
        scalar_atan_f32(self)
    }
}

#[inline(always)]
fn scalar_atan_f64(a: &[f64]) -> Vec<f64> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.iter().map(|x| x.atan()).collect()
}

#[target_feature(enable = "neon")]
fn simd_atan_f64(a: &[f64]) -> Vec<f64> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f64>(size, NEON_ALIGNMENT);

    let step = f64x2::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    for i in (0..nb_lanes).step_by(step) {
        simd_atan_f64_block(&a[i], &mut c[i]);
    }

    if rem_lanes > 0 {
        simd_atan_f64_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

#[inline(always)]
fn simd_atan_f64_block(a: *const f64, c: *mut f64) {
    let a_chunk_simd = unsafe { F64x2::load(a, f64x2::LANE_COUNT) };
    unsafe { a_chunk_simd.atan().store_at(c) };
}

#[inline(always)]
fn simd_atan_f64_partial_block(a: *const f64, c: *mut f64, size: usize) {
    let a_chunk_simd = unsafe { F64x2::load_partial(a, size) };
    unsafe { a_chunk_simd.atan().store_at_partial(c) };
}

#[target_feature(enable = "neon")]
fn parallel_simd_atan_f64(a: &[f64]) -> Vec<f64> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f64>(size, NEON_ALIGNMENT);

    let step = f64x2::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    c.par_chunks_exact_mut(step)
        .enumerate()
        .for_each(|(i, c_chunk)| {
            simd_atan_f64_block(&a[i * step], &mut c_chunk[0]);
        });

    if rem_lanes > 0 {
        simd_atan_f64_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

impl SimdAtan<&[f64]> for &[f64] {
    type Output = Vec<f64>;

    #[inline(always)]
    fn simd_atan(self) -> Self::Output {
        unsafe { simd_atan_f64(self) }
    }

    #[inline(always)]
    fn par_simd_atan(self) -> Self::Output {
        unsafe { parallel_simd_atan_f64(self) }
    }

    #[inline(always)]
    fn scalar_atan(self) -> Self::Output {
        scalar_atan_f64(self)
    }
}
