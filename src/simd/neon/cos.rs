use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::simd::{
    neon::f32x4::{self, F32x4},
    neon::NEON_ALIGNMENT,
    traits::{SimdCos, SimdVec},
    utils::alloc_uninit_vec,
};

#[inline(always)]
fn scalar_cos(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.iter().map(|x| x.cos()).collect()
}

#[target_feature(enable = "neon")]
fn simd_cos(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, NEON_ALIGNMENT);

    let step = f32x4::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    for i in (0..nb_lanes).step_by(step) {
        simd_cos_block(&a[i], &mut c[i]);
    }

    if rem_lanes > 0 {
        simd_cos_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

#[inline(always)]
fn simd_cos_block(a: *const f32, c: *mut f32) {
    let a_chunk_simd = unsafe { F32x4::load(a, f32x4::LANE_COUNT) };
    unsafe { a_chunk_simd.cos().store_at(c) };
}

#[inline(always)]
fn simd_cos_partial_block(a: *const f32, c: *mut f32, size: usize) {
    let a_chunk_simd = unsafe { F32x4::load_partial(a, size) };
    unsafe { a_chunk_simd.cos().store_at_partial(c) };
}

#[target_feature(enable = "neon")]
fn parallel_simd_cos(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, NEON_ALIGNMENT);

    let step = f32x4::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    c.par_chunks_exact_mut(step)
        .enumerate()
        .for_each(|(i, c_chunk)| {
            simd_cos_block(&a[i * step], &mut c_chunk[0]);
        });

    if rem_lanes > 0 {
        simd_cos_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

impl SimdCos<&[f32]> for &[f32] {
    type Output = Vec<f32>;

    #[inline(always)]
    fn simd_cos(self) -> Self::Output {
        unsafe { simd_cos(self) }
    }

    #[inline(always)]
    fn par_simd_cos(self) -> Self::Output {
        unsafe { parallel_simd_cos(self) }
    }

    #[inline(always)]
    fn scalar_cos(self) -> Self::Output {
        scalar_cos(self)
    }
}
