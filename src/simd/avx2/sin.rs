use rayon::{
    iter::{IndexedParallelIterator, ParallelIterator},
    slice::ParallelSliceMut,
};

use crate::simd::{
    avx2::f32x8::{self, F32x8},
    avx2::AVX_ALIGNMENT,
    traits::{SimdSin, SimdVec},
    utils::alloc_uninit_vec,
};

#[inline(always)]
fn scalar_sin(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    a.iter().map(|x| x.sin()).collect()
}

#[target_feature(enable = "avx,avx2,fma")]
fn simd_sin(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, AVX_ALIGNMENT);

    let step = f32x8::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    for i in (0..nb_lanes).step_by(step) {
        simd_sin_block(&a[i], &mut c[i]);
    }

    if rem_lanes > 0 {
        simd_sin_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

#[inline(always)]
fn simd_sin_block(a: *const f32, c: *mut f32) {
    let a_chunk_simd = unsafe { F32x8::load(a, f32x8::LANE_COUNT) };
    unsafe { a_chunk_simd.sin().store_at(c) };
}

#[inline(always)]
fn simd_sin_partial_block(a: *const f32, c: *mut f32, size: usize) {
    let a_chunk_simd = unsafe { F32x8::load_partial(a, size) };
    unsafe { a_chunk_simd.sin().store_at_partial(c) };
}

#[target_feature(enable = "avx,avx2,fma")]
fn parallel_simd_sin(a: &[f32]) -> Vec<f32> {
    assert!(!a.is_empty(), "Size can't be empty (size zero)");

    let size = a.len();

    let mut c = alloc_uninit_vec::<f32>(size, AVX_ALIGNMENT);

    let step = f32x8::LANE_COUNT;

    let nb_lanes = size - (size % step);
    let rem_lanes = size - nb_lanes;

    c.par_chunks_exact_mut(step)
        .enumerate()
        .for_each(|(i, c_chunk)| {
            simd_sin_block(&a[i * step], &mut c_chunk[0]);
        });

    if rem_lanes > 0 {
        simd_sin_partial_block(&a[nb_lanes], &mut c[nb_lanes], rem_lanes);
    }

    c
}

impl SimdSin<&[f32]> for &[f32] {
    type Output = Vec<f32>;

    #[inline(always)]
    fn simd_sin(self) -> Self::Output {
        unsafe { simd_sin(self) }
    }

    #[inline(always)]
    fn par_simd_sin(self) -> Self::Output {
        unsafe { parallel_simd_sin(self) }
    }

    #[inline(always)]
    fn scalar_sin(self) -> Self::Output {
        scalar_sin(self)
    }
}
