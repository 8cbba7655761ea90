//! Precision tests for the vectorized sine against the scalar reference.

#![cfg(any(avx2, neon))]

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use vectrig::simd::traits::SimdSin;

/// Signed ULP distance between two finite f32 values.
fn ulp_distance(a: f32, b: f32) -> i64 {
    fn ordered_bits(x: f32) -> i64 {
        let b = x.to_bits();
        if b & 0x8000_0000 != 0 {
            -((b & 0x7fff_ffff) as i64)
        } else {
            b as i64
        }
    }

    (ordered_bits(a) - ordered_bits(b)).abs()
}

#[test]
fn sine_matches_scalar_within_ulp_bound() {
    let mut rng = StdRng::seed_from_u64(12345);

    let inputs: Vec<f32> = (0..100_000)
        .map(|_| rng.random_range(-4.0 * PI..=4.0 * PI))
        .collect();

    let scalar = inputs.as_slice().scalar_sin();
    let simd = inputs.as_slice().simd_sin();

    let mut max_ulp = 0i64;
    for ((&x, &expected), &actual) in inputs.iter().zip(scalar.iter()).zip(simd.iter()) {
        let ulp = ulp_distance(actual, expected);
        max_ulp = max_ulp.max(ulp);
        assert!(ulp <= 3, "sin({x}) = {actual}, expected {expected} ({ulp} ULP)");
    }

    println!("max sine error over {} samples: {max_ulp} ULP", inputs.len());
}

#[test]
fn sine_large_arguments_within_reduction_range() {
    let mut rng = StdRng::seed_from_u64(99);

    let inputs: Vec<f32> = (0..100_000)
        .map(|_| rng.random_range(-1048576.0f32..1048576.0))
        .collect();

    let scalar = inputs.as_slice().scalar_sin();
    let simd = inputs.as_slice().simd_sin();

    for ((&x, &expected), &actual) in inputs.iter().zip(scalar.iter()).zip(simd.iter()) {
        let ulp = ulp_distance(actual, expected);
        assert!(ulp <= 3, "sin({x}) = {actual}, expected {expected} ({ulp} ULP)");
    }
}

#[test]
fn sine_near_quadrant_boundaries() {
    let mut inputs = Vec::new();
    for n in -64i32..=64 {
        let q = n as f32 * FRAC_PI_2;
        inputs.extend_from_slice(&[q, q + 1e-4, q - 1e-4]);
    }

    let scalar = inputs.as_slice().scalar_sin();
    let simd = inputs.as_slice().simd_sin();

    for ((&x, &expected), &actual) in inputs.iter().zip(scalar.iter()).zip(simd.iter()) {
        assert!(
            ulp_distance(actual, expected) <= 3 || (actual - expected).abs() < 1e-6,
            "sin({x}) = {actual}, expected {expected}"
        );
    }
}

#[test]
fn sine_preserves_signed_zero() {
    let inputs = vec![0.0f32, -0.0, 0.0, -0.0];
    let simd = inputs.as_slice().simd_sin();

    assert_eq!(simd[0].to_bits(), 0.0f32.to_bits());
    assert_eq!(simd[1].to_bits(), (-0.0f32).to_bits());
}

#[test]
fn sine_is_odd() {
    let mut rng = StdRng::seed_from_u64(7);

    let inputs: Vec<f32> = (0..4096).map(|_| rng.random_range(-100.0f32..100.0)).collect();
    let negated: Vec<f32> = inputs.iter().map(|x| -x).collect();

    let pos = inputs.as_slice().simd_sin();
    let neg = negated.as_slice().simd_sin();

    for ((&x, &a), &b) in inputs.iter().zip(pos.iter()).zip(neg.iter()) {
        assert_eq!(a.to_bits(), (-b).to_bits(), "sin({x}) != -sin({})", -x);
    }
}

#[test]
fn sine_out_of_range_inputs_are_bit_exact() {
    let inputs = vec![
        1048576.0f32,
        -2097152.0,
        1e30,
        f32::INFINITY,
        f32::NEG_INFINITY,
        f32::NAN,
        0.25,
        -0.25,
    ];

    let simd = inputs.as_slice().simd_sin();

    for (&x, &actual) in inputs.iter().zip(simd.iter()) {
        let expected = x.sin();
        if x.abs() >= 1048576.0 || !x.is_finite() {
            assert_eq!(
                actual.to_bits(),
                expected.to_bits(),
                "flagged lane sin({x}) must match the scalar reference bit-exactly"
            );
        } else {
            assert!(
                ulp_distance(actual, expected) <= 3,
                "sin({x}) = {actual}, expected {expected}"
            );
        }
    }
}

#[test]
fn parallel_sine_matches_sequential() {
    let mut rng = StdRng::seed_from_u64(2024);

    let inputs: Vec<f32> = (0..10_007).map(|_| rng.random_range(-TAU..TAU)).collect();

    let sequential = inputs.as_slice().simd_sin();
    let parallel = inputs.as_slice().par_simd_sin();

    assert_eq!(sequential.len(), parallel.len());
    for (i, (&a, &b)) in sequential.iter().zip(parallel.iter()).enumerate() {
        assert_eq!(a.to_bits(), b.to_bits(), "lane {i} diverged");
    }
}

#[test]
fn sine_handles_lengths_around_lane_count() {
    for len in 1..=33 {
        let inputs: Vec<f32> = (0..len).map(|i| i as f32 * 0.37 - 3.0).collect();

        let scalar = inputs.as_slice().scalar_sin();
        let simd = inputs.as_slice().simd_sin();

        assert_eq!(simd.len(), len);
        for ((&x, &expected), &actual) in inputs.iter().zip(scalar.iter()).zip(simd.iter()) {
            assert!(
                ulp_distance(actual, expected) <= 3,
                "len {len}: sin({x}) = {actual}, expected {expected}"
            );
        }
    }
}

/// Raw access to the accrued floating-point exception flags.
#[cfg(all(feature = "strict-fenv", any(target_arch = "x86_64", target_arch = "aarch64")))]
mod fenv {
    #[cfg(target_arch = "x86_64")]
    pub fn clear_flags() {
        unsafe {
            let mut csr: u32 = 0;
            std::arch::asm!("stmxcsr [{}]", in(reg) &mut csr as *mut u32, options(nostack));
            csr &= !0x3f;
            std::arch::asm!("ldmxcsr [{}]", in(reg) &csr as *const u32, options(nostack));
        }
    }

    /// Low six MXCSR bits: invalid, denormal, divide-by-zero, overflow,
    /// underflow, inexact.
    #[cfg(target_arch = "x86_64")]
    pub fn read_flags() -> u32 {
        let mut csr: u32 = 0;
        unsafe {
            std::arch::asm!("stmxcsr [{}]", in(reg) &mut csr as *mut u32, options(nostack));
        }
        csr & 0x3f
    }

    #[cfg(target_arch = "aarch64")]
    pub fn clear_flags() {
        unsafe {
            std::arch::asm!("msr fpsr, xzr", options(nomem, nostack));
        }
    }

    /// FPSR cumulative bits: IOC, DZC, OFC, UFC, IXC, IDC.
    #[cfg(target_arch = "aarch64")]
    pub fn read_flags() -> u32 {
        let fpsr: u64;
        unsafe {
            std::arch::asm!("mrs {}, fpsr", out(reg) fpsr, options(nomem, nostack));
        }
        (fpsr as u32) & 0x9f
    }
}

#[cfg(all(feature = "strict-fenv", any(target_arch = "x86_64", target_arch = "aarch64")))]
#[test]
fn sine_strict_fenv_tiny_inputs_match_scalar_flags() {
    // Every block holds a lane below 2^-12 or above 2^20, so the whole
    // vector takes the scalar path; both the results and the accrued
    // exception flags must be identical to a pure scalar run.
    let tiny = f32::from_bits(0x2680_0000); // 0x1p-50
    let inputs = vec![
        tiny,
        0.5,
        -0.25,
        f32::from_bits(0x3900_0000), // 0x1p-13
        f32::INFINITY,
        -tiny,
        1.0,
        2097152.0, // 0x1p21
    ];

    fenv::clear_flags();
    let scalar = inputs.as_slice().scalar_sin();
    let scalar_flags = fenv::read_flags();

    fenv::clear_flags();
    let simd = inputs.as_slice().simd_sin();
    let simd_flags = fenv::read_flags();

    assert_eq!(
        simd_flags, scalar_flags,
        "accrued exception flags diverged: {simd_flags:#08b} vs scalar {scalar_flags:#08b}"
    );
    for ((&x, &expected), &actual) in inputs.iter().zip(scalar.iter()).zip(simd.iter()) {
        assert_eq!(actual.to_bits(), expected.to_bits(), "sin({x})");
    }
}

#[test]
#[should_panic(expected = "Size can't be empty")]
fn sine_rejects_empty_input() {
    let empty: &[f32] = &[];
    let _ = empty.simd_sin();
}
