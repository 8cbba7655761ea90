//! Vectorized elementary transcendental functions with bounded ULP error.
//!
//! Each function is implemented as a stateless SIMD kernel built from four
//! stages: range reduction of the input into a small canonical interval,
//! a fused multiply-add ladder over precomputed minimax coefficients,
//! reconstruction of the full-domain value from the reduced result and a
//! per-lane branch selector, and a lane-granular fallback that routes inputs
//! outside the fast path's validated domain to the scalar reference
//! implementation in the standard library.
//!
//! Kernels are selected per instruction set at build time (`build.rs` probes
//! the host CPU); there is no runtime dispatch. Public entry points are the
//! slice-level traits [`simd::traits::SimdCos`], [`simd::traits::SimdSin`]
//! and [`simd::traits::SimdAtan`], each offering sequential SIMD, rayon
//! parallel SIMD and scalar reference variants.
//!
//! # Accuracy
//!
//! Results are accurate to within a small number of units in the last place
//! (ULP) over each function's declared fast-path domain; lanes outside that
//! domain return the scalar reference result bit-exactly. See the per-kernel
//! documentation in `simd::avx2::math` / `simd::neon::math` for the declared
//! budgets and bounds.
//!
//! # Floating-point exception fidelity
//!
//! With the `strict-fenv` cargo feature enabled, the special-lane check runs
//! before any vector arithmetic, and any flagged lane routes the whole vector
//! through the scalar reference, so hardware exception flags match a pure
//! scalar execution; for cos/sin the flagged set also includes |x| < 2⁻¹²,
//! where the vector ladder would raise flags the scalar reference does not.
//! Without the feature, flagged lanes are merged individually and unflagged
//! lanes keep the fast-path result.

pub mod simd;
