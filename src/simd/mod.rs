//! SIMD kernel modules, one per detected instruction set.
//!
//! The build script probes the host CPU once and enables exactly one of the
//! architecture cfgs below. Every architecture module exposes the same
//! surface: raw register kernels in `math`, wrapper vector types with
//! load/store plumbing, and per-function slice drivers implementing the
//! traits in [`traits`].

#[cfg(avx2)]
pub mod avx2;

#[cfg(neon)]
pub mod neon;

pub mod traits;

pub(crate) mod utils;
