//! ARM NEON SIMD implementations for 128-bit vector operations.
//!
//! This module contains SIMD implementations using ARM's Advanced SIMD (NEON)
//! instruction set, which provides 128-bit vector operations on ARM processors.
//! NEON is available on all modern ARM64 (AArch64) processors including Apple
//! Silicon, AWS Graviton, and mobile devices.
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: any AArch64 processor
//! - **Target Architecture**: AArch64
//! - **Compilation**: Must be compiled with NEON enabled
//! - **Runtime Detection**: The build system automatically detects NEON availability
//!
//! # Available Types
//!
//! - [`f32x4::F32x4`]: 128-bit vector containing 4 packed single-precision values
//! - [`f64x2::F64x2`]: 128-bit vector containing 2 packed double-precision values
//!
//! # Conditional Compilation
//!
//! This module is only compiled when the `neon` CPU feature is available. The
//! build system automatically detects this and configures the appropriate
//! compilation flags.

/// NEON memory alignment requirement in bytes, shared by every wrapper type
/// backed by a 128-bit register.
pub(crate) const NEON_ALIGNMENT: usize = 16;

pub mod f32x4;

pub mod f64x2;

#[allow(clippy::excessive_precision)]
pub mod math;

pub mod atan;

pub mod cos;

pub mod sin;
