//! AVX2 SIMD implementations for 256-bit vector operations.
//!
//! This module contains SIMD implementations using Intel's Advanced Vector Extensions 2 (AVX2)
//! instruction set, which provides 256-bit vector operations for high-performance computing.
//! AVX2 is available on most Intel processors since Haswell (2013) and AMD processors since
//! Excavator (2015).
//!
//! # Architecture Requirements
//!
//! - **CPU Support**: Intel Haswell (2013+) or AMD Excavator (2015+)
//! - **Target Architecture**: x86 or x86_64
//! - **Compilation**: Must be compiled with AVX2 and FMA enabled
//! - **Runtime Detection**: The build system automatically detects AVX2 availability
//!
//! # Available Types
//!
//! - [`f32x8::F32x8`]: 256-bit vector containing 8 packed single-precision values
//! - [`f64x4::F64x4`]: 256-bit vector containing 4 packed double-precision values
//!
//! # Conditional Compilation
//!
//! This module is only compiled when the `avx2` CPU feature is available. The build
//! system automatically detects this and configures the appropriate compilation flags.

/// AVX2 memory alignment requirement in bytes, shared by every wrapper type
/// backed by a 256-bit register.
pub(crate) const AVX_ALIGNMENT: usize = 32;

pub mod f32x8;

pub mod f64x4;

#[allow(clippy::excessive_precision)]
pub mod math;

pub mod atan;

pub mod cos;

pub mod sin;
