//! AVX2 kernels for the vectorized transcendental functions.
//!
//! Every kernel in this module follows the same four-stage shape:
//!
//! 1. **Range reduction**: map an arbitrary-magnitude input to a reduced
//!    argument in a small canonical interval, together with a per-lane branch
//!    selector (quadrant index or reciprocal-reduction flag).
//! 2. **Polynomial evaluation**: a fused multiply-add ladder over
//!    precomputed minimax coefficients on the reduced argument.
//! 3. **Reconstruction**: recombine the ladder result with the branch
//!    selector (parity selection, shift addition, sign-bit restoration) for
//!    every lane unconditionally.
//! 4. **Lane dispatch**: compare against the validated fast-path bounds and
//!    route flagged lanes to the scalar reference in the standard library.
//!
//! All intermediate arithmetic runs at the public precision of the kernel;
//! the declared error budgets already account for it.
//!
//! # Function reference
//!
//! | Kernel | Fast-path domain | Max error | Fallback policy |
//! |--------|------------------|-----------|-----------------|
//! | [`_mm256_cos_ps`]  | \|x\| < 2²⁰ | ~2 ULP | partial merge |
//! | [`_mm256_sin_ps`]  | \|x\| < 2²⁰ | ~2 ULP | partial merge |
//! | [`_mm256_atan_ps`] | all finite  | ~2.9 ULP | strict-fenv only |
//! | [`_mm256_atan_pd`] | all finite  | ~2.3 ULP | strict-fenv only |
//!
//! With the `strict-fenv` cargo feature every fallback becomes whole-vector
//! and is taken before any vector arithmetic runs; cos/sin additionally flag
//! |x| < 2⁻¹², where the ladder would leave the hardware exception flags in
//! a state a pure scalar execution does not.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

// --- Quadrant reduction constants (single precision) ---
// pi/2 is represented as a sum of three decreasing-magnitude parts so that
// |x| - n*pi/2 stays accurate even for n in the hundreds of thousands:
// pi/2 = 0x1.921fb6p+0 - 0x1.777a5cp-25 - 0x1.ee59dap-50
const NEG_PIO2_HI: f32 = -1.5707964; // -0x1.921fb6p+0
const NEG_PIO2_MID: f32 = 4.371139e-8; // 0x1.777a5cp-25
const NEG_PIO2_LO: f32 = 1.7151245e-15; // 0x1.ee59dap-50
const INV_PIO2: f32 = 0.63661975; // 0x1.45f306p-1

// Adding 1.5 * 2^23 forces the floating-point adder to round |x| * 2/pi to
// the nearest integer in the mantissa; the quadrant index (and its parity
// bit) is then read straight out of the biased sum's bit pattern.
const SHIFT: f32 = 12582912.0; // 0x1.8p+23

// Quadrant reduction precision degrades past this bound; such lanes (and
// NaN/Inf, whose magnitudes compare above it) leave the fast path.
#[cfg(not(feature = "strict-fenv"))]
const RANGE_LIMIT: f32 = 1048576.0; // 0x1p20

// --- Minimax coefficients for sin(r)/cos(r) on [-pi/4, pi/4] ---
// sin(r) ~ r + r^3 * S(r^2)
const SIN_C0: f32 = -1.6666667e-1;
const SIN_C1: f32 = 8.333331e-3;
const SIN_C2: f32 = -1.9840874e-4;
const SIN_C3: f32 = 2.7525562e-6;
const SIN_C4: f32 = -2.502943e-8;
// cos(r) ~ 1 + r^2 * C(r^2)
const COS_C0: f32 = -0.5;
const COS_C1: f32 = 4.1666646e-2;
const COS_C2: f32 = -1.3887316e-3;
const COS_C3: f32 = 2.4433157e-5;

// --- Arctangent constants ---
// atan(x) ~ shift + z + z^3 * P(z^2), reduced to z in [-1, 1] via z = -1/x
// and shift = pi/2 whenever |x| > 1.
const PIO2_F: f32 = 1.5707964; // 0x1.921fb6p+0

// Minimax P(z^2) for single precision, degree 7 in z^2.
const ATANF_POLY: [f32; 8] = [
    -0.33333325,  // -0x1.55555p-2
    0.19998811,   // 0x1.99935ep-3
    -0.14258789,  // -0x1.24051ep-3
    0.10875264,   // 0x1.bd7368p-4
    -0.08035188,  // -0x1.491f0ep-4
    0.049271941,  // 0x1.93a2c0p-5
    -0.020278066, // -0x1.4c3c60p-6
    0.0039366204, // 0x1.01fd88p-8
];

// Minimax P(z^2) for double precision, degree 19 in z^2.
const ATAN_POLY: [f64; 20] = [
    -0.3333333333333333,     // -0x1.5555555555555p-2
    0.19999999999997978,     // 0x1.99999999996c1p-3
    -0.14285714285426487,    // -0x1.2492492478f88p-3
    0.11111111095268139,     // 0x1.c71c71bc3951cp-4
    -0.09090908632050587,    // -0x1.745d160a7e368p-4
    0.07692299565728301,     // 0x1.3b139b6a88ba1p-4
    -0.06666570483526667,    // -0x1.11100ee084227p-4
    0.058815467007189835,    // 0x1.e1d0f9696f63bp-5
    -0.05258174185361054,    // -0x1.aebfe7b418581p-5
    0.04738509395285655,     // 0x1.842dbe9b0d916p-5
    -0.04262546457829081,    // -0x1.5d30140ae5e99p-5
    0.03754338979478386,     // 0x1.338e31eb2fbbcp-5
    -0.031360117358357975,   // -0x1.00e6eece7de8p-5
    0.023805759565652392,    // 0x1.860897b29e5efp-6
    -0.015644364143137277,   // -0x1.0051381722a59p-6
    0.008450729819093141,    // 0x1.14e9dc19a4a4ep-7
    -0.0035402229127581004,  // -0x1.d0062b42fe3bfp-9
    0.0010660233749617055,   // 0x1.17739e210171ap-10
    -0.0002036781114584108,  // -0x1.ab24da7be7402p-13
    1.8449573950506424e-05,  // 0x1.358851160a528p-16
];

// Strict-fenv bounds for atan: below the tiny bound z^2 underflows, above
// the big bound the reciprocal division underflows; either would raise
// flags a scalar execution does not.
#[cfg(feature = "strict-fenv")]
const ATANF_TINY_BITS: i32 = 0x3080_0000; // 0x1p-30
#[cfg(feature = "strict-fenv")]
const ATANF_BIG_BITS: i32 = 0x4e80_0000; // 0x1p30
#[cfg(feature = "strict-fenv")]
const ATAN_TINY_BITS: i64 = 0x3e10_0000_0000_0000; // 0x1p-30
#[cfg(feature = "strict-fenv")]
const ATAN_BIG_BITS: i64 = 0x4340_0000_0000_0000; // 0x1p53

// Strict-fenv bounds for cos/sin: below the tiny bound the ladder raises
// inexact (and, further down, underflow) on lanes where the scalar reference
// returns early with the flags untouched; the big bound is the fast-path
// range limit as a bit pattern.
#[cfg(feature = "strict-fenv")]
const SINCOSF_TINY_BITS: i32 = 0x3980_0000; // 0x1p-12
#[cfg(feature = "strict-fenv")]
const RANGE_LIMIT_BITS: i32 = 0x4980_0000; // 0x1p20

// ============================================================================
// Lane dispatch helpers
// ============================================================================

/// Replaces the lanes of `y` flagged in `cmp` with `f` applied to the
/// corresponding lane of `x`; unflagged lanes keep their fast-path value.
#[cfg(not(feature = "strict-fenv"))]
#[inline(always)]
unsafe fn _mm256_call_ps(f: fn(f32) -> f32, x: __m256, y: __m256, cmp: __m256) -> __m256 {
    let flags = _mm256_movemask_ps(cmp);

    let mut xs = [0.0f32; 8];
    let mut ys = [0.0f32; 8];
    _mm256_storeu_ps(xs.as_mut_ptr(), x);
    _mm256_storeu_ps(ys.as_mut_ptr(), y);

    for (lane, (xi, yi)) in xs.iter().zip(ys.iter_mut()).enumerate() {
        if flags & (1 << lane) != 0 {
            *yi = f(*xi);
        }
    }

    _mm256_loadu_ps(ys.as_ptr())
}

/// Recomputes every lane through the scalar reference. Used when exception
/// flag fidelity requires discarding the fast path for the whole vector.
#[cfg(feature = "strict-fenv")]
#[inline(always)]
unsafe fn _mm256_scalar_ps(f: fn(f32) -> f32, x: __m256) -> __m256 {
    let mut xs = [0.0f32; 8];
    _mm256_storeu_ps(xs.as_mut_ptr(), x);

    for xi in xs.iter_mut() {
        *xi = f(*xi);
    }

    _mm256_loadu_ps(xs.as_ptr())
}

#[cfg(feature = "strict-fenv")]
#[inline(always)]
unsafe fn _mm256_scalar_pd(f: fn(f64) -> f64, x: __m256d) -> __m256d {
    let mut xs = [0.0f64; 4];
    _mm256_storeu_pd(xs.as_mut_ptr(), x);

    for xi in xs.iter_mut() {
        *xi = f(*xi);
    }

    _mm256_loadu_pd(xs.as_ptr())
}

// ============================================================================
// Shared reduction and evaluation stages (cosine family)
// ============================================================================

/// Reduces `|x|` to `r` in [-pi/4, pi/4] plus the biased quadrant bits.
///
/// Returns the bit pattern of the biased sum, whose low mantissa bits hold
/// the integer quadrant index, and the reduced argument.
#[inline(always)]
unsafe fn _mm256_reduce_pio2_ps(ax: __m256) -> (__m256i, __m256) {
    let q = _mm256_fmadd_ps(ax, _mm256_set1_ps(INV_PIO2), _mm256_set1_ps(SHIFT));
    let n = _mm256_sub_ps(q, _mm256_set1_ps(SHIFT));

    // r = |x| - n*pi/2, one fused multiply-add per constant part.
    let mut r = _mm256_fmadd_ps(n, _mm256_set1_ps(NEG_PIO2_HI), ax);
    r = _mm256_fmadd_ps(n, _mm256_set1_ps(NEG_PIO2_MID), r);
    r = _mm256_fmadd_ps(n, _mm256_set1_ps(NEG_PIO2_LO), r);

    (_mm256_castps_si256(q), r)
}

/// Evaluates both half-quadrant ladders; the caller picks one per lane by
/// quadrant parity.
#[inline(always)]
unsafe fn _mm256_sincos_poly_ps(r: __m256) -> (__m256, __m256) {
    let r2 = _mm256_mul_ps(r, r);

    let mut s = _mm256_set1_ps(SIN_C4);
    s = _mm256_fmadd_ps(s, r2, _mm256_set1_ps(SIN_C3));
    s = _mm256_fmadd_ps(s, r2, _mm256_set1_ps(SIN_C2));
    s = _mm256_fmadd_ps(s, r2, _mm256_set1_ps(SIN_C1));
    s = _mm256_fmadd_ps(s, r2, _mm256_set1_ps(SIN_C0));
    let sinp = _mm256_fmadd_ps(_mm256_mul_ps(r, r2), s, r);

    let mut c = _mm256_set1_ps(COS_C3);
    c = _mm256_fmadd_ps(c, r2, _mm256_set1_ps(COS_C2));
    c = _mm256_fmadd_ps(c, r2, _mm256_set1_ps(COS_C1));
    c = _mm256_fmadd_ps(c, r2, _mm256_set1_ps(COS_C0));
    let cosp = _mm256_fmadd_ps(c, r2, _mm256_set1_ps(1.0));

    (sinp, cosp)
}

// ============================================================================
// Kernels
// ============================================================================

/// Cosine of 8 packed f32 lanes.
///
/// Quadrant reduction with the three-part pi/2 split keeps the result within
/// ~2 ULP for |x| < 2^20; larger magnitudes, NaN and infinity are routed to
/// `f32::cos` per lane.
#[target_feature(enable = "avx,avx2,fma")]
pub(crate) unsafe fn _mm256_cos_ps(x: __m256) -> __m256 {
    let ax = _mm256_andnot_ps(_mm256_set1_ps(-0.0), x);

    // Flag fidelity requires routing special lanes away before any vector
    // arithmetic runs on them; NaN payloads sit above the big bound.
    #[cfg(feature = "strict-fenv")]
    {
        let ia = _mm256_castps_si256(ax);
        let tiny = _mm256_cmpgt_epi32(_mm256_set1_epi32(SINCOSF_TINY_BITS), ia);
        let big = _mm256_cmpgt_epi32(ia, _mm256_set1_epi32(RANGE_LIMIT_BITS - 1));
        let special = _mm256_or_si256(tiny, big);

        if _mm256_movemask_ps(_mm256_castsi256_ps(special)) != 0 {
            return _mm256_scalar_ps(f32::cos, x);
        }
    }

    // Unordered not-less-than flags NaN and infinity along with large
    // magnitudes in a single compare.
    #[cfg(not(feature = "strict-fenv"))]
    let cmp = _mm256_cmp_ps(ax, _mm256_set1_ps(RANGE_LIMIT), _CMP_NLT_UQ);

    let (q, r) = _mm256_reduce_pio2_ps(ax);
    let (sinp, cosp) = _mm256_sincos_poly_ps(r);

    // Odd quadrants land on the sine ladder.
    let odd = _mm256_castsi256_ps(_mm256_cmpeq_epi32(
        _mm256_and_si256(q, _mm256_set1_epi32(1)),
        _mm256_set1_epi32(1),
    ));
    let mut y = _mm256_blendv_ps(cosp, sinp, odd);

    // cos(r + n*pi/2) is negative in quadrants 1 and 2.
    let flip = _mm256_slli_epi32(
        _mm256_and_si256(_mm256_add_epi32(q, _mm256_set1_epi32(1)), _mm256_set1_epi32(2)),
        30,
    );
    y = _mm256_xor_ps(y, _mm256_castsi256_ps(flip));

    #[cfg(not(feature = "strict-fenv"))]
    if _mm256_movemask_ps(cmp) != 0 {
        return _mm256_call_ps(f32::cos, x, y, cmp);
    }

    y
}

/// Sine of 8 packed f32 lanes.
///
/// Shares the quadrant reduction with [`_mm256_cos_ps`]; the input's sign
/// bit is restored by XOR rather than multiplication so odd symmetry holds
/// bit-exactly, signed zero included.
#[target_feature(enable = "avx,avx2,fma")]
pub(crate) unsafe fn _mm256_sin_ps(x: __m256) -> __m256 {
    let sign = _mm256_and_ps(x, _mm256_set1_ps(-0.0));
    let ax = _mm256_andnot_ps(_mm256_set1_ps(-0.0), x);

    #[cfg(feature = "strict-fenv")]
    {
        let ia = _mm256_castps_si256(ax);
        let tiny = _mm256_cmpgt_epi32(_mm256_set1_epi32(SINCOSF_TINY_BITS), ia);
        let big = _mm256_cmpgt_epi32(ia, _mm256_set1_epi32(RANGE_LIMIT_BITS - 1));
        let special = _mm256_or_si256(tiny, big);

        if _mm256_movemask_ps(_mm256_castsi256_ps(special)) != 0 {
            return _mm256_scalar_ps(f32::sin, x);
        }
    }

    #[cfg(not(feature = "strict-fenv"))]
    let cmp = _mm256_cmp_ps(ax, _mm256_set1_ps(RANGE_LIMIT), _CMP_NLT_UQ);

    let (q, r) = _mm256_reduce_pio2_ps(ax);
    let (sinp, cosp) = _mm256_sincos_poly_ps(r);

    // Odd quadrants land on the cosine ladder.
    let odd = _mm256_castsi256_ps(_mm256_cmpeq_epi32(
        _mm256_and_si256(q, _mm256_set1_epi32(1)),
        _mm256_set1_epi32(1),
    ));
    let mut y = _mm256_blendv_ps(sinp, cosp, odd);

    // sin(r + n*pi/2) is negative in quadrants 2 and 3.
    let flip = _mm256_slli_epi32(_mm256_and_si256(q, _mm256_set1_epi32(2)), 30);
    y = _mm256_xor_ps(y, _mm256_castsi256_ps(flip));

    y = _mm256_xor_ps(y, sign);

    #[cfg(not(feature = "strict-fenv"))]
    if _mm256_movemask_ps(cmp) != 0 {
        return _mm256_call_ps(f32::sin, x, y, cmp);
    }

    y
}

/// Arctangent of 8 packed f32 lanes.
///
/// Reduction to [-1, 1] via z = -1/x with a pi/2 shift; accurate to ~2.9 ULP
/// over the full domain. Infinities and NaN flow through the reduction
/// naturally, so no fallback is needed unless exception-flag fidelity is
/// requested.
#[target_feature(enable = "avx,avx2,fma")]
pub(crate) unsafe fn _mm256_atan_ps(x: __m256) -> __m256 {
    let sign = _mm256_and_ps(x, _mm256_set1_ps(-0.0));
    let ax = _mm256_andnot_ps(_mm256_set1_ps(-0.0), x);

    #[cfg(feature = "strict-fenv")]
    {
        // Magnitude bit patterns are non-negative, so signed integer
        // compares are enough; NaN payloads sit above the big bound.
        let ia = _mm256_castps_si256(ax);
        let tiny = _mm256_cmpgt_epi32(_mm256_set1_epi32(ATANF_TINY_BITS), ia);
        let big = _mm256_cmpgt_epi32(ia, _mm256_set1_epi32(ATANF_BIG_BITS - 1));
        let special = _mm256_or_si256(tiny, big);

        if _mm256_movemask_ps(_mm256_castsi256_ps(special)) != 0 {
            return _mm256_scalar_ps(f32::atan, x);
        }
    }

    // z = -1/x when |x| > 1, with a pi/2 shift added after evaluation.
    let red = _mm256_cmp_ps(ax, _mm256_set1_ps(1.0), _CMP_GT_OQ);
    let z = _mm256_blendv_ps(x, _mm256_div_ps(_mm256_set1_ps(-1.0), x), red);
    let shift = _mm256_blendv_ps(_mm256_setzero_ps(), _mm256_set1_ps(PIO2_F), red);

    // The ladder runs over odd powers of z; evaluating on |z|, negated on
    // reduced lanes, orients the result against the shift regardless of the
    // input's original sign.
    let az = _mm256_andnot_ps(_mm256_set1_ps(-0.0), z);
    let az = _mm256_blendv_ps(az, _mm256_xor_ps(az, _mm256_set1_ps(-0.0)), red);

    let z2 = _mm256_mul_ps(z, z);
    let mut p = _mm256_set1_ps(ATANF_POLY[7]);
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[6]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[5]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[4]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[3]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[2]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[1]));
    p = _mm256_fmadd_ps(p, z2, _mm256_set1_ps(ATANF_POLY[0]));

    // y = shift + z + z^3 * P(z^2)
    let mut y = _mm256_fmadd_ps(p, _mm256_mul_ps(z2, az), az);
    y = _mm256_add_ps(y, shift);

    _mm256_xor_ps(y, sign)
}

/// Arctangent of 4 packed f64 lanes.
///
/// Same reduction as [`_mm256_atan_ps`] with a degree-19 ladder in z^2;
/// maximum observed error 2.27 ULP.
#[target_feature(enable = "avx,avx2,fma")]
pub(crate) unsafe fn _mm256_atan_pd(x: __m256d) -> __m256d {
    let sign = _mm256_and_pd(x, _mm256_set1_pd(-0.0));
    let ax = _mm256_andnot_pd(_mm256_set1_pd(-0.0), x);

    #[cfg(feature = "strict-fenv")]
    {
        let ia = _mm256_castpd_si256(ax);
        let tiny = _mm256_cmpgt_epi64(_mm256_set1_epi64x(ATAN_TINY_BITS), ia);
        let big = _mm256_cmpgt_epi64(ia, _mm256_set1_epi64x(ATAN_BIG_BITS - 1));
        let special = _mm256_or_si256(tiny, big);

        if _mm256_movemask_pd(_mm256_castsi256_pd(special)) != 0 {
            return _mm256_scalar_pd(f64::atan, x);
        }
    }

    let red = _mm256_cmp_pd(ax, _mm256_set1_pd(1.0), _CMP_GT_OQ);
    let z = _mm256_blendv_pd(x, _mm256_div_pd(_mm256_set1_pd(-1.0), x), red);
    let shift = _mm256_blendv_pd(
        _mm256_setzero_pd(),
        _mm256_set1_pd(std::f64::consts::FRAC_PI_2),
        red,
    );

    let az = _mm256_andnot_pd(_mm256_set1_pd(-0.0), z);
    let az = _mm256_blendv_pd(az, _mm256_xor_pd(az, _mm256_set1_pd(-0.0)), red);

    let z2 = _mm256_mul_pd(z, z);
    let mut p = _mm256_set1_pd(ATAN_POLY[19]);
    for &coeff in ATAN_POLY[..19].iter().rev() {
        p = _mm256_fmadd_pd(p, z2, _mm256_set1_pd(coeff));
    }

    let mut y = _mm256_fmadd_pd(p, _mm256_mul_pd(z2, az), az);
    y = _mm256_add_pd(y, shift);

    _mm256_xor_pd(y, sign)
}
