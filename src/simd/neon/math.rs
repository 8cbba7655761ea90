//! NEON kernels for the vectorized transcendental functions.
//!
//! Each kernel is the 128-bit mirror of its AVX2 counterpart and follows the
//! same four-stage shape: range reduction, fused multiply-add polynomial
//! ladder, reconstruction, and lane dispatch to the scalar reference for
//! inputs outside the validated fast-path domain.
//!
//! # Function reference
//!
//! | Kernel | Fast-path domain | Max error | Fallback policy |
//! |--------|------------------|-----------|-----------------|
//! | [`vcosq_f32`]  | \|x\| < 2²⁰ | ~2 ULP | partial merge |
//! | [`vsinq_f32`]  | \|x\| < 2²⁰ | ~2 ULP | partial merge |
//! | [`vatanq_f32`] | all finite  | ~2.9 ULP | strict-fenv only |
//! | [`vatanq_f64`] | all finite  | ~2.3 ULP | strict-fenv only |
//!
//! With the `strict-fenv` cargo feature every fallback becomes whole-vector
//! and is taken before any vector arithmetic runs; cos/sin additionally flag
//! |x| < 2⁻¹², where the ladder would leave the hardware exception flags in
//! a state a pure scalar execution does not.

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

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
    -0.3333333333333333,    // -0x1.5555555555555p-2
    0.19999999999997978,    // 0x1.99999999996c1p-3
    -0.14285714285426487,   // -0x1.2492492478f88p-3
    0.11111111095268139,    // 0x1.c71c71bc3951cp-4
    -0.09090908632050587,   // -0x1.745d160a7e368p-4
    0.07692299565728301,    // 0x1.3b139b6a88ba1p-4
    -0.06666570483526667,   // -0x1.11100ee084227p-4
    0.058815467007189835,   // 0x1.e1d0f9696f63bp-5
    -0.05258174185361054,   // -0x1.aebfe7b418581p-5
    0.04738509395285655,    // 0x1.842dbe9b0d916p-5
    -0.04262546457829081,   // -0x1.5d30140ae5e99p-5
    0.03754338979478386,    // 0x1.338e31eb2fbbcp-5
    -0.031360117358357975,  // -0x1.00e6eece7de8p-5
    0.023805759565652392,   // 0x1.860897b29e5efp-6
    -0.015644364143137277,  // -0x1.0051381722a59p-6
    0.008450729819093141,   // 0x1.14e9dc19a4a4ep-7
    -0.0035402229127581004, // -0x1.d0062b42fe3bfp-9
    0.0010660233749617055,  // 0x1.17739e210171ap-10
    -0.0002036781114584108, // -0x1.ab24da7be7402p-13
    1.8449573950506424e-05, // 0x1.358851160a528p-16
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
unsafe fn vcallq_f32(f: fn(f32) -> f32, x: float32x4_t, y: float32x4_t, cmp: uint32x4_t) -> float32x4_t {
    let mut flags = [0u32; 4];
    let mut xs = [0.0f32; 4];
    let mut ys = [0.0f32; 4];
    vst1q_u32(flags.as_mut_ptr(), cmp);
    vst1q_f32(xs.as_mut_ptr(), x);
    vst1q_f32(ys.as_mut_ptr(), y);

    for lane in 0..4 {
        if flags[lane] != 0 {
            ys[lane] = f(xs[lane]);
        }
    }

    vld1q_f32(ys.as_ptr())
}

/// Recomputes every lane through the scalar reference. Used when exception
/// flag fidelity requires discarding the fast path for the whole vector.
#[cfg(feature = "strict-fenv")]
#[inline(always)]
unsafe fn vscalarq_f32(f: fn(f32) -> f32, x: float32x4_t) -> float32x4_t {
    let mut xs = [0.0f32; 4];
    vst1q_f32(xs.as_mut_ptr(), x);

    for xi in xs.iter_mut() {
        *xi = f(*xi);
    }

    vld1q_f32(xs.as_ptr())
}

#[cfg(feature = "strict-fenv")]
#[inline(always)]
unsafe fn vscalarq_f64(f: fn(f64) -> f64, x: float64x2_t) -> float64x2_t {
    let mut xs = [0.0f64; 2];
    vst1q_f64(xs.as_mut_ptr(), x);

    for xi in xs.iter_mut() {
        *xi = f(*xi);
    }

    vld1q_f64(xs.as_ptr())
}

// ============================================================================
// Shared reduction and evaluation stages (cosine family)
// ============================================================================

/// Reduces `|x|` to `r` in [-pi/4, pi/4] plus the biased quadrant bits.
///
/// Returns the bit pattern of the biased sum, whose low mantissa bits hold
/// the integer quadrant index, and the reduced argument.
#[inline(always)]
unsafe fn vreduceq_pio2_f32(ax: float32x4_t) -> (int32x4_t, float32x4_t) {
    let q = vfmaq_f32(vdupq_n_f32(SHIFT), ax, vdupq_n_f32(INV_PIO2));
    let n = vsubq_f32(q, vdupq_n_f32(SHIFT));

    // r = |x| - n*pi/2, one fused multiply-add per constant part.
    let mut r = vfmaq_f32(ax, n, vdupq_n_f32(NEG_PIO2_HI));
    r = vfmaq_f32(r, n, vdupq_n_f32(NEG_PIO2_MID));
    r = vfmaq_f32(r, n, vdupq_n_f32(NEG_PIO2_LO));

    (vreinterpretq_s32_f32(q), r)
}

/// Evaluates both half-quadrant ladders; the caller picks one per lane by
/// quadrant parity.
#[inline(always)]
unsafe fn vsincosq_poly_f32(r: float32x4_t) -> (float32x4_t, float32x4_t) {
    let r2 = vmulq_f32(r, r);

    let mut s = vdupq_n_f32(SIN_C4);
    s = vfmaq_f32(vdupq_n_f32(SIN_C3), s, r2);
    s = vfmaq_f32(vdupq_n_f32(SIN_C2), s, r2);
    s = vfmaq_f32(vdupq_n_f32(SIN_C1), s, r2);
    s = vfmaq_f32(vdupq_n_f32(SIN_C0), s, r2);
    let sinp = vfmaq_f32(r, vmulq_f32(r, r2), s);

    let mut c = vdupq_n_f32(COS_C3);
    c = vfmaq_f32(vdupq_n_f32(COS_C2), c, r2);
    c = vfmaq_f32(vdupq_n_f32(COS_C1), c, r2);
    c = vfmaq_f32(vdupq_n_f32(COS_C0), c, r2);
    let cosp = vfmaq_f32(vdupq_n_f32(1.0), c, r2);

    (sinp, cosp)
}

// ============================================================================
// Kernels
// ============================================================================

/// Cosine of 4 packed f32 lanes.
///
/// Quadrant reduction with the three-part pi/2 split keeps the result within
/// ~2 ULP for |x| < 2^20; larger magnitudes, NaN and infinity are routed to
/// `f32::cos` per lane.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn vcosq_f32(x: float32x4_t) -> float32x4_t {
    let ax = vabsq_f32(x);

    // Flag fidelity requires routing special lanes away before any vector
    // arithmetic runs on them; NaN payloads sit above the big bound.
    #[cfg(feature = "strict-fenv")]
    {
        let ia = vreinterpretq_s32_f32(ax);
        let tiny = vcgtq_s32(vdupq_n_s32(SINCOSF_TINY_BITS), ia);
        let big = vcgtq_s32(ia, vdupq_n_s32(RANGE_LIMIT_BITS - 1));
        let special = vorrq_u32(tiny, big);

        if vmaxvq_u32(special) != 0 {
            return vscalarq_f32(f32::cos, x);
        }
    }

    // vcltq is false on NaN, so the complement flags NaN and infinity along
    // with large magnitudes.
    #[cfg(not(feature = "strict-fenv"))]
    let cmp = vmvnq_u32(vcltq_f32(ax, vdupq_n_f32(RANGE_LIMIT)));

    let (q, r) = vreduceq_pio2_f32(ax);
    let (sinp, cosp) = vsincosq_poly_f32(r);

    // Odd quadrants land on the sine ladder.
    let odd = vceqq_s32(vandq_s32(q, vdupq_n_s32(1)), vdupq_n_s32(1));
    let mut y = vbslq_f32(odd, sinp, cosp);

    // cos(r + n*pi/2) is negative in quadrants 1 and 2.
    let flip = vshlq_n_s32::<30>(vandq_s32(vaddq_s32(q, vdupq_n_s32(1)), vdupq_n_s32(2)));
    y = vreinterpretq_f32_u32(veorq_u32(
        vreinterpretq_u32_f32(y),
        vreinterpretq_u32_s32(flip),
    ));

    #[cfg(not(feature = "strict-fenv"))]
    if vmaxvq_u32(cmp) != 0 {
        return vcallq_f32(f32::cos, x, y, cmp);
    }

    y
}

/// Sine of 4 packed f32 lanes.
///
/// Shares the quadrant reduction with [`vcosq_f32`]; the input's sign bit is
/// restored by XOR rather than multiplication so odd symmetry holds
/// bit-exactly, signed zero included.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn vsinq_f32(x: float32x4_t) -> float32x4_t {
    let sign = vandq_u32(vreinterpretq_u32_f32(x), vdupq_n_u32(0x8000_0000));
    let ax = vabsq_f32(x);

    #[cfg(feature = "strict-fenv")]
    {
        let ia = vreinterpretq_s32_f32(ax);
        let tiny = vcgtq_s32(vdupq_n_s32(SINCOSF_TINY_BITS), ia);
        let big = vcgtq_s32(ia, vdupq_n_s32(RANGE_LIMIT_BITS - 1));
        let special = vorrq_u32(tiny, big);

        if vmaxvq_u32(special) != 0 {
            return vscalarq_f32(f32::sin, x);
        }
    }

    #[cfg(not(feature = "strict-fenv"))]
    let cmp = vmvnq_u32(vcltq_f32(ax, vdupq_n_f32(RANGE_LIMIT)));

    let (q, r) = vreduceq_pio2_f32(ax);
    let (sinp, cosp) = vsincosq_poly_f32(r);

    // Odd quadrants land on the cosine ladder.
    let odd = vceqq_s32(vandq_s32(q, vdupq_n_s32(1)), vdupq_n_s32(1));
    let mut y = vbslq_f32(odd, cosp, sinp);

    // sin(r + n*pi/2) is negative in quadrants 2 and 3.
    let flip = vshlq_n_s32::<30>(vandq_s32(q, vdupq_n_s32(2)));
    y = vreinterpretq_f32_u32(veorq_u32(
        vreinterpretq_u32_f32(y),
        vreinterpretq_u32_s32(flip),
    ));

    y = vreinterpretq_f32_u32(veorq_u32(vreinterpretq_u32_f32(y), sign));

    #[cfg(not(feature = "strict-fenv"))]
    if vmaxvq_u32(cmp) != 0 {
        return vcallq_f32(f32::sin, x, y, cmp);
    }

    y
}

/// Arctangent of 4 packed f32 lanes.
///
/// Reduction to [-1, 1] via z = -1/x with a pi/2 shift; accurate to ~2.9 ULP
/// over the full domain. Infinities and NaN flow through the reduction
/// naturally, so no fallback is needed unless exception-flag fidelity is
/// requested.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn vatanq_f32(x: float32x4_t) -> float32x4_t {
    let sign = vandq_u32(vreinterpretq_u32_f32(x), vdupq_n_u32(0x8000_0000));
    let ax = vabsq_f32(x);

    #[cfg(feature = "strict-fenv")]
    {
        // Magnitude bit patterns are non-negative, so signed integer
        // compares are enough; NaN payloads sit above the big bound.
        let ia = vreinterpretq_s32_f32(ax);
        let tiny = vcgtq_s32(vdupq_n_s32(ATANF_TINY_BITS), ia);
        let big = vcgtq_s32(ia, vdupq_n_s32(ATANF_BIG_BITS - 1));
        let special = vorrq_u32(tiny, big);

        if vmaxvq_u32(special) != 0 {
            return vscalarq_f32(f32::atan, x);
        }
    }

    // z = -1/x when |x| > 1, with a pi/2 shift added after evaluation.
    let red = vcgtq_f32(ax, vdupq_n_f32(1.0));
    let z = vbslq_f32(red, vdivq_f32(vdupq_n_f32(-1.0), x), x);
    let shift = vbslq_f32(red, vdupq_n_f32(PIO2_F), vdupq_n_f32(0.0));

    // The ladder runs over odd powers of z; evaluating on |z|, negated on
    // reduced lanes, orients the result against the shift regardless of the
    // input's original sign.
    let az = vabsq_f32(z);
    let az = vbslq_f32(red, vnegq_f32(az), az);

    let z2 = vmulq_f32(z, z);
    let mut p = vdupq_n_f32(ATANF_POLY[7]);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[6]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[5]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[4]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[3]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[2]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[1]), p, z2);
    p = vfmaq_f32(vdupq_n_f32(ATANF_POLY[0]), p, z2);

    // y = shift + z + z^3 * P(z^2)
    let mut y = vfmaq_f32(az, p, vmulq_f32(z2, az));
    y = vaddq_f32(y, shift);

    vreinterpretq_f32_u32(veorq_u32(vreinterpretq_u32_f32(y), sign))
}

/// Arctangent of 2 packed f64 lanes.
///
/// Same reduction as [`vatanq_f32`] with a degree-19 ladder in z^2; maximum
/// observed error 2.27 ULP.
#[target_feature(enable = "neon")]
pub(crate) unsafe fn vatanq_f64(x: float64x2_t) -> float64x2_t {
    let sign = vandq_u64(vreinterpretq_u64_f64(x), vdupq_n_u64(0x8000_0000_0000_0000));
    let ax = vabsq_f64(x);

    #[cfg(feature = "strict-fenv")]
    {
        let ia = vreinterpretq_s64_f64(ax);
        let tiny = vcgtq_s64(vdupq_n_s64(ATAN_TINY_BITS), ia);
        let big = vcgtq_s64(ia, vdupq_n_s64(ATAN_BIG_BITS - 1));
        let special = vorrq_u64(tiny, big);

        if vmaxvq_u32(vreinterpretq_u32_u64(special)) != 0 {
            return vscalarq_f64(f64::atan, x);
        }
    }

    let red = vcgtq_f64(ax, vdupq_n_f64(1.0));
    let z = vbslq_f64(red, vdivq_f64(vdupq_n_f64(-1.0), x), x);
    let shift = vbslq_f64(red, vdupq_n_f64(std::f64::consts::FRAC_PI_2), vdupq_n_f64(0.0));

    let az = vabsq_f64(z);
    let az = vbslq_f64(red, vnegq_f64(az), az);

    let z2 = vmulq_f64(z, z);
    let mut p = vdupq_n_f64(ATAN_POLY[19]);
    for &coeff in ATAN_POLY[..19].iter().rev() {
        p = vfmaq_f64(vdupq_n_f64(coeff), p, z2);
    }

    let mut y = vfmaq_f64(az, p, vmulq_f64(z2, az));
    y = vaddq_f64(y, shift);

    vreinterpretq_f64_u64(veorq_u64(vreinterpretq_u64_f64(y), sign))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cos4(input: [f32; 4]) -> [f32; 4] {
        let mut out = [0.0f32; 4];
        unsafe {
            let v = vld1q_f32(input.as_ptr());
            vst1q_f32(out.as_mut_ptr(), vcosq_f32(v));
        }
        out
    }

    fn atan2x(input: [f64; 2]) -> [f64; 2] {
        let mut out = [0.0f64; 2];
        unsafe {
            let v = vld1q_f64(input.as_ptr());
            vst1q_f64(out.as_mut_ptr(), vatanq_f64(v));
        }
        out
    }

    #[test]
    fn cos_quadrant_signs() {
        let xs = [
            0.0f32,
            std::f32::consts::FRAC_PI_2,
            std::f32::consts::PI,
            3.0 * std::f32::consts::FRAC_PI_2,
        ];
        let ys = cos4(xs);
        for (x, y) in xs.iter().zip(ys.iter()) {
            let err = (y - x.cos()).abs();
            assert!(err < 1e-6, "cos({x}) = {y}, expected {}", x.cos());
        }
    }

    #[test]
    fn cos_out_of_range_lanes_match_scalar() {
        let xs = [2097152.0f32, f32::INFINITY, f32::NAN, 0.5];
        let ys = cos4(xs);

        // Flagged lanes must be bit-identical to the scalar reference.
        assert_eq!(ys[0].to_bits(), 2097152.0f32.cos().to_bits());
        assert!(ys[1].is_nan());
        assert!(ys[2].is_nan());
        assert!((ys[3] - 0.5f32.cos()).abs() < 1e-6);
    }

    #[test]
    fn atan_signed_zero_and_infinity() {
        let ys = atan2x([0.0, -0.0]);
        assert_eq!(ys[0].to_bits(), 0.0f64.to_bits());
        assert_eq!(ys[1].to_bits(), (-0.0f64).to_bits());

        let ys = atan2x([f64::INFINITY, f64::NEG_INFINITY]);
        assert_eq!(ys[0], std::f64::consts::FRAC_PI_2);
        assert_eq!(ys[1], -std::f64::consts::FRAC_PI_2);
    }

    #[test]
    fn atan_branch_continuity_near_one() {
        let xs = [1.0 - 1e-12, 1.0 + 1e-12];
        let ys = atan2x(xs);
        for (y, x) in ys.iter().zip(xs) {
            assert!((y - x.atan()).abs() < 1e-15, "atan({x}) = {y}");
        }
    }
}
