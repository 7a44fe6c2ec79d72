//! Finite-safe numeric helpers shared by every component.
//!
//! None of these functions panic or return NaN/Infinity: degenerate inputs
//! are mapped to a defined finite fallback so long-running simulations keep
//! going.

use std::f64::consts::{PI, TAU};

/// Smallest magnitude allowed in a denominator.
pub const EPSILON: f64 = 1e-9;

/// Return `value` when finite, `fallback` otherwise.
#[inline]
pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Clamp into [0, 1]. Non-finite values map to 0.
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    finite_or(value, 0.0).clamp(0.0, 1.0)
}

/// Clamp into [min, max]. Non-finite values map to `min`.
#[inline]
pub fn clamp_range(value: f64, min: f64, max: f64) -> f64 {
    finite_or(value, min).clamp(min, max)
}

/// Wrap a phase into [0, 2π).
///
/// `rem_euclid` can round up to exactly 2π for tiny negative inputs, which
/// is folded back to 0.
#[inline]
pub fn wrap_phase(phase: f64) -> f64 {
    let wrapped = finite_or(phase, 0.0).rem_euclid(TAU);
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed phase difference `a - b` wrapped into (-π, π].
#[inline]
pub fn signed_phase_difference(a: f64, b: f64) -> f64 {
    let diff = wrap_phase(a - b);
    if diff > PI {
        diff - TAU
    } else {
        diff
    }
}

/// Smallest angle between two phases, in [0, π].
#[inline]
pub fn phase_distance(a: f64, b: f64) -> f64 {
    signed_phase_difference(a, b).abs()
}

/// `numerator / denominator` with the denominator clamped away from zero.
#[inline]
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    let denom = if denominator.abs() < EPSILON {
        EPSILON.copysign(finite_or(denominator, 1.0))
    } else {
        denominator
    };
    finite_or(numerator / denom, 0.0)
}

/// Order-independent frequency ratio `max(|a|,|b|) / min(|a|,|b|)`, always ≥ 1.
#[inline]
pub fn canonical_ratio(a: f64, b: f64) -> f64 {
    let a = finite_or(a, 0.0).abs();
    let b = finite_or(b, 0.0).abs();
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    safe_div(hi, lo.max(EPSILON)).max(1.0)
}

/// Order-independent amplitude ratio `min / max`, in [0, 1].
#[inline]
pub fn amplitude_ratio(a: f64, b: f64) -> f64 {
    let a = finite_or(a, 0.0).abs();
    let b = finite_or(b, 0.0).abs();
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    clamp_unit(safe_div(lo, hi.max(EPSILON)))
}

/// Kuramoto order parameter `(r, ψ)` over a set of phases.
///
/// ```text
/// r · e^(iψ) = (1/N) Σⱼ e^(iθⱼ)
/// ```
///
/// Returns `(0.0, 0.0)` for an empty set.
pub fn order_parameter<I>(phases: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let mut sum_cos = 0.0;
    let mut sum_sin = 0.0;
    let mut n = 0usize;
    for phase in phases {
        sum_cos += phase.cos();
        sum_sin += phase.sin();
        n += 1;
    }
    if n == 0 {
        return (0.0, 0.0);
    }
    let avg_cos = sum_cos / n as f64;
    let avg_sin = sum_sin / n as f64;
    let r = clamp_unit((avg_cos * avg_cos + avg_sin * avg_sin).sqrt());
    let psi = wrap_phase(avg_sin.atan2(avg_cos));
    (r, psi)
}

/// Arithmetic mean, 0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    finite_or(values.iter().sum::<f64>() / values.len() as f64, 0.0)
}
