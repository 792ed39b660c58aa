/// Relative tolerance used when comparing aspect ratios.
pub(crate) const RATIO_EPSILON: f64 = 1e-6;

/// Greatest common divisor (Euclid). `gcd(0, 0) == 0`.
pub(crate) fn gcd(a: u64, b: u64) -> u64 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `v.max(lo).min(hi)`: unlike `f64::clamp` this never panics when `lo > hi`
/// (degenerate bounds) and resolves to `hi` in that case.
pub(crate) fn clamp_lo_hi(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

pub(crate) fn ratios_match(a: f64, b: f64) -> bool {
    if !a.is_finite() || !b.is_finite() {
        return false;
    }
    (a - b).abs() <= RATIO_EPSILON * a.abs().max(b.abs()).max(1.0)
}

/// Replace NaN/inf with `fallback`.
pub(crate) fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// Normalize degrees into `[-180, 180]`.
pub(crate) fn normalize_degrees(deg: f64) -> f64 {
    if !deg.is_finite() {
        return 0.0;
    }
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d < -180.0 {
        d += 360.0;
    }
    d
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
