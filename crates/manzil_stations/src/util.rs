//! Circular longitude helpers shared by the detector and the providers.

/// Normalize an angle to [0, 360) degrees.
pub fn normalize_360(deg: f64) -> f64 {
    let r = deg.rem_euclid(360.0);
    // Tiny negative inputs round up to exactly 360.
    if r >= 360.0 { 0.0 } else { r }
}

/// Normalize an angle to (-180, +180].
pub fn normalize_to_pm180(deg: f64) -> f64 {
    let mut d = deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Circular distance in degrees between a sample longitude and a threshold.
///
/// Both arguments are expected in [0, 360); the result is then in [0, 180]
/// and symmetric in its arguments. The three-way minimum covers the 0/360
/// seam without special-casing any threshold.
pub fn angular_distance(lon_deg: f64, threshold_deg: f64) -> f64 {
    let d = lon_deg - threshold_deg;
    d.abs().min((d + 360.0).abs()).min((d - 360.0).abs())
}
