//! Great-circle angular separation on the celestial sphere.

use rayon::prelude::*;

use crate::error::FrameError;

/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// Vincenty great-circle formula on pre-computed latitude sines/cosines.
///
/// Returns radians in `[0, π]`. Well conditioned for both tiny and
/// near-antipodal separations, unlike the plain cosine rule.
#[inline]
pub fn vincenty_separation_rad(
    sin_lat1: f64,
    cos_lat1: f64,
    sin_lat2: f64,
    cos_lat2: f64,
    delta_lon: f64,
) -> f64 {
    let (sin_dlon, cos_dlon) = delta_lon.sin_cos();

    let num = (cos_lat2 * sin_dlon).hypot(cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon);
    let den = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;

    num.atan2(den)
}

/// Angular separation between two sky positions, in degrees.
pub fn angular_separation_deg(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    let (sin1, cos1) = dec1_deg.to_radians().sin_cos();
    let (sin2, cos2) = dec2_deg.to_radians().sin_cos();
    vincenty_separation_rad(sin1, cos1, sin2, cos2, (ra2_deg - ra1_deg).to_radians()).to_degrees()
}

/// Angular separation between two sky positions, in arcseconds.
///
/// NaN in any coordinate yields NaN.
pub fn angular_separation_arcsec(ra1_deg: f64, dec1_deg: f64, ra2_deg: f64, dec2_deg: f64) -> f64 {
    angular_separation_deg(ra1_deg, dec1_deg, ra2_deg, dec2_deg) * ARCSEC_PER_DEG
}

/// Element-wise [`angular_separation_arcsec`] over equal-length sequences.
///
/// Rows are independent, so they are evaluated in parallel; the result is
/// identical to a sequential loop.
pub fn angular_separations_arcsec(
    ra1_deg: &[f64],
    dec1_deg: &[f64],
    ra2_deg: &[f64],
    dec2_deg: &[f64],
) -> Result<Vec<f64>, FrameError> {
    let expected = ra1_deg.len();
    for found in [dec1_deg.len(), ra2_deg.len(), dec2_deg.len()] {
        if found != expected {
            return Err(FrameError::LengthMismatch { expected, found });
        }
    }

    Ok((0..expected)
        .into_par_iter()
        .map(|i| angular_separation_arcsec(ra1_deg[i], dec1_deg[i], ra2_deg[i], dec2_deg[i]))
        .collect())
}
