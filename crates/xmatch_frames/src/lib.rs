//! Sky-geometry helpers for catalog cross-matching.
//!
//! Provides great-circle angular separation between positions given as
//! right ascension / declination in degrees.

pub mod error;
pub mod separation;

pub use error::FrameError;
pub use separation::{
    ARCSEC_PER_DEG, angular_separation_arcsec, angular_separation_deg,
    angular_separations_arcsec, vincenty_separation_rad,
};
