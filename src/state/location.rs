//! Last known device location and its human-readable status line.

use serde::{Deserialize, Serialize};

pub const LOCATION_LOADING_TEXT: &str = "Loading location...";

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    pub lat: f64,
    pub lng: f64,
}

/// Location as seen by pages. `coords` stays `None` until acquisition finishes,
/// so pages must tolerate rendering without it.
#[derive(Clone, Debug, PartialEq)]
pub struct LocationFix {
    pub coords: Option<Coords>,
    pub status: String,
}

impl Default for LocationFix {
    fn default() -> Self {
        Self { coords: None, status: LOCATION_LOADING_TEXT.to_owned() }
    }
}
