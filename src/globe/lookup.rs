//! Place lookup collaborator
//!
//! A remote geocoder normally sits behind `PlaceLookup`. Its failures only
//! ever change the status text of the globe view, never game state.

use crate::catalog;

/// A named point found near a coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub country: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Lookup failure carried as a message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct LookupError(pub String);

pub trait PlaceLookup {
    /// Nearest known place, `Ok(None)` when nothing is close enough
    fn nearest(&self, lat: f64, lon: f64) -> Result<Option<Place>, LookupError>;
}

/// Offline lookup against the built-in city catalog
#[derive(Debug, Clone, Copy)]
pub struct CatalogLookup {
    /// Search radius in degrees
    pub max_deg: f64,
}

impl Default for CatalogLookup {
    fn default() -> Self {
        Self { max_deg: 10.0 }
    }
}

impl PlaceLookup for CatalogLookup {
    fn nearest(&self, lat: f64, lon: f64) -> Result<Option<Place>, LookupError> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(LookupError(format!("invalid coordinate ({lat}, {lon})")));
        }
        Ok(catalog::nearest_city(lat, lon, self.max_deg).map(|city| Place {
            name: city.name.to_owned(),
            country: Some(city.country.to_owned()),
            lat: city.lat,
            lon: city.lon,
        }))
    }
}
