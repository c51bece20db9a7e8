//! Real central-Israel locations for realistic test fixtures.
//!
//! Coordinates are approximate city-centre / landmark positions.

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

// ============================================================================
// Technician bases
// ============================================================================

pub const TEL_AVIV: Location = Location::new("Tel Aviv", 32.0853, 34.7818);
pub const HAIFA: Location = Location::new("Haifa", 32.7940, 34.9896);
pub const JERUSALEM: Location = Location::new("Jerusalem", 31.7683, 35.2137);

// ============================================================================
// Client sites around Tel Aviv
// ============================================================================

pub const TEL_AVIV_SITES: &[Location] = &[
    Location::new("Azrieli Center", 32.0744, 34.7920),
    Location::new("Carmel Market", 32.0684, 34.7686),
    Location::new("Sarona Market", 32.0719, 34.7869),
    Location::new("Tel Aviv Port", 32.0972, 34.7735),
    Location::new("Jaffa Clock Tower", 32.0553, 34.7565),
    Location::new("Ramat Gan Diamond Exchange", 32.0838, 34.8007),
    Location::new("Herzliya Marina", 32.1622, 34.7989),
    Location::new("Petah Tikva Center", 32.0878, 34.8878),
];

// ============================================================================
// Client sites around Haifa and Jerusalem
// ============================================================================

pub const HAIFA_SITES: &[Location] = &[
    Location::new("Bahai Gardens", 32.8144, 34.9866),
    Location::new("Haifa Grand Canyon Mall", 32.7896, 35.0076),
    Location::new("Technion", 32.7767, 35.0231),
];

pub const JERUSALEM_SITES: &[Location] = &[
    Location::new("Mahane Yehuda", 31.7850, 35.2122),
    Location::new("Malha Mall", 31.7517, 35.1873),
    Location::new("Hebrew University Givat Ram", 31.7761, 35.1980),
];
