//! Geographic coordinate types used to address grid cells.

/// A geographical coordinate as latitude and longitude, in degrees.
///
/// Latitude is the first element (index 0), longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use gridclim::LatLon;
///
/// let negombo = LatLon(7.2008, 79.8737);
/// assert_eq!(negombo.0, 7.2008); // Latitude
/// assert_eq!(negombo.1, 79.8737); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// A coordinate with a display name.
///
/// The name becomes the column name for that location in every combined
/// table and the series label in every rendered chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLocation {
    pub name: String,
    pub coordinate: LatLon,
}

impl NamedLocation {
    pub fn new(name: impl Into<String>, coordinate: LatLon) -> Self {
        Self {
            name: name.into(),
            coordinate,
        }
    }
}
