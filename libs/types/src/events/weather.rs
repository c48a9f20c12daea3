use serde::{Deserialize, Serialize};

/// Current weather and track conditions during a session.
///
/// The feed delivers every field as a numeric string:
///
/// ```json
/// {
///     "AirTemp": "28.5",
///     "Humidity": "73.0",
///     "Pressure": "1012.6",
///     "Rainfall": "0",
///     "TrackTemp": "32.5",
///     "WindDirection": "115",
///     "WindSpeed": "0.5"
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherData {
    /// Air temperature in degrees Celsius
    pub air_temperature: f64,
    /// Relative humidity as a percentage (0-100)
    pub humidity: f64,
    /// Atmospheric pressure in hPa
    pub air_pressure: f64,
    /// Rainfall intensity in mm/h
    pub rainfall: f64,
    /// Track surface temperature in degrees Celsius
    pub track_temperature: f64,
    /// Wind direction in degrees (0-360, 0 = North)
    pub wind_direction: f64,
    /// Wind speed in m/s
    pub wind_speed: f64,
}

impl WeatherData {
    /// Whether any rainfall is currently being measured.
    pub fn is_raining(&self) -> bool {
        self.rainfall > 0.0
    }
}
