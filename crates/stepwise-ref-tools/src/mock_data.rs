//! Fictional lookup tables standing in for live services.
//!
//! Nothing here contacts an external system.

/// Current temperature in °C for a country or city.
pub fn weather(place: &str) -> Option<f64> {
    match place.to_lowercase().as_str() {
        "france" | "paris" => Some(20.0),
        "italy" | "rome" => Some(25.0),
        "spain" | "madrid" => Some(28.0),
        "germany" | "berlin" => Some(17.0),
        _ => None,
    }
}

/// Tomorrow's forecast in °C for a country or city.
pub fn next_day_prediction(place: &str) -> Option<f64> {
    weather(place).map(|t| t + 1.0)
}

pub fn capital(country: &str) -> Option<&'static str> {
    match country.to_lowercase().as_str() {
        "france" => Some("Paris"),
        "italy" => Some("Rome"),
        "spain" => Some("Madrid"),
        "germany" => Some("Berlin"),
        "china" => Some("Beijing"),
        _ => None,
    }
}

pub fn population(city: &str) -> Option<u64> {
    match city.to_lowercase().as_str() {
        "guangzhou" => Some(15_000_000),
        "shanghai" => Some(24_000_000),
        "paris" => Some(2_100_000),
        "rome" => Some(2_800_000),
        "madrid" => Some(3_300_000),
        _ => None,
    }
}
