//! Unit conversions used when deriving weather facts.
//!
//! Every conversion rounds to one decimal place, which is the precision the
//! spoken responses read out.

const STATUTE_MILE_KM: f64 = 1.609344;
const METER_FEET: f64 = 3.28084;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round_tenths(celsius * 1.8 + 32.0)
}

pub fn statute_miles_to_km(miles: f64) -> f64 {
    round_tenths(miles * STATUTE_MILE_KM)
}

pub fn meters_to_feet(meters: f64) -> f64 {
    round_tenths(meters * METER_FEET)
}

// Decimal rounding of the exact binary value, ties to even. Scaling by ten
// first would turn 12303.149999... into 12303.2.
fn round_tenths(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Formats a measurement the way it is read back to the user.
///
/// Whole numbers keep a trailing `.0` (`13.0`), anything else uses the
/// shortest representation (`1.5`, `0.25`).
pub fn format_measure(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_celsius_to_fahrenheit() {
        assert_eq!(celsius_to_fahrenheit(13.0), 55.4);
        assert_eq!(celsius_to_fahrenheit(12.0), 53.6);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
    }

    #[test]
    fn converts_statute_miles_to_km() {
        assert_eq!(statute_miles_to_km(1.5), 2.4);
        assert_eq!(statute_miles_to_km(10.0), 16.1);
        assert_eq!(statute_miles_to_km(0.25), 0.4);
    }

    #[test]
    fn converts_meters_to_feet() {
        assert_eq!(meters_to_feet(173.0), 567.6);
        assert_eq!(meters_to_feet(0.0), 0.0);
    }

    #[test]
    fn rounds_on_the_exact_value_not_the_scaled_one() {
        assert_eq!(meters_to_feet(3750.0), 12303.1);
        assert_eq!(meters_to_feet(6250.0), 20505.2);
        assert_eq!(meters_to_feet(8750.0), 28707.3);
    }

    #[test]
    fn formats_whole_numbers_with_one_decimal() {
        assert_eq!(format_measure(13.0), "13.0");
        assert_eq!(format_measure(55.4), "55.4");
        assert_eq!(format_measure(0.25), "0.25");
        assert_eq!(format_measure(-2.0), "-2.0");
    }
}
