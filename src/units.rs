//! Metric to imperial conversions.
//!
//! WeatherKit always answers in metric units. Conversion is done once, when a
//! [`DailyForecast`](crate::DailyForecast) is built; nothing here rounds.

use serde::Serialize;

pub const KPH_TO_MPH: f64 = 0.621371191666667;
pub const MM_TO_INCHES: f64 = 0.0393700787402;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn kph_to_mph(kph: f64) -> f64 {
    kph * KPH_TO_MPH
}

pub fn mm_to_inches(mm: f64) -> f64 {
    mm * MM_TO_INCHES
}

/// Measurement system a forecast is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    Metric,
    #[default]
    Imperial,
}

impl UnitSystem {
    pub fn is_imperial(self) -> bool {
        self == UnitSystem::Imperial
    }

    pub fn temperature_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "°C",
            UnitSystem::Imperial => "°F",
        }
    }

    pub fn precipitation_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "mm",
            UnitSystem::Imperial => "in",
        }
    }

    pub fn snowfall_unit(self) -> &'static str {
        self.precipitation_unit()
    }

    pub fn wind_speed_unit(self) -> &'static str {
        match self {
            UnitSystem::Metric => "km/h",
            UnitSystem::Imperial => "mph",
        }
    }

    pub(crate) fn temperature(self, celsius: f64) -> f64 {
        match self {
            UnitSystem::Metric => celsius,
            UnitSystem::Imperial => celsius_to_fahrenheit(celsius),
        }
    }

    pub(crate) fn wind_speed(self, kph: f64) -> f64 {
        match self {
            UnitSystem::Metric => kph,
            UnitSystem::Imperial => kph_to_mph(kph),
        }
    }

    pub(crate) fn depth(self, mm: f64) -> f64 {
        match self {
            UnitSystem::Metric => mm,
            UnitSystem::Imperial => mm_to_inches(mm),
        }
    }
}

impl From<bool> for UnitSystem {
    /// `true` selects imperial units.
    fn from(imperial: bool) -> Self {
        if imperial {
            UnitSystem::Imperial
        } else {
            UnitSystem::Metric
        }
    }
}
