use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::icons::{DayPart, icon_for};
use crate::units::UnitSystem;
use crate::util::parse_timestamp;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDay {
    forecast_start: String,
    forecast_end: String,
    daytime_forecast: RawHalfDay,
    overnight_forecast: RawHalfDay,
    sunrise: String,
    sunset: String,
    temperature_max: f64,
    temperature_min: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawHalfDay {
    condition_code: String,
    humidity: f64,
    precipitation_amount: f64,
    precipitation_chance: f64,
    precipitation_type: String,
    snowfall_amount: f64,
    wind_speed: f64,
}

/// One half (daytime or overnight) of a forecast day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HalfDayForecast {
    /// WeatherKit condition code, e.g. `"PartlyCloudy"`.
    pub condition: String,
    /// Relative humidity as a fraction between 0 and 1.
    pub humidity: f64,
    pub precipitation_amount: f64,
    /// Chance of precipitation as a fraction between 0 and 1.
    pub precipitation_chance: f64,
    pub precipitation_type: String,
    pub snowfall_amount: f64,
    pub wind_speed: f64,
}

impl HalfDayForecast {
    fn convert(raw: RawHalfDay, units: UnitSystem) -> Self {
        Self {
            condition: raw.condition_code,
            humidity: raw.humidity,
            precipitation_amount: units.depth(raw.precipitation_amount),
            precipitation_chance: raw.precipitation_chance,
            precipitation_type: raw.precipitation_type,
            snowfall_amount: units.depth(raw.snowfall_amount),
            wind_speed: units.wind_speed(raw.wind_speed),
        }
    }
}

/// A single day of the `forecastDaily` data set.
///
/// Measurements are converted to the requested [`UnitSystem`] when the value
/// is built and cannot be changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    forecast_start: DateTime<FixedOffset>,
    forecast_end: DateTime<FixedOffset>,
    daytime: HalfDayForecast,
    overnight: HalfDayForecast,
    sunrise: DateTime<FixedOffset>,
    sunset: DateTime<FixedOffset>,
    temperature_high: f64,
    temperature_low: f64,
    units: UnitSystem,
}

impl DailyForecast {
    /// Builds a forecast from one entry of `forecastDaily.days`.
    pub fn from_raw(raw: &Value, units: UnitSystem) -> Result<Self> {
        let day = RawDay::deserialize(raw)
            .map_err(|e| Error::MalformedResponse(format!("daily forecast record: {e}")))?;

        Ok(Self {
            forecast_start: timestamp("forecastStart", &day.forecast_start)?,
            forecast_end: timestamp("forecastEnd", &day.forecast_end)?,
            sunrise: timestamp("sunrise", &day.sunrise)?,
            sunset: timestamp("sunset", &day.sunset)?,
            daytime: HalfDayForecast::convert(day.daytime_forecast, units),
            overnight: HalfDayForecast::convert(day.overnight_forecast, units),
            temperature_high: units.temperature(day.temperature_max),
            temperature_low: units.temperature(day.temperature_min),
            units,
        })
    }

    pub fn forecast_start(&self) -> DateTime<FixedOffset> {
        self.forecast_start
    }

    pub fn forecast_end(&self) -> DateTime<FixedOffset> {
        self.forecast_end
    }

    pub fn daytime(&self) -> &HalfDayForecast {
        &self.daytime
    }

    pub fn overnight(&self) -> &HalfDayForecast {
        &self.overnight
    }

    pub fn sunrise(&self) -> DateTime<FixedOffset> {
        self.sunrise
    }

    pub fn sunset(&self) -> DateTime<FixedOffset> {
        self.sunset
    }

    pub fn temperature_high(&self) -> f64 {
        self.temperature_high
    }

    pub fn temperature_low(&self) -> f64 {
        self.temperature_low
    }

    pub fn units(&self) -> UnitSystem {
        self.units
    }

    pub fn is_imperial(&self) -> bool {
        self.units.is_imperial()
    }

    pub fn temperature_unit(&self) -> &'static str {
        self.units.temperature_unit()
    }

    pub fn precipitation_unit(&self) -> &'static str {
        self.units.precipitation_unit()
    }

    pub fn snowfall_unit(&self) -> &'static str {
        self.units.snowfall_unit()
    }

    pub fn wind_speed_unit(&self) -> &'static str {
        self.units.wind_speed_unit()
    }

    /// English weekday name of the forecast start, e.g. `"Monday"`.
    pub fn day_of_week(&self) -> String {
        self.forecast_start.format("%A").to_string()
    }

    pub fn daytime_icon(&self) -> &'static str {
        icon_for(&self.daytime.condition, DayPart::Daytime)
    }

    pub fn overnight_icon(&self) -> &'static str {
        icon_for(&self.overnight.condition, DayPart::Overnight)
    }
}

fn timestamp(field: &str, value: &str) -> Result<DateTime<FixedOffset>> {
    parse_timestamp(value)
        .ok_or_else(|| Error::MalformedResponse(format!("unparsable {field} timestamp '{value}'")))
}
