use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::util::format_timestamp;

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

/// A WeatherKit data set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataSet {
    CurrentWeather,
    ForecastDaily,
    ForecastHourly,
    ForecastNextHour,
    WeatherAlerts,
}

impl DataSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataSet::CurrentWeather => "currentWeather",
            DataSet::ForecastDaily => "forecastDaily",
            DataSet::ForecastHourly => "forecastHourly",
            DataSet::ForecastNextHour => "forecastNextHour",
            DataSet::WeatherAlerts => "weatherAlerts",
        }
    }

    pub const fn all() -> &'static [DataSet] {
        &[
            DataSet::CurrentWeather,
            DataSet::ForecastDaily,
            DataSet::ForecastHourly,
            DataSet::ForecastNextHour,
            DataSet::WeatherAlerts,
        ]
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DataSet::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| {
                Error::InvalidArgument(format!(
                    "unknown data set '{s}'. Supported data sets: {}",
                    DataSet::all()
                        .iter()
                        .map(DataSet::as_str)
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// Parameters of a single `/weather` call.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use weatherkit::{DataSet, WeatherRequest};
///
/// let request = WeatherRequest::new(40.7128, -74.0060)
///     .with_language("fr")
///     .with_data_sets([DataSet::ForecastDaily])
///     .with_daily_range(
///         Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap(),
///         Utc.with_ymd_and_hms(2023, 6, 3, 0, 0, 0).unwrap(),
///     );
/// assert_eq!(request.language(), "fr");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRequest {
    latitude: f64,
    longitude: f64,
    language: String,
    timezone: String,
    data_sets: Vec<DataSet>,
    current_as_of: Option<DateTime<Utc>>,
    daily_start: Option<DateTime<Utc>>,
    daily_end: Option<DateTime<Utc>>,
}

impl WeatherRequest {
    /// Current weather and daily forecast, English, New York time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            language: DEFAULT_LANGUAGE.to_string(),
            timezone: DEFAULT_TIMEZONE.to_string(),
            data_sets: vec![DataSet::CurrentWeather, DataSet::ForecastDaily],
            current_as_of: None,
            daily_start: None,
            daily_end: None,
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    pub fn with_data_sets(mut self, data_sets: impl IntoIterator<Item = DataSet>) -> Self {
        self.data_sets = data_sets.into_iter().collect();
        self
    }

    pub fn with_current_as_of(mut self, at: DateTime<Utc>) -> Self {
        self.current_as_of = Some(at);
        self
    }

    pub fn with_daily_start(mut self, start: DateTime<Utc>) -> Self {
        self.daily_start = Some(start);
        self
    }

    pub fn with_daily_end(mut self, end: DateTime<Utc>) -> Self {
        self.daily_end = Some(end);
        self
    }

    /// Sets both ends of a historical daily range.
    pub fn with_daily_range(self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.with_daily_start(start).with_daily_end(end)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn timezone(&self) -> &str {
        &self.timezone
    }

    pub fn data_sets(&self) -> &[DataSet] {
        &self.data_sets
    }

    /// Same location, language and timezone, daily forecast only.
    pub(crate) fn daily_forecast_only(&self) -> Self {
        Self::new(self.latitude, self.longitude)
            .with_language(self.language.clone())
            .with_timezone(self.timezone.clone())
            .with_data_sets([DataSet::ForecastDaily])
    }

    pub(crate) fn path(&self) -> String {
        format!("/weather/{}/{}/{}", self.language, self.latitude, self.longitude)
    }

    /// Validates the request and renders its query string parameters.
    pub(crate) fn query(&self) -> Result<Vec<(String, String)>> {
        let data_sets = self
            .data_sets
            .iter()
            .map(DataSet::as_str)
            .collect::<Vec<_>>()
            .join(",");

        let mut query = vec![
            ("timezone".to_string(), self.timezone.clone()),
            ("dataSets".to_string(), data_sets),
        ];

        match (self.daily_start, self.daily_end) {
            (Some(start), Some(end)) => {
                let start = format_timestamp(&start);
                let current_as_of = self
                    .current_as_of
                    .map(|at| format_timestamp(&at))
                    .unwrap_or_else(|| start.clone());
                query.push(("currentAsOf".to_string(), current_as_of));
                query.push(("dailyStart".to_string(), start));
                query.push(("dailyEnd".to_string(), format_timestamp(&end)));
            }
            (None, None) => {
                if let Some(at) = self.current_as_of {
                    query.push(("currentAsOf".to_string(), format_timestamp(&at)));
                }
            }
            (Some(_), None) => {
                return Err(Error::InvalidArgument(
                    "daily_start was given without daily_end; both are required".to_string(),
                ));
            }
            (None, Some(_)) => {
                return Err(Error::InvalidArgument(
                    "daily_end was given without daily_start; both are required".to_string(),
                ));
            }
        }

        Ok(query)
    }
}
