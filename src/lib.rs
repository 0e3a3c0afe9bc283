//! A small blocking Rust client for Apple's WeatherKit REST API.
//!
//! The client signs an ES256 developer token from your team id, service id,
//! key id and `.p8` private key, then issues `/weather` requests with it.
//! Transient upstream failures (HTTP 429 and 5xx gateway errors) are retried
//! up to three times.
//!
//! ## Quick start
//! - Configure credentials via environment variables (`WEATHERKIT_TEAM_ID`,
//!   `WEATHERKIT_SERVICE_ID`, `WEATHERKIT_KEY_ID`, `WEATHERKIT_KEY_PATH`) or a
//!   `.weatherkitrc` file (current directory or home directory).
//! - Call [`Client::get_weather`] for the raw JSON, or
//!   [`Client::get_simple_forecast`] for typed daily forecasts.
//!
//! ```no_run
//! use weatherkit::{Client, UnitSystem, WeatherRequest};
//!
//! fn main() -> weatherkit::Result<()> {
//!     let client = Client::from_env()?;
//!     let request = WeatherRequest::new(40.7128, -74.0060);
//!     for day in client.get_simple_forecast(&request, UnitSystem::Imperial)? {
//!         println!(
//!             "{}: {} high {:.0}{}",
//!             day.day_of_week(),
//!             day.daytime_icon(),
//!             day.temperature_high(),
//!             day.temperature_unit()
//!         );
//!     }
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]

mod client;
mod config;
mod error;
mod forecast;
pub mod icons;
mod request;
mod token;
mod transport;
pub mod units;
mod util;

pub use client::{Client, DEFAULT_BASE_URL, RetryPolicy};
pub use config::{Credentials, CredentialsOverrides, DEFAULT_VALIDITY_SECS};
pub use error::{Error, Result};
pub use forecast::{DailyForecast, HalfDayForecast};
pub use request::{DEFAULT_LANGUAGE, DEFAULT_TIMEZONE, DataSet, WeatherRequest};
pub use token::Token;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
pub use units::UnitSystem;
