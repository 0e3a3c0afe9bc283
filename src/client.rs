use chrono::Utc;
use serde_json::{Map, Value};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::forecast::DailyForecast;
use crate::request::WeatherRequest;
use crate::token::Token;
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
use crate::units::UnitSystem;
use crate::util::{retriable_status, truncate_body, urljoin};

pub const DEFAULT_BASE_URL: &str = "https://weatherkit.apple.com/api/v1";

/// How often a request is attempted and how long to wait in between.
///
/// After a failed attempt with zero-based index `n`, the client sleeps
/// `n * delay_unit` before the next one: with the defaults that is no wait
/// before the second attempt and one second before the third.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub delay_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_unit: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Sleep taken after the attempt with zero-based index `attempt` failed.
    pub fn delay_after(&self, attempt: usize) -> Duration {
        self.delay_unit * attempt as u32
    }
}

/// Blocking WeatherKit client holding one signed token.
pub struct Client {
    token: Token,
    credentials: Option<Credentials>,
    base_url: String,
    retry: RetryPolicy,
    clock: fn() -> i64,
    transport: Box<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("token", &self.token)
            .field("credentials", &self.credentials)
            .field("base_url", &self.base_url)
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

fn unix_now() -> i64 {
    Utc::now().timestamp()
}

impl Client {
    /// Creates a client from `WEATHERKIT_*` environment variables and/or
    /// `.weatherkitrc`.
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env()?)
    }

    /// Issues a token from `credentials` and connects through `reqwest`.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let token = Token::issue(&credentials)?;
        let mut client = Self::with_token(token, ReqwestTransport::new()?);
        client.credentials = Some(credentials);
        Ok(client)
    }

    /// Wraps an existing token. Such a client cannot refresh its token.
    pub fn with_token(token: Token, transport: impl Transport + 'static) -> Self {
        Self {
            token,
            credentials: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            retry: RetryPolicy::default(),
            clock: unix_now,
            transport: Box::new(transport),
        }
    }

    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Box::new(transport);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replaces the source of "now" (seconds since epoch) used for expiry checks.
    pub fn with_clock(mut self, clock: fn() -> i64) -> Self {
        self.clock = clock;
        self
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Re-issues the token from the credentials the client was built with.
    pub fn refresh_token(&mut self) -> Result<()> {
        let credentials = self.credentials.as_ref().ok_or_else(|| {
            Error::Config("client was built from a bare token; no credentials to refresh".into())
        })?;
        self.token = Token::issue_at(credentials, (self.clock)())?;
        Ok(())
    }

    /// Fetches the requested data sets and returns the JSON body as is.
    pub fn get_weather(&self, request: &WeatherRequest) -> Result<Map<String, Value>> {
        let now = (self.clock)();
        if self.token.is_expired_at(now) {
            return Err(Error::TokenExpired {
                expired_at: self.token.expiry_time(),
            });
        }

        let http_request = HttpRequest {
            url: urljoin(&self.base_url, &request.path()),
            bearer_token: self.token.as_str().to_string(),
            query: request.query()?,
        };

        let resp = self.execute(&http_request)?;
        match serde_json::from_str::<Value>(&resp.body) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(Error::MalformedResponse(format!(
                "expected a JSON object, got {}",
                truncate_body(&other.to_string())
            ))),
            Err(e) => Err(Error::MalformedResponse(format!(
                "failed to parse API JSON (url={}): {e}",
                http_request.url
            ))),
        }
    }

    /// Fetches the daily forecast for the request's location, language and
    /// timezone and converts every day to `units`.
    ///
    /// Data sets and time range of `request` are ignored.
    pub fn get_simple_forecast(
        &self,
        request: &WeatherRequest,
        units: UnitSystem,
    ) -> Result<Vec<DailyForecast>> {
        let raw = self.get_weather(&request.daily_forecast_only())?;

        let days = raw
            .get("forecastDaily")
            .and_then(|daily| daily.get("days"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                Error::MalformedResponse("response has no forecastDaily.days list".to_string())
            })?;

        days.iter()
            .map(|day| DailyForecast::from_raw(day, units))
            .collect()
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let mut attempt = 0usize;
        loop {
            debug!(url = %request.url, attempt, "requesting WeatherKit");
            let resp = self.transport.get(request)?;
            if resp.is_success() {
                return Ok(resp);
            }

            let retry = retriable_status(resp.status) && attempt + 1 < self.retry.max_attempts;
            if !retry {
                return Err(Error::Http {
                    status: resp.status,
                    url: request.url.clone(),
                    body: truncate_body(&resp.body),
                });
            }

            let delay = self.retry.delay_after(attempt);
            warn!(
                status = resp.status,
                attempt,
                delay_secs = delay.as_secs_f64(),
                "WeatherKit request failed, retrying"
            );
            if !delay.is_zero() {
                thread::sleep(delay);
            }
            attempt += 1;
        }
    }
}
