use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey};
use weatherkit::units::{KPH_TO_MPH, MM_TO_INCHES};
use weatherkit::{
    Client, Credentials, DataSet, Error, HttpRequest, HttpResponse, RetryPolicy, Token,
    Transport, UnitSystem, WeatherRequest,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures").join(name)
}

fn credentials() -> Credentials {
    Credentials::new(
        "TEAM123456",
        "com.example.weather",
        "KEY1234567",
        fixture("AuthKey_TEST.p8"),
    )
}

/// Plays back canned responses and records every request it receives.
#[derive(Clone, Default)]
struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<weatherkit::Result<HttpResponse>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl ScriptedTransport {
    fn with(responses: impl IntoIterator<Item = weatherkit::Result<HttpResponse>>) -> Self {
        let transport = Self::default();
        transport.responses.lock().unwrap().extend(responses);
        transport
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn last_request(&self) -> HttpRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, request: &HttpRequest) -> weatherkit::Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request")
    }
}

fn query_value(request: &HttpRequest, key: &str) -> Option<String> {
    request
        .query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}

fn no_wait() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay_unit: Duration::ZERO,
    }
}

#[test]
fn issued_token_verifies_against_public_key() {
    let transport = ScriptedTransport::default();
    let client = Client::new(credentials()).unwrap().with_transport(transport.clone());
    let token = client.token().as_str().to_string();

    let (message, signature) = token.rsplit_once('.').unwrap();
    let public_pem = std::fs::read(fixture("AuthKey_TEST.pub.pem")).unwrap();
    let key = DecodingKey::from_ec_pem(&public_pem).unwrap();
    assert!(
        jsonwebtoken::crypto::verify(signature, message.as_bytes(), &key, Algorithm::ES256)
            .unwrap()
    );

    let claims: serde_json::Value = serde_json::from_slice(
        &URL_SAFE_NO_PAD
            .decode(message.split('.').nth(1).unwrap())
            .unwrap(),
    )
    .unwrap();
    assert_eq!(claims["exp"].as_i64().unwrap(), client.token().expiry_time());
    assert_eq!(
        claims["exp"].as_i64().unwrap() - claims["iat"].as_i64().unwrap(),
        3600
    );
    assert_eq!(transport.calls(), 0);
}

#[test]
fn token_issued_at_t_expires_an_hour_later() {
    const T: i64 = 1_704_067_200;
    fn one_second_past_expiry() -> i64 {
        T + 3601
    }

    let token = Token::issue_at(&credentials(), T).unwrap();
    assert_eq!(token.expiry_time(), T + 3600);

    let transport = ScriptedTransport::default();
    let client = Client::with_token(token, transport.clone()).with_clock(one_second_past_expiry);

    let err = client
        .get_weather(&WeatherRequest::new(40.71, -74.01))
        .unwrap_err();
    assert!(matches!(err, Error::TokenExpired { .. }), "{err}");

    let err = client
        .get_simple_forecast(&WeatherRequest::new(40.71, -74.01), UnitSystem::Metric)
        .unwrap_err();
    assert!(matches!(err, Error::TokenExpired { .. }), "{err}");

    assert_eq!(transport.calls(), 0);
}

#[test]
fn refresh_token_reissues_from_credentials() {
    const LATER: i64 = 4_000_000_000;
    fn later() -> i64 {
        LATER
    }

    let mut client = Client::new(credentials().with_validity_secs(60))
        .unwrap()
        .with_transport(ScriptedTransport::default())
        .with_clock(later);
    assert!(client.token().expiry_time() < LATER);

    client.refresh_token().unwrap();
    assert_eq!(client.token().expiry_time(), LATER + 60);
}

#[test]
fn only_daily_end_is_rejected_before_network() {
    let transport = ScriptedTransport::default();
    let client = Client::new(credentials()).unwrap().with_transport(transport.clone());

    let end = Utc.with_ymd_and_hms(2023, 6, 5, 0, 0, 0).unwrap();
    let err = client
        .get_weather(&WeatherRequest::new(1.0, 2.0).with_daily_end(end))
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument(_)), "{err}");
    assert_eq!(transport.calls(), 0);
}

#[test]
fn historical_request_carries_range_and_bearer_token() {
    let transport = ScriptedTransport::with([Ok(HttpResponse::new(200, "{}"))]);
    let client = Client::new(credentials())
        .unwrap()
        .with_transport(transport.clone())
        .with_base_url("http://localhost:8080/api/v1/");

    let request = WeatherRequest::new(47.6, -122.33)
        .with_language("de")
        .with_timezone("America/Los_Angeles")
        .with_data_sets([DataSet::ForecastDaily, DataSet::ForecastHourly])
        .with_daily_range(
            Utc.with_ymd_and_hms(2023, 6, 1, 7, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2023, 6, 4, 7, 0, 0).unwrap(),
        );
    client.get_weather(&request).unwrap();

    let sent = transport.last_request();
    assert_eq!(sent.url, "http://localhost:8080/api/v1/weather/de/47.6/-122.33");
    assert_eq!(sent.bearer_token, client.token().as_str());
    assert_eq!(query_value(&sent, "timezone").as_deref(), Some("America/Los_Angeles"));
    assert_eq!(
        query_value(&sent, "dataSets").as_deref(),
        Some("forecastDaily,forecastHourly")
    );
    assert_eq!(query_value(&sent, "dailyStart").as_deref(), Some("2023-06-01T07:00:00Z"));
    assert_eq!(query_value(&sent, "dailyEnd").as_deref(), Some("2023-06-04T07:00:00Z"));
    assert_eq!(query_value(&sent, "currentAsOf").as_deref(), Some("2023-06-01T07:00:00Z"));
}

#[test]
fn two_503s_then_success_takes_three_calls() {
    let body = std::fs::read_to_string(fixture("forecast_daily.json")).unwrap();
    let transport = ScriptedTransport::with([
        Ok(HttpResponse::new(503, "unavailable")),
        Ok(HttpResponse::new(503, "unavailable")),
        Ok(HttpResponse::new(200, body)),
    ]);
    let client = Client::new(credentials())
        .unwrap()
        .with_transport(transport.clone())
        .with_retry_policy(no_wait());

    let raw = client.get_weather(&WeatherRequest::new(40.71, -74.01)).unwrap();
    assert_eq!(transport.calls(), 3);
    assert!(raw["forecastDaily"]["days"].is_array());
}

#[test]
fn a_404_is_surfaced_after_one_call() {
    let transport = ScriptedTransport::with([Ok(HttpResponse::new(404, "no such location"))]);
    let client = Client::new(credentials())
        .unwrap()
        .with_transport(transport.clone())
        .with_retry_policy(no_wait());

    let err = client
        .get_weather(&WeatherRequest::new(40.71, -74.01))
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(transport.calls(), 1);
}

#[test]
fn simple_forecast_from_fixture_in_both_unit_systems() {
    let body = std::fs::read_to_string(fixture("forecast_daily.json")).unwrap();
    let transport = ScriptedTransport::with([
        Ok(HttpResponse::new(200, body.clone())),
        Ok(HttpResponse::new(200, body)),
    ]);
    let client = Client::new(credentials())
        .unwrap()
        .with_transport(transport.clone());
    let request = WeatherRequest::new(40.71, -74.01);

    let metric = client
        .get_simple_forecast(&request, UnitSystem::Metric)
        .unwrap();
    assert_eq!(
        query_value(&transport.last_request(), "dataSets").as_deref(),
        Some("forecastDaily")
    );
    let imperial = client
        .get_simple_forecast(&request, UnitSystem::Imperial)
        .unwrap();
    assert_eq!(transport.calls(), 2);

    assert_eq!(metric.len(), 2);
    assert_eq!(imperial.len(), 2);
    assert_eq!(metric[0].day_of_week(), "Monday");
    assert_eq!(metric[1].day_of_week(), "Tuesday");
    assert_eq!(metric[0].daytime_icon(), "⛅");
    assert_eq!(metric[0].overnight_icon(), "🌤️");
    assert_eq!(metric[1].daytime_icon(), "❄️");

    for (m, i) in metric.iter().zip(&imperial) {
        assert_eq!(m.forecast_start(), i.forecast_start());
        assert!((i.temperature_high() - (m.temperature_high() * 9.0 / 5.0 + 32.0)).abs() < 1e-9);
        assert!((i.temperature_low() - (m.temperature_low() * 9.0 / 5.0 + 32.0)).abs() < 1e-9);
        for (mh, ih) in [(m.daytime(), i.daytime()), (m.overnight(), i.overnight())] {
            assert!((ih.wind_speed - mh.wind_speed * KPH_TO_MPH).abs() < 1e-9);
            assert!((ih.snowfall_amount - mh.snowfall_amount * MM_TO_INCHES).abs() < 1e-9);
            assert!(
                (ih.precipitation_amount - mh.precipitation_amount * MM_TO_INCHES).abs() < 1e-9
            );
            assert_eq!(ih.humidity, mh.humidity);
            assert_eq!(ih.condition, mh.condition);
        }
        assert_eq!(i.temperature_unit(), "°F");
        assert_eq!(m.temperature_unit(), "°C");
    }

    assert!((metric[1].daytime().snowfall_amount - 51.0).abs() < 1e-9);
    assert!((imperial[1].daytime().snowfall_amount - 51.0 * MM_TO_INCHES).abs() < 1e-9);
}

#[test]
fn transport_failure_is_returned_without_retry() {
    let transport = ScriptedTransport::with([Err(Error::Transport("dns failure".into()))]);
    let client = Client::new(credentials())
        .unwrap()
        .with_transport(transport.clone())
        .with_retry_policy(no_wait());

    let err = client
        .get_simple_forecast(&WeatherRequest::new(1.0, 2.0), UnitSystem::Imperial)
        .unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "{err}");
    assert_eq!(transport.calls(), 1);
}
