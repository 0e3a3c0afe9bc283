use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default lifetime of an issued token, in seconds.
pub const DEFAULT_VALIDITY_SECS: i64 = 3600;

/// Everything needed to sign WeatherKit tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// 10 character Apple Developer team id.
    pub team_id: String,
    /// Service id registered for WeatherKit, e.g. `com.example.weather`.
    pub service_id: String,
    /// 10 character id of the private key.
    pub key_id: String,
    /// Path to the `.p8` private key downloaded from Apple.
    pub key_path: PathBuf,
    /// Lifetime of each issued token, in seconds.
    pub validity_secs: i64,
}

impl Credentials {
    pub fn new(
        team_id: impl Into<String>,
        service_id: impl Into<String>,
        key_id: impl Into<String>,
        key_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            team_id: team_id.into(),
            service_id: service_id.into(),
            key_id: key_id.into(),
            key_path: key_path.into(),
            validity_secs: DEFAULT_VALIDITY_SECS,
        }
    }

    pub fn with_validity_secs(mut self, validity_secs: i64) -> Self {
        self.validity_secs = validity_secs;
        self
    }

    /// Resolves credentials from the environment and `.weatherkitrc`.
    ///
    /// This is equivalent to `Credentials::load(CredentialsOverrides::default())`.
    pub fn from_env() -> Result<Self> {
        Self::load(CredentialsOverrides::default())
    }

    /// Resolves credentials using (in order of precedence):
    /// - explicit values in `overrides`
    /// - `WEATHERKIT_*` environment variables
    /// - config file from `WEATHERKIT_RC` or `.weatherkitrc`
    pub fn load(overrides: CredentialsOverrides) -> Result<Self> {
        let mut partial = overrides.or(RcConfig::from_env());

        let candidates = rc_candidates();
        if !partial.is_complete() {
            if let Some(rc_path) = candidates.iter().find(|p| p.exists()) {
                partial = partial.or(read_rc(rc_path)?);
            }
        }

        let team_id = require(partial.team_id, "team_id", "WEATHERKIT_TEAM_ID", &candidates)?;
        let service_id = require(
            partial.service_id,
            "service_id",
            "WEATHERKIT_SERVICE_ID",
            &candidates,
        )?;
        let key_id = require(partial.key_id, "key_id", "WEATHERKIT_KEY_ID", &candidates)?;
        let key_path = require(partial.key_path, "key_path", "WEATHERKIT_KEY_PATH", &candidates)?;
        let validity_secs = match partial.expiry {
            Some(v) => parse_expiry(&v)?,
            None => DEFAULT_VALIDITY_SECS,
        };

        Ok(Credentials {
            team_id,
            service_id,
            key_id,
            key_path: PathBuf::from(key_path),
            validity_secs,
        })
    }
}

/// Explicit values that take precedence over the environment and rc files.
#[derive(Debug, Clone, Default)]
pub struct CredentialsOverrides {
    pub team_id: Option<String>,
    pub service_id: Option<String>,
    pub key_id: Option<String>,
    pub key_path: Option<PathBuf>,
    pub validity_secs: Option<i64>,
}

impl CredentialsOverrides {
    fn or(self, fallback: RcConfig) -> RcConfig {
        RcConfig {
            team_id: self.team_id,
            service_id: self.service_id,
            key_id: self.key_id,
            key_path: self.key_path.map(|p| p.display().to_string()),
            expiry: self.validity_secs.map(|v| v.to_string()),
        }
        .or(fallback)
    }
}

#[derive(Debug, Default, Clone)]
struct RcConfig {
    team_id: Option<String>,
    service_id: Option<String>,
    key_id: Option<String>,
    key_path: Option<String>,
    expiry: Option<String>,
}

impl RcConfig {
    fn from_env() -> Self {
        RcConfig {
            team_id: std::env::var("WEATHERKIT_TEAM_ID").ok(),
            service_id: std::env::var("WEATHERKIT_SERVICE_ID").ok(),
            key_id: std::env::var("WEATHERKIT_KEY_ID").ok(),
            key_path: std::env::var("WEATHERKIT_KEY_PATH").ok(),
            expiry: std::env::var("WEATHERKIT_EXPIRY").ok(),
        }
    }

    fn or(self, fallback: RcConfig) -> RcConfig {
        RcConfig {
            team_id: self.team_id.or(fallback.team_id),
            service_id: self.service_id.or(fallback.service_id),
            key_id: self.key_id.or(fallback.key_id),
            key_path: self.key_path.or(fallback.key_path),
            expiry: self.expiry.or(fallback.expiry),
        }
    }

    fn is_complete(&self) -> bool {
        self.team_id.is_some()
            && self.service_id.is_some()
            && self.key_id.is_some()
            && self.key_path.is_some()
            && self.expiry.is_some()
    }

    fn set(&mut self, key: &str, value: &str) {
        let slot = match key {
            "team_id" => &mut self.team_id,
            "service_id" => &mut self.service_id,
            "key_id" => &mut self.key_id,
            "key_path" => &mut self.key_path,
            "expiry" => &mut self.expiry,
            _ => return,
        };
        *slot = Some(value.to_string());
    }
}

fn require(
    value: Option<String>,
    name: &str,
    env: &str,
    candidates: &[PathBuf],
) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ if candidates.is_empty() => Err(Error::Config(format!(
            "missing {name} (set {env} or create .weatherkitrc)"
        ))),
        _ => Err(Error::Config(format!(
            "missing {name} (set {env} or put `{name}:` in one of: {})",
            candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

fn parse_expiry(v: &str) -> Result<i64> {
    match v.trim().parse::<i64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(Error::Config(format!(
            "expiry must be a positive number of seconds, got '{v}'"
        ))),
    }
}

fn read_rc(path: &Path) -> Result<RcConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;
    Ok(parse_rc(&text))
}

fn parse_rc(text: &str) -> RcConfig {
    let mut cfg = RcConfig::default();

    // A key may have its value on the following line.
    let mut pending_key: Option<&str> = None;

    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(pk) = pending_key.take() {
            if !line.contains(':') {
                cfg.set(pk, strip_quotes(line));
                continue;
            }
        }

        if let Some((k, v)) = line.split_once(':') {
            let k = k.trim();
            let v = strip_quotes(v.trim());
            if v.is_empty() {
                pending_key = Some(k);
            } else {
                cfg.set(k, v);
            }
        }
    }

    cfg
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    if (s.starts_with('"') && s.ends_with('"') && s.len() >= 2)
        || (s.starts_with('\'') && s.ends_with('\'') && s.len() >= 2)
    {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

fn rc_candidates() -> Vec<PathBuf> {
    // 1) WEATHERKIT_RC (explicit)
    // 2) ./.weatherkitrc
    // 3) ~/.weatherkitrc
    if let Ok(p) = std::env::var("WEATHERKIT_RC") {
        return vec![PathBuf::from(p)];
    }

    let mut v = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        v.push(cwd.join(".weatherkitrc"));
    }
    if let Some(home) = dirs::home_dir() {
        v.push(home.join(".weatherkitrc"));
    }
    v
}
