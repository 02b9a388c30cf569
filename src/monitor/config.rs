//! Monitor configuration types

use std::collections::HashMap;
use std::time::Duration;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fares::Fare;

pub const DEFAULT_INTERVAL_MINUTES: u64 = 30;
pub const DEFAULT_SOURCE_URL: &str = "https://www.southwest.com/air/booking/select.html";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Route and schedule being watched
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Origin airport code
    pub origin: String,
    /// Destination airport code
    pub destination: String,
    pub outbound_date: NaiveDate,
    pub return_date: NaiveDate,
    /// Adult passengers
    pub passengers: u32,
    /// Pause between the end of one check and the start of the next
    #[serde(with = "minutes_serde", rename = "interval_minutes")]
    pub interval: Duration,
    /// Alert when either leg is at or below this price
    pub deal_threshold: Option<Fare>,
    /// Fare search page
    pub source_url: String,
    pub fetch_timeout_secs: u64,
    /// Where deal alerts go, in addition to the log
    pub targets: Vec<NotifyTarget>,
}

impl MonitorConfig {
    /// Create a config with default interval, no deal alerts and log-only notification
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        outbound_date: NaiveDate,
        return_date: NaiveDate,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            outbound_date,
            return_date,
            passengers: 1,
            interval: Duration::from_secs(DEFAULT_INTERVAL_MINUTES * 60),
            deal_threshold: None,
            source_url: DEFAULT_SOURCE_URL.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            targets: vec![NotifyTarget::Log],
        }
    }

    /// Set polling interval
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set passenger count
    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    /// Enable deal alerts at the given price
    pub fn with_deal_threshold(mut self, threshold: Fare) -> Self {
        self.deal_threshold = Some(threshold);
        self
    }

    /// Set the fare search page
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = url.into();
        self
    }

    /// Add notification target
    pub fn with_target(mut self, target: NotifyTarget) -> Self {
        self.targets.push(target);
        self
    }

    /// Load from `FAREWATCH_*` and `TWILIO_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let require = |key: &'static str| get(key).ok_or(ConfigError::Missing(key));

        let origin = require("FAREWATCH_FROM")?.to_uppercase();
        let destination = require("FAREWATCH_TO")?.to_uppercase();
        let outbound_date = parse_date("FAREWATCH_LEAVE_DATE", &require("FAREWATCH_LEAVE_DATE")?)?;
        let return_date = parse_date("FAREWATCH_RETURN_DATE", &require("FAREWATCH_RETURN_DATE")?)?;

        let mut config = Self::new(origin, destination, outbound_date, return_date);

        if let Some(raw) = get("FAREWATCH_PASSENGERS") {
            config.passengers = parse_positive("FAREWATCH_PASSENGERS", &raw)?;
        }
        if let Some(raw) = get("FAREWATCH_INTERVAL") {
            let minutes: u64 = parse_positive("FAREWATCH_INTERVAL", &raw)?;
            let secs = minutes
                .checked_mul(60)
                .ok_or_else(|| ConfigError::invalid("FAREWATCH_INTERVAL", &raw, "interval too large"))?;
            config.interval = Duration::from_secs(secs);
        }
        if let Some(raw) = get("FAREWATCH_DEAL_PRICE") {
            let threshold = raw
                .trim_start_matches('$')
                .parse::<Fare>()
                .map_err(|e| ConfigError::invalid("FAREWATCH_DEAL_PRICE", &raw, e))?;
            config.deal_threshold = Some(threshold);
        }
        if let Some(url) = get("FAREWATCH_SOURCE_URL") {
            config.source_url = url;
        }
        if let Some(raw) = get("FAREWATCH_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout_secs = parse_positive("FAREWATCH_FETCH_TIMEOUT_SECS", &raw)?;
        }
        if let Some(url) = get("FAREWATCH_WEBHOOK_URL") {
            config.targets.push(NotifyTarget::Webhook {
                url,
                headers: HashMap::new(),
            });
        }

        let twilio = (
            get("TWILIO_ACCOUNT_SID"),
            get("TWILIO_AUTH_TOKEN"),
            get("TWILIO_FROM_NUMBER"),
            get("TWILIO_TO_NUMBER"),
        );
        match twilio {
            (Some(account_sid), Some(auth_token), Some(from), Some(to)) => {
                config.targets.push(NotifyTarget::Sms {
                    account_sid,
                    auth_token,
                    from,
                    to,
                });
            }
            (None, None, None, None) => {}
            _ => {
                tracing::warn!("Incomplete TWILIO_* settings, SMS alerts disabled");
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval.is_zero() {
            return Err(ConfigError::Constraint(
                "polling interval must be greater than zero".to_string(),
            ));
        }
        if self.passengers == 0 {
            return Err(ConfigError::Constraint(
                "passenger count must be at least one".to_string(),
            ));
        }
        if self.return_date < self.outbound_date {
            return Err(ConfigError::Constraint(format!(
                "return date {} is before leave date {}",
                self.return_date, self.outbound_date
            )));
        }
        Ok(())
    }

    pub fn interval_minutes(&self) -> f64 {
        self.interval.as_secs_f64() / 60.0
    }

    /// Human-readable summary, one setting per line
    pub fn settings_lines(&self) -> Vec<String> {
        let threshold = match self.deal_threshold {
            Some(t) => format!("${}", t),
            None => "disabled".to_string(),
        };
        vec![
            format!("Route: {} -> {}", self.origin, self.destination),
            format!("Leave date: {}", self.outbound_date.format(DATE_FORMAT)),
            format!("Return date: {}", self.return_date.format(DATE_FORMAT)),
            format!("Passengers: {}", self.passengers),
            format!("Interval: {} min", self.interval_minutes()),
            format!("Deal price: {}", threshold),
        ]
    }
}

fn parse_date(key: &'static str, raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| ConfigError::invalid(key, raw, e))
}

fn parse_positive<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + Default + PartialEq,
    T::Err: std::fmt::Display,
{
    let value = raw
        .parse::<T>()
        .map_err(|e| ConfigError::invalid(key, raw, e))?;
    if value == T::default() {
        return Err(ConfigError::invalid(key, raw, "must be greater than zero"));
    }
    Ok(value)
}

/// Notification target
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NotifyTarget {
    /// Log to tracing
    Log,
    /// HTTP webhook
    Webhook {
        url: String,
        #[serde(default)]
        headers: HashMap<String, String>,
    },
    /// SMS through the Twilio messages API
    Sms {
        account_sid: String,
        #[serde(skip_serializing)]
        auth_token: String,
        from: String,
        to: String,
    },
}

impl NotifyTarget {
    pub fn kind(&self) -> &'static str {
        match self {
            NotifyTarget::Log => "log",
            NotifyTarget::Webhook { .. } => "webhook",
            NotifyTarget::Sms { .. } => "sms",
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required setting {0}")]
    Missing(&'static str),

    #[error("Invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    Constraint(String),
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, value: &str, reason: impl std::fmt::Display) -> Self {
        ConfigError::Invalid {
            key,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Interval serialization as whole minutes
mod minutes_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(duration.as_secs_f64() / 60.0)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let minutes = f64::deserialize(deserializer)?;
        if !minutes.is_finite() || minutes <= 0.0 {
            return Err(serde::de::Error::custom("interval must be greater than zero"));
        }
        Duration::try_from_secs_f64(minutes * 60.0).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 4] = [
        ("FAREWATCH_FROM", "oak"),
        ("FAREWATCH_TO", "den"),
        ("FAREWATCH_LEAVE_DATE", "2026-12-18"),
        ("FAREWATCH_RETURN_DATE", "2026-12-27"),
    ];

    #[test]
    fn test_defaults_from_required_settings() {
        let config = MonitorConfig::from_lookup(lookup(&REQUIRED)).unwrap();

        assert_eq!(config.origin, "OAK");
        assert_eq!(config.destination, "DEN");
        assert_eq!(config.passengers, 1);
        assert_eq!(config.interval, Duration::from_secs(30 * 60));
        assert_eq!(config.deal_threshold, None);
        assert_eq!(config.source_url, DEFAULT_SOURCE_URL);
        assert!(matches!(config.targets.as_slice(), [NotifyTarget::Log]));
    }

    #[test]
    fn test_optional_settings() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("FAREWATCH_PASSENGERS", "2"),
            ("FAREWATCH_INTERVAL", "5"),
            ("FAREWATCH_DEAL_PRICE", "$150"),
            ("FAREWATCH_WEBHOOK_URL", "http://hooks.local/fares"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_FROM_NUMBER", "+15550001111"),
            ("TWILIO_TO_NUMBER", "+15550002222"),
        ]);

        let config = MonitorConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.passengers, 2);
        assert_eq!(config.interval, Duration::from_secs(5 * 60));
        assert_eq!(config.deal_threshold, Some(150));
        assert_eq!(config.targets.len(), 3);
        assert!(matches!(config.targets[2], NotifyTarget::Sms { .. }));
    }

    #[test]
    fn test_missing_required() {
        let err = MonitorConfig::from_lookup(lookup(&REQUIRED[..3])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("FAREWATCH_RETURN_DATE")));
    }

    #[test]
    fn test_rejects_zero_interval() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FAREWATCH_INTERVAL", "0"));
        let err = MonitorConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "FAREWATCH_INTERVAL",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_overflowing_interval() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("FAREWATCH_INTERVAL", "307445734561825861"));
        let err = MonitorConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "FAREWATCH_INTERVAL",
                ..
            }
        ));
    }

    #[test]
    fn test_deserialize_rejects_huge_interval() {
        let leave = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let mut json = serde_json::to_value(MonitorConfig::new("OAK", "DEN", leave, leave)).unwrap();

        json["interval_minutes"] = serde_json::json!(1e300);
        assert!(serde_json::from_value::<MonitorConfig>(json.clone()).is_err());

        json["interval_minutes"] = serde_json::json!(0.5);
        let config: MonitorConfig = serde_json::from_value(json).unwrap();
        assert_eq!(config.interval, Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_bad_dates() {
        let mut pairs = REQUIRED.to_vec();
        pairs[2] = ("FAREWATCH_LEAVE_DATE", "12/18/2026");
        assert!(matches!(
            MonitorConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Invalid { .. })
        ));

        let mut pairs = REQUIRED.to_vec();
        pairs[3] = ("FAREWATCH_RETURN_DATE", "2026-12-01");
        assert!(matches!(
            MonitorConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Constraint(_))
        ));
    }

    #[test]
    fn test_builder_and_settings_lines() {
        let leave = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let back = NaiveDate::from_ymd_opt(2026, 12, 27).unwrap();
        let config = MonitorConfig::new("OAK", "DEN", leave, back)
            .with_passengers(3)
            .with_interval(Duration::from_secs(15 * 60))
            .with_deal_threshold(99);

        assert!(config.validate().is_ok());
        let lines = config.settings_lines();
        assert_eq!(lines[0], "Route: OAK -> DEN");
        assert!(lines.contains(&"Interval: 15 min".to_string()));
        assert!(lines.contains(&"Deal price: $99".to_string()));
    }

    #[test]
    fn test_interval_serializes_as_minutes() {
        let leave = NaiveDate::from_ymd_opt(2026, 12, 18).unwrap();
        let config = MonitorConfig::new("OAK", "DEN", leave, leave);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["interval_minutes"], serde_json::json!(30.0));
    }
}
