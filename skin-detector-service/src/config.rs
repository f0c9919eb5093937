use std::time::Duration;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PREDICT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Structured JSON logging for production
    Json,
    /// Human-readable logging for development
    Pretty,
}

/// Settings read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Artificial latency of the predict endpoint
    pub predict_delay: Duration,
    pub log_format: LogFormat,
    /// Values that were rejected while reading the environment. Config is read
    /// before tracing is up, so `main` logs these once the subscriber exists.
    pub warnings: Vec<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            predict_delay: DEFAULT_PREDICT_DELAY,
            log_format: LogFormat::Json,
            warnings: Vec::new(),
        }
    }
}

impl ServiceConfig {
    /// Reads `HOST`, `PORT`, `PREDICT_DELAY_MS` and `LOG_FORMAT`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unparseable values fall back to their defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let mut warnings = Vec::new();

        let host = lookup("HOST")
            .filter(|host| !host.trim().is_empty())
            .unwrap_or(defaults.host);

        let port = parse_or("PORT", lookup("PORT"), defaults.port, &mut warnings);

        let predict_delay = Duration::from_millis(parse_or(
            "PREDICT_DELAY_MS",
            lookup("PREDICT_DELAY_MS"),
            defaults.predict_delay.as_millis() as u64,
            &mut warnings,
        ));

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("pretty") => LogFormat::Pretty,
            None | Some("json") => LogFormat::Json,
            Some(other) => {
                warnings.push(format!(
                    "Invalid value for LOG_FORMAT: {other:?} (expected json or pretty), using json"
                ));
                LogFormat::Json
            }
        };

        Self {
            host,
            port,
            predict_delay,
            log_format,
            warnings,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T, warnings: &mut Vec<String>) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match raw {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!(
                "Invalid value for {key}: {raw:?}, using default {default}"
            ));
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ServiceConfig {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServiceConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config, ServiceConfig::default());
        assert!(config.warnings.is_empty());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.predict_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("PREDICT_DELAY_MS", "250"),
            ("LOG_FORMAT", "pretty"),
        ]);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.predict_delay, Duration::from_millis(250));
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.warnings.is_empty());
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "http"),
            ("PREDICT_DELAY_MS", "soon"),
            ("LOG_FORMAT", "text"),
        ]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.predict_delay, DEFAULT_PREDICT_DELAY);
        assert_eq!(config.log_format, LogFormat::Json);

        assert_eq!(config.warnings.len(), 3);
        for key in ["PORT", "PREDICT_DELAY_MS", "LOG_FORMAT"] {
            assert!(
                config.warnings.iter().any(|warning| warning.contains(key)),
                "no warning for {key}"
            );
        }
    }

    #[test]
    fn test_explicit_json_format_is_not_a_warning() {
        let config = config_from(&[("LOG_FORMAT", "json")]);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.warnings.is_empty());
    }
}
