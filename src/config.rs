//! Service configuration from the environment

use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_REPLY_DELAY_MS: u64 = 500;
const DEFAULT_GREETING_DELAY_MS: u64 = 300;
const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

/// Delays applied before clients see assistant messages
///
/// Purely cosmetic; dialogue state never waits on these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pacing {
    pub reply_delay: Duration,
    pub greeting_delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Always starts and ends with `/`
    pub base_path: String,
    pub pacing: Pacing,
    /// Sessions without requests or an open stream for this long are dropped
    pub session_ttl: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            base_path: "/".to_string(),
            pacing: Pacing {
                reply_delay: Duration::from_millis(DEFAULT_REPLY_DELAY_MS),
                greeting_delay: Duration::from_millis(DEFAULT_GREETING_DELAY_MS),
            },
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let duration = |key: &str, default: Duration, unit: fn(u64) -> Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, unit)
        };

        Self {
            port: lookup("CAMPUS_HELPER_PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(defaults.port),
            base_path: lookup("CAMPUS_HELPER_BASE_PATH")
                .map_or(defaults.base_path, |p| normalize_base_path(&p)),
            pacing: Pacing {
                reply_delay: duration(
                    "CAMPUS_HELPER_REPLY_DELAY_MS",
                    defaults.pacing.reply_delay,
                    Duration::from_millis,
                ),
                greeting_delay: duration(
                    "CAMPUS_HELPER_GREETING_DELAY_MS",
                    defaults.pacing.greeting_delay,
                    Duration::from_millis,
                ),
            },
            session_ttl: duration(
                "CAMPUS_HELPER_SESSION_TTL_SECS",
                defaults.session_ttl,
                Duration::from_secs,
            ),
        }
    }
}

fn normalize_base_path(raw: &str) -> String {
    let inner = raw.trim().trim_matches('/');
    if inner.is_empty() {
        "/".to_string()
    } else {
        format!("/{inner}/")
    }
}
