//! Cache promotion threshold.
//!
//! The initial threshold comes from the `STRFMT_CACHE_THRESHOLD` environment
//! variable, read once:
//! - `always`, `default` or `0`: every compiled format is cached on first use.
//!   This is also the value when the variable is unset.
//! - `repetitions` or `repeat`: a format is cached on its second miss.
//! - `disabled`, `never` or `off`: nothing is cached.
//! - any other integer `n`: a format is cached once it has missed more than
//!   `n` times.

use std::fmt;
use std::sync::OnceLock;

/// Environment variable holding the initial threshold.
pub const THRESHOLD_ENV: &str = "STRFMT_CACHE_THRESHOLD";

/// Number of misses a format must exceed before its compiled form is cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheThreshold(usize);

impl CacheThreshold {
    /// Cache on first compile.
    pub const ALWAYS: Self = Self(0);
    /// Cache on the second miss.
    pub const REPETITIONS: Self = Self(1);
    /// Never cache.
    pub const DISABLED: Self = Self(usize::MAX);

    #[must_use]
    pub const fn new(misses: usize) -> Self {
        Self(misses)
    }

    #[must_use]
    pub const fn get(self) -> usize {
        self.0
    }

    #[must_use]
    pub const fn is_always(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_disabled(self) -> bool {
        self.0 == usize::MAX
    }

    /// Parse from string (case-insensitive). Accepts the names listed in the
    /// module docs (`always`, `default`, `repetitions`, `repeat`, `disabled`,
    /// `never`, `off`) or a decimal count. Unrecognized input means
    /// [`CacheThreshold::ALWAYS`].
    #[must_use]
    pub fn from_str_loose(s: &str) -> Self {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "always" | "default" => Self::ALWAYS,
            "repetitions" | "repeat" => Self::REPETITIONS,
            "disabled" | "never" | "off" => Self::DISABLED,
            other => other.parse().map(Self).unwrap_or(Self::ALWAYS),
        }
    }
}

impl Default for CacheThreshold {
    fn default() -> Self {
        Self::ALWAYS
    }
}

impl fmt::Display for CacheThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::ALWAYS => f.write_str("always"),
            Self::REPETITIONS => f.write_str("repetitions"),
            Self::DISABLED => f.write_str("disabled"),
            Self(n) => write!(f, "{n}"),
        }
    }
}

static ENV_THRESHOLD: OnceLock<CacheThreshold> = OnceLock::new();

/// Threshold from the environment (read on first call, cached thereafter).
#[must_use]
pub fn env_threshold() -> CacheThreshold {
    *ENV_THRESHOLD.get_or_init(|| {
        std::env::var(THRESHOLD_ENV)
            .map(|v| CacheThreshold::from_str_loose(&v))
            .unwrap_or_default()
    })
}
