use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Utc};

/// Bearer token issued by the identity provider.
///
/// Carries no expiry: it lives exactly as long as the provider that acquired
/// it. An authorization failure on a later call is the only staleness signal.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    value: String,
    acquired_at: DateTime<Utc>,
}

impl AccessToken {
    /// Wraps a freshly issued token value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            acquired_at: Utc::now(),
        }
    }

    /// Returns the opaque token value.
    #[must_use]
    pub fn value(&self) -> &str {
        self.value.as_str()
    }

    /// Returns when the token was acquired.
    #[must_use]
    pub fn acquired_at(&self) -> DateTime<Utc> {
        self.acquired_at
    }
}

impl Debug for AccessToken {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AccessToken")
            .field("value", &"<redacted>")
            .field("acquired_at", &self.acquired_at)
            .finish()
    }
}
