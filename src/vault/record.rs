//! A single stored credential.
//!
//! `created_at` serializes as epoch seconds.  On read, fractional
//! epoch seconds are accepted too.

use std::fmt;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// The secret for one (service, username) pair plus its metadata.
///
/// Records are never edited in place; `CredentialStore::add_or_replace`
/// swaps in a new record.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    secret: String,

    #[serde(with = "epoch_seconds")]
    created_at: DateTime<Utc>,

    /// Caller-supplied metadata (strength, breach status, ...).
    /// Stored verbatim and never interpreted here.
    #[serde(default)]
    annotation: serde_json::Value,
}

impl CredentialRecord {
    /// Build a record stamped with the current time, in whole seconds.
    pub fn new(secret: impl Into<String>, annotation: serde_json::Value) -> Self {
        Self::with_created_at(secret, annotation, Utc::now().trunc_subsecs(0))
    }

    pub fn with_created_at(
        secret: impl Into<String>,
        annotation: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            secret: secret.into(),
            created_at,
            annotation,
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn annotation(&self) -> &serde_json::Value {
        &self.annotation
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("secret", &"[REDACTED]")
            .field("created_at", &self.created_at)
            .field("annotation", &self.annotation)
            .finish()
    }
}

mod epoch_seconds {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_i64(ts.timestamp())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = f64::deserialize(deserializer)?;
        if !secs.is_finite() {
            return Err(serde::de::Error::custom("created_at is not a finite number"));
        }
        let whole = secs.trunc();
        let nanos = ((secs - whole) * 1e9).round().clamp(0.0, 999_999_999.0) as u32;
        DateTime::from_timestamp(whole as i64, nanos)
            .ok_or_else(|| serde::de::Error::custom(format!("created_at {secs} is out of range")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_created_at_as_epoch_seconds() {
        let ts = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let record = CredentialRecord::with_created_at("pw", json!({"k": 1}), ts);
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({"secret": "pw", "created_at": 1_700_000_000, "annotation": {"k": 1}})
        );
    }

    #[test]
    fn accepts_fractional_epoch_seconds() {
        let record: CredentialRecord = serde_json::from_value(json!({
            "secret": "pw",
            "created_at": 1_700_000_000.5,
            "annotation": {}
        }))
        .unwrap();
        assert_eq!(record.created_at().timestamp(), 1_700_000_000);
        assert_eq!(record.created_at().timestamp_subsec_millis(), 500);
    }

    #[test]
    fn missing_annotation_defaults_to_null() {
        let record: CredentialRecord =
            serde_json::from_value(json!({"secret": "pw", "created_at": 0})).unwrap();
        assert!(record.annotation().is_null());
    }

    #[test]
    fn missing_secret_is_rejected() {
        let result: std::result::Result<CredentialRecord, _> =
            serde_json::from_value(json!({"created_at": 0}));
        assert!(result.is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let record = CredentialRecord::new("hunter2", serde_json::Value::Null);
        assert!(!format!("{record:?}").contains("hunter2"));
    }
}
