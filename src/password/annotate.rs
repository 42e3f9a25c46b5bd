//! Building the annotation stored next to each credential.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::breach::BreachStatus;
use super::strength::{analyse_strength, StrengthReport};

/// Produces the opaque metadata stored alongside a secret.
pub trait Annotator {
    fn annotate(&self, secret: &str) -> Value;
}

/// What `StrengthAnnotator` stores: a strength report and, when one was
/// made, the breach lookup result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub strength: StrengthReport,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breach: Option<BreachStatus>,
}

impl Annotation {
    /// Read back an annotation written by `StrengthAnnotator`.
    ///
    /// `None` for values written by anything else.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }
}

/// Annotates with a strength analysis plus an already known breach
/// status.
///
/// The analysis is run on the secret unless a report was handed in with
/// `with_report`; that report must belong to the same secret.
#[derive(Debug, Default, Clone)]
pub struct StrengthAnnotator {
    report: Option<StrengthReport>,
    breach: Option<BreachStatus>,
}

impl StrengthAnnotator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_breach(breach: BreachStatus) -> Self {
        Self {
            report: None,
            breach: Some(breach),
        }
    }

    /// Reuse a report the caller already computed for this secret.
    pub fn with_report(mut self, report: StrengthReport) -> Self {
        self.report = Some(report);
        self
    }
}

impl Annotator for StrengthAnnotator {
    fn annotate(&self, secret: &str) -> Value {
        let strength = match &self.report {
            Some(report) => report.clone(),
            None => analyse_strength(secret),
        };
        let annotation = Annotation {
            strength,
            breach: self.breach,
        };
        serde_json::to_value(annotation).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::strength::Rating;

    #[test]
    fn annotation_without_breach_omits_field() {
        let value = StrengthAnnotator::new().annotate("abc");
        assert!(value.get("strength").is_some());
        assert!(value.get("breach").is_none());
    }

    #[test]
    fn precomputed_report_is_stored_as_given() {
        let report = analyse_strength("Tr0ub4dor&3xyz");
        let value = StrengthAnnotator::with_breach(BreachStatus::Unknown)
            .with_report(report.clone())
            .annotate("Tr0ub4dor&3xyz");
        assert_eq!(Annotation::from_value(&value).unwrap().strength, report);

        // The secret is not re-analysed when a report is supplied.
        let weak = analyse_strength("abc");
        let value = StrengthAnnotator::new()
            .with_report(weak.clone())
            .annotate("Tr0ub4dor&3xyz");
        assert_eq!(Annotation::from_value(&value).unwrap().strength, weak);
    }

    #[test]
    fn annotation_reads_back() {
        let value = StrengthAnnotator::with_breach(BreachStatus::NotFound).annotate("Tr0ub4dor&3xyz");
        let annotation = Annotation::from_value(&value).unwrap();
        assert_eq!(annotation.strength.rating, Rating::Strong);
        assert_eq!(annotation.breach, Some(BreachStatus::NotFound));
    }

    #[test]
    fn foreign_values_do_not_parse() {
        assert!(Annotation::from_value(&serde_json::json!({"note": "hi"})).is_none());
        assert!(Annotation::from_value(&Value::Null).is_none());
    }
}
