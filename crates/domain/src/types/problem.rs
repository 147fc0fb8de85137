//! Structured, machine-readable failure description carried by the envelope.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Application-level failure reported by the gateway.
///
/// Every canonical field is optional on the wire. Fields outside the
/// canonical schema are kept in [`Problem::extra`] so that schema drift on
/// the server never breaks decoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "BTreeMap::is_empty")]
    details: BTreeMap<String, Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// `"details": null` decodes the same as an absent field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Problem {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self { code: Some(code.into()), message: Some(message.into()), ..Self::default() }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Copy entries from a caller-owned map. Later changes to the caller's
    /// map are not observed by this problem.
    #[must_use]
    pub fn with_details<'a, I>(mut self, details: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a Value)>,
    {
        self.details.extend(details.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn kind(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }

    /// Wire fields not covered by the canonical schema.
    pub fn extra(&self) -> &BTreeMap<String, Value> {
        &self.extra
    }

    /// Fill in the correlation id only when the problem does not carry one.
    pub fn set_correlation_id_if_absent(&mut self, correlation_id: impl Into<String>) {
        if self.correlation_id.is_none() {
            self.correlation_id = Some(correlation_id.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_decode_full_problem() {
        let problem: Problem = serde_json::from_value(json!({
            "code": "quota_exceeded",
            "message": "Too many requests",
            "kind": "policy",
            "correlation_id": "corr-42",
            "details": {"limit": 100}
        }))
        .unwrap();

        assert_eq!(problem.code(), Some("quota_exceeded"));
        assert_eq!(problem.message(), Some("Too many requests"));
        assert_eq!(problem.kind(), Some("policy"));
        assert_eq!(problem.correlation_id(), Some("corr-42"));
        assert_eq!(problem.details().get("limit"), Some(&json!(100)));
        assert!(problem.extra().is_empty());
    }

    #[test]
    fn test_unknown_fields_go_to_extra() {
        let problem: Problem = serde_json::from_value(json!({
            "code": "x",
            "retry_after_ms": 250,
            "docs": "https://example.invalid/x"
        }))
        .unwrap();

        assert_eq!(problem.code(), Some("x"));
        assert_eq!(problem.extra().get("retry_after_ms"), Some(&json!(250)));
        assert_eq!(problem.extra().len(), 2);
        assert!(problem.message().is_none());
    }

    #[test]
    fn test_null_details_decode_as_empty() {
        let problem: Problem = serde_json::from_value(json!({"details": null})).unwrap();
        assert!(problem.details().is_empty());
    }

    #[test]
    fn test_details_are_copied_from_caller_map() {
        let mut caller = BTreeMap::new();
        caller.insert("hint".to_string(), json!("x"));

        let problem = Problem::new("bad_input", "Bad input").with_details(&caller);
        caller.insert("hint".to_string(), json!("mutated"));
        caller.insert("other".to_string(), json!(1));

        assert_eq!(problem.details().len(), 1);
        assert_eq!(problem.details().get("hint"), Some(&json!("x")));
    }

    #[test]
    fn test_correlation_id_is_only_filled_when_absent() {
        let mut with_id = Problem::new("c", "m").with_correlation_id("from-body");
        with_id.set_correlation_id_if_absent("from-header");
        assert_eq!(with_id.correlation_id(), Some("from-body"));

        let mut without_id = Problem::new("c", "m");
        without_id.set_correlation_id_if_absent("from-header");
        assert_eq!(without_id.correlation_id(), Some("from-header"));
    }
}
