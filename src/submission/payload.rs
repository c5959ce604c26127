use serde::Serialize;

use crate::config::SubmissionConfig;

/// Request body for `POST /submit`.
///
/// Field order is part of the wire contract: `score`, `reveal`, `modelIdx`,
/// `fromIdx`. serde serializes struct fields in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPayload {
    pub score: i64,
    pub reveal: bool,
    pub model_idx: i64,
    pub from_idx: i64,
}

impl SubmitPayload {
    /// Compact JSON body, no whitespace.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl From<&SubmissionConfig> for SubmitPayload {
    fn from(config: &SubmissionConfig) -> Self {
        Self {
            score: config.score,
            reveal: config.reveal,
            model_idx: config.model_idx,
            from_idx: config.from_idx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_has_four_fields_in_order() {
        let payload = SubmitPayload {
            score: 87,
            reveal: true,
            model_idx: 2,
            from_idx: 5,
        };
        assert_eq!(
            payload.to_body().unwrap(),
            r#"{"score":87,"reveal":true,"modelIdx":2,"fromIdx":5}"#
        );
    }

    #[test]
    fn reveal_false_and_negative_values() {
        let payload = SubmitPayload {
            score: -3,
            reveal: false,
            model_idx: 0,
            from_idx: -1,
        };
        assert_eq!(
            payload.to_body().unwrap(),
            r#"{"score":-3,"reveal":false,"modelIdx":0,"fromIdx":-1}"#
        );
    }

    #[test]
    fn built_from_submission_config() {
        let config = SubmissionConfig {
            score: 42,
            reveal: false,
            model_idx: 7,
            from_idx: 1,
            ..Default::default()
        };
        let payload = SubmitPayload::from(&config);
        assert_eq!(payload.score, 42);
        assert!(!payload.reveal);
        assert_eq!(payload.model_idx, 7);
        assert_eq!(payload.from_idx, 1);
    }

    #[test]
    fn building_is_deterministic() {
        let config = SubmissionConfig::default();
        let a = SubmitPayload::from(&config).to_body().unwrap();
        let b = SubmitPayload::from(&config).to_body().unwrap();
        assert_eq!(a, b);
    }
}
