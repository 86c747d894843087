//! Strict parsing of raw perception-service responses.
//!
//! Service implementations speak JSON; these helpers turn raw values into
//! the typed contract and reject anything malformed with a typed error
//! instead of letting loose payloads leak into the engine.

use serde_json::Value;
use tracing::debug;

use crate::errors::PerceptionError;
use crate::types::{CoordinateProposal, TargetProposal, ValidationVerdict};

/// Parse a raw response into ranked target proposals.
///
/// Accepts either a bare array or an object with a `candidates` array.
/// Proposals with out-of-range confidence are rejected, not clamped.
pub fn parse_target_proposals(raw: &Value) -> Result<Vec<TargetProposal>, PerceptionError> {
    let items = candidate_array(raw)?;
    let mut proposals = Vec::with_capacity(items.len());
    for item in items {
        let proposal: TargetProposal = serde_json::from_value(item.clone())
            .map_err(|e| PerceptionError::MalformedResponse(format!("target candidate: {}", e)))?;
        check_confidence(proposal.confidence)?;
        if proposal.selector.trim().is_empty() {
            return Err(PerceptionError::MalformedResponse(
                "target candidate has empty selector".to_string(),
            ));
        }
        proposals.push(proposal);
    }
    debug!("Parsed {} target proposals", proposals.len());
    Ok(proposals)
}

/// Parse a raw response into ranked coordinate proposals.
pub fn parse_coordinate_proposals(raw: &Value) -> Result<Vec<CoordinateProposal>, PerceptionError> {
    let items = candidate_array(raw)?;
    let mut proposals = Vec::with_capacity(items.len());
    for item in items {
        let proposal: CoordinateProposal = serde_json::from_value(item.clone()).map_err(|e| {
            PerceptionError::MalformedResponse(format!("coordinate candidate: {}", e))
        })?;
        check_confidence(proposal.confidence)?;
        proposals.push(proposal);
    }
    debug!("Parsed {} coordinate proposals", proposals.len());
    Ok(proposals)
}

/// Parse a raw response into a validation verdict.
pub fn parse_verdict(raw: &Value) -> Result<ValidationVerdict, PerceptionError> {
    serde_json::from_value(raw.clone())
        .map_err(|e| PerceptionError::MalformedResponse(format!("verdict: {}", e)))
}

fn candidate_array(raw: &Value) -> Result<&Vec<Value>, PerceptionError> {
    match raw {
        Value::Array(items) => Ok(items),
        Value::Object(map) => match map.get("candidates") {
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Err(PerceptionError::MalformedResponse(format!(
                "'candidates' is not an array: {}",
                other
            ))),
            None => Err(PerceptionError::MalformedResponse(
                "response object lacks 'candidates'".to_string(),
            )),
        },
        other => Err(PerceptionError::MalformedResponse(format!(
            "expected array or object, got: {}",
            other
        ))),
    }
}

fn check_confidence(confidence: f64) -> Result<(), PerceptionError> {
    if !(0.0..=1.0).contains(&confidence) {
        return Err(PerceptionError::MalformedResponse(format!(
            "confidence {} outside [0, 1]",
            confidence
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_target_proposals_from_object() {
        let raw = json!({
            "candidates": [
                {"selector": "#save", "confidence": 0.9, "reasoning": "primary button"},
                {"selector": "button.save", "element_kind": "button", "confidence": 0.6}
            ]
        });
        let proposals = parse_target_proposals(&raw).unwrap();
        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].selector, "#save");
        assert_eq!(proposals[1].element_kind.as_deref(), Some("button"));
    }

    #[test]
    fn test_parse_rejects_out_of_range_confidence() {
        let raw = json!([{"selector": "#save", "confidence": 1.4}]);
        let err = parse_target_proposals(&raw).unwrap_err();
        assert!(matches!(err, PerceptionError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_rejects_empty_selector() {
        let raw = json!([{"selector": "  ", "confidence": 0.5}]);
        assert!(parse_target_proposals(&raw).is_err());
    }

    #[test]
    fn test_parse_rejects_non_array_shape() {
        let raw = json!("not a response");
        assert!(parse_target_proposals(&raw).is_err());
        assert!(parse_coordinate_proposals(&json!({"candidates": 3})).is_err());
    }

    #[test]
    fn test_parse_verdict() {
        let raw = json!({"success": true, "reasoning": "dashboard visible"});
        let verdict = parse_verdict(&raw).unwrap();
        assert!(verdict.success);
        assert_eq!(verdict.reasoning, "dashboard visible");

        assert!(parse_verdict(&json!({"reasoning": "missing flag"})).is_err());
    }

    #[test]
    fn test_parse_coordinate_proposals() {
        let raw = json!([{"point": {"x": 12.0, "y": 40.0}, "confidence": 0.8}]);
        let proposals = parse_coordinate_proposals(&raw).unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].point.x, 12.0);
    }
}
