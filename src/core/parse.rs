//! Coercion of model output into the fixed result shapes.
//!
//! The model is instructed to answer with bare JSON, but replies sometimes
//! arrive wrapped in markdown fences or with stray prose around the payload.
//! Parsing is therefore lenient about the envelope and strict about nothing:
//! each mapper applies the documented per-field defaults and bounds instead
//! of rejecting a shape that is merely incomplete.

use serde_json::Value;
use thiserror::Error;

use crate::models::{
    ChatResponse, CompatibilityScore, EventRecommendation, ModerationResult, ResourceLink,
    Severity,
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

/// Strip a surrounding markdown code fence, if any
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Widest substring that starts at the first bracket and ends at the last
fn json_window(text: &str) -> Option<&str> {
    let start = text.find(['{', '['])?;
    let end = text.rfind(['}', ']'])?;
    (end > start).then(|| &text[start..=end])
}

/// Parse model text into a JSON value, tolerating fences and stray prose
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    let cleaned = strip_code_fences(text);
    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Some(window) = json_window(cleaned) {
                if let Ok(value) = serde_json::from_str(window) {
                    return Ok(value);
                }
            }
            Err(ParseError::InvalidJson(err))
        }
    }
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn clamp_score(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Map model output onto a [`CompatibilityScore`]
///
/// The score is clamped into [0, 100]; the explanation defaults to empty and
/// the three lists to empty when absent or not arrays.
pub fn parse_compatibility(text: &str) -> Result<CompatibilityScore, ParseError> {
    let value = parse_value(text)?;

    let score = value
        .get("score")
        .and_then(Value::as_f64)
        .ok_or_else(|| ParseError::UnexpectedShape("missing numeric \"score\"".to_string()))?;

    Ok(CompatibilityScore {
        score: clamp_score(score),
        explanation: value
            .get("explanation")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        strengths: string_list(value.get("strengths")),
        challenges: string_list(value.get("challenges")),
        recommendations: string_list(value.get("recommendations")),
    })
}

/// Map model output onto a [`ChatResponse`]
pub fn parse_chat_response(text: &str) -> Result<ChatResponse, ParseError> {
    let value = parse_value(text)?;

    let message = value
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::UnexpectedShape("missing \"message\"".to_string()))?
        .to_string();

    let resources = value
        .get("resources")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    Some(ResourceLink {
                        title: item.get("title")?.as_str()?.to_string(),
                        description: item
                            .get("description")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        url: item
                            .get("url")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ChatResponse {
        message,
        suggestions: string_list(value.get("suggestions")),
        resources,
    })
}

/// Map model output onto a [`ModerationResult`]
///
/// Screening fails open: `isAppropriate` is true unless the model said
/// `false` explicitly, and severity defaults to low.
pub fn parse_moderation(text: &str) -> Result<ModerationResult, ParseError> {
    let value = parse_value(text)?;

    let is_appropriate = !matches!(value.get("isAppropriate"), Some(Value::Bool(false)));

    let severity = value
        .get("severity")
        .and_then(Value::as_str)
        .and_then(Severity::parse)
        .unwrap_or_default();

    Ok(ModerationResult {
        is_appropriate,
        reasons: string_list(value.get("reasons")),
        severity,
        suggestions: string_list(value.get("suggestions")),
    })
}

/// Map model output onto conversation starter suggestions
pub fn parse_suggestions(text: &str) -> Result<Vec<String>, ParseError> {
    let value = parse_value(text)?;

    // Accept either {"suggestions": [...]} or a bare array
    let suggestions = match &value {
        Value::Array(_) => string_list(Some(&value)),
        _ => string_list(value.get("suggestions")),
    };

    Ok(suggestions)
}

/// Map model output onto an [`EventRecommendation`] list
///
/// A parsed value that is not an array yields an empty list; entries without
/// an event title are skipped.
pub fn parse_event_recommendations(text: &str) -> Result<Vec<EventRecommendation>, ParseError> {
    let value = parse_value(text)?;

    let Some(items) = value.as_array() else {
        return Ok(vec![]);
    };

    Ok(items
        .iter()
        .filter_map(|item| {
            Some(EventRecommendation {
                event_title: item.get("eventTitle")?.as_str()?.to_string(),
                reason: item
                    .get("reason")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                score: clamp_score(item.get("score").and_then(Value::as_f64).unwrap_or(0.0)),
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compatibility_full() {
        let text = r#"{"score": 82, "explanation": "Strong overlap", "strengths": ["values"], "challenges": [], "recommendations": ["talk early"]}"#;
        let result = parse_compatibility(text).unwrap();
        assert_eq!(result.score, 82);
        assert_eq!(result.explanation, "Strong overlap");
        assert_eq!(result.strengths, vec!["values"]);
        assert!(result.challenges.is_empty());
    }

    #[test]
    fn test_parse_compatibility_clamps_score() {
        let high = parse_compatibility(r#"{"score": 250}"#).unwrap();
        assert_eq!(high.score, 100);

        let low = parse_compatibility(r#"{"score": -3}"#).unwrap();
        assert_eq!(low.score, 0);

        let fractional = parse_compatibility(r#"{"score": 66.6}"#).unwrap();
        assert_eq!(fractional.score, 67);
    }

    #[test]
    fn test_parse_compatibility_defaults_lists() {
        let result = parse_compatibility(r#"{"score": 40, "strengths": "not a list"}"#).unwrap();
        assert!(result.strengths.is_empty());
        assert!(result.explanation.is_empty());
    }

    #[test]
    fn test_parse_compatibility_rejects_missing_score() {
        assert!(parse_compatibility(r#"{"explanation": "no score"}"#).is_err());
    }

    #[test]
    fn test_parse_rejects_non_json() {
        assert!(parse_compatibility("I think they'd get along great!").is_err());
        assert!(parse_chat_response("plain prose").is_err());
        assert!(parse_moderation("plain prose").is_err());
        assert!(parse_event_recommendations("plain prose").is_err());
    }

    #[test]
    fn test_fenced_json_is_accepted() {
        let text = "```json\n{\"score\": 71}\n```";
        assert_eq!(parse_compatibility(text).unwrap().score, 71);
    }

    #[test]
    fn test_prose_wrapped_json_is_recovered() {
        let text = "Here is my analysis: {\"score\": 55} hope that helps";
        assert_eq!(parse_compatibility(text).unwrap().score, 55);
    }

    #[test]
    fn test_parse_chat_response_defaults() {
        let result = parse_chat_response(r#"{"message": "Start slow."}"#).unwrap();
        assert_eq!(result.message, "Start slow.");
        assert!(result.suggestions.is_empty());
        assert!(result.resources.is_empty());
    }

    #[test]
    fn test_parse_chat_response_resources() {
        let text = r#"{"message": "ok", "resources": [{"title": "Guide", "description": "Intro", "url": "https://example.org"}, {"description": "missing title"}]}"#;
        let result = parse_chat_response(text).unwrap();
        assert_eq!(result.resources.len(), 1);
        assert_eq!(result.resources[0].title, "Guide");
        assert_eq!(result.resources[0].url.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_moderation_explicit_false() {
        let text = r#"{"isAppropriate": false, "reasons": ["harassment"], "severity": "high"}"#;
        let result = parse_moderation(text).unwrap();
        assert!(!result.is_appropriate);
        assert_eq!(result.severity, Severity::High);
        assert_eq!(result.reasons, vec!["harassment"]);
    }

    #[test]
    fn test_moderation_defaults_open() {
        // Absent or non-boolean verdicts are treated as appropriate
        let absent = parse_moderation(r#"{"severity": "nonsense"}"#).unwrap();
        assert!(absent.is_appropriate);
        assert_eq!(absent.severity, Severity::Low);

        let stringly = parse_moderation(r#"{"isAppropriate": "false"}"#).unwrap();
        assert!(stringly.is_appropriate);
    }

    #[test]
    fn test_parse_suggestions_both_shapes() {
        let wrapped = parse_suggestions(r#"{"suggestions": ["hey", "hi"]}"#).unwrap();
        assert_eq!(wrapped.len(), 2);

        let bare = parse_suggestions(r#"["bonjour"]"#).unwrap();
        assert_eq!(bare, vec!["bonjour"]);
    }

    #[test]
    fn test_event_recommendations_non_array_is_empty() {
        let result = parse_event_recommendations(r#"{"oops": true}"#).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_event_recommendations_skips_untitled() {
        let text = r#"[{"eventTitle": "Rope Jam", "reason": "fits", "score": 90}, {"reason": "no title", "score": 10}]"#;
        let result = parse_event_recommendations(text).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].event_title, "Rope Jam");
        assert_eq!(result[0].score, 90);
    }
}
