use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Community profile, distinct from the base account record
///
/// One per user, owned exclusively by that user. Never hard-deleted:
/// `is_visible` controls search exposure instead.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "relationshipStyles", default)]
    pub relationship_styles: Vec<String>,
    #[serde(default)]
    pub practices: Vec<String>,
    #[serde(default)]
    #[sqlx(rename = "value_tags")]
    pub values: Vec<String>,
    #[serde(default)]
    pub intentions: Vec<String>,
    #[serde(rename = "isVisible", default = "default_true")]
    pub is_visible: bool,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool { true }

/// Number of practice tags at or above which a member counts as experienced
pub const EXPERIENCED_PRACTICE_COUNT: usize = 3;

impl Profile {
    /// Age in whole years as of `today`, if a birth date is set
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date.and_then(|birth| today.years_since(birth))
    }

    /// Age in whole years as of the current date
    pub fn age(&self) -> Option<u32> {
        self.age_on(Utc::now().date_naive())
    }

    /// Rough experience level inferred from the number of practice tags
    pub fn experience_level(&self) -> &'static str {
        if self.practices.len() >= EXPERIENCED_PRACTICE_COUNT {
            "experienced"
        } else {
            "newcomer"
        }
    }
}

/// Community event, consumed by the recommendation flow
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: uuid::Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(rename = "startsAt")]
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Compatibility estimate between two profiles, produced by the model
///
/// Ephemeral: recomputed on every request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompatibilityScore {
    pub score: u8,
    pub explanation: String,
    pub strengths: Vec<String>,
    pub challenges: Vec<String>,
    pub recommendations: Vec<String>,
}

impl CompatibilityScore {
    /// Static substitute returned when the model call fails or its output
    /// cannot be parsed
    pub fn fallback() -> Self {
        Self {
            score: 50,
            explanation: String::new(),
            strengths: vec![],
            challenges: vec![],
            recommendations: vec![],
        }
    }
}

/// Reply from the educational assistant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatResponse {
    pub message: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    #[serde(default)]
    pub resources: Vec<ResourceLink>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceLink {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ChatResponse {
    pub fn fallback() -> Self {
        Self {
            message: "I'm having technical difficulties right now. Please try again in a \
                      moment, or browse the community resources in the meantime."
                .to_string(),
            suggestions: vec![
                "Try asking your question again".to_string(),
                "Explore the resource library".to_string(),
            ],
            resources: vec![],
        }
    }
}

/// Severity of a moderation finding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "low" => Some(Severity::Low),
            "medium" => Some(Severity::Medium),
            "high" => Some(Severity::High),
            _ => None,
        }
    }
}

/// Outcome of automated content screening
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModerationResult {
    #[serde(rename = "isAppropriate")]
    pub is_appropriate: bool,
    #[serde(default)]
    pub reasons: Vec<String>,
    pub severity: Severity,
    #[serde(default)]
    pub suggestions: Vec<String>,
}

impl ModerationResult {
    /// Fail-open substitute: screening is advisory, so an infrastructure
    /// failure must not block users wholesale
    pub fn fallback() -> Self {
        Self {
            is_appropriate: true,
            reasons: vec![],
            severity: Severity::Low,
            suggestions: vec![],
        }
    }
}

/// Kind of user-submitted content being screened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationKind {
    Profile,
    Message,
    Event,
    Resource,
}

impl ModerationKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "profile" => Some(ModerationKind::Profile),
            "message" => Some(ModerationKind::Message),
            "event" => Some(ModerationKind::Event),
            "resource" => Some(ModerationKind::Resource),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ModerationKind::Profile => "profile",
            ModerationKind::Message => "message",
            ModerationKind::Event => "event",
            ModerationKind::Resource => "resource",
        }
    }
}

/// One candidate event with the model's ranking rationale
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventRecommendation {
    #[serde(rename = "eventTitle")]
    pub event_title: String,
    pub reason: String,
    pub score: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_profile() -> Profile {
        Profile {
            user_id: "u1".to_string(),
            display_name: "Sam".to_string(),
            bio: None,
            birth_date: None,
            gender: None,
            orientation: None,
            location: None,
            relationship_styles: vec![],
            practices: vec![],
            values: vec![],
            intentions: vec![],
            is_visible: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_age_computation() {
        let mut profile = bare_profile();
        profile.birth_date = NaiveDate::from_ymd_opt(1994, 6, 15);

        let before_birthday = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        let on_birthday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        assert_eq!(profile.age_on(before_birthday), Some(29));
        assert_eq!(profile.age_on(on_birthday), Some(30));
    }

    #[test]
    fn test_age_missing_birth_date() {
        let profile = bare_profile();
        assert_eq!(profile.age(), None);
    }

    #[test]
    fn test_experience_level_threshold() {
        let mut profile = bare_profile();
        assert_eq!(profile.experience_level(), "newcomer");

        profile.practices = vec!["a".into(), "b".into()];
        assert_eq!(profile.experience_level(), "newcomer");

        profile.practices.push("c".into());
        assert_eq!(profile.experience_level(), "experienced");
    }

    #[test]
    fn test_compatibility_fallback() {
        let fallback = CompatibilityScore::fallback();
        assert_eq!(fallback.score, 50);
        assert!(fallback.explanation.is_empty());
        assert!(fallback.strengths.is_empty());
    }

    #[test]
    fn test_moderation_fallback_is_open() {
        let fallback = ModerationResult::fallback();
        assert!(fallback.is_appropriate);
        assert_eq!(fallback.severity, Severity::Low);
    }

    #[test]
    fn test_moderation_kind_parse() {
        assert_eq!(ModerationKind::parse("profile"), Some(ModerationKind::Profile));
        assert_eq!(ModerationKind::parse("message"), Some(ModerationKind::Message));
        assert_eq!(ModerationKind::parse("listing"), None);
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
    }
}
