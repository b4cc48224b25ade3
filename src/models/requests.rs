use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request a compatibility reading against another member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CompatibilityRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Question for the educational assistant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssistantRequest {
    #[validate(length(min = 1, max = 2000))]
    pub question: String,
}

/// Content screening request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ModerateRequest {
    #[validate(length(min = 1, max = 10000))]
    pub content: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

/// Request conversation starters for another member
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConversationStartersRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Create the caller's profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "display_name", rename = "displayName")]
    pub display_name: String,
    #[validate(length(max = 4000))]
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(alias = "birth_date", rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "relationship_styles", rename = "relationshipStyles", default)]
    pub relationship_styles: Vec<String>,
    #[serde(default)]
    pub practices: Vec<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub intentions: Vec<String>,
    #[serde(alias = "is_visible", rename = "isVisible", default = "default_visible")]
    pub is_visible: bool,
}

fn default_visible() -> bool {
    true
}

/// Partial update of the caller's profile
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    #[serde(alias = "display_name", rename = "displayName", default)]
    pub display_name: Option<String>,
    #[validate(length(max = 4000))]
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(alias = "birth_date", rename = "birthDate", default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub orientation: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(alias = "relationship_styles", rename = "relationshipStyles", default)]
    pub relationship_styles: Option<Vec<String>>,
    #[serde(default)]
    pub practices: Option<Vec<String>>,
    #[serde(default)]
    pub values: Option<Vec<String>>,
    #[serde(default)]
    pub intentions: Option<Vec<String>>,
    #[serde(alias = "is_visible", rename = "isVisible", default)]
    pub is_visible: Option<bool>,
}

/// Profile search filters
///
/// List filters (`practices`, `values`, `intentions`) are comma-separated in
/// the query string and match profiles carrying any of the given tags.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProfileSearchQuery {
    #[validate(range(min = 18, max = 120))]
    #[serde(alias = "min_age", rename = "minAge", default)]
    pub min_age: Option<u16>,
    #[validate(range(min = 18, max = 120))]
    #[serde(alias = "max_age", rename = "maxAge", default)]
    pub max_age: Option<u16>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub practices: Option<String>,
    #[serde(default)]
    pub values: Option<String>,
    #[serde(default)]
    pub intentions: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u16,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u16 {
    20
}

impl ProfileSearchQuery {
    /// Split a comma-separated filter value into trimmed, non-empty tags
    pub fn split_tags(value: &Option<String>) -> Vec<String> {
        value
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tags() {
        let raw = Some("rope, communication,  ,solo-poly".to_string());
        let tags = ProfileSearchQuery::split_tags(&raw);
        assert_eq!(tags, vec!["rope", "communication", "solo-poly"]);
    }

    #[test]
    fn test_split_tags_empty() {
        assert!(ProfileSearchQuery::split_tags(&None).is_empty());
        assert!(ProfileSearchQuery::split_tags(&Some(String::new())).is_empty());
    }

    #[test]
    fn test_moderate_request_rejects_empty_content() {
        let req = ModerateRequest {
            content: String::new(),
            content_type: "profile".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_search_query_age_bounds() {
        let query = ProfileSearchQuery {
            min_age: Some(17),
            max_age: None,
            location: None,
            practices: None,
            values: None,
            intentions: None,
            limit: 20,
            offset: 0,
        };
        assert!(query.validate().is_err());
    }
}
