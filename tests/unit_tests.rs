// Unit tests for the prompt -> parse pipeline

use chrono::{NaiveDate, Utc};
use fluide_api::core::prompts::{
    assistant_prompt, compatibility_prompt, event_recommendations_prompt, moderation_prompt,
};
use fluide_api::core::{
    parse_chat_response, parse_compatibility, parse_event_recommendations, parse_moderation,
};
use fluide_api::models::{ModerationKind, Profile};
use fluide_api::services::birth_date_window;

fn create_test_profile(user_id: &str, name: &str, birth_year: i32) -> Profile {
    Profile {
        user_id: user_id.to_string(),
        display_name: name.to_string(),
        bio: Some("Exploring intentional relationships".to_string()),
        birth_date: NaiveDate::from_ymd_opt(birth_year, 5, 20),
        gender: Some("genderfluid".to_string()),
        orientation: Some("pansexual".to_string()),
        location: Some("Montréal, QC".to_string()),
        relationship_styles: vec!["polyamory".to_string(), "relationship-anarchy".to_string()],
        practices: vec!["rope".to_string(), "communication-circles".to_string()],
        values: vec!["consent".to_string(), "transparency".to_string()],
        intentions: vec!["friendship".to_string(), "partnership".to_string()],
        is_visible: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn test_compatibility_pipeline_end_to_end() {
    let a = create_test_profile("u1", "Alex", 1992);
    let b = create_test_profile("u2", "Brice", 1988);
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    let prompt = compatibility_prompt(&a, &b, today);
    assert!(prompt.contains("Alex"));
    assert!(prompt.contains("Brice"));
    assert!(prompt.contains("polyamory"));
    assert!(prompt.contains("Respond ONLY with JSON"));

    // Simulated model reply, fenced the way models often answer
    let reply = "```json\n{\"score\": 88, \"explanation\": \"Shared styles and values\", \
                 \"strengths\": [\"both value transparency\"], \"challenges\": [], \
                 \"recommendations\": [\"discuss pacing\"]}\n```";

    let result = parse_compatibility(reply).unwrap();
    assert!(result.score <= 100);
    assert_eq!(result.score, 88);
    assert_eq!(result.strengths.len(), 1);
}

#[test]
fn test_assistant_pipeline_end_to_end() {
    let profile = create_test_profile("u1", "Alex", 1992);

    let prompt = assistant_prompt("Comment négocier une scène ?", Some(&profile));
    assert!(prompt.contains("Comment négocier une scène ?"));

    let reply = r#"{"message": "Commencez par un échange sur les limites.", "suggestions": ["Qu'est-ce qu'un safeword ?"], "resources": [{"title": "Guide du consentement", "description": "Bases de la négociation"}]}"#;
    let result = parse_chat_response(reply).unwrap();
    assert!(!result.message.is_empty());
    assert_eq!(result.resources.len(), 1);
    assert!(result.resources[0].url.is_none());
}

#[test]
fn test_moderation_pipeline_end_to_end() {
    let prompt = moderation_prompt("Buy followers at spam.example", ModerationKind::Message);
    assert!(prompt.contains("message content"));

    let reply = r#"{"isAppropriate": false, "reasons": ["spam"], "severity": "medium", "suggestions": ["remove the advertisement"]}"#;
    let result = parse_moderation(reply).unwrap();
    assert!(!result.is_appropriate);
    assert_eq!(result.reasons, vec!["spam"]);
}

#[test]
fn test_event_recommendation_pipeline_end_to_end() {
    let profile = create_test_profile("u1", "Alex", 1992);
    let events = vec![
        fluide_api::models::Event {
            id: uuid::Uuid::new_v4(),
            title: "Rope Jam".to_string(),
            description: Some("Peer practice space".to_string()),
            location: Some("Montréal".to_string()),
            starts_at: Utc::now(),
            tags: vec!["rope".to_string()],
        },
        fluide_api::models::Event {
            id: uuid::Uuid::new_v4(),
            title: "Polyam Discussion Circle".to_string(),
            description: None,
            location: None,
            starts_at: Utc::now(),
            tags: vec![],
        },
    ];
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();

    let prompt = event_recommendations_prompt(&profile, &events, today);
    assert!(prompt.contains("1. \"Rope Jam\""));
    assert!(prompt.contains("2. \"Polyam Discussion Circle\""));

    let reply = r#"[{"eventTitle": "Rope Jam", "reason": "matches rope practice", "score": 95},
                    {"eventTitle": "Polyam Discussion Circle", "reason": "matches style", "score": 70}]"#;
    let recommendations = parse_event_recommendations(reply).unwrap();
    assert_eq!(recommendations.len(), 2);
    for rec in &recommendations {
        assert!(rec.score <= 100);
    }
}

#[test]
fn test_scores_always_within_range() {
    // Whatever the model returns, parsed scores stay in [0, 100]
    for raw in ["-50", "0", "49.5", "100", "1000"] {
        let reply = format!("{{\"score\": {raw}}}");
        let result = parse_compatibility(&reply).unwrap();
        assert!(result.score <= 100, "score {} escaped range", result.score);
    }
}

#[test]
fn test_birth_date_window_matches_profile_age() {
    // The SQL window and Profile::age_on must agree on boundaries
    let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
    let (latest, earliest) = birth_date_window(Some(30), Some(30), today);
    let (latest, earliest) = (latest.unwrap(), earliest.unwrap());

    for offset_days in [-400, -366, -1, 0, 1, 366, 400] {
        let birth = latest + chrono::Duration::days(offset_days);
        let mut profile = create_test_profile("u", "U", 1990);
        profile.birth_date = Some(birth);

        let in_window = birth <= latest && birth > earliest;
        let age = profile.age_on(today);
        assert_eq!(
            in_window,
            age == Some(30),
            "window and computed age disagree for birth {birth} (age {age:?})"
        );
    }
}
