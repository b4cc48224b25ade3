//! Prompt construction for the model gateway.
//!
//! Every prompt sent to the model is assembled here so the texts can be
//! audited and tuned in one place. All builders are pure functions of their
//! input: profile fields that are absent render as "Not specified" (never an
//! empty list literal), and every prompt ends with an explicit
//! respond-only-with-JSON instruction, which the response parser relies on.

use chrono::NaiveDate;

use crate::models::{Event, ModerationKind, Profile};

/// Shared persona preamble for the relationship-focused prompts
const PERSONA: &str = "You are a relationship and compatibility expert for Fluide, a community \
platform for people exploring ethical non-monogamy, BDSM and other alternative relationship \
practices. You are sex-positive, inclusive and non-judgmental.";

/// Persona for the educational assistant
const EDUCATOR_PERSONA: &str = "You are an educational guide for Fluide, a community platform \
for people exploring ethical non-monogamy, BDSM and other alternative relationship practices. \
You give accurate, consent-focused, non-judgmental answers and point to reputable resources \
where helpful.";

/// Persona for the content moderator
const MODERATOR_PERSONA: &str = "You are a content moderator for Fluide, a sex-positive \
community platform. Frank discussion of relationships, kink and sexuality is welcome; \
harassment, hate speech, non-consensual content, doxxing, spam and solicitation are not.";

const JSON_ONLY: &str = "Respond ONLY with JSON in this exact structure:";

fn text_or_unspecified(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(text) if !text.trim().is_empty() => text,
        _ => "Not specified",
    }
}

fn list_or_unspecified(tags: &[String]) -> String {
    if tags.is_empty() {
        "Not specified".to_string()
    } else {
        tags.join(", ")
    }
}

fn age_or_unspecified(profile: &Profile, today: NaiveDate) -> String {
    match profile.age_on(today) {
        Some(age) => age.to_string(),
        None => "Not specified".to_string(),
    }
}

/// Render one profile as an indented block of labelled fields
fn profile_block(label: &str, profile: &Profile, today: NaiveDate) -> String {
    format!(
        "{label}:\n\
         - Name: {}\n\
         - Age: {}\n\
         - Gender: {}\n\
         - Orientation: {}\n\
         - Location: {}\n\
         - Bio: {}\n\
         - Relationship styles: {}\n\
         - Practices: {}\n\
         - Values: {}\n\
         - Intentions: {}",
        profile.display_name,
        age_or_unspecified(profile, today),
        text_or_unspecified(&profile.gender),
        text_or_unspecified(&profile.orientation),
        text_or_unspecified(&profile.location),
        text_or_unspecified(&profile.bio),
        list_or_unspecified(&profile.relationship_styles),
        list_or_unspecified(&profile.practices),
        list_or_unspecified(&profile.values),
        list_or_unspecified(&profile.intentions),
    )
}

/// Prompt for a compatibility reading between two profiles
pub fn compatibility_prompt(person: &Profile, target: &Profile, today: NaiveDate) -> String {
    format!(
        "{PERSONA}\n\n\
         Analyze the compatibility of these two member profiles.\n\n\
         {}\n\n\
         {}\n\n\
         Consider alignment of relationship styles, practices, values and intentions, and be \
         honest about friction points.\n\n\
         {JSON_ONLY}\n\
         {{\n\
         \x20 \"score\": <integer 0-100>,\n\
         \x20 \"explanation\": \"<short explanation>\",\n\
         \x20 \"strengths\": [\"<strength>\"],\n\
         \x20 \"challenges\": [\"<challenge>\"],\n\
         \x20 \"recommendations\": [\"<recommendation>\"]\n\
         }}",
        profile_block("Person A", person, today),
        profile_block("Person B", target, today),
    )
}

/// Prompt for the educational Q&A assistant
///
/// The caller's profile is optional context; when present, the member's
/// inferred experience level shapes the depth of the answer.
pub fn assistant_prompt(question: &str, profile: Option<&Profile>) -> String {
    let context = match profile {
        Some(p) => format!(
            "The member asking is a {} (practices: {}, intentions: {}). Adjust depth \
             accordingly.",
            p.experience_level(),
            list_or_unspecified(&p.practices),
            list_or_unspecified(&p.intentions),
        ),
        None => "No member context is available; assume a newcomer.".to_string(),
    };

    format!(
        "{EDUCATOR_PERSONA}\n\n\
         {context}\n\n\
         Question: {question}\n\n\
         Answer in the language the question was asked in.\n\n\
         {JSON_ONLY}\n\
         {{\n\
         \x20 \"message\": \"<answer>\",\n\
         \x20 \"suggestions\": [\"<short follow-up question>\"],\n\
         \x20 \"resources\": [{{\"title\": \"<title>\", \"description\": \"<description>\", \
         \"url\": \"<optional url>\"}}]\n\
         }}"
    )
}

/// Prompt for content screening
pub fn moderation_prompt(content: &str, kind: ModerationKind) -> String {
    format!(
        "{MODERATOR_PERSONA}\n\n\
         Screen the following {} content:\n\n\
         ---\n{content}\n---\n\n\
         {JSON_ONLY}\n\
         {{\n\
         \x20 \"isAppropriate\": <true|false>,\n\
         \x20 \"reasons\": [\"<reason if inappropriate>\"],\n\
         \x20 \"severity\": \"low\" | \"medium\" | \"high\",\n\
         \x20 \"suggestions\": [\"<how to improve the content>\"]\n\
         }}",
        kind.as_str(),
    )
}

/// Prompt for conversation starter suggestions between two profiles
pub fn conversation_starters_prompt(
    person: &Profile,
    target: &Profile,
    today: NaiveDate,
) -> String {
    format!(
        "{PERSONA}\n\n\
         Suggest 5 conversation starters that {} could send to {}. Draw on shared interests \
         and be specific to these profiles, not generic. Write each starter in the language \
         of the recipient's profile.\n\n\
         {}\n\n\
         {}\n\n\
         {JSON_ONLY}\n\
         {{\n\
         \x20 \"suggestions\": [\"<starter>\"]\n\
         }}",
        person.display_name,
        target.display_name,
        profile_block("Sender", person, today),
        profile_block("Recipient", target, today),
    )
}

/// Prompt ranking upcoming events for a member
pub fn event_recommendations_prompt(
    profile: &Profile,
    events: &[Event],
    today: NaiveDate,
) -> String {
    let mut listing = String::new();
    for (i, event) in events.iter().enumerate() {
        listing.push_str(&format!(
            "{}. \"{}\" on {} - {} (tags: {})\n",
            i + 1,
            event.title,
            event.starts_at.format("%Y-%m-%d"),
            event
                .description
                .as_deref()
                .filter(|d| !d.trim().is_empty())
                .unwrap_or("No description"),
            list_or_unspecified(&event.tags),
        ));
    }

    format!(
        "{PERSONA}\n\n\
         Rank the upcoming events below for this member. Score every listed event.\n\n\
         {}\n\n\
         Upcoming events:\n{listing}\n\
         {JSON_ONLY}\n\
         [\n\
         \x20 {{\"eventTitle\": \"<exact title>\", \"reason\": \"<why it fits>\", \
         \"score\": <integer 0-100>}}\n\
         ]",
        profile_block("Member", profile, today),
    )
}
