use chrono::{Months, NaiveDate};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, QueryBuilder};
use std::time::Duration;
use thiserror::Error;

use crate::models::{CreateProfileRequest, Event, Profile, ProfileSearchQuery, UpdateProfileRequest};

/// Errors that can occur when interacting with PostgreSQL
#[derive(Debug, Error)]
pub enum PostgresError {
    #[error("SQLx error: {0}")]
    SqlxError(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),
}

const PROFILE_COLUMNS: &str = "user_id, display_name, bio, birth_date, gender, orientation, \
     location, relationship_styles, practices, value_tags, intentions, is_visible, created_at, \
     updated_at";

/// Maximum number of upcoming events fed into the recommendation prompt
pub const MAX_EVENT_CANDIDATES: i64 = 50;

/// Maximum page size for profile search
const MAX_SEARCH_LIMIT: u16 = 100;

/// PostgreSQL-backed store for profiles and events
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Create a new client from a connection string and run migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        _acquire_timeout_secs: Option<u64>,
        _idle_timeout_secs: Option<u64>,
    ) -> Result<Self, PostgresError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
        )
        .await
    }

    /// Create a client without connecting or migrating
    ///
    /// Queries fail until the database is reachable. Used by tests and
    /// tooling that must start without a live database.
    pub fn connect_lazy(database_url: &str) -> Result<Self, PostgresError> {
        let pool = PgPoolOptions::new().connect_lazy(database_url)?;
        Ok(Self { pool })
    }

    /// Create the caller's profile
    ///
    /// A user owns at most one profile; a second create fails with
    /// `AlreadyExists`.
    pub async fn create_profile(
        &self,
        user_id: &str,
        req: &CreateProfileRequest,
    ) -> Result<Profile, PostgresError> {
        let query = format!(
            r#"
            INSERT INTO profiles (user_id, display_name, bio, birth_date, gender, orientation,
                location, relationship_styles, practices, value_tags, intentions, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&req.display_name)
            .bind(&req.bio)
            .bind(req.birth_date)
            .bind(&req.gender)
            .bind(&req.orientation)
            .bind(&req.location)
            .bind(&req.relationship_styles)
            .bind(&req.practices)
            .bind(&req.values)
            .bind(&req.intentions)
            .bind(req.is_visible)
            .fetch_optional(&self.pool)
            .await?;

        created.ok_or_else(|| {
            PostgresError::AlreadyExists(format!("Profile already exists for user {}", user_id))
        })
    }

    /// Partially update the caller's profile; absent fields stay unchanged
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: &UpdateProfileRequest,
    ) -> Result<Profile, PostgresError> {
        let query = format!(
            r#"
            UPDATE profiles SET
                display_name = COALESCE($2, display_name),
                bio = COALESCE($3, bio),
                birth_date = COALESCE($4, birth_date),
                gender = COALESCE($5, gender),
                orientation = COALESCE($6, orientation),
                location = COALESCE($7, location),
                relationship_styles = COALESCE($8, relationship_styles),
                practices = COALESCE($9, practices),
                value_tags = COALESCE($10, value_tags),
                intentions = COALESCE($11, intentions),
                is_visible = COALESCE($12, is_visible),
                updated_at = NOW()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        );

        let updated = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .bind(&req.display_name)
            .bind(&req.bio)
            .bind(req.birth_date)
            .bind(&req.gender)
            .bind(&req.orientation)
            .bind(&req.location)
            .bind(&req.relationship_styles)
            .bind(&req.practices)
            .bind(&req.values)
            .bind(&req.intentions)
            .bind(req.is_visible)
            .fetch_optional(&self.pool)
            .await?;

        updated.ok_or_else(|| {
            PostgresError::NotFound(format!("Profile not found for user {}", user_id))
        })
    }

    /// Get a single profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<Profile, PostgresError> {
        let query = format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1");

        let profile = sqlx::query_as::<_, Profile>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        profile.ok_or_else(|| {
            PostgresError::NotFound(format!("Profile not found for user {}", user_id))
        })
    }

    /// Search visible profiles with the given filters, excluding the caller
    ///
    /// Age filters compare against the birth-date window computed in
    /// [`birth_date_window`]; profiles without a birth date are excluded
    /// once an age bound is present.
    pub async fn search_profiles(
        &self,
        caller_id: &str,
        search: &ProfileSearchQuery,
    ) -> Result<Vec<Profile>, PostgresError> {
        let today = chrono::Utc::now().date_naive();
        let (latest_birth, earliest_birth) =
            birth_date_window(search.min_age, search.max_age, today);

        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE is_visible = TRUE"
        ));

        qb.push(" AND user_id <> ");
        qb.push_bind(caller_id.to_string());

        if let Some(latest) = latest_birth {
            qb.push(" AND birth_date <= ");
            qb.push_bind(latest);
        }
        if let Some(earliest) = earliest_birth {
            qb.push(" AND birth_date > ");
            qb.push_bind(earliest);
        }

        if let Some(location) = search.location.as_deref().filter(|l| !l.trim().is_empty()) {
            qb.push(" AND location ILIKE ");
            qb.push_bind(format!("%{}%", location.trim()));
        }

        // Tag filters match profiles carrying any of the requested tags
        let tag_filters = [
            ("practices", ProfileSearchQuery::split_tags(&search.practices)),
            ("value_tags", ProfileSearchQuery::split_tags(&search.values)),
            ("intentions", ProfileSearchQuery::split_tags(&search.intentions)),
        ];
        for (column, tags) in tag_filters {
            if !tags.is_empty() {
                qb.push(format!(" AND {column} && "));
                qb.push_bind(tags);
            }
        }

        let limit = search.limit.min(MAX_SEARCH_LIMIT);
        qb.push(" ORDER BY created_at DESC LIMIT ");
        qb.push_bind(limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(search.offset as i64);

        let profiles = qb
            .build_query_as::<Profile>()
            .fetch_all(&self.pool)
            .await?;

        tracing::debug!("Profile search returned {} results", profiles.len());

        Ok(profiles)
    }

    /// Upcoming events, soonest first, capped at `limit`
    pub async fn upcoming_events(&self, limit: i64) -> Result<Vec<Event>, PostgresError> {
        let query = r#"
            SELECT id, title, description, location, starts_at, tags
            FROM events
            WHERE starts_at > NOW()
            ORDER BY starts_at ASC
            LIMIT $1
        "#;

        let events = sqlx::query_as::<_, Event>(query)
            .bind(limit.min(MAX_EVENT_CANDIDATES))
            .fetch_all(&self.pool)
            .await?;

        Ok(events)
    }

    /// Health check for the database connection
    pub async fn health_check(&self) -> Result<bool, PostgresError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}

/// Birth-date window equivalent to an inclusive [min_age, max_age] filter
///
/// Returns `(latest_birth, earliest_birth_exclusive)`: a member matches when
/// `birth_date <= latest_birth` and `birth_date > earliest_birth_exclusive`.
/// Someone born exactly `min_age` years ago turns `min_age` today and is
/// included; someone born exactly `max_age + 1` years ago turns
/// `max_age + 1` today and is excluded.
pub fn birth_date_window(
    min_age: Option<u16>,
    max_age: Option<u16>,
    today: NaiveDate,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let latest_birth =
        min_age.and_then(|age| today.checked_sub_months(Months::new(12 * age as u32)));
    let earliest_birth =
        max_age.and_then(|age| today.checked_sub_months(Months::new(12 * (age as u32 + 1))));
    (latest_birth, earliest_birth)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_birth_date_window_exact_age() {
        // minAge=30&maxAge=30 on 2025-01-15: only people aged exactly 30
        let today = date(2025, 1, 15);
        let (latest, earliest) = birth_date_window(Some(30), Some(30), today);

        let latest = latest.unwrap();
        let earliest = earliest.unwrap();
        assert_eq!(latest, date(1995, 1, 15));
        assert_eq!(earliest, date(1994, 1, 15));

        // Born on the boundary: turns 30 today, included
        let on_boundary = date(1995, 1, 15);
        assert!(on_boundary <= latest && on_boundary > earliest);

        // Born a day earlier than the lower boundary: already 31, excluded
        let too_old = date(1994, 1, 15);
        assert!(!(too_old > earliest));

        // Born the day after the lower boundary: turns 31 tomorrow, included
        let just_inside = date(1994, 1, 16);
        assert!(just_inside <= latest && just_inside > earliest);
    }

    #[test]
    fn test_birth_date_window_open_ends() {
        let today = date(2025, 1, 15);

        let (latest, earliest) = birth_date_window(Some(18), None, today);
        assert_eq!(latest, Some(date(2007, 1, 15)));
        assert_eq!(earliest, None);

        let (latest, earliest) = birth_date_window(None, Some(40), today);
        assert_eq!(latest, None);
        assert_eq!(earliest, Some(date(1984, 1, 15)));

        assert_eq!(birth_date_window(None, None, today), (None, None));
    }

    #[test]
    fn test_birth_date_window_leap_day() {
        // Subtracting years from Feb 29 clamps to Feb 28
        let today = date(2024, 2, 29);
        let (latest, _) = birth_date_window(Some(30), None, today);
        assert_eq!(latest, Some(date(1994, 2, 28)));
    }
}
