use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::dto::ProfileUpsert;

/// One experience entry inside a profile. Stored as a JSONB array element,
/// identified by a server-generated id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Experience {
    pub id: Uuid,
    pub title: String,
    pub company: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub from: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One education entry inside a profile.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Education {
    pub id: Uuid,
    pub school: String,
    pub degree: String,
    pub field_of_study: String,
    pub from: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Date>,
    #[serde(default)]
    pub current: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Profile row, one per owner (`user_id` is unique).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub status: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience: Json<Vec<Experience>>,
    pub education: Json<Vec<Education>>,
    pub updated_at: OffsetDateTime,
}

/// Profile joined with its owner's public fields, for the public listing.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ProfileWithOwner {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub profile: Profile,
    pub name: String,
    pub avatar: String,
}

/// Anything stored in an owned, id-addressed sub-collection.
pub trait SubRecord {
    fn record_id(&self) -> Uuid;
}

impl SubRecord for Experience {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

impl SubRecord for Education {
    fn record_id(&self) -> Uuid {
        self.id
    }
}

/// New entries go to the front, newest first.
pub fn prepend_entry<T: SubRecord>(entries: &mut Vec<T>, entry: T) {
    entries.insert(0, entry);
}

/// Removes the entry with the given id. Returns false (array untouched) when
/// the id is unknown.
pub fn remove_entry<T: SubRecord>(entries: &mut Vec<T>, id: Uuid) -> bool {
    match entries.iter().position(|e| e.record_id() == id) {
        Some(idx) => {
            entries.remove(idx);
            true
        }
        None => false,
    }
}

const PROFILE_COLUMNS: &str =
    "id, user_id, company, website, location, status, bio, skills, experience, education, updated_at";

impl Profile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?;
        Ok(profile)
    }

    pub async fn list_with_owner(db: &PgPool) -> anyhow::Result<Vec<ProfileWithOwner>> {
        let rows = sqlx::query_as::<_, ProfileWithOwner>(
            r#"
            SELECT p.id, p.user_id, p.company, p.website, p.location, p.status, p.bio,
                   p.skills, p.experience, p.education, p.updated_at,
                   u.name, u.avatar
            FROM profiles p
            JOIN users u ON u.id = p.user_id
            ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    /// Create-if-absent-else-update, keyed by owner. The row-level race is
    /// resolved by the store via ON CONFLICT.
    pub async fn upsert(db: &PgPool, user_id: Uuid, fields: &ProfileUpsert) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, company, website, location, status, bio, skills)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                company = COALESCE(EXCLUDED.company, profiles.company),
                website = COALESCE(EXCLUDED.website, profiles.website),
                location = COALESCE(EXCLUDED.location, profiles.location),
                status = COALESCE(EXCLUDED.status, profiles.status),
                bio = COALESCE(EXCLUDED.bio, profiles.bio),
                skills = COALESCE($8, profiles.skills),
                updated_at = now()
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(&fields.company)
        .bind(&fields.website)
        .bind(&fields.location)
        .bind(&fields.status)
        .bind(&fields.bio)
        .bind(fields.skills.clone().unwrap_or_default())
        .bind(&fields.skills)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn save_experience(
        db: &PgPool,
        user_id: Uuid,
        entries: &[Experience],
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET experience = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    pub async fn save_education(
        db: &PgPool,
        user_id: Uuid,
        entries: &[Education],
    ) -> anyhow::Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            UPDATE profiles
            SET education = $2, updated_at = now()
            WHERE user_id = $1
            RETURNING {PROFILE_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(Json(entries))
        .fetch_one(db)
        .await?;
        Ok(profile)
    }

    /// Removes the owner's posts, profile and user record, in one transaction.
    pub async fn delete_account(db: &PgPool, user_id: Uuid) -> anyhow::Result<()> {
        let mut tx = db.begin().await?;
        sqlx::query("DELETE FROM posts WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}
