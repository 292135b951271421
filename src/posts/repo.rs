use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A feed post. Owner name and avatar are snapshotted at creation so the feed
/// renders without joining users.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub name: String,
    pub avatar: String,
    pub created_at: OffsetDateTime,
}

impl Post {
    /// Explicit ownership predicate gating every destructive post operation.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Post>> {
        let posts = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(posts)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, user_id, text, name, avatar, created_at
            FROM posts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(post)
    }

    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        text: &str,
        name: &str,
        avatar: &str,
    ) -> anyhow::Result<Post> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (user_id, text, name, avatar)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, text, name, avatar, created_at
            "#,
        )
        .bind(user_id)
        .bind(text)
        .bind(name)
        .bind(avatar)
        .fetch_one(db)
        .await?;
        Ok(post)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(owner: Uuid) -> Post {
        Post {
            id: Uuid::new_v4(),
            user_id: owner,
            text: "hello".into(),
            name: "Ada".into(),
            avatar: "https://www.gravatar.com/avatar/x".into(),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn ownership_predicate_matches_owner_only() {
        let owner = Uuid::new_v4();
        let p = post(owner);
        assert!(p.is_owned_by(owner));
        assert!(!p.is_owned_by(Uuid::new_v4()));
    }
}
