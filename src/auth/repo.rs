use sqlx::PgExecutor;
use uuid::Uuid;

use crate::auth::repo_types::User;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, username, password_hash, is_active, is_verified, \
     last_login, created_at, updated_at";

impl User {
    /// Find a user by username or email, as login identifiers are
    /// interchangeable.
    pub async fn find_by_identifier(
        db: impl PgExecutor<'_>,
        identifier: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE username = $1 OR email = $1
            "#,
        ))
        .bind(identifier)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Find a user holding either of the two unique identities.
    pub async fn find_by_email_or_username(
        db: impl PgExecutor<'_>,
        email: &str,
        username: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE email = $1 OR username = $2
            "#,
        ))
        .bind(email)
        .bind(username)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#,
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password. New accounts start active and
    /// unverified.
    pub async fn create(
        db: impl PgExecutor<'_>,
        first_name: &str,
        last_name: &str,
        email: &str,
        username: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (first_name, last_name, email, username, password_hash, is_active, is_verified)
            VALUES ($1, $2, $3, $4, $5, TRUE, FALSE)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(username)
        .bind(password_hash)
        .fetch_one(db)
        .await
    }

    /// Stamp a successful login.
    pub async fn touch_last_login(db: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_login = now(), updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Delete the user; owned calculations go with it via the FK cascade.
    pub async fn delete(db: impl PgExecutor<'_>, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
