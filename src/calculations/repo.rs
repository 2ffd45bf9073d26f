use sqlx::PgPool;
use uuid::Uuid;

use crate::calculations::repo_types::Calculation;

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    kind: &str,
    inputs: &serde_json::Value,
) -> anyhow::Result<Calculation> {
    let row = sqlx::query_as::<_, Calculation>(
        r#"
        INSERT INTO calculations (user_id, type, inputs)
        VALUES ($1, $2, $3)
        RETURNING id, user_id, type, inputs, result, created_at, updated_at
        "#,
    )
    .bind(user_id)
    .bind(kind)
    .bind(inputs)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn list_by_user(
    db: &PgPool,
    user_id: Uuid,
    limit: i64,
    offset: i64,
) -> anyhow::Result<Vec<Calculation>> {
    let rows = sqlx::query_as::<_, Calculation>(
        r#"
        SELECT id, user_id, type, inputs, result, created_at, updated_at
        FROM calculations
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get(
    db: &PgPool,
    user_id: Uuid,
    calculation_id: Uuid,
) -> anyhow::Result<Option<Calculation>> {
    let row = sqlx::query_as::<_, Calculation>(
        r#"
        SELECT id, user_id, type, inputs, result, created_at, updated_at
        FROM calculations
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(calculation_id)
    .bind(user_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn update_inputs(
    db: &PgPool,
    user_id: Uuid,
    calculation_id: Uuid,
    inputs: &serde_json::Value,
) -> anyhow::Result<Option<Calculation>> {
    let row = sqlx::query_as::<_, Calculation>(
        r#"
        UPDATE calculations
        SET inputs = $3, updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, type, inputs, result, created_at, updated_at
        "#,
    )
    .bind(calculation_id)
    .bind(user_id)
    .bind(inputs)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn delete(db: &PgPool, user_id: Uuid, calculation_id: Uuid) -> anyhow::Result<bool> {
    let result = sqlx::query(
        r#"
        DELETE FROM calculations
        WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(calculation_id)
    .bind(user_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
