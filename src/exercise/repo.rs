use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::CreateExerciseRequest;
use super::repo_types::ExerciseLog;

const COLUMNS: &str =
    "id, user_id, exercise_type, duration, intensity, calories_burned, notes, date, created_at";

impl ExerciseLog {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateExerciseRequest,
        at: OffsetDateTime,
    ) -> anyhow::Result<Self> {
        let sql = format!(
            r#"
            INSERT INTO exercise_logs (user_id, exercise_type, duration, intensity,
                                       calories_burned, notes, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(req.exercise_type.trim())
            .bind(req.duration)
            .bind(req.intensity.trim())
            .bind(req.calories_burned)
            .bind(req.notes.as_deref())
            .bind(at)
            .fetch_one(db)
            .await
            .context("insert exercise log")?;
        Ok(row)
    }

    pub async fn latest_since(
        db: &PgPool,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Option<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM exercise_logs \
             WHERE user_id = $1 AND date >= $2 ORDER BY date DESC LIMIT 1"
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_optional(db)
            .await
            .context("latest exercise log")?;
        Ok(row)
    }

    /// Entries dated within `[from, to)`, oldest first.
    pub async fn list_between(
        db: &PgPool,
        user_id: Uuid,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> anyhow::Result<Vec<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM exercise_logs \
             WHERE user_id = $1 AND date >= $2 AND date < $3 ORDER BY date ASC"
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(db)
            .await
            .context("list exercise logs")?;
        Ok(rows)
    }

    pub async fn list_since(
        db: &PgPool,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Vec<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM exercise_logs \
             WHERE user_id = $1 AND date >= $2 ORDER BY date ASC"
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_all(db)
            .await
            .context("list exercise logs since")?;
        Ok(rows)
    }

    pub async fn list_all(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM exercise_logs WHERE user_id = $1 ORDER BY date DESC"
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("list all exercise logs")?;
        Ok(rows)
    }
}
