use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::dto::UpsertProfileRequest;
use super::repo_types::HealthProfile;
use super::services::{
    DEFAULT_ACTIVITY_LEVEL, DEFAULT_AGE, DEFAULT_HEIGHT_CM, DEFAULT_WEEKLY_EXERCISE,
    DEFAULT_WEIGHT_KG,
};

const COLUMNS: &str = "id, user_id, age, height, weight, gender, activity_level, weekly_exercise, \
     target_weight, health_goals, bmi, created_at, updated_at";

impl HealthProfile {
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Self>> {
        let sql = format!("SELECT {COLUMNS} FROM health_profiles WHERE user_id = $1");
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .fetch_optional(db)
            .await
            .context("find health profile")?;
        Ok(row)
    }

    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        req: &UpsertProfileRequest,
        bmi: f64,
    ) -> anyhow::Result<Self> {
        let sql = format!(
            r#"
            INSERT INTO health_profiles (user_id, age, height, weight, gender, activity_level,
                                         weekly_exercise, target_weight, health_goals, bmi)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (user_id) DO UPDATE SET
                age = EXCLUDED.age,
                height = EXCLUDED.height,
                weight = EXCLUDED.weight,
                gender = EXCLUDED.gender,
                activity_level = EXCLUDED.activity_level,
                weekly_exercise = EXCLUDED.weekly_exercise,
                target_weight = EXCLUDED.target_weight,
                health_goals = EXCLUDED.health_goals,
                bmi = EXCLUDED.bmi,
                updated_at = now()
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(req.age)
            .bind(req.height)
            .bind(req.weight)
            .bind(req.gender.as_deref())
            .bind(&req.activity_level)
            .bind(req.weekly_exercise)
            .bind(req.target_weight)
            .bind(&req.health_goals)
            .bind(bmi)
            .fetch_one(db)
            .await
            .context("upsert health profile")?;
        Ok(row)
    }

    /// Creates the default profile unless one exists; returns the stored one.
    pub async fn find_or_create_default(db: &PgPool, user_id: Uuid) -> anyhow::Result<Self> {
        let sql = format!(
            r#"
            INSERT INTO health_profiles (user_id, age, height, weight, activity_level,
                                         weekly_exercise, health_goals)
            VALUES ($1, $2, $3, $4, $5, $6, '{{}}')
            ON CONFLICT (user_id) DO NOTHING
            "#
        );
        sqlx::query(&sql)
            .bind(user_id)
            .bind(DEFAULT_AGE)
            .bind(DEFAULT_HEIGHT_CM)
            .bind(DEFAULT_WEIGHT_KG)
            .bind(DEFAULT_ACTIVITY_LEVEL)
            .bind(DEFAULT_WEEKLY_EXERCISE)
            .execute(db)
            .await
            .context("create default health profile")?;

        Self::find_by_user(db, user_id)
            .await?
            .context("health profile missing after insert")
    }

    pub async fn update_bmi(db: &PgPool, id: Uuid, bmi: f64) -> anyhow::Result<()> {
        sqlx::query("UPDATE health_profiles SET bmi = $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(bmi)
            .execute(db)
            .await
            .context("update bmi")?;
        Ok(())
    }

    pub async fn list_created_since(
        db: &PgPool,
        user_id: Uuid,
        since: OffsetDateTime,
    ) -> anyhow::Result<Vec<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM health_profiles \
             WHERE user_id = $1 AND created_at >= $2 ORDER BY created_at ASC"
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(since)
            .fetch_all(db)
            .await
            .context("list health profiles")?;
        Ok(rows)
    }
}
