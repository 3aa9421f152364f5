use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::CreateGoalRequest;
use super::repo_types::WeightGoal;
use super::services::{GoalStatus, GoalType};

const COLUMNS: &str = "id, user_id, start_weight, target_weight, current_weight, goal_type, \
     status, target_date, created_at, updated_at";

impl WeightGoal {
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        req: &CreateGoalRequest,
        goal_type: GoalType,
    ) -> anyhow::Result<Self> {
        let sql = format!(
            r#"
            INSERT INTO weight_goal_logs (user_id, start_weight, target_weight, current_weight,
                                          goal_type, status, target_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .bind(req.start_weight)
            .bind(req.target_weight)
            .bind(req.current_weight.unwrap_or(req.start_weight))
            .bind(goal_type.as_str())
            .bind(GoalStatus::Active.as_str())
            .bind(req.target_date)
            .fetch_one(db)
            .await
            .context("insert weight goal")?;
        Ok(row)
    }

    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<Self>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM weight_goal_logs WHERE user_id = $1 ORDER BY created_at DESC"
        );
        let rows = sqlx::query_as::<_, Self>(&sql)
            .bind(user_id)
            .fetch_all(db)
            .await
            .context("list weight goals")?;
        Ok(rows)
    }

    /// Applies the given changes; `None` when the goal is not the user's.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        id: Uuid,
        current_weight: Option<f64>,
        status: Option<GoalStatus>,
    ) -> anyhow::Result<Option<Self>> {
        let sql = format!(
            r#"
            UPDATE weight_goal_logs
            SET current_weight = COALESCE($3, current_weight),
                status = COALESCE($4, status),
                updated_at = now()
            WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        );
        let row = sqlx::query_as::<_, Self>(&sql)
            .bind(id)
            .bind(user_id)
            .bind(current_weight)
            .bind(status.map(|s| s.as_str()))
            .fetch_optional(db)
            .await
            .context("update weight goal")?;
        Ok(row)
    }
}
