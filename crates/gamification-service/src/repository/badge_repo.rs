//! 徽章仓储
//!
//! badges 行的惰性物化和 user_badges 的授予写入。
//! (user_id, badge_id) 唯一约束保证同一徽章最多授予一次。

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::traits::BadgeRepositoryTrait;
use crate::catalog::BadgeSpec;
use crate::error::Result;
use crate::models::{Badge, EarnedBadge};

/// 徽章仓储
pub struct BadgeRepository {
    pool: PgPool,
}

impl BadgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 事务内操作 ====================

    /// 在事务内物化目录徽章（已存在则直接取回）
    pub async fn ensure_badge_in_tx(tx: &mut PgConnection, spec: &BadgeSpec) -> Result<Badge> {
        sqlx::query(
            r#"
            INSERT INTO badges (badge_id, name, description, reward_points, icon, color)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (badge_id) DO NOTHING
            "#,
        )
        .bind(spec.id)
        .bind(spec.name)
        .bind(spec.description)
        .bind(spec.reward_points)
        .bind(spec.icon)
        .bind(spec.color)
        .execute(&mut *tx)
        .await?;

        let badge = sqlx::query_as::<_, Badge>(
            r#"
            SELECT id, badge_id, name, description, reward_points, icon, color, created_at
            FROM badges
            WHERE badge_id = $1
            "#,
        )
        .bind(spec.id)
        .fetch_one(&mut *tx)
        .await?;

        Ok(badge)
    }

    /// 在事务内授予徽章，返回新 user_badges 行 ID
    ///
    /// 冲突（已持有，含并发竞争）返回 None，调用方跳过奖励发放。
    pub async fn try_grant_in_tx(
        tx: &mut PgConnection,
        user_id: &str,
        badge_row_id: i64,
    ) -> Result<Option<i64>> {
        let row = sqlx::query(
            r#"
            INSERT INTO user_badges (user_id, badge_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, badge_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(badge_row_id)
        .fetch_optional(tx)
        .await?;

        Ok(row.map(|r| r.get("id")))
    }

    /// 在事务内取用户已持有的徽章标识集合
    pub async fn held_badge_ids_in_tx(
        tx: &mut PgConnection,
        user_id: &str,
    ) -> Result<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT b.badge_id
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(tx)
        .await?;

        Ok(ids.into_iter().collect())
    }
}

#[async_trait]
impl BadgeRepositoryTrait for BadgeRepository {
    async fn list_user_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>> {
        let badges = sqlx::query_as::<_, EarnedBadge>(
            r#"
            SELECT b.badge_id, b.name, b.description, b.reward_points,
                   b.icon, b.color, ub.earned_at
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            ORDER BY ub.earned_at DESC, ub.id DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(badges)
    }

    async fn held_badge_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT b.badge_id
            FROM user_badges ub
            JOIN badges b ON b.id = ub.badge_id
            WHERE ub.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ids.into_iter().collect())
    }

    async fn count_user_badges(&self, user_id: &str) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_badges
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
