//! 账本仓储
//!
//! 积分流水与行为去重两张只追加表的数据访问。
//! 行为表的组合唯一约束是幂等契约在存储层的兜底。

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Row};

use super::traits::LedgerRepositoryTrait;
use crate::catalog::ActionKind;
use crate::error::Result;
use crate::models::{ActionLogEntry, PointLogEntry};

/// 账本仓储
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 事务内操作 ====================

    /// 在事务内追加积分流水，返回新记录 ID
    pub async fn append_point_log_in_tx(
        tx: &mut PgConnection,
        entry: &PointLogEntry,
    ) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO point_log (user_id, points, reason, total_after, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&entry.user_id)
        .bind(entry.points)
        .bind(&entry.reason)
        .bind(entry.total_after)
        .bind(entry.created_at)
        .fetch_one(tx)
        .await?;

        Ok(row.get("id"))
    }

    /// 在事务内登记行为，返回是否为首次
    ///
    /// 依赖 (user_id, action_kind, action_id) 唯一约束：
    /// 冲突即"已发放过"，返回 false，调用方按无操作处理。
    /// 并发竞争下两个事务同时通过检查时，后提交者在此处落败。
    pub async fn try_log_action_in_tx(
        tx: &mut PgConnection,
        user_id: &str,
        action_kind: ActionKind,
        action_id: &str,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO action_log (user_id, action_kind, action_id)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, action_kind, action_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(action_kind)
        .bind(action_id)
        .execute(tx)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    async fn list_point_log(&self, user_id: &str, limit: i64) -> Result<Vec<PointLogEntry>> {
        let entries = sqlx::query_as::<_, PointLogEntry>(
            r#"
            SELECT id, user_id, points, reason, total_after, created_at
            FROM point_log
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn sum_point_log(&self, user_id: &str) -> Result<i64> {
        let sum: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(points), 0)::BIGINT
            FROM point_log
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum)
    }

    async fn has_action(
        &self,
        user_id: &str,
        action_kind: ActionKind,
        action_id: &str,
    ) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM action_log
                WHERE user_id = $1 AND action_kind = $2 AND action_id = $3
            )
            "#,
        )
        .bind(user_id)
        .bind(action_kind)
        .bind(action_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_actions(&self, user_id: &str, limit: i64) -> Result<Vec<ActionLogEntry>> {
        let entries = sqlx::query_as::<_, ActionLogEntry>(
            r#"
            SELECT id, user_id, action_kind, action_id, created_at
            FROM action_log
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
