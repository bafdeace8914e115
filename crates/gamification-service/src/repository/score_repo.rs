//! 用户积分仓储
//!
//! 提供积分行的数据访问。发放路径通过 `lock_or_create` 在事务内
//! 锁定积分行，同一用户的读改写序列由行锁天然串行化。

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use super::traits::ScoreRepositoryTrait;
use crate::error::Result;
use crate::models::UserScore;

/// 用户积分仓储
pub struct ScoreRepository {
    pool: PgPool,
}

impl ScoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ==================== 事务内操作 ====================

    /// 在事务内锁定（必要时创建）用户积分行
    ///
    /// 先做幂等插入再 FOR UPDATE 锁行：行锁是同一用户
    /// 所有发放与徽章评估的串行化点。
    pub async fn lock_or_create(tx: &mut PgConnection, user_id: &str) -> Result<UserScore> {
        sqlx::query(
            r#"
            INSERT INTO user_scores (user_id)
            VALUES ($1)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        let score = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT id, user_id, total_points, movies_rated, movies_watched,
                   lists_created, comments_made, updated_at
            FROM user_scores
            WHERE user_id = $1
            FOR UPDATE
            "#,
        )
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        Ok(score)
    }

    /// 在事务内写回积分行
    ///
    /// 调用方持有行锁并在内存中完成累加，这里整行覆盖写回。
    pub async fn update_in_tx(tx: &mut PgConnection, score: &UserScore) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE user_scores
            SET total_points = $2,
                movies_rated = $3,
                movies_watched = $4,
                lists_created = $5,
                comments_made = $6,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(score.id)
        .bind(score.total_points)
        .bind(score.movies_rated)
        .bind(score.movies_watched)
        .bind(score.lists_created)
        .bind(score.comments_made)
        .execute(&mut *tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ScoreRepositoryTrait for ScoreRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserScore>> {
        let score = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT id, user_id, total_points, movies_rated, movies_watched,
                   lists_created, comments_made, updated_at
            FROM user_scores
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(score)
    }

    async fn leaderboard(&self, limit: i64) -> Result<Vec<UserScore>> {
        let scores = sqlx::query_as::<_, UserScore>(
            r#"
            SELECT id, user_id, total_points, movies_rated, movies_watched,
                   lists_created, comments_made, updated_at
            FROM user_scores
            ORDER BY total_points DESC, user_id ASC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(scores)
    }

    async fn count_higher(&self, total_points: i64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM user_scores
            WHERE total_points > $1
            "#,
        )
        .bind(total_points)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn list_user_ids(&self) -> Result<Vec<String>> {
        let ids: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT user_id
            FROM user_scores
            ORDER BY user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(ids)
    }
}
