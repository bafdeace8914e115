//! 积分发放服务
//!
//! 处理积分发放的核心业务逻辑，包括：
//! - 行为去重（带去重键的行为幂等）
//! - 计数器累加与积分入账
//! - 流水写入（变动后余额快照）
//! - 徽章评估与奖励积分
//! - 事务性写入与缓存失效
//!
//! ## 发放流程
//!
//! 1. 锁定积分行 -> 2. 去重登记 -> 3. 计数器累加 -> 4. 积分入账 + 流水
//!    -> 5. 徽章评估（奖励积分同事务入账）-> 6. 写回积分行 -> 7. 提交
//!    -> 8. 缓存失效
//!
//! 同一用户的全部写路径都先取积分行的行锁，去重表的组合唯一约束
//! 兜底并发竞争：两个请求同时通过检查时，后提交者的登记落空并回滚。

use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument, warn};

use cinelog_shared::cache::{Cache, CacheKey};

use crate::catalog::{ActionKind, badge_catalog};
use crate::error::{GamificationError, Result};
use crate::models::{PointLogEntry, UserScore};
use crate::repository::{BadgeRepository, LedgerRepository, ScoreRepository};
use crate::service::dto::{AwardOutcome, AwardedBadge};

/// 积分发放服务
///
/// UserScore、point_log、action_log、user_badges 的唯一写入方。
/// 查询方通过 `StatsQueryService` 读取。
pub struct AwardService {
    pool: PgPool,
    cache: Arc<Cache>,
}

impl AwardService {
    pub fn new(pool: PgPool, cache: Arc<Cache>) -> Self {
        Self { pool, cache }
    }

    /// 按行为发放积分（公开入口）
    ///
    /// 带 action_id 的行为幂等：同一 (user, action, action_id) 只发放一次，
    /// 重复调用返回 `granted: false` 且不改动任何状态。
    #[instrument(skip(self, reason), fields(user_id = %user_id, action = %action))]
    pub async fn award_points(
        &self,
        user_id: &str,
        action: ActionKind,
        reason: &str,
        action_id: Option<&str>,
    ) -> Result<AwardOutcome> {
        if user_id.is_empty() {
            return Err(GamificationError::Validation(
                "user_id 不能为空".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        // 1. 锁定（必要时创建）积分行：同一用户的串行化点
        let mut score = ScoreRepository::lock_or_create(&mut tx, user_id).await?;

        // 2. 去重登记：冲突即已发放过，回滚并按无操作返回
        if let Some(action_id) = action_id {
            let first_time =
                LedgerRepository::try_log_action_in_tx(&mut tx, user_id, action, action_id)
                    .await?;
            if !first_time {
                tx.rollback().await?;
                info!(action_id = %action_id, "重复行为，跳过发放");
                return Ok(AwardOutcome::skipped());
            }
        }

        // 3. 计数器累加（点赞类行为无关联计数器）
        if let Some(counter) = action.counter() {
            score.increment_counter(counter);
        }

        // 4. 积分入账 + 流水
        let points = action.point_value();
        score.add_points(points);
        let entry = PointLogEntry::new(user_id, points, reason, score.total_points);
        LedgerRepository::append_point_log_in_tx(&mut tx, &entry).await?;

        // 5. 徽章评估（奖励积分在同一事务内入账）
        let badges_awarded = Self::evaluate_in_tx(&mut tx, &mut score).await?;

        // 6. 写回积分行并提交
        ScoreRepository::update_in_tx(&mut tx, &score).await?;
        tx.commit().await?;

        // 7. 清除缓存
        self.invalidate_user_cache(user_id).await;

        info!(
            points = points,
            total_after = score.total_points,
            new_badges = badges_awarded.len(),
            "积分发放成功"
        );

        Ok(AwardOutcome::success(
            points,
            score.total_points,
            badges_awarded,
        ))
    }

    /// 按行为名称发放积分
    ///
    /// 面向以字符串传递行为类型的协作方。未知行为类型是预期内的
    /// 无操作：不创建积分行，返回 `granted: false`。
    #[instrument(skip(self, reason), fields(user_id = %user_id, action = %action))]
    pub async fn award_points_by_name(
        &self,
        user_id: &str,
        action: &str,
        reason: &str,
        action_id: Option<&str>,
    ) -> Result<AwardOutcome> {
        match ActionKind::from_str(action) {
            Ok(kind) => self.award_points(user_id, kind, reason, action_id).await,
            Err(_) => {
                warn!("未知行为类型，跳过发放");
                Ok(AwardOutcome::skipped())
            }
        }
    }

    /// 单独触发徽章评估（回填入口）
    ///
    /// 不发放行为积分，只根据当前积分行补授徽章（含奖励积分）。
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn evaluate_badges(&self, user_id: &str) -> Result<Vec<AwardedBadge>> {
        let mut tx = self.pool.begin().await?;

        let mut score = ScoreRepository::lock_or_create(&mut tx, user_id).await?;
        let badges_awarded = Self::evaluate_in_tx(&mut tx, &mut score).await?;
        ScoreRepository::update_in_tx(&mut tx, &score).await?;

        tx.commit().await?;

        if !badges_awarded.is_empty() {
            self.invalidate_user_cache(user_id).await;
            info!(new_badges = badges_awarded.len(), "补授徽章完成");
        }

        Ok(badges_awarded)
    }

    // ==================== 私有方法 ====================

    /// 在事务内评估并授予徽章
    ///
    /// 按目录声明顺序单趟扫描：跳过已持有，达标即物化徽章行并授予，
    /// 奖励积分立即累加——同趟中靠后的徽章能看到靠前徽章的奖励，
    /// 靠前的徽章不回头重查，留待下一次外部发放触发。
    async fn evaluate_in_tx(
        tx: &mut sqlx::PgConnection,
        score: &mut UserScore,
    ) -> Result<Vec<AwardedBadge>> {
        let held = BadgeRepository::held_badge_ids_in_tx(&mut *tx, &score.user_id).await?;

        let mut newly_earned = Vec::new();
        for spec in badge_catalog() {
            if held.contains(spec.id) {
                continue;
            }
            if !spec.is_satisfied_by(score) {
                continue;
            }

            let badge = BadgeRepository::ensure_badge_in_tx(&mut *tx, spec).await?;
            let granted =
                BadgeRepository::try_grant_in_tx(&mut *tx, &score.user_id, badge.id).await?;
            if granted.is_none() {
                // 唯一约束冲突：并发下已被授予，按已持有处理
                continue;
            }

            if spec.reward_points > 0 {
                score.add_points(spec.reward_points);
                let reason = format!("Badge bonus: {}", spec.name);
                let entry = PointLogEntry::new(
                    &score.user_id,
                    spec.reward_points,
                    &reason,
                    score.total_points,
                );
                LedgerRepository::append_point_log_in_tx(&mut *tx, &entry).await?;
            }

            newly_earned.push(AwardedBadge {
                badge_id: spec.id.to_string(),
                name: spec.name.to_string(),
                reward_points: spec.reward_points,
            });
        }

        Ok(newly_earned)
    }

    /// 使用户相关缓存失效
    async fn invalidate_user_cache(&self, user_id: &str) {
        let keys = [CacheKey::user_stats(user_id), CacheKey::user_badges(user_id)];

        for key in keys {
            if let Err(e) = self.cache.delete(&key).await {
                warn!(key = %key, error = %e, "缓存失效失败");
            }
        }

        if let Err(e) = self
            .cache
            .delete_pattern(CacheKey::leaderboard_pattern())
            .await
        {
            warn!(error = %e, "排行榜缓存失效失败");
        }
    }
}
