//! 仓储 Trait 定义
//!
//! 定义仓储接口，便于服务层依赖抽象而非具体实现，支持 mock 测试

use std::collections::HashSet;

use async_trait::async_trait;

use crate::catalog::ActionKind;
use crate::error::Result;
use crate::models::{ActionLogEntry, EarnedBadge, PointLogEntry, UserScore};

/// 用户积分仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreRepositoryTrait: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserScore>>;
    /// 按总积分降序取前 limit 名
    async fn leaderboard(&self, limit: i64) -> Result<Vec<UserScore>>;
    /// 总积分严格高于给定值的用户数（排名 = 该值 + 1）
    async fn count_higher(&self, total_points: i64) -> Result<i64>;
    /// 全部有积分行的用户 ID（回填用）
    async fn list_user_ids(&self) -> Result<Vec<String>>;
}

/// 账本仓储接口（积分流水 + 行为去重）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LedgerRepositoryTrait: Send + Sync {
    /// 用户最近的积分流水，按时间倒序
    async fn list_point_log(&self, user_id: &str, limit: i64) -> Result<Vec<PointLogEntry>>;
    /// 用户全部流水增量之和（审计回放）
    async fn sum_point_log(&self, user_id: &str) -> Result<i64>;
    /// 行为是否已发放过积分
    async fn has_action(
        &self,
        user_id: &str,
        action_kind: ActionKind,
        action_id: &str,
    ) -> Result<bool>;
    /// 用户最近的去重登记，按时间倒序
    async fn list_actions(&self, user_id: &str, limit: i64) -> Result<Vec<ActionLogEntry>>;
}

/// 徽章仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BadgeRepositoryTrait: Send + Sync {
    /// 用户已获得徽章（含展示元数据），最近获得在前
    async fn list_user_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>>;
    /// 用户已持有的徽章标识集合
    async fn held_badge_ids(&self, user_id: &str) -> Result<HashSet<String>>;
    async fn count_user_badges(&self, user_id: &str) -> Result<i64>;
}
