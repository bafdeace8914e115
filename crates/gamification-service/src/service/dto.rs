//! 服务层数据传输对象
//!
//! 发放结果和查询视图的结构定义，序列化统一使用 camelCase。

use serde::{Deserialize, Serialize};

use crate::catalog::{Counter, LevelInfo};

/// 本次调用新获得的徽章
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardedBadge {
    pub badge_id: String,
    pub name: String,
    pub reward_points: i32,
}

/// 积分发放结果
///
/// granted 为 false 表示预期内的无操作（重复行为或未知行为类型），
/// 此时不携带积分信息。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardOutcome {
    pub granted: bool,
    /// 本次行为的积分增量（不含徽章奖励）
    pub points: i32,
    /// 发放后的总积分（含本次全部徽章奖励），无操作时为 None
    pub total_after: Option<i64>,
    /// 本次新获得的徽章，按目录顺序
    pub badges_awarded: Vec<AwardedBadge>,
}

impl AwardOutcome {
    /// 发放成功
    pub fn success(points: i32, total_after: i64, badges_awarded: Vec<AwardedBadge>) -> Self {
        Self {
            granted: true,
            points,
            total_after: Some(total_after),
            badges_awarded,
        }
    }

    /// 预期内的无操作（重复或未知行为）
    pub fn skipped() -> Self {
        Self {
            granted: false,
            points: 0,
            total_after: None,
            badges_awarded: Vec::new(),
        }
    }
}

/// 用户统计视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_points: i64,
    pub movies_rated: i32,
    pub movies_watched: i32,
    pub lists_created: i32,
    pub comments_made: i32,
    /// 已获得徽章数
    pub badges_earned: i64,
    /// 目录中的徽章总数
    pub total_badges: i64,
    pub level_info: LevelInfo,
}

/// 单个计数器的达标进度
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CounterProgress {
    pub counter: Counter,
    pub current: i64,
    pub required: i64,
    /// min(100, current / required * 100)
    pub percentage: f64,
}

/// 未获得徽章的进度视图
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub badge_id: String,
    pub name: String,
    pub description: String,
    pub progress: Vec<CounterProgress>,
}

/// 排行榜条目
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 名次，从 1 开始
    pub rank: i64,
    pub user_id: String,
    pub total_points: i64,
    pub level: u8,
    pub level_name: String,
}
