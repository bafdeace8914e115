//! 徽章相关实体定义
//!
//! badges 表是目录在数据库中的惰性投影（展示元数据用），
//! user_badges 记录用户持有，(user, badge) 组合唯一且永不删除。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::BadgeSpec;

/// 徽章行
///
/// 首次有用户达标时从目录物化，目录才是阈值的权威来源，
/// 本表只承载展示元数据。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: i64,
    /// 目录中的徽章标识
    pub badge_id: String,
    pub name: String,
    pub description: String,
    /// 授予时的奖励积分
    pub reward_points: i32,
    /// Material Icons 图标名
    pub icon: String,
    /// 十六进制展示色
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Badge {
    /// 从目录定义构造（id 由数据库生成）
    pub fn from_spec(spec: &BadgeSpec) -> Self {
        Self {
            id: 0,
            badge_id: spec.id.to_string(),
            name: spec.name.to_string(),
            description: spec.description.to_string(),
            reward_points: spec.reward_points,
            icon: spec.icon.to_string(),
            color: spec.color.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// 用户持有的徽章
///
/// 一经授予永不撤销，earned_at 供"最近获得"排序。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserBadge {
    pub id: i64,
    pub user_id: String,
    /// badges 表主键
    pub badge_id: i64,
    pub earned_at: DateTime<Utc>,
}

/// 已获得徽章视图
///
/// user_badges 与 badges 连接后的查询结果，供徽章墙展示，非数据库实体。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EarnedBadge {
    /// 目录中的徽章标识
    pub badge_id: String,
    pub name: String,
    pub description: String,
    pub reward_points: i32,
    pub icon: String,
    pub color: String,
    pub earned_at: DateTime<Utc>,
}
