//! 积分流水与行为去重账本
//!
//! 两张只追加的表：积分流水记录每次变动及变动后余额，
//! 行为账本以 (user, action_kind, action_id) 唯一键挡住重复发放。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::ActionKind;

/// 积分流水
///
/// 每条记录包含增量和变动后余额，从零回放全部增量
/// 必须恰好得到当前总积分。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PointLogEntry {
    pub id: i64,
    pub user_id: String,
    /// 积分增量（扣分为负）
    pub points: i32,
    /// 发放原因（自由文本，仅用于审计展示）
    pub reason: String,
    /// 本条增量应用后的总积分快照
    pub total_after: i64,
    pub created_at: DateTime<Utc>,
}

impl PointLogEntry {
    /// 创建流水记录（id 由数据库生成）
    pub fn new(user_id: &str, points: i32, reason: &str, total_after: i64) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            points,
            reason: reason.to_string(),
            total_after,
            created_at: Utc::now(),
        }
    }
}

/// 从零回放流水增量
///
/// 审计用：结果应与 UserScore.total_points 一致。
pub fn replay_total(entries: &[PointLogEntry]) -> i64 {
    entries.iter().map(|entry| entry.points as i64).sum()
}

/// 行为账本记录
///
/// 行存在即表示该行为已发放过积分。不带去重键的发放
/// （徽章奖励积分）不写入本表。
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActionLogEntry {
    pub id: i64,
    pub user_id: String,
    pub action_kind: ActionKind,
    /// 去重键（如影片 imdbID、片单 ID）
    pub action_id: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_log_entry_new() {
        let entry = PointLogEntry::new("user-1", 10, "Rated a movie", 10);
        assert_eq!(entry.id, 0);
        assert_eq!(entry.points, 10);
        assert_eq!(entry.total_after, 10);
    }

    #[test]
    fn test_replay_total() {
        let entries = vec![
            PointLogEntry::new("user-1", 10, "Rated a movie", 10),
            PointLogEntry::new("user-1", 25, "Badge bonus: First Critic", 35),
            PointLogEntry::new("user-1", -1, "Received an unlike", 34),
        ];
        assert_eq!(replay_total(&entries), 34);
        assert_eq!(replay_total(&entries), entries.last().unwrap().total_after);
    }

    #[test]
    fn test_replay_total_empty() {
        assert_eq!(replay_total(&[]), 0);
    }

    #[test]
    fn test_action_log_serde() {
        let entry = ActionLogEntry {
            id: 1,
            user_id: "user-1".to_string(),
            action_kind: ActionKind::RateMovie,
            action_id: "tt0000001".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["actionKind"], "rate_movie");
        assert_eq!(json["actionId"], "tt0000001");
    }
}
