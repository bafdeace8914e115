//! 用户积分实体定义
//!
//! 每个用户一行的积分聚合：总积分加四个只增不减的行为计数器。
//! 首次发放时惰性创建，只有发放引擎允许修改。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Counter, LevelInfo, level_info};

/// 用户积分聚合
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserScore {
    pub id: i64,
    /// 用户 ID（由调用方体系提供）
    pub user_id: String,
    /// 总积分（有符号：取消点赞可能使其为负，不设下限）
    pub total_points: i64,
    pub movies_rated: i32,
    pub movies_watched: i32,
    pub lists_created: i32,
    pub comments_made: i32,
    pub updated_at: DateTime<Utc>,
}

impl UserScore {
    /// 构造一个零值积分行（尚未持久化，id 为 0）
    pub fn empty(user_id: &str) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            total_points: 0,
            movies_rated: 0,
            movies_watched: 0,
            lists_created: 0,
            comments_made: 0,
            updated_at: Utc::now(),
        }
    }

    /// 按计数器标识取值
    ///
    /// 徽章条件通过枚举引用计数器，这里是唯一的取值入口。
    pub fn counter(&self, counter: Counter) -> i64 {
        match counter {
            Counter::TotalPoints => self.total_points,
            Counter::MoviesRated => self.movies_rated as i64,
            Counter::MoviesWatched => self.movies_watched as i64,
            Counter::ListsCreated => self.lists_created as i64,
            Counter::CommentsMade => self.comments_made as i64,
        }
    }

    /// 累加行为计数器
    ///
    /// 计数器只增不减；TotalPoints 不是行为计数器，走 `add_points`。
    pub fn increment_counter(&mut self, counter: Counter) {
        match counter {
            Counter::TotalPoints => {}
            Counter::MoviesRated => self.movies_rated += 1,
            Counter::MoviesWatched => self.movies_watched += 1,
            Counter::ListsCreated => self.lists_created += 1,
            Counter::CommentsMade => self.comments_made += 1,
        }
    }

    /// 应用积分增量（可为负，不设下限）
    pub fn add_points(&mut self, delta: i32) {
        self.total_points += delta as i64;
    }

    /// 当前等级详情
    pub fn level_info(&self) -> LevelInfo {
        level_info(self.total_points)
    }
}
