//! 行为类型与积分值定义
//!
//! 固定的行为词表：每种行为对应一个积分增量（可为负），
//! 部分行为同时累加一个统计计数器。

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GamificationError;

/// 用户行为类型
///
/// 外部协作方（评分、观影、建单、评论、点赞）触发积分发放时使用的词表。
/// 词表固定，新增行为需要同步调整积分值和计数器映射。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "varchar", rename_all = "snake_case")]
pub enum ActionKind {
    /// 给影片评分
    RateMovie,
    /// 标记影片为已观看（仅首次）
    WatchMovie,
    /// 创建个人片单
    CreateList,
    /// 向片单添加影片
    AddToList,
    /// 发表评论
    MakeComment,
    /// 影评/评论收到点赞
    ReceiveLike,
    /// 影评/评论被取消点赞
    ReceiveUnlike,
}

/// 积分计数器标识
///
/// 徽章条件引用的计数器枚举，配合 `UserScore::counter` 做类型安全的取值。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Counter {
    TotalPoints,
    MoviesRated,
    MoviesWatched,
    ListsCreated,
    CommentsMade,
}

impl ActionKind {
    /// 全部行为类型，按词表声明顺序
    pub const ALL: [ActionKind; 7] = [
        ActionKind::RateMovie,
        ActionKind::WatchMovie,
        ActionKind::CreateList,
        ActionKind::AddToList,
        ActionKind::MakeComment,
        ActionKind::ReceiveLike,
        ActionKind::ReceiveUnlike,
    ];

    /// 该行为的积分增量（取消点赞为负值）
    pub fn point_value(&self) -> i32 {
        match self {
            Self::RateMovie => 10,
            Self::WatchMovie => 5,
            Self::CreateList => 15,
            Self::AddToList => 2,
            Self::MakeComment => 5,
            Self::ReceiveLike => 1,
            Self::ReceiveUnlike => -1,
        }
    }

    /// 该行为关联的统计计数器
    ///
    /// 点赞类行为只影响积分，不累加计数器。
    pub fn counter(&self) -> Option<Counter> {
        match self {
            Self::RateMovie => Some(Counter::MoviesRated),
            Self::WatchMovie => Some(Counter::MoviesWatched),
            Self::CreateList => Some(Counter::ListsCreated),
            Self::MakeComment => Some(Counter::CommentsMade),
            Self::AddToList | Self::ReceiveLike | Self::ReceiveUnlike => None,
        }
    }

    /// 词表字符串形式（与数据库存储一致）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RateMovie => "rate_movie",
            Self::WatchMovie => "watch_movie",
            Self::CreateList => "create_list",
            Self::AddToList => "add_to_list",
            Self::MakeComment => "make_comment",
            Self::ReceiveLike => "receive_like",
            Self::ReceiveUnlike => "receive_unlike",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = GamificationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rate_movie" => Ok(Self::RateMovie),
            "watch_movie" => Ok(Self::WatchMovie),
            "create_list" => Ok(Self::CreateList),
            "add_to_list" => Ok(Self::AddToList),
            "make_comment" => Ok(Self::MakeComment),
            "receive_like" => Ok(Self::ReceiveLike),
            "receive_unlike" => Ok(Self::ReceiveUnlike),
            other => Err(GamificationError::UnknownAction(other.to_string())),
        }
    }
}

impl Counter {
    /// 计数器名称（用于进度展示）
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TotalPoints => "total_points",
            Self::MoviesRated => "movies_rated",
            Self::MoviesWatched => "movies_watched",
            Self::ListsCreated => "lists_created",
            Self::CommentsMade => "comments_made",
        }
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
