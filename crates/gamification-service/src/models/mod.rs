//! 领域模型定义
//!
//! 与数据库表一一对应的实体，以及围绕实体的纯函数辅助。

pub mod badge;
pub mod ledger;
pub mod score;

pub use badge::{Badge, EarnedBadge, UserBadge};
pub use ledger::{ActionLogEntry, PointLogEntry, replay_total};
pub use score::UserScore;
