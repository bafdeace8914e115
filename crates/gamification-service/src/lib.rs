//! 游戏化服务
//!
//! 影视目录应用的积分与徽章核心：用户的评分、观影、建单、评论等行为
//! 通过唯一的发放入口换算为积分，积分累计驱动等级与徽章授予。
//!
//! ## 核心功能
//!
//! - **积分发放**：按行为类型发放积分，带去重键的行为天然幂等
//! - **积分账本**：每次变动记录流水和变动后余额，支持审计回放
//! - **徽章授予**：根据计数器阈值自动授予徽章，徽章奖励积分
//! - **等级计算**：按总积分划分等级区间，提供升级进度
//! - **查询接口**：用户统计、徽章墙、徽章进度、排行榜、最近动态
//!
//! ## 发放流程
//!
//! 1. 行为类型解析 -> 2. 锁定积分行 -> 3. 去重检查 -> 4. 计数器累加
//!    -> 5. 积分入账 + 流水 -> 6. 徽章评估（含奖励积分）-> 7. 提交事务
//!    -> 8. 缓存失效
//!
//! ## 模块结构
//!
//! - `catalog`: 静态目录（行为积分值、等级区间、徽章定义）
//! - `models`: 领域模型定义
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层

pub mod catalog;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;

pub use catalog::{ActionKind, BadgeSpec, Counter, LevelInfo, badge_catalog, level_info};
pub use error::{GamificationError, Result};
pub use models::{ActionLogEntry, Badge, EarnedBadge, PointLogEntry, UserBadge, UserScore};
pub use repository::{BadgeRepository, LedgerRepository, ScoreRepository};
pub use service::{AwardService, StatsQueryService, dto};
