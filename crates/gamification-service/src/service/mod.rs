//! 业务服务层
//!
//! - `AwardService`: 积分发放与徽章评估的唯一写入口
//! - `StatsQueryService`: 缓存优先的只读查询

pub mod award_service;
pub mod dto;
pub mod query_service;

pub use award_service::AwardService;
pub use query_service::StatsQueryService;
