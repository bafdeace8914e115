//! 数据库仓储层
//!
//! 每张表一个仓储：池上方法服务只读查询，`*_in_tx` 静态方法
//! 供发放事务在同一连接内组合使用。

pub mod badge_repo;
pub mod ledger_repo;
pub mod score_repo;
pub mod traits;

pub use badge_repo::BadgeRepository;
pub use ledger_repo::LedgerRepository;
pub use score_repo::ScoreRepository;
pub use traits::{BadgeRepositoryTrait, LedgerRepositoryTrait, ScoreRepositoryTrait};
