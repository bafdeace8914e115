//! 静态目录模块
//!
//! 行为积分值、等级区间和徽章定义的唯一权威来源。
//! 全部为进程启动即固定的只读数据，运行期不允许修改。

pub mod badges;
pub mod levels;
pub mod points;

pub use badges::{BadgeSpec, badge_catalog, find_badge};
pub use levels::{LevelBand, LevelInfo, level_catalog, level_info};
pub use points::{ActionKind, Counter};
