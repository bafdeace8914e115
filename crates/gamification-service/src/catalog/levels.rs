//! 等级区间定义与等级计算
//!
//! 8 个连续且不重叠的积分区间，区间边界双侧包含，
//! 最高等级无上界。等级仅用于展示，不影响积分发放。

use serde::{Deserialize, Serialize};

/// 等级区间
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelBand {
    pub level: u8,
    pub name: &'static str,
    pub min_points: i64,
    /// None 表示无上界（最高等级）
    pub max_points: Option<i64>,
}

/// 等级表，按等级升序排列
///
/// 区间必须连续：每一级的 min_points 等于上一级 max_points + 1
const LEVELS: [LevelBand; 8] = [
    LevelBand { level: 1, name: "Novice", min_points: 0, max_points: Some(99) },
    LevelBand { level: 2, name: "Apprentice", min_points: 100, max_points: Some(249) },
    LevelBand { level: 3, name: "Enthusiast", min_points: 250, max_points: Some(499) },
    LevelBand { level: 4, name: "Expert", min_points: 500, max_points: Some(999) },
    LevelBand { level: 5, name: "Master", min_points: 1000, max_points: Some(1999) },
    LevelBand { level: 6, name: "Legend", min_points: 2000, max_points: Some(3999) },
    LevelBand { level: 7, name: "Mythic", min_points: 4000, max_points: Some(9999) },
    LevelBand { level: 8, name: "Divine", min_points: 10000, max_points: None },
];

/// 等级详情
///
/// 当前等级、下一等级和升级进度的汇总视图，供个人主页展示。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelInfo {
    pub current_level: u8,
    pub level_name: String,
    /// 最高等级时为 None
    pub next_level: Option<u8>,
    pub next_level_name: Option<String>,
    /// 距离下一等级还差的积分，最高等级为 0
    pub points_needed: i64,
    /// 当前区间内的进度百分比，[0, 100]
    pub progress_percentage: f64,
    pub current_points: i64,
    pub level_min_points: i64,
    pub level_max_points: Option<i64>,
}

/// 全部等级区间，按升序
pub fn level_catalog() -> &'static [LevelBand] {
    &LEVELS
}

/// 计算总积分所在的等级及升级进度
///
/// 升序扫描取第一个包含 total_points 的区间，区间连续保证恰好命中一个。
/// 负积分（取消点赞可能导致）归入第一级，进度按 0 处理。
pub fn level_info(total_points: i64) -> LevelInfo {
    let current = LEVELS
        .iter()
        .find(|band| {
            total_points >= band.min_points
                && band.max_points.is_none_or(|max| total_points <= max)
        })
        .unwrap_or(&LEVELS[0]);

    let next = LEVELS.iter().find(|band| band.level == current.level + 1);

    let (points_needed, progress_percentage) = match next {
        Some(next_band) => {
            let needed = next_band.min_points - total_points;
            let span = (next_band.min_points - current.min_points) as f64;
            let progress = (total_points - current.min_points) as f64 / span * 100.0;
            (needed, progress.clamp(0.0, 100.0))
        }
        // 最高等级
        None => (0, 100.0),
    };

    LevelInfo {
        current_level: current.level,
        level_name: current.name.to_string(),
        next_level: next.map(|band| band.level),
        next_level_name: next.map(|band| band.name.to_string()),
        points_needed,
        progress_percentage,
        current_points: total_points,
        level_min_points: current.min_points,
        level_max_points: current.max_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands_are_contiguous() {
        for pair in LEVELS.windows(2) {
            let upper = pair[0].max_points.expect("only the top band is unbounded");
            assert_eq!(pair[1].min_points, upper + 1);
            assert_eq!(pair[1].level, pair[0].level + 1);
        }
        assert!(LEVELS.last().unwrap().max_points.is_none());
    }

    #[test]
    fn test_every_total_hits_exactly_one_band() {
        for total in [0, 50, 99, 100, 249, 250, 999, 1000, 3999, 4000, 9999, 10000, 1_000_000] {
            let matching = LEVELS
                .iter()
                .filter(|band| {
                    total >= band.min_points && band.max_points.is_none_or(|max| total <= max)
                })
                .count();
            assert_eq!(matching, 1, "total={} should match exactly one band", total);
        }
    }

    #[test]
    fn test_boundary_belongs_to_lower_band() {
        // 边界双侧包含：恰好 100 分属于第 2 级而非第 1 级
        let info = level_info(100);
        assert_eq!(info.current_level, 2);
        assert_eq!(info.level_name, "Apprentice");

        let info = level_info(99);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.level_name, "Novice");
    }

    #[test]
    fn test_fresh_user() {
        let info = level_info(0);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.next_level, Some(2));
        assert_eq!(info.points_needed, 100);
        assert_eq!(info.progress_percentage, 0.0);
    }

    #[test]
    fn test_mid_band_progress() {
        // 第 2 级区间 [100, 249]，下一级从 250 起：175 分是区间中点
        let info = level_info(175);
        assert_eq!(info.current_level, 2);
        assert_eq!(info.points_needed, 75);
        assert!((info.progress_percentage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_level() {
        let info = level_info(10_000);
        assert_eq!(info.current_level, 8);
        assert_eq!(info.level_name, "Divine");
        assert_eq!(info.next_level, None);
        assert_eq!(info.next_level_name, None);
        assert_eq!(info.points_needed, 0);
        assert_eq!(info.progress_percentage, 100.0);
        assert_eq!(info.level_max_points, None);

        let info = level_info(1_000_000);
        assert_eq!(info.current_level, 8);
    }

    #[test]
    fn test_negative_total_clamps_to_first_band() {
        let info = level_info(-3);
        assert_eq!(info.current_level, 1);
        assert_eq!(info.progress_percentage, 0.0);
        assert_eq!(info.current_points, -3);
        // points_needed 按实际差值计算
        assert_eq!(info.points_needed, 103);
    }
}
