//! 徽章目录定义
//!
//! 徽章的获取条件、奖励积分和展示元数据的唯一权威来源。
//! 目录按声明顺序评估，顺序即授予顺序，不得运行期变更。
//!
//! 条件语义：requirements 中每个 (计数器, 阈值) 都满足才算达标。

use crate::catalog::points::Counter;
use crate::models::UserScore;

/// 徽章定义
///
/// 数据库中的 badges 行在首次授予时从这里惰性物化，
/// 阈值判断永远只读目录，不读数据库。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeSpec {
    /// 徽章唯一标识（固定字符串）
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// 达标条件：每个命名计数器都不低于对应阈值
    pub requirements: &'static [(Counter, i64)],
    /// 授予时的奖励积分（不去重）
    pub reward_points: i32,
    /// Material Icons 图标名
    pub icon: &'static str,
    /// 十六进制展示色
    pub color: &'static str,
}

/// 徽章目录，按授予评估顺序排列
const BADGES: &[BadgeSpec] = &[
    // 评分徽章
    BadgeSpec {
        id: "first_rating",
        name: "First Critic",
        description: "Rated your first movie",
        requirements: &[(Counter::MoviesRated, 1)],
        reward_points: 25,
        icon: "star",
        color: "#FFD700",
    },
    BadgeSpec {
        id: "rating_milestone_5",
        name: "Movie Critic",
        description: "Rated 5 movies",
        requirements: &[(Counter::MoviesRated, 5)],
        reward_points: 50,
        icon: "star_rate",
        color: "#FFA500",
    },
    BadgeSpec {
        id: "rating_milestone_10",
        name: "Film Enthusiast",
        description: "Rated 10 movies",
        requirements: &[(Counter::MoviesRated, 10)],
        reward_points: 100,
        icon: "stars",
        color: "#FF6347",
    },
    BadgeSpec {
        id: "rating_milestone_25",
        name: "Cinema Expert",
        description: "Rated 25 movies",
        requirements: &[(Counter::MoviesRated, 25)],
        reward_points: 200,
        icon: "star_half",
        color: "#9370DB",
    },
    BadgeSpec {
        id: "rating_milestone_50",
        name: "Movie Master",
        description: "Rated 50 movies",
        requirements: &[(Counter::MoviesRated, 50)],
        reward_points: 400,
        icon: "star_border",
        color: "#32CD32",
    },
    BadgeSpec {
        id: "rating_milestone_100",
        name: "Legendary Critic",
        description: "Rated 100 movies",
        requirements: &[(Counter::MoviesRated, 100)],
        reward_points: 1000,
        icon: "star_purple500",
        color: "#FF1493",
    },
    // 观影徽章
    BadgeSpec {
        id: "first_watch",
        name: "First Viewer",
        description: "Watched your first movie",
        requirements: &[(Counter::MoviesWatched, 1)],
        reward_points: 20,
        icon: "visibility",
        color: "#87CEEB",
    },
    BadgeSpec {
        id: "watch_milestone_5",
        name: "Movie Watcher",
        description: "Watched 5 movies",
        requirements: &[(Counter::MoviesWatched, 5)],
        reward_points: 40,
        icon: "visibility",
        color: "#4682B4",
    },
    BadgeSpec {
        id: "watch_milestone_10",
        name: "Film Viewer",
        description: "Watched 10 movies",
        requirements: &[(Counter::MoviesWatched, 10)],
        reward_points: 80,
        icon: "visibility",
        color: "#191970",
    },
    BadgeSpec {
        id: "watch_milestone_25",
        name: "Cinema Goer",
        description: "Watched 25 movies",
        requirements: &[(Counter::MoviesWatched, 25)],
        reward_points: 150,
        icon: "visibility",
        color: "#4B0082",
    },
    BadgeSpec {
        id: "watch_milestone_50",
        name: "Movie Marathoner",
        description: "Watched 50 movies",
        requirements: &[(Counter::MoviesWatched, 50)],
        reward_points: 300,
        icon: "visibility",
        color: "#8A2BE2",
    },
    BadgeSpec {
        id: "watch_milestone_100",
        name: "Ultimate Viewer",
        description: "Watched 100 movies",
        requirements: &[(Counter::MoviesWatched, 100)],
        reward_points: 800,
        icon: "visibility",
        color: "#FF00FF",
    },
    // 片单徽章
    BadgeSpec {
        id: "first_list",
        name: "List Creator",
        description: "Created your first personal list",
        requirements: &[(Counter::ListsCreated, 1)],
        reward_points: 30,
        icon: "playlist_add",
        color: "#90EE90",
    },
    BadgeSpec {
        id: "list_milestone_3",
        name: "List Organizer",
        description: "Created 3 personal lists",
        requirements: &[(Counter::ListsCreated, 3)],
        reward_points: 60,
        icon: "playlist_add_check",
        color: "#228B22",
    },
    BadgeSpec {
        id: "list_milestone_5",
        name: "List Master",
        description: "Created 5 personal lists",
        requirements: &[(Counter::ListsCreated, 5)],
        reward_points: 120,
        icon: "playlist_play",
        color: "#006400",
    },
    // 评论徽章
    BadgeSpec {
        id: "first_comment",
        name: "First Commenter",
        description: "Made your first comment",
        requirements: &[(Counter::CommentsMade, 1)],
        reward_points: 15,
        icon: "comment",
        color: "#98FB98",
    },
    BadgeSpec {
        id: "comment_milestone_5",
        name: "Active Commenter",
        description: "Made 5 comments",
        requirements: &[(Counter::CommentsMade, 5)],
        reward_points: 30,
        icon: "comment",
        color: "#00FF7F",
    },
    BadgeSpec {
        id: "comment_milestone_10",
        name: "Discussion Starter",
        description: "Made 10 comments",
        requirements: &[(Counter::CommentsMade, 10)],
        reward_points: 60,
        icon: "forum",
        color: "#00CED1",
    },
    BadgeSpec {
        id: "comment_milestone_25",
        name: "Community Voice",
        description: "Made 25 comments",
        requirements: &[(Counter::CommentsMade, 25)],
        reward_points: 120,
        icon: "forum",
        color: "#20B2AA",
    },
    BadgeSpec {
        id: "comment_milestone_50",
        name: "Discussion Leader",
        description: "Made 50 comments",
        requirements: &[(Counter::CommentsMade, 50)],
        reward_points: 250,
        icon: "forum",
        color: "#008B8B",
    },
    // 积分里程碑徽章
    BadgeSpec {
        id: "points_milestone_100",
        name: "Point Collector",
        description: "Earned 100 points",
        requirements: &[(Counter::TotalPoints, 100)],
        reward_points: 50,
        icon: "emoji_events",
        color: "#FFD700",
    },
    BadgeSpec {
        id: "points_milestone_250",
        name: "Point Hunter",
        description: "Earned 250 points",
        requirements: &[(Counter::TotalPoints, 250)],
        reward_points: 100,
        icon: "emoji_events",
        color: "#C0C0C0",
    },
    BadgeSpec {
        id: "points_milestone_500",
        name: "Point Champion",
        description: "Earned 500 points",
        requirements: &[(Counter::TotalPoints, 500)],
        reward_points: 200,
        icon: "emoji_events",
        color: "#CD7F32",
    },
    BadgeSpec {
        id: "points_milestone_1000",
        name: "Point Legend",
        description: "Earned 1000 points",
        requirements: &[(Counter::TotalPoints, 1000)],
        reward_points: 500,
        icon: "emoji_events",
        color: "#FF1493",
    },
    // 等级徽章
    BadgeSpec {
        id: "level_1",
        name: "Novice",
        description: "Reached Level 1",
        requirements: &[(Counter::TotalPoints, 0)],
        reward_points: 0,
        icon: "grade",
        color: "#B0B0B0",
    },
    BadgeSpec {
        id: "level_2",
        name: "Apprentice",
        description: "Reached Level 2",
        requirements: &[(Counter::TotalPoints, 100)],
        reward_points: 50,
        icon: "grade",
        color: "#CD7F32",
    },
    BadgeSpec {
        id: "level_3",
        name: "Enthusiast",
        description: "Reached Level 3",
        requirements: &[(Counter::TotalPoints, 250)],
        reward_points: 100,
        icon: "grade",
        color: "#C0C0C0",
    },
    BadgeSpec {
        id: "level_4",
        name: "Expert",
        description: "Reached Level 4",
        requirements: &[(Counter::TotalPoints, 500)],
        reward_points: 200,
        icon: "grade",
        color: "#FFD700",
    },
    BadgeSpec {
        id: "level_5",
        name: "Master",
        description: "Reached Level 5",
        requirements: &[(Counter::TotalPoints, 1000)],
        reward_points: 500,
        icon: "grade",
        color: "#FF1493",
    },
    BadgeSpec {
        id: "level_6",
        name: "Legend",
        description: "Reached Level 6",
        requirements: &[(Counter::TotalPoints, 2000)],
        reward_points: 1000,
        icon: "grade",
        color: "#FF00FF",
    },
    BadgeSpec {
        id: "level_7",
        name: "Mythic",
        description: "Reached Level 7",
        requirements: &[(Counter::TotalPoints, 4000)],
        reward_points: 2000,
        icon: "grade",
        color: "#8A2BE2",
    },
    BadgeSpec {
        id: "level_8",
        name: "Divine",
        description: "Reached Level 8",
        requirements: &[(Counter::TotalPoints, 10000)],
        reward_points: 5000,
        icon: "grade",
        color: "#FFD700",
    },
];

/// 全部徽章定义，按评估顺序
pub fn badge_catalog() -> &'static [BadgeSpec] {
    BADGES
}

/// 按标识查找徽章定义
///
/// 目录外的标识返回 None，调用方按"未达标"处理
pub fn find_badge(badge_id: &str) -> Option<&'static BadgeSpec> {
    BADGES.iter().find(|spec| spec.id == badge_id)
}

impl BadgeSpec {
    /// 判断用户积分是否满足该徽章的全部条件
    pub fn is_satisfied_by(&self, score: &UserScore) -> bool {
        self.requirements
            .iter()
            .all(|(counter, minimum)| score.counter(*counter) >= *minimum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score_with(movies_rated: i32, total_points: i64) -> UserScore {
        UserScore {
            movies_rated,
            total_points,
            ..UserScore::empty("user-1")
        }
    }

    #[test]
    fn test_catalog_size_and_unique_ids() {
        assert_eq!(BADGES.len(), 32);

        let mut ids: Vec<&str> = BADGES.iter().map(|spec| spec.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 32, "badge ids must be unique");
    }

    #[test]
    fn test_catalog_order_firsts_before_milestones() {
        let position = |id: &str| BADGES.iter().position(|spec| spec.id == id).unwrap();
        assert!(position("first_rating") < position("rating_milestone_5"));
        assert!(position("rating_milestone_5") < position("points_milestone_100"));
        assert!(position("points_milestone_100") < position("level_2"));
    }

    #[test]
    fn test_find_badge() {
        assert_eq!(find_badge("first_rating").unwrap().reward_points, 25);
        assert!(find_badge("no_such_badge").is_none());
    }

    #[test]
    fn test_qualification_threshold() {
        let spec = find_badge("rating_milestone_5").unwrap();
        assert!(!spec.is_satisfied_by(&score_with(4, 0)));
        assert!(spec.is_satisfied_by(&score_with(5, 0)));
        assert!(spec.is_satisfied_by(&score_with(6, 0)));
    }

    #[test]
    fn test_points_milestone_qualification() {
        let spec = find_badge("points_milestone_100").unwrap();
        assert!(!spec.is_satisfied_by(&score_with(0, 99)));
        assert!(spec.is_satisfied_by(&score_with(0, 100)));
    }

    #[test]
    fn test_level_1_badge_matches_everyone() {
        let spec = find_badge("level_1").unwrap();
        assert!(spec.is_satisfied_by(&UserScore::empty("user-1")));
        assert_eq!(spec.reward_points, 0);
    }

    #[test]
    fn test_reward_points_never_negative() {
        assert!(BADGES.iter().all(|spec| spec.reward_points >= 0));
    }
}
