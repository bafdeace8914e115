//! StatsQueryService 集成测试
//!
//! 使用真实 PostgreSQL 和 Redis，通过 AwardService 构造数据后
//! 验证查询面的读取结果。用户 ID 随机生成，避免与缓存中
//! 历史运行的键互相干扰。
//!
//! ## 运行方式
//!
//! ```bash
//! DATABASE_URL=postgres://... REDIS_URL=redis://... \
//!   cargo test -p gamification-service --test query_service_test -- --ignored
//! ```

use std::sync::Arc;

use sqlx::PgPool;

use cinelog_shared::cache::Cache;
use cinelog_shared::config::RedisConfig;
use cinelog_shared::test_utils::test_user_id;
use gamification::catalog::ActionKind;
use gamification::repository::{BadgeRepository, LedgerRepository, ScoreRepository};
use gamification::service::{AwardService, StatsQueryService};

// ==================== 辅助函数 ====================

fn database_url() -> String {
    std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests")
}

fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string())
}

fn setup_cache() -> Arc<Cache> {
    let redis_config = RedisConfig {
        url: redis_url(),
        pool_size: 2,
    };
    Arc::new(Cache::new(&redis_config).expect("Redis connection failed"))
}

fn setup_services(
    pool: &PgPool,
) -> (
    AwardService,
    StatsQueryService<ScoreRepository, LedgerRepository, BadgeRepository>,
) {
    let cache = setup_cache();
    let award = AwardService::new(pool.clone(), cache.clone());
    let query = StatsQueryService::new(
        Arc::new(ScoreRepository::new(pool.clone())),
        Arc::new(LedgerRepository::new(pool.clone())),
        Arc::new(BadgeRepository::new(pool.clone())),
        cache,
    );
    (award, query)
}

async fn cleanup_user(pool: &PgPool, user_id: &str) {
    for table in ["point_log", "action_log", "user_badges", "user_scores"] {
        sqlx::query(&format!("DELETE FROM {} WHERE user_id = $1", table))
            .bind(user_id)
            .execute(pool)
            .await
            .ok();
    }
}

// ==================== 测试用例 ====================

/// 统计视图：发放后的计数器、徽章数和等级详情
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_user_stats_after_awards() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = test_user_id();
    let (award, query) = setup_services(&pool);

    award
        .award_points(&user_id, ActionKind::RateMovie, "Rated a movie", Some("tt0000001"))
        .await
        .unwrap();
    award
        .award_points(&user_id, ActionKind::WatchMovie, "Watched a movie", Some("tt0000001"))
        .await
        .unwrap();

    let stats = query.get_user_stats(&user_id).await.unwrap();

    // 10+25(first_rating) -> 35，+5 -> 40，+20(first_watch) -> 60
    assert_eq!(stats.total_points, 60);
    assert_eq!(stats.movies_rated, 1);
    assert_eq!(stats.movies_watched, 1);
    assert_eq!(stats.lists_created, 0);
    // first_rating + first_watch + level_1
    assert_eq!(stats.badges_earned, 3);
    assert_eq!(stats.total_badges, 32);
    assert_eq!(stats.level_info.current_level, 1);
    assert_eq!(stats.level_info.points_needed, 40);

    // 继续发放后缓存被失效，统计应反映新状态
    award
        .award_points(&user_id, ActionKind::CreateList, "Created a list", Some("list-1"))
        .await
        .unwrap();
    let stats = query.get_user_stats(&user_id).await.unwrap();
    assert_eq!(stats.lists_created, 1);
    // 60 + 15 + 30(first_list) = 105 -> 升到 level 2 区间
    assert_eq!(stats.total_points, 105);
    assert_eq!(stats.level_info.current_level, 2);

    cleanup_user(&pool, &user_id).await;
}

/// 未发放过积分的用户返回零值统计，且不创建任何行
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_stats_for_fresh_user_do_not_create_rows() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = test_user_id();
    let (_award, query) = setup_services(&pool);

    let stats = query.get_user_stats(&user_id).await.unwrap();
    assert_eq!(stats.total_points, 0);
    assert_eq!(stats.badges_earned, 0);
    assert_eq!(stats.level_info.current_level, 1);

    let score_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM user_scores WHERE user_id = $1)")
            .bind(&user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert!(!score_exists, "查询路径不得创建积分行");
}

/// 徽章墙：最近获得在前
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_user_badges_most_recent_first() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = test_user_id();
    let (award, query) = setup_services(&pool);

    award
        .award_points(&user_id, ActionKind::RateMovie, "Rated a movie", Some("tt0000001"))
        .await
        .unwrap();
    award
        .award_points(&user_id, ActionKind::MakeComment, "Commented", Some("comment-1"))
        .await
        .unwrap();

    let badges = query.get_user_badges(&user_id).await.unwrap();
    let ids: Vec<&str> = badges.iter().map(|b| b.badge_id.as_str()).collect();

    assert!(ids.contains(&"first_rating"));
    assert!(ids.contains(&"first_comment"));
    assert!(ids.contains(&"level_1"));

    // 第二次发放获得的徽章排在前面
    assert_eq!(badges[0].badge_id, "first_comment");
    assert_eq!(badges[0].name, "First Commenter");
    assert_eq!(badges[0].reward_points, 15);

    cleanup_user(&pool, &user_id).await;
}

/// 进度视图：已获得的徽章不出现，未获得的按计数器给出百分比
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_user_progress() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = test_user_id();
    let (award, query) = setup_services(&pool);

    award
        .award_points(&user_id, ActionKind::RateMovie, "Rated a movie", Some("tt0000001"))
        .await
        .unwrap();

    let progress = query.get_user_progress(&user_id).await.unwrap();

    assert!(progress.iter().all(|p| p.badge_id != "first_rating"));
    assert!(progress.iter().all(|p| p.badge_id != "level_1"));

    let milestone = progress
        .iter()
        .find(|p| p.badge_id == "rating_milestone_5")
        .expect("未获得的里程碑应在进度中");
    assert_eq!(milestone.progress[0].current, 1);
    assert_eq!(milestone.progress[0].required, 5);
    assert!((milestone.progress[0].percentage - 20.0).abs() < 1e-9);

    cleanup_user(&pool, &user_id).await;
}

/// 排行榜与排名：按总积分降序，名次从 1 开始
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_leaderboard_and_rank() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_a = test_user_id();
    let user_b = test_user_id();
    let user_c = test_user_id();
    let (award, query) = setup_services(&pool);

    // a: 3 次评分 -> 55 分；b: 1 次评分 -> 35 分；c: 1 条评论 -> 20 分
    for i in 1..=3 {
        let action_id = format!("tt{}", i);
        award
            .award_points(&user_a, ActionKind::RateMovie, "Rated a movie", Some(action_id.as_str()))
            .await
            .unwrap();
    }
    award
        .award_points(&user_b, ActionKind::RateMovie, "Rated a movie", Some("tt1"))
        .await
        .unwrap();
    award
        .award_points(&user_c, ActionKind::MakeComment, "Commented", Some("comment-1"))
        .await
        .unwrap();

    let entries = query.get_leaderboard(500).await.unwrap();
    let ours: Vec<_> = entries
        .iter()
        .filter(|e| [&user_a, &user_b, &user_c].contains(&&e.user_id))
        .collect();

    assert_eq!(ours.len(), 3, "三个测试用户都应进入榜单");
    assert_eq!(ours[0].user_id, user_a);
    assert_eq!(ours[0].total_points, 55);
    assert_eq!(ours[1].user_id, user_b);
    assert_eq!(ours[2].user_id, user_c);
    assert!(ours[0].rank < ours[1].rank && ours[1].rank < ours[2].rank);

    let rank_a = query.get_rank(&user_a).await.unwrap().unwrap();
    let rank_b = query.get_rank(&user_b).await.unwrap().unwrap();
    assert!(rank_a < rank_b);

    assert!(query.get_rank(&test_user_id()).await.unwrap().is_none());

    cleanup_user(&pool, &user_a).await;
    cleanup_user(&pool, &user_b).await;
    cleanup_user(&pool, &user_c).await;
}

/// 最近动态：按时间倒序，limit 生效
#[tokio::test]
#[ignore = "需要 PostgreSQL 和 Redis"]
async fn test_recent_activity() {
    let pool = PgPool::connect(&database_url()).await.unwrap();
    let user_id = test_user_id();
    let (award, query) = setup_services(&pool);

    award
        .award_points(&user_id, ActionKind::RateMovie, "Rated a movie", Some("tt0000001"))
        .await
        .unwrap();
    award
        .award_points(&user_id, ActionKind::WatchMovie, "Watched a movie", Some("tt0000001"))
        .await
        .unwrap();

    let activity = query.get_recent_activity(&user_id, 10).await.unwrap();

    // rate(10) + first_rating(25) + level_1(无流水) + watch(5) + first_watch(20)
    assert_eq!(activity.len(), 4);
    // 最新一条是 first_watch 奖励，total_after 为最终总分
    assert_eq!(activity[0].reason, "Badge bonus: First Viewer");
    assert_eq!(activity[0].total_after, 60);

    let limited = query.get_recent_activity(&user_id, 2).await.unwrap();
    assert_eq!(limited.len(), 2);
    assert_eq!(limited[0].total_after, 60);

    cleanup_user(&pool, &user_id).await;
}
