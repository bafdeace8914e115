//! 徽章回填工具
//!
//! 对所有已有积分行的用户重新执行徽章评估，补授历史达标但
//! 未授予的徽章（如目录新增徽章后）。每个用户的评估在各自的
//! 事务内持有行锁，用户之间可安全并发。

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::Result;
use futures::StreamExt;
use tracing::{info, warn};

use cinelog_shared::{cache::Cache, config::AppConfig, database::Database, observability};
use gamification::repository::{ScoreRepository, ScoreRepositoryTrait};
use gamification::service::AwardService;

/// 用户间并发度（用户内部由行锁串行化）
const CONCURRENCY: usize = 8;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. 加载配置并初始化日志
    let config = AppConfig::load("gamification-backfill").unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {}", e);
        AppConfig::default()
    });

    let obs_config = config
        .observability
        .clone()
        .with_service_name(&config.service_name);
    observability::init(&obs_config)?;

    info!("Starting badge backfill...");
    info!(environment = %config.environment, "Configuration loaded");

    // 2. 初始化数据库连接
    let db = Database::connect(&config.database).await?;
    let pool = db.pool().clone();
    info!("Database connection established");

    // 3. 初始化 Redis 缓存（不可用时降级：失效操作只会记警告）
    let cache = Arc::new(Cache::new(&config.redis)?);
    if let Err(e) = cache.health_check().await {
        warn!(error = %e, "Redis unavailable, cache invalidation will be skipped");
    }

    // 4. 创建服务
    let score_repo = ScoreRepository::new(pool.clone());
    let award_service = Arc::new(AwardService::new(pool.clone(), cache));

    // 5. 对所有用户重新评估徽章
    let user_ids = score_repo.list_user_ids().await?;
    info!(user_count = user_ids.len(), "Evaluating badges for all scored users");

    let users_processed = AtomicUsize::new(0);
    let badges_awarded = AtomicUsize::new(0);
    let failures = AtomicUsize::new(0);

    futures::stream::iter(user_ids)
        .for_each_concurrent(CONCURRENCY, |user_id| {
            let award_service = award_service.clone();
            let users_processed = &users_processed;
            let badges_awarded = &badges_awarded;
            let failures = &failures;

            async move {
                match award_service.evaluate_badges(&user_id).await {
                    Ok(new_badges) => {
                        users_processed.fetch_add(1, Ordering::Relaxed);
                        if !new_badges.is_empty() {
                            badges_awarded.fetch_add(new_badges.len(), Ordering::Relaxed);
                            info!(
                                user_id = %user_id,
                                new_badges = new_badges.len(),
                                "Badges awarded"
                            );
                        }
                    }
                    Err(e) => {
                        failures.fetch_add(1, Ordering::Relaxed);
                        warn!(user_id = %user_id, error = %e, "Badge evaluation failed");
                    }
                }
            }
        })
        .await;

    info!(
        users_processed = users_processed.load(Ordering::Relaxed),
        badges_awarded = badges_awarded.load(Ordering::Relaxed),
        failures = failures.load(Ordering::Relaxed),
        "Badge backfill complete"
    );

    db.close().await;
    Ok(())
}
