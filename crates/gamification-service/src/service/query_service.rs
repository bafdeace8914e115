//! 统计查询服务
//!
//! 提供游戏化数据的只读查询，采用缓存优先策略以提升性能。
//!
//! ## 缓存策略
//!
//! - 用户统计: TTL 5 分钟
//! - 用户徽章列表: TTL 5 分钟
//! - 排行榜: TTL 60 秒（快照语义，不要求强一致）
//!
//! 查询路径不创建任何行：未发放过积分的用户返回零值统计。

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{instrument, warn};

use cinelog_shared::cache::{Cache, CacheKey};

use crate::catalog::{badge_catalog, level_info};
use crate::error::Result;
use crate::models::{EarnedBadge, PointLogEntry, UserScore};
use crate::repository::{BadgeRepositoryTrait, LedgerRepositoryTrait, ScoreRepositoryTrait};
use crate::service::dto::{BadgeProgress, CounterProgress, LeaderboardEntry, UserStats};

/// 缓存 TTL 常量（秒）
mod cache_ttl {
    pub const USER_STATS: u64 = 300; // 5 min
    pub const USER_BADGES: u64 = 300; // 5 min
    pub const LEADERBOARD: u64 = 60;
}

/// 统计查询服务
///
/// 聚合三个仓储提供完整的查询能力，内置缓存以吸收个人主页
/// 和排行榜页面的重复读取。
pub struct StatsQueryService<SR, LR, BR>
where
    SR: ScoreRepositoryTrait,
    LR: LedgerRepositoryTrait,
    BR: BadgeRepositoryTrait,
{
    score_repo: Arc<SR>,
    ledger_repo: Arc<LR>,
    badge_repo: Arc<BR>,
    cache: Arc<Cache>,
}

impl<SR, LR, BR> StatsQueryService<SR, LR, BR>
where
    SR: ScoreRepositoryTrait,
    LR: LedgerRepositoryTrait,
    BR: BadgeRepositoryTrait,
{
    pub fn new(
        score_repo: Arc<SR>,
        ledger_repo: Arc<LR>,
        badge_repo: Arc<BR>,
        cache: Arc<Cache>,
    ) -> Self {
        Self {
            score_repo,
            ledger_repo,
            badge_repo,
            cache,
        }
    }

    /// 带缓存的数据获取辅助方法
    ///
    /// 缓存读写失败只记录警告并回落到数据源，不影响查询结果。
    async fn get_cached_or_fetch<T, F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.get::<T>(key).await {
            Ok(Some(cached)) => return Ok(cached),
            Ok(None) => {}
            Err(e) => {
                warn!(key = %key, error = %e, "Cache get failed, falling back to database");
            }
        }

        let data = fetch().await?;

        if let Err(e) = self.cache.set(key, &data, ttl).await {
            warn!(key = %key, error = %e, "Cache set failed");
        }

        Ok(data)
    }

    /// 获取用户统计（含等级详情）
    ///
    /// 缓存键: user:stats:{user_id}, TTL: 5min
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_stats(&self, user_id: &str) -> Result<UserStats> {
        let cache_key = CacheKey::user_stats(user_id);
        let user_id_owned = user_id.to_string();

        self.get_cached_or_fetch(
            &cache_key,
            Duration::from_secs(cache_ttl::USER_STATS),
            || async { self.fetch_user_stats(&user_id_owned).await },
        )
        .await
    }

    async fn fetch_user_stats(&self, user_id: &str) -> Result<UserStats> {
        let score = self
            .score_repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserScore::empty(user_id));
        let badges_earned = self.badge_repo.count_user_badges(user_id).await?;

        Ok(UserStats {
            total_points: score.total_points,
            movies_rated: score.movies_rated,
            movies_watched: score.movies_watched,
            lists_created: score.lists_created,
            comments_made: score.comments_made,
            badges_earned,
            total_badges: badge_catalog().len() as i64,
            level_info: score.level_info(),
        })
    }

    /// 获取用户已获得的徽章，最近获得在前
    ///
    /// 缓存键: user:badges:{user_id}, TTL: 5min
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_badges(&self, user_id: &str) -> Result<Vec<EarnedBadge>> {
        let cache_key = CacheKey::user_badges(user_id);
        let user_id_owned = user_id.to_string();

        self.get_cached_or_fetch(
            &cache_key,
            Duration::from_secs(cache_ttl::USER_BADGES),
            || async { self.badge_repo.list_user_badges(&user_id_owned).await },
        )
        .await
    }

    /// 获取未获得徽章的达标进度，按目录顺序
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user_progress(&self, user_id: &str) -> Result<Vec<BadgeProgress>> {
        let score = self
            .score_repo
            .get(user_id)
            .await?
            .unwrap_or_else(|| UserScore::empty(user_id));
        let held = self.badge_repo.held_badge_ids(user_id).await?;

        let mut progress = Vec::new();
        for spec in badge_catalog() {
            if held.contains(spec.id) {
                continue;
            }

            let counters = spec
                .requirements
                .iter()
                .map(|(counter, required)| {
                    let current = score.counter(*counter);
                    // 阈值为 0 的条件视为已满足
                    let percentage = if *required <= 0 {
                        100.0
                    } else {
                        (current as f64 / *required as f64 * 100.0).min(100.0)
                    };
                    CounterProgress {
                        counter: *counter,
                        current,
                        required: *required,
                        percentage,
                    }
                })
                .collect();

            progress.push(BadgeProgress {
                badge_id: spec.id.to_string(),
                name: spec.name.to_string(),
                description: spec.description.to_string(),
                progress: counters,
            });
        }

        Ok(progress)
    }

    /// 获取排行榜，按总积分降序
    ///
    /// 缓存键: leaderboard:{limit}, TTL: 60s（只读快照，无新鲜度保证）
    #[instrument(skip(self))]
    pub async fn get_leaderboard(&self, limit: i64) -> Result<Vec<LeaderboardEntry>> {
        let cache_key = CacheKey::leaderboard(limit);

        self.get_cached_or_fetch(
            &cache_key,
            Duration::from_secs(cache_ttl::LEADERBOARD),
            || async {
                let scores = self.score_repo.leaderboard(limit).await?;
                let entries = scores
                    .into_iter()
                    .enumerate()
                    .map(|(index, score)| {
                        let info = level_info(score.total_points);
                        LeaderboardEntry {
                            rank: index as i64 + 1,
                            user_id: score.user_id,
                            total_points: score.total_points,
                            level: info.current_level,
                            level_name: info.level_name,
                        }
                    })
                    .collect();
                Ok(entries)
            },
        )
        .await
    }

    /// 获取用户排名（1 为榜首）
    ///
    /// 未发放过积分的用户无排名。
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_rank(&self, user_id: &str) -> Result<Option<i64>> {
        let Some(score) = self.score_repo.get(user_id).await? else {
            return Ok(None);
        };

        let higher = self.score_repo.count_higher(score.total_points).await?;
        Ok(Some(higher + 1))
    }

    /// 获取用户最近的积分动态，按时间倒序
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_recent_activity(
        &self,
        user_id: &str,
        limit: i64,
    ) -> Result<Vec<PointLogEntry>> {
        self.ledger_repo.list_point_log(user_id, limit).await
    }
}
