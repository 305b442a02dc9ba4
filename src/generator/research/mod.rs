//! 调研聚合：规划候选来源、限流并发抓取、去重并按相关度排序

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::errors::ResearchFetchError;
use crate::generator::context::GeneratorContext;
use crate::generator::workflow::Deadline;
use crate::types::profile::BusinessProfile;
use crate::types::research::ResearchSource;
use crate::utils::threads::do_parallel_with_limit;

pub mod fetcher;
pub mod planner;

pub use fetcher::{CachedResearchFetcher, HttpResearchFetcher, ResearchFetcher};
use planner::{canonicalize_url, plan_candidates};

/// 调研阶段的产出
#[derive(Debug, Clone, Default)]
pub struct ResearchOutcome {
    /// 按相关度排序后的来源
    pub sources: Vec<ResearchSource>,
    /// 每个失败来源一条，顺序与候选顺序一致
    pub failures: Vec<ResearchFetchError>,
    pub attempted: usize,
}

impl ResearchOutcome {
    pub fn deadline_hit(&self) -> bool {
        self.failures
            .iter()
            .any(|f| matches!(f, ResearchFetchError::DeadlineExceeded { .. }))
    }
}

async fn fetch_one(
    fetcher: Arc<dyn ResearchFetcher>,
    url: String,
    per_fetch_timeout: Duration,
    deadline: Deadline,
) -> Result<ResearchSource, ResearchFetchError> {
    if deadline.is_expired() {
        return Err(ResearchFetchError::DeadlineExceeded { url });
    }

    let timeout = per_fetch_timeout.min(deadline.remaining());
    match tokio::time::timeout(timeout, fetcher.fetch(&url)).await {
        Ok(result) => result,
        Err(_) if timeout < per_fetch_timeout => Err(ResearchFetchError::DeadlineExceeded { url }),
        Err(_) => Err(ResearchFetchError::Timeout {
            url,
            timeout_ms: timeout.as_millis() as u64,
        }),
    }
}

/// 相关度：公司名、行业、话题在正文中出现的次数
fn relevance_score(source: &ResearchSource, terms: &[String]) -> usize {
    let haystack = format!("{}\n{}", source.title, source.content).to_lowercase();
    terms
        .iter()
        .filter(|term| !term.is_empty())
        .map(|term| haystack.matches(term.as_str()).count())
        .sum()
}

/// 稳定排序：得分高者在前，其次字数多者在前，其余保持候选顺序
pub fn rank_sources(profile: &BusinessProfile, sources: &mut [ResearchSource]) {
    let mut terms = vec![
        profile.company_name.to_lowercase(),
        profile.industry.to_lowercase(),
    ];
    terms.extend(profile.specific_topics.iter().map(|t| t.to_lowercase()));

    sources.sort_by_cached_key(|source| {
        (
            std::cmp::Reverse(relevance_score(source, &terms)),
            std::cmp::Reverse(source.word_count),
        )
    });
}

/// 执行调研阶段
///
/// 单个来源的失败只会被记录，不会中断流程。抓取在 `deadline` 之前结束，
/// 为后续同步阶段预留 `outline_reserve_ms`。
pub async fn execute(
    context: &GeneratorContext,
    profile: &BusinessProfile,
    deadline: &Deadline,
) -> ResearchOutcome {
    let config = &context.config;
    let candidates = plan_candidates(profile, &config.research);
    let attempted = candidates.len();
    info!(
        "🔎 开始调研 {} 个候选来源 (深度: {}, 并发: {})",
        attempted, profile.research_depth, config.research.max_parallels
    );

    let research_deadline =
        deadline.shortened_by(Duration::from_millis(config.generation.outline_reserve_ms));
    let per_fetch_timeout = Duration::from_secs(config.research.fetch_timeout_seconds);

    let futures = candidates
        .into_iter()
        .map(|url| {
            fetch_one(
                Arc::clone(&context.fetcher),
                url,
                per_fetch_timeout,
                research_deadline,
            )
        })
        .collect::<Vec<_>>();
    let results = do_parallel_with_limit(futures, config.research.max_parallels).await;

    let mut sources = Vec::new();
    let mut failures = Vec::new();
    let mut seen = HashSet::new();
    for result in results {
        match result {
            Ok(source) => {
                if seen.insert(canonicalize_url(&source.url)) {
                    sources.push(source);
                }
            }
            Err(e) => {
                warn!("⚠️ 调研来源抓取失败: {}", e);
                failures.push(e);
            }
        }
    }

    rank_sources(profile, &mut sources);
    info!(
        "✅ 调研完成: {} 个来源可用, {} 个失败",
        sources.len(),
        failures.len()
    );

    ResearchOutcome {
        sources,
        failures,
        attempted,
    }
}

#[cfg(test)]
mod tests;
