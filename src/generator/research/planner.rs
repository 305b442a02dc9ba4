//! 调研候选来源规划

use std::collections::HashSet;

use crate::config::ResearchConfig;
use crate::types::profile::BusinessProfile;

/// 规范化 URL：忽略协议、主机大小写、片段和末尾斜杠
pub fn canonicalize_url(url: &str) -> String {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let without_scheme = if lower.starts_with("https://") {
        &trimmed[8..]
    } else if lower.starts_with("http://") {
        &trimmed[7..]
    } else {
        trimmed
    };

    let without_fragment = without_scheme
        .split_once('#')
        .map_or(without_scheme, |(head, _)| head);

    let (location, query) = match without_fragment.split_once('?') {
        Some((location, query)) => (location, Some(query)),
        None => (without_fragment, None),
    };

    let (host, path) = match location.split_once('/') {
        Some((host, path)) => (host, path.trim_end_matches('/')),
        None => (location, ""),
    };

    let mut canonical = host.to_ascii_lowercase();
    if !path.is_empty() {
        canonical.push('/');
        canonical.push_str(path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        canonical.push('?');
        canonical.push_str(query);
    }
    canonical
}

/// 从业务画像生成检索关键词：公司、行业、以及每个指定话题
pub fn research_queries(profile: &BusinessProfile) -> Vec<String> {
    let mut queries = vec![
        profile.company_name.clone(),
        format!("{} market", profile.industry),
    ];
    for topic in &profile.specific_topics {
        queries.push(format!("{} {}", profile.industry, topic));
    }
    queries
}

/// 生成候选来源列表
///
/// 顺序为：请求中显式给出的 URL、配置中的额外来源、模板展开的检索 URL。
/// 按规范化 URL 去重后再按调研深度截断。
pub fn plan_candidates(profile: &BusinessProfile, config: &ResearchConfig) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    candidates.extend(profile.source_urls.iter().cloned());
    candidates.extend(config.extra_sources.iter().cloned());

    for query in research_queries(profile) {
        let encoded = urlencoding::encode(&query);
        for template in &config.source_templates {
            candidates.push(template.replace("{query}", &encoded));
        }
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|url| !url.trim().is_empty())
        .filter(|url| seen.insert(canonicalize_url(url)))
        .take(profile.research_depth.max_sources())
        .collect()
}
