//! 洞察抽取：先使用业务画像中的显式字段，再回退到调研文本

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use tracing::{debug, info};

use crate::generator::context::GeneratorContext;
use crate::types::insight::{InsightCategory, InsightSet};
use crate::types::profile::BusinessProfile;
use crate::types::research::ResearchSource;
use crate::utils::text::truncate_chars;

/// 单条洞察的最大字符数
const MAX_SNIPPET_CHARS: usize = 320;

static NUMERIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9$%€£¥]").expect("valid numeric regex"));

static CATEGORY_PATTERNS: LazyLock<Vec<(InsightCategory, Regex)>> = LazyLock::new(|| {
    InsightCategory::ALL
        .iter()
        .map(|category| {
            let pattern = category
                .keywords()
                .iter()
                .map(|kw| keyword_pattern(kw))
                .collect::<Vec<_>>()
                .join("|");
            let regex = Regex::new(&format!("(?i)(?:{})", pattern)).expect("valid keyword regex");
            (*category, regex)
        })
        .collect()
});

/// 短关键词按整词匹配（允许复数），长关键词按前缀匹配
fn keyword_pattern(keyword: &str) -> String {
    let escaped = regex::escape(keyword);
    if keyword.chars().count() <= 4 {
        format!(r"\b{}s?\b", escaped)
    } else {
        format!(r"\b{}", escaped)
    }
}

/// 由业务画像字段直接得到的洞察
fn profile_snippets(profile: &BusinessProfile, category: InsightCategory) -> Vec<String> {
    let financials = &profile.financials;
    let mut snippets = Vec::new();
    match category {
        InsightCategory::ProblemStatement => {
            snippets.extend(profile.problem_statement.clone());
        }
        InsightCategory::Solution => {
            snippets.extend(profile.solution_description.clone());
        }
        InsightCategory::FinancialProjections => {
            if let Some(amount) = &financials.funding_amount {
                snippets.push(format!("Raising {}", amount));
            }
            if let Some(revenue) = &financials.revenue {
                snippets.push(format!("Current revenue: {}", revenue));
            }
        }
        InsightCategory::Traction => {
            if let Some(revenue) = &financials.revenue {
                snippets.push(format!("{} generating {} in revenue", profile.company_name, revenue));
            }
        }
        InsightCategory::TeamCredentials => {
            if let Some(size) = financials.team_size {
                snippets.push(format!("A team of {} people", size));
            }
        }
        InsightCategory::KeyMetrics => {
            if let Some(revenue) = &financials.revenue {
                snippets.push(format!("Revenue: {}", revenue));
            }
            if let Some(size) = financials.team_size {
                snippets.push(format!("Team size: {}", size));
            }
        }
        InsightCategory::CompetitiveAdvantage
        | InsightCategory::MarketSize
        | InsightCategory::BusinessModel
        | InsightCategory::TargetMarket
        | InsightCategory::Risks
        | InsightCategory::IndustryTrends => {}
    }
    snippets
}

struct Candidate<'a> {
    text: &'a str,
    specificity: usize,
    source_index: usize,
    position: usize,
}

/// 按 (具体程度 desc, 来源顺序, 句子位置) 选出前 `limit` 条互不相同的句子
fn select_ranked(
    sources: &[Vec<&str>],
    pattern: &Regex,
    limit: usize,
) -> Vec<String> {
    let mut candidates = Vec::new();
    for (source_index, sentences) in sources.iter().enumerate() {
        for (position, sentence) in sentences.iter().enumerate() {
            let hits = pattern.find_iter(sentence).count();
            if hits == 0 {
                continue;
            }
            let numeric = if NUMERIC_RE.is_match(sentence) { 2 } else { 0 };
            candidates.push(Candidate {
                text: *sentence,
                specificity: hits + numeric,
                source_index,
                position,
            });
        }
    }

    candidates.sort_by(|a, b| {
        b.specificity
            .cmp(&a.specificity)
            .then(a.source_index.cmp(&b.source_index))
            .then(a.position.cmp(&b.position))
    });

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(|c| truncate_chars(c.text, MAX_SNIPPET_CHARS).to_string())
        .filter(|text| seen.insert(text.to_lowercase()))
        .take(limit)
        .collect()
}

/// 抽取洞察集合。相同输入总是得到相同输出。
pub fn extract(
    profile: &BusinessProfile,
    sources: &[ResearchSource],
    per_category: usize,
) -> InsightSet {
    let sentences: Vec<Vec<&str>> = sources.iter().map(|s| s.sentences()).collect();
    let mut insights = InsightSet::new();

    for (category, pattern) in CATEGORY_PATTERNS.iter() {
        let from_profile = profile_snippets(profile, *category);
        let snippets = if from_profile.is_empty() {
            select_ranked(&sentences, pattern, per_category)
        } else {
            from_profile.into_iter().take(per_category.max(1)).collect()
        };
        debug!("🧩 {}: {} 条洞察", category.display_name(), snippets.len());
        insights.set(*category, snippets);
    }

    for topic in &profile.specific_topics {
        let pattern = match Regex::new(&format!("(?i){}", keyword_pattern(topic))) {
            Ok(pattern) => pattern,
            Err(_) => continue,
        };
        let snippets = select_ranked(&sentences, &pattern, per_category);
        insights.topic_snippets.insert(topic.clone(), snippets);
    }

    insights
}

/// 执行洞察抽取阶段
pub fn execute(
    context: &GeneratorContext,
    profile: &BusinessProfile,
    sources: &[ResearchSource],
) -> InsightSet {
    let insights = extract(
        profile,
        sources,
        context.config.generation.insights_per_category,
    );
    info!(
        "🧠 洞察抽取完成: {}/{} 个分类有内容",
        insights.covered_categories(),
        InsightCategory::ALL.len()
    );
    insights
}
