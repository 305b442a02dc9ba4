use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

/// 固定的商业洞察分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightCategory {
    MarketSize,
    CompetitiveAdvantage,
    ProblemStatement,
    Solution,
    BusinessModel,
    TargetMarket,
    FinancialProjections,
    TeamCredentials,
    Traction,
    Risks,
    KeyMetrics,
    IndustryTrends,
}

impl InsightCategory {
    pub const ALL: [InsightCategory; 12] = [
        InsightCategory::MarketSize,
        InsightCategory::CompetitiveAdvantage,
        InsightCategory::ProblemStatement,
        InsightCategory::Solution,
        InsightCategory::BusinessModel,
        InsightCategory::TargetMarket,
        InsightCategory::FinancialProjections,
        InsightCategory::TeamCredentials,
        InsightCategory::Traction,
        InsightCategory::Risks,
        InsightCategory::KeyMetrics,
        InsightCategory::IndustryTrends,
    ];

    /// 从调研文本中识别该分类的关键词
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            InsightCategory::MarketSize => &[
                "market size",
                "tam",
                "sam",
                "addressable market",
                "billion",
                "market is expected",
                "market value",
            ],
            InsightCategory::CompetitiveAdvantage => &[
                "competitive advantage",
                "differentiat",
                "unique",
                "moat",
                "patent",
                "proprietary",
                "outperform",
            ],
            InsightCategory::ProblemStatement => &[
                "problem",
                "challenge",
                "pain point",
                "struggle",
                "inefficien",
                "costly",
                "lack of",
            ],
            InsightCategory::Solution => &[
                "solution",
                "platform",
                "enables",
                "automate",
                "helps",
                "solves",
            ],
            InsightCategory::BusinessModel => &[
                "business model",
                "subscription",
                "pricing",
                "revenue model",
                "per seat",
                "commission",
                "licens",
            ],
            InsightCategory::TargetMarket => &[
                "target market",
                "customers",
                "segment",
                "smb",
                "enterprise",
                "consumers",
                "buyers",
            ],
            InsightCategory::FinancialProjections => &[
                "forecast",
                "projected",
                "projection",
                "revenue",
                "profit",
                "margin",
                "ebitda",
            ],
            InsightCategory::TeamCredentials => &[
                "founder",
                "ceo",
                "cto",
                "team",
                "experience",
                "previously",
                "veteran",
            ],
            InsightCategory::Traction => &[
                "traction",
                "users",
                "growth",
                "customers signed",
                "pilot",
                "partnership",
                "adoption",
            ],
            InsightCategory::Risks => &[
                "risk",
                "regulation",
                "regulatory",
                "threat",
                "uncertain",
                "compliance",
                "headwind",
            ],
            InsightCategory::KeyMetrics => &[
                "kpi",
                "churn",
                "retention",
                "arr",
                "mrr",
                "cac",
                "ltv",
                "conversion",
            ],
            InsightCategory::IndustryTrends => &[
                "trend",
                "cagr",
                "emerging",
                "shift",
                "adoption of",
                "increasingly",
                "by 2030",
            ],
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            InsightCategory::MarketSize => "Market Size",
            InsightCategory::CompetitiveAdvantage => "Competitive Advantage",
            InsightCategory::ProblemStatement => "Problem Statement",
            InsightCategory::Solution => "Solution",
            InsightCategory::BusinessModel => "Business Model",
            InsightCategory::TargetMarket => "Target Market",
            InsightCategory::FinancialProjections => "Financial Projections",
            InsightCategory::TeamCredentials => "Team Credentials",
            InsightCategory::Traction => "Traction",
            InsightCategory::Risks => "Risks",
            InsightCategory::KeyMetrics => "Key Metrics",
            InsightCategory::IndustryTrends => "Industry Trends",
        }
    }
}

impl Display for InsightCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 洞察集合：每个分类总是存在，未命中时为空列表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightSet {
    categories: BTreeMap<InsightCategory, Vec<String>>,
    /// 用户指定话题 -> 调研中命中的句子
    #[serde(default)]
    pub topic_snippets: BTreeMap<String, Vec<String>>,
}

impl Default for InsightSet {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightSet {
    pub fn new() -> Self {
        Self {
            categories: InsightCategory::ALL
                .iter()
                .map(|category| (*category, Vec::new()))
                .collect(),
            topic_snippets: BTreeMap::new(),
        }
    }

    pub fn get(&self, category: InsightCategory) -> &[String] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn set(&mut self, category: InsightCategory, snippets: Vec<String>) {
        self.categories.insert(category, snippets);
    }

    pub fn is_empty(&self, category: InsightCategory) -> bool {
        self.get(category).is_empty()
    }

    /// 有内容的分类数量
    pub fn covered_categories(&self) -> usize {
        self.categories.values().filter(|v| !v.is_empty()).count()
    }

    pub fn topic(&self, topic: &str) -> &[String] {
        self.topic_snippets
            .get(topic)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}
