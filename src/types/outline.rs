use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 幻灯片类型（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SlideType {
    Title,
    Problem,
    Solution,
    Market,
    Product,
    BusinessModel,
    Traction,
    Competition,
    Team,
    Financials,
    Ask,
    Benefits,
    Proof,
    Roadmap,
    Risks,
    Custom,
}

impl SlideType {
    pub fn default_title(&self) -> &'static str {
        match self {
            SlideType::Title => "Title",
            SlideType::Problem => "The Problem",
            SlideType::Solution => "Our Solution",
            SlideType::Market => "Market Opportunity",
            SlideType::Product => "Product",
            SlideType::BusinessModel => "Business Model",
            SlideType::Traction => "Traction",
            SlideType::Competition => "Competitive Landscape",
            SlideType::Team => "Team",
            SlideType::Financials => "Financials",
            SlideType::Ask => "The Ask",
            SlideType::Benefits => "Why It Matters To You",
            SlideType::Proof => "Proof Points",
            SlideType::Roadmap => "Roadmap",
            SlideType::Risks => "Risks & Mitigations",
            SlideType::Custom => "Additional Topic",
        }
    }

    /// 用于判断用户话题是否已被模板覆盖的同义词
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            SlideType::Title => &["title", "cover", "intro"],
            SlideType::Problem => &["problem", "pain", "challenge"],
            SlideType::Solution => &["solution", "approach"],
            SlideType::Market => &["market", "tam", "opportunity", "market size"],
            SlideType::Product => &["product", "demo", "features"],
            SlideType::BusinessModel => &["business model", "pricing", "revenue model", "monetization"],
            SlideType::Traction => &["traction", "growth", "metrics", "kpis"],
            SlideType::Competition => &["competition", "competitors", "competitive landscape"],
            SlideType::Team => &["team", "founders", "leadership"],
            SlideType::Financials => &["financials", "projections", "forecast", "financial projections"],
            SlideType::Ask => &["ask", "funding", "investment", "use of funds"],
            SlideType::Benefits => &["benefits", "value proposition", "roi"],
            SlideType::Proof => &["proof", "case study", "case studies", "testimonials"],
            SlideType::Roadmap => &["roadmap", "milestones", "timeline"],
            SlideType::Risks => &["risks", "risk", "mitigation"],
            SlideType::Custom => &[],
        }
    }
}

impl Display for SlideType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SlideType::Title => "title",
            SlideType::Problem => "problem",
            SlideType::Solution => "solution",
            SlideType::Market => "market",
            SlideType::Product => "product",
            SlideType::BusinessModel => "business-model",
            SlideType::Traction => "traction",
            SlideType::Competition => "competition",
            SlideType::Team => "team",
            SlideType::Financials => "financials",
            SlideType::Ask => "ask",
            SlideType::Benefits => "benefits",
            SlideType::Proof => "proof",
            SlideType::Roadmap => "roadmap",
            SlideType::Risks => "risks",
            SlideType::Custom => "custom",
        };
        write!(f, "{}", name)
    }
}

/// 单张幻灯片的大纲
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideOutline {
    /// 从 1 开始连续编号
    pub slide_number: usize,
    pub slide_type: SlideType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub key_points: Vec<String>,
    pub statistics: Vec<String>,
    pub suggested_visuals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

impl SlideOutline {
    pub fn new(slide_type: SlideType, title: impl Into<String>) -> Self {
        Self {
            slide_number: 0,
            slide_type,
            title: title.into(),
            subtitle: None,
            key_points: Vec::new(),
            statistics: Vec::new(),
            suggested_visuals: Vec::new(),
            speaker_notes: None,
        }
    }
}

/// 整个演示文稿的大纲
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchDeckOutline {
    pub title: String,
    pub subtitle: String,
    pub executive_summary: String,
    pub company_overview: String,
    pub slides: Vec<SlideOutline>,
}

impl PitchDeckOutline {
    /// 按当前顺序重新编号，保证 1..n 无间断
    pub fn renumber(&mut self) {
        for (index, slide) in self.slides.iter_mut().enumerate() {
            slide.slide_number = index + 1;
        }
    }

    pub fn is_contiguous(&self) -> bool {
        self.slides
            .iter()
            .enumerate()
            .all(|(index, slide)| slide.slide_number == index + 1)
    }
}
