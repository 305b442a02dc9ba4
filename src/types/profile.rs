use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::errors::ValidationError;

/// 演示对象
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TargetAudience {
    #[default]
    Investors,
    Customers,
    Partners,
    Internal,
}

impl TargetAudience {
    pub const ALL: [TargetAudience; 4] = [
        TargetAudience::Investors,
        TargetAudience::Customers,
        TargetAudience::Partners,
        TargetAudience::Internal,
    ];
}

impl Display for TargetAudience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetAudience::Investors => write!(f, "investors"),
            TargetAudience::Customers => write!(f, "customers"),
            TargetAudience::Partners => write!(f, "partners"),
            TargetAudience::Internal => write!(f, "internal"),
        }
    }
}

impl FromStr for TargetAudience {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "investors" | "investor" | "vc" => Ok(TargetAudience::Investors),
            "customers" | "customer" | "clients" => Ok(TargetAudience::Customers),
            "partners" | "partner" => Ok(TargetAudience::Partners),
            "internal" | "team" | "employees" => Ok(TargetAudience::Internal),
            _ => Err(ValidationError::UnknownValue {
                field: "targetAudience",
                value: s.to_string(),
            }),
        }
    }
}

/// 融资阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FundingStage {
    PreSeed,
    #[default]
    Seed,
    SeriesA,
    SeriesB,
    Growth,
}

impl FundingStage {
    pub const ALL: [FundingStage; 5] = [
        FundingStage::PreSeed,
        FundingStage::Seed,
        FundingStage::SeriesA,
        FundingStage::SeriesB,
        FundingStage::Growth,
    ];

    /// 是否处于早期阶段（种子轮及以前）
    pub fn is_early(&self) -> bool {
        matches!(self, FundingStage::PreSeed | FundingStage::Seed)
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            FundingStage::PreSeed => "Pre-Seed",
            FundingStage::Seed => "Seed",
            FundingStage::SeriesA => "Series A",
            FundingStage::SeriesB => "Series B",
            FundingStage::Growth => "Growth",
        }
    }
}

impl Display for FundingStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FundingStage::PreSeed => write!(f, "pre-seed"),
            FundingStage::Seed => write!(f, "seed"),
            FundingStage::SeriesA => write!(f, "series-a"),
            FundingStage::SeriesB => write!(f, "series-b"),
            FundingStage::Growth => write!(f, "growth"),
        }
    }
}

impl FromStr for FundingStage {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['_', ' '], "-");
        match normalized.as_str() {
            "pre-seed" | "preseed" | "idea" => Ok(FundingStage::PreSeed),
            "seed" => Ok(FundingStage::Seed),
            "series-a" | "a" => Ok(FundingStage::SeriesA),
            "series-b" | "b" => Ok(FundingStage::SeriesB),
            "growth" | "series-c" | "late" => Ok(FundingStage::Growth),
            _ => Err(ValidationError::UnknownValue {
                field: "fundingStage",
                value: s.to_string(),
            }),
        }
    }
}

/// 商业模式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BusinessType {
    #[default]
    B2b,
    B2c,
    Marketplace,
    Saas,
    Hardware,
    Other,
}

impl BusinessType {
    pub const ALL: [BusinessType; 6] = [
        BusinessType::B2b,
        BusinessType::B2c,
        BusinessType::Marketplace,
        BusinessType::Saas,
        BusinessType::Hardware,
        BusinessType::Other,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            BusinessType::B2b => "B2B",
            BusinessType::B2c => "B2C",
            BusinessType::Marketplace => "marketplace",
            BusinessType::Saas => "SaaS",
            BusinessType::Hardware => "hardware",
            BusinessType::Other => "independent",
        }
    }
}

impl Display for BusinessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessType::B2b => write!(f, "b2b"),
            BusinessType::B2c => write!(f, "b2c"),
            BusinessType::Marketplace => write!(f, "marketplace"),
            BusinessType::Saas => write!(f, "saas"),
            BusinessType::Hardware => write!(f, "hardware"),
            BusinessType::Other => write!(f, "other"),
        }
    }
}

impl FromStr for BusinessType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "b2b" => Ok(BusinessType::B2b),
            "b2c" => Ok(BusinessType::B2c),
            "marketplace" => Ok(BusinessType::Marketplace),
            "saas" => Ok(BusinessType::Saas),
            "hardware" => Ok(BusinessType::Hardware),
            "other" => Ok(BusinessType::Other),
            _ => Err(ValidationError::UnknownValue {
                field: "businessType",
                value: s.to_string(),
            }),
        }
    }
}

/// 调研深度，决定抓取来源的上限
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResearchDepth {
    #[default]
    Basic,
    Comprehensive,
    Expert,
}

impl ResearchDepth {
    /// 每个深度允许的最大来源数量
    pub fn max_sources(&self) -> usize {
        match self {
            ResearchDepth::Basic => 3,
            ResearchDepth::Comprehensive => 8,
            ResearchDepth::Expert => 15,
        }
    }
}

impl Display for ResearchDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResearchDepth::Basic => write!(f, "basic"),
            ResearchDepth::Comprehensive => write!(f, "comprehensive"),
            ResearchDepth::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for ResearchDepth {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(ResearchDepth::Basic),
            "comprehensive" => Ok(ResearchDepth::Comprehensive),
            "expert" => Ok(ResearchDepth::Expert),
            _ => Err(ValidationError::UnknownValue {
                field: "researchDepth",
                value: s.to_string(),
            }),
        }
    }
}

/// 主题（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Theme {
    #[default]
    Modern,
    Corporate,
    Startup,
    Creative,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Modern, Theme::Corporate, Theme::Startup, Theme::Creative];
}

impl Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Modern => write!(f, "modern"),
            Theme::Corporate => write!(f, "corporate"),
            Theme::Startup => write!(f, "startup"),
            Theme::Creative => write!(f, "creative"),
        }
    }
}

impl FromStr for Theme {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "modern" => Ok(Theme::Modern),
            "corporate" => Ok(Theme::Corporate),
            "startup" => Ok(Theme::Startup),
            "creative" => Ok(Theme::Creative),
            _ => Err(ValidationError::UnknownTheme(s.to_string())),
        }
    }
}

/// 幻灯片宽高比
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    #[default]
    SixteenNine,
    #[serde(rename = "4:3")]
    FourThree,
    #[serde(rename = "widescreen")]
    Widescreen,
}

impl AspectRatio {
    /// 画布像素尺寸
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            AspectRatio::SixteenNine => (1920, 1080),
            AspectRatio::FourThree => (1024, 768),
            AspectRatio::Widescreen => (1920, 1200),
        }
    }

    pub fn is_narrow(&self) -> bool {
        matches!(self, AspectRatio::FourThree)
    }
}

impl Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AspectRatio::SixteenNine => write!(f, "16:9"),
            AspectRatio::FourThree => write!(f, "4:3"),
            AspectRatio::Widescreen => write!(f, "widescreen"),
        }
    }
}

impl FromStr for AspectRatio {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "16:9" => Ok(AspectRatio::SixteenNine),
            "4:3" => Ok(AspectRatio::FourThree),
            "widescreen" | "16:10" => Ok(AspectRatio::Widescreen),
            _ => Err(ValidationError::UnknownAspectRatio(s.to_string())),
        }
    }
}

/// 生成请求，字段保持为原始字符串，由 [`GenerationRequest::validate`] 转换为强类型的业务画像
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationRequest {
    pub company_name: Option<String>,
    pub industry: Option<String>,
    pub target_audience: Option<String>,
    pub funding_stage: Option<String>,
    pub business_type: Option<String>,
    pub description: Option<String>,
    pub problem_statement: Option<String>,
    pub solution_description: Option<String>,
    pub funding_amount: Option<String>,
    pub revenue: Option<String>,
    pub team_size: Option<u32>,
    pub specific_topics: Vec<String>,
    pub research_depth: Option<String>,
    pub theme: Option<String>,
    pub slide_aspect_ratio: Option<String>,
    pub source_urls: Vec<String>,
}

impl GenerationRequest {
    pub fn new(company_name: impl Into<String>) -> Self {
        Self {
            company_name: Some(company_name.into()),
            ..Default::default()
        }
    }

    /// 校验请求并生成不可变的业务画像
    pub fn validate(&self) -> Result<BusinessProfile, ValidationError> {
        let company_name = non_empty(self.company_name.as_deref())
            .ok_or(ValidationError::MissingField("companyName"))?;

        let theme = parse_or_default::<Theme>(self.theme.as_deref())?;
        let slide_aspect_ratio = parse_or_default::<AspectRatio>(self.slide_aspect_ratio.as_deref())?;
        let target_audience = parse_or_default::<TargetAudience>(self.target_audience.as_deref())?;
        let funding_stage = parse_or_default::<FundingStage>(self.funding_stage.as_deref())?;
        let business_type = parse_or_default::<BusinessType>(self.business_type.as_deref())?;
        let research_depth = parse_or_default::<ResearchDepth>(self.research_depth.as_deref())?;

        let mut specific_topics: Vec<String> = Vec::new();
        for topic in &self.specific_topics {
            let topic = topic.trim();
            if topic.is_empty() {
                continue;
            }
            if !specific_topics
                .iter()
                .any(|existing| existing.eq_ignore_ascii_case(topic))
            {
                specific_topics.push(topic.to_string());
            }
        }

        Ok(BusinessProfile {
            company_name,
            industry: non_empty(self.industry.as_deref()).unwrap_or_else(|| "technology".to_string()),
            target_audience,
            funding_stage,
            business_type,
            description: non_empty(self.description.as_deref()),
            problem_statement: non_empty(self.problem_statement.as_deref()),
            solution_description: non_empty(self.solution_description.as_deref()),
            financials: Financials {
                funding_amount: non_empty(self.funding_amount.as_deref()),
                revenue: non_empty(self.revenue.as_deref()),
                team_size: self.team_size.filter(|size| *size > 0),
            },
            specific_topics,
            theme,
            slide_aspect_ratio,
            research_depth,
            source_urls: self
                .source_urls
                .iter()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty())
                .collect(),
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn parse_or_default<T>(value: Option<&str>) -> Result<T, ValidationError>
where
    T: FromStr<Err = ValidationError> + Default,
{
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.parse(),
        _ => Ok(T::default()),
    }
}

/// 财务信息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financials {
    pub funding_amount: Option<String>,
    pub revenue: Option<String>,
    pub team_size: Option<u32>,
}

/// 用户提供的业务画像，生成开始后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessProfile {
    pub company_name: String,
    pub industry: String,
    pub target_audience: TargetAudience,
    pub funding_stage: FundingStage,
    pub business_type: BusinessType,
    pub description: Option<String>,
    pub problem_statement: Option<String>,
    pub solution_description: Option<String>,
    pub financials: Financials,
    pub specific_topics: Vec<String>,
    pub theme: Theme,
    pub slide_aspect_ratio: AspectRatio,
    pub research_depth: ResearchDepth,
    pub source_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_company_name_is_rejected() {
        let request = GenerationRequest::new("   ");
        assert_eq!(
            request.validate(),
            Err(ValidationError::MissingField("companyName"))
        );

        let request = GenerationRequest::default();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_defaults_are_applied() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        assert_eq!(profile.company_name, "Acme AI");
        assert_eq!(profile.industry, "technology");
        assert_eq!(profile.target_audience, TargetAudience::Investors);
        assert_eq!(profile.funding_stage, FundingStage::Seed);
        assert_eq!(profile.theme, Theme::Modern);
        assert_eq!(profile.slide_aspect_ratio, AspectRatio::SixteenNine);
        assert_eq!(profile.research_depth, ResearchDepth::Basic);
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        let request = GenerationRequest {
            theme: Some("retro".to_string()),
            ..GenerationRequest::new("Acme AI")
        };
        assert_eq!(
            request.validate(),
            Err(ValidationError::UnknownTheme("retro".to_string()))
        );
    }

    #[test]
    fn test_unknown_aspect_ratio_is_rejected() {
        let request = GenerationRequest {
            slide_aspect_ratio: Some("21:9".to_string()),
            ..GenerationRequest::new("Acme AI")
        };
        assert!(matches!(
            request.validate(),
            Err(ValidationError::UnknownAspectRatio(_))
        ));
    }

    #[test]
    fn test_topics_are_trimmed_and_deduplicated() {
        let request = GenerationRequest {
            specific_topics: vec![
                "Pricing".to_string(),
                " ".to_string(),
                "pricing".to_string(),
                "Go-to-market".to_string(),
            ],
            ..GenerationRequest::new("Acme AI")
        };
        let profile = request.validate().unwrap();
        assert_eq!(profile.specific_topics, vec!["Pricing", "Go-to-market"]);
    }

    #[test]
    fn test_request_parses_camel_case_json() {
        let json = r#"{
            "companyName": "Acme AI",
            "targetAudience": "investors",
            "fundingStage": "series-a",
            "researchDepth": "expert",
            "slideAspectRatio": "4:3",
            "teamSize": 12
        }"#;
        let request: GenerationRequest = serde_json::from_str(json).unwrap();
        let profile = request.validate().unwrap();
        assert_eq!(profile.funding_stage, FundingStage::SeriesA);
        assert_eq!(profile.research_depth.max_sources(), 15);
        assert_eq!(profile.slide_aspect_ratio, AspectRatio::FourThree);
        assert_eq!(profile.financials.team_size, Some(12));
    }

    #[test]
    fn test_enum_display_round_trip() {
        for stage in FundingStage::ALL {
            assert_eq!(stage.to_string().parse::<FundingStage>().unwrap(), stage);
        }
        for audience in TargetAudience::ALL {
            assert_eq!(
                audience.to_string().parse::<TargetAudience>().unwrap(),
                audience
            );
        }
        for theme in Theme::ALL {
            assert_eq!(theme.to_string().parse::<Theme>().unwrap(), theme);
        }
    }
}
