use crate::types::insight::InsightCategory;
use crate::types::outline::SlideType;
use crate::types::profile::{BusinessType, FundingStage, TargetAudience};

/// 按演示对象、融资阶段和业务类型选择叙事模板
pub fn narrative_template(
    audience: TargetAudience,
    stage: FundingStage,
    business_type: BusinessType,
) -> Vec<SlideType> {
    let mut template = audience_template(audience, stage).to_vec();
    if let Some(emphasis) =
        business_emphasis(business_type).filter(|slide_type| !template.contains(slide_type))
    {
        // 收尾页保持在最后
        let at = template.len() - 1;
        template.insert(at, emphasis);
    }
    template
}

/// 业务类型需要额外强调的幻灯片
fn business_emphasis(business_type: BusinessType) -> Option<SlideType> {
    match business_type {
        BusinessType::Marketplace => Some(SlideType::Competition),
        BusinessType::Saas => Some(SlideType::Traction),
        BusinessType::Hardware => Some(SlideType::Roadmap),
        BusinessType::B2b | BusinessType::B2c | BusinessType::Other => None,
    }
}

fn audience_template(audience: TargetAudience, stage: FundingStage) -> &'static [SlideType] {
    use SlideType::*;
    match audience {
        TargetAudience::Investors if stage.is_early() => &[
            Title,
            Problem,
            Solution,
            Market,
            Product,
            BusinessModel,
            Traction,
            Team,
            Ask,
        ],
        TargetAudience::Investors => &[
            Title,
            Problem,
            Solution,
            Traction,
            Market,
            BusinessModel,
            Competition,
            Financials,
            Team,
            Ask,
        ],
        TargetAudience::Customers => &[Title, Problem, Product, Benefits, Proof, Roadmap],
        TargetAudience::Partners => &[
            Title,
            Problem,
            Solution,
            Market,
            BusinessModel,
            Proof,
            Team,
            Roadmap,
        ],
        TargetAudience::Internal => &[Title, Traction, Financials, Roadmap, Risks, Team],
    }
}

/// 每种幻灯片的要点来源
pub fn key_point_sources(slide_type: SlideType) -> &'static [InsightCategory] {
    use InsightCategory::*;
    match slide_type {
        SlideType::Title | SlideType::Custom | SlideType::Ask => &[],
        SlideType::Problem => &[ProblemStatement],
        SlideType::Solution => &[Solution, CompetitiveAdvantage],
        SlideType::Market => &[TargetMarket, IndustryTrends],
        SlideType::Product => &[Solution],
        SlideType::BusinessModel => &[BusinessModel],
        SlideType::Traction => &[Traction],
        SlideType::Competition => &[CompetitiveAdvantage],
        SlideType::Team => &[TeamCredentials],
        SlideType::Financials => &[FinancialProjections],
        SlideType::Benefits => &[CompetitiveAdvantage, Solution],
        SlideType::Proof => &[Traction, KeyMetrics],
        SlideType::Roadmap => &[IndustryTrends],
        SlideType::Risks => &[Risks],
    }
}

/// 每种幻灯片的统计数据来源，只保留含数字的片段
pub fn statistic_source(slide_type: SlideType) -> Option<InsightCategory> {
    match slide_type {
        SlideType::Market => Some(InsightCategory::MarketSize),
        SlideType::Traction => Some(InsightCategory::KeyMetrics),
        SlideType::Financials => Some(InsightCategory::FinancialProjections),
        _ => None,
    }
}

pub fn suggested_visuals(slide_type: SlideType) -> &'static [&'static str] {
    match slide_type {
        SlideType::Title => &["logo"],
        SlideType::Problem => &["problem-illustration"],
        SlideType::Solution => &["product-hero"],
        SlideType::Market => &["market-map"],
        SlideType::Product => &["product-screenshot"],
        SlideType::Traction => &["line-chart"],
        SlideType::Competition => &["competitive-matrix"],
        SlideType::Team => &["team-photo"],
        SlideType::Financials => &["bar-chart"],
        SlideType::Proof => &["customer-logos"],
        SlideType::BusinessModel
        | SlideType::Ask
        | SlideType::Benefits
        | SlideType::Roadmap
        | SlideType::Risks
        | SlideType::Custom => &[],
    }
}

/// 话题是否已由该幻灯片承载：类型同义词命中，或整个标题与话题相同（忽略大小写）。
/// 封面标题是公司名，不参与标题比较
pub fn covers_topic(slide_type: SlideType, title: &str, topic: &str) -> bool {
    let topic = topic.trim().to_lowercase();
    if slide_type.synonyms().contains(&topic.as_str()) {
        return true;
    }
    slide_type != SlideType::Title && title.trim().to_lowercase() == topic
}

/// 没有任何洞察时的占位提示
pub fn placeholder_prompt(slide_type: SlideType, company: &str, topic: &str) -> String {
    match slide_type {
        SlideType::Title => format!("Introduce {}", company),
        SlideType::Problem => format!("Describe the problem {} solves and who feels it", company),
        SlideType::Solution => format!("Explain how {} solves the problem", company),
        SlideType::Market => format!("Size the {} market opportunity", topic),
        SlideType::Product => format!("Show the core {} product experience", company),
        SlideType::BusinessModel => format!("Explain how {} makes money", company),
        SlideType::Traction => "Highlight key milestones and growth to date".to_string(),
        SlideType::Competition => format!("Position {} against the alternatives", company),
        SlideType::Team => "Introduce the founders and key hires".to_string(),
        SlideType::Financials => "Summarize revenue projections and key assumptions".to_string(),
        SlideType::Ask => "State the amount being raised and the use of funds".to_string(),
        SlideType::Benefits => format!("List the outcomes customers get from {}", company),
        SlideType::Proof => "Share case studies, testimonials or pilot results".to_string(),
        SlideType::Roadmap => "Outline the next milestones".to_string(),
        SlideType::Risks => "Name the main risks and how they are mitigated".to_string(),
        SlideType::Custom => format!("Add details about {}", topic),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_template_has_title_and_four_substantive_slides() {
        for audience in TargetAudience::ALL {
            for stage in FundingStage::ALL {
                for business_type in BusinessType::ALL {
                    let template = narrative_template(audience, stage, business_type);
                    assert_eq!(template[0], SlideType::Title);
                    assert!(template.len() >= 5);
                    assert!(!template[1..].contains(&SlideType::Title));
                }
            }
        }
    }

    #[test]
    fn test_seed_investor_template_ends_with_ask() {
        let template = narrative_template(TargetAudience::Investors, FundingStage::Seed, BusinessType::B2b);
        assert_eq!(
            &template[..4],
            &[
                SlideType::Title,
                SlideType::Problem,
                SlideType::Solution,
                SlideType::Market
            ]
        );
        assert_eq!(template.last(), Some(&SlideType::Ask));
    }

    #[test]
    fn test_customer_template_emphasizes_product_and_proof() {
        let template = narrative_template(TargetAudience::Customers, FundingStage::Growth, BusinessType::B2c);
        assert!(template.contains(&SlideType::Product));
        assert!(template.contains(&SlideType::Benefits));
        assert!(template.contains(&SlideType::Proof));
        assert!(!template.contains(&SlideType::Ask));
    }

    #[test]
    fn test_business_type_adds_emphasis_before_closing_slide() {
        let b2b = narrative_template(TargetAudience::Investors, FundingStage::Seed, BusinessType::B2b);
        let hardware =
            narrative_template(TargetAudience::Investors, FundingStage::Seed, BusinessType::Hardware);
        assert_eq!(hardware.len(), b2b.len() + 1);
        assert_eq!(hardware[hardware.len() - 2], SlideType::Roadmap);
        assert_eq!(hardware.last(), Some(&SlideType::Ask));

        let marketplace = narrative_template(
            TargetAudience::Investors,
            FundingStage::Seed,
            BusinessType::Marketplace,
        );
        assert!(marketplace.contains(&SlideType::Competition));
        assert!(!b2b.contains(&SlideType::Competition));

        // 模板已包含时不重复插入
        let saas = narrative_template(TargetAudience::Internal, FundingStage::Growth, BusinessType::Saas);
        assert_eq!(
            saas.iter().filter(|t| **t == SlideType::Traction).count(),
            1
        );
    }

    #[test]
    fn test_topic_coverage_matches_whole_title_or_synonym() {
        assert!(covers_topic(SlideType::BusinessModel, "Business Model", "Pricing"));
        assert!(covers_topic(SlideType::Custom, "Hiring Plan", "hiring plan"));
        assert!(!covers_topic(SlideType::Market, "Market Opportunity", "Mark"));
        assert!(!covers_topic(SlideType::Title, "Acme AI", "Acme AI"));
        assert!(covers_topic(SlideType::Title, "Acme AI", "Cover"));
    }
}
