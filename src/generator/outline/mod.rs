//! 大纲构建：按模板生成幻灯片大纲，追加未覆盖的话题，并保证编号连续

use tracing::info;

use crate::types::insight::{InsightCategory, InsightSet};
use crate::types::outline::{PitchDeckOutline, SlideOutline, SlideType};
use crate::types::profile::BusinessProfile;

pub mod templates;

use templates::{
    covers_topic, key_point_sources, narrative_template, placeholder_prompt, statistic_source,
    suggested_visuals,
};

/// 每张幻灯片最多展示的要点，超出部分进入演讲者备注
pub const MAX_KEY_POINTS: usize = 4;
/// 每张幻灯片最多的统计数据条目
pub const MAX_STATISTICS: usize = 4;

fn has_digit(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
}

fn collect_points(insights: &InsightSet, categories: &[InsightCategory]) -> Vec<String> {
    let mut points: Vec<String> = Vec::new();
    for category in categories {
        for snippet in insights.get(*category) {
            if !points.contains(snippet) {
                points.push(snippet.clone());
            }
        }
    }
    points
}

/// 拆分要点：前 MAX_KEY_POINTS 条展示，其余作为备注
fn split_overflow(mut points: Vec<String>) -> (Vec<String>, Option<String>) {
    if points.len() <= MAX_KEY_POINTS {
        return (points, None);
    }
    let overflow = points.split_off(MAX_KEY_POINTS);
    (points, Some(overflow.join("\n")))
}

fn ask_points(profile: &BusinessProfile) -> Vec<String> {
    let mut points = Vec::new();
    if let Some(amount) = &profile.financials.funding_amount {
        points.push(format!(
            "Raising {} ({} round)",
            amount,
            profile.funding_stage.display_name()
        ));
    }
    points
}

fn build_slide(profile: &BusinessProfile, insights: &InsightSet, slide_type: SlideType) -> SlideOutline {
    let mut slide = SlideOutline::new(slide_type, slide_type.default_title());

    let points = match slide_type {
        SlideType::Ask => ask_points(profile),
        _ => collect_points(insights, key_point_sources(slide_type)),
    };
    let statistics: Vec<String> = statistic_source(slide_type)
        .map(|category| {
            insights
                .get(category)
                .iter()
                .filter(|s| has_digit(s))
                .take(MAX_STATISTICS)
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    if slide_type == SlideType::Title {
        slide.title = profile.company_name.clone();
        slide.subtitle = Some(deck_subtitle(profile));
        slide.key_points = vec![format!(
            "{} · {}",
            profile.industry,
            profile.funding_stage.display_name()
        )];
    } else {
        let (mut key_points, notes) = split_overflow(points);
        if key_points.is_empty() && statistics.is_empty() {
            key_points.push(placeholder_prompt(
                slide_type,
                &profile.company_name,
                &profile.industry,
            ));
        }
        slide.key_points = key_points;
        slide.speaker_notes = notes;
    }

    slide.statistics = statistics;
    slide.suggested_visuals = suggested_visuals(slide_type)
        .iter()
        .map(|tag| tag.to_string())
        .collect();
    slide
}

fn deck_subtitle(profile: &BusinessProfile) -> String {
    profile.description.clone().unwrap_or_else(|| {
        format!(
            "A {} company in {}",
            profile.business_type.display_name(),
            profile.industry
        )
    })
}

fn is_covered(topic: &str, slides: &[SlideOutline]) -> bool {
    slides
        .iter()
        .any(|slide| covers_topic(slide.slide_type, &slide.title, topic))
}

fn custom_slide(profile: &BusinessProfile, insights: &InsightSet, topic: &str) -> SlideOutline {
    let mut slide = SlideOutline::new(SlideType::Custom, topic);
    let (mut key_points, notes) = split_overflow(insights.topic(topic).to_vec());
    if key_points.is_empty() {
        key_points.push(placeholder_prompt(
            SlideType::Custom,
            &profile.company_name,
            topic,
        ));
    }
    slide.key_points = key_points;
    slide.speaker_notes = notes;
    slide
}

fn executive_summary(profile: &BusinessProfile, insights: &InsightSet) -> String {
    let lines: Vec<&str> = [
        InsightCategory::ProblemStatement,
        InsightCategory::Solution,
        InsightCategory::MarketSize,
        InsightCategory::Traction,
    ]
    .iter()
    .filter_map(|category| insights.get(*category).first().map(String::as_str))
    .collect();

    if lines.is_empty() {
        format!(
            "{} is building a {} business in {}.",
            profile.company_name,
            profile.business_type.display_name(),
            profile.industry
        )
    } else {
        lines.join(" ")
    }
}

fn company_overview(profile: &BusinessProfile) -> String {
    let mut overview = format!(
        "{} is a {}-stage {} company in the {} industry.",
        profile.company_name,
        profile.funding_stage.display_name(),
        profile.business_type.display_name(),
        profile.industry
    );
    if let Some(size) = profile.financials.team_size {
        overview.push_str(&format!(" The team has {} people.", size));
    }
    if let Some(description) = &profile.description {
        overview.push(' ');
        overview.push_str(description);
    }
    overview
}

/// 构建演示文稿大纲
pub fn build_outline(profile: &BusinessProfile, insights: &InsightSet) -> PitchDeckOutline {
    let template = narrative_template(
        profile.target_audience,
        profile.funding_stage,
        profile.business_type,
    );
    let mut slides: Vec<SlideOutline> = template
        .iter()
        .map(|slide_type| build_slide(profile, insights, *slide_type))
        .collect();

    for topic in &profile.specific_topics {
        if !is_covered(topic, &slides) {
            slides.push(custom_slide(profile, insights, topic));
        }
    }

    let mut outline = PitchDeckOutline {
        title: format!("{} Pitch Deck", profile.company_name),
        subtitle: deck_subtitle(profile),
        executive_summary: executive_summary(profile, insights),
        company_overview: company_overview(profile),
        slides,
    };
    outline.renumber();
    outline
}

/// 执行大纲构建阶段
pub fn execute(profile: &BusinessProfile, insights: &InsightSet) -> PitchDeckOutline {
    let outline = build_outline(profile, insights);
    info!(
        "📝 大纲生成完成: {} 张幻灯片 (对象: {}, 阶段: {})",
        outline.slides.len(),
        profile.target_audience,
        profile.funding_stage
    );
    outline
}
