//! 标准演示文稿：仅依据业务画像和叙事模板生成，不做调研、版式分配或素材解析
//!
//! 标准演示文稿与 [`CompletePitchDeck`](crate::types::deck::CompletePitchDeck) 是两条独立的生命周期，
//! 不能升级为带版式的演示文稿。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ValidationError;
use crate::generator::outline::templates::{covers_topic, narrative_template, placeholder_prompt};
use crate::types::outline::SlideType;
use crate::types::profile::{AspectRatio, BusinessProfile, GenerationRequest, Theme};

/// 标准演示文稿中的一张幻灯片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardSlide {
    pub slide_number: usize,
    pub slide_type: SlideType,
    pub title: String,
    pub content: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandardPitchDeck {
    pub company_name: String,
    pub theme: Theme,
    pub aspect_ratio: AspectRatio,
    pub slides: Vec<StandardSlide>,
    pub created_at: DateTime<Utc>,
}

impl StandardPitchDeck {
    pub fn to_markdown(&self) -> String {
        let sections: Vec<String> = self
            .slides
            .iter()
            .map(|slide| {
                let heading = if slide.slide_number == 1 { "#" } else { "##" };
                let mut lines = vec![format!("{} {}", heading, slide.title), String::new()];
                lines.extend(slide.content.iter().map(|line| format!("- {}", line)));
                lines.join("\n")
            })
            .collect();
        format!("{}\n", sections.join("\n\n"))
    }
}

/// 业务画像中可直接填入该类型幻灯片的内容
fn profile_content(profile: &BusinessProfile, slide_type: SlideType) -> Vec<String> {
    let financials = &profile.financials;
    let lines: Vec<Option<String>> = match slide_type {
        SlideType::Title => vec![profile.description.clone()],
        SlideType::Problem => vec![profile.problem_statement.clone()],
        SlideType::Solution | SlideType::Product => vec![profile.solution_description.clone()],
        SlideType::Team => vec![
            financials
                .team_size
                .map(|size| format!("Team of {} people", size)),
        ],
        SlideType::Traction | SlideType::Financials => vec![
            financials
                .revenue
                .as_ref()
                .map(|revenue| format!("Revenue: {}", revenue)),
        ],
        SlideType::Ask => vec![financials.funding_amount.as_ref().map(|amount| {
            format!(
                "Raising {} ({} round)",
                amount,
                profile.funding_stage.display_name()
            )
        })],
        _ => vec![],
    };
    lines.into_iter().flatten().collect()
}

fn slide_content(profile: &BusinessProfile, slide_type: SlideType, topic: &str) -> Vec<String> {
    let content = profile_content(profile, slide_type);
    if content.is_empty() {
        vec![placeholder_prompt(slide_type, &profile.company_name, topic)]
    } else {
        content
    }
}

/// 根据业务画像构建标准演示文稿
pub fn build(profile: &BusinessProfile) -> StandardPitchDeck {
    let template = narrative_template(
        profile.target_audience,
        profile.funding_stage,
        profile.business_type,
    );

    let mut slides: Vec<StandardSlide> = template
        .iter()
        .map(|slide_type| StandardSlide {
            slide_number: 0,
            slide_type: *slide_type,
            title: match slide_type {
                SlideType::Title => profile.company_name.clone(),
                other => other.default_title().to_string(),
            },
            content: slide_content(profile, *slide_type, &profile.industry),
        })
        .collect();

    for topic in &profile.specific_topics {
        let covered = slides
            .iter()
            .any(|slide| covers_topic(slide.slide_type, &slide.title, topic));
        if !covered {
            slides.push(StandardSlide {
                slide_number: 0,
                slide_type: SlideType::Custom,
                title: topic.clone(),
                content: slide_content(profile, SlideType::Custom, topic),
            });
        }
    }

    for (index, slide) in slides.iter_mut().enumerate() {
        slide.slide_number = index + 1;
    }

    StandardPitchDeck {
        company_name: profile.company_name.clone(),
        theme: profile.theme,
        aspect_ratio: profile.slide_aspect_ratio,
        slides,
        created_at: Utc::now(),
    }
}

/// 校验请求并创建标准演示文稿
pub fn create(request: &GenerationRequest) -> Result<StandardPitchDeck, ValidationError> {
    let profile = request.validate()?;
    let deck = build(&profile);
    info!(
        "📄 标准演示文稿创建完成: {} 张幻灯片",
        deck.slides.len()
    );
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_deck_uses_profile_fields() {
        let mut request = GenerationRequest::new("Acme AI");
        request.problem_statement = Some("Reporting takes days".to_string());
        request.funding_amount = Some("$2M".to_string());

        let deck = create(&request).unwrap();
        assert_eq!(deck.slides[0].title, "Acme AI");

        let problem = deck
            .slides
            .iter()
            .find(|s| s.slide_type == SlideType::Problem)
            .unwrap();
        assert_eq!(problem.content, vec!["Reporting takes days".to_string()]);

        let ask = deck
            .slides
            .iter()
            .find(|s| s.slide_type == SlideType::Ask)
            .unwrap();
        assert!(ask.content[0].starts_with("Raising $2M"));
    }

    #[test]
    fn test_uncovered_topics_become_custom_slides() {
        let mut request = GenerationRequest::new("Acme AI");
        request.specific_topics = vec!["Team".to_string(), "Partnerships".to_string()];

        let deck = create(&request).unwrap();
        let last = deck.slides.last().unwrap();
        assert_eq!(last.slide_type, SlideType::Custom);
        assert_eq!(last.title, "Partnerships");
        assert_eq!(
            deck.slides
                .iter()
                .filter(|s| s.slide_type == SlideType::Custom)
                .count(),
            1
        );
        assert!(
            deck.slides
                .iter()
                .enumerate()
                .all(|(i, s)| s.slide_number == i + 1)
        );
    }

    #[test]
    fn test_invalid_request_is_rejected() {
        let mut request = GenerationRequest::new("Acme AI");
        request.slide_aspect_ratio = Some("21:9".to_string());
        assert!(matches!(
            create(&request),
            Err(ValidationError::UnknownAspectRatio(_))
        ));
    }

    #[test]
    fn test_markdown_lists_every_slide() {
        let deck = create(&GenerationRequest::new("Acme AI")).unwrap();
        let markdown = deck.to_markdown();
        assert!(markdown.starts_with("# Acme AI"));
        assert_eq!(
            markdown.lines().filter(|l| l.starts_with("## ")).count(),
            deck.slides.len() - 1
        );
    }
}
