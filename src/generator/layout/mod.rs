//! 版式分配：为每张幻灯片选择版式原型，并将大纲字段映射为内容块

use regex::Regex;
use std::sync::LazyLock;
use tracing::info;

use crate::types::block::{
    Alignment, AssetQuery, BlockContent, BlockStyle, BlockType, ChartData, ChartKind, ContentBlock,
    Priority, TableData,
};
use crate::types::layout::LayoutArchetype;
use crate::types::outline::{SlideOutline, SlideType};
use crate::types::profile::BusinessProfile;
use crate::utils::text::truncate_chars;

pub mod archetypes;

pub use archetypes::{ContentShape, archetype};

/// 图表标签的最大字符数
const CHART_LABEL_CHARS: usize = 32;

static NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\$|€|£)?\s?(\d+(?:,\d{3})*(?:\.\d+)?)\s*(%|billion|million|thousand|bn|[mbk]\b)?")
        .expect("valid number regex")
});

/// 分配结果：一张幻灯片的版式原型和内容块
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedSlide {
    pub slide_number: usize,
    pub shape: ContentShape,
    pub archetype: LayoutArchetype,
    pub blocks: Vec<ContentBlock>,
}

/// 判断主导内容形态；多个信号同时存在时，统计 > 视觉 > 要点 > 均衡
pub fn classify(outline: &SlideOutline) -> ContentShape {
    if !outline.statistics.is_empty() {
        ContentShape::StatisticsDominant
    } else if !outline.suggested_visuals.is_empty() {
        ContentShape::VisualForward
    } else if outline.key_points.len() >= 3 {
        ContentShape::BulletsDominant
    } else {
        ContentShape::Balanced
    }
}

/// 从统计描述中解析出第一个数值及其单位
pub fn parse_statistic(text: &str) -> Option<(f64, Option<String>)> {
    let captures = NUMBER_RE.captures(text)?;
    let value: f64 = captures.get(2)?.as_str().replace(',', "").parse().ok()?;
    let unit = match (captures.get(1), captures.get(3)) {
        (Some(currency), Some(scale)) => Some(format!("{}{}", currency.as_str(), scale.as_str().to_lowercase())),
        (Some(currency), None) => Some(currency.as_str().to_string()),
        (None, Some(scale)) => Some(scale.as_str().to_lowercase()),
        (None, None) => None,
    };
    Some((value, unit))
}

fn statistics_block(outline: &SlideOutline, must_show: bool) -> ContentBlock {
    let parsed: Vec<(String, f64, Option<String>)> = outline
        .statistics
        .iter()
        .filter_map(|stat| {
            parse_statistic(stat)
                .map(|(value, unit)| (truncate_chars(stat, CHART_LABEL_CHARS).to_string(), value, unit))
        })
        .collect();

    let priority = if must_show {
        Priority::MustShow
    } else {
        Priority::NiceToHave
    };

    if parsed.len() >= 2 {
        let chart_type = match outline.slide_type {
            SlideType::Traction | SlideType::Financials => ChartKind::Line,
            _ => ChartKind::Bar,
        };
        let chart = ChartData {
            chart_type,
            unit: parsed.iter().find_map(|(_, _, unit)| unit.clone()),
            labels: parsed.iter().map(|(label, _, _)| label.clone()).collect(),
            values: parsed.iter().map(|(_, value, _)| *value).collect(),
            caption: outline.title.clone(),
        };
        ContentBlock::new(
            "chart-1",
            BlockType::Chart,
            BlockContent::Chart(chart),
            priority,
            "visualize the supporting numbers",
        )
    } else {
        let table = TableData {
            headers: vec!["Key figures".to_string()],
            rows: outline
                .statistics
                .iter()
                .map(|stat| vec![stat.clone()])
                .collect(),
        };
        ContentBlock::new(
            "table-1",
            BlockType::Table,
            BlockContent::Table(table),
            priority,
            "list the supporting numbers",
        )
    }
}

fn visual_blocks(
    outline: &SlideOutline,
    profile: &BusinessProfile,
    max_visuals: usize,
) -> Vec<ContentBlock> {
    outline
        .suggested_visuals
        .iter()
        .take(max_visuals)
        .enumerate()
        .map(|(index, tag)| {
            if tag == "logo" {
                ContentBlock::new(
                    format!("logo-{}", index + 1),
                    BlockType::Logo,
                    BlockContent::Text(profile.company_name.clone()),
                    Priority::NiceToHave,
                    "brand mark",
                )
            } else {
                let query = AssetQuery {
                    query: format!("{} {}", profile.industry, tag.replace('-', " ")),
                    hint: tag.clone(),
                };
                ContentBlock::new(
                    format!("image-{}", index + 1),
                    BlockType::Image,
                    BlockContent::Pending(query),
                    Priority::NiceToHave,
                    format!("illustrate {}", outline.title.to_lowercase()),
                )
            }
        })
        .collect()
}

/// 将单张幻灯片大纲映射为内容块，映射规则是确定性的
pub fn build_blocks(
    outline: &SlideOutline,
    shape: ContentShape,
    profile: &BusinessProfile,
    max_visuals: usize,
) -> Vec<ContentBlock> {
    let mut blocks = vec![ContentBlock::new(
        "title-1",
        BlockType::Title,
        BlockContent::Text(outline.title.clone()),
        Priority::MustShow,
        "slide headline",
    )];

    if let Some(subtitle) = &outline.subtitle {
        blocks.push(ContentBlock::new(
            "subtitle-1",
            BlockType::Subtitle,
            BlockContent::Text(subtitle.clone()),
            Priority::NiceToHave,
            "supporting headline",
        ));
    }

    if !outline.key_points.is_empty() {
        blocks.push(ContentBlock::new(
            "bullets-1",
            BlockType::Bullets,
            BlockContent::List(outline.key_points.clone()),
            Priority::MustShow,
            "core message",
        ));
    }

    if !outline.statistics.is_empty() {
        blocks.push(statistics_block(
            outline,
            shape == ContentShape::StatisticsDominant,
        ));
    }

    blocks.extend(visual_blocks(outline, profile, max_visuals));

    // 封面的标题和副标题居中
    if outline.slide_type == SlideType::Title {
        let centered = BlockStyle {
            alignment: Some(Alignment::Center),
            ..BlockStyle::default()
        };
        blocks = blocks
            .into_iter()
            .map(|block| match block.block_type {
                BlockType::Title | BlockType::Subtitle => block.with_styling(centered.clone()),
                _ => block,
            })
            .collect();
    }

    if let Some(notes) = &outline.speaker_notes {
        blocks.push(ContentBlock::new(
            "notes-1",
            BlockType::Notes,
            BlockContent::Text(notes.clone()),
            Priority::NiceToHave,
            "speaker notes",
        ));
    }

    if outline.slide_type != SlideType::Title {
        blocks.push(ContentBlock::new(
            "footer-1",
            BlockType::Footer,
            BlockContent::Text(format!("{} · {}", profile.company_name, outline.slide_number)),
            Priority::NiceToHave,
            "deck footer",
        ));
    }

    blocks
}

/// 为全部幻灯片分配版式
pub fn assign(
    outlines: &[SlideOutline],
    profile: &BusinessProfile,
    max_visuals: usize,
) -> Vec<AssignedSlide> {
    outlines
        .iter()
        .map(|outline| {
            let shape = classify(outline);
            AssignedSlide {
                slide_number: outline.slide_number,
                shape,
                archetype: archetype(shape, profile.slide_aspect_ratio),
                blocks: build_blocks(outline, shape, profile, max_visuals),
            }
        })
        .collect()
}

/// 执行版式分配阶段
pub fn execute(
    outlines: &[SlideOutline],
    profile: &BusinessProfile,
    max_visuals: usize,
) -> Vec<AssignedSlide> {
    let slides = assign(outlines, profile, max_visuals);
    let blocks: usize = slides.iter().map(|s| s.blocks.len()).sum();
    info!("📐 版式分配完成: {} 张幻灯片, {} 个内容块", slides.len(), blocks);
    slides
}

#[cfg(test)]
mod tests;
