//! 幻灯片合成：版式 + 内容块 + 设计 token -> 最终的幻灯片描述

use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::errors::PipelineError;
use crate::generator::layout::AssignedSlide;
use crate::types::block::{ContentBlock, VisualWeight};
use crate::types::layout::{Complexity, SlideLayout, SlideMetadata};
use crate::types::tokens::DesignTokens;

pub mod markup;

/// 阅读速度：每秒字符数
pub const READING_CHARS_PER_SECOND: usize = 15;

/// 预计阅读时间（秒），向上取整
pub fn estimated_read_time(blocks: &[ContentBlock]) -> u64 {
    let chars: usize = blocks.iter().map(|b| b.content.text_len()).sum();
    chars.div_ceil(READING_CHARS_PER_SECOND) as u64
}

pub fn complexity(blocks: &[ContentBlock]) -> Complexity {
    let heavy = blocks
        .iter()
        .filter(|b| b.metadata.visual_weight == VisualWeight::Heavy)
        .count();
    if blocks.len() >= 6 || heavy >= 2 {
        Complexity::Complex
    } else if blocks.len() <= 3 && heavy == 0 {
        Complexity::Simple
    } else {
        Complexity::Medium
    }
}

/// 中、重权重块占全部块的比例，范围 [0, 1]
pub fn visual_density(blocks: &[ContentBlock]) -> f64 {
    if blocks.is_empty() {
        return 0.0;
    }
    let weighted = blocks
        .iter()
        .filter(|b| b.metadata.visual_weight != VisualWeight::Light)
        .count();
    (weighted as f64 / blocks.len() as f64).clamp(0.0, 1.0)
}

fn check_invariants(slide: &AssignedSlide) -> Result<(), PipelineError> {
    if slide.blocks.is_empty() {
        return Err(PipelineError::invariant(
            slide.slide_number,
            "slide has no content blocks",
        ));
    }

    let mut ids = HashSet::new();
    for block in &slide.blocks {
        if !slide.archetype.supports(block.block_type) {
            return Err(PipelineError::invariant(
                slide.slide_number,
                format!(
                    "block {} of type {} has no region in layout {}",
                    block.id, block.block_type, slide.archetype.id
                ),
            ));
        }
        if block.metadata.visual_weight != block.block_type.visual_weight() {
            return Err(PipelineError::invariant(
                slide.slide_number,
                format!("block {} carries an inconsistent visual weight", block.id),
            ));
        }
        if !ids.insert(block.id.as_str()) {
            return Err(PipelineError::invariant(
                slide.slide_number,
                format!("duplicate block id {}", block.id),
            ));
        }
    }
    Ok(())
}

/// 合成单张幻灯片
pub fn compose_slide(
    slide: AssignedSlide,
    tokens: &Arc<DesignTokens>,
    css_variables: &str,
) -> Result<SlideLayout, PipelineError> {
    check_invariants(&slide)?;

    let metadata = SlideMetadata {
        estimated_read_time: estimated_read_time(&slide.blocks),
        complexity: complexity(&slide.blocks),
        visual_density: visual_density(&slide.blocks),
    };
    let markup = markup::render_slide(slide.slide_number, &slide.archetype, &slide.blocks)?;

    Ok(SlideLayout {
        slide_number: slide.slide_number,
        layout_id: slide.archetype.id,
        content_blocks: slide.blocks,
        design_tokens: Arc::clone(tokens),
        markup,
        css_variables: css_variables.to_string(),
        metadata,
    })
}

/// 执行合成阶段；所有幻灯片共享同一个 token 句柄
pub fn execute(
    slides: Vec<AssignedSlide>,
    tokens: &Arc<DesignTokens>,
) -> Result<Vec<SlideLayout>, PipelineError> {
    let css_variables = tokens.to_css_variables();
    let composed = slides
        .into_iter()
        .map(|slide| compose_slide(slide, tokens, &css_variables))
        .collect::<Result<Vec<_>, _>>()?;

    info!(
        "🧱 合成完成: {} 张幻灯片, 预计时长 {} 秒",
        composed.len(),
        total_read_time(&composed)
    );
    Ok(composed)
}

pub fn total_read_time(slides: &[SlideLayout]) -> u64 {
    slides.iter().map(|s| s.metadata.estimated_read_time).sum()
}

pub fn average_visual_density(slides: &[SlideLayout]) -> f64 {
    if slides.is_empty() {
        return 0.0;
    }
    slides.iter().map(|s| s.metadata.visual_density).sum::<f64>() / slides.len() as f64
}
