use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::types::block::{BlockContent, BlockType};
use crate::types::layout::SlideLayout;
use crate::types::outline::PitchDeckOutline;
use crate::types::profile::{AspectRatio, Theme};

/// 素材统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualAssetSummary {
    /// image 类型内容块数量
    pub total_images: usize,
    /// 以内联 SVG 呈现的 chart 内容块数量
    #[serde(rename = "totalSVGs")]
    pub total_svgs: usize,
    /// 未以 SVG 呈现的 chart 内容块数量（占位或原始数据）
    pub total_charts: usize,
    pub by_block_type: BTreeMap<BlockType, usize>,
}

impl VisualAssetSummary {
    pub fn from_slides(slides: &[SlideLayout]) -> Self {
        let mut summary = VisualAssetSummary::default();
        for block in slides.iter().flat_map(|slide| slide.content_blocks.iter()) {
            *summary.by_block_type.entry(block.block_type).or_insert(0) += 1;
            match (block.block_type, &block.content) {
                (BlockType::Image, _) => summary.total_images += 1,
                (BlockType::Chart, BlockContent::Svg(_)) => summary.total_svgs += 1,
                (BlockType::Chart, _) => summary.total_charts += 1,
                _ => {}
            }
        }
        summary
    }
}

/// 各种导出格式；未实现的格式保持为 None
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFormats {
    pub json: String,
    pub markdown: String,
    pub html: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub powerpoint: Option<String>,
}

impl ExportFormats {
    pub fn is_empty(&self) -> bool {
        self.json.is_empty()
            && self.markdown.is_empty()
            && self.html.is_empty()
            && self.powerpoint.is_none()
    }
}

/// 降级原因
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Degradation {
    ResearchFetchFailed { url: String, reason: String },
    AssetUnavailable { slide_number: usize, block_id: String, reason: String },
    DeadlineExceeded { stage: String },
    SparseInsights { covered_categories: usize },
}

/// 运行元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckMetadata {
    pub company_name: String,
    pub theme: Theme,
    pub aspect_ratio: AspectRatio,
    pub generated_at: DateTime<Utc>,
    pub research_source_count: usize,
    pub quality_degraded: bool,
    pub degradations: Vec<Degradation>,
    pub total_slides: usize,
    /// 秒
    pub total_read_time: u64,
    pub average_visual_density: f64,
    pub stage_timings_ms: BTreeMap<String, u64>,
}

/// 一次生成运行的根聚合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePitchDeck {
    pub outline: PitchDeckOutline,
    pub slides: Vec<SlideLayout>,
    pub visual_assets: VisualAssetSummary,
    pub metadata: DeckMetadata,
    #[serde(default, skip_serializing_if = "ExportFormats::is_empty")]
    pub export_formats: ExportFormats,
}

impl CompletePitchDeck {
    /// 从 JSON 导出恢复聚合，并让所有幻灯片重新共享同一份设计 token
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut deck: CompletePitchDeck = serde_json::from_str(json)?;
        deck.relink_design_tokens();
        Ok(deck)
    }

    pub fn relink_design_tokens(&mut self) {
        let Some(shared) = self.slides.first().map(|s| Arc::clone(&s.design_tokens)) else {
            return;
        };
        for slide in self.slides.iter_mut().skip(1) {
            slide.design_tokens = Arc::clone(&shared);
        }
    }

    pub fn shares_design_tokens(&self) -> bool {
        self.slides
            .windows(2)
            .all(|pair| Arc::ptr_eq(&pair[0].design_tokens, &pair[1].design_tokens))
    }
}
