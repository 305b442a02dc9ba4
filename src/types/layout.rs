use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use crate::types::block::{BlockType, ContentBlock};
use crate::types::tokens::DesignTokens;

/// 版式中的区域名称
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RegionKind {
    Title,
    Body,
    Visual,
    Footer,
}

impl Display for RegionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionKind::Title => write!(f, "title"),
            RegionKind::Body => write!(f, "body"),
            RegionKind::Visual => write!(f, "visual"),
            RegionKind::Footer => write!(f, "footer"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleRegion {
    pub area: String,
    pub max_lines: u8,
    pub accepts: Vec<BlockType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyRegion {
    pub area: String,
    pub columns: u8,
    pub accepts: Vec<BlockType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualRegion {
    pub area: String,
    pub aspect_ratio: String,
    pub accepts: Vec<BlockType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterRegion {
    pub area: String,
    pub height: String,
    pub accepts: Vec<BlockType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutRegions {
    pub title: TitleRegion,
    pub body: BodyRegion,
    pub visual: VisualRegion,
    pub footer: FooterRegion,
}

impl LayoutRegions {
    /// 返回第一个可以容纳该类型的区域，按 title -> body -> visual -> footer 的顺序查找
    pub fn region_for(&self, block_type: BlockType) -> Option<RegionKind> {
        if self.title.accepts.contains(&block_type) {
            Some(RegionKind::Title)
        } else if self.body.accepts.contains(&block_type) {
            Some(RegionKind::Body)
        } else if self.visual.accepts.contains(&block_type) {
            Some(RegionKind::Visual)
        } else if self.footer.accepts.contains(&block_type) {
            Some(RegionKind::Footer)
        } else {
            None
        }
    }

    pub fn area(&self, region: RegionKind) -> &str {
        match region {
            RegionKind::Title => &self.title.area,
            RegionKind::Body => &self.body.area,
            RegionKind::Visual => &self.visual.area,
            RegionKind::Footer => &self.footer.area,
        }
    }
}

/// 版式原型：由四个命名区域组成的网格模板
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutArchetype {
    pub id: String,
    pub name: String,
    pub description: String,
    pub regions: LayoutRegions,
    /// CSS grid-template-areas 描述
    pub grid_template: String,
    pub grid_columns: String,
    pub usage: Vec<String>,
}

impl LayoutArchetype {
    pub fn supports(&self, block_type: BlockType) -> bool {
        self.regions.region_for(block_type).is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Complexity::Simple => write!(f, "simple"),
            Complexity::Medium => write!(f, "medium"),
            Complexity::Complex => write!(f, "complex"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideMetadata {
    /// 秒
    pub estimated_read_time: u64,
    pub complexity: Complexity,
    pub visual_density: f64,
}

/// 最终合成的幻灯片
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideLayout {
    pub slide_number: usize,
    pub layout_id: String,
    pub content_blocks: Vec<ContentBlock>,
    /// 整个演示文稿共享同一个句柄
    pub design_tokens: Arc<DesignTokens>,
    pub markup: String,
    pub css_variables: String,
    pub metadata: SlideMetadata,
}
