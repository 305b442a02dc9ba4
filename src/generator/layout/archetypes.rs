//! 版式原型目录

use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::types::block::BlockType;
use crate::types::layout::{BodyRegion, FooterRegion, LayoutArchetype, LayoutRegions, TitleRegion, VisualRegion};
use crate::types::profile::AspectRatio;

/// 幻灯片的主导内容形态，决定选用哪个版式原型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentShape {
    StatisticsDominant,
    VisualForward,
    BulletsDominant,
    Balanced,
}

impl ContentShape {
    pub const ALL: [ContentShape; 4] = [
        ContentShape::StatisticsDominant,
        ContentShape::VisualForward,
        ContentShape::BulletsDominant,
        ContentShape::Balanced,
    ];

    pub fn layout_id(&self) -> &'static str {
        match self {
            ContentShape::StatisticsDominant => "data-focus",
            ContentShape::VisualForward => "visual-forward",
            ContentShape::BulletsDominant => "bullet-list",
            ContentShape::Balanced => "balanced",
        }
    }
}

impl Display for ContentShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentShape::StatisticsDominant => write!(f, "statistics-dominant"),
            ContentShape::VisualForward => write!(f, "visual-forward"),
            ContentShape::BulletsDominant => write!(f, "bullets-dominant"),
            ContentShape::Balanced => write!(f, "balanced"),
        }
    }
}

fn regions(visual: Vec<BlockType>, body_columns: u8, visual_ratio: &str) -> LayoutRegions {
    LayoutRegions {
        title: TitleRegion {
            area: "title".to_string(),
            max_lines: 2,
            accepts: vec![BlockType::Title, BlockType::Subtitle],
        },
        body: BodyRegion {
            area: "body".to_string(),
            columns: body_columns,
            accepts: vec![BlockType::Bullets, BlockType::Quote],
        },
        visual: VisualRegion {
            area: "visual".to_string(),
            aspect_ratio: visual_ratio.to_string(),
            accepts: visual,
        },
        footer: FooterRegion {
            area: "footer".to_string(),
            height: "8%".to_string(),
            accepts: vec![BlockType::Footer, BlockType::Notes],
        },
    }
}

/// 根据内容形态和画幅生成版式原型；窄画幅 (4:3) 时区域纵向堆叠
pub fn archetype(shape: ContentShape, aspect_ratio: AspectRatio) -> LayoutArchetype {
    let narrow = aspect_ratio.is_narrow();

    let (name, description, regions, wide_template, wide_columns, usage) = match shape {
        ContentShape::StatisticsDominant => (
            "Data Focus",
            "Chart or table beside a short supporting narrative",
            regions(
                vec![BlockType::Chart, BlockType::Table, BlockType::Image, BlockType::Logo],
                1,
                "4:3",
            ),
            "\"title title\" \"body visual\" \"footer footer\"",
            "2fr 3fr",
            vec!["market", "traction", "financials"],
        ),
        ContentShape::VisualForward => (
            "Visual Forward",
            "Large image with a compact caption column",
            regions(vec![BlockType::Image, BlockType::Logo], 1, "16:9"),
            "\"title visual\" \"body visual\" \"footer footer\"",
            "2fr 3fr",
            vec!["title", "product", "team", "solution"],
        ),
        ContentShape::BulletsDominant => (
            "Bullet List",
            "Full-width bullet list for text-heavy slides",
            regions(vec![BlockType::Logo], 2, "1:1"),
            "\"title title\" \"body body\" \"footer footer\"",
            "1fr 1fr",
            vec!["problem", "business-model", "risks", "roadmap"],
        ),
        ContentShape::Balanced => (
            "Balanced",
            "Text and an optional visual in equal columns",
            regions(vec![BlockType::Image, BlockType::Logo], 1, "1:1"),
            "\"title title\" \"body visual\" \"footer footer\"",
            "1fr 1fr",
            vec!["ask", "benefits", "custom"],
        ),
    };

    let (grid_template, grid_columns) = if narrow {
        (
            "\"title\" \"body\" \"visual\" \"footer\"".to_string(),
            "1fr".to_string(),
        )
    } else {
        (wide_template.to_string(), wide_columns.to_string())
    };

    LayoutArchetype {
        id: shape.layout_id().to_string(),
        name: name.to_string(),
        description: description.to_string(),
        regions,
        grid_template,
        grid_columns,
        usage: usage.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_archetype_has_text_regions() {
        for shape in ContentShape::ALL {
            let archetype = archetype(shape, AspectRatio::SixteenNine);
            assert!(archetype.supports(BlockType::Title));
            assert!(archetype.supports(BlockType::Bullets));
            assert!(archetype.supports(BlockType::Footer));
            assert!(archetype.supports(BlockType::Notes));
            assert_eq!(archetype.id, shape.layout_id());
        }
    }

    #[test]
    fn test_only_data_focus_accepts_charts() {
        assert!(archetype(ContentShape::StatisticsDominant, AspectRatio::SixteenNine)
            .supports(BlockType::Chart));
        assert!(!archetype(ContentShape::BulletsDominant, AspectRatio::SixteenNine)
            .supports(BlockType::Chart));
    }

    #[test]
    fn test_narrow_ratio_stacks_regions() {
        let wide = archetype(ContentShape::Balanced, AspectRatio::Widescreen);
        let narrow = archetype(ContentShape::Balanced, AspectRatio::FourThree);
        assert_eq!(narrow.grid_columns, "1fr");
        assert_ne!(wide.grid_template, narrow.grid_template);
    }
}
