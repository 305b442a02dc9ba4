//! 幻灯片 HTML 片段渲染

use askama::Template;

use crate::types::block::{
    AssetPlaceholder, AssetQuery, BlockContent, BlockStyle, BlockType, ContentBlock,
    ImageSearchResult, TableData,
};
use crate::types::layout::{LayoutArchetype, RegionKind};

const REGIONS: [RegionKind; 4] = [
    RegionKind::Title,
    RegionKind::Body,
    RegionKind::Visual,
    RegionKind::Footer,
];

/// 块主体按内容形态分派，文本字段由模板负责转义
enum BlockBody<'a> {
    Heading(&'static str, &'a str),
    Subtitle(&'a str),
    Logo(&'a str),
    Footer(&'a str),
    Paragraph(&'a str),
    /// 已渲染的 Markdown
    Notes(String),
    Quote(String),
    List(&'a [String]),
    Table(&'a TableData),
    Chart(&'a str, Vec<(&'a str, f64)>),
    Svg(&'a str),
    Image(&'a ImageSearchResult),
    Pending(&'a AssetQuery),
    Unavailable(&'a AssetPlaceholder),
}

struct BlockView<'a> {
    block_type: BlockType,
    id: &'a str,
    style: Option<String>,
    body: BlockBody<'a>,
}

struct RegionView<'a> {
    name: RegionKind,
    area: &'a str,
    blocks: Vec<BlockView<'a>>,
}

#[derive(Template)]
#[template(path = "slide.html")]
struct SlideTemplate<'a> {
    slide_number: usize,
    layout_id: &'a str,
    grid_template: &'a str,
    grid_columns: &'a str,
    regions: Vec<RegionView<'a>>,
}

/// 样式覆盖转为内联 CSS 声明
pub fn style_declarations(styling: Option<&BlockStyle>) -> Option<String> {
    let styling = styling?;
    let mut declarations = Vec::new();
    if let Some(size) = &styling.font_size {
        declarations.push(format!("font-size:{}", size));
    }
    if let Some(color) = &styling.color {
        declarations.push(format!("color:{}", color));
    }
    if let Some(alignment) = styling.alignment {
        declarations.push(format!("text-align:{}", alignment));
    }
    (!declarations.is_empty()).then(|| declarations.join(";"))
}

fn text_body<'a>(block_type: BlockType, text: &'a str, slide_number: usize) -> BlockBody<'a> {
    match block_type {
        BlockType::Title if slide_number == 1 => BlockBody::Heading("h1", text),
        BlockType::Title => BlockBody::Heading("h2", text),
        BlockType::Subtitle => BlockBody::Subtitle(text),
        BlockType::Logo => BlockBody::Logo(text),
        BlockType::Footer => BlockBody::Footer(text),
        BlockType::Notes => BlockBody::Notes(markdown::to_html(text)),
        BlockType::Quote => BlockBody::Quote(markdown::to_html(text)),
        _ => BlockBody::Paragraph(text),
    }
}

fn block_body(block: &ContentBlock, slide_number: usize) -> BlockBody<'_> {
    match &block.content {
        BlockContent::Text(text) => text_body(block.block_type, text, slide_number),
        BlockContent::List(items) => BlockBody::List(items),
        BlockContent::Table(table) => BlockBody::Table(table),
        BlockContent::Chart(chart) => BlockBody::Chart(
            &chart.caption,
            chart
                .labels
                .iter()
                .map(String::as_str)
                .zip(chart.values.iter().copied())
                .collect(),
        ),
        BlockContent::Svg(svg) => BlockBody::Svg(&svg.markup),
        BlockContent::Image(image) => BlockBody::Image(image),
        BlockContent::Pending(query) => BlockBody::Pending(query),
        BlockContent::Unavailable(placeholder) => BlockBody::Unavailable(placeholder),
    }
}

/// 按版式区域渲染一张幻灯片；调用前需保证每个块都有可容纳的区域
pub fn render_slide(
    slide_number: usize,
    archetype: &LayoutArchetype,
    blocks: &[ContentBlock],
) -> Result<String, askama::Error> {
    let regions = REGIONS
        .into_iter()
        .map(|region| RegionView {
            name: region,
            area: archetype.regions.area(region),
            blocks: blocks
                .iter()
                .filter(|block| archetype.regions.region_for(block.block_type) == Some(region))
                .map(|block| BlockView {
                    block_type: block.block_type,
                    id: &block.id,
                    style: style_declarations(block.styling.as_ref()),
                    body: block_body(block, slide_number),
                })
                .collect(),
        })
        .filter(|region| !region.blocks.is_empty())
        .collect();

    SlideTemplate {
        slide_number,
        layout_id: &archetype.id,
        grid_template: &archetype.grid_template,
        grid_columns: &archetype.grid_columns,
        regions,
    }
    .render()
}
