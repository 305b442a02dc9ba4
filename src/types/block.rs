use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 素材无法解析时写入内容块的哨兵标记
pub const ASSET_UNAVAILABLE: &str = "asset unavailable";

/// 内容块类型（封闭集合）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Title,
    Subtitle,
    Bullets,
    Quote,
    Image,
    Chart,
    Table,
    Logo,
    Footer,
    Notes,
}

impl BlockType {
    /// 视觉权重由类型决定，后续 visualDensity 的计算依赖这一映射
    pub fn visual_weight(&self) -> VisualWeight {
        match self {
            BlockType::Image | BlockType::Chart => VisualWeight::Heavy,
            BlockType::Table => VisualWeight::Medium,
            BlockType::Title
            | BlockType::Subtitle
            | BlockType::Bullets
            | BlockType::Quote
            | BlockType::Logo
            | BlockType::Footer
            | BlockType::Notes => VisualWeight::Light,
        }
    }

    /// 需要经过素材解析的类型
    pub fn needs_asset(&self) -> bool {
        matches!(self, BlockType::Image | BlockType::Chart)
    }

    pub fn is_textual(&self) -> bool {
        matches!(
            self,
            BlockType::Title
                | BlockType::Subtitle
                | BlockType::Bullets
                | BlockType::Quote
                | BlockType::Footer
                | BlockType::Notes
        )
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BlockType::Title => "title",
            BlockType::Subtitle => "subtitle",
            BlockType::Bullets => "bullets",
            BlockType::Quote => "quote",
            BlockType::Image => "image",
            BlockType::Chart => "chart",
            BlockType::Table => "table",
            BlockType::Logo => "logo",
            BlockType::Footer => "footer",
            BlockType::Notes => "notes",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    MustShow,
    NiceToHave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualWeight {
    Light,
    Medium,
    Heavy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMetadata {
    pub priority: Priority,
    /// 字符数估计
    pub estimated_length: usize,
    pub visual_weight: VisualWeight,
    pub intent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Display for Alignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Alignment::Left => write!(f, "left"),
            Alignment::Center => write!(f, "center"),
            Alignment::Right => write!(f, "right"),
        }
    }
}

/// 可选的样式覆盖
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<Alignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChartKind::Bar => write!(f, "bar"),
            ChartKind::Line => write!(f, "line"),
            ChartKind::Pie => write!(f, "pie"),
        }
    }
}

/// 从统计数据中解析出的图表数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_type: ChartKind,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// 图片搜索结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSearchResult {
    pub url: String,
    pub title: String,
    pub source: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgStyle {
    pub fill: String,
    pub stroke: String,
    pub font_family: String,
}

/// 内联 SVG 元素
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SvgElement {
    pub svg_type: ChartKind,
    pub data: ChartData,
    pub style: SvgStyle,
    pub markup: String,
}

/// 待解析的素材请求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetQuery {
    pub query: String,
    /// 大纲中的视觉提示，例如 "market-map"
    pub hint: String,
}

/// 素材解析失败后的占位内容
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetPlaceholder {
    pub marker: String,
    pub reason: String,
    pub description: String,
}

impl AssetPlaceholder {
    pub fn new(reason: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            marker: ASSET_UNAVAILABLE.to_string(),
            reason: reason.into(),
            description: description.into(),
        }
    }
}

/// 内容块的载荷，形态取决于块类型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum BlockContent {
    Text(String),
    List(Vec<String>),
    Table(TableData),
    Chart(ChartData),
    Pending(AssetQuery),
    Image(ImageSearchResult),
    Svg(SvgElement),
    Unavailable(AssetPlaceholder),
}

impl BlockContent {
    /// 计入阅读时间的文本长度（字符数）
    pub fn text_len(&self) -> usize {
        match self {
            BlockContent::Text(text) => text.chars().count(),
            BlockContent::List(items) => items.iter().map(|i| i.chars().count()).sum(),
            BlockContent::Table(table) => table
                .headers
                .iter()
                .chain(table.rows.iter().flatten())
                .map(|cell| cell.chars().count())
                .sum(),
            BlockContent::Chart(chart) => chart.caption.chars().count(),
            BlockContent::Svg(svg) => svg.data.caption.chars().count(),
            BlockContent::Image(image) => image.title.chars().count(),
            BlockContent::Pending(_) | BlockContent::Unavailable(_) => 0,
        }
    }

    /// 供 Markdown 导出使用的纯文本描述
    pub fn describe(&self) -> String {
        match self {
            BlockContent::Text(text) => text.clone(),
            BlockContent::List(items) => items.join("; "),
            BlockContent::Table(table) => table.headers.join(" / "),
            BlockContent::Chart(chart) => chart.caption.clone(),
            BlockContent::Svg(svg) => svg.data.caption.clone(),
            BlockContent::Image(image) => image.title.clone(),
            BlockContent::Pending(query) => query.query.clone(),
            BlockContent::Unavailable(placeholder) => placeholder.description.clone(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, BlockContent::Unavailable(_))
    }
}

/// 幻灯片中可放置的最小单元
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    /// 在幻灯片内唯一
    pub id: String,
    #[serde(rename = "type")]
    pub block_type: BlockType,
    pub content: BlockContent,
    pub metadata: BlockMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styling: Option<BlockStyle>,
}

impl ContentBlock {
    pub fn new(
        id: impl Into<String>,
        block_type: BlockType,
        content: BlockContent,
        priority: Priority,
        intent: impl Into<String>,
    ) -> Self {
        let estimated_length = content.text_len();
        Self {
            id: id.into(),
            block_type,
            content,
            metadata: BlockMetadata {
                priority,
                estimated_length,
                visual_weight: block_type.visual_weight(),
                intent: intent.into(),
            },
            styling: None,
        }
    }

    pub fn with_styling(mut self, styling: BlockStyle) -> Self {
        self.styling = Some(styling);
        self
    }

    /// 替换内容并同步长度估计
    pub fn replace_content(&mut self, content: BlockContent) {
        self.metadata.estimated_length = content.text_len();
        self.content = content;
    }
}
