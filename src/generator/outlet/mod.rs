use anyhow::{Context, Result};
use askama::Template;
use std::fmt::Display;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use crate::errors::{PipelineError, ValidationError};
use crate::generator::context::GeneratorContext;
use crate::types::block::{BlockContent, BlockType};
use crate::types::deck::{CompletePitchDeck, ExportFormats};

/// 导出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Html,
    Powerpoint,
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Html => write!(f, "html"),
            ExportFormat::Powerpoint => write!(f, "powerpoint"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "powerpoint" | "pptx" => Ok(ExportFormat::Powerpoint),
            _ => Err(ValidationError::UnknownValue {
                field: "exportFormat",
                value: s.to_string(),
            }),
        }
    }
}

/// 结构化 JSON，可由 [`CompletePitchDeck::from_json`] 无损还原
pub fn export_json(deck: &CompletePitchDeck) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(deck)
}

/// Markdown：每张幻灯片一个标题，要点渲染为列表，非文本块以占位引用代替
pub fn export_markdown(deck: &CompletePitchDeck) -> String {
    let mut sections = Vec::new();

    for slide in &deck.slides {
        let mut lines = Vec::new();
        let heading = if slide.slide_number == 1 { "#" } else { "##" };
        let title = slide
            .content_blocks
            .iter()
            .find(|b| b.block_type == BlockType::Title)
            .map(|b| b.content.describe())
            .unwrap_or_else(|| format!("Slide {}", slide.slide_number));
        lines.push(format!("{} {}", heading, title));

        for block in &slide.content_blocks {
            match (block.block_type, &block.content) {
                (BlockType::Title | BlockType::Footer, _) => {}
                (BlockType::Bullets, BlockContent::List(items)) => {
                    lines.push(String::new());
                    lines.extend(items.iter().map(|item| format!("- {}", item)));
                }
                (BlockType::Subtitle, BlockContent::Text(text)) => {
                    lines.push(String::new());
                    lines.push(format!("*{}*", text));
                }
                (BlockType::Quote, BlockContent::Text(text)) => {
                    lines.push(String::new());
                    lines.push(format!("> {}", text));
                }
                (BlockType::Notes, BlockContent::Text(text)) => {
                    lines.push(String::new());
                    lines.push(format!("Notes: {}", text.replace('\n', " ")));
                }
                (block_type, content) => {
                    lines.push(String::new());
                    lines.push(format!("[{}: {}]", block_type, content.describe()));
                }
            }
        }
        sections.push(lines.join("\n"));
    }

    let mut markdown = sections.join("\n\n");
    markdown.push('\n');
    markdown
}

#[derive(Template)]
#[template(path = "deck.html")]
struct DeckTemplate<'a> {
    title: &'a str,
    css_variables: String,
    width: u32,
    height: u32,
    slides: Vec<&'a str>,
}

/// HTML：单个样式表声明共享的 CSS 变量，随后依次输出每张幻灯片
pub fn export_html(deck: &CompletePitchDeck) -> Result<String, PipelineError> {
    let css_variables = deck
        .slides
        .first()
        .map(|slide| slide.design_tokens.to_css_variables())
        .unwrap_or_default();
    let (width, height) = deck.metadata.aspect_ratio.dimensions();

    let page = DeckTemplate {
        title: &deck.outline.title,
        css_variables,
        width,
        height,
        slides: deck.slides.iter().map(|slide| slide.markup.as_str()).collect(),
    };
    Ok(page.render()?)
}

/// 导出单个格式；未实现的格式返回 None
pub fn export_format(
    deck: &CompletePitchDeck,
    format: ExportFormat,
) -> Result<Option<String>, PipelineError> {
    let exported = match format {
        ExportFormat::Json => Some(export_json(deck)?),
        ExportFormat::Markdown => Some(export_markdown(deck)),
        ExportFormat::Html => Some(export_html(deck)?),
        ExportFormat::Powerpoint => None,
    };
    Ok(exported)
}

/// 执行导出阶段
pub fn execute(deck: &CompletePitchDeck) -> Result<ExportFormats, PipelineError> {
    let formats = ExportFormats {
        json: export_json(deck)?,
        markdown: export_markdown(deck),
        html: export_html(deck)?,
        powerpoint: export_format(deck, ExportFormat::Powerpoint)?,
    };
    info!(
        "📦 导出完成: json {} 字节, markdown {} 字节, html {} 字节",
        formats.json.len(),
        formats.markdown.len(),
        formats.html.len()
    );
    Ok(formats)
}

/// 保存演示文稿
pub async fn save(context: &GeneratorContext, deck: &CompletePitchDeck) -> Result<Vec<PathBuf>> {
    let outlet = DiskOutlet::new(context.config.output_path.clone());
    outlet.save(deck).await
}

pub trait Outlet {
    async fn save(&self, deck: &CompletePitchDeck) -> Result<Vec<PathBuf>>;
}

pub struct DiskOutlet {
    output_dir: PathBuf,
}

impl DiskOutlet {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }
}

impl Outlet for DiskOutlet {
    async fn save(&self, deck: &CompletePitchDeck) -> Result<Vec<PathBuf>> {
        info!("🖊️ 演示文稿存储中...");
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.output_dir.display())
        })?;

        let exports = &deck.export_formats;
        let files = [
            ("deck.json", exports.json.as_str()),
            ("deck.md", exports.markdown.as_str()),
            ("deck.html", exports.html.as_str()),
        ];

        let mut written = Vec::new();
        for (name, content) in files {
            if content.is_empty() {
                continue;
            }
            let path = self.output_dir.join(name);
            fs::write(&path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("💾 已保存: {}", path.display());
            written.push(path);
        }

        info!("💾 保存完成，输出目录: {}", self.output_dir.display());
        Ok(written)
    }
}

#[cfg(test)]
mod tests;
