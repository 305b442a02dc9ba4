//! 演示文稿持久化：以不透明记录的形式保存完整的演示文稿

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};
use uuid::Uuid;

use crate::generator::compose::{average_visual_density, total_read_time};
use crate::types::deck::{CompletePitchDeck, ExportFormats, VisualAssetSummary};
use crate::types::layout::SlideLayout;
use crate::types::outline::PitchDeckOutline;

/// 存储中的一条演示文稿记录，id 和时间戳由存储分配
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckRecord {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deck: CompletePitchDeck,
}

/// 列表视图
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub id: String,
    pub title: String,
    pub total_slides: usize,
    pub updated_at: DateTime<Utc>,
}

/// 局部更新，未设置的字段保持不变
#[derive(Debug, Clone, Default)]
pub struct DeckPatch {
    pub title: Option<String>,
    pub outline: Option<PitchDeckOutline>,
    pub slides: Option<Vec<SlideLayout>>,
    pub export_formats: Option<ExportFormats>,
}

impl DeckPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.outline.is_none()
            && self.slides.is_none()
            && self.export_formats.is_none()
    }

    /// 应用后大纲与幻灯片必须一一对应，且幻灯片从 1 开始连续编号
    fn check_consistency(&self, deck: &CompletePitchDeck) -> Result<()> {
        let outline_len = self
            .outline
            .as_ref()
            .map_or(deck.outline.slides.len(), |outline| outline.slides.len());
        let slides = self.slides.as_deref().unwrap_or(&deck.slides);
        if outline_len != slides.len() {
            bail!(
                "Patch leaves {} outline slides for {} composed slides",
                outline_len,
                slides.len()
            );
        }
        if let Some(position) = slides
            .iter()
            .enumerate()
            .position(|(index, slide)| slide.slide_number != index + 1)
        {
            bail!(
                "Patched slides are not numbered contiguously at position {}",
                position + 1
            );
        }
        Ok(())
    }

    fn apply(self, record: &mut DeckRecord) -> Result<()> {
        self.check_consistency(&record.deck)?;
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(outline) = self.outline {
            record.deck.outline = outline;
        }
        if let Some(slides) = self.slides {
            let deck = &mut record.deck;
            deck.slides = slides;
            deck.relink_design_tokens();
            deck.visual_assets = VisualAssetSummary::from_slides(&deck.slides);
            deck.metadata.total_slides = deck.slides.len();
            deck.metadata.total_read_time = total_read_time(&deck.slides);
            deck.metadata.average_visual_density = average_visual_density(&deck.slides);
        }
        if let Some(export_formats) = self.export_formats {
            record.deck.export_formats = export_formats;
        }
        Ok(())
    }
}

#[async_trait]
pub trait DeckStore: Send + Sync {
    async fn create(&self, deck: &CompletePitchDeck) -> Result<DeckRecord>;

    async fn read(&self, id: &str) -> Result<Option<DeckRecord>>;

    async fn update(&self, id: &str, patch: DeckPatch) -> Result<DeckRecord>;

    /// 记录不存在时返回 false
    async fn delete(&self, id: &str) -> Result<bool>;

    /// 按更新时间倒序
    async fn list(&self) -> Result<Vec<DeckSummary>>;
}

/// 每条记录一个 JSON 文件
pub struct FileDeckStore {
    store_dir: PathBuf,
}

impl FileDeckStore {
    pub fn new(store_dir: PathBuf) -> Self {
        Self { store_dir }
    }

    fn record_path(&self, id: &str) -> Result<PathBuf> {
        let id = Uuid::parse_str(id).with_context(|| format!("Invalid deck id: {}", id))?;
        Ok(self.store_dir.join(format!("{}.json", id)))
    }

    async fn write_record(&self, record: &DeckRecord) -> Result<()> {
        fs::create_dir_all(&self.store_dir).await.with_context(|| {
            format!("Failed to create store directory {}", self.store_dir.display())
        })?;
        let path = self.record_path(&record.id)?;
        let content = serde_json::to_string_pretty(record)?;
        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write deck record {}", path.display()))?;
        Ok(())
    }

    async fn load_record(path: &Path) -> Result<DeckRecord> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read deck record {}", path.display()))?;
        let mut record: DeckRecord = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse deck record {}", path.display()))?;
        record.deck.relink_design_tokens();
        Ok(record)
    }
}

#[async_trait]
impl DeckStore for FileDeckStore {
    async fn create(&self, deck: &CompletePitchDeck) -> Result<DeckRecord> {
        let now = Utc::now();
        let record = DeckRecord {
            id: Uuid::new_v4().to_string(),
            title: deck.outline.title.clone(),
            created_at: now,
            updated_at: now,
            deck: deck.clone(),
        };
        self.write_record(&record).await?;
        info!("🗄️ 新建演示文稿记录: {}", record.id);
        Ok(record)
    }

    async fn read(&self, id: &str) -> Result<Option<DeckRecord>> {
        let path = self.record_path(id)?;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        Self::load_record(&path).await.map(Some)
    }

    async fn update(&self, id: &str, patch: DeckPatch) -> Result<DeckRecord> {
        let Some(mut record) = self.read(id).await? else {
            bail!("Deck record not found: {}", id);
        };
        if patch.is_empty() {
            debug!("Empty patch for deck {}", id);
            return Ok(record);
        }
        patch
            .apply(&mut record)
            .with_context(|| format!("Rejected patch for deck {}", id))?;
        record.updated_at = Utc::now();
        self.write_record(&record).await?;
        info!("🗄️ 更新演示文稿记录: {}", record.id);
        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let path = self.record_path(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("🗑️ 删除演示文稿记录: {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to delete deck record {}", path.display()))
            }
        }
    }

    async fn list(&self) -> Result<Vec<DeckSummary>> {
        let mut entries = match fs::read_dir(&self.store_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to list store directory {}", self.store_dir.display())
                });
            }
        };

        let mut summaries = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let record = Self::load_record(&path).await?;
            summaries.push(DeckSummary {
                id: record.id,
                title: record.title,
                total_slides: record.deck.slides.len(),
                updated_at: record.updated_at,
            });
        }
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests;
