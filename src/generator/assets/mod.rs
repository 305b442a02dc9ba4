//! 视觉素材解析：图片检索、本地 SVG 图表、失败时降级为占位符

use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AssetConfig;
use crate::errors::AssetResolutionError;
use crate::generator::context::GeneratorContext;
use crate::generator::layout::AssignedSlide;
use crate::generator::workflow::Deadline;
use crate::llm::client::LLMClient;
use crate::types::block::{AssetPlaceholder, AssetQuery, BlockContent, ImageSearchResult};
use crate::types::deck::Degradation;
use crate::types::profile::BusinessProfile;
use crate::types::tokens::DesignTokens;
use crate::utils::threads::do_parallel_with_limit;

pub mod svg;

/// 素材解析协作者：把待解析的内容块载荷转换为最终素材
#[async_trait]
pub trait AssetResolver: Send + Sync {
    async fn resolve(
        &self,
        content: &BlockContent,
        profile: &BusinessProfile,
        tokens: &DesignTokens,
    ) -> Result<BlockContent, AssetResolutionError>;
}

/// LLM 优化后的图片检索词
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ImageQuery {
    /// 2-5 个英文单词的图片检索词
    pub query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    urls: SearchUrls,
    #[serde(default)]
    alt_description: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    width: u32,
    #[serde(default)]
    height: u32,
    #[serde(default)]
    user: Option<SearchUser>,
}

#[derive(Debug, Deserialize)]
struct SearchUrls {
    regular: String,
}

#[derive(Debug, Deserialize)]
struct SearchUser {
    name: String,
}

/// 解析 Unsplash 兼容接口的返回结果，取第一条
pub fn parse_search_response(
    body: &str,
    query: &str,
    provider: &str,
) -> Result<ImageSearchResult, AssetResolutionError> {
    let response: SearchResponse = serde_json::from_str(body)
        .map_err(|e| AssetResolutionError::Transport(format!("invalid search response: {}", e)))?;
    let hit = response
        .results
        .into_iter()
        .next()
        .ok_or_else(|| AssetResolutionError::NoResults(query.to_string()))?;

    Ok(ImageSearchResult {
        url: hit.urls.regular,
        title: hit
            .alt_description
            .or(hit.description)
            .unwrap_or_else(|| query.to_string()),
        source: hit
            .user
            .map(|u| format!("{} / {}", u.name, provider))
            .unwrap_or_else(|| provider.to_string()),
        width: hit.width,
        height: hit.height,
    })
}

/// 默认的素材解析器
pub struct StandardAssetResolver {
    http: reqwest::Client,
    config: AssetConfig,
    llm: Option<LLMClient>,
}

impl StandardAssetResolver {
    pub fn new(config: AssetConfig, llm: Option<LLMClient>) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            llm,
        }
    }

    async fn refine_query(&self, query: &AssetQuery, profile: &BusinessProfile) -> String {
        let Some(llm) = self.llm.as_ref().filter(|_| self.config.refine_queries_with_llm) else {
            return query.query.clone();
        };

        let system_prompt = "You write short stock-photo search queries for presentation slides. \
                             Reply with a concrete 2-5 word English query, no brand names.";
        let user_prompt = format!(
            "Company: {}\nIndustry: {}\nVisual hint: {}\nDraft query: {}",
            profile.company_name, profile.industry, query.hint, query.query
        );
        match llm.extract::<ImageQuery>(system_prompt, &user_prompt).await {
            Ok(refined) if !refined.query.trim().is_empty() => {
                debug!("🪄 检索词优化: {} -> {}", query.query, refined.query);
                refined.query.trim().to_string()
            }
            Ok(_) => query.query.clone(),
            Err(e) => {
                warn!("⚠️ 检索词优化失败，使用原始检索词: {}", e);
                query.query.clone()
            }
        }
    }

    async fn search_image(&self, query: &str) -> Result<ImageSearchResult, AssetResolutionError> {
        let endpoint = self
            .config
            .image_search_url
            .as_deref()
            .ok_or_else(|| AssetResolutionError::NotConfigured("image search".to_string()))?;

        let mut request = self
            .http
            .get(endpoint)
            .query(&[("query", query), ("per_page", "1"), ("orientation", "landscape")]);
        if !self.config.image_search_api_key.is_empty() {
            request = request.header(
                "Authorization",
                format!("Client-ID {}", self.config.image_search_api_key),
            );
        }

        let response = request
            .send()
            .await
            .map_err(|e| AssetResolutionError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AssetResolutionError::Transport(format!(
                "image search returned HTTP {}",
                response.status().as_u16()
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| AssetResolutionError::Transport(e.to_string()))?;

        let provider = reqwest::Url::parse(endpoint)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| "image search".to_string());
        parse_search_response(&body, query, &provider)
    }
}

#[async_trait]
impl AssetResolver for StandardAssetResolver {
    async fn resolve(
        &self,
        content: &BlockContent,
        profile: &BusinessProfile,
        tokens: &DesignTokens,
    ) -> Result<BlockContent, AssetResolutionError> {
        match content {
            BlockContent::Chart(data) => svg::render_chart(data, tokens).map(BlockContent::Svg),
            BlockContent::Pending(query) => {
                if self.config.image_search_url.is_none() {
                    return Err(AssetResolutionError::NotConfigured("image search".to_string()));
                }
                let refined = self.refine_query(query, profile).await;
                self.search_image(&refined).await.map(BlockContent::Image)
            }
            other => Err(AssetResolutionError::Unsupported(format!(
                "\"{}\" is not an asset request",
                other.describe()
            ))),
        }
    }
}

async fn resolve_one(
    resolver: Arc<dyn AssetResolver>,
    content: &BlockContent,
    profile: &BusinessProfile,
    tokens: &DesignTokens,
    per_asset_timeout: Duration,
    deadline: Deadline,
) -> Result<BlockContent, AssetResolutionError> {
    if deadline.is_expired() {
        return Err(AssetResolutionError::DeadlineExceeded);
    }
    let timeout = per_asset_timeout.min(deadline.remaining());
    match tokio::time::timeout(timeout, resolver.resolve(content, profile, tokens)).await {
        Ok(result) => result,
        Err(_) if timeout < per_asset_timeout => Err(AssetResolutionError::DeadlineExceeded),
        Err(_) => Err(AssetResolutionError::Timeout(timeout.as_millis() as u64)),
    }
}

/// 执行素材解析阶段
///
/// 每个 image/chart 内容块独立解析，结果按下标写回。失败的块保留在原位，
/// 内容替换为占位符，并返回对应的降级记录。
pub async fn execute(
    context: &GeneratorContext,
    slides: &mut [AssignedSlide],
    profile: &BusinessProfile,
    tokens: &DesignTokens,
    deadline: &Deadline,
) -> Vec<Degradation> {
    let requests: Vec<(usize, usize, BlockContent)> = slides
        .iter()
        .enumerate()
        .flat_map(|(slide_index, slide)| {
            slide
                .blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| block.block_type.needs_asset())
                .map(move |(block_index, block)| (slide_index, block_index, block.content.clone()))
        })
        .collect();

    if requests.is_empty() {
        return Vec::new();
    }
    info!("🖼️ 解析 {} 个视觉素材", requests.len());

    let per_asset_timeout = Duration::from_secs(context.config.assets.timeout_seconds);
    let futures = requests
        .iter()
        .map(|(_, _, content)| {
            resolve_one(
                Arc::clone(&context.assets),
                content,
                profile,
                tokens,
                per_asset_timeout,
                *deadline,
            )
        })
        .collect::<Vec<_>>();
    let results = do_parallel_with_limit(futures, context.config.assets.max_parallels).await;

    let mut degradations = Vec::new();
    for ((slide_index, block_index, original), result) in requests.into_iter().zip(results) {
        let slide = &mut slides[slide_index];
        let block = &mut slide.blocks[block_index];
        match result {
            Ok(content) => block.replace_content(content),
            Err(e) => {
                warn!(
                    "⚠️ 幻灯片 {} 的素材 {} 解析失败: {}",
                    slide.slide_number, block.id, e
                );
                degradations.push(Degradation::AssetUnavailable {
                    slide_number: slide.slide_number,
                    block_id: block.id.clone(),
                    reason: e.to_string(),
                });
                block.replace_content(BlockContent::Unavailable(AssetPlaceholder::new(
                    e.to_string(),
                    original.describe(),
                )));
            }
        }
    }

    info!(
        "✅ 素材解析完成: {} 个成功, {} 个使用占位符",
        slides
            .iter()
            .flat_map(|s| s.blocks.iter())
            .filter(|b| b.block_type.needs_asset() && !b.content.is_unavailable())
            .count(),
        degradations.len()
    );
    degradations
}
