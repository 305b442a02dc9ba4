//! 调研来源抓取：HTTP 抓取器与带缓存的装饰器

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use regex::Regex;
use std::sync::LazyLock;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::cache::CacheManager;
use crate::config::ResearchConfig;
use crate::errors::ResearchFetchError;
use crate::generator::research::planner::canonicalize_url;
use crate::types::research::ResearchSource;
use crate::utils::text::truncate_chars;

/// 调研抓取协作者
#[async_trait]
pub trait ResearchFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError>;
}

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("valid title regex"));
static IMG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b").expect("valid img regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a\s[^>]*href").expect("valid link regex"));
static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|svg|head)\b.*?</(script|style|noscript|svg|head)>")
        .expect("valid noise regex")
});
static BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(p|div|br|li|h[1-6]|tr|section|article|header|footer)\b[^>]*>")
        .expect("valid block regex")
});
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));
static SPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").expect("valid space regex"));

/// 归一化后的文档
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedDocument {
    pub title: String,
    pub text: String,
    pub image_count: usize,
    pub link_count: usize,
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// 将 HTML 或纯文本归一化为逐行的纯文本
pub fn normalize_document(raw: &str, max_chars: usize) -> NormalizedDocument {
    let title = TITLE_RE
        .captures(raw)
        .and_then(|c| c.get(1))
        .map(|m| decode_entities(m.as_str().trim()))
        .unwrap_or_default();
    let image_count = IMG_RE.find_iter(raw).count();
    let link_count = LINK_RE.find_iter(raw).count();

    let stripped = NOISE_RE.replace_all(raw, " ");
    let stripped = BLOCK_RE.replace_all(&stripped, "\n");
    let stripped = TAG_RE.replace_all(&stripped, " ");
    let decoded = decode_entities(&stripped);

    let text = decoded
        .lines()
        .map(|line| SPACE_RE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    NormalizedDocument {
        title,
        text: truncate_chars(&text, max_chars).to_string(),
        image_count,
        link_count,
    }
}

/// 基于 reqwest 的抓取器
pub struct HttpResearchFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_content_chars: usize,
}

impl HttpResearchFetcher {
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.fetch_timeout_seconds);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            timeout,
            max_content_chars: config.max_content_chars,
        })
    }
}

#[async_trait]
impl ResearchFetcher for HttpResearchFetcher {
    async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
        let started = Instant::now();
        let transport = |e: reqwest::Error| {
            if e.is_timeout() {
                ResearchFetchError::Timeout {
                    url: url.to_string(),
                    timeout_ms: self.timeout.as_millis() as u64,
                }
            } else {
                ResearchFetchError::Transport {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        };

        let response = self.client.get(url).send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResearchFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await.map_err(transport)?;

        let document = normalize_document(&body, self.max_content_chars);
        if document.text.trim().is_empty() {
            return Err(ResearchFetchError::EmptyContent {
                url: url.to_string(),
            });
        }

        debug!("🌐 已抓取 {} ({} 字符)", url, document.text.len());
        Ok(ResearchSource {
            url: url.to_string(),
            title: if document.title.is_empty() {
                url.to_string()
            } else {
                document.title
            },
            word_count: document.text.split_whitespace().count(),
            content: document.text,
            fetched_at: Utc::now(),
            latency_ms: started.elapsed().as_millis() as u64,
            image_count: document.image_count,
            link_count: document.link_count,
        })
    }
}

/// 带磁盘缓存的抓取器，以规范化 URL 作为缓存键
pub struct CachedResearchFetcher<F> {
    inner: F,
    cache: CacheManager,
}

impl<F: ResearchFetcher> CachedResearchFetcher<F> {
    pub const CACHE_CATEGORY: &'static str = "research";

    pub fn new(inner: F, cache: CacheManager) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }
}

#[async_trait]
impl<F: ResearchFetcher> ResearchFetcher for CachedResearchFetcher<F> {
    async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
        let key = canonicalize_url(url);
        if let Some(source) = self
            .cache
            .get::<ResearchSource>(Self::CACHE_CATEGORY, &key)
            .await
        {
            return Ok(source);
        }

        let source = self.inner.fetch(url).await?;
        if let Err(e) = self
            .cache
            .set(Self::CACHE_CATEGORY, &key, &source)
            .await
        {
            warn!("⚠️ 调研缓存写入失败 {}: {}", url, e);
        }
        Ok(source)
    }
}
