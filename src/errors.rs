//! 生成流水线的错误分类

use thiserror::Error;

/// 请求校验错误，在任何流水线阶段运行之前抛出
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("unknown theme: {0} (expected one of modern, corporate, startup, creative)")]
    UnknownTheme(String),

    #[error("unknown aspect ratio: {0} (expected one of 16:9, 4:3, widescreen)")]
    UnknownAspectRatio(String),

    #[error("unknown value for {field}: {value}")]
    UnknownValue { field: &'static str, value: String },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// 单个调研来源的抓取失败，只在本地恢复
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResearchFetchError {
    #[error("fetch of {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("fetch of {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("fetch of {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("fetch of {url} skipped: generation deadline reached")]
    DeadlineExceeded { url: String },

    #[error("fetch of {url} returned no readable content")]
    EmptyContent { url: String },
}

impl ResearchFetchError {
    pub fn url(&self) -> &str {
        match self {
            ResearchFetchError::Timeout { url, .. }
            | ResearchFetchError::Status { url, .. }
            | ResearchFetchError::Transport { url, .. }
            | ResearchFetchError::DeadlineExceeded { url }
            | ResearchFetchError::EmptyContent { url } => url,
        }
    }
}

/// 单个内容块的素材解析失败，以占位符替代
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetResolutionError {
    #[error("no asset provider configured for {0}")]
    NotConfigured(String),

    #[error("asset search returned no results for query \"{0}\"")]
    NoResults(String),

    #[error("asset request failed: {0}")]
    Transport(String),

    #[error("asset resolution timed out after {0}ms")]
    Timeout(u64),

    #[error("asset resolution skipped: generation deadline reached")]
    DeadlineExceeded,

    #[error("block cannot be rendered as an asset: {0}")]
    Unsupported(String),

    #[error("chart rendering failed: {0}")]
    Render(String),
}

/// 运行级错误，调用方只会看到这一类错误
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("generation deadline exceeded before the outline was complete ({elapsed_ms}ms elapsed)")]
    PipelineTimeout { elapsed_ms: u64 },

    #[error("composition invariant violated on slide {slide_number}: {reason}")]
    CompositionInvariant { slide_number: usize, reason: String },

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl PipelineError {
    pub fn invariant(slide_number: usize, reason: impl Into<String>) -> Self {
        PipelineError::CompositionInvariant {
            slide_number,
            reason: reason.into(),
        }
    }
}
