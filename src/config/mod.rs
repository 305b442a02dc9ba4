use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

/// LLM Provider类型
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub enum LLMProvider {
    #[serde(rename = "openai")]
    #[default]
    OpenAI,
    #[serde(rename = "moonshot")]
    Moonshot,
    #[serde(rename = "deepseek")]
    DeepSeek,
    #[serde(rename = "openrouter")]
    OpenRouter,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "ollama")]
    Ollama,
}

impl std::fmt::Display for LLMProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMProvider::OpenAI => write!(f, "openai"),
            LLMProvider::Moonshot => write!(f, "moonshot"),
            LLMProvider::DeepSeek => write!(f, "deepseek"),
            LLMProvider::OpenRouter => write!(f, "openrouter"),
            LLMProvider::Anthropic => write!(f, "anthropic"),
            LLMProvider::Ollama => write!(f, "ollama"),
        }
    }
}

impl std::str::FromStr for LLMProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(LLMProvider::OpenAI),
            "moonshot" => Ok(LLMProvider::Moonshot),
            "deepseek" => Ok(LLMProvider::DeepSeek),
            "openrouter" => Ok(LLMProvider::OpenRouter),
            "anthropic" => Ok(LLMProvider::Anthropic),
            "ollama" => Ok(LLMProvider::Ollama),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

/// 应用程序配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct Config {
    /// 导出文件的输出路径
    pub output_path: PathBuf,

    /// 调研配置
    pub research: ResearchConfig,

    /// 生成流程配置
    pub generation: GenerationConfig,

    /// 视觉素材配置
    pub assets: AssetConfig,

    /// LLM模型配置
    pub llm: LLMConfig,

    /// 缓存配置
    pub cache: CacheConfig,

    /// 存储配置
    pub store: StoreConfig,

    /// 生成完成后是否写入存储
    pub persist: bool,

    /// 是否启用详细日志
    pub verbose: bool,
}

/// 调研抓取配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ResearchConfig {
    /// 并发抓取上限
    pub max_parallels: usize,

    /// 单个来源的抓取超时（秒）
    pub fetch_timeout_seconds: u64,

    /// 请求使用的 User-Agent
    pub user_agent: String,

    /// 单个来源保留的最大字符数
    pub max_content_chars: usize,

    /// 候选来源的 URL 模板，`{query}` 会被替换为编码后的查询词
    pub source_templates: Vec<String>,

    /// 总是参与抓取的额外来源
    pub extra_sources: Vec<String>,
}

/// 生成流程配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GenerationConfig {
    /// 端到端截止时间（秒）
    pub deadline_seconds: u64,

    /// 为大纲等同步阶段预留的时间（毫秒），调研抓取不会占用这段时间
    pub outline_reserve_ms: u64,

    /// 每个洞察分类保留的片段数量
    pub insights_per_category: usize,

    /// 每张幻灯片最多的图片数量
    pub max_visuals_per_slide: usize,
}

/// 视觉素材配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AssetConfig {
    /// 兼容 Unsplash 搜索接口的图片搜索地址，为空时图片块将使用占位符
    pub image_search_url: Option<String>,

    /// 图片搜索 API KEY
    pub image_search_api_key: String,

    /// 并发解析上限
    pub max_parallels: usize,

    /// 单个素材的解析超时（秒）
    pub timeout_seconds: u64,

    /// 是否使用LLM优化图片搜索关键词
    pub refine_queries_with_llm: bool,
}

/// LLM模型配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LLMConfig {
    /// LLM Provider类型
    pub provider: LLMProvider,

    /// LLM API KEY
    pub api_key: String,

    /// LLM API基地址
    pub api_base_url: String,

    /// 高能效模型，优先用于常规推理任务
    pub model_efficient: String,

    /// 高质量模型，作为efficient失效情况下的兜底
    pub model_powerful: String,

    /// 最大tokens
    pub max_tokens: u32,

    /// 重试次数
    pub retry_attempts: u32,

    /// 重试间隔（毫秒）
    pub retry_delay_ms: u64,

    /// 超时时间（秒）
    pub timeout_seconds: u64,
}

/// 缓存配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// 是否启用缓存
    pub enabled: bool,

    /// 缓存目录
    pub cache_dir: PathBuf,

    /// 缓存过期时间（小时）
    pub expire_hours: u64,
}

/// 存储配置
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    /// 演示文稿记录的存放目录
    pub store_dir: PathBuf,
}

impl Config {
    /// 从文件加载配置
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let mut file =
            File::open(path).context(format!("Failed to open config file: {:?}", path))?;
        let mut content = String::new();
        file.read_to_string(&mut content)
            .context("Failed to read config file")?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// LLM 是否可用（配置了 API KEY，或使用本地 Ollama）
    pub fn llm_available(&self) -> bool {
        !self.llm.api_key.trim().is_empty() || self.llm.provider == LLMProvider::Ollama
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("./pitchdeck.out"),
            research: ResearchConfig::default(),
            generation: GenerationConfig::default(),
            assets: AssetConfig::default(),
            llm: LLMConfig::default(),
            cache: CacheConfig::default(),
            store: StoreConfig::default(),
            persist: false,
            verbose: false,
        }
    }
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            max_parallels: 4,
            fetch_timeout_seconds: 10,
            user_agent: format!("pitchdeck-rs/{}", env!("CARGO_PKG_VERSION")),
            max_content_chars: 20_000,
            source_templates: vec![
                "https://en.wikipedia.org/w/index.php?search={query}".to_string(),
                "https://html.duckduckgo.com/html/?q={query}".to_string(),
                "https://www.bing.com/search?q={query}".to_string(),
                "https://news.google.com/search?q={query}".to_string(),
            ],
            extra_sources: vec![],
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            deadline_seconds: 120,
            outline_reserve_ms: 5_000,
            insights_per_category: 5,
            max_visuals_per_slide: 2,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            image_search_url: None,
            image_search_api_key: std::env::var("PITCHDECK_IMAGE_API_KEY").unwrap_or_default(),
            max_parallels: 4,
            timeout_seconds: 8,
            refine_queries_with_llm: false,
        }
    }
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::default(),
            api_key: std::env::var("PITCHDECK_LLM_API_KEY").unwrap_or_default(),
            api_base_url: String::from("https://api.openai.com/v1"),
            model_efficient: String::from("gpt-4o-mini"),
            model_powerful: String::from("gpt-4o"),
            max_tokens: 4096,
            retry_attempts: 3,
            retry_delay_ms: 2000,
            timeout_seconds: 60,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cache_dir: PathBuf::from(".pitchdeck/cache"),
            expire_hours: 168,
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            store_dir: PathBuf::from(".pitchdeck/decks"),
        }
    }
}
