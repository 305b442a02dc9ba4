use crate::config::{Config, LLMProvider};
use crate::types::profile::GenerationRequest;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::warn;

/// pitchdeck-rs - 由Rust驱动的演示文稿生成引擎
#[derive(Parser, Debug)]
#[command(name = "pitchdeck-rs")]
#[command(
    about = "Pitch deck generation engine. It aggregates research about a business, extracts insights, builds a narrative outline and exports a themed deck as JSON, Markdown and HTML."
)]
#[command(version)]
pub struct Args {
    /// 配置文件路径
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// 生成请求文件（JSON 或 TOML）
    #[arg(short, long)]
    pub request: Option<PathBuf>,

    /// 输出路径
    #[arg(short, long)]
    pub output_path: Option<PathBuf>,

    /// 公司名称
    #[arg(short = 'n', long)]
    pub company_name: Option<String>,

    /// 行业
    #[arg(long)]
    pub industry: Option<String>,

    /// 演示对象 (investors, customers, partners, internal)
    #[arg(long)]
    pub target_audience: Option<String>,

    /// 融资阶段 (pre-seed, seed, series-a, series-b, growth)
    #[arg(long)]
    pub funding_stage: Option<String>,

    /// 商业类型 (b2b, b2c, marketplace, saas, hardware, other)
    #[arg(long)]
    pub business_type: Option<String>,

    /// 公司简介
    #[arg(long)]
    pub description: Option<String>,

    /// 要解决的问题
    #[arg(long)]
    pub problem_statement: Option<String>,

    /// 解决方案
    #[arg(long)]
    pub solution_description: Option<String>,

    /// 融资金额
    #[arg(long)]
    pub funding_amount: Option<String>,

    /// 营收
    #[arg(long)]
    pub revenue: Option<String>,

    /// 团队规模
    #[arg(long)]
    pub team_size: Option<u32>,

    /// 需要重点展示的话题，可重复
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// 调研深度 (basic, comprehensive, expert)
    #[arg(long)]
    pub research_depth: Option<String>,

    /// 主题 (modern, corporate, startup, creative)
    #[arg(short, long)]
    pub theme: Option<String>,

    /// 宽高比 (16:9, 4:3, widescreen)
    #[arg(long)]
    pub aspect_ratio: Option<String>,

    /// 额外的调研来源，可重复
    #[arg(long = "source-url")]
    pub source_urls: Vec<String>,

    /// 仅生成模板化的标准演示文稿，不做调研
    #[arg(long)]
    pub standard: bool,

    /// 生成完成后写入存储
    #[arg(long)]
    pub persist: bool,

    /// 是否启用详细日志
    #[arg(short, long)]
    pub verbose: bool,

    /// 是否禁用缓存
    #[arg(long)]
    pub no_cache: bool,

    /// 端到端截止时间（秒）
    #[arg(long)]
    pub deadline_seconds: Option<u64>,

    /// 调研并发上限
    #[arg(long)]
    pub max_parallels: Option<usize>,

    /// 图片搜索接口地址
    #[arg(long)]
    pub image_search_url: Option<String>,

    /// LLM Provider (openai, moonshot, deepseek, openrouter, anthropic, ollama)
    #[arg(long)]
    pub llm_provider: Option<String>,

    /// LLM API基地址
    #[arg(long)]
    pub llm_api_base_url: Option<String>,

    /// LLM API KEY
    #[arg(long)]
    pub llm_api_key: Option<String>,

    /// 高能效模型
    #[arg(long)]
    pub model_efficient: Option<String>,

    /// 高质量模型，作为efficient失效情况下的兜底
    #[arg(long)]
    pub model_powerful: Option<String>,
}

fn override_field(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = Some(value.clone());
    }
}

/// 从 JSON 或 TOML 文件读取生成请求，按扩展名判断格式
pub fn load_request(path: &Path) -> Result<GenerationRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read request file: {:?}", path))?;
    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let request = if is_toml {
        toml::from_str(&content).context("Failed to parse TOML request file")?
    } else {
        serde_json::from_str(&content).context("Failed to parse JSON request file")?
    };
    Ok(request)
}

/// 默认日志过滤指令，设置了 RUST_LOG 时以环境变量为准
pub fn log_directive(verbose: bool) -> &'static str {
    if verbose {
        "pitchdeck_rs=debug"
    } else {
        "pitchdeck_rs=info"
    }
}

impl Args {
    /// 将CLI参数转换为配置
    pub fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            // 显式指定的配置文件必须可读
            Some(config_path) => Config::from_file(config_path)?,
            None => {
                let default_config_path = std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join("pitchdeck.toml");
                if default_config_path.exists() {
                    Config::from_file(&default_config_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Some(output_path) = &self.output_path {
            config.output_path = output_path.clone();
        }

        // 覆盖LLM配置
        if let Some(provider_str) = &self.llm_provider {
            match provider_str.parse::<LLMProvider>() {
                Ok(provider) => config.llm.provider = provider,
                Err(e) => warn!("⚠️ 警告: {}，使用默认provider", e),
            }
        }
        if let Some(llm_api_base_url) = &self.llm_api_base_url {
            config.llm.api_base_url = llm_api_base_url.clone();
        }
        if let Some(llm_api_key) = &self.llm_api_key {
            config.llm.api_key = llm_api_key.clone();
        }
        if let Some(model_efficient) = &self.model_efficient {
            config.llm.model_efficient = model_efficient.clone();
        }
        if let Some(model_powerful) = &self.model_powerful {
            config.llm.model_powerful = model_powerful.clone();
        }

        if let Some(deadline_seconds) = self.deadline_seconds {
            config.generation.deadline_seconds = deadline_seconds;
        }
        if let Some(max_parallels) = self.max_parallels {
            config.research.max_parallels = max_parallels;
        }
        if let Some(image_search_url) = &self.image_search_url {
            config.assets.image_search_url = Some(image_search_url.clone());
        }

        // 缓存配置
        if self.no_cache {
            config.cache.enabled = false;
        }

        config.persist = config.persist || self.persist;
        config.verbose = config.verbose || self.verbose;

        Ok(config)
    }

    /// 组装生成请求：请求文件打底，命令行参数覆盖
    pub fn to_request(&self) -> Result<GenerationRequest> {
        let mut request = match &self.request {
            Some(path) => load_request(path)?,
            None => GenerationRequest::default(),
        };

        override_field(&mut request.company_name, &self.company_name);
        override_field(&mut request.industry, &self.industry);
        override_field(&mut request.target_audience, &self.target_audience);
        override_field(&mut request.funding_stage, &self.funding_stage);
        override_field(&mut request.business_type, &self.business_type);
        override_field(&mut request.description, &self.description);
        override_field(&mut request.problem_statement, &self.problem_statement);
        override_field(&mut request.solution_description, &self.solution_description);
        override_field(&mut request.funding_amount, &self.funding_amount);
        override_field(&mut request.revenue, &self.revenue);
        override_field(&mut request.research_depth, &self.research_depth);
        override_field(&mut request.theme, &self.theme);
        override_field(&mut request.slide_aspect_ratio, &self.aspect_ratio);

        if let Some(team_size) = self.team_size {
            request.team_size = Some(team_size);
        }
        request.specific_topics.extend(self.topics.iter().cloned());
        request.source_urls.extend(self.source_urls.iter().cloned());

        Ok(request)
    }
}
