//! 模型服务商适配：每个服务商持有一个 rig 客户端，统一构建结构化提取器

use anyhow::Result;
use rig::client::CompletionClient;
use rig::extractor::Extractor;
use rig::providers::{anthropic, deepseek, moonshot, ollama, openai, openrouter};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::{LLMConfig, LLMProvider};

/// 可由模型提取的结构化结果
pub trait Extractable:
    JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static
{
}

impl<T> Extractable for T where
    T: JsonSchema + for<'a> Deserialize<'a> + Serialize + Send + Sync + 'static
{
}

/// 单次提取使用的模型与提示词
pub struct ExtractionSettings<'a> {
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub max_tokens: u64,
}

macro_rules! build_extractor {
    ($client:expr, $builder:ident, $settings:expr) => {
        $client
            .$builder::<T>($settings.model)
            .preamble($settings.system_prompt)
            .max_tokens($settings.max_tokens)
            .build()
    };
}

/// 已连接的模型服务商
#[derive(Clone)]
pub enum ModelBackend {
    OpenAI(openai::Client),
    Moonshot(moonshot::Client),
    DeepSeek(deepseek::Client),
    OpenRouter(openrouter::Client),
    Anthropic(anthropic::Client),
    Ollama(ollama::Client),
}

impl ModelBackend {
    pub fn connect(config: &LLMConfig) -> Result<Self> {
        let key = config.api_key.as_str();
        let base_url = config.api_base_url.as_str();
        let backend = match config.provider {
            LLMProvider::OpenAI => {
                Self::OpenAI(openai::Client::builder(key).base_url(base_url).build())
            }
            LLMProvider::Moonshot => {
                Self::Moonshot(moonshot::Client::builder(key).base_url(base_url).build())
            }
            LLMProvider::DeepSeek => {
                Self::DeepSeek(deepseek::Client::builder(key).base_url(base_url).build())
            }
            // OpenRouter 与 Ollama 使用各自的默认地址
            LLMProvider::OpenRouter => Self::OpenRouter(openrouter::Client::builder(key).build()),
            LLMProvider::Anthropic => Self::Anthropic(anthropic::ClientBuilder::new(key).build()?),
            LLMProvider::Ollama => Self::Ollama(ollama::Client::builder().build()),
        };
        Ok(backend)
    }

    pub fn provider(&self) -> LLMProvider {
        match self {
            Self::OpenAI(_) => LLMProvider::OpenAI,
            Self::Moonshot(_) => LLMProvider::Moonshot,
            Self::DeepSeek(_) => LLMProvider::DeepSeek,
            Self::OpenRouter(_) => LLMProvider::OpenRouter,
            Self::Anthropic(_) => LLMProvider::Anthropic,
            Self::Ollama(_) => LLMProvider::Ollama,
        }
    }

    pub fn extractor<T: Extractable>(&self, settings: &ExtractionSettings<'_>) -> ModelExtractor<T> {
        match self {
            // OpenAI 走 chat completions 接口，兼容第三方网关
            Self::OpenAI(client) => {
                ModelExtractor::OpenAI(build_extractor!(client, extractor_completions_api, settings))
            }
            Self::Moonshot(client) => {
                ModelExtractor::Moonshot(build_extractor!(client, extractor, settings))
            }
            Self::DeepSeek(client) => {
                ModelExtractor::DeepSeek(build_extractor!(client, extractor, settings))
            }
            Self::OpenRouter(client) => {
                ModelExtractor::OpenRouter(build_extractor!(client, extractor, settings))
            }
            Self::Anthropic(client) => {
                ModelExtractor::Anthropic(build_extractor!(client, extractor, settings))
            }
            Self::Ollama(client) => {
                ModelExtractor::Ollama(build_extractor!(client, extractor, settings))
            }
        }
    }
}

/// 与 [`ModelBackend`] 一一对应的提取器
pub enum ModelExtractor<T: Extractable> {
    OpenAI(Extractor<openai::CompletionModel, T>),
    Moonshot(Extractor<moonshot::CompletionModel, T>),
    DeepSeek(Extractor<deepseek::CompletionModel, T>),
    OpenRouter(Extractor<openrouter::CompletionModel, T>),
    Anthropic(Extractor<anthropic::completion::CompletionModel, T>),
    Ollama(Extractor<ollama::CompletionModel<reqwest::Client>, T>),
}

impl<T: Extractable> ModelExtractor<T> {
    pub async fn extract(&self, prompt: &str) -> Result<T> {
        let extracted = match self {
            Self::OpenAI(extractor) => extractor.extract(prompt).await?,
            Self::Moonshot(extractor) => extractor.extract(prompt).await?,
            Self::DeepSeek(extractor) => extractor.extract(prompt).await?,
            Self::OpenRouter(extractor) => extractor.extract(prompt).await?,
            Self::Anthropic(extractor) => extractor.extract(prompt).await?,
            Self::Ollama(extractor) => extractor.extract(prompt).await?,
        };
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_follows_configured_provider() {
        let mut config = LLMConfig {
            api_key: "sk-test".to_string(),
            ..LLMConfig::default()
        };
        for provider in [LLMProvider::OpenAI, LLMProvider::DeepSeek, LLMProvider::Ollama] {
            config.provider = provider.clone();
            let backend = ModelBackend::connect(&config).unwrap();
            assert_eq!(backend.provider(), provider);
        }
    }
}
