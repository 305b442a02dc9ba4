use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, warn};

use crate::cache::CacheManager;
use crate::config::Config;
use crate::generator::assets::{AssetResolver, StandardAssetResolver};
use crate::generator::research::{CachedResearchFetcher, HttpResearchFetcher, ResearchFetcher};
use crate::llm::client::LLMClient;

/// 一次生成运行共享的上下文：配置与外部协作者
#[derive(Clone)]
pub struct GeneratorContext {
    /// 配置
    pub config: Config,
    /// 调研抓取器
    pub fetcher: Arc<dyn ResearchFetcher>,
    /// 视觉素材解析器
    pub assets: Arc<dyn AssetResolver>,
}

impl GeneratorContext {
    /// 使用默认协作者创建上下文：带缓存的 HTTP 抓取器和标准素材解析器
    pub fn new(config: Config) -> Result<Self> {
        let http = HttpResearchFetcher::new(&config.research)?;
        let fetcher = CachedResearchFetcher::new(http, CacheManager::new(config.cache.clone()));
        let assets = Self::standard_assets(&config);

        Ok(Self {
            config,
            fetcher: Arc::new(fetcher),
            assets,
        })
    }

    /// 使用指定协作者创建上下文
    pub fn with_collaborators(
        config: Config,
        fetcher: Arc<dyn ResearchFetcher>,
        assets: Arc<dyn AssetResolver>,
    ) -> Self {
        Self {
            config,
            fetcher,
            assets,
        }
    }

    /// 替换调研抓取器，素材解析使用标准实现
    pub fn with_fetcher(config: Config, fetcher: Arc<dyn ResearchFetcher>) -> Self {
        let assets = Self::standard_assets(&config);
        Self::with_collaborators(config, fetcher, assets)
    }

    fn standard_assets(config: &Config) -> Arc<dyn AssetResolver> {
        let llm = if config.assets.refine_queries_with_llm && config.llm_available() {
            match LLMClient::new(config.llm.clone()) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!("⚠️ LLM客户端初始化失败，图片检索词不做优化: {}", e);
                    None
                }
            }
        } else {
            debug!("LLM query refinement disabled");
            None
        };
        Arc::new(StandardAssetResolver::new(config.assets.clone(), llm))
    }
}
