#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::config::Config;
    use crate::errors::ResearchFetchError;
    use crate::generator::context::GeneratorContext;
    use crate::generator::research::{ResearchFetcher, execute, rank_sources};
    use crate::generator::workflow::Deadline;
    use crate::types::profile::GenerationRequest;
    use crate::types::research::ResearchSource;

    fn source(url: &str, content: &str) -> ResearchSource {
        ResearchSource {
            url: url.to_string(),
            title: url.to_string(),
            content: content.to_string(),
            fetched_at: Utc::now(),
            latency_ms: 0,
            word_count: content.split_whitespace().count(),
            image_count: 0,
            link_count: 0,
        }
    }

    /// 以 URL 中是否包含 "fail" / "slow" 决定行为
    struct ScriptedFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResearchFetcher for ScriptedFetcher {
        async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if url.contains("fail") {
                return Err(ResearchFetchError::Status {
                    url: url.to_string(),
                    status: 500,
                });
            }
            if url.contains("slow") {
                tokio::time::sleep(Duration::from_secs(5)).await;
            }
            Ok(source(url, "Acme AI builds technology for the technology market."))
        }
    }

    fn context_with(fetcher: Arc<ScriptedFetcher>, fetch_timeout_seconds: u64) -> GeneratorContext {
        let mut config = Config::default();
        config.research.source_templates = vec![];
        config.research.fetch_timeout_seconds = fetch_timeout_seconds;
        config.generation.outline_reserve_ms = 0;
        GeneratorContext::with_fetcher(config, fetcher)
    }

    #[tokio::test]
    async fn test_failed_sources_are_dropped_not_fatal() {
        let fetcher = Arc::new(ScriptedFetcher {
            calls: AtomicUsize::new(0),
        });
        let context = context_with(fetcher.clone(), 10);

        let mut request = GenerationRequest::new("Acme AI");
        request.source_urls = vec![
            "https://ok.test/a".to_string(),
            "https://fail.test/b".to_string(),
            "https://ok.test/c".to_string(),
        ];
        let profile = request.validate().unwrap();

        let outcome = execute(&context, &profile, &Deadline::new(Duration::from_secs(30))).await;

        assert_eq!(outcome.attempted, 3);
        assert_eq!(outcome.sources.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].url(), "https://fail.test/b");
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_slow_source_times_out_in_isolation() {
        let fetcher = Arc::new(ScriptedFetcher {
            calls: AtomicUsize::new(0),
        });
        let context = context_with(fetcher, 1);

        let mut request = GenerationRequest::new("Acme AI");
        request.source_urls = vec![
            "https://slow.test/a".to_string(),
            "https://ok.test/b".to_string(),
        ];
        let profile = request.validate().unwrap();

        let outcome = execute(&context, &profile, &Deadline::new(Duration::from_secs(30))).await;

        assert_eq!(outcome.sources.len(), 1);
        assert_eq!(outcome.sources[0].url, "https://ok.test/b");
        assert!(matches!(
            outcome.failures[0],
            ResearchFetchError::Timeout { .. }
        ));
    }

    #[tokio::test]
    async fn test_expired_deadline_skips_fetches() {
        let fetcher = Arc::new(ScriptedFetcher {
            calls: AtomicUsize::new(0),
        });
        let context = context_with(fetcher.clone(), 10);

        let mut request = GenerationRequest::new("Acme AI");
        request.source_urls = vec!["https://ok.test/a".to_string()];
        let profile = request.validate().unwrap();

        let outcome = execute(&context, &profile, &Deadline::new(Duration::ZERO)).await;

        assert!(outcome.sources.is_empty());
        assert!(outcome.deadline_hit());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_rank_prefers_relevant_then_longer() {
        let profile = GenerationRequest::new("Acme").validate().unwrap();
        let mut sources = vec![
            source("a", "nothing relevant here"),
            source("b", "acme acme"),
            source("c", "nothing relevant here at all"),
            source("d", "acme acme"),
        ];
        rank_sources(&profile, &mut sources);

        let order: Vec<_> = sources.iter().map(|s| s.url.as_str()).collect();
        assert_eq!(order, vec!["b", "d", "c", "a"]);
    }
}
