#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::config::Config;
    use crate::errors::{PipelineError, ResearchFetchError, ValidationError};
    use crate::generator::context::GeneratorContext;
    use crate::generator::research::ResearchFetcher;
    use crate::generator::workflow::{Deadline, TimingKeys, TimingScope, generate};
    use crate::types::deck::Degradation;
    use crate::types::profile::GenerationRequest;
    use crate::types::research::ResearchSource;

    struct OfflineFetcher {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ResearchFetcher for OfflineFetcher {
        async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(ResearchFetchError::Transport {
                url: url.to_string(),
                reason: "offline".to_string(),
            })
        }
    }

    /// 每次抓取都远超调研截止时间
    struct StallingFetcher {
        delay: Duration,
    }

    #[async_trait]
    impl ResearchFetcher for StallingFetcher {
        async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
            tokio::time::sleep(self.delay).await;
            Err(ResearchFetchError::Transport {
                url: url.to_string(),
                reason: "stalled".to_string(),
            })
        }
    }

    fn create_test_context(config: Config) -> (GeneratorContext, Arc<OfflineFetcher>) {
        let fetcher = Arc::new(OfflineFetcher {
            calls: AtomicUsize::new(0),
        });
        let context = GeneratorContext::with_fetcher(config, fetcher.clone());
        (context, fetcher)
    }

    #[test]
    fn test_deadline_remaining_and_expiry() {
        let deadline = Deadline::new(Duration::from_secs(60));
        assert!(!deadline.is_expired());
        assert!(deadline.remaining() <= Duration::from_secs(60));

        let expired = Deadline::new(Duration::ZERO);
        assert!(expired.is_expired());
        assert_eq!(expired.remaining(), Duration::ZERO);
    }

    #[test]
    fn test_deadline_shortened_saturates() {
        let deadline = Deadline::new(Duration::from_secs(10));
        let shortened = deadline.shortened_by(Duration::from_secs(4));
        assert!(shortened.remaining() <= Duration::from_secs(6));
        assert!(!shortened.is_expired());

        let gone = deadline.shortened_by(Duration::from_secs(30));
        assert!(gone.is_expired());
    }

    #[test]
    fn test_timing_scope_records_phases() {
        let mut timing = TimingScope::new();
        timing.start_phase(TimingKeys::RESEARCH);
        assert!(timing.end_phase(TimingKeys::RESEARCH).is_some());
        assert!(timing.end_phase(TimingKeys::COMPOSE).is_none());

        let timings = timing.stage_timings_ms();
        assert!(timings.contains_key(TimingKeys::RESEARCH));
        assert!(timings.contains_key(TimingKeys::TOTAL_EXECUTION));
        assert!(!timings.contains_key(TimingKeys::COMPOSE));
        assert!(timing.generate_timing_report().contains("research"));
    }

    #[tokio::test]
    async fn test_validation_failure_runs_no_stage() {
        let (context, fetcher) = create_test_context(Config::default());
        let mut request = GenerationRequest::new("Acme AI");
        request.theme = Some("retro".to_string());

        let result = generate(&context, &request).await;
        assert!(matches!(
            result,
            Err(PipelineError::Validation(ValidationError::UnknownTheme(_)))
        ));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_offline_run_still_produces_degraded_deck() {
        let (context, fetcher) = create_test_context(Config::default());
        let request = GenerationRequest::new("Acme AI");

        let deck = generate(&context, &request).await.unwrap();

        assert!(fetcher.calls.load(Ordering::SeqCst) > 0);
        assert_eq!(deck.metadata.research_source_count, 0);
        assert!(deck.metadata.quality_degraded);
        assert!(
            deck.metadata
                .degradations
                .iter()
                .any(|d| matches!(d, Degradation::ResearchFetchFailed { .. }))
        );
        assert!(deck.slides.len() >= 5);
        assert_eq!(deck.slides.len(), deck.outline.slides.len());
        assert_eq!(deck.metadata.total_slides, deck.slides.len());
        assert!(!deck.export_formats.json.is_empty());
        assert!(!deck.export_formats.markdown.is_empty());
        assert!(!deck.export_formats.html.is_empty());
        assert!(deck.export_formats.powerpoint.is_none());
        assert!(
            deck.metadata
                .stage_timings_ms
                .contains_key(TimingKeys::COMPOSE)
        );
    }

    #[tokio::test]
    async fn test_deadline_before_outline_is_fatal() {
        let mut config = Config::default();
        config.generation.deadline_seconds = 0;
        let (context, _fetcher) = create_test_context(config);

        let result = generate(&context, &GenerationRequest::new("Acme AI")).await;
        assert!(matches!(result, Err(PipelineError::PipelineTimeout { .. })));
    }

    #[tokio::test]
    async fn test_research_deadline_still_yields_flagged_deck() {
        let mut config = Config::default();
        config.generation.deadline_seconds = 2;
        config.generation.outline_reserve_ms = 1_000;
        let fetcher = Arc::new(StallingFetcher {
            delay: Duration::from_secs(5),
        });
        let context = GeneratorContext::with_fetcher(config, fetcher);

        let started = std::time::Instant::now();
        let deck = generate(&context, &GenerationRequest::new("Acme AI"))
            .await
            .unwrap();

        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(deck.metadata.degradations.contains(&Degradation::DeadlineExceeded {
            stage: "research".to_string()
        }));
        assert!(deck.metadata.quality_degraded);
        assert_eq!(deck.metadata.research_source_count, 0);
        assert!(deck.slides.len() >= 5);
        assert_eq!(deck.slides.len(), deck.outline.slides.len());
        assert!(deck.outline.is_contiguous());
        assert!(
            deck.slides
                .iter()
                .enumerate()
                .all(|(i, s)| s.slide_number == i + 1)
        );
    }
}
