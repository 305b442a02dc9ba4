use async_trait::async_trait;
use chrono::Utc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use pitchdeck_rs::config::Config;
use pitchdeck_rs::errors::{PipelineError, ResearchFetchError, ValidationError};
use pitchdeck_rs::generator::context::GeneratorContext;
use pitchdeck_rs::generator::research::ResearchFetcher;
use pitchdeck_rs::types::block::{BlockType, VisualWeight};
use pitchdeck_rs::types::deck::{CompletePitchDeck, Degradation, ExportFormats};
use pitchdeck_rs::types::profile::{FundingStage, TargetAudience, Theme};
use pitchdeck_rs::types::research::ResearchSource;
use pitchdeck_rs::{GenerationRequest, generate};

const MARKET_TEXT: &str = "The technology market is worth $40 billion in 2024. \
    Analysts expect the market to reach $90 billion by 2030, growing 14% per year. \
    Customers struggle with fragmented tools and manual reporting. \
    Leading competitors include legacy vendors with slow release cycles.";

/// 返回固定文本的抓取器
struct StaticFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ResearchFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ResearchSource {
            url: url.to_string(),
            title: format!("Research for {}", url),
            content: MARKET_TEXT.to_string(),
            fetched_at: Utc::now(),
            latency_ms: 1,
            word_count: MARKET_TEXT.split_whitespace().count(),
            image_count: 0,
            link_count: 0,
        })
    }
}

/// 所有抓取都失败的抓取器
struct FailingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl ResearchFetcher for FailingFetcher {
    async fn fetch(&self, url: &str) -> Result<ResearchSource, ResearchFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ResearchFetchError::Status {
            url: url.to_string(),
            status: 503,
        })
    }
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.cache.enabled = false;
    config
}

fn static_context() -> (GeneratorContext, Arc<StaticFetcher>) {
    let fetcher = Arc::new(StaticFetcher {
        calls: AtomicUsize::new(0),
    });
    let context = GeneratorContext::with_fetcher(test_config(), fetcher.clone());
    (context, fetcher)
}

fn failing_context() -> (GeneratorContext, Arc<FailingFetcher>) {
    let fetcher = Arc::new(FailingFetcher {
        calls: AtomicUsize::new(0),
    });
    let context = GeneratorContext::with_fetcher(test_config(), fetcher.clone());
    (context, fetcher)
}

fn scenario_a_request() -> GenerationRequest {
    let mut request = GenerationRequest::new("Acme AI");
    request.industry = Some("technology".to_string());
    request.target_audience = Some("investors".to_string());
    request.funding_stage = Some("seed".to_string());
    request.research_depth = Some("basic".to_string());
    request.theme = Some("modern".to_string());
    request
}

fn assert_contiguous(deck: &CompletePitchDeck) {
    assert_eq!(deck.outline.slides.len(), deck.slides.len());
    for (index, (outline, slide)) in deck.outline.slides.iter().zip(&deck.slides).enumerate() {
        assert_eq!(outline.slide_number, index + 1);
        assert_eq!(slide.slide_number, index + 1);
    }
}

#[tokio::test]
async fn test_scenario_a_complete_deck() {
    let (context, fetcher) = static_context();
    let deck = generate(&context, &scenario_a_request()).await.unwrap();

    assert!(fetcher.calls.load(Ordering::SeqCst) <= 3);
    assert!(deck.metadata.research_source_count > 0);
    assert!(deck.slides.len() >= 5);
    assert_contiguous(&deck);

    assert!(!deck.export_formats.json.is_empty());
    assert!(!deck.export_formats.markdown.is_empty());
    assert!(!deck.export_formats.html.is_empty());
    assert!(deck.export_formats.powerpoint.is_none());

    let visual_blocks = deck
        .slides
        .iter()
        .flat_map(|slide| &slide.content_blocks)
        .filter(|block| matches!(block.block_type, BlockType::Image | BlockType::Chart))
        .count();
    let summary = &deck.visual_assets;
    assert_eq!(
        summary.total_images + summary.total_svgs + summary.total_charts,
        visual_blocks
    );
}

#[tokio::test]
async fn test_scenario_b_empty_company_name() {
    let (context, fetcher) = static_context();
    let mut request = scenario_a_request();
    request.company_name = Some(String::new());

    let result = generate(&context, &request).await;
    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::MissingField(
            "companyName"
        )))
    ));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_scenario_c_all_fetches_fail() {
    let (context, fetcher) = failing_context();
    let mut request = scenario_a_request();
    request.research_depth = Some("comprehensive".to_string());

    let deck = generate(&context, &request).await.unwrap();

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 8);
    assert_eq!(deck.metadata.research_source_count, 0);
    assert!(deck.outline.slides.len() >= 5);
    assert_contiguous(&deck);
    assert!(deck.metadata.quality_degraded);
    assert_eq!(
        deck.metadata
            .degradations
            .iter()
            .filter(|d| matches!(d, Degradation::ResearchFetchFailed { .. }))
            .count(),
        8
    );
}

#[tokio::test]
async fn test_scenario_d_unknown_theme() {
    let (context, fetcher) = static_context();
    let mut request = scenario_a_request();
    request.theme = Some("retro".to_string());

    let result = generate(&context, &request).await;
    assert!(matches!(
        result,
        Err(PipelineError::Validation(ValidationError::UnknownTheme(_)))
    ));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_json_export_round_trip() {
    let (context, _fetcher) = static_context();
    let deck = generate(&context, &scenario_a_request()).await.unwrap();

    let parsed = CompletePitchDeck::from_json(&deck.export_formats.json).unwrap();
    let mut expected = deck.clone();
    expected.export_formats = ExportFormats::default();

    assert_eq!(parsed, expected);
    assert!(parsed.shares_design_tokens());
}

#[tokio::test]
async fn test_visual_density_and_token_identity() {
    let (context, _fetcher) = static_context();
    let deck = generate(&context, &scenario_a_request()).await.unwrap();

    assert!(deck.shares_design_tokens());
    for slide in &deck.slides {
        let density = slide.metadata.visual_density;
        assert!((0.0..=1.0).contains(&density));

        let weighted = slide
            .content_blocks
            .iter()
            .filter(|b| b.metadata.visual_weight != VisualWeight::Light)
            .count();
        assert_eq!(
            density,
            weighted as f64 / slide.content_blocks.len() as f64
        );
        assert_eq!(slide.css_variables, deck.slides[0].css_variables);
    }
}

#[tokio::test]
async fn test_specific_topics_append_custom_slides() {
    let (context, _fetcher) = static_context();
    let mut request = scenario_a_request();
    request.specific_topics = vec!["Team".to_string(), "Partnerships".to_string()];

    let deck = generate(&context, &request).await.unwrap();
    let last = deck.outline.slides.last().unwrap();
    assert_eq!(last.title, "Partnerships");
    assert_contiguous(&deck);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_slide_numbers_are_contiguous(
        theme in proptest::sample::select(Theme::ALL.to_vec()),
        audience in proptest::sample::select(TargetAudience::ALL.to_vec()),
        stage in proptest::sample::select(FundingStage::ALL.to_vec()),
    ) {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let (context, _fetcher) = failing_context();
        let mut request = GenerationRequest::new("Acme AI");
        request.theme = Some(theme.to_string());
        request.target_audience = Some(audience.to_string());
        request.funding_stage = Some(stage.to_string());

        let deck = runtime.block_on(generate(&context, &request)).unwrap();

        prop_assert_eq!(deck.outline.slides.len(), deck.slides.len());
        prop_assert!(deck.slides.len() >= 5);
        for (index, slide) in deck.slides.iter().enumerate() {
            prop_assert_eq!(slide.slide_number, index + 1);
            prop_assert_eq!(deck.outline.slides[index].slide_number, index + 1);
        }
        prop_assert!(deck.shares_design_tokens());
    }
}
