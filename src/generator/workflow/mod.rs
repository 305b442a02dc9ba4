use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{AssetResolutionError, PipelineError};
use crate::generator::context::GeneratorContext;
use crate::generator::{assets, compose, design, insight, layout, outlet, outline, research};
use crate::store::{DeckStore, FileDeckStore};
use crate::types::deck::{
    CompletePitchDeck, DeckMetadata, Degradation, ExportFormats, VisualAssetSummary,
};
use crate::types::insight::InsightCategory;
use crate::types::profile::GenerationRequest;

/// 洞察覆盖的分类数低于该值时，演示文稿标记为降级
pub const SPARSE_INSIGHT_THRESHOLD: usize = 3;

/// 端到端截止时间
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    pub fn new(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.budget
    }

    /// 起点相同、预算减去 `reserve` 的截止时间
    pub fn shortened_by(&self, reserve: Duration) -> Self {
        Self {
            start: self.start,
            budget: self.budget.saturating_sub(reserve),
        }
    }
}

/// 时间跟踪作用域
pub struct TimingScope {
    start_time: Instant,
    phase_start_times: HashMap<&'static str, Instant>,
    phase_durations: BTreeMap<String, Duration>,
}

impl Default for TimingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl TimingScope {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            phase_start_times: HashMap::new(),
            phase_durations: BTreeMap::new(),
        }
    }

    /// 开始一个新的阶段计时
    pub fn start_phase(&mut self, phase_name: &'static str) {
        self.phase_start_times.insert(phase_name, Instant::now());
    }

    /// 结束一个阶段的计时
    pub fn end_phase(&mut self, phase_name: &'static str) -> Option<Duration> {
        let start_time = self.phase_start_times.remove(phase_name)?;
        let duration = start_time.elapsed();
        self.phase_durations.insert(phase_name.to_string(), duration);
        Some(duration)
    }

    /// 获取总执行时间
    pub fn get_total_duration(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// 各阶段耗时（毫秒），附带总耗时
    pub fn stage_timings_ms(&self) -> BTreeMap<String, u64> {
        let mut timings: BTreeMap<String, u64> = self
            .phase_durations
            .iter()
            .map(|(phase, duration)| (phase.clone(), duration.as_millis() as u64))
            .collect();
        timings.insert(
            TimingKeys::TOTAL_EXECUTION.to_string(),
            self.get_total_duration().as_millis() as u64,
        );
        timings
    }

    /// 获取格式化的执行时间报告
    pub fn generate_timing_report(&self) -> String {
        let mut report = format!(
            "总执行时间: {:.2}秒\n",
            self.get_total_duration().as_secs_f64()
        );

        if !self.phase_durations.is_empty() {
            report.push_str("\n各阶段执行时间:\n");
            for phase in TimingKeys::get_all_phase_keys() {
                if let Some(duration) = self.phase_durations.get(phase) {
                    report.push_str(&format!("- {}: {:.3}秒\n", phase, duration.as_secs_f64()));
                }
            }
        }

        report
    }
}

/// 时间跟踪常量
pub struct TimingKeys;

impl TimingKeys {
    pub const RESEARCH: &'static str = "research";
    pub const INSIGHT: &'static str = "insight";
    pub const OUTLINE: &'static str = "outline";
    pub const DESIGN: &'static str = "design";
    pub const LAYOUT: &'static str = "layout";
    pub const ASSETS: &'static str = "assets";
    pub const COMPOSE: &'static str = "compose";
    pub const EXPORT: &'static str = "export";
    pub const TOTAL_EXECUTION: &'static str = "total_execution";

    /// 获取所有阶段的键列表，按流水线顺序
    pub fn get_all_phase_keys() -> Vec<&'static str> {
        vec![
            Self::RESEARCH,
            Self::INSIGHT,
            Self::OUTLINE,
            Self::DESIGN,
            Self::LAYOUT,
            Self::ASSETS,
            Self::COMPOSE,
            Self::EXPORT,
        ]
    }
}

/// 运行生成流水线
///
/// 请求校验失败时不会执行任何阶段。大纲完成之前超时是致命错误；之后的失败只会
/// 以占位符和降级记录的形式体现在结果中。
pub async fn generate(
    context: &GeneratorContext,
    request: &GenerationRequest,
) -> Result<CompletePitchDeck, PipelineError> {
    let profile = request.validate()?;
    let deadline = Deadline::new(Duration::from_secs(
        context.config.generation.deadline_seconds,
    ));
    let mut timing = TimingScope::new();
    let mut degradations = Vec::new();

    info!(
        "🚀 开始生成演示文稿: {} (主题: {}, 受众: {}, 阶段: {})",
        profile.company_name,
        profile.theme,
        profile.target_audience,
        profile.funding_stage.display_name()
    );

    timing.start_phase(TimingKeys::RESEARCH);
    let research = research::execute(context, &profile, &deadline).await;
    timing.end_phase(TimingKeys::RESEARCH);
    if research.deadline_hit() {
        degradations.push(Degradation::DeadlineExceeded {
            stage: TimingKeys::RESEARCH.to_string(),
        });
    }
    degradations.extend(research.failures.iter().map(|failure| {
        Degradation::ResearchFetchFailed {
            url: failure.url().to_string(),
            reason: failure.to_string(),
        }
    }));

    timing.start_phase(TimingKeys::INSIGHT);
    let insights = insight::execute(context, &profile, &research.sources);
    timing.end_phase(TimingKeys::INSIGHT);
    let covered_categories = insights.covered_categories();
    if covered_categories < SPARSE_INSIGHT_THRESHOLD {
        warn!(
            "⚠️ 洞察较少: 仅 {}/{} 个分类有内容",
            covered_categories,
            InsightCategory::ALL.len()
        );
        degradations.push(Degradation::SparseInsights { covered_categories });
    }

    timing.start_phase(TimingKeys::OUTLINE);
    let deck_outline = outline::execute(&profile, &insights);
    timing.end_phase(TimingKeys::OUTLINE);

    if deadline.is_expired() {
        let elapsed_ms = deadline.elapsed().as_millis() as u64;
        warn!("❌ 大纲完成前已超过截止时间 ({}ms)", elapsed_ms);
        return Err(PipelineError::PipelineTimeout { elapsed_ms });
    }

    timing.start_phase(TimingKeys::DESIGN);
    let tokens = design::execute(profile.theme);
    timing.end_phase(TimingKeys::DESIGN);

    timing.start_phase(TimingKeys::LAYOUT);
    let mut assigned = layout::execute(
        &deck_outline.slides,
        &profile,
        context.config.generation.max_visuals_per_slide,
    );
    timing.end_phase(TimingKeys::LAYOUT);

    timing.start_phase(TimingKeys::ASSETS);
    let asset_degradations =
        assets::execute(context, &mut assigned, &profile, &tokens, &deadline).await;
    timing.end_phase(TimingKeys::ASSETS);
    let deadline_reason = AssetResolutionError::DeadlineExceeded.to_string();
    if asset_degradations.iter().any(|d| {
        matches!(d, Degradation::AssetUnavailable { reason, .. } if *reason == deadline_reason)
    }) {
        degradations.push(Degradation::DeadlineExceeded {
            stage: TimingKeys::ASSETS.to_string(),
        });
    }
    degradations.extend(asset_degradations);

    timing.start_phase(TimingKeys::COMPOSE);
    let slides = compose::execute(assigned, &tokens)?;
    timing.end_phase(TimingKeys::COMPOSE);

    let visual_assets = VisualAssetSummary::from_slides(&slides);
    let metadata = DeckMetadata {
        company_name: profile.company_name.clone(),
        theme: profile.theme,
        aspect_ratio: profile.slide_aspect_ratio,
        generated_at: Utc::now(),
        research_source_count: research.sources.len(),
        quality_degraded: !degradations.is_empty(),
        degradations,
        total_slides: slides.len(),
        total_read_time: compose::total_read_time(&slides),
        average_visual_density: compose::average_visual_density(&slides),
        stage_timings_ms: timing.stage_timings_ms(),
    };

    let mut deck = CompletePitchDeck {
        outline: deck_outline,
        slides,
        visual_assets,
        metadata,
        export_formats: ExportFormats::default(),
    };

    timing.start_phase(TimingKeys::EXPORT);
    deck.export_formats = outlet::execute(&deck)?;
    timing.end_phase(TimingKeys::EXPORT);

    if deck.metadata.quality_degraded {
        warn!(
            "⚠️ 演示文稿已生成，但有 {} 条降级记录",
            deck.metadata.degradations.len()
        );
    }
    info!(
        "🎉 演示文稿生成完成: {} 张幻灯片, {} 个调研来源\n{}",
        deck.metadata.total_slides,
        deck.metadata.research_source_count,
        timing.generate_timing_report()
    );

    Ok(deck)
}

/// 启动演示文稿生成工作流：生成、写入输出目录，并按配置持久化
pub async fn launch(config: &Config, request: &GenerationRequest) -> Result<CompletePitchDeck> {
    let context = GeneratorContext::new(config.clone())?;

    let deck = generate(&context, request).await?;
    outlet::save(&context, &deck).await?;

    if config.persist {
        let store = FileDeckStore::new(config.store.store_dir.clone());
        let record = store.create(&deck).await?;
        info!("🗄️ 演示文稿已持久化: {}", record.id);
    }

    Ok(deck)
}

// Include tests
#[cfg(test)]
mod tests;
