#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    use crate::generator::outlet::{
        DiskOutlet, ExportFormat, Outlet, execute, export_format, export_html, export_json,
        export_markdown,
    };
    use crate::generator::{compose, design, insight, layout, outline};
    use crate::types::deck::{CompletePitchDeck, DeckMetadata, ExportFormats, VisualAssetSummary};
    use crate::types::profile::GenerationRequest;

    fn create_test_deck() -> CompletePitchDeck {
        let mut request = GenerationRequest::new("Acme AI");
        request.problem_statement = Some("Teams lose hours to manual reporting.".to_string());
        let profile = request.validate().unwrap();

        let insights = insight::extract(&profile, &[], 5);
        let deck_outline = outline::build_outline(&profile, &insights);
        let tokens = design::execute(profile.theme);
        let assigned = layout::assign(&deck_outline.slides, &profile, 2);
        let slides = compose::execute(assigned, &tokens).unwrap();

        CompletePitchDeck {
            visual_assets: VisualAssetSummary::from_slides(&slides),
            metadata: DeckMetadata {
                company_name: profile.company_name.clone(),
                theme: profile.theme,
                aspect_ratio: profile.slide_aspect_ratio,
                generated_at: Utc::now(),
                research_source_count: 0,
                quality_degraded: false,
                degradations: vec![],
                total_slides: slides.len(),
                total_read_time: compose::total_read_time(&slides),
                average_visual_density: compose::average_visual_density(&slides),
                stage_timings_ms: BTreeMap::new(),
            },
            outline: deck_outline,
            slides,
            export_formats: ExportFormats::default(),
        }
    }

    #[test]
    fn test_json_round_trip_is_lossless() {
        let deck = create_test_deck();
        let json = export_json(&deck).unwrap();
        let parsed = CompletePitchDeck::from_json(&json).unwrap();

        assert_eq!(parsed, deck);
        assert!(parsed.shares_design_tokens());
    }

    #[test]
    fn test_markdown_headings_and_placeholders() {
        let deck = create_test_deck();
        let markdown = export_markdown(&deck);

        assert!(markdown.starts_with("# "));
        assert_eq!(
            markdown.lines().filter(|l| l.starts_with("## ")).count(),
            deck.slides.len() - 1
        );
        assert!(markdown.contains("\n- "));
        assert!(markdown.contains("[logo: Acme AI]"));
        assert!(!markdown.contains("Acme AI · 2"));
    }

    #[test]
    fn test_html_declares_tokens_once() {
        let deck = create_test_deck();
        let html = export_html(&deck).unwrap();

        assert_eq!(html.matches("<style>").count(), 1);
        assert_eq!(html.matches("--color-primary:").count(), 1);
        assert_eq!(
            html.matches("<section class=\"slide").count(),
            deck.slides.len()
        );
        assert!(html.contains("aspect-ratio:1920 / 1080"));
    }

    #[test]
    fn test_html_escapes_deck_title() {
        let mut deck = create_test_deck();
        deck.outline.title = "<script>alert(1)</script> & Co".to_string();
        let html = export_html(&deck).unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("<title>&lt;script&gt;alert(1)"));
        assert!(html.contains("&amp; Co</title>"));
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn test_unsupported_format_is_none() {
        let deck = create_test_deck();
        assert!(export_format(&deck, ExportFormat::Powerpoint).unwrap().is_none());
        assert!(export_format(&deck, ExportFormat::Markdown).unwrap().is_some());
        assert_eq!("pptx".parse::<ExportFormat>().unwrap(), ExportFormat::Powerpoint);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_execute_fills_required_formats() {
        let deck = create_test_deck();
        let formats = execute(&deck).unwrap();

        assert!(!formats.json.is_empty());
        assert!(!formats.markdown.is_empty());
        assert!(!formats.html.is_empty());
        assert!(formats.powerpoint.is_none());

        let value: serde_json::Value = serde_json::from_str(&formats.json).unwrap();
        assert!(value.get("exportFormats").is_none());
        assert!(value["outline"]["slides"].is_array());
    }

    #[tokio::test]
    async fn test_disk_outlet_writes_all_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut deck = create_test_deck();
        deck.export_formats = execute(&deck).unwrap();

        let outlet = DiskOutlet::new(temp_dir.path().join("out"));
        let written = outlet.save(&deck).await.unwrap();

        assert_eq!(written.len(), 3);
        let html = std::fs::read_to_string(temp_dir.path().join("out/deck.html")).unwrap();
        assert_eq!(html, deck.export_formats.html);
        assert!(temp_dir.path().join("out/deck.md").exists());
        assert!(temp_dir.path().join("out/deck.json").exists());
    }
}
