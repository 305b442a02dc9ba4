#[cfg(test)]
mod tests {
    use chrono::Utc;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    use crate::generator::{compose, design, insight, layout, outline};
    use crate::store::{DeckPatch, DeckStore, FileDeckStore};
    use crate::types::deck::{CompletePitchDeck, DeckMetadata, ExportFormats, VisualAssetSummary};
    use crate::types::profile::GenerationRequest;

    fn create_test_deck(company: &str) -> CompletePitchDeck {
        let profile = GenerationRequest::new(company).validate().unwrap();
        let insights = insight::extract(&profile, &[], 5);
        let deck_outline = outline::build_outline(&profile, &insights);
        let tokens = design::execute(profile.theme);
        let slides =
            compose::execute(layout::assign(&deck_outline.slides, &profile, 2), &tokens).unwrap();

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

    #[tokio::test]
    async fn test_create_then_read() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().join("decks"));
        let deck = create_test_deck("Acme AI");

        let record = store.create(&deck).await.unwrap();
        assert_eq!(record.title, "Acme AI Pitch Deck");
        assert_eq!(record.created_at, record.updated_at);

        let loaded = store.read(&record.id).await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert!(loaded.deck.shares_design_tokens());
    }

    #[tokio::test]
    async fn test_read_unknown_and_invalid_ids() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().to_path_buf());

        let missing = uuid::Uuid::new_v4().to_string();
        assert!(store.read(&missing).await.unwrap().is_none());
        assert!(store.read("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn test_partial_update_recomputes_statistics() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().to_path_buf());
        let deck = create_test_deck("Acme AI");
        let record = store.create(&deck).await.unwrap();

        let mut slides = deck.slides.clone();
        slides.truncate(2);
        let mut trimmed_outline = deck.outline.clone();
        trimmed_outline.slides.truncate(2);
        let patch = DeckPatch {
            title: Some("Board update".to_string()),
            outline: Some(trimmed_outline.clone()),
            slides: Some(slides),
            ..Default::default()
        };
        let updated = store.update(&record.id, patch).await.unwrap();

        assert_eq!(updated.title, "Board update");
        assert_eq!(updated.deck.slides.len(), 2);
        assert_eq!(updated.deck.metadata.total_slides, 2);
        assert_eq!(
            updated.deck.visual_assets,
            VisualAssetSummary::from_slides(&updated.deck.slides)
        );
        assert_eq!(updated.deck.outline, trimmed_outline);
        assert!(updated.updated_at >= record.updated_at);
    }

    #[tokio::test]
    async fn test_patch_that_breaks_outline_alignment_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().to_path_buf());
        let deck = create_test_deck("Acme AI");
        let record = store.create(&deck).await.unwrap();

        let mut slides = deck.slides.clone();
        slides.truncate(2);
        let slides_only = DeckPatch {
            slides: Some(slides),
            ..Default::default()
        };
        assert!(store.update(&record.id, slides_only).await.is_err());

        let mut outline = deck.outline.clone();
        outline.slides.pop();
        let outline_only = DeckPatch {
            outline: Some(outline),
            ..Default::default()
        };
        assert!(store.update(&record.id, outline_only).await.is_err());

        let mut reordered = deck.slides.clone();
        reordered.swap(0, 1);
        let misnumbered = DeckPatch {
            slides: Some(reordered),
            ..Default::default()
        };
        assert!(store.update(&record.id, misnumbered).await.is_err());

        // 被拒绝的补丁不落盘
        let stored = store.read(&record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().to_path_buf());
        let result = store
            .update(&uuid::Uuid::new_v4().to_string(), DeckPatch::default())
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDeckStore::new(temp_dir.path().join("decks"));
        assert!(store.list().await.unwrap().is_empty());

        let first = store.create(&create_test_deck("Acme AI")).await.unwrap();
        let second = store.create(&create_test_deck("Globex")).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|s| s.id == first.id));
        assert!(listed.iter().any(|s| s.title == "Globex Pitch Deck"));

        assert!(store.delete(&first.id).await.unwrap());
        assert!(!store.delete(&first.id).await.unwrap());

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, second.id);
    }
}
