#[cfg(test)]
mod tests {
    use crate::generator::layout::{ContentShape, assign, build_blocks, classify, parse_statistic};
    use crate::types::block::{Alignment, BlockContent, BlockType, Priority, VisualWeight};
    use crate::types::outline::{SlideOutline, SlideType};
    use crate::types::profile::GenerationRequest;

    fn outline(key_points: usize, statistics: &[&str], visuals: &[&str]) -> SlideOutline {
        let mut slide = SlideOutline::new(SlideType::Market, "Market Opportunity");
        slide.slide_number = 3;
        slide.key_points = (0..key_points).map(|i| format!("Point {}", i)).collect();
        slide.statistics = statistics.iter().map(|s| s.to_string()).collect();
        slide.suggested_visuals = visuals.iter().map(|s| s.to_string()).collect();
        slide
    }

    #[test]
    fn test_classification_tie_break_order() {
        assert_eq!(
            classify(&outline(5, &["$4B market"], &["market-map"])),
            ContentShape::StatisticsDominant
        );
        assert_eq!(
            classify(&outline(5, &[], &["market-map"])),
            ContentShape::VisualForward
        );
        assert_eq!(classify(&outline(3, &[], &[])), ContentShape::BulletsDominant);
        assert_eq!(classify(&outline(2, &[], &[])), ContentShape::Balanced);
        assert_eq!(classify(&outline(0, &[], &[])), ContentShape::Balanced);
    }

    #[test]
    fn test_parse_statistic_units() {
        assert_eq!(
            parse_statistic("The market is worth $4.5 billion"),
            Some((4.5, Some("$billion".to_string())))
        );
        assert_eq!(
            parse_statistic("Grows 37% a year"),
            Some((37.0, Some("%".to_string())))
        );
        assert_eq!(
            parse_statistic("1,200 customers"),
            Some((1200.0, None))
        );
        assert_eq!(parse_statistic("no numbers here"), None);
    }

    #[test]
    fn test_two_numeric_statistics_become_a_chart() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let slide = outline(1, &["$4B TAM", "$1B SAM"], &[]);
        let blocks = build_blocks(&slide, classify(&slide), &profile, 2);

        let chart = blocks
            .iter()
            .find(|b| b.block_type == BlockType::Chart)
            .unwrap();
        assert_eq!(chart.metadata.priority, Priority::MustShow);
        assert_eq!(chart.metadata.visual_weight, VisualWeight::Heavy);
        match &chart.content {
            BlockContent::Chart(data) => assert_eq!(data.values, vec![4.0, 1.0]),
            other => panic!("unexpected content {:?}", other),
        }
    }

    #[test]
    fn test_single_statistic_becomes_a_table() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let slide = outline(1, &["$4B TAM"], &[]);
        let blocks = build_blocks(&slide, classify(&slide), &profile, 2);

        assert!(blocks.iter().any(|b| b.block_type == BlockType::Table));
        assert!(!blocks.iter().any(|b| b.block_type == BlockType::Chart));
    }

    #[test]
    fn test_block_mapping_and_priorities() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let mut slide = outline(2, &[], &["market-map", "logo", "team-photo"]);
        slide.speaker_notes = Some("extra context".to_string());
        let blocks = build_blocks(&slide, classify(&slide), &profile, 2);

        let types: Vec<BlockType> = blocks.iter().map(|b| b.block_type).collect();
        assert_eq!(
            types,
            vec![
                BlockType::Title,
                BlockType::Bullets,
                BlockType::Image,
                BlockType::Logo,
                BlockType::Notes,
                BlockType::Footer,
            ]
        );
        assert_eq!(blocks[0].metadata.priority, Priority::MustShow);
        assert_eq!(blocks[1].metadata.priority, Priority::MustShow);
        assert_eq!(blocks[2].metadata.priority, Priority::NiceToHave);
        assert!(matches!(blocks[2].content, BlockContent::Pending(_)));

        let mut ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), blocks.len());
    }

    #[test]
    fn test_empty_key_points_omit_bullets() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let slide = outline(0, &[], &[]);
        let blocks = build_blocks(&slide, classify(&slide), &profile, 2);
        assert!(!blocks.iter().any(|b| b.block_type == BlockType::Bullets));
        assert_eq!(blocks[0].block_type, BlockType::Title);
    }

    #[test]
    fn test_every_block_fits_its_archetype() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let mut title = SlideOutline::new(SlideType::Title, "Acme AI");
        title.slide_number = 1;
        title.subtitle = Some("AI for legal".to_string());
        title.suggested_visuals = vec!["logo".to_string()];
        let slides = vec![
            title,
            outline(4, &[], &[]),
            outline(1, &["$4B", "$2B"], &["market-map"]),
        ];

        for assigned in assign(&slides, &profile, 2) {
            for block in &assigned.blocks {
                assert!(
                    assigned.archetype.supports(block.block_type),
                    "{} not supported by {}",
                    block.block_type,
                    assigned.archetype.id
                );
            }
        }
    }

    #[test]
    fn test_cover_headline_is_centered() {
        let profile = GenerationRequest::new("Acme AI").validate().unwrap();
        let mut cover = SlideOutline::new(SlideType::Title, "Acme AI");
        cover.slide_number = 1;
        cover.subtitle = Some("AI for legal".to_string());
        let blocks = build_blocks(&cover, classify(&cover), &profile, 2);

        for block in &blocks {
            let alignment = block.styling.as_ref().and_then(|s| s.alignment);
            match block.block_type {
                BlockType::Title | BlockType::Subtitle => {
                    assert_eq!(alignment, Some(Alignment::Center))
                }
                _ => assert_eq!(alignment, None),
            }
        }

        let body = outline(2, &[], &[]);
        let blocks = build_blocks(&body, classify(&body), &profile, 2);
        assert!(blocks.iter().all(|b| b.styling.is_none()));
    }
}
