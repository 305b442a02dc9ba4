pub mod block;
pub mod deck;
pub mod insight;
pub mod layout;
pub mod outline;
pub mod profile;
pub mod research;
pub mod tokens;

pub use block::{BlockContent, BlockType, ContentBlock, Priority, VisualWeight};
pub use deck::{CompletePitchDeck, Degradation, DeckMetadata, ExportFormats, VisualAssetSummary};
pub use insight::{InsightCategory, InsightSet};
pub use layout::{LayoutArchetype, SlideLayout, SlideMetadata};
pub use outline::{PitchDeckOutline, SlideOutline, SlideType};
pub use profile::{BusinessProfile, GenerationRequest, Theme};
pub use research::ResearchSource;
pub use tokens::DesignTokens;
