pub mod assets;
pub mod compose;
pub mod context;
pub mod design;
pub mod insight;
pub mod layout;
pub mod outlet;
pub mod outline;
pub mod research;
pub mod standard;
pub mod workflow;
