pub mod adaptation;
pub mod advisor;
pub mod scoring;

pub use adaptation::{AdaptationBridge, AdaptationNotice, clamp_difficulty};
pub use advisor::{DifficultyAdvisor, HeuristicAdvisor, build_advisor};
