pub mod machine;
pub mod report;
pub mod state;

pub use machine::{Session, SessionEvent, transition};
pub use report::SessionReport;
pub use state::{DifficultyLevel, Feedback, Phase, PowerUp, SessionState};
