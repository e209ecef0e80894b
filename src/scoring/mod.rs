pub mod clock;
pub mod engine;
pub mod ranker;
pub mod rules;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::{calculate_score, ScoreResult};
pub use ranker::{rank, rank_with_clock};
pub use rules::Urgency;
