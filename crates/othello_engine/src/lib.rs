pub mod ai;
pub mod evaluation;
pub mod search;

pub use ai::{resolve_move, OthelloAI};
pub use evaluation::{evaluate_position, EvalWeights, FeatureWeights, Features, GamePhase};
pub use search::{minimax, search, search_until, SearchConfig, SearchResult, StopSignal};
