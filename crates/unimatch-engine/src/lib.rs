//! Admission scoring, fuzzy knowledge-base matching and major recommendation.
//!
//! - [`score_components`]: Logistic score of a student against one KB card
//! - [`BaselineModel`]: Card-less scorer used when no LLM is configured
//! - [`find_best_match`]: Resolve a free-text university/major pair to a KB entry
//! - [`recommend`]: Rank KB majors into preferred picks and alternatives

pub mod fuzzy;
mod matching;
mod recommend;
mod scoring;

pub use matching::{find_best_match, PAIR_MATCH_THRESHOLD};
pub use recommend::{recommend, Recommendation, RecommendParams, RecommendResult};
pub use scoring::{
    guess_program, program_matches, score_components, BaselineModel, Bonuses, Penalties,
    ScoreComponents, ScoredCard,
};
