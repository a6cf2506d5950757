//! Lifestyle-matching quiz engine.
//!
//! The catalog is static and built once. Scoring is a pure function of the
//! answer list: [`tally_scores`] sums per-category weights and
//! [`top_categories`] returns every category tied at the highest total.
pub mod catalog;
pub mod error;
pub mod model;
pub mod results;
pub mod scoring;
pub mod session;

pub use catalog::{categories, category, question, questions, Registry};
pub use error::SessionError;
pub use model::{Answer, Category, CategoryId, Question, QuizOption, ScoreMap, Totals};
pub use results::QuizResult;
pub use scoring::{
    ranked_totals, ranked_totals_with, tally_scores, tally_scores_with, top_categories,
    top_categories_with, RankedCategory,
};
pub use session::{score_selections, QuizSession, SessionState, Step};
