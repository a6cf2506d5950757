use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{self, Registry};
use crate::model::{Answer, Category, CategoryId, Totals};
use crate::scoring::{ranked_totals_with, RankedCategory};

/// A completed quiz, in the shape it is persisted for the results view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub answers: Vec<Answer>,
    pub totals: Totals,
    /// Ids of the categories tied at the highest total.
    pub top_categories: Vec<CategoryId>,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    pub fn new(
        answers: Vec<Answer>,
        totals: Totals,
        top: &[&Category],
        completed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            answers,
            totals,
            top_categories: top.iter().map(|c| c.id.clone()).collect(),
            completed_at,
        }
    }

    pub fn matches(&self) -> Vec<&'static Category> {
        self.matches_in(catalog::categories())
    }

    /// Top category records; ids no longer in `registry` are skipped.
    pub fn matches_in<'a>(&self, registry: &'a Registry) -> Vec<&'a Category> {
        self.top_categories
            .iter()
            .filter_map(|id| registry.get(id))
            .collect()
    }

    pub fn ranked(&self) -> Vec<RankedCategory<'static>> {
        ranked_totals_with(catalog::categories(), &self.totals)
    }
}
