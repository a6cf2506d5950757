use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

pub type CategoryId = String;

/// An adopter/pet-affinity profile the quiz can recommend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub description: String,
    pub highlights: Vec<String>,
    /// Filter name to filter value, used to pre-seed a pet search.
    pub suggested_filters: IndexMap<String, String>,
}

/// Sparse per-category weights carried by a quiz option.
///
/// Categories that are not listed score zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreMap(IndexMap<CategoryId, u32>);

impl ScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> u32 {
        self.0.get(category).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<CategoryId>> FromIterator<(K, u32)> for ScoreMap {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    /// Unique within its question.
    pub value: String,
    pub label: String,
    pub scores: ScoreMap,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub prompt: String,
    pub options: Vec<QuizOption>,
}

impl Question {
    pub fn option(&self, value: &str) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.value == value)
    }
}

/// A recorded answer as it is persisted with quiz results.
///
/// Every field is optional so that partially written records still load;
/// an answer without `scores` contributes nothing to the tally.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    /// Label of the chosen option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    /// Malformed weights (not an object of non-negative integers) load as `None`.
    #[serde(
        default,
        deserialize_with = "lenient_scores",
        skip_serializing_if = "Option::is_none"
    )]
    pub scores: Option<ScoreMap>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaybeScores {
    Valid(ScoreMap),
    Invalid(serde::de::IgnoredAny),
}

fn lenient_scores<'de, D>(deserializer: D) -> Result<Option<ScoreMap>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<MaybeScores>::deserialize(deserializer)? {
        Some(MaybeScores::Valid(scores)) => Some(scores),
        Some(MaybeScores::Invalid(_)) | None => None,
    })
}

impl Answer {
    pub fn detailed(question: &Question, option: &QuizOption) -> Self {
        Self {
            id: Some(question.id.clone()),
            prompt: Some(question.prompt.clone()),
            option: Some(option.label.clone()),
            scores: Some(option.scores.clone()),
        }
    }

    pub fn from_scores(scores: ScoreMap) -> Self {
        Self {
            scores: Some(scores),
            ..Self::default()
        }
    }
}

/// Accumulated score per category, in insertion order.
///
/// Produced by [`crate::tally_scores`]: registered categories come first in
/// registry order, any unregistered ids follow in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Totals(IndexMap<CategoryId, u64>);

impl Totals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, category: &str) -> Option<u64> {
        self.0.get(category).copied()
    }

    pub fn contains(&self, category: &str) -> bool {
        self.0.contains_key(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn highest(&self) -> Option<u64> {
        self.0.values().copied().max()
    }

    pub(crate) fn add(&mut self, category: &str, weight: u64) {
        match self.0.get_mut(category) {
            Some(total) => *total = total.saturating_add(weight),
            None => {
                self.0.insert(category.to_string(), weight);
            }
        }
    }
}

impl<K: Into<CategoryId>> FromIterator<(K, u64)> for Totals {
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
