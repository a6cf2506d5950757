use quiz_engine::{Answer, Category, Question, QuizResult, RankedCategory};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SessionParams {
    /// Session id returned by `start_quiz`.
    pub session_id: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnswerQuestionParams {
    pub session_id: String,
    /// Question id such as "q1".
    pub question_id: String,
    /// Option value such as "hike".
    pub option: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct Selection {
    pub question_id: String,
    pub option: String,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ScoreAnswersParams {
    /// One selection per question.
    pub selections: Vec<Selection>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedFilter {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryInfo {
    pub id: String,
    pub title: String,
    pub description: String,
    pub highlights: Vec<String>,
    /// Filters to pre-seed a pet search with, in display order.
    pub suggested_filters: Vec<SuggestedFilter>,
}

impl From<&Category> for CategoryInfo {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            highlights: category.highlights.clone(),
            suggested_filters: category
                .suggested_filters
                .iter()
                .map(|(name, value)| SuggestedFilter {
                    name: name.clone(),
                    value: value.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CategoryListResponse {
    pub categories: Vec<CategoryInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct OptionInfo {
    pub value: String,
    pub label: String,
}

/// A question as presented to the adopter. Option weights are not exposed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuestionInfo {
    pub id: String,
    pub prompt: String,
    pub options: Vec<OptionInfo>,
}

impl From<&Question> for QuestionInfo {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question
                .options
                .iter()
                .map(|o| OptionInfo {
                    value: o.value.clone(),
                    label: o.label.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuestionListResponse {
    pub questions: Vec<QuestionInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizProgressResponse {
    pub session_id: String,
    /// "not_started", "in_progress" or "completed".
    pub state: String,
    pub question_index: usize,
    pub question_count: usize,
    pub answered_count: usize,
    pub progress_percent: f32,
    pub question: Option<QuestionInfo>,
    /// Option value already chosen for the current question, if any.
    pub selected_option: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnswerRecordedResponse {
    pub session_id: String,
    pub question_id: String,
    pub option: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RankedScore {
    pub category_id: String,
    pub title: String,
    pub score: u64,
}

impl From<&RankedCategory<'_>> for RankedScore {
    fn from(ranked: &RankedCategory<'_>) -> Self {
        Self {
            category_id: ranked.category.id.clone(),
            title: ranked.category.title.clone(),
            score: ranked.score,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnsweredQuestion {
    pub question_id: Option<String>,
    pub prompt: Option<String>,
    pub option: Option<String>,
}

impl From<&Answer> for AnsweredQuestion {
    fn from(answer: &Answer) -> Self {
        Self {
            question_id: answer.id.clone(),
            prompt: answer.prompt.clone(),
            option: answer.option.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizResultsResponse {
    /// Absent for one-shot scoring.
    pub session_id: Option<String>,
    /// RFC 3339 timestamp.
    pub completed_at: String,
    /// Every category tied at the highest score.
    pub top_categories: Vec<CategoryInfo>,
    /// All categories, highest score first.
    pub ranked_totals: Vec<RankedScore>,
    pub answers: Vec<AnsweredQuestion>,
}

impl QuizResultsResponse {
    pub fn from_result(session_id: Option<String>, result: &QuizResult) -> Self {
        Self {
            session_id,
            completed_at: result.completed_at.to_rfc3339(),
            top_categories: result.matches().into_iter().map(CategoryInfo::from).collect(),
            ranked_totals: result.ranked().iter().map(RankedScore::from).collect(),
            answers: result.answers.iter().map(AnsweredQuestion::from).collect(),
        }
    }
}

/// Either the next step of an in-progress quiz or the final results.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct QuizStepResponse {
    pub progress: Option<QuizProgressResponse>,
    pub results: Option<QuizResultsResponse>,
}
