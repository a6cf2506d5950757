//! One pass through the quiz: `NotStarted -> InProgress(index) -> Completed`.
//!
//! The session only tracks selections and navigation. Scoring happens once,
//! on submit, against the full answer list.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{self, Registry};
use crate::error::SessionError;
use crate::model::{Answer, Question, QuizOption};
use crate::results::QuizResult;
use crate::scoring::{tally_scores_with, top_categories_with};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    NotStarted,
    InProgress { index: usize },
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Advanced { index: usize },
    Completed(QuizResult),
}

#[derive(Debug, Clone)]
pub struct QuizSession<'a> {
    questions: &'a [Question],
    registry: &'a Registry,
    state: SessionState,
    /// Chosen option index per question, aligned with `questions`.
    selections: Vec<Option<usize>>,
}

impl QuizSession<'static> {
    pub fn new() -> Self {
        Self::with_catalog(catalog::questions(), catalog::categories())
    }
}

impl Default for QuizSession<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> QuizSession<'a> {
    pub fn with_catalog(questions: &'a [Question], registry: &'a Registry) -> Self {
        Self {
            questions,
            registry,
            state: SessionState::NotStarted,
            selections: vec![None; questions.len()],
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn questions(&self) -> &'a [Question] {
        self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    /// Enter the first question. Starting an in-progress session is a no-op.
    pub fn start(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::NotStarted => {
                self.state = SessionState::InProgress { index: 0 };
                Ok(())
            }
            SessionState::InProgress { .. } => Ok(()),
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
        }
    }

    pub fn current_question(&self) -> Option<&'a Question> {
        match self.state {
            SessionState::InProgress { index } => self.questions.get(index),
            _ => None,
        }
    }

    pub fn selection(&self, question_id: &str) -> Option<&'a QuizOption> {
        let (index, question) = self.find_question(question_id)?;
        self.selections[index].and_then(|o| question.options.get(o))
    }

    /// Record the answer for a question, replacing any earlier choice.
    pub fn select(&mut self, question_id: &str, value: &str) -> Result<&'a QuizOption, SessionError> {
        self.current_index()?;
        let (index, question) = self
            .find_question(question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;
        let (option_index, option) = question
            .options
            .iter()
            .enumerate()
            .find(|(_, o)| o.value == value)
            .ok_or_else(|| SessionError::UnknownOption {
                question: question_id.to_string(),
                value: value.to_string(),
            })?;

        self.selections[index] = Some(option_index);
        Ok(option)
    }

    /// Advance past the current question, which must be answered.
    /// On the last question this submits.
    pub fn next(&mut self, completed_at: DateTime<Utc>) -> Result<Step, SessionError> {
        let index = self.current_index()?;
        if let Some(question) = self.questions.get(index) {
            if self.selections[index].is_none() {
                return Err(SessionError::Unanswered {
                    question: question.id.clone(),
                });
            }
        }

        if index + 1 >= self.questions.len() {
            return self.submit(completed_at).map(Step::Completed);
        }

        self.state = SessionState::InProgress { index: index + 1 };
        Ok(Step::Advanced { index: index + 1 })
    }

    pub fn back(&mut self) -> Result<usize, SessionError> {
        let index = self.current_index()?.saturating_sub(1);
        self.state = SessionState::InProgress { index };
        Ok(index)
    }

    /// Score the full answer set and complete the session.
    ///
    /// If a question is unanswered the session moves to it and stays in progress.
    pub fn submit(&mut self, completed_at: DateTime<Utc>) -> Result<QuizResult, SessionError> {
        self.current_index()?;

        let mut answers = Vec::with_capacity(self.questions.len());
        for (index, (question, selected)) in self.questions.iter().zip(&self.selections).enumerate() {
            let Some(option) = selected.and_then(|o| question.options.get(o)) else {
                self.state = SessionState::InProgress { index };
                return Err(SessionError::Incomplete {
                    question: question.id.clone(),
                    index,
                });
            };
            answers.push(Answer::detailed(question, option));
        }

        let totals = tally_scores_with(self.registry, &answers);
        let top = top_categories_with(self.registry, &totals);
        let result = QuizResult::new(answers, totals, &top, completed_at);
        self.state = SessionState::Completed;

        debug!(
            answers = result.answers.len(),
            top = ?result.top_categories,
            "quiz session completed"
        );
        Ok(result)
    }

    /// Percentage of the way through the question list.
    pub fn progress(&self) -> f32 {
        match self.state {
            SessionState::NotStarted => 0.0,
            SessionState::InProgress { .. } if self.questions.is_empty() => 100.0,
            SessionState::InProgress { index } => {
                (index + 1) as f32 / self.questions.len() as f32 * 100.0
            }
            SessionState::Completed => 100.0,
        }
    }

    fn current_index(&self) -> Result<usize, SessionError> {
        match self.state {
            SessionState::NotStarted => Err(SessionError::NotStarted),
            SessionState::InProgress { index } => Ok(index),
            SessionState::Completed => Err(SessionError::AlreadyCompleted),
        }
    }

    fn find_question(&self, question_id: &str) -> Option<(usize, &'a Question)> {
        self.questions
            .iter()
            .enumerate()
            .find(|(_, q)| q.id == question_id)
    }
}

/// Score a full set of `(question id, option value)` selections in one call.
pub fn score_selections<I, K, V>(
    selections: I,
    completed_at: DateTime<Utc>,
) -> Result<QuizResult, SessionError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut session = QuizSession::new();
    session.start()?;
    for (question_id, value) in selections {
        session.select(question_id.as_ref(), value.as_ref())?;
    }
    session.submit(completed_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACTIVE_PICKS: [(&str, &str); 5] = [
        ("q1", "hike"),
        ("q2", "60"),
        ("q3", "yard"),
        ("q4", "structuredCare"),
        ("q5", "high"),
    ];

    fn answer_all(session: &mut QuizSession<'_>, picks: &[(&str, &str)]) {
        for (question, value) in picks {
            session.select(question, value).unwrap();
        }
    }

    #[test]
    fn walks_forward_and_completes() {
        let mut session = QuizSession::new();
        assert_eq!(session.state(), SessionState::NotStarted);
        assert_eq!(session.progress(), 0.0);
        session.start().unwrap();
        assert_eq!(session.current_question().map(|q| q.id.as_str()), Some("q1"));
        assert_eq!(session.progress(), 20.0);

        for (i, (question, value)) in ACTIVE_PICKS.iter().enumerate() {
            session.select(question, value).unwrap();
            let step = session.next(Utc::now()).unwrap();
            if i + 1 < ACTIVE_PICKS.len() {
                assert_eq!(step, Step::Advanced { index: i + 1 });
            } else {
                let Step::Completed(result) = step else {
                    panic!("expected completion on the last question");
                };
                assert_eq!(result.totals.get("activeDog"), Some(12));
                assert_eq!(result.totals.get("playfulFriend"), Some(5));
                assert_eq!(result.top_categories, ["activeDog"]);
                assert_eq!(result.answers.len(), 5);
                assert_eq!(
                    result.answers[0].option.as_deref(),
                    Some("Out early for hikes, markets, and meet-ups")
                );
            }
        }
        assert!(session.is_completed());
        assert_eq!(session.progress(), 100.0);
    }

    #[test]
    fn next_requires_a_selection() {
        let mut session = QuizSession::new();
        session.start().unwrap();
        let err = session.next(Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::Unanswered {
                question: "q1".to_string()
            }
        );
        assert_eq!(session.state(), SessionState::InProgress { index: 0 });
    }

    #[test]
    fn changing_an_answer_overwrites_it() {
        let mut session = QuizSession::new();
        session.start().unwrap();
        session.select("q1", "hike").unwrap();
        session.select("q1", "home").unwrap();
        assert_eq!(session.selection("q1").map(|o| o.value.as_str()), Some("home"));
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn back_stops_at_first_question() {
        let mut session = QuizSession::new();
        session.start().unwrap();
        assert_eq!(session.back().unwrap(), 0);
        session.select("q1", "craft").unwrap();
        session.next(Utc::now()).unwrap();
        assert_eq!(session.back().unwrap(), 0);
        assert_eq!(session.selection("q1").map(|o| o.value.as_str()), Some("craft"));
    }

    #[test]
    fn submit_jumps_to_first_unanswered() {
        let mut session = QuizSession::new();
        session.start().unwrap();
        answer_all(&mut session, &[("q1", "hike"), ("q2", "90"), ("q4", "minimalCare")]);
        let err = session.submit(Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::Incomplete {
                question: "q3".to_string(),
                index: 2
            }
        );
        assert_eq!(session.state(), SessionState::InProgress { index: 2 });
        assert_eq!(session.current_question().map(|q| q.id.as_str()), Some("q3"));
    }

    #[test]
    fn completed_is_terminal() {
        let mut session = QuizSession::new();
        session.start().unwrap();
        answer_all(&mut session, &ACTIVE_PICKS);
        session.submit(Utc::now()).unwrap();

        assert_eq!(session.start(), Err(SessionError::AlreadyCompleted));
        assert_eq!(
            session.select("q1", "home").unwrap_err(),
            SessionError::AlreadyCompleted
        );
        assert_eq!(
            session.submit(Utc::now()).unwrap_err(),
            SessionError::AlreadyCompleted
        );
    }

    #[test]
    fn rejects_unknown_ids_and_unstarted_sessions() {
        let mut session = QuizSession::new();
        assert_eq!(
            session.select("q1", "hike").unwrap_err(),
            SessionError::NotStarted
        );
        session.start().unwrap();
        assert_eq!(
            session.select("q42", "hike").unwrap_err(),
            SessionError::UnknownQuestion("q42".to_string())
        );
        assert_eq!(
            session.select("q1", "skydive").unwrap_err(),
            SessionError::UnknownOption {
                question: "q1".to_string(),
                value: "skydive".to_string()
            }
        );
    }

    #[test]
    fn tied_result_lists_every_leader() {
        // calmCat 3 + 2 + 1, gentleSenior 1 + 1 + 2 + 2, pocketPal 1 + 2
        let result = score_selections(
            [
                ("q1", "home"),
                ("q2", "30"),
                ("q3", "cozyShared"),
                ("q4", "supportCare"),
                ("q5", "varied"),
            ],
            Utc::now(),
        )
        .unwrap();
        assert_eq!(result.totals.get("calmCat"), Some(6));
        assert_eq!(result.totals.get("gentleSenior"), Some(6));
        assert_eq!(result.top_categories, ["calmCat", "gentleSenior"]);
    }

    #[test]
    fn score_selections_requires_every_question() {
        let err = score_selections([("q1", "hike")], Utc::now()).unwrap_err();
        assert_eq!(
            err,
            SessionError::Incomplete {
                question: "q2".to_string(),
                index: 1
            }
        );
    }

    #[test]
    fn empty_question_list_completes_with_all_ties() {
        let registry = catalog::categories();
        let mut session = QuizSession::with_catalog(&[], registry);
        session.start().unwrap();
        assert_eq!(session.progress(), 100.0);
        let Step::Completed(result) = session.next(Utc::now()).unwrap() else {
            panic!("expected completion");
        };
        assert_eq!(result.top_categories.len(), registry.len());
    }
}
