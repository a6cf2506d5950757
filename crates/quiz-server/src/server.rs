/// MCP server for the Happy Tails lifestyle-matching quiz.
///
/// Exposes the catalog, a step-by-step quiz flow keyed by session id, and
/// one-shot scoring. Completed results are persisted through the
/// `ResultStore`; when that fails they are kept in memory instead. Idle
/// sessions and in-memory results expire after the result TTL.
use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use rmcp::{
    Json, ServerHandler,
    handler::server::router::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::*,
    tool, tool_handler, tool_router,
};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use happytails_common::error::CommonError;
use happytails_common::mcp_api::{
    AnswerQuestionParams, AnswerRecordedResponse, CategoryInfo, CategoryListResponse,
    QuestionInfo, QuestionListResponse, QuizProgressResponse, QuizResultsResponse,
    QuizStepResponse, ScoreAnswersParams, SessionParams,
};
use happytails_common::result_store::{new_session_id, ResultStore, SessionId};
use quiz_engine::{QuizResult, QuizSession, SessionState, Step};

use crate::error::AppError;

pub struct LiveSession {
    pub session: QuizSession<'static>,
    pub last_active: DateTime<Utc>,
}

/// In-progress sessions and unpersisted results, behind one lock.
#[derive(Default)]
pub struct AppState {
    pub sessions: HashMap<SessionId, LiveSession>,
    /// Results that could not be written to the `ResultStore`.
    pub completed: HashMap<SessionId, QuizResult>,
}

impl AppState {
    /// Drop sessions idle for `ttl` and results completed more than `ttl` ago.
    fn prune(&mut self, now: DateTime<Utc>, ttl: TimeDelta) {
        let before = self.sessions.len() + self.completed.len();
        self.sessions.retain(|_, live| now - live.last_active < ttl);
        self.completed.retain(|_, result| now - result.completed_at < ttl);
        let dropped = before - self.sessions.len() - self.completed.len();
        if dropped > 0 {
            debug!(dropped, "expired quiz sessions pruned");
        }
    }
}

#[derive(Clone)]
pub struct QuizServer {
    state: Arc<RwLock<AppState>>,
    results: ResultStore,
    ttl: TimeDelta,
    tool_router: ToolRouter<QuizServer>,
}

impl QuizServer {
    pub fn new(results: ResultStore) -> Self {
        let ttl = TimeDelta::from_std(results.ttl()).unwrap_or(TimeDelta::MAX);
        Self {
            state: Arc::new(RwLock::new(AppState::default())),
            results,
            ttl,
            tool_router: Self::tool_router(),
        }
    }

    async fn open_session(&self) -> Result<QuizProgressResponse, AppError> {
        let session_id = new_session_id();
        let mut session = QuizSession::new();
        session.start()?;
        let response = progress_response(&session_id, &session);

        let now = Utc::now();
        let mut state = self.state.write().await;
        state.prune(now, self.ttl);
        state.sessions.insert(
            session_id.clone(),
            LiveSession {
                session,
                last_active: now,
            },
        );
        info!(session_id = %session_id, "quiz session started");
        Ok(response)
    }

    /// Run `f` against a live session and report where it ended up.
    async fn with_session<T>(
        &self,
        session_id: &str,
        f: impl FnOnce(&mut QuizSession<'static>) -> Result<T, AppError>,
    ) -> Result<(T, QuizProgressResponse), AppError> {
        let mut state = self.state.write().await;
        let live = state
            .sessions
            .get_mut(session_id)
            .ok_or_else(|| AppError::UnknownSession(session_id.to_string()))?;
        live.last_active = Utc::now();
        let value = f(&mut live.session)?;
        Ok((value, progress_response(session_id, &live.session)))
    }

    /// Retire a completed session and store its result.
    async fn finish(&self, session_id: &str, result: QuizResult) -> QuizResultsResponse {
        let persisted = match self.results.save(session_id, &result).await {
            Ok(()) => {
                debug!(session_id, "quiz result persisted");
                true
            }
            Err(CommonError::RedisUnavailable) => {
                debug!(session_id, "redis unavailable, quiz result kept in memory only");
                false
            }
            Err(e) => {
                warn!(error = %e, session_id, "failed to persist quiz result, keeping it in memory");
                false
            }
        };

        info!(
            session_id,
            top = ?result.top_categories,
            "quiz completed"
        );
        let response = QuizResultsResponse::from_result(Some(session_id.to_string()), &result);

        let mut state = self.state.write().await;
        state.sessions.remove(session_id);
        if !persisted {
            state.completed.insert(session_id.to_string(), result);
        }
        state.prune(Utc::now(), self.ttl);
        response
    }

    async fn load_results(&self, session_id: &str) -> Result<QuizResult, AppError> {
        if let Some(result) = self.results.load(session_id).await {
            return Ok(result);
        }

        let mut state = self.state.write().await;
        let expired = match state.completed.get(session_id) {
            Some(result) if Utc::now() - result.completed_at < self.ttl => {
                return Ok(result.clone());
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            state.completed.remove(session_id);
            debug!(session_id, "in-memory quiz result expired");
        }
        Err(AppError::ResultsNotFound)
    }
}

#[tool_router]
impl QuizServer {
    #[tool(description = "List every adopter profile the quiz can recommend, with highlights and suggested pet search filters.")]
    async fn list_categories(&self) -> Result<Json<CategoryListResponse>, String> {
        let categories = quiz_engine::categories()
            .values()
            .map(CategoryInfo::from)
            .collect();
        Ok(Json(CategoryListResponse { categories }))
    }

    #[tool(description = "List the quiz questions and their answer options in order.")]
    async fn list_questions(&self) -> Result<Json<QuestionListResponse>, String> {
        let questions = quiz_engine::questions()
            .iter()
            .map(QuestionInfo::from)
            .collect();
        Ok(Json(QuestionListResponse { questions }))
    }

    #[tool(description = "Start a new lifestyle-matching quiz session. Returns the session id and the first question.")]
    async fn start_quiz(&self) -> Result<Json<QuizProgressResponse>, String> {
        self.open_session()
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }

    #[tool(description = "Show the current question and progress of a quiz session.")]
    async fn get_progress(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizProgressResponse>, String> {
        let state = self.state.read().await;
        let live = state
            .sessions
            .get(params.session_id.trim())
            .ok_or_else(|| AppError::UnknownSession(params.session_id.clone()).to_string())?;
        Ok(Json(progress_response(params.session_id.trim(), &live.session)))
    }

    #[tool(description = "Choose an answer for a question in a quiz session. Choosing again replaces the earlier answer.")]
    async fn answer_question(
        &self,
        Parameters(params): Parameters<AnswerQuestionParams>,
    ) -> Result<Json<AnswerRecordedResponse>, String> {
        let session_id = params.session_id.trim();
        let question_id = params.question_id.trim();
        let value = params.option.trim();

        let (label, _) = self
            .with_session(session_id, |session| {
                Ok(session.select(question_id, value)?.label.clone())
            })
            .await
            .map_err(|e| e.to_string())?;

        Ok(Json(AnswerRecordedResponse {
            session_id: session_id.to_string(),
            question_id: question_id.to_string(),
            option: value.to_string(),
            label,
        }))
    }

    #[tool(description = "Move to the next question. The current question must be answered. On the last question this submits the quiz and returns the results.")]
    async fn next_question(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizStepResponse>, String> {
        let session_id = params.session_id.trim();
        let (step, progress) = self
            .with_session(session_id, |session| Ok(session.next(Utc::now())?))
            .await
            .map_err(|e| e.to_string())?;

        let response = match step {
            Step::Advanced { .. } => QuizStepResponse {
                progress: Some(progress),
                results: None,
            },
            Step::Completed(result) => QuizStepResponse {
                progress: Some(progress),
                results: Some(self.finish(session_id, result).await),
            },
        };
        Ok(Json(response))
    }

    #[tool(description = "Go back to the previous question of a quiz session.")]
    async fn previous_question(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizProgressResponse>, String> {
        let (_, progress) = self
            .with_session(params.session_id.trim(), |session| Ok(session.back()?))
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(progress))
    }

    #[tool(description = "Submit a quiz session. Every question must be answered; otherwise the session moves to the first unanswered question.")]
    async fn submit_quiz(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizResultsResponse>, String> {
        let session_id = params.session_id.trim();
        let (result, _) = self
            .with_session(session_id, |session| Ok(session.submit(Utc::now())?))
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(self.finish(session_id, result).await))
    }

    #[tool(description = "Score a complete set of answers in one call without a session. Provide one selection (question_id, option) per question.")]
    async fn score_answers(
        &self,
        Parameters(params): Parameters<ScoreAnswersParams>,
    ) -> Result<Json<QuizResultsResponse>, String> {
        let selections = params
            .selections
            .iter()
            .map(|s| (s.question_id.trim(), s.option.trim()));
        let result = quiz_engine::score_selections(selections, Utc::now())
            .map_err(|e| e.to_string())?;
        Ok(Json(QuizResultsResponse::from_result(None, &result)))
    }

    #[tool(description = "Fetch the results of a completed quiz session: top matching profiles, all scores ranked, and the recorded answers.")]
    async fn get_results(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizResultsResponse>, String> {
        let session_id = params.session_id.trim();
        let result = self
            .load_results(session_id)
            .await
            .map_err(|e| e.to_string())?;
        Ok(Json(QuizResultsResponse::from_result(
            Some(session_id.to_string()),
            &result,
        )))
    }

    #[tool(description = "Discard a quiz session and its stored results, then start a fresh session.")]
    async fn retake_quiz(
        &self,
        Parameters(params): Parameters<SessionParams>,
    ) -> Result<Json<QuizProgressResponse>, String> {
        let session_id = params.session_id.trim();
        self.results.clear(session_id).await;
        {
            let mut state = self.state.write().await;
            state.sessions.remove(session_id);
            state.completed.remove(session_id);
        }
        info!(session_id, "quiz session discarded for retake");

        self.open_session()
            .await
            .map(Json)
            .map_err(|e| e.to_string())
    }
}

fn progress_response(session_id: &str, session: &QuizSession<'_>) -> QuizProgressResponse {
    let (state, question_index) = match session.state() {
        SessionState::NotStarted => ("not_started", 0),
        SessionState::InProgress { index } => ("in_progress", index),
        SessionState::Completed => ("completed", session.question_count()),
    };
    let question = session.current_question();

    QuizProgressResponse {
        session_id: session_id.to_string(),
        state: state.to_string(),
        question_index,
        question_count: session.question_count(),
        answered_count: session.answered_count(),
        progress_percent: session.progress(),
        question: question.map(QuestionInfo::from),
        selected_option: question
            .and_then(|q| session.selection(&q.id))
            .map(|o| o.value.clone()),
    }
}

#[tool_handler]
impl ServerHandler for QuizServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            server_info: Implementation {
                name: "quiz-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Happy Tails lifestyle-matching quiz. Use start_quiz to open a session, \
                 answer_question and next_question to work through it, then get_results \
                 for the matching adopter profiles and their suggested pet search filters. \
                 score_answers scores a full set of answers in one call."
                    .to_string(),
            ),
        }
    }
}
