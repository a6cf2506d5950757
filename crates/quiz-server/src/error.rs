use quiz_engine::SessionError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("config error: {0}")]
    Config(String),

    #[error("unknown session: {0}")]
    UnknownSession(String),

    #[error("We couldn't find your quiz answers. Please retake the quiz to see your matches.")]
    ResultsNotFound,
}
