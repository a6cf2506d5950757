#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("quiz has not been started")]
    NotStarted,

    #[error("quiz is already completed, start a new session to retake it")]
    AlreadyCompleted,

    #[error("unknown question: {0}")]
    UnknownQuestion(String),

    #[error("unknown option '{value}' for question {question}")]
    UnknownOption { question: String, value: String },

    #[error("Please choose an option to continue. (question {question})")]
    Unanswered { question: String },

    #[error("Please finish every question before submitting. (question {question} at index {index})")]
    Incomplete { question: String, index: usize },
}
