//! Shared error types for the services crate.

use thiserror::Error;

use plan_core::model::{
    SessionError, StudySession, SubjectError, SubjectId, TopicError, TopicId,
};
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SubjectService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SubjectServiceError {
    #[error(transparent)]
    Subject(#[from] SubjectError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `TopicService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TopicServiceError {
    #[error(transparent)]
    Topic(#[from] TopicError),
    #[error("subject {0} does not exist")]
    UnknownSubject(SubjectId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `SessionService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("subject {0} does not exist")]
    UnknownSubject(SubjectId),
    #[error("topic {0} does not exist")]
    UnknownTopic(TopicId),
    #[error("topic {topic_id} does not belong to subject {subject_id}")]
    TopicSubjectMismatch {
        topic_id: TopicId,
        subject_id: SubjectId,
    },
    #[error("requested time overlaps {} existing session(s)", conflicts.len())]
    Conflict { conflicts: Vec<StudySession> },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `ProgressService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProgressServiceError {
    #[error("subject {0} does not exist")]
    UnknownSubject(SubjectId),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping planner services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
