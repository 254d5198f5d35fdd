use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{SessionId, SubjectId, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session end time must be strictly after its start time")]
    InvalidTimeRange,
}

//
// ─── STUDY SESSION ─────────────────────────────────────────────────────────────
//

/// A scheduled or logged block of study time.
///
/// Every session belongs to a subject; a session may additionally reference
/// one of that subject's topics, or none for general study. The time range
/// is half-open: `[start_time, end_time)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudySession {
    id: SessionId,
    subject_id: SubjectId,
    topic_id: Option<TopicId>,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    completed: bool,
}

impl StudySession {
    /// Creates a new session in the scheduled (not completed) state.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTimeRange` if `end_time <= start_time`.
    pub fn new(
        id: SessionId,
        subject_id: SubjectId,
        topic_id: Option<TopicId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        Self::from_persisted(id, subject_id, topic_id, start_time, end_time, false)
    }

    /// Rehydrates a session from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTimeRange` if `end_time <= start_time`.
    pub fn from_persisted(
        id: SessionId,
        subject_id: SubjectId,
        topic_id: Option<TopicId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        completed: bool,
    ) -> Result<Self, SessionError> {
        if end_time <= start_time {
            return Err(SessionError::InvalidTimeRange);
        }

        Ok(Self {
            id,
            subject_id,
            topic_id,
            start_time,
            end_time,
            completed,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    #[must_use]
    pub fn topic_id(&self) -> Option<TopicId> {
        self.topic_id
    }

    #[must_use]
    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    #[must_use]
    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    /// Returns the session length in whole minutes.
    #[must_use]
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }

    /// Returns true if this session's half-open interval intersects
    /// `[start, end)`.
    ///
    /// Touching endpoints do not count as overlap.
    #[must_use]
    pub fn overlaps_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    /// Returns true if two sessions occupy intersecting time.
    #[must_use]
    pub fn overlaps(&self, other: &StudySession) -> bool {
        self.overlaps_range(other.start_time, other.end_time)
    }

    /// Moves the session to a new time range.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTimeRange` if `end_time <= start_time`;
    /// the stored range is left unchanged.
    pub fn reschedule(
        &mut self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<(), SessionError> {
        if end_time <= start_time {
            return Err(SessionError::InvalidTimeRange);
        }
        self.start_time = start_time;
        self.end_time = end_time;
        Ok(())
    }

    /// Sets the completion flag. Completion is a one-way action in practice,
    /// but re-opening is permitted.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
