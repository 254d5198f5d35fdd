use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{SubjectId, TopicId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic name cannot be empty")]
    EmptyName,
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A unit of a subject's syllabus that can be marked completed.
///
/// Topics always belong to a subject. Deleting a topic removes the study
/// sessions that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    subject_id: SubjectId,
    name: String,
    description: String,
    completed: bool,
    goal_date: Option<DateTime<Utc>>,
}

impl Topic {
    /// Creates a new Topic, not yet completed.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: TopicId,
        subject_id: SubjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        goal_date: Option<DateTime<Utc>>,
    ) -> Result<Self, TopicError> {
        Self::from_persisted(id, subject_id, name, description, false, goal_date)
    }

    /// Rehydrates a topic from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if name is empty or whitespace-only.
    pub fn from_persisted(
        id: TopicId,
        subject_id: SubjectId,
        name: impl Into<String>,
        description: impl Into<String>,
        completed: bool,
        goal_date: Option<DateTime<Utc>>,
    ) -> Result<Self, TopicError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopicError::EmptyName);
        }

        Ok(Self {
            id,
            subject_id,
            name: name.trim().to_owned(),
            description: description.into(),
            completed,
            goal_date,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TopicId {
        self.id
    }

    #[must_use]
    pub fn subject_id(&self) -> SubjectId {
        self.subject_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn goal_date(&self) -> Option<DateTime<Utc>> {
        self.goal_date
    }

    /// Replaces the editable fields (name, description, goal date).
    ///
    /// # Errors
    ///
    /// Returns `TopicError::EmptyName` if the new name is empty or
    /// whitespace-only.
    pub fn edit(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        goal_date: Option<DateTime<Utc>>,
    ) -> Result<(), TopicError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TopicError::EmptyName);
        }
        self.name = name.trim().to_owned();
        self.description = description.into();
        self.goal_date = goal_date;
        Ok(())
    }

    /// Sets the completion flag.
    pub fn set_completed(&mut self, completed: bool) {
        self.completed = completed;
    }

    /// Flips the completion flag.
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
