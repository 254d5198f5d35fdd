use std::sync::Arc;

use plan_core::model::{StudySession, SubjectId};
use plan_core::{stats, Clock};
use storage::repository::{SessionRepository, SubjectRepository, TopicRepository};

use crate::error::ProgressServiceError;

/// Completion snapshot for a single subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectProgress {
    pub subject_id: SubjectId,
    pub completed_topics: u32,
    pub total_topics: u32,
    /// Percent complete, rounded to the nearest whole number.
    pub percentage: u32,
    /// Whole days until the exam; negative once the exam has passed.
    pub days_until_exam: i64,
}

/// Read-only aggregation over subjects, topics, and sessions.
///
/// All date arithmetic goes through the injected [`Clock`], so dashboards
/// built on this stay deterministic under test.
#[derive(Clone)]
pub struct ProgressService {
    subjects: Arc<dyn SubjectRepository>,
    topics: Arc<dyn TopicRepository>,
    sessions: Arc<dyn SessionRepository>,
    clock: Clock,
}

impl ProgressService {
    #[must_use]
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        topics: Arc<dyn TopicRepository>,
        sessions: Arc<dyn SessionRepository>,
        clock: Clock,
    ) -> Self {
        Self {
            subjects,
            topics,
            sessions,
            clock,
        }
    }

    /// Compute the completion snapshot for one subject.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownSubject` if the subject does not
    /// exist, or `Storage` if repository access fails.
    pub async fn subject_progress(
        &self,
        subject_id: SubjectId,
    ) -> Result<SubjectProgress, ProgressServiceError> {
        let subject = self
            .subjects
            .get_subject(subject_id)
            .await?
            .ok_or(ProgressServiceError::UnknownSubject(subject_id))?;
        let topics = self.topics.topics_for_subject(subject_id).await?;

        let completed = stats::completed_topics_count(&topics, subject_id);
        let total = stats::total_topics_count(&topics, subject_id);
        Ok(SubjectProgress {
            subject_id,
            completed_topics: completed,
            total_topics: total,
            percentage: stats::completion_percentage(completed, total),
            days_until_exam: stats::days_until(subject.exam_date(), self.clock.now()),
        })
    }

    /// Percent of all topics completed, across every subject.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn overall_percentage(&self) -> Result<u32, ProgressServiceError> {
        let topics = self.topics.list_topics().await?;
        let total = u32::try_from(topics.len()).unwrap_or(u32::MAX);
        let completed =
            u32::try_from(topics.iter().filter(|t| t.completed()).count()).unwrap_or(u32::MAX);
        Ok(stats::completion_percentage(completed, total))
    }

    /// Sessions starting on the clock's current calendar day, ordered by
    /// start time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn sessions_today(&self) -> Result<Vec<StudySession>, ProgressServiceError> {
        let sessions = self.sessions.list_sessions().await?;
        Ok(stats::sessions_today(&sessions, self.clock.now()))
    }

    /// Minutes studied in the calendar week containing the clock's current
    /// time.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if repository access fails.
    pub async fn weekly_minutes(&self) -> Result<i64, ProgressServiceError> {
        let sessions = self.sessions.list_sessions().await?;
        Ok(stats::weekly_study_minutes(&sessions, self.clock.now()))
    }

    /// Whole days until a subject's exam, rounding partial days up.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::UnknownSubject` if the subject does not
    /// exist, or `Storage` if repository access fails.
    pub async fn days_until_exam(
        &self,
        subject_id: SubjectId,
    ) -> Result<i64, ProgressServiceError> {
        let subject = self
            .subjects
            .get_subject(subject_id)
            .await?
            .ok_or(ProgressServiceError::UnknownSubject(subject_id))?;
        Ok(stats::days_until(subject.exam_date(), self.clock.now()))
    }
}
