use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use plan_core::model::{SessionId, StudySession, SubjectId, TopicId};
use storage::repository::{
    SessionRepository, StorageError, SubjectRepository, TopicRepository,
};

use crate::error::SessionServiceError;

/// Orchestrates study-session scheduling, conflict detection, and deletion.
#[derive(Clone)]
pub struct SessionService {
    subjects: Arc<dyn SubjectRepository>,
    topics: Arc<dyn TopicRepository>,
    sessions: Arc<dyn SessionRepository>,
}

impl SessionService {
    #[must_use]
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        topics: Arc<dyn TopicRepository>,
        sessions: Arc<dyn SessionRepository>,
    ) -> Self {
        Self {
            subjects,
            topics,
            sessions,
        }
    }

    /// Schedule a session for a subject (optionally tied to one of its
    /// topics).
    ///
    /// The time range must be non-empty and must not overlap any existing
    /// session; overlap uses half-open intervals, so back-to-back sessions
    /// are fine.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Session` for an invalid time range,
    /// `UnknownSubject`/`UnknownTopic`/`TopicSubjectMismatch` for bad
    /// references, `Conflict` with the overlapping sessions, or `Storage`
    /// on repository failures.
    pub async fn schedule_session(
        &self,
        subject_id: SubjectId,
        topic_id: Option<TopicId>,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<SessionId, SessionServiceError> {
        let session = StudySession::new(
            SessionId::random(),
            subject_id,
            topic_id,
            start_time,
            end_time,
        )?;

        if self.subjects.get_subject(subject_id).await?.is_none() {
            return Err(SessionServiceError::UnknownSubject(subject_id));
        }
        if let Some(topic_id) = topic_id {
            let topic = self
                .topics
                .get_topic(topic_id)
                .await?
                .ok_or(SessionServiceError::UnknownTopic(topic_id))?;
            if topic.subject_id() != subject_id {
                return Err(SessionServiceError::TopicSubjectMismatch {
                    topic_id,
                    subject_id,
                });
            }
        }

        let conflicts = self.find_conflicts(start_time, end_time, None).await?;
        if !conflicts.is_empty() {
            debug!(count = conflicts.len(), "rejected conflicting session");
            return Err(SessionServiceError::Conflict { conflicts });
        }

        self.sessions.upsert_session(&session).await?;
        debug!(session_id = %session.id(), subject_id = %subject_id, "scheduled session");
        Ok(session.id())
    }

    /// Move an existing session to a new time range.
    ///
    /// Omitted bounds keep their current value. The merged range is
    /// re-checked for conflicts against every other session; on any failure
    /// the stored record is left unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Session` for an invalid merged range,
    /// `Conflict` with the overlapping sessions, or `Storage` if the session
    /// is missing or repository access fails.
    pub async fn reschedule_session(
        &self,
        id: SessionId,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Result<(), SessionServiceError> {
        let mut session = self
            .sessions
            .get_session(id)
            .await?
            .ok_or(StorageError::NotFound)?;

        let start = start_time.unwrap_or_else(|| session.start_time());
        let end = end_time.unwrap_or_else(|| session.end_time());
        session.reschedule(start, end)?;

        let conflicts = self.find_conflicts(start, end, Some(id)).await?;
        if !conflicts.is_empty() {
            debug!(session_id = %id, count = conflicts.len(), "rejected conflicting reschedule");
            return Err(SessionServiceError::Conflict { conflicts });
        }

        self.sessions.upsert_session(&session).await?;
        Ok(())
    }

    /// Set a session's completion flag. Does not re-check conflicts.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if the session is missing or
    /// repository access fails.
    pub async fn set_completed(
        &self,
        id: SessionId,
        completed: bool,
    ) -> Result<(), SessionServiceError> {
        let mut session = self
            .sessions
            .get_session(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        session.set_completed(completed);
        self.sessions.upsert_session(&session).await?;
        Ok(())
    }

    /// Delete a single session. Deleting an absent session succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn delete_session(&self, id: SessionId) -> Result<(), SessionServiceError> {
        self.sessions.delete_session(id).await?;
        Ok(())
    }

    /// Fetch a session by ID. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn get_session(
        &self,
        id: SessionId,
    ) -> Result<Option<StudySession>, SessionServiceError> {
        let session = self.sessions.get_session(id).await?;
        Ok(session)
    }

    /// List all sessions.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn list_sessions(&self) -> Result<Vec<StudySession>, SessionServiceError> {
        let sessions = self.sessions.list_sessions().await?;
        Ok(sessions)
    }

    /// List the sessions belonging to a subject.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn sessions_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, SessionServiceError> {
        let sessions = self.sessions.sessions_for_subject(subject_id).await?;
        Ok(sessions)
    }

    /// List the sessions referencing a topic.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn sessions_for_topic(
        &self,
        topic_id: TopicId,
    ) -> Result<Vec<StudySession>, SessionServiceError> {
        let sessions = self.sessions.sessions_for_topic(topic_id).await?;
        Ok(sessions)
    }

    /// Return every stored session whose interval intersects
    /// `[start_time, end_time)`, optionally ignoring one session (for
    /// update-in-place checks).
    ///
    /// This is a full scan over all sessions; touching endpoints never
    /// count as overlap.
    ///
    /// # Errors
    ///
    /// Returns `SessionServiceError::Storage` if repository access fails.
    pub async fn find_conflicts(
        &self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        exclude: Option<SessionId>,
    ) -> Result<Vec<StudySession>, SessionServiceError> {
        let all = self.sessions.list_sessions().await?;
        Ok(all
            .into_iter()
            .filter(|session| Some(session.id()) != exclude)
            .filter(|session| session.overlaps_range(start_time, end_time))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use plan_core::model::{Subject, Topic};
    use plan_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn build_service(repo: &InMemoryRepository) -> SessionService {
        SessionService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    async fn seed_subject(repo: &InMemoryRepository, name: &str) -> SubjectId {
        let subject = Subject::new(SubjectId::random(), name, fixed_now()).unwrap();
        repo.upsert_subject(&subject).await.unwrap();
        subject.id()
    }

    async fn seed_topic(repo: &InMemoryRepository, subject_id: SubjectId) -> TopicId {
        let topic = Topic::new(TopicId::random(), subject_id, "UNIT-1", "", None).unwrap();
        repo.upsert_topic(&topic).await.unwrap();
        topic.id()
    }

    fn at(hour: i64) -> DateTime<Utc> {
        fixed_now() + Duration::hours(hour)
    }

    #[tokio::test]
    async fn schedule_rejects_inverted_range() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let err = service
            .schedule_session(subject_id, None, at(2), at(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionServiceError::Session(_)));
    }

    #[tokio::test]
    async fn schedule_rejects_unknown_subject() {
        let repo = InMemoryRepository::new();
        let service = build_service(&repo);

        let err = service
            .schedule_session(SubjectId::random(), None, at(0), at(1))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionServiceError::UnknownSubject(_)));
    }

    #[tokio::test]
    async fn schedule_rejects_topic_from_another_subject() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let other_id = seed_subject(&repo, "Networks").await;
        let foreign_topic = seed_topic(&repo, other_id).await;
        let service = build_service(&repo);

        let err = service
            .schedule_session(subject_id, Some(foreign_topic), at(0), at(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SessionServiceError::TopicSubjectMismatch { .. }
        ));
    }

    #[tokio::test]
    async fn duplicate_interval_is_rejected_listing_the_conflict() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let existing = service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap();

        let err = service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap_err();
        match err {
            SessionServiceError::Conflict { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id(), existing);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn back_to_back_sessions_are_allowed() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap();
        service
            .schedule_session(subject_id, None, at(1), at(2))
            .await
            .unwrap();

        assert_eq!(service.list_sessions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn reschedule_to_free_slot_succeeds() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let id = service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap();

        service
            .reschedule_session(id, Some(at(5)), Some(at(6)))
            .await
            .unwrap();

        let moved = service.get_session(id).await.unwrap().unwrap();
        assert_eq!(moved.start_time(), at(5));
        assert_eq!(moved.end_time(), at(6));
    }

    #[tokio::test]
    async fn reschedule_does_not_conflict_with_itself() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let id = service
            .schedule_session(subject_id, None, at(0), at(2))
            .await
            .unwrap();

        // shifting within its own old slot must be fine
        service
            .reschedule_session(id, Some(at(1)), Some(at(3)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reschedule_into_occupied_slot_leaves_record_unchanged() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let occupied = service
            .schedule_session(subject_id, None, at(4), at(5))
            .await
            .unwrap();
        let id = service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap();

        let err = service
            .reschedule_session(id, Some(at(4)), Some(at(5)))
            .await
            .unwrap_err();
        match err {
            SessionServiceError::Conflict { conflicts } => {
                assert_eq!(conflicts.len(), 1);
                assert_eq!(conflicts[0].id(), occupied);
            }
            other => panic!("expected Conflict, got {other:?}"),
        }

        let unchanged = service.get_session(id).await.unwrap().unwrap();
        assert_eq!(unchanged.start_time(), at(0));
        assert_eq!(unchanged.end_time(), at(1));
    }

    #[tokio::test]
    async fn partial_reschedule_merges_the_other_bound() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let id = service
            .schedule_session(subject_id, None, at(0), at(2))
            .await
            .unwrap();

        service
            .reschedule_session(id, None, Some(at(3)))
            .await
            .unwrap();

        let session = service.get_session(id).await.unwrap().unwrap();
        assert_eq!(session.start_time(), at(0));
        assert_eq!(session.end_time(), at(3));
    }

    #[tokio::test]
    async fn completion_toggle_skips_the_conflict_check() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo, "ML").await;
        let service = build_service(&repo);

        let id = service
            .schedule_session(subject_id, None, at(0), at(1))
            .await
            .unwrap();

        service.set_completed(id, true).await.unwrap();
        assert!(service.get_session(id).await.unwrap().unwrap().completed());

        service.set_completed(id, false).await.unwrap();
        assert!(!service.get_session(id).await.unwrap().unwrap().completed());
    }

    #[tokio::test]
    async fn delete_absent_session_succeeds() {
        let repo = InMemoryRepository::new();
        let service = build_service(&repo);
        service.delete_session(SessionId::random()).await.unwrap();
    }
}
