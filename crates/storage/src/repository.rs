use async_trait::async_trait;
use plan_core::model::{SessionId, StudySession, Subject, SubjectId, Topic, TopicId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for subjects.
#[async_trait]
pub trait SubjectRepository: Send + Sync {
    /// Persist or update a subject.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the subject cannot be stored.
    async fn upsert_subject(&self, subject: &Subject) -> Result<(), StorageError>;

    /// Fetch a subject by ID. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_subject(&self, id: SubjectId) -> Result<Option<Subject>, StorageError>;

    /// Fetch all subjects. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_subjects(&self) -> Result<Vec<Subject>, StorageError>;
}

/// Repository contract for topics.
#[async_trait]
pub trait TopicRepository: Send + Sync {
    /// Persist or update a topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the topic cannot be stored.
    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError>;

    /// Fetch a topic by ID. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>, StorageError>;

    /// Fetch the topics belonging to a subject. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn topics_for_subject(&self, subject_id: SubjectId) -> Result<Vec<Topic>, StorageError>;

    /// Fetch all topics. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError>;
}

/// Repository contract for study sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persist or update a session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be stored.
    async fn upsert_session(&self, session: &StudySession) -> Result<(), StorageError>;

    /// Fetch a session by ID. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn get_session(&self, id: SessionId) -> Result<Option<StudySession>, StorageError>;

    /// Fetch the sessions belonging to a subject. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn sessions_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StorageError>;

    /// Fetch the sessions referencing a topic. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn sessions_for_topic(&self, topic_id: TopicId)
    -> Result<Vec<StudySession>, StorageError>;

    /// Fetch all sessions. No ordering is guaranteed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_sessions(&self) -> Result<Vec<StudySession>, StorageError>;

    /// Delete a single session. Deleting an absent session is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError>;
}

/// Referential-cleanup deletes spanning collections.
///
/// Implementations must remove children before the parent and apply the
/// whole cascade as one atomic unit; deleting an absent record succeeds.
#[async_trait]
pub trait CascadeRepository: Send + Sync {
    /// Delete a subject together with its topics and sessions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_subject(&self, id: SubjectId) -> Result<(), StorageError>;

    /// Delete a topic together with the sessions referencing it.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn delete_topic(&self, id: TopicId) -> Result<(), StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

#[derive(Default)]
struct Tables {
    subjects: HashMap<SubjectId, Subject>,
    topics: HashMap<TopicId, Topic>,
    sessions: HashMap<SessionId, StudySession>,
}

/// Simple in-memory repository implementation for testing and prototyping.
///
/// All three collections share one mutex, so cascades observe the same
/// all-or-nothing behavior as the SQLite transaction path.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Tables>, StorageError> {
        self.tables
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl SubjectRepository for InMemoryRepository {
    async fn upsert_subject(&self, subject: &Subject) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.subjects.insert(subject.id(), subject.clone());
        Ok(())
    }

    async fn get_subject(&self, id: SubjectId) -> Result<Option<Subject>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.subjects.get(&id).cloned())
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.subjects.values().cloned().collect())
    }
}

#[async_trait]
impl TopicRepository for InMemoryRepository {
    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.topics.insert(topic.id(), topic.clone());
        Ok(())
    }

    async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.topics.get(&id).cloned())
    }

    async fn topics_for_subject(&self, subject_id: SubjectId) -> Result<Vec<Topic>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .topics
            .values()
            .filter(|topic| topic.subject_id() == subject_id)
            .cloned()
            .collect())
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.topics.values().cloned().collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryRepository {
    async fn upsert_session(&self, session: &StudySession) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.sessions.insert(session.id(), session.clone());
        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<StudySession>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.sessions.get(&id).cloned())
    }

    async fn sessions_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .sessions
            .values()
            .filter(|session| session.subject_id() == subject_id)
            .cloned()
            .collect())
    }

    async fn sessions_for_topic(
        &self,
        topic_id: TopicId,
    ) -> Result<Vec<StudySession>, StorageError> {
        let guard = self.lock()?;
        Ok(guard
            .sessions
            .values()
            .filter(|session| session.topic_id() == Some(topic_id))
            .cloned()
            .collect())
    }

    async fn list_sessions(&self) -> Result<Vec<StudySession>, StorageError> {
        let guard = self.lock()?;
        Ok(guard.sessions.values().cloned().collect())
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.sessions.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CascadeRepository for InMemoryRepository {
    async fn delete_subject(&self, id: SubjectId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.sessions.retain(|_, session| session.subject_id() != id);
        guard.topics.retain(|_, topic| topic.subject_id() != id);
        guard.subjects.remove(&id);
        Ok(())
    }

    async fn delete_topic(&self, id: TopicId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard.sessions.retain(|_, session| session.topic_id() != Some(id));
        guard.topics.remove(&id);
        Ok(())
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the entity repositories behind trait objects for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub subjects: Arc<dyn SubjectRepository>,
    pub topics: Arc<dyn TopicRepository>,
    pub sessions: Arc<dyn SessionRepository>,
    pub cascades: Arc<dyn CascadeRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let subjects: Arc<dyn SubjectRepository> = Arc::new(repo.clone());
        let topics: Arc<dyn TopicRepository> = Arc::new(repo.clone());
        let sessions: Arc<dyn SessionRepository> = Arc::new(repo.clone());
        let cascades: Arc<dyn CascadeRepository> = Arc::new(repo);
        Self {
            subjects,
            topics,
            sessions,
            cascades,
        }
    }
}
