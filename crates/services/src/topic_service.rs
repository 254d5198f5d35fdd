use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use plan_core::model::{SubjectId, Topic, TopicId};
use storage::repository::{
    CascadeRepository, StorageError, SubjectRepository, TopicRepository,
};

use crate::error::TopicServiceError;

/// Orchestrates topic creation, edits, completion, and cascading deletion.
#[derive(Clone)]
pub struct TopicService {
    subjects: Arc<dyn SubjectRepository>,
    topics: Arc<dyn TopicRepository>,
    cascades: Arc<dyn CascadeRepository>,
}

impl TopicService {
    #[must_use]
    pub fn new(
        subjects: Arc<dyn SubjectRepository>,
        topics: Arc<dyn TopicRepository>,
        cascades: Arc<dyn CascadeRepository>,
    ) -> Self {
        Self {
            subjects,
            topics,
            cascades,
        }
    }

    /// Create a topic under an existing subject.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::UnknownSubject` if the parent subject does
    /// not exist, `TopicServiceError::Topic` for validation failures, or
    /// `TopicServiceError::Storage` if persistence fails.
    pub async fn add_topic(
        &self,
        subject_id: SubjectId,
        name: String,
        description: String,
        goal_date: Option<DateTime<Utc>>,
    ) -> Result<TopicId, TopicServiceError> {
        if self.subjects.get_subject(subject_id).await?.is_none() {
            return Err(TopicServiceError::UnknownSubject(subject_id));
        }

        let topic = Topic::new(TopicId::random(), subject_id, name, description, goal_date)?;
        self.topics.upsert_topic(&topic).await?;
        debug!(topic_id = %topic.id(), subject_id = %subject_id, "created topic");
        Ok(topic.id())
    }

    /// Fetch a topic by ID. Returns `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if repository access fails.
    pub async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>, TopicServiceError> {
        let topic = self.topics.get_topic(id).await?;
        Ok(topic)
    }

    /// List the topics belonging to a subject.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if repository access fails.
    pub async fn topics_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<Topic>, TopicServiceError> {
        let topics = self.topics.topics_for_subject(subject_id).await?;
        Ok(topics)
    }

    /// List all topics.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if repository access fails.
    pub async fn list_topics(&self) -> Result<Vec<Topic>, TopicServiceError> {
        let topics = self.topics.list_topics().await?;
        Ok(topics)
    }

    /// Replace a topic's editable fields (name, description, goal date).
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Topic` if validation fails, or
    /// `TopicServiceError::Storage` if the topic is missing or repository
    /// access fails.
    pub async fn update_topic(
        &self,
        id: TopicId,
        name: String,
        description: String,
        goal_date: Option<DateTime<Utc>>,
    ) -> Result<(), TopicServiceError> {
        let mut topic = self
            .topics
            .get_topic(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        topic.edit(name, description, goal_date)?;
        self.topics.upsert_topic(&topic).await?;
        Ok(())
    }

    /// Set a topic's completion flag.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if the topic is missing or
    /// repository access fails.
    pub async fn set_completed(
        &self,
        id: TopicId,
        completed: bool,
    ) -> Result<(), TopicServiceError> {
        let mut topic = self
            .topics
            .get_topic(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        topic.set_completed(completed);
        self.topics.upsert_topic(&topic).await?;
        Ok(())
    }

    /// Flip a topic's completion flag, returning the new value.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if the topic is missing or
    /// repository access fails.
    pub async fn toggle_completed(&self, id: TopicId) -> Result<bool, TopicServiceError> {
        let mut topic = self
            .topics
            .get_topic(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        topic.toggle_completed();
        self.topics.upsert_topic(&topic).await?;
        Ok(topic.completed())
    }

    /// Delete a topic together with the study sessions referencing it.
    ///
    /// Deleting an absent topic succeeds.
    ///
    /// # Errors
    ///
    /// Returns `TopicServiceError::Storage` if repository access fails.
    pub async fn delete_topic(&self, id: TopicId) -> Result<(), TopicServiceError> {
        self.cascades.delete_topic(id).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use plan_core::model::Subject;
    use plan_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    async fn seed_subject(repo: &InMemoryRepository) -> SubjectId {
        let subject = Subject::new(SubjectId::random(), "Compilers", fixed_now()).unwrap();
        repo.upsert_subject(&subject).await.unwrap();
        subject.id()
    }

    fn build_service(repo: &InMemoryRepository) -> TopicService {
        TopicService::new(
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
            Arc::new(repo.clone()),
        )
    }

    #[tokio::test]
    async fn add_topic_requires_a_live_subject() {
        let repo = InMemoryRepository::new();
        let service = build_service(&repo);

        let err = service
            .add_topic(
                SubjectId::random(),
                "UNIT-1".to_string(),
                String::new(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, TopicServiceError::UnknownSubject(_)));
    }

    #[tokio::test]
    async fn add_and_toggle_roundtrip() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo).await;
        let service = build_service(&repo);

        let id = service
            .add_topic(
                subject_id,
                "UNIT-1".to_string(),
                "parsing".to_string(),
                None,
            )
            .await
            .unwrap();

        assert!(service.toggle_completed(id).await.unwrap());
        assert!(!service.toggle_completed(id).await.unwrap());

        let topics = service.topics_for_subject(subject_id).await.unwrap();
        assert_eq!(topics.len(), 1);
        assert!(!topics[0].completed());
    }

    #[tokio::test]
    async fn update_missing_topic_is_not_found() {
        let repo = InMemoryRepository::new();
        let service = build_service(&repo);

        let err = service
            .update_topic(
                TopicId::random(),
                "UNIT-1".to_string(),
                String::new(),
                None,
            )
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TopicServiceError::Storage(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn update_rejects_empty_name_and_keeps_record() {
        let repo = InMemoryRepository::new();
        let subject_id = seed_subject(&repo).await;
        let service = build_service(&repo);

        let id = service
            .add_topic(
                subject_id,
                "UNIT-1".to_string(),
                "parsing".to_string(),
                None,
            )
            .await
            .unwrap();

        let err = service
            .update_topic(id, "  ".to_string(), "new".to_string(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, TopicServiceError::Topic(_)));

        let topic = service.get_topic(id).await.unwrap().unwrap();
        assert_eq!(topic.name(), "UNIT-1");
        assert_eq!(topic.description(), "parsing");
    }

    #[tokio::test]
    async fn delete_absent_topic_succeeds() {
        let repo = InMemoryRepository::new();
        let service = build_service(&repo);
        service.delete_topic(TopicId::random()).await.unwrap();
    }
}
