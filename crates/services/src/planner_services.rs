use plan_core::Clock;
use storage::repository::Storage;
use tracing::info;

use crate::error::PlannerServicesError;
use crate::progress_service::ProgressService;
use crate::session_service::SessionService;
use crate::subject_service::SubjectService;
use crate::topic_service::TopicService;

/// The full service layer wired onto one storage backend.
///
/// Construct once at startup and hand out clones; every service shares the
/// same repositories, so a cascade issued through one is visible to all.
#[derive(Clone)]
pub struct PlannerServices {
    subjects: SubjectService,
    topics: TopicService,
    sessions: SessionService,
    progress: ProgressService,
}

impl PlannerServices {
    /// Wire the services onto an already-built storage aggregate.
    #[must_use]
    pub fn new(storage: &Storage, clock: Clock) -> Self {
        Self {
            subjects: SubjectService::new(storage.subjects.clone(), storage.cascades.clone()),
            topics: TopicService::new(
                storage.subjects.clone(),
                storage.topics.clone(),
                storage.cascades.clone(),
            ),
            sessions: SessionService::new(
                storage.subjects.clone(),
                storage.topics.clone(),
                storage.sessions.clone(),
            ),
            progress: ProgressService::new(
                storage.subjects.clone(),
                storage.topics.clone(),
                storage.sessions.clone(),
                clock,
            ),
        }
    }

    /// Open (and migrate) a SQLite database, then wire the services onto it.
    ///
    /// # Errors
    ///
    /// Returns `PlannerServicesError::Sqlite` if the database cannot be
    /// opened or migrated.
    pub async fn new_sqlite(
        database_url: &str,
        clock: Clock,
    ) -> Result<Self, PlannerServicesError> {
        let storage = Storage::sqlite(database_url).await?;
        info!(database_url, "planner services ready");
        Ok(Self::new(&storage, clock))
    }

    /// Wire the services onto a fresh in-memory backend. Intended for tests
    /// and throwaway sandboxes; nothing survives the process.
    #[must_use]
    pub fn in_memory(clock: Clock) -> Self {
        Self::new(&Storage::in_memory(), clock)
    }

    #[must_use]
    pub fn subjects(&self) -> &SubjectService {
        &self.subjects
    }

    #[must_use]
    pub fn topics(&self) -> &TopicService {
        &self.topics
    }

    #[must_use]
    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    #[must_use]
    pub fn progress(&self) -> &ProgressService {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::Duration;
    use plan_core::time::{fixed_clock, fixed_now};

    #[tokio::test]
    async fn services_share_one_backend() {
        let services = PlannerServices::in_memory(fixed_clock());

        let subject_id = services
            .subjects()
            .create_subject("Machine Learning".to_string(), fixed_now() + Duration::days(14))
            .await
            .unwrap();
        let topic_id = services
            .topics()
            .add_topic(subject_id, "UNIT-1".to_string(), String::new(), None)
            .await
            .unwrap();
        services
            .sessions()
            .schedule_session(
                subject_id,
                Some(topic_id),
                fixed_now(),
                fixed_now() + Duration::minutes(50),
            )
            .await
            .unwrap();

        services.topics().set_completed(topic_id, true).await.unwrap();
        let progress = services.progress().subject_progress(subject_id).await.unwrap();
        assert_eq!(progress.percentage, 100);
        assert_eq!(services.progress().weekly_minutes().await.unwrap(), 50);
    }

    #[tokio::test]
    async fn deleting_a_subject_clears_dependents_everywhere() {
        let services = PlannerServices::in_memory(fixed_clock());

        let subject_id = services
            .subjects()
            .create_subject("Networks".to_string(), fixed_now() + Duration::days(7))
            .await
            .unwrap();
        let topic_id = services
            .topics()
            .add_topic(subject_id, "UNIT-1".to_string(), String::new(), None)
            .await
            .unwrap();
        services
            .sessions()
            .schedule_session(
                subject_id,
                Some(topic_id),
                fixed_now(),
                fixed_now() + Duration::hours(1),
            )
            .await
            .unwrap();

        services.subjects().delete_subject(subject_id).await.unwrap();

        assert!(services.subjects().list_subjects().await.unwrap().is_empty());
        assert!(services.topics().list_topics().await.unwrap().is_empty());
        assert!(services.sessions().list_sessions().await.unwrap().is_empty());
    }
}
