use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use plan_core::model::{Subject, SubjectId};
use storage::repository::{CascadeRepository, StorageError, SubjectRepository};

use crate::error::SubjectServiceError;

/// Orchestrates subject creation, edits, and cascading deletion.
#[derive(Clone)]
pub struct SubjectService {
    subjects: Arc<dyn SubjectRepository>,
    cascades: Arc<dyn CascadeRepository>,
}

impl SubjectService {
    #[must_use]
    pub fn new(subjects: Arc<dyn SubjectRepository>, cascades: Arc<dyn CascadeRepository>) -> Self {
        Self { subjects, cascades }
    }

    /// Create a subject with a fresh id and persist it.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Subject` for validation failures.
    /// Returns `SubjectServiceError::Storage` if persistence fails.
    pub async fn create_subject(
        &self,
        name: String,
        exam_date: DateTime<Utc>,
    ) -> Result<SubjectId, SubjectServiceError> {
        let subject = Subject::new(SubjectId::random(), name, exam_date)?;
        self.subjects.upsert_subject(&subject).await?;
        debug!(subject_id = %subject.id(), "created subject");
        Ok(subject.id())
    }

    /// Fetch a subject by ID.
    ///
    /// Returns `Ok(None)` when the subject does not exist.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Storage` if repository access fails.
    pub async fn get_subject(
        &self,
        id: SubjectId,
    ) -> Result<Option<Subject>, SubjectServiceError> {
        let subject = self.subjects.get_subject(id).await?;
        Ok(subject)
    }

    /// List all subjects.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Storage` if repository access fails.
    pub async fn list_subjects(&self) -> Result<Vec<Subject>, SubjectServiceError> {
        let subjects = self.subjects.list_subjects().await?;
        Ok(subjects)
    }

    /// Rename a subject while preserving its exam date.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Subject` if validation fails.
    /// Returns `SubjectServiceError::Storage` if the subject is missing or
    /// repository access fails.
    pub async fn rename_subject(
        &self,
        id: SubjectId,
        name: String,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self
            .subjects
            .get_subject(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        subject.rename(name)?;
        self.subjects.upsert_subject(&subject).await?;
        Ok(())
    }

    /// Move a subject's exam to a new date.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Storage` if the subject is missing or
    /// repository access fails.
    pub async fn reschedule_exam(
        &self,
        id: SubjectId,
        exam_date: DateTime<Utc>,
    ) -> Result<(), SubjectServiceError> {
        let mut subject = self
            .subjects
            .get_subject(id)
            .await?
            .ok_or(StorageError::NotFound)?;
        subject.reschedule(exam_date);
        self.subjects.upsert_subject(&subject).await?;
        Ok(())
    }

    /// Delete a subject together with its topics and study sessions.
    ///
    /// Deleting an absent subject succeeds.
    ///
    /// # Errors
    ///
    /// Returns `SubjectServiceError::Storage` if repository access fails.
    pub async fn delete_subject(&self, id: SubjectId) -> Result<(), SubjectServiceError> {
        self.cascades.delete_subject(id).await?;
        Ok(())
    }
}
