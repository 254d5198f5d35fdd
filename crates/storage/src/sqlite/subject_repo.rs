use plan_core::model::{Subject, SubjectId};

use super::SqliteRepository;
use super::mapping::map_subject_row;
use crate::repository::{StorageError, SubjectRepository};

#[async_trait::async_trait]
impl SubjectRepository for SqliteRepository {
    async fn upsert_subject(&self, subject: &Subject) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO subjects (id, name, exam_date)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                exam_date = excluded.exam_date
            ",
        )
        .bind(subject.id().to_string())
        .bind(subject.name())
        .bind(subject.exam_date())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_subject(&self, id: SubjectId) -> Result<Option<Subject>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, name, exam_date
            FROM subjects WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_subject_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn list_subjects(&self) -> Result<Vec<Subject>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, name, exam_date
            FROM subjects
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_subject_row).collect()
    }
}
