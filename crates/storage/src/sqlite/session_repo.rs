use plan_core::model::{SessionId, StudySession, SubjectId, TopicId};

use super::SqliteRepository;
use super::mapping::{flag_to_i64, map_session_row};
use crate::repository::{SessionRepository, StorageError};

#[async_trait::async_trait]
impl SessionRepository for SqliteRepository {
    async fn upsert_session(&self, session: &StudySession) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO study_sessions (id, subject_id, topic_id, start_time, end_time, completed)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                subject_id = excluded.subject_id,
                topic_id = excluded.topic_id,
                start_time = excluded.start_time,
                end_time = excluded.end_time,
                completed = excluded.completed
            ",
        )
        .bind(session.id().to_string())
        .bind(session.subject_id().to_string())
        .bind(session.topic_id().map(|id| id.to_string()))
        .bind(session.start_time())
        .bind(session.end_time())
        .bind(flag_to_i64(session.completed()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_session(&self, id: SessionId) -> Result<Option<StudySession>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, subject_id, topic_id, start_time, end_time, completed
            FROM study_sessions WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_session_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn sessions_for_subject(
        &self,
        subject_id: SubjectId,
    ) -> Result<Vec<StudySession>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject_id, topic_id, start_time, end_time, completed
            FROM study_sessions WHERE subject_id = ?1
            ",
        )
        .bind(subject_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_session_row).collect()
    }

    async fn sessions_for_topic(
        &self,
        topic_id: TopicId,
    ) -> Result<Vec<StudySession>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject_id, topic_id, start_time, end_time, completed
            FROM study_sessions WHERE topic_id = ?1
            ",
        )
        .bind(topic_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_session_row).collect()
    }

    async fn list_sessions(&self) -> Result<Vec<StudySession>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject_id, topic_id, start_time, end_time, completed
            FROM study_sessions
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_session_row).collect()
    }

    async fn delete_session(&self, id: SessionId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM study_sessions WHERE id = ?1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}
