use plan_core::model::{SubjectId, TopicId};
use tracing::debug;

use super::SqliteRepository;
use crate::repository::{CascadeRepository, StorageError};

fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

/// Cascades run children-first inside one transaction, so no committed state
/// can hold a topic or session pointing at a deleted subject.
#[async_trait::async_trait]
impl CascadeRepository for SqliteRepository {
    async fn delete_subject(&self, id: SubjectId) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let raw = id.to_string();

        let sessions = sqlx::query("DELETE FROM study_sessions WHERE subject_id = ?1")
            .bind(&raw)
            .execute(&mut *tx)
            .await
            .map_err(conn)?
            .rows_affected();
        let topics = sqlx::query("DELETE FROM topics WHERE subject_id = ?1")
            .bind(&raw)
            .execute(&mut *tx)
            .await
            .map_err(conn)?
            .rows_affected();
        sqlx::query("DELETE FROM subjects WHERE id = ?1")
            .bind(&raw)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        debug!(subject_id = %id, topics, sessions, "deleted subject cascade");
        Ok(())
    }

    async fn delete_topic(&self, id: TopicId) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;
        let raw = id.to_string();

        let sessions = sqlx::query("DELETE FROM study_sessions WHERE topic_id = ?1")
            .bind(&raw)
            .execute(&mut *tx)
            .await
            .map_err(conn)?
            .rows_affected();
        sqlx::query("DELETE FROM topics WHERE id = ?1")
            .bind(&raw)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        tx.commit().await.map_err(conn)?;
        debug!(topic_id = %id, sessions, "deleted topic cascade");
        Ok(())
    }
}
