use plan_core::model::{SubjectId, Topic, TopicId};

use super::SqliteRepository;
use super::mapping::{flag_to_i64, map_topic_row};
use crate::repository::{StorageError, TopicRepository};

#[async_trait::async_trait]
impl TopicRepository for SqliteRepository {
    async fn upsert_topic(&self, topic: &Topic) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO topics (id, subject_id, name, description, completed, goal_date)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                subject_id = excluded.subject_id,
                name = excluded.name,
                description = excluded.description,
                completed = excluded.completed,
                goal_date = excluded.goal_date
            ",
        )
        .bind(topic.id().to_string())
        .bind(topic.subject_id().to_string())
        .bind(topic.name())
        .bind(topic.description())
        .bind(flag_to_i64(topic.completed()))
        .bind(topic.goal_date())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_topic(&self, id: TopicId) -> Result<Option<Topic>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, subject_id, name, description, completed, goal_date
            FROM topics WHERE id = ?1
            ",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        match row {
            Some(row) => map_topic_row(&row).map(Some),
            None => Ok(None),
        }
    }

    async fn topics_for_subject(&self, subject_id: SubjectId) -> Result<Vec<Topic>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject_id, name, description, completed, goal_date
            FROM topics WHERE subject_id = ?1
            ",
        )
        .bind(subject_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_topic_row).collect()
    }

    async fn list_topics(&self) -> Result<Vec<Topic>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, subject_id, name, description, completed, goal_date
            FROM topics
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_topic_row).collect()
    }
}
