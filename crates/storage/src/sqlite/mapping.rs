use plan_core::model::{SessionId, StudySession, Subject, SubjectId, Topic, TopicId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn subject_id_from_str(s: &str) -> Result<SubjectId, StorageError> {
    s.parse::<SubjectId>().map_err(ser)
}

pub(crate) fn topic_id_from_str(s: &str) -> Result<TopicId, StorageError> {
    s.parse::<TopicId>().map_err(ser)
}

pub(crate) fn session_id_from_str(s: &str) -> Result<SessionId, StorageError> {
    s.parse::<SessionId>().map_err(ser)
}

pub(crate) fn flag_to_i64(flag: bool) -> i64 {
    i64::from(flag)
}

pub(crate) fn flag_from_i64(value: i64) -> Result<bool, StorageError> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(StorageError::Serialization(format!(
            "invalid completed flag: {other}"
        ))),
    }
}

pub(crate) fn map_subject_row(row: &SqliteRow) -> Result<Subject, StorageError> {
    Subject::new(
        subject_id_from_str(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get("exam_date").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_topic_row(row: &SqliteRow) -> Result<Topic, StorageError> {
    Topic::from_persisted(
        topic_id_from_str(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        subject_id_from_str(row.try_get::<String, _>("subject_id").map_err(ser)?.as_str())?,
        row.try_get::<String, _>("name").map_err(ser)?,
        row.try_get::<String, _>("description").map_err(ser)?,
        flag_from_i64(row.try_get::<i64, _>("completed").map_err(ser)?)?,
        row.try_get("goal_date").map_err(ser)?,
    )
    .map_err(ser)
}

pub(crate) fn map_session_row(row: &SqliteRow) -> Result<StudySession, StorageError> {
    let topic_id = row
        .try_get::<Option<String>, _>("topic_id")
        .map_err(ser)?
        .map(|raw| topic_id_from_str(raw.as_str()))
        .transpose()?;

    StudySession::from_persisted(
        session_id_from_str(row.try_get::<String, _>("id").map_err(ser)?.as_str())?,
        subject_id_from_str(row.try_get::<String, _>("subject_id").map_err(ser)?.as_str())?,
        topic_id,
        row.try_get("start_time").map_err(ser)?,
        row.try_get("end_time").map_err(ser)?,
        flag_from_i64(row.try_get::<i64, _>("completed").map_err(ser)?)?,
    )
    .map_err(ser)
}
