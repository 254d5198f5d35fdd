use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::SubjectId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SubjectError {
    #[error("subject name cannot be empty")]
    EmptyName,
}

//
// ─── SUBJECT ───────────────────────────────────────────────────────────────────
//

/// A course of study with a scheduled exam.
///
/// Subjects own their topics and study sessions; deleting a subject removes
/// both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    id: SubjectId,
    name: String,
    exam_date: DateTime<Utc>,
}

impl Subject {
    /// Creates a new Subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if name is empty or whitespace-only.
    pub fn new(
        id: SubjectId,
        name: impl Into<String>,
        exam_date: DateTime<Utc>,
    ) -> Result<Self, SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }

        Ok(Self {
            id,
            name: name.trim().to_owned(),
            exam_date,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> SubjectId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn exam_date(&self) -> DateTime<Utc> {
        self.exam_date
    }

    /// Renames the subject.
    ///
    /// # Errors
    ///
    /// Returns `SubjectError::EmptyName` if the new name is empty or
    /// whitespace-only.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), SubjectError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SubjectError::EmptyName);
        }
        self.name = name.trim().to_owned();
        Ok(())
    }

    /// Moves the exam to a new date.
    pub fn reschedule(&mut self, exam_date: DateTime<Utc>) {
        self.exam_date = exam_date;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn subject_new_rejects_empty_name() {
        let err = Subject::new(SubjectId::random(), "   ", fixed_now()).unwrap_err();
        assert_eq!(err, SubjectError::EmptyName);
    }

    #[test]
    fn subject_new_happy_path() {
        let id = SubjectId::random();
        let subject = Subject::new(id, "Machine Learning (CS-601)", fixed_now()).unwrap();

        assert_eq!(subject.id(), id);
        assert_eq!(subject.name(), "Machine Learning (CS-601)");
        assert_eq!(subject.exam_date(), fixed_now());
    }

    #[test]
    fn subject_trims_name() {
        let subject = Subject::new(SubjectId::random(), "  Compiler Design  ", fixed_now()).unwrap();
        assert_eq!(subject.name(), "Compiler Design");
    }

    #[test]
    fn rename_rejects_empty_name_and_keeps_old_one() {
        let mut subject = Subject::new(SubjectId::random(), "Networks", fixed_now()).unwrap();
        let err = subject.rename("  ").unwrap_err();
        assert_eq!(err, SubjectError::EmptyName);
        assert_eq!(subject.name(), "Networks");
    }

    #[test]
    fn reschedule_moves_exam_date() {
        let mut subject = Subject::new(SubjectId::random(), "Networks", fixed_now()).unwrap();
        let later = fixed_now() + chrono::Duration::days(14);
        subject.reschedule(later);
        assert_eq!(subject.exam_date(), later);
    }
}
