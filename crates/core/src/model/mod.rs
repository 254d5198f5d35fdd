mod ids;
mod session;
mod subject;
mod topic;

pub use ids::{ParseIdError, SessionId, SubjectId, TopicId};
pub use session::{SessionError, StudySession};
pub use subject::{Subject, SubjectError};
pub use topic::{Topic, TopicError};
