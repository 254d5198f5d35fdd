//! Application services for the study planner.
//!
//! Each service wraps the repository traits from the storage crate and
//! enforces the rules the models cannot see on their own: parent existence
//! checks, session conflict detection, and cascading deletes. Wire the whole
//! layer at once with [`PlannerServices`].

#![forbid(unsafe_code)]

pub mod error;
pub mod planner_services;
pub mod progress_service;
pub mod session_service;
pub mod subject_service;
pub mod topic_service;

pub use error::{
    PlannerServicesError, ProgressServiceError, SessionServiceError, SubjectServiceError,
    TopicServiceError,
};
pub use plan_core::Clock;
pub use planner_services::PlannerServices;
pub use progress_service::{ProgressService, SubjectProgress};
pub use session_service::SessionService;
pub use subject_service::SubjectService;
pub use topic_service::TopicService;
