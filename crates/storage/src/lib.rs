//! Storage layer for the study planner: repository traits, an in-memory
//! backend for tests, and the SQLite backend used by the app.

#![forbid(unsafe_code)]

pub mod repository;
pub mod seed;
pub mod sqlite;
