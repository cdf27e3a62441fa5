//! Database queries

pub mod job_centre;
