//! Application services for the administrative surface.

pub mod authors;
pub mod chrome;
pub mod dashboard;
pub mod posts;
