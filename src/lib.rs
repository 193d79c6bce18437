//! Jotter: a minimal blog with a public reading surface and a loopback admin.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
