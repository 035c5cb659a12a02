//! Client-side session, access control and dashboard projections for the
//! assignment portal backend.

pub mod adapters;
pub mod app;
pub mod config;
pub mod error;
