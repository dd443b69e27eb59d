//! Common library for the media library application
//!
//! This crate provides shared functionality used by the auth and api
//! services: database connectivity and infrastructure error types.

pub mod database;
pub mod error;
