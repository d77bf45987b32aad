//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Validate caller input before it reaches SQL.

pub mod content_service;
pub mod taxonomy_service;
