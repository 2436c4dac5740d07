//! firstpatch - Suggest good first contributions for GitHub repositories
//!
//! Fetches repository metadata from the GitHub REST API, asks an
//! OpenAI-compatible chat model for beginner-friendly contribution ideas, and
//! normalizes the reply into structured suggestions. Served over HTTP with a
//! small browser UI, or run once from the command line.

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod llm;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod server;
pub mod util;
