//! # nl-search
//!
//! A Rust web service that turns a free-text astronomy search request into
//! structured queries in a `field:value` search grammar (`abs:`, `author:`,
//! `object:`, `pubdate:`, `citation_count:`) with derived operators such as
//! `trending()` and `citations()`.
//!
//! ## Architecture
//!
//! One request flows through a fixed, sequential pipeline:
//!
//! ```text
//!                        ┌──────────────────┐
//!                        │  Free-text query │
//!                        └────────┬─────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Primary pipeline (≤2000 ms) │──fail──┐
//!                  └──────────────┬──────────────┘        ▼
//!                                 │             ┌───────────────────┐
//!                                 │             │ Secondary chat LLM │
//!                                 │             └─────────┬─────────┘
//!                                 ▼                       │
//!                  ┌─────────────────────────────┐        │
//!                  │ Constraint validate/correct │◄───────┘
//!                  └──────────────┬──────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Operator heuristics         │ (secondary only)
//!                  └──────────────┬──────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Author autocomplete (200ms) │──► author cache
//!                  └──────────────┬──────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Object aliases (100ms)      │──► object cache
//!                  └──────────────┬──────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Synonym expansion           │
//!                  └──────────────┬──────────────┘
//!                                 ▼
//!                  ┌─────────────────────────────┐
//!                  │ Query variations (≤5)       │
//!                  └─────────────────────────────┘
//! ```
//!
//! Only total inference failure aborts a request. Every other outbound call
//! degrades its stage to a no-op on error or timeout.
//!
//! ## Module Overview
//!
//! - [`config`] - Environment-based configuration for backends, lookups and caches
//! - [`models`] - Request/response types, corrections and suggestions
//! - [`error`] - `ApiError` and its `{query:"", error}` JSON rendering
//! - [`cache`] - Bounded TTL cache with an injectable clock
//! - [`query`] - Field-expression scanning and span-based rewriting
//! - [`llm`] - Primary/secondary inference backends and the fallback combinator
//! - [`lookup`] - Author autocomplete and object identifier clients
//! - [`constraints`] - Enumerated-field validation and correction
//! - [`enrich`] - Operator, author, object and synonym stages plus variations
//! - [`translate`] - The request pipeline tying the stages together
//! - [`api`] - Axum router and handlers
//! - [`state`] - Shared application state

pub mod api;
pub mod cache;
pub mod config;
pub mod constraints;
pub mod enrich;
pub mod error;
pub mod llm;
pub mod lookup;
pub mod models;
pub mod query;
pub mod state;
pub mod translate;
