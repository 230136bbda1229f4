//! Enrichment stages applied to the raw model query, in pipeline order:
//! operators (secondary backend only), authors, objects, synonyms, then
//! variation generation.

pub mod authors;
pub mod catalog;
pub mod objects;
pub mod operators;
pub mod synonyms;
pub mod variations;
