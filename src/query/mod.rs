pub mod grammar;
pub mod rewrite;

pub use grammar::{field_expressions, or_list, quote_term, Field, FieldExpr, ValueKind};
pub use rewrite::{apply_rewrites, Rewrite};
