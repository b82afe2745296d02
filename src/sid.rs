//! Stable section identifiers (SIDs).
//!
//! A SID is a path such as `/getting-started/install`: one slug per ancestor heading followed
//! by the section's own slug. The generator and the validator share a single character class,
//! so every identifier the generator emits is accepted by the validator as is.
//!
//! ```text
//! sid     = 1*( "/" segment )
//! segment = 1*C *( "-" 1*C )
//! C       = lowercase or uncased letter | modifier letter | mark | decimal digit | "_"
//! ```

mod generator;
mod validator;

pub use generator::{compose, slugify, SidGenerator};
pub use validator::{is_valid_sid, validate_sid, SidValidation};

/// Regex class body for the characters allowed in a segment apart from the hyphen.
pub(crate) const SEGMENT_CHARS: &str = r"\p{Ll}\p{Lm}\p{Lo}\p{M}\p{Nd}_";
