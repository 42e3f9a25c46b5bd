//! Password helpers used around the vault core.
//!
//! This module provides:
//! - Random password generation (`generator`)
//! - Heuristic strength scoring (`strength`)
//! - Pwned Passwords breach lookup (`breach`)
//! - Credential annotations combining the two (`annotate`)

pub mod annotate;
pub mod breach;
pub mod generator;
pub mod strength;

pub use annotate::{Annotation, Annotator, StrengthAnnotator};
pub use breach::{default_checker, BreachChecker, BreachStatus, OfflineChecker};
pub use generator::generate_password;
pub use strength::{analyse_strength, Rating, StrengthReport};
