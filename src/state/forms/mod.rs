//! Form domain layer
//!
//! Field values for the contact form and the rules that validate them.

mod field;
mod validation;

pub use field::{Field, FormInput};
pub use validation::{validate, ValidationErrors};
