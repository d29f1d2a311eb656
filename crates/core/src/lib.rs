//! Flat `${name}` substitution over text templates.
//!
//! Load a template and a key/value mapping, replace every placeholder the
//! mapping knows about, and write the result.

pub mod error;
pub mod output;
pub mod subst;
pub mod template;
pub mod values;

pub use {
    error::{InputKind, Result, SubstError},
    output::{Destination, write_output},
    subst::{Placeholder, Placeholders, placeholders, substitute, substitute_str, unresolved},
    template::load_template,
    values::{ValuesError, ValuesFormat, Variables, load_values, parse_values},
};
