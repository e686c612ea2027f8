mod decl;
mod location;
pub mod names;
mod token;
pub use crate::decl::*;
pub use crate::location::{Location, LocationSpan};
pub use crate::token::Token;
