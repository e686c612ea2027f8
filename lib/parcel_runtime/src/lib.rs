//! Refcounted runtime objects used by generated bindings: strings, numbers,
//! `Vector`, `Hash` and `HashIterator`, plus the bridge to host values and
//! the C functions the generated code links against.
//!
//! Objects are `Rc`-based and must stay on one thread.
mod error;
pub mod ffi;
mod hash;
mod hash_iterator;
pub mod host;
mod obj;
mod vector;
pub use crate::error::RuntimeError;
pub use crate::hash::Hash;
pub use crate::hash_iterator::HashIterator;
pub use crate::host::{to_host, to_native, HostHandle, HostValue};
pub use crate::obj::{value_equals, Kind, Obj, ObjBody, Value};
pub use crate::vector::Vector;
