use crate::obj::Kind;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RuntimeError {
    #[error("hash was modified during iteration")]
    HashModified,
    #[error("cannot convert {0}")]
    Conversion(String),
    #[error("handle is already released")]
    ReleasedHandle,
    #[error("expected {expected} but got {got}")]
    WrongKind { expected: Kind, got: Kind },
}
