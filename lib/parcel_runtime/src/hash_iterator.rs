use crate::error::RuntimeError;
use crate::obj::{Obj, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    /// `next` has not been called yet
    Start,
    /// At the entry in this bucket
    At(usize),
    Done,
}

/// Cursor over the entries of a Hash. Holds a reference to the hash.
///
/// The hash must not be modified while iterating; doing so makes every
/// later call fail with `HashModified`.
#[derive(Debug)]
pub struct HashIterator {
    hash: Obj,
    generation: u64,
    position: Position,
}

impl HashIterator {
    pub fn new(hash: Obj) -> Result<HashIterator, RuntimeError> {
        let generation = hash.as_hash()?.borrow().generation();
        Ok(HashIterator {
            hash,
            generation,
            position: Position::Start,
        })
    }

    fn check(&self) -> Result<(), RuntimeError> {
        let hash = self.hash.as_hash()?;
        if hash.borrow().generation() != self.generation {
            return Err(RuntimeError::HashModified);
        }
        Ok(())
    }

    /// Advance to the next entry. Returns false once the entries are
    /// exhausted, and keeps returning false after that.
    pub fn next(&mut self) -> Result<bool, RuntimeError> {
        self.check()?;
        let from = match self.position {
            Position::Start => 0,
            Position::At(i) => i + 1,
            Position::Done => return Ok(false),
        };
        let found = self.hash.as_hash()?.borrow().entry_from(from).map(|(i, _, _)| i);
        match found {
            Some(i) => {
                self.position = Position::At(i);
                Ok(true)
            }
            None => {
                self.position = Position::Done;
                Ok(false)
            }
        }
    }

    /// Key of the current entry, if any
    pub fn get_key(&self) -> Result<Option<Obj>, RuntimeError> {
        Ok(self.current()?.map(|(k, _)| k))
    }

    /// Value of the current entry, if any. `Some(None)` is the sentinel.
    pub fn get_value(&self) -> Result<Option<Value>, RuntimeError> {
        Ok(self.current()?.map(|(_, v)| v))
    }

    fn current(&self) -> Result<Option<(Obj, Value)>, RuntimeError> {
        self.check()?;
        let Position::At(i) = self.position else {
            return Ok(None);
        };
        let hash = self.hash.as_hash()?.borrow();
        let entry = hash
            .entry_from(i)
            .filter(|(found, _, _)| *found == i)
            .map(|(_, k, v)| (k.clone(), v.clone()));
        Ok(entry)
    }
}
