//! Domain identifiers.
//!
//! Record ids are assigned by the store on creation and never change
//! afterwards. The processor only ever reads them, so a plain `u64`
//! newtype is enough; the wrapper keeps ids from being mixed up with
//! counters and sizes in signatures.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a stored record.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }

    /// The id following this one (store-side allocation).
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_prefix() {
        assert_eq!(RecordId::new(42).to_string(), "record-42");
    }

    #[test]
    fn serializes_as_bare_number() {
        let s = serde_json::to_string(&RecordId::new(7)).unwrap();
        assert_eq!(s, "7");

        let back: RecordId = serde_json::from_str("7").unwrap();
        assert_eq!(back, RecordId::new(7));
    }

    #[test]
    fn ids_order_numerically() {
        let a = RecordId::new(2);
        let b = a.next();
        assert!(a < b);
        assert_eq!(b.get(), 3);
    }
}
