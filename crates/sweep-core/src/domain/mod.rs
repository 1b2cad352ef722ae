//! Domain model (ids, records, outcomes, pool state, errors).

pub mod errors;
pub mod ids;
pub mod outcome;
pub mod record;
pub mod state;

pub use self::errors::{DispatchError, PoolError, ServiceError, StoreError};
pub use self::ids::RecordId;
pub use self::outcome::{FailureReason, ItemOutcome, OutcomeKind};
pub use self::record::{NewRecord, Record, STATUS_NEW, STATUS_PROCESSED};
pub use self::state::PoolState;
