//! # Changelist Core
//!
//! Pure primitives for the changelist: change records, ordering keys, and
//! the record encoding.
//!
//! This crate contains no I/O. Persistence lives in `changelist-store`.
//!
//! ## Key Types
//!
//! - [`Change`] - Capability set every stored record exposes
//! - [`TufChange`] - The concrete record staged against trust metadata
//! - [`ChangeAction`] - `create`, `update` or `delete`
//! - [`OrderingKey`] - Unique, time-sortable identifier for a stored record
//! - [`KeyGenerator`] - Produces ordering keys from a [`Clock`]
//!
//! ## Encoding
//!
//! Records are stored as JSON objects. See the [`codec`] module.

pub mod change;
pub mod codec;
pub mod error;
pub mod key;

pub use change::{Change, ChangeAction, TufChange};
pub use codec::{decode_change, encode_change};
pub use error::{CoreError, Result};
pub use key::{Clock, KeyGenerator, OrderingKey, SystemClock, SUFFIX_LEN, TIMESTAMP_WIDTH};
