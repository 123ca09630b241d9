//! # Changelist Testkit
//!
//! Testing utilities for the changelist.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: a scratch directory with a changelist wired to a
//!   controllable clock and a recording diagnostics sink
//! - **Clocks**: [`FixedClock`] and [`SteppingClock`] for deterministic keys
//! - **Generators**: proptest strategies for change records
//!
//! ## Test Fixtures
//!
//! ```rust
//! use changelist_store::Changelist;
//! use changelist_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.changelist.add(&fixture.make_change("app.tgz")).unwrap();
//! assert_eq!(fixture.changelist.list().len(), 1);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use changelist_testkit::generators::tuf_change;
//!
//! proptest! {
//!     #[test]
//!     fn survives_storage(change in tuf_change()) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{FixedClock, RecordingDiagnostics, SteppingClock, TestFixture};
pub use generators::{change_action, tuf_change};
