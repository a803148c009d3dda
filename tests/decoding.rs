//! Decoding integration tests.
//!
//! - Dispatcher framing: payload tables, chunk boundaries, padding, errors
//! - Scenarios: end-to-end byte streams with known expected snapshots
//! - Derived fields: invulnerability, moonwalk, off-stage, action frame indexing
//! - Menus: menu snapshots through a session

// Shared test infrastructure
#[path = "common/mod.rs"]
mod common;

mod decoding {
    pub mod derived;
    pub mod dispatcher;
    pub mod menu;
    pub mod scenarios;
    pub mod zero_index;
}
