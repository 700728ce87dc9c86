//! Types shared by every screen of the pharmacy back-office console.
//!
//! - `shared::metadata`: entity and field descriptors, declarative validation
//! - `shared::record`: the opaque `Record` mirror and the editable `Draft`
//! - `shared::api`: error taxonomy and wire shapes of the REST backend
//! - `domain`: one descriptor per business entity

pub mod domain;
pub mod shared;
