//! Domain logic for the arcana reading flows.
//!
//! Everything in this crate is pure: wizard steps, session records,
//! validation rules, the tarot deck and spread catalog, snapshot
//! (de)serialization for the payment metadata contract, prompt assembly
//! and the result-markup model. HTTP handlers and the external clients
//! (payment gateway, text generation, geocoding) live in sibling crates.

pub mod analysis;
pub mod deck;
pub mod error;
pub mod markup;
pub mod prompt;
pub mod session;
pub mod snapshot;
pub mod spread;
pub mod step;
pub mod styles;
pub mod tier;
pub mod validate;
