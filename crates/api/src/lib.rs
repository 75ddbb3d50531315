//! Arcana API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! wizard engine) so integration tests and the binary entrypoint can both
//! access them.

pub mod config;
pub mod error;
pub mod flows;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
