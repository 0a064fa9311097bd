#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Transport adapter for the RTS reference client.
//!
//! The game server connects to this process and streams one JSON update per
//! line; each [`session::Session`] mirrors the world, runs the decision engine
//! and answers every update with one JSON command batch.

pub mod config;
pub mod protocol;
pub mod server;
pub mod session;
