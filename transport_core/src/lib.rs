//! Core rust implementation of transport.rs, a crate for modeling and solving
//! transportation problems.

pub mod io;
pub mod optimize;
pub mod transport;
mod configuration;
