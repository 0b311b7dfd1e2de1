//! HTTP server for the Landing Hub backend: the public landing-page
//! surface, the bearer-guarded admin surface, and the WhatsApp broadcast
//! endpoints. The binary in `main.rs` wires this up; tests build the same
//! router against a throwaway state.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;
