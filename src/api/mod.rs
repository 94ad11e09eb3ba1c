//! Thin client for the knowledge-base REST backend.

mod client;
pub mod network;

pub use network::{GraphFilter, fetch_graph};
