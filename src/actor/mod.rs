//! Minimal request/response actor plumbing on top of Tokio tasks.
//!
//! An actor is a task owning some state exclusively. Everybody else reaches
//! that state by sending [Request]s through a cloneable [ActorPort].

mod ports;

#[doc(inline)]
pub use ports::*;

#[cfg(test)]
mod test_ports;
