//! Client library for NeuroLine, a multi-project AI chat platform.
//!
//! Talks to the NeuroLine backend over HTTP and Server-Sent Events: projects
//! and agents are plain CRUD resources, while chat replies arrive as an SSE
//! stream that is folded into a local session state machine.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(non_camel_case_types)]
#![deny(unused_must_use)]
#![deny(nonstandard_style)]
#![forbid(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
#![deny(overflowing_literals)]

/// HTTP repository client for projects, agents, and chat history.
pub mod api;
/// Domain types shared across the crate.
pub mod model;
/// Terminal chat front end.
#[allow(clippy::print_stdout)]
pub mod repl;
/// Session state and the streaming turn state machine.
pub mod session;
/// SSE wire decoding.
pub mod stream;
