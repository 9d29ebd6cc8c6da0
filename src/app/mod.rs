//! Command-line application support.
//!
//! Turns parsed [`Opt`](crate::config::Opt) values into request options and
//! renders results for the terminal. The binary stays a thin wrapper around
//! these functions.

mod options;
mod output;

pub use options::build_request_options;
pub use output::{render_error, render_response};
