// Library root
// -----------
// This crate exposes the library surface for the `hostgo` CLI. The binary
// (`main.rs`) parses the command line and hands off to `cli::run`.
//
// Module responsibilities:
// - `api`: HTTP transport and the envelope-aware `ApiClient`.
// - `auth`: credential store for the logged-in account.
// - `project`: per-directory `hostgo.yml` binding a checkout to an app.
// - `ops`: one function per platform capability.
// - `artifact`: local `go build` of the deployable binary.
// - `cli` / `ui`: command tree, terminal flows and output.
pub mod api;
pub mod artifact;
pub mod auth;
pub mod cli;
pub mod error;
pub mod ops;
pub mod project;
pub mod types;
pub mod ui;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
