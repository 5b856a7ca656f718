// Library target for the integration tests and criterion benchmarks.
// The binary entry point is main.rs; this file re-declares the module tree so
// that tests can drive `mathdash::session::*` and `mathdash::engine::*` directly.
// Most UI code is only exercised through the binary, so suppress dead_code warnings.
#![allow(dead_code)]

// Public: used by tests/ and benches/
pub mod config;
pub mod engine;
pub mod generator;
pub mod session;
pub mod store;

// Private: required transitively (config and app reach into the UI)
mod app;
mod event;
mod ui;
