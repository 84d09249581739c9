//! Core library for the `httpbench` CLI.
//!
//! This crate provides the internal building blocks used by the binary:
//! benchmark configuration, the request-execution backend contract and its
//! reference implementations, the dual-discipline benchmark engine, the
//! statistics reducer, and the background resource sampler. The primary
//! user-facing interface is the `httpbench` command-line application;
//! library APIs may evolve as the CLI grows.
pub mod args;
pub mod bench;
pub mod client;
pub mod config;
pub mod entry;
pub mod error;
pub mod logger;
pub mod metrics;
pub mod system;
