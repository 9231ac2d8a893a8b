//! # Caravel Server Library
//!
//! Wiring and startup utilities for the Caravel contact proxy binary.

pub mod app;
pub mod startup;
