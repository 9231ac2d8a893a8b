//! # Caravel Core
//!
//! Core types, traits, and error definitions for the Caravel contact proxy.
//! This crate provides the response abstraction, the contact record and its
//! codec, and the request context threaded through every data-layer call.

pub mod codec;
pub mod contact;
pub mod context;
pub mod error;
pub mod headers;
pub mod response;
pub mod result;

pub use codec::*;
pub use contact::*;
pub use context::*;
pub use error::*;
pub use response::*;
pub use result::*;
