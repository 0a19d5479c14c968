//! Implementation of the `#[derive(Entity)]` macro.
//!
//! This module generates typed field tokens and the record accessor from a
//! struct definition and its `#[field(...)]` attributes.

mod attrs;
mod derive;

pub use derive::entity_derive_impl;
