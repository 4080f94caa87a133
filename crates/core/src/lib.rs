//! Postcard Core - Shared types library.
//!
//! This crate provides the domain types used by the postcard service:
//! - `api` - HTTP service that verifies and submits postcard orders
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. Orders are ephemeral values: they exist for the duration of one
//! request and are never persisted.
//!
//! # Modules
//!
//! - [`types`] - `Email` newtype plus the order model (`Sender`, `Recipient`,
//!   `PostcardAssets`, `Order`)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
