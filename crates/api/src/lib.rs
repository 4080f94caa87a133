//! Postcard API - HTTP service for sending printed postcards.
//!
//! Collects sender/recipient data and two pre-rendered images, verifies a
//! human-interaction proof, submits the order to the ZAP~POST print-and-mail
//! API, and emails a confirmation via SendGrid. A deferred variant drives
//! the same submission from a signed token carried in an email link.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod test_server;
