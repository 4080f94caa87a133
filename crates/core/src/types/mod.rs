//! Core types for the postcard service.

pub mod email;
pub mod order;

pub use email::{Email, EmailError};
pub use order::{Order, OrderError, PostcardAssets, Recipient, Sender};
