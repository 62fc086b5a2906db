//! Water invoicing domain module.
//!
//! This crate contains the water-service invoice and its lifecycle rules,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).
//! The current date/instant is always passed in by the caller.

pub mod invoice;
pub mod status;

pub use invoice::{Invoice, InvoiceSnapshot, NewInvoice};
pub use status::InvoiceStatus;
