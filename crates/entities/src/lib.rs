//! Core entity definitions for Billfold.
//!
//! This crate defines the data types shared across the Billfold quoting and
//! invoicing engine: the catalog (products and services), customers, line
//! items, quotes, invoices, and the totals calculator. Persistence lives in
//! the `document_store` crate.

mod catalog;
mod customer;
mod error;
mod invoice;
mod line_item;
mod quote;
mod totals;
mod user;

pub use catalog::*;
pub use customer::*;
pub use error::*;
pub use invoice::*;
pub use line_item::*;
pub use quote::*;
pub use totals::*;
pub use user::*;
