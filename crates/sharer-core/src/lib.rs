//! Core types and business logic for the sharer service.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement the capability traits in [`store`]; the services in
//! [`service`] depend only on those traits.

pub mod category;
pub mod error;
pub mod memory;
pub mod page;
pub mod pagination;
pub mod service;
pub mod slug;
pub mod store;
pub mod title;

pub use error::{Error, Result};
