//! Business logic over the storage traits.
//!
//! Services validate input before touching storage, box backend errors into
//! [`crate::Error::Store`], and report missing entities as
//! [`crate::Error::NotFound`].

mod category;
mod page;

pub use category::CategoryService;
pub use page::PageService;
