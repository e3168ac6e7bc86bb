//! Shared domain types and storage layer for the TechnoFlash CMS.

pub mod domain;
pub mod error;
pub mod maintenance;
pub mod storage;

#[cfg(feature = "db")]
pub mod database;

pub use error::{CmsError, Result};
