//! Operational batch scripts for the TechnoFlash CMS.

pub mod config;
pub mod icons;
pub mod logging;
pub mod sitecheck;
