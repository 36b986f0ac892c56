//! Directory, blog and SEO core for the ADHD NSW website.
//!
//! The store is injected as `Arc<S: RecordStore>`; services build declarative
//! queries against it, decode rows into typed entities and hand them to the
//! page composers, which attach metadata for rendering.

pub mod analytics;
pub mod blog;
pub mod config;
pub mod content;
pub mod directory;
pub mod error;
pub mod feeds;
pub mod pages;
pub mod pagination;
pub mod seo;
pub mod store;
pub mod telemetry;
