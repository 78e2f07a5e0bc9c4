//! Backlog Wiki integration for bw.
//!
//! This crate provides:
//! - [`BacklogClient`]: REST API v2 client authenticated with an API key
//! - [`WikiStore`]: the seam the upload pipeline talks to
//! - [`WikiUploader`](uploader::WikiUploader): Markdown upload workflow with
//!   image and diagram attachments
//! - [`MockWikiStore`] for testing (behind `mock` feature flag)
//!
//! # API Client
//!
//! ```ignore
//! use bw_backlog::{BacklogClient, WikiStore};
//!
//! let client = BacklogClient::new("https://myspace.backlog.jp", "api-key");
//! let pages = client.list_pages("PROJ")?;
//! println!("{} pages", pages.len());
//! ```

// API client
mod client;
pub use client::BacklogClient;

// Store abstraction
mod store;
pub use store::WikiStore;

#[cfg(any(test, feature = "mock"))]
mod mock;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockWikiStore, PageWrite};

// Types
mod types;
pub use types::{Attachment, LinkedAttachment, Project, Tag, WikiPage, WikiSummary};

// Upload workflow
pub mod uploader;

// Errors
pub mod error;
pub use error::BacklogError;
