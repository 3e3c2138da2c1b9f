//! URL handling module for Page-Harvest
//!
//! This module provides URL normalization, domain extraction and the
//! registrable-domain comparison that scopes a crawl to one site.

mod domain;
mod normalize;

pub use domain::{extract_domain, registrable_domain, same_site};
pub use normalize::{normalize_parsed, normalize_url};
