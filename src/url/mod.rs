//! URL handling module for Sole-Scout
//!
//! This module provides tracking-parameter stripping, domain extraction, and the
//! helpers the session layer uses to key sessions and derive referers.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, origin_of, session_key};
pub use normalize::{clean_url, is_tracking_param, resolve_link};
