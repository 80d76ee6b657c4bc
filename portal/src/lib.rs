//! Student portal core.
//!
//! Two independent state containers back the portal views: the session store
//! (identity registration, login, logout, session restoration) and the course
//! selection store (cart toggling and atomic promotion to enrollment). Both are
//! owned by an explicitly constructed [`PortalContext`] rather than globals.

pub mod config;
pub mod context;
pub mod domain;
pub mod outbound;

pub use context::PortalContext;
