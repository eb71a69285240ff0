//! # Marquee Core
//!
//! Catalog discovery and favorite/review consistency engine.
//!
//! The engine reconciles a remote, paginated catalog with a per-user
//! favorites and reviews store and a local highlight rotation:
//!
//! - [`query`]: browse-mode state machine with versioned fetch tickets
//! - [`overlay`]: favorite flags merged onto immutable catalog movies
//! - [`reviews`]: user and catalog reviews side by side
//! - [`carousel`]: the rotating highlight window
//! - [`pagination`]: page-button window
//! - [`session`]: screen-scoped owners of all of the above
//!
//! The catalog client and in-memory store live in [`catalog`] and
//! [`store`]; identity plumbing in [`identity`].

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod carousel;
pub mod catalog;
pub mod error;
pub mod identity;
pub mod overlay;
pub mod pagination;
pub mod query;
pub mod reviews;
pub mod session;
pub mod store;
pub mod telemetry;

pub use error::{MarqueeError, Result};
