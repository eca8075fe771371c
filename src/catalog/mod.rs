//! Catalog query boundary: criteria, cone queries and the backend trait.

pub mod query;
pub mod service;

pub use query::*;
pub use service::search_guide_star_catalogs;
