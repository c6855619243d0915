//! Client Module
//!
//! Cache-aside HTTP client: serve from the cache when possible, otherwise
//! fetch from the origin and populate the cache. Typed helpers decode the
//! location-area resources.

mod fetch;
mod models;

pub use fetch::CachedClient;
pub use models::{LocationArea, LocationAreaPage, NamedResource, PokemonEncounter};
