//! Core module containing the country model, errors and lifecycle rules

pub mod country;
pub mod error;
pub mod repository;
pub mod store;

pub use country::{Country, CountryPatch, NewCountry, Visibility};
pub use error::{ApiError, ApiResult};
pub use repository::{CountryRepository, RepositoryConfig};
pub use store::{CountryStore, DeleteOutcome};
