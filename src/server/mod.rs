//! HTTP layer: handlers, routes and the server builder

pub mod builder;
pub mod extract;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use extract::{Payload, QueryParams};
pub use handlers::AppState;
pub use router::build_country_routes;
