//! Dashboard HTTP layer.
//!
//! Serves the embedded single-page dashboard plus a JSON API that maps
//! control state to chart-ready figure specifications. Routes are
//! nested under `/api/`; the router is composable and can be mounted
//! on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod page;
pub mod router;
pub mod server;
pub mod types;

pub use router::dashboard_router;
pub use server::{start_dashboard_server, start_dashboard_server_on, DashboardServer};
pub use types::ApiContext;
