// ============================================================================
// SERVICES MODULE - API communication and request bookkeeping only
// ============================================================================

pub mod api_client;
pub mod http;
pub mod in_flight;
pub mod request_tracker;

#[cfg(test)]
pub mod testing;

pub use api_client::ApiClient;
pub use http::{ApiRequest, ApiResponse, GlooTransport, HttpTransport, Method};
pub use in_flight::{InFlight, InFlightGuard};
pub use request_tracker::{RequestTracker, Ticket};
