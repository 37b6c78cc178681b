/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod gateway;
pub mod session;
pub mod task;
pub mod tenant;

pub use error::{COMMUNICATION_MESSAGE, CollectorError, ErrorKind, Result};
pub use gateway::TaskGateway;
pub use task::TaskEndpoint;

pub use client::{ClientConfig, CollectorClient};
