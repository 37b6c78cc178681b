/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public collector adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod auth;
pub mod http;
pub mod types;

// Re-export commonly used types from auth
pub use auth::{build_day_token, today_token};

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    CollectorClient,
    CollectorError,
    ErrorKind,
    Result,
    TaskGateway,
};

// Re-export all types
pub use types::*;
