/*
[INPUT]:  Calendar dates
[OUTPUT]: Tenant validation tokens
[POS]:    Auth layer - day token used by the tenant handshake
[UPDATE]: When the backend publishes the real token algorithm
*/

pub mod day_token;

pub use day_token::{build_day_token, today_token};
