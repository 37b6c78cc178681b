/*
[INPUT]:  Calendar date (local day/month/year)
[OUTPUT]: Reproducible day token string
[POS]:    Auth layer - low-security gate for tenant validation
[UPDATE]: When the backend token algorithm is confirmed
*/

use chrono::{Datelike, Local, NaiveDate};

/// Build the day token for a calendar date.
///
/// Format: `D{day}M{month}Y{year}-TOKEN`, without zero padding. This is not a
/// credential; it only gates the tenant validation endpoint and must be
/// confirmed against the backend before it is treated as final.
pub fn build_day_token(date: NaiveDate) -> String {
    format!("D{}M{}Y{}-TOKEN", date.day(), date.month(), date.year())
}

/// Day token for the current local date
pub fn today_token() -> String {
    build_day_token(Local::now().date_naive())
}
