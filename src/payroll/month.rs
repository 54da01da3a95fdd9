use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};

use crate::error::PayrollError;

/// First day of the calendar month `date` falls in.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

/// Parses a payment month and normalises it to the first of the month.
///
/// Accepts `YYYY-MM` (what a month picker sends), `YYYY-MM-DD` and full
/// `YYYY-MM-DDTHH:MM:SS` timestamps.
pub fn parse_month(input: &str) -> Result<NaiveDate, PayrollError> {
    let input = input.trim();

    let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{input}-01"), "%Y-%m-%d"))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date())
        })
        .or_else(|_| {
            // e.g. 2025-01-01T00:00:00.000Z
            input
                .split_once('T')
                .ok_or(())
                .and_then(|(day, _)| NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| ()))
        })
        .map_err(|_| {
            PayrollError::validation(format!(
                "Invalid month '{input}', expected YYYY-MM or YYYY-MM-DD"
            ))
        })?;

    Ok(first_of_month(date))
}

/// Parses a plain calendar date such as a hire date.
pub fn parse_date(field: &str, input: &str) -> Result<NaiveDate, PayrollError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| {
            input
                .split_once('T')
                .map(|(day, _)| day)
                .ok_or(())
                .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|_| ()))
        })
        .map_err(|_| {
            PayrollError::validation(format!("Invalid {field} '{input}', expected YYYY-MM-DD"))
        })
}
