//! Parsing for the free-text number fields in the app's forms.
//!
//! Amount fields may be left blank, which usually means "leave as is" or "not
//! decided yet" depending on the form, so parsing yields an `Option`.

use std::collections::HashMap;

use crate::{Error, database_id::DatabaseId};

/// Parse an amount typed into a form, treating blank input as `None`.
///
/// # Errors
/// Returns [Error::InvalidAmount] if the text is not a finite number.
pub fn parse_amount(raw: &str) -> Result<Option<f64>, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(Error::InvalidAmount(trimmed.to_owned())),
    }
}

/// Parse the day of the month a template item is debited, treating blank input as `None`.
///
/// # Errors
/// Returns [Error::InvalidDebitDay] if the text is not a number from 1 to 31.
pub fn parse_debit_day(raw: &str) -> Result<Option<u8>, Error> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<u8>() {
        Ok(day) if (1..=31).contains(&day) => Ok(Some(day)),
        _ => Err(Error::InvalidDebitDay(trimmed.to_owned())),
    }
}

/// Collect the form fields named `{prefix}{id}`, e.g. "amount_3", keyed by ID.
///
/// Fields whose suffix is not an ID are ignored.
pub fn fields_with_prefix<'a>(
    form: &'a HashMap<String, String>,
    prefix: &str,
) -> Vec<(DatabaseId, &'a str)> {
    let mut fields: Vec<_> = form
        .iter()
        .filter_map(|(key, value)| {
            let id = key.strip_prefix(prefix)?.parse().ok()?;
            Some((id, value.as_str()))
        })
        .collect();

    fields.sort_unstable_by_key(|(id, _)| *id);

    fields
}
