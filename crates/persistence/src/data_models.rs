// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row encodings shared by the query and mutation modules.
//!
//! Dates are stored as ISO-8601 text (`YYYY-MM-DD`), which compares
//! correctly as text. Enum-like domain values are stored via their
//! `as_str` representations and decoded through `FromStr`.

use std::str::FromStr;

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::PersistenceError;
use roster_domain::{Receiver, Role, RoleKind, RoleStatus};

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Type alias for a role row.
pub type RoleRow = (
    i64,
    i64,
    i64,
    String,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
    String,
);

/// Encodes a calendar day as ISO-8601 text.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn encode_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|e| PersistenceError::Other(format!("Cannot format date: {e}")))
}

/// Encodes an optional calendar day as ISO-8601 text.
///
/// # Errors
///
/// Returns an error if the date cannot be formatted.
pub fn encode_date_opt(date: Option<Date>) -> Result<Option<String>, PersistenceError> {
    date.map(encode_date).transpose()
}

/// Decodes an ISO-8601 text column into a calendar day.
///
/// # Errors
///
/// Returns an error if the text is not a valid date.
pub fn decode_date(text: &str) -> Result<Date, PersistenceError> {
    Date::parse(text, DATE_FORMAT)
        .map_err(|e| PersistenceError::DecodeError(format!("Invalid date {text:?}: {e}")))
}

/// Decodes an optional ISO-8601 text column into a calendar day.
///
/// # Errors
///
/// Returns an error if the text is not a valid date.
pub fn decode_date_opt(text: Option<&str>) -> Result<Option<Date>, PersistenceError> {
    text.map(decode_date).transpose()
}

/// Encodes a role kind set as comma-separated text.
#[must_use]
pub fn encode_role_kinds(kinds: &[RoleKind]) -> String {
    kinds
        .iter()
        .map(RoleKind::as_str)
        .collect::<Vec<&str>>()
        .join(",")
}

/// Decodes comma-separated role kind text.
///
/// # Errors
///
/// Returns an error if an element is not a valid role kind.
pub fn decode_role_kinds(text: &str) -> Result<Vec<RoleKind>, PersistenceError> {
    let mut kinds: Vec<RoleKind> = Vec::new();
    for part in text.split(',') {
        let trimmed: &str = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        kinds.push(RoleKind::parse(trimmed)?);
    }
    Ok(kinds)
}

/// Encodes a recipient id set as comma-separated text.
#[must_use]
pub fn encode_id_list(ids: &[i64]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<String>>()
        .join(",")
}

/// Decodes comma-separated id text.
///
/// # Errors
///
/// Returns an error if an element is not a valid id.
pub fn decode_id_list(text: &str) -> Result<Vec<i64>, PersistenceError> {
    let mut ids: Vec<i64> = Vec::new();
    for part in text.split(',') {
        let trimmed: &str = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        let id: i64 = trimmed
            .parse()
            .map_err(|_| PersistenceError::DecodeError(format!("Invalid id {trimmed:?}")))?;
        ids.push(id);
    }
    Ok(ids)
}

/// Encodes an invoice list receiver as `(type, id)` columns.
#[must_use]
pub const fn encode_receiver(receiver: Option<Receiver>) -> (Option<&'static str>, Option<i64>) {
    match receiver {
        Some(Receiver::MailingList(id)) => (Some("mailing_list"), Some(id)),
        Some(Receiver::Group(id)) => (Some("group"), Some(id)),
        None => (None, None),
    }
}

/// Decodes `(type, id)` receiver columns.
///
/// # Errors
///
/// Returns an error if the type tag is unknown or the id is missing.
pub fn decode_receiver(
    receiver_type: Option<&str>,
    receiver_id: Option<i64>,
) -> Result<Option<Receiver>, PersistenceError> {
    match (receiver_type, receiver_id) {
        (None, _) => Ok(None),
        (Some("mailing_list"), Some(id)) => Ok(Some(Receiver::MailingList(id))),
        (Some("group"), Some(id)) => Ok(Some(Receiver::Group(id))),
        (Some(tag), None) => Err(PersistenceError::DecodeError(format!(
            "Receiver {tag:?} without an id"
        ))),
        (Some(tag), Some(_)) => Err(PersistenceError::DecodeError(format!(
            "Unknown receiver type {tag:?}"
        ))),
    }
}

/// A background job row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    /// Canonical numeric identifier assigned by the database.
    pub job_id: i64,
    /// Job kind tag.
    pub kind: String,
    /// Serialized job payload.
    pub payload_json: String,
    /// Lifecycle status: `pending`, `done`, or `failed`.
    pub status: String,
    /// Enqueue timestamp (RFC 3339 text).
    pub created_at: String,
    /// Completion timestamp, once the job ran.
    pub completed_at: Option<String>,
    /// Failure description, if the job failed.
    pub error: Option<String>,
}

/// Decodes a role row into its domain type.
///
/// # Errors
///
/// Returns an error if a stored kind, status, or date is invalid.
pub fn decode_role(row: RoleRow) -> Result<Role, PersistenceError> {
    let (role_id, person_id, group_id, kind, label, start_on, end_on, status, created_on, updated_on) =
        row;
    Ok(Role::with_id(
        role_id,
        person_id,
        group_id,
        RoleKind::parse(&kind)?,
        label,
        decode_date_opt(start_on.as_deref())?,
        decode_date_opt(end_on.as_deref())?,
        RoleStatus::from_str(&status)?,
        decode_date(&created_on)?,
        decode_date(&updated_on)?,
    ))
}
