// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role lookups, active-role filters, and fee headcounts.
//!
//! "Active on a day" is a three-part filter: status `Active`, start
//! unset or on/before the day, end unset or on/after the day. Dates
//! are ISO-8601 text, so the comparisons work lexicographically.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::Date;

use crate::data_models::{RoleRow, decode_role, encode_date};
use crate::diesel_schema::roles;
use crate::error::PersistenceError;
use crate::queries::groups::subtree_group_ids;
use roster_domain::{Role, RoleKind, RoleStatus};

/// Looks up a role by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role_id` - The role id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn find_role(
    conn: &mut SqliteConnection,
    role_id: i64,
) -> Result<Option<Role>, PersistenceError> {
    let row: Option<RoleRow> = roles::table
        .find(role_id)
        .first::<RoleRow>(conn)
        .optional()?;

    row.map(decode_role).transpose()
}

/// Returns a person's roles with status `Active`, ordered by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person_id` - The person id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn active_roles_of_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Vec<Role>, PersistenceError> {
    let rows: Vec<RoleRow> = roles::table
        .filter(roles::person_id.eq(person_id))
        .filter(roles::status.eq(RoleStatus::Active.as_str()))
        .order(roles::role_id.asc())
        .load::<RoleRow>(conn)?;

    rows.into_iter().map(decode_role).collect()
}

/// Counts roles of the given kind active on the given day within a
/// layer's subtree.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `layer_group_id` - The layer whose subtree is counted
/// * `kind` - The role kind to count
/// * `day` - The day the roles must be active on
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_active_roles(
    conn: &mut SqliteConnection,
    layer_group_id: i64,
    kind: RoleKind,
    day: Date,
) -> Result<i64, PersistenceError> {
    let subtree: Vec<i64> = subtree_group_ids(conn, layer_group_id)?;
    let day_text: String = encode_date(day)?;

    Ok(roles::table
        .filter(roles::group_id.eq_any(subtree))
        .filter(roles::kind.eq(kind.as_str()))
        .filter(roles::status.eq(RoleStatus::Active.as_str()))
        .filter(roles::start_on.is_null().or(roles::start_on.le(day_text.clone())))
        .filter(roles::end_on.is_null().or(roles::end_on.ge(day_text)))
        .count()
        .get_result::<i64>(conn)?)
}

/// Returns the ids of people holding a role active on the given day in
/// a group.
///
/// The underlying relation is not distinct; callers deduplicate.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `group_id` - The group id
/// * `day` - The day the roles must be active on
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn people_of_group(
    conn: &mut SqliteConnection,
    group_id: i64,
    day: Date,
) -> Result<Vec<i64>, PersistenceError> {
    let day_text: String = encode_date(day)?;

    Ok(roles::table
        .select(roles::person_id)
        .filter(roles::group_id.eq(group_id))
        .filter(roles::status.eq(RoleStatus::Active.as_str()))
        .filter(roles::start_on.is_null().or(roles::start_on.le(day_text.clone())))
        .filter(roles::end_on.is_null().or(roles::end_on.ge(day_text)))
        .order(roles::role_id.asc())
        .load::<i64>(conn)?)
}

/// Returns the ids of people holding one of the given role kinds
/// active on the given day within a group's subtree.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `group_id` - The subscriber group (or layer) id
/// * `kinds` - The role kinds that qualify
/// * `day` - The day the roles must be active on
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn people_with_role_kinds(
    conn: &mut SqliteConnection,
    group_id: i64,
    kinds: &[RoleKind],
    day: Date,
) -> Result<Vec<i64>, PersistenceError> {
    let subtree: Vec<i64> = subtree_group_ids(conn, group_id)?;
    let day_text: String = encode_date(day)?;
    let kind_names: Vec<&str> = kinds.iter().map(RoleKind::as_str).collect();

    Ok(roles::table
        .select(roles::person_id)
        .filter(roles::group_id.eq_any(subtree))
        .filter(roles::kind.eq_any(kind_names))
        .filter(roles::status.eq(RoleStatus::Active.as_str()))
        .filter(roles::start_on.is_null().or(roles::start_on.le(day_text.clone())))
        .filter(roles::end_on.is_null().or(roles::end_on.ge(day_text)))
        .order(roles::role_id.asc())
        .load::<i64>(conn)?)
}
