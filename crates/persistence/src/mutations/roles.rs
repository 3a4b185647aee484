// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role lifecycle and add-request mutations.

use diesel::prelude::*;
use diesel::SqliteConnection;
use time::Date;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{encode_date, encode_date_opt};
use crate::diesel_schema::{add_requests, roles};
use crate::error::PersistenceError;
use roster_domain::{AddRequest, Role, RoleKind, RoleStatus};

/// Inserts a new role row and returns the assigned id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role` - The role to insert
///
/// # Errors
///
/// Returns an error if a date cannot be encoded or the insert fails.
pub fn insert_role(conn: &mut SqliteConnection, role: &Role) -> Result<i64, PersistenceError> {
    diesel::insert_into(roles::table)
        .values((
            roles::person_id.eq(role.person_id),
            roles::group_id.eq(role.group_id),
            roles::kind.eq(role.kind.as_str()),
            roles::label.eq(role.label.as_deref()),
            roles::start_on.eq(encode_date_opt(role.start_on)?),
            roles::end_on.eq(encode_date_opt(role.end_on)?),
            roles::status.eq(role.status.as_str()),
            roles::created_on.eq(encode_date(role.created_on)?),
            roles::updated_on.eq(encode_date(role.updated_on)?),
        ))
        .execute(conn)?;

    let role_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        role_id,
        person_id = role.person_id,
        group_id = role.group_id,
        kind = role.kind.as_str(),
        "Inserted role"
    );
    Ok(role_id)
}

/// Updates an existing role row in place.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role` - The role to update; `role_id` must be set
///
/// # Errors
///
/// Returns an error if the role has no id, does not exist, or the
/// update fails.
pub fn update_role(conn: &mut SqliteConnection, role: &Role) -> Result<(), PersistenceError> {
    let Some(role_id) = role.role_id else {
        return Err(PersistenceError::QueryFailed(
            "Cannot update a role without an id".to_string(),
        ));
    };

    let affected: usize = diesel::update(roles::table.find(role_id))
        .set((
            roles::person_id.eq(role.person_id),
            roles::group_id.eq(role.group_id),
            roles::kind.eq(role.kind.as_str()),
            roles::label.eq(role.label.as_deref()),
            roles::start_on.eq(encode_date_opt(role.start_on)?),
            roles::end_on.eq(encode_date_opt(role.end_on)?),
            roles::status.eq(role.status.as_str()),
            roles::updated_on.eq(encode_date(role.updated_on)?),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Role {role_id} does not exist"
        )));
    }

    debug!(role_id, "Updated role");
    Ok(())
}

/// Terminates a role: sets its end date and status, keeping the row.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role_id` - The role id
/// * `end_on` - The last day the role is in effect
///
/// # Errors
///
/// Returns an error if the role does not exist or the update fails.
pub fn terminate_role(
    conn: &mut SqliteConnection,
    role_id: i64,
    end_on: Date,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(roles::table.find(role_id))
        .set((
            roles::end_on.eq(Some(encode_date(end_on)?)),
            roles::status.eq(RoleStatus::Terminated.as_str()),
            roles::updated_on.eq(encode_date(end_on)?),
        ))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Role {role_id} does not exist"
        )));
    }

    debug!(role_id, "Terminated role");
    Ok(())
}

/// Hard-deletes a role row.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `role_id` - The role id
///
/// # Errors
///
/// Returns an error if the role does not exist or the delete fails.
pub fn delete_role(conn: &mut SqliteConnection, role_id: i64) -> Result<(), PersistenceError> {
    let affected: usize = diesel::delete(roles::table.find(role_id)).execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Role {role_id} does not exist"
        )));
    }

    debug!(role_id, "Deleted role");
    Ok(())
}

/// Inserts a new add request and returns the assigned id.
///
/// The table carries a uniqueness constraint on (person, body group);
/// callers check for an existing request first instead of relying on
/// the constraint error.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `request` - The add request to insert
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_add_request(
    conn: &mut SqliteConnection,
    request: &AddRequest,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(add_requests::table)
        .values((
            add_requests::person_id.eq(request.person_id),
            add_requests::body_group_id.eq(request.body_group_id),
            add_requests::role_kind.eq(request.role_kind.as_str()),
            add_requests::requester_id.eq(request.requester_id),
        ))
        .execute(conn)?;

    let add_request_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        add_request_id,
        person_id = request.person_id,
        body_group_id = request.body_group_id,
        "Inserted add request"
    );
    Ok(add_request_id)
}

/// Finds a pending add request for (person, body group), if any.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person_id` - The person to be added
/// * `body_group_id` - The target group
///
/// # Errors
///
/// Returns an error if the query fails or the stored kind is invalid.
pub fn find_add_request(
    conn: &mut SqliteConnection,
    person_id: i64,
    body_group_id: i64,
) -> Result<Option<AddRequest>, PersistenceError> {
    let row: Option<(i64, i64, i64, String, i64)> = add_requests::table
        .filter(add_requests::person_id.eq(person_id))
        .filter(add_requests::body_group_id.eq(body_group_id))
        .first::<(i64, i64, i64, String, i64)>(conn)
        .optional()?;

    let Some((add_request_id, person_id, body_group_id, role_kind, requester_id)) = row else {
        return Ok(None);
    };

    let mut request: AddRequest = AddRequest::new(
        person_id,
        body_group_id,
        RoleKind::parse(&role_kind)?,
        requester_id,
    );
    request.add_request_id = Some(add_request_id);
    Ok(Some(request))
}
