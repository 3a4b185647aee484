// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Person, group, and mailing list mutations.
//!
//! These are the seeding operations the server and tests build their
//! group trees from; the role lifecycle itself lives in `roles`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::debug;

use crate::backend::get_last_insert_rowid;
use crate::data_models::encode_role_kinds;
use crate::diesel_schema::{groups, mailing_lists, people, subscriptions};
use crate::error::PersistenceError;
use roster_domain::{Group, MailingList, Person, Subscription};

/// Inserts a new person and returns the assigned id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person` - The person to insert
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_person(
    conn: &mut SqliteConnection,
    person: &Person,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(people::table)
        .values((
            people::name.eq(&person.name),
            people::primary_group_id.eq(person.primary_group_id),
        ))
        .execute(conn)?;

    let person_id: i64 = get_last_insert_rowid(conn)?;
    debug!(person_id, name = %person.name, "Inserted person");
    Ok(person_id)
}

/// Updates a person's primary group pointer.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person_id` - The person id
/// * `group_id` - The new primary group, or `None` to clear it
///
/// # Errors
///
/// Returns an error if the person does not exist or the update fails.
pub fn set_primary_group(
    conn: &mut SqliteConnection,
    person_id: i64,
    group_id: Option<i64>,
) -> Result<(), PersistenceError> {
    let affected: usize = diesel::update(people::table.find(person_id))
        .set(people::primary_group_id.eq(group_id))
        .execute(conn)?;

    if affected == 0 {
        return Err(PersistenceError::NotFound(format!(
            "Person {person_id} does not exist"
        )));
    }

    debug!(person_id, ?group_id, "Updated primary group");
    Ok(())
}

/// Inserts a new group and returns the assigned id.
///
/// For a layer, pass `layer_group_id == None`; the column is set to
/// the group's own id after insertion so subtree queries see the layer
/// as its own root.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `group` - The group to insert
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_group(conn: &mut SqliteConnection, group: &Group) -> Result<i64, PersistenceError> {
    diesel::insert_into(groups::table)
        .values((
            groups::name.eq(&group.name),
            groups::kind.eq(group.kind.as_str()),
            groups::parent_id.eq(group.parent_id),
            groups::layer_group_id.eq(group.layer_group_id),
            groups::require_person_add_requests.eq(i32::from(group.require_person_add_requests)),
        ))
        .execute(conn)?;

    let group_id: i64 = get_last_insert_rowid(conn)?;

    if group.layer_group_id.is_none() {
        diesel::update(groups::table.find(group_id))
            .set(groups::layer_group_id.eq(group_id))
            .execute(conn)?;
    }

    debug!(group_id, name = %group.name, kind = group.kind.as_str(), "Inserted group");
    Ok(group_id)
}

/// Inserts a new mailing list and returns the assigned id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `list` - The mailing list to insert
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_mailing_list(
    conn: &mut SqliteConnection,
    list: &MailingList,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(mailing_lists::table)
        .values((
            mailing_lists::name.eq(&list.name),
            mailing_lists::group_id.eq(list.group_id),
        ))
        .execute(conn)?;

    let mailing_list_id: i64 = get_last_insert_rowid(conn)?;
    debug!(mailing_list_id, name = %list.name, "Inserted mailing list");
    Ok(mailing_list_id)
}

/// Inserts a new subscription and returns the assigned id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `subscription` - The subscription to insert
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn insert_subscription(
    conn: &mut SqliteConnection,
    subscription: &Subscription,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(subscriptions::table)
        .values((
            subscriptions::mailing_list_id.eq(subscription.mailing_list_id),
            subscriptions::subscriber_group_id.eq(subscription.subscriber_group_id),
            subscriptions::role_kinds.eq(encode_role_kinds(&subscription.role_kinds)),
        ))
        .execute(conn)?;

    get_last_insert_rowid(conn)
}
