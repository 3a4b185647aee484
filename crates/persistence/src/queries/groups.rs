// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::str::FromStr;

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::diesel_schema::groups;
use crate::error::PersistenceError;
use roster_domain::{Group, GroupKind};

type GroupRow = (i64, String, String, Option<i64>, Option<i64>, i32);

fn decode_group(row: GroupRow) -> Result<Group, PersistenceError> {
    let (group_id, name, kind, parent_id, layer_group_id, require_person_add_requests) = row;
    Ok(Group::with_id(
        group_id,
        name,
        GroupKind::from_str(&kind)?,
        parent_id,
        layer_group_id,
        require_person_add_requests != 0,
    ))
}

/// Looks up a group by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `group_id` - The group id
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be
/// decoded.
pub fn find_group(
    conn: &mut SqliteConnection,
    group_id: i64,
) -> Result<Option<Group>, PersistenceError> {
    let row: Option<GroupRow> = groups::table
        .find(group_id)
        .first::<GroupRow>(conn)
        .optional()?;

    row.map(decode_group).transpose()
}

/// Returns the ids of all groups within a layer's subtree, including
/// the layer itself.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `layer_group_id` - The layer's group id
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn subtree_group_ids(
    conn: &mut SqliteConnection,
    layer_group_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(groups::table
        .select(groups::group_id)
        .filter(
            groups::group_id
                .eq(layer_group_id)
                .or(groups::layer_group_id.eq(layer_group_id)),
        )
        .load::<i64>(conn)?)
}
