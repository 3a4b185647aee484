// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::diesel_schema::people;
use crate::error::PersistenceError;
use roster_domain::Person;

/// Looks up a person by id.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `person_id` - The person id
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_person(
    conn: &mut SqliteConnection,
    person_id: i64,
) -> Result<Option<Person>, PersistenceError> {
    let row: Option<(i64, String, Option<i64>)> = people::table
        .find(person_id)
        .first::<(i64, String, Option<i64>)>(conn)
        .optional()?;

    Ok(row.map(|(id, name, primary_group_id)| Person::with_id(id, name, primary_group_id)))
}
