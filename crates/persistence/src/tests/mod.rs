// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod role_store_tests;

use time::Date;
use time::macros::date;

use crate::SqlitePersistence;
use roster_domain::{Group, Person, Role, RoleKind, RoleStatus};

pub const TODAY: Date = date!(2026 - 03 - 15);

pub fn open() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("in-memory database")
}

pub fn seed_layer(db: &mut SqlitePersistence, name: &str) -> i64 {
    db.insert_group(&Group::new_layer(name.to_string()))
        .expect("layer inserted")
}

pub fn seed_group(db: &mut SqlitePersistence, name: &str, layer_id: i64) -> i64 {
    db.insert_group(&Group::new_group(name.to_string(), layer_id, layer_id))
        .expect("group inserted")
}

pub fn seed_person(db: &mut SqlitePersistence, name: &str) -> i64 {
    db.insert_person(&Person::new(name.to_string()))
        .expect("person inserted")
}

/// Inserts an unbounded active role that started a year before
/// [`TODAY`], so it is outside any grace window.
pub fn seed_old_role(
    db: &mut SqlitePersistence,
    person_id: i64,
    group_id: i64,
    kind: RoleKind,
) -> i64 {
    let started: Date = date!(2025 - 03 - 15);
    let mut role: Role = Role::new(person_id, group_id, kind, started);
    role.status = RoleStatus::Active;
    crate::mutations::roles::insert_role(&mut db.conn, &role).expect("role inserted")
}
