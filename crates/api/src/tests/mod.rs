// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod handler_tests;

use time::Date;
use time::macros::date;

use roster::RoleStore;
use roster_domain::{Group, Person, Role, RoleKind};
use roster_persistence::SqlitePersistence;

pub const TODAY: Date = date!(2026 - 03 - 15);

/// A database seeded with one layer and one plain group inside it.
pub struct Fixture {
    pub db: SqlitePersistence,
    pub layer_id: i64,
    pub group_id: i64,
}

pub fn fixture() -> Fixture {
    let mut db: SqlitePersistence =
        SqlitePersistence::new_in_memory().expect("in-memory database");
    let layer_id: i64 = db
        .insert_group(&Group::new_layer("Top".to_string()))
        .expect("layer inserted");
    let group_id: i64 = db
        .insert_group(&Group::new_group("Crew".to_string(), layer_id, layer_id))
        .expect("group inserted");
    Fixture {
        db,
        layer_id,
        group_id,
    }
}

pub fn seed_person(db: &mut SqlitePersistence, name: &str) -> i64 {
    db.insert_person(&Person::new(name.to_string()))
        .expect("person inserted")
}

/// Inserts an active role that started a year before [`TODAY`].
pub fn seed_old_role(
    db: &mut SqlitePersistence,
    person_id: i64,
    group_id: i64,
    kind: RoleKind,
) -> i64 {
    let role: Role = Role::new(person_id, group_id, kind, date!(2025 - 03 - 15));
    RoleStore::insert_role(db, &role).expect("role inserted")
}
