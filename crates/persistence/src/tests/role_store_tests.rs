// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! `RoleStore` coverage against a real `SQLite` database, including
//! the role transition engine running end to end on top of it.

use time::Date;
use time::macros::date;

use super::{TODAY, open, seed_group, seed_layer, seed_old_role, seed_person};
use crate::SqlitePersistence;
use roster::{
    ChangeContext, Notifications, RoleAttributes, RoleChangeOutcome, RoleChangePlan, RoleStore,
    StoreError, apply_role_change, plan_role_destroy, plan_role_update,
};
use roster_domain::{AddRequest, Person, Role, RoleKind, RoleStatus};

#[test]
fn test_role_round_trips_all_fields() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");

    let mut role: Role = Role::new(person_id, group_id, RoleKind::Secretary, TODAY);
    role.label = Some("Minutes".to_string());
    role.end_on = Some(date!(2026 - 12 - 31));

    let role_id: i64 = RoleStore::insert_role(&mut db, &role).expect("insert");
    let loaded: Role = RoleStore::find_role(&mut db, role_id).expect("find");

    assert_eq!(loaded.role_id, Some(role_id));
    assert_eq!(loaded.person_id, person_id);
    assert_eq!(loaded.group_id, group_id);
    assert_eq!(loaded.kind, RoleKind::Secretary);
    assert_eq!(loaded.label.as_deref(), Some("Minutes"));
    assert_eq!(loaded.start_on, Some(TODAY));
    assert_eq!(loaded.end_on, Some(date!(2026 - 12 - 31)));
    assert_eq!(loaded.status, RoleStatus::Active);
    assert_eq!(loaded.created_on, TODAY);
}

#[test]
fn test_find_person_maps_missing_row_to_not_found() {
    let mut db: SqlitePersistence = open();

    let err: StoreError = RoleStore::find_person(&mut db, 404).expect_err("missing person");

    assert_eq!(
        err,
        StoreError::NotFound {
            entity: roster::ErrorEntity::Person,
            id: 404,
        }
    );
}

#[test]
fn test_active_roles_exclude_terminated_rows() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");

    let kept: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);
    let ended: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Secretary);
    RoleStore::terminate_role(&mut db, ended, date!(2026 - 03 - 01)).expect("terminate");

    let active: Vec<Role> = RoleStore::active_roles_of_person(&mut db, person_id).expect("query");

    assert_eq!(active.len(), 1);
    assert_eq!(active[0].role_id, Some(kept));
}

#[test]
fn test_terminate_role_sets_end_date_and_status() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");
    let role_id: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);

    RoleStore::terminate_role(&mut db, role_id, date!(2026 - 03 - 14)).expect("terminate");

    let loaded: Role = RoleStore::find_role(&mut db, role_id).expect("find");
    assert_eq!(loaded.status, RoleStatus::Terminated);
    assert_eq!(loaded.end_on, Some(date!(2026 - 03 - 14)));
}

#[test]
fn test_delete_role_leaves_no_row() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");
    let role_id: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);

    RoleStore::delete_role(&mut db, role_id).expect("delete");

    let err: StoreError = RoleStore::find_role(&mut db, role_id).expect_err("gone");
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn test_delete_of_missing_role_is_not_found() {
    let mut db: SqlitePersistence = open();

    let err: StoreError = RoleStore::delete_role(&mut db, 99).expect_err("missing role");

    assert_eq!(
        err,
        StoreError::NotFound {
            entity: roster::ErrorEntity::Role,
            id: 99,
        }
    );
}

#[test]
fn test_set_primary_group_round_trips() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");

    RoleStore::set_primary_group(&mut db, person_id, Some(group_id)).expect("set");
    let person: Person = RoleStore::find_person(&mut db, person_id).expect("find");
    assert_eq!(person.primary_group_id, Some(group_id));

    RoleStore::set_primary_group(&mut db, person_id, None).expect("clear");
    let person: Person = RoleStore::find_person(&mut db, person_id).expect("find");
    assert_eq!(person.primary_group_id, None);
}

#[test]
fn test_add_request_round_trips() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let person_id: i64 = seed_person(&mut db, "Ada");
    let requester_id: i64 = seed_person(&mut db, "Grace");

    let request: AddRequest = AddRequest::new(person_id, layer_id, RoleKind::Member, requester_id);
    let request_id: i64 = RoleStore::insert_add_request(&mut db, &request).expect("insert");

    let loaded: AddRequest = RoleStore::find_add_request(&mut db, person_id, layer_id)
        .expect("query")
        .expect("present");
    assert_eq!(loaded.add_request_id, Some(request_id));
    assert_eq!(loaded.role_kind, RoleKind::Member);
    assert_eq!(loaded.requester_id, requester_id);

    let absent: Option<AddRequest> =
        RoleStore::find_add_request(&mut db, person_id, layer_id + 1).expect("query");
    assert!(absent.is_none());
}

#[test]
fn test_duplicate_add_request_is_rejected_by_the_schema() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let person_id: i64 = seed_person(&mut db, "Ada");
    let requester_id: i64 = seed_person(&mut db, "Grace");

    let request: AddRequest = AddRequest::new(person_id, layer_id, RoleKind::Member, requester_id);
    RoleStore::insert_add_request(&mut db, &request).expect("first insert");

    let err: StoreError =
        RoleStore::insert_add_request(&mut db, &request).expect_err("duplicate insert");
    assert!(matches!(err, StoreError::Backend(_)));
}

#[test]
fn test_foreign_keys_are_enforced() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);

    // No such person.
    let role: Role = Role::new(12345, group_id, RoleKind::Member, TODAY);
    let err: StoreError = RoleStore::insert_role(&mut db, &role).expect_err("dangling reference");
    assert!(matches!(err, StoreError::Backend(_)));
}

#[test]
fn test_kind_change_runs_end_to_end_against_sqlite() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");
    RoleStore::set_primary_group(&mut db, person_id, Some(group_id)).expect("set primary");
    let old_role_id: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);

    let existing: Role = RoleStore::find_role(&mut db, old_role_id).expect("find");
    let group: roster_domain::Group = RoleStore::find_group(&mut db, group_id).expect("group");
    let attrs: RoleAttributes = RoleAttributes {
        kind: Some(RoleKind::Leader),
        group_id: Some(group_id),
        label: None,
        start_on: None,
        end_on: None,
    };
    let ctx: ChangeContext = ChangeContext::new(TODAY, 999);

    let plan: RoleChangePlan =
        plan_role_update(&existing, &group, &attrs, &ctx).expect("planned");
    let mut notifications: Notifications = Notifications::new();
    let outcome: RoleChangeOutcome =
        apply_role_change(plan, &mut db, &mut notifications).expect("applied");

    // The year-old role is terminated yesterday and a fresh Leader
    // role takes over.
    let old: Role = RoleStore::find_role(&mut db, old_role_id).expect("old role kept");
    assert_eq!(old.status, RoleStatus::Terminated);
    assert_eq!(old.end_on, Some(date!(2026 - 03 - 14)));

    let new_role_id: i64 = outcome.role_id.expect("replacement id");
    let new_role: Role = RoleStore::find_role(&mut db, new_role_id).expect("new role");
    assert_eq!(new_role.kind, RoleKind::Leader);
    assert_eq!(new_role.status, RoleStatus::Active);
    assert_eq!(new_role.start_on, Some(TODAY));

    let person: Person = RoleStore::find_person(&mut db, person_id).expect("person");
    assert_eq!(person.primary_group_id, Some(group_id));
}

#[test]
fn test_destroy_of_old_role_terminates_in_sqlite() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");
    let role_id: i64 = seed_old_role(&mut db, person_id, group_id, RoleKind::Member);

    let existing: Role = RoleStore::find_role(&mut db, role_id).expect("find");
    let ctx: ChangeContext = ChangeContext::new(TODAY, 999);
    let plan: RoleChangePlan = plan_role_destroy(&existing, &ctx).expect("planned");
    let mut notifications: Notifications = Notifications::new();
    apply_role_change(plan, &mut db, &mut notifications).expect("applied");

    let loaded: Role = RoleStore::find_role(&mut db, role_id).expect("row kept");
    assert_eq!(loaded.status, RoleStatus::Terminated);

    let active: Vec<Role> = RoleStore::active_roles_of_person(&mut db, person_id).expect("query");
    assert!(active.is_empty());
}

#[test]
fn test_date_boundaries_compare_as_text() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let group_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let person_id: i64 = seed_person(&mut db, "Ada");

    let mut role: Role = Role::new(person_id, group_id, RoleKind::Member, TODAY);
    role.start_on = Some(date!(2026 - 03 - 01));
    role.end_on = Some(date!(2026 - 03 - 20));
    RoleStore::insert_role(&mut db, &role).expect("insert");

    let on_boundary: Vec<i64> =
        roster::RecipientSource::people_of_group(&mut db, group_id, date!(2026 - 03 - 20))
            .expect("query");
    assert_eq!(on_boundary, vec![person_id]);

    let after: Vec<i64> =
        roster::RecipientSource::people_of_group(&mut db, group_id, date!(2026 - 03 - 21))
            .expect("query");
    assert!(after.is_empty());

    let before: Vec<i64> =
        roster::RecipientSource::people_of_group(&mut db, group_id, date!(2026 - 02 - 28))
            .expect("query");
    assert!(before.is_empty());
}

#[test]
fn test_subtree_headcount_spans_nested_groups() {
    let mut db: SqlitePersistence = open();
    let layer_id: i64 = seed_layer(&mut db, "Top");
    let crew_id: i64 = seed_group(&mut db, "Crew", layer_id);
    let band_id: i64 = seed_group(&mut db, "Band", layer_id);

    let ada: i64 = seed_person(&mut db, "Ada");
    let grace: i64 = seed_person(&mut db, "Grace");
    let linus: i64 = seed_person(&mut db, "Linus");
    seed_old_role(&mut db, ada, crew_id, RoleKind::Member);
    seed_old_role(&mut db, grace, band_id, RoleKind::Member);
    seed_old_role(&mut db, linus, layer_id, RoleKind::Leader);

    let members: i64 =
        roster::InvoiceStore::count_active_roles(&mut db, layer_id, RoleKind::Member, TODAY)
            .expect("count");
    assert_eq!(members, 2);

    let leaders: i64 =
        roster::InvoiceStore::count_active_roles(&mut db, layer_id, RoleKind::Leader, TODAY)
            .expect("count");
    assert_eq!(leaders, 1);
}
