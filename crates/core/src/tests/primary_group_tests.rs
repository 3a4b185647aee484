// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::primary_group::{PrimaryGroupOutcome, maintain_primary_group};
use crate::tests::helpers::TODAY;
use roster_domain::{Person, Role, RoleKind};
use time::Duration;

fn person(primary_group_id: Option<i64>) -> Person {
    Person::with_id(1, String::from("Bob Foo"), primary_group_id)
}

fn role(role_id: i64, group_id: i64, updated_days_ago: i64) -> Role {
    let mut role: Role = Role::new(1, group_id, RoleKind::Member, TODAY - Duration::days(400));
    role.role_id = Some(role_id);
    role.updated_on = TODAY - Duration::days(updated_days_ago);
    role
}

#[test]
fn test_untouched_when_removed_role_not_in_primary_group() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 20, 0);
    let remaining: Vec<Role> = vec![role(2, 30, 0)];

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &remaining);
    assert_eq!(outcome.primary_group_id, Some(10));
    assert!(!outcome.changed);
    assert!(!outcome.warn);
}

#[test]
fn test_untouched_when_another_role_remains_in_primary_group() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 10, 0);
    let remaining: Vec<Role> = vec![role(2, 10, 5), role(3, 30, 0)];

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &remaining);
    assert_eq!(outcome.primary_group_id, Some(10));
    assert!(!outcome.changed);
    assert!(!outcome.warn);
}

#[test]
fn test_single_other_group_reassigns_silently() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 10, 0);
    let remaining: Vec<Role> = vec![role(2, 20, 3), role(3, 20, 1)];

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &remaining);
    assert_eq!(outcome.primary_group_id, Some(20));
    assert!(outcome.changed);
    assert!(!outcome.warn);
}

#[test]
fn test_multiple_groups_pick_most_recently_touched_and_warn() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 10, 0);
    // The role in group 30 was touched most recently.
    let remaining: Vec<Role> = vec![role(2, 20, 7), role(3, 30, 1)];

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &remaining);
    assert_eq!(outcome.primary_group_id, Some(30));
    assert!(outcome.changed);
    assert!(outcome.warn);
}

#[test]
fn test_update_day_tie_breaks_on_role_id() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 10, 0);
    let remaining: Vec<Role> = vec![role(2, 20, 4), role(9, 30, 4)];

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &remaining);
    assert_eq!(outcome.primary_group_id, Some(30));
    assert!(outcome.warn);
}

#[test]
fn test_no_remaining_roles_clears_pointer() {
    let person: Person = person(Some(10));
    let removed: Role = role(1, 10, 0);

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &[]);
    assert_eq!(outcome.primary_group_id, None);
    assert!(outcome.changed);
    assert!(!outcome.warn);
}

#[test]
fn test_no_remaining_roles_without_primary_group_is_a_no_op() {
    let person: Person = person(None);
    let removed: Role = role(1, 10, 0);

    let outcome: PrimaryGroupOutcome = maintain_primary_group(&person, &removed, &[]);
    assert_eq!(outcome.primary_group_id, None);
    assert!(!outcome.changed);
    assert!(!outcome.warn);
}
