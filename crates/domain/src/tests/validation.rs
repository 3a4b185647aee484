// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    DomainError, Group, GroupKind, RoleKind, validate_person_name, validate_role_dates,
    validate_role_kind_allowed,
};
use time::macros::date;

#[test]
fn test_validate_role_dates_accepts_ordered_bounds() {
    assert!(validate_role_dates(Some(date!(2026 - 01 - 01)), Some(date!(2026 - 12 - 31))).is_ok());
    assert!(validate_role_dates(None, Some(date!(2026 - 12 - 31))).is_ok());
    assert!(validate_role_dates(Some(date!(2026 - 01 - 01)), None).is_ok());
    assert!(validate_role_dates(None, None).is_ok());
}

#[test]
fn test_validate_role_dates_rejects_end_before_start() {
    let result: Result<(), DomainError> =
        validate_role_dates(Some(date!(2026 - 03 - 15)), Some(date!(2026 - 03 - 14)));
    assert!(matches!(result, Err(DomainError::InvalidDateOrder { .. })));
}

#[test]
fn test_validate_role_kind_allowed_checks_capability_table() {
    let layer: Group = Group::with_id(
        1,
        String::from("Top"),
        GroupKind::Layer,
        None,
        Some(1),
        false,
    );
    let group: Group = Group::with_id(
        2,
        String::from("Toppers"),
        GroupKind::Group,
        Some(1),
        Some(1),
        false,
    );

    assert!(validate_role_kind_allowed(RoleKind::Member, &layer).is_ok());
    assert!(validate_role_kind_allowed(RoleKind::Secretary, &group).is_ok());

    let result: Result<(), DomainError> =
        validate_role_kind_allowed(RoleKind::Secretary, &layer);
    assert!(matches!(
        result,
        Err(DomainError::RoleKindNotAllowed { .. })
    ));
}

#[test]
fn test_validate_person_name_rejects_blank() {
    assert!(validate_person_name("Bob Foo").is_ok());
    assert!(matches!(
        validate_person_name("   "),
        Err(DomainError::InvalidName(_))
    ));
}
