// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{GraceWindow, Role, RoleKind, RoleStatus};
use time::macros::date;
use time::Date;

fn sample_role(created_on: Date) -> Role {
    Role {
        created_on,
        ..Role::new(1, 10, RoleKind::Member, created_on)
    }
}

#[test]
fn test_grace_window_contains_today_and_yesterday_by_default() {
    let grace: GraceWindow = GraceWindow::default();
    let today: Date = date!(2026 - 03 - 15);

    assert!(grace.contains(date!(2026 - 03 - 15), today));
    assert!(grace.contains(date!(2026 - 03 - 14), today));
    assert!(!grace.contains(date!(2026 - 03 - 13), today));
}

#[test]
fn test_grace_window_width_is_configurable() {
    let grace: GraceWindow = GraceWindow::new(3);
    let today: Date = date!(2026 - 03 - 15);

    assert!(grace.contains(date!(2026 - 03 - 12), today));
    assert!(!grace.contains(date!(2026 - 03 - 11), today));
}

#[test]
fn test_role_active_within_bounds() {
    let mut role: Role = sample_role(date!(2026 - 01 - 01));
    role.end_on = Some(date!(2026 - 06 - 30));

    assert!(role.is_active_on(date!(2026 - 03 - 15)));
    assert!(role.is_active_on(date!(2026 - 06 - 30)));
    assert!(!role.is_active_on(date!(2026 - 07 - 01)));
    assert!(!role.is_active_on(date!(2025 - 12 - 31)));
}

#[test]
fn test_terminated_role_is_never_active() {
    let mut role: Role = sample_role(date!(2026 - 01 - 01));
    role.status = RoleStatus::Terminated;
    role.end_on = Some(date!(2026 - 03 - 14));

    assert!(!role.is_active_on(date!(2026 - 02 - 01)));
}

#[test]
fn test_future_role_detection() {
    let mut role: Role = sample_role(date!(2026 - 03 - 15));
    role.start_on = Some(date!(2026 - 04 - 01));

    assert!(role.is_future_on(date!(2026 - 03 - 15)));
    assert!(!role.is_active_on(date!(2026 - 03 - 15)));
    assert!(!role.is_future_on(date!(2026 - 04 - 01)));
}

#[test]
fn test_unbounded_role_is_active() {
    let mut role: Role = sample_role(date!(2026 - 01 - 01));
    role.start_on = None;

    assert!(role.is_active_on(date!(2020 - 01 - 01)));
}

#[test]
fn test_display_name_includes_label() {
    let mut role: Role = sample_role(date!(2026 - 01 - 01));
    assert_eq!(role.display_name(), "Member");

    role.label = Some(String::from("Treasurer"));
    assert_eq!(role.display_name(), "Member (Treasurer)");
}
