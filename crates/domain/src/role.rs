// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::RoleKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Lifecycle status of a role.
///
/// "Terminated" and "hard-removed" stay distinguishable: a terminated
/// role keeps its row with a past end boundary, a removed role leaves
/// no trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RoleStatus {
    /// The role is in effect (subject to its start/end bounds).
    #[default]
    Active,
    /// Ended with a recorded past end date; the row is retained.
    Terminated,
    /// Physically removed. Never persisted; exists only as an in-flight
    /// marker while a hard replace is applied.
    Removed,
}

impl RoleStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Terminated => "Terminated",
            Self::Removed => "Removed",
        }
    }
}

impl FromStr for RoleStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Terminated" => Ok(Self::Terminated),
            "Removed" => Ok(Self::Removed),
            _ => Err(DomainError::InvalidRoleStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The policy window within which a role counts as "created recently".
///
/// A kind or group change on a recently created role is treated as an
/// immediate correction and hard-replaces the role instead of
/// terminating it. The boundary is a calendar-day comparison: with the
/// default width of 1, roles created today or yesterday are recent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraceWindow {
    /// Window width in calendar days.
    days: u16,
}

impl Default for GraceWindow {
    fn default() -> Self {
        Self { days: 1 }
    }
}

impl GraceWindow {
    /// Creates a grace window of the given width in calendar days.
    #[must_use]
    pub const fn new(days: u16) -> Self {
        Self { days }
    }

    /// Returns the window width in calendar days.
    #[must_use]
    pub const fn days(&self) -> u16 {
        self.days
    }

    /// Checks whether a role created on `created_on` still falls within
    /// the window as of `today`.
    #[must_use]
    pub fn contains(&self, created_on: Date, today: Date) -> bool {
        let age_days: i64 = (today - created_on).whole_days();
        age_days <= i64::from(self.days)
    }
}

/// A typed association between a person and a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Canonical numeric identifier assigned by the database.
    pub role_id: Option<i64>,
    /// The person holding this role.
    pub person_id: i64,
    /// The group this role belongs to.
    pub group_id: i64,
    /// The role kind.
    pub kind: RoleKind,
    /// Optional free-text label shown alongside the kind.
    pub label: Option<String>,
    /// First day the role is in effect. `None` means unbounded.
    pub start_on: Option<Date>,
    /// Last day the role is in effect. `None` means unbounded.
    pub end_on: Option<Date>,
    /// Lifecycle status.
    pub status: RoleStatus,
    /// Calendar day the role row was created.
    pub created_on: Date,
    /// Calendar day the role row was last touched. Used as the
    /// tie-breaker when reassigning a person's primary group.
    pub updated_on: Date,
}

impl Role {
    /// Creates a new active role starting today.
    #[must_use]
    pub const fn new(person_id: i64, group_id: i64, kind: RoleKind, today: Date) -> Self {
        Self {
            role_id: None,
            person_id,
            group_id,
            kind,
            label: None,
            start_on: Some(today),
            end_on: None,
            status: RoleStatus::Active,
            created_on: today,
            updated_on: today,
        }
    }

    /// Creates a `Role` with an existing persisted id.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn with_id(
        role_id: i64,
        person_id: i64,
        group_id: i64,
        kind: RoleKind,
        label: Option<String>,
        start_on: Option<Date>,
        end_on: Option<Date>,
        status: RoleStatus,
        created_on: Date,
        updated_on: Date,
    ) -> Self {
        Self {
            role_id: Some(role_id),
            person_id,
            group_id,
            kind,
            label,
            start_on,
            end_on,
            status,
            created_on,
            updated_on,
        }
    }

    /// Checks whether the role is in effect on the given day.
    #[must_use]
    pub fn is_active_on(&self, day: Date) -> bool {
        if self.status != RoleStatus::Active {
            return false;
        }
        if self.start_on.is_some_and(|start| start > day) {
            return false;
        }
        !self.end_on.is_some_and(|end| end < day)
    }

    /// Checks whether the role only starts after the given day.
    #[must_use]
    pub fn is_future_on(&self, day: Date) -> bool {
        self.start_on.is_some_and(|start| start > day)
    }

    /// Returns the display name, the kind optionally suffixed with the
    /// label: `Member` or `Member (Treasurer)`.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.label.as_ref().map_or_else(
            || self.kind.as_str().to_string(),
            |label| format!("{} ({label})", self.kind.as_str()),
        )
    }
}

/// A pending request to add a person to a group.
///
/// Created instead of a role when the target layer requires add
/// requests and the acting user cannot already see the person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRequest {
    /// Canonical numeric identifier assigned by the database.
    pub add_request_id: Option<i64>,
    /// The person to be added.
    pub person_id: i64,
    /// The group the person would join.
    pub body_group_id: i64,
    /// The requested role kind.
    pub role_kind: RoleKind,
    /// The person who asked for the addition.
    pub requester_id: i64,
}

impl AddRequest {
    /// Creates a new `AddRequest` without a persisted id.
    #[must_use]
    pub const fn new(
        person_id: i64,
        body_group_id: i64,
        role_kind: RoleKind,
        requester_id: i64,
    ) -> Self {
        Self {
            add_request_id: None,
            person_id,
            body_group_id,
            role_kind,
            requester_id,
        }
    }
}
