// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The role transition decision engine.
//!
//! Decisions are planned as data and applied separately (see
//! [`crate::apply`]). A kind or group change is never an in-place
//! mutation: an old role is either terminated with a past end boundary
//! or, when it was created within the grace window, hard-replaced as
//! an immediate correction.

use crate::error::{CoreError, ErrorEntity};
use roster_domain::{
    AddRequest, GraceWindow, Group, Person, Role, RoleKind, validate_role_dates,
    validate_role_kind_allowed,
};
use time::{Date, Duration};

/// The requested attribute set of a role mutation.
///
/// `None` fields are left unchanged on update; `kind` is mandatory for
/// both create and update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleAttributes {
    /// The requested role kind.
    pub kind: Option<RoleKind>,
    /// The target group.
    pub group_id: Option<i64>,
    /// Free-text label.
    pub label: Option<String>,
    /// First day the role is in effect.
    pub start_on: Option<Date>,
    /// Last day the role is in effect.
    pub end_on: Option<Date>,
}

/// Per-request context for planning a role change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeContext {
    /// The current calendar day.
    pub today: Date,
    /// The "created recently" policy window.
    pub grace: GraceWindow,
    /// The person performing the mutation.
    pub acting_person_id: i64,
    /// Whether the acting user can already see the target person.
    /// Relevant for layers requiring add requests.
    pub actor_sees_person: bool,
}

impl ChangeContext {
    /// Creates a context with the default grace window.
    #[must_use]
    pub fn new(today: Date, acting_person_id: i64) -> Self {
        Self {
            today,
            grace: GraceWindow::default(),
            acting_person_id,
            actor_sees_person: true,
        }
    }

    fn yesterday(&self) -> Date {
        self.today - Duration::days(1)
    }
}

/// A planned persistence action for one role mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleChangePlan {
    /// Insert a new role.
    Create {
        /// The role to insert.
        role: Role,
    },
    /// Only cosmetic fields changed; update the row in place.
    UpdateInPlace {
        /// The updated role.
        role: Role,
    },
    /// Kind or group changed: replace the old role with a new one.
    Replace {
        /// The role being replaced.
        old_role_id: i64,
        /// `Some(end_on)` terminates the old role with that end
        /// boundary; `None` hard-deletes it, leaving no trace.
        termination: Option<Date>,
        /// The replacement role.
        new_role: Role,
    },
    /// End the role with a recorded past end date, keeping the row.
    Terminate {
        /// The role to terminate.
        role_id: i64,
        /// The end boundary.
        end_on: Date,
    },
    /// Remove the role now, leaving no trace.
    DestroyNow {
        /// The role to remove.
        role_id: i64,
    },
    /// Do not touch roles; file an add request instead.
    RequestAdd {
        /// The request to create (or detect as duplicate).
        request: AddRequest,
    },
}

fn require_kind(attrs: &RoleAttributes) -> Result<RoleKind, CoreError> {
    attrs.kind.ok_or(CoreError::Validation {
        entity: ErrorEntity::Role,
        error: roster_domain::DomainError::MissingRoleKind,
    })
}

fn validate_kind_in_group(kind: RoleKind, group: &Group) -> Result<(), CoreError> {
    validate_role_kind_allowed(kind, group).map_err(|error| CoreError::Validation {
        entity: ErrorEntity::Role,
        error,
    })
}

/// Plans the creation of a new role.
///
/// If the target layer requires person add requests and the acting
/// user cannot see the person, the plan files an [`AddRequest`]
/// instead of creating a role.
///
/// # Errors
///
/// Returns a validation error attached to the role if the kind is
/// missing, disallowed in the target group, or the dates are not
/// ordered.
pub fn plan_role_create(
    person: &Person,
    group: &Group,
    layer: &Group,
    attrs: &RoleAttributes,
    ctx: &ChangeContext,
) -> Result<RoleChangePlan, CoreError> {
    let kind: RoleKind = require_kind(attrs)?;
    validate_kind_in_group(kind, group)?;

    let person_id: i64 = person.person_id.ok_or(CoreError::NotFound {
        entity: ErrorEntity::Person,
        id: 0,
    })?;
    let group_id: i64 = group.group_id.ok_or(CoreError::NotFound {
        entity: ErrorEntity::Group,
        id: 0,
    })?;

    if layer.require_person_add_requests
        && !ctx.actor_sees_person
        && person_id != ctx.acting_person_id
    {
        return Ok(RoleChangePlan::RequestAdd {
            request: AddRequest::new(person_id, group_id, kind, ctx.acting_person_id),
        });
    }

    // Default start is today unless the request says otherwise.
    let start_on: Option<Date> = attrs.start_on.or(Some(ctx.today));
    validate_role_dates(start_on, attrs.end_on).map_err(|error| CoreError::Validation {
        entity: ErrorEntity::Role,
        error,
    })?;

    let mut role: Role = Role::new(person_id, group_id, kind, ctx.today);
    role.label = attrs.label.clone();
    role.start_on = start_on;
    role.end_on = attrs.end_on;
    Ok(RoleChangePlan::Create { role })
}

/// Plans the mutation of an existing role.
///
/// Implements the decision table: cosmetic-only edits update in place;
/// a kind or group change terminates-and-creates outside the grace
/// window and hard-replaces within it; an end date in the past means
/// an immediate destroy. An end date targeting the acting user's own
/// role is silently dropped while the rest of the mutation applies.
///
/// # Errors
///
/// Returns a validation error attached to the role if the kind is
/// missing, disallowed in the target group, or the dates are not
/// ordered.
pub fn plan_role_update(
    existing: &Role,
    target_group: &Group,
    attrs: &RoleAttributes,
    ctx: &ChangeContext,
) -> Result<RoleChangePlan, CoreError> {
    let kind: RoleKind = require_kind(attrs)?;

    let role_id: i64 = existing.role_id.ok_or(CoreError::NotFound {
        entity: ErrorEntity::Role,
        id: 0,
    })?;

    // Nobody may schedule the end of their own role.
    let end_on: Option<Date> = if existing.person_id == ctx.acting_person_id {
        None
    } else {
        attrs.end_on
    };

    let start_on: Option<Date> = attrs.start_on.or(existing.start_on);
    validate_role_dates(start_on, end_on).map_err(|error| CoreError::Validation {
        entity: ErrorEntity::Role,
        error,
    })?;

    if end_on.is_some_and(|end| end < ctx.today) {
        // A past end date is an immediate destroy, not a scheduled one.
        return Ok(RoleChangePlan::DestroyNow { role_id });
    }

    let target_group_id: i64 = attrs.group_id.unwrap_or(existing.group_id);
    if kind == existing.kind && target_group_id == existing.group_id {
        let mut role: Role = existing.clone();
        role.label = attrs.label.clone().or(role.label);
        role.start_on = start_on;
        role.end_on = end_on.or(existing.end_on);
        role.updated_on = ctx.today;
        return Ok(RoleChangePlan::UpdateInPlace { role });
    }

    validate_kind_in_group(kind, target_group)?;

    let mut new_role: Role = Role::new(existing.person_id, target_group_id, kind, ctx.today);
    new_role.label = attrs.label.clone();

    let termination: Option<Date> = if ctx.grace.contains(existing.created_on, ctx.today) {
        // Created recently: treated as an immediate correction.
        None
    } else {
        Some(ctx.yesterday())
    };

    Ok(RoleChangePlan::Replace {
        old_role_id: role_id,
        termination,
        new_role,
    })
}

/// Plans the deletion of a role.
///
/// Roles created within the grace window and roles that have not
/// started yet are removed outright; anything else is terminated with
/// yesterday as its end boundary.
///
/// # Errors
///
/// Returns `CoreError::NotFound` if the role has no persisted id.
pub fn plan_role_destroy(
    existing: &Role,
    ctx: &ChangeContext,
) -> Result<RoleChangePlan, CoreError> {
    let role_id: i64 = existing.role_id.ok_or(CoreError::NotFound {
        entity: ErrorEntity::Role,
        id: 0,
    })?;

    if ctx.grace.contains(existing.created_on, ctx.today) || existing.is_future_on(ctx.today) {
        Ok(RoleChangePlan::DestroyNow { role_id })
    } else {
        Ok(RoleChangePlan::Terminate {
            role_id,
            end_on: ctx.yesterday(),
        })
    }
}
