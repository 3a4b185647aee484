// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{Group, RoleKind};
use time::Date;

/// Validates that a role's date bounds are ordered.
///
/// Unbounded sides are always valid.
///
/// # Errors
///
/// Returns `DomainError::InvalidDateOrder` if the end date lies before
/// the start date.
pub fn validate_role_dates(
    start_on: Option<Date>,
    end_on: Option<Date>,
) -> Result<(), DomainError> {
    if let (Some(start), Some(end)) = (start_on, end_on)
        && end < start
    {
        return Err(DomainError::InvalidDateOrder {
            start_on: start,
            end_on: end,
        });
    }
    Ok(())
}

/// Validates that a role kind may exist in the target group.
///
/// # Errors
///
/// Returns `DomainError::RoleKindNotAllowed` if the capability table
/// forbids the combination.
pub fn validate_role_kind_allowed(kind: RoleKind, group: &Group) -> Result<(), DomainError> {
    if kind.allowed_in(group.kind) {
        Ok(())
    } else {
        Err(DomainError::RoleKindNotAllowed {
            kind,
            group_kind: group.kind,
        })
    }
}

/// Validates a person's display name.
///
/// # Errors
///
/// Returns `DomainError::InvalidName` if the name is empty or blank.
pub fn validate_person_name(name: &str) -> Result<(), DomainError> {
    if name.trim().is_empty() {
        return Err(DomainError::InvalidName(String::from(
            "Name must not be empty",
        )));
    }
    Ok(())
}
