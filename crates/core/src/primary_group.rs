// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use roster_domain::{Person, Role};
use std::collections::BTreeSet;

/// The result of primary-group maintenance after a role removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimaryGroupOutcome {
    /// The primary group the person should point at afterwards.
    pub primary_group_id: Option<i64>,
    /// Whether the pointer changed.
    pub changed: bool,
    /// Whether the caller should surface a warning naming the newly
    /// chosen group. Set only when more than one distinct group
    /// remained to choose from.
    pub warn: bool,
}

/// Recomputes a person's primary group after one of their roles was
/// removed (terminated or hard-deleted).
///
/// Rules:
/// - the removed role was not in the primary group, or another role in
///   the primary group remains: leave the pointer untouched, no warning;
/// - roles remain in exactly one other group: reassign silently;
/// - roles remain in two or more other groups: reassign to the group of
///   the most-recently-touched remaining role and warn;
/// - no roles remain at all: clear the pointer, no warning.
///
/// `remaining` must not include the removed role.
#[must_use]
pub fn maintain_primary_group(
    person: &Person,
    removed_role: &Role,
    remaining: &[Role],
) -> PrimaryGroupOutcome {
    let current: Option<i64> = person.primary_group_id;
    let unchanged: PrimaryGroupOutcome = PrimaryGroupOutcome {
        primary_group_id: current,
        changed: false,
        warn: false,
    };

    if current != Some(removed_role.group_id) {
        return unchanged;
    }
    if remaining
        .iter()
        .any(|role| Some(role.group_id) == current)
    {
        return unchanged;
    }

    if remaining.is_empty() {
        return PrimaryGroupOutcome {
            primary_group_id: None,
            changed: current.is_some(),
            warn: false,
        };
    }

    // Most recently touched role wins; role id breaks update-day ties.
    let chosen: &Role = remaining
        .iter()
        .reduce(|best, candidate| {
            let best_key = (best.updated_on, best.role_id);
            let candidate_key = (candidate.updated_on, candidate.role_id);
            if candidate_key > best_key { candidate } else { best }
        })
        .unwrap_or(removed_role);

    let distinct_groups: BTreeSet<i64> = remaining.iter().map(|role| role.group_id).collect();

    PrimaryGroupOutcome {
        primary_group_id: Some(chosen.group_id),
        changed: true,
        warn: distinct_groups.len() > 1,
    }
}
