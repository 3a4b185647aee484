// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Executes a planned role change against the storage seam.

use crate::error::CoreError;
use crate::notification::Notifications;
use crate::primary_group::{PrimaryGroupOutcome, maintain_primary_group};
use crate::role_change::RoleChangePlan;
use crate::store::{RoleStore, StoreError};
use roster_domain::{Person, Role, RoleStatus};
use tracing::info;

/// The result of applying a role change plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleChangeOutcome {
    /// Id of the created or updated role, if any.
    pub role_id: Option<i64>,
    /// Id of the terminated or removed role, if any.
    pub removed_role_id: Option<i64>,
    /// Id of the created add request, if any.
    pub add_request_id: Option<i64>,
    /// The person's primary group pointer after maintenance.
    pub primary_group_id: Option<i64>,
}

/// Applies a planned role change.
///
/// Destroy vetoes are never swallowed: a vetoed deletion surfaces as
/// [`CoreError::DestroyVetoed`] with the storage layer's reason.
/// Primary-group maintenance runs after any role removal; when the
/// person's pointer is reassigned and more than one group remained to
/// choose from, a warning naming the chosen group is recorded on the
/// notification sink.
///
/// # Errors
///
/// Returns an error if a lookup or write fails, or if a deletion is
/// vetoed.
#[allow(clippy::too_many_lines)]
pub fn apply_role_change(
    plan: RoleChangePlan,
    store: &mut dyn RoleStore,
    notifications: &mut Notifications,
) -> Result<RoleChangeOutcome, CoreError> {
    match plan {
        RoleChangePlan::Create { role } => {
            let role_id: i64 = store.insert_role(&role)?;
            let person: Person = store.find_person(role.person_id)?;
            let group_name: String = store.find_group(role.group_id)?.name;
            info!(role_id, person_id = role.person_id, "role created");
            notifications.notice(format!(
                "Role {} for {} in {} was successfully created.",
                role.display_name(),
                person.name,
                group_name
            ));
            Ok(RoleChangeOutcome {
                role_id: Some(role_id),
                primary_group_id: person.primary_group_id,
                ..RoleChangeOutcome::default()
            })
        }
        RoleChangePlan::UpdateInPlace { role } => {
            store.update_role(&role)?;
            let person: Person = store.find_person(role.person_id)?;
            let group_name: String = store.find_group(role.group_id)?.name;
            notifications.notice(format!(
                "Role {} for {} in {} was successfully updated.",
                role.display_name(),
                person.name,
                group_name
            ));
            Ok(RoleChangeOutcome {
                role_id: role.role_id,
                primary_group_id: person.primary_group_id,
                ..RoleChangeOutcome::default()
            })
        }
        RoleChangePlan::Replace {
            old_role_id,
            termination,
            new_role,
        } => {
            let old_role: Role = store.find_role(old_role_id)?;
            let old_display: String = termination.map_or_else(
                || old_role.display_name(),
                |end_on| format!("{} (until {end_on})", old_role.display_name()),
            );

            match termination {
                Some(end_on) => store.terminate_role(old_role_id, end_on)?,
                None => store.delete_role(old_role_id)?,
            }
            let role_id: i64 = store.insert_role(&new_role)?;

            let person: Person = store.find_person(new_role.person_id)?;
            let old_group_name: String = store.find_group(old_role.group_id)?.name;

            // The pointer follows the role when it leaves the primary group.
            let mut primary_group_id: Option<i64> = person.primary_group_id;
            if new_role.group_id != old_role.group_id {
                if person.primary_group_id == Some(old_role.group_id) {
                    store.set_primary_group(new_role.person_id, Some(new_role.group_id))?;
                    primary_group_id = Some(new_role.group_id);
                }
                let new_group_name: String = store.find_group(new_role.group_id)?.name;
                notifications.notice(format!(
                    "Role {old_display} for {} in {old_group_name} changed to {} in {new_group_name}.",
                    person.name,
                    new_role.kind
                ));
            } else {
                notifications.notice(format!(
                    "Role {old_display} for {} in {old_group_name} changed to {}.",
                    person.name,
                    new_role.kind
                ));
            }

            info!(
                old_role_id,
                role_id,
                terminated = termination.is_some(),
                "role replaced"
            );
            Ok(RoleChangeOutcome {
                role_id: Some(role_id),
                removed_role_id: Some(old_role_id),
                add_request_id: None,
                primary_group_id,
            })
        }
        RoleChangePlan::Terminate { role_id, end_on } => {
            let role: Role = store.find_role(role_id)?;
            store.terminate_role(role_id, end_on)?;
            let mut removed: Role = role;
            removed.status = RoleStatus::Terminated;
            removed.end_on = Some(end_on);

            let person: Person = store.find_person(removed.person_id)?;
            let group_name: String = store.find_group(removed.group_id)?.name;
            notifications.notice(format!(
                "Role {} (until {end_on}) for {} in {} was successfully deleted.",
                removed.display_name(),
                person.name,
                group_name
            ));

            let primary_group_id: Option<i64> =
                run_primary_group_maintenance(&person, &removed, store, notifications)?;
            Ok(RoleChangeOutcome {
                role_id: None,
                removed_role_id: Some(role_id),
                add_request_id: None,
                primary_group_id,
            })
        }
        RoleChangePlan::DestroyNow { role_id } => {
            let removed: Role = store.find_role(role_id)?;
            store.delete_role(role_id)?;

            let person: Person = store.find_person(removed.person_id)?;
            let group_name: String = store.find_group(removed.group_id)?.name;
            notifications.notice(format!(
                "Role {} for {} in {} was successfully deleted.",
                removed.display_name(),
                person.name,
                group_name
            ));

            let primary_group_id: Option<i64> =
                run_primary_group_maintenance(&person, &removed, store, notifications)?;
            Ok(RoleChangeOutcome {
                role_id: None,
                removed_role_id: Some(role_id),
                add_request_id: None,
                primary_group_id,
            })
        }
        RoleChangePlan::RequestAdd { request } => {
            let person: Person = store.find_person(request.person_id)?;
            let existing: Option<roster_domain::AddRequest> =
                store.find_add_request(request.person_id, request.body_group_id)?;
            if let Some(existing) = existing {
                notifications.alert(format!("{} was already requested.", person.name));
                return Ok(RoleChangeOutcome {
                    add_request_id: existing.add_request_id,
                    primary_group_id: person.primary_group_id,
                    ..RoleChangeOutcome::default()
                });
            }
            let add_request_id: i64 = store.insert_add_request(&request)?;
            info!(add_request_id, person_id = request.person_id, "add request created");
            notifications.alert(format!("Request to add {} was sent.", person.name));
            Ok(RoleChangeOutcome {
                add_request_id: Some(add_request_id),
                primary_group_id: person.primary_group_id,
                ..RoleChangeOutcome::default()
            })
        }
    }
}

fn run_primary_group_maintenance(
    person: &Person,
    removed: &Role,
    store: &mut dyn RoleStore,
    notifications: &mut Notifications,
) -> Result<Option<i64>, CoreError> {
    let remaining: Vec<Role> = store
        .active_roles_of_person(removed.person_id)?
        .into_iter()
        .filter(|role| role.role_id != removed.role_id)
        .collect();

    let outcome: PrimaryGroupOutcome = maintain_primary_group(person, removed, &remaining);
    if outcome.changed {
        store.set_primary_group(removed.person_id, outcome.primary_group_id)?;
        if outcome.warn
            && let Some(group_id) = outcome.primary_group_id
        {
            let group_name: String = match store.find_group(group_id) {
                Ok(group) => group.name,
                Err(StoreError::NotFound { .. }) => group_id.to_string(),
                Err(err) => return Err(err.into()),
            };
            notifications.alert(format!("Primary group changed to {group_name}."));
        }
    }
    Ok(outcome.primary_group_id)
}
