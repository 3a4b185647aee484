// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory fakes backing the engine tests.

use crate::error::ErrorEntity;
use crate::store::{InvoiceStore, JobQueue, RecipientSource, RoleStore, StoreError};
use roster_domain::{
    AddRequest, Group, GroupKind, Invoice, InvoiceList, Person, Role, RoleKind, RoleStatus,
    Subscription,
};
use time::macros::date;
use time::Date;

/// The fixed "today" all engine tests run on.
pub const TODAY: Date = date!(2026 - 03 - 15);

/// In-memory store implementing every engine seam.
#[derive(Debug, Default)]
pub struct FakeStore {
    pub people: Vec<Person>,
    pub groups: Vec<Group>,
    pub roles: Vec<Role>,
    pub add_requests: Vec<AddRequest>,
    pub invoices: Vec<Invoice>,
    pub invoice_lists: Vec<InvoiceList>,
    pub subscriptions: Vec<Subscription>,
    pub jobs: Vec<(String, String)>,
    pub next_id: i64,
    /// When set, `delete_role` fails with this veto reason.
    pub veto_delete: Option<String>,
    /// Person ids whose invoice save is rejected.
    pub fail_saves_for: Vec<i64>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self {
            next_id: 100,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_person(&mut self, name: &str) -> i64 {
        let id: i64 = self.next_id();
        self.people
            .push(Person::with_id(id, name.to_string(), None));
        id
    }

    pub fn add_layer(&mut self, name: &str) -> i64 {
        let id: i64 = self.next_id();
        self.groups.push(Group::with_id(
            id,
            name.to_string(),
            GroupKind::Layer,
            None,
            Some(id),
            false,
        ));
        id
    }

    pub fn add_group(&mut self, name: &str, layer_id: i64) -> i64 {
        let id: i64 = self.next_id();
        self.groups.push(Group::with_id(
            id,
            name.to_string(),
            GroupKind::Group,
            Some(layer_id),
            Some(layer_id),
            false,
        ));
        id
    }

    pub fn add_role(&mut self, person_id: i64, group_id: i64, kind: RoleKind) -> i64 {
        self.add_role_created(person_id, group_id, kind, TODAY)
    }

    pub fn add_role_created(
        &mut self,
        person_id: i64,
        group_id: i64,
        kind: RoleKind,
        created_on: Date,
    ) -> i64 {
        let id: i64 = self.next_id();
        let mut role: Role = Role::new(person_id, group_id, kind, created_on);
        role.role_id = Some(id);
        self.roles.push(role);
        id
    }

    pub fn role(&self, role_id: i64) -> Option<&Role> {
        self.roles.iter().find(|r| r.role_id == Some(role_id))
    }

    pub fn person(&self, person_id: i64) -> &Person {
        self.people
            .iter()
            .find(|p| p.person_id == Some(person_id))
            .unwrap()
    }

    fn subtree_ids(&self, group_id: i64) -> Vec<i64> {
        self.groups
            .iter()
            .filter_map(|g| g.group_id)
            .filter(|&id| {
                id == group_id
                    || self
                        .groups
                        .iter()
                        .any(|g| g.group_id == Some(id) && g.layer_group_id == Some(group_id))
            })
            .collect()
    }
}

impl RoleStore for FakeStore {
    fn find_person(&mut self, person_id: i64) -> Result<Person, StoreError> {
        self.people
            .iter()
            .find(|p| p.person_id == Some(person_id))
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: ErrorEntity::Person,
                id: person_id,
            })
    }

    fn find_group(&mut self, group_id: i64) -> Result<Group, StoreError> {
        self.groups
            .iter()
            .find(|g| g.group_id == Some(group_id))
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: ErrorEntity::Group,
                id: group_id,
            })
    }

    fn find_role(&mut self, role_id: i64) -> Result<Role, StoreError> {
        self.role(role_id).cloned().ok_or(StoreError::NotFound {
            entity: ErrorEntity::Role,
            id: role_id,
        })
    }

    fn active_roles_of_person(&mut self, person_id: i64) -> Result<Vec<Role>, StoreError> {
        Ok(self
            .roles
            .iter()
            .filter(|r| r.person_id == person_id && r.status == RoleStatus::Active)
            .cloned()
            .collect())
    }

    fn insert_role(&mut self, role: &Role) -> Result<i64, StoreError> {
        let id: i64 = self.next_id();
        let mut stored: Role = role.clone();
        stored.role_id = Some(id);
        self.roles.push(stored);
        Ok(id)
    }

    fn update_role(&mut self, role: &Role) -> Result<(), StoreError> {
        let existing: &mut Role = self
            .roles
            .iter_mut()
            .find(|r| r.role_id == role.role_id)
            .ok_or(StoreError::NotFound {
                entity: ErrorEntity::Role,
                id: role.role_id.unwrap_or(0),
            })?;
        *existing = role.clone();
        Ok(())
    }

    fn terminate_role(&mut self, role_id: i64, end_on: Date) -> Result<(), StoreError> {
        let existing: &mut Role = self
            .roles
            .iter_mut()
            .find(|r| r.role_id == Some(role_id))
            .ok_or(StoreError::NotFound {
                entity: ErrorEntity::Role,
                id: role_id,
            })?;
        existing.status = RoleStatus::Terminated;
        existing.end_on = Some(end_on);
        Ok(())
    }

    fn delete_role(&mut self, role_id: i64) -> Result<(), StoreError> {
        if let Some(reason) = &self.veto_delete {
            return Err(StoreError::Vetoed {
                reason: reason.clone(),
            });
        }
        let before: usize = self.roles.len();
        self.roles.retain(|r| r.role_id != Some(role_id));
        if self.roles.len() == before {
            return Err(StoreError::NotFound {
                entity: ErrorEntity::Role,
                id: role_id,
            });
        }
        Ok(())
    }

    fn set_primary_group(
        &mut self,
        person_id: i64,
        group_id: Option<i64>,
    ) -> Result<(), StoreError> {
        let person: &mut Person = self
            .people
            .iter_mut()
            .find(|p| p.person_id == Some(person_id))
            .ok_or(StoreError::NotFound {
                entity: ErrorEntity::Person,
                id: person_id,
            })?;
        person.primary_group_id = group_id;
        Ok(())
    }

    fn find_add_request(
        &mut self,
        person_id: i64,
        body_group_id: i64,
    ) -> Result<Option<AddRequest>, StoreError> {
        Ok(self
            .add_requests
            .iter()
            .find(|r| r.person_id == person_id && r.body_group_id == body_group_id)
            .cloned())
    }

    fn insert_add_request(&mut self, request: &AddRequest) -> Result<i64, StoreError> {
        let id: i64 = self.next_id();
        let mut stored: AddRequest = request.clone();
        stored.add_request_id = Some(id);
        self.add_requests.push(stored);
        Ok(id)
    }
}

impl InvoiceStore for FakeStore {
    fn save_invoice(&mut self, invoice: &Invoice) -> Result<i64, StoreError> {
        if let Some(recipient_id) = invoice.recipient_id
            && self.fail_saves_for.contains(&recipient_id)
        {
            return Err(StoreError::Validation {
                entity: ErrorEntity::Invoice,
                message: String::from("rejected by test"),
            });
        }
        let id: i64 = self.next_id();
        let mut stored: Invoice = invoice.clone();
        stored.invoice_id = Some(id);
        self.invoices.push(stored);
        Ok(id)
    }

    fn save_invoice_list(&mut self, list: &InvoiceList) -> Result<i64, StoreError> {
        if let Some(id) = list.invoice_list_id {
            if let Some(existing) = self
                .invoice_lists
                .iter_mut()
                .find(|l| l.invoice_list_id == Some(id))
            {
                *existing = list.clone();
                return Ok(id);
            }
        }
        let id: i64 = self.next_id();
        let mut stored: InvoiceList = list.clone();
        stored.invoice_list_id = Some(id);
        self.invoice_lists.push(stored);
        Ok(id)
    }

    fn layer_of_group(&mut self, group_id: i64) -> Result<Group, StoreError> {
        let group: Group = RoleStore::find_group(self, group_id)?;
        let layer_id: i64 = group.layer_id().ok_or(StoreError::NotFound {
            entity: ErrorEntity::Group,
            id: group_id,
        })?;
        RoleStore::find_group(self, layer_id)
    }

    fn count_active_roles(
        &mut self,
        layer_group_id: i64,
        kind: RoleKind,
        day: Date,
    ) -> Result<i64, StoreError> {
        let subtree: Vec<i64> = self.subtree_ids(layer_group_id);
        let count: usize = self
            .roles
            .iter()
            .filter(|r| r.kind == kind && r.is_active_on(day) && subtree.contains(&r.group_id))
            .count();
        Ok(count as i64)
    }
}

impl RecipientSource for FakeStore {
    fn subscriptions_of(
        &mut self,
        mailing_list_id: i64,
    ) -> Result<Vec<Subscription>, StoreError> {
        Ok(self
            .subscriptions
            .iter()
            .filter(|s| s.mailing_list_id == mailing_list_id)
            .cloned()
            .collect())
    }

    fn people_with_role_kinds(
        &mut self,
        group_id: i64,
        kinds: &[RoleKind],
        day: Date,
    ) -> Result<Vec<i64>, StoreError> {
        let subtree: Vec<i64> = self.subtree_ids(group_id);
        Ok(self
            .roles
            .iter()
            .filter(|r| {
                kinds.contains(&r.kind) && r.is_active_on(day) && subtree.contains(&r.group_id)
            })
            .map(|r| r.person_id)
            .collect())
    }

    fn people_of_group(&mut self, group_id: i64, day: Date) -> Result<Vec<i64>, StoreError> {
        Ok(self
            .roles
            .iter()
            .filter(|r| r.group_id == group_id && r.is_active_on(day))
            .map(|r| r.person_id)
            .collect())
    }
}

impl JobQueue for FakeStore {
    fn enqueue(&mut self, kind: &str, payload_json: &str) -> Result<i64, StoreError> {
        self.jobs.push((kind.to_string(), payload_json.to_string()));
        let id: i64 = self.next_id();
        Ok(id)
    }
}
