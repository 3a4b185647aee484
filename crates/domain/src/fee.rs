// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Named fee schedules.
//!
//! A fee schedule maps fee-relevant role kinds to a cost per head in
//! cents. Fixed-fee invoice items reference a schedule by name and are
//! re-priced from live headcounts at batch generation time.

use crate::error::DomainError;
use crate::invoice::{InvoiceItem, InvoiceList};
use crate::types::RoleKind;
use serde::{Deserialize, Serialize};

/// The membership fee schedule name.
pub const MEMBERSHIP: &str = "membership";

/// A named per-role-kind cost table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Schedule name, referenced by fixed-fee invoice items.
    name: String,
    /// Display label used on generated item names.
    label: String,
    /// Cost per head in cents, by role kind.
    costs: Vec<(RoleKind, i64)>,
}

impl FeeSchedule {
    /// Looks up a built-in fee schedule by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no schedule with that name exists.
    pub fn named(name: &str) -> Result<Self, DomainError> {
        match name {
            MEMBERSHIP => Ok(Self::membership()),
            _ => Err(DomainError::UnknownFeeSchedule(name.to_string())),
        }
    }

    /// The built-in membership fee schedule.
    #[must_use]
    pub fn membership() -> Self {
        Self {
            name: MEMBERSHIP.to_string(),
            label: String::from("Membership fee"),
            costs: vec![(RoleKind::Leader, 1500), (RoleKind::Member, 2000)],
        }
    }

    /// Returns the schedule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cost per head in cents for a role kind, if the kind
    /// is covered by this schedule.
    #[must_use]
    pub fn cost_for(&self, kind: RoleKind) -> Option<i64> {
        self.costs
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, cost)| *cost)
    }

    /// Returns the covered role kinds in schedule order.
    #[must_use]
    pub fn kinds(&self) -> Vec<RoleKind> {
        self.costs.iter().map(|(kind, _)| *kind).collect()
    }

    /// Attaches this schedule to an invoice list.
    ///
    /// Builds one fixed-fee template item per covered role kind and
    /// marks the list so generated titles carry the billing layer's
    /// name. Counts stay zero until generation recomputes them.
    pub fn prepare(&self, list: &mut InvoiceList) {
        for (kind, cost) in &self.costs {
            let item: InvoiceItem = InvoiceItem::fixed_fee(
                format!("{} - {}", self.label, kind.plural_label()),
                *cost,
                self.name.clone(),
                *kind,
            );
            list.invoice.items.push(item);
        }
        list.fixed_fee = Some(self.name.clone());
    }
}
