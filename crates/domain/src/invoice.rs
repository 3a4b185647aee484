// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::RoleKind;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PaymentState {
    /// Created but not yet sent.
    #[default]
    Draft,
    /// Sent to the recipient, awaiting payment.
    Issued,
    /// Fully paid.
    Payed,
}

impl PaymentState {
    /// Converts this payment state to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Issued => "Issued",
            Self::Payed => "Payed",
        }
    }
}

impl FromStr for PaymentState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Issued" => Ok(Self::Issued),
            "Payed" => Ok(Self::Payed),
            _ => Err(DomainError::InvalidPaymentState(s.to_string())),
        }
    }
}

impl std::fmt::Display for PaymentState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One line of an invoice.
///
/// All amounts are integer cents. A static item keeps the cost and
/// count it was created with; an item carrying a `fixed_fee` schedule
/// name is re-materialized from live role headcounts at generation
/// time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Display name of the item.
    pub name: String,
    /// Cost per unit in cents.
    pub unit_cost: i64,
    /// Number of units.
    pub count: i64,
    /// Name of the fee schedule this item is derived from, if any.
    pub fixed_fee: Option<String>,
    /// The role kind this item prices, for fixed-fee items.
    pub fee_kind: Option<RoleKind>,
}

impl InvoiceItem {
    /// Creates a static item with a count of one.
    #[must_use]
    pub const fn new(name: String, unit_cost: i64) -> Self {
        Self {
            name,
            unit_cost,
            count: 1,
            fixed_fee: None,
            fee_kind: None,
        }
    }

    /// Creates a static item with an explicit count.
    #[must_use]
    pub const fn with_count(name: String, unit_cost: i64, count: i64) -> Self {
        Self {
            name,
            unit_cost,
            count,
            fixed_fee: None,
            fee_kind: None,
        }
    }

    /// Creates a dynamically priced item bound to a fee schedule.
    ///
    /// Cost and count are placeholders until batch generation
    /// recomputes them from the live headcount of the given role kind.
    #[must_use]
    pub const fn fixed_fee(
        name: String,
        unit_cost: i64,
        schedule: String,
        kind: RoleKind,
    ) -> Self {
        Self {
            name,
            unit_cost,
            count: 0,
            fixed_fee: Some(schedule),
            fee_kind: Some(kind),
        }
    }

    /// Returns the total amount of this line in cents.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.unit_cost * self.count
    }
}

/// One bill addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Canonical numeric identifier assigned by the database.
    pub invoice_id: Option<i64>,
    /// Invoice title.
    pub title: String,
    /// The billing group.
    pub group_id: i64,
    /// The recipient person. `None` while the invoice is still a
    /// batch template.
    pub recipient_id: Option<i64>,
    /// Payment state.
    pub state: PaymentState,
    /// Day the invoice was issued, if any.
    pub issued_on: Option<Date>,
    /// Line items.
    pub items: Vec<InvoiceItem>,
}

impl Invoice {
    /// Creates a new draft invoice without a persisted id.
    #[must_use]
    pub const fn new(title: String, group_id: i64) -> Self {
        Self {
            invoice_id: None,
            title,
            group_id,
            recipient_id: None,
            state: PaymentState::Draft,
            issued_on: None,
            items: Vec::new(),
        }
    }

    /// Returns the total amount across all line items in cents.
    #[must_use]
    pub fn total(&self) -> i64 {
        self.items.iter().map(InvoiceItem::total).sum()
    }
}

/// The source a batch of invoice recipients is resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Receiver {
    /// People matching every subscription of this mailing list.
    MailingList(i64),
    /// Distinct people across all current roles of this group.
    Group(i64),
}

/// A batch invoice-generation request plus its aggregate counters.
///
/// Exclusively owns its template invoice until generation; generation
/// produces new invoices each owned by one (recipient, list) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceList {
    /// Canonical numeric identifier assigned by the database.
    /// Transient ad-hoc runs (explicit recipient ids, no receiver) are
    /// never persisted and keep `None`.
    pub invoice_list_id: Option<i64>,
    /// Display title of the batch.
    pub title: String,
    /// The billing group.
    pub group_id: i64,
    /// Where recipients are resolved from. `None` means the explicit
    /// `recipient_ids` list is used.
    pub receiver: Option<Receiver>,
    /// Explicit recipient person ids, used when `receiver` is `None`.
    pub recipient_ids: Vec<i64>,
    /// The template invoice cloned per recipient.
    pub invoice: Invoice,
    /// Name of the fee schedule backing this list's fixed-fee items,
    /// if any. When set, generated invoice titles carry the billing
    /// layer's display name.
    pub fixed_fee: Option<String>,
    /// Number of successfully created invoices.
    pub recipients_total: i64,
    /// Number of created invoices already in a paid state.
    pub recipients_paid: i64,
    /// Number of recipients processed so far (successes and failures).
    pub recipients_processed: i64,
    /// Sum of created invoice amounts in cents.
    pub amount_total: i64,
    /// Sum of created invoice amounts already paid, in cents.
    pub amount_paid: i64,
    /// Person ids whose invoice could not be persisted.
    pub invalid_recipient_ids: Vec<i64>,
}

impl InvoiceList {
    /// Creates a new invoice list without a persisted id.
    #[must_use]
    pub const fn new(
        title: String,
        group_id: i64,
        receiver: Option<Receiver>,
        invoice: Invoice,
    ) -> Self {
        Self {
            invoice_list_id: None,
            title,
            group_id,
            receiver,
            recipient_ids: Vec::new(),
            invoice,
            fixed_fee: None,
            recipients_total: 0,
            recipients_paid: 0,
            recipients_processed: 0,
            amount_total: 0,
            amount_paid: 0,
            invalid_recipient_ids: Vec::new(),
        }
    }

    /// Parses a comma-separated recipient id string into the explicit
    /// recipient list.
    ///
    /// # Errors
    ///
    /// Returns an error if any element is not a valid id.
    pub fn set_recipient_ids(&mut self, ids: &str) -> Result<(), DomainError> {
        let mut parsed: Vec<i64> = Vec::new();
        for part in ids.split(',') {
            let trimmed: &str = part.trim();
            if trimmed.is_empty() {
                continue;
            }
            let id: i64 = trimmed
                .parse()
                .map_err(|_| DomainError::InvalidRecipientId(trimmed.to_string()))?;
            parsed.push(id);
        }
        self.recipient_ids = parsed;
        Ok(())
    }

    /// Returns whether this list is persisted together with its
    /// aggregate counters after generation.
    ///
    /// Only lists with a receiver are persistable; explicit-id runs
    /// leave nothing behind but the generated invoices.
    #[must_use]
    pub const fn is_persistable(&self) -> bool {
        self.receiver.is_some()
    }
}
