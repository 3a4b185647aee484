// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{GroupKind, RoleKind};
use time::Date;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Group kind string is not recognized.
    InvalidGroupKind(String),
    /// Role kind string is not recognized.
    InvalidRoleKind(String),
    /// Role status string is not recognized.
    InvalidRoleStatus(String),
    /// Payment state string is not recognized.
    InvalidPaymentState(String),
    /// A role mutation did not carry a role kind.
    MissingRoleKind,
    /// The role kind may not exist in a group of this kind.
    RoleKindNotAllowed {
        /// The requested role kind.
        kind: RoleKind,
        /// The kind of the target group.
        group_kind: GroupKind,
    },
    /// A role's end date lies before its start date.
    InvalidDateOrder {
        /// The start date.
        start_on: Date,
        /// The end date.
        end_on: Date,
    },
    /// Person name is empty or invalid.
    InvalidName(String),
    /// No fee schedule with this name exists.
    UnknownFeeSchedule(String),
    /// An explicit recipient id could not be parsed.
    InvalidRecipientId(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGroupKind(s) => write!(f, "Invalid group kind: {s}"),
            Self::InvalidRoleKind(msg) => write!(f, "Invalid role kind: {msg}"),
            Self::InvalidRoleStatus(s) => write!(f, "Invalid role status: {s}"),
            Self::InvalidPaymentState(s) => write!(f, "Invalid payment state: {s}"),
            Self::MissingRoleKind => write!(f, "Role must have a kind"),
            Self::RoleKindNotAllowed { kind, group_kind } => {
                write!(
                    f,
                    "Role kind '{kind}' is not allowed in a group of kind '{group_kind}'"
                )
            }
            Self::InvalidDateOrder { start_on, end_on } => {
                write!(
                    f,
                    "Role end date {end_on} lies before its start date {start_on}"
                )
            }
            Self::InvalidName(msg) => write!(f, "Invalid name: {msg}"),
            Self::UnknownFeeSchedule(name) => {
                write!(f, "Unknown fee schedule: {name}")
            }
            Self::InvalidRecipientId(s) => {
                write!(f, "Invalid recipient id: '{s}'")
            }
        }
    }
}

impl std::error::Error for DomainError {}
