// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::RoleKind;
use serde::{Deserialize, Serialize};

/// A mailing list used as an invoice recipient source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailingList {
    /// Canonical numeric identifier assigned by the database.
    pub mailing_list_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// The group owning this list.
    pub group_id: i64,
}

impl MailingList {
    /// Creates a new `MailingList` without a persisted id.
    #[must_use]
    pub const fn new(name: String, group_id: i64) -> Self {
        Self {
            mailing_list_id: None,
            name,
            group_id,
        }
    }

    /// Creates a `MailingList` with an existing persisted id.
    #[must_use]
    pub const fn with_id(mailing_list_id: i64, name: String, group_id: i64) -> Self {
        Self {
            mailing_list_id: Some(mailing_list_id),
            name,
            group_id,
        }
    }
}

/// Declares a group as a recipient source for a mailing list, filtered
/// by a set of role kinds.
///
/// A subscription expands to "people holding one of the declared role
/// kinds within the subscriber group's subtree".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Canonical numeric identifier assigned by the database.
    pub subscription_id: Option<i64>,
    /// The mailing list this subscription feeds.
    pub mailing_list_id: i64,
    /// The subscribing group (or layer).
    pub subscriber_group_id: i64,
    /// The role kinds that make a person a subscriber.
    pub role_kinds: Vec<RoleKind>,
}

impl Subscription {
    /// Creates a new `Subscription` without a persisted id.
    #[must_use]
    pub const fn new(
        mailing_list_id: i64,
        subscriber_group_id: i64,
        role_kinds: Vec<RoleKind>,
    ) -> Self {
        Self {
            subscription_id: None,
            mailing_list_id,
            subscriber_group_id,
            role_kinds,
        }
    }
}
