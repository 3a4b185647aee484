// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Classifies a node of the group tree.
///
/// The source system modeled this with deep subclassing; here it is a
/// closed set of tagged variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GroupKind {
    /// A layer: the top-most enclosing node of a subtree. Layers own
    /// fee schedules and the person-add-request policy.
    Layer,
    /// A plain group nested below a layer.
    #[default]
    Group,
}

impl GroupKind {
    /// Converts this group kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Layer => "Layer",
            Self::Group => "Group",
        }
    }
}

impl FromStr for GroupKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Layer" => Ok(Self::Layer),
            "Group" => Ok(Self::Group),
            _ => Err(DomainError::InvalidGroupKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The kind of association a person holds within a group.
///
/// Role kinds are fixed domain constants. The capability table below
/// replaces the source's role-type inheritance hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleKind {
    /// Leads a group or layer.
    Leader,
    /// Administrative support within a plain group.
    Secretary,
    /// Ordinary member.
    Member,
    /// Guest without membership obligations.
    Guest,
}

impl RoleKind {
    /// Parses a role kind from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string does not match a valid role kind.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "Leader" => Ok(Self::Leader),
            "Secretary" => Ok(Self::Secretary),
            "Member" => Ok(Self::Member),
            "Guest" => Ok(Self::Guest),
            _ => Err(DomainError::InvalidRoleKind(format!(
                "Unknown role kind: {s}"
            ))),
        }
    }

    /// Returns the string representation of this role kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Leader => "Leader",
            Self::Secretary => "Secretary",
            Self::Member => "Member",
            Self::Guest => "Guest",
        }
    }

    /// Returns the plural display label used on generated invoice items.
    #[must_use]
    pub const fn plural_label(&self) -> &'static str {
        match self {
            Self::Leader => "Leaders",
            Self::Secretary => "Secretaries",
            Self::Member => "Members",
            Self::Guest => "Guests",
        }
    }

    /// Checks whether this role kind may exist in a group of the given kind.
    ///
    /// Secretaries are scoped to plain groups; every other kind is valid
    /// anywhere in the tree.
    #[must_use]
    pub const fn allowed_in(&self, group_kind: GroupKind) -> bool {
        match self {
            Self::Secretary => matches!(group_kind, GroupKind::Group),
            Self::Leader | Self::Member | Self::Guest => true,
        }
    }

    /// Returns whether roles of this kind count toward fee headcounts.
    #[must_use]
    pub const fn fee_relevant(&self) -> bool {
        matches!(self, Self::Leader | Self::Member)
    }

    /// All role kinds, in a stable order.
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Leader, Self::Secretary, Self::Member, Self::Guest]
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A person tracked by the system.
///
/// `person_id` is the canonical identifier; `None` indicates the person
/// has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Canonical numeric identifier assigned by the database.
    pub person_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// The group this person is principally associated with.
    /// Mutated only by the role transition engine's rules.
    pub primary_group_id: Option<i64>,
}

impl Person {
    /// Creates a new `Person` without a persisted id.
    #[must_use]
    pub const fn new(name: String) -> Self {
        Self {
            person_id: None,
            name,
            primary_group_id: None,
        }
    }

    /// Creates a `Person` with an existing persisted id.
    #[must_use]
    pub const fn with_id(
        person_id: i64,
        name: String,
        primary_group_id: Option<i64>,
    ) -> Self {
        Self {
            person_id: Some(person_id),
            name,
            primary_group_id,
        }
    }
}

/// A node of the group tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Canonical numeric identifier assigned by the database.
    pub group_id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Whether this node is a layer or a plain group.
    pub kind: GroupKind,
    /// The parent node, `None` for the root layer.
    pub parent_id: Option<i64>,
    /// The top-most enclosing layer. For a persisted layer this is its
    /// own id.
    pub layer_group_id: Option<i64>,
    /// When set on a layer, creating roles for people the actor cannot
    /// see requires an add request instead.
    pub require_person_add_requests: bool,
}

impl Group {
    /// Creates a new layer without a persisted id.
    #[must_use]
    pub const fn new_layer(name: String) -> Self {
        Self {
            group_id: None,
            name,
            kind: GroupKind::Layer,
            parent_id: None,
            layer_group_id: None,
            require_person_add_requests: false,
        }
    }

    /// Creates a new plain group without a persisted id.
    ///
    /// # Arguments
    ///
    /// * `name` - Display name
    /// * `parent_id` - The parent node's id
    /// * `layer_group_id` - The enclosing layer's id
    #[must_use]
    pub const fn new_group(name: String, parent_id: i64, layer_group_id: i64) -> Self {
        Self {
            group_id: None,
            name,
            kind: GroupKind::Group,
            parent_id: Some(parent_id),
            layer_group_id: Some(layer_group_id),
            require_person_add_requests: false,
        }
    }

    /// Creates a `Group` with an existing persisted id.
    #[must_use]
    pub const fn with_id(
        group_id: i64,
        name: String,
        kind: GroupKind,
        parent_id: Option<i64>,
        layer_group_id: Option<i64>,
        require_person_add_requests: bool,
    ) -> Self {
        Self {
            group_id: Some(group_id),
            name,
            kind,
            parent_id,
            layer_group_id,
            require_person_add_requests,
        }
    }

    /// Returns the id of the enclosing layer.
    ///
    /// A persisted layer is its own enclosing layer.
    #[must_use]
    pub const fn layer_id(&self) -> Option<i64> {
        match self.kind {
            GroupKind::Layer => self.group_id,
            GroupKind::Group => self.layer_group_id,
        }
    }
}
