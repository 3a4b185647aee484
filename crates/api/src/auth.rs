// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minimal authorization gate.
//!
//! Real authentication and the full permission policy live outside
//! this system; handlers only need to know who is acting and how far
//! their write scope reaches.

use crate::error::ApiError;

/// How far an actor's write permission reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorScope {
    /// May mutate anything.
    Admin,
    /// Full write access inside one group, nothing beyond it.
    GroupFull(i64),
}

/// The person performing an API operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The acting person's id.
    pub person_id: i64,
    /// The actor's write scope.
    pub scope: ActorScope,
}

impl Actor {
    /// Creates an admin actor.
    #[must_use]
    pub const fn admin(person_id: i64) -> Self {
        Self {
            person_id,
            scope: ActorScope::Admin,
        }
    }

    /// Creates an actor with full write access inside one group.
    #[must_use]
    pub const fn group_full(person_id: i64, group_id: i64) -> Self {
        Self {
            person_id,
            scope: ActorScope::GroupFull(group_id),
        }
    }

    /// Checks that this actor may mutate roles in the given group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AccessDenied`] if the actor's scope does
    /// not cover the group.
    pub fn authorize_group_write(&self, group_id: i64, action: &str) -> Result<(), ApiError> {
        match self.scope {
            ActorScope::Admin => Ok(()),
            ActorScope::GroupFull(scoped) if scoped == group_id => Ok(()),
            ActorScope::GroupFull(_) => Err(ApiError::AccessDenied {
                action: action.to_string(),
            }),
        }
    }

    /// Checks that this actor may move a role from one group into
    /// another.
    ///
    /// Group-scoped actors may edit roles within their group but
    /// never relocate one into a different group.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::AccessDenied`] if the actor's scope does
    /// not cover both groups.
    pub fn authorize_role_move(
        &self,
        from_group_id: i64,
        to_group_id: i64,
        action: &str,
    ) -> Result<(), ApiError> {
        self.authorize_group_write(from_group_id, action)?;
        if from_group_id != to_group_id {
            match self.scope {
                ActorScope::Admin => {}
                ActorScope::GroupFull(_) => {
                    return Err(ApiError::AccessDenied {
                        action: action.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}
