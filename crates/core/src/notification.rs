// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Notification surface for the acting user.
//!
//! The engines treat this as an opaque sink of (severity, message)
//! pairs; the server layer decides how to present them.

use serde::{Deserialize, Serialize};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Routine success feedback.
    Notice,
    /// Something the user should look at, short of an error.
    Alert,
}

impl Severity {
    /// Converts this severity to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Notice => "notice",
            Self::Alert => "alert",
        }
    }
}

/// A single user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Message severity.
    pub severity: Severity,
    /// Message text.
    pub message: String,
}

/// Collects notifications emitted during an engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notifications {
    entries: Vec<Notification>,
}

impl Notifications {
    /// Creates an empty sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Records a notice.
    pub fn notice(&mut self, message: String) {
        self.entries.push(Notification {
            severity: Severity::Notice,
            message,
        });
    }

    /// Records an alert.
    pub fn alert(&mut self, message: String) {
        self.entries.push(Notification {
            severity: Severity::Alert,
            message,
        });
    }

    /// Returns the recorded notifications in emission order.
    #[must_use]
    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Consumes the sink, returning the recorded notifications.
    #[must_use]
    pub fn into_entries(self) -> Vec<Notification> {
        self.entries
    }

    /// Returns the alerts only.
    #[must_use]
    pub fn alerts(&self) -> Vec<&Notification> {
        self.entries
            .iter()
            .filter(|n| n.severity == Severity::Alert)
            .collect()
    }
}
