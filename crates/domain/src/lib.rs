// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod fee;
mod invoice;
mod role;
mod subscription;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use fee::{FeeSchedule, MEMBERSHIP};
pub use invoice::{
    Invoice, InvoiceItem, InvoiceList, PaymentState, Receiver,
};
pub use role::{AddRequest, GraceWindow, Role, RoleStatus};
pub use subscription::{MailingList, Subscription};
pub use types::{Group, GroupKind, Person, RoleKind};
pub use validation::{
    validate_person_name, validate_role_dates, validate_role_kind_allowed,
};
