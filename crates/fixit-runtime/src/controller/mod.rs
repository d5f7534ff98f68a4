//! Session and role aware report lifecycle controllers.
//!
//! | Controller | Session access | Writes session |
//! |------------|----------------|----------------|
//! | [`RoleResolver`] | reader | never |
//! | [`ReportSynchronizer`] | writer | clear on 401 |
//! | [`StatusTransitionController`] | reader | never |
//! | [`CreationFlow`] | reader | never |
//! | [`AccountFlow`] | writer | set on login, clear on logout |
//!
//! Views ([`ReportsView`], [`CreationView`]) compose these and add the
//! liveness check for results arriving after the view closed.

mod account;
mod creation;
mod error;
mod role;
mod status;
mod sync;
mod view;

pub use account::{AccountFlow, ResetHandshake, ResetStep, MIN_PASSWORD_LEN};
pub use creation::CreationFlow;
pub use error::ControllerError;
pub use role::RoleResolver;
pub use status::StatusTransitionController;
pub use sync::{ReportCollection, ReportSynchronizer};
pub use view::{CreationView, ReportsView, ViewLifetime};
