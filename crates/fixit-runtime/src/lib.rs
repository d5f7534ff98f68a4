//! FixIt console runtime.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          fixit-cli                           │
//! └──────────────────────────────────────────────────────────────┘
//!          │ views / flows                      │ config, store
//!          ▼                                    ▼
//! ┌──────────────────────────────┐   ┌───────────────────────────┐
//! │ controller                   │   │ config   (layered TOML)   │
//! │  ReportsView   CreationView  │   │ store    (credential file)│
//! │  RoleResolver  Synchronizer  │   └───────────────────────────┘
//! │  StatusTransition  Creation  │
//! │  AccountFlow   ResetHandshake│
//! └──────────────────────────────┘
//!          │ Arc<dyn ApiGateway>
//!          ▼
//! ┌──────────────────────────────┐
//! │ gateway                      │
//! │  HttpGateway (reqwest)       │
//! │  FakeGateway (testing)       │
//! └──────────────────────────────┘
//! ```
//!
//! # Session Ownership
//!
//! Controllers receive a [`SessionReader`](fixit_auth::SessionReader).
//! Only [`AccountFlow`](controller::AccountFlow) and
//! [`ReportSynchronizer`](controller::ReportSynchronizer) receive a
//! [`SessionWriter`](fixit_auth::SessionWriter).

pub mod config;
pub mod controller;
pub mod gateway;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use controller::{
    AccountFlow, ControllerError, CreationFlow, CreationView, ReportCollection,
    ReportSynchronizer, ReportsView, ResetHandshake, ResetStep, RoleResolver,
    StatusTransitionController, ViewLifetime,
};
pub use gateway::{ApiGateway, GatewayError, HttpGateway, TransportKind};
pub use store::{persist_session, CredentialFile, StorageError};
