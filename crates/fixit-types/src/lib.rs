//! Core types for the FixIt report console.
//!
//! # Crate Architecture
//!
//! ```text
//! fixit-types    : ReportId, Report, TriageResult, ErrorCode  ◄── HERE
//!     ↑
//! fixit-auth     : Credential, Role, SessionReader / SessionWriter
//!     ↑
//! fixit-runtime  : ApiGateway, controllers, config, credential file
//!     ↑
//! fixit-cli      : `fixit` binary
//! ```
//!
//! Types in this crate mirror the server's JSON shapes and carry no I/O.

pub mod error;
pub mod id;
pub mod report;

pub use error::{assert_error_code, assert_error_codes, ErrorCode};
pub use id::ReportId;
pub use report::{
    CreatedReport, DraftError, IncompleteTriage, ParsePriorityError, ParseStatusError, Priority,
    Report, ReportDraft, ReportStatus, TriageResult,
};
