//! Canonical field keys and event names for structured logging
//!
//! The `log_op_*` macros emit these keys; tracing needs field names as
//! literal identifiers, so the macros spell them out and the tests in
//! `logging_facility::test_capture` pin the two together.

pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
