//! Operation lifecycle macros
//!
//! Store operations are bracketed by one `start` event and exactly one of
//! `end` or `end_error`. All three carry `component` (the calling module),
//! `op` and `event`; extra tracing fields may follow.

#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($($field)*)?
        );
    };
}

/// Log the start of an operation
///
/// ```
/// # use scorekeep_core::log_op_start;
/// log_op_start!("score_list");
/// log_op_start!("score_get", score_id = 7);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(info, $op, $crate::schema::EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation
///
/// ```
/// # use scorekeep_core::log_op_end;
/// log_op_end!("score_delete", duration_ms = 3, removed = true);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            $crate::schema::EVENT_END,
            duration_ms = $duration
            $(, $($field)*)?
        )
    };
}

/// Log a failed operation with the kind and code of its `ExError`
///
/// ```
/// # use scorekeep_core::log_op_error;
/// # use scorekeep_core::errors::{ExError, ExErrorKind};
/// let err = ExError::new(ExErrorKind::Persistence).with_message("disk I/O error");
/// log_op_error!("score_create", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: &$crate::errors::ExError = $err;
        $crate::__log_op_event!(
            error,
            $op,
            $crate::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err_kind = ?ex_err.kind(),
            err_code = ex_err.code(),
            err_message = ex_err.message()
            $(, $($field)*)?
        );
    }};
}
