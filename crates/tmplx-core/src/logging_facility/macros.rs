//! Operation logging macros
//!
//! Every operation emits one `start` event and exactly one of `end` or
//! `end_error`. Extra `key = value` fields are passed through to `tracing`.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use tmplx_core::log_op_start;
/// log_op_start!("change_template");
/// log_op_start!("change_template", element_id = "Task_1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_START,
            $($($field)+)?
        )
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use tmplx_core::log_op_end;
/// log_op_end!("change_template", duration_ms = 3, command_count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {
        ::tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)+)?
        )
    };
}

/// Log the failed end of an operation
///
/// `$err` converts into [`ExError`](crate::errors::ExError); its stable code
/// and the entity it names are recorded as `err.code` and `err.entity_id`.
///
/// # Example
///
/// ```
/// # use tmplx_core::{log_op_error, errors::TmplxError};
/// let err = TmplxError::NodeNotFound { node_id: "n1".to_string() };
/// log_op_error!("change_template", &err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)+)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        ::tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::logging_facility::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.entity_id = ex_err.entity_id().unwrap_or_default(),
            $($($field)+)?
        )
    }};
}
