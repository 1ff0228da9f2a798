//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across every log line the
//! template engine emits.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_ELEMENT_ID: &str = "element_id";
pub const FIELD_NODE_ID: &str = "node_id";
pub const FIELD_OLD_TEMPLATE_ID: &str = "old_template_id";
pub const FIELD_NEW_TEMPLATE_ID: &str = "new_template_id";
pub const FIELD_FAMILY: &str = "family";

// Collection sizes
pub const FIELD_COMMAND_COUNT: &str = "command_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_ENTITY_ID: &str = "err.entity_id";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_accessibility() {
        assert!(!FIELD_COMPONENT.is_empty());
        assert!(!FIELD_OP.is_empty());
        assert!(!FIELD_ELEMENT_ID.is_empty());
        assert!(!EVENT_START.is_empty());
        assert!(!EVENT_END.is_empty());
        assert!(!EVENT_END_ERROR.is_empty());
    }

    #[test]
    fn test_event_names_are_distinct() {
        assert_ne!(EVENT_START, EVENT_END);
        assert_ne!(EVENT_START, EVENT_END_ERROR);
        assert_ne!(EVENT_END, EVENT_END_ERROR);
    }

    #[test]
    fn test_template_id_fields_are_distinct() {
        assert_ne!(FIELD_OLD_TEMPLATE_ID, FIELD_NEW_TEMPLATE_ID);
    }
}
