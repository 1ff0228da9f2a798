use thiserror::Error;
use tmplx_core_types::RequestId;

/// Result type alias using TmplxError
pub type Result<T> = std::result::Result<T, TmplxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers (editors, the CLI,
/// log pipelines) can match on without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural
    NotFound,
    InvalidInput,
    TypeMismatch,
    NotAttached,

    // Templates
    TemplateNotFound,

    // Integration/IO
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::NotAttached => "ERR_NOT_ATTACHED",
            ExErrorKind::TemplateNotFound => "ERR_TEMPLATE_NOT_FOUND",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus optional context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for template reconciliation and the command log
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TmplxError {
    /// Node not found in the document
    #[error("Node not found: {node_id}")]
    NodeNotFound { node_id: String },

    /// A command links a node to a child that does not exist
    #[error("Node {node_id} cannot link unknown child {child_id}")]
    UnknownChild { node_id: String, child_id: String },

    /// A field holds a value of a different shape than the command expects
    #[error("Field {field} on node {node_id} is not a {expected}")]
    FieldTypeMismatch {
        node_id: String,
        field: String,
        expected: String,
    },

    /// An operation needs the node to be owned by a parent, but it is detached
    #[error("Node {node_id} is not attached to a parent")]
    NotAttached { node_id: String },

    /// No template with the given id (and version) is known
    #[error("Template not found: {template_id}{}", .version.map(|v| format!(" v{v}")).unwrap_or_default())]
    TemplateNotFound {
        template_id: String,
        version: Option<u32>,
    },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl From<serde_json::Error> for TmplxError {
    fn from(err: serde_json::Error) -> Self {
        TmplxError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from TmplxError to ExError
impl From<TmplxError> for ExError {
    fn from(err: TmplxError) -> Self {
        match err {
            TmplxError::NodeNotFound { node_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(node_id)
                .with_message("Node not found"),

            TmplxError::UnknownChild { node_id, child_id } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_entity_id(node_id)
                    .with_message(format!("Unknown child {}", child_id))
            }

            TmplxError::FieldTypeMismatch {
                node_id,
                field,
                expected,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_entity_id(node_id)
                .with_message(format!("Field {} is not a {}", field, expected)),

            TmplxError::NotAttached { node_id } => ExError::new(ExErrorKind::NotAttached)
                .with_entity_id(node_id)
                .with_message("Node is not attached to a parent"),

            TmplxError::TemplateNotFound {
                template_id,
                version,
            } => {
                let message = match version {
                    Some(v) => format!("Template version {} not found", v),
                    None => "Template not found".to_string(),
                };
                ExError::new(ExErrorKind::TemplateNotFound)
                    .with_entity_id(template_id)
                    .with_message(message)
            }

            TmplxError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }

            TmplxError::Internal { message } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

impl From<&TmplxError> for ExError {
    fn from(err: &TmplxError) -> Self {
        ExError::from(err.clone())
    }
}
