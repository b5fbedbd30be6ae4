use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the preview and publish paths is classified by
/// one of these kinds. Each kind maps to a stable error code for programmatic
/// handling and to the HTTP status the transport adapter answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidShopId,

    // Data
    NotFound,
    /// A package or app manifest exists but cannot be parsed
    InvalidManifest,

    // Integration/IO
    Io,
    Serialization,

    // External process
    /// Build or deploy exited with a non-zero status
    ProcessFailed,
    /// Build or deploy could not be started at all
    ProcessSpawn,

    // Environment
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidShopId => "ERR_INVALID_SHOP_ID",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::ProcessFailed => "ERR_PROCESS_FAILED",
            ExErrorKind::ProcessSpawn => "ERR_PROCESS_SPAWN",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP status the transport boundary answers with for this kind
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::InvalidShopId => 400,
            ExErrorKind::NotFound => 404,
            _ => 500,
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind plus optional context (operation, shop,
/// entity) for logs, and a human message that is surfaced verbatim to the
/// operator on publish failures.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    shop_id: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            shop_id: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add shop context
    pub fn with_shop_id(mut self, id: impl Into<String>) -> Self {
        self.shop_id = Some(id.into());
        self
    }

    /// Add entity context (package name, file path)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
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

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn shop_id(&self) -> Option<&str> {
        self.shop_id.as_deref()
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
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
        if let Some(shop_id) = &self.shop_id {
            write!(f, " (shop_id: {})", shop_id)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised while previewing or publishing an upgrade
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpgradeError {
    /// Shop id failed validation (raw input may be absent)
    #[error("Invalid shop id")]
    InvalidShopId { raw: Option<String> },

    /// A manifest that must be readable is not valid JSON for its schema
    #[error("Malformed manifest {path}: {reason}")]
    MalformedManifest { path: String, reason: String },

    /// An external command ran and exited with a non-zero status
    #[error("{command} failed with status {status}")]
    ProcessExited { command: String, status: String },

    /// An external command could not be started
    #[error("{reason}")]
    ProcessSpawn { command: String, reason: String },
}

impl From<UpgradeError> for ExError {
    fn from(err: UpgradeError) -> Self {
        let message = err.to_string();
        match err {
            UpgradeError::InvalidShopId { raw } => {
                let ex = ExError::new(ExErrorKind::InvalidShopId)
                    .with_op("validate_shop_id")
                    .with_message(message);
                match raw {
                    Some(raw) => ex.with_entity_id(raw),
                    None => ex,
                }
            }
            UpgradeError::MalformedManifest { path, .. } => {
                ExError::new(ExErrorKind::InvalidManifest)
                    .with_entity_id(path)
                    .with_message(message)
            }
            UpgradeError::ProcessExited { command, .. } => {
                ExError::new(ExErrorKind::ProcessFailed)
                    .with_op("run")
                    .with_entity_id(command)
                    .with_message(message)
            }
            UpgradeError::ProcessSpawn { command, .. } => ExError::new(ExErrorKind::ProcessSpawn)
                .with_op("run")
                .with_entity_id(command)
                .with_message(message),
        }
    }
}
