/// Broad class of a failure.
///
/// The validation kinds map one-to-one onto the gates run before and after
/// densification; the pipeline aborts on the first one raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Input geometry is not point type.
    GeometryType,
    /// A selected field is not numeric (or holds a missing value).
    FieldType,
    /// CRS undefined, not projected, or different between the inputs.
    CrsMismatch,
    /// Densified edges do not share the same `m` sequence.
    LongitudinalMismatch,
    /// Bad run parameters or violated preconditions.
    InvalidInput,
    /// Unreadable input, unwritable output, malformed files.
    Io,
    /// The user quit an interactive prompt.
    Canceled,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::GeometryType
            | ErrorKind::FieldType
            | ErrorKind::CrsMismatch
            | ErrorKind::LongitudinalMismatch => 3,
            ErrorKind::InvalidInput | ErrorKind::Canceled => 2,
            ErrorKind::Io => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            exit_code: kind.exit_code(),
            message: message.into(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Io, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
