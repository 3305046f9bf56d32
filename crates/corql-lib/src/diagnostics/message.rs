/// Diagnostic kinds with their fixed integer codes.
///
/// Codes are part of the output contract; several kinds may share a code
/// when the protocol only distinguishes them by message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Protocol-level rejections (SRU)
    UnsupportedIndex,
    UnsupportedRelation,
    UnsupportedRelationModifier,

    // Input could not be turned into a tree
    EmptyQuery,
    MalformedQuery,
    UnknownLanguage,
    QueryCannotBeProcessed,

    // Valid syntax, invalid semantics
    UnboundRelation,
    InvalidClassReference,
    UnsupportedQueryElement,
    /// Same code as `UnsupportedQueryElement`, for languages outside SRU.
    UnsupportedFeature,
    IncompatibleOperatorAndOperand,
    UnknownQueryElement,
    UndefinedVariable,
    InvalidBoundary,

    // Protocol version
    MissingVersion,
    UnsupportedVersion,

    // Non-fatal
    DateLikeString,
}

impl DiagnosticKind {
    /// Code reported in the `errors`/`warnings` pairs.
    pub fn code(&self) -> u16 {
        match self {
            Self::UnsupportedIndex | Self::UnsupportedRelation | Self::UnsupportedRelationModifier => {
                105
            }
            Self::EmptyQuery => 301,
            Self::MalformedQuery => 302,
            Self::UnknownLanguage => 303,
            Self::UnboundRelation => 304,
            Self::InvalidClassReference => 305,
            Self::UnsupportedQueryElement | Self::UnsupportedFeature => 306,
            Self::IncompatibleOperatorAndOperand => 307,
            Self::UnknownQueryElement => 308,
            Self::MissingVersion | Self::UnsupportedVersion => 309,
            Self::UndefinedVariable => 310,
            Self::InvalidBoundary => 311,
            Self::DateLikeString => 312,
            Self::QueryCannotBeProcessed => 399,
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::DateLikeString => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnsupportedIndex => "SRU diagnostic 16: Index is not supported.",
            Self::UnsupportedRelation => "SRU diagnostic 19: Relation is not supported.",
            Self::UnsupportedRelationModifier => {
                "SRU diagnostic 20: Relation modifier is not supported."
            }

            Self::EmptyQuery => "SRU diagnostic 27: An empty query is unsupported.",
            Self::MalformedQuery => "The query could not be parsed.",
            Self::UnknownLanguage => "Unknown query language.",
            Self::QueryCannotBeProcessed => "FCS diagnostic 10: Query cannot be processed.",

            Self::UnboundRelation => {
                "Could not link all relations: the node declarations are not connected."
            }
            Self::InvalidClassReference => "Invalid class reference.",
            Self::UnsupportedQueryElement => {
                "SRU diagnostic 48: Only basic search including term-only and boolean \
                 (AND,OR) operator queries are currently supported."
            }
            Self::UnsupportedFeature => "Unsupported query element.",
            Self::IncompatibleOperatorAndOperand => {
                "You used an inequation operator with a string value."
            }
            Self::UnknownQueryElement => "Unknown query element.",
            Self::UndefinedVariable => "Reference to an undefined variable.",
            Self::InvalidBoundary => "Invalid range: the minimum exceeds the maximum.",

            Self::MissingVersion => "SRU diagnostic 7: Version number is missing.",
            Self::UnsupportedVersion => "SRU diagnostic 5: Unsupported version.",

            Self::DateLikeString => {
                "The collection query contains a value that looks like a date and an \
                 operator that is only defined for strings."
            }
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnsupportedIndex => "SRU diagnostic 16: Index {} is not supported.".to_string(),
            Self::UnsupportedRelation => {
                "SRU diagnostic 19: Relation {} is not supported.".to_string()
            }
            Self::UnsupportedRelationModifier => {
                "SRU diagnostic 20: Relation modifier {} is not supported.".to_string()
            }
            Self::EmptyQuery => "SRU diagnostic 27: An empty {} is unsupported.".to_string(),
            Self::UnknownLanguage => "'{}' is not a supported query language.".to_string(),
            Self::MalformedQuery => "The query could not be parsed: {}".to_string(),
            Self::QueryCannotBeProcessed => "FCS diagnostic 10: {}".to_string(),
            Self::InvalidClassReference => {
                "Class {} is reserved for internal use; user classes must be below 128."
                    .to_string()
            }
            Self::UnsupportedQueryElement => "SRU diagnostic 48: {}".to_string(),
            Self::UndefinedVariable => "Variable '{}' is not defined.".to_string(),
            Self::InvalidBoundary => {
                "Invalid range {}: the minimum exceeds the maximum.".to_string()
            }
            Self::UnsupportedVersion => {
                "SRU diagnostic 5: Only supports SRU version {}.".to_string()
            }

            // Caller supplies the whole sentence
            Self::UnsupportedFeature
            | Self::IncompatibleOperatorAndOperand
            | Self::UnknownQueryElement
            | Self::DateLikeString => "{}".to_string(),

            // Standard pattern: fallback + context
            _ => format!("{} {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// One reported problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub(crate) kind: DiagnosticKind,
    pub(crate) message: String,
}

impl Diagnostic {
    pub(crate) fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn with_default_message(kind: DiagnosticKind) -> Self {
        Self::new(kind, kind.fallback_message())
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn code(&self) -> u16 {
        self.kind.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity(), self.code(), self.message)
    }
}
