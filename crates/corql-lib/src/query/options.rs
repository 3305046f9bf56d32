use serde::Deserialize;

/// Per-call settings that some languages read.
///
/// Deserializes from the request object, so absent keys take their defaults:
///
/// ```
/// use corql_lib::CompileOptions;
///
/// let options: CompileOptions = serde_json::from_str(r#"{"version": "2.0"}"#).unwrap();
/// assert_eq!(options.version.as_deref(), Some("2.0"));
/// assert!(options.case_sensitive);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Protocol version (`cql`, `fcsql`).
    pub version: Option<String>,
    /// Whether `cql` terms match case-sensitively.
    pub case_sensitive: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            version: None,
            case_sensitive: true,
        }
    }
}
