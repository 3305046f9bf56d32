use corql_core::IrNode;
use serde::Serialize;

use super::{Compiled, Root};
use crate::Result;

/// Output mapping handed to the search backend.
///
/// On success exactly one of `query` and `collection` is set. On failure
/// neither is, and `errors` lists what went wrong.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Request {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<IrNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<IrNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<(u16, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<(u16, String)>,
}

impl Request {
    pub fn from_result(result: &Result<Compiled>) -> Self {
        match result {
            Ok(compiled) => {
                let mut request = Request {
                    warnings: pairs(compiled.warnings().iter()),
                    ..Request::default()
                };
                match compiled.root() {
                    Root::Query(node) => request.query = Some(node.clone()),
                    Root::Collection(node) => request.collection = Some(node.clone()),
                }
                request
            }
            Err(error) => {
                let diagnostics = error.diagnostics();
                Request {
                    errors: pairs(diagnostics.errors()),
                    warnings: pairs(diagnostics.warnings()),
                    ..Request::default()
                }
            }
        }
    }

    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

fn pairs<'a>(diagnostics: impl Iterator<Item = &'a crate::Diagnostic>) -> Vec<(u16, String)> {
    diagnostics
        .map(|d| (d.code(), d.message().to_owned()))
        .collect()
}
