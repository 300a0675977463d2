//! JSON Schema compilation without any resource retrieval.
//!
//! Every schema bundlecheck compiles comes from a local file. A `$ref` or `$schema` that points
//! outside the document is never fetched; compiling such a schema fails with an error naming the
//! URI.

use jsonschema::{Retrieve, Uri, ValidationError, Validator};
use serde_json::Value;

/// Refuses every external resource.
struct OfflineRetriever;

impl Retrieve for OfflineRetriever {
    fn retrieve(
        &self,
        uri: &Uri<String>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        Err(format!("external schema `{}` is not available offline", uri.as_str()).into())
    }
}

/// Compiles `schema`, validating it against its draft's meta-schema first.
pub(crate) fn compile(schema: &Value) -> Result<Validator, ValidationError<'static>> {
    jsonschema::options()
        .with_retriever(OfflineRetriever)
        .build(schema)
}
