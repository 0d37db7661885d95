pub mod compiler;
pub mod layout;
pub mod model;
pub mod parser;
pub mod serializer;
pub mod storage;
pub mod validate;

use wasm_bindgen::prelude::*;

use model::Graph;
use storage::SchemaDocument;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Decode a top-level JSON object into `T`. Derived struct deserializers
/// also accept a sequence when every field has a default, which would let
/// `[]` pass as an empty graph or document; payloads must be objects.
fn decode_object<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, String> {
    let value: serde_json::Value = serde_json::from_str(raw).map_err(|e| e.to_string())?;
    if !value.is_object() {
        return Err("expected a JSON object at the top level".to_string());
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// Compile a graph snapshot (JSON) to DSL text. Returns
/// `{"schema": "...", "warnings": [...]}` as JSON.
#[wasm_bindgen(js_name = "compileSchema")]
pub fn compile_schema(graph_json: &str) -> Result<String, String> {
    let graph: Graph = decode_object(graph_json)?;
    let compiled = compiler::compile(&graph);
    serde_json::to_string(&compiled).map_err(|e| e.to_string())
}

/// Parse DSL text back into a graph snapshot (JSON).
#[wasm_bindgen(js_name = "parseSchema")]
pub fn parse_schema(text: &str) -> Result<String, String> {
    let graph = parser::parse(text).map_err(|e| e.to_string())?;
    serde_json::to_string(&graph).map_err(|e| e.to_string())
}

/// Map a graph snapshot (JSON) to its storage-form document (JSON).
#[wasm_bindgen(js_name = "serializeGraph")]
pub fn serialize_graph(graph_json: &str) -> Result<String, String> {
    let graph: Graph = decode_object(graph_json)?;
    let doc = serializer::serialize(&graph);
    serde_json::to_string(&doc).map_err(|e| e.to_string())
}

/// Reconstruct a graph snapshot (JSON) from a storage-form document (JSON).
#[wasm_bindgen(js_name = "deserializeDocument")]
pub fn deserialize_document(doc_json: &str) -> Result<String, String> {
    let doc: SchemaDocument = decode_object(doc_json)?;
    let graph = serializer::deserialize(&doc);
    serde_json::to_string(&graph).map_err(|e| e.to_string())
}

/// Validate a storage-form document (JSON). `Err` carries either the JSON
/// failure or the failing validation category, suitable for a 400 response.
#[wasm_bindgen(js_name = "validateDocument")]
pub fn validate_document(doc_json: &str) -> Result<(), String> {
    let doc: SchemaDocument = decode_object(doc_json)?;
    validate::validate(&doc).map_err(|e| e.to_string())
}
