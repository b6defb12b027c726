//! Type definitions for the tools module.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A tool as advertised by `tools/list`.
///
/// `input_schema` is a JSON Schema object (`type`, `properties`, `required`)
/// and is serialized under the wire name `inputSchema`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Names listed under `inputSchema.required`.
    pub fn required(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(|r| r.as_array())
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// `inputSchema.properties`, empty when absent.
    pub fn properties(&self) -> Option<&Map<String, Value>> {
        self.input_schema
            .get("properties")
            .and_then(|p| p.as_object())
    }
}

/// Inbound tool call: `{ name, arguments }`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ToolCallEnvelope {
    pub name: String,
    #[serde(default)]
    pub arguments: Map<String, Value>,
}

impl ToolCallEnvelope {
    pub fn new(name: impl Into<String>, arguments: Value) -> Self {
        let arguments = match arguments {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// One item of a tool result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ContentItem {
    #[serde(rename = "text")]
    Text { text: String },
}

/// Outbound tool result: `{ content: [{ type, text }] }`.
///
/// Soft failures use this same shape with an error message as text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResultEnvelope {
    pub content: Vec<ContentItem>,
}

impl ToolResultEnvelope {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentItem::Text { text: text.into() }],
        }
    }

    /// Concatenated text of all items.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .map(|item| match item {
                ContentItem::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_envelope_wire_shape() {
        let envelope = ToolResultEnvelope::text("hello");
        assert_eq!(
            serde_json::to_value(&envelope).unwrap(),
            json!({ "content": [{ "type": "text", "text": "hello" }] })
        );
    }

    #[test]
    fn test_call_envelope_defaults_arguments() {
        let call: ToolCallEnvelope =
            serde_json::from_value(json!({ "name": "get_writing_style" })).unwrap();
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_non_object_arguments_become_empty() {
        let call = ToolCallEnvelope::new("x", json!("oops"));
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_descriptor_schema_accessors() {
        let tool = ToolDescriptor::new(
            "t",
            "d",
            json!({
                "type": "object",
                "properties": { "query": { "type": "string" } },
                "required": ["query"]
            }),
        );
        assert_eq!(tool.required(), vec!["query"]);
        assert!(tool.properties().unwrap().contains_key("query"));
        assert_eq!(
            serde_json::to_value(&tool).unwrap()["inputSchema"]["type"],
            "object"
        );
    }
}
