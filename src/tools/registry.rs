//! The fixed tool catalog and schema-driven argument validation.

use crate::error::{AppError, Result};
use crate::tools::types::ToolDescriptor;
use serde_json::{json, Map, Value};
use std::collections::HashSet;

pub const SEARCH_RAG_KNOWLEDGE: &str = "search_rag_knowledge";
pub const SEARCH_INTERNET: &str = "search_internet";
pub const SEARCH_GAMIFIED_SITES: &str = "search_gamified_sites";
pub const GET_WRITING_STYLE: &str = "get_writing_style";
pub const SCRAPE_GAMIFIED_CONTENT: &str = "scrape_gamified_content";

/// Read-only mapping from tool name to descriptor, in catalog order.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ToolRegistry {
    /// The five built-in tools.
    pub fn builtin() -> Self {
        let tools = vec![
            ToolDescriptor::new(
                SEARCH_RAG_KNOWLEDGE,
                "Search the embedded gamification knowledge base (training material, style guides, Q&A pairs and documents).",
                json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Free-text search query" },
                        "category": {
                            "type": "string",
                            "enum": ["training", "style", "qa", "documents", "all"],
                            "default": "all",
                            "description": "Restrict results to one knowledge category"
                        },
                        "limit": {
                            "type": "integer",
                            "default": 5,
                            "minimum": 1,
                            "description": "Maximum number of results"
                        }
                    },
                    "required": ["query"]
                }),
            ),
            ToolDescriptor::new(
                SEARCH_INTERNET,
                "Search the web through Google Programmable Search, optionally restricted to one site.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Search query" },
                        "site": { "type": "string", "description": "Restrict results to this site, e.g. example.com" }
                    },
                    "required": ["query"]
                }),
            ),
            ToolDescriptor::new(
                SEARCH_GAMIFIED_SITES,
                "Search gamified.uk and marczewski.me.uk for gamification articles.",
                json!({
                    "type": "object",
                    "properties": {
                        "query": { "type": "string", "description": "Search query" },
                        "domain": {
                            "type": "string",
                            "enum": ["gamified.uk", "marczewski.me.uk", "both"],
                            "default": "both",
                            "description": "Which site to search"
                        }
                    },
                    "required": ["query"]
                }),
            ),
            ToolDescriptor::new(
                GET_WRITING_STYLE,
                "Return writing-style guidelines, optionally for one style category such as tone or structure.",
                json!({
                    "type": "object",
                    "properties": {
                        "category": { "type": "string", "description": "Style sub-category (e.g. tone, structure)" }
                    }
                }),
            ),
            ToolDescriptor::new(
                SCRAPE_GAMIFIED_CONTENT,
                "Fetch a page from gamified.uk or marczewski.me.uk and extract its text, headings or links.",
                json!({
                    "type": "object",
                    "properties": {
                        "url": { "type": "string", "description": "Page URL on an allowed site" },
                        "extract_type": {
                            "type": "string",
                            "enum": ["text", "links", "headings", "all"],
                            "default": "text",
                            "description": "What to extract from the page"
                        }
                    },
                    "required": ["url"]
                }),
            ),
        ];

        Self::from_tools(tools)
    }

    /// Build a registry, dropping later duplicates of a name.
    pub fn from_tools(tools: Vec<ToolDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let tools = tools
            .into_iter()
            .filter(|t| {
                let fresh = seen.insert(t.name.clone());
                if !fresh {
                    tracing::warn!(name = %t.name, "Skipping duplicate tool definition");
                }
                fresh
            })
            .collect();
        Self { tools }
    }

    pub fn list_tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Look up `name` and check `arguments` against its input schema.
    pub fn validate(&self, name: &str, arguments: &Map<String, Value>) -> Result<&ToolDescriptor> {
        let tool = self
            .get(name)
            .ok_or_else(|| AppError::MethodNotFound(name.to_string()))?;
        validate_arguments(tool, arguments)?;
        Ok(tool)
    }
}

/// Check required presence, declared JSON types and enum membership.
///
/// Arguments not declared in the schema are ignored. `null` counts as absent.
fn validate_arguments(tool: &ToolDescriptor, arguments: &Map<String, Value>) -> Result<()> {
    for name in tool.required() {
        match arguments.get(name) {
            None | Some(Value::Null) => {
                return Err(AppError::InvalidArgument(format!(
                    "missing required argument '{}' for {}",
                    name, tool.name
                )));
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                return Err(AppError::InvalidArgument(format!(
                    "argument '{}' for {} cannot be empty",
                    name, tool.name
                )));
            }
            _ => {}
        }
    }

    let Some(properties) = tool.properties() else {
        return Ok(());
    };

    for (name, prop) in properties {
        let Some(value) = arguments.get(name).filter(|v| !v.is_null()) else {
            continue;
        };

        let expected = prop.get("type").and_then(|t| t.as_str()).unwrap_or("any");
        if !type_matches(expected, value) {
            return Err(AppError::InvalidArgument(format!(
                "argument '{}' for {} must be of type {}",
                name, tool.name, expected
            )));
        }

        if let (Some(allowed), Some(s)) = (prop.get("enum").and_then(|e| e.as_array()), value.as_str()) {
            if !allowed.iter().any(|a| a.as_str() == Some(s)) {
                let options: Vec<&str> = allowed.iter().filter_map(|a| a.as_str()).collect();
                return Err(AppError::InvalidArgument(format!(
                    "argument '{}' for {} must be one of: {}",
                    name,
                    tool.name,
                    options.join(", ")
                )));
            }
        }
    }

    Ok(())
}

/// Integers are also accepted as numeric strings, since some clients quote them.
fn type_matches(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => {
            value.is_i64()
                || value.is_u64()
                || value.as_f64().is_some_and(|f| f.fract() == 0.0)
                || value.as_str().is_some_and(|s| s.trim().parse::<i64>().is_ok())
        }
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_builtin_catalog_names_and_order() {
        let registry = ToolRegistry::builtin();
        assert_eq!(
            registry.names(),
            vec![
                "search_rag_knowledge",
                "search_internet",
                "search_gamified_sites",
                "get_writing_style",
                "scrape_gamified_content"
            ]
        );
    }

    #[test]
    fn test_builtin_required_arguments() {
        let registry = ToolRegistry::builtin();
        assert_eq!(registry.get(SEARCH_RAG_KNOWLEDGE).unwrap().required(), vec!["query"]);
        assert_eq!(registry.get(SCRAPE_GAMIFIED_CONTENT).unwrap().required(), vec!["url"]);
        assert!(registry.get(GET_WRITING_STYLE).unwrap().required().is_empty());
    }

    #[test]
    fn test_unknown_tool_is_method_not_found() {
        let registry = ToolRegistry::builtin();
        let err = registry.validate("rm_rf", &Map::new()).unwrap_err();
        assert!(matches!(err, AppError::MethodNotFound(name) if name == "rm_rf"));
    }

    #[test]
    fn test_missing_required_argument() {
        let registry = ToolRegistry::builtin();
        let err = registry
            .validate(SEARCH_INTERNET, &args(json!({ "site": "x.com" })))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(msg) if msg.contains("query")));
    }

    #[test]
    fn test_blank_required_argument() {
        let registry = ToolRegistry::builtin();
        let err = registry
            .validate(SEARCH_RAG_KNOWLEDGE, &args(json!({ "query": "  " })))
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)));
    }

    #[test]
    fn test_enum_violation() {
        let registry = ToolRegistry::builtin();
        let err = registry
            .validate(
                SEARCH_RAG_KNOWLEDGE,
                &args(json!({ "query": "x", "category": "videos" })),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(msg) if msg.contains("training")));
    }

    #[test]
    fn test_integer_accepts_numeric_string() {
        let registry = ToolRegistry::builtin();
        assert!(registry
            .validate(SEARCH_RAG_KNOWLEDGE, &args(json!({ "query": "x", "limit": "3" })))
            .is_ok());
        assert!(registry
            .validate(SEARCH_RAG_KNOWLEDGE, &args(json!({ "query": "x", "limit": "three" })))
            .is_err());
    }

    #[test]
    fn test_null_optional_is_ignored() {
        let registry = ToolRegistry::builtin();
        assert!(registry
            .validate(GET_WRITING_STYLE, &args(json!({ "category": null })))
            .is_ok());
    }

    #[test]
    fn test_duplicate_names_dropped() {
        let registry = ToolRegistry::from_tools(vec![
            ToolDescriptor::new("a", "first", json!({})),
            ToolDescriptor::new("a", "second", json!({})),
        ]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("a").unwrap().description, "first");
    }
}
