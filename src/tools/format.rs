//! Wire formatting of tool descriptors for function-calling.

use serde::{Deserialize, Serialize};

use super::{SchemaConverter, ToolDescriptor};

/// Function-calling wire spec: `{"type": "function", "function": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    pub spec_type: String,
    pub function: FunctionSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSpec {
    pub name: String,
    pub parameters: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Format one descriptor for the wire. The converter, when given, rewrites
/// the parameter schema; `description` is omitted entirely when absent.
pub fn format_tool(tool: &ToolDescriptor, converter: Option<&SchemaConverter>) -> ToolSpec {
    let parameters = match converter {
        Some(convert) => convert(&tool.parameters),
        None => tool.parameters.clone(),
    };
    ToolSpec {
        spec_type: "function".to_string(),
        function: FunctionSpec {
            name: tool.name.clone(),
            parameters,
            description: tool.description.clone(),
        },
    }
}
