use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use shelf_types::{CollectionKind, FieldKind, FieldSpec};
use tracing::{debug, warn};

use crate::{
    client::ApiClient,
    error::{BridgeError, Result},
    format,
};

const ITEM_ID: &str = "item_id";

/// Tool schema definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,

    pub description: String,

    /// JSON Schema for input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Text result of a tool call. Failures are results too, flagged with `is_error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn ok(text: impl Into<String>) -> Self {
        ToolOutput {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        ToolOutput {
            text: text.into(),
            is_error: true,
        }
    }
}

impl From<BridgeError> for ToolOutput {
    fn from(err: BridgeError) -> Self {
        let text = match &err {
            BridgeError::Api {
                status,
                error,
                message,
            } => format!("HTTP error {status}: {error}\n{message}\n"),
            other => format!("Error: {other}\n"),
        };
        ToolOutput::error(text)
    }
}

fn empty_schema() -> Value {
    json!({"type": "object", "properties": {}, "required": []})
}

fn id_property(description: String) -> Value {
    json!({"type": "integer", "description": description})
}

fn field_property(field: &FieldSpec, prefix: &str) -> Value {
    json!({
        "type": field.kind.json_type(),
        "description": format!("{prefix}{}", field.description),
    })
}

#[derive(Debug, Clone)]
pub struct ToolHandler {
    client: ApiClient,
}

impl ToolHandler {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn collection(&self) -> CollectionKind {
        self.client.collection()
    }

    /// Get list of all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        let kind = self.collection();
        let noun = kind.kind_name().to_lowercase();
        let fields = kind.fields();

        let mut create_props = Map::new();
        for field in fields {
            create_props.insert(field.name.to_string(), field_property(field, ""));
        }
        let required: Vec<&str> = kind.required_fields().map(|f| f.name).collect();

        let mut update_props = Map::new();
        update_props.insert(
            ITEM_ID.to_string(),
            id_property(format!("The ID of the {noun} to update")),
        );
        for field in fields {
            update_props.insert(field.name.to_string(), field_property(field, "Updated: "));
        }

        vec![
            Tool {
                name: "list_items".to_string(),
                description: format!("Get all {kind}"),
                input_schema: empty_schema(),
            },
            Tool {
                name: "get_item".to_string(),
                description: format!("Get a specific {noun} by ID"),
                input_schema: json!({
                    "type": "object",
                    "properties": {ITEM_ID: id_property(format!("The ID of the {noun}"))},
                    "required": [ITEM_ID]
                }),
            },
            Tool {
                name: "create_item".to_string(),
                description: format!("Create a new {noun}"),
                input_schema: json!({
                    "type": "object",
                    "properties": create_props,
                    "required": required
                }),
            },
            Tool {
                name: "update_item".to_string(),
                description: format!("Update an existing {noun}, only given fields are changed"),
                input_schema: json!({
                    "type": "object",
                    "properties": update_props,
                    "required": [ITEM_ID]
                }),
            },
            Tool {
                name: "delete_item".to_string(),
                description: format!("Delete a {noun} by ID"),
                input_schema: json!({
                    "type": "object",
                    "properties": {ITEM_ID: id_property(format!("The ID of the {noun} to delete"))},
                    "required": [ITEM_ID]
                }),
            },
            Tool {
                name: "health_check".to_string(),
                description: "Check API health".to_string(),
                input_schema: empty_schema(),
            },
        ]
    }

    /// Runs a tool, never fails: errors are turned into an error output.
    pub async fn call(&self, name: &str, arguments: &Value) -> ToolOutput {
        debug!("Calling tool {name} with {arguments}");
        match self.execute(name, arguments).await {
            Ok(text) => ToolOutput::ok(text),
            Err(err) => {
                warn!("Tool {name} failed: {err}");
                err.into()
            }
        }
    }

    async fn execute(&self, name: &str, arguments: &Value) -> Result<String> {
        let kind = self.collection();
        match name {
            "list_items" => {
                let list = self.client.list().await?;
                Ok(format::list(kind, &list))
            }
            "get_item" => {
                let id = item_id(arguments)?;
                let found = self.client.get(id).await?;
                Ok(format::item(kind, None, &found.item))
            }
            "create_item" => {
                let fields = self.known_fields(arguments)?;
                let created = self.client.create(&fields).await?;
                Ok(format::item(kind, Some("Created"), &created.item))
            }
            "update_item" => {
                let id = item_id(arguments)?;
                let fields = self.known_fields(arguments)?;
                let updated = self.client.update(id, &fields).await?;
                Ok(format::item(kind, Some("Updated"), &updated.item))
            }
            "delete_item" => {
                let id = item_id(arguments)?;
                let deleted = self.client.delete(id).await?;
                Ok(format::deleted(kind, &deleted))
            }
            "health_check" => {
                let health = self.client.health().await?;
                Ok(format::health(&health))
            }
            other => Err(BridgeError::UnknownTool(other.to_string())),
        }
    }

    /// Copies the collection's fields from tool arguments, other keys are dropped.
    fn known_fields(&self, arguments: &Value) -> Result<Value> {
        let args = arguments_object(arguments)?;
        let mut fields = Map::new();
        for field in self.collection().fields() {
            if let Some(value) = args.get(field.name) {
                fields.insert(field.name.to_string(), coerce(field.kind, value));
            }
        }
        Ok(Value::Object(fields))
    }
}

// Scalars are brought to the field's type, the server judges anything else.
fn coerce(kind: FieldKind, value: &Value) -> Value {
    match (kind, value) {
        (FieldKind::String, Value::Number(n)) => Value::String(n.to_string()),
        (FieldKind::String, Value::Bool(b)) => Value::String(b.to_string()),
        (FieldKind::Integer, Value::String(s)) => match s.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => value.clone(),
        },
        _ => value.clone(),
    }
}

fn arguments_object(arguments: &Value) -> Result<&Map<String, Value>> {
    arguments
        .as_object()
        .ok_or_else(|| BridgeError::InvalidArguments("arguments must be an object".into()))
}

pub fn item_id(arguments: &Value) -> Result<u64> {
    let args = arguments_object(arguments)?;
    let invalid = || BridgeError::InvalidArguments(format!("'{ITEM_ID}' must be a positive integer"));
    match args.get(ITEM_ID) {
        None | Some(Value::Null) => Err(BridgeError::InvalidArguments(format!(
            "missing required argument '{ITEM_ID}'"
        ))),
        Some(Value::Number(n)) => n.as_u64().ok_or_else(invalid),
        Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}
