use clap::Args;
use serde_json::{json, Map, Value};

use crate::{mcp::McpServer, tools::ToolHandler};

#[allow(async_fn_in_trait)]
pub trait Executor {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()>;
}

async fn run_tool(handler: &ToolHandler, name: &str, arguments: Value) -> anyhow::Result<()> {
    let output = handler.call(name, &arguments).await;
    if output.is_error {
        eprint!("{}", output.text);
        anyhow::bail!("{name} failed");
    }
    print!("{}", output.text);
    Ok(())
}

/// Parses `FIELD=VALUE`, `null` clears a field, any other value is passed on as text.
fn parse_assignment(s: &str) -> Result<(String, Value), String> {
    let (key, raw) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{s}'"));
    }
    let value = match raw {
        "null" => Value::Null,
        _ => Value::String(raw.to_string()),
    };
    Ok((key.to_string(), value))
}

fn to_object(fields: Vec<(String, Value)>) -> Map<String, Value> {
    fields.into_iter().collect()
}

#[derive(Args, Debug)]
pub struct HealthCmd {}

impl Executor for HealthCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        run_tool(&handler, "health_check", json!({})).await
    }
}

#[derive(Args, Debug)]
pub struct ListCmd {}

impl Executor for ListCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        run_tool(&handler, "list_items", json!({})).await
    }
}

#[derive(Args, Debug)]
pub struct GetCmd {
    #[arg(help = "ID of the item")]
    pub id: u64,
}

impl Executor for GetCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        run_tool(&handler, "get_item", json!({"item_id": self.id})).await
    }
}

#[derive(Args, Debug)]
pub struct CreateCmd {
    #[arg(
        required = true,
        value_name = "FIELD=VALUE",
        value_parser = parse_assignment,
        help = "Field values, e.g. title=Dune year=1965"
    )]
    pub fields: Vec<(String, Value)>,
}

impl Executor for CreateCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        let arguments = Value::Object(to_object(self.fields));
        run_tool(&handler, "create_item", arguments).await
    }
}

#[derive(Args, Debug)]
pub struct UpdateCmd {
    #[arg(help = "ID of the item")]
    pub id: u64,

    #[arg(
        required = true,
        value_name = "FIELD=VALUE",
        value_parser = parse_assignment,
        help = "Fields to change, FIELD=null clears an optional field"
    )]
    pub fields: Vec<(String, Value)>,
}

impl Executor for UpdateCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        let mut arguments = to_object(self.fields);
        arguments.insert("item_id".to_string(), json!(self.id));
        run_tool(&handler, "update_item", Value::Object(arguments)).await
    }
}

#[derive(Args, Debug)]
pub struct DeleteCmd {
    #[arg(help = "ID of the item")]
    pub id: u64,
}

impl Executor for DeleteCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        run_tool(&handler, "delete_item", json!({"item_id": self.id})).await
    }
}

#[derive(Args, Debug)]
pub struct McpCmd {}

impl Executor for McpCmd {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        McpServer::new(handler).run().await?;
        Ok(())
    }
}
