use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use shelf_types::CollectionKind;
use url::Url;

use crate::commands::{
    CreateCmd, DeleteCmd, Executor, GetCmd, HealthCmd, ListCmd, McpCmd, UpdateCmd,
};
use crate::tools::ToolHandler;

#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Bridge to the shelf REST service - serves its collections as MCP tools over stdio or runs single operations from the command line."
)]
pub struct CliConfig {
    #[command(flatten)]
    pub bridge: BridgeConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct BridgeConfig {
    #[arg(
        long,
        global = true,
        env = "SHELF_BASE_URL",
        default_value = "http://localhost:5000",
        help = "Base URL of the shelf server"
    )]
    pub base_url: Url,

    #[arg(
        long,
        global = true,
        env = "SHELF_COLLECTION",
        default_value = "books",
        help = "Collection the tools operate on"
    )]
    pub collection: CollectionKind,

    #[arg(
        long,
        global = true,
        env = "SHELF_TIMEOUT",
        default_value = "10s",
        help = "Timeout for requests to the server in human friendly format (e.g. 10s, 1m)",
        value_parser = humantime::parse_duration
    )]
    pub timeout: Duration,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the server is up
    Health(HealthCmd),
    /// List all items of the collection
    List(ListCmd),
    /// Show one item
    Get(GetCmd),
    /// Create an item from FIELD=VALUE pairs
    Create(CreateCmd),
    /// Change fields of an item, FIELD=null clears an optional field
    Update(UpdateCmd),
    /// Delete an item
    Delete(DeleteCmd),
    /// Serve the tools over MCP (JSON-RPC on stdin/stdout)
    Mcp(McpCmd),
}

impl Executor for Command {
    async fn run(self, handler: ToolHandler) -> anyhow::Result<()> {
        match self {
            Command::Health(cmd) => cmd.run(handler).await,
            Command::List(cmd) => cmd.run(handler).await,
            Command::Get(cmd) => cmd.run(handler).await,
            Command::Create(cmd) => cmd.run(handler).await,
            Command::Update(cmd) => cmd.run(handler).await,
            Command::Delete(cmd) => cmd.run(handler).await,
            Command::Mcp(cmd) => cmd.run(handler).await,
        }
    }
}
