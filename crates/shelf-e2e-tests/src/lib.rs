use std::time::Duration;

use anyhow::{Result, anyhow};
use rand::Rng as _;
use shelf_server::{
    build_state,
    config::{Parser, ServerConfig},
    run::run_graceful_with_state,
};
use tokio::sync::oneshot;
use tracing::{debug, error};
use url::Url;

fn random_port() -> Result<u16> {
    let mut rng = rand::rng();

    let mut retries = 3;
    while retries > 0 {
        let port: u16 = rng.random_range(5030..6030);
        let addr: std::net::SocketAddr = format!("127.0.0.1:{}", port).parse()?;
        match std::net::TcpStream::connect_timeout(&addr, Duration::from_millis(100)) {
            Err(e) if e.kind() == std::io::ErrorKind::ConnectionRefused => return Ok(port),
            Err(_) => retries -= 1,
            Ok(_) => retries -= 1,
        }
    }

    Err(anyhow!("Could not find a free port"))
}

/// Server config on a random local port, `extra_args` are appended to the command line.
pub fn test_config(extra_args: &[&str]) -> Result<ServerConfig> {
    let port = random_port()?.to_string();
    let mut args = vec![
        "shelf-e2e-tests",
        "--port",
        port.as_str(),
        "--listen-address",
        "127.0.0.1",
    ];
    args.extend_from_slice(extra_args);
    Ok(ServerConfig::try_parse_from(args)?)
}

pub fn base_url(config: &ServerConfig) -> Result<Url> {
    Ok(format!("http://{}:{}/", config.listen_address, config.port).parse()?)
}

/// Running server, stopped when dropped.
pub struct ServerGuard {
    pub base_url: Url,
    _shutdown: oneshot::Sender<()>,
}

impl ServerGuard {
    pub fn url(&self, path: &str) -> Url {
        let mut url = self.base_url.clone();
        url.set_path(path);
        url
    }
}

pub async fn spawn_server(config: ServerConfig) -> Result<ServerGuard> {
    let base_url = base_url(&config)?;
    let state = build_state(&config);
    let (tx, rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        let shutdown = async move {
            let _ = rx.await;
        };
        if let Err(e) = run_graceful_with_state(config, state, shutdown).await {
            error!("Server failed: {e}");
        }
    });

    let health = base_url.join("health")?;
    let client = reqwest::Client::new();
    for _ in 0..50 {
        match client.get(health.clone()).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Server is up at {base_url}");
                return Ok(ServerGuard {
                    base_url,
                    _shutdown: tx,
                });
            }
            _ => tokio::time::sleep(Duration::from_millis(100)).await,
        }
    }
    Err(anyhow!("Server at {base_url} did not start"))
}
