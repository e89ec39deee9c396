//! Fetch a node, its history and the changeset that last touched it.
//!
//! Run with:
//! ```bash
//! RUST_LOG=osm_api_client=debug cargo run -p osm-api --example fetch_node -- 52245107
//! ```

use osm_api::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let id: u64 = std::env::args()
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()?
        .unwrap_or(52245107);

    let client = OsmClient::builder()
        .user_agent(format!("osm-api-demo/{}", env!("CARGO_PKG_VERSION")))
        .retry(RetryConfig::for_api().max_retries(2))
        .build()?;

    let caps = client.capabilities().await?;
    println!(
        "Server speaks API {} to {}, timeout {}s",
        caps.min_version(),
        caps.max_version(),
        caps.timeout_seconds()
    );

    let node = client.get_node(id).await?;
    println!("Node {} at {}, {}", node.id(), node.lat(), node.lon());
    for (key, value) in node.tags().iter() {
        println!("  {key} = {value}");
    }

    let history = client.get_history(ElementType::Node, id).await?;
    println!("{} versions in history", history.entities()?.len());

    if let Some(changeset_id) = node.changeset() {
        let changeset = client.get_changeset(changeset_id).await?;
        println!(
            "Last changed in changeset {}: {}",
            changeset.id(),
            changeset.comment().unwrap_or("(no comment)")
        );
    }

    Ok(())
}
