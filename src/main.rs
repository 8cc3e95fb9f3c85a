//! cdn-backend-reconciler - converge one CDN backend to its desired state
//!
//! This is the composition root: configuration comes from the environment,
//! the reconciler is wired to the Fastly adapter.

use anyhow::Context;
use cdn_backend_reconciler::config::{load_config, Action};
use cdn_backend_reconciler::{BackendReconciler, FastlyClientFactory};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let desired = cfg.desired_backend()?;

    // ===== COMPOSITION ROOT =====
    let factory = Arc::new(FastlyClientFactory::new(cfg.fastly()));
    let reconciler = BackendReconciler::new(factory);

    // Fail on bad credentials before any network I/O
    let auth = reconciler
        .resolve_auth(&desired)
        .context("invalid credentials")?;

    tracing::info!(
        "{:?} backend {} in service {} via {} ({} auth)",
        cfg.action,
        desired.name,
        desired.service,
        cfg.api_url,
        auth.kind()
    );

    match cfg.action {
        Action::Reconcile => {
            let backend = reconciler
                .reconcile(&desired)
                .await
                .with_context(|| format!("reconciling backend {}", desired.name))?;
            println!("{}", serde_json::to_string_pretty(&backend)?);
        }
        Action::Find => {
            let found = reconciler
                .find(&desired)
                .await
                .with_context(|| format!("looking up backend {}", desired.name))?;
            match found {
                Some(backend) => println!("{}", serde_json::to_string_pretty(&backend)?),
                None => {
                    println!("backend {} not found", desired.name);
                    std::process::exit(2);
                }
            }
        }
    }

    Ok(())
}
