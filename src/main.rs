// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2012-2025 Andrei Maltsev

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use dmtp_server::{
    cfg::{
        cli::resolve_config_path,
        config::{Config, DefaultPolicy},
        enums::ConnectionMode,
        logger::init_logger,
    },
    session::{Session, SessionTransport},
    store::memory::MemoryStore,
};
use tracing::info;

/// Demo transport reading one packet per stdin line, formatted
/// `<customType-hex>,<isEvent 0|1>,<payload-hex>`, e.g. `01,1,0608060402`.
/// A real deployment supplies its own [`SessionTransport`] over a socket —
/// this one exists so the binary is runnable end to end without one.
struct StdinTransport {
    lines: std::io::Lines<std::io::StdinLock<'static>>,
}

impl StdinTransport {
    fn new() -> Self {
        let stdin = Box::leak(Box::new(std::io::stdin()));
        StdinTransport {
            lines: stdin.lock().lines(),
        }
    }
}

impl SessionTransport for StdinTransport {
    fn recv_packet(&mut self) -> std::io::Result<Option<(u8, bool, Vec<u8>)>> {
        loop {
            let Some(line) = self.lines.next() else {
                return Ok(None);
            };
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let mut parts = line.splitn(3, ',');
            let (Some(ty), Some(is_event), Some(payload)) =
                (parts.next(), parts.next(), parts.next())
            else {
                tracing::warn!(%line, "malformed demo packet line, skipping");
                continue;
            };
            let Ok(custom_type) = u8::from_str_radix(ty.trim(), 16) else {
                continue;
            };
            let is_event = is_event.trim() == "1";
            let Ok(payload) = hex::decode(payload.trim()) else {
                continue;
            };
            return Ok(Some((custom_type, is_event, payload)));
        }
    }
}

/// The decoder and session accounting are synchronous and suspension-free
/// by design (spec §5: "no suspension points inside decode"); `tokio` only
/// bootstraps the process and would host whatever async socket-accept loop
/// a real transport (out of scope here, spec §1) hands packets in from —
/// this demo drives stdin on a blocking task the same shape that loop would
/// take.
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = resolve_config_path("config/config.yaml")
        .context("failed to resolve config path")?;
    let cfg = Config::load_from_file(&config_path).context("failed to load config")?;

    let logger_path = resolve_config_path("config/logger.yaml")
        .context("failed to resolve logger config path")?;
    let _guard = init_logger(logger_path.to_string_lossy().as_ref())?;

    let store = Arc::new(MemoryStore::new(cfg.default_policy.profile_length_bytes));
    store.provision("demo-device");

    info!("dmtp-server demo listening on stdin, one packet per line");

    tokio::task::spawn_blocking(move || run_demo_session(store, cfg.default_policy))
        .await
        .context("demo session task panicked")??;

    Ok(())
}

/// The blocking half of the demo: opens one duplex session and pumps
/// stdin-framed packets through it until the peer closes.
fn run_demo_session(store: Arc<MemoryStore>, policy: DefaultPolicy) -> Result<()> {
    let session = Session::open(
        "demo-device",
        ConnectionMode::Duplex,
        store.as_ref(),
        store.as_ref(),
        policy,
        now(),
    )
    .context("failed to open session")?;

    let mut transport = StdinTransport::new();
    let outcomes = session.drive(&mut transport, now)?;
    info!(count = outcomes.len(), "packets processed");

    Ok(())
}

fn now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}
