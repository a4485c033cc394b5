// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process entry for the escape-room operator daemon.

use anyhow::{anyhow, Context};
use clap::Parser;
use op_core::Topics;
use op_daemon::{Controller, MosquittoPurge, MqttBus};
use op_engine::registry;
use rumqttc::{AsyncClient, MqttOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const CLIENT_ID: &str = "escape-room-operator";

#[derive(Parser)]
#[command(name = "opd", about = "Escape-room operator daemon", version)]
struct Args {
    /// Workflow definition to load from the registry.
    #[arg(long, short = 'd', default_value = "escape-room")]
    workflow_def: String,

    /// IP or hostname of the MQTT broker.
    #[arg(long, short = 'm', default_value = "127.0.0.1")]
    mqtt_host: String,

    /// Port of the MQTT broker.
    #[arg(long, default_value_t = 1883)]
    mqtt_port: u16,

    /// Prefix for the operator's own topics.
    #[arg(long, default_value = "op")]
    topic_prefix: String,

    /// mosquitto_sub compatible binary used for retained-topic purges.
    #[arg(long, default_value = "mosquitto_sub")]
    purge_bin: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let factory = registry(&args.workflow_def)
        .ok_or_else(|| anyhow!("unknown workflow definition '{}'", args.workflow_def))?;

    let mut mqtt_options = MqttOptions::new(CLIENT_ID, &args.mqtt_host, args.mqtt_port);
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    let (client, mut eventloop) = AsyncClient::new(mqtt_options, 64);

    op_daemon::runtime::wait_for_connack(&mut eventloop)
        .await
        .context("initial broker connect failed")?;

    let purge = MosquittoPurge::new(args.purge_bin, args.mqtt_host.clone());
    let topics = Topics::new(&args.topic_prefix);
    let mut controller =
        Controller::new(MqttBus::new(client.clone()), topics, factory, Some(purge));
    controller.on_connect().await.context("control topic subscribe failed")?;

    op_daemon::runtime::run(&mut controller, eventloop).await;

    client.disconnect().await.ok();
    tracing::info!("operator disconnected");
    Ok(())
}
