//! # Main Entry Point
//!
//! Initializes the application:
//! - Domain: Configuration and Types
//! - Infrastructure: Matrix, Bluesky, Logging
//! - Application: Monitor State, Poll Loop, Router
//! - Interface: Command Handlers
//!

mod application;
mod domain;
mod infrastructure;
mod interface;
mod strings;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_sdk::{
    Client,
    config::SyncSettings,
    room::Room,
    ruma::events::room::{
        member::{MembershipState, StrippedRoomMemberEvent},
        message::{MessageType, SyncRoomMessageEvent},
    },
};
use std::path::PathBuf;
use std::sync::Arc;

use crate::application::mutator::CommandMutator;
use crate::application::poller::Poller;
use crate::application::router::CommandRouter;
use crate::application::state::MonitorState;
use crate::domain::config::AppConfig;
use crate::domain::traits::{FeedProvider, RelayTarget};
use crate::infrastructure::bluesky::BlueskyClient;
use crate::infrastructure::matrix::MatrixService;
use crate::strings::logs;

/// Relays new Bluesky posts from monitored accounts into a Matrix room.
#[derive(Debug, Parser)]
#[command(name = "skyrelay", version, about)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Directory for the session log
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let config = Arc::new(AppConfig::load(&cli.config)?);

    // 2. Logging Setup
    let _log_guard = infrastructure::logging::init(&cli.data_dir)?;

    tracing::info!("Starting Skyrelay...");
    tracing::info!("{}", logs::config_loaded(&config.services.matrix.username));

    // 3. Monitor State (seeded from config, never persisted)
    let (monitor, rejected) = MonitorState::from_config(&config.monitor);
    for handle in &rejected {
        tracing::warn!("{}", logs::rejected_config_account(handle));
    }
    tracing::info!(
        "{}",
        logs::monitor_seeded(monitor.accounts().len(), monitor.filter.keywords().len())
    );
    let state = monitor.shared();

    // 4. Feed Platform
    let feed: Arc<dyn FeedProvider> = Arc::new(BlueskyClient::new(&config.services.bluesky)?);

    // 5. Matrix Setup
    let client = Client::builder()
        .homeserver_url(&config.services.matrix.homeserver)
        .build()
        .await
        .context("Failed to build Matrix client")?;

    client
        .matrix_auth()
        .login_username(
            &config.services.matrix.username,
            &config.services.matrix.password,
        )
        .initial_device_display_name("skyrelay")
        .send()
        .await
        .context("Matrix login failed")?;
    tracing::info!("{}", logs::LOGIN_SUCCESS);

    if let Some(name) = &config.services.matrix.display_name {
        tracing::info!("{}", logs::setting_display_name(name));
        if let Err(e) = client.account().set_display_name(Some(name)).await {
            tracing::warn!("{}", logs::set_display_name_fail(&e.to_string()));
        }
    }

    let relay_room = MatrixService::join(&client, &config.relay.room).await?;
    tracing::info!("{}", logs::relay_room_joined(&config.relay.room));
    let relay: Arc<dyn RelayTarget> = Arc::new(relay_room);

    // 6. Command Handling
    let mutator = CommandMutator::new(state.clone(), feed.clone(), config.monitor.poll_interval());
    let router = Arc::new(CommandRouter::new(config.clone(), mutator));
    let start_time = std::time::SystemTime::now();

    client.add_event_handler(move |ev: SyncRoomMessageEvent, room: Room| {
        let router = router.clone();

        async move {
            let Some(original_msg) = ev.as_original() else {
                return;
            };

            // Ignore events older than start_time
            let ts = ev.origin_server_ts();
            let event_time =
                std::time::UNIX_EPOCH + std::time::Duration::from_millis(ts.get().into());
            if event_time < start_time {
                return;
            }

            if original_msg.sender == room.own_user_id() {
                return;
            }

            if let MessageType::Text(text_content) = &original_msg.content.msgtype {
                let chat = MatrixService::new(room);
                if let Err(e) = router
                    .route(&chat, &text_content.body, original_msg.sender.as_str())
                    .await
                {
                    tracing::error!("Failed to route message: {}", e);
                }
            }
        }
    });

    // Handle Invites
    client.add_event_handler(|ev: StrippedRoomMemberEvent, room: Room| async move {
        if ev.content.membership == MembershipState::Invite {
            tracing::info!("{}", logs::invite_received(room.room_id().as_str()));
            if let Err(e) = room.join().await {
                tracing::warn!("{}", logs::join_invite_fail(&e.to_string()));
            }
        }
    });

    // 7. Start Loops
    let poller = Poller::new(
        state,
        feed,
        relay,
        config.monitor.poll_interval(),
        config.monitor.account_delay(),
    );
    let poll_handle = poller.spawn();

    tracing::info!("{}", logs::SYNC_LOOP_START);
    let result = tokio::select! {
        res = client.sync(SyncSettings::default()) => {
            res.map_err(|e| {
                tracing::error!("{}", logs::sync_loop_fail(&e.to_string()));
                anyhow::anyhow!(e)
            })
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("{}", logs::SHUTDOWN);
            Ok(())
        }
    };

    // No state to flush; an in-flight cycle is simply dropped.
    poll_handle.abort();
    result
}
