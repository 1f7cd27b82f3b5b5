//! Watch-together session synchronization server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin watchparty-server
//! cargo run --bin watchparty-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use watchparty_server::{
    infrastructure::{
        ConnectionRegistry, InMemoryIdentityProvider,
        message_pusher::WebSocketMessagePusher,
        repository::{InMemoryChatArchive, InMemoryRoomDirectory, InMemoryRoomStore},
        spawn_reaper,
    },
    ui::{Server, state::AppState},
    usecase::{
        ChatUseCase, CreateRoomUseCase, GetRoomDetailUseCase, JoinRoomUseCase, LeaveRoomUseCase,
        ListRoomsUseCase, PlaybackUseCase,
    },
};
use watchparty_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "watchparty-server")]
#[command(about = "Watch-together session synchronization server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// How long an empty room survives before eviction, in seconds
    #[arg(long, default_value = "300")]
    grace_period_secs: u64,

    /// Interval between eviction sweeps, in seconds
    #[arg(long, default_value = "60")]
    reap_interval_secs: u64,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // Wiring order: clock, store and collaborators, registry and pusher,
    // use cases, state, server.
    let clock = Arc::new(SystemClock);
    let store = Arc::new(InMemoryRoomStore::new(
        clock.clone(),
        Duration::from_secs(args.grace_period_secs),
    ));
    let directory = Arc::new(InMemoryRoomDirectory::new(clock.clone()));
    let archive = Arc::new(InMemoryChatArchive::new());
    let identity_provider = Arc::new(InMemoryIdentityProvider::new());

    let registry = Arc::new(ConnectionRegistry::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    let state = Arc::new(AppState {
        join_room_usecase: Arc::new(JoinRoomUseCase::new(
            store.clone(),
            identity_provider,
            registry.clone(),
            message_pusher.clone(),
            clock.clone(),
        )),
        leave_room_usecase: Arc::new(LeaveRoomUseCase::new(
            store.clone(),
            registry.clone(),
            message_pusher.clone(),
        )),
        playback_usecase: Arc::new(PlaybackUseCase::new(
            store.clone(),
            registry.clone(),
            message_pusher.clone(),
        )),
        chat_usecase: Arc::new(ChatUseCase::new(
            store.clone(),
            registry.clone(),
            message_pusher.clone(),
            archive,
            clock.clone(),
        )),
        list_rooms_usecase: Arc::new(ListRoomsUseCase::new(directory.clone(), store.clone())),
        create_room_usecase: Arc::new(CreateRoomUseCase::new(directory.clone())),
        get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(directory, store.clone())),
        message_pusher,
        registry,
    });

    let reaper = spawn_reaper(store, Duration::from_secs(args.reap_interval_secs));

    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("server error: {}", e);
        std::process::exit(1);
    }

    reaper.abort();
}
