//! Two machines on a simulated LAN: one hosts, one finds and joins, then
//! the host starts the match.
//!
//! ```text
//! cargo run -p lan-lobby [lobby.json]
//! ```

use std::time::Duration;

use lobbyforge::prelude::*;
use tokio::sync::broadcast;

const HOST_ADDR: &str = "192.168.1.10:7777";
const GUEST_ADDR: &str = "192.168.1.11:7777";

/// How long to wait for a completion before giving up.
const EVENT_TIMEOUT: Duration = Duration::from_secs(5);

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

fn machine(
    registry: &LanRegistry,
    address: &str,
    player: PlayerContext,
    config: &LobbyConfig,
) -> LobbyMenu {
    let (sink, completions) = completion_channel();
    let provider = NullProvider::new(registry.clone(), sink, address);
    let client = SessionClient::spawn(
        SessionOrchestrator::with_provider(provider, player),
        completions,
    );
    LobbyMenu::new(client, config.clone())
}

/// Feeds events to `menu` until it asks to travel or `gave_up` says the
/// attempt is over.
async fn settle(
    menu: &mut LobbyMenu,
    events: &mut broadcast::Receiver<SessionEvent>,
    gave_up: fn(Controls) -> bool,
) -> Result<Option<Travel>, LobbyforgeError> {
    loop {
        let Ok(received) = tokio::time::timeout(EVENT_TIMEOUT, events.recv()).await
        else {
            tracing::warn!("no session event within timeout");
            return Ok(None);
        };
        let Ok(event) = received else {
            return Err(LobbyforgeError::Unavailable);
        };
        if let Some(travel) = menu.handle_event(&event).await? {
            return Ok(Some(travel));
        }
        if gave_up(menu.controls()) {
            return Ok(None);
        }
    }
}

/// Where each step of the demo ended up.
#[derive(Debug, Default)]
struct Outcome {
    host_lobby: Option<Travel>,
    guest_join: Option<Travel>,
    host_start: Option<Travel>,
}

async fn run(config: LobbyConfig) -> Result<Outcome, LobbyforgeError> {
    let registry = LanRegistry::new();
    let mut host = machine(
        &registry,
        HOST_ADDR,
        PlayerContext::host(PlayerId(1)),
        &config,
    );
    let mut guest = machine(
        &registry,
        GUEST_ADDR,
        PlayerContext::client(PlayerId(2)),
        &config,
    );
    let mut host_events = host.client().subscribe();
    let mut guest_events = guest.client().subscribe();
    let mut outcome = Outcome::default();

    host.host().await?;
    outcome.host_lobby = settle(&mut host, &mut host_events, |c| c.host).await?;
    tracing::info!(travel = ?outcome.host_lobby, "host");

    guest.join().await?;
    outcome.guest_join = settle(&mut guest, &mut guest_events, |c| c.join).await?;
    tracing::info!(travel = ?outcome.guest_join, "guest");

    host.start().await?;
    outcome.host_start = settle(&mut host, &mut host_events, |c| c.start).await?;
    tracing::info!(travel = ?outcome.host_start, "host");

    host.client().shutdown().await?;
    guest.client().shutdown().await?;
    Ok(outcome)
}

fn load_config() -> Result<LobbyConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            Ok(LobbyConfig::from_json_str(&json)?)
        }
        None => Ok(LobbyConfig::default()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    lobbyforge::telemetry::init();

    let config = load_config()?;
    tracing::info!(
        match_type = %config.match_type,
        connections = config.public_connections,
        "starting lan lobby demo"
    );

    let outcome = run(config).await?;
    if outcome.guest_join.is_none() {
        tracing::warn!("guest never reached the host");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_default_config_reaches_level() {
        let outcome = run(LobbyConfig::default()).await.unwrap();

        assert_eq!(
            outcome.host_lobby,
            Some(Travel::Server("/Game/Maps/Lobby?listen".into()))
        );
        assert_eq!(outcome.guest_join, Some(Travel::Client(HOST_ADDR.into())));
        assert_eq!(
            outcome.host_start,
            Some(Travel::Server("/Game/Maps/Level".into()))
        );
    }
}
