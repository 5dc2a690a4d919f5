use log::{debug, info, warn};
use twilight_gateway::Event;

use crate::error::EventHandlerError;
use crate::{clocktower_info, clocktower_warn};

pub fn handle_event(shard_id: u64, event: &Event) -> Result<(), EventHandlerError> {
    match event {
        Event::Ready(ready) => clocktower_info!(
            "Connected to the gateway on shard {} as {}, serving {} guilds",
            shard_id,
            ready.user.name,
            ready.guilds.len()
        ),
        Event::Resumed => clocktower_info!("Shard {} has resumed its session", shard_id),
        Event::GatewayInvalidateSession(resumable) => {
            if *resumable {
                warn!("The gateway has invalidated our session, but it is resumable!");
            } else {
                clocktower_warn!("The gateway has invalidated our session on shard {}", shard_id);
                return Err(EventHandlerError::InvalidSession(shard_id));
            }
        }
        Event::GatewayReconnect => info!("The gateway asked shard {} to reconnect", shard_id),
        Event::GatewayHello(hello) => info!(
            "Registered with gateway, heartbeat every {}ms",
            hello.heartbeat_interval
        ),
        Event::GuildCreate(guild) => debug!("Guild {} ({}) is available", guild.name, guild.id),
        Event::GuildDelete(guild) => debug!("Guild {} is no longer available", guild.id),
        _ => (),
    }
    Ok(())
}
