use roster::prelude::*;
use roster::protocol::codes::chat::{event, operation, parameter};
use roster::protocol::{Inbound, OperationRequest, ParamLookup};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Listener: print what the client sees
// ---------------------------------------------------------------------------

struct Printer;

impl ChatListener for Printer {
    fn on_state_change(&mut self, state: ConnectionState) {
        tracing::info!(%state, "state");
    }

    fn on_subscribed(&mut self, results: &ChannelResults) {
        for (channel, ok) in results {
            tracing::info!(%channel, ok, "subscribe result");
        }
    }

    fn on_chat_messages(&mut self, channel: &str, messages: &[Message]) {
        for m in messages {
            tracing::info!(channel, sender = %m.sender, content = %m.content, "message");
        }
    }

    fn on_private_message(&mut self, channel: &str, message: &Message) {
        tracing::info!(channel, sender = %message.sender, content = %message.content, "private");
    }

    fn on_operation_response(&mut self, response: &OperationResponse) {
        tracing::debug!(code = response.code, ok = response.is_ok(), "response");
    }
}

// ---------------------------------------------------------------------------
// Fake server: answers each request with canned events
// ---------------------------------------------------------------------------

/// Channels this server will let anyone join.
const OPEN_CHANNELS: &[&str] = &["general"];

async fn fake_server(
    user: String,
    mut requests: mpsc::UnboundedReceiver<Vec<u8>>,
    events: mpsc::UnboundedSender<Vec<u8>>,
) -> Result<(), RosterError> {
    let codec = JsonCodec;
    let send = |record: Inbound| -> Result<bool, RosterError> {
        Ok(events.send(codec.encode(&record)?).is_ok())
    };

    send(Inbound::State(ConnectionState::ConnectingToFrontEnd))?;
    send(Inbound::State(ConnectionState::ConnectedToFrontEnd))?;

    while let Some(frame) = requests.recv().await {
        let request: OperationRequest = codec.decode(&frame)?;
        let code = request.code;
        let params = request.params;
        tracing::debug!(code, "server received request");

        let mut replies = vec![Inbound::Response(OperationResponse::ok(code))];
        match code {
            operation::SUBSCRIBE => {
                let names = params.require_str_list(parameter::CHANNELS)?;
                let results: Value = names
                    .iter()
                    .map(|n| OPEN_CHANNELS.contains(&n.as_str()))
                    .collect();
                replies.push(Inbound::Event(
                    EventData::new(event::SUBSCRIBE)
                        .with(parameter::CHANNELS, names.into_iter().collect::<Value>())
                        .with(parameter::SUBSCRIBE_RESULTS, results),
                ));
            }
            operation::PUBLISH => {
                let channel = params.require_str(parameter::CHANNEL)?;
                let message = params.require(parameter::MESSAGE)?.clone();
                replies.push(Inbound::Event(
                    EventData::new(event::CHAT_MESSAGES)
                        .with(parameter::CHANNEL, channel)
                        .with(parameter::SENDERS, Value::from_iter([user.as_str()]))
                        .with(parameter::MESSAGES, Value::Array(vec![message])),
                ));
            }
            operation::SEND_PRIVATE => {
                let target = params.require_str(parameter::USER_ID)?;
                let message = params.require(parameter::MESSAGE)?.clone();
                replies.push(Inbound::Event(
                    EventData::new(event::PRIVATE_MESSAGE)
                        .with(parameter::SENDER, user.as_str())
                        .with(parameter::USER_ID, target)
                        .with(parameter::MESSAGE, message),
                ));
            }
            _ => {}
        }

        for reply in replies {
            if !send(reply)? {
                return Ok(());
            }
        }

        if code == operation::UPDATE_STATUS {
            tracing::debug!("server closing");
            break;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<(), RosterError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (in_tx, mut in_rx) = mpsc::unbounded_channel();

    let config = ChatConfig::with_user_id("ada");
    let peer = ChannelPeer::new(out_tx, JsonCodec);
    let mut chat = ChatClient::new(peer, Printer, config);

    let server = tokio::spawn(fake_server(chat.user_id().to_string(), out_rx, in_tx));

    // Wait for the transport to report the front end before sending.
    while chat.state() != ConnectionState::ConnectedToFrontEnd {
        let Some(frame) = in_rx.recv().await else {
            tracing::error!("server went away before connecting");
            return Ok(());
        };
        let record: Inbound = JsonCodec.decode(&frame)?;
        chat.dispatch(record);
    }

    chat.subscribe(&["general", "secret"], Some(10))?;
    chat.publish("general", "hello, world")?;
    chat.send_private("bob", "psst")?;
    chat.update_status(UserStatus::Online, Some(Value::from("demoing")), false)?;

    let dispatched = roster::drive(&mut chat, in_rx, &JsonCodec).await;
    tracing::info!(dispatched, "done");

    if let Ok(Err(e)) = server.await {
        tracing::error!(error = %e, "server failed");
    }

    let cache = chat.cache();
    tracing::info!(
        public = ?cache.public_channels(),
        private = ?cache.private_channels(),
        "final cache"
    );
    Ok(())
}
