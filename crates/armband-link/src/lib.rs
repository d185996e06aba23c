pub mod protocol;

use anyhow::Result;
use armband_signal::{DeviceControl, SensorEvent, UnlockMode};
use protocol::{encode_command, DeviceCommand, EventParser};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Client for an armband bridge.
///
/// Reads the bridge's event stream on a background task and hands parsed
/// events to the owner in arrival order. Device commands queued through
/// [`CommandSender`] are written back on the same connection.
pub struct ArmbandClient {
    event_rx: mpsc::UnboundedReceiver<SensorEvent>,
    command_tx: mpsc::UnboundedSender<DeviceCommand>,
    _task: tokio::task::JoinHandle<()>,
}

impl ArmbandClient {
    /// Connect to the bridge and start processing.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        let addr = format!("{host}:{port}");
        tracing::info!(%addr, "Connecting to armband bridge");

        let stream = TcpStream::connect(&addr).await?;
        stream.set_nodelay(true)?;
        tracing::info!("Connected to armband bridge");

        Ok(Self::from_stream(stream))
    }

    /// Run the client over an already established byte stream.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        let task = tokio::spawn(link_loop(stream, event_tx, command_rx));

        Self {
            event_rx,
            command_tx,
            _task: task,
        }
    }

    /// Create a mock client for development without an armband connected.
    ///
    /// It never yields events; commands are accepted and dropped.
    pub fn mock() -> Self {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, mut command_rx) = mpsc::unbounded_channel::<DeviceCommand>();
        let task = tokio::spawn(async move {
            // Keep the sender alive.
            let _tx = event_tx;
            while let Some(command) = command_rx.recv().await {
                tracing::trace!(?command, "Mock armband ignoring command");
            }
        });
        Self {
            event_rx,
            command_tx,
            _task: task,
        }
    }

    /// Wait for the next event. `None` once the link has closed.
    pub async fn next_event(&mut self) -> Option<SensorEvent> {
        self.event_rx.recv().await
    }

    /// Handle for issuing device commands from event handlers.
    pub fn device(&self) -> CommandSender {
        CommandSender {
            tx: self.command_tx.clone(),
        }
    }
}

/// Queues device commands for the link task.
#[derive(Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<DeviceCommand>,
}

impl CommandSender {
    fn send(&self, command: DeviceCommand) {
        if self.tx.send(command).is_err() {
            tracing::debug!(?command, "Armband link closed, dropping command");
        }
    }
}

impl DeviceControl for CommandSender {
    fn request_unlock(&mut self, mode: UnlockMode) {
        self.send(DeviceCommand::Unlock(mode));
    }

    fn notify_user_action(&mut self) {
        self.send(DeviceCommand::NotifyUserAction);
    }
}

/// Background task: read events, parse lines, forward them; write queued commands.
async fn link_loop<S>(
    stream: S,
    event_tx: mpsc::UnboundedSender<SensorEvent>,
    mut command_rx: mpsc::UnboundedReceiver<DeviceCommand>,
) where
    S: AsyncRead + AsyncWrite,
{
    let (mut reader, mut writer) = tokio::io::split(stream);
    let mut parser = EventParser::new();
    let mut buf = [0u8; 4096];
    let mut event_count: u64 = 0;

    loop {
        tokio::select! {
            result = reader.read(&mut buf) => {
                match result {
                    Ok(0) => {
                        tracing::warn!("Armband bridge connection closed");
                        break;
                    }
                    Ok(n) => {
                        parser.push_data(&buf[..n]);

                        while let Some(result) = parser.next_event() {
                            match result {
                                Ok(event) => {
                                    if event_tx.send(event).is_err() {
                                        return;
                                    }
                                    event_count += 1;
                                    if event_count % 1000 == 0 {
                                        tracing::debug!(event_count, "Armband events processed");
                                    }
                                }
                                Err(e) => {
                                    tracing::warn!(?e, "Skipping malformed event line");
                                }
                            }
                        }
                    }
                    Err(e) => {
                        tracing::error!(?e, "Armband bridge read error");
                        break;
                    }
                }
            }
            Some(command) = command_rx.recv() => {
                let line = match encode_command(&command) {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::error!(?e, ?command, "Failed to encode device command");
                        continue;
                    }
                };
                if let Err(e) = writer.write_all(&line).await {
                    tracing::error!(?e, "Armband bridge write error");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use armband_signal::{EventKind, Pose};
    use tokio::io::{AsyncBufReadExt, BufReader};

    #[tokio::test]
    async fn events_flow_in_and_commands_flow_out() {
        let (client_side, mut bridge_side) = tokio::io::duplex(1024);
        let mut client = ArmbandClient::from_stream(client_side);

        bridge_side
            .write_all(b"{\"type\":\"unlock\",\"timestamp\":1}\nnot json\n")
            .await
            .unwrap();
        bridge_side
            .write_all(b"{\"type\":\"pose\",\"timestamp\":2,\"pose\":\"fist\"}\n")
            .await
            .unwrap();

        assert_eq!(client.next_event().await.unwrap().kind, EventKind::Unlock);
        let pose = client.next_event().await.unwrap();
        assert_eq!(pose.timestamp, 2);
        assert_eq!(pose.kind, EventKind::Pose(Pose::Fist));

        let mut device = client.device();
        device.request_unlock(UnlockMode::Timed);
        device.notify_user_action();

        let mut reader = BufReader::new(bridge_side);
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "{\"command\":\"unlock\",\"mode\":\"timed\"}\n");
        line.clear();
        reader.read_line(&mut line).await.unwrap();
        assert_eq!(line, "{\"command\":\"notifyUserAction\"}\n");
    }

    #[tokio::test]
    async fn closed_bridge_ends_event_stream() {
        let (client_side, bridge_side) = tokio::io::duplex(64);
        let mut client = ArmbandClient::from_stream(client_side);
        drop(bridge_side);
        assert!(client.next_event().await.is_none());
    }

    #[tokio::test]
    async fn mock_stays_open_and_accepts_commands() {
        let mut client = ArmbandClient::mock();
        let mut device = client.device();
        device.request_unlock(UnlockMode::Hold);
        device.notify_user_action();

        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(50), client.next_event()).await;
        assert!(pending.is_err(), "mock yielded or closed: {pending:?}");
    }
}
