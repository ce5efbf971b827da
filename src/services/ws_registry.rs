//! Registry of open WebSocket connections.
//!
//! A single task owns the connection map. Handlers talk to it through
//! [`ConnectionRegistry`], so add, remove and broadcast never interleave.

use std::collections::HashMap;

use tokio::sync::{mpsc, oneshot};
use tracing::debug;

pub type ConnectionId = u64;

/// Outgoing frames for one connection, already serialized.
pub type Outbox = mpsc::UnboundedSender<String>;

enum Command {
    Register {
        outbox: Outbox,
        reply: oneshot::Sender<ConnectionId>,
    },
    Unregister {
        id: ConnectionId,
    },
    Broadcast {
        payload: String,
        reply: oneshot::Sender<usize>,
    },
    Count {
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to the registry task. Clones share the same task, which exits
/// once every handle is dropped.
#[derive(Clone, Debug)]
pub struct ConnectionRegistry {
    commands: mpsc::UnboundedSender<Command>,
}

impl ConnectionRegistry {
    /// Start the registry task on the current runtime.
    pub fn spawn() -> Self {
        let (commands, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx));
        Self { commands }
    }

    /// Add a connection. `None` only if the registry task is gone.
    pub async fn register(&self, outbox: Outbox) -> Option<ConnectionId> {
        let (reply, rx) = oneshot::channel();
        self.commands.send(Command::Register { outbox, reply }).ok()?;
        rx.await.ok()
    }

    /// Remove a connection. Unknown ids are ignored.
    pub fn unregister(&self, id: ConnectionId) {
        let _ = self.commands.send(Command::Unregister { id });
    }

    /// Queue `payload` on every open connection and return how many
    /// accepted it.
    pub async fn broadcast(&self, payload: String) -> usize {
        let (reply, rx) = oneshot::channel();
        if self
            .commands
            .send(Command::Broadcast { payload, reply })
            .is_err()
        {
            return 0;
        }
        rx.await.unwrap_or(0)
    }

    pub async fn count(&self) -> usize {
        let (reply, rx) = oneshot::channel();
        if self.commands.send(Command::Count { reply }).is_err() {
            return 0;
        }
        rx.await.unwrap_or(0)
    }
}

async fn run(mut commands: mpsc::UnboundedReceiver<Command>) {
    let mut connections: HashMap<ConnectionId, Outbox> = HashMap::new();
    let mut next_id: ConnectionId = 1;

    while let Some(command) = commands.recv().await {
        match command {
            Command::Register { outbox, reply } => {
                let id = next_id;
                next_id += 1;
                connections.insert(id, outbox);
                let _ = reply.send(id);
            }
            Command::Unregister { id } => {
                connections.remove(&id);
            }
            Command::Broadcast { payload, reply } => {
                // A closed outbox means the socket is already on its way out.
                connections.retain(|_, outbox| !outbox.is_closed());

                let sent = connections
                    .values()
                    .filter(|outbox| outbox.send(payload.clone()).is_ok())
                    .count();
                let _ = reply.send(sent);
            }
            Command::Count { reply } => {
                let _ = reply.send(connections.len());
            }
        }
    }

    debug!("Connection registry stopped");
}
