use std::collections::HashMap;

use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use inkboard_shared::{ChatMessage, WireEvent};

/// Display name every recipient sees on relayed chat lines. The hub
/// overrides whatever the sender claimed.
const CHAT_PEER_NAME: &str = "User";

/// The set of currently connected channels. This is the only state the
/// relay holds: no drawing history, no rooms, nothing survives a message
/// beyond the peer map itself.
#[derive(Default)]
pub struct Hub {
    peers: RwLock<HashMap<Uuid, mpsc::UnboundedSender<String>>>,
}

impl Hub {
    pub async fn join(&self, id: Uuid, tx: mpsc::UnboundedSender<String>) {
        let mut peers = self.peers.write().await;
        peers.insert(id, tx);
        tracing::info!(conn = %id, peers = peers.len(), "peer connected");
    }

    pub async fn leave(&self, id: Uuid) {
        let mut peers = self.peers.write().await;
        peers.remove(&id);
        tracing::info!(conn = %id, peers = peers.len(), "peer disconnected");
    }

    #[cfg(test)]
    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Forwards one inbound frame to every peer except the sender.
    ///
    /// Chat frames get their sender name rewritten. Everything else,
    /// including payloads that do not parse as any known event, is
    /// forwarded byte-for-byte. A peer whose channel is gone is dropped
    /// without affecting delivery to the rest.
    pub async fn relay(&self, sender: Uuid, payload: String) {
        let payload = rewrite_chat(payload);

        let mut stale = Vec::new();
        {
            let peers = self.peers.read().await;
            for (id, tx) in peers.iter() {
                if *id == sender {
                    continue;
                }
                if tx.send(payload.clone()).is_err() {
                    stale.push(*id);
                }
            }
        }

        if !stale.is_empty() {
            let mut peers = self.peers.write().await;
            for id in stale {
                peers.remove(&id);
            }
        }
    }
}

/// Replaces the sender name on chat frames with a fixed placeholder.
/// Any payload that is not a well-formed chat frame passes through
/// untouched; the relay never rejects what it cannot parse.
fn rewrite_chat(payload: String) -> String {
    match serde_json::from_str::<WireEvent>(&payload) {
        Ok(WireEvent::Chat(ChatMessage { text, .. })) => {
            let rewritten = WireEvent::Chat(ChatMessage {
                user: CHAT_PEER_NAME.to_string(),
                text,
            });
            serde_json::to_string(&rewritten).unwrap_or(payload)
        }
        _ => payload,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn peer(hub: &Hub) -> (Uuid, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        hub.join(id, tx).await;
        (id, rx)
    }

    #[tokio::test]
    async fn relays_to_everyone_but_the_sender() {
        let hub = Hub::default();
        let (a, mut rx_a) = peer(&hub).await;
        let (_b, mut rx_b) = peer(&hub).await;
        let (_c, mut rx_c) = peer(&hub).await;

        hub.relay(a, "{\"type\":\"undo\"}".to_string()).await;

        assert_eq!(rx_b.recv().await.unwrap(), "{\"type\":\"undo\"}");
        assert_eq!(rx_c.recv().await.unwrap(), "{\"type\":\"undo\"}");
        assert!(rx_a.try_recv().is_err());
    }

    #[tokio::test]
    async fn preserves_per_sender_order() {
        let hub = Hub::default();
        let (a, _rx_a) = peer(&hub).await;
        let (_b, mut rx_b) = peer(&hub).await;

        let frames = [
            "{\"type\":\"startPath\",\"x\":0.0,\"y\":0.0,\"color\":\"#ff0000\",\"size\":3.0}",
            "{\"type\":\"draw\",\"x0\":0.0,\"y0\":0.0,\"x1\":5.0,\"y1\":5.0,\"color\":\"#ff0000\",\"size\":3.0}",
            "{\"type\":\"endPath\"}",
        ];
        for frame in frames {
            hub.relay(a, frame.to_string()).await;
        }
        for frame in frames {
            assert_eq!(rx_b.recv().await.unwrap(), frame);
        }
    }

    #[tokio::test]
    async fn rewrites_chat_sender_name() {
        let hub = Hub::default();
        let (a, _rx_a) = peer(&hub).await;
        let (_b, mut rx_b) = peer(&hub).await;

        hub.relay(
            a,
            "{\"type\":\"chat\",\"user\":\"Alice\",\"text\":\"hi\"}".to_string(),
        )
        .await;

        let received: WireEvent = serde_json::from_str(&rx_b.recv().await.unwrap()).unwrap();
        assert_eq!(
            received,
            WireEvent::Chat(ChatMessage {
                user: "User".to_string(),
                text: "hi".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn forwards_unparseable_payloads_verbatim() {
        let hub = Hub::default();
        let (a, _rx_a) = peer(&hub).await;
        let (_b, mut rx_b) = peer(&hub).await;

        hub.relay(a, "{\"type\":\"mystery\",\"x\":".to_string()).await;

        assert_eq!(rx_b.recv().await.unwrap(), "{\"type\":\"mystery\",\"x\":");
    }

    #[tokio::test]
    async fn drops_peers_whose_channel_is_gone() {
        let hub = Hub::default();
        let (a, _rx_a) = peer(&hub).await;
        let (_b, rx_b) = peer(&hub).await;
        let (_c, mut rx_c) = peer(&hub).await;
        drop(rx_b);

        hub.relay(a, "{\"type\":\"reset\"}".to_string()).await;

        assert_eq!(rx_c.recv().await.unwrap(), "{\"type\":\"reset\"}");
        assert_eq!(hub.peer_count().await, 2);
    }

    #[tokio::test]
    async fn leave_is_terminal_for_a_channel() {
        let hub = Hub::default();
        let (a, _rx_a) = peer(&hub).await;
        let (b, mut rx_b) = peer(&hub).await;

        hub.leave(b).await;
        hub.relay(a, "{\"type\":\"undo\"}".to_string()).await;

        assert!(rx_b.try_recv().is_err());
        assert_eq!(hub.peer_count().await, 1);
    }
}
