//! Broker-backed event bus.
//!
//! [`EventBus`] owns the NATS session and is the single point of contact
//! with the broker. Messages are encoded through [`super::codec`] and can
//! be consumed either callback-style (handler invoked on the delivery
//! path) or channel-style (bounded receive stream).
//!
//! Every consumption task watches a shutdown signal owned by the bus, so
//! [`EventBus::close`] deterministically terminates all subscriptions
//! instead of leaking them.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;

use crate::error::GatewayError;

use super::codec;
use super::messages::{BrokerMessage, FeedCreatedMessage};

/// Publish-side contract of the bus.
///
/// Lets the write path depend on a narrow seam instead of the full bus,
/// and lets service tests substitute a recording double.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes a feed-created announcement to the broker.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] or [`GatewayError::Publish`] on
    /// failure; the caller decides whether that is fatal.
    async fn publish_feed_created(&self, message: FeedCreatedMessage) -> Result<(), GatewayError>;
}

struct BusShared {
    client: async_nats::Client,
    shutdown_tx: watch::Sender<bool>,
    tasks: Mutex<Vec<JoinHandle<()>>>,
    channel_capacity: usize,
}

/// Event bus over a NATS session. Cheaply cloneable; clones share the
/// session, the subscription set, and the shutdown signal.
///
/// The bus performs no reconnection or publish retry of its own: a failed
/// `connect` is fatal to the startup path that attempted it, and a failed
/// publish is reported to the caller (feed ids are stable, so the write
/// path may retry idempotently if it chooses).
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusShared>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("channel_capacity", &self.inner.channel_capacity)
            .finish_non_exhaustive()
    }
}

impl EventBus {
    /// Establishes the broker session.
    ///
    /// `channel_capacity` bounds every receive stream handed out by
    /// [`Self::subscribe_channel`]; a larger buffer trades memory for a
    /// lower drop probability under bursty load.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connection`] if the broker is unreachable.
    /// Fails fast; retry policy belongs to the caller.
    pub async fn connect(url: &str, channel_capacity: usize) -> Result<Self, GatewayError> {
        let client = async_nats::connect(url)
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        let (shutdown_tx, _) = watch::channel(false);

        Ok(Self {
            inner: Arc::new(BusShared {
                client,
                shutdown_tx,
                tasks: Mutex::new(Vec::new()),
                channel_capacity,
            }),
        })
    }

    /// Encodes and publishes a message on its topic.
    ///
    /// Fire-and-forget with respect to subscriber processing: the broker
    /// accepts the payload and delivery proceeds independently.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Encode`] if the value cannot be serialized
    /// or [`GatewayError::Publish`] if the broker rejects the send.
    pub async fn publish<M: BrokerMessage>(&self, message: &M) -> Result<(), GatewayError> {
        let payload = codec::encode(message)?;
        self.inner
            .client
            .publish(M::TOPIC, payload.into())
            .await
            .map_err(|err| GatewayError::Publish {
                topic: M::TOPIC,
                reason: err.to_string(),
            })?;
        Ok(())
    }

    /// Registers `handler` to run once per inbound message on the topic of
    /// `M`, on a dispatch path independent of the publisher's call stack.
    ///
    /// The handler runs on this subscription's delivery path: a slow
    /// handler delays subsequent messages on the same subscription, so
    /// blocking work must be handed off to its own task immediately.
    /// Undecodable payloads are logged and dropped; the subscription
    /// continues. At most one callback subscription per topic per bus
    /// instance is supported.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connection`] if the broker rejects the
    /// subscription.
    pub async fn subscribe_callback<M, F>(&self, handler: F) -> Result<(), GatewayError>
    where
        M: BrokerMessage,
        F: Fn(M) + Send + 'static,
    {
        let mut subscriber = self
            .inner
            .client
            .subscribe(M::TOPIC)
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        let mut shutdown_rx = self.inner.shutdown_tx.subscribe();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    inbound = subscriber.next() => {
                        let Some(inbound) = inbound else { break };
                        match codec::decode::<M>(&inbound.payload) {
                            Ok(message) => handler(message),
                            Err(err) => {
                                tracing::error!(topic = M::TOPIC, %err, "dropping undecodable message");
                            }
                        }
                    }
                }
            }
            let _ = subscriber.unsubscribe().await;
            tracing::debug!(topic = M::TOPIC, "callback subscription stopped");
        });

        self.inner.tasks.lock().await.push(task);
        Ok(())
    }

    /// Subscribes to the topic of `M` and returns a bounded receive stream
    /// of decoded messages.
    ///
    /// The stream is best-effort, at most once: when the consumer lags
    /// more than the configured capacity behind the broker, new messages
    /// are dropped (and logged) rather than blocking the delivery path.
    /// The stream ends (`recv()` yields `None`) when the bus is closed, so
    /// consumers never hang on a dead subscription. At most one channel
    /// subscription per topic per bus instance is supported.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Connection`] if the broker rejects the
    /// subscription.
    pub async fn subscribe_channel<M: BrokerMessage>(
        &self,
    ) -> Result<mpsc::Receiver<M>, GatewayError> {
        let mut subscriber = self
            .inner
            .client
            .subscribe(M::TOPIC)
            .await
            .map_err(|err| GatewayError::Connection(err.to_string()))?;
        let mut shutdown_rx = self.inner.shutdown_tx.subscribe();
        let (tx, rx) = mpsc::channel(self.inner.channel_capacity);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    inbound = subscriber.next() => {
                        let Some(inbound) = inbound else { break };
                        let message = match codec::decode::<M>(&inbound.payload) {
                            Ok(message) => message,
                            Err(err) => {
                                tracing::error!(topic = M::TOPIC, %err, "dropping undecodable message");
                                continue;
                            }
                        };
                        match tx.try_send(message) {
                            Ok(()) => {}
                            Err(mpsc::error::TrySendError::Full(_)) => {
                                tracing::warn!(topic = M::TOPIC, "receive stream full, dropping message");
                            }
                            Err(mpsc::error::TrySendError::Closed(_)) => break,
                        }
                    }
                }
            }
            let _ = subscriber.unsubscribe().await;
            tracing::debug!(topic = M::TOPIC, "channel subscription stopped");
        });

        self.inner.tasks.lock().await.push(task);
        Ok(rx)
    }

    /// Shuts the bus down: terminates every consumption task (each
    /// unsubscribes its broker handle on the way out), closes all receive
    /// streams, and flushes the session.
    ///
    /// Idempotent; a second call finds nothing left to stop. Consumers
    /// blocked on a receive stream observe end-of-stream rather than
    /// hanging.
    pub async fn close(&self) {
        self.inner.shutdown_tx.send_replace(true);
        let drained: Vec<JoinHandle<()>> = {
            let mut tasks = self.inner.tasks.lock().await;
            tasks.drain(..).collect()
        };
        for task in drained {
            let _ = task.await;
        }
        if let Err(err) = self.inner.client.flush().await {
            tracing::warn!(%err, "flush on close failed");
        }
    }
}

#[async_trait]
impl EventPublisher for EventBus {
    async fn publish_feed_created(&self, message: FeedCreatedMessage) -> Result<(), GatewayError> {
        self.publish(&message).await
    }
}
