use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::trace;

/// Buffer size for channels created implicitly by `publish`/`subscribe`.
const DEFAULT_CAPACITY: usize = 128;

/// Anything shareable across tasks can travel over the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

type Senders = FxHashMap<TypeId, Box<dyn Any + Send + Sync>>;

/// Thread-safe registry of broadcast channels keyed by event type.
///
/// Cloning is cheap; clones share the same channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<Senders>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to events of type `T` with the default buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity(DEFAULT_CAPACITY)
    }

    /// Subscribes with an explicit buffer size. The capacity only applies when
    /// this call creates the channel.
    ///
    /// # Errors
    /// Returns [`EventBusError::InvalidCapacity`] for a zero capacity.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be greater than zero".into(),
                context: Some(std::any::type_name::<T>().into()),
            });
        }
        Ok(self.sender::<T>(capacity)?.subscribe())
    }

    /// Publishes an event to every current subscriber of `T`.
    ///
    /// Returns the number of receivers reached; zero when nobody listens.
    ///
    /// # Errors
    /// Returns [`EventBusError::TypeMismatch`] if the registry is corrupted.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = std::any::type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Number of live receivers for `T`.
    #[must_use]
    pub fn subscriber_count<T: Event>(&self) -> usize {
        self.channels
            .read()
            .get(&TypeId::of::<T>())
            .and_then(|s| s.downcast_ref::<broadcast::Sender<Arc<T>>>())
            .map_or(0, broadcast::Sender::receiver_count)
    }

    fn sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let key = TypeId::of::<T>();

        if let Some(existing) = self.channels.read().get(&key) {
            return downcast::<T>(existing.as_ref());
        }

        let mut channels = self.channels.write();
        let entry = channels.entry(key).or_insert_with(|| {
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            Box::new(tx)
        });
        downcast::<T>(entry.as_ref())
    }
}

fn downcast<T: Event>(
    sender: &(dyn Any + Send + Sync),
) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
    sender.downcast_ref::<broadcast::Sender<Arc<T>>>().cloned().ok_or_else(|| {
        EventBusError::TypeMismatch {
            message: std::any::type_name::<T>().into(),
            context: Some("Unexpected channel type".into()),
        }
    })
}
