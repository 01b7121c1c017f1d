//! # Event Bus
//!
//! A type-keyed fan-out bus shared by the feature slices. Each event type gets
//! its own `tokio::sync::broadcast` channel, created lazily on first use.
//!
//! ```rust
//! use autoani_events::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct VehicleSold { id: String }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<VehicleSold>()?;
//!     bus.publish(VehicleSold { id: "x5".into() })?;
//!
//!     let event = rx.recv_event().await.unwrap();
//!     assert_eq!(event.id, "x5");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
