//! Observation and delivery
//!
//! Two delivery shapes sit on top of one shared core:
//! - `PointerObserver` calls back with the full snapshot after every event
//! - `PointerWatcher` queues a live handle per newly discovered pointer
//!
//! Both register their listeners with a single cancellation token, so
//! stopping observation detaches everything at once and suppresses any
//! delivery that was already in flight.

pub mod callback;
pub mod core;
pub mod options;
pub mod stream;

pub use self::callback::{ObserverCallback, PointerObserver, PointerObserverBuilder};
pub use self::core::PointerObserverEntry;
pub use self::options::{MoveCapture, ObserverOptions};
pub use self::stream::{PointerStream, PointerWatcher};
