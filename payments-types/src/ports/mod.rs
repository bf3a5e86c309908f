//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod observer;
mod publisher;
mod repository;

pub use observer::CreationObserver;
pub use publisher::{EventPublisher, TopicSpec};
pub use repository::PaymentRepository;
