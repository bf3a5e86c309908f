//! # Payments Types
//!
//! Domain types and port traits for the payment creation service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Pure domain types (Payment, PaymentEvent)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for API boundaries
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    NewPayment, PAYMENT_EVENTS_PARTITIONS, PAYMENT_EVENTS_REPLICATION, PAYMENT_EVENTS_TOPIC,
    Payment, PaymentEvent, PaymentId, PaymentMethod, PaymentStatus,
};
pub use dto::*;
pub use error::{AppError, DomainError, PublishError, RepoError};
pub use ports::{CreationObserver, EventPublisher, PaymentRepository, TopicSpec};
