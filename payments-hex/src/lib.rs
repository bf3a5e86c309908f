//! # Payments Hex
//!
//! Application service layer and HTTP adapter for the payments service.
//!
//! ## Architecture
//!
//! - `service/` - Application service (orchestrates payment creation)
//! - `observer/` - Default creation diagnostics
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: PaymentRepository` and
//! `P: EventPublisher`, allowing different adapters to be injected.

pub mod inbound;
pub mod observer;
pub mod openapi;
pub mod service;


pub use observer::TracingObserver;
pub use service::PaymentService;
