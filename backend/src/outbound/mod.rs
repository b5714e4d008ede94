//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local customer store used by the running service
//!
//! Adapters are thin translators between domain types and their storage
//! representation. They contain no business logic.

pub mod memory;

pub use memory::InMemoryCustomerRepository;
