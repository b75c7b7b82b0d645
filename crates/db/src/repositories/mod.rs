//! Repository abstractions for data access.
//!
//! Repositories implement the store read contract consumed by the core:
//! owner-scoped rows inside an inclusive date window, ordered by date
//! ascending, with relation names resolved into core record types.

pub mod inventory;
pub mod movements;

pub use inventory::InventoryRepository;
pub use movements::MovementRepository;
