//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a transaction connection) as the first argument.

pub mod claim_repo;
pub mod stand_event_repo;
pub mod stand_repo;

pub use claim_repo::ClaimRepo;
pub use stand_event_repo::StandEventRepo;
pub use stand_repo::StandRepo;
