//! Stand reservation coordination.
//!
//! [`ReservationCoordinator`] owns every mutation of stand claims. Each
//! operation is the same shape: read the current claim, validate
//! preconditions against the in-memory snapshot, attempt the
//! version-guarded conditional write, and publish a [`StandEvent`]
//! only after the write committed. Races between concurrent sessions are
//! arbitrated entirely by the store's compare-and-swap — there is no
//! in-process lock to hold across an I/O boundary.
//!
//! [`sweeper::run`] is the background reclaim loop for abandoned holds.
//!
//! [`StandEvent`]: expo_events::StandEvent

pub mod config;
pub mod coordinator;
pub mod error;
pub mod sweeper;

pub use config::ReservationConfig;
pub use coordinator::ReservationCoordinator;
pub use error::ReservationError;
