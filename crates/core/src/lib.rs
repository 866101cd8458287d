//! # SlotBook Core
//!
//! Domain types shared by the store, the HTTP API and the front-end: the
//! [`Slot`](models::slot::Slot) entity, request/response bodies, push events,
//! the [`BookingError`](errors::BookingError) taxonomy, request validation and
//! bootstrap window generation.

pub mod errors;
pub mod models;
pub mod validation;
pub mod windows;
