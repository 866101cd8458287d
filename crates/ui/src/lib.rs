//! # SlotBook Calendar
//!
//! Client-side pieces of the calendar front-end: a month grid, local slot
//! state with optimistic reservations, and clients for the HTTP API and the
//! push channel. The `calendar` binary wires them to a terminal.
//!
//! Local state is advisory. The server's reservation resolver decides every
//! conflict; the board only reflects its answers.

pub mod board;
pub mod calendar;
pub mod client;
pub mod command;
pub mod config;
pub mod push;
pub mod render;
