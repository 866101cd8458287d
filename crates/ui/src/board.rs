//! # Local Slot State
//!
//! [`SlotBoard`] holds the slots the front-end is showing and applies
//! optimistic reservations on top of them.
//!
//! A reservation in flight is tracked by an explicit per-slot pending marker.
//! While a slot is pending, pushed updates for it are ignored so that a late
//! push cannot clobber the optimistic state. Settling the reservation always
//! clears the marker: on success the server's row is stored, on failure the
//! snapshot taken before the optimistic change is restored.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, Utc};
use slotbook_core::{
    errors::{BookingError, BookingResult},
    models::slot::{Slot, SlotStatus},
};
use tracing::debug;

#[derive(Debug, Default)]
pub struct SlotBoard {
    slots: BTreeMap<i32, Slot>,
    pending: HashSet<i32>,
}

/// An optimistic reservation awaiting the server's answer.
///
/// Hand it back to [`SlotBoard::settle`] once the request completes.
#[derive(Debug)]
#[must_use = "a pending reservation must be settled"]
pub struct PendingReservation {
    snapshot: Slot,
}

impl PendingReservation {
    pub fn slot_id(&self) -> i32 {
        self.snapshot.id
    }
}

impl SlotBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the board with freshly fetched slots.
    ///
    /// Slots with a reservation in flight keep their optimistic state.
    pub fn replace(&mut self, slots: Vec<Slot>) {
        let mut fresh: BTreeMap<i32, Slot> = slots.into_iter().map(|s| (s.id, s)).collect();
        for id in &self.pending {
            if let Some(local) = self.slots.get(id) {
                fresh.insert(*id, local.clone());
            }
        }
        self.slots = fresh;
    }

    pub fn get(&self, id: i32) -> Option<&Slot> {
        self.slots.get(&id)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_pending(&self, id: i32) -> bool {
        self.pending.contains(&id)
    }

    /// Every slot on the board, ordered by start time.
    pub fn slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|s| (s.start_time, s.id));
        slots
    }

    /// Slots starting on the given UTC day, ordered by start time.
    pub fn slots_on(&self, date: NaiveDate) -> Vec<&Slot> {
        self.slots()
            .into_iter()
            .filter(|s| s.start_time.date_naive() == date)
            .collect()
    }

    /// Marks `id` reserved by `nurse_id` locally and sets its pending marker.
    ///
    /// # Errors
    ///
    /// `Slot not available` when the slot is unknown, already reserved, or
    /// already has a reservation in flight.
    pub fn begin_reserve(&mut self, id: i32, nurse_id: &str) -> BookingResult<PendingReservation> {
        if self.pending.contains(&id) {
            return Err(BookingError::slot_not_available());
        }
        let slot = self
            .slots
            .get_mut(&id)
            .filter(|s| s.is_available())
            .ok_or_else(BookingError::slot_not_available)?;

        let snapshot = slot.clone();
        slot.status = SlotStatus::Reserved;
        slot.nurse_id = Some(nurse_id.to_string());
        slot.updated_at = Utc::now();
        self.pending.insert(id);

        debug!(slot_id = id, "Optimistic reservation started");
        Ok(PendingReservation { snapshot })
    }

    /// Resolves a pending reservation with the server's answer.
    ///
    /// The pending marker is cleared whatever the outcome. The outcome is
    /// returned unchanged so callers can report it.
    pub fn settle<E>(&mut self, pending: PendingReservation, outcome: Result<Slot, E>) -> Result<Slot, E> {
        let id = pending.slot_id();
        self.pending.remove(&id);

        match &outcome {
            Ok(slot) => {
                self.slots.insert(slot.id, slot.clone());
            }
            Err(_) => {
                debug!(slot_id = id, "Optimistic reservation reverted");
                self.slots.insert(id, pending.snapshot);
            }
        }

        outcome
    }

    /// Applies a pushed update. Returns whether the board changed.
    ///
    /// Updates for slots that are not on the board, or that have a reservation
    /// in flight, are ignored.
    pub fn apply_push(&mut self, slot: Slot) -> bool {
        if self.pending.contains(&slot.id) {
            return false;
        }
        match self.slots.get_mut(&slot.id) {
            Some(current) if *current != slot => {
                *current = slot;
                true
            }
            _ => false,
        }
    }
}
