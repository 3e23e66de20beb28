//! Sale and booking lifecycle orchestration.
//!
//! Wires the store transitions to their document side effects. Data
//! mutations commit first; a document failure is reported alongside the
//! committed record and never unwinds it.

use std::path::PathBuf;

use crate::documents::DocumentService;
use crate::error::{Result, ShowroomError};
use crate::store::types::{Booking, NewBooking, SaleDetails, SoldBike};
use crate::store::Store;

/// Outcome of a recorded sale: the committed snapshot plus the invoice
/// attempt. The sale stands even when the invoice could not be written.
#[derive(Debug)]
pub struct SaleOutcome {
    pub sold: SoldBike,
    pub invoice: std::result::Result<PathBuf, ShowroomError>,
}

/// Outcome of a created booking: the committed booking plus the letter
/// attempt.
#[derive(Debug)]
pub struct BookingOutcome {
    pub booking: Booking,
    pub letter: std::result::Result<PathBuf, ShowroomError>,
}

/// Drives record transitions and their documents. Holds references to its
/// collaborators; constructed per call site by the UI layer.
pub struct Lifecycle<'a> {
    store: &'a Store,
    documents: &'a DocumentService,
}

impl<'a> Lifecycle<'a> {
    pub fn new(store: &'a Store, documents: &'a DocumentService) -> Self {
        Self { store, documents }
    }

    /// Record a sale, then render its invoice.
    ///
    /// The store transition (snapshot insert, inventory removal or flag,
    /// customer upsert) commits atomically before the invoice is attempted.
    pub fn record_sale(&self, inventory_id: i64, sale: &SaleDetails) -> Result<SaleOutcome> {
        let sold = self.store.record_sale(inventory_id, sale)?;
        let invoice = self.documents.write_invoice(&sold);
        Ok(SaleOutcome { sold, invoice })
    }

    /// Create a booking, then render its letter.
    pub fn create_booking(&self, booking: &NewBooking) -> Result<BookingOutcome> {
        let booking = self.store.create_booking(booking)?;
        let letter = self.documents.write_booking_letter(&booking);
        Ok(BookingOutcome { booking, letter })
    }

    /// Issue a gate pass for a sale snapshot: mark the flag, then render.
    ///
    /// The flag persists even when rendering fails; the document error is
    /// surfaced to the caller.
    pub fn issue_gate_pass(&self, sold_id: i64) -> Result<PathBuf> {
        self.store.set_gate_pass(sold_id, true)?;
        let sold = self.store.get_sold_bike(sold_id)?.ok_or_else(|| {
            ShowroomError::NotFound(format!("Sold bike {} not found", sold_id))
        })?;
        self.documents.write_gate_pass(&sold)
    }
}
