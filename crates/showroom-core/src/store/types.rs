//! Core data types for the store layer.
//!
//! Every row that crosses the storage boundary is an explicit typed record;
//! loosely-shaped maps are rejected at the boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of an inventory item. The transition is one-way:
/// `Available -> Sold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BikeStatus {
    Available,
    Sold,
}

impl BikeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BikeStatus::Available => "available",
            BikeStatus::Sold => "sold",
        }
    }
}

impl std::fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inventory row.
#[derive(Debug, Clone, Serialize)]
pub struct Bike {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub colour: String,
    pub variant: String,
    pub category: String,
    pub capacity: String,
    pub engine_no: String,
    pub chassis_no: String,
    pub listed_price: f64,
    pub status: BikeStatus,
}

/// Builder for new inventory rows; also accepted by `update_bike`.
#[derive(Debug, Clone)]
pub struct NewBike {
    pub brand: String,
    pub model: String,
    pub colour: String,
    pub variant: String,
    pub category: String,
    pub capacity: String,
    pub engine_no: String,
    pub chassis_no: String,
    pub listed_price: f64,
    pub status: BikeStatus,
}

impl NewBike {
    pub fn new(
        brand: impl Into<String>,
        model: impl Into<String>,
        engine_no: impl Into<String>,
        chassis_no: impl Into<String>,
        listed_price: f64,
    ) -> Self {
        Self {
            brand: brand.into(),
            model: model.into(),
            colour: String::new(),
            variant: String::new(),
            category: String::new(),
            capacity: String::new(),
            engine_no: engine_no.into(),
            chassis_no: chassis_no.into(),
            listed_price,
            status: BikeStatus::Available,
        }
    }

    pub fn with_colour(mut self, colour: impl Into<String>) -> Self {
        self.colour = colour.into();
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = variant.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_capacity(mut self, capacity: impl Into<String>) -> Self {
        self.capacity = capacity.into();
        self
    }

    pub fn with_status(mut self, status: BikeStatus) -> Self {
        self.status = status;
        self
    }
}

/// Outcome of an inventory removal attempt.
///
/// Deletion blocked by dependent rows falls back to flagging the row as
/// sold instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    FlaggedSold,
}

/// A denormalized sale snapshot. Append-only; created exactly once per sale.
#[derive(Debug, Clone, Serialize)]
pub struct SoldBike {
    pub id: i64,
    pub inventory_id: i64,
    pub brand: String,
    pub model: String,
    pub colour: String,
    pub variant: String,
    pub category: String,
    pub capacity: String,
    pub engine_no: String,
    pub chassis_no: String,
    pub listed_price: f64,
    pub customer_name: String,
    pub customer_so: String,
    pub customer_cnic: String,
    pub customer_contact: String,
    pub customer_address: String,
    pub gate_pass: bool,
    pub documents_delivered: bool,
    pub sold_price: f64,
    pub invoice_no: String,
    pub sold_at: DateTime<Utc>,
}

/// Buyer and transaction details for recording a sale.
///
/// Name and CNIC are required; everything else is optional detail the
/// operator may not have at hand.
#[derive(Debug, Clone, Default)]
pub struct SaleDetails {
    pub customer_name: String,
    pub customer_so: String,
    pub customer_cnic: String,
    pub customer_contact: String,
    pub customer_address: String,
    pub gate_pass: bool,
    pub documents_delivered: bool,
    pub sold_price: f64,
}

impl SaleDetails {
    pub fn new(
        customer_name: impl Into<String>,
        customer_cnic: impl Into<String>,
        sold_price: f64,
    ) -> Self {
        Self {
            customer_name: customer_name.into(),
            customer_cnic: customer_cnic.into(),
            sold_price,
            ..Self::default()
        }
    }

    pub fn with_so(mut self, so: impl Into<String>) -> Self {
        self.customer_so = so.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.customer_contact = contact.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.customer_address = address.into();
        self
    }

    pub fn with_gate_pass(mut self, gate_pass: bool) -> Self {
        self.gate_pass = gate_pass;
        self
    }

    pub fn with_documents_delivered(mut self, delivered: bool) -> Self {
        self.documents_delivered = delivered;
        self
    }
}

/// A customer row, keyed by CNIC.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: i64,
    pub name: String,
    pub so: String,
    pub cnic: String,
    pub phone: String,
    pub address: String,
}

/// Input for customer upsert and update.
#[derive(Debug, Clone, Default)]
pub struct CustomerDetails {
    pub name: String,
    pub so: String,
    pub cnic: String,
    pub phone: String,
    pub address: String,
}

impl CustomerDetails {
    pub fn new(name: impl Into<String>, cnic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cnic: cnic.into(),
            ..Self::default()
        }
    }

    pub fn with_so(mut self, so: impl Into<String>) -> Self {
        self.so = so.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }
}

/// A booking row. `booking_no` is assigned at creation and never changes.
#[derive(Debug, Clone, Serialize)]
pub struct Booking {
    pub id: i64,
    pub booking_no: String,
    pub booking_date: String,
    pub name: String,
    pub so: String,
    pub cnic: String,
    pub phone: String,
    pub brand: String,
    pub model: String,
    pub colour: String,
    pub specifications: String,
    pub total_amount: f64,
    pub advance: f64,
    pub balance: f64,
    pub delivery_date: String,
    pub delivered: bool,
}

/// Builder for new bookings; also accepted by `update_booking`.
///
/// The bike description is free text; a booking is not tied to a specific
/// inventory row. An empty `booking_date` defaults to today at creation.
#[derive(Debug, Clone, Default)]
pub struct NewBooking {
    pub booking_date: String,
    pub name: String,
    pub so: String,
    pub cnic: String,
    pub phone: String,
    pub brand: String,
    pub model: String,
    pub colour: String,
    pub specifications: String,
    pub total_amount: f64,
    pub advance: f64,
    pub balance: f64,
    pub delivery_date: String,
    pub delivered: bool,
}

impl NewBooking {
    pub fn new(name: impl Into<String>, cnic: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cnic: cnic.into(),
            ..Self::default()
        }
    }

    pub fn with_booking_date(mut self, date: impl Into<String>) -> Self {
        self.booking_date = date.into();
        self
    }

    pub fn with_so(mut self, so: impl Into<String>) -> Self {
        self.so = so.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_bike(
        mut self,
        brand: impl Into<String>,
        model: impl Into<String>,
        colour: impl Into<String>,
    ) -> Self {
        self.brand = brand.into();
        self.model = model.into();
        self.colour = colour.into();
        self
    }

    pub fn with_specifications(mut self, specs: impl Into<String>) -> Self {
        self.specifications = specs.into();
        self
    }

    pub fn with_amounts(mut self, total: f64, advance: f64, balance: f64) -> Self {
        self.total_amount = total;
        self.advance = advance;
        self.balance = balance;
        self
    }

    pub fn with_delivery_date(mut self, date: impl Into<String>) -> Self {
        self.delivery_date = date.into();
        self
    }

    pub fn with_delivered(mut self, delivered: bool) -> Self {
        self.delivered = delivered;
        self
    }
}

/// An append-only ledger line. No running balance is computed.
#[derive(Debug, Clone, Serialize)]
pub struct AccountEntry {
    pub id: i64,
    pub entry_date: DateTime<Utc>,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
}

/// Builder for new ledger lines.
#[derive(Debug, Clone, Default)]
pub struct NewAccountEntry {
    pub description: String,
    pub debit: f64,
    pub credit: f64,
}

impl NewAccountEntry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_debit(mut self, debit: f64) -> Self {
        self.debit = debit;
        self
    }

    pub fn with_credit(mut self, credit: f64) -> Self {
        self.credit = credit;
        self
    }
}

/// An operator account. Used only to gate entry; there is no role model.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
}

/// Filter for inventory listings.
///
/// Substring matches on a fixed set of fields; the buyer-CNIC filter joins
/// through the sale snapshots. Empty filter lists everything newest-first.
#[derive(Debug, Clone, Default)]
pub struct BikeFilter {
    pub category: Option<String>,
    pub chassis_no: Option<String>,
    pub engine_no: Option<String>,
    pub customer_cnic: Option<String>,
}

impl BikeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn chassis_no(mut self, chassis_no: impl Into<String>) -> Self {
        self.chassis_no = Some(chassis_no.into());
        self
    }

    pub fn engine_no(mut self, engine_no: impl Into<String>) -> Self {
        self.engine_no = Some(engine_no.into());
        self
    }

    pub fn customer_cnic(mut self, cnic: impl Into<String>) -> Self {
        self.customer_cnic = Some(cnic.into());
        self
    }
}

/// Filter for sold-bike listings.
#[derive(Debug, Clone, Default)]
pub struct SoldBikeFilter {
    pub cnic: Option<String>,
    pub engine_no: Option<String>,
    pub chassis_no: Option<String>,
    pub invoice_no: Option<String>,
}

impl SoldBikeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cnic(mut self, cnic: impl Into<String>) -> Self {
        self.cnic = Some(cnic.into());
        self
    }

    pub fn engine_no(mut self, engine_no: impl Into<String>) -> Self {
        self.engine_no = Some(engine_no.into());
        self
    }

    pub fn chassis_no(mut self, chassis_no: impl Into<String>) -> Self {
        self.chassis_no = Some(chassis_no.into());
        self
    }

    pub fn invoice_no(mut self, invoice_no: impl Into<String>) -> Self {
        self.invoice_no = Some(invoice_no.into());
        self
    }
}

/// Filter for booking listings.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub booking_no: Option<String>,
    pub cnic: Option<String>,
    pub name: Option<String>,
}

impl BookingFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn booking_no(mut self, booking_no: impl Into<String>) -> Self {
        self.booking_no = Some(booking_no.into());
        self
    }

    pub fn cnic(mut self, cnic: impl Into<String>) -> Self {
        self.cnic = Some(cnic.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Filter for customer listings.
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub cnic: Option<String>,
    pub name: Option<String>,
}

impl CustomerFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cnic(mut self, cnic: impl Into<String>) -> Self {
        self.cnic = Some(cnic.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}
