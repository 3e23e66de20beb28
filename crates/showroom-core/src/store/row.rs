//! Raw row types for database queries.
//!
//! Rows come out of SQLite as plain strings and integers; these types
//! carry them to the typed records, rejecting anything malformed.

use chrono::{DateTime, Utc};

use crate::error::{Result, ShowroomError};
use crate::store::types::{AccountEntry, Bike, BikeStatus, Booking, SoldBike};

fn parse_status(raw: &str) -> Result<BikeStatus> {
    match raw {
        "available" => Ok(BikeStatus::Available),
        "sold" => Ok(BikeStatus::Sold),
        other => Err(ShowroomError::Storage(format!(
            "Invalid inventory status: {:?}",
            other
        ))),
    }
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ShowroomError::Storage(format!("Invalid timestamp: {}", e)))
}

/// Raw inventory row.
#[derive(Debug)]
pub struct BikeRow {
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
    pub status: String,
}

impl TryFrom<BikeRow> for Bike {
    type Error = ShowroomError;

    fn try_from(row: BikeRow) -> Result<Self> {
        let status = parse_status(&row.status)?;
        Ok(Bike {
            id: row.id,
            brand: row.brand,
            model: row.model,
            colour: row.colour,
            variant: row.variant,
            category: row.category,
            capacity: row.capacity,
            engine_no: row.engine_no,
            chassis_no: row.chassis_no,
            listed_price: row.listed_price,
            status,
        })
    }
}

/// Raw sale snapshot row.
#[derive(Debug)]
pub struct SoldBikeRow {
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
    pub gate_pass: i64,
    pub documents_delivered: i64,
    pub sold_price: f64,
    pub invoice_no: String,
    pub sold_at: String,
}

impl TryFrom<SoldBikeRow> for SoldBike {
    type Error = ShowroomError;

    fn try_from(row: SoldBikeRow) -> Result<Self> {
        let sold_at = parse_timestamp(&row.sold_at)?;
        Ok(SoldBike {
            id: row.id,
            inventory_id: row.inventory_id,
            brand: row.brand,
            model: row.model,
            colour: row.colour,
            variant: row.variant,
            category: row.category,
            capacity: row.capacity,
            engine_no: row.engine_no,
            chassis_no: row.chassis_no,
            listed_price: row.listed_price,
            customer_name: row.customer_name,
            customer_so: row.customer_so,
            customer_cnic: row.customer_cnic,
            customer_contact: row.customer_contact,
            customer_address: row.customer_address,
            gate_pass: row.gate_pass != 0,
            documents_delivered: row.documents_delivered != 0,
            sold_price: row.sold_price,
            invoice_no: row.invoice_no,
            sold_at,
        })
    }
}

/// Raw booking row.
#[derive(Debug)]
pub struct BookingRow {
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
    pub delivered: i64,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            booking_no: row.booking_no,
            booking_date: row.booking_date,
            name: row.name,
            so: row.so,
            cnic: row.cnic,
            phone: row.phone,
            brand: row.brand,
            model: row.model,
            colour: row.colour,
            specifications: row.specifications,
            total_amount: row.total_amount,
            advance: row.advance,
            balance: row.balance,
            delivery_date: row.delivery_date,
            delivered: row.delivered != 0,
        }
    }
}

/// Raw ledger line.
#[derive(Debug)]
pub struct AccountEntryRow {
    pub id: i64,
    pub entry_date: String,
    pub description: String,
    pub debit: f64,
    pub credit: f64,
}

impl TryFrom<AccountEntryRow> for AccountEntry {
    type Error = ShowroomError;

    fn try_from(row: AccountEntryRow) -> Result<Self> {
        let entry_date = parse_timestamp(&row.entry_date)?;
        Ok(AccountEntry {
            id: row.id,
            entry_date,
            description: row.description,
            debit: row.debit,
            credit: row.credit,
        })
    }
}
