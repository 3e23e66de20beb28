//! Document generation on top of the compositor.
//!
//! Each document type pairs a template page with a coordinate side-car in
//! the assets directory and writes into its own output subdirectory with a
//! deterministic filename derived from the record's identifier. The default
//! position tables below assume an A4 template; a side-car overrides them
//! per field.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::pdf::{self, CoordinateMap, FieldValues, Position};
use crate::store::types::{Booking, SoldBike};

/// The kinds of document the showroom produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Invoice,
    BookingLetter,
    GatePass,
}

impl DocumentKind {
    /// Template filename inside the assets directory.
    pub fn template_file(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice.pdf",
            DocumentKind::BookingLetter => "booking_letter.pdf",
            DocumentKind::GatePass => "gatepass.pdf",
        }
    }

    /// Coordinate side-car filename inside the assets directory.
    pub fn coords_file(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice_coords.json",
            DocumentKind::BookingLetter => "booking_coords.json",
            DocumentKind::GatePass => "gatepass_coords.json",
        }
    }

    /// Output subdirectory and filename prefix.
    pub fn output_subdir(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoices",
            DocumentKind::BookingLetter => "bookings",
            DocumentKind::GatePass => "gatepasses",
        }
    }

    fn file_prefix(&self) -> &'static str {
        match self {
            DocumentKind::Invoice => "invoice",
            DocumentKind::BookingLetter => "booking",
            DocumentKind::GatePass => "gatepass",
        }
    }

    fn default_positions(&self) -> HashMap<String, Position> {
        let table: &[(&str, f32, f32)] = match self {
            DocumentKind::Invoice => INVOICE_DEFAULTS,
            DocumentKind::BookingLetter => BOOKING_DEFAULTS,
            DocumentKind::GatePass => GATEPASS_DEFAULTS,
        };
        table
            .iter()
            .map(|(key, x, y)| (key.to_string(), Position::new(*x, *y)))
            .collect()
    }

    fn fallback_position(&self) -> Position {
        Position::new(40.0, 642.0)
    }
}

// Default positions in A4 page units, measured from the bottom-left.
const INVOICE_DEFAULTS: &[(&str, f32, f32)] = &[
    ("date", 421.0, 792.0),
    ("invoice_no", 451.0, 778.0),
    ("customer_name", 90.0, 712.0),
    ("customer_so", 470.0, 712.0),
    ("customer_cnic", 90.0, 694.0),
    ("customer_contact", 320.0, 694.0),
    ("customer_address", 104.0, 667.0),
    ("brand", 120.0, 512.0),
    ("model", 340.0, 512.0),
    ("colour", 120.0, 487.0),
    ("engine_no", 370.0, 487.0),
    ("chassis_no", 130.0, 462.0),
    ("listed_price", 120.0, 432.0),
    ("sold_price", 320.0, 432.0),
    ("gate_pass", 110.0, 404.0),
    ("documents_delivered", 440.0, 404.0),
];

const BOOKING_DEFAULTS: &[(&str, f32, f32)] = &[
    ("booking_no", 445.0, 778.0),
    ("booking_date", 445.0, 792.0),
    ("name", 90.0, 712.0),
    ("so", 470.0, 712.0),
    ("cnic", 90.0, 694.0),
    ("phone", 320.0, 694.0),
    ("brand", 120.0, 512.0),
    ("model", 340.0, 512.0),
    ("colour", 120.0, 487.0),
    ("specifications", 90.0, 462.0),
    ("total_amount", 120.0, 432.0),
    ("advance", 320.0, 432.0),
    ("balance", 470.0, 432.0),
    ("delivery_date", 90.0, 404.0),
];

const GATEPASS_DEFAULTS: &[(&str, f32, f32)] = &[
    ("date", 421.0, 792.0),
    ("invoice_no", 451.0, 778.0),
    ("customer_name", 90.0, 712.0),
    ("customer_cnic", 90.0, 694.0),
    ("customer_contact", 320.0, 694.0),
    ("brand", 120.0, 512.0),
    ("model", 340.0, 512.0),
    ("colour", 120.0, 487.0),
    ("engine_no", 370.0, 487.0),
    ("chassis_no", 130.0, 462.0),
    ("gate_pass", 110.0, 404.0),
];

/// Renders showroom documents from records.
///
/// Owns nothing but the two directory roots; constructed by the caller and
/// passed by reference wherever documents are produced.
#[derive(Debug, Clone)]
pub struct DocumentService {
    assets_dir: PathBuf,
    output_dir: PathBuf,
}

impl DocumentService {
    pub fn new(assets_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn template_path(&self, kind: DocumentKind) -> PathBuf {
        self.assets_dir.join(kind.template_file())
    }

    /// Deterministic output path for a document identifier, e.g.
    /// `invoices/invoice_INV-3-1733412345.pdf`.
    pub fn output_path(&self, kind: DocumentKind, ident: &str) -> PathBuf {
        self.output_dir
            .join(kind.output_subdir())
            .join(format!("{}_{}.pdf", kind.file_prefix(), ident))
    }

    /// Render a document of `kind` for the given field set.
    pub fn render(&self, kind: DocumentKind, fields: &FieldValues, ident: &str) -> Result<PathBuf> {
        let map = CoordinateMap::load(
            &self.assets_dir.join(kind.coords_file()),
            kind.default_positions(),
            kind.fallback_position(),
        )?;
        let out_path = self.output_path(kind, ident);
        pdf::render(&self.template_path(kind), &map, fields, &out_path)?;
        Ok(out_path)
    }

    /// Write the invoice for a sale snapshot.
    pub fn write_invoice(&self, sold: &SoldBike) -> Result<PathBuf> {
        self.render(DocumentKind::Invoice, &invoice_fields(sold), &sold.invoice_no)
    }

    /// Write the gate pass for a sale snapshot. Falls back to the row id
    /// when the snapshot carries no invoice number.
    pub fn write_gate_pass(&self, sold: &SoldBike) -> Result<PathBuf> {
        let ident = if sold.invoice_no.is_empty() {
            sold.id.to_string()
        } else {
            sold.invoice_no.clone()
        };
        self.render(DocumentKind::GatePass, &gate_pass_fields(sold), &ident)
    }

    /// Write the booking letter for a booking.
    pub fn write_booking_letter(&self, booking: &Booking) -> Result<PathBuf> {
        self.render(
            DocumentKind::BookingLetter,
            &booking_fields(booking),
            &booking.booking_no,
        )
    }
}

fn flag(value: bool) -> String {
    if value { "yes" } else { "no" }.to_string()
}

fn price(value: f64) -> String {
    // raw decimal; the compositor applies currency formatting
    format!("{}", value)
}

fn invoice_fields(sold: &SoldBike) -> FieldValues {
    let mut fields = FieldValues::new();
    fields.insert(
        "date".to_string(),
        sold.sold_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    fields.insert("invoice_no".to_string(), sold.invoice_no.clone());
    fields.insert("customer_name".to_string(), sold.customer_name.clone());
    fields.insert("customer_so".to_string(), sold.customer_so.clone());
    fields.insert("customer_cnic".to_string(), sold.customer_cnic.clone());
    fields.insert(
        "customer_contact".to_string(),
        sold.customer_contact.clone(),
    );
    fields.insert(
        "customer_address".to_string(),
        sold.customer_address.clone(),
    );
    fields.insert("brand".to_string(), sold.brand.clone());
    fields.insert("model".to_string(), sold.model.clone());
    fields.insert("colour".to_string(), sold.colour.clone());
    fields.insert("engine_no".to_string(), sold.engine_no.clone());
    fields.insert("chassis_no".to_string(), sold.chassis_no.clone());
    fields.insert("listed_price".to_string(), price(sold.listed_price));
    fields.insert("sold_price".to_string(), price(sold.sold_price));
    fields.insert("gate_pass".to_string(), flag(sold.gate_pass));
    fields.insert(
        "documents_delivered".to_string(),
        flag(sold.documents_delivered),
    );
    fields
}

fn gate_pass_fields(sold: &SoldBike) -> FieldValues {
    let mut fields = FieldValues::new();
    fields.insert(
        "date".to_string(),
        sold.sold_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    );
    fields.insert("invoice_no".to_string(), sold.invoice_no.clone());
    fields.insert("customer_name".to_string(), sold.customer_name.clone());
    fields.insert("customer_cnic".to_string(), sold.customer_cnic.clone());
    fields.insert(
        "customer_contact".to_string(),
        sold.customer_contact.clone(),
    );
    fields.insert("brand".to_string(), sold.brand.clone());
    fields.insert("model".to_string(), sold.model.clone());
    fields.insert("colour".to_string(), sold.colour.clone());
    fields.insert("engine_no".to_string(), sold.engine_no.clone());
    fields.insert("chassis_no".to_string(), sold.chassis_no.clone());
    // the pass itself certifies hand-off, so its box is always ticked
    fields.insert("gate_pass".to_string(), flag(true));
    fields
}

fn booking_fields(booking: &Booking) -> FieldValues {
    let mut fields = FieldValues::new();
    fields.insert("booking_no".to_string(), booking.booking_no.clone());
    fields.insert("booking_date".to_string(), booking.booking_date.clone());
    fields.insert("name".to_string(), booking.name.clone());
    fields.insert("so".to_string(), booking.so.clone());
    fields.insert("cnic".to_string(), booking.cnic.clone());
    fields.insert("phone".to_string(), booking.phone.clone());
    fields.insert("brand".to_string(), booking.brand.clone());
    fields.insert("model".to_string(), booking.model.clone());
    fields.insert("colour".to_string(), booking.colour.clone());
    fields.insert(
        "specifications".to_string(),
        booking.specifications.clone(),
    );
    fields.insert("total_amount".to_string(), price(booking.total_amount));
    fields.insert("advance".to_string(), price(booking.advance));
    fields.insert("balance".to_string(), price(booking.balance));
    fields.insert("delivery_date".to_string(), booking.delivery_date.clone());
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::path::Path;

    fn sample_sold() -> SoldBike {
        SoldBike {
            id: 7,
            inventory_id: 3,
            brand: "Suzuki".to_string(),
            model: "GS150".to_string(),
            colour: "Black".to_string(),
            variant: String::new(),
            category: "Street".to_string(),
            capacity: "150cc".to_string(),
            engine_no: "E-1001".to_string(),
            chassis_no: "C-1001".to_string(),
            listed_price: 385000.0,
            customer_name: "Ali Khan".to_string(),
            customer_so: "Ahmed Khan".to_string(),
            customer_cnic: "42201-0000000-1".to_string(),
            customer_contact: "0300-1111111".to_string(),
            customer_address: "House 12\nKarachi".to_string(),
            gate_pass: false,
            documents_delivered: false,
            sold_price: 350000.0,
            invoice_no: "INV-3-1733412345".to_string(),
            sold_at: Utc::now(),
        }
    }

    #[test]
    fn test_output_path_is_deterministic() {
        let service = DocumentService::new("/assets", "/out");
        assert_eq!(
            service.output_path(DocumentKind::Invoice, "INV-3-1733412345"),
            Path::new("/out/invoices/invoice_INV-3-1733412345.pdf")
        );
        assert_eq!(
            service.output_path(DocumentKind::BookingLetter, "11000"),
            Path::new("/out/bookings/booking_11000.pdf")
        );
        assert_eq!(
            service.output_path(DocumentKind::GatePass, "INV-3-1733412345"),
            Path::new("/out/gatepasses/gatepass_INV-3-1733412345.pdf")
        );
    }

    #[test]
    fn test_invoice_fields_cover_buyer_and_bike() {
        let fields = invoice_fields(&sample_sold());
        assert_eq!(fields.get("customer_name").unwrap(), "Ali Khan");
        assert_eq!(fields.get("engine_no").unwrap(), "E-1001");
        assert_eq!(fields.get("sold_price").unwrap(), "350000");
        assert_eq!(fields.get("gate_pass").unwrap(), "no");
    }

    #[test]
    fn test_gate_pass_box_always_ticked() {
        let fields = gate_pass_fields(&sample_sold());
        assert_eq!(fields.get("gate_pass").unwrap(), "yes");
    }

    #[test]
    fn test_every_default_key_resolves() {
        for kind in [
            DocumentKind::Invoice,
            DocumentKind::BookingLetter,
            DocumentKind::GatePass,
        ] {
            let map = CoordinateMap::new(kind.default_positions(), kind.fallback_position());
            for &(key, _, _) in INVOICE_DEFAULTS {
                // unmapped keys must still land somewhere on the page
                let pos = map.resolve(key);
                assert!(pos.x > 0.0, "{} resolved off-page for {:?}", key, kind);
            }
        }
    }
}
