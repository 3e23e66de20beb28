//! SQLite-backed store for showroom records.
//!
//! One `Store` owns the single database connection and is passed by
//! reference to every collaborator; there is no ambient global handle.
//! Multi-step transitions (recording a sale, creating a booking) run inside
//! one transaction so the persisted state is always a well-defined entity
//! state. Duplicate-key and referential conditions are detected from SQLite
//! extended result codes.

mod row;
pub mod types;

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, ShowroomError};

use row::{AccountEntryRow, BikeRow, BookingRow, SoldBikeRow};
pub use types::{
    AccountEntry, Bike, BikeFilter, BikeStatus, Booking, BookingFilter, Customer,
    CustomerDetails, CustomerFilter, DeleteOutcome, NewAccountEntry, NewBike, NewBooking,
    SaleDetails, SoldBike, SoldBikeFilter, User,
};

/// Sequence base used when no booking exists yet or the last number is
/// unparseable; the first allocation becomes 11000.
const BOOKING_SEQ_BASE: i64 = 999;

/// Booking numbers below this are lifted into the 10000 range.
const BOOKING_NO_FLOOR: i64 = 10000;

const BIKE_COLUMNS: &str =
    "id, brand, model, colour, variant, category, capacity, engine_no, chassis_no, \
     listed_price, status";

const SOLD_COLUMNS: &str =
    "id, inventory_id, brand, model, colour, variant, category, capacity, engine_no, \
     chassis_no, listed_price, customer_name, customer_so, customer_cnic, customer_contact, \
     customer_address, gate_pass, documents_delivered, sold_price, invoice_no, sold_at";

const BOOKING_COLUMNS: &str =
    "id, booking_no, booking_date, name, so, cnic, phone, brand, model, colour, \
     specifications, total_amount, advance, balance, delivery_date, delivered";

/// SQLite-backed store. All writes are serialized through the one
/// connection it owns.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the showroom database at `path`.
    ///
    /// The schema is created on first open; subsequent opens are no-ops.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Open an in-memory store. Used by tests and dry runs.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                full_name TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS inventory (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                brand TEXT NOT NULL DEFAULT '',
                model TEXT NOT NULL DEFAULT '',
                colour TEXT NOT NULL DEFAULT '',
                variant TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                capacity TEXT NOT NULL DEFAULT '',
                engine_no TEXT UNIQUE NOT NULL,
                chassis_no TEXT UNIQUE NOT NULL,
                listed_price REAL NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'available'
            );

            CREATE TABLE IF NOT EXISTS sold_bikes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                inventory_id INTEGER NOT NULL,
                brand TEXT NOT NULL DEFAULT '',
                model TEXT NOT NULL DEFAULT '',
                colour TEXT NOT NULL DEFAULT '',
                variant TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT '',
                capacity TEXT NOT NULL DEFAULT '',
                engine_no TEXT NOT NULL DEFAULT '',
                chassis_no TEXT NOT NULL DEFAULT '',
                listed_price REAL NOT NULL DEFAULT 0,
                customer_name TEXT NOT NULL DEFAULT '',
                customer_so TEXT NOT NULL DEFAULT '',
                customer_cnic TEXT NOT NULL DEFAULT '',
                customer_contact TEXT NOT NULL DEFAULT '',
                customer_address TEXT NOT NULL DEFAULT '',
                gate_pass INTEGER NOT NULL DEFAULT 0,
                documents_delivered INTEGER NOT NULL DEFAULT 0,
                sold_price REAL NOT NULL DEFAULT 0,
                invoice_no TEXT NOT NULL DEFAULT '',
                sold_at TEXT NOT NULL,

                FOREIGN KEY (inventory_id) REFERENCES inventory(id)
            );

            CREATE TABLE IF NOT EXISTS customers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL DEFAULT '',
                so TEXT NOT NULL DEFAULT '',
                cnic TEXT UNIQUE NOT NULL,
                phone TEXT NOT NULL DEFAULT '',
                address TEXT NOT NULL DEFAULT ''
            );

            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                booking_no TEXT UNIQUE NOT NULL,
                booking_date TEXT NOT NULL DEFAULT '',
                name TEXT NOT NULL DEFAULT '',
                so TEXT NOT NULL DEFAULT '',
                cnic TEXT NOT NULL DEFAULT '',
                phone TEXT NOT NULL DEFAULT '',
                brand TEXT NOT NULL DEFAULT '',
                model TEXT NOT NULL DEFAULT '',
                colour TEXT NOT NULL DEFAULT '',
                specifications TEXT NOT NULL DEFAULT '',
                total_amount REAL NOT NULL DEFAULT 0,
                advance REAL NOT NULL DEFAULT 0,
                balance REAL NOT NULL DEFAULT 0,
                delivery_date TEXT NOT NULL DEFAULT '',
                delivered INTEGER NOT NULL DEFAULT 0
            );

            CREATE TABLE IF NOT EXISTS accounts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entry_date TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                debit REAL NOT NULL DEFAULT 0,
                credit REAL NOT NULL DEFAULT 0
            );
            "#,
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Lock the database connection, returning an error if the mutex is poisoned.
    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| ShowroomError::Storage("SQLite connection poisoned".to_string()))
    }

    // --- Users ---

    /// Create an operator account. `password_hash` is a PHC string produced
    /// by [`crate::auth::hash_password`].
    pub fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<i64> {
        if username.trim().is_empty() {
            return Err(ShowroomError::Validation(
                "Username is required".to_string(),
            ));
        }
        let conn = self.lock_conn()?;
        conn.execute(
            "INSERT INTO users (username, password_hash, full_name) VALUES (?, ?, ?)",
            params![username, password_hash, full_name],
        )
        .map_err(map_constraint_err)?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get_user(&self, username: &str) -> Result<Option<User>> {
        let conn = self.lock_conn()?;
        let user = conn
            .query_row(
                "SELECT id, username, password_hash, full_name FROM users WHERE username = ?",
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        password_hash: row.get(2)?,
                        full_name: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(user)
    }

    // --- Inventory ---

    /// Insert a new inventory row.
    ///
    /// # Errors
    ///
    /// Returns `ShowroomError::DuplicateKey` when the engine or chassis
    /// number collides with an existing row; nothing is written in that case.
    pub fn add_bike(&self, bike: &NewBike) -> Result<Bike> {
        let conn = self.lock_conn()?;
        conn.execute(
            r#"
            INSERT INTO inventory
                (brand, model, colour, variant, category, capacity, engine_no, chassis_no,
                 listed_price, status)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                bike.brand,
                bike.model,
                bike.colour,
                bike.variant,
                bike.category,
                bike.capacity,
                bike.engine_no,
                bike.chassis_no,
                bike.listed_price,
                bike.status.as_str(),
            ],
        )
        .map_err(map_constraint_err)?;
        let id = conn.last_insert_rowid();
        Ok(Bike {
            id,
            brand: bike.brand.clone(),
            model: bike.model.clone(),
            colour: bike.colour.clone(),
            variant: bike.variant.clone(),
            category: bike.category.clone(),
            capacity: bike.capacity.clone(),
            engine_no: bike.engine_no.clone(),
            chassis_no: bike.chassis_no.clone(),
            listed_price: bike.listed_price,
            status: bike.status,
        })
    }

    pub fn get_bike(&self, id: i64) -> Result<Option<Bike>> {
        let conn = self.lock_conn()?;
        fetch_bike(&conn, id)
    }

    /// List inventory matching the filter, newest-first.
    pub fn list_bikes(&self, filter: &BikeFilter) -> Result<Vec<Bike>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref category) = filter.category {
            conditions.push("i.category = ?".to_string());
            params_vec.push(Box::new(category.clone()));
        }
        if let Some(ref chassis_no) = filter.chassis_no {
            conditions.push("i.chassis_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", chassis_no)));
        }
        if let Some(ref engine_no) = filter.engine_no {
            conditions.push("i.engine_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", engine_no)));
        }

        let mut query = if filter.customer_cnic.is_some() {
            format!(
                "SELECT DISTINCT {} FROM inventory i \
                 LEFT JOIN sold_bikes s ON s.inventory_id = i.id",
                prefix_columns(BIKE_COLUMNS, "i")
            )
        } else {
            format!("SELECT {} FROM inventory i", prefix_columns(BIKE_COLUMNS, "i"))
        };
        if let Some(ref cnic) = filter.customer_cnic {
            conditions.push("s.customer_cnic LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", cnic)));
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY i.id DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), bike_row)?;

        let mut bikes = Vec::new();
        for row in rows {
            bikes.push(row?.try_into()?);
        }
        Ok(bikes)
    }

    /// Replace every editable field of an inventory row. The row id and its
    /// sale history are untouched.
    pub fn update_bike(&self, id: i64, bike: &NewBike) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn
            .execute(
                r#"
                UPDATE inventory SET
                    brand = ?, model = ?, colour = ?, variant = ?, category = ?, capacity = ?,
                    engine_no = ?, chassis_no = ?, listed_price = ?, status = ?
                WHERE id = ?
                "#,
                params![
                    bike.brand,
                    bike.model,
                    bike.colour,
                    bike.variant,
                    bike.category,
                    bike.capacity,
                    bike.engine_no,
                    bike.chassis_no,
                    bike.listed_price,
                    bike.status.as_str(),
                    id,
                ],
            )
            .map_err(map_constraint_err)?;
        if changed == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Inventory item {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Remove an inventory row.
    ///
    /// When deletion is blocked because other records still reference the
    /// row, its status is flagged `sold` instead and the operation succeeds.
    /// Any other failure propagates.
    pub fn delete_bike(&self, id: i64) -> Result<DeleteOutcome> {
        let conn = self.lock_conn()?;
        match conn.execute("DELETE FROM inventory WHERE id = ?", [id]) {
            Ok(0) => Err(ShowroomError::NotFound(format!(
                "Inventory item {} not found",
                id
            ))),
            Ok(_) => Ok(DeleteOutcome::Deleted),
            Err(err) if is_referential_violation(&err) => {
                let changed =
                    conn.execute("UPDATE inventory SET status = 'sold' WHERE id = ?", [id])?;
                if changed == 0 {
                    return Err(ShowroomError::NotFound(format!(
                        "Inventory item {} not found",
                        id
                    )));
                }
                Ok(DeleteOutcome::FlaggedSold)
            }
            Err(err) => Err(err.into()),
        }
    }

    // --- Sale transition ---

    /// Record a sale: snapshot the inventory row into `sold_bikes`, remove
    /// (or flag) the inventory row, and upsert the customer - all in one
    /// transaction.
    ///
    /// The snapshot insert must succeed before any destructive change to the
    /// inventory row. If removal is rejected because dependent rows still
    /// reference it, the row is flagged `sold` in place; only an
    /// unrecoverable storage error fails the operation.
    ///
    /// Document generation is a separate side effect; see
    /// [`crate::lifecycle::Lifecycle::record_sale`].
    ///
    /// # Errors
    ///
    /// Returns `ShowroomError::Validation` (before any mutation) when the
    /// buyer name or CNIC is empty, and `ShowroomError::NotFound` when the
    /// inventory row does not exist.
    pub fn record_sale(&self, inventory_id: i64, sale: &SaleDetails) -> Result<SoldBike> {
        if sale.customer_name.trim().is_empty() || sale.customer_cnic.trim().is_empty() {
            return Err(ShowroomError::Validation(
                "Customer name and CNIC are required to record a sale".to_string(),
            ));
        }

        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let bike = fetch_bike(&tx, inventory_id)?.ok_or_else(|| {
            ShowroomError::NotFound(format!("Inventory item {} not found", inventory_id))
        })?;

        let sold_at = Utc::now();
        let invoice_no = format!("INV-{}-{}", inventory_id, sold_at.timestamp());

        tx.execute(
            r#"
            INSERT INTO sold_bikes
                (inventory_id, brand, model, colour, variant, category, capacity,
                 engine_no, chassis_no, listed_price, customer_name, customer_so,
                 customer_cnic, customer_contact, customer_address, gate_pass,
                 documents_delivered, sold_price, invoice_no, sold_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                inventory_id,
                bike.brand,
                bike.model,
                bike.colour,
                bike.variant,
                bike.category,
                bike.capacity,
                bike.engine_no,
                bike.chassis_no,
                bike.listed_price,
                sale.customer_name,
                sale.customer_so,
                sale.customer_cnic,
                sale.customer_contact,
                sale.customer_address,
                sale.gate_pass as i64,
                sale.documents_delivered as i64,
                sale.sold_price,
                invoice_no,
                sold_at.to_rfc3339(),
            ],
        )?;
        let sold_id = tx.last_insert_rowid();

        // The snapshot row references the inventory row, so the delete is
        // expected to hit the foreign key; only that condition falls back.
        match tx.execute("DELETE FROM inventory WHERE id = ?", [inventory_id]) {
            Ok(_) => {}
            Err(err) if is_referential_violation(&err) => {
                tx.execute(
                    "UPDATE inventory SET status = 'sold' WHERE id = ?",
                    [inventory_id],
                )?;
            }
            Err(err) => return Err(err.into()),
        }

        let customer = CustomerDetails {
            name: sale.customer_name.clone(),
            so: sale.customer_so.clone(),
            cnic: sale.customer_cnic.clone(),
            phone: sale.customer_contact.clone(),
            address: sale.customer_address.clone(),
        };
        upsert_customer_on(&tx, &customer)?;

        tx.commit()?;

        Ok(SoldBike {
            id: sold_id,
            inventory_id,
            brand: bike.brand,
            model: bike.model,
            colour: bike.colour,
            variant: bike.variant,
            category: bike.category,
            capacity: bike.capacity,
            engine_no: bike.engine_no,
            chassis_no: bike.chassis_no,
            listed_price: bike.listed_price,
            customer_name: sale.customer_name.clone(),
            customer_so: sale.customer_so.clone(),
            customer_cnic: sale.customer_cnic.clone(),
            customer_contact: sale.customer_contact.clone(),
            customer_address: sale.customer_address.clone(),
            gate_pass: sale.gate_pass,
            documents_delivered: sale.documents_delivered,
            sold_price: sale.sold_price,
            invoice_no,
            sold_at,
        })
    }

    // --- Sold bikes ---

    pub fn get_sold_bike(&self, id: i64) -> Result<Option<SoldBike>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM sold_bikes WHERE id = ?", SOLD_COLUMNS),
                [id],
                sold_row,
            )
            .optional()?;
        row.map(SoldBike::try_from).transpose()
    }

    /// List sale snapshots matching the filter, newest-first.
    pub fn list_sold_bikes(&self, filter: &SoldBikeFilter) -> Result<Vec<SoldBike>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref cnic) = filter.cnic {
            conditions.push("customer_cnic LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", cnic)));
        }
        if let Some(ref engine_no) = filter.engine_no {
            conditions.push("engine_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", engine_no)));
        }
        if let Some(ref chassis_no) = filter.chassis_no {
            conditions.push("chassis_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", chassis_no)));
        }
        if let Some(ref invoice_no) = filter.invoice_no {
            conditions.push("invoice_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", invoice_no)));
        }

        let mut query = format!("SELECT {} FROM sold_bikes", SOLD_COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY id DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), sold_row)?;

        let mut sold = Vec::new();
        for row in rows {
            sold.push(row?.try_into()?);
        }
        Ok(sold)
    }

    /// Set the gate-pass flag on a sale snapshot.
    pub fn set_gate_pass(&self, id: i64, issued: bool) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            "UPDATE sold_bikes SET gate_pass = ? WHERE id = ?",
            params![issued as i64, id],
        )?;
        if changed == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Sold bike {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Flip the documents-delivered flag, returning the new value.
    pub fn toggle_documents_delivered(&self, id: i64) -> Result<bool> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let current: Option<i64> = tx
            .query_row(
                "SELECT documents_delivered FROM sold_bikes WHERE id = ?",
                [id],
                |row| row.get(0),
            )
            .optional()?;
        let current = current
            .ok_or_else(|| ShowroomError::NotFound(format!("Sold bike {} not found", id)))?;
        let next = i64::from(current == 0);
        tx.execute(
            "UPDATE sold_bikes SET documents_delivered = ? WHERE id = ?",
            params![next, id],
        )?;
        tx.commit()?;
        Ok(next != 0)
    }

    /// Delete a sale snapshot. Unconditional.
    pub fn delete_sold_bike(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute("DELETE FROM sold_bikes WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Sold bike {} not found",
                id
            )));
        }
        Ok(())
    }

    // --- Customers ---

    /// Upsert a customer by CNIC.
    ///
    /// First sight creates the row; later sights fill only previously-empty
    /// fields. A populated field is never overwritten, so stale or empty
    /// input cannot erase what an earlier operator recorded.
    pub fn upsert_customer(&self, details: &CustomerDetails) -> Result<i64> {
        if details.cnic.trim().is_empty() {
            return Err(ShowroomError::Validation("CNIC is required".to_string()));
        }
        let conn = self.lock_conn()?;
        upsert_customer_on(&conn, details)
    }

    pub fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
        let conn = self.lock_conn()?;
        let customer = conn
            .query_row(
                "SELECT id, name, so, cnic, phone, address FROM customers WHERE id = ?",
                [id],
                customer_row,
            )
            .optional()?;
        Ok(customer)
    }

    pub fn get_customer_by_cnic(&self, cnic: &str) -> Result<Option<Customer>> {
        let conn = self.lock_conn()?;
        let customer = conn
            .query_row(
                "SELECT id, name, so, cnic, phone, address FROM customers WHERE cnic = ?",
                [cnic],
                customer_row,
            )
            .optional()?;
        Ok(customer)
    }

    /// List customers matching the filter, newest-first.
    pub fn list_customers(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref cnic) = filter.cnic {
            conditions.push("cnic LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", cnic)));
        }
        if let Some(ref name) = filter.name {
            conditions.push("name LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", name)));
        }

        let mut query =
            String::from("SELECT id, name, so, cnic, phone, address FROM customers");
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY id DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), customer_row)?;

        let mut customers = Vec::new();
        for row in rows {
            customers.push(row?);
        }
        Ok(customers)
    }

    /// Replace every field of a customer row. Unlike upsert, this is the
    /// explicit edit path and does overwrite.
    pub fn update_customer(&self, id: i64, details: &CustomerDetails) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn
            .execute(
                "UPDATE customers SET name = ?, so = ?, cnic = ?, phone = ?, address = ? \
                 WHERE id = ?",
                params![
                    details.name,
                    details.so,
                    details.cnic,
                    details.phone,
                    details.address,
                    id
                ],
            )
            .map_err(map_constraint_err)?;
        if changed == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Customer {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Delete a customer. Unconditional.
    pub fn delete_customer(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute("DELETE FROM customers WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Customer {} not found",
                id
            )));
        }
        Ok(())
    }

    // --- Bookings ---

    /// Derive the next booking number from the most recently created
    /// booking: strip any non-numeric prefix, parse the remainder (base 999
    /// when there is nothing to parse), increment, and lift results below
    /// 10000 into the 10000 range.
    ///
    /// Monotonic and collision-free under a single writer. Two concurrent
    /// allocators could read the same last row and mint the same number;
    /// that race is documented, not defended. `create_booking` allocates
    /// inside its insert transaction, which serializes in-process callers.
    pub fn next_booking_number(&self) -> Result<String> {
        let conn = self.lock_conn()?;
        next_booking_number_on(&conn)
    }

    /// Create a booking, allocating its number in the same transaction.
    /// An empty booking date defaults to today.
    pub fn create_booking(&self, booking: &NewBooking) -> Result<Booking> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        let booking_no = next_booking_number_on(&tx)?;
        let booking_date = if booking.booking_date.trim().is_empty() {
            Utc::now().format("%Y-%m-%d").to_string()
        } else {
            booking.booking_date.clone()
        };

        tx.execute(
            r#"
            INSERT INTO bookings
                (booking_no, booking_date, name, so, cnic, phone, brand, model, colour,
                 specifications, total_amount, advance, balance, delivery_date, delivered)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                booking_no,
                booking_date,
                booking.name,
                booking.so,
                booking.cnic,
                booking.phone,
                booking.brand,
                booking.model,
                booking.colour,
                booking.specifications,
                booking.total_amount,
                booking.advance,
                booking.balance,
                booking.delivery_date,
                booking.delivered as i64,
            ],
        )
        .map_err(map_constraint_err)?;
        let id = tx.last_insert_rowid();

        tx.commit()?;

        Ok(Booking {
            id,
            booking_no,
            booking_date,
            name: booking.name.clone(),
            so: booking.so.clone(),
            cnic: booking.cnic.clone(),
            phone: booking.phone.clone(),
            brand: booking.brand.clone(),
            model: booking.model.clone(),
            colour: booking.colour.clone(),
            specifications: booking.specifications.clone(),
            total_amount: booking.total_amount,
            advance: booking.advance,
            balance: booking.balance,
            delivery_date: booking.delivery_date.clone(),
            delivered: booking.delivered,
        })
    }

    pub fn get_booking(&self, id: i64) -> Result<Option<Booking>> {
        let conn = self.lock_conn()?;
        let row = conn
            .query_row(
                &format!("SELECT {} FROM bookings WHERE id = ?", BOOKING_COLUMNS),
                [id],
                booking_row,
            )
            .optional()?;
        Ok(row.map(Booking::from))
    }

    /// List bookings matching the filter, newest-first.
    pub fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>> {
        let conn = self.lock_conn()?;

        let mut conditions: Vec<String> = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref booking_no) = filter.booking_no {
            conditions.push("booking_no LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", booking_no)));
        }
        if let Some(ref cnic) = filter.cnic {
            conditions.push("cnic LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", cnic)));
        }
        if let Some(ref name) = filter.name {
            conditions.push("name LIKE ?".to_string());
            params_vec.push(Box::new(format!("%{}%", name)));
        }

        let mut query = format!("SELECT {} FROM bookings", BOOKING_COLUMNS);
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY id DESC");

        let mut stmt = conn.prepare(&query)?;
        let rows = stmt.query_map(rusqlite::params_from_iter(params_vec.iter()), booking_row)?;

        let mut bookings = Vec::new();
        for row in rows {
            bookings.push(Booking::from(row?));
        }
        Ok(bookings)
    }

    /// Replace every editable field of a booking. The booking number, once
    /// assigned, never changes.
    pub fn update_booking(&self, id: i64, booking: &NewBooking) -> Result<()> {
        let conn = self.lock_conn()?;
        let changed = conn.execute(
            r#"
            UPDATE bookings SET
                booking_date = ?, name = ?, so = ?, cnic = ?, phone = ?, brand = ?,
                model = ?, colour = ?, specifications = ?, total_amount = ?, advance = ?,
                balance = ?, delivery_date = ?, delivered = ?
            WHERE id = ?
            "#,
            params![
                booking.booking_date,
                booking.name,
                booking.so,
                booking.cnic,
                booking.phone,
                booking.brand,
                booking.model,
                booking.colour,
                booking.specifications,
                booking.total_amount,
                booking.advance,
                booking.balance,
                booking.delivery_date,
                booking.delivered as i64,
                id,
            ],
        )?;
        if changed == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Booking {} not found",
                id
            )));
        }
        Ok(())
    }

    /// Flip the delivered flag, returning the new value. Independent of the
    /// delivery date being set.
    pub fn toggle_booking_delivered(&self, id: i64) -> Result<bool> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        let current: Option<i64> = tx
            .query_row("SELECT delivered FROM bookings WHERE id = ?", [id], |row| {
                row.get(0)
            })
            .optional()?;
        let current =
            current.ok_or_else(|| ShowroomError::NotFound(format!("Booking {} not found", id)))?;
        let next = i64::from(current == 0);
        tx.execute(
            "UPDATE bookings SET delivered = ? WHERE id = ?",
            params![next, id],
        )?;
        tx.commit()?;
        Ok(next != 0)
    }

    /// Delete a booking. Never triggered automatically; this is the explicit
    /// operator action.
    pub fn delete_booking(&self, id: i64) -> Result<()> {
        let conn = self.lock_conn()?;
        let deleted = conn.execute("DELETE FROM bookings WHERE id = ?", [id])?;
        if deleted == 0 {
            return Err(ShowroomError::NotFound(format!(
                "Booking {} not found",
                id
            )));
        }
        Ok(())
    }

    // --- Accounts ---

    /// Append a ledger line.
    pub fn add_account_entry(&self, entry: &NewAccountEntry) -> Result<AccountEntry> {
        let conn = self.lock_conn()?;
        let entry_date = Utc::now();
        conn.execute(
            "INSERT INTO accounts (entry_date, description, debit, credit) VALUES (?, ?, ?, ?)",
            params![
                entry_date.to_rfc3339(),
                entry.description,
                entry.debit,
                entry.credit
            ],
        )?;
        Ok(AccountEntry {
            id: conn.last_insert_rowid(),
            entry_date,
            description: entry.description.clone(),
            debit: entry.debit,
            credit: entry.credit,
        })
    }

    /// List ledger lines newest-first. No running balance is computed.
    pub fn list_account_entries(&self) -> Result<Vec<AccountEntry>> {
        let conn = self.lock_conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, entry_date, description, debit, credit FROM accounts ORDER BY id DESC",
        )?;
        let rows = stmt.query_map([], account_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.try_into()?);
        }
        Ok(entries)
    }
}

// --- Row mapping helpers ---

fn bike_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BikeRow> {
    Ok(BikeRow {
        id: row.get(0)?,
        brand: row.get(1)?,
        model: row.get(2)?,
        colour: row.get(3)?,
        variant: row.get(4)?,
        category: row.get(5)?,
        capacity: row.get(6)?,
        engine_no: row.get(7)?,
        chassis_no: row.get(8)?,
        listed_price: row.get(9)?,
        status: row.get(10)?,
    })
}

fn sold_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<SoldBikeRow> {
    Ok(SoldBikeRow {
        id: row.get(0)?,
        inventory_id: row.get(1)?,
        brand: row.get(2)?,
        model: row.get(3)?,
        colour: row.get(4)?,
        variant: row.get(5)?,
        category: row.get(6)?,
        capacity: row.get(7)?,
        engine_no: row.get(8)?,
        chassis_no: row.get(9)?,
        listed_price: row.get(10)?,
        customer_name: row.get(11)?,
        customer_so: row.get(12)?,
        customer_cnic: row.get(13)?,
        customer_contact: row.get(14)?,
        customer_address: row.get(15)?,
        gate_pass: row.get(16)?,
        documents_delivered: row.get(17)?,
        sold_price: row.get(18)?,
        invoice_no: row.get(19)?,
        sold_at: row.get(20)?,
    })
}

fn booking_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<BookingRow> {
    Ok(BookingRow {
        id: row.get(0)?,
        booking_no: row.get(1)?,
        booking_date: row.get(2)?,
        name: row.get(3)?,
        so: row.get(4)?,
        cnic: row.get(5)?,
        phone: row.get(6)?,
        brand: row.get(7)?,
        model: row.get(8)?,
        colour: row.get(9)?,
        specifications: row.get(10)?,
        total_amount: row.get(11)?,
        advance: row.get(12)?,
        balance: row.get(13)?,
        delivery_date: row.get(14)?,
        delivered: row.get(15)?,
    })
}

fn customer_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Customer> {
    Ok(Customer {
        id: row.get(0)?,
        name: row.get(1)?,
        so: row.get(2)?,
        cnic: row.get(3)?,
        phone: row.get(4)?,
        address: row.get(5)?,
    })
}

fn account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AccountEntryRow> {
    Ok(AccountEntryRow {
        id: row.get(0)?,
        entry_date: row.get(1)?,
        description: row.get(2)?,
        debit: row.get(3)?,
        credit: row.get(4)?,
    })
}

// --- Shared query helpers ---

fn fetch_bike(conn: &Connection, id: i64) -> Result<Option<Bike>> {
    let row = conn
        .query_row(
            &format!("SELECT {} FROM inventory WHERE id = ?", BIKE_COLUMNS),
            [id],
            bike_row,
        )
        .optional()?;
    row.map(Bike::try_from).transpose()
}

fn next_booking_number_on(conn: &Connection) -> Result<String> {
    let last: Option<String> = conn
        .query_row(
            "SELECT booking_no FROM bookings ORDER BY id DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()?;
    let seq = last
        .as_deref()
        .map(parse_booking_sequence)
        .unwrap_or(BOOKING_SEQ_BASE);
    let next = seq + 1;
    let next = if next < BOOKING_NO_FLOOR {
        BOOKING_NO_FLOOR + next
    } else {
        next
    };
    Ok(next.to_string())
}

fn parse_booking_sequence(raw: &str) -> i64 {
    raw.trim()
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .unwrap_or(BOOKING_SEQ_BASE)
}

fn upsert_customer_on(conn: &Connection, details: &CustomerDetails) -> Result<i64> {
    let existing: Option<i64> = conn
        .query_row(
            "SELECT id FROM customers WHERE cnic = ?",
            [&details.cnic],
            |row| row.get(0),
        )
        .optional()?;

    match existing {
        Some(id) => {
            // Fill only fields that are still empty; populated fields win.
            conn.execute(
                r#"
                UPDATE customers SET
                    name = CASE WHEN name = '' THEN ?1 ELSE name END,
                    so = CASE WHEN so = '' THEN ?2 ELSE so END,
                    phone = CASE WHEN phone = '' THEN ?3 ELSE phone END,
                    address = CASE WHEN address = '' THEN ?4 ELSE address END
                WHERE id = ?5
                "#,
                params![details.name, details.so, details.phone, details.address, id],
            )?;
            Ok(id)
        }
        None => {
            conn.execute(
                "INSERT INTO customers (name, so, cnic, phone, address) VALUES (?, ?, ?, ?, ?)",
                params![
                    details.name,
                    details.so,
                    details.cnic,
                    details.phone,
                    details.address
                ],
            )
            .map_err(map_constraint_err)?;
            Ok(conn.last_insert_rowid())
        }
    }
}

fn prefix_columns(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|col| format!("{}.{}", alias, col.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

// --- Constraint classification ---

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
    )
}

fn is_referential_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_TRIGGER
    )
}

fn map_constraint_err(err: rusqlite::Error) -> ShowroomError {
    if is_unique_violation(&err) {
        // SQLite reports "UNIQUE constraint failed: inventory.engine_no"
        let detail = match &err {
            rusqlite::Error::SqliteFailure(_, Some(message)) => message
                .strip_prefix("UNIQUE constraint failed: ")
                .unwrap_or(message)
                .to_string(),
            _ => "unique key".to_string(),
        };
        ShowroomError::DuplicateKey(detail)
    } else {
        err.into()
    }
}
