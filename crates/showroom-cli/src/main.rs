//! Showroom CLI - record keeping for a small motorcycle showroom.
//!
//! This is the command-line interface for Showroom. It collects and
//! validates field values, then calls into the core library for storage
//! transitions and document generation.

mod config;

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use comfy_table::Table;
use dialoguer::Password;
use owo_colors::OwoColorize;

use showroom_core::documents::DocumentService;
use showroom_core::lifecycle::Lifecycle;
use showroom_core::store::{
    BikeFilter, BikeStatus, BookingFilter, CustomerDetails, CustomerFilter, DeleteOutcome,
    NewAccountEntry, NewBike, NewBooking, SaleDetails, SoldBikeFilter,
};
use showroom_core::{auth, Store, VERSION};

use config::ShowroomConfig;

/// Showroom - inventory, bookings, sales, customers and documents
#[derive(Parser)]
#[command(name = "showroom")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the database file
    #[arg(long, global = true, env = "SHOWROOM_DB")]
    db: Option<PathBuf>,

    /// Directory holding template pages and coordinate side-cars
    #[arg(long, global = true, env = "SHOWROOM_ASSETS")]
    assets: Option<PathBuf>,

    /// Directory generated documents are written under
    #[arg(long, global = true, env = "SHOWROOM_OUT")]
    output: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the config file and create the database and directories
    Init,

    /// Create an operator account
    Signup {
        #[arg(value_name = "USERNAME")]
        username: String,

        /// Full name shown on the dashboard
        #[arg(long, default_value = "")]
        full_name: String,
    },

    /// Verify an operator's credentials
    Login {
        #[arg(value_name = "USERNAME")]
        username: String,
    },

    /// Add a bike to the inventory
    AddBike {
        #[arg(long)]
        brand: String,
        #[arg(long)]
        model: String,
        #[arg(long)]
        engine_no: String,
        #[arg(long)]
        chassis_no: String,
        #[arg(long)]
        listed_price: f64,
        #[arg(long, default_value = "")]
        colour: String,
        #[arg(long, default_value = "")]
        variant: String,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long, default_value = "")]
        capacity: String,
    },

    /// List inventory
    Inventory {
        /// Filter by category (exact match)
        #[arg(long)]
        category: Option<String>,

        /// Filter by chassis number (substring)
        #[arg(long)]
        chassis: Option<String>,

        /// Filter by engine number (substring)
        #[arg(long)]
        engine: Option<String>,

        /// Filter by buyer CNIC (substring, joins through sold bikes)
        #[arg(long)]
        cnic: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit an inventory row; omitted flags keep their current value
    EditBike {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        colour: Option<String>,
        #[arg(long)]
        variant: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        capacity: Option<String>,
        #[arg(long)]
        engine_no: Option<String>,
        #[arg(long)]
        chassis_no: Option<String>,
        #[arg(long)]
        listed_price: Option<f64>,
        /// "available" or "sold"
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete an inventory row (flags it sold when still referenced)
    DeleteBike {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Record a sale and write its invoice
    Sell {
        /// Inventory row to sell
        #[arg(value_name = "INVENTORY_ID")]
        inventory_id: i64,

        #[arg(long)]
        name: String,
        #[arg(long)]
        cnic: String,
        #[arg(long)]
        sold_price: f64,
        #[arg(long, default_value = "")]
        so: String,
        #[arg(long, default_value = "")]
        contact: String,
        #[arg(long, default_value = "")]
        address: String,
        #[arg(long)]
        gate_pass: bool,
        #[arg(long)]
        documents_delivered: bool,
    },

    /// List sold bikes
    Sold {
        #[arg(long)]
        cnic: Option<String>,
        #[arg(long)]
        engine: Option<String>,
        #[arg(long)]
        chassis: Option<String>,
        #[arg(long)]
        invoice: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-render the invoice for a sold bike
    Invoice {
        #[arg(value_name = "SOLD_ID")]
        sold_id: i64,
    },

    /// Issue a gate pass for a sold bike
    GatePass {
        #[arg(value_name = "SOLD_ID")]
        sold_id: i64,
    },

    /// Toggle the documents-delivered flag on a sold bike
    ToggleDocs {
        #[arg(value_name = "SOLD_ID")]
        sold_id: i64,
    },

    /// Delete a sold-bike record
    DeleteSold {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Create a booking and write its letter
    Book {
        #[arg(long)]
        name: String,
        #[arg(long)]
        cnic: String,
        /// Booking date (YYYY-MM-DD); defaults to today
        #[arg(long)]
        date: Option<String>,
        #[arg(long, default_value = "")]
        so: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        brand: String,
        #[arg(long, default_value = "")]
        model: String,
        #[arg(long, default_value = "")]
        colour: String,
        #[arg(long, default_value = "")]
        specifications: String,
        #[arg(long, default_value_t = 0.0)]
        total: f64,
        #[arg(long, default_value_t = 0.0)]
        advance: f64,
        #[arg(long, default_value_t = 0.0)]
        balance: f64,
        /// Expected delivery date (YYYY-MM-DD)
        #[arg(long)]
        delivery_date: Option<String>,
    },

    /// List bookings
    Bookings {
        #[arg(long)]
        booking_no: Option<String>,
        #[arg(long)]
        cnic: Option<String>,
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a booking; the booking number never changes
    EditBooking {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        so: Option<String>,
        #[arg(long)]
        cnic: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        model: Option<String>,
        #[arg(long)]
        colour: Option<String>,
        #[arg(long)]
        specifications: Option<String>,
        #[arg(long)]
        total: Option<f64>,
        #[arg(long)]
        advance: Option<f64>,
        #[arg(long)]
        balance: Option<f64>,
        #[arg(long)]
        delivery_date: Option<String>,
        #[arg(long)]
        delivered: Option<bool>,
    },

    /// Flip a booking's delivered flag
    ToggleDelivered {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Re-render the letter for a booking
    BookingLetter {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Delete a booking
    DeleteBooking {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// List customers
    Customers {
        #[arg(long)]
        cnic: Option<String>,
        #[arg(long)]
        name: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit a customer; omitted flags keep their current value
    EditCustomer {
        #[arg(value_name = "ID")]
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        so: Option<String>,
        #[arg(long)]
        cnic: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },

    /// Delete a customer
    DeleteCustomer {
        #[arg(value_name = "ID")]
        id: i64,
    },

    /// Accounts ledger
    Account {
        #[command(subcommand)]
        command: AccountCommands,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum AccountCommands {
    /// Append a ledger line
    Add {
        #[arg(value_name = "DESCRIPTION")]
        description: String,
        #[arg(long, default_value_t = 0.0)]
        debit: f64,
        #[arg(long, default_value_t = 0.0)]
        credit: f64,
    },

    /// List ledger lines, newest first
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

struct Paths {
    db: PathBuf,
    assets: PathBuf,
    output: PathBuf,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let quiet = cli.quiet;
    let paths = resolve_paths(&cli)?;

    match cli.command {
        Commands::Init => {
            if let Some(parent) = paths.db.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::create_dir_all(&paths.assets)?;
            fs::create_dir_all(&paths.output)?;

            let config_path = config::default_config_path()?;
            config::write_config(
                &config_path,
                &ShowroomConfig::new(
                    paths.db.clone(),
                    paths.assets.clone(),
                    paths.output.clone(),
                ),
            )?;

            // creates the schema on first open
            Store::open(&paths.db)?;

            if !quiet {
                println!("Initialized showroom database at {}", paths.db.display());
                println!("Config written to {}", config_path.display());
                println!(
                    "Place template pages and coordinate side-cars in {}",
                    paths.assets.display()
                );
            }
        }

        Commands::Signup {
            username,
            full_name,
        } => {
            let store = open_store(&paths)?;
            let password = Password::new()
                .with_prompt("Password")
                .with_confirmation("Confirm password", "Passwords do not match")
                .interact()?;
            let hash = auth::hash_password(&password)?;
            store.create_user(&username, &hash, &full_name)?;
            if !quiet {
                println!("{} operator {:?} created", "ok:".green(), username);
            }
        }

        Commands::Login { username } => {
            let store = open_store(&paths)?;
            let user = store
                .get_user(&username)?
                .with_context(|| format!("Unknown username {:?}", username))?;
            let password = Password::new().with_prompt("Password").interact()?;
            if auth::verify_password(&user.password_hash, &password)? {
                if !quiet {
                    println!("{} welcome, {}", "ok:".green(), display_name(&user.full_name, &user.username));
                }
            } else {
                anyhow::bail!("Invalid password");
            }
        }

        Commands::AddBike {
            brand,
            model,
            engine_no,
            chassis_no,
            listed_price,
            colour,
            variant,
            category,
            capacity,
        } => {
            require_non_empty("engine number", &engine_no)?;
            require_non_empty("chassis number", &chassis_no)?;
            let store = open_store(&paths)?;
            let bike = store.add_bike(
                &NewBike::new(brand, model, engine_no, chassis_no, listed_price)
                    .with_colour(colour)
                    .with_variant(variant)
                    .with_category(category)
                    .with_capacity(capacity),
            )?;
            if !quiet {
                println!("{} bike added with id {}", "ok:".green(), bike.id);
            }
        }

        Commands::Inventory {
            category,
            chassis,
            engine,
            cnic,
            json,
        } => {
            let store = open_store(&paths)?;
            let mut filter = BikeFilter::new();
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(chassis) = chassis {
                filter = filter.chassis_no(chassis);
            }
            if let Some(engine) = engine {
                filter = filter.engine_no(engine);
            }
            if let Some(cnic) = cnic {
                filter = filter.customer_cnic(cnic);
            }
            let bikes = store.list_bikes(&filter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&bikes)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec![
                    "ID", "Brand", "Model", "Colour", "Category", "Engine No", "Chassis No",
                    "Listed", "Status",
                ]);
                for bike in &bikes {
                    table.add_row(vec![
                        bike.id.to_string(),
                        bike.brand.clone(),
                        bike.model.clone(),
                        bike.colour.clone(),
                        bike.category.clone(),
                        bike.engine_no.clone(),
                        bike.chassis_no.clone(),
                        format!("{}", bike.listed_price),
                        bike.status.to_string(),
                    ]);
                }
                println!("{table}");
            }
        }

        Commands::EditBike {
            id,
            brand,
            model,
            colour,
            variant,
            category,
            capacity,
            engine_no,
            chassis_no,
            listed_price,
            status,
        } => {
            let store = open_store(&paths)?;
            let existing = store
                .get_bike(id)?
                .with_context(|| format!("Inventory item {} not found", id))?;
            let status = match status {
                Some(raw) => parse_status(&raw)?,
                None => existing.status,
            };
            let updated = NewBike {
                brand: brand.unwrap_or(existing.brand),
                model: model.unwrap_or(existing.model),
                colour: colour.unwrap_or(existing.colour),
                variant: variant.unwrap_or(existing.variant),
                category: category.unwrap_or(existing.category),
                capacity: capacity.unwrap_or(existing.capacity),
                engine_no: engine_no.unwrap_or(existing.engine_no),
                chassis_no: chassis_no.unwrap_or(existing.chassis_no),
                listed_price: listed_price.unwrap_or(existing.listed_price),
                status,
            };
            store.update_bike(id, &updated)?;
            if !quiet {
                println!("{} bike {} updated", "ok:".green(), id);
            }
        }

        Commands::DeleteBike { id } => {
            let store = open_store(&paths)?;
            match store.delete_bike(id)? {
                DeleteOutcome::Deleted => {
                    if !quiet {
                        println!("{} bike {} deleted", "ok:".green(), id);
                    }
                }
                DeleteOutcome::FlaggedSold => {
                    if !quiet {
                        println!(
                            "{} bike {} still referenced; marked sold instead",
                            "note:".yellow(),
                            id
                        );
                    }
                }
            }
        }

        Commands::Sell {
            inventory_id,
            name,
            cnic,
            sold_price,
            so,
            contact,
            address,
            gate_pass,
            documents_delivered,
        } => {
            require_non_empty("customer name", &name)?;
            require_non_empty("customer CNIC", &cnic)?;

            let store = open_store(&paths)?;
            let documents = DocumentService::new(&paths.assets, &paths.output);
            let lifecycle = Lifecycle::new(&store, &documents);

            let sale = SaleDetails::new(name, cnic, sold_price)
                .with_so(so)
                .with_contact(contact)
                .with_address(address)
                .with_gate_pass(gate_pass)
                .with_documents_delivered(documents_delivered);
            let outcome = lifecycle.record_sale(inventory_id, &sale)?;

            if !quiet {
                println!(
                    "{} sale recorded, invoice no {}",
                    "ok:".green(),
                    outcome.sold.invoice_no
                );
            }
            match outcome.invoice {
                Ok(path) => {
                    if !quiet {
                        println!("Invoice written to {}", path.display());
                    }
                }
                Err(err) => {
                    // the sale stands; only the document failed
                    eprintln!(
                        "{} sale recorded but the invoice could not be written: {}",
                        "warning:".yellow(),
                        err
                    );
                }
            }
        }

        Commands::Sold {
            cnic,
            engine,
            chassis,
            invoice,
            json,
        } => {
            let store = open_store(&paths)?;
            let mut filter = SoldBikeFilter::new();
            if let Some(cnic) = cnic {
                filter = filter.cnic(cnic);
            }
            if let Some(engine) = engine {
                filter = filter.engine_no(engine);
            }
            if let Some(chassis) = chassis {
                filter = filter.chassis_no(chassis);
            }
            if let Some(invoice) = invoice {
                filter = filter.invoice_no(invoice);
            }
            let sold = store.list_sold_bikes(&filter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&sold)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec![
                    "ID", "Invoice No", "Brand", "Model", "Engine No", "Customer", "CNIC",
                    "Sold", "Gate Pass", "Docs",
                ]);
                for row in &sold {
                    table.add_row(vec![
                        row.id.to_string(),
                        row.invoice_no.clone(),
                        row.brand.clone(),
                        row.model.clone(),
                        row.engine_no.clone(),
                        row.customer_name.clone(),
                        row.customer_cnic.clone(),
                        format!("{}", row.sold_price),
                        yes_no(row.gate_pass),
                        yes_no(row.documents_delivered),
                    ]);
                }
                println!("{table}");
            }
        }

        Commands::Invoice { sold_id } => {
            let store = open_store(&paths)?;
            let documents = DocumentService::new(&paths.assets, &paths.output);
            let sold = store
                .get_sold_bike(sold_id)?
                .with_context(|| format!("Sold bike {} not found", sold_id))?;
            let path = documents.write_invoice(&sold)?;
            if !quiet {
                println!("Invoice written to {}", path.display());
            }
        }

        Commands::GatePass { sold_id } => {
            let store = open_store(&paths)?;
            let documents = DocumentService::new(&paths.assets, &paths.output);
            let lifecycle = Lifecycle::new(&store, &documents);
            let path = lifecycle.issue_gate_pass(sold_id)?;
            if !quiet {
                println!("Gate pass written to {}", path.display());
            }
        }

        Commands::ToggleDocs { sold_id } => {
            let store = open_store(&paths)?;
            let delivered = store.toggle_documents_delivered(sold_id)?;
            if !quiet {
                println!(
                    "{} documents marked {}",
                    "ok:".green(),
                    if delivered { "delivered" } else { "not delivered" }
                );
            }
        }

        Commands::DeleteSold { id } => {
            let store = open_store(&paths)?;
            store.delete_sold_bike(id)?;
            if !quiet {
                println!("{} sold record {} deleted", "ok:".green(), id);
            }
        }

        Commands::Book {
            name,
            cnic,
            date,
            so,
            phone,
            brand,
            model,
            colour,
            specifications,
            total,
            advance,
            balance,
            delivery_date,
        } => {
            require_non_empty("customer name", &name)?;
            require_non_empty("customer CNIC", &cnic)?;
            if let Some(ref date) = date {
                validate_date(date)?;
            }
            if let Some(ref date) = delivery_date {
                validate_date(date)?;
            }

            let store = open_store(&paths)?;
            let documents = DocumentService::new(&paths.assets, &paths.output);
            let lifecycle = Lifecycle::new(&store, &documents);

            let booking = NewBooking::new(name, cnic)
                .with_booking_date(date.unwrap_or_default())
                .with_so(so)
                .with_phone(phone)
                .with_bike(brand, model, colour)
                .with_specifications(specifications)
                .with_amounts(total, advance, balance)
                .with_delivery_date(delivery_date.unwrap_or_default());
            let outcome = lifecycle.create_booking(&booking)?;

            if !quiet {
                println!(
                    "{} booking created, booking no {}",
                    "ok:".green(),
                    outcome.booking.booking_no
                );
            }
            match outcome.letter {
                Ok(path) => {
                    if !quiet {
                        println!("Booking letter written to {}", path.display());
                    }
                }
                Err(err) => {
                    eprintln!(
                        "{} booking created but the letter could not be written: {}",
                        "warning:".yellow(),
                        err
                    );
                }
            }
        }

        Commands::Bookings {
            booking_no,
            cnic,
            name,
            json,
        } => {
            let store = open_store(&paths)?;
            let mut filter = BookingFilter::new();
            if let Some(booking_no) = booking_no {
                filter = filter.booking_no(booking_no);
            }
            if let Some(cnic) = cnic {
                filter = filter.cnic(cnic);
            }
            if let Some(name) = name {
                filter = filter.name(name);
            }
            let bookings = store.list_bookings(&filter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&bookings)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec![
                    "ID",
                    "Booking No",
                    "Date",
                    "Name",
                    "CNIC",
                    "Bike",
                    "Total",
                    "Advance",
                    "Balance",
                    "Delivery",
                    "Delivered",
                ]);
                for booking in &bookings {
                    table.add_row(vec![
                        booking.id.to_string(),
                        booking.booking_no.clone(),
                        booking.booking_date.clone(),
                        booking.name.clone(),
                        booking.cnic.clone(),
                        format!("{} {}", booking.brand, booking.model),
                        format!("{}", booking.total_amount),
                        format!("{}", booking.advance),
                        format!("{}", booking.balance),
                        booking.delivery_date.clone(),
                        yes_no(booking.delivered),
                    ]);
                }
                println!("{table}");
            }
        }

        Commands::EditBooking {
            id,
            date,
            name,
            so,
            cnic,
            phone,
            brand,
            model,
            colour,
            specifications,
            total,
            advance,
            balance,
            delivery_date,
            delivered,
        } => {
            if let Some(ref date) = date {
                validate_date(date)?;
            }
            if let Some(ref date) = delivery_date {
                validate_date(date)?;
            }

            let store = open_store(&paths)?;
            let existing = store
                .get_booking(id)?
                .with_context(|| format!("Booking {} not found", id))?;
            let updated = NewBooking {
                booking_date: date.unwrap_or(existing.booking_date),
                name: name.unwrap_or(existing.name),
                so: so.unwrap_or(existing.so),
                cnic: cnic.unwrap_or(existing.cnic),
                phone: phone.unwrap_or(existing.phone),
                brand: brand.unwrap_or(existing.brand),
                model: model.unwrap_or(existing.model),
                colour: colour.unwrap_or(existing.colour),
                specifications: specifications.unwrap_or(existing.specifications),
                total_amount: total.unwrap_or(existing.total_amount),
                advance: advance.unwrap_or(existing.advance),
                balance: balance.unwrap_or(existing.balance),
                delivery_date: delivery_date.unwrap_or(existing.delivery_date),
                delivered: delivered.unwrap_or(existing.delivered),
            };
            store.update_booking(id, &updated)?;
            if !quiet {
                println!(
                    "{} booking {} updated (booking no {})",
                    "ok:".green(),
                    id,
                    existing.booking_no
                );
            }
        }

        Commands::ToggleDelivered { id } => {
            let store = open_store(&paths)?;
            let delivered = store.toggle_booking_delivered(id)?;
            if !quiet {
                println!(
                    "{} booking marked {}",
                    "ok:".green(),
                    if delivered { "delivered" } else { "not delivered" }
                );
            }
        }

        Commands::BookingLetter { id } => {
            let store = open_store(&paths)?;
            let documents = DocumentService::new(&paths.assets, &paths.output);
            let booking = store
                .get_booking(id)?
                .with_context(|| format!("Booking {} not found", id))?;
            let path = documents.write_booking_letter(&booking)?;
            if !quiet {
                println!("Booking letter written to {}", path.display());
            }
        }

        Commands::DeleteBooking { id } => {
            let store = open_store(&paths)?;
            store.delete_booking(id)?;
            if !quiet {
                println!("{} booking {} deleted", "ok:".green(), id);
            }
        }

        Commands::Customers { cnic, name, json } => {
            let store = open_store(&paths)?;
            let mut filter = CustomerFilter::new();
            if let Some(cnic) = cnic {
                filter = filter.cnic(cnic);
            }
            if let Some(name) = name {
                filter = filter.name(name);
            }
            let customers = store.list_customers(&filter)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&customers)?);
            } else {
                let mut table = Table::new();
                table.set_header(vec!["ID", "Name", "S/O", "CNIC", "Phone", "Address"]);
                for customer in &customers {
                    table.add_row(vec![
                        customer.id.to_string(),
                        customer.name.clone(),
                        customer.so.clone(),
                        customer.cnic.clone(),
                        customer.phone.clone(),
                        customer.address.clone(),
                    ]);
                }
                println!("{table}");
            }
        }

        Commands::EditCustomer {
            id,
            name,
            so,
            cnic,
            phone,
            address,
        } => {
            let store = open_store(&paths)?;
            let existing = store
                .get_customer(id)?
                .with_context(|| format!("Customer {} not found", id))?;
            let updated = CustomerDetails {
                name: name.unwrap_or(existing.name),
                so: so.unwrap_or(existing.so),
                cnic: cnic.unwrap_or(existing.cnic),
                phone: phone.unwrap_or(existing.phone),
                address: address.unwrap_or(existing.address),
            };
            store.update_customer(id, &updated)?;
            if !quiet {
                println!("{} customer {} updated", "ok:".green(), id);
            }
        }

        Commands::DeleteCustomer { id } => {
            let store = open_store(&paths)?;
            store.delete_customer(id)?;
            if !quiet {
                println!("{} customer {} deleted", "ok:".green(), id);
            }
        }

        Commands::Account { command } => {
            let store = open_store(&paths)?;
            match command {
                AccountCommands::Add {
                    description,
                    debit,
                    credit,
                } => {
                    let entry = store.add_account_entry(
                        &NewAccountEntry::new(description)
                            .with_debit(debit)
                            .with_credit(credit),
                    )?;
                    if !quiet {
                        println!("{} ledger line {} added", "ok:".green(), entry.id);
                    }
                }
                AccountCommands::List { json } => {
                    let entries = store.list_account_entries()?;
                    if json {
                        println!("{}", serde_json::to_string_pretty(&entries)?);
                    } else {
                        let mut table = Table::new();
                        table.set_header(vec!["ID", "Date", "Description", "Debit", "Credit"]);
                        for entry in &entries {
                            table.add_row(vec![
                                entry.id.to_string(),
                                entry.entry_date.format("%Y-%m-%d %H:%M").to_string(),
                                entry.description.clone(),
                                format!("{}", entry.debit),
                                format!("{}", entry.credit),
                            ]);
                        }
                        println!("{table}");
                    }
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut io::stdout());
        }
    }

    Ok(())
}

fn resolve_paths(cli: &Cli) -> anyhow::Result<Paths> {
    let config_path = config::default_config_path()?;
    let file = if config_path.exists() {
        Some(config::read_config(&config_path)?)
    } else {
        None
    };

    let db = match (&cli.db, &file) {
        (Some(db), _) => db.clone(),
        (None, Some(config)) => PathBuf::from(&config.showroom.db_path),
        (None, None) => config::default_db_path()?,
    };
    let assets = match (&cli.assets, &file) {
        (Some(assets), _) => assets.clone(),
        (None, Some(config)) => PathBuf::from(&config.showroom.assets_dir),
        (None, None) => config::default_assets_dir()?,
    };
    let output = match (&cli.output, &file) {
        (Some(output), _) => output.clone(),
        (None, Some(config)) => PathBuf::from(&config.showroom.output_dir),
        (None, None) => config::default_output_dir()?,
    };

    Ok(Paths { db, assets, output })
}

fn open_store(paths: &Paths) -> anyhow::Result<Store> {
    if let Some(parent) = paths.db.parent() {
        fs::create_dir_all(parent)?;
    }
    Store::open(&paths.db)
        .with_context(|| format!("Failed to open database {}", paths.db.display()))
}

fn require_non_empty(label: &str, value: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{} is required", label);
    }
    Ok(())
}

fn validate_date(raw: &str) -> anyhow::Result<()> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|_| anyhow::anyhow!("Invalid date {:?}, expected YYYY-MM-DD", raw))
}

fn parse_status(raw: &str) -> anyhow::Result<BikeStatus> {
    match raw {
        "available" => Ok(BikeStatus::Available),
        "sold" => Ok(BikeStatus::Sold),
        other => anyhow::bail!("Invalid status {:?}, expected available or sold", other),
    }
}

fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

fn display_name<'a>(full_name: &'a str, username: &'a str) -> &'a str {
    if full_name.trim().is_empty() {
        username
    } else {
        full_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_tree_parses() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("2026-08-07").is_ok());
        assert!(validate_date("07-08-2026").is_err());
        assert!(validate_date("soon").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert!(matches!(parse_status("sold"), Ok(BikeStatus::Sold)));
        assert!(parse_status("gone").is_err());
    }
}
