use showroom_core::auth;
use showroom_core::store::{
    BikeFilter, BikeStatus, BookingFilter, CustomerDetails, CustomerFilter, DeleteOutcome,
    NewAccountEntry, NewBike, NewBooking, SaleDetails, SoldBikeFilter, Store,
};
use showroom_core::ShowroomError;

fn sample_bike(engine_no: &str, chassis_no: &str) -> NewBike {
    NewBike::new("Suzuki", "GS150", engine_no, chassis_no, 385000.0)
        .with_colour("Black")
        .with_category("Street")
        .with_capacity("150cc")
}

fn sample_sale() -> SaleDetails {
    SaleDetails::new("Ali Khan", "42201-0000000-1", 350000.0)
        .with_so("Ahmed Khan")
        .with_contact("0300-1111111")
        .with_address("House 12, Karachi")
}

#[test]
fn test_booking_numbers_increase_sequentially() {
    let store = Store::open_in_memory().expect("open store");

    let mut numbers = Vec::new();
    for i in 0..5 {
        let next = store.next_booking_number().expect("allocate");
        let booking = store
            .create_booking(&NewBooking::new(format!("Customer {}", i), format!("cnic-{}", i)))
            .expect("create booking");
        assert_eq!(booking.booking_no, next);
        numbers.push(booking.booking_no.parse::<i64>().expect("numeric"));
    }

    assert_eq!(numbers[0], 11000);
    for pair in numbers.windows(2) {
        assert!(pair[1] > pair[0], "not increasing: {:?}", numbers);
    }
}

#[test]
fn test_sale_snapshots_and_removes_or_flags_inventory() {
    let store = Store::open_in_memory().expect("open store");
    let bike = store
        .add_bike(&sample_bike("E1", "C1"))
        .expect("add bike");

    let sold = store.record_sale(bike.id, &sample_sale()).expect("sell");

    assert_eq!(sold.engine_no, "E1");
    assert_eq!(sold.chassis_no, "C1");
    assert_eq!(sold.listed_price, 385000.0);
    assert_eq!(sold.sold_price, 350000.0);
    assert!(sold.invoice_no.starts_with(&format!("INV-{}-", bike.id)));

    // exactly one snapshot
    let snapshots = store
        .list_sold_bikes(&SoldBikeFilter::new())
        .expect("list sold");
    assert_eq!(snapshots.len(), 1);

    // inventory row is gone or flagged sold
    match store.get_bike(bike.id).expect("get bike") {
        None => {}
        Some(remaining) => assert_eq!(remaining.status, BikeStatus::Sold),
    }

    // exactly one customer with the buyer's CNIC
    let customers = store
        .list_customers(&CustomerFilter::new().cnic("42201-0000000-1"))
        .expect("list customers");
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].name, "Ali Khan");
}

#[test]
fn test_sale_requires_buyer_identity() {
    let store = Store::open_in_memory().expect("open store");
    let bike = store.add_bike(&sample_bike("E1", "C1")).expect("add bike");

    let missing_cnic = SaleDetails::new("Ali Khan", "", 350000.0);
    let err = store.record_sale(bike.id, &missing_cnic).unwrap_err();
    assert!(matches!(err, ShowroomError::Validation(_)), "{:?}", err);

    // rejected before any mutation
    assert!(store
        .list_sold_bikes(&SoldBikeFilter::new())
        .expect("list sold")
        .is_empty());
    let remaining = store.get_bike(bike.id).expect("get bike").expect("present");
    assert_eq!(remaining.status, BikeStatus::Available);
}

#[test]
fn test_sale_of_unknown_inventory_is_not_found() {
    let store = Store::open_in_memory().expect("open store");
    let err = store.record_sale(42, &sample_sale()).unwrap_err();
    assert!(matches!(err, ShowroomError::NotFound(_)), "{:?}", err);
}

#[test]
fn test_customer_upsert_fills_only_empty_fields() {
    let store = Store::open_in_memory().expect("open store");

    let first = CustomerDetails::new("Ali Khan", "X-CNIC");
    store.upsert_customer(&first).expect("first upsert");

    let with_phone = CustomerDetails::new("Ali Khan", "X-CNIC").with_phone("0300-1111111");
    store.upsert_customer(&with_phone).expect("second upsert");

    let empty_again = CustomerDetails::new("", "X-CNIC");
    store.upsert_customer(&empty_again).expect("third upsert");

    let customers = store
        .list_customers(&CustomerFilter::new().cnic("X-CNIC"))
        .expect("list");
    assert_eq!(customers.len(), 1);
    assert_eq!(customers[0].phone, "0300-1111111");
    assert_eq!(customers[0].name, "Ali Khan");
}

#[test]
fn test_duplicate_chassis_is_rejected_without_mutation() {
    let store = Store::open_in_memory().expect("open store");
    store.add_bike(&sample_bike("E1", "C1")).expect("first");

    let err = store.add_bike(&sample_bike("E2", "C1")).unwrap_err();
    assert!(matches!(err, ShowroomError::DuplicateKey(_)), "{:?}", err);

    let bikes = store.list_bikes(&BikeFilter::new()).expect("list");
    assert_eq!(bikes.len(), 1);
}

#[test]
fn test_duplicate_username_is_rejected() {
    let store = Store::open_in_memory().expect("open store");
    let hash = auth::hash_password("operator-pass-1").expect("hash");
    store.create_user("owais", &hash, "Owais").expect("create");

    let err = store.create_user("owais", &hash, "Other").unwrap_err();
    assert!(matches!(err, ShowroomError::DuplicateKey(_)), "{:?}", err);

    let user = store.get_user("owais").expect("get").expect("present");
    assert!(auth::verify_password(&user.password_hash, "operator-pass-1").expect("verify"));
    assert!(!auth::verify_password(&user.password_hash, "wrong").expect("verify"));
}

#[test]
fn test_delivered_toggle_round_trips_and_number_survives_edits() {
    let store = Store::open_in_memory().expect("open store");
    let booking = store
        .create_booking(
            &NewBooking::new("Ali Khan", "42201-0000000-1")
                .with_bike("Suzuki", "GS150", "Black")
                .with_amounts(350000.0, 50000.0, 300000.0),
        )
        .expect("create");
    assert!(!booking.delivered);

    assert!(store.toggle_booking_delivered(booking.id).expect("toggle"));
    assert!(!store.toggle_booking_delivered(booking.id).expect("toggle"));

    let edited = NewBooking::new("Ali Khan", "42201-0000000-1")
        .with_booking_date(booking.booking_date.clone())
        .with_bike("Suzuki", "GS150", "Red")
        .with_amounts(350000.0, 100000.0, 250000.0);
    store.update_booking(booking.id, &edited).expect("edit");

    let reloaded = store
        .get_booking(booking.id)
        .expect("get")
        .expect("present");
    assert_eq!(reloaded.booking_no, booking.booking_no);
    assert_eq!(reloaded.colour, "Red");
    assert_eq!(reloaded.advance, 100000.0);
    assert!(!reloaded.delivered);
}

#[test]
fn test_delete_bike_falls_back_to_flag_when_referenced() {
    let store = Store::open_in_memory().expect("open store");

    let unsold = store.add_bike(&sample_bike("E1", "C1")).expect("add");
    assert_eq!(
        store.delete_bike(unsold.id).expect("delete"),
        DeleteOutcome::Deleted
    );
    assert!(store.get_bike(unsold.id).expect("get").is_none());

    let sold = store.add_bike(&sample_bike("E2", "C2")).expect("add");
    store.record_sale(sold.id, &sample_sale()).expect("sell");
    if let Some(bike) = store.get_bike(sold.id).expect("get") {
        // still present: the snapshot pins it, so delete flags instead
        assert_eq!(bike.status, BikeStatus::Sold);
        assert_eq!(
            store.delete_bike(sold.id).expect("delete"),
            DeleteOutcome::FlaggedSold
        );
    }
}

#[test]
fn test_inventory_filters() {
    let store = Store::open_in_memory().expect("open store");
    store
        .add_bike(&sample_bike("E-100", "C-100"))
        .expect("add");
    store
        .add_bike(
            &NewBike::new("Honda", "CG125", "E-200", "C-200", 250000.0).with_category("Commuter"),
        )
        .expect("add");

    let by_category = store
        .list_bikes(&BikeFilter::new().category("Commuter"))
        .expect("list");
    assert_eq!(by_category.len(), 1);
    assert_eq!(by_category[0].brand, "Honda");

    let by_engine = store
        .list_bikes(&BikeFilter::new().engine_no("E-1"))
        .expect("list");
    assert_eq!(by_engine.len(), 1);
    assert_eq!(by_engine[0].engine_no, "E-100");

    // buyer CNIC joins through the sale snapshots
    let bike = by_engine.into_iter().next().unwrap();
    store.record_sale(bike.id, &sample_sale()).expect("sell");
    let by_buyer = store
        .list_bikes(&BikeFilter::new().customer_cnic("42201"))
        .expect("list");
    assert_eq!(by_buyer.len(), 1);
    assert_eq!(by_buyer[0].id, bike.id);
}

#[test]
fn test_sold_filters_and_docs_toggle() {
    let store = Store::open_in_memory().expect("open store");
    let bike = store.add_bike(&sample_bike("E1", "C1")).expect("add");
    let sold = store.record_sale(bike.id, &sample_sale()).expect("sell");

    let by_invoice = store
        .list_sold_bikes(&SoldBikeFilter::new().invoice_no(sold.invoice_no.as_str()))
        .expect("list");
    assert_eq!(by_invoice.len(), 1);

    assert!(store
        .toggle_documents_delivered(sold.id)
        .expect("toggle docs"));
    let reloaded = store
        .get_sold_bike(sold.id)
        .expect("get")
        .expect("present");
    assert!(reloaded.documents_delivered);
}

#[test]
fn test_account_entries_list_newest_first() {
    let store = Store::open_in_memory().expect("open store");
    store
        .add_account_entry(&NewAccountEntry::new("Opening balance").with_credit(500000.0))
        .expect("add");
    store
        .add_account_entry(&NewAccountEntry::new("Fuel").with_debit(4000.0))
        .expect("add");

    let entries = store.list_account_entries().expect("list");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].description, "Fuel");
    assert_eq!(entries[1].credit, 500000.0);
}

#[test]
fn test_listings_are_newest_first() {
    let store = Store::open_in_memory().expect("open store");
    store.add_bike(&sample_bike("E1", "C1")).expect("add");
    store.add_bike(&sample_bike("E2", "C2")).expect("add");

    let bikes = store.list_bikes(&BikeFilter::new()).expect("list");
    assert_eq!(bikes[0].engine_no, "E2");
    assert_eq!(bikes[1].engine_no, "E1");

    store
        .create_booking(&NewBooking::new("First", "1"))
        .expect("create");
    store
        .create_booking(&NewBooking::new("Second", "2"))
        .expect("create");
    let bookings = store.list_bookings(&BookingFilter::new()).expect("list");
    assert_eq!(bookings[0].name, "Second");
}

#[test]
fn test_booking_filter_by_name() {
    let store = Store::open_in_memory().expect("open store");
    store
        .create_booking(&NewBooking::new("Ali Khan", "1"))
        .expect("create");
    store
        .create_booking(&NewBooking::new("Bilal Ahmed", "2"))
        .expect("create");

    let bookings = store
        .list_bookings(&BookingFilter::new().name("Bilal"))
        .expect("list");
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].cnic, "2");
}
