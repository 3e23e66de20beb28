use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_showroom"))
}

fn showroom(dir: &Path, args: &[&str]) -> Output {
    let db = dir.join("showroom.db");
    let mut cmd = Command::new(bin());
    cmd.env("XDG_CONFIG_HOME", dir.join("config"))
        .env("XDG_DATA_HOME", dir.join("data"))
        .arg("--db")
        .arg(&db)
        .args(args);
    cmd.output().expect("run showroom")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn json_stdout(output: &Output) -> Value {
    serde_json::from_str(&stdout(output)).expect("JSON output")
}

#[test]
fn test_add_sell_and_list_flow() {
    let dir = tempfile::tempdir().unwrap();

    let added = showroom(
        dir.path(),
        &[
            "add-bike",
            "--brand",
            "Suzuki",
            "--model",
            "GS150",
            "--engine-no",
            "E-1001",
            "--chassis-no",
            "C-1001",
            "--listed-price",
            "385000",
            "--colour",
            "Black",
        ],
    );
    assert!(added.status.success(), "{:?}", added);

    let listed = showroom(dir.path(), &["inventory", "--json"]);
    assert!(listed.status.success(), "{:?}", listed);
    let bikes = json_stdout(&listed);
    assert_eq!(bikes.as_array().unwrap().len(), 1);
    assert_eq!(bikes[0]["engine_no"], "E-1001");
    let bike_id = bikes[0]["id"].as_i64().unwrap().to_string();

    // no invoice template is installed, so the sale commits with a warning
    let sold = showroom(
        dir.path(),
        &[
            "sell",
            &bike_id,
            "--name",
            "Ali Khan",
            "--cnic",
            "42201-0000000-1",
            "--sold-price",
            "350000",
        ],
    );
    assert!(sold.status.success(), "{:?}", sold);
    assert!(stdout(&sold).contains("sale recorded"), "{:?}", sold);
    assert!(
        String::from_utf8_lossy(&sold.stderr).contains("invoice"),
        "{:?}",
        sold
    );

    let snapshots = showroom(dir.path(), &["sold", "--json"]);
    let snapshots = json_stdout(&snapshots);
    assert_eq!(snapshots.as_array().unwrap().len(), 1);
    assert_eq!(snapshots[0]["customer_cnic"], "42201-0000000-1");

    // the inventory row is gone or flagged sold
    let remaining = json_stdout(&showroom(dir.path(), &["inventory", "--json"]));
    let remaining = remaining.as_array().unwrap();
    if let Some(bike) = remaining.first() {
        assert_eq!(bike["status"], "sold");
    }

    let customers = json_stdout(&showroom(dir.path(), &["customers", "--json"]));
    assert_eq!(customers.as_array().unwrap().len(), 1);
    assert_eq!(customers[0]["name"], "Ali Khan");
}

#[test]
fn test_duplicate_chassis_fails_with_nonzero_exit() {
    let dir = tempfile::tempdir().unwrap();

    let first = showroom(
        dir.path(),
        &[
            "add-bike",
            "--brand",
            "Suzuki",
            "--model",
            "GS150",
            "--engine-no",
            "E-1",
            "--chassis-no",
            "C-1",
            "--listed-price",
            "385000",
        ],
    );
    assert!(first.status.success());

    let second = showroom(
        dir.path(),
        &[
            "add-bike",
            "--brand",
            "Suzuki",
            "--model",
            "GS150",
            "--engine-no",
            "E-2",
            "--chassis-no",
            "C-1",
            "--listed-price",
            "385000",
        ],
    );
    assert!(!second.status.success());
    assert!(
        String::from_utf8_lossy(&second.stderr).contains("Duplicate"),
        "{:?}",
        second
    );

    let bikes = json_stdout(&showroom(dir.path(), &["inventory", "--json"]));
    assert_eq!(bikes.as_array().unwrap().len(), 1);
}

#[test]
fn test_booking_flow_assigns_and_keeps_number() {
    let dir = tempfile::tempdir().unwrap();

    let booked = showroom(
        dir.path(),
        &[
            "book",
            "--name",
            "Ali Khan",
            "--cnic",
            "42201-0000000-1",
            "--brand",
            "Suzuki",
            "--model",
            "GS150",
            "--total",
            "350000",
            "--advance",
            "50000",
            "--balance",
            "300000",
        ],
    );
    assert!(booked.status.success(), "{:?}", booked);
    assert!(stdout(&booked).contains("11000"), "{:?}", booked);

    let bookings = json_stdout(&showroom(dir.path(), &["bookings", "--json"]));
    let booking_id = bookings[0]["id"].as_i64().unwrap().to_string();
    assert_eq!(bookings[0]["booking_no"], "11000");
    assert_eq!(bookings[0]["delivered"], false);

    let toggled = showroom(dir.path(), &["toggle-delivered", &booking_id]);
    assert!(toggled.status.success());
    let toggled_back = showroom(dir.path(), &["toggle-delivered", &booking_id]);
    assert!(toggled_back.status.success());

    let edited = showroom(
        dir.path(),
        &["edit-booking", &booking_id, "--advance", "100000"],
    );
    assert!(edited.status.success(), "{:?}", edited);

    let bookings = json_stdout(&showroom(dir.path(), &["bookings", "--json"]));
    assert_eq!(bookings[0]["booking_no"], "11000");
    assert_eq!(bookings[0]["advance"], 100000.0);
    assert_eq!(bookings[0]["delivered"], false);
}

#[test]
fn test_account_ledger_lists_newest_first() {
    let dir = tempfile::tempdir().unwrap();

    assert!(showroom(
        dir.path(),
        &["account", "add", "Opening balance", "--credit", "500000"]
    )
    .status
    .success());
    assert!(
        showroom(dir.path(), &["account", "add", "Fuel", "--debit", "4000"])
            .status
            .success()
    );

    let entries = json_stdout(&showroom(dir.path(), &["account", "list", "--json"]));
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["description"], "Fuel");
    assert_eq!(entries[1]["credit"], 500000.0);
}
