use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::Utc;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use showroom_core::documents::{DocumentKind, DocumentService};
use showroom_core::pdf::{self, CoordinateMap, FieldValues, Position};
use showroom_core::store::SoldBike;
use showroom_core::ShowroomError;

/// Build a minimal template PDF with the requested number of pages.
fn build_template(path: &Path, page_count: usize) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids: Vec<Object> = Vec::new();
    for index in 0..page_count {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 12.into()]),
                Operation::new("Td", vec![72.into(), 810.into()]),
                Operation::new(
                    "Tj",
                    vec![Object::string_literal(format!("Template page {}", index + 1))],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            "Resources" => resources_id,
        });
        kids.push(page_id.into());
    }

    let count = page_count as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);
    doc.save(path).expect("save template");
}

fn page_content(doc: &Document, page_number: u32) -> String {
    let pages = doc.get_pages();
    let page_id = *pages.get(&page_number).expect("page present");
    String::from_utf8_lossy(&doc.get_page_content(page_id).expect("page content")).into_owned()
}

#[test]
fn test_render_places_text_at_mapped_positions() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("invoice.pdf");
    build_template(&template, 1);

    let mut positions = HashMap::new();
    positions.insert("customer_name".to_string(), Position::new(90.0, 712.0));
    positions.insert("sold_price".to_string(), Position::new(320.0, 432.0));
    let map = CoordinateMap::new(positions, Position::new(40.0, 642.0));

    let mut fields = FieldValues::new();
    fields.insert("customer_name".to_string(), "Ali Khan".to_string());
    fields.insert("sold_price".to_string(), "350000".to_string());

    let out = dir.path().join("out").join("invoice_test.pdf");
    pdf::render(&template, &map, &fields, &out).expect("render");

    let rendered = Document::load(&out).expect("load output");
    assert_eq!(rendered.get_pages().len(), 1);

    let content = page_content(&rendered, 1);
    assert!(content.contains("Template page 1"), "{}", content);
    assert!(content.contains("Ali Khan"), "{}", content);
    // currency formatting applied at the mapped position
    assert!(content.contains("350,000"), "{}", content);
    assert!(content.contains("712"), "{}", content);
    assert!(content.contains("432"), "{}", content);
}

#[test]
fn test_overlay_lands_on_first_page_only() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("invoice.pdf");
    build_template(&template, 3);

    let map = CoordinateMap::new(HashMap::new(), Position::new(40.0, 642.0));
    let mut fields = FieldValues::new();
    fields.insert("customer_name".to_string(), "Ali Khan".to_string());

    let out = dir.path().join("invoice_multi.pdf");
    pdf::render(&template, &map, &fields, &out).expect("render");

    let rendered = Document::load(&out).expect("load output");
    assert_eq!(rendered.get_pages().len(), 3);

    assert!(page_content(&rendered, 1).contains("Ali Khan"));
    for page in 2..=3 {
        let content = page_content(&rendered, page);
        assert!(content.contains(&format!("Template page {}", page)));
        assert!(!content.contains("Ali Khan"));
    }
}

#[test]
fn test_checkbox_is_drawn_and_ticked() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("invoice.pdf");
    build_template(&template, 1);

    let mut positions = HashMap::new();
    positions.insert("gate_pass".to_string(), Position::new(110.0, 404.0));
    let map = CoordinateMap::new(positions, Position::new(40.0, 642.0));

    let mut fields = FieldValues::new();
    fields.insert("gate_pass".to_string(), "YES".to_string());

    let out = dir.path().join("gatepass.pdf");
    pdf::render(&template, &map, &fields, &out).expect("render");

    let rendered = Document::load(&out).expect("load output");
    let content = page_content(&rendered, 1);
    assert!(content.contains("12 12 re"), "{}", content);
    // the tick strokes a path beyond the box outline
    assert!(content.contains(" m"), "{}", content);
}

#[test]
fn test_missing_template_fails_and_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("absent.pdf");
    let out_dir = dir.path().join("out");
    let out = out_dir.join("invoice.pdf");

    let map = CoordinateMap::new(HashMap::new(), Position::new(40.0, 642.0));
    let err = pdf::render(&template, &map, &FieldValues::new(), &out).unwrap_err();

    match err {
        ShowroomError::TemplateNotFound(path) => assert_eq!(path, template),
        other => panic!("expected TemplateNotFound, got {:?}", other),
    }
    assert!(!out_dir.exists());
}

#[test]
fn test_no_scratch_files_survive_a_successful_render() {
    let dir = tempfile::tempdir().unwrap();
    let template = dir.path().join("invoice.pdf");
    build_template(&template, 1);

    let map = CoordinateMap::new(HashMap::new(), Position::new(40.0, 642.0));
    let mut fields = FieldValues::new();
    fields.insert("customer_name".to_string(), "Ali Khan".to_string());

    let out_dir = dir.path().join("out");
    let out = out_dir.join("invoice.pdf");
    pdf::render(&template, &map, &fields, &out).expect("render");

    let names: Vec<String> = fs::read_dir(&out_dir)
        .expect("read dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["invoice.pdf".to_string()]);
}

#[test]
fn test_document_service_writes_invoice_with_deterministic_name() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    build_template(&assets.join("invoice.pdf"), 1);

    let service = DocumentService::new(&assets, dir.path().join("out"));
    let sold = SoldBike {
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
    };

    let path = service.write_invoice(&sold).expect("write invoice");
    assert_eq!(
        path,
        service.output_path(DocumentKind::Invoice, "INV-3-1733412345")
    );
    assert!(path.exists());

    let rendered = Document::load(&path).expect("load output");
    let content = page_content(&rendered, 1);
    assert!(content.contains("Ali Khan"));
    assert!(content.contains("INV-3-1733412345"));
    // multi-line address drawn as stacked lines
    assert!(content.contains("House 12"));
    assert!(content.contains("Karachi"));
}

#[test]
fn test_booking_letter_uses_sidecar_coordinates() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();
    build_template(&assets.join("booking_letter.pdf"), 1);
    fs::write(
        assets.join("booking_coords.json"),
        r#"{"booking_no": [445.0, 778.0], "name": [90.0, 712.0]}"#,
    )
    .unwrap();

    let service = DocumentService::new(&assets, dir.path().join("out"));
    let booking = showroom_core::store::Booking {
        id: 1,
        booking_no: "11000".to_string(),
        booking_date: "2026-08-07".to_string(),
        name: "Ali Khan".to_string(),
        so: String::new(),
        cnic: "42201-0000000-1".to_string(),
        phone: String::new(),
        brand: "Suzuki".to_string(),
        model: "GS150".to_string(),
        colour: "Black".to_string(),
        specifications: String::new(),
        total_amount: 350000.0,
        advance: 50000.0,
        balance: 300000.0,
        delivery_date: String::new(),
        delivered: false,
    };

    let path = service.write_booking_letter(&booking).expect("write letter");
    assert_eq!(
        path,
        service.output_path(DocumentKind::BookingLetter, "11000")
    );

    let rendered = Document::load(&path).expect("load output");
    let content = page_content(&rendered, 1);
    assert!(content.contains("11000"), "{}", content);
    // amounts pick up thousands separators
    assert!(content.contains("350,000"), "{}", content);
    assert!(content.contains("50,000"), "{}", content);
}

#[test]
fn test_missing_invoice_template_reports_template_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir_all(&assets).unwrap();

    let service = DocumentService::new(&assets, dir.path().join("out"));
    let booking = showroom_core::store::Booking {
        id: 1,
        booking_no: "11000".to_string(),
        booking_date: "2026-08-07".to_string(),
        name: "Ali Khan".to_string(),
        so: String::new(),
        cnic: "42201-0000000-1".to_string(),
        phone: String::new(),
        brand: "Suzuki".to_string(),
        model: "GS150".to_string(),
        colour: "Black".to_string(),
        specifications: String::new(),
        total_amount: 350000.0,
        advance: 50000.0,
        balance: 300000.0,
        delivery_date: String::new(),
        delivered: false,
    };

    let err = service.write_booking_letter(&booking).unwrap_err();
    assert!(
        matches!(err, ShowroomError::TemplateNotFound(_)),
        "{:?}",
        err
    );
}
