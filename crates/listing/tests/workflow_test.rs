//! Integration tests for the upload → map → validate workflow.

use std::io::Write;

use rust_xlsxwriter::{Formula, Workbook};
use tempfile::{Builder, NamedTempFile, TempDir};

use listing::{
    AttributeRule, AttributeSchema, CellValue, FileFormat, ListingError, MappingRules, Page,
    Parser, Workbench, WorkbenchConfig,
};

/// Helper to create a temporary file with given content and extension.
fn create_test_file(content: &str, suffix: &str) -> NamedTempFile {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write to temp file");
    file
}

fn open_workbench(dir: &TempDir) -> Workbench {
    Workbench::open(WorkbenchConfig::new(dir.path())).expect("Failed to open workbench")
}

fn marketplace_schema() -> AttributeSchema {
    AttributeSchema::from_json(
        r#"{
            "title": {"type": "string", "max_length": 20},
            "mrp": {"type": "number", "min": 0},
            "price": {"type": "number", "min": 0},
            "color": {"type": "string", "enum": ["Red", "Blue", "Green"]},
            "stock": {"type": "integer", "min": 0}
        }"#,
    )
    .expect("Failed to parse schema")
}

fn seller_mapping() -> MappingRules {
    MappingRules::new()
        .with("title", "Name")
        .with("mrp", "MRP")
        .with("price", "Selling Price")
        .with("color", "Colour")
        .with("stock", "Qty")
}

/// Build an xlsx workbook in memory.
fn xlsx_bytes(headers: &[&str], rows: &[(&str, f64, f64, &str, f64)]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, (name, mrp, price, colour, qty)) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, *name).unwrap();
        sheet.write_number(r, 1, *mrp).unwrap();
        sheet.write_number(r, 2, *price).unwrap();
        sheet.write_string(r, 3, *colour).unwrap();
        sheet.write_number(r, 4, *qty).unwrap();
    }

    workbook.save_to_buffer().unwrap()
}

// =============================================================================
// End-to-end Tests
// =============================================================================

#[test]
fn test_csv_workflow_collects_every_error() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let template = wb.create_template("Myntra", marketplace_schema()).unwrap();

    let csv = "Name,MRP,Selling Price,Colour,Qty\n\
               Classic Tee,999,799,Red,10\n\
               A title that is far too long,abc,100,Purple,2.5\n\
               ,500,600,Blue,-1\n\
               Polo,NA,300,Green,4\n";
    let upload = wb.upload_file("seller.csv", csv.as_bytes()).unwrap();
    assert_eq!(upload.total_rows, 4);
    assert_eq!(upload.preview.len(), 4);

    let mapping = wb
        .create_mapping(template.id, upload.id, seller_mapping())
        .unwrap();
    let result = wb.validate_mapping(mapping.id).unwrap();
    let report = &result.report;

    assert_eq!(report.total_rows, 4);
    assert_eq!(report.valid_rows, 1);
    assert_eq!(report.invalid_rows_count, 3);

    let second = &report.sample_invalid_rows[0];
    assert_eq!(second.row_index, 1);
    assert_eq!(
        second.errors,
        vec![
            "'title' exceeds max length of 20.",
            "'mrp' must be a valid number.",
            "'color' value 'Purple' is not in allowed values: ['Red', 'Blue', 'Green'].",
            "'stock' must be an integer.",
        ]
    );

    let third = &report.sample_invalid_rows[1];
    assert_eq!(
        third.errors,
        vec![
            "Attribute 'title' is required but value is empty.",
            "'stock' must be >= 0.",
            "Price (600) cannot be greater than MRP (500).",
        ]
    );
    assert!(!third.data.contains_key("Name"));

    let fourth = &report.sample_invalid_rows[2];
    assert_eq!(
        fourth.errors,
        vec!["Attribute 'mrp' is required but value is empty."]
    );
}

#[test]
fn test_xlsx_workflow() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let template = wb.create_template("Ajio", marketplace_schema()).unwrap();

    let bytes = xlsx_bytes(
        &["Name", "MRP", "Selling Price", "Colour", "Qty"],
        &[
            ("Val1", 500.0, 400.0, "Red", 3.0),
            ("Inv1", 200.0, 300.0, "Blue", 1.0),
        ],
    );
    let upload = wb.upload_file("catalog.xlsx", &bytes).unwrap();
    assert_eq!(upload.headers, vec!["Name", "MRP", "Selling Price", "Colour", "Qty"]);
    assert_eq!(upload.total_rows, 2);
    assert_eq!(upload.preview[0].get("Name"), Some(&CellValue::from("Val1")));

    let file = wb.get_file(upload.id).unwrap();
    assert_eq!(file.format, FileFormat::Xlsx);

    let mapping = wb
        .create_mapping(template.id, upload.id, seller_mapping())
        .unwrap();
    let result = wb.validate_mapping(mapping.id).unwrap();

    assert_eq!(result.report.valid_rows, 1);
    assert_eq!(result.report.invalid_rows_count, 1);
    assert_eq!(
        result.report.sample_invalid_rows[0].errors,
        vec!["Price (300) cannot be greater than MRP (200)."]
    );
}

#[test]
fn test_unmapped_attribute_reported_on_every_row() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let schema = AttributeSchema::new()
        .with_attribute("title", AttributeRule::string())
        .with_attribute("brand", AttributeRule::string());
    let template = wb.create_template("Flipkart", schema).unwrap();
    let upload = wb
        .upload_file("items.tsv", b"Name\tBrandName\nShirt\tAcme\nShoe\tAcme\n")
        .unwrap();
    let mapping = wb
        .create_mapping(template.id, upload.id, MappingRules::new().with("title", "Name"))
        .unwrap();

    let report = wb.validate_mapping(mapping.id).unwrap().report;
    assert_eq!(report.invalid_rows_count, 2);
    for row in &report.sample_invalid_rows {
        assert_eq!(row.errors, vec!["Missing mapping for required attribute: brand"]);
    }
}

#[test]
fn test_same_filename_uploads_are_independent() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let schema = AttributeSchema::new().with_attribute("price", AttributeRule::number());
    let template = wb.create_template("Nykaa", schema).unwrap();

    let first = wb.upload_file("products.csv", b"Price\n10\n").unwrap();
    let second = wb.upload_file("products.csv", b"Price\nfree\n").unwrap();
    assert_ne!(first.id, second.id);

    let rules = MappingRules::new().with("price", "Price");
    let m1 = wb.create_mapping(template.id, first.id, rules.clone()).unwrap();
    let m2 = wb.create_mapping(template.id, second.id, rules).unwrap();

    assert!(wb.validate_mapping(m1.id).unwrap().report.is_clean());
    assert_eq!(wb.validate_mapping(m2.id).unwrap().report.invalid_rows_count, 1);
}

#[test]
fn test_catalog_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let mapping_id = {
        let mut wb = open_workbench(&dir);
        let template = wb.create_template("Meesho", marketplace_schema()).unwrap();
        let upload = wb
            .upload_file("s.csv", b"Name,MRP,Selling Price,Colour,Qty\nTee,10,5,Red,1\n")
            .unwrap();
        wb.create_mapping(template.id, upload.id, seller_mapping())
            .unwrap()
            .id
    };

    let wb = open_workbench(&dir);
    assert_eq!(wb.list_templates(Page::default()).len(), 1);
    assert!(wb.validate_mapping(mapping_id).unwrap().report.is_clean());
}

#[test]
fn test_duplicate_template_name_conflicts() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    wb.create_template("Myntra", AttributeSchema::new()).unwrap();
    let err = wb.create_template("Myntra", AttributeSchema::new()).unwrap_err();
    assert!(matches!(err, ListingError::Conflict(_)));
}

#[test]
fn test_listing_pagination() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    for i in 0..5 {
        wb.create_template(&format!("T{}", i), AttributeSchema::new()).unwrap();
    }

    let page = wb.list_templates(Page::new(1, 2));
    let names: Vec<&str> = page.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["T1", "T2"]);
    assert!(wb.list_templates(Page::new(10, 2)).is_empty());
}

// =============================================================================
// Spreadsheet Edge Cases
// =============================================================================

/// Cell kinds written into generated workbooks.
enum Cell {
    Text(&'static str),
    Number(f64),
    Bool(bool),
    Error(&'static str, &'static str),
    Blank,
}

/// Build an xlsx workbook from a header row and typed cells.
fn sheet_bytes(headers: &[&str], rows: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }
    for (i, cells) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (c, cell) in cells.iter().enumerate() {
            let c = c as u16;
            match cell {
                Cell::Text(t) => {
                    sheet.write_string(r, c, *t).unwrap();
                }
                Cell::Number(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                Cell::Bool(b) => {
                    sheet.write_boolean(r, c, *b).unwrap();
                }
                Cell::Error(formula, result) => {
                    sheet
                        .write_formula(r, c, Formula::new(*formula).set_result(*result))
                        .unwrap();
                }
                Cell::Blank => {}
            }
        }
    }

    workbook.save_to_buffer().unwrap()
}

fn validate_sheet(
    headers: &[&str],
    rows: &[Vec<Cell>],
    schema: AttributeSchema,
    mapping: MappingRules,
) -> listing::ValidationReport {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let template = wb.create_template("Sheet", schema).unwrap();
    let upload = wb
        .upload_file("sheet.xlsx", &sheet_bytes(headers, rows))
        .unwrap();
    let mapping = wb.create_mapping(template.id, upload.id, mapping).unwrap();
    wb.validate_mapping(mapping.id).unwrap().report
}

#[test]
fn test_xlsx_blank_row_is_skipped() {
    let rows = vec![
        vec![Cell::Text("A"), Cell::Number(10.0)],
        vec![Cell::Blank, Cell::Blank],
        vec![Cell::Text("B"), Cell::Number(20.0)],
    ];
    let schema = AttributeSchema::new()
        .with_attribute("title", AttributeRule::string())
        .with_attribute("price", AttributeRule::number());
    let mapping = MappingRules::new().with("title", "Item").with("price", "Cost");

    let report = validate_sheet(&["Item", "Cost"], &rows, schema, mapping);
    assert_eq!(report.total_rows, 2);
    assert!(report.is_clean());
}

#[test]
fn test_xlsx_empty_cell_is_required_error() {
    let rows = vec![
        vec![Cell::Text("A"), Cell::Blank, Cell::Text("Red")],
        vec![Cell::Text("B"), Cell::Number(5.0), Cell::Text("Blue")],
    ];
    let schema = AttributeSchema::new()
        .with_attribute("title", AttributeRule::string())
        .with_attribute("price", AttributeRule::number())
        .with_attribute("color", AttributeRule::string());
    let mapping = MappingRules::new()
        .with("title", "Item")
        .with("price", "Cost")
        .with("color", "Hue");

    let report = validate_sheet(&["Item", "Cost", "Hue"], &rows, schema, mapping);
    assert_eq!(report.total_rows, 2);
    assert_eq!(report.invalid_rows_count, 1);
    assert_eq!(
        report.sample_invalid_rows[0].errors,
        vec!["Attribute 'price' is required but value is empty."]
    );
    assert!(!report.sample_invalid_rows[0].data.contains_key("Cost"));
}

#[test]
fn test_xlsx_error_cell_fails_number_check() {
    let rows = vec![vec![Cell::Text("A"), Cell::Error("=1/0", "#DIV/0!")]];
    let schema = AttributeSchema::new()
        .with_attribute("title", AttributeRule::string())
        .with_attribute("price", AttributeRule::number());
    let mapping = MappingRules::new().with("title", "Item").with("price", "Cost");

    let report = validate_sheet(&["Item", "Cost"], &rows, schema, mapping);
    assert_eq!(
        report.sample_invalid_rows[0].errors,
        vec!["'price' must be a valid number."]
    );
}

#[test]
fn test_xlsx_boolean_cells() {
    let rows = vec![vec![Cell::Bool(true), Cell::Bool(true)]];
    let schema = AttributeSchema::new()
        .with_attribute("n", AttributeRule::number().with_min(1.0))
        .with_attribute("s", AttributeRule::string().with_allowed(["True", "False"]));
    let mapping = MappingRules::new().with("n", "Flag").with("s", "Label");

    let report = validate_sheet(&["Flag", "Label"], &rows, schema, mapping);
    assert!(report.is_clean(), "{:?}", report.sample_invalid_rows);
}

// =============================================================================
// Upload Rejection Tests
// =============================================================================

#[test]
fn test_unsupported_extension_rejected() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let err = wb.upload_file("notes.txt", b"hello").unwrap_err();
    assert!(matches!(err, ListingError::UnsupportedFormat(_)));
    assert!(wb.list_files(Page::default()).is_empty());
}

#[test]
fn test_corrupt_workbook_rejected() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let err = wb.upload_file("broken.xlsx", b"not a zip archive").unwrap_err();
    assert!(err.is_parse_failure());
}

#[test]
fn test_empty_csv_rejected() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let err = wb.upload_file("empty.csv", b"").unwrap_err();
    assert!(matches!(err, ListingError::EmptyData(_)));
}

// =============================================================================
// Parser Tests
// =============================================================================

#[test]
fn test_parse_file_from_disk() {
    let file = create_test_file("sku;name\n1;Tee\n", ".csv");
    let (table, meta) = Parser::new().parse_file(file.path()).unwrap();

    // Default delimiter for .csv is a comma
    assert_eq!(table.headers, vec!["sku;name"]);
    assert_eq!(meta.row_count, 1);
    assert!(meta.hash.starts_with("sha256:"));
}

#[test]
fn test_header_only_file_has_no_rows() {
    let dir = TempDir::new().unwrap();
    let mut wb = open_workbench(&dir);

    let upload = wb.upload_file("headers.csv", b"Name,MRP\n").unwrap();
    assert_eq!(upload.total_rows, 0);
    assert!(upload.preview.is_empty());
}
