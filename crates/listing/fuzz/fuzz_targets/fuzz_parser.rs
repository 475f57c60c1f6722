//! Fuzz target for the tabular parser and dataset validator.
//!
//! The parser must never panic on malformed input, for any supported format,
//! and every table it accepts must validate without panicking.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use listing::{AttributeRule, AttributeSchema, DatasetValidator, MappingRules, Parser};

#[derive(Arbitrary, Debug)]
enum Extension {
    Csv,
    Tsv,
    Xlsx,
    Xls,
    Ods,
}

#[derive(Arbitrary, Debug)]
struct Input {
    extension: Extension,
    bytes: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Only process reasonable-sized inputs to avoid OOM
    if input.bytes.len() > 100_000 {
        return;
    }

    let filename = match input.extension {
        Extension::Csv => "fuzz.csv",
        Extension::Tsv => "fuzz.tsv",
        Extension::Xlsx => "fuzz.xlsx",
        Extension::Xls => "fuzz.xls",
        Extension::Ods => "fuzz.ods",
    };

    let Ok((table, _)) = Parser::new().parse_bytes(filename, &input.bytes) else {
        return;
    };

    // Map the first header onto every attribute kind
    let Some(column) = table.headers.first() else {
        return;
    };
    let schema = AttributeSchema::new()
        .with_attribute("text", AttributeRule::string().with_max_length(5))
        .with_attribute("price", AttributeRule::number().with_min(0.0))
        .with_attribute("mrp", AttributeRule::integer());
    let mapping = MappingRules::new()
        .with("text", column.as_str())
        .with("price", column.as_str())
        .with("mrp", column.as_str());

    let report = DatasetValidator::new().validate(&table, &mapping, &schema);
    assert_eq!(report.valid_rows + report.invalid_rows_count, report.total_rows);
});
