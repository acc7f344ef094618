use sheetrecon::lookup::LookupCatalog;
use sheetrecon::reader::{read_workbook, read_workbook_from_bytes, sheet_names_from_bytes};
use sheetrecon::report::render_text;
use sheetrecon::{
    AnchorOrigin, CellAddress, CellValue, DataSource, ReconcileConfig, ReconcileError,
    ReconcileRequest, Reconciler, StartCoordinates, StatementCategory,
};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

enum Value {
    Number(f64),
    Text(&'static str),
}

/// (reference, value, style id); see `YELLOW_STYLE` and `DATE_STYLE`
type CellFixture = (&'static str, Value, u32);

/// Solid yellow fill
const YELLOW_STYLE: u32 = 1;
/// Built-in short date format (numFmtId 14)
const DATE_STYLE: u32 = 2;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<fonts count="1"><font><sz val="11"/><name val="Calibri"/></font></fonts>
<fills count="3">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
<fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>
</fills>
<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>
<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>
<cellXfs count="3">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;

fn sheet_xml(cells: &[CellFixture]) -> String {
    let mut rows: BTreeMap<u32, String> = BTreeMap::new();
    for (reference, value, style) in cells {
        let address = CellAddress::parse(reference).unwrap();
        let style = if *style > 0 {
            format!(r#" s="{}""#, style)
        } else {
            String::new()
        };
        let cell = match value {
            Value::Number(n) => format!(r#"<c r="{}"{}><v>{}</v></c>"#, reference, style, n),
            Value::Text(s) => format!(
                r#"<c r="{}"{} t="inlineStr"><is><t>{}</t></is></c>"#,
                reference, style, s
            ),
        };
        rows.entry(address.row_number()).or_default().push_str(&cell);
    }

    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (row, cells) in rows {
        xml.push_str(&format!(r#"<row r="{}">{}</row>"#, row, cells));
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

// Helper to create a minimal valid XLSX document in memory
fn create_mock_xlsx(sheets: &[(&str, &[CellFixture])]) -> anyhow::Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

        zip.start_file("[Content_Types].xml", options)?;
        let mut content_types = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
"#,
        );
        for i in 0..sheets.len() {
            content_types.push_str(&format!(
                r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
                i + 1
            ));
        }
        content_types.push_str("</Types>");
        zip.write_all(content_types.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
</Relationships>"#.as_bytes())?;

        zip.start_file("xl/workbook.xml", options)?;
        let mut workbook_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
<sheets>"#,
        );
        for (i, (name, _)) in sheets.iter().enumerate() {
            workbook_xml.push_str(&format!(
                r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
                name,
                i + 1,
                i + 1
            ));
        }
        workbook_xml.push_str("</sheets></workbook>");
        zip.write_all(workbook_xml.as_bytes())?;

        zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        let mut rels_xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
"#,
        );
        for i in 0..sheets.len() {
            rels_xml.push_str(&format!(
                r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
                i + 1,
                i + 1
            ));
        }
        rels_xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#,
            sheets.len() + 1
        ));
        rels_xml.push_str("</Relationships>");
        zip.write_all(rels_xml.as_bytes())?;

        zip.start_file("xl/styles.xml", options)?;
        zip.write_all(STYLES.as_bytes())?;

        for (i, (_, cells)) in sheets.iter().enumerate() {
            zip.start_file(format!("xl/worksheets/sheet{}.xml", i + 1), options)?;
            zip.write_all(sheet_xml(cells).as_bytes())?;
        }

        zip.finish()?;
    }
    Ok(buf)
}

fn income_model() -> Vec<CellFixture> {
    vec![
        ("A1", Value::Text("Company X"), 0),
        ("C2", Value::Text("2022"), 0),
        ("D2", Value::Text("2023F"), 0),
        ("B4", Value::Text("Выручка"), 0),
        ("C4", Value::Number(1000.0), 0),
        ("D4", Value::Number(1100.0), 0),
        ("B5", Value::Text("Маржа, %"), 0),
        ("C5", Value::Number(12.7), 0),
        ("B6", Value::Text("Себестоимость"), YELLOW_STYLE),
        ("C6", Value::Number(500.9), 0),
        ("B7", Value::Text("Чистая прибыль"), 0),
        ("C7", Value::Number(120.4), 0),
    ]
}

fn income_issuer() -> Vec<CellFixture> {
    vec![
        ("A1", Value::Text("Item"), 0),
        ("B1", Value::Text("2021"), 0),
        ("C1", Value::Text("2022"), 0),
        ("A2", Value::Text("Revenue"), 0),
        ("B2", Value::Number(900.0), 0),
        ("C2", Value::Number(1000.0), 0),
        ("A3", Value::Text("Margin"), 0),
        ("B3", Value::Number(11.0), 0),
        ("C3", Value::Number(12.2), 0),
        ("A4", Value::Text("Cost of sales"), 0),
        ("B4", Value::Number(450.0), 0),
        ("C4", Value::Number(500.2), 0),
        ("A5", Value::Text("Net income"), 0),
        ("B5", Value::Number(100.0), 0),
        ("C5", Value::Number(120.9), 0),
    ]
}

const INCOME_TABLE: &str = r#"
["XLSX statements"]
"Выручка" = """
revenue
total revenue"""
"чистая прибыль" = ["net income", "profit for the year"]
"Прибыль" = "net income attributable to shareholders"
"#;

#[test]
fn test_read_values_and_fills() {
    let model = income_model();
    let issuer = income_issuer();
    let bytes =
        create_mock_xlsx(&[("Финрез", model.as_slice()), ("page-4-table-1", issuer.as_slice())])
            .unwrap();

    assert_eq!(
        sheet_names_from_bytes(&bytes).unwrap(),
        vec!["Финрез", "page-4-table-1"]
    );

    let workbook = read_workbook_from_bytes(&bytes).unwrap();
    let sheet = workbook.sheet("Финрез").unwrap();
    assert_eq!(sheet.value(3, 1), &CellValue::Text("Выручка".to_string()));
    assert_eq!(sheet.value(5, 2).as_number(), Some(500.9));
    assert!(sheet.get_cell(5, 1).unwrap().has_fill("FFFFFF00"));
    assert!(!sheet.get_cell(3, 1).unwrap().has_fill("FFFFFF00"));

    assert_eq!(
        workbook.sheet("Missing").unwrap_err(),
        ReconcileError::SheetNotFound("Missing".to_string())
    );
}

#[test]
fn test_end_to_end_reconciliation() {
    let dir = tempfile::tempdir().unwrap();
    let model = income_model();
    let issuer = income_issuer();
    let bytes =
        create_mock_xlsx(&[("Финрез", model.as_slice()), ("page-4-table-1", issuer.as_slice())])
            .unwrap();
    let path = dir.path().join("model.xlsx");
    std::fs::write(&path, &bytes).unwrap();

    let lookup_dir = dir.path().join("data");
    std::fs::create_dir(&lookup_dir).unwrap();
    std::fs::write(lookup_dir.join("income_config.toml"), INCOME_TABLE).unwrap();

    let config = ReconcileConfig {
        lookup_dir,
        ..ReconcileConfig::default()
    };
    let reconciler = Reconciler::with_config(config).unwrap();

    let workbook = read_workbook(&path).unwrap();
    assert_eq!(workbook.path, path);
    let model = workbook.sheet("Финрез").unwrap();
    let issuer = workbook.sheet("page-4-table-1").unwrap();

    let start = reconciler.suggest_start(model, issuer).unwrap();
    assert_eq!(start.origin, AnchorOrigin::Matched);
    assert_eq!(start.model.to_string(), "C4");
    assert_eq!(start.issuer.to_string(), "C2");

    let result = reconciler
        .reconcile(&ReconcileRequest {
            model,
            issuer,
            start,
            category: StatementCategory::IncomeStatement,
            source: DataSource::Xlsx,
        })
        .unwrap();

    // percentage and yellow-filled rows are left out
    let labels: Vec<&str> = result
        .equivalents
        .iter()
        .map(|e| e.model_label.as_str())
        .collect();
    assert_eq!(labels, vec!["Выручка", "Чистая прибыль"]);
    assert_eq!(result.equivalents[1].issuer_cell.to_string(), "C5");

    let enriched = result.enriched.unwrap();
    assert_eq!(
        render_text(&enriched),
        "Выручка = Revenue\nNo rename needed\n\n\
         Чистая прибыль = Net income\nRename to:\nЧистая прибыль\nПрибыль"
    );

    // other categories have no table in this directory
    let missing = reconciler
        .reconcile(&ReconcileRequest {
            model,
            issuer,
            start,
            category: StatementCategory::CashFlow,
            source: DataSource::Xlsx,
        })
        .unwrap();
    assert_eq!(missing.equivalents, result.equivalents);
    assert!(matches!(
        missing.enriched,
        Err(ReconcileError::ConfigurationMissing { .. })
    ));
}

#[test]
fn test_empty_label_on_balance_sheet() {
    let model: Vec<CellFixture> = vec![
        ("B1", Value::Text("Статья"), 0),
        ("C1", Value::Text("2021"), 0),
        ("D1", Value::Text("2022"), 0),
        ("B4", Value::Text("Денежные средства"), 0),
        ("C4", Value::Number(50.0), 0),
        ("D4", Value::Number(75.0), 0),
        ("B5", Value::Text(""), 0),
        ("C5", Value::Number(30.0), 0),
        ("D5", Value::Number(40.0), 0),
    ];
    let issuer: Vec<CellFixture> = vec![
        ("A1", Value::Text("Item"), 0),
        ("B1", Value::Text("2022"), 0),
        ("A2", Value::Text("Cash"), 0),
        ("B2", Value::Number(75.0), 0),
        ("A3", Value::Text("Inventories"), 0),
        ("B3", Value::Number(40.0), 0),
    ];
    let bytes =
        create_mock_xlsx(&[("Баланс", model.as_slice()), ("Issuer", issuer.as_slice())]).unwrap();
    let workbook = read_workbook_from_bytes(&bytes).unwrap();
    let model = workbook.sheet("Баланс").unwrap();
    let issuer = workbook.sheet("Issuer").unwrap();

    let reconciler =
        Reconciler::with_catalog(ReconcileConfig::default(), LookupCatalog::new()).unwrap();
    let start = reconciler.suggest_start(model, issuer).unwrap();
    assert_eq!(start.model.to_string(), "D4");
    assert_eq!(start.issuer.to_string(), "B2");

    let err = reconciler
        .reconcile(&ReconcileRequest {
            model,
            issuer,
            start,
            category: StatementCategory::BalanceSheet,
            source: DataSource::Xbrl,
        })
        .unwrap_err();
    assert_eq!(
        err,
        ReconcileError::EmptyLabelInModel {
            address: "B5".parse().unwrap()
        }
    );
}

#[test]
fn test_fallback_when_no_value_is_shared() {
    let model: Vec<CellFixture> = vec![
        ("C2", Value::Text("2022"), 0),
        ("D2", Value::Text("2023П"), 0),
        ("B5", Value::Text("Выручка"), 0),
        ("C5", Value::Number(10.0), 0),
    ];
    let issuer: Vec<CellFixture> = vec![
        ("A1", Value::Text("Item"), 0),
        ("B2", Value::Number(0.0), 0),
        ("B3", Value::Number(99.0), 0),
    ];
    let bytes =
        create_mock_xlsx(&[("P&amp;L", model.as_slice()), ("Issuer", issuer.as_slice())]).unwrap();
    let workbook = read_workbook_from_bytes(&bytes).unwrap();

    let reconciler =
        Reconciler::with_catalog(ReconcileConfig::default(), LookupCatalog::new()).unwrap();
    let start = reconciler
        .suggest_start(
            workbook.sheet("P&L").unwrap(),
            workbook.sheet("Issuer").unwrap(),
        )
        .unwrap();
    assert_eq!(start.origin, AnchorOrigin::Fallback);
    assert_eq!(start.model.to_string(), "C4");
    assert_eq!(start.issuer.to_string(), "B3");
}

#[test]
fn test_dates_are_read_apart_from_numbers() {
    let model: Vec<CellFixture> = vec![
        ("D2", Value::Number(44926.0), DATE_STYLE),
        ("B4", Value::Text("Денежные средства"), 0),
        ("D4", Value::Number(75.0), 0),
    ];
    let issuer: Vec<CellFixture> = vec![
        ("B1", Value::Number(44926.0), DATE_STYLE),
        ("A2", Value::Text("Cash"), 0),
        ("B2", Value::Number(75.0), 0),
    ];
    let bytes =
        create_mock_xlsx(&[("Баланс", model.as_slice()), ("Issuer", issuer.as_slice())]).unwrap();
    let workbook = read_workbook_from_bytes(&bytes).unwrap();
    let model = workbook.sheet("Баланс").unwrap();
    let issuer = workbook.sheet("Issuer").unwrap();

    assert_eq!(model.value(1, 3), &CellValue::DateTime(44926.0));
    assert_eq!(model.value(1, 3).as_number(), None);
    assert_eq!(model.value(3, 3).as_number(), Some(75.0));

    // the shared date header does not anchor the comparison
    let reconciler =
        Reconciler::with_catalog(ReconcileConfig::default(), LookupCatalog::new()).unwrap();
    let start = reconciler.suggest_start(model, issuer).unwrap();
    assert_eq!(start.origin, AnchorOrigin::Matched);
    assert_eq!(start.model.to_string(), "D4");
    assert_eq!(start.issuer.to_string(), "B2");

    let result = reconciler
        .reconcile(&ReconcileRequest {
            model,
            issuer,
            start,
            category: StatementCategory::BalanceSheet,
            source: DataSource::Xbrl,
        })
        .unwrap();
    assert_eq!(result.equivalents.len(), 1);
    assert_eq!(result.equivalents[0].model_label, "Денежные средства");
    assert_eq!(result.equivalents[0].issuer_label, "Cash");
}

#[test]
fn test_text_values_match_text() {
    let model: Vec<CellFixture> = vec![
        ("B4", Value::Text("Выручка"), 0),
        ("C4", Value::Number(1000.0), 0),
        ("B5", Value::Text("Прочее"), 0),
        ("C5", Value::Text("-"), 0),
    ];
    let issuer: Vec<CellFixture> = vec![
        ("A2", Value::Text("Revenue"), 0),
        ("B2", Value::Number(1000.0), 0),
        ("A3", Value::Text("Other"), 0),
        ("B3", Value::Text("-"), 0),
    ];
    let bytes =
        create_mock_xlsx(&[("Финрез", model.as_slice()), ("Issuer", issuer.as_slice())]).unwrap();
    let workbook = read_workbook_from_bytes(&bytes).unwrap();

    let reconciler =
        Reconciler::with_catalog(ReconcileConfig::default(), LookupCatalog::new()).unwrap();
    let start = StartCoordinates::manual("C4".parse().unwrap(), "B2".parse().unwrap());
    let equivalents = reconciler
        .match_rows(&ReconcileRequest {
            model: workbook.sheet("Финрез").unwrap(),
            issuer: workbook.sheet("Issuer").unwrap(),
            start,
            category: StatementCategory::IncomeStatement,
            source: DataSource::Xlsx,
        })
        .unwrap();

    let labels: Vec<&str> = equivalents.iter().map(|e| e.model_label.as_str()).collect();
    assert_eq!(labels, vec!["Выручка", "Прочее"]);
    assert_eq!(equivalents[1].issuer_label, "Other");
    assert_eq!(equivalents[1].issuer_cell.to_string(), "B3");
}
