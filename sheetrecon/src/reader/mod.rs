//! XLSX reader: cell values via calamine, fill colors via the package XML

use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use log::{debug, warn};
use std::io::Cursor;
use std::path::Path;
use zip::ZipArchive;

pub mod workbook;
pub mod xlsx_parser;

pub use workbook::{Cell, CellValue, Sheet, Workbook};

/// Read a workbook from a file path
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let mut workbook = read_workbook_from_bytes(&bytes)
        .with_context(|| format!("Failed to read workbook: {}", path.display()))?;
    workbook.path = path.to_path_buf();
    Ok(workbook)
}

/// Read a workbook from an in-memory XLSX document
pub fn read_workbook_from_bytes(bytes: &[u8]) -> Result<Workbook> {
    let mut excel: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("Failed to open XLSX workbook")?;
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("Failed to open zip archive")?;

    let style_fills = match xlsx_parser::parse_style_fills(&mut archive) {
        Ok(fills) => fills,
        Err(e) => {
            warn!("Failed to read cell styles, processed rows will not be skipped: {:#}", e);
            Vec::new()
        }
    };

    let mut sheets = Vec::new();
    for name in excel.sheet_names() {
        let range = excel
            .worksheet_range(&name)
            .with_context(|| format!("Failed to read sheet: {}", name))?;
        let mut sheet = parse_sheet(&name, &range);

        // Unreadable styles leave the sheet without fills
        let fills = xlsx_parser::get_xlsx_sheet_path(&mut archive, &name).and_then(|path| {
            xlsx_parser::extract_cell_fills(&mut archive, &path, &style_fills)
        });
        match fills {
            Ok(fills) => {
                for ((row, col), argb) in fills {
                    sheet.set_fill(row, col, argb);
                }
            }
            Err(e) => debug!("No fill colors for sheet '{}': {:#}", name, e),
        }

        debug!("Loaded sheet '{}' with {} cells", name, sheet.cells.len());
        sheets.push(sheet);
    }

    Ok(Workbook {
        path: Default::default(),
        sheets,
    })
}

/// Page names of an in-memory XLSX document
pub fn sheet_names_from_bytes(bytes: &[u8]) -> Result<Vec<String>> {
    let excel: Xlsx<_> =
        Xlsx::new(Cursor::new(bytes)).context("Failed to open XLSX workbook")?;
    Ok(excel.sheet_names())
}

fn parse_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let Some((start_row, start_col)) = range.start() else {
        return sheet;
    };

    for (rel_row, rel_col, data) in range.used_cells() {
        let row = start_row + rel_row as u32;
        let col = start_col + rel_col as u32;
        sheet.set_value(row, col, parse_cell_value(data));
    }

    sheet
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
