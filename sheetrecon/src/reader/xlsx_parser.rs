//! XML parsing of XLSX parts calamine does not expose: cell fill colors

use anyhow::{Context, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::HashMap;
use std::io::BufReader;
use zip::ZipArchive;

use crate::address::CellAddress;

/// Resolve sheet name to its XML path in the XLSX archive
pub fn get_xlsx_sheet_path(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
    sheet_name: &str,
) -> Result<String> {
    // 1. Get rId from xl/workbook.xml
    let mut rid = None;
    {
        let workbook_xml = archive
            .by_name("xl/workbook.xml")
            .context("Failed to find xl/workbook.xml")?;
        let mut reader = Reader::from_reader(BufReader::new(workbook_xml));
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"sheet" => {
                    let name = attribute(&e, b"name")?;
                    if name.as_deref() == Some(sheet_name) {
                        rid = attribute(&e, b"r:id")?;
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
    }

    let rid = rid.with_context(|| format!("Sheet '{}' not found in workbook.xml", sheet_name))?;

    // 2. Resolve rId in xl/_rels/workbook.xml.rels
    let mut target = None;
    {
        let rels_xml = archive
            .by_name("xl/_rels/workbook.xml.rels")
            .context("Failed to find xl/_rels/workbook.xml.rels")?;
        let mut reader = Reader::from_reader(BufReader::new(rels_xml));
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) | Event::Empty(e)
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    if attribute(&e, b"Id")?.as_deref() == Some(rid.as_str()) {
                        target = attribute(&e, b"Target")?;
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }
    }

    let target = target.with_context(|| {
        format!(
            "Relationship '{}' not found for sheet '{}'",
            rid, sheet_name
        )
    })?;

    // Targets are relative to xl/ unless they are absolute package paths
    Ok(match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{}", target),
    })
}

/// Fill color of every cell format (`cellXfs` entry), indexed by style id.
///
/// Only explicit ARGB foreground colors are reported; indexed and theme
/// colors resolve to `None`.
pub fn parse_style_fills(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
) -> Result<Vec<Option<String>>> {
    let styles_xml = match archive.by_name("xl/styles.xml") {
        Ok(file) => file,
        Err(_) => return Ok(Vec::new()),
    };

    let mut reader = Reader::from_reader(BufReader::new(styles_xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut fills: Vec<Option<String>> = Vec::new();
    let mut current_fill: Option<Option<String>> = None;
    let mut in_fills = false;
    let mut in_cell_xfs = false;
    let mut style_fills = Vec::new();

    loop {
        let event = reader.read_event_into(&mut buf)?;
        match &event {
            Event::Start(e) | Event::Empty(e) => {
                let is_empty = matches!(event, Event::Empty(_));
                match e.local_name().as_ref() {
                    b"fills" => in_fills = !is_empty,
                    b"fill" if in_fills => {
                        if is_empty {
                            fills.push(None);
                        } else {
                            current_fill = Some(None);
                        }
                    }
                    b"fgColor" => {
                        if let Some(fill) = current_fill.as_mut() {
                            *fill = attribute(e, b"rgb")?;
                        }
                    }
                    b"cellXfs" => in_cell_xfs = !is_empty,
                    b"xf" if in_cell_xfs => {
                        let fill = attribute(e, b"fillId")?
                            .and_then(|id| id.parse::<usize>().ok())
                            .and_then(|id| fills.get(id).cloned())
                            .flatten();
                        style_fills.push(fill);
                    }
                    _ => {}
                }
            }
            Event::End(e) => match e.local_name().as_ref() {
                b"fill" => {
                    if let Some(fill) = current_fill.take() {
                        fills.push(fill);
                    }
                }
                b"fills" => in_fills = false,
                b"cellXfs" => in_cell_xfs = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        drop(event);
        buf.clear();
    }

    Ok(style_fills)
}

/// Fill colors of the cells of one worksheet, keyed by 0-based (row, col).
///
/// Cells without a style, or whose style has no explicit fill color, are left out.
pub fn extract_cell_fills(
    archive: &mut ZipArchive<impl std::io::Read + std::io::Seek>,
    sheet_path: &str,
    style_fills: &[Option<String>],
) -> Result<HashMap<(u32, u32), String>> {
    let mut cell_fills = HashMap::new();
    if style_fills.iter().all(Option::is_none) {
        return Ok(cell_fills);
    }

    let sheet_xml = archive
        .by_name(sheet_path)
        .with_context(|| format!("Failed to find {}", sheet_path))?;
    let mut reader = Reader::from_reader(BufReader::new(sheet_xml));
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) if e.local_name().as_ref() == b"c" => {
                let address = attribute(&e, b"r")?.and_then(|r| CellAddress::parse(&r));
                let fill = attribute(&e, b"s")?
                    .and_then(|s| s.parse::<usize>().ok())
                    .and_then(|s| style_fills.get(s).cloned())
                    .flatten();
                if let (Some(address), Some(fill)) = (address, fill) {
                    cell_fills.insert((address.row, address.col), fill);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(cell_fills)
}

fn attribute(element: &BytesStart<'_>, key: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes().flatten() {
        if attr.key.as_ref() == key {
            return Ok(Some(attr.unescape_value()?.to_string()));
        }
    }
    Ok(None)
}
