//! Inventory export: an XLSX workbook (summary + detail sheets) with a
//! BOM-prefixed CSV fallback carrying the same columns. Both read the same
//! card snapshot the inventory view renders.

use std::fs;
use std::path::PathBuf;

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::config::ResourceSeed;

const SUMMARY_HEADER: [&str; 4] = ["Provider", "Resources", "Monthly cost", "RAM (GB)"];
const DETAIL_HEADER: [&str; 6] = [
    "Provider",
    "Resource",
    "Type",
    "Status",
    "Monthly cost",
    "RAM (GB)",
];

#[derive(Clone, Debug, PartialEq)]
pub struct ProviderSummary {
    pub provider: String,
    pub resource_count: usize,
    pub monthly_cost: f64,
    pub total_ram_gb: f64,
}

/// Group cards by provider, keeping first-seen provider order so the export
/// mirrors the section order on screen.
pub fn summarize_providers(cards: &[ResourceSeed]) -> Vec<ProviderSummary> {
    let mut summaries: Vec<ProviderSummary> = Vec::new();
    for card in cards {
        match summaries
            .iter_mut()
            .find(|summary| summary.provider == card.provider)
        {
            Some(summary) => {
                summary.resource_count += 1;
                summary.monthly_cost += card.monthly_cost;
                summary.total_ram_gb += card.total_ram_gb;
            }
            None => summaries.push(ProviderSummary {
                provider: card.provider.clone(),
                resource_count: 1,
                monthly_cost: card.monthly_cost,
                total_ram_gb: card.total_ram_gb,
            }),
        }
    }
    summaries
}

fn totals(summaries: &[ProviderSummary]) -> ProviderSummary {
    ProviderSummary {
        provider: "Total".to_string(),
        resource_count: summaries.iter().map(|s| s.resource_count).sum(),
        monthly_cost: summaries.iter().map(|s| s.monthly_cost).sum(),
        total_ram_gb: summaries.iter().map(|s| s.total_ram_gb).sum(),
    }
}

// ---------------
// XLSX workbook
// ---------------

pub fn build_workbook(cards: &[ResourceSeed]) -> Result<Vec<u8>, XlsxError> {
    let summaries = summarize_providers(cards);
    let total = totals(&summaries);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("Summary")?;
    for (col, title) in SUMMARY_HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *title, &bold)?;
    }
    for (i, summary) in summaries.iter().chain(std::iter::once(&total)).enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &summary.provider)?;
        sheet.write_number(row, 1, summary.resource_count as f64)?;
        sheet.write_number(row, 2, summary.monthly_cost)?;
        sheet.write_number(row, 3, summary.total_ram_gb)?;
    }

    if !cards.is_empty() {
        let detail = workbook.add_worksheet();
        detail.set_name("Resources")?;
        for (col, title) in DETAIL_HEADER.iter().enumerate() {
            detail.write_string_with_format(0, col as u16, *title, &bold)?;
        }
        for (i, card) in cards.iter().enumerate() {
            let row = (i + 1) as u32;
            detail.write_string(row, 0, &card.provider)?;
            detail.write_string(row, 1, &card.name)?;
            detail.write_string(row, 2, &card.kind)?;
            detail.write_string(row, 3, &card.status)?;
            detail.write_number(row, 4, card.monthly_cost)?;
            detail.write_number(row, 5, card.total_ram_gb)?;
        }
    }

    workbook.save_to_buffer()
}

// ---------------
// CSV fallback
// ---------------

fn csv_field(raw: &str) -> String {
    if raw.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}

fn csv_row(fields: &[String]) -> String {
    fields
        .iter()
        .map(|f| csv_field(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Same column semantics as the workbook, prefixed with a UTF-8 BOM so
/// spreadsheet applications pick the right encoding.
pub fn build_csv(cards: &[ResourceSeed]) -> String {
    let summaries = summarize_providers(cards);
    let total = totals(&summaries);

    let mut out = String::from("\u{feff}");
    out.push_str(&SUMMARY_HEADER.join(","));
    out.push('\n');
    for summary in summaries.iter().chain(std::iter::once(&total)) {
        out.push_str(&csv_row(&[
            summary.provider.clone(),
            summary.resource_count.to_string(),
            format!("{:.2}", summary.monthly_cost),
            format!("{:.1}", summary.total_ram_gb),
        ]));
        out.push('\n');
    }

    if !cards.is_empty() {
        out.push('\n');
        out.push_str(&DETAIL_HEADER.join(","));
        out.push('\n');
        for card in cards {
            out.push_str(&csv_row(&[
                card.provider.clone(),
                card.name.clone(),
                card.kind.clone(),
                card.status.clone(),
                format!("{:.2}", card.monthly_cost),
                format!("{:.1}", card.total_ram_gb),
            ]));
            out.push('\n');
        }
    }

    out
}

// ---------------
// File emission
// ---------------

#[derive(Clone, Debug, PartialEq)]
pub struct ExportFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

const EXPORT_STAMP_FORMAT: &[FormatItem<'static>] =
    format_description!("[year][month][day]-[hour][minute][second]");

fn export_stamp() -> String {
    OffsetDateTime::now_utc()
        .format(EXPORT_STAMP_FORMAT)
        .unwrap_or_else(|_| "export".to_string())
}

/// Build the workbook; if serialization fails, emit the CSV rendition with
/// identical columns instead.
pub fn export_inventory(cards: &[ResourceSeed]) -> ExportFile {
    match build_workbook(cards) {
        Ok(bytes) => ExportFile {
            file_name: format!("infrazen-resources-{}.xlsx", export_stamp()),
            bytes,
        },
        Err(err) => {
            tracing::warn!("workbook export failed, falling back to CSV: {err}");
            ExportFile {
                file_name: format!("infrazen-resources-{}.csv", export_stamp()),
                bytes: build_csv(cards).into_bytes(),
            }
        }
    }
}

/// Write the export next to the user's downloads, or the working directory
/// when no downloads directory exists.
pub fn save_export(file: &ExportFile) -> anyhow::Result<PathBuf> {
    let dir = dirs::download_dir().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(&file.file_name);
    fs::write(&path, &file.bytes)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(provider: &str, name: &str, cost: f64) -> ResourceSeed {
        ResourceSeed {
            id: name.to_string(),
            provider: provider.to_string(),
            name: name.to_string(),
            kind: "vm".to_string(),
            status: "active".to_string(),
            monthly_cost: cost,
            total_ram_gb: 8.0,
            series_json: None,
        }
    }

    #[test]
    fn summaries_keep_first_seen_provider_order() {
        let cards = vec![
            card("Selectel", "a", 10.0),
            card("Yandex Cloud", "b", 20.0),
            card("Selectel", "c", 30.0),
        ];
        let summaries = summarize_providers(&cards);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].provider, "Selectel");
        assert_eq!(summaries[0].resource_count, 2);
        assert!((summaries[0].monthly_cost - 40.0).abs() < 1e-9);
    }

    #[test]
    fn csv_quotes_awkward_fields() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("a,b"), "\"a,b\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
