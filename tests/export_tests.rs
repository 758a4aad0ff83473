//! Integration tests for the inventory export
//!
//! The workbook and the CSV fallback must carry the same columns, and an
//! empty inventory still produces a valid summary-only file.

use infrazen::config::ResourceSeed;
use infrazen::export::{build_csv, build_workbook, export_inventory, summarize_providers};

fn card(provider: &str, name: &str, cost: f64, ram: f64) -> ResourceSeed {
    ResourceSeed {
        id: format!("{provider}-{name}"),
        provider: provider.to_string(),
        name: name.to_string(),
        kind: "vm".to_string(),
        status: "active".to_string(),
        monthly_cost: cost,
        total_ram_gb: ram,
        series_json: None,
    }
}

mod empty_inventory {
    use super::*;

    #[test]
    fn csv_is_summary_only() {
        let csv = build_csv(&[]);
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("Provider,Resources,Monthly cost,RAM (GB)"));
        assert!(csv.contains("Total,0,0.00,0.0"));
        // No detail block without cards.
        assert!(!csv.contains("Resource,Type"));
    }

    #[test]
    fn workbook_is_still_a_valid_archive() {
        let bytes = build_workbook(&[]).expect("workbook");
        // XLSX is a zip container; check the magic instead of the payload.
        assert!(bytes.starts_with(b"PK"));
    }
}

mod populated_inventory {
    use super::*;

    #[test]
    fn summary_and_detail_share_column_semantics() {
        let cards = vec![
            card("Selectel", "prod-api", 100.0, 16.0),
            card("Selectel", "prod-worker", 50.0, 8.0),
            card("VK Cloud", "staging", 10.0, 4.0),
        ];
        let csv = build_csv(&cards);
        assert!(csv.contains("Selectel,2,150.00,24.0"));
        assert!(csv.contains("Total,3,160.00,28.0"));
        assert!(csv.contains("Provider,Resource,Type,Status,Monthly cost,RAM (GB)"));
        assert!(csv.contains("Selectel,prod-api,vm,active,100.00,16.0"));

        let summaries = summarize_providers(&cards);
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn fields_with_commas_survive_quoting() {
        let mut awkward = card("Selectel", "prod-api", 1.0, 1.0);
        awkward.name = "api, primary".to_string();
        let csv = build_csv(&[awkward]);
        assert!(csv.contains("\"api, primary\""));
    }

    #[test]
    fn export_prefers_the_workbook() {
        let file = export_inventory(&[card("Selectel", "prod-api", 1.0, 1.0)]);
        assert!(file.file_name.ends_with(".xlsx"));
        assert!(file.bytes.starts_with(b"PK"));
    }
}
