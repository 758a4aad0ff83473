use std::env;

use anyhow::Context;
use serde::Deserialize;

use crate::types::Report;

/// Bundled dashboard data, the typed equivalent of the page-embedded
/// `INFRAZEN_DATA` object plus the hidden per-card inputs.
const BUNDLED_DASHBOARD: &str = include_str!("../assets/dashboard.json");

/// One inventory card as seeded by the backend. `series_json` stays a raw
/// string until chart build time; malformed content falls back to a
/// synthetic series instead of failing the render.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceSeed {
    pub id: String,
    pub provider: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    pub monthly_cost: f64,
    #[serde(default)]
    pub total_ram_gb: f64,
    #[serde(default)]
    pub series_json: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub agent_service_url: String,
    pub api_base_url: String,
    pub report_roles: Vec<String>,
    pub initial_reports: Vec<Report>,
    pub resources: Vec<ResourceSeed>,
}

impl DashboardConfig {
    /// Parse the bundled document and apply environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::from_json(BUNDLED_DASHBOARD)?;
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        serde_json::from_str(raw).context("invalid dashboard data document")
    }

    /// Last-resort configuration so a broken bundled document degrades the
    /// dashboard instead of failing the render.
    pub fn empty() -> Self {
        Self {
            agent_service_url: "http://127.0.0.1:8001".to_string(),
            api_base_url: "http://127.0.0.1:8000".to_string(),
            report_roles: Vec::new(),
            initial_reports: Vec::new(),
            resources: Vec::new(),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("INFRAZEN_AGENT_URL") {
            self.agent_service_url = url;
        }
        if let Ok(url) = env::var("INFRAZEN_API_URL") {
            self.api_base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dashboard_parses() {
        let config = DashboardConfig::from_json(BUNDLED_DASHBOARD).expect("bundled data");
        assert!(!config.report_roles.is_empty());
        assert!(!config.resources.is_empty());
    }

    #[test]
    fn resource_seed_accepts_page_field_names() {
        let raw = r#"{
            "agentServiceUrl": "http://localhost:8001",
            "apiBaseUrl": "http://localhost:8000",
            "reportRoles": ["finops"],
            "initialReports": [],
            "resources": [{
                "id": "vm-1",
                "provider": "Selectel",
                "name": "prod-api",
                "type": "vm",
                "status": "active",
                "monthlyCost": 120.5,
                "totalRamGb": 16,
                "seriesJson": "{\"dates\":[\"2026-01-01\"],\"values\":[1.0]}"
            }]
        }"#;
        let config = DashboardConfig::from_json(raw).expect("parse");
        assert_eq!(config.resources[0].kind, "vm");
        assert!(config.resources[0].series_json.is_some());
    }
}
