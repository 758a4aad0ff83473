use std::collections::{HashMap, HashSet};

use dioxus::prelude::*;

use crate::config::ResourceSeed;
use crate::export::{export_inventory, save_export};
use crate::series::{build_chart, ChartModel, CHART_HEIGHT, CHART_WIDTH};
use crate::ui::DashboardContext;

/// Toggle a card in the expanded set; returns whether it is now expanded.
/// Two toggles always restore the original state.
pub fn toggle_expanded(expanded: &mut HashSet<String>, id: &str) -> bool {
    if expanded.remove(id) {
        false
    } else {
        expanded.insert(id.to_string());
        true
    }
}

pub fn chevron_class(expanded: bool) -> &'static str {
    if expanded { "chevron open" } else { "chevron" }
}

/// Provider sections in first-seen order, mirroring the export grouping.
pub fn group_by_provider(cards: &[ResourceSeed]) -> Vec<(String, Vec<ResourceSeed>)> {
    let mut groups: Vec<(String, Vec<ResourceSeed>)> = Vec::new();
    for card in cards {
        match groups.iter_mut().find(|(name, _)| *name == card.provider) {
            Some((_, members)) => members.push(card.clone()),
            None => groups.push((card.provider.clone(), vec![card.clone()])),
        }
    }
    groups
}

// ============================================
// State
// ============================================

#[derive(Clone, Copy)]
struct ResourcesState {
    expanded: Signal<HashSet<String>>,
    charts: Signal<HashMap<String, ChartModel>>,
    export_note: Signal<Option<String>>,
}

impl PartialEq for ResourcesState {
    fn eq(&self, _: &Self) -> bool {
        false
    }
}

fn use_resources_state() -> ResourcesState {
    ResourcesState {
        expanded: use_signal(HashSet::new),
        charts: use_signal(HashMap::new),
        export_note: use_signal(|| Option::<String>::None),
    }
}

impl ResourcesState {
    /// Flip a card open/closed, building its chart model on first expand.
    /// The cached model is reused on every later expand.
    fn toggle_card(&self, card: &ResourceSeed) {
        let mut expanded = self.expanded;
        let now_open = {
            let mut set = expanded();
            let open = toggle_expanded(&mut set, &card.id);
            expanded.set(set);
            open
        };
        if now_open {
            let mut charts = self.charts;
            let missing = charts.with(|map| !map.contains_key(&card.id));
            if missing {
                let model = build_chart(&card.id, card.series_json.as_deref());
                charts.with_mut(|map| {
                    map.insert(card.id.clone(), model);
                });
            }
        }
    }
}

// ============================================
// Components
// ============================================

#[component]
pub fn ResourcesView() -> Element {
    let ctx = use_context::<DashboardContext>();
    let state = use_resources_state();
    let cards = ctx.config.resources.clone();
    let groups = group_by_provider(&cards);
    let total_cost: f64 = cards.iter().map(|card| card.monthly_cost).sum();
    let export_note = (state.export_note)();

    let export_cards = cards.clone();
    let on_export = move |_| {
        let file = export_inventory(&export_cards);
        let mut note = state.export_note;
        match save_export(&file) {
            Ok(path) => note.set(Some(format!("Saved {}", path.display()))),
            Err(err) => {
                tracing::error!("inventory export failed: {err}");
                note.set(Some(format!("Export failed: {err}")));
            }
        }
    };

    let total_line = format!("{} resources · {:.2} / month", cards.len(), total_cost);

    rsx! {
        div { class: "main-container",
            div { class: "inventory-toolbar",
                span { class: "inventory-total", "{total_line}" }
                div { class: "actions",
                    button { class: "btn", r#type: "button", onclick: on_export, "Export" }
                }
            }
            if let Some(note) = export_note {
                div { class: "inventory-note", "{note}" }
            }
            for (provider, members) in groups {
                ProviderSection {
                    key: "{provider}",
                    provider: provider.clone(),
                    cards: members,
                    state,
                }
            }
        }
    }
}

#[component]
fn ProviderSection(provider: String, cards: Vec<ResourceSeed>, state: ResourcesState) -> Element {
    let monthly: f64 = cards.iter().map(|card| card.monthly_cost).sum();
    let meta = format!("{} resources · {:.2}", cards.len(), monthly);
    rsx! {
        div { class: "provider-section",
            div { class: "provider-header",
                h3 { class: "section-title", "{provider}" }
                span { class: "provider-meta", "{meta}" }
            }
            for card in cards {
                ResourceCard { key: "{card.id}", card: card.clone(), state }
            }
        }
    }
}

#[component]
fn ResourceCard(card: ResourceSeed, state: ResourcesState) -> Element {
    let is_open = (state.expanded)().contains(&card.id);
    let chart = (state.charts)().get(&card.id).cloned();
    let toggle_card = card.clone();
    let kind_line = format!("{} · {}", card.kind, card.status);
    let cost_label = format!("{:.2}", card.monthly_cost);
    let ram_label = format!("RAM: {:.0} GB", card.total_ram_gb);

    rsx! {
        div { class: "resource-card",
            div {
                class: "resource-card-header",
                onclick: move |_| state.toggle_card(&toggle_card),
                div { class: "resource-card-title",
                    span { class: "resource-name", "{card.name}" }
                    span { class: "resource-kind", "{kind_line}" }
                }
                div { class: "resource-card-side",
                    span { class: "resource-cost", "{cost_label}" }
                    span { class: "{chevron_class(is_open)}", "›" }
                }
            }
            if is_open {
                div { class: "resource-card-detail",
                    div { class: "resource-facts",
                        span { "{ram_label}" }
                        span { "Provider: {card.provider}" }
                    }
                    if let Some(chart) = chart {
                        UsageChart { chart }
                    }
                }
            }
        }
    }
}

#[component]
fn UsageChart(chart: ChartModel) -> Element {
    rsx! {
        div { class: "usage-chart",
            svg {
                view_box: "0 0 {CHART_WIDTH} {CHART_HEIGHT}",
                preserve_aspect_ratio: "none",
                class: "usage-chart-svg",
                polyline {
                    points: "{chart.polyline}",
                    fill: "none",
                    stroke: "currentColor",
                    stroke_width: "1.5",
                }
            }
            div { class: "usage-chart-meta",
                span { "{chart.first_date} – {chart.last_date}" }
                span { "min {chart.min_label} · max {chart.max_label}" }
                if chart.synthetic {
                    span { class: "text-muted", "sample data" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggling_twice_restores_original_state() {
        let mut expanded = HashSet::new();
        assert!(toggle_expanded(&mut expanded, "vm-1"));
        assert_eq!(chevron_class(expanded.contains("vm-1")), "chevron open");
        assert!(!toggle_expanded(&mut expanded, "vm-1"));
        assert!(expanded.is_empty());
        assert_eq!(chevron_class(expanded.contains("vm-1")), "chevron");
    }

    #[test]
    fn toggling_one_card_leaves_others_alone() {
        let mut expanded = HashSet::new();
        toggle_expanded(&mut expanded, "vm-1");
        toggle_expanded(&mut expanded, "vm-2");
        toggle_expanded(&mut expanded, "vm-1");
        assert!(expanded.contains("vm-2"));
        assert!(!expanded.contains("vm-1"));
    }

    fn seed(id: &str, provider: &str) -> ResourceSeed {
        ResourceSeed {
            id: id.to_string(),
            provider: provider.to_string(),
            name: id.to_string(),
            kind: "vm".to_string(),
            status: "active".to_string(),
            monthly_cost: 1.0,
            total_ram_gb: 4.0,
            series_json: None,
        }
    }

    #[test]
    fn grouping_keeps_first_seen_order() {
        let cards = vec![seed("a", "Selectel"), seed("b", "VK Cloud"), seed("c", "Selectel")];
        let groups = group_by_provider(&cards);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "Selectel");
        assert_eq!(groups[0].1.len(), 2);
    }
}
