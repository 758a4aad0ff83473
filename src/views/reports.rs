use std::collections::HashSet;
use std::time::Duration;

use dioxus::prelude::*;

use crate::api::ReportsApi;
use crate::types::{Report, ReportStatus};
use crate::ui::DashboardContext;
use crate::views::shared::{format_report_date, report_markdown_to_html};

const REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Remove exactly one entry matching the id. Returns whether one was
/// removed.
pub fn remove_report(cache: &mut Vec<Report>, id: &str) -> bool {
    match cache.iter().position(|report| report.id == id) {
        Some(index) => {
            cache.remove(index);
            true
        }
        None => false,
    }
}

/// Group reports by role following the configured role order; roles the
/// config does not know about are appended in first-seen order.
pub fn group_by_role(reports: &[Report], role_order: &[String]) -> Vec<(String, Vec<Report>)> {
    let mut groups: Vec<(String, Vec<Report>)> = role_order
        .iter()
        .map(|role| (role.clone(), Vec::new()))
        .collect();
    for report in reports {
        match groups.iter_mut().find(|(role, _)| *role == report.role) {
            Some((_, members)) => members.push(report.clone()),
            None => groups.push((report.role.clone(), vec![report.clone()])),
        }
    }
    groups.retain(|(_, members)| !members.is_empty());
    groups
}

fn status_class(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::InProgress => "report-status in-progress",
        ReportStatus::Ready => "report-status ready",
        ReportStatus::Failed => "report-status failed",
    }
}

// ============================================
// State
// ============================================

#[derive(Clone, Copy)]
struct ReportsState {
    reports: Signal<Vec<Report>>,
    creating_role: Signal<Option<String>>,
    confirm_delete: Signal<Option<String>>,
    expanded: Signal<HashSet<String>>,
}

impl PartialEq for ReportsState {
    fn eq(&self, _: &Self) -> bool {
        false
    }
}

impl ReportsState {
    fn create(&self, api: ReportsApi, role: String) {
        if (self.creating_role)().is_some() {
            return;
        }
        let mut creating = self.creating_role;
        creating.set(Some(role.clone()));
        let state = *self;
        spawn(async move {
            match api.create_report(&role).await {
                Ok(report) => {
                    let mut reports = state.reports;
                    reports.with_mut(|cache| cache.push(report));
                }
                // Failed create leaves the cache unchanged.
                Err(err) => tracing::error!("create report failed: {err}"),
            }
            let mut creating = state.creating_role;
            creating.set(None);
        });
    }

    fn delete(&self, api: ReportsApi, id: String) {
        let state = *self;
        spawn(async move {
            match api.delete_report(&id).await {
                Ok(()) => {
                    let mut reports = state.reports;
                    reports.with_mut(|cache| {
                        remove_report(cache, &id);
                    });
                }
                // Failed delete leaves the cache unchanged.
                Err(err) => tracing::error!("delete report failed: {err}"),
            }
            let mut confirm = state.confirm_delete;
            confirm.set(None);
        });
    }

    fn toggle_content(&self, api: ReportsApi, report: &Report) {
        let mut expanded = self.expanded;
        if expanded.with_mut(|set| {
            if set.remove(&report.id) {
                true
            } else {
                set.insert(report.id.clone());
                false
            }
        }) {
            return;
        }
        // Lazily pull the rendered content the list endpoint omits.
        if report.content.is_none() && report.status == ReportStatus::Ready {
            let id = report.id.clone();
            let state = *self;
            spawn(async move {
                match api.get_report(&id).await {
                    Ok(full) => {
                        let mut reports = state.reports;
                        reports.with_mut(|cache| {
                            if let Some(entry) = cache.iter_mut().find(|r| r.id == id) {
                                entry.content = full.content;
                            }
                        });
                    }
                    Err(err) => tracing::warn!("load report content failed: {err}"),
                }
            });
        }
    }
}

// ============================================
// Components
// ============================================

#[component]
pub fn ReportsView() -> Element {
    let ctx = use_context::<DashboardContext>();
    let state = ReportsState {
        reports: use_signal({
            let initial = ctx.config.initial_reports.clone();
            move || initial.clone()
        }),
        creating_role: use_signal(|| Option::<String>::None),
        confirm_delete: use_signal(|| Option::<String>::None),
        expanded: use_signal(HashSet::new),
    };
    let api = use_hook(|| ReportsApi::new(ctx.config.api_base_url.clone()));

    use_background_refresh(state, api.clone());

    let roles = ctx.config.report_roles.clone();
    let creating = (state.creating_role)();
    let cache = (state.reports)();
    let groups = group_by_role(&cache, &roles);

    rsx! {
        div { class: "main-container",
            div { class: "reports-toolbar",
                for role in roles {
                    NewReportButton {
                        key: "{role}",
                        role: role.clone(),
                        busy: creating.as_deref() == Some(role.as_str()),
                        state,
                        api: api.clone(),
                    }
                }
            }
            if groups.is_empty() {
                div { class: "reports-empty text-muted", "No reports yet." }
            }
            for (role, members) in groups {
                div { class: "report-group",
                    h3 { class: "section-title", "{role}" }
                    for report in members {
                        ReportRow {
                            key: "{report.id}",
                            report: report.clone(),
                            state,
                            api: api.clone(),
                        }
                    }
                }
            }
        }
    }
}

fn use_background_refresh(state: ReportsState, api: ReportsApi) {
    use_future(move || {
        let api = api.clone();
        let mut reports = state.reports;
        async move {
            loop {
                match api.list_reports().await {
                    Ok(latest) => reports.set(latest),
                    // Refresh failures leave the cached copy in place.
                    Err(err) => tracing::warn!("report refresh failed: {err}"),
                }
                tokio::time::sleep(REFRESH_INTERVAL).await;
            }
        }
    });
}

#[derive(Props, Clone)]
struct NewReportButtonProps {
    role: String,
    busy: bool,
    state: ReportsState,
    api: ReportsApi,
}

impl PartialEq for NewReportButtonProps {
    fn eq(&self, other: &Self) -> bool {
        self.role == other.role && self.busy == other.busy
    }
}

#[allow(non_snake_case)]
fn NewReportButton(props: NewReportButtonProps) -> Element {
    let NewReportButtonProps { role, busy, state, api } = props;
    let label = if busy {
        format!("Generating {role}…")
    } else {
        format!("New {role} report")
    };
    rsx! {
        button {
            class: "btn",
            r#type: "button",
            disabled: busy,
            onclick: move |_| state.create(api.clone(), role.clone()),
            "{label}"
        }
    }
}

#[derive(Props, Clone)]
struct ReportRowProps {
    report: Report,
    state: ReportsState,
    api: ReportsApi,
}

impl PartialEq for ReportRowProps {
    fn eq(&self, other: &Self) -> bool {
        self.report == other.report
    }
}

#[allow(non_snake_case)]
fn ReportRow(props: ReportRowProps) -> Element {
    let ReportRowProps { report, state, api } = props;
    let confirm = (state.confirm_delete)();
    let awaiting_confirm = confirm.as_deref() == Some(report.id.as_str());
    let is_expanded = (state.expanded)().contains(&report.id);
    let date = format_report_date(&report.created_at);
    let content_block = match report.content.as_deref() {
        Some(content) => {
            let html = report_markdown_to_html(content);
            rsx! { div { class: "report-content md", dangerous_inner_html: "{html}" } }
        }
        None => rsx! { div { class: "report-content text-muted", "Loading…" } },
    };

    let toggle_report = report.clone();
    let toggle_api = api.clone();
    let delete_api = api.clone();
    let delete_id = report.id.clone();

    rsx! {
        div { class: "report-row",
            div { class: "report-row-main",
                div { class: "report-row-title",
                    span { class: "report-title", "{report.title}" }
                    span { class: "{status_class(report.status)}", "{report.status.label()}" }
                }
                div { class: "report-row-meta",
                    span { class: "report-date", "{date}" }
                    div { class: "actions",
                        if report.status == ReportStatus::Ready {
                            button {
                                class: "action-btn",
                                r#type: "button",
                                onclick: move |_| state.toggle_content(toggle_api.clone(), &toggle_report),
                                if is_expanded { "Hide" } else { "View" }
                            }
                        }
                        if awaiting_confirm {
                            span { class: "confirm-inline",
                                "Delete?"
                                button {
                                    class: "action-btn danger",
                                    r#type: "button",
                                    onclick: move |_| state.delete(delete_api.clone(), delete_id.clone()),
                                    "Yes"
                                }
                                button {
                                    class: "action-btn",
                                    r#type: "button",
                                    onclick: move |_| {
                                        let mut confirm = state.confirm_delete;
                                        confirm.set(None);
                                    },
                                    "No"
                                }
                            }
                        } else {
                            button {
                                class: "action-btn",
                                r#type: "button",
                                onclick: {
                                    let id = report.id.clone();
                                    move |_| {
                                        let mut confirm = state.confirm_delete;
                                        confirm.set(Some(id.clone()));
                                    }
                                },
                                "Delete"
                            }
                        }
                    }
                }
            }
            if is_expanded {
                {content_block}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(id: &str, role: &str) -> Report {
        Report {
            id: id.to_string(),
            role: role.to_string(),
            title: format!("Report {id}"),
            status: ReportStatus::Ready,
            created_at: "2026-08-01T10:00:00Z".to_string(),
            content: None,
        }
    }

    #[test]
    fn delete_removes_exactly_one_entry() {
        let mut cache = vec![report("r1", "finops"), report("r2", "finops"), report("r2", "cto")];
        assert!(remove_report(&mut cache, "r2"));
        assert_eq!(cache.len(), 2);
        // Only the first match goes; the duplicate id survives.
        assert!(cache.iter().any(|r| r.id == "r2"));
        assert!(!remove_report(&mut cache, "missing"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn grouping_follows_configured_role_order() {
        let roles = vec!["cto".to_string(), "finops".to_string()];
        let reports = vec![report("r1", "finops"), report("r2", "cto"), report("r3", "intern")];
        let groups = group_by_role(&reports, &roles);
        assert_eq!(groups[0].0, "cto");
        assert_eq!(groups[1].0, "finops");
        // Unknown role lands at the end instead of disappearing.
        assert_eq!(groups[2].0, "intern");
    }

    #[test]
    fn empty_roles_are_hidden() {
        let roles = vec!["cto".to_string(), "finops".to_string()];
        let reports = vec![report("r1", "finops")];
        let groups = group_by_role(&reports, &roles);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].0, "finops");
    }
}
