use std::sync::Arc;

use dioxus::prelude::*;

use crate::config::DashboardConfig;
use crate::theme::theme_definition;
use crate::transport::{ChatTransport, MockAgentTransport};
use crate::types::ThemeMode;
use crate::views::{ChatWidget, ReportsView, ResourcesView};

const DASHBOARD_CSS: Asset = asset!("/assets/infrazen.css");

/// Explicit configuration handed to the views through context; nothing in
/// the app reads global mutable state.
#[derive(Clone)]
pub struct DashboardContext {
    pub config: Arc<DashboardConfig>,
    pub transport: Arc<dyn ChatTransport>,
    /// Mock-only controls for the simulated failure/reconnect path.
    pub mock: Arc<MockAgentTransport>,
}

impl PartialEq for DashboardContext {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.config, &other.config) && Arc::ptr_eq(&self.mock, &other.mock)
    }
}

impl DashboardContext {
    fn with_mock_agent() -> Self {
        let config = DashboardConfig::load().unwrap_or_else(|err| {
            tracing::error!("dashboard data failed to load: {err}");
            DashboardConfig::empty()
        });
        let mock = Arc::new(MockAgentTransport::default());
        Self {
            config: Arc::new(config),
            transport: mock.clone(),
            mock,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AppTab {
    Resources,
    Reports,
}

#[component]
pub fn App() -> Element {
    use_context_provider(DashboardContext::with_mock_agent);

    let active_tab = use_signal(|| AppTab::Resources);
    let base_font_px = use_signal(|| 14i32);
    let theme = use_signal(|| ThemeMode::Dark);
    let chat_open = use_signal(|| false);

    rsx! {
        ThemeStyles { base_font_px, theme }
        AppHeader { active_tab, theme }
        TabPanels { active_tab }
        ChatLauncher { chat_open }
    }
}

#[component]
fn ThemeStyles(base_font_px: Signal<i32>, theme: Signal<ThemeMode>) -> Element {
    let root_style = format!(":root {{ font-size: {}px; }}", base_font_px());
    let definition = theme_definition(theme());
    rsx! {
        document::Link { rel: "stylesheet", href: DASHBOARD_CSS }
        style { dangerous_inner_html: "{root_style}" }
        style { dangerous_inner_html: "{definition.css}" }
    }
}

#[component]
fn AppHeader(active_tab: Signal<AppTab>, theme: Signal<ThemeMode>) -> Element {
    let mut theme = theme;
    rsx! {
        div { class: "header no-divider",
            div { class: "header-content",
                h1 { class: "header-wordmark", "InfraZen" }
                TabNavigation { active_tab }
                button {
                    class: "btn btn-ghost",
                    r#type: "button",
                    title: "Switch theme",
                    onclick: move |_| {
                        let next = match theme() {
                            ThemeMode::Dark => ThemeMode::Light,
                            ThemeMode::Light => ThemeMode::Dark,
                        };
                        theme.set(next);
                    },
                    if matches!(theme(), ThemeMode::Dark) { "Light" } else { "Dark" }
                }
            }
        }
    }
}

#[component]
fn TabNavigation(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tabs",
            TabButton { active_tab, tab: AppTab::Resources, label: "Resources" }
            TabButton { active_tab, tab: AppTab::Reports, label: "Reports" }
        }
    }
}

#[component]
fn TabButton(active_tab: Signal<AppTab>, tab: AppTab, label: &'static str) -> Element {
    let mut active_tab = active_tab;
    let class = if active_tab() == tab {
        "tab active"
    } else {
        "tab"
    };
    rsx! {
        h2 {
            class: class,
            onclick: move |_| active_tab.set(tab),
            "{label}"
        }
    }
}

#[component]
fn TabPanels(active_tab: Signal<AppTab>) -> Element {
    rsx! {
        div { class: "tab-panels",
            TabPanel {
                active_tab,
                tab: AppTab::Resources,
                children: rsx!( ResourcesView {} ),
            }
            TabPanel {
                active_tab,
                tab: AppTab::Reports,
                children: rsx!( ReportsView {} ),
            }
        }
    }
}

#[component]
fn TabPanel(active_tab: Signal<AppTab>, tab: AppTab, children: Element) -> Element {
    let is_active = active_tab() == tab;
    let class_suffix = if is_active { "active" } else { "" };
    rsx! {
        div {
            class: format_args!("tab-panel {}", class_suffix),
            aria_hidden: (!is_active).to_string(),
            {children}
        }
    }
}

#[component]
fn ChatLauncher(chat_open: Signal<bool>) -> Element {
    let mut chat_open = chat_open;
    // The widget stays mounted while hidden so the conversation survives
    // closing and reopening the panel.
    rsx! {
        div {
            class: format_args!(
                "chat-widget-slot {}",
                if chat_open() { "" } else { "hidden" }
            ),
            ChatWidget { open: chat_open }
        }
        if !chat_open() {
            button {
                class: "chat-launcher",
                r#type: "button",
                title: "Open the assistant",
                onclick: move |_| chat_open.set(true),
                "Chat"
            }
        }
    }
}
