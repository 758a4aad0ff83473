use crate::types::ThemeMode;

pub struct ThemeDefinition {
    pub css: &'static str,
}

pub fn theme_definition(mode: ThemeMode) -> ThemeDefinition {
    match mode {
        ThemeMode::Dark => ThemeDefinition { css: DARK_THEME },
        ThemeMode::Light => ThemeDefinition { css: LIGHT_THEME },
    }
}

const DARK_THEME: &str = r#"
:root {
    --color-bg-primary: #0b0e14;
    --color-bg-secondary: #10141d;
    --color-bg-overlay: rgba(4, 6, 10, 0.9);
    --color-text-primary: #f2f4f8;
    --color-text-muted: #9aa3b2;
    --color-border: #2a3140;
    --color-surface-muted: #161b26;
    --color-input-border: #2a3140;
    --color-input-bg: #0b0e14;
    --color-chat-user-bg: #f2f4f8;
    --color-chat-user-text: #0b0e14;
    --color-chat-assistant-bg: #161b26;
    --color-chat-assistant-text: #f2f4f8;
    --color-accent: #2fbf8f;
    --color-status-ok: #2fbf8f;
    --color-status-warn: #e8b93c;
    --color-status-bad: #e05c4b;
    --color-timestamp: #6d7585;
    --color-shimmer-base: rgba(47, 191, 143, 0.25);
    --color-shimmer-highlight: #2fbf8f;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-primary); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-accent); }
"#;

const LIGHT_THEME: &str = r#"
:root {
    --color-bg-primary: #ffffff;
    --color-bg-secondary: #f5f7fa;
    --color-bg-overlay: rgba(255, 255, 255, 0.92);
    --color-text-primary: #141822;
    --color-text-muted: #5b6372;
    --color-border: #d4d9e2;
    --color-surface-muted: #eceff4;
    --color-input-border: #c2c8d4;
    --color-input-bg: #ffffff;
    --color-chat-user-bg: #141822;
    --color-chat-user-text: #ffffff;
    --color-chat-assistant-bg: #f5f7fa;
    --color-chat-assistant-text: #141822;
    --color-accent: #18976c;
    --color-status-ok: #18976c;
    --color-status-warn: #b4880f;
    --color-status-bad: #c2402f;
    --color-timestamp: #7b8494;
    --color-shimmer-base: rgba(24, 151, 108, 0.25);
    --color-shimmer-highlight: #18976c;
}
body { background: var(--color-bg-primary); color: var(--color-text-primary); }
.header { background: var(--color-bg-primary); }
.btn { color: var(--color-text-primary); }
.btn:hover,
.btn-ghost:hover { background: var(--color-surface-muted); }
.composer { background: var(--color-bg-overlay); border-top-color: var(--color-border); }
.composer textarea { background: var(--color-input-bg); color: var(--color-text-primary); border-color: var(--color-input-border); }
.composer textarea:focus { border-color: var(--color-accent); }
"#;
