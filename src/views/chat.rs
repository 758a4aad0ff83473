use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use dioxus::events::Key;
use dioxus::html::HasFileData;
use dioxus::prelude::*;
use time::OffsetDateTime;

use crate::api::upload_chat_image;
use crate::transport::TransportStatus;
use crate::types::{ChatMessage, PendingAttachment, Role};
use crate::ui::DashboardContext;
use crate::views::shared::{format_message_timestamp, render_assistant_markdown};

pub const MAX_ATTACHMENT_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_MIME_WHITELIST: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];

/// Infer the MIME type from the file name the picker hands us.
pub fn mime_for_file(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

/// Client-side gate: anything failing here never reaches the upload call.
pub fn validate_attachment(mime: &str, len: usize) -> Result<(), String> {
    if !IMAGE_MIME_WHITELIST.contains(&mime) {
        return Err(format!("Unsupported image type: {mime}"));
    }
    if len > MAX_ATTACHMENT_BYTES {
        return Err("Image is larger than 5 MB".to_string());
    }
    Ok(())
}

fn attachment_data_url(attachment: &PendingAttachment) -> String {
    format!(
        "data:{};base64,{}",
        attachment.mime,
        BASE64.encode(&attachment.bytes)
    )
}

fn current_time() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

fn system_notice(text: impl Into<String>) -> ChatMessage {
    ChatMessage::text(Role::System, text, Some(current_time()))
}

// ============================================
// State
// ============================================

#[derive(Clone, Copy)]
struct ChatState {
    messages: Signal<Vec<ChatMessage>>,
    input: Signal<String>,
    sending: Signal<bool>,
    awaiting_reply: Signal<bool>,
    attachment: Signal<Option<PendingAttachment>>,
    status: Signal<TransportStatus>,
}

impl PartialEq for ChatState {
    fn eq(&self, _: &Self) -> bool {
        false
    }
}

fn use_chat_state() -> ChatState {
    ChatState {
        messages: use_signal(Vec::<ChatMessage>::new),
        input: use_signal(String::new),
        sending: use_signal(|| false),
        awaiting_reply: use_signal(|| false),
        attachment: use_signal(|| Option::<PendingAttachment>::None),
        status: use_signal(|| TransportStatus::Connecting),
    }
}

impl ChatState {
    fn push_message(&self, message: ChatMessage) {
        let mut messages = self.messages;
        messages.with_mut(|msgs| msgs.push(message));
    }

    fn attach_file(&self, file_name: String, bytes: Vec<u8>) {
        let Some(mime) = mime_for_file(&file_name) else {
            self.push_message(system_notice(format!(
                "Cannot attach {file_name}: not a supported image"
            )));
            return;
        };
        if let Err(reason) = validate_attachment(mime, bytes.len()) {
            self.push_message(system_notice(reason));
            return;
        }
        // One pending attachment per compose session; a new pick replaces it.
        let mut attachment = self.attachment;
        attachment.set(Some(PendingAttachment {
            file_name,
            mime: mime.to_string(),
            bytes,
        }));
    }

    fn clear_conversation(&self) {
        let mut messages = self.messages;
        messages.set(Vec::new());
        let mut attachment = self.attachment;
        attachment.set(None);
    }

    fn submit(&self, ctx: DashboardContext) {
        let text = (self.input)().trim().to_string();
        let pending = (self.attachment)();
        if (text.is_empty() && pending.is_none()) || (self.sending)() {
            return;
        }

        let state = *self;
        let mut sending = self.sending;
        sending.set(true);

        spawn(async move {
            let mut image_id = None;
            let mut image_data_url = None;

            if let Some(att) = pending {
                match upload_chat_image(&ctx.config.agent_service_url, &att).await {
                    Ok(id) => {
                        image_data_url = Some(attachment_data_url(&att));
                        image_id = Some(id);
                    }
                    Err(err) => {
                        tracing::warn!("chat image upload failed: {err}");
                        state.push_message(system_notice(format!("Image upload failed: {err}")));
                        // Abort before clearing the input so nothing typed is lost.
                        let mut sending = state.sending;
                        sending.set(false);
                        return;
                    }
                }
            }

            let outbound = match &image_id {
                Some(id) if text.is_empty() => format!("[image:{id}]"),
                Some(id) => format!("{text}\n[image:{id}]"),
                None => text.clone(),
            };

            state.push_message(ChatMessage {
                role: Role::User,
                content: text,
                created_at: Some(current_time()),
                image_data_url,
                image_id,
            });
            let mut input = state.input;
            input.set(String::new());
            let mut attachment = state.attachment;
            attachment.set(None);

            let mut awaiting = state.awaiting_reply;
            awaiting.set(true);
            match ctx.transport.send(&outbound).await {
                Some(reply) => {
                    state.push_message(ChatMessage::text(
                        Role::Assistant,
                        reply.content,
                        Some(current_time()),
                    ));
                }
                None => {
                    state.push_message(system_notice(
                        "Agent is offline; the message was not delivered.",
                    ));
                }
            }
            awaiting.set(false);

            let mut status = state.status;
            status.set(ctx.transport.status());
            let mut sending = state.sending;
            sending.set(false);
        });
    }
}

// ============================================
// Components
// ============================================

#[component]
pub fn ChatWidget(open: Signal<bool>) -> Element {
    let mut open = open;
    let ctx = use_context::<DashboardContext>();
    let state = use_chat_state();

    use_connect_once(state, ctx.clone());

    let mut show_clear_confirm = use_signal(|| false);
    let messages_snapshot = (state.messages)();
    let awaiting = (state.awaiting_reply)();

    rsx! {
        div { class: "chat-widget",
            div { class: "chat-header",
                span { class: "chat-title", "InfraZen Assistant" }
                div { class: "chat-header-actions",
                    button {
                        class: "action-btn",
                        title: "Clear conversation",
                        onclick: move |_| show_clear_confirm.set(true),
                        "Clear"
                    }
                    button {
                        class: "action-btn",
                        title: "Close",
                        onclick: move |_| open.set(false),
                        "✕"
                    }
                }
            }

            StatusBanner { state, ctx: ctx.clone() }

            div { id: "chat-list", class: "chat-list",
                for (i, msg) in messages_snapshot.iter().enumerate() {
                    MessageRow { key: "{i}", message: msg.clone() }
                }
                if awaiting {
                    div { class: "message-row assistant",
                        div { class: "avatar assistant", "IZ" }
                        div { class: "shimmer-line",
                            span { class: "shimmer-text", "Assistant is typing…" }
                        }
                    }
                }
            }

            Composer { state, ctx }

            if show_clear_confirm() {
                div { class: "confirm-overlay",
                    onclick: move |_| show_clear_confirm.set(false),
                    div { class: "confirm-dialog",
                        onclick: move |e| e.stop_propagation(),
                        p { "Clear conversation?" }
                        div { class: "confirm-actions",
                            button {
                                class: "btn",
                                onclick: move |_| show_clear_confirm.set(false),
                                "Cancel"
                            }
                            button {
                                class: "btn btn-primary",
                                onclick: move |_| {
                                    state.clear_conversation();
                                    show_clear_confirm.set(false);
                                },
                                "Clear"
                            }
                        }
                    }
                }
            }
        }
    }
}

fn use_connect_once(state: ChatState, ctx: DashboardContext) {
    use_future(move || {
        let transport = ctx.transport.clone();
        let mut status = state.status;
        async move {
            status.set(TransportStatus::Connecting);
            transport.connect().await;
            status.set(transport.status());
        }
    });
}

#[component]
fn StatusBanner(state: ChatState, ctx: DashboardContext) -> Element {
    let status = (state.status)();
    let class_suffix = match status {
        TransportStatus::Connected => "connected",
        TransportStatus::Connecting => "connecting",
        TransportStatus::Offline => "offline",
    };
    let mock = ctx.mock.clone();
    let mock_reconnect = ctx.mock.clone();

    rsx! {
        div { class: format_args!("chat-status {}", class_suffix),
            span { class: "chat-status-label", "{status.label()}" }
            if status == TransportStatus::Connected {
                button {
                    class: "action-btn",
                    title: "Simulate a dropped connection",
                    onclick: move |_| {
                        mock.simulate_outage();
                        let mut status = state.status;
                        status.set(TransportStatus::Offline);
                    },
                    "Drop link"
                }
            } else if status == TransportStatus::Offline {
                button {
                    class: "action-btn",
                    onclick: move |_| {
                        let mock = mock_reconnect.clone();
                        let mut status = state.status;
                        spawn(async move {
                            status.set(TransportStatus::Connecting);
                            mock.reconnect().await;
                            status.set(TransportStatus::Connected);
                        });
                    },
                    "Reconnect"
                }
            }
        }
    }
}

#[component]
fn MessageRow(message: ChatMessage) -> Element {
    let role_class = match message.role {
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::System => "system",
    };

    if matches!(message.role, Role::System) {
        return rsx! {
            div { class: "message-row system",
                span { class: "system-note", "{message.content}" }
            }
        };
    }

    rsx! {
        div { class: format_args!("message-row {}", role_class),
            if matches!(message.role, Role::Assistant) {
                div { class: "avatar assistant", "IZ" }
            }
            div { class: "message-stack",
                div { class: format_args!("bubble {}", role_class),
                    if let Some(url) = message.image_data_url.as_ref() {
                        img { class: "bubble-image", src: "{url}", alt: "attached image" }
                    }
                    if matches!(message.role, Role::Assistant) {
                        AssistantBubble { content: message.content.clone() }
                    } else if !message.content.is_empty() {
                        // User text renders as a plain text node: escaped,
                        // never markdown-rendered.
                        "{message.content}"
                    }
                }
                if let Some(ts) = format_message_timestamp(message.created_at) {
                    div { class: format_args!(
                            "message-meta {}",
                            match message.role { Role::User => "align-end", _ => "align-start" }
                        ),
                        span { class: "message-timestamp", "{ts}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AssistantBubble(content: String) -> Element {
    let content_html = render_assistant_markdown(&content);
    let copy_payload = content.clone();
    let on_copy = move |_| {
        let raw = copy_payload.clone();
        spawn(async move {
            #[cfg(any(feature = "desktop", feature = "mobile"))]
            {
                if let Ok(mut cb) = arboard::Clipboard::new() {
                    let _ = cb.set_text(raw);
                }
            }
            #[cfg(not(any(feature = "desktop", feature = "mobile")))]
            let _ = raw;
        });
    };

    rsx! {
        div { class: "bubble-controls",
            div { class: "actions",
                button { class: "action-btn", title: "Copy reply", onclick: on_copy, "Copy" }
            }
        }
        div { class: "md", dangerous_inner_html: "{content_html}" }
    }
}

#[component]
fn Composer(state: ChatState, ctx: DashboardContext) -> Element {
    let mut input = state.input;
    let sending = (state.sending)();
    let offline = (state.status)() != TransportStatus::Connected;
    let pending = (state.attachment)();
    let submit_ctx = ctx.clone();
    let key_ctx = ctx.clone();

    rsx! {
        form { class: "composer no-divider",
            div { class: "composer-inner",
                if let Some(att) = pending {
                    AttachmentPreview { state, attachment: att }
                }
                div {
                    class: "hstack",
                    style: "gap: 0.5rem; width: 100%; align-items: flex-end;",
                    ondrop: move |ev| {
                        ev.prevent_default();
                        if let Some(file_engine) = ev.files() {
                            let state = state;
                            spawn(async move {
                                let names = file_engine.files();
                                if let Some(name) = names.first() {
                                    if let Some(bytes) = file_engine.read_file(name).await {
                                        state.attach_file(name.clone(), bytes);
                                    }
                                }
                            });
                        }
                    },
                    ondragover: move |ev| ev.prevent_default(),
                    label { class: "attach-btn", title: "Attach an image",
                        "+"
                        input {
                            r#type: "file",
                            accept: "image/png,image/jpeg,image/gif,image/webp",
                            style: "display: none;",
                            onchange: move |ev| {
                                if let Some(file_engine) = ev.files() {
                                    let state = state;
                                    spawn(async move {
                                        let names = file_engine.files();
                                        if let Some(name) = names.first() {
                                            if let Some(bytes) = file_engine.read_file(name).await {
                                                state.attach_file(name.clone(), bytes);
                                            }
                                        }
                                    });
                                }
                            },
                        }
                    }
                    textarea {
                        class: "chat-input",
                        rows: "1",
                        placeholder: "Ask about your cloud spend…",
                        value: "{input}",
                        oninput: move |ev| input.set(ev.value()),
                        onkeydown: move |ev| {
                            if ev.key() == Key::Enter && !ev.modifiers().shift() {
                                ev.prevent_default();
                                state.submit(key_ctx.clone());
                            }
                        },
                        disabled: sending,
                        autofocus: true,
                    }
                    button {
                        class: "btn btn-primary",
                        r#type: "button",
                        disabled: sending
                            || offline
                            || ((state.input)().trim().is_empty() && (state.attachment)().is_none()),
                        onclick: move |_| state.submit(submit_ctx.clone()),
                        "Send"
                    }
                }
            }
        }
    }
}

#[component]
fn AttachmentPreview(state: ChatState, attachment: PendingAttachment) -> Element {
    let size_kb = attachment.bytes.len() / 1024;
    rsx! {
        div { class: "attachment-preview",
            img {
                class: "attachment-thumb",
                src: "{attachment_data_url(&attachment)}",
                alt: "{attachment.file_name}",
            }
            span { class: "attachment-name", "{attachment.file_name} ({size_kb} KB)" }
            button {
                class: "action-btn",
                r#type: "button",
                title: "Remove attachment",
                onclick: move |_| {
                    let mut pending = state.attachment;
                    pending.set(None);
                },
                "✕"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_rejects_non_images() {
        assert!(validate_attachment("image/png", 1024).is_ok());
        assert!(validate_attachment("application/pdf", 1024).is_err());
        assert!(validate_attachment("text/html", 10).is_err());
    }

    #[test]
    fn oversized_attachment_is_rejected() {
        assert!(validate_attachment("image/jpeg", MAX_ATTACHMENT_BYTES).is_ok());
        assert!(validate_attachment("image/jpeg", MAX_ATTACHMENT_BYTES + 1).is_err());
    }

    #[test]
    fn mime_inference_uses_extension() {
        assert_eq!(mime_for_file("shot.PNG"), Some("image/png"));
        assert_eq!(mime_for_file("photo.jpeg"), Some("image/jpeg"));
        assert_eq!(mime_for_file("notes.txt"), None);
        assert_eq!(mime_for_file("no-extension"), None);
    }
}
