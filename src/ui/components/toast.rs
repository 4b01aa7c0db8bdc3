use std::time::Duration;

use dioxus::prelude::*;

use crate::util::generate_id;

const MAX_VISIBLE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

impl ToastKind {
    /// Errors stay up longer so a failed booking is not missed.
    fn lifetime(self) -> Duration {
        match self {
            ToastKind::Error => Duration::from_secs(10),
            ToastKind::Warning => Duration::from_secs(8),
            ToastKind::Info | ToastKind::Success => Duration::from_secs(5),
        }
    }

    fn class(self) -> &'static str {
        match self {
            ToastKind::Info => "toast info",
            ToastKind::Success => "toast success",
            ToastKind::Warning => "toast warning",
            ToastKind::Error => "toast error",
        }
    }

    fn icon(self) -> &'static str {
        match self {
            ToastKind::Info => "ℹ️",
            ToastKind::Success => "✅",
            ToastKind::Warning => "⚠️",
            ToastKind::Error => "⛔",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ToastMessage {
    pub id: String,
    pub kind: ToastKind,
    pub text: String,
}

impl ToastMessage {
    pub fn new(kind: ToastKind, text: impl Into<String>) -> Self {
        Self {
            id: generate_id("toast"),
            kind,
            text: text.into(),
        }
    }
}

pub fn push_toast(
    mut toasts: Signal<Vec<ToastMessage>>,
    kind: ToastKind,
    message: impl Into<String>,
) {
    let text = message.into();
    toasts.with_mut(|entries| enqueue(entries, kind, text));
}

/// Several screens refresh the same data, so an identical toast already on
/// screen is not repeated. The oldest entry drops once [`MAX_VISIBLE`] show.
fn enqueue(entries: &mut Vec<ToastMessage>, kind: ToastKind, text: String) {
    if entries
        .iter()
        .any(|entry| entry.kind == kind && entry.text == text)
    {
        return;
    }
    if entries.len() >= MAX_VISIBLE {
        entries.remove(0);
    }
    entries.push(ToastMessage::new(kind, text));
}

#[component]
pub fn Toast() -> Element {
    let toasts = use_context::<Signal<Vec<ToastMessage>>>();
    let messages = toasts();

    if messages.is_empty() {
        return rsx! { Fragment {} };
    }

    rsx! {
        div {
            class: "toasts",
            ul {
                for message in messages {
                    ToastCard { key: "{message.id}", message, toasts }
                }
            }
        }
    }
}

#[component]
fn ToastCard(message: ToastMessage, toasts: Signal<Vec<ToastMessage>>) -> Element {
    let id = message.id.clone();
    let lifetime = message.kind.lifetime();
    let _auto_dismiss = use_future(move || {
        let id = id.clone();
        async move {
            tokio::time::sleep(lifetime).await;
            dismiss(toasts, &id);
        }
    });

    rsx! {
        li {
            class: "{message.kind.class()}",
            span { "{message.kind.icon()}" }
            p { "{message.text}" }
            button {
                onclick: move |_| dismiss(toasts, &message.id),
                "Dismiss"
            }
        }
    }
}

fn dismiss(mut toasts: Signal<Vec<ToastMessage>>, id: &str) {
    toasts.with_mut(|items| items.retain(|toast| toast.id != id));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_messages_are_collapsed() {
        let mut entries = Vec::new();
        enqueue(&mut entries, ToastKind::Error, "Failed to load slots".into());
        enqueue(&mut entries, ToastKind::Error, "Failed to load slots".into());
        enqueue(&mut entries, ToastKind::Warning, "Failed to load slots".into());
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn oldest_toast_drops_when_full() {
        let mut entries = Vec::new();
        for n in 0..=MAX_VISIBLE {
            enqueue(&mut entries, ToastKind::Info, format!("message {n}"));
        }
        assert_eq!(entries.len(), MAX_VISIBLE);
        assert_eq!(entries[0].text, "message 1");
    }

    #[test]
    fn errors_outlive_info() {
        assert!(ToastKind::Error.lifetime() > ToastKind::Info.lifetime());
    }
}
