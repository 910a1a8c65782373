use dioxus::prelude::*;

use crate::vm::{ResultVm, StrikeVm};

/// Remaining passes as check marks, used ones as crosses.
#[component]
pub fn StrikeBar(strikes: StrikeVm) -> Element {
    rsx! {
        div { class: "strikes",
            div { class: "strike-icons",
                for i in 0..strikes.remaining {
                    span { key: "left-{i}", class: "strike strike-left", "✓" }
                }
                for i in 0..strikes.used {
                    span { key: "used-{i}", class: "strike strike-used", "✗" }
                }
            }
            span { class: "strike-label", "{strikes.label}" }
        }
    }
}

#[component]
pub fn ResultPanel(result: ResultVm, onrestart: EventHandler<()>) -> Element {
    let heading_class = if result.timed_out {
        "result-heading timeout"
    } else {
        "result-heading"
    };

    rsx! {
        div { class: "result",
            div { class: "trophy", "🏆" }
            h2 { class: heading_class, "{result.heading}" }
            p { class: "result-score", "{result.score_label}" }
            button {
                id: "quiz-restart",
                class: "primary",
                onclick: move |_| onrestart.call(()),
                "Yeniden Başla"
            }
        }
    }
}

#[component]
pub fn RevealBanner(label: String) -> Element {
    rsx! {
        div { class: "reveal", p { "{label}" } }
    }
}
