use std::sync::Arc;

use dioxus::prelude::*;

use quiz_core::model::AnswerStep;
use quiz_services::QuizRunner;

use crate::context::AppContext;
use crate::views::components::{ResultPanel, RevealBanner, StrikeBar};
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::QuizVm;

/// Shared handle to the live runner; equal only to itself.
#[derive(Clone)]
pub struct RunnerHandle(pub Arc<QuizRunner>);

impl PartialEq for RunnerHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();

    let resource = use_resource(move || {
        let service = ctx.quiz_service();
        let tickers = ctx.tickers();
        async move {
            QuizRunner::start(service, tickers)
                .map(|runner| RunnerHandle(Arc::new(runner)))
                .map_err(|err| {
                    tracing::error!(%err, "failed to start quiz session");
                    ViewError::from_service(&err)
                })
        }
    });

    let state = view_state_from_resource(&resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Yükleniyor..." }
                },
                ViewState::Ready(runner) => rsx! {
                    QuizScreen { runner }
                },
                ViewState::Error(err) => rsx! {
                    p { class: "error", "{err.message()}" }
                },
            }
        }
    }
}

#[component]
pub(crate) fn QuizScreen(runner: RunnerHandle) -> Element {
    let mut snapshot = use_signal(|| runner.0.snapshot());
    // View-local input buffer; the session never sees it until submit.
    let mut answer = use_signal(String::new);

    let watched = runner.clone();
    use_future(move || {
        let runner = watched.clone();
        async move {
            let mut rx = runner.0.subscribe();
            while rx.changed().await.is_ok() {
                let next = rx.borrow_and_update().clone();
                snapshot.set(next);
            }
        }
    });

    let vm = QuizVm::from(&*snapshot.read());

    let submit_runner = runner.clone();
    let on_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let text = answer.read().clone();
        match submit_runner.0.submit_answer(&text) {
            Ok(result) => {
                if result.step != AnswerStep::Revealed {
                    answer.set(String::new());
                }
            }
            Err(err) => tracing::warn!(%err, "answer rejected"),
        }
        snapshot.set(submit_runner.0.snapshot());
    };

    let restart_runner = runner.clone();
    let on_restart = move |()| {
        if let Err(err) = restart_runner.0.restart() {
            tracing::error!(%err, "failed to restart quiz");
        }
        answer.set(String::new());
        snapshot.set(restart_runner.0.snapshot());
    };

    let time_class = if vm.time_low { "time low" } else { "time" };

    rsx! {
        div { class: "quiz-card",
            if let Some(result) = vm.result.clone() {
                ResultPanel { result, onrestart: on_restart }
            } else {
                div { class: "quiz-title",
                    span { class: "brain", "🧠" }
                    h1 { "Genel Kültür Testi" }
                }
                div { class: "quiz-status",
                    span { class: "progress", "{vm.progress_label}" }
                    div { class: "quiz-meters",
                        span { class: time_class, "{vm.time_label}" }
                        span { class: "score", "{vm.score_label}" }
                    }
                }
                h2 { class: "prompt", "{vm.prompt}" }
                if let Some(label) = vm.revealed_answer_label.clone() {
                    RevealBanner { label }
                }
                form { class: "answer-form", onsubmit: on_submit,
                    input {
                        id: "quiz-answer",
                        r#type: "text",
                        value: "{answer}",
                        placeholder: "Cevabınızı yazın...",
                        oninput: move |evt: FormEvent| answer.set(evt.value()),
                    }
                    button { id: "quiz-submit", class: "primary", r#type: "submit", "Cevapla" }
                }
            }
            div { class: "quiz-footer",
                StrikeBar { strikes: vm.strikes.clone() }
                span { class: "credits", "Credits: Salih Orhan" }
            }
        }
    }
}
