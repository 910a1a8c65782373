use std::sync::Arc;

use dioxus::prelude::*;

use quiz_core::QuizConfig;
use quiz_core::model::{EndReason, QuestionBank, QuizResult};
use quiz_core::time::{fixed_clock, fixed_now};
use quiz_services::{ManualTickers, QuizRunner, QuizService};

use crate::views::quiz::QuizScreen;
use crate::views::{ResultPanel, RevealBanner, RunnerHandle, StrikeBar};
use crate::vm::{ResultVm, map_strikes};

fn render(app: fn() -> Element) -> String {
    let mut dom = VirtualDom::new(app);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

#[component]
fn TimeoutResultHarness() -> Element {
    let now = fixed_now();
    let result = ResultVm::from(&QuizResult::new(3, 10, EndReason::Timeout, now, now, 600));
    rsx! { ResultPanel { result, onrestart: move |()| {} } }
}

#[component]
fn CompletedResultHarness() -> Element {
    let now = fixed_now();
    let result = ResultVm::from(&QuizResult::new(10, 10, EndReason::Completed, now, now, 75));
    rsx! { ResultPanel { result, onrestart: move |()| {} } }
}

#[component]
fn StrikeHarness() -> Element {
    rsx! { StrikeBar { strikes: map_strikes(1, 3) } }
}

#[component]
fn RevealHarness() -> Element {
    rsx! { RevealBanner { label: "Doğru cevap: Ankara".to_string() } }
}

#[test]
fn result_panel_renders_timeout() {
    let html = render(TimeoutResultHarness);
    assert!(html.contains("Süre Doldu!"), "missing heading in {html}");
    assert!(html.contains("Skorunuz: 3/10 (30%)"), "missing score in {html}");
    assert!(html.contains("Yeniden Başla"), "missing restart in {html}");
}

#[test]
fn result_panel_renders_completion() {
    let html = render(CompletedResultHarness);
    assert!(html.contains("Test Tamamlandı!"), "missing heading in {html}");
    assert!(html.contains("Skorunuz: 10/10 (100%)"), "missing score in {html}");
}

#[test]
fn strike_bar_renders_marks_and_label() {
    let html = render(StrikeHarness);
    assert_eq!(html.matches("strike-left").count(), 1, "{html}");
    assert_eq!(html.matches("strike-used").count(), 2, "{html}");
    assert!(html.contains("1 hakkınız kaldı"), "missing label in {html}");
}

#[test]
fn reveal_banner_shows_answer() {
    let html = render(RevealHarness);
    assert!(html.contains("Doğru cevap: Ankara"), "missing answer in {html}");
}

#[component]
fn QuizScreenHarness() -> Element {
    let runner = use_context::<RunnerHandle>();
    rsx! { QuizScreen { runner } }
}

fn start_runner(ticks: &ManualTickers) -> RunnerHandle {
    let service = QuizService::new(
        Arc::new(QuestionBank::builtin()),
        QuizConfig::default(),
        fixed_clock(),
    )
    .unwrap()
    .with_seed(1);
    let runner = QuizRunner::start(Arc::new(service), Arc::new(ticks.clone())).unwrap();
    RunnerHandle(Arc::new(runner))
}

fn render_screen(runner: RunnerHandle) -> String {
    let mut dom = VirtualDom::new(QuizScreenHarness).with_root_context(runner);
    dom.rebuild_in_place();
    dioxus_ssr::render(&dom)
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_screen_renders_fresh_session() {
    let ticks = ManualTickers::new();
    let runner = start_runner(&ticks);
    let prompt = runner.0.snapshot().prompt.unwrap();

    let html = render_screen(runner);
    assert!(html.contains("Soru 1/10"), "missing progress in {html}");
    assert!(html.contains("Süre: 10:00"), "missing timer in {html}");
    assert!(html.contains("Skor: 0"), "missing score in {html}");
    assert!(html.contains("3 hakkınız kaldı"), "missing strikes in {html}");
    assert!(html.contains(&prompt), "missing prompt in {html}");
    assert!(!html.contains("Doğru cevap"), "unexpected reveal in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_screen_shows_reveal_banner() {
    let ticks = ManualTickers::new();
    let runner = start_runner(&ticks);
    for _ in 0..3 {
        runner.0.submit_answer("yanlış").unwrap();
    }
    let answer = runner.0.snapshot().revealed_answer.unwrap();

    let html = render_screen(runner);
    assert!(html.contains("Soru 3/10"), "missing progress in {html}");
    assert!(
        html.contains(&format!("Doğru cevap: {answer}")),
        "missing reveal in {html}"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_screen_shows_result_after_timeout() {
    let ticks = ManualTickers::new();
    let runner = start_runner(&ticks);
    let mut rx = runner.0.subscribe();
    ticks.advance(600);
    rx.wait_for(|snapshot| snapshot.is_over()).await.map(|_| ()).unwrap();

    let html = render_screen(runner);
    assert!(html.contains("Süre Doldu!"), "missing heading in {html}");
    assert!(html.contains("Skorunuz: 0/10 (0%)"), "missing score in {html}");
}
