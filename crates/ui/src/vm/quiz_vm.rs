use quiz_core::model::QuizResult;
use quiz_services::QuizSnapshot;

use crate::vm::time_fmt::{format_countdown, is_low_time};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrikeVm {
    pub remaining: u32,
    pub used: u32,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub heading: String,
    pub score_label: String,
    pub timed_out: bool,
}

/// Display strings for the quiz screen, derived from a `QuizSnapshot`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub progress_label: String,
    pub time_label: String,
    pub time_low: bool,
    pub score_label: String,
    pub prompt: String,
    pub revealed_answer_label: Option<String>,
    pub strikes: StrikeVm,
    pub result: Option<ResultVm>,
}

impl From<&QuizSnapshot> for QuizVm {
    fn from(snapshot: &QuizSnapshot) -> Self {
        Self {
            progress_label: format!(
                "Soru {}/{}",
                snapshot.question_number, snapshot.question_count
            ),
            time_label: format!("Süre: {}", format_countdown(snapshot.remaining_seconds)),
            time_low: is_low_time(snapshot.remaining_seconds),
            score_label: format!("Skor: {}", snapshot.score),
            prompt: snapshot.prompt.clone().unwrap_or_default(),
            revealed_answer_label: snapshot
                .revealed_answer
                .as_ref()
                .map(|answer| format!("Doğru cevap: {answer}")),
            strikes: map_strikes(snapshot.remaining_strikes, snapshot.max_strikes),
            result: snapshot.result.as_ref().map(ResultVm::from),
        }
    }
}

impl From<&QuizResult> for ResultVm {
    fn from(result: &QuizResult) -> Self {
        let timed_out = result.is_timeout();
        let heading = if timed_out {
            "Süre Doldu!"
        } else {
            "Test Tamamlandı!"
        };
        Self {
            heading: heading.to_string(),
            score_label: format!(
                "Skorunuz: {}/{} ({:.0}%)",
                result.score,
                result.total,
                result.percentage.round()
            ),
            timed_out,
        }
    }
}

#[must_use]
pub fn map_strikes(remaining: u32, max: u32) -> StrikeVm {
    StrikeVm {
        remaining,
        used: max.saturating_sub(remaining),
        label: format!("{remaining} hakkınız kaldı"),
    }
}
