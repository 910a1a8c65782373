mod quiz_vm;
mod time_fmt;

pub use quiz_vm::{QuizVm, ResultVm, StrikeVm, map_strikes};
pub use time_fmt::{LOW_TIME_SECONDS, format_countdown, is_low_time};
