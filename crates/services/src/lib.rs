#![forbid(unsafe_code)]

pub mod bank_loader;
pub mod error;
pub mod quiz_service;
pub mod runner;
pub mod snapshot;
pub mod ticker;

pub use quiz_core::Clock;

pub use bank_loader::{load_bank, parse_bank};
pub use error::{BankLoadError, ServiceError};
pub use quiz_service::QuizService;
pub use runner::QuizRunner;
pub use snapshot::QuizSnapshot;
pub use ticker::{IntervalTickers, ManualTickers, Ticker, TickerSource};
