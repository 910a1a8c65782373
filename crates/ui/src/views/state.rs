use dioxus::prelude::*;

use quiz_core::model::SessionError;
use quiz_services::ServiceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotEnoughQuestions,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn from_service(err: &ServiceError) -> Self {
        match err {
            ServiceError::Session(SessionError::InsufficientQuestions { .. }) => {
                Self::NotEnoughQuestions
            }
            _ => Self::Unknown,
        }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotEnoughQuestions => "Soru bankasında yeterli soru yok.",
            Self::Unknown => "Bir şeyler ters gitti. Lütfen tekrar deneyin.",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: &Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
