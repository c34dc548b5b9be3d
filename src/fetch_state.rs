//! Shared request state for one dashboard panel
//!
//! Used by both the browser and the native fetch clients.

use crate::core::DashboardError;

#[derive(Clone, Debug, Default, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested (selection incomplete).
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(DashboardError),
}

impl<T> FetchState<T> {
    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Loaded(t) => Some(t),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn error(&self) -> Option<&DashboardError> {
        match self {
            FetchState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchState<U> {
        match self {
            FetchState::Idle => FetchState::Idle,
            FetchState::Loading => FetchState::Loading,
            FetchState::Loaded(t) => FetchState::Loaded(f(t)),
            FetchState::Failed(e) => FetchState::Failed(e),
        }
    }
}

impl<T> From<Result<T, DashboardError>> for FetchState<T> {
    fn from(res: Result<T, DashboardError>) -> Self {
        match res {
            Ok(t) => FetchState::Loaded(t),
            Err(e) => FetchState::Failed(e),
        }
    }
}
