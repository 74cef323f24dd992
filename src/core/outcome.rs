//! Success-or-error container for API-level failures.
//!
//! Upstream APIs report some failures (unknown item, empty page) inside a
//! successful HTTP response. Those are returned as [`ApiResult::Err`] data
//! rather than raised, so callers branch on the tag instead of catching.

use crate::domain::model::ErrorResponse;
use crate::utils::error::{Result, RsWikiError};
use serde::Serialize;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[must_use]
pub enum ApiResult<T, E = ErrorResponse> {
    Ok(T),
    Err(E),
}

impl<T, E> ApiResult<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, ApiResult::Ok(_))
    }

    pub fn is_err(&self) -> bool {
        matches!(self, ApiResult::Err(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            ApiResult::Ok(value) => Some(value),
            ApiResult::Err(_) => None,
        }
    }

    pub fn err(self) -> Option<E> {
        match self {
            ApiResult::Ok(_) => None,
            ApiResult::Err(error) => Some(error),
        }
    }

    pub fn as_ref(&self) -> ApiResult<&T, &E> {
        match self {
            ApiResult::Ok(value) => ApiResult::Ok(value),
            ApiResult::Err(error) => ApiResult::Err(error),
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> ApiResult<U, E> {
        match self {
            ApiResult::Ok(value) => ApiResult::Ok(f(value)),
            ApiResult::Err(error) => ApiResult::Err(error),
        }
    }

    pub fn into_result(self) -> std::result::Result<T, E> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Err(error) => Err(error),
        }
    }
}

impl<T: Debug, E: Debug> ApiResult<T, E> {
    /// Returns the success value, or an `Unwrap` error describing the error payload.
    pub fn unwrap(self) -> Result<T> {
        match self {
            ApiResult::Ok(value) => Ok(value),
            ApiResult::Err(error) => Err(RsWikiError::Unwrap {
                message: format!("Called unwrap on an error value - {:?}", error),
            }),
        }
    }

    /// Returns the error value, or an `Unwrap` error describing the success payload.
    pub fn unwrap_err(self) -> Result<E> {
        match self {
            ApiResult::Ok(value) => Err(RsWikiError::Unwrap {
                message: format!("Called unwrap_err on a non error value - {:?}", value),
            }),
            ApiResult::Err(error) => Ok(error),
        }
    }
}

impl<T, E> From<ApiResult<T, E>> for std::result::Result<T, E> {
    fn from(value: ApiResult<T, E>) -> Self {
        value.into_result()
    }
}
