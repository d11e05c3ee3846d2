//! The seam towards the HTTP transport.
//!
//! Transport and authentication live outside this crate. Anything able to
//! perform an authenticated request implements [`ApiClient`] once at startup
//! and is handed explicitly to the tracker and the policy store.

use std::fmt::{Display, Formatter};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Display for Method {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            Error::protocol(format!("unreadable response body ({}): {}", e, self.body))
        })
    }

    pub fn has_body(&self) -> bool {
        !self.body.trim().is_empty()
    }
}

pub trait ApiClient {
    /// Performs one request. Transport failures come back as [`Error::Transport`].
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<RawResponse>;
}

impl<F> ApiClient for F
where
    F: Fn(Method, &str, Option<&Value>) -> Result<RawResponse>,
{
    fn request(&self, method: Method, path: &str, body: Option<&Value>) -> Result<RawResponse> {
        self(method, path, body)
    }
}

fn auth_failure(response: &RawResponse) -> Option<Error> {
    match response.status {
        401 => Some(Error::Unauthorized {
            body: response.body.clone(),
        }),
        403 => Some(Error::Forbidden {
            body: response.body.clone(),
        }),
        _ => None,
    }
}

/// Checks the answer to a mutating request against the codes the endpoint documents.
pub(crate) fn expect_accepted(response: RawResponse, accepted: &[u16]) -> Result<RawResponse> {
    if accepted.contains(&response.status) {
        return Ok(response);
    }
    Err(auth_failure(&response).unwrap_or(Error::Submission {
        status: response.status,
        body: response.body,
    }))
}

/// Checks the answer to a read; 404 becomes [`Error::NotFound`].
pub(crate) fn expect_found(response: RawResponse, path: &str) -> Result<RawResponse> {
    if (200..300).contains(&response.status) {
        return Ok(response);
    }
    if response.status == 404 {
        return Err(Error::NotFound {
            path: path.to_string(),
        });
    }
    Err(auth_failure(&response).unwrap_or(Error::Api {
        status: response.status,
        body: response.body,
    }))
}
