use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{StatusError, record};

const STATUS_SUCCESS: &str = "SUCCESS";

/// API keys sent along with every request.
#[derive(Clone)]
pub(crate) struct Credentials {
    apikey: String,
    secretapikey: String,
}

impl Credentials {
    pub(crate) fn new(apikey: &str, secretapikey: &str) -> Self {
        Self {
            apikey: apikey.to_string(),
            secretapikey: secretapikey.to_string(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("apikey", &self.apikey)
            .field("secretapikey", &"<redacted>")
            .finish()
    }
}

/// Payload to send to the Porkbun API.
///
/// The authorization details and the fields of `payload` end up side by side
/// in a single JSON object, so `payload` has to serialize to a map.
#[derive(Debug, Serialize)]
pub(crate) struct AuthRequest<'a, T: ?Sized> {
    apikey: &'a str,
    secretapikey: &'a str,
    #[serde(flatten)]
    payload: Option<&'a T>,
}

impl<'a, T: ?Sized> AuthRequest<'a, T> {
    pub(crate) fn new(credentials: &'a Credentials, payload: Option<&'a T>) -> Self {
        Self {
            apikey: &credentials.apikey,
            secretapikey: &credentials.secretapikey,
            payload,
        }
    }
}

/// The part of every response that tells whether the call succeeded.
#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

impl Status {
    pub(crate) fn into_result(self) -> Result<(), StatusError> {
        if self.status == STATUS_SUCCESS {
            Ok(())
        } else {
            Err(StatusError::new(self.status, self.message))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PingResponse {
    pub(crate) your_ip: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateResponse {
    #[serde(deserialize_with = "record::deserialize_to_i64")]
    pub(crate) id: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordsResponse {
    pub(crate) records: Vec<record::Record>,
}
