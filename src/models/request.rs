use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Fields shared by every request variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(rename = "requestid")]
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A request pushed to a session through the dispatch endpoint.
///
/// The set is closed: the `method` field selects the variant and anything
/// else is rejected by [`decode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum ClientRequest {
    #[serde(rename = "ping")]
    Ping(RequestBody),
    #[serde(rename = "resources/list")]
    ListResources(RequestBody),
    #[serde(rename = "tools/list")]
    ListTools(RequestBody),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Ping,
    ListResources,
    ListTools,
}

impl RequestMethod {
    pub const ALL: [RequestMethod; 3] = [
        RequestMethod::Ping,
        RequestMethod::ListResources,
        RequestMethod::ListTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestMethod::Ping => "ping",
            RequestMethod::ListResources => "resources/list",
            RequestMethod::ListTools => "tools/list",
        }
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestMethod {
    type Err = RequestDecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestMethod::ALL
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| RequestDecodeError::UnknownMethod(s.to_string()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum RequestDecodeError {
    #[error("invalid JSON payload: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("request payload must be a JSON object")]
    NotAnObject,

    #[error("missing field `method`")]
    MissingMethod,

    #[error("unknown method `{0}`, expected one of `ping`, `resources/list`, `tools/list`")]
    UnknownMethod(String),

    #[error("invalid `{method}` request: {source}")]
    InvalidRequest {
        method: RequestMethod,
        #[source]
        source: serde_json::Error,
    },
}

/// Decode a raw dispatch body into one of the known request variants.
pub fn decode(raw: &[u8]) -> Result<ClientRequest, RequestDecodeError> {
    let value: Value = serde_json::from_slice(raw).map_err(RequestDecodeError::Malformed)?;
    let object = value.as_object().ok_or(RequestDecodeError::NotAnObject)?;

    let method = match object.get("method") {
        None | Some(Value::Null) => return Err(RequestDecodeError::MissingMethod),
        Some(Value::String(name)) => name.parse::<RequestMethod>()?,
        Some(other) => return Err(RequestDecodeError::UnknownMethod(other.to_string())),
    };

    serde_json::from_value(value)
        .map_err(|source| RequestDecodeError::InvalidRequest { method, source })
}

impl ClientRequest {
    pub fn method(&self) -> RequestMethod {
        match self {
            ClientRequest::Ping(_) => RequestMethod::Ping,
            ClientRequest::ListResources(_) => RequestMethod::ListResources,
            ClientRequest::ListTools(_) => RequestMethod::ListTools,
        }
    }

    fn body(&self) -> &RequestBody {
        match self {
            ClientRequest::Ping(body)
            | ClientRequest::ListResources(body)
            | ClientRequest::ListTools(body) => body,
        }
    }

    pub fn request_id(&self) -> &str {
        &self.body().request_id
    }

    pub fn params(&self) -> Option<&Value> {
        self.body().params.as_ref()
    }

    /// The line pushed back to the stream for this request.
    pub fn response(&self) -> &'static str {
        match self {
            ClientRequest::Ping(_) => "this is a ping request",
            ClientRequest::ListResources(_) => "this is a list resources request",
            ClientRequest::ListTools(_) => "this is a list tools request",
        }
    }
}
