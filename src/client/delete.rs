//! Delete a photo or a timelapse on the server and reflect the outcome in the view.
//!
//! The server answers with a JSON object whose `error` field tells whether the
//! deletion failed. On success the resource's `{id}_card` element is removed;
//! on failure its `{id}_error` element is made visible and the card stays.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use super::transport::Transport;
use super::view::ViewModel;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeleteError {
    /// Non-success HTTP status. The inline error has been revealed.
    #[error("Server rejected the deletion with status {status}")]
    ServerRejected { status: u16 },

    #[error("Transport failure: {0}")]
    TransportFailure(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Photo,
    Timelapse,
}

impl ResourceKind {
    pub fn endpoint_path(self) -> &'static str {
        match self {
            ResourceKind::Photo => "/deletephoto",
            ResourceKind::Timelapse => "/deletetimelapse",
        }
    }

    /// Key under which the identifier travels in the request body
    pub fn body_key(self) -> &'static str {
        match self {
            ResourceKind::Photo => "name",
            ResourceKind::Timelapse => "timelapse",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Photo => write!(f, "photo"),
            ResourceKind::Timelapse => write!(f, "timelapse"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRequest<'a> {
    pub kind: ResourceKind,
    pub identifier: &'a str,
}

impl<'a> DeleteRequest<'a> {
    pub fn new(kind: ResourceKind, identifier: &'a str) -> Self {
        Self { kind, identifier }
    }

    /// Single-key body: `{"name": id}` or `{"timelapse": id}`
    pub fn body(&self) -> Value {
        let mut body = Map::new();
        body.insert(self.kind.body_key().to_string(), json!(self.identifier));
        Value::Object(body)
    }

    pub fn card_id(&self) -> String {
        format!("{}_card", self.identifier)
    }

    pub fn error_id(&self) -> String {
        format!("{}_error", self.identifier)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteResponse {
    pub error: Value,
}

impl DeleteResponse {
    pub fn parse(body: &[u8]) -> Result<Self, DeleteError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DeleteError::MalformedResponse(e.to_string()))?;
        match value {
            Value::Object(mut map) => Ok(Self {
                error: map.remove("error").unwrap_or(Value::Null),
            }),
            other => Err(DeleteError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    pub fn is_error(&self) -> bool {
        is_truthy(&self.error)
    }
}

/// Script-style truthiness: null, false, zero and the empty string are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Ask the server to delete one resource and update the view accordingly.
///
/// Returns `Ok(true)` when the server reports success, `Ok(false)` when it
/// reports an error in the reply body. Exactly one request is sent.
pub async fn delete_resource<T, V>(
    transport: &T,
    view: &V,
    kind: ResourceKind,
    identifier: &str,
) -> Result<bool, DeleteError>
where
    T: Transport + ?Sized,
    V: ViewModel + ?Sized,
{
    let request = DeleteRequest::new(kind, identifier);
    debug!("Deleting {} '{}' via {}", kind, identifier, kind.endpoint_path());

    let response = transport.post_json(kind.endpoint_path(), &request.body()).await?;

    if !response.is_success() {
        reveal_error(view, &request);
        return Err(DeleteError::ServerRejected {
            status: response.status,
        });
    }

    let reply = DeleteResponse::parse(&response.body)?;
    if reply.is_error() {
        reveal_error(view, &request);
        return Ok(false);
    }

    remove_card(view, &request);
    Ok(true)
}

pub async fn delete_photo<T, V>(transport: &T, view: &V, name: &str) -> Result<bool, DeleteError>
where
    T: Transport + ?Sized,
    V: ViewModel + ?Sized,
{
    delete_resource(transport, view, ResourceKind::Photo, name).await
}

pub async fn delete_timelapse<T, V>(transport: &T, view: &V, timelapse: &str) -> Result<bool, DeleteError>
where
    T: Transport + ?Sized,
    V: ViewModel + ?Sized,
{
    delete_resource(transport, view, ResourceKind::Timelapse, timelapse).await
}

fn reveal_error<V: ViewModel + ?Sized>(view: &V, request: &DeleteRequest<'_>) {
    match view.get_element(&request.error_id()) {
        Some(handle) => view.set_display(&handle, true),
        None => info!("No error element '{}' to reveal", request.error_id()),
    }
}

// Removal is best effort: a card already gone (e.g. a duplicate trigger) is fine.
fn remove_card<V: ViewModel + ?Sized>(view: &V, request: &DeleteRequest<'_>) {
    let card_id = request.card_id();
    let Some(handle) = view.get_element(&card_id) else {
        info!("Card '{}' already removed", card_id);
        return;
    };
    if let Err(e) = view.remove(&handle) {
        info!("{}", e);
    }
}
