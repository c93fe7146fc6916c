//! Client side of the gallery: the delete-resource interaction and the
//! view-model it updates.

pub mod delete;
pub mod fields;
pub mod transport;
pub mod view;

pub use delete::{delete_photo, delete_resource, delete_timelapse, DeleteError, DeleteRequest, DeleteResponse, ResourceKind};
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use view::{Document, Element, ElementHandle, ViewError, ViewModel};
