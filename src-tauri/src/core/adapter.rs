//! Boundary to the external key-value identity service.
//!
//! The controller only ever talks to an [`IdentityAdapter`]; the production
//! implementation is [`super::client::HttpIdentityClient`], tests use an
//! in-memory store.

use async_trait::async_trait;

use super::errors::AdapterError;
use super::fields::{FieldEntry, FieldValue, ProfileField};

#[async_trait]
pub trait IdentityAdapter: Send + Sync {
    /// Fetch `fields` for `address`.  The result has one slot per requested
    /// field, in request order; `None` means the store holds no value.
    async fn get(
        &self,
        address: &str,
        fields: &[ProfileField],
    ) -> Result<Vec<Option<FieldValue>>, AdapterError>;

    /// Write `entries` for `address` and return the values the store
    /// acknowledged.
    async fn put(
        &self,
        address: &str,
        entries: &[FieldEntry],
    ) -> Result<Vec<FieldValue>, AdapterError>;
}
