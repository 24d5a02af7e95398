//! Cached resource objects
//!
//! Every API resource is a small object holding an [`ApiClient`] handle, its
//! natural key and the last data snapshot fetched from the server. Accessors
//! read that cached snapshot only; [`Resource::reload`] replaces it wholesale
//! with a fresh copy. Nothing here refetches behind an attribute access.
//!
//! - [`master`] - Puppet masters and their lifecycle actions
//! - [`certificate`] - Agent certificates scoped to a master
//! - [`deploy_key`] - Deploy keys for pulling Puppet code

pub mod certificate;
pub mod deploy_key;
pub mod master;

pub use certificate::{Certificate, CertificateData};
pub use deploy_key::{DeployKey, DeployKeyData};
pub use master::{ActionOutcome, Master, MasterData};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::api::client::ApiClient;
use crate::error::Result;

/// Status block attached to masters and certificates.
///
/// The API reports lifecycle state as a `{code, message}` object where the
/// message carries values like `RUNNING`, `PENDING` or `SIGNED`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Status {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}

/// Decodes a response body into a typed snapshot.
///
/// A body that does not match the expected shape is an
/// [`InvalidResponse`](crate::error::Error::InvalidResponse) since the server
/// answered with success but not with the document it promised.
pub(crate) fn decode<T: DeserializeOwned>(body: Value) -> Result<T> {
    Ok(serde_json::from_value(body)?)
}

/// Common behavior of cached resource objects.
///
/// Implementors store the last snapshot fetched from the server and expose it
/// through [`cached`](Resource::cached). The snapshot only changes when
/// [`reload`](Resource::reload) (or an action that reloads internally) runs;
/// independent objects for the same server resource never see each other's
/// reloads.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Typed snapshot this resource caches.
    type Data: DeserializeOwned + Send;

    /// Client used for requests on this resource.
    fn client(&self) -> &ApiClient;

    /// Canonical API path of this resource, derived from its natural key.
    fn canonical_path(&self) -> String;

    /// Last snapshot fetched from the server.
    fn cached(&self) -> &Self::Data;

    /// Replaces the cached snapshot wholesale.
    fn replace(&mut self, data: Self::Data);

    /// Fields of the snapshot this crate has no typed column for.
    fn extra(&self) -> &Map<String, Value>;

    /// Fetches a fresh snapshot from the canonical path and replaces the
    /// cached one. Fields absent from the new snapshot disappear.
    async fn reload(&mut self) -> Result<()> {
        let (body, _) = self.client().get(&self.canonical_path()).await?;
        self.replace(decode(body)?);
        Ok(())
    }

    /// Looks up a field the typed snapshot does not model.
    ///
    /// Returns `None` when the cached snapshot has no such field; this never
    /// triggers a request.
    fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra().get(name)
    }
}
