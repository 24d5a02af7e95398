//! Deploy keys
//!
//! A [`DeployKey`] is an SSH key record used to authenticate git pulls of
//! Puppet code. Keys live directly under the account, not under a master;
//! a master references one by name through its `deploy_key` field.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{decode, Resource};
use crate::api::client::ApiClient;
use crate::error::Result;

/// Typed snapshot of a deploy key document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct DeployKeyData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Fields the API returns that this struct has no column for.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct DeployKeyList {
    deploy_keys: Vec<DeployKeyData>,
}

/// An SSH deploy key record.
#[derive(Clone, Debug)]
pub struct DeployKey {
    client: ApiClient,
    name: String,
    cached: DeployKeyData,
}

impl DeployKey {
    /// Lists all deploy keys on the account, each seeded with its element of
    /// the collection payload.
    pub async fn list(client: &ApiClient) -> Result<Vec<DeployKey>> {
        let (body, _) = client.get("/deploy-keys").await?;
        let list: DeployKeyList = decode(body)?;
        Ok(list
            .deploy_keys
            .into_iter()
            .map(|data| DeployKey::from_data(client.clone(), data))
            .collect())
    }

    /// Fetches one deploy key by name.
    pub async fn fetch(client: &ApiClient, name: &str) -> Result<DeployKey> {
        let (body, _) = client.get(&format!("/deploy-keys/{name}")).await?;
        Ok(DeployKey::from_data(client.clone(), decode(body)?))
    }

    /// Creates a deploy key and returns it seeded with the creation
    /// response, which carries the generated key material.
    pub async fn create(client: &ApiClient, name: &str) -> Result<DeployKey> {
        let (body, _) = client
            .post("/deploy-keys", Some(&json!({ "name": name })))
            .await?;
        Ok(DeployKey::from_data(client.clone(), decode(body)?))
    }

    /// Wraps a snapshot that was already fetched.
    pub fn from_data(client: ApiClient, data: DeployKeyData) -> DeployKey {
        DeployKey {
            name: data.name.clone(),
            client,
            cached: data,
        }
    }

    /// Name of this key, which is also its identity on the API.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Deletes this deploy key from the account.
    ///
    /// Consumes the object; the cached snapshot describes a resource that no
    /// longer exists.
    pub async fn delete(self) -> Result<()> {
        self.client.delete(&self.canonical_path()).await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for DeployKey {
    type Data = DeployKeyData;

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn canonical_path(&self) -> String {
        format!("/deploy-keys/{}", self.name)
    }

    fn cached(&self) -> &DeployKeyData {
        &self.cached
    }

    fn replace(&mut self, data: DeployKeyData) {
        self.cached = data;
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.cached.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_payload_decodes_to_snapshots() {
        let body = json!({
            "deploy_keys": [
                {"name": "infra", "fingerprint": "11:22", "public_key": "ssh-rsa AAAA..."}
            ]
        });
        let list: DeployKeyList = decode(body).unwrap();
        assert_eq!(list.deploy_keys.len(), 1);
        assert_eq!(list.deploy_keys[0].name, "infra");
        assert_eq!(list.deploy_keys[0].public_key.as_deref(), Some("ssh-rsa AAAA..."));
    }

    #[test]
    fn snapshot_without_name_is_invalid() {
        let body = json!({"fingerprint": "11:22"});
        assert!(decode::<DeployKeyData>(body).is_err());
    }
}
