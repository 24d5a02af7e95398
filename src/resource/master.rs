//! Puppet masters
//!
//! A [`Master`] is a managed Puppet server instance. Besides the cached
//! snapshot it exposes the server-side actions (refresh, restart) and the
//! sub-resources hanging off its path (certificates, CRL, environments).

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::certificate::Certificate;
use super::{decode, Resource, Status};
use crate::api::client::ApiClient;
use crate::error::{Error, Result};

/// Typed snapshot of a master document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MasterData {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy_key: Option<String>,
    /// Fields the API returns that this struct has no column for.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct MasterList {
    masters: Vec<MasterData>,
}

#[derive(Deserialize)]
struct CrlResponse {
    crl: String,
}

#[derive(Deserialize)]
struct EnvironmentsResponse {
    environments: Vec<Value>,
}

#[derive(Deserialize)]
struct LastUpdateResponse {
    result: Value,
}

/// Outcome of a server-side action request (refresh, restart).
///
/// The server runs these asynchronously. A 409 Conflict means an identical
/// action is already running; that is a normal answer, not a failure, so it
/// gets its own variant instead of an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the request and started the action.
    Started,
    /// The same action was already running on the server.
    AlreadyInProgress,
}

/// A managed Puppet server instance.
#[derive(Clone, Debug)]
pub struct Master {
    client: ApiClient,
    id: String,
    cached: MasterData,
}

impl Master {
    /// Lists all masters visible to the configured credentials.
    ///
    /// Every returned object is seeded with its element of the collection
    /// payload; no per-master request is made.
    pub async fn list(client: &ApiClient) -> Result<Vec<Master>> {
        let (body, _) = client.get("/masters").await?;
        let list: MasterList = decode(body)?;
        Ok(list
            .masters
            .into_iter()
            .map(|data| Master::from_data(client.clone(), data))
            .collect())
    }

    /// Fetches one master by id.
    pub async fn fetch(client: &ApiClient, id: &str) -> Result<Master> {
        let (body, _) = client.get(&format!("/masters/{id}")).await?;
        Ok(Master::from_data(client.clone(), decode(body)?))
    }

    /// Finds the first master whose name matches `name` exactly.
    ///
    /// A name with no match is not an error, just `None`.
    pub async fn find_by_name(client: &ApiClient, name: &str) -> Result<Option<Master>> {
        let masters = Master::list(client).await?;
        Ok(masters.into_iter().find(|m| m.cached.name == name))
    }

    /// Creates a master and returns it seeded with the creation response.
    pub async fn create(client: &ApiClient, fields: &Value) -> Result<Master> {
        let (body, _) = client.post("/masters", Some(fields)).await?;
        Ok(Master::from_data(client.clone(), decode(body)?))
    }

    /// Wraps a snapshot that was already fetched, e.g. one element of a
    /// listing payload.
    pub fn from_data(client: ApiClient, data: MasterData) -> Master {
        Master {
            id: data.id.clone(),
            client,
            cached: data,
        }
    }

    /// Unique id of this master.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Asks the server to redeploy this master's Puppet code.
    pub async fn refresh(&mut self) -> Result<ActionOutcome> {
        self.action("refresh").await
    }

    /// Asks the server to restart this master's services.
    pub async fn restart(&mut self) -> Result<ActionOutcome> {
        self.action("restart").await
    }

    async fn action(&mut self, verb: &str) -> Result<ActionOutcome> {
        let path = format!("{}/{}", self.canonical_path(), verb);
        let outcome = match self.client.post(&path, None).await {
            Ok(_) => ActionOutcome::Started,
            Err(Error::Api { status, .. }) if status == StatusCode::CONFLICT => {
                ActionOutcome::AlreadyInProgress
            }
            Err(err) => return Err(err),
        };
        // The action mutates server state, so the cache is stale either way.
        self.reload().await?;
        Ok(outcome)
    }

    /// Certificate revocation list of this master, in PEM form.
    pub async fn crl(&self) -> Result<String> {
        let path = format!("{}/crl", self.canonical_path());
        let (body, _) = self.client.get(&path).await?;
        let response: CrlResponse = decode(body)?;
        Ok(response.crl)
    }

    /// Puppet environments currently deployed on this master.
    pub async fn environments(&self) -> Result<Vec<Value>> {
        let path = format!("{}/environments", self.canonical_path());
        let (body, _) = self.client.get(&path).await?;
        let response: EnvironmentsResponse = decode(body)?;
        Ok(response.environments)
    }

    /// Report of the most recent code update run on this master.
    pub async fn last_update(&self) -> Result<Value> {
        let path = format!("{}/last-update", self.canonical_path());
        let (body, _) = self.client.get(&path).await?;
        let response: LastUpdateResponse = decode(body)?;
        Ok(response.result)
    }

    /// Lists this master's agent certificates.
    ///
    /// With `status` set, only certificates whose status message matches
    /// exactly are kept (e.g. `"SIGNED"` or `"PENDING"`).
    pub async fn certificates(&self, status: Option<&str>) -> Result<Vec<Certificate>> {
        let certificates = Certificate::list(&self.client, &self.id).await?;
        match status {
            None => Ok(certificates),
            Some(wanted) => Ok(certificates
                .into_iter()
                .filter(|cert| {
                    cert.cached()
                        .status
                        .as_ref()
                        .map(|s| s.message == wanted)
                        .unwrap_or(false)
                })
                .collect()),
        }
    }

    /// Fetches one agent certificate of this master by hostname.
    pub async fn certificate(&self, hostname: &str) -> Result<Certificate> {
        Certificate::fetch(&self.client, &self.id, hostname).await
    }
}

#[async_trait]
impl Resource for Master {
    type Data = MasterData;

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn canonical_path(&self) -> String {
        format!("/masters/{}", self.id)
    }

    fn cached(&self) -> &MasterData {
        &self.cached
    }

    fn replace(&mut self, data: MasterData) {
        self.cached = data;
    }

    fn extra(&self) -> &Map<String, Value> {
        &self.cached.extra
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_payload_decodes_to_snapshots() {
        let body = json!({
            "masters": [{"id": "abc", "name": "m1", "status": {"message": "SIGNED"}}]
        });
        let list: MasterList = decode(body).unwrap();
        assert_eq!(list.masters.len(), 1);

        let data = &list.masters[0];
        assert_eq!(data.id, "abc");
        assert_eq!(data.name, "m1");
        assert_eq!(data.status.as_ref().unwrap().message, "SIGNED");
        assert!(data.status.as_ref().unwrap().code.is_none());
        assert!(data.hostname.is_none());
    }

    #[test]
    fn unknown_fields_land_in_extra() {
        let body = json!({
            "id": "abc",
            "name": "m1",
            "datacenter": "gra1",
            "slots": 3
        });
        let data: MasterData = decode(body).unwrap();
        assert_eq!(data.extra.get("datacenter"), Some(&json!("gra1")));
        assert_eq!(data.extra.get("slots"), Some(&json!(3)));
        // Typed fields must not be duplicated into the side map.
        assert!(!data.extra.contains_key("name"));
    }

    #[test]
    fn snapshot_without_id_is_invalid() {
        let body = json!({"name": "m1"});
        assert!(decode::<MasterData>(body).is_err());
    }
}
