//! Agent certificates
//!
//! A [`Certificate`] is an agent TLS certificate record scoped to one
//! master. Its lifecycle (pending, signed, revoked) is driven through the
//! sign and revoke actions; the cached snapshot follows along.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{decode, Resource, Status};
use crate::api::client::ApiClient;
use crate::error::Result;

/// Typed snapshot of a certificate document.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CertificateData {
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    /// Fields the API returns that this struct has no column for.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct CertificateList {
    certs: Vec<CertificateData>,
}

/// An agent certificate record tied to one master.
#[derive(Clone, Debug)]
pub struct Certificate {
    client: ApiClient,
    master_id: String,
    hostname: String,
    cached: CertificateData,
}

impl Certificate {
    /// Lists all certificates the master knows about, each seeded with its
    /// element of the collection payload.
    pub async fn list(client: &ApiClient, master_id: &str) -> Result<Vec<Certificate>> {
        let (body, _) = client.get(&format!("/masters/{master_id}/certs")).await?;
        let list: CertificateList = decode(body)?;
        Ok(list
            .certs
            .into_iter()
            .map(|data| Certificate::from_data(client.clone(), master_id.to_string(), data))
            .collect())
    }

    /// Fetches one certificate by agent hostname.
    pub async fn fetch(
        client: &ApiClient,
        master_id: &str,
        hostname: &str,
    ) -> Result<Certificate> {
        let (body, _) = client
            .get(&format!("/masters/{master_id}/certs/{hostname}"))
            .await?;
        Ok(Certificate::from_data(
            client.clone(),
            master_id.to_string(),
            decode(body)?,
        ))
    }

    /// Wraps a snapshot that was already fetched.
    pub fn from_data(client: ApiClient, master_id: String, data: CertificateData) -> Certificate {
        Certificate {
            hostname: data.hostname.clone(),
            client,
            master_id,
            cached: data,
        }
    }

    /// Hostname of the agent this certificate was issued for.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    /// Id of the owning master.
    pub fn master_id(&self) -> &str {
        &self.master_id
    }

    /// Signs this certificate, then reloads the snapshot so the new status
    /// is visible.
    pub async fn sign(&mut self) -> Result<()> {
        let path = format!("{}/sign", self.canonical_path());
        self.client.post(&path, None).await?;
        self.reload().await
    }

    /// Revokes this certificate, then reloads the snapshot.
    pub async fn revoke(&mut self) -> Result<()> {
        let path = format!("{}/revoke", self.canonical_path());
        self.client.post(&path, None).await?;
        self.reload().await
    }

    /// Deletes this certificate record from its master.
    ///
    /// Consumes the object; the cached snapshot describes a resource that no
    /// longer exists.
    pub async fn delete(self) -> Result<()> {
        self.client.delete(&self.canonical_path()).await?;
        Ok(())
    }
}

#[async_trait]
impl Resource for Certificate {
    type Data = CertificateData;

    fn client(&self) -> &ApiClient {
        &self.client
    }

    fn canonical_path(&self) -> String {
        format!("/masters/{}/certs/{}", self.master_id, self.hostname)
    }

    fn cached(&self) -> &CertificateData {
        &self.cached
    }

    fn replace(&mut self, data: CertificateData) {
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
            "certs": [
                {"hostname": "node1.example.com", "status": {"code": 0, "message": "PENDING"}},
                {"hostname": "node2.example.com", "fingerprint": "AA:BB"}
            ]
        });
        let list: CertificateList = decode(body).unwrap();
        assert_eq!(list.certs.len(), 2);
        assert_eq!(list.certs[0].status.as_ref().unwrap().code, Some(0));
        assert_eq!(list.certs[1].fingerprint.as_deref(), Some("AA:BB"));
    }

    #[test]
    fn snapshot_without_hostname_is_invalid() {
        let body = json!({"fingerprint": "AA:BB"});
        assert!(decode::<CertificateData>(body).is_err());
    }
}
