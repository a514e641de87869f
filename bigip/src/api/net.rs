//! Network API module (`/mgmt/tm/net`)

use crate::api::{client::Client, error::ApiError};
use serde::{Deserialize, Serialize};

pub const SELF_IPS_PATH: &str = "/mgmt/tm/net/self";

pub struct NetApi<'a> {
    client: &'a Client,
}

impl<'a> NetApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Self-IP addresses configured on the device.
    pub async fn self_ips(&self) -> Result<Vec<SelfIp>, ApiError> {
        let collection: SelfIpCollection = self.client.get(SELF_IPS_PATH).await?;
        Ok(collection.items)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelfIp {
    pub name: String,
    #[serde(default)]
    pub partition: String,
    #[serde(default)]
    pub full_path: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub vlan: String,
    #[serde(default)]
    pub traffic_group: String,
    #[serde(default)]
    pub floating: String,
}

/// An empty collection comes back without `items`.
#[derive(Debug, Deserialize)]
struct SelfIpCollection {
    #[serde(default)]
    items: Vec<SelfIp>,
}
