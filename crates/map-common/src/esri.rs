//! Wire fragments shared by ArcGIS REST map and feature services.

use serde::{Deserialize, Serialize};

use crate::CrsId;

/// `spatialReference` object as it appears in service documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpatialReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkid: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_wkid: Option<u32>,
}

impl SpatialReference {
    pub fn from_wkid(wkid: u32) -> Self {
        Self {
            wkid: Some(wkid),
            latest_wkid: None,
        }
    }

    /// `EPSG:<wkid>`, if a wkid is present.
    pub fn crs_id(&self) -> Option<CrsId> {
        self.wkid.map(CrsId::epsg)
    }

    pub fn latest_crs_id(&self) -> Option<CrsId> {
        self.latest_wkid.map(CrsId::epsg)
    }
}

/// ArcGIS services report failures inside an HTTP 200 body:
/// `{"error": {"code": 400, "message": "...", "details": [...]}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorEnvelope {
    pub error: ServiceErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl ServiceErrorEnvelope {
    /// Returns the embedded error if `body` is an error envelope.
    pub fn detect(body: &[u8]) -> Option<ServiceErrorBody> {
        serde_json::from_slice::<ServiceErrorEnvelope>(body)
            .ok()
            .map(|envelope| envelope.error)
    }
}

impl ServiceErrorBody {
    pub fn describe(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unspecified service error");
        if self.details.is_empty() {
            message.to_string()
        } else {
            format!("{} ({})", message, self.details.join("; "))
        }
    }
}
