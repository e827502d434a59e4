//! Retrieval of map service capability documents.

use map_common::{HttpRequest, HttpTransport, ServiceErrorEnvelope};
use tracing::{debug, instrument, warn};

use crate::capabilities::CapabilityDescriptor;
use crate::error::{Result, TileGridError};

/// GET `<service_url>?f=json` and parse the capability document.
///
/// Non-2xx statuses, transport failures, ArcGIS error envelopes and
/// unparseable bodies all surface as [`TileGridError::CapabilitiesFetch`].
#[instrument(skip(transport))]
pub async fn fetch_capabilities<T: HttpTransport + ?Sized>(
    transport: &T,
    service_url: &str,
) -> Result<CapabilityDescriptor> {
    let url = service_url.trim_end_matches('/').to_string();
    let request = HttpRequest::get(url.clone()).with_param("f", "json");

    let fetch_error = |status: Option<u16>, message: String| TileGridError::CapabilitiesFetch {
        url: url.clone(),
        status,
        message,
    };

    let response = transport
        .send(&request)
        .await
        .map_err(|e| fetch_error(None, e.to_string()))?;

    if !response.is_success() {
        warn!(url = %url, status = response.status, "Capabilities request failed");
        return Err(fetch_error(
            Some(response.status),
            String::from_utf8_lossy(&response.body).into_owned(),
        ));
    }

    if let Some(error) = ServiceErrorEnvelope::detect(&response.body) {
        warn!(url = %url, code = ?error.code, "Service reported an error");
        return Err(fetch_error(error.code, error.describe()));
    }

    let caps = CapabilityDescriptor::from_json(&response.body).map_err(|e| {
        fetch_error(
            Some(response.status),
            format!("invalid capabilities JSON: {}", e),
        )
    })?;

    debug!(url = %url, has_tile_info = caps.tile_info.is_some(), "Fetched capabilities");
    Ok(caps)
}
