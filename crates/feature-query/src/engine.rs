//! Attribute and spatial queries against an ArcGIS REST feature layer.

use std::sync::Arc;

use map_common::{
    CrsId, HttpRequest, HttpTransport, ServiceErrorEnvelope, SpatialReference,
};
use metrics::counter;
use projection::CrsRegistry;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::encoding::ResponseEncoding;
use crate::error::{QueryError, QueryResult};
use crate::geometry::{esri_polygon, QueryGeometry};
use crate::record::{FeatureRecord, ALL_FIELDS};

/// Spatial predicate sent with every spatial query.
pub const SPATIAL_REL_INTERSECTS: &str = "esriSpatialRelIntersects";

/// A feature layer endpoint and the CRS its geometries are stored in.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureService {
    pub url: String,
    pub native_crs: CrsId,
}

impl FeatureService {
    pub fn new(url: impl Into<String>, native_crs: CrsId) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            native_crs,
        }
    }

    pub fn query_url(&self) -> String {
        query_url(&self.url)
    }
}

/// Layer metadata from `<layer>?f=json`.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceDescription {
    pub name: Option<String>,
    pub geometry_type: Option<String>,
    /// From `extent.spatialReference`, else `sourceSpatialReference`.
    pub native_crs: Option<CrsId>,
    pub fields: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerInfo {
    name: Option<String>,
    geometry_type: Option<String>,
    source_spatial_reference: Option<SpatialReference>,
    extent: Option<LayerExtent>,
    #[serde(default)]
    fields: Vec<LayerField>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayerExtent {
    spatial_reference: Option<SpatialReference>,
}

#[derive(Debug, Deserialize)]
struct LayerField {
    name: String,
}

fn query_url(service_url: &str) -> String {
    format!("{}/query", service_url.trim_end_matches('/'))
}

/// Comma list for `outFields`; an empty list asks for every field.
fn join_fields<S: AsRef<str>>(out_fields: &[S]) -> String {
    if out_fields.is_empty() {
        return ALL_FIELDS.to_string();
    }
    out_fields
        .iter()
        .map(|f| f.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}

/// Issues queries through a transport and normalizes the responses.
///
/// The registry is only read here; it is populated beforehand (defaults
/// plus whatever tile grid resolution registered).
pub struct FeatureQueryEngine<T: HttpTransport> {
    transport: T,
    registry: Arc<CrsRegistry>,
}

impl<T: HttpTransport> FeatureQueryEngine<T> {
    pub fn new(transport: T, registry: Arc<CrsRegistry>) -> Self {
        Self {
            transport,
            registry,
        }
    }

    pub fn registry(&self) -> &CrsRegistry {
        &self.registry
    }

    /// Features matching a SQL-like `where` clause, as GeoJSON.
    #[instrument(skip(self, out_fields), fields(fields = out_fields.len()))]
    pub async fn attribute_query<S: AsRef<str>>(
        &self,
        service_url: &str,
        where_clause: &str,
        out_fields: &[S],
    ) -> QueryResult<Vec<FeatureRecord>> {
        counter!("feature_queries_total", "kind" => "attribute").increment(1);

        let fields = join_fields(out_fields);
        let request = HttpRequest::get(query_url(service_url))
            .with_param("where", where_clause)
            .with_param("outFields", fields)
            .with_param("returnGeometry", "true")
            .with_param("f", ResponseEncoding::GeoJson.format_param());

        self.execute(request, ResponseEncoding::GeoJson, out_fields)
            .await
            .map_err(record_failure)
    }

    /// Features intersecting `geometry`, given in `source_crs`.
    ///
    /// The geometry is reprojected into the service's native CRS first; if
    /// that is not possible the query fails with `CrsMismatch` and nothing is
    /// sent.
    #[instrument(skip_all, fields(service = %service.url, source_crs = %source_crs))]
    pub async fn spatial_query<S: AsRef<str>>(
        &self,
        service: &FeatureService,
        geometry: &QueryGeometry,
        source_crs: &CrsId,
        out_fields: &[S],
    ) -> QueryResult<Vec<FeatureRecord>> {
        counter!("feature_queries_total", "kind" => "spatial").increment(1);

        let request = self
            .spatial_request(service, geometry, source_crs, out_fields)
            .map_err(record_failure)?;

        self.execute(request, ResponseEncoding::EsriJson, out_fields)
            .await
            .map_err(record_failure)
    }

    fn spatial_request<S: AsRef<str>>(
        &self,
        service: &FeatureService,
        geometry: &QueryGeometry,
        source_crs: &CrsId,
        out_fields: &[S],
    ) -> QueryResult<HttpRequest> {
        let target = &service.native_crs;
        let ring = geometry.ring_in(&self.registry, source_crs, target)?;

        let wkid = target.epsg_code().ok_or_else(|| QueryError::CrsMismatch {
            geometry_crs: source_crs.clone(),
            service_crs: target.clone(),
            reason: "service CRS has no numeric wkid".to_string(),
        })?;

        debug!(vertices = ring.len(), wkid, "Built spatial filter");

        Ok(HttpRequest::post_form(service.query_url())
            .with_param("geometry", esri_polygon(&ring, wkid).to_string())
            .with_param("geometryType", "esriGeometryPolygon")
            .with_param("spatialRel", SPATIAL_REL_INTERSECTS)
            .with_param("inSR", wkid.to_string())
            .with_param("outFields", join_fields(out_fields))
            .with_param("returnGeometry", "true")
            .with_param("f", ResponseEncoding::EsriJson.format_param()))
    }

    /// Layer metadata, used to discover the native CRS.
    #[instrument(skip(self))]
    pub async fn describe_service(&self, service_url: &str) -> QueryResult<ServiceDescription> {
        let url = service_url.trim_end_matches('/').to_string();
        let request = HttpRequest::get(url.clone()).with_param("f", "json");
        let body = self.send_checked(&request).await?;

        let info: LayerInfo = serde_json::from_slice(&body).map_err(|e| {
            QueryError::failed(&url, Some(200), format!("invalid layer metadata: {}", e))
        })?;

        let native_crs = info
            .extent
            .and_then(|e| e.spatial_reference)
            .or(info.source_spatial_reference)
            .and_then(|sr| sr.crs_id());

        Ok(ServiceDescription {
            name: info.name,
            geometry_type: info.geometry_type,
            native_crs,
            fields: info.fields.into_iter().map(|f| f.name).collect(),
        })
    }

    async fn execute<S: AsRef<str>>(
        &self,
        request: HttpRequest,
        encoding: ResponseEncoding,
        out_fields: &[S],
    ) -> QueryResult<Vec<FeatureRecord>> {
        let body = self.send_checked(&request).await?;

        let fields: Vec<String> = out_fields.iter().map(|f| f.as_ref().to_string()).collect();
        let records = encoding
            .parser()
            .parse(&body, &fields)
            .map_err(|e| QueryError::failed(&request.url, Some(200), e.to_string()))?;

        info!(url = %request.url, records = records.len(), "Query completed");
        Ok(records)
    }

    /// Send and reject transport failures, non-2xx statuses and error
    /// envelopes. Returns the raw body otherwise.
    async fn send_checked(&self, request: &HttpRequest) -> QueryResult<bytes::Bytes> {
        let response = self
            .transport
            .send(request)
            .await
            .map_err(|e| QueryError::failed(&request.url, None, e.to_string()))?;

        if !response.is_success() {
            return Err(QueryError::failed(
                &request.url,
                Some(response.status),
                String::from_utf8_lossy(&response.body).into_owned(),
            ));
        }

        if let Some(error) = ServiceErrorEnvelope::detect(&response.body) {
            return Err(QueryError::failed(
                &request.url,
                error.code.or(Some(response.status)),
                error.describe(),
            ));
        }

        Ok(response.body)
    }
}

fn record_failure(error: QueryError) -> QueryError {
    warn!(error = %error, "Feature query failed");
    counter!("feature_query_failures_total", "reason" => error.reason()).increment(1);
    error
}
