use foundation::geo::GeoPoint;
use serde::Deserialize;

/// One spatial cell and the number of records inside it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Bucket {
    /// Opaque cell key at the requested precision; stable per cell.
    pub key: String,
    #[serde(rename = "doc_count")]
    pub count: u64,
}

/// One production-location record, itemized mode.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub id: String,
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
}

/// Decoded search response.
///
/// The response shape is resolved exactly once, here, so downstream code
/// matches on the variant instead of probing object shape at each use site.
/// Both payloads are rebuilt wholesale per query cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResults {
    Aggregated(Vec<Bucket>),
    Itemized(Vec<PointRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Json { message: String },
    /// Neither an aggregation payload nor an itemized hit list was present.
    UnrecognizedShape,
}

impl std::fmt::Display for DecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeError::Json { message } => write!(f, "response is not valid JSON: {message}"),
            DecodeError::UnrecognizedShape => {
                write!(f, "response carries neither buckets nor hits")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode a raw response body into [`SearchResults`].
///
/// An aggregation response also carries a (truncated) hit list, so the
/// aggregation payload wins whenever it is present; it is what the client
/// asked for.
pub fn decode_results(body: &str) -> Result<SearchResults, DecodeError> {
    let raw: RawResponse = serde_json::from_str(body).map_err(|e| DecodeError::Json {
        message: e.to_string(),
    })?;

    if let Some(aggregations) = raw.aggregations {
        return Ok(SearchResults::Aggregated(aggregations.grouped.buckets));
    }

    if let Some(hits) = raw.hits {
        let records = hits
            .hits
            .into_iter()
            .map(|hit| PointRecord {
                id: hit.id,
                name: hit.source.name,
                address: hit.source.address,
                location: GeoPoint::new(hit.source.coordinates.lat, hit.source.coordinates.lon),
            })
            .collect();
        return Ok(SearchResults::Itemized(records));
    }

    Err(DecodeError::UnrecognizedShape)
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    aggregations: Option<RawAggregations>,
    #[serde(default)]
    hits: Option<RawHits>,
}

#[derive(Deserialize)]
struct RawAggregations {
    grouped: RawGrouped,
}

#[derive(Deserialize)]
struct RawGrouped {
    buckets: Vec<Bucket>,
}

#[derive(Deserialize)]
struct RawHits {
    hits: Vec<RawHit>,
}

#[derive(Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source")]
    source: RawSource,
}

#[derive(Deserialize)]
struct RawSource {
    name: String,
    address: String,
    coordinates: RawCoordinates,
}

#[derive(Deserialize)]
struct RawCoordinates {
    lat: f64,
    lon: f64,
}
