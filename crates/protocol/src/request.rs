use foundation::geo::GeoBounds;
use serde::Serialize;

use crate::viewport::{ITEMIZED_PAGE_SIZE, ViewMode, ViewportState};

/// Indexed field holding each record's location.
pub const COORDINATES_FIELD: &str = "coordinates";

/// Fields covered by the free-text filter.
pub const TEXT_MATCH_FIELDS: [&str; 2] = ["name", "address"];

/// Search request body.
///
/// Built by [`SearchRequest::for_viewport`]; construction is total: every
/// viewport snapshot produces a valid body, and absent clauses are omitted
/// from the serialized JSON entirely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<Aggregations>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_match: Option<MultiMatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<BoundsQuery>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregations {
    pub grouped: GroupedAggregation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedAggregation {
    pub geohex_grid: GeohexGrid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeohexGrid {
    pub field: &'static str,
    pub precision: u8,
}

/// Free-text filter over name and address.
///
/// Kept as a top-level sibling of the aggregation clause rather than nested
/// inside it, matching the production query shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiMatch {
    pub query: String,
    pub fields: [&'static str; 2],
}

/// Viewport restriction: always a non-scoring filter wrapped in a bool
/// query, never a scored clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundsQuery {
    pub bool: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoolQuery {
    pub must: MustClause,
    pub filter: GeoFilter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MustClause {
    pub match_all: MatchAll,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAll {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoFilter {
    pub geo_bounding_box: GeoBoundingBox,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoBoundingBox {
    pub coordinates: BoxCorners,
}

/// Bounding box in the backend's corner convention: `top_left` takes the
/// north latitude with the west longitude, `bottom_right` the south
/// latitude with the east longitude; a cross-assignment of the NE/SW
/// corners the host map reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxCorners {
    pub top_left: GeoPosition,
    pub bottom_right: GeoPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoPosition {
    pub lat: f64,
    pub lon: f64,
}

impl SearchRequest {
    /// Build the request body for a viewport snapshot.
    pub fn for_viewport(view: &ViewportState) -> Self {
        let mut request = SearchRequest {
            aggregations: None,
            size: None,
            multi_match: None,
            query: None,
        };

        match view.mode() {
            ViewMode::Aggregated { precision } => {
                request.aggregations = Some(Aggregations::geohex(precision));
            }
            ViewMode::Itemized => {
                request.size = Some(ITEMIZED_PAGE_SIZE);
            }
        }

        if let Some(text) = view.text_query.as_deref()
            && !text.is_empty()
        {
            request.multi_match = Some(MultiMatch::name_address(text));
        }

        if let Some(bounds) = view.bounds {
            request.query = Some(BoundsQuery::within(bounds));
        }

        request
    }
}

impl Aggregations {
    pub fn geohex(precision: u8) -> Self {
        Aggregations {
            grouped: GroupedAggregation {
                geohex_grid: GeohexGrid {
                    field: COORDINATES_FIELD,
                    precision,
                },
            },
        }
    }
}

impl MultiMatch {
    pub fn name_address(text: &str) -> Self {
        MultiMatch {
            query: text.to_string(),
            fields: TEXT_MATCH_FIELDS,
        }
    }
}

impl BoundsQuery {
    pub fn within(bounds: GeoBounds) -> Self {
        BoundsQuery {
            bool: BoolQuery {
                must: MustClause {
                    match_all: MatchAll {},
                },
                filter: GeoFilter {
                    geo_bounding_box: GeoBoundingBox {
                        coordinates: BoxCorners {
                            top_left: GeoPosition {
                                lat: bounds.north_east.lat,
                                lon: bounds.south_west.lng,
                            },
                            bottom_right: GeoPosition {
                                lat: bounds.south_west.lat,
                                lon: bounds.north_east.lng,
                            },
                        },
                    },
                },
            },
        }
    }
}
