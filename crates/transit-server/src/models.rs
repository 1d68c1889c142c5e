// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire models for route search responses.

use serde::{Deserialize, Serialize};
use transit_server_db::{AgencyRow, RouteRow};
use utoipa::ToSchema;

/// Separator between agency id and entity id in externally visible ids.
pub const ID_SEPARATOR: char = '_';

/// Build the externally visible id of an agency-scoped entity.
pub fn combined_id(agency_id: &str, entity_id: &str) -> String {
	format!("{agency_id}{ID_SEPARATOR}{entity_id}")
}

/// GTFS `route_type`. Serialized as its numeric code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum RouteType {
	Tram,
	Subway,
	Rail,
	Bus,
	Ferry,
	CableTram,
	AerialLift,
	Funicular,
	Trolleybus,
	Monorail,
	/// Extended or agency-specific code.
	Other(i32),
}

impl From<i32> for RouteType {
	fn from(code: i32) -> Self {
		match code {
			0 => RouteType::Tram,
			1 => RouteType::Subway,
			2 => RouteType::Rail,
			3 => RouteType::Bus,
			4 => RouteType::Ferry,
			5 => RouteType::CableTram,
			6 => RouteType::AerialLift,
			7 => RouteType::Funicular,
			11 => RouteType::Trolleybus,
			12 => RouteType::Monorail,
			other => RouteType::Other(other),
		}
	}
}

impl From<RouteType> for i32 {
	fn from(route_type: RouteType) -> Self {
		match route_type {
			RouteType::Tram => 0,
			RouteType::Subway => 1,
			RouteType::Rail => 2,
			RouteType::Bus => 3,
			RouteType::Ferry => 4,
			RouteType::CableTram => 5,
			RouteType::AerialLift => 6,
			RouteType::Funicular => 7,
			RouteType::Trolleybus => 11,
			RouteType::Monorail => 12,
			RouteType::Other(code) => code,
		}
	}
}

impl RouteType {
	/// Map a stored column value. Codes outside `i32` cannot be valid GTFS
	/// and collapse to `Other(-1)`.
	pub fn from_code(code: i64) -> Self {
		match i32::try_from(code) {
			Ok(code) => RouteType::from(code),
			Err(_) => RouteType::Other(-1),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteRecord {
	/// Combined `<agencyId>_<routeId>`.
	pub id: String,
	pub agency_id: String,
	pub short_name: String,
	pub long_name: String,
	pub description: String,
	#[serde(rename = "type")]
	#[schema(value_type = i32)]
	pub route_type: RouteType,
	pub url: String,
	pub color: String,
	pub text_color: String,
	pub null_safe_short_name: String,
}

impl From<&RouteRow> for RouteRecord {
	fn from(row: &RouteRow) -> Self {
		let short_name = row.short_name.clone().unwrap_or_default();
		RouteRecord {
			id: combined_id(&row.agency_id, &row.id),
			agency_id: row.agency_id.clone(),
			null_safe_short_name: short_name.clone(),
			short_name,
			long_name: row.long_name.clone().unwrap_or_default(),
			description: row.description.clone().unwrap_or_default(),
			route_type: RouteType::from_code(row.route_type),
			url: row.url.clone().unwrap_or_default(),
			color: row.color.clone().unwrap_or_default(),
			text_color: row.text_color.clone().unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AgencyReference {
	pub id: String,
	pub name: String,
	pub url: String,
	pub timezone: String,
	pub lang: String,
	pub phone: String,
	pub email: String,
	pub fare_url: String,
	pub disclaimer: String,
	pub private_service: bool,
}

impl From<AgencyRow> for AgencyReference {
	fn from(row: AgencyRow) -> Self {
		AgencyReference {
			id: row.id,
			name: row.name,
			url: row.url,
			timezone: row.timezone,
			lang: row.lang.unwrap_or_default(),
			phone: row.phone.unwrap_or_default(),
			email: row.email.unwrap_or_default(),
			fare_url: row.fare_url.unwrap_or_default(),
			disclaimer: row.disclaimer.unwrap_or_default(),
			private_service: row.private_service,
		}
	}
}

/// Side-loaded entities referenced by a response list.
///
/// Route search only ever fills `agencies`; the other collections are always
/// present and empty so clients can rely on the shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct References {
	pub agencies: Vec<AgencyReference>,
	#[schema(value_type = Vec<Object>)]
	pub routes: Vec<serde_json::Value>,
	#[schema(value_type = Vec<Object>)]
	pub situations: Vec<serde_json::Value>,
	#[schema(value_type = Vec<Object>)]
	pub stop_times: Vec<serde_json::Value>,
	#[schema(value_type = Vec<Object>)]
	pub stops: Vec<serde_json::Value>,
	#[schema(value_type = Vec<Object>)]
	pub trips: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchRouteData {
	pub limit_exceeded: bool,
	pub list: Vec<RouteRecord>,
	pub references: References,
}
