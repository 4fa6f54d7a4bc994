//! Per-route media-type guards. Each is an extractor that rejects before the
//! handler body runs: `Accept` mismatches are 406, `Content-Type` mismatches
//! are 415.

use axum::extract::{FromRequest, RequestParts};
use http::{header, HeaderMap};
use mime::Mime;

use crate::error;

const APPLICATION_JSON: &str = "application/json";
const MULTIPART_FORM_DATA: &str = "multipart/form-data";

/// An absent `Accept` header accepts anything. Otherwise the offer must be
/// covered by one of the listed ranges (exact, `type/*`, or `*/*`).
fn accepts(headers: &HeaderMap, offer: &Mime) -> bool {
	let header = match headers.get(header::ACCEPT) {
		Some(value) => match value.to_str() {
			Ok(header) => header,
			Err(_) => return false,
		},
		None => return true,
	};
	header
		.split(',')
		.filter_map(|item| item.trim().parse::<Mime>().ok())
		.any(|accepted| {
			(accepted.type_() == mime::STAR || accepted.type_() == offer.type_())
				&& (accepted.subtype() == mime::STAR || accepted.subtype() == offer.subtype())
		})
}

/// `Content-Type` compared by essence, so parameters such as `boundary` and
/// `charset` are ignored.
fn content_type_is(headers: &HeaderMap, expected: &str) -> bool {
	headers
		.get(header::CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.parse::<Mime>().ok())
		.map_or(false, |mime| mime.essence_str() == expected)
}

#[derive(Clone, Copy)]
pub struct AcceptJson;

#[axum::async_trait]
impl<B: Send> FromRequest<B> for AcceptJson {
	type Rejection = error::NotAcceptable;

	async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
		if accepts(req.headers(), &mime::APPLICATION_JSON) {
			Ok(Self)
		} else {
			Err(error::NotAcceptable(APPLICATION_JSON))
		}
	}
}

#[derive(Clone, Copy)]
pub struct RequireJson;

#[axum::async_trait]
impl<B: Send> FromRequest<B> for RequireJson {
	type Rejection = error::UnsupportedMediaType;

	async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
		if content_type_is(req.headers(), APPLICATION_JSON) {
			Ok(Self)
		} else {
			Err(error::UnsupportedMediaType(APPLICATION_JSON))
		}
	}
}

#[derive(Clone, Copy)]
pub struct RequireMultipart;

#[axum::async_trait]
impl<B: Send> FromRequest<B> for RequireMultipart {
	type Rejection = error::UnsupportedMediaType;

	async fn from_request(req: &mut RequestParts<B>) -> Result<Self, Self::Rejection> {
		if content_type_is(req.headers(), MULTIPART_FORM_DATA) {
			Ok(Self)
		} else {
			Err(error::UnsupportedMediaType(MULTIPART_FORM_DATA))
		}
	}
}
