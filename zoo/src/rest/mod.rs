// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Entry point to the REST server.

use crate::driver::Driver;
use crate::model::{Attraction, Bird, Habitat, RecordId};
use axum::Router;
use log::warn;
use tower_http::cors::CorsLayer;

mod record_delete;
mod record_post;
mod record_put;
mod records_get;
mod resources;
#[cfg(test)]
mod testutils;

/// Extracts the identifier named `param` from a raw `query` string.
///
/// The identifier is the optionally-signed run of decimal digits at the start of the value, so
/// `12abc` and `1.5` yield 12 and 1.  Returns `Err` if the query cannot be decoded at all, and
/// `Ok(None)` if the parameter is missing or does not start with an integer.  If the parameter
/// appears more than once, the first occurrence wins.
fn parse_id(query: Option<&str>, param: &str) -> Result<Option<RecordId>, String> {
    let pairs: Vec<(String, String)> = match query {
        Some(query) => serde_urlencoded::from_str(query).map_err(|e| e.to_string())?,
        None => return Ok(None),
    };
    let value = match pairs.into_iter().find(|(name, _)| name == param) {
        Some((_, value)) => value,
        None => return Ok(None),
    };
    match parse_leading_int(&value) {
        Some(id) => Ok(Some(RecordId::new(id))),
        None => {
            warn!("Ignoring invalid {} '{}'", param, value);
            Ok(None)
        }
    }
}

/// Parses the integer at the start of `value`, ignoring leading whitespace and anything after the
/// digits.
fn parse_leading_int(value: &str) -> Option<i64> {
    let value = value.trim_start();
    let sign_len = if value.starts_with(['-', '+']) { 1 } else { 0 };
    let digits_len =
        value[sign_len..].find(|c: char| !c.is_ascii_digit()).unwrap_or(value.len() - sign_len);
    if digits_len == 0 {
        return None;
    }
    value[..sign_len + digits_len].parse::<i64>().ok()
}

/// Creates the router for the application.
pub(crate) fn app(driver: Driver) -> Router {
    use axum::routing::{delete, get, post, put};
    Router::new()
        .route("/aves", get(records_get::handler::<Bird>))
        .route("/habitats", get(records_get::handler::<Habitat>))
        .route("/atracoes", get(records_get::handler::<Attraction>))
        .route("/novo/ave", post(record_post::handler::<Bird>))
        .route("/novo/habitat", post(record_post::handler::<Habitat>))
        .route("/novo/atracao", post(record_post::handler::<Attraction>))
        .route("/remover/animal", delete(record_delete::handler::<Bird>))
        .route("/remover/habitat", delete(record_delete::handler::<Habitat>))
        .route("/remover/atracao", delete(record_delete::handler::<Attraction>))
        .route("/atualizar/animal", put(record_put::handler::<Bird>))
        .route("/atualizar/habitat", put(record_put::handler::<Habitat>))
        .route("/atualizar/atracao", put(record_put::handler::<Attraction>))
        .layer(CorsLayer::permissive())
        .with_state(driver)
}
