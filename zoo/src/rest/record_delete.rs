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

//! API to delete a record.

use crate::driver::Driver;
use crate::rest::parse_id;
use crate::rest::resources::Resource;
use axum::Json;
use axum::extract::{RawQuery, State};
use log::warn;
use zoo_core::rest::{EmptyBody, RestError, RestResult};

/// API handler.
pub(crate) async fn handler<T: Resource>(
    State(driver): State<Driver>,
    RawQuery(query): RawQuery,
    _: EmptyBody,
) -> RestResult<Json<&'static str>> {
    let id = parse_id(query.as_deref(), T::ID_PARAM).map_err(|e| {
        warn!("Invalid query to delete {} record: {}", T::SCHEMA.table, e);
        RestError::InvalidRequest(T::MESSAGES.delete_error.to_owned())
    })?;

    let applied = match id {
        Some(id) => driver.delete::<T>(id).await,
        None => false,
    };
    if applied {
        Ok(Json(T::MESSAGES.deleted))
    } else {
        Err(RestError::NotApplied(T::MESSAGES.delete_failed.to_owned()))
    }
}
