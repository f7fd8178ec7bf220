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

//! API to create a record.

use crate::driver::Driver;
use crate::rest::resources::Resource;
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use log::warn;
use zoo_core::rest::{RestError, RestResult};

/// API handler.
pub(crate) async fn handler<T: Resource>(
    State(driver): State<Driver>,
    request: Result<Json<T::CreateRequest>, JsonRejection>,
) -> RestResult<Json<&'static str>> {
    let Json(request) = request.map_err(|e| {
        warn!("Invalid request to create {} record: {}", T::SCHEMA.table, e);
        RestError::InvalidRequest(T::MESSAGES.create_error.to_owned())
    })?;

    let (fields, habitat_id) = T::split_create(request);
    if driver.create::<T>(&fields, habitat_id).await {
        Ok(Json(T::MESSAGES.created))
    } else {
        Err(RestError::InvalidRequest(T::MESSAGES.create_failed.to_owned()))
    }
}
