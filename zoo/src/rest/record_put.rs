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

//! API to replace the fields of a record.

use crate::driver::Driver;
use crate::rest::parse_id;
use crate::rest::resources::Resource;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{RawQuery, State};
use log::warn;
use zoo_core::rest::{RestError, RestResult};

/// API handler.
pub(crate) async fn handler<T: Resource>(
    State(driver): State<Driver>,
    RawQuery(query): RawQuery,
    fields: Result<Json<T::Fields>, JsonRejection>,
) -> RestResult<Json<&'static str>> {
    let id = parse_id(query.as_deref(), T::ID_PARAM).map_err(|e| {
        warn!("Invalid query to update {} record: {}", T::SCHEMA.table, e);
        RestError::InvalidRequest(T::MESSAGES.update_error.to_owned())
    })?;
    let Json(fields) = fields.map_err(|e| {
        warn!("Invalid request to update {} record: {}", T::SCHEMA.table, e);
        RestError::InvalidRequest(T::MESSAGES.update_error.to_owned())
    })?;

    let applied = match id {
        Some(id) => driver.update::<T>(id, &fields).await,
        None => false,
    };
    if applied {
        Ok(Json(T::MESSAGES.updated))
    } else {
        Err(RestError::NotApplied(T::MESSAGES.update_failed.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::*;
    use crate::rest::testutils::*;
    use axum::http;
    use serde_json::json;
    use zoo_core::rest::testutils::*;

    fn route(path: &str) -> (http::Method, String) {
        (http::Method::PUT, format!("/atualizar/{}", path))
    }

    #[tokio::test]
    async fn test_update_habitat() {
        let context = TestContext::setup().await;

        let id = context.create_habitat("savanna").await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_query([("idHabitat", id.as_i64())])
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_message("Habitat updated successfully")
            .await;

        assert_eq!(
            vec![Habitat::new(id, HabitatFields::new(Name::new("DESERT")))],
            context.list::<Habitat>().await
        );
    }

    #[tokio::test]
    async fn test_update_id_with_fraction() {
        let context = TestContext::setup().await;

        let id = context.create_habitat("savanna").await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_raw_query(format!("idHabitat={}.9", id))
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_message("Habitat updated successfully")
            .await;

        assert_eq!("DESERT", context.list::<Habitat>().await[0].fields().name().as_str());
    }

    #[tokio::test]
    async fn test_update_habitat_not_found() {
        let context = TestContext::setup().await;

        let id = context.create_habitat("savanna").await;
        let before = context.list::<Habitat>().await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_query([("idHabitat", id.as_i64() + 1)])
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_message("Could not update the habitat")
            .await;

        assert_eq!(before, context.list::<Habitat>().await);
    }

    #[tokio::test]
    async fn test_update_bird_keeps_habitat() {
        let context = TestContext::setup().await;

        let savanna = context.create_habitat("savanna").await;
        let id = context.create_bird("condor", Some(savanna)).await;

        OneShotBuilder::new(context.app(), route("animal"))
            .with_query([("idAnimal", id.as_i64())])
            .send_json(json!({
                "nome": "andean condor",
                "idade": 6,
                "genero": "F",
                "envergadura": 3.0,
                "idHabitat": 12345,
            }))
            .await
            .expect_message("Bird updated successfully")
            .await;

        let birds = context.list::<Bird>().await;
        assert_eq!(
            vec![Bird::new(
                id,
                BirdFields::new(Name::new("ANDEAN CONDOR"), 6, "F".to_owned(), 3.0),
                Some(savanna)
            )],
            birds
        );
    }

    #[tokio::test]
    async fn test_update_attraction() {
        let context = TestContext::setup().await;

        let id = context.create_attraction("feeding", None).await;

        OneShotBuilder::new(context.app(), route("atracao"))
            .with_query([("idAtracao", id.as_i64())])
            .send_json(json!({"nomeAtracao": "night feeding"}))
            .await
            .expect_message("Attraction updated successfully")
            .await;

        let attractions = context.list::<Attraction>().await;
        assert_eq!("NIGHT FEEDING", attractions[0].fields().name().as_str());
    }

    #[tokio::test]
    async fn test_missing_id() {
        let context = TestContext::setup().await;

        context.create_habitat("savanna").await;
        let before = context.list::<Habitat>().await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_message("Could not update the habitat")
            .await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_query([("idAnimal", 1)])
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_message("Could not update the habitat")
            .await;

        assert_eq!(before, context.list::<Habitat>().await);
    }

    #[tokio::test]
    async fn test_malformed_id() {
        let context = TestContext::setup().await;

        context.create_habitat("savanna").await;
        let before = context.list::<Habitat>().await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_raw_query("idHabitat=one")
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_message("Could not update the habitat")
            .await;

        assert_eq!(before, context.list::<Habitat>().await);
    }

    #[tokio::test]
    async fn test_bad_body() {
        let context = TestContext::setup().await;

        let id = context.create_bird("condor", None).await;
        let before = context.list::<Bird>().await;

        OneShotBuilder::new(context.app(), route("animal"))
            .with_query([("idAnimal", id.as_i64())])
            .send_json(json!({"nome": "condor"}))
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_message("Failed to update bird")
            .await;

        OneShotBuilder::new(context.app(), route("animal"))
            .with_query([("idAnimal", id.as_i64())])
            .send_text("this is not json")
            .await
            .expect_status(http::StatusCode::BAD_REQUEST)
            .expect_message("Failed to update bird")
            .await;

        assert_eq!(before, context.list::<Bird>().await);
    }

    #[tokio::test]
    async fn test_backend_error() {
        let context = TestContext::setup().await;
        context.close().await;

        OneShotBuilder::new(context.app(), route("habitat"))
            .with_query([("idHabitat", 1)])
            .send_json(json!({"nomeHabitat": "desert"}))
            .await
            .expect_status(http::StatusCode::UNAUTHORIZED)
            .expect_message("Could not update the habitat")
            .await;
    }
}
