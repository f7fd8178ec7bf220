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

//! Test utilities for the REST API.

use crate::db::{self, Table, init_schema};
use crate::driver::Driver;
use crate::model::*;
use crate::rest::app;
use axum::Router;
use std::sync::Arc;
use zoo_core::db::Db;

/// State of a test for the REST layer.
pub(crate) struct TestContext {
    /// The database backing the app, for direct manipulation.
    db: Arc<dyn Db + Send + Sync>,

    /// The app under test.
    app: Router,
}

impl TestContext {
    /// Initializes the app backed by an in-memory database with the schema in it.
    pub(crate) async fn setup() -> Self {
        let db: Arc<dyn Db + Send + Sync> =
            Arc::new(zoo_core::db::sqlite::testutils::setup().await);
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        let driver = Driver::new(db.clone());
        let app = app(driver);
        Self { db, app }
    }

    /// Gets a copy of the app under test.
    pub(crate) fn app(&self) -> Router {
        self.app.clone()
    }

    /// Consumes the context and returns the app under test.
    pub(crate) fn into_app(self) -> Router {
        self.app
    }

    /// Closes the database, making any further operation fail.
    pub(crate) async fn close(&self) {
        self.db.close().await;
    }

    /// Lists all records of type `T` bypassing the app.
    pub(crate) async fn list<T: Table>(&self) -> Vec<T> {
        db::list::<T>(&mut self.db.ex().await.unwrap()).await.unwrap()
    }

    /// Creates a record of type `T` bypassing the app and returns its identifier.
    async fn create<T: Table>(&self, fields: &T::Fields, habitat_id: Option<RecordId>) -> RecordId {
        let mut ex = self.db.ex().await.unwrap();
        assert_eq!(1, db::insert::<T>(&mut ex, fields, habitat_id).await.unwrap());
        let records = db::list::<T>(&mut ex).await.unwrap();
        records.last().unwrap().record_id()
    }

    /// Creates a habitat named `name` and returns its identifier.
    pub(crate) async fn create_habitat(&self, name: &str) -> RecordId {
        self.create::<Habitat>(&HabitatFields::new(Name::new(name)), None).await
    }

    /// Creates a bird named `name` placed in `habitat_id` and returns its identifier.
    pub(crate) async fn create_bird(&self, name: &str, habitat_id: Option<RecordId>) -> RecordId {
        let fields = BirdFields::new(Name::new(name), 3, "M".to_owned(), 1.5);
        self.create::<Bird>(&fields, habitat_id).await
    }

    /// Creates an attraction named `name` placed in `habitat_id` and returns its identifier.
    pub(crate) async fn create_attraction(
        &self,
        name: &str,
        habitat_id: Option<RecordId>,
    ) -> RecordId {
        self.create::<Attraction>(&AttractionFields::new(Name::new(name)), habitat_id).await
    }
}
