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

//! Operations on records of any kind.

use crate::db::{self, Table};
use crate::driver::Driver;
use crate::model::RecordId;
use log::error;
use zoo_core::db::DbResult;
use zoo_core::driver::DriverResult;

/// Collapses the outcome of a write into a success flag, logging failures.
///
/// A write succeeds iff it affected at least one row.
fn applied(what: &str, table: &str, result: DbResult<u64>) -> bool {
    match result {
        Ok(rows_affected) => rows_affected != 0,
        Err(e) => {
            error!("Failed to {} {} record: {}", what, table, e);
            false
        }
    }
}

impl Driver {
    /// Gets all records of type `T`, ordered by identifier.
    pub(crate) async fn list<T: Table>(self) -> DriverResult<Vec<T>> {
        let result = match self.db.ex().await {
            Ok(mut ex) => db::list::<T>(&mut ex).await,
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            error!("Failed to list {} records: {}", T::SCHEMA.table, e);
            e.into()
        })
    }

    /// Creates a new record of type `T` with `fields`, optionally placed in `habitat_id`.
    ///
    /// Returns true iff the record was stored.
    pub(crate) async fn create<T: Table>(
        self,
        fields: &T::Fields,
        habitat_id: Option<RecordId>,
    ) -> bool {
        let result = match self.db.ex().await {
            Ok(mut ex) => db::insert::<T>(&mut ex, fields, habitat_id).await,
            Err(e) => Err(e),
        };
        applied("create", T::SCHEMA.table, result)
    }

    /// Replaces the mutable fields of the record of type `T` identified by `id`.
    ///
    /// Returns true iff the record exists and was modified.
    pub(crate) async fn update<T: Table>(self, id: RecordId, fields: &T::Fields) -> bool {
        let result = match self.db.ex().await {
            Ok(mut ex) => db::update::<T>(&mut ex, id, fields).await,
            Err(e) => Err(e),
        };
        applied("update", T::SCHEMA.table, result)
    }

    /// Deletes the record of type `T` identified by `id`.
    ///
    /// Returns true iff the record existed and was deleted.
    pub(crate) async fn delete<T: Table>(self, id: RecordId) -> bool {
        let result = match self.db.ex().await {
            Ok(mut ex) => db::delete::<T>(&mut ex, id).await,
            Err(e) => Err(e),
        };
        applied("delete", T::SCHEMA.table, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::testutils::*;
    use crate::model::*;
    use futures::future::join_all;
    use zoo_core::driver::DriverError;

    fn savanna() -> HabitatFields {
        HabitatFields::new(Name::new("savanna"))
    }

    fn condor() -> BirdFields {
        BirdFields::new(Name::new("condor"), 5, "F".to_owned(), 2.5)
    }

    #[tokio::test]
    async fn test_list_empty() {
        let context = TestContext::setup().await;

        assert!(context.driver().list::<Habitat>().await.unwrap().is_empty());
        assert!(context.driver().list::<Bird>().await.unwrap().is_empty());
        assert!(context.driver().list::<Attraction>().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_some() {
        let context = TestContext::setup().await;

        let mut ex = context.ex().await;
        db::insert::<Habitat>(&mut ex, &savanna(), None).await.unwrap();
        db::insert::<Habitat>(&mut ex, &HabitatFields::new(Name::new("desert")), None)
            .await
            .unwrap();
        drop(ex);

        let habitats = context.driver().list::<Habitat>().await.unwrap();
        let names: Vec<&str> = habitats.iter().map(|h| h.fields().name().as_str()).collect();
        assert_eq!(vec!["SAVANNA", "DESERT"], names);
    }

    #[tokio::test]
    async fn test_list_error_is_not_empty() {
        let context = TestContext::setup().await;
        context.close().await;

        match context.driver().list::<Habitat>().await {
            Err(DriverError::BackendError(_)) => (),
            r => panic!("Expected a backend error but got {:?}", r),
        }
    }

    #[tokio::test]
    async fn test_create_ok() {
        let context = TestContext::setup().await;

        assert!(context.driver().create::<Habitat>(&savanna(), None).await);
        let savanna_id = *context.list::<Habitat>().await[0].id();

        assert!(context.driver().create::<Bird>(&condor(), Some(savanna_id)).await);
        let birds = context.list::<Bird>().await;
        assert_eq!(1, birds.len());
        assert_eq!(&condor(), birds[0].fields());
        assert_eq!(&Some(savanna_id), birds[0].habitat_id());
    }

    #[tokio::test]
    async fn test_create_backend_error() {
        let context = TestContext::setup().await;
        context.close().await;

        assert!(!context.driver().create::<Habitat>(&savanna(), None).await);
    }

    #[tokio::test]
    async fn test_create_concurrently() {
        let context = TestContext::setup().await;

        let creations = (0..10).map(|i| {
            let fields = AttractionFields::new(Name::new(format!("show {}", i)));
            let driver = context.driver();
            async move { driver.create::<Attraction>(&fields, None).await }
        });
        assert!(join_all(creations).await.into_iter().all(|ok| ok));

        let attractions = context.list::<Attraction>().await;
        assert_eq!(10, attractions.len());
        let mut ids: Vec<i64> = attractions.iter().map(|a| a.id().as_i64()).collect();
        ids.dedup();
        assert_eq!(10, ids.len());
    }

    #[tokio::test]
    async fn test_update_ok() {
        let context = TestContext::setup().await;

        assert!(context.driver().create::<Habitat>(&savanna(), None).await);
        let id = *context.list::<Habitat>().await[0].id();

        let desert = HabitatFields::new(Name::new("desert"));
        assert!(context.driver().update::<Habitat>(id, &desert).await);
        assert_eq!(vec![Habitat::new(id, desert)], context.list::<Habitat>().await);
    }

    #[tokio::test]
    async fn test_update_not_found() {
        let context = TestContext::setup().await;

        assert!(context.driver().create::<Habitat>(&savanna(), None).await);
        let before = context.list::<Habitat>().await;

        let missing = RecordId::new(before[0].id().as_i64() + 1);
        let desert = HabitatFields::new(Name::new("desert"));
        assert!(!context.driver().update::<Habitat>(missing, &desert).await);
        assert_eq!(before, context.list::<Habitat>().await);
    }

    #[tokio::test]
    async fn test_delete_ok() {
        let context = TestContext::setup().await;

        assert!(context.driver().create::<Bird>(&condor(), None).await);
        let id = *context.list::<Bird>().await[0].id();

        assert!(context.driver().delete::<Bird>(id).await);
        assert!(context.list::<Bird>().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_not_found() {
        let context = TestContext::setup().await;

        assert!(!context.driver().delete::<Bird>(RecordId::new(1)).await);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let context = TestContext::setup().await;

        let fields = AttractionFields::new(Name::new("x"));
        assert!(context.driver().create::<Attraction>(&fields, None).await);
        let id = *context.list::<Attraction>().await[0].id();

        assert!(context.driver().delete::<Attraction>(id).await);
        assert!(!context.driver().delete::<Attraction>(id).await);
    }
}
