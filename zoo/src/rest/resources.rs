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

//! Per-resource configuration of the generic REST handlers.

use crate::db::Table;
use crate::model::*;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Wording of the responses returned by the APIs of one resource.
pub(crate) struct Messages {
    /// Returned when the records cannot be listed.
    pub(crate) list_error: &'static str,

    /// Returned when a record is created.
    pub(crate) created: &'static str,

    /// Returned when the database does not store a new record.
    pub(crate) create_failed: &'static str,

    /// Returned when a create request cannot be processed.
    pub(crate) create_error: &'static str,

    /// Returned when a record is deleted.
    pub(crate) deleted: &'static str,

    /// Returned when a record to delete does not exist or cannot be deleted.
    pub(crate) delete_failed: &'static str,

    /// Returned when a delete request cannot be processed.
    pub(crate) delete_error: &'static str,

    /// Returned when a record is updated.
    pub(crate) updated: &'static str,

    /// Returned when a record to update does not exist or cannot be updated.
    pub(crate) update_failed: &'static str,

    /// Returned when an update request cannot be processed.
    pub(crate) update_error: &'static str,
}

/// A kind of record exposed through the REST API.
pub(crate) trait Resource:
    Table<Fields: DeserializeOwned + Send + Sync + 'static> + Serialize + Send + Sync + 'static
{
    /// Name of the query parameter that carries the identifier of a record.
    const ID_PARAM: &'static str;

    /// Wording of the responses.
    const MESSAGES: Messages;

    /// Body of a creation request.
    type CreateRequest: DeserializeOwned + Send + 'static;

    /// Splits a creation `request` into the record's fields and its optional habitat.
    fn split_create(request: Self::CreateRequest) -> (Self::Fields, Option<RecordId>);
}

impl Resource for Bird {
    const ID_PARAM: &'static str = "idAnimal";

    const MESSAGES: Messages = Messages {
        list_error: "Failed to fetch birds; check the server logs",
        created: "Bird created successfully",
        create_failed: "Could not store the bird in the database",
        create_error: "Failed to create bird; check the server logs",
        deleted: "Bird removed successfully",
        delete_failed: "Could not remove the bird",
        delete_error: "Failed to remove bird; check the server logs",
        updated: "Bird updated successfully",
        update_failed: "Could not update the bird in the database",
        update_error: "Failed to update bird; check the server logs",
    };

    type CreateRequest = NewRecord<BirdFields>;

    fn split_create(request: NewRecord<BirdFields>) -> (BirdFields, Option<RecordId>) {
        (request.fields, request.habitat_id)
    }
}

impl Resource for Habitat {
    const ID_PARAM: &'static str = "idHabitat";

    const MESSAGES: Messages = Messages {
        list_error: "Failed to fetch habitats; check the server logs",
        created: "Habitat created successfully",
        create_failed: "Could not store the habitat in the database",
        create_error: "Failed to create habitat; check the server logs",
        deleted: "Habitat removed successfully",
        delete_failed: "Could not remove the habitat",
        delete_error: "Failed to remove habitat; check the server logs",
        updated: "Habitat updated successfully",
        update_failed: "Could not update the habitat in the database",
        update_error: "Failed to update habitat; check the server logs",
    };

    type CreateRequest = HabitatFields;

    fn split_create(request: HabitatFields) -> (HabitatFields, Option<RecordId>) {
        (request, None)
    }
}

impl Resource for Attraction {
    const ID_PARAM: &'static str = "idAtracao";

    const MESSAGES: Messages = Messages {
        list_error: "Failed to fetch attractions; check the server logs",
        created: "Attraction created successfully",
        create_failed: "Could not store the attraction in the database",
        create_error: "Failed to create attraction; check the server logs",
        deleted: "Attraction removed successfully",
        delete_failed: "Could not remove the attraction",
        delete_error: "Failed to remove attraction; check the server logs",
        updated: "Attraction updated successfully",
        update_failed: "Could not update the attraction in the database",
        update_error: "Failed to update attraction; check the server logs",
    };

    type CreateRequest = NewRecord<AttractionFields>;

    fn split_create(request: NewRecord<AttractionFields>) -> (AttractionFields, Option<RecordId>) {
        (request.fields, request.habitat_id)
    }
}
