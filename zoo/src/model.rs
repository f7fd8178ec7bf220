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

//! Data types to represent the records kept by the zoo.

use derive_getters::Getters;
use derive_more::{Constructor, Display};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Identifier of a record of any kind, as assigned by the database.
#[derive(Clone, Constructor, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Returns the raw value of the identifier.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

/// A display name for a record.
///
/// Names are normalized to uppercase on construction.  Empty names and duplicates are allowed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Name(String);

impl Name {
    /// Creates a new name from an untrusted string, normalizing it.
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_uppercase())
    }

    /// Returns a string view of the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Visitor to deserialize a `Name` from a string.
struct NameVisitor;

impl Visitor<'_> for NameVisitor {
    type Value = Name;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a name")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Name::new(v))
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_string(NameVisitor)
    }
}

/// Mutable fields of a bird.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct BirdFields {
    /// Name of the bird.
    #[serde(rename = "nome")]
    name: Name,

    /// Age of the bird in years.
    #[serde(rename = "idade")]
    age: i32,

    /// Free-form gender of the bird.
    #[serde(rename = "genero")]
    gender: String,

    /// Wingspan of the bird.
    #[serde(rename = "envergadura")]
    wingspan: f64,
}

/// Mutable fields of a habitat.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct HabitatFields {
    /// Name of the habitat.  Requests carry `nomeHabitat` and listed rows carry `nomehabitat`.
    #[serde(
        rename(serialize = "nomehabitat", deserialize = "nomeHabitat"),
        alias = "nomehabitat"
    )]
    name: Name,
}

/// Mutable fields of an attraction.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct AttractionFields {
    /// Name of the attraction.  Requests carry `nomeAtracao` and listed rows carry `nomeatracao`.
    #[serde(
        rename(serialize = "nomeatracao", deserialize = "nomeAtracao"),
        alias = "nomeatracao"
    )]
    name: Name,
}

/// Request to create a record that can optionally be placed in a habitat.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NewRecord<F> {
    /// Mutable fields of the new record.
    #[serde(flatten)]
    pub fields: F,

    /// Habitat the record belongs to, if any.  The habitat is not required to exist, and a zero
    /// identifier means no habitat.
    #[serde(rename = "idHabitat", default, deserialize_with = "deserialize_habitat_id")]
    pub habitat_id: Option<RecordId>,
}

/// Deserializes an optional habitat identifier, treating `0` the same as an absent one.
fn deserialize_habitat_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let id = Option::<RecordId>::deserialize(deserializer)?;
    Ok(id.filter(|id| id.as_i64() != 0))
}

/// A bird as stored in the database.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Bird {
    /// Identifier of the bird.
    #[serde(rename = "idave")]
    id: RecordId,

    /// Mutable fields of the bird.
    #[serde(flatten)]
    fields: BirdFields,

    /// Habitat the bird was placed in when created.
    #[serde(rename = "idhabitat")]
    habitat_id: Option<RecordId>,
}

/// A habitat as stored in the database.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Habitat {
    /// Identifier of the habitat.
    #[serde(rename = "idhabitat")]
    id: RecordId,

    /// Mutable fields of the habitat.
    #[serde(flatten)]
    fields: HabitatFields,
}

/// An attraction as stored in the database.
#[derive(Clone, Constructor, Debug, Deserialize, Getters, PartialEq, Serialize)]
pub struct Attraction {
    /// Identifier of the attraction.
    #[serde(rename = "idatracao")]
    id: RecordId,

    /// Mutable fields of the attraction.
    #[serde(flatten)]
    fields: AttractionFields,

    /// Habitat the attraction was placed in when created.
    #[serde(rename = "idhabitat")]
    habitat_id: Option<RecordId>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serde_test::{Token, assert_de_tokens, assert_ser_tokens};

    #[test]
    fn test_name_uppercases() {
        assert_eq!("SAVANNA", Name::new("savanna").as_str());
        assert_eq!("SÃO PAULO", Name::new("são paulo").as_str());
        assert_eq!("", Name::new("").as_str());
    }

    #[test]
    fn test_name_ser_de() {
        assert_ser_tokens(&Name::new("desert"), &[Token::Str("DESERT")]);
        assert_de_tokens(&Name::new("DESERT"), &[Token::Str("desert")]);
        assert_de_tokens(&Name::new("DESERT"), &[Token::String("Desert")]);
    }

    #[test]
    fn test_name_de_error() {
        serde_test::assert_de_tokens_error::<Name>(
            &[Token::I32(5)],
            "invalid type: integer `5`, expected a name",
        );
    }

    #[test]
    fn test_record_id_ser_de() {
        assert_ser_tokens(&RecordId::new(12), &[Token::I64(12)]);
        assert_de_tokens(&RecordId::new(12), &[Token::I64(12)]);
    }

    #[test]
    fn test_new_record_with_habitat() {
        let request: NewRecord<BirdFields> = serde_json::from_value(json!({
            "nome": "condor",
            "idade": 5,
            "genero": "F",
            "envergadura": 2.5,
            "idHabitat": 3,
        }))
        .unwrap();
        assert_eq!(
            NewRecord {
                fields: BirdFields::new(Name::new("CONDOR"), 5, "F".to_owned(), 2.5),
                habitat_id: Some(RecordId::new(3)),
            },
            request
        );
    }

    #[test]
    fn test_new_record_without_habitat() {
        let request: NewRecord<AttractionFields> =
            serde_json::from_value(json!({"nomeAtracao": "show"})).unwrap();
        assert_eq!(
            NewRecord { fields: AttractionFields::new(Name::new("SHOW")), habitat_id: None },
            request
        );
    }

    #[test]
    fn test_new_record_zero_habitat() {
        let request: NewRecord<AttractionFields> =
            serde_json::from_value(json!({"nomeAtracao": "show", "idHabitat": 0})).unwrap();
        assert_eq!(None, request.habitat_id);
    }

    #[test]
    fn test_new_record_missing_field() {
        let result: Result<NewRecord<BirdFields>, _> =
            serde_json::from_value(json!({"nome": "condor", "idade": 5}));
        assert!(result.is_err());
    }

    #[test]
    fn test_bird_serialization() {
        let bird = Bird::new(
            RecordId::new(1),
            BirdFields::new(Name::new("condor"), 5, "F".to_owned(), 2.5),
            None,
        );
        assert_eq!(
            json!({
                "idave": 1,
                "nome": "CONDOR",
                "idade": 5,
                "genero": "F",
                "envergadura": 2.5,
                "idhabitat": null,
            }),
            serde_json::to_value(&bird).unwrap()
        );
    }

    #[test]
    fn test_habitat_serialization() {
        let habitat = Habitat::new(RecordId::new(7), HabitatFields::new(Name::new("savanna")));
        assert_eq!(
            json!({"idhabitat": 7, "nomehabitat": "SAVANNA"}),
            serde_json::to_value(&habitat).unwrap()
        );
    }

    #[test]
    fn test_habitat_deserialization() {
        let habitat: Habitat =
            serde_json::from_value(json!({"idhabitat": 7, "nomehabitat": "savanna"})).unwrap();
        assert_eq!(
            Habitat::new(RecordId::new(7), HabitatFields::new(Name::new("SAVANNA"))),
            habitat
        );
    }

    #[test]
    fn test_attraction_serialization() {
        let attraction = Attraction::new(
            RecordId::new(2),
            AttractionFields::new(Name::new("feeding")),
            Some(RecordId::new(7)),
        );
        assert_eq!(
            json!({"idatracao": 2, "nomeatracao": "FEEDING", "idhabitat": 7}),
            serde_json::to_value(&attraction).unwrap()
        );
    }
}
