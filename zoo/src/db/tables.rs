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

//! Table layouts for every kind of record.

use crate::db::{Column, ColumnType, Schema, Table, Value, Values};
use crate::model::*;
use zoo_core::db::DbResult;

impl Table for Bird {
    type Fields = BirdFields;

    const SCHEMA: Schema = Schema {
        table: "ave",
        id_column: "idave",
        columns: &[
            Column { name: "nome", ty: ColumnType::Text },
            Column { name: "idade", ty: ColumnType::Integer },
            Column { name: "genero", ty: ColumnType::Text },
            Column { name: "envergadura", ty: ColumnType::Real },
        ],
        habitat_column: Some("idhabitat"),
    };

    #[cfg(test)]
    fn record_id(&self) -> RecordId {
        *self.id()
    }

    fn values(fields: &BirdFields) -> Vec<Value> {
        vec![
            Value::Text(fields.name().as_str().to_owned()),
            Value::Integer(*fields.age()),
            Value::Text(fields.gender().clone()),
            Value::Real(*fields.wingspan()),
        ]
    }

    fn from_parts(
        id: RecordId,
        mut values: Values,
        habitat_id: Option<RecordId>,
    ) -> DbResult<Self> {
        let fields = BirdFields::new(
            Name::new(values.text()?),
            values.integer()?,
            values.text()?,
            values.real()?,
        );
        Ok(Bird::new(id, fields, habitat_id))
    }
}

impl Table for Habitat {
    type Fields = HabitatFields;

    const SCHEMA: Schema = Schema {
        table: "habitat",
        id_column: "idhabitat",
        columns: &[Column { name: "nomehabitat", ty: ColumnType::Text }],
        habitat_column: None,
    };

    #[cfg(test)]
    fn record_id(&self) -> RecordId {
        *self.id()
    }

    fn values(fields: &HabitatFields) -> Vec<Value> {
        vec![Value::Text(fields.name().as_str().to_owned())]
    }

    fn from_parts(
        id: RecordId,
        mut values: Values,
        _habitat_id: Option<RecordId>,
    ) -> DbResult<Self> {
        Ok(Habitat::new(id, HabitatFields::new(Name::new(values.text()?))))
    }
}

impl Table for Attraction {
    type Fields = AttractionFields;

    const SCHEMA: Schema = Schema {
        table: "atracao",
        id_column: "idatracao",
        columns: &[Column { name: "nomeatracao", ty: ColumnType::Text }],
        habitat_column: Some("idhabitat"),
    };

    #[cfg(test)]
    fn record_id(&self) -> RecordId {
        *self.id()
    }

    fn values(fields: &AttractionFields) -> Vec<Value> {
        vec![Value::Text(fields.name().as_str().to_owned())]
    }

    fn from_parts(
        id: RecordId,
        mut values: Values,
        habitat_id: Option<RecordId>,
    ) -> DbResult<Self> {
        Ok(Attraction::new(id, AttractionFields::new(Name::new(values.text()?)), habitat_id))
    }
}
