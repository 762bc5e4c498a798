//! Normalization schemas for response payloads.
//!
//! A schema describes where entities live in a nested payload. Normalizing
//! flattens them into an id-keyed table per entity kind and replaces each
//! nested entity with its id:
//!
//! ```text
//! {"entities": {"<key>": {"<id>": {..}}}, "result": "<id>" | ["<id>", ..]}
//! ```

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ApiError;

/// Shape of a single entity kind.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    key: String,
    id_attribute: String,
    relations: BTreeMap<String, Schema>,
}

/// Normalization descriptor for a payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Entity(EntitySchema),
    Array(Box<Schema>),
}

impl Schema {
    pub fn entity(key: &str, id_attribute: &str) -> Self {
        Schema::Entity(EntitySchema {
            key: key.to_string(),
            id_attribute: id_attribute.to_string(),
            relations: BTreeMap::new(),
        })
    }

    pub fn array_of(inner: Schema) -> Self {
        Schema::Array(Box::new(inner))
    }

    /// Declare that `field` of this entity holds entities of `schema`.
    ///
    /// Relations on an array schema apply to its element schema.
    pub fn with_relation(self, field: &str, schema: Schema) -> Self {
        match self {
            Schema::Entity(mut entity) => {
                entity.relations.insert(field.to_string(), schema);
                Schema::Entity(entity)
            }
            Schema::Array(inner) => Schema::Array(Box::new(inner.with_relation(field, schema))),
        }
    }

    /// Flatten `data` into `{"entities", "result"}`.
    pub fn normalize(&self, data: Value) -> Result<Value, ApiError> {
        let mut entities = Map::new();
        let result = self.visit(data, &mut entities)?;
        let mut out = Map::new();
        out.insert("entities".to_string(), Value::Object(entities));
        out.insert("result".to_string(), result);
        Ok(Value::Object(out))
    }

    fn visit(&self, data: Value, entities: &mut Map<String, Value>) -> Result<Value, ApiError> {
        match self {
            Schema::Array(inner) => match data {
                Value::Array(items) => items
                    .into_iter()
                    .map(|item| inner.visit(item, entities))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array),
                Value::Null => Ok(Value::Null),
                other => Err(ApiError::Normalization(format!(
                    "expected an array, got {}",
                    kind_of(&other)
                ))),
            },
            Schema::Entity(entity) => entity.visit(data, entities),
        }
    }
}

impl EntitySchema {
    fn visit(&self, data: Value, entities: &mut Map<String, Value>) -> Result<Value, ApiError> {
        let mut object = match data {
            Value::Object(object) => object,
            Value::Null => return Ok(Value::Null),
            other => {
                return Err(ApiError::Normalization(format!(
                    "expected a `{}` object, got {}",
                    self.key,
                    kind_of(&other)
                )))
            }
        };

        let id = match object.get(&self.id_attribute) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            _ => {
                return Err(ApiError::Normalization(format!(
                    "`{}` entity has no `{}`",
                    self.key, self.id_attribute
                )))
            }
        };

        for (field, schema) in &self.relations {
            if let Some(nested) = object.remove(field) {
                let replaced = schema.visit(nested, entities)?;
                object.insert(field.clone(), replaced);
            }
        }

        let table = entities
            .entry(self.key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(table) = table {
            match table.get_mut(&id) {
                // Later occurrences win field by field.
                Some(Value::Object(existing)) => existing.extend(object),
                _ => {
                    table.insert(id.clone(), Value::Object(object));
                }
            }
        }
        Ok(Value::String(id))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
