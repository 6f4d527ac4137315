#[macro_use]
mod macros;

use crate::{
    ID_FIELD,
    model::entity::EntityModel,
    value::{Document, Value},
};

// ============================================================================
// FOUNDATIONAL KINDS
// ============================================================================

///
/// Path
/// Fully-qualified type path.
///

pub trait Path {
    const PATH: &'static str;
}

// ============================================================================
// ENTITY SCHEMA
// ============================================================================
//
// These traits describe *what an entity is*, not how it is written.
//

///
/// EntityKind
///
/// Persistent entity type with its declared runtime model.
/// Implemented by `#[derive(Entity)]`; the `#[sharded]` attribute implies it.
///

pub trait EntityKind: Path + 'static {
    const MODEL: &'static EntityModel;
}

///
/// EntityValue
///
/// Instance side of an entity: the document form the write path persists.
///

pub trait EntityValue: EntityKind {
    /// Full document copy of this entity, identifier under `_id`.
    fn to_document(&self) -> Document;

    /// Identifier value, when the entity carries one.
    fn id(&self) -> Option<Value> {
        self.to_document()
            .get(ID_FIELD)
            .filter(|v| !v.is_null())
            .cloned()
    }
}

// ============================================================================
// FIELD VALUES
// ============================================================================

///
/// FieldValue
///
/// Conversion boundary from Rust field types into document values.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;
}

impl_field_value!(
    bool => Bool,
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    f32 => Float64,
    f64 => Float64,
);

impl FieldValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FieldValue for Document {
    fn to_value(&self) -> Value {
        Value::Document(self.clone())
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FieldValue> FieldValue for Box<T> {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: FieldValue> FieldValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(FieldValue::to_value).collect())
    }
}
