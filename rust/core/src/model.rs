// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory STEP entity graph
//!
//! Entities live in an arena indexed by their instance number. Attribute
//! values reference other entities by [`EntityId`] only, so the graph has no
//! ownership cycles.

use std::fmt;

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::schema::IfcType;

/// STEP instance number, written as `#n`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Attribute value of an entity instance
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// Entity reference: #123
    Ref(EntityId),
    /// String literal, unescaped
    String(String),
    Integer(i64),
    Real(f64),
    /// Enumeration literal without the dots: ELEMENT
    Enum(&'static str),
    /// Boolean, written .T. / .F.
    Bool(bool),
    List(Vec<AttributeValue>),
    /// Typed select value: IFCPARAMETERVALUE(0.)
    Typed(&'static str, Box<AttributeValue>),
    /// Unset optional: $
    Null,
    /// Derived in a subtype: *
    Derived,
}

impl AttributeValue {
    /// List of reals, e.g. the coordinates of a point or direction
    pub fn reals(values: &[f64]) -> Self {
        AttributeValue::List(values.iter().copied().map(AttributeValue::Real).collect())
    }

    /// List of entity references
    pub fn refs<I: IntoIterator<Item = EntityId>>(ids: I) -> Self {
        AttributeValue::List(ids.into_iter().map(AttributeValue::Ref).collect())
    }

    pub fn typed(type_name: &'static str, value: impl Into<AttributeValue>) -> Self {
        AttributeValue::Typed(type_name, Box::new(value.into()))
    }

    /// Get as entity reference
    #[inline]
    pub fn as_entity_ref(&self) -> Option<EntityId> {
        match self {
            AttributeValue::Ref(id) => Some(*id),
            _ => None,
        }
    }

    #[inline]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    pub fn as_enum(&self) -> Option<&'static str> {
        match self {
            AttributeValue::Enum(e) => Some(*e),
            _ => None,
        }
    }

    /// Get as float (integers widen)
    #[inline]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            AttributeValue::Real(f) => Some(*f),
            AttributeValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    #[inline]
    pub fn as_list(&self) -> Option<&[AttributeValue]> {
        match self {
            AttributeValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl From<EntityId> for AttributeValue {
    fn from(id: EntityId) -> Self {
        AttributeValue::Ref(id)
    }
}

impl From<f64> for AttributeValue {
    fn from(v: f64) -> Self {
        AttributeValue::Real(v)
    }
}

impl From<i64> for AttributeValue {
    fn from(v: i64) -> Self {
        AttributeValue::Integer(v)
    }
}

impl From<bool> for AttributeValue {
    fn from(v: bool) -> Self {
        AttributeValue::Bool(v)
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::String(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::String(s)
    }
}

impl<T: Into<AttributeValue>> From<Option<T>> for AttributeValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(AttributeValue::Null, Into::into)
    }
}

/// One entity instance
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub ifc_type: IfcType,
    pub attributes: Vec<AttributeValue>,
}

impl Entity {
    /// Get attribute by index
    #[inline]
    pub fn get(&self, index: usize) -> Option<&AttributeValue> {
        self.attributes.get(index)
    }

    /// Get string attribute
    pub fn get_string(&self, index: usize) -> Option<&str> {
        self.get(index).and_then(|a| a.as_string())
    }

    /// Get entity reference attribute
    pub fn get_ref(&self, index: usize) -> Option<EntityId> {
        self.get(index).and_then(|a| a.as_entity_ref())
    }

    /// Get float attribute
    pub fn get_float(&self, index: usize) -> Option<f64> {
        self.get(index).and_then(|a| a.as_float())
    }
}

/// Arena of entities with sequential instance numbers starting at 1
#[derive(Debug, Default, Clone)]
pub struct StepModel {
    entities: Vec<Entity>,
    by_type: FxHashMap<IfcType, Vec<EntityId>>,
}

impl StepModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entity and return its id
    pub fn add(&mut self, ifc_type: IfcType, attributes: Vec<AttributeValue>) -> EntityId {
        let id = EntityId(self.entities.len() as u32 + 1);
        self.entities.push(Entity {
            id,
            ifc_type,
            attributes,
        });
        self.by_type.entry(ifc_type).or_default().push(id);
        id
    }

    #[inline]
    fn index(id: EntityId) -> Option<usize> {
        (id.0 as usize).checked_sub(1)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        Self::index(id).and_then(|i| self.entities.get(i))
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        Self::index(id).and_then(move |i| self.entities.get_mut(i))
    }

    /// Replace one attribute of an existing entity
    pub fn set_attribute(&mut self, id: EntityId, index: usize, value: AttributeValue) -> Result<()> {
        let entity = self.get_mut(id).ok_or(Error::EntityNotFound(id.0))?;
        let slot = entity
            .attributes
            .get_mut(index)
            .ok_or(Error::AttributeOutOfRange { id: id.0, index })?;
        *slot = value;
        Ok(())
    }

    /// Append to a list-valued attribute
    pub fn push_to_list(&mut self, id: EntityId, index: usize, value: AttributeValue) -> Result<()> {
        let entity = self.get_mut(id).ok_or(Error::EntityNotFound(id.0))?;
        match entity.attributes.get_mut(index) {
            Some(AttributeValue::List(items)) => {
                items.push(value);
                Ok(())
            }
            Some(_) => Err(Error::NotAList { id: id.0, index }),
            None => Err(Error::AttributeOutOfRange { id: id.0, index }),
        }
    }

    /// Ids of all entities of one type, in creation order
    pub fn by_type(&self, ifc_type: IfcType) -> &[EntityId] {
        self.by_type.get(&ifc_type).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, ifc_type: IfcType) -> usize {
        self.by_type(ifc_type).len()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }
}
