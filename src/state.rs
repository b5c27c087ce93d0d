//! Snapshot and restore of logged values.
//!
//! A value's state is its serde representation as a JSON object. Class
//! loggers are never part of it: [`ClassLogger`](crate::registry::ClassLogger)
//! has no serde impls and must be `#[serde(skip)]`ped, and restoring a value
//! binds its logger again through `Default`.

use crate::error::{Error, Result};
use crate::registry::{attach, Logged};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// Attribute name to value mapping.
pub type StateMap = serde_json::Map<String, Value>;

pub trait Snapshot: Logged + Serialize + DeserializeOwned + Sized {
    /// Every serialized attribute of `self`.
    fn get_state(&self) -> Result<StateMap> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(Error::NotAMapping {
                found: value_kind(&other),
            }),
        }
    }

    /// Replace `self` with the value described by `state`.
    ///
    /// On error `self` is left unchanged.
    fn set_state(&mut self, state: StateMap) -> Result<()> {
        *self = Self::from_state(state)?;
        Ok(())
    }

    fn from_state(state: StateMap) -> Result<Self> {
        let value = serde_json::from_value(Value::Object(state))?;
        let logger = attach::<Self>();
        log::trace!("Restored {} from state", logger.name());
        Ok(value)
    }
}

impl<T> Snapshot for T where T: Logged + Serialize + DeserializeOwned {}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
