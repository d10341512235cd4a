//! Tri-state updates for nullable columns
//!
//! Distinguishes "leave the stored value alone" from "clear it" from
//! "replace it", which a plain `Option` cannot express.
//!
//! On the wire an omitted field is `Keep`, an explicit `null` is `Clear` and
//! any other value is `Set`. Fields must carry `#[serde(default)]` so that
//! omission reaches `Keep`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Change<T> {
    #[default]
    Keep,
    Set(T),
    Clear,
}

impl<T> Change<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Change::Keep)
    }

    /// The supplied value, if any
    pub fn as_set(&self) -> Option<&T> {
        match self {
            Change::Set(value) => Some(value),
            Change::Keep | Change::Clear => None,
        }
    }

    /// The value the column should hold after the write, when it is written
    pub fn into_value(self) -> Option<T> {
        match self {
            Change::Set(value) => Some(value),
            Change::Keep | Change::Clear => None,
        }
    }

    /// SQL bind pair `(keep_existing, new_value)` for
    /// `col = CASE WHEN $keep THEN col ELSE $value END`
    pub fn into_binds(self) -> (bool, Option<T>) {
        (self.is_keep(), self.into_value())
    }

    /// Convert a supplied value, leaving `Keep` and `Clear` as they are
    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<Change<U>, E> {
        Ok(match self {
            Change::Keep => Change::Keep,
            Change::Set(value) => Change::Set(f(value)?),
            Change::Clear => Change::Clear,
        })
    }
}

impl<T> From<Option<T>> for Change<T> {
    /// `None` means the caller supplied nothing, so the stored value is kept
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Change::Set(value),
            None => Change::Keep,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Change<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Change::Set(value),
            None => Change::Clear,
        })
    }
}

impl<T: Serialize> Serialize for Change<T> {
    /// `Keep` serializes as `null` too; pair with `skip_serializing_if = "Change::is_keep"`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_set().serialize(serializer)
    }
}
