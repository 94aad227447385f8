use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A snippet field that distinguishes "not mentioned" from "explicitly null".
///
/// Creates and patches omit [`Field::Absent`] fields so server defaults apply
/// and existing values are not clobbered. [`Field::Null`] is sent as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn set(&mut self, value: T) {
        *self = Self::Value(value);
    }

    /// Drop the field from the payload entirely.
    pub fn clear(&mut self) {
        *self = Self::Absent;
    }

    /// Return the contained value, storing `init()` first if there is none.
    pub fn get_or_insert_with(&mut self, init: impl FnOnce() -> T) -> &mut T {
        if !matches!(self, Self::Value(_)) {
            *self = Self::Value(init());
        }
        match self {
            Self::Value(v) => v,
            _ => unreachable!("field was just set"),
        }
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Self::Value(value)
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Value(v),
            None => Self::Null,
        }
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => v.serialize(serializer),
            // Absent fields are skipped by `skip_serializing_if`
            Self::Absent | Self::Null => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // A missing key never reaches here: fields carry `#[serde(default)]`.
        Ok(Option::<T>::deserialize(deserializer)?.into())
    }
}
