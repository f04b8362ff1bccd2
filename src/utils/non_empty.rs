use serde::Serialize;
use std::ops::Deref;

/// A list holding at least one element. Serializes as a plain JSON array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmpty<T>(Vec<T>);

impl<T> Deref for NonEmpty<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl<T: Serialize> Serialize for NonEmpty<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T> NonEmpty<T> {
    pub fn from_vec(data: Vec<T>) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        Some(Self(data))
    }
}
