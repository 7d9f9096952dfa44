use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Type-tagged identifier wrapping a `uuid::Uuid`. `ID<Hand>` and
/// `ID<Player>` are distinct types at compile time even though both are
/// backed by a plain UUID underneath.
#[derive(Serialize, Deserialize)]
#[serde(transparent)]
pub struct ID<T> {
    inner: uuid::Uuid,
    #[serde(skip)]
    marker: PhantomData<fn() -> T>,
}

impl<T> ID<T> {
    pub fn new() -> Self {
        Self {
            inner: uuid::Uuid::new_v4(),
            marker: PhantomData,
        }
    }

    pub fn inner(&self) -> uuid::Uuid {
        self.inner
    }

    /// Re-tag this id as belonging to a different entity, preserving the
    /// underlying UUID. Used sparingly, e.g. when a Pot id is derived from
    /// its owning Hand id.
    pub fn cast<U>(self) -> ID<U> {
        ID {
            inner: self.inner,
            marker: PhantomData,
        }
    }
}

/// Any domain entity that can identify itself.
pub trait Unique<T = Self> {
    fn id(&self) -> ID<T>;
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}
impl<T> From<ID<T>> for uuid::Uuid {
    fn from(id: ID<T>) -> Self {
        id.inner
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::new()
    }
}
impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}
impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<T> Hash for ID<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}
impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Hand;
    struct Player;

    #[test]
    fn distinct_ids_are_unequal() {
        let a: ID<Hand> = ID::new();
        let b: ID<Hand> = ID::new();
        assert_ne!(a, b);
    }

    #[test]
    fn cast_preserves_uuid() {
        let a: ID<Hand> = ID::new();
        let uuid = a.inner();
        let b: ID<Player> = a.cast();
        assert_eq!(b.inner(), uuid);
    }

    #[test]
    fn roundtrips_through_uuid() {
        let a: ID<Hand> = ID::new();
        let uuid: uuid::Uuid = a.into();
        let b: ID<Hand> = uuid.into();
        assert_eq!(a, b);
    }
}
