//! The tagged value primitive.
//!
//! A [`Tagged<T>`] is immutable once built: there are no `&mut` accessors,
//! and moving to a new domain state means consuming the old value and
//! constructing a new one under a different tag.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// A discriminant known at compile time.
///
/// The associated `Payload` type is what makes the payload's type a function
/// of the tag: every `Tagged<T>` carries exactly a `T::Payload`.
///
/// Tags are usually declared with [`tag!`](crate::tag), which produces an
/// uninhabited type that exists only at the type level.
pub trait Tag {
    /// Label reported by [`Tagged::tag`] and used on the wire.
    const NAME: &'static str;

    type Payload;
}

/// A payload fixed to the variant named by `T`.
///
/// Identity is nominal. The following does not compile even though both tags
/// carry a `u32`:
///
/// ```compile_fail
/// use statecraft_types::{Tagged, tag};
///
/// tag!(Width => u32);
/// tag!(Height => u32);
///
/// let width: Tagged<Width> = Tagged::new(10);
/// let height: Tagged<Height> = width;
/// ```
pub struct Tagged<T: Tag> {
    value: T::Payload,
    _tag: PhantomData<T>,
}

/// Build a tagged value. Construction always succeeds; checking that the
/// payload is legal belongs to the smart constructor that calls this.
pub fn create_tagged<T: Tag>(value: T::Payload) -> Tagged<T> {
    Tagged::new(value)
}

impl<T: Tag> Tagged<T> {
    pub fn new(value: T::Payload) -> Self {
        Self {
            value,
            _tag: PhantomData,
        }
    }

    #[must_use]
    pub fn tag(&self) -> &'static str {
        T::NAME
    }

    #[must_use]
    pub fn value(&self) -> &T::Payload {
        &self.value
    }

    #[must_use]
    pub fn into_value(self) -> T::Payload {
        self.value
    }
}

impl<T: Tag<Payload = &'static str>> Tagged<T> {
    /// The payload-less form: a singleton whose payload is the tag label.
    #[must_use]
    pub fn marker() -> Self {
        Self::new(T::NAME)
    }
}

impl<T: Tag> Clone for Tagged<T>
where
    T::Payload: Clone,
{
    fn clone(&self) -> Self {
        Self::new(self.value.clone())
    }
}

impl<T: Tag> Copy for Tagged<T> where T::Payload: Copy {}

impl<T: Tag> PartialEq for Tagged<T>
where
    T::Payload: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Tag> Eq for Tagged<T> where T::Payload: Eq {}

impl<T: Tag> Hash for Tagged<T>
where
    T::Payload: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        T::NAME.hash(state);
        self.value.hash(state);
    }
}

impl<T: Tag> fmt::Debug for Tagged<T>
where
    T::Payload: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(T::NAME).field(&self.value).finish()
    }
}

// ============================================================================
// Serde
// ============================================================================

/// Returned when a serialized tagged value names a different variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected tag `{expected}`, found `{found}`")]
pub struct TagMismatch {
    pub expected: &'static str,
    pub found: String,
}

impl<T: Tag> Serialize for Tagged<T>
where
    T::Payload: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Tagged", 2)?;
        state.serialize_field("tag", T::NAME)?;
        state.serialize_field("value", &self.value)?;
        state.end()
    }
}

impl<'de, T: Tag> Deserialize<'de> for Tagged<T>
where
    T::Payload: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct TaggedWire<P> {
            tag: String,
            value: P,
        }

        let wire = TaggedWire::<T::Payload>::deserialize(deserializer)?;
        if wire.tag != T::NAME {
            return Err(D::Error::custom(TagMismatch {
                expected: T::NAME,
                found: wire.tag,
            }));
        }
        Ok(Self::new(wire.value))
    }
}
