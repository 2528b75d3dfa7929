//! Type-erased actions and the action validity check
//!
//! Actions are opaque values describing an intent to change state. The store
//! never looks inside them; reducers and middleware recover the concrete type
//! with [`Action::downcast_ref`].

use std::any::{self, Any, TypeId};
use std::fmt;

/// Reserved action dispatched when a store is created and whenever its
/// reducer is replaced.
///
/// Reducers should treat it like any unknown action and return the state
/// they were given (normalised if needed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Init;

/// An owned, type-erased action
pub struct Action {
    payload: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl Action {
    /// Wrap a value as an action
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            payload: Box::new(value),
            type_name: any::type_name::<T>(),
        }
    }

    /// The absent action. Dispatching it always fails.
    pub fn none() -> Self {
        Self::new(())
    }

    /// Returns true if the payload is of type `T`
    pub fn is<T: Any>(&self) -> bool {
        self.payload.is::<T>()
    }

    /// Borrow the payload as `T`
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.payload.downcast_ref::<T>()
    }

    /// Take the payload out as `T`, handing the action back on mismatch
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.payload.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(payload) => Err(Self { payload, type_name }),
        }
    }

    /// Name of the payload type, for diagnostics
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// [`TypeId`] of the payload
    pub fn payload_type_id(&self) -> TypeId {
        Any::type_id(&*self.payload)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Action").field(&self.type_name).finish()
    }
}

/// Payload types the store refuses to dispatch.
fn rejected_types() -> [TypeId; 25] {
    [
        // absent
        TypeId::of::<()>(),
        TypeId::of::<bool>(),
        TypeId::of::<i8>(),
        TypeId::of::<i16>(),
        TypeId::of::<i32>(),
        TypeId::of::<i64>(),
        TypeId::of::<i128>(),
        TypeId::of::<isize>(),
        TypeId::of::<u8>(),
        TypeId::of::<u16>(),
        TypeId::of::<u32>(),
        TypeId::of::<u64>(),
        TypeId::of::<u128>(),
        TypeId::of::<usize>(),
        TypeId::of::<f32>(),
        TypeId::of::<f64>(),
        TypeId::of::<char>(),
        TypeId::of::<String>(),
        TypeId::of::<&'static str>(),
        TypeId::of::<Box<str>>(),
        TypeId::of::<chrono::DateTime<chrono::Utc>>(),
        TypeId::of::<chrono::DateTime<chrono::Local>>(),
        TypeId::of::<chrono::DateTime<chrono::FixedOffset>>(),
        TypeId::of::<chrono::NaiveDateTime>(),
        TypeId::of::<chrono::NaiveDate>(),
    ]
}

/// Returns true if the action is absent or a primitive scalar/text value.
///
/// Such values carry no intent a reducer could match on, so dispatch rejects
/// them before taking the lock.
pub fn is_primitive_or_none(action: &Action) -> bool {
    rejected_types().contains(&action.payload_type_id())
}
