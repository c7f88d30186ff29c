//! Binding objects — native instances exposed to the scripting side
//!
//! Anything constructed through an exposed constructor and stored under a
//! caller-assigned id implements [`BindingObject`]. The trait is the opt-in
//! point for cross-environment exposure; there is no blanket impl.

use std::any::Any;

/// A native object addressable from the scripting side.
///
/// Implementors get a teardown notification just before the bridge drops
/// them (on an explicit release notice or bridge teardown).
pub trait BindingObject: Any + Send {
    /// Called once, immediately before the object is destroyed
    fn on_destroyed(&mut self) {}
}

impl dyn BindingObject {
    /// Borrow as `Any` for downcasting
    pub fn as_any(&self) -> &dyn Any {
        self
    }

    /// Mutably borrow as `Any` for downcasting
    pub fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    /// Downcast to a concrete binding type
    pub fn downcast_ref<T: BindingObject>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably downcast to a concrete binding type
    pub fn downcast_mut<T: BindingObject>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}

/// Immutable invocation target: `None` addresses a static surface
pub type TargetRef<'a> = Option<&'a dyn Any>;

/// Mutable invocation target: `None` addresses a static surface
pub type TargetMut<'a> = Option<&'a mut dyn Any>;
