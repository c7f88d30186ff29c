//! Packed callback handles
//!
//! A scripting-side call that carries a callback (or a promise
//! resolve/reject pair) identifies it by a small per-call id. Before the
//! native member sees it, the marshaller combines that id with the id of
//! the scripting instance the call came from, so the native side can route
//! the eventual reply back to the right instance without any extra state.
//!
//! # Encoding
//!
//! ```text
//! 63            32 31             0
//! +---------------+---------------+
//! |  instance id  |  callback id  |
//! +---------------+---------------+
//! ```
//!
//! Packing is `(instance as u64) << 32 | callback`; unpacking is shift and
//! mask. The packed value is meaningless outside the bridge that issued it.

const INSTANCE_SHIFT: u64 = 32;
const CALLBACK_MASK: u64 = 0xFFFF_FFFF;

/// Packed `(instance id, callback id)` pair.
///
/// Round-trips losslessly: `unpack(pack(a, b)) == (a, b)` for all `u32`
/// pairs.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackHandle(u64);

impl CallbackHandle {
    /// Pack an instance id and a per-call callback id into one handle
    #[inline]
    pub const fn pack(instance_id: u32, callback_id: u32) -> Self {
        Self(((instance_id as u64) << INSTANCE_SHIFT) | callback_id as u64)
    }

    /// Recover the `(instance id, callback id)` pair
    #[inline]
    pub const fn unpack(self) -> (u32, u32) {
        (
            (self.0 >> INSTANCE_SHIFT) as u32,
            (self.0 & CALLBACK_MASK) as u32,
        )
    }

    /// The scripting instance that issued the callback
    #[inline]
    pub const fn instance_id(self) -> u32 {
        (self.0 >> INSTANCE_SHIFT) as u32
    }

    /// The per-call callback id assigned by the scripting side
    #[inline]
    pub const fn callback_id(self) -> u32 {
        (self.0 & CALLBACK_MASK) as u32
    }

    /// Raw packed bits
    #[inline]
    pub const fn to_bits(self) -> u64 {
        self.0
    }

    /// Rebuild a handle from raw packed bits
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }
}

impl std::fmt::Debug for CallbackHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (instance, callback) = self.unpack();
        write!(f, "CallbackHandle({instance}:{callback})")
    }
}

/// A callback argument as seen by native code.
///
/// Carries the packed routing handle plus the argument slot (`vid`) the
/// callback occupied in the original call, which the scripting-side
/// callback table is keyed by. Promise handles must be resolved exactly
/// once; plain callbacks may fire any number of times.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JsCallback {
    handle: CallbackHandle,
    arg_index: u32,
    promise: bool,
}

impl JsCallback {
    /// Build a callback value (used by the marshaller during decode)
    pub const fn new(handle: CallbackHandle, arg_index: u32, promise: bool) -> Self {
        Self {
            handle,
            arg_index,
            promise,
        }
    }

    /// The packed routing handle
    pub const fn handle(self) -> CallbackHandle {
        self.handle
    }

    /// Which argument slot held the callback in the original call
    pub const fn arg_index(self) -> u32 {
        self.arg_index
    }

    /// Whether this is a promise resolve/reject pair (single resolution)
    pub const fn is_promise(self) -> bool {
        self.promise
    }
}
