//! Bit-per-value capability sets over closed enumerations.

use std::fmt;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::types::CapsValue;

/// Subset of the values of `E` a backend supports.
///
/// Bit `i` of the mask is set when the value with index `i` is supported.
/// An empty set and an unsupported field mean the same thing.
pub struct EnumCapabilitySet<E> {
    bits: u32,
    _values: PhantomData<fn() -> E>,
}

impl<E: CapsValue> EnumCapabilitySet<E> {
    pub const fn new() -> Self {
        Self {
            bits: 0,
            _values: PhantomData,
        }
    }

    /// Replaces the set with exactly `values`.
    ///
    /// `name` identifies the field in the error when a value does not fit
    /// the mask. On error the set is left untouched.
    pub fn set_raw(&mut self, name: &str, values: &[u32]) -> Result<()> {
        let mut bits = 0u32;
        for &value in values {
            let Some(bit) = 1u32.checked_shl(value) else {
                tracing::warn!(enum_name = name, value, "enum value does not fit capability mask");
                return Err(Error::InvalidEnumValue {
                    name: name.to_string(),
                    value,
                });
            };
            bits |= bit;
        }
        self.bits = bits;
        Ok(())
    }

    /// Typed form of [`set_raw`](Self::set_raw), reporting errors under the
    /// enumeration's table name.
    pub fn set(&mut self, values: &[E]) -> Result<()> {
        let raw: Vec<u32> = values.iter().map(|v| v.index()).collect();
        self.set_raw(E::TABLE, &raw)
    }

    pub fn clear(&mut self) {
        self.bits = 0;
    }

    pub fn contains(&self, value: E) -> bool {
        self.contains_raw(value.index())
    }

    pub fn contains_raw(&self, value: u32) -> bool {
        value < u32::BITS && self.bits & (1 << value) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Set bit positions in ascending order, including any that have no
    /// corresponding value in `E`.
    pub fn raw_values(&self) -> impl Iterator<Item = u32> + '_ {
        set_bits(self.bits)
    }

    pub fn values(&self) -> impl Iterator<Item = E> + '_ {
        self.raw_values().filter_map(E::from_index)
    }
}

impl<E: CapsValue> Default for EnumCapabilitySet<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for EnumCapabilitySet<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EnumCapabilitySet<E> {}

impl<E> PartialEq for EnumCapabilitySet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for EnumCapabilitySet<E> {}

impl<E: CapsValue> fmt::Debug for EnumCapabilitySet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = self.raw_values().map(|i| match E::from_index(i) {
            Some(value) => value.as_str().to_string(),
            None => i.to_string(),
        });
        f.debug_set().entries(names).finish()
    }
}

/// Indices of the set bits of `bits`, ascending.
pub(crate) fn set_bits(bits: u32) -> impl Iterator<Item = u32> {
    (0..u32::BITS).filter(move |&i| bits & (1 << i) != 0)
}

/// Sets an [`EnumCapabilitySet`] field from a list of values, naming the
/// field after the expression used to reach it.
///
/// ```
/// use domcaps_core::{caps_enum_set, DiskBus, DiskBlock};
///
/// let mut disk = DiskBlock::default();
/// caps_enum_set!(disk.bus, DiskBus::Ide, DiskBus::Virtio).unwrap();
/// assert!(disk.bus.contains(DiskBus::Virtio));
/// ```
#[macro_export]
macro_rules! caps_enum_set {
    ($set:expr, $($value:expr),+ $(,)?) => {
        $set.set_raw(
            stringify!($set),
            &[$($crate::CapsValue::index($value)),+],
        )
    };
}
