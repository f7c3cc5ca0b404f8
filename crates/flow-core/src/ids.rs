//! Strongly typed, zero-cost identifier wrappers.
//!
//! Node and edge ids are chosen by the topology provider and stay stable when
//! the topology snapshot is replaced, so a particle's path (a list of
//! `EdgeId`s) remains meaningful across edits.  Particle and case ids are
//! allocated sequentially by their owning subsystem and never reused within a
//! run.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// The id following `self`; used by sequential allocators.
            #[inline(always)]
            pub fn next(self) -> $name {
                $name(self.0.wrapping_add(1))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$inner> for $name {
            #[inline(always)]
            fn from(raw: $inner) -> $name {
                $name(raw)
            }
        }
    };
}

typed_id! {
    /// Identifier of a workflow node, supplied by the topology provider.
    pub struct NodeId(u32);
}

typed_id! {
    /// Identifier of a directed workflow edge, supplied by the topology provider.
    pub struct EdgeId(u32);
}

typed_id! {
    /// Identifier of a live particle.  Allocated by the particle pool.
    pub struct ParticleId(u64);
}

typed_id! {
    /// Identifier of a simulated case.  Allocated by the case engine.
    pub struct CaseId(u64);
}
