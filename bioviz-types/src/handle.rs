use bytemuck::{Pod, Zeroable};

macro_rules! resource_handle {
    ($(#[$outer:meta])* $name:ident, $kind:literal) => {
        $(#[$outer])*
        ///
        /// Handles are signed 16-bit indices into their store. Negative values
        /// are the "invalid" sentinel. Ordering compares the raw index, which is
        /// what drawlist sorting relies on.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(i16);

        impl $name {
            /// The canonical invalid handle.
            pub const INVALID: Self = Self(-1);

            /// Largest index a handle can carry.
            pub const MAX_INDEX: usize = i16::MAX as usize;

            /// Creates a handle referring to slot `idx` of its store.
            ///
            /// # Panics
            ///
            /// Panics if `idx` does not fit in the handle.
            pub fn from_index(idx: usize) -> Self {
                assert!(
                    idx <= Self::MAX_INDEX,
                    concat!("ran out of ", $kind, " handles: index {} exceeds {}"),
                    idx,
                    Self::MAX_INDEX
                );
                Self(idx as i16)
            }

            /// Creates a handle from its raw value. Any negative value is invalid.
            pub const fn from_raw(raw: i16) -> Self {
                Self(raw)
            }

            /// Raw value of the handle.
            pub const fn raw(self) -> i16 {
                self.0
            }

            pub const fn is_valid(self) -> bool {
                self.0 >= 0
            }

            /// Index into the store this handle refers to, if valid.
            pub const fn index(self) -> Option<usize> {
                if self.is_valid() {
                    Some(self.0 as usize)
                } else {
                    None
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }
    };
}

resource_handle!(
    /// Refers to a mesh uploaded into a mesh store.
    MeshHandle,
    "mesh"
);

resource_handle!(
    /// Refers to a texture uploaded into a texture store.
    TextureHandle,
    "texture"
);
