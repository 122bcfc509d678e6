//! Typed indices.
//!
//! The scene snapshot is an arena of flat arrays; every cross reference is an
//! index into one of them. Each array gets its own newtype so a `NodeId` can
//! never be handed to something that expects a `SkeletonId`.

use std::fmt;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            #[inline]
            #[must_use]
            pub const fn new(index: u32) -> Self {
                Self(index)
            }

            /// Array index for this id.
            #[inline]
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl From<u32> for $name {
            #[inline]
            fn from(index: u32) -> Self {
                Self(index)
            }
        }

        impl From<usize> for $name {
            #[inline]
            fn from(index: usize) -> Self {
                Self(index as u32)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }
    };
}

define_id!(
    /// Index into `Scene::nodes`.
    NodeId
);
define_id!(
    /// Index into `Scene::skeletons`.
    SkeletonId
);
define_id!(
    /// Index into `Scene::clips`.
    ClipId
);
define_id!(
    /// Index into `Scene::meshes`.
    MeshId
);
define_id!(
    /// Index into `Scene::skins`.
    SkinId
);
define_id!(
    /// Index into `Scene::lights`.
    LightId
);
