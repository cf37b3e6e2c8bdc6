// Shared shape of the bitset newtypes used for parser options and results.
macro_rules! flag_set {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($raw:ty);
    ) => {
        $(#[$meta])*
        #[repr(transparent)]
        #[derive(Debug, Default, PartialEq, Clone, Copy, Hash, Eq)]
        pub struct $name($raw);

        impl $name {
            #[inline]
            pub const fn bits(self) -> $raw {
                self.0
            }

            #[inline]
            pub const fn contains(self, other: Self) -> bool {
                (self.0 & other.0) == other.0
            }

            #[inline]
            pub const fn is_none(self) -> bool {
                self.0 == 0
            }

            #[inline]
            pub const fn insert(&mut self, other: Self) {
                self.0 |= other.0
            }

            #[inline]
            pub const fn remove(&mut self, other: Self) {
                self.0 &= !other.0
            }

            #[inline]
            pub const fn set(&mut self, other: Self, enabled: bool) {
                if enabled {
                    self.0 |= other.0;
                } else {
                    self.0 &= !other.0;
                }
            }
        }

        impl core::ops::BitOr for $name {
            type Output = Self;
            #[inline]
            fn bitor(self, rhs: Self) -> Self {
                Self(self.0 | rhs.0)
            }
        }
    };
}

pub(crate) use flag_set;
