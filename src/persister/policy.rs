use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// When a Persister falls back to, or writes back, its default value.
///
/// The empty set never writes the default and surfaces every read error.
///
/// ```
/// use persist_rust::DefaultValuePolicy;
///
/// let policy = DefaultValuePolicy::PERSIST_WHEN_ABSENT | DefaultValuePolicy::DEFAULT_ON_ERROR;
/// assert!(policy.contains(DefaultValuePolicy::DEFAULT_ON_ERROR));
/// assert!(!policy.contains(DefaultValuePolicy::PERSIST_ON_ERROR));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DefaultValuePolicy(u8);

impl DefaultValuePolicy {
    /// Use the default only in memory, never surface it for errors.
    pub const NONE: Self = Self(0);

    /// On a read that finds nothing stored, write the default to the backend.
    pub const PERSIST_WHEN_ABSENT: Self = Self(0b001);

    /// On a read whose stored value has the wrong shape or fails to
    /// transform, return the default instead of the error.
    pub const DEFAULT_ON_ERROR: Self = Self(0b010);

    /// Like `DEFAULT_ON_ERROR`, and also write the recovered default back,
    /// replacing the unreadable value.
    pub const PERSIST_ON_ERROR: Self = Self(0b110);

    pub const fn empty() -> Self {
        Self::NONE
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for DefaultValuePolicy {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for DefaultValuePolicy {
    fn bitor_assign(&mut self, rhs: Self) {
        self.insert(rhs);
    }
}

impl fmt::Debug for DefaultValuePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(Self::PERSIST_WHEN_ABSENT) {
            names.push("PERSIST_WHEN_ABSENT");
        }
        if self.contains(Self::PERSIST_ON_ERROR) {
            names.push("PERSIST_ON_ERROR");
        } else if self.contains(Self::DEFAULT_ON_ERROR) {
            names.push("DEFAULT_ON_ERROR");
        }
        write!(f, "DefaultValuePolicy({})", names.join(" | "))
    }
}
