//! Interned identifiers for model, attribute and element names.
//!
//! Names are compared constantly while a content model is walked (declared
//! order against actual order, attribute lookups, mapping keys), so they are
//! interned once and compared as symbols afterwards.

use std::{
    fmt,
    sync::{Mutex, MutexGuard, OnceLock},
};

use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner shared by every [`Id`].
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn interner() -> MutexGuard<'static, DefaultStringInterner> {
    INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An interned name.
///
/// # Examples
///
/// ```
/// use strata_core::identifier::Id;
///
/// let first = Id::new("first_name");
/// let again: Id = "first_name".into();
///
/// assert_eq!(first, again);
/// assert_eq!(first, "first_name");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Interns `name` and returns its identifier.
    pub fn new(name: &str) -> Self {
        Self(interner().get_or_intern(name))
    }

    /// Returns an owned copy of the interned string.
    pub fn to_name(&self) -> String {
        self.with_str(str::to_owned)
    }

    /// Calls `f` with the interned string without copying it out.
    ///
    /// `f` runs while the interner lock is held, so it must not create or
    /// resolve other identifiers.
    pub fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let interner = interner();
        let name = interner.resolve(self.0).unwrap_or_default();
        f(name)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.to_name();
        f.write_str(&name)
    }
}

impl std::str::FromStr for Id {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<&String> for Id {
    fn from(name: &String) -> Self {
        Self::new(name)
    }
}

impl From<String> for Id {
    fn from(name: String) -> Self {
        Self::new(&name)
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.with_str(|name| name == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let id1 = Id::new("selected");
        let id2 = Id::new("selected");
        let id3 = Id::new("unselected");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert_eq!(id1, "selected");
    }

    #[test]
    fn test_display_trait() {
        let id = Id::new("perforated");
        assert_eq!(format!("{}", id), "perforated");
        assert_eq!(id.to_name(), "perforated");
    }

    #[test]
    fn test_from_traits() {
        let owned = String::from("email");
        let id1: Id = "email".into();
        let id2: Id = (&owned).into();
        let id3: Id = owned.clone().into();
        let id4: Id = owned.parse().unwrap();

        assert_eq!(id1, id2);
        assert_eq!(id2, id3);
        assert_eq!(id3, id4);
    }

    #[test]
    fn test_hash_and_eq() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(Id::new("phone"), 1);
        map.insert(Id::new("email"), 2);

        assert_eq!(map.get(&Id::new("phone")), Some(&1));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_partial_eq_str() {
        let id = Id::new("first_name");

        assert!(id == "first_name");
        assert!(id != "first");

        let empty = Id::new("");
        assert!(empty == "");
    }

    #[test]
    fn test_with_str_does_not_copy() {
        let id = Id::new("dimpled");
        assert_eq!(id.with_str(str::len), 7);
    }
}
