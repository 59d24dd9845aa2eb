//! Key derivation for elements.
//!
//! A [`KeyFilter`] decides two things about every element: which group it
//! hashes into, and whether that group may anchor a block. Returning `None`
//! removes the element from the search altogether; it keeps its position in
//! the sequence but can never be part of a block, so it also breaks any run
//! that would cross it.

use std::fmt::Display;
use std::hash::Hash;
use std::marker::PhantomData;

/// The verdict of a [`KeyFilter`] for one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified<K> {
    /// Grouping identity.
    pub key: K,
    /// Whether the key may anchor (seed) a block.
    ///
    /// Only the first verdict seen for a key counts.
    pub significant: bool,
}

impl<K> Classified<K> {
    /// A key that may anchor blocks.
    pub fn significant(key: K) -> Self {
        Self {
            key,
            significant: true,
        }
    }

    /// A key that may extend blocks but never start one.
    pub fn insignificant(key: K) -> Self {
        Self {
            key,
            significant: false,
        }
    }
}

/// Maps elements to grouping keys.
pub trait KeyFilter<T: ?Sized> {
    /// Hashing identity produced by this filter.
    type Key: Eq + Hash;

    /// Classify one element, or `None` to exclude it.
    fn classify(&self, element: &T) -> Option<Classified<Self::Key>>;
}

impl<T: ?Sized, F: KeyFilter<T> + ?Sized> KeyFilter<T> for &F {
    type Key = F::Key;

    fn classify(&self, element: &T) -> Option<Classified<Self::Key>> {
        (**self).classify(element)
    }
}

/// Keys every element by its `Display` form; everything is significant.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl<T: Display + ?Sized> KeyFilter<T> for IdentityFilter {
    type Key = String;

    fn classify(&self, element: &T) -> Option<Classified<String>> {
        Some(Classified::significant(element.to_string()))
    }
}

/// Adapts a closure into a [`KeyFilter`].
///
/// ```
/// use concordance::engine::{Classified, FnFilter, KeyFilter};
///
/// let filter = FnFilter::new(|line: &&str| {
///     let trimmed = line.trim();
///     Some(Classified {
///         key: trimmed.to_string(),
///         significant: !trimmed.is_empty(),
///     })
/// });
/// assert!(!filter.classify(&"   ").unwrap().significant);
/// ```
pub struct FnFilter<F, K> {
    f: F,
    _key: PhantomData<fn() -> K>,
}

impl<F, K> FnFilter<F, K> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _key: PhantomData,
        }
    }
}

impl<T, F, K> KeyFilter<T> for FnFilter<F, K>
where
    T: ?Sized,
    F: Fn(&T) -> Option<Classified<K>>,
    K: Eq + Hash,
{
    type Key = K;

    fn classify(&self, element: &T) -> Option<Classified<K>> {
        (self.f)(element)
    }
}

impl<F, K> std::fmt::Debug for FnFilter<F, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFilter").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_filter_uses_display() {
        let verdict = KeyFilter::<i32>::classify(&IdentityFilter, &42).unwrap();
        assert_eq!(verdict.key, "42");
        assert!(verdict.significant);
    }

    #[test]
    fn test_fn_filter_can_exclude() {
        let filter = FnFilter::new(|s: &String| {
            if s.starts_with('#') {
                None
            } else {
                Some(Classified::significant(s.clone()))
            }
        });
        assert!(filter.classify(&"# comment".to_string()).is_none());
        assert_eq!(filter.classify(&"code".to_string()).unwrap().key, "code");
    }

    #[test]
    fn test_filter_by_reference() {
        let filter = IdentityFilter;
        let by_ref = &filter;
        assert_eq!(KeyFilter::<str>::classify(&by_ref, "x").unwrap().key, "x");
    }
}
