//! Optional-chain combinator for walking possibly-absent graph paths.
//!
//! A [`Maybe`] carries zero or more values through a pipeline of
//! transformations. The empty state is "nothing": every operation on it is a
//! no-op, so a chain like "entity → image → thumbnail → download URL" reads as
//! one expression and simply yields `None` when any link is missing.
//!
//! ```
//! use graphline_rdf::Maybe;
//!
//! let first_even_square = Maybe::of(vec![1, 3, 4, 6])
//!     .flat_map(|v| v)
//!     .filter(|n| n % 2 == 0)
//!     .map(|n| n * n)
//!     .first();
//! assert_eq!(first_even_square, Some(16));
//! ```

/// Zero-or-more values flowing through a chain of transformations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maybe<T> {
    values: Vec<T>,
}

impl<T> Maybe<T> {
    /// Wrap a single value
    pub fn of(value: T) -> Self {
        Self {
            values: vec![value],
        }
    }

    /// Wrap a value that may be absent
    pub fn from_option(value: Option<T>) -> Self {
        Self {
            values: value.into_iter().collect(),
        }
    }

    /// The empty chain
    pub fn nothing() -> Self {
        Self { values: Vec::new() }
    }

    /// True when no value is left in the chain
    pub fn is_none(&self) -> bool {
        self.values.is_empty()
    }

    /// Apply `f` to every contained value
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Maybe<U> {
        Maybe {
            values: self.values.into_iter().map(f).collect(),
        }
    }

    /// Apply `f` to every contained value and flatten the produced sequences
    pub fn flat_map<U, I>(self, f: impl FnMut(T) -> I) -> Maybe<U>
    where
        I: IntoIterator<Item = U>,
    {
        Maybe {
            values: self.values.into_iter().flat_map(f).collect(),
        }
    }

    /// Keep only values for which `pred` holds
    pub fn filter(mut self, mut pred: impl FnMut(&T) -> bool) -> Self {
        self.values.retain(|v| pred(v));
        self
    }

    /// Keep values `f` maps to `Some`, unwrapped
    pub fn filter_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Maybe<U> {
        Maybe {
            values: self.values.into_iter().filter_map(f).collect(),
        }
    }

    /// Replace an empty chain with the values produced by `f`.
    ///
    /// `f` is only evaluated when the chain is empty.
    pub fn or_else<I>(self, f: impl FnOnce() -> I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        if self.values.is_empty() {
            Self {
                values: f().into_iter().collect(),
            }
        } else {
            self
        }
    }

    /// First contained value, if any
    pub fn first(self) -> Option<T> {
        self.values.into_iter().next()
    }

    /// All contained values (empty when nothing)
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T> Default for Maybe<T> {
    fn default() -> Self {
        Self::nothing()
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    fn from(value: Option<T>) -> Self {
        Self::from_option(value)
    }
}

impl<T> FromIterator<T> for Maybe<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl<T> IntoIterator for Maybe<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
