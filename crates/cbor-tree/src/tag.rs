//! Tag helpers.

use core::fmt;

/// Tag number
pub type Num = u64;

/// Tag number and content.
///
/// Tags are kept structural: the decoder never reinterprets the content based
/// on the tag number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag<T> {
    num: Num,
    content: T,
}

impl<T> Tag<T> {
    /// Construct a new tag.
    #[inline]
    #[must_use]
    pub const fn new(num: Num, content: T) -> Self {
        Self { num, content }
    }

    /// Return the tag content.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &T {
        &self.content
    }

    /// Return a mutable reference to the tag content.
    #[inline]
    pub fn content_mut(&mut self) -> &mut T {
        &mut self.content
    }

    /// Return the tag number.
    #[inline]
    #[must_use]
    pub fn num(&self) -> Num {
        self.num
    }

    /// Consumes the tag and returns the tag number and content.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (Num, T) {
        (self.num, self.content)
    }

    /// Maps the content while keeping the tag number.
    #[inline]
    pub fn map<U, F>(self, f: F) -> Tag<U>
    where
        F: FnOnce(T) -> U,
    {
        Tag {
            num: self.num,
            content: f(self.content),
        }
    }
}

impl<T> fmt::Display for Tag<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.num, self.content)
    }
}
