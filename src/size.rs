//! Byte-size accounting.
//!
//! The platform enforces a ceiling on the size of an action definition;
//! everything that counts against that ceiling reports its weight through
//! [`Sizeable`].

/// A value with a well-defined size in bytes.
pub trait Sizeable {
    fn size_in_bytes(&self) -> usize;
}

/// Sum of the sizes of a slice of sizeable values. Empty slice weighs zero.
pub fn total_size<T: Sizeable>(items: &[T]) -> usize {
    items.iter().map(Sizeable::size_in_bytes).sum()
}

impl Sizeable for String {
    fn size_in_bytes(&self) -> usize {
        self.len()
    }
}
