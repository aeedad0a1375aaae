//! An owned string collection that mirrors itself into an array of
//! pointers to NUL-terminated C strings, the calling convention of C
//! libraries that take a list of names together with a count.
//!
//! The collection owns the string data; the pointer array is derived
//! state regenerated after every mutation. See [`CStringCollection`] for
//! the validity rules of the pointers it hands out.

mod collection;

pub use collection::{
    CStringCollection,
    CollectionError,
    CollectionResult,
    Iter
};
