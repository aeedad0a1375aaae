use std::{
    ffi::{
        CStr,
        CString
    },
    os::raw::c_char
};
use custom_error::custom_error;

custom_error!{pub CollectionError
    InteriorNul {source: std::ffi::NulError} =
        "failed to create C-like nul-terminated string (interior nul byte): {source}"
}

pub type CollectionResult<T> = Result<T, CollectionError>;

/// A collection of strings that carries an array of pointers to the
/// NUL-terminated C strings for easy interaction with C libraries taking
/// `array-of-string-pointers + count` arguments.
///
/// The pointer array is regenerated from the owned strings after every
/// mutation, so it always agrees with the current contents. Pointers
/// handed out by [`pointers`](CStringCollection::pointers) or
/// [`as_ptr`](CStringCollection::as_ptr) stay valid only until the next
/// mutating call or the destruction of the collection. Moving the
/// collection itself does not relocate the string buffers, so it does not
/// invalidate the pointer array.
#[derive(Default)]
pub struct CStringCollection {
    // pointers in `pointers` point to memory owned by `strings`
    strings: Vec<CString>,
    pointers: Vec<*const c_char>
}

impl CStringCollection {
    pub fn new() -> Self {
        Self {
            strings: Vec::new(),
            pointers: Vec::new()
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            strings: Vec::with_capacity(capacity),
            pointers: Vec::with_capacity(capacity)
        }
    }

    /// Creates a collection holding a single string.
    pub fn from_string<S: Into<Vec<u8>>>(string: S) -> CollectionResult<Self> {
        let c_string = CString::new(string)?;
        Ok(Self::from_c_strings(vec![c_string]))
    }

    /// Creates a collection from owned strings, preserving their order.
    /// The string buffers are moved in, not copied.
    pub fn from_vec(strings: Vec<String>) -> CollectionResult<Self> {
        let mut c_strings = Vec::with_capacity(strings.len());
        for string in strings {
            c_strings.push(CString::new(string)?);
        }

        Ok(Self::from_c_strings(c_strings))
    }

    /// Creates a collection by copying borrowed strings, preserving their
    /// order.
    pub fn from_slice<S: AsRef<str>>(strings: &[S]) -> CollectionResult<Self> {
        let mut c_strings = Vec::with_capacity(strings.len());
        for string in strings {
            c_strings.push(CString::new(string.as_ref())?);
        }

        Ok(Self::from_c_strings(c_strings))
    }

    fn from_c_strings(strings: Vec<CString>) -> Self {
        let mut collection = Self {
            strings,
            pointers: Vec::new()
        };
        collection.rebuild_pointers();

        collection
    }

    /// Appends one string to the end of the collection. Accepts either a
    /// borrowed string (copied) or an owned one (its buffer is moved in).
    ///
    /// On error the collection is left unchanged.
    pub fn push<S: Into<Vec<u8>>>(&mut self, string: S) -> CollectionResult<()> {
        let c_string = CString::new(string)?;
        self.strings.push(c_string);
        self.rebuild_pointers();

        Ok(())
    }

    /// Removes all strings. Pointers previously obtained from this
    /// collection are invalid after this call.
    pub fn clear(&mut self) {
        self.strings.clear();
        self.rebuild_pointers();
    }

    // Regenerates the whole pointer array from the current string
    // buffers. Must run after every mutation of `strings`.
    fn rebuild_pointers(&mut self) {
        let mut pointers = Vec::with_capacity(self.strings.len());
        for string in &self.strings {
            pointers.push(string.as_ptr());
        }

        self.pointers = pointers;
        log::trace!("rebuilt {} C string pointers", self.pointers.len());
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn strings(&self) -> &[CString] {
        &self.strings
    }

    /// Gets the array of pointers to NUL-terminated C strings, one per
    /// string in the collection, in order.
    ///
    /// The pointers are valid only until the next mutating call on this
    /// collection or its destruction. The array may be replaced by a
    /// mutation, so callers should request it again when needed rather
    /// than caching it.
    pub fn pointers(&self) -> &[*const c_char] {
        self.pointers.as_slice()
    }

    /// Gets the base pointer of the pointer array, for passing to a C
    /// routine together with [`len`](CStringCollection::len). Same
    /// validity rules as [`pointers`](CStringCollection::pointers).
    pub fn as_ptr(&self) -> *const *const c_char {
        self.pointers.as_ptr()
    }

    pub fn iter(&self) -> Iter {
        Iter {
            inner: self.strings.iter()
        }
    }
}

impl Clone for CStringCollection {
    fn clone(&self) -> Self {
        // the clone gets pointers into its own freshly copied strings,
        // never the source's
        let mut cloned = Self {
            strings: self.strings.clone(),
            pointers: Vec::new()
        };
        cloned.rebuild_pointers();

        cloned
    }
}

impl std::ops::Index<usize> for CStringCollection {
    type Output = CStr;

    fn index(&self, index: usize) -> &CStr {
        self.strings[index].as_c_str()
    }
}

pub struct Iter<'a> {
    inner: std::slice::Iter<'a, CString>
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a CStr;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|string| string.as_c_str())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a CStringCollection {
    type Item = &'a CStr;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Creates a [`CStringCollection`] from a list of string literals or
/// expressions, like `vec!`.
#[macro_export]
macro_rules! c_string_collection {
    [] => {
        $crate::CStringCollection::from_slice::<&str>(&[])
    };
    [$($string:expr),+ $(,)?] => {
        $crate::CStringCollection::from_slice(&[$($string),+])
    };
}
