use core::{
    cmp,
    ops::{Bound, RangeBounds},
};

use crate::Storage;

// INVARIANT: 0 <= reserved <= storage.len()
#[derive(Debug)]
pub struct ReserveBuf<S: Storage + ?Sized> {
    reserved: usize,
    storage: S,
}

impl<S: Storage> ReserveBuf<S> {
    pub const fn new(storage: S) -> Self {
        ReserveBuf { reserved: 0, storage }
    }

    pub fn try_add_reservation(mut self, size: usize) -> Result<Self, Self> {
        if self.try_reserve(size) {
            Ok(self)
        } else {
            Err(self)
        }
    }

    pub fn add_reservation(mut self, size: usize) -> Self {
        self.reserve(size);
        self
    }

    pub fn build(self) -> Buf<S> {
        Buf {
            head: self.reserved,
            tail: self.reserved,
            storage: self.storage,
        }
    }
}

impl<S: Storage + ?Sized> ReserveBuf<S> {
    pub const fn reserved(&self) -> usize {
        self.reserved
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn reserve(&mut self, size: usize) {
        assert!(
            self.try_reserve(size),
            "reservation failed: size ({size}) must not exceeds len - reserved ({} - {})",
            self.storage.len(),
            self.reserved
        );
    }

    pub fn try_reserve(&mut self, size: usize) -> bool {
        if size <= self.storage.len() - self.reserved {
            self.reserved += size;
            true
        } else {
            false
        }
    }
}

/// A packet buffer: the bytes `head..tail` of `storage` form the message.
///
/// The start of the window doubles as the read cursor of the layer that
/// currently owns the buffer. Bytes before `head` are headroom for headers of
/// lower layers, bytes after `tail` are room for growing the message.
///
/// Dropping a `Buf` releases its storage.
// INVARIANT: 0 <= head <= tail <= storage.len()
#[derive(Debug)]
pub struct Buf<S: Storage + ?Sized> {
    head: usize,
    tail: usize,
    storage: S,
}

impl<S: Storage> Buf<S> {
    pub const fn builder(storage: S) -> ReserveBuf<S> {
        ReserveBuf { reserved: 0, storage }
    }

    pub const fn new(storage: S) -> Self {
        Buf { head: 0, tail: 0, storage }
    }

    pub fn full(storage: S) -> Self {
        Buf {
            head: 0,
            tail: storage.len(),
            storage,
        }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: Storage + ?Sized> Buf<S> {
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn len(&self) -> usize {
        self.tail - self.head
    }

    pub const fn is_empty(&self) -> bool {
        self.tail == self.head
    }

    pub const fn head_len(&self) -> usize {
        self.head
    }

    pub fn tail_len(&self) -> usize {
        self.storage.len() - self.tail
    }

    pub fn head(&self) -> &[u8] {
        &self.storage[..self.head]
    }

    pub fn data(&self) -> &[u8] {
        &self.storage[self.head..self.tail]
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.storage[self.head..self.tail]
    }

    pub fn tail(&self) -> &[u8] {
        &self.storage[self.tail..]
    }
}

impl<S: Storage + ?Sized> AsRef<[u8]> for Buf<S> {
    fn as_ref(&self) -> &[u8] {
        self.data()
    }
}

impl<S: Storage + ?Sized> AsMut<[u8]> for Buf<S> {
    fn as_mut(&mut self) -> &mut [u8] {
        self.data_mut()
    }
}

impl<S: Storage + ?Sized> Buf<S> {
    pub fn append(&mut self, size: usize) -> &mut [u8] {
        assert!(
            size <= self.tail_len(),
            "appending failed: size ({size}) must not exceeds tail_len ({})",
            self.tail_len(),
        );
        let start = self.tail;
        self.tail += size;
        &mut self.storage[start..self.tail]
    }

    pub fn append_slice(&mut self, slice: &[u8]) {
        self.append(slice.len()).copy_from_slice(slice)
    }

    pub fn try_prepend(&mut self, size: usize) -> Option<&mut [u8]> {
        (size <= self.head_len()).then(|| {
            let end = self.head;
            self.head -= size;
            &mut self.storage[self.head..end]
        })
    }

    pub fn prepend(&mut self, size: usize) -> &mut [u8] {
        let head_len = self.head_len();
        match self.try_prepend(size) {
            Some(slice) => slice,
            None => panic!(
                "prepending failed: size ({size}) must not exceeds head_len ({head_len})"
            ),
        }
    }

    pub fn prepend_slice(&mut self, slice: &[u8]) {
        self.prepend(slice.len()).copy_from_slice(slice)
    }

    /// Resize the message to `len` bytes, keeping the cursor in place.
    ///
    /// Newly exposed bytes keep whatever the storage held. Returns `false`
    /// and leaves the buffer untouched if the storage is too short.
    pub fn try_set_len(&mut self, len: usize) -> bool {
        if len <= self.storage.len() - self.head {
            self.tail = self.head + len;
            true
        } else {
            false
        }
    }

    /// Copy bytes starting at `offset` into `dst`, returning the number of
    /// bytes actually read.
    pub fn read(&self, offset: usize, dst: &mut [u8]) -> usize {
        let src = self.data().get(offset..).unwrap_or_default();
        let len = cmp::min(src.len(), dst.len());
        dst[..len].copy_from_slice(&src[..len]);
        len
    }

    /// Copy `src` into the message at `offset`, returning the number of bytes
    /// actually written. The message is never grown.
    pub fn write(&mut self, offset: usize, src: &[u8]) -> usize {
        let dst = self.data_mut().get_mut(offset..).unwrap_or_default();
        let len = cmp::min(src.len(), dst.len());
        dst[..len].copy_from_slice(&src[..len]);
        len
    }

    /// Copy at most `len` bytes from `src_offset` of this message into
    /// `dst_offset` of `dst`, returning the number of bytes copied.
    pub fn copy_to<T: Storage + ?Sized>(
        &self,
        src_offset: usize,
        dst_offset: usize,
        len: usize,
        dst: &mut Buf<T>,
    ) -> usize {
        let src = self.data().get(src_offset..).unwrap_or_default();
        let len = cmp::min(len, src.len());
        dst.write(dst_offset, &src[..len])
    }
}

impl<S: Storage + ?Sized> Buf<S> {
    fn bounds(&self, s: impl RangeBounds<usize>) -> [usize; 2] {
        [
            match s.start_bound() {
                Bound::Included(&bound) => self.head + bound,
                Bound::Excluded(&bound) => self.head + bound + 1,
                Bound::Unbounded => self.head,
            },
            match s.end_bound() {
                Bound::Included(&bound) => self.head + bound + 1,
                Bound::Excluded(&bound) => self.head + bound,
                Bound::Unbounded => self.tail,
            },
        ]
    }

    /// Narrow the message to `s`, which is relative to the current window.
    ///
    /// `slice_into(n..)` advances the read cursor by `n` bytes.
    pub fn slice_into(&mut self, s: impl RangeBounds<usize>) {
        let [head, tail] = self.bounds(s);
        assert!(
            self.head <= head && head <= tail && tail <= self.tail,
            "s must reside within the range (0..len)"
        );
        (self.head, self.tail) = (head, tail);
    }
}
