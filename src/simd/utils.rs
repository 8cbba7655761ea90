use std::alloc::{alloc, handle_alloc_error, Layout};

/// Allocates an aligned `Vec<T>` with uninitialized contents.
///
/// The slice drivers fill every element before the vector is read, so the
/// uninitialized window never escapes this crate.
///
/// The returned `Vec` deallocates through `align_of::<T>()`, not `align`, so
/// `align` must only ever over-align. The `System` allocator (malloc-backed)
/// accepts freeing an over-aligned block at the element's natural alignment;
/// a `#[global_allocator]` that keys deallocation on the exact layout cannot
/// be combined with this helper.
///
/// # Safety
///
/// The caller must ensure that the elements of the returned vector are
/// initialized before being read. Reading from uninitialized memory is
/// undefined behavior.
#[inline(always)]
pub fn alloc_uninit_vec<T>(len: usize, align: usize) -> Vec<T> {
    if len == 0 {
        return Vec::new();
    }

    let layout =
        Layout::from_size_align(len * std::mem::size_of::<T>(), align).expect("Invalid layout");

    let ptr = unsafe { alloc(layout) as *mut T };

    if ptr.is_null() {
        handle_alloc_error(layout);
    }

    // SAFETY: The pointer is non-null and the layout is valid for `len`
    // elements. The capacity is set to `len`, so no re-allocation will occur
    // until it's grown.
    unsafe { Vec::from_raw_parts(ptr, len, len) }
}
