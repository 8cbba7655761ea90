//! Public trait seams: register-level plumbing and slice-level functions.

/// Load/store plumbing shared by the wrapper vector types.
///
/// A vector carries a `size` alongside its register so slices whose length is
/// not a multiple of the lane count can round-trip through masked partial
/// loads and stores without touching memory beyond the valid range.
pub trait SimdVec<T> {
    fn is_aligned(ptr: *const T) -> bool;

    /// Loads exactly `LANE_COUNT` elements.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and point to at least `LANE_COUNT` valid values.
    unsafe fn load(ptr: *const T, size: usize) -> Self;

    /// Loads `LANE_COUNT` elements from an aligned address.
    ///
    /// # Safety
    ///
    /// `ptr` must satisfy the register alignment of the implementing type.
    unsafe fn load_aligned(ptr: *const T) -> Self;

    /// Loads `LANE_COUNT` elements without an alignment requirement.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and point to at least `LANE_COUNT` valid values.
    unsafe fn load_unaligned(ptr: *const T) -> Self;

    /// Loads `size < LANE_COUNT` elements; remaining lanes are zeroed or
    /// undefined depending on the architecture's masked-load semantics.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and point to at least `size` valid values.
    unsafe fn load_partial(ptr: *const T, size: usize) -> Self;

    /// Stores all `LANE_COUNT` lanes at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and have room for `LANE_COUNT` values.
    unsafe fn store_at(&self, ptr: *mut T);

    /// Stores only the `size` valid lanes at `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be non-null and have room for `size` values.
    unsafe fn store_at_partial(&self, ptr: *mut T);

    fn to_vec(self) -> Vec<T>;
}

/// Element-wise cosine over a slice.
pub trait SimdCos<Rhs = Self> {
    type Output;

    fn simd_cos(self) -> Self::Output;
    fn par_simd_cos(self) -> Self::Output;
    fn scalar_cos(self) -> Self::Output;
}

/// Element-wise sine over a slice.
pub trait SimdSin<Rhs = Self> {
    type Output;

    fn simd_sin(self) -> Self::Output;
    fn par_simd_sin(self) -> Self::Output;
    fn scalar_sin(self) -> Self::Output;
}

/// Element-wise arctangent over a slice. Implemented for `&[f32]` and
/// `&[f64]`.
pub trait SimdAtan<Rhs = Self> {
    type Output;

    fn simd_atan(self) -> Self::Output;
    fn par_simd_atan(self) -> Self::Output;
    fn scalar_atan(self) -> Self::Output;
}
