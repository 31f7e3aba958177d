//! In-place 4-channel byte reordering.
//!
//! Canonicalizes decoded pixels to RGBA order before mip generation.
//! Validation always completes before the first byte is written.

use crate::ValidationError;

/// Bytes in one pixel group.
const GROUP: usize = 4;

/// A validated channel permutation.
///
/// Entry `matrix[source] = dest`: the byte in channel `source` of each
/// pixel moves to channel `dest`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelMatrix([u8; 4]);

impl ChannelMatrix {
    /// Leaves every channel where it is.
    pub const IDENTITY: Self = Self([0, 1, 2, 3]);
    /// Swaps blue and red. Applying it twice restores the input.
    pub const BGRA_TO_RGBA: Self = Self([2, 1, 0, 3]);
    /// Moves a leading alpha byte to the end.
    pub const ARGB_TO_RGBA: Self = Self([3, 0, 1, 2]);
    /// Moves a trailing alpha byte to the front.
    pub const RGBA_TO_ARGB: Self = Self([1, 2, 3, 0]);
    /// Reverses all four channels.
    pub const ABGR_TO_RGBA: Self = Self([3, 2, 1, 0]);

    /// Validate a permutation of `0..4`.
    pub fn new(matrix: [u8; 4]) -> Result<Self, ValidationError> {
        check_matrix(&matrix)?;
        Ok(Self(matrix))
    }

    /// The raw `source → dest` entries.
    #[inline]
    pub const fn as_array(&self) -> [u8; 4] {
        self.0
    }

    /// Whether applying this matrix is a no-op.
    #[inline]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// The permutation that undoes this one.
    pub fn inverse(&self) -> Self {
        let mut inv = [0u8; 4];
        for (source, &dest) in self.0.iter().enumerate() {
            inv[dest as usize] = source as u8;
        }
        Self(inv)
    }

    /// Apply to a packed 4-byte-per-pixel buffer in place.
    pub fn apply(&self, data: &mut [u8]) -> Result<(), ValidationError> {
        check_buffer(data.len())?;
        permute(data, self.0);
        Ok(())
    }
}

impl Default for ChannelMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<&[u8]> for ChannelMatrix {
    type Error = ValidationError;

    fn try_from(matrix: &[u8]) -> Result<Self, ValidationError> {
        let matrix: [u8; 4] = matrix
            .try_into()
            .map_err(|_| ValidationError::MatrixLength { len: matrix.len() })?;
        Self::new(matrix)
    }
}

/// Reorder the channels of every 4-byte pixel in `data`.
///
/// `matrix[source] = dest` for each of the four channels. Fails without
/// touching `data` if the buffer is empty or not a multiple of 4 bytes,
/// or if `matrix` is not a permutation of `{0, 1, 2, 3}`.
///
/// # Example
///
/// ```
/// let mut pixels = vec![1, 2, 3, 4, 5, 6, 7, 8];
/// mipchain::swap_channels(&mut pixels, &[2, 1, 0, 3]).unwrap();
/// assert_eq!(pixels, [3, 2, 1, 4, 7, 6, 5, 8]);
/// ```
pub fn swap_channels(data: &mut [u8], matrix: &[u8]) -> Result<(), ValidationError> {
    check_buffer(data.len())?;
    let matrix = ChannelMatrix::try_from(matrix)?;
    permute(data, matrix.0);
    log::trace!(
        "swapped channels of {} pixels with {:?}",
        data.len() / GROUP,
        matrix.0
    );
    Ok(())
}

#[inline]
fn check_buffer(len: usize) -> Result<(), ValidationError> {
    if len == 0 {
        return Err(ValidationError::EmptyBuffer);
    }
    if !len.is_multiple_of(GROUP) {
        return Err(ValidationError::NotPixelAligned { len });
    }
    Ok(())
}

#[inline]
fn check_matrix(matrix: &[u8; 4]) -> Result<(), ValidationError> {
    let mut seen = [false; 4];
    for &dest in matrix {
        match seen.get_mut(dest as usize) {
            Some(slot) if !*slot => *slot = true,
            _ => return Err(ValidationError::NotAPermutation { matrix: *matrix }),
        }
    }
    Ok(())
}

/// All four source bytes are read before any is written, so the
/// permutation is safe on a single buffer.
fn permute(data: &mut [u8], matrix: [u8; 4]) {
    if matrix == ChannelMatrix::IDENTITY.0 {
        return;
    }
    for px in data.chunks_exact_mut(GROUP) {
        let src = [px[0], px[1], px[2], px[3]];
        for (source, &dest) in matrix.iter().enumerate() {
            px[dest as usize] = src[source];
        }
    }
}
