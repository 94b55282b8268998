//! PNG scanline filtering.
//!
//! PNG uses filtering to improve compression by exploiting correlations
//! between adjacent pixels. Each filtered row is prefixed with a filter type
//! byte; decoding reverses the filter against the previously reconstructed
//! row (an all-zero row above the first one).

use crate::error::{Error, Result};

/// Filter type bytes as defined by the PNG specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FilterType {
    /// Raw bytes.
    None = 0,
    /// Difference from the byte one pixel to the left.
    Sub = 1,
    /// Difference from the byte above.
    Up = 2,
    /// Difference from the mean of left and above.
    Average = 3,
    /// Difference from the Paeth predictor.
    Paeth = 4,
}

impl FilterType {
    /// All filter types in wire order.
    pub const ALL: [FilterType; 5] = [
        FilterType::None,
        FilterType::Sub,
        FilterType::Up,
        FilterType::Average,
        FilterType::Paeth,
    ];
}

impl TryFrom<u8> for FilterType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(FilterType::None),
            1 => Ok(FilterType::Sub),
            2 => Ok(FilterType::Up),
            3 => Ok(FilterType::Average),
            4 => Ok(FilterType::Paeth),
            other => Err(Error::UnsupportedFilter(other)),
        }
    }
}

/// Paeth predictor function.
///
/// Selects the value (a, b, or c) closest to p = a + b - c, preferring
/// `a`, then `b`, then `c` on ties.
#[inline]
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let a_i = a as i16;
    let b_i = b as i16;
    let c_i = c as i16;

    let p = a_i + b_i - c_i;
    let pa = (p - a_i).abs();
    let pb = (p - b_i).abs();
    let pc = (p - c_i).abs();

    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}

/// Filter one row, appending the filter type byte and filtered bytes.
///
/// `prev_row` is the unfiltered row above (all zeros for the first row).
pub fn filter_row(
    filter: FilterType,
    row: &[u8],
    prev_row: &[u8],
    bpp: usize,
    output: &mut Vec<u8>,
) {
    output.reserve(row.len() + 1);
    output.push(filter as u8);
    match filter {
        FilterType::None => output.extend_from_slice(row),
        FilterType::Sub => {
            for (i, &byte) in row.iter().enumerate() {
                let left = if i >= bpp { row[i - bpp] } else { 0 };
                output.push(byte.wrapping_sub(left));
            }
        }
        FilterType::Up => {
            for (i, &byte) in row.iter().enumerate() {
                output.push(byte.wrapping_sub(prev_row[i]));
            }
        }
        FilterType::Average => {
            for (i, &byte) in row.iter().enumerate() {
                let left = if i >= bpp { row[i - bpp] as u16 } else { 0 };
                let above = prev_row[i] as u16;
                output.push(byte.wrapping_sub(((left + above) / 2) as u8));
            }
        }
        FilterType::Paeth => {
            for (i, &byte) in row.iter().enumerate() {
                let left = if i >= bpp { row[i - bpp] } else { 0 };
                let above = prev_row[i];
                let upper_left = if i >= bpp { prev_row[i - bpp] } else { 0 };
                output.push(byte.wrapping_sub(paeth_predictor(left, above, upper_left)));
            }
        }
    }
}

/// Build the pre-compression stream for an image: every row prefixed with
/// filter type None.
pub fn apply_filters(data: &[u8], row_bytes: usize) -> Vec<u8> {
    if row_bytes == 0 {
        return Vec::new();
    }
    let height = data.len() / row_bytes;
    let mut output = Vec::with_capacity((row_bytes + 1) * height);
    for row in data.chunks_exact(row_bytes) {
        output.push(FilterType::None as u8);
        output.extend_from_slice(row);
    }
    output
}

/// Reverse `filter` on `raw` into `out`, given the reconstructed row above.
///
/// `raw`, `prev` and `out` must have the same length.
pub fn reverse(filter: FilterType, raw: &[u8], prev: &[u8], bpp: usize, out: &mut [u8]) {
    debug_assert_eq!(raw.len(), out.len());
    debug_assert_eq!(prev.len(), out.len());
    match filter {
        FilterType::None => out.copy_from_slice(raw),
        FilterType::Sub => {
            for i in 0..raw.len() {
                let left = if i >= bpp { out[i - bpp] } else { 0 };
                out[i] = raw[i].wrapping_add(left);
            }
        }
        FilterType::Up => {
            for i in 0..raw.len() {
                out[i] = raw[i].wrapping_add(prev[i]);
            }
        }
        FilterType::Average => {
            for i in 0..raw.len() {
                let left = if i >= bpp { out[i - bpp] } else { 0 };
                let up = prev[i];
                out[i] = raw[i].wrapping_add(((left as u16 + up as u16) / 2) as u8);
            }
        }
        FilterType::Paeth => {
            for i in 0..raw.len() {
                let left = if i >= bpp { out[i - bpp] } else { 0 };
                let up = prev[i];
                let up_left = if i >= bpp { prev[i - bpp] } else { 0 };
                out[i] = raw[i].wrapping_add(paeth_predictor(left, up, up_left));
            }
        }
    }
}

/// Row-at-a-time scanline reconstruction with two reusable row buffers.
pub struct Unfilter {
    bpp: usize,
    current: Vec<u8>,
    previous: Vec<u8>,
}

impl Unfilter {
    /// Create a reconstructor for rows of `row_bytes` bytes.
    pub fn new(row_bytes: usize, bpp: usize) -> Self {
        Self {
            bpp,
            current: vec![0; row_bytes],
            previous: vec![0; row_bytes],
        }
    }

    /// Reconstruct one filtered scanline (filter byte followed by row bytes).
    ///
    /// Returns the reconstructed row, which stays valid until the next call.
    pub fn next_row(&mut self, scanline: &[u8]) -> Result<&[u8]> {
        let (&filter_byte, raw) = scanline.split_first().ok_or(Error::TruncatedStream {
            expected: self.current.len() + 1,
            actual: 0,
        })?;
        if raw.len() != self.current.len() {
            return Err(Error::TruncatedStream {
                expected: self.current.len() + 1,
                actual: scanline.len(),
            });
        }
        let filter = FilterType::try_from(filter_byte)?;

        std::mem::swap(&mut self.current, &mut self.previous);
        reverse(filter, raw, &self.previous, self.bpp, &mut self.current);
        Ok(&self.current)
    }
}

/// Reverse every scanline in `data`, returning `height` rows of `row_bytes`.
///
/// `data` must hold at least `height * (row_bytes + 1)` bytes.
pub fn unfilter_scanlines(
    data: &[u8],
    row_bytes: usize,
    height: usize,
    bpp: usize,
) -> Result<Vec<u8>> {
    let stride = row_bytes
        .checked_add(1)
        .ok_or_else(|| Error::MalformedStream("scanline size overflow".into()))?;
    let needed = stride
        .checked_mul(height)
        .ok_or_else(|| Error::MalformedStream("scanline size overflow".into()))?;
    if data.len() < needed {
        return Err(Error::TruncatedStream {
            expected: needed,
            actual: data.len(),
        });
    }

    let mut unfilter = Unfilter::new(row_bytes, bpp);
    let mut out = Vec::with_capacity(row_bytes * height);
    for scanline in data[..needed].chunks_exact(stride) {
        out.extend_from_slice(unfilter.next_row(scanline)?);
    }
    Ok(out)
}
