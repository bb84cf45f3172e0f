// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Binary periodic-term table of the lunar theory (Meeus tables 47.A/B).
//!
//! ## Layout (little-endian)
//!
//! ```text
//! header   u32 magic = 0x7ab45000, u8 series_count
//! series   u16 term_count, then term_count records
//! record   i8 D, i8 M, i8 M', i8 F, i32 coefficient
//! ```
//!
//! | Series | Content | Trigonometric function | Unit |
//! |--------|---------|------------------------|------|
//! | [`Series::Longitude`] | Σl | sin | 1e-6 degree |
//! | [`Series::Distance`]  | Σr | cos | 1e-3 km |
//! | [`Series::Latitude`]  | Σb | sin | 1e-6 degree |
//!
//! Decoding is a single bounds-checked pass; any deviation from the layout
//! is a [`ResourceError`].

use crate::error::ResourceError;

/// Identifies the table format.
pub const TABLE_MAGIC: u32 = 0x7ab4_5000;

/// The table shipped with the crate.
pub static LUNAR_TERMS: &[u8] = include_bytes!("../data/lunar_terms.bin");

const RECORD_SIZE: usize = 8;

/// One row: argument multipliers of D, M, M′, F and the scaled coefficient.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PeriodicTerm {
    pub d: i8,
    pub m: i8,
    pub m_prime: i8,
    pub f: i8,
    pub coefficient: i32,
}

impl PeriodicTerm {
    pub const fn new(d: i8, m: i8, m_prime: i8, f: i8, coefficient: i32) -> Self {
        Self {
            d,
            m,
            m_prime,
            f,
            coefficient,
        }
    }

    /// `D·d + M·m + M′·m′ + F·f`, in degrees.
    #[inline]
    pub fn argument(&self, d: f64, m: f64, m_prime: f64, f: f64) -> f64 {
        self.d as f64 * d + self.m as f64 * m + self.m_prime as f64 * m_prime + self.f as f64 * f
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Series {
    Longitude = 0,
    Distance = 1,
    Latitude = 2,
}

impl Series {
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Decoded, immutable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicTermTable {
    series: Vec<Vec<PeriodicTerm>>,
}

impl PeriodicTermTable {
    pub fn from_series(series: Vec<Vec<PeriodicTerm>>) -> Self {
        Self { series }
    }

    /// Decodes the table shipped with the crate.
    pub fn load() -> Result<Self, ResourceError> {
        Self::decode(LUNAR_TERMS)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ResourceError> {
        let mut reader = Reader::new(bytes);

        let magic = reader.u32()?;
        if magic != TABLE_MAGIC {
            return Err(ResourceError::BadMagic {
                found: magic,
                expected: TABLE_MAGIC,
            });
        }

        let series_count = reader.u8()?;
        let mut series = Vec::with_capacity(series_count as usize);
        for _ in 0..series_count {
            let term_count = reader.u16()? as usize;
            reader.ensure(term_count * RECORD_SIZE)?;
            let mut terms = Vec::with_capacity(term_count);
            for _ in 0..term_count {
                terms.push(PeriodicTerm {
                    d: reader.i8()?,
                    m: reader.i8()?,
                    m_prime: reader.i8()?,
                    f: reader.i8()?,
                    coefficient: reader.i32()?,
                });
            }
            series.push(terms);
        }

        match reader.remaining() {
            0 => Ok(Self { series }),
            extra => Err(ResourceError::TrailingBytes(extra)),
        }
    }

    /// Inverse of [`decode`](Self::decode).
    pub fn encode(&self) -> Vec<u8> {
        let terms: usize = self.series.iter().map(Vec::len).sum();
        let mut out = Vec::with_capacity(5 + 2 * self.series.len() + terms * RECORD_SIZE);
        out.extend_from_slice(&TABLE_MAGIC.to_le_bytes());
        out.push(self.series.len() as u8);
        for series in &self.series {
            out.extend_from_slice(&(series.len() as u16).to_le_bytes());
            for term in series {
                out.extend_from_slice(&[term.d as u8, term.m as u8, term.m_prime as u8, term.f as u8]);
                out.extend_from_slice(&term.coefficient.to_le_bytes());
            }
        }
        out
    }

    #[inline]
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    pub fn series(&self, series: Series) -> Result<&[PeriodicTerm], ResourceError> {
        self.series
            .get(series.index())
            .map(Vec::as_slice)
            .ok_or(ResourceError::SeriesOutOfRange {
                requested: series.index(),
                available: self.series.len(),
            })
    }
}

/// Forward-only little-endian reader over a byte slice.
struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.offset
    }

    fn ensure(&self, needed: usize) -> Result<(), ResourceError> {
        if needed > self.remaining() {
            return Err(ResourceError::Truncated {
                offset: self.offset,
                needed: needed - self.remaining(),
            });
        }
        Ok(())
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], ResourceError> {
        self.ensure(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.bytes[self.offset..self.offset + N]);
        self.offset += N;
        Ok(out)
    }

    fn u8(&mut self) -> Result<u8, ResourceError> {
        Ok(self.take::<1>()?[0])
    }

    fn i8(&mut self) -> Result<i8, ResourceError> {
        Ok(i8::from_le_bytes(self.take()?))
    }

    fn u16(&mut self) -> Result<u16, ResourceError> {
        Ok(u16::from_le_bytes(self.take()?))
    }

    fn u32(&mut self) -> Result<u32, ResourceError> {
        Ok(u32::from_le_bytes(self.take()?))
    }

    fn i32(&mut self) -> Result<i32, ResourceError> {
        Ok(i32::from_le_bytes(self.take()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_table_decodes() {
        let table = PeriodicTermTable::load().unwrap();
        assert_eq!(table.series_count(), 3);

        let longitude = table.series(Series::Longitude).unwrap();
        let distance = table.series(Series::Distance).unwrap();
        let latitude = table.series(Series::Latitude).unwrap();
        assert_eq!((longitude.len(), distance.len(), latitude.len()), (59, 46, 60));

        assert_eq!(longitude[0], PeriodicTerm::new(0, 0, 1, 0, 6_288_774));
        assert_eq!(distance[0], PeriodicTerm::new(0, 0, 1, 0, -20_905_355));
        assert_eq!(latitude[0], PeriodicTerm::new(0, 0, 0, 1, 5_128_122));
    }

    #[test]
    fn multipliers_are_small() {
        let table = PeriodicTermTable::load().unwrap();
        for series in [Series::Longitude, Series::Distance, Series::Latitude] {
            for term in table.series(series).unwrap() {
                assert!(term.m.abs() <= 2, "{term:?}");
                assert!(term.d.abs() <= 4 && term.m_prime.abs() <= 4 && term.f.abs() <= 3);
                assert_ne!(term.coefficient, 0);
            }
        }
    }

    #[test]
    fn encode_reproduces_the_shipped_bytes() {
        let table = PeriodicTermTable::load().unwrap();
        assert_eq!(table.encode(), LUNAR_TERMS);
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = LUNAR_TERMS.to_vec();
        bytes[0] ^= 0xff;
        assert!(matches!(
            PeriodicTermTable::decode(&bytes),
            Err(ResourceError::BadMagic { expected: TABLE_MAGIC, .. })
        ));
    }

    #[test]
    fn truncation_is_rejected() {
        for len in [0, 3, 5, 6, 20, LUNAR_TERMS.len() - 1] {
            assert!(
                matches!(
                    PeriodicTermTable::decode(&LUNAR_TERMS[..len]),
                    Err(ResourceError::Truncated { .. })
                ),
                "accepted {len} bytes"
            );
        }
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = LUNAR_TERMS.to_vec();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(
            PeriodicTermTable::decode(&bytes),
            Err(ResourceError::TrailingBytes(2))
        );
    }

    #[test]
    fn missing_series_is_reported() {
        let table = PeriodicTermTable::from_series(vec![vec![PeriodicTerm::new(1, 0, 0, 0, 10)]]);
        let decoded = PeriodicTermTable::decode(&table.encode()).unwrap();
        assert_eq!(decoded, table);
        assert_eq!(
            decoded.series(Series::Latitude),
            Err(ResourceError::SeriesOutOfRange {
                requested: 2,
                available: 1
            })
        );
    }
}
