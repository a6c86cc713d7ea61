//! Bit sequences and the packing helpers that build them from raw input.
//!
//! The engine only ever sees a [`BitSequence`]. Turning bytes or ASCII text
//! into one happens here, without touching the filesystem.

use crate::error::{Error, Result};

/// Ordered sequence of bits, one `u8` per bit, every element 0 or 1.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BitSequence {
    bits: Vec<u8>,
}

impl BitSequence {
    /// Wrap a vector of 0/1 values, rejecting anything else.
    pub fn from_bits(bits: Vec<u8>) -> Result<Self> {
        if let Some(position) = bits.iter().position(|&b| b > 1) {
            return Err(Error::InvalidSymbol {
                position,
                symbol: char::from(bits[position]),
            });
        }
        Ok(Self { bits })
    }

    /// Unpack bytes into bits, MSB first per byte.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(data.len() * 8);
        for &byte in data {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1);
            }
        }
        Self { bits }
    }

    /// Parse ASCII `'0'`/`'1'` text. Whitespace is ignored so wrapped files parse.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut bits = Vec::with_capacity(text.len());
        for (position, symbol) in text.chars().enumerate() {
            match symbol {
                '0' => bits.push(0),
                '1' => bits.push(1),
                c if c.is_whitespace() => {}
                c => return Err(Error::InvalidSymbol { position, symbol: c }),
            }
        }
        Ok(Self { bits })
    }

    /// Render back to `'0'`/`'1'` text.
    pub fn to_ascii(&self) -> String {
        self.bits
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bits
    }

    /// Number of ones.
    pub fn count_ones(&self) -> usize {
        count_ones(&self.bits)
    }
}

impl AsRef<[u8]> for BitSequence {
    fn as_ref(&self) -> &[u8] {
        &self.bits
    }
}

pub(crate) fn count_ones(bits: &[u8]) -> usize {
    bits.iter().map(|&b| b as usize).sum()
}

/// Pack `width` bits (MSB first) into an integer pattern index.
#[inline]
pub(crate) fn pattern_at(bits: &[u8]) -> usize {
    bits.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize)
}

/// Ordered collection of equally sized samples carved from one buffer.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    sample_len: usize,
    samples: Vec<BitSequence>,
}

impl SampleSet {
    /// Carve `⌊bytes·8 / sample_len⌋` consecutive samples out of a binary buffer.
    ///
    /// `sample_len` must be a whole number of bytes. Trailing bytes that do not
    /// fill a complete sample are dropped.
    pub fn from_bytes(data: &[u8], sample_len: usize) -> Result<Self> {
        if sample_len == 0 || sample_len % 8 != 0 {
            return Err(Error::configuration(
                "sample set",
                format!("sample length {sample_len} is not a positive multiple of 8"),
            ));
        }
        let bytes_per_sample = sample_len / 8;
        let samples = data
            .chunks_exact(bytes_per_sample)
            .map(BitSequence::from_bytes)
            .collect();
        Ok(Self {
            sample_len,
            samples,
        })
    }

    /// Carve samples out of `'0'`/`'1'` text.
    pub fn from_ascii(text: &str, sample_len: usize) -> Result<Self> {
        if sample_len == 0 {
            return Err(Error::configuration("sample set", "sample length is zero"));
        }
        let all = BitSequence::from_ascii(text)?;
        let samples = all
            .bits
            .chunks_exact(sample_len)
            .map(|chunk| BitSequence {
                bits: chunk.to_vec(),
            })
            .collect();
        Ok(Self {
            sample_len,
            samples,
        })
    }

    pub fn sample_len(&self) -> usize {
        self.sample_len
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BitSequence> {
        self.samples.iter()
    }

    pub fn as_slice(&self) -> &[BitSequence] {
        &self.samples
    }
}

impl From<Vec<BitSequence>> for SampleSet {
    fn from(samples: Vec<BitSequence>) -> Self {
        let sample_len = samples.first().map_or(0, BitSequence::len);
        Self {
            sample_len,
            samples,
        }
    }
}
