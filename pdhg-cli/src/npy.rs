//! NumPy `.npy` codec.
//!
//! Reads v1/v2/v3 headers with little- or big-endian numeric dtypes
//! (`f4`, `f8`, `i1`..`i8`, `u1`..`u8`) in C order, and writes 1-D `<f8`
//! arrays in the v1.0 layout `numpy.save` produces.
//!
//! Reference: <https://numpy.org/devdocs/reference/generated/numpy.lib.format.html>

use std::io::{Read, Write};

use anyhow::{anyhow, bail, ensure, Context, Result};

const MAGIC: &[u8; 6] = b"\x93NUMPY";

/// Element type of a `.npy` payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Float,
    Int,
    UInt,
}

/// Parsed `descr` entry, e.g. `'<f8'`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dtype {
    pub kind: Kind,
    pub size: usize,
    pub big_endian: bool,
}

/// Parsed header dict.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyHeader {
    pub dtype: Dtype,
    pub fortran_order: bool,
    pub shape: Vec<usize>,
}

impl NpyHeader {
    /// Number of elements (1 for a 0-d array), or `None` if the shape
    /// overflows `usize`.
    pub fn element_count(&self) -> Option<usize> {
        self.shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
    }
}

/// Decoded array payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NpyData {
    Float(Vec<f64>),
    Int(Vec<i64>),
    UInt(Vec<u64>),
}

/// A decoded `.npy` array.
#[derive(Debug, Clone, PartialEq)]
pub struct NpyArray {
    pub shape: Vec<usize>,
    pub data: NpyData,
}

impl NpyArray {
    pub fn len(&self) -> usize {
        match &self.data {
            NpyData::Float(v) => v.len(),
            NpyData::Int(v) => v.len(),
            NpyData::UInt(v) => v.len(),
        }
    }

    /// Values as `f64`.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match &self.data {
            NpyData::Float(v) => v.clone(),
            NpyData::Int(v) => v.iter().map(|&x| x as f64).collect(),
            NpyData::UInt(v) => v.iter().map(|&x| x as f64).collect(),
        }
    }

    /// Values as non-negative indices.
    ///
    /// Float arrays are accepted when every entry is a whole number, since
    /// index arrays are often saved with a float dtype.
    pub fn to_index_vec(&self) -> Result<Vec<usize>> {
        let convert = |k: usize, ok: bool, shown: String, idx: usize| {
            if ok {
                Ok(idx)
            } else {
                Err(anyhow!("entry {} = {} is not a valid index", k, shown))
            }
        };
        match &self.data {
            NpyData::Int(v) => v
                .iter()
                .enumerate()
                .map(|(k, &x)| convert(k, x >= 0, x.to_string(), x.max(0) as usize))
                .collect(),
            NpyData::UInt(v) => v
                .iter()
                .enumerate()
                .map(|(k, &x)| convert(k, usize::try_from(x).is_ok(), x.to_string(), x as usize))
                .collect(),
            NpyData::Float(v) => v
                .iter()
                .enumerate()
                .map(|(k, &x)| {
                    let ok = x.is_finite() && x >= 0.0 && x.fract() == 0.0;
                    convert(k, ok, x.to_string(), x as usize)
                })
                .collect(),
        }
    }
}

/// Parse a dtype string such as `<f8`, `|u1` or `>i4`.
pub fn parse_dtype(descr: &str) -> Result<Dtype> {
    let mut chars = descr.chars();
    let order = chars.next().ok_or_else(|| anyhow!("empty dtype"))?;
    let big_endian = match order {
        '<' | '|' | '=' => false,
        '>' => true,
        _ => bail!("unsupported byte order in dtype '{}'", descr),
    };
    let kind = match chars.next() {
        Some('f') => Kind::Float,
        Some('i') => Kind::Int,
        Some('u') => Kind::UInt,
        _ => bail!("unsupported dtype '{}' (expected float or integer)", descr),
    };
    let size: usize = chars
        .as_str()
        .parse()
        .with_context(|| format!("bad item size in dtype '{}'", descr))?;
    let supported = match kind {
        Kind::Float => matches!(size, 4 | 8),
        Kind::Int | Kind::UInt => matches!(size, 1 | 2 | 4 | 8),
    };
    ensure!(supported, "unsupported item size in dtype '{}'", descr);
    Ok(Dtype { kind, size, big_endian })
}

/// Return the text following `'key':` in the header dict.
fn dict_value<'a>(header: &'a str, key: &str) -> Result<&'a str> {
    let single = format!("'{}':", key);
    let double = format!("\"{}\":", key);
    let start = header
        .find(&single)
        .map(|i| i + single.len())
        .or_else(|| header.find(&double).map(|i| i + double.len()))
        .ok_or_else(|| anyhow!("no '{}' key in npy header: {}", key, header))?;
    Ok(header[start..].trim_start())
}

fn parse_header_dict(header: &str) -> Result<NpyHeader> {
    let descr = dict_value(header, "descr")?;
    let quote = descr
        .chars()
        .next()
        .filter(|c| *c == '\'' || *c == '"')
        .ok_or_else(|| anyhow!("descr is not a plain dtype string: {}", header))?;
    let end = descr[1..]
        .find(quote)
        .ok_or_else(|| anyhow!("unterminated descr in npy header"))?;
    let dtype = parse_dtype(&descr[1..1 + end])?;

    let fortran_order = dict_value(header, "fortran_order")?.starts_with("True");

    let shape_text = dict_value(header, "shape")?;
    ensure!(shape_text.starts_with('('), "shape is not a tuple: {}", header);
    let close = shape_text
        .find(')')
        .ok_or_else(|| anyhow!("no closing paren in shape"))?;
    let shape = shape_text[1..close]
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<usize>().with_context(|| format!("bad shape dim '{}'", s)))
        .collect::<Result<Vec<_>>>()?;

    Ok(NpyHeader { dtype, fortran_order, shape })
}

/// Parse the `.npy` preamble and header, advancing the reader to the data.
pub fn read_header<R: Read>(reader: &mut R) -> Result<NpyHeader> {
    let mut magic = [0u8; 6];
    reader
        .read_exact(&mut magic)
        .context("failed to read npy magic")?;
    ensure!(&magic == MAGIC, "not a valid .npy file (bad magic)");

    let mut version = [0u8; 2];
    reader
        .read_exact(&mut version)
        .context("failed to read npy version")?;

    let header_len = match version[0] {
        1 => {
            let mut buf = [0u8; 2];
            reader.read_exact(&mut buf).context("failed to read header length")?;
            u16::from_le_bytes(buf) as usize
        }
        2 | 3 => {
            let mut buf = [0u8; 4];
            reader.read_exact(&mut buf).context("failed to read header length")?;
            u32::from_le_bytes(buf) as usize
        }
        v => bail!("unsupported npy version {}.{}", v, version[1]),
    };

    let mut header_bytes = vec![0u8; header_len];
    reader
        .read_exact(&mut header_bytes)
        .context("failed to read header dict")?;
    let header = String::from_utf8_lossy(&header_bytes);
    parse_header_dict(&header)
}

/// Read a complete `.npy` array.
pub fn read_npy<R: Read>(mut reader: R) -> Result<NpyArray> {
    let header = read_header(&mut reader)?;
    ensure!(
        !header.fortran_order || header.shape.len() <= 1,
        "Fortran-ordered arrays are not supported"
    );

    let Dtype { kind, size, big_endian } = header.dtype;
    let nbytes = match header.element_count().and_then(|n| n.checked_mul(size)) {
        Some(n) => n,
        None => bail!("npy shape {:?} is too large", header.shape),
    };

    // Allocation follows the bytes actually present, not the header's shape
    let mut raw = Vec::new();
    reader
        .take(nbytes as u64)
        .read_to_end(&mut raw)
        .context("failed to read npy data")?;
    ensure!(
        raw.len() == nbytes,
        "truncated npy data: expected {} bytes, found {}",
        nbytes,
        raw.len()
    );

    let words = raw.chunks_exact(size).map(|chunk| {
        let mut buf = [0u8; 8];
        if big_endian {
            buf[8 - size..].copy_from_slice(chunk);
            u64::from_be_bytes(buf)
        } else {
            buf[..size].copy_from_slice(chunk);
            u64::from_le_bytes(buf)
        }
    });

    let data = match kind {
        Kind::Float if size == 4 => {
            NpyData::Float(words.map(|w| f32::from_bits(w as u32) as f64).collect())
        }
        Kind::Float => NpyData::Float(words.map(f64::from_bits).collect()),
        Kind::UInt => NpyData::UInt(words.collect()),
        Kind::Int => {
            // sign-extend from `size` bytes
            let shift = 64 - 8 * size as u32;
            NpyData::Int(words.map(|w| ((w << shift) as i64) >> shift).collect())
        }
    };

    Ok(NpyArray { shape: header.shape, data })
}

/// Write a 1-D `<f8` array in `.npy` v1.0 format.
pub fn write_npy_f64<W: Write>(mut writer: W, values: &[f64]) -> Result<()> {
    let dict = format!(
        "{{'descr': '<f8', 'fortran_order': False, 'shape': ({},), }}",
        values.len()
    );
    // magic + version + u16 length + dict + padding + '\n' is a multiple of 64
    let unpadded = MAGIC.len() + 2 + 2 + dict.len() + 1;
    let padding = (64 - unpadded % 64) % 64;
    let header_len = dict.len() + padding + 1;

    writer.write_all(MAGIC)?;
    writer.write_all(&[1, 0])?;
    writer.write_all(&(header_len as u16).to_le_bytes())?;
    writer.write_all(dict.as_bytes())?;
    writer.write_all(&vec![b' '; padding])?;
    writer.write_all(b"\n")?;
    for v in values {
        writer.write_all(&v.to_le_bytes())?;
    }
    writer.flush()?;
    Ok(())
}
