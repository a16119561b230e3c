//! Canonical-form problem loader for `.npz` archives.
//!
//! An `.npz` file (as written by `numpy.savez` / `numpy.savez_compressed`) is
//! a zip archive holding one `<key>.npy` member per array. The canonical LP
//! archive carries:
//!
//! - `A_row`, `A_col`, `A_data`: triplets of the constraint matrix (nnz each)
//! - `A_shape`: `(m, n)`
//! - `b` (m), `c` (n), `lb` (n), `ub` (n)

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use anyhow::{ensure, Context, Result};
use pdhg_core::ProblemData;
use zip::ZipArchive;

use crate::npy::{read_npy, NpyArray};

fn read_member<R: Read + Seek>(archive: &mut ZipArchive<R>, key: &str) -> Result<NpyArray> {
    let member = format!("{}.npy", key);
    let name = if archive.index_for_name(&member).is_some() {
        member
    } else {
        key.to_string()
    };
    let file = archive
        .by_name(&name)
        .with_context(|| format!("archive has no array '{}'", key))?;
    let array = read_npy(file).with_context(|| format!("failed to decode array '{}'", key))?;
    log::trace!("npz member '{}': shape {:?}", key, array.shape);
    Ok(array)
}

/// Read a canonical-form problem from any seekable `.npz` stream.
pub fn read_canonical_npz<R: Read + Seek>(reader: R) -> Result<ProblemData> {
    let mut archive = ZipArchive::new(reader).context("not a valid .npz (zip) archive")?;

    let shape = read_member(&mut archive, "A_shape")?;
    ensure!(shape.len() == 2, "A_shape must hold 2 entries, got {}", shape.len());
    let shape = shape.to_index_vec().context("A_shape")?;
    let (m, n) = (shape[0], shape[1]);

    let rows = read_member(&mut archive, "A_row")?
        .to_index_vec()
        .context("A_row")?;
    let cols = read_member(&mut archive, "A_col")?
        .to_index_vec()
        .context("A_col")?;
    let data = read_member(&mut archive, "A_data")?.to_f64_vec();

    let b = read_member(&mut archive, "b")?.to_f64_vec();
    let c = read_member(&mut archive, "c")?.to_f64_vec();
    let lb = read_member(&mut archive, "lb")?.to_f64_vec();
    let ub = read_member(&mut archive, "ub")?.to_f64_vec();

    let prob = ProblemData::from_triplets((m, n), &rows, &cols, &data, b, c, lb, ub)?;
    log::debug!(
        "loaded problem: m={} n={} nnz={}",
        prob.num_constraints(),
        prob.num_vars(),
        prob.A.nnz()
    );
    Ok(prob)
}

/// Load a canonical-form problem from an `.npz` file.
pub fn load_canonical_npz<P: AsRef<Path>>(path: P) -> Result<ProblemData> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("Failed to open npz file: {:?}", path.as_ref()))?;
    read_canonical_npz(BufReader::new(file))
        .with_context(|| format!("Failed to load problem from {:?}", path.as_ref()))
}
