//! Wavefront OBJ export.
//!
//! Each mesh contributes its `v` lines, then its `vn` lines, then one
//! `f a//a b//b c//c` line per triangle. Indices are 1-based and offset by
//! the vertex count of the meshes written before it, and every position
//! index doubles as the normal index.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ExportError, Result};
use crate::tessellation::TriangleMesh;

/// Renders meshes as one OBJ document.
#[must_use]
pub fn export_obj<'a, I>(meshes: I) -> String
where
    I: IntoIterator<Item = &'a TriangleMesh>,
{
    let mut out = String::from("# blendsurf\n");
    let mut offset = 1usize;

    for mesh in meshes {
        for v in &mesh.vertices {
            let p = v.position;
            let _ = writeln!(out, "v {} {} {}", p.x, p.y, p.z);
        }
        for v in &mesh.vertices {
            let n = v.normal;
            let _ = writeln!(out, "vn {} {} {}", n.x, n.y, n.z);
        }
        for tri in &mesh.indices {
            let [a, b, c] = tri.map(|i| i as usize + offset);
            let _ = writeln!(out, "f {a}//{a} {b}//{b} {c}//{c}");
        }
        offset += mesh.vertices.len();
    }
    out
}

/// Writes meshes to `path`.
///
/// The document goes to a sibling temporary file first and is renamed into
/// place, so a failed write never leaves a truncated file at `path`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed.
pub fn write_obj<'a, I>(path: &Path, meshes: I) -> Result<()>
where
    I: IntoIterator<Item = &'a TriangleMesh>,
{
    let text = export_obj(meshes);
    let tmp = path.with_extension("obj.tmp");
    let written = fs::write(&tmp, text.as_bytes()).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(ExportError::Io(e).into());
    }
    Ok(())
}

/// Writes meshes to `path`, reporting success as a flag.
pub fn save_obj<'a, I>(path: &Path, meshes: I) -> bool
where
    I: IntoIterator<Item = &'a TriangleMesh>,
{
    match write_obj(path, meshes) {
        Ok(()) => {
            info!(path = %path.display(), "exported OBJ");
            true
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "OBJ export failed");
            false
        }
    }
}
