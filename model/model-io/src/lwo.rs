//! LWO2 (LightWave Object) serialization.
//!
//! LWO2 is an IFF container: big-endian chunks tagged with four-byte
//! IDs, each padded to even length. The writer assembles every chunk
//! in memory first so sizes are exact, then streams the finished
//! `FORM` — no seeking, so any [`Write`] sink works, including the
//! atomic [`ExportStream`].
//!
//! Layout produced:
//!
//! ```text
//! FORM size
//!   LWO2
//!   TAGS   – every surface's material name, in model order
//!   LAYR   – a single layer holding all geometry
//!   PNTS   – all surfaces' vertices, concatenated
//!   VMAP   – TXUV "UVMap": per-point texture coordinates
//!   VMAP   – RGB  "Colour": per-point vertex colors
//!   POLS   – FACE: triangles, indices offset per surface
//!   PTAG   – SURF: polygon → material tag mapping
//!   SURF*  – one per material, with a COLR subchunk
//! ```

use std::io::{self, Write};
use std::path::Path;

use model_mesh::Model;
use tracing::info;

use crate::endian::write_be;
use crate::error::IoResult;
use crate::stream::ExportStream;

/// Vertex indices below this value are encoded as two bytes.
const VX_SHORT_LIMIT: u32 = 0xFF00;

/// Marker byte prefix for four-byte vertex indices.
const VX_LONG_MARKER: u32 = 0xFF00_0000;

/// Append a chunk (four-byte ID, `u32` size, data, even padding).
fn push_chunk(out: &mut Vec<u8>, id: [u8; 4], data: &[u8]) -> io::Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: chunk payloads are bounded far below u32::MAX
    let size = data.len() as u32;
    out.write_all(&id)?;
    write_be(out, size)?;
    out.write_all(data)?;
    if data.len() % 2 == 1 {
        write_be(out, 0u8)?;
    }
    Ok(())
}

/// Append a SURF subchunk (four-byte ID, `u16` size, data, padding).
fn push_subchunk(out: &mut Vec<u8>, id: [u8; 4], data: &[u8]) -> io::Result<()> {
    #[allow(clippy::cast_possible_truncation)]
    // Truncation: subchunk payloads are a handful of bytes
    let size = data.len() as u16;
    out.write_all(&id)?;
    write_be(out, size)?;
    out.write_all(data)?;
    if data.len() % 2 == 1 {
        write_be(out, 0u8)?;
    }
    Ok(())
}

/// Append a NUL-terminated string, padded to even length (S0).
fn push_string(out: &mut Vec<u8>, value: &str) -> io::Result<()> {
    out.write_all(value.as_bytes())?;
    write_be(out, 0u8)?;
    if (value.len() + 1) % 2 == 1 {
        write_be(out, 0u8)?;
    }
    Ok(())
}

/// Append a variable-length vertex/polygon index (VX): two bytes for
/// small values, four bytes with a `0xFF` marker otherwise.
fn push_vx(out: &mut Vec<u8>, index: u32) -> io::Result<()> {
    if index < VX_SHORT_LIMIT {
        #[allow(clippy::cast_possible_truncation)]
        // Truncation: guarded by the limit check above
        write_be(out, index as u16)
    } else {
        write_be(out, index | VX_LONG_MARKER)
    }
}

/// Serialize a model as LWO2 into an arbitrary sink.
///
/// Surfaces are emitted in model (material name) order, so the same
/// model always produces the same bytes.
///
/// # Errors
///
/// Propagates write errors from the sink; assembling the chunks
/// itself cannot fail.
#[allow(clippy::cast_possible_truncation)]
// Truncation: point/polygon/tag counts are bounded by the format's u32
// indices, coordinates are stored as f32 by the format
pub fn write_lwo<W: Write>(model: &Model, writer: &mut W) -> IoResult<()> {
    let mut body: Vec<u8> = Vec::new();
    body.extend_from_slice(b"LWO2");

    // TAGS: material names become surface tags
    let mut tags = Vec::new();
    for surface in model.surfaces() {
        push_string(&mut tags, surface.material())?;
    }
    push_chunk(&mut body, *b"TAGS", &tags)?;

    // One layer holds everything
    let mut layr = Vec::new();
    write_be(&mut layr, 0u16)?; // layer number
    write_be(&mut layr, 0u16)?; // flags
    for _ in 0..3 {
        write_be(&mut layr, 0.0f32)?; // pivot
    }
    push_string(&mut layr, "")?;
    push_chunk(&mut body, *b"LAYR", &layr)?;

    // PNTS: concatenate every surface's vertices, remembering each
    // surface's base offset for the index chunks below
    let mut pnts = Vec::new();
    let mut point_base = Vec::with_capacity(model.surface_count());
    let mut next_point: u32 = 0;
    for surface in model.surfaces() {
        point_base.push(next_point);
        for vertex in surface.vertices() {
            write_be(&mut pnts, vertex.position.x as f32)?;
            write_be(&mut pnts, vertex.position.y as f32)?;
            write_be(&mut pnts, vertex.position.z as f32)?;
        }
        next_point += surface.vertex_count() as u32;
    }
    push_chunk(&mut body, *b"PNTS", &pnts)?;

    // Per-point texture coordinates
    let mut txuv = Vec::new();
    txuv.extend_from_slice(b"TXUV");
    write_be(&mut txuv, 2u16)?; // dimension
    push_string(&mut txuv, "UVMap")?;
    for (surface_index, surface) in model.surfaces().enumerate() {
        let base = point_base[surface_index];
        for (offset, vertex) in surface.vertices().iter().enumerate() {
            push_vx(&mut txuv, base + offset as u32)?;
            write_be(&mut txuv, vertex.texcoord.x as f32)?;
            write_be(&mut txuv, vertex.texcoord.y as f32)?;
        }
    }
    push_chunk(&mut body, *b"VMAP", &txuv)?;

    // Per-point vertex colors
    let mut rgb = Vec::new();
    rgb.extend_from_slice(b"RGB ");
    write_be(&mut rgb, 3u16)?; // dimension
    push_string(&mut rgb, "Colour")?;
    for (surface_index, surface) in model.surfaces().enumerate() {
        let base = point_base[surface_index];
        for (offset, vertex) in surface.vertices().iter().enumerate() {
            push_vx(&mut rgb, base + offset as u32)?;
            write_be(&mut rgb, vertex.color.x as f32)?;
            write_be(&mut rgb, vertex.color.y as f32)?;
            write_be(&mut rgb, vertex.color.z as f32)?;
        }
    }
    push_chunk(&mut body, *b"VMAP", &rgb)?;

    // Triangles, plus the polygon → tag mapping
    let mut pols = Vec::new();
    pols.extend_from_slice(b"FACE");
    let mut ptag = Vec::new();
    ptag.extend_from_slice(b"SURF");
    let mut polygon_number: u32 = 0;
    for (tag_index, surface) in model.surfaces().enumerate() {
        let base = point_base[tag_index];
        for triangle in surface.indices().chunks_exact(3) {
            write_be(&mut pols, 3u16)?; // vertex count, no flags
            for &corner in triangle {
                push_vx(&mut pols, base + corner)?;
            }
            push_vx(&mut ptag, polygon_number)?;
            write_be(&mut ptag, tag_index as u16)?;
            polygon_number += 1;
        }
    }
    push_chunk(&mut body, *b"POLS", &pols)?;
    push_chunk(&mut body, *b"PTAG", &ptag)?;

    // Surface definitions, one per tag
    for surface in model.surfaces() {
        let mut surf = Vec::new();
        push_string(&mut surf, surface.material())?;
        push_string(&mut surf, "")?; // no parent

        let mut colr = Vec::new();
        write_be(&mut colr, 1.0f32)?;
        write_be(&mut colr, 1.0f32)?;
        write_be(&mut colr, 1.0f32)?;
        push_vx(&mut colr, 0)?; // no envelope
        push_subchunk(&mut surf, *b"COLR", &colr)?;

        push_chunk(&mut body, *b"SURF", &surf)?;
    }

    writer.write_all(b"FORM")?;
    write_be(writer, body.len() as u32)?;
    writer.write_all(&body)?;
    Ok(())
}

/// Serialize a model as LWO2 to `directory/filename`, committing
/// atomically.
///
/// On success the export stream is closed exactly once, replacing any
/// pre-existing target file. On failure the stream is abandoned: the
/// temporary sibling remains, the target is never touched.
///
/// # Errors
///
/// Any [`crate::IoError`] from opening, writing or committing the
/// stream.
pub fn save_lwo<P: AsRef<Path>>(model: &Model, directory: P, filename: &str) -> IoResult<()> {
    let mut stream = ExportStream::new(directory, filename)?;
    write_lwo(model, &mut stream)?;

    info!(
        target_path = %stream.target_path().display(),
        surfaces = model.surface_count(),
        "committing LWO2 export"
    );
    stream.close()
}
