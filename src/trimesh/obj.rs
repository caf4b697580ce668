//! Wavefront OBJ, geometry only.
//!
//! `v` and `f` records are understood. Texture coordinates, normals, groups
//! and materials are skipped on read and never written.

use crate::nalgebra_types::*;
use crate::trimesh::TriangleMesh;
use std::io::{BufRead, BufReader, BufWriter, Error, ErrorKind, Read, Result, Write};

fn invalid_data(line_number: usize, message: String) -> Error {
    Error::new(
        ErrorKind::InvalidData,
        format!("line {}: {}", line_number, message),
    )
}

fn parse_coordinate<T: FloatField>(line_number: usize, token: Option<&str>) -> Result<T> {
    let token = token.ok_or_else(|| invalid_data(line_number, "vertex needs x y z".to_string()))?;
    let value: f64 = token
        .parse()
        .map_err(|_| invalid_data(line_number, format!("invalid coordinate {:?}", token)))?;
    if !value.is_finite() {
        return Err(invalid_data(
            line_number,
            format!("expected finite coordinate, got {}", value),
        ));
    }
    Ok(T::frm_f64(value))
}

// Corners look like `i`, `i/t`, `i//n` or `i/t/n`. Indices are 1-based,
// negative ones count back from the last vertex read so far.
fn parse_corner(line_number: usize, token: &str, node_len: usize) -> Result<usize> {
    let index_str = token.split('/').next().unwrap_or(token);
    let index: i64 = index_str
        .parse()
        .map_err(|_| invalid_data(line_number, format!("invalid face index {:?}", token)))?;

    let resolved = if index > 0 {
        Some(index - 1)
    } else if index < 0 {
        Some(node_len as i64 + index)
    } else {
        None
    };

    match resolved {
        Some(i) if i >= 0 && (i as usize) < node_len => Ok(i as usize),
        _ => Err(invalid_data(
            line_number,
            format!("face index {} out of range for {} vertices", index, node_len),
        )),
    }
}

pub fn read_obj<R: Read, T: FloatField>(read: &mut R) -> Result<TriangleMesh<T>> {
    let reader = BufReader::new(read);
    let mut result = TriangleMesh::<T>::new();
    let mut corners = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_number = i + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let x = parse_coordinate(line_number, tokens.next())?;
                let y = parse_coordinate(line_number, tokens.next())?;
                let z = parse_coordinate(line_number, tokens.next())?;
                // An optional w or vertex color may follow
                result.add_node(SVector::<T, 3>::new(x, y, z));
            }
            Some("f") => {
                corners.clear();
                for token in tokens {
                    corners.push(parse_corner(line_number, token, result.node_len())?);
                }
                if corners.len() < 3 {
                    return Err(invalid_data(
                        line_number,
                        format!("face needs at least 3 corners, got {}", corners.len()),
                    ));
                }
                result.add_polygon(&corners);
            }
            _ => {}
        }
    }

    Ok(result)
}

pub fn write_obj<W, T>(writer: &mut W, mesh: &TriangleMesh<T>) -> Result<()>
where
    W: ::std::io::Write,
    T: FloatField,
{
    let mut writer = BufWriter::new(writer);

    writeln!(writer, "# {} vertices", mesh.node_len())?;
    for p in &mesh.node_positions {
        writeln!(writer, "v {} {} {}", p.x.as_f64(), p.y.as_f64(), p.z.as_f64())?;
    }

    writeln!(writer, "# {} faces", mesh.triangle_len())?;
    for [n0, n1, n2] in &mesh.triangle_indices {
        writeln!(writer, "f {} {} {}", n0 + 1, n1 + 1, n2 + 1)?;
    }
    writer.flush()
}

pub fn read_obj_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
) -> Result<TriangleMesh<T>> {
    let mut input_file = std::fs::File::open(path)?;
    read_obj(&mut input_file)
}

pub fn write_obj_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
    mesh: &TriangleMesh<T>,
) -> Result<()> {
    let mut output_file = std::fs::File::create(path)?;
    write_obj(&mut output_file, mesh)
}
