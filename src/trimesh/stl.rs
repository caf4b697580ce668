// Adapted from stl_io.
// https://github.com/hmeyer/stl_io/blob/master/src/lib.rs
use crate::nalgebra_types::*;
use crate::trimesh::TriangleMesh;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{BufRead, BufReader, BufWriter, Error, ErrorKind, SeekFrom};
use std::io::{Read, Result, Write};

const HEADER_LEN: u64 = 80;
// normal + 3 corners as f32, then the attribute byte count
const TRIANGLE_LEN: u64 = 4 * 12 + 2;

/// Write binary stl. Every triangle carries its own copy of its corners.
pub fn write_stl<W, T>(writer: &mut W, mesh: &TriangleMesh<T>) -> Result<()>
where
    W: ::std::io::Write,
    T: FloatField,
{
    let triangle_len = u32::try_from(mesh.triangle_len()).map_err(|_| {
        Error::new(
            ErrorKind::InvalidInput,
            format!("{} triangles do not fit in a binary stl", mesh.triangle_len()),
        )
    })?;
    let mut writer = BufWriter::new(writer);

    writer.write_all(&[0u8; HEADER_LEN as usize])?;
    writer.write_u32::<LittleEndian>(triangle_len)?;
    for t in 0..mesh.triangle_len() {
        for f in &mesh.triangle_normal(t) {
            writer.write_f32::<LittleEndian>((*f).as_f32())?;
        }
        for &n in mesh.triangle(t) {
            for c in mesh.node(n) {
                writer.write_f32::<LittleEndian>((*c).as_f32())?;
            }
        }
        // Attribute byte count
        writer.write_u16::<LittleEndian>(0)?;
    }
    writer.flush()
}

/// Read ascii or binary stl.
///
/// A stream whose length matches the triangle count in its binary header is
/// binary, even if the header text starts with `solid`. Anything else that
/// opens with a `solid` token is read as ascii.
pub fn read_stl<R, T>(read: &mut R) -> Result<TriangleMesh<T>>
where
    R: ::std::io::Read + ::std::io::Seek,
    T: FloatField,
{
    if is_binary_stl(read)? {
        read_binary_stl(read)
    } else if is_ascii_stl(read).is_ok() {
        read_ascii_stl(read)
    } else {
        // Reports the length mismatch
        read_binary_stl(read)
    }
}

/// True if the stream is exactly as long as its binary header says.
pub fn is_binary_stl<R: ::std::io::Read + ::std::io::Seek>(read: &mut R) -> Result<bool> {
    let stream_len = read.seek(SeekFrom::End(0))?;
    read.seek(SeekFrom::Start(HEADER_LEN))?;
    let result = if stream_len < HEADER_LEN + 4 {
        false
    } else {
        let num_triangles = read.read_u32::<LittleEndian>()? as u64;
        stream_len == HEADER_LEN + 4 + num_triangles * TRIANGLE_LEN
    };
    read.seek(SeekFrom::Start(0))?;
    Ok(result)
}

fn read_binary_stl<R: std::io::Read + std::io::Seek, T: FloatField>(
    read: &mut R,
) -> Result<TriangleMesh<T>> {
    let stream_len = read.seek(SeekFrom::End(0))?;
    read.seek(SeekFrom::Start(0))?;

    let mut reader = BufReader::new(read);
    reader.read_exact(&mut [0u8; HEADER_LEN as usize])?;
    let num_triangles = reader.read_u32::<LittleEndian>()? as u64;

    let expected_len = HEADER_LEN + 4 + num_triangles * TRIANGLE_LEN;
    if stream_len != expected_len {
        return Err(Error::new(
            ErrorKind::InvalidData,
            format!(
                "binary stl claims {} triangles ({} bytes) but is {} bytes long",
                num_triangles, expected_len, stream_len
            ),
        ));
    }

    let num_triangles = num_triangles as usize;
    let mut result = TriangleMesh::<T>::with_capacity(num_triangles * 3, num_triangles);

    for _ in 0..num_triangles {
        // Normals are recomputed from the corners on write
        for _ in 0..3 {
            reader.read_f32::<LittleEndian>()?;
        }

        let mut indices = [0; 3];
        for i in &mut indices {
            let mut position: SVector<T, 3> = SVector::zeros();
            for c in &mut position {
                *c = T::frm_f32(reader.read_f32::<LittleEndian>()?);
            }
            *i = result.add_node(position);
        }
        reader.read_u16::<LittleEndian>()?;
        result.add_triangle(indices);
    }

    Ok(result)
}

pub fn is_ascii_stl<R: ::std::io::Read + ::std::io::Seek>(read: &mut R) -> Result<()> {
    let mut header = String::new();
    let maybe_read_error = BufReader::new(&mut *read).read_line(&mut header);
    // Try to seek back to start before evaluating potential read errors.
    read.seek(SeekFrom::Start(0))?;
    maybe_read_error?;
    if header.split_whitespace().next() == Some("solid") {
        Ok(())
    } else {
        Err(Error::new(
            ErrorKind::InvalidData,
            format!("ascii stl starts with solid, found: {:?}", header),
        ))
    }
}

fn ascii_expect_static<L>(lines: &mut L, expectation: &[&str]) -> Result<()>
where
    L: std::iter::Iterator<Item = Result<Vec<String>>>,
{
    if let Some(line) = lines.next() {
        let line = line?;
        if line != expectation {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("expected {:?}, got {:?}", expectation, line),
            ));
        }
    } else {
        return Err(Error::new(
            ErrorKind::UnexpectedEof,
            format!("EOF while expecting {:?}", expectation),
        ));
    }
    Ok(())
}

fn ascii_tokens_to_vec3<T: FloatField>(tokens: &[String]) -> Result<SVector<T, 3>> {
    let mut result = SVector::zeros();
    for i in 0..3 {
        let value: f64 = tokens[i].parse().map_err(|_| {
            Error::new(
                ErrorKind::InvalidData,
                format!("expected number, got {:?}", tokens[i]),
            )
        })?;
        if !value.is_finite() {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("expected finite f64, got {}", value),
            ));
        }
        result[i] = T::frm_f64(value);
    }
    Ok(result)
}

fn read_ascii_stl<R: std::io::Read, T: FloatField>(read: &mut R) -> Result<TriangleMesh<T>> {
    // Only call if is_ascii_stl passes
    let mut lines = BufReader::new(read).lines();
    lines.next();

    let mut tokens = lines.map(|result| {
        result.map(|l| {
            // Make lines into iterator over vectors of tokens
            l.split_whitespace()
                .map(|t| t.to_string())
                .collect::<Vec<_>>()
        })
    });

    let mut result: TriangleMesh<T> = TriangleMesh::<T>::new();
    loop {
        let face_header = match tokens.next() {
            Some(line) => line?,
            None => {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "EOF while expecting facet or endsolid.",
                ))
            }
        };
        if !face_header.is_empty() && face_header[0] == "endsolid" {
            break;
        }
        if face_header.len() != 5 || face_header[0] != "facet" || face_header[1] != "normal" {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("invalid facet header: {:?}", face_header),
            ));
        }
        let _normal = ascii_tokens_to_vec3::<T>(&face_header[2..5])?;
        ascii_expect_static(&mut tokens, &["outer", "loop"])?;
        let mut triangle_indices = [0; 3];
        for vertex_result in &mut triangle_indices {
            if let Some(line) = tokens.next() {
                let line = line?;
                if line.len() != 4 || line[0] != "vertex" {
                    return Err(Error::new(
                        ErrorKind::InvalidData,
                        format!("vertex f32 f32 f32, got {:?}", line),
                    ));
                }
                *vertex_result = result.add_node(ascii_tokens_to_vec3(&line[1..4])?);
            } else {
                return Err(Error::new(
                    ErrorKind::UnexpectedEof,
                    "EOF while expecting vertex",
                ));
            }
        }
        result.add_triangle(triangle_indices);
        ascii_expect_static(&mut tokens, &["endloop"])?;
        ascii_expect_static(&mut tokens, &["endfacet"])?;
    }
    Ok(result)
}

pub fn write_stl_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
    mesh: &TriangleMesh<T>,
) -> Result<()> {
    let mut output_file = std::fs::File::create(path)?;
    write_stl(&mut output_file, mesh)
}

pub fn read_stl_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
) -> Result<TriangleMesh<T>> {
    let mut input_file = std::fs::File::open(path)?;
    read_stl(&mut input_file)
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use approx::relative_eq;

    fn tetrahedron() -> TriangleMesh<f64> {
        let mut mesh = TriangleMesh::new();
        mesh.add_node(Vector3::new(0.0, 0.0, 0.0));
        mesh.add_node(Vector3::new(1.0, 0.0, 0.0));
        mesh.add_node(Vector3::new(0.0, 1.0, 0.0));
        mesh.add_node(Vector3::new(0.0, 0.0, 1.0));
        mesh.add_triangle([0, 2, 1]);
        mesh.add_triangle([0, 1, 3]);
        mesh.add_triangle([0, 3, 2]);
        mesh.add_triangle([1, 2, 3]);
        mesh
    }

    #[test]
    fn ascii_expect_static() {
        {
            let mut tokens = vec![Ok(vec![String::from("a"), String::from("b")])];
            let mut i = tokens.drain(0..);
            let result0 = super::ascii_expect_static(&mut i, &["a", "b"]);
            assert!(result0.is_ok());
        }

        {
            let mut tokens = vec![Ok(vec![String::from("a"), String::from("b")])];
            let mut i = tokens.drain(0..);
            let result0 = super::ascii_expect_static(&mut i, &["b", "a"]);
            assert_eq!(result0.err().unwrap().kind(), ErrorKind::InvalidData);
        }

        {
            let mut tokens: Vec<Result<Vec<String>>> = vec![];
            let mut i = tokens.drain(0..);
            let result0 = super::ascii_expect_static(&mut i, &["b", "a"]);
            assert_eq!(result0.err().unwrap().kind(), ErrorKind::UnexpectedEof);
        }
    }

    #[test]
    fn read_ascii_stl_simple_success() {
        let mut reader = ::std::io::Cursor::new(
            b"solid foobar
        facet normal 1.1 0.2 0.3
            outer loop
                vertex 1 2 3
                vertex 4 5 6e-15
                vertex 7 8 9.87654321
            endloop
        endfacet
        endsolid foobar"
                .to_vec(),
        );
        let mesh = read_stl::<_, f64>(&mut reader).unwrap();
        assert_eq!(mesh.node_len(), 3);
        assert_eq!(*mesh.node(0), Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(*mesh.node(1), Vector3::new(4.0, 5.0, 6e-15));
        assert_eq!(*mesh.node(2), Vector3::new(7.0, 8.0, 9.87654321));
        assert_eq!(mesh.triangle_len(), 1);
        assert_eq!(*mesh.triangle(0), [0, 1, 2]);
    }

    #[test]
    fn read_ascii_stl_tiny_numbers() {
        let mut reader = ::std::io::Cursor::new(
            b"solid ASCII
                  facet normal 8.491608e-001 1.950388e-001 -4.908011e-001
                    outer loop
                    vertex   -8.222098e-001 2.326105e+001 5.724931e-046
                    vertex   -8.811435e-001 2.351764e+001 1.135191e-045
                    vertex   3.688022e+000 2.340444e+001 7.860367e+000
                    endloop
                endfacet
            endsolid"
                .to_vec(),
        );
        assert!(read_stl::<_, f32>(&mut reader).is_ok());
    }

    #[test]
    fn read_ascii_stl_errors() {
        let cases: [(&[u8], ErrorKind); 6] = [
            // wrong facet header
            (
                b"solid foobar\ntriangle normal 1 2 3\nouter loop\n",
                ErrorKind::InvalidData,
            ),
            // short facet header
            (b"solid foobar\nfacet normal\nouter loop\n", ErrorKind::InvalidData),
            // trailing comma on a coordinate
            (
                b"solid foobar\nfacet normal 1 2 3\nouter loop\nvertex 7 8 9,\n",
                ErrorKind::InvalidData,
            ),
            (b"solid foobar", ErrorKind::UnexpectedEof),
            (
                b"solid foo bar\nfacet normal 0.1 0.2 0.3\nouter loop\nvertex 1 2 3",
                ErrorKind::UnexpectedEof,
            ),
            (
                b"solid foo bar\nfacet normal 0.1 0.2 0.3\nouter loop\nvertex 1 2 NaN",
                ErrorKind::InvalidData,
            ),
        ];
        for (text, kind) in cases {
            let mut reader = ::std::io::Cursor::new(text.to_vec());
            let result = read_stl::<_, f64>(&mut reader);
            assert_eq!(
                result.err().map(|e| e.kind()),
                Some(kind),
                "{}",
                String::from_utf8_lossy(text)
            );
        }
    }

    #[test]
    fn read_ascii_stl_not_vertex() {
        let mut reader = ::std::io::Cursor::new(
            b"solid foo bar
        facet normal 0.1 0.2 0.3
            outer loop
                node 1 2 3"
                .to_vec(),
        );
        let result = read_stl::<_, f64>(&mut reader);
        assert_eq!(result.err().unwrap().kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn read_binary_wrong_length() {
        // Not ascii, and far too short for the triangle count in bytes 80..84
        let mut reader = ::std::io::Cursor::new(
            b"non-solid foobar
        facet normal 1 2 3
            outer loop
                vertex 7 8 9
                vertex 4 5 6
                vertex 7 8 9
            endloop
        endfacet
        endsolid foobar"
                .to_vec(),
        );
        let result = read_stl::<_, f64>(&mut reader);
        assert_eq!(result.err().unwrap().kind(), ErrorKind::InvalidData);
    }

    #[test]
    fn read_ascii_stl_unnamed_solid() {
        let mut reader = ::std::io::Cursor::new(
            b"solid
facet normal 0 0 1
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 1 0
  endloop
endfacet
endsolid
"
            .to_vec(),
        );
        let mesh = read_stl::<_, f64>(&mut reader).unwrap();
        assert_eq!(mesh.node_len(), 3);
        assert_eq!(mesh.triangle_len(), 1);
        assert_eq!(*mesh.node(1), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn read_binary_stl_with_solid_header() {
        let mesh = tetrahedron();
        let mut buffer = Vec::<u8>::new();
        write_stl(&mut buffer, &mesh).unwrap();
        let header = b"solid exported by cad";
        buffer[..header.len()].copy_from_slice(header);
        buffer[header.len()] = b'\n';

        let reloaded = read_stl::<_, f64>(&mut ::std::io::Cursor::new(&buffer)).unwrap();
        assert_eq!(reloaded.triangle_len(), 4);
        assert_eq!(reloaded.node_len(), 12);
        assert_eq!(*reloaded.node(4), Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn is_binary_stl_rewinds() {
        let mut buffer = Vec::<u8>::new();
        write_stl(&mut buffer, &tetrahedron()).unwrap();
        let mut reader = ::std::io::Cursor::new(&buffer);
        assert!(is_binary_stl(&mut reader).unwrap());
        assert_eq!(reader.position(), 0);

        let mut short = ::std::io::Cursor::new(b"solid x\nendsolid x\n".to_vec());
        assert!(!is_binary_stl(&mut short).unwrap());
        assert_eq!(short.position(), 0);
    }

    #[test]
    fn write_binary_stl_layout() {
        let mesh = tetrahedron();
        let mut buffer = Vec::<u8>::new();
        write_stl(&mut buffer, &mesh).unwrap();
        assert_eq!(buffer.len() as u64, HEADER_LEN + 4 + 4 * TRIANGLE_LEN);
        assert_eq!(&buffer[80..84], &4u32.to_le_bytes());
        // first normal points down -z
        assert_eq!(&buffer[84..88], &0.0f32.to_le_bytes());
        assert_eq!(&buffer[92..96], &(-1.0f32).to_le_bytes());
    }

    #[test]
    fn binary_round_trip() {
        let mesh = tetrahedron();
        let mut buffer = Vec::<u8>::new();
        write_stl(&mut buffer, &mesh).unwrap();

        let reloaded = read_stl::<_, f64>(&mut ::std::io::Cursor::new(&buffer)).unwrap();
        assert_eq!(reloaded.triangle_len(), 4);
        assert_eq!(reloaded.node_len(), 12);
        for t in 0..reloaded.triangle_len() {
            for (a, b) in reloaded.triangle(t).iter().zip(mesh.triangle(t)) {
                assert!(relative_eq!(
                    reloaded.node(*a),
                    mesh.node(*b),
                    epsilon = 0.000001
                ));
            }
        }
    }

    #[test]
    fn to_file() {
        let mut test_path = tempdir::TempDir::new("stl_to_file_test")
            .unwrap()
            .into_path();
        test_path.push("test.stl");

        let mesh = tetrahedron();
        let result = write_stl_file(&test_path, &mesh);
        if let Err(error) = result {
            println!("{}", error);
            panic!();
        }
        let reloaded = read_stl_file::<_, f32>(&test_path).unwrap();
        assert_eq!(reloaded.triangle_len(), 4);
        std::fs::remove_dir_all(test_path.parent().unwrap()).unwrap();
    }
}
