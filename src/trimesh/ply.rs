use crate::nalgebra_types::*;
use crate::trimesh::TriangleMesh;
use ply_rs::parser;
use ply_rs::ply::{
    self, Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef,
    PropertyType, ScalarType,
};
use ply_rs::writer::Writer;
use std::io::{BufReader, BufWriter, Error, ErrorKind, Read, Result, Write};

struct VertexWrapper<T: FloatField>(SVector<T, 3>);

// None until an integer list shows up under one of the index names
struct FaceWrapper(Option<Vec<i64>>);

fn scalar_as_f64(property: &Property) -> Option<f64> {
    match *property {
        Property::Char(v) => Some(v as f64),
        Property::UChar(v) => Some(v as f64),
        Property::Short(v) => Some(v as f64),
        Property::UShort(v) => Some(v as f64),
        Property::Int(v) => Some(v as f64),
        Property::UInt(v) => Some(v as f64),
        Property::Float(v) => Some(v as f64),
        Property::Double(v) => Some(v),
        _ => None,
    }
}

fn list_as_indices(property: Property) -> Option<Vec<i64>> {
    match property {
        Property::ListChar(v) => Some(v.into_iter().map(i64::from).collect()),
        Property::ListUChar(v) => Some(v.into_iter().map(i64::from).collect()),
        Property::ListShort(v) => Some(v.into_iter().map(i64::from).collect()),
        Property::ListUShort(v) => Some(v.into_iter().map(i64::from).collect()),
        Property::ListInt(v) => Some(v.into_iter().map(i64::from).collect()),
        Property::ListUInt(v) => Some(v.into_iter().map(i64::from).collect()),
        _ => None,
    }
}

impl<T: FloatField> ply::PropertyAccess for VertexWrapper<T> {
    fn new() -> Self {
        VertexWrapper(SVector::zeros())
    }

    fn set_property(&mut self, key: String, property: Property) {
        let axis = match key.as_ref() {
            "x" => 0,
            "y" => 1,
            "z" => 2,
            // normals, colors and the like are dropped
            _ => return,
        };
        if let Some(v) = scalar_as_f64(&property) {
            self.0[axis] = T::frm_f64(v);
        }
    }
}

impl ply::PropertyAccess for FaceWrapper {
    fn new() -> Self {
        FaceWrapper(None)
    }

    fn set_property(&mut self, key: String, property: Property) {
        if key == "vertex_indices" || key == "vertex_index" {
            self.0 = list_as_indices(property);
        }
    }
}

fn invalid_data(message: String) -> Error {
    Error::new(ErrorKind::InvalidData, message)
}

/// Read a TriangleMesh from ascii or binary ply data.
/// Polygons are fan triangulated; a file without faces is a point cloud.
pub fn read_ply<R: Read, T: FloatField>(read: &mut R) -> Result<TriangleMesh<T>> {
    let mut reader = BufReader::new(read);

    let vertex_parser = parser::Parser::<VertexWrapper<T>>::new();
    let face_parser = parser::Parser::<FaceWrapper>::new();
    let skip_parser = parser::Parser::<DefaultElement>::new();
    let header = vertex_parser.read_header(&mut reader)?;

    let mut vertex_list = Vec::new();
    let mut face_list = Vec::new();
    for (_ignore_key, element) in &header.elements {
        // Elements have to be consumed in header order, wanted or not
        match element.name.as_ref() {
            "vertex" => {
                for axis in ["x", "y", "z"] {
                    if !element.properties.contains_key(axis) {
                        return Err(invalid_data(format!(
                            "vertex element has no \"{}\" property",
                            axis
                        )));
                    }
                }
                vertex_list =
                    vertex_parser.read_payload_for_element(&mut reader, element, &header)?;
            }
            "face" => {
                face_list =
                    face_parser.read_payload_for_element(&mut reader, element, &header)?;
            }
            other => {
                log::debug!("Skipping {} \"{}\" ply elements", element.count, other);
                skip_parser.read_payload_for_element(&mut reader, element, &header)?;
            }
        }
    }

    let mut result = TriangleMesh::with_capacity(vertex_list.len(), face_list.len());
    for vertex in vertex_list {
        result.add_node(vertex.0);
    }
    for (f, face) in face_list.into_iter().enumerate() {
        let corners = face.0.ok_or_else(|| {
            invalid_data(format!("face {} has no integer vertex_indices list", f))
        })?;
        let corners = corners
            .into_iter()
            .map(|c| {
                usize::try_from(c)
                    .map_err(|_| invalid_data(format!("face {} has negative index {}", f, c)))
            })
            .collect::<Result<Vec<usize>>>()?;
        result.add_polygon(&corners);
    }
    Ok(result)
}

/// Write a TriangleMesh as ascii ply with double coordinates.
pub fn write_ply<W, T>(writer: &mut W, mesh: &TriangleMesh<T>) -> Result<()>
where
    W: ::std::io::Write,
    T: FloatField,
{
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header
        .comments
        .push(String::from("written by meshutil"));

    let mut vertex_element = ElementDef::new("vertex".to_string());
    for axis in ["x", "y", "z"] {
        vertex_element.properties.add(PropertyDef::new(
            axis.to_string(),
            PropertyType::Scalar(ScalarType::Double),
        ));
    }
    vertex_element.count = mesh.node_len();
    ply.header.elements.add(vertex_element);

    let mut face_element = ElementDef::new("face".to_string());
    face_element.properties.add(PropertyDef::new(
        "vertex_indices".to_string(),
        PropertyType::List(ScalarType::UChar, ScalarType::Int),
    ));
    face_element.count = mesh.triangle_len();
    ply.header.elements.add(face_element);

    let mut vertices = Vec::with_capacity(mesh.node_len());
    for position in &mesh.node_positions {
        let mut vertex = DefaultElement::new();
        vertex.insert("x".to_string(), Property::Double(position.x.as_f64()));
        vertex.insert("y".to_string(), Property::Double(position.y.as_f64()));
        vertex.insert("z".to_string(), Property::Double(position.z.as_f64()));
        vertices.push(vertex);
    }
    ply.payload.insert("vertex".to_string(), vertices);

    let mut faces = Vec::with_capacity(mesh.triangle_len());
    for triangle in &mesh.triangle_indices {
        let mut indices = Vec::with_capacity(3);
        for &n in triangle {
            let index = i32::try_from(n).map_err(|_| {
                Error::new(
                    ErrorKind::InvalidInput,
                    format!("node index {} does not fit in a ply int", n),
                )
            })?;
            indices.push(index);
        }
        let mut face = DefaultElement::new();
        face.insert("vertex_indices".to_string(), Property::ListInt(indices));
        faces.push(face);
    }
    ply.payload.insert("face".to_string(), faces);

    let mut writer = BufWriter::new(writer);
    Writer::new().write_ply(&mut writer, &mut ply)?;
    writer.flush()
}

/// Read a TriangleMesh in from a ply file
pub fn read_ply_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
) -> Result<TriangleMesh<T>> {
    let mut input_file = std::fs::File::open(path)?;
    read_ply(&mut input_file)
}

pub fn write_ply_file<P: AsRef<std::path::Path>, T: FloatField>(
    path: &P,
    mesh: &TriangleMesh<T>,
) -> Result<()> {
    let mut output_file = std::fs::File::create(path)?;
    write_ply(&mut output_file, mesh)
}
