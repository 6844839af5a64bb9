/// STL parsers: ASCII keyword grammar and fixed 50-byte binary records
use nalgebra::{Point3, Vector3};
use nom::{
    bytes::complete::tag,
    character::complete::multispace1,
    number::complete::float,
    sequence::preceded,
    IResult,
};
use tracing::debug;

use crate::error::LoadError;
use crate::geometry::{Face, Mesh};

// STL stores Z-up geometry; meshes here are Y-up with counter-clockwise
// winding. Each vertex swaps Y/Z on read, and each facet's vertices are
// emitted in (first, third, second) order so the winding survives the
// handedness flip. Facet normals are stored as read.

const HEADER_LEN: usize = 80;
const RECORD_LEN: usize = 50;

/// Parse the `solid / facet normal / outer loop / vertex / endloop /
/// endfacet / endsolid` line grammar. Keywords that carry no geometry
/// (`solid`, `outer`, `endloop`, `endsolid`) and unrecognized tokens are
/// skipped; a malformed `facet` or `vertex` line, or a facet closing
/// with other than three vertices, aborts the parse.
pub fn parse_ascii_stl(input: &str) -> Result<Mesh, LoadError> {
    let mut mesh = Mesh::new();
    let mut normal = Vector3::zeros();
    let mut pending: Vec<Point3<f32>> = Vec::with_capacity(3);

    for (index, raw) in input.lines().enumerate() {
        let line_number = index + 1;
        let line = raw.trim_start();
        match line.split(' ').next().unwrap_or("") {
            "facet" => {
                let (nx, ny, nz) = coordinate_triple(facet_line, line, line_number)?;
                normal = Vector3::new(nx, ny, nz);
            }
            "vertex" => {
                let (x, y, z) = coordinate_triple(vertex_line, line, line_number)?;
                pending.push(Point3::new(x, z, y));
            }
            "endfacet" => {
                if pending.len() != 3 {
                    return Err(LoadError::format(
                        line_number,
                        format!("facet closed with {} vertices", pending.len()),
                    ));
                }
                mesh.add_face(Face::new(pending[0], pending[2], pending[1], normal));
                pending.clear();
            }
            _ => {}
        }
    }

    debug!(faces = mesh.face_count(), "parsed ascii stl");
    Ok(mesh)
}

fn coordinate_triple(
    parser: fn(&str) -> IResult<&str, (f32, f32, f32)>,
    line: &str,
    line_number: usize,
) -> Result<(f32, f32, f32), LoadError> {
    parser(line)
        .map(|(_, triple)| triple)
        .map_err(|_| LoadError::format(line_number, format!("malformed line {line:?}")))
}

fn facet_line(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = tag("facet")(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    triple(input)
}

fn vertex_line(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = tag("vertex")(input)?;
    triple(input)
}

fn triple(input: &str) -> IResult<&str, (f32, f32, f32)> {
    let (input, _) = multispace1(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, (x, y, z)))
}

/// Parse a binary STL: 80-byte header (skipped), little-endian `u32`
/// triangle count, then one 50-byte record per triangle (12-byte normal,
/// three 12-byte vertices, 2-byte attribute, skipped). A file shorter
/// than its declared record count is an I/O failure; partial trailing
/// records are not tolerated.
pub fn parse_binary_stl(data: &[u8]) -> Result<Mesh, LoadError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(LoadError::truncated(format!(
            "binary stl needs an 84-byte header, got {} bytes",
            data.len()
        )));
    }

    let triangle_count = u32::from_le_bytes([data[80], data[81], data[82], data[83]]) as usize;
    let records = &data[HEADER_LEN + 4..];

    let expected = triangle_count
        .checked_mul(RECORD_LEN)
        .filter(|&expected| records.len() >= expected)
        .ok_or_else(|| {
            LoadError::truncated(format!(
                "binary stl declares {triangle_count} triangles but holds {} record bytes",
                records.len()
            ))
        })?;

    let mut mesh = Mesh::with_capacity(triangle_count);
    for record in records[..expected].chunks_exact(RECORD_LEN) {
        let normal = Vector3::new(
            read_f32_le(record, 0),
            read_f32_le(record, 4),
            read_f32_le(record, 8),
        );

        let mut corners = [Point3::origin(); 3];
        for (index, corner) in corners.iter_mut().enumerate() {
            let base = 12 + index * 12;
            let x = read_f32_le(record, base);
            let y = read_f32_le(record, base + 4);
            let z = read_f32_le(record, base + 8);
            *corner = Point3::new(x, z, y);
        }
        // Bytes 48..50 are the attribute byte count.

        mesh.add_face(Face::new(corners[0], corners[2], corners[1], normal));
    }

    debug!(faces = mesh.face_count(), "parsed binary stl");
    Ok(mesh)
}

fn read_f32_le(record: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        record[offset],
        record[offset + 1],
        record[offset + 2],
        record[offset + 3],
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ASCII_TRIANGLE: &str = "\
solid single
  facet normal 0 0 1
    outer loop
      vertex 0 0 0
      vertex 1 0 0
      vertex 0 1 0
    endloop
  endfacet
endsolid single
";

    fn binary_stl(triangles: &[([f32; 3], [[f32; 3]; 3])]) -> Vec<u8> {
        let mut data = vec![0u8; HEADER_LEN];
        data.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for (normal, vertices) in triangles {
            for component in normal {
                data.extend_from_slice(&component.to_le_bytes());
            }
            for vertex in vertices {
                for component in vertex {
                    data.extend_from_slice(&component.to_le_bytes());
                }
            }
            data.extend_from_slice(&0u16.to_le_bytes());
        }
        data
    }

    #[test]
    fn ascii_facet_swaps_axes_and_reorders_winding() {
        let mesh = parse_ascii_stl(ASCII_TRIANGLE).unwrap();

        assert_eq!(mesh.face_count(), 1);
        let face = &mesh.faces[0];
        // File vertices (0,0,0), (1,0,0), (0,1,0) arrive Y/Z-swapped and
        // in (first, third, second) order.
        assert_eq!(face.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(face.vertices[1], Point3::new(0.0, 0.0, 1.0));
        assert_eq!(face.vertices[2], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(face.normal, Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn ascii_and_binary_encodings_agree() {
        let triangles = [
            (
                [0.0, 0.0, 1.0],
                [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            ),
            (
                [1.0, 0.0, 0.0],
                [[2.5, -1.0, 0.5], [2.5, 1.0, 0.0], [2.5, 0.0, 3.0]],
            ),
        ];

        let mut ascii = String::from("solid pair\n");
        for (normal, vertices) in &triangles {
            ascii.push_str(&format!(
                "facet normal {} {} {}\nouter loop\n",
                normal[0], normal[1], normal[2]
            ));
            for vertex in vertices {
                ascii.push_str(&format!("vertex {} {} {}\n", vertex[0], vertex[1], vertex[2]));
            }
            ascii.push_str("endloop\nendfacet\n");
        }
        ascii.push_str("endsolid pair\n");

        let from_ascii = parse_ascii_stl(&ascii).unwrap();
        let from_binary = parse_binary_stl(&binary_stl(&triangles)).unwrap();

        assert_eq!(from_ascii.face_count(), from_binary.face_count());
        for (a, b) in from_ascii.faces.iter().zip(from_binary.faces.iter()) {
            for (va, vb) in a.vertices.iter().zip(b.vertices.iter()) {
                assert_relative_eq!(*va, *vb, epsilon = 1e-5);
            }
            assert_relative_eq!(a.normal, b.normal, epsilon = 1e-5);
        }
    }

    #[test]
    fn ascii_malformed_float_is_rejected() {
        let input = "solid bad\nfacet normal 0 0 oops\nouter loop\n";
        assert!(matches!(
            parse_ascii_stl(input),
            Err(LoadError::Format { line: 2, .. })
        ));
    }

    #[test]
    fn ascii_short_vertex_line_is_rejected() {
        let input = "solid bad\nfacet normal 0 0 1\nouter loop\nvertex 1 2\n";
        assert!(matches!(
            parse_ascii_stl(input),
            Err(LoadError::Format { line: 4, .. })
        ));
    }

    #[test]
    fn ascii_facet_with_wrong_vertex_count_is_rejected() {
        let input = "\
solid bad
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
endloop
endfacet
endsolid bad
";
        assert!(matches!(
            parse_ascii_stl(input),
            Err(LoadError::Format { line: 7, .. })
        ));
    }

    #[test]
    fn ascii_unrecognized_tokens_are_skipped() {
        let input = "\
solid annotated
color 0.5 0.5 0.5
facet normal 0 0 1
outer loop
vertex 0 0 0
vertex 1 0 0
vertex 0 1 0
endloop
endfacet
endsolid annotated
";
        assert_eq!(parse_ascii_stl(input).unwrap().face_count(), 1);
    }

    #[test]
    fn binary_zero_triangle_count_is_empty_not_an_error() {
        let mesh = parse_binary_stl(&binary_stl(&[])).unwrap();
        assert!(mesh.is_empty());
    }

    #[test]
    fn binary_truncated_records_are_an_io_failure() {
        let mut data = binary_stl(&[(
            [0.0, 0.0, 1.0],
            [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        )]);
        // Declare a second triangle that is not present.
        data[80..84].copy_from_slice(&2u32.to_le_bytes());

        match parse_binary_stl(&data) {
            Err(LoadError::Io(err)) => {
                assert_eq!(err.kind(), std::io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn binary_shorter_than_header_is_an_io_failure() {
        assert!(matches!(
            parse_binary_stl(&[0u8; 20]),
            Err(LoadError::Io(_))
        ));
    }

    #[test]
    fn binary_record_order_is_preserved() {
        let triangles = [
            (
                [0.0, 1.0, 0.0],
                [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]],
            ),
            (
                [0.0, 1.0, 0.0],
                [[5.0, 0.0, 0.0], [6.0, 0.0, 0.0], [5.0, 0.0, 1.0]],
            ),
        ];
        let mesh = parse_binary_stl(&binary_stl(&triangles)).unwrap();

        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[0].vertices[0].x, 0.0);
        assert_eq!(mesh.faces[1].vertices[0].x, 5.0);
    }
}
