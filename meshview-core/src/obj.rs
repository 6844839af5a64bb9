/// Wavefront OBJ subset parser: `v`, `vn`, and triangular `f` statements
use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::error::LoadError;
use crate::geometry::{Face, Mesh};

/// Parse OBJ text into a mesh.
///
/// Vertex and normal tables are scratch state scoped to this call; faces
/// reference them by the 1-based indices written in the file. Coordinate
/// tokens parse leniently (log and substitute zero), face references
/// strictly: any bad index aborts the parse and discards all output.
pub fn parse_obj(input: &str) -> Result<Mesh, LoadError> {
    let mut vertices: Vec<Point3<f32>> = Vec::new();
    let mut normals: Vec<Vector3<f32>> = Vec::new();
    let mut mesh = Mesh::new();

    for (index, line) in input.lines().enumerate() {
        let line_number = index + 1;
        let mut tokens = line.split(' ');
        match tokens.next().unwrap_or("") {
            "v" => {
                let (x, y, z) = lenient_triple(&mut tokens, line_number);
                vertices.push(Point3::new(x, y, z));
            }
            "vn" => {
                let (x, y, z) = lenient_triple(&mut tokens, line_number);
                normals.push(Vector3::new(x, y, z));
            }
            "f" => {
                let face = parse_face(tokens, &vertices, &normals, line_number)?;
                mesh.add_face(face);
            }
            "" => {}
            statement => {
                debug!(line = line_number, statement, "skipping unrecognized obj statement");
            }
        }
    }

    Ok(mesh)
}

fn lenient_triple<'a>(
    tokens: &mut impl Iterator<Item = &'a str>,
    line_number: usize,
) -> (f32, f32, f32) {
    let x = lenient_float(tokens.next(), line_number);
    let y = lenient_float(tokens.next(), line_number);
    let z = lenient_float(tokens.next(), line_number);
    (x, y, z)
}

/// Coordinate tokens that are missing or fail to parse are logged and
/// read as zero; the surrounding load continues. Face indices are never
/// this forgiving.
fn lenient_float(token: Option<&str>, line_number: usize) -> f32 {
    let token = token.unwrap_or("");
    token.parse().unwrap_or_else(|_| {
        warn!(line = line_number, token, "unparsable coordinate, substituting 0");
        0.0
    })
}

fn parse_face<'a>(
    tokens: impl Iterator<Item = &'a str>,
    vertices: &[Point3<f32>],
    normals: &[Vector3<f32>],
    line_number: usize,
) -> Result<Face, LoadError> {
    let references = tokens
        .filter(|token| !token.is_empty())
        .map(|token| parse_reference(token, line_number))
        .collect::<Result<Vec<_>, _>>()?;

    let [a, b, c] = references[..] else {
        return Err(LoadError::format(
            line_number,
            format!(
                "face needs exactly 3 vertex references, found {}",
                references.len()
            ),
        ));
    };

    let corners = [
        lookup(vertices, a.0, "vertex", line_number)?,
        lookup(vertices, b.0, "vertex", line_number)?,
        lookup(vertices, c.0, "vertex", line_number)?,
    ];

    // The face normal is the plain component-wise average of the three
    // referenced normals, not re-normalized. Faces without a full set of
    // normal references keep the zero normal for downstream derivation.
    let normal = match (a.1, b.1, c.1) {
        (Some(na), Some(nb), Some(nc)) => {
            let sum = lookup(normals, na, "normal", line_number)?
                + lookup(normals, nb, "normal", line_number)?
                + lookup(normals, nc, "normal", line_number)?;
            sum / 3.0
        }
        _ => Vector3::zeros(),
    };

    Ok(Face::new(corners[0], corners[1], corners[2], normal))
}

/// One face reference: `v`, `v/n`, `v//n`, or `v/t/n`. The vertex index
/// is mandatory; the normal index, when present, is the last field.
fn parse_reference(token: &str, line_number: usize) -> Result<(usize, Option<usize>), LoadError> {
    let fields: Vec<&str> = token.split('/').filter(|field| !field.is_empty()).collect();

    let Some((&vertex_field, rest)) = fields.split_first() else {
        return Err(LoadError::format(line_number, "empty face reference"));
    };

    let vertex = parse_index(vertex_field, line_number)?;
    let normal = rest
        .last()
        .map(|&field| parse_index(field, line_number))
        .transpose()?;

    Ok((vertex, normal))
}

fn parse_index(field: &str, line_number: usize) -> Result<usize, LoadError> {
    field
        .parse::<usize>()
        .map_err(|_| LoadError::format(line_number, format!("invalid face index {field:?}")))
}

fn lookup<T: Copy>(
    table: &[T],
    index: usize,
    kind: &str,
    line_number: usize,
) -> Result<T, LoadError> {
    if index == 0 || index > table.len() {
        return Err(LoadError::format(
            line_number,
            format!("{kind} index {index} out of range (table has {})", table.len()),
        ));
    }
    Ok(table[index - 1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn single_triangle_without_normals() {
        let mesh = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        assert_eq!(mesh.face_count(), 1);
        let face = &mesh.faces[0];
        assert_eq!(face.vertices[0], Point3::new(0.0, 0.0, 0.0));
        assert_eq!(face.vertices[1], Point3::new(1.0, 0.0, 0.0));
        assert_eq!(face.vertices[2], Point3::new(0.0, 1.0, 0.0));
        assert_eq!(face.normal, Vector3::zeros());
    }

    #[test]
    fn face_count_matches_f_lines() {
        let input = "\
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
f 1 2 3
f 2 4 3
";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.faces[1].vertices[1], Point3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn normals_average_without_renormalizing() {
        let input = "\
v 0 0 0
v 1 0 0
v 0 1 0
vn 1 0 0
vn 0 1 0
vn 0 0 1
f 1//1 2//2 3//3
";
        let mesh = parse_obj(input).unwrap();
        let third = 1.0 / 3.0;
        assert_relative_eq!(
            mesh.faces[0].normal,
            Vector3::new(third, third, third),
            epsilon = 1e-6
        );
    }

    #[test]
    fn single_slash_variant_reads_normal_index() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1/1 2/1 3/1\n";
        let mesh = parse_obj(input).unwrap();
        assert_relative_eq!(mesh.faces[0].normal, Vector3::z(), epsilon = 1e-6);
    }

    #[test]
    fn partial_normal_references_leave_zero_normal() {
        let input = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2 3\n";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.faces[0].normal, Vector3::zeros());
    }

    #[test]
    fn two_reference_face_is_rejected() {
        let result = parse_obj("v 0 0 0\nv 1 0 0\nf 1 2\n");
        assert!(matches!(result, Err(LoadError::Format { line: 3, .. })));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let result = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 7\n");
        assert!(matches!(result, Err(LoadError::Format { line: 4, .. })));
    }

    #[test]
    fn non_integer_index_is_rejected() {
        let result = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 x\n");
        assert!(matches!(result, Err(LoadError::Format { .. })));
    }

    #[test]
    fn zero_index_is_rejected() {
        let result = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n");
        assert!(matches!(result, Err(LoadError::Format { .. })));
    }

    #[test]
    fn malformed_coordinates_degrade_to_zero() {
        let mesh = parse_obj("v oops 2 3\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.faces[0].vertices[0], Point3::new(0.0, 2.0, 3.0));
    }

    #[test]
    fn short_coordinate_lines_degrade_to_zero() {
        let mesh = parse_obj("v 1 2\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(mesh.faces[0].vertices[0], Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn unrecognized_statements_are_skipped() {
        let input = "\
# a comment
mtllib scene.mtl
v 0 0 0
v 1 0 0
vt 0 1
v 0 1 0
g part
f 1 2 3

";
        let mesh = parse_obj(input).unwrap();
        assert_eq!(mesh.face_count(), 1);
    }
}
