/// Wavefront OBJ import into non-indexed meshes
use log::{debug, info, warn};
use nom::{
    bytes::complete::{tag, take_till1},
    character::complete::{i64 as index, space0, space1},
    combinator::{all_consuming, map, opt, rest, value},
    multi::separated_list1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use vmesh_core::{MeshData, Vec2, Vec3};

#[derive(Error, Debug)]
pub enum ObjError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: index {index} does not name an earlier element")]
    IndexOutOfRange { line: usize, index: i64 },
}

/// One `v/t/n` corner of a face, as written in the file (1-based or negative)
#[derive(Debug, Clone, Copy, PartialEq)]
struct FaceVertex {
    position: i64,
    tex_coord: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Position(Vec3),
    TexCoord(Vec2),
    Normal(Vec3),
    Face(Vec<FaceVertex>),
    MaterialLibrary(Vec<String>),
    UseMaterial(String),
    /// Grouping, smoothing and anything else we do not draw
    Ignored,
}

/// Ambient colors of named materials, as read from `.mtl` files
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialLibrary {
    ambient: HashMap<String, Vec3>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, ambient: Vec3) {
        self.ambient.insert(name.into(), ambient);
    }

    pub fn ambient(&self, name: &str) -> Option<Vec3> {
        self.ambient.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ambient.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ambient.is_empty()
    }

    /// Add every material of `other`, replacing same-named ones
    pub fn merge(&mut self, other: MaterialLibrary) {
        self.ambient.extend(other.ambient);
    }
}

#[derive(Debug, Clone, PartialEq)]
enum MtlStatement {
    NewMaterial(String),
    Ambient(Vec3),
    Ignored,
}

fn parse_vector3(input: &str) -> IResult<&str, Vec3> {
    map(
        tuple((
            preceded(space1, float),
            preceded(space1, float),
            preceded(space1, float),
        )),
        |(x, y, z)| Vec3::new(x, y, z),
    )(input)
}

fn parse_position(input: &str) -> IResult<&str, Vec3> {
    // Optional homogeneous weight is dropped
    terminated(parse_vector3, opt(preceded(space1, float)))(input)
}

fn parse_tex_coord(input: &str) -> IResult<&str, Vec2> {
    // Optional third (w) component is dropped
    let (input, (u, v)) = pair(preceded(space1, float), preceded(space1, float))(input)?;
    let (input, _) = opt(preceded(space1, float))(input)?;
    Ok((input, Vec2::new(u, v)))
}

fn parse_face_vertex(input: &str) -> IResult<&str, FaceVertex> {
    let (input, position) = index(input)?;
    let (input, slots) = opt(preceded(
        tag("/"),
        pair(opt(index), opt(preceded(tag("/"), index))),
    ))(input)?;
    let (tex_coord, normal) = slots.unwrap_or((None, None));
    Ok((
        input,
        FaceVertex {
            position,
            tex_coord,
            normal,
        },
    ))
}

fn parse_face(input: &str) -> IResult<&str, Vec<FaceVertex>> {
    preceded(space1, separated_list1(space1, parse_face_vertex))(input)
}

fn parse_statement(input: &str) -> IResult<&str, Statement> {
    let (input, keyword) = take_till1(|c: char| c.is_whitespace())(input)?;
    match keyword {
        "v" => map(parse_position, Statement::Position)(input),
        "vt" => map(parse_tex_coord, Statement::TexCoord)(input),
        "vn" => map(parse_vector3, Statement::Normal)(input),
        "f" => map(parse_face, Statement::Face)(input),
        "mtllib" => map(
            preceded(space1, separated_list1(space1, take_till1(|c: char| c.is_whitespace()))),
            |names: Vec<&str>| Statement::MaterialLibrary(names.into_iter().map(String::from).collect()),
        )(input),
        "usemtl" => map(preceded(space1, rest), |name: &str| {
            Statement::UseMaterial(name.trim().to_string())
        })(input),
        _ => value(Statement::Ignored, rest)(input),
    }
}

fn parse_mtl_statement(input: &str) -> IResult<&str, MtlStatement> {
    let (input, keyword) = take_till1(|c: char| c.is_whitespace())(input)?;
    match keyword {
        "newmtl" => map(preceded(space1, rest), |name: &str| {
            MtlStatement::NewMaterial(name.trim().to_string())
        })(input),
        "Ka" => map(parse_vector3, MtlStatement::Ambient)(input),
        _ => value(MtlStatement::Ignored, rest)(input),
    }
}

fn parse_line(line: &str) -> IResult<&str, Statement> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(("", Statement::Ignored));
    }
    all_consuming(terminated(parse_statement, space0))(content)
}

fn parse_mtl_line(line: &str) -> IResult<&str, MtlStatement> {
    let content = line.split('#').next().unwrap_or_default().trim();
    if content.is_empty() {
        return Ok(("", MtlStatement::Ignored));
    }
    all_consuming(terminated(parse_mtl_statement, space0))(content)
}

fn parse_error(line: usize, e: nom::Err<nom::error::Error<&str>>) -> ObjError {
    ObjError::Parse {
        line,
        message: format!("{e:?}"),
    }
}

/// Parse MTL text; only `newmtl` and the ambient color `Ka` are read
pub fn parse_mtl(input: &str) -> Result<MaterialLibrary, ObjError> {
    let mut library = MaterialLibrary::new();
    let mut current: Option<String> = None;

    for (line_no, line) in input.lines().enumerate() {
        let (_, statement) = parse_mtl_line(line).map_err(|e| parse_error(line_no + 1, e))?;
        match statement {
            MtlStatement::NewMaterial(name) => {
                // Materials without `Ka` stay white
                library.insert(name.clone(), Vec3::splat(1.0));
                current = Some(name);
            }
            MtlStatement::Ambient(color) => match &current {
                Some(name) => library.insert(name.clone(), color),
                None => {
                    return Err(ObjError::Parse {
                        line: line_no + 1,
                        message: "`Ka` before any `newmtl`".to_string(),
                    })
                }
            },
            MtlStatement::Ignored => {}
        }
    }
    Ok(library)
}

/// Resolve a 1-based or negative (relative to the end) OBJ reference
fn resolve(reference: i64, len: usize, line: usize) -> Result<usize, ObjError> {
    let out_of_range = || ObjError::IndexOutOfRange {
        line,
        index: reference,
    };
    let resolved = match reference {
        0 => return Err(out_of_range()),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < len)
        .ok_or_else(out_of_range)
}

/// Parse OBJ text into a [`MeshData`] with every vertex white
pub fn parse_obj(input: &str) -> Result<MeshData, ObjError> {
    parse_obj_with_materials(input, &MaterialLibrary::new())
}

/// Parse OBJ text into a [`MeshData`].
///
/// Polygons are fan-triangulated from their first corner. Faces that do not
/// reference normals get their geometric face normal. Vertices take the
/// ambient color of the active `usemtl` material, or white when there is
/// none. Texture coordinates are kept only when every face corner
/// references one.
pub fn parse_obj_with_materials(
    input: &str,
    materials: &MaterialLibrary,
) -> Result<MeshData, ObjError> {
    let mut positions = Vec::new();
    let mut tex_coords = Vec::new();
    let mut normals = Vec::new();

    let mut mesh = MeshData::new();
    let mut mesh_tex_coords = Vec::new();
    let mut all_textured = true;
    let mut color = Vec3::splat(1.0);

    for (line_no, line) in input.lines().enumerate() {
        let line_no = line_no + 1;
        let (_, statement) = parse_line(line).map_err(|e| parse_error(line_no, e))?;

        let face = match statement {
            Statement::Position(p) => {
                positions.push(p);
                continue;
            }
            Statement::TexCoord(t) => {
                tex_coords.push(t);
                continue;
            }
            Statement::Normal(n) => {
                normals.push(n);
                continue;
            }
            Statement::UseMaterial(name) => {
                color = materials.ambient(&name).unwrap_or_else(|| {
                    debug!("line {line_no}: unknown material `{name}`, using white");
                    Vec3::splat(1.0)
                });
                continue;
            }
            Statement::MaterialLibrary(_) | Statement::Ignored => continue,
            Statement::Face(face) => face,
        };

        if face.len() < 3 {
            return Err(ObjError::Parse {
                line: line_no,
                message: format!("face has {} vertices, at least 3 are required", face.len()),
            });
        }

        for i in 1..face.len() - 1 {
            let corners = [face[0], face[i], face[i + 1]];

            let mut tri_positions = [Vec3::ZERO; 3];
            for (slot, corner) in tri_positions.iter_mut().zip(&corners) {
                *slot = positions[resolve(corner.position, positions.len(), line_no)?];
            }

            let face_normal = {
                let [a, b, c] = tri_positions;
                (b - a).cross(c - a).normalize()
            };

            for (corner, &position) in corners.iter().zip(&tri_positions) {
                let normal = match corner.normal {
                    Some(r) => normals[resolve(r, normals.len(), line_no)?],
                    None => face_normal,
                };
                match corner.tex_coord {
                    Some(r) => mesh_tex_coords.push(tex_coords[resolve(r, tex_coords.len(), line_no)?]),
                    None => all_textured = false,
                }

                mesh.positions.push(position);
                mesh.normals.push(normal);
                mesh.colors.push(color);
            }
        }
    }

    if all_textured {
        mesh.tex_coords = mesh_tex_coords;
    } else if !mesh_tex_coords.is_empty() {
        debug!("some faces lack texture coordinates, dropping the texture stream");
    }

    Ok(mesh)
}

/// `mtllib` file names referenced by OBJ text, in order
fn material_libraries(input: &str) -> Vec<String> {
    input
        .lines()
        .filter_map(|line| match parse_line(line) {
            Ok((_, Statement::MaterialLibrary(names))) => Some(names),
            _ => None,
        })
        .flatten()
        .collect()
}

pub fn load_mtl<P: AsRef<Path>>(path: P) -> Result<MaterialLibrary, ObjError> {
    parse_mtl(&std::fs::read_to_string(path)?)
}

/// Read and parse an OBJ file.
///
/// `mtllib` files are looked up next to the OBJ file. A library that cannot
/// be read is skipped with a warning and its faces stay white.
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshData, ObjError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut materials = MaterialLibrary::new();
    for name in material_libraries(&text) {
        match load_mtl(dir.join(&name)) {
            Ok(library) => materials.merge(library),
            Err(e) => warn!("skipping material library {name}: {e}"),
        }
    }

    let mesh = parse_obj_with_materials(&text, &materials)?;
    info!(
        "loaded {} triangles from {}",
        mesh.triangle_count(),
        path.display()
    );
    Ok(mesh)
}
