//! Parser for the `.mesh` polygon format
//!
//! ```text
//! vlist <N>
//! <x> <y> <z>            (N times)
//! nlist <M>
//! <x> <y> <z>            (M times)
//! flist <F>
//! <K> <v1> <n1> ... <vK> <nK>   (F times, K is 3 or 4)
//! ```
//!
//! Tokens are whitespace delimited. A face record with an unsupported vertex
//! count is kept as [`FaceRecord::Invalid`] and its index pairs skipped.

use super::{Face, FaceCorner, FaceRecord, Mesh};
use glam::Vec3;
use nom::{
    bytes::complete::take_till1,
    character::complete::{i64 as parse_i64, multispace0, not_line_ending, u32 as parse_u32},
    number::complete::float,
    sequence::{preceded, tuple},
    IResult,
};
use thiserror::Error;

/// Section labels in the order they must appear
pub const SECTIONS: [&str; 3] = ["vlist", "nlist", "flist"];

const MAX_RESERVED_FACES: u32 = 4096;

/// Which list an out-of-range face index points into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    Normal,
}

impl std::fmt::Display for IndexKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Normal => write!(f, "normal"),
        }
    }
}

/// Structural errors in mesh text. Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("no {expected} in mesh file (line {line})")]
    MissingSection { expected: &'static str, line: usize },
    #[error("expected {expected} section but found {found} (line {line})")]
    SectionOutOfOrder {
        expected: &'static str,
        found: String,
        line: usize,
    },
    #[error("expected {expected} on line {line}")]
    Malformed { expected: &'static str, line: usize },
    #[error("mesh file ended early, expected {expected} (line {line})")]
    UnexpectedEof { expected: &'static str, line: usize },
    #[error("{kind} index {index} out of range (list has {len}) on line {line}")]
    IndexOutOfRange {
        kind: IndexKind,
        index: u32,
        len: usize,
        line: usize,
    },
}

/// Input position tracker mapping nom failures to line numbers
struct Cursor<'a> {
    rest: &'a str,
    /// Newlines consumed so far
    newlines: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            rest: source,
            newlines: 0,
        }
    }

    /// Line of the next token (after skipping whitespace)
    fn line(&self) -> usize {
        let rest = self.rest.trim_start();
        let skipped = &self.rest[..self.rest.len() - rest.len()];
        self.newlines + skipped.matches('\n').count() + 1
    }

    fn advance(&mut self, rest: &'a str) {
        let consumed = &self.rest[..self.rest.len() - rest.len()];
        self.newlines += consumed.matches('\n').count();
        self.rest = rest;
    }

    fn parse<T>(
        &mut self,
        mut parser: impl FnMut(&'a str) -> IResult<&'a str, T>,
        expected: &'static str,
    ) -> Result<T, ParseError> {
        match parser(self.rest) {
            Ok((rest, value)) => {
                self.advance(rest);
                Ok(value)
            }
            Err(_) if self.at_end() => Err(ParseError::UnexpectedEof {
                expected,
                line: self.line(),
            }),
            Err(_) => Err(ParseError::Malformed {
                expected,
                line: self.line(),
            }),
        }
    }

    fn token(&mut self) -> Option<&'a str> {
        let (rest, tok) = token(self.rest).ok()?;
        self.advance(rest);
        Some(tok)
    }

    fn skip_line(&mut self) {
        if let Ok((rest, _)) = not_line_ending::<&str, nom::error::Error<&str>>(self.rest) {
            self.advance(rest);
        }
    }

    fn at_end(&self) -> bool {
        self.rest.trim().is_empty()
    }
}

fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_till1(char::is_whitespace))(input)
}

fn count(input: &str) -> IResult<&str, u32> {
    preceded(multispace0, parse_u32)(input)
}

fn vec3(input: &str) -> IResult<&str, Vec3> {
    let (rest, (x, y, z)) = tuple((
        preceded(multispace0, float),
        preceded(multispace0, float),
        preceded(multispace0, float),
    ))(input)?;
    Ok((rest, Vec3::new(x, y, z)))
}

fn vertex_count(input: &str) -> IResult<&str, i64> {
    preceded(multispace0, parse_i64)(input)
}

fn index_pair(input: &str) -> IResult<&str, (u32, u32)> {
    tuple((preceded(multispace0, parse_u32), preceded(multispace0, parse_u32)))(input)
}

fn expect_section(cursor: &mut Cursor<'_>, position: usize) -> Result<(), ParseError> {
    let expected = SECTIONS[position];
    let line = cursor.line();
    match cursor.token() {
        Some(label) if label == expected => Ok(()),
        Some(label) if SECTIONS.contains(&label) => Err(ParseError::SectionOutOfOrder {
            expected,
            found: label.to_string(),
            line,
        }),
        _ => Err(ParseError::MissingSection { expected, line }),
    }
}

fn vector_list<'a>(
    cursor: &mut Cursor<'a>,
    position: usize,
    what: &'static str,
) -> Result<Vec<Vec3>, ParseError> {
    expect_section(cursor, position)?;
    let n = cursor.parse(count, "list count")?;
    (0..n).map(|_| cursor.parse(vec3, what)).collect()
}

fn check_index(kind: IndexKind, index: u32, len: usize, line: usize) -> Result<u32, ParseError> {
    if (index as usize) < len {
        Ok(index)
    } else {
        Err(ParseError::IndexOutOfRange {
            kind,
            index,
            len,
            line,
        })
    }
}

pub(super) fn parse_mesh(source: &str) -> Result<Mesh, ParseError> {
    let mut cursor = Cursor::new(source);

    let vertices = vector_list(&mut cursor, 0, "vertex coordinates")?;
    let normals = vector_list(&mut cursor, 1, "normal components")?;

    expect_section(&mut cursor, 2)?;
    let face_count = cursor.parse(count, "face count")?;
    // The count is untrusted until the faces are actually read
    let mut faces = Vec::with_capacity(face_count.min(MAX_RESERVED_FACES) as usize);

    for _ in 0..face_count {
        let line = cursor.line();
        let declared = cursor.parse(vertex_count, "face vertex count")?;

        if !(Face::MIN_CORNERS as i64..=Face::MAX_CORNERS as i64).contains(&declared) {
            log::warn!("Mesh invalid: face on line {line} declares {declared} vertices");
            if declared > 0 {
                for _ in 0..declared.saturating_mul(2) {
                    if cursor.token().is_none() {
                        break;
                    }
                }
            } else {
                cursor.skip_line();
            }
            faces.push(FaceRecord::Invalid { declared, line });
            continue;
        }

        let mut corners = Vec::with_capacity(declared as usize);
        for _ in 0..declared {
            let line = cursor.line();
            let (v, n) = cursor.parse(index_pair, "vertex/normal index pair")?;
            corners.push(FaceCorner {
                vertex: check_index(IndexKind::Vertex, v, vertices.len(), line)?,
                normal: check_index(IndexKind::Normal, n, normals.len(), line)?,
            });
        }
        faces.push(FaceRecord::Valid(Face { corners }));
    }

    if !cursor.at_end() {
        log::debug!("Ignoring trailing data after flist (line {})", cursor.line());
    }

    Ok(Mesh {
        vertices,
        normals,
        faces,
    })
}
