//! Primitive modes selectable at runtime and their mapping onto the
//! topologies a modern pipeline can draw natively.

use std::fmt;

use corelib::{CoreError, CoreResult};

/// Native pipeline topology.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Topology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
}

impl Topology {
    pub const ALL: [Topology; 5] = [
        Topology::PointList,
        Topology::LineList,
        Topology::LineStrip,
        Topology::TriangleList,
        Topology::TriangleStrip,
    ];

    pub fn is_strip(self) -> bool {
        matches!(self, Topology::LineStrip | Topology::TriangleStrip)
    }
}

/// The ten classic primitive modes, in digit-key order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Primitive {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    Quads,
    QuadStrip,
    Polygon,
}

impl Primitive {
    pub const ALL: [Primitive; 10] = [
        Primitive::Points,
        Primitive::Lines,
        Primitive::LineLoop,
        Primitive::LineStrip,
        Primitive::Triangles,
        Primitive::TriangleStrip,
        Primitive::TriangleFan,
        Primitive::Quads,
        Primitive::QuadStrip,
        Primitive::Polygon,
    ];

    /// Mode bound to number key `digit`.
    pub fn from_digit(digit: u32) -> CoreResult<Self> {
        Self::ALL
            .get(digit as usize)
            .copied()
            .ok_or(CoreError::PrimitiveOutOfRange(digit))
    }

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Points => "GL_POINTS",
            Primitive::Lines => "GL_LINES",
            Primitive::LineLoop => "GL_LINE_LOOP",
            Primitive::LineStrip => "GL_LINE_STRIP",
            Primitive::Triangles => "GL_TRIANGLES",
            Primitive::TriangleStrip => "GL_TRIANGLE_STRIP",
            Primitive::TriangleFan => "GL_TRIANGLE_FAN",
            Primitive::Quads => "GL_QUADS",
            Primitive::QuadStrip => "GL_QUAD_STRIP",
            Primitive::Polygon => "GL_POLYGON",
        }
    }

    pub fn topology(self) -> Topology {
        match self {
            Primitive::Points => Topology::PointList,
            Primitive::Lines => Topology::LineList,
            Primitive::LineLoop | Primitive::LineStrip => Topology::LineStrip,
            Primitive::Triangles
            | Primitive::TriangleFan
            | Primitive::Quads
            | Primitive::Polygon => Topology::TriangleList,
            Primitive::TriangleStrip | Primitive::QuadStrip => Topology::TriangleStrip,
        }
    }

    /// Rewrites an element sequence so that drawing it with [`Self::topology`]
    /// produces what this mode would draw. Incomplete trailing primitives are
    /// dropped.
    pub fn expand(self, seq: &[u32]) -> Vec<u32> {
        match self {
            Primitive::Points | Primitive::LineStrip | Primitive::TriangleStrip => seq.to_vec(),
            Primitive::Lines => seq[..seq.len() - seq.len() % 2].to_vec(),
            Primitive::Triangles => seq[..seq.len() - seq.len() % 3].to_vec(),
            Primitive::QuadStrip => {
                if seq.len() < 4 {
                    Vec::new()
                } else {
                    seq[..seq.len() - seq.len() % 2].to_vec()
                }
            }
            Primitive::LineLoop => match seq.first() {
                Some(&first) if seq.len() >= 2 => {
                    let mut out = seq.to_vec();
                    out.push(first);
                    out
                }
                _ => Vec::new(),
            },
            Primitive::TriangleFan | Primitive::Polygon => {
                if seq.len() < 3 {
                    return Vec::new();
                }
                (1..seq.len() - 1)
                    .flat_map(|i| [seq[0], seq[i], seq[i + 1]])
                    .collect()
            }
            Primitive::Quads => seq
                .chunks_exact(4)
                .flat_map(|q| [q[0], q[1], q[2], q[0], q[2], q[3]])
                .collect(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
