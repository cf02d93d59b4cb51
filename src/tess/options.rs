// Copyright 2025 Lars Brubaker
// License: SGI Free Software License B (MIT-compatible)

use crate::geom::Real;

/// Decides which winding numbers count as inside.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WindingRule {
    Odd,
    NonZero,
    Positive,
    Negative,
    AbsGeqTwo,
}

impl WindingRule {
    pub fn is_inside(self, n: i32) -> bool {
        match self {
            WindingRule::Odd => n & 1 != 0,
            WindingRule::NonZero => n != 0,
            WindingRule::Positive => n > 0,
            WindingRule::Negative => n < 0,
            WindingRule::AbsGeqTwo => n >= 2 || n <= -2,
        }
    }
}

/// Shape of the tessellation output.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// Convex polygons of at most `poly_size` vertices.
    Polygons,
    /// As `Polygons`, each followed by the index of the polygon across each edge.
    ConnectedPolygons,
    /// Closed boundary loops of the filled region, as `(start, count)` pairs.
    BoundaryContours,
}

/// Parameters of one tessellation run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TessOptions {
    /// Default value: `Odd`.
    pub winding_rule: WindingRule,

    /// Default value: `Polygons`.
    pub element_type: ElementType,

    /// Maximum vertices per output polygon, at least 3. Triangles are merged
    /// into convex polygons up to this size.
    ///
    /// Default value: `3`.
    pub poly_size: usize,

    /// Components per output vertex, 2 or 3.
    ///
    /// Default value: `2`.
    pub vertex_size: usize,

    /// Projection normal. `None`, or a zero vector, computes one from the input.
    pub normal: Option<[Real; 3]>,

    /// Verify mesh consistency after the sweep and after finalization.
    ///
    /// Default value: `true` in debug builds.
    pub check_mesh: bool,
}

impl TessOptions {
    pub const DEFAULT_POLY_SIZE: usize = 3;
    pub const DEFAULT_VERTEX_SIZE: usize = 2;
    pub const DEFAULT_WINDING_RULE: WindingRule = WindingRule::Odd;

    pub const DEFAULT: Self = TessOptions {
        winding_rule: Self::DEFAULT_WINDING_RULE,
        element_type: ElementType::Polygons,
        poly_size: Self::DEFAULT_POLY_SIZE,
        vertex_size: Self::DEFAULT_VERTEX_SIZE,
        normal: None,
        check_mesh: cfg!(debug_assertions),
    };

    pub fn triangles() -> Self {
        Self::DEFAULT
    }

    pub fn boundary() -> Self {
        Self::DEFAULT.with_element_type(ElementType::BoundaryContours)
    }

    pub const fn with_winding_rule(mut self, rule: WindingRule) -> Self {
        self.winding_rule = rule;
        self
    }

    pub const fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    pub const fn with_poly_size(mut self, poly_size: usize) -> Self {
        self.poly_size = poly_size;
        self
    }

    pub const fn with_vertex_size(mut self, vertex_size: usize) -> Self {
        self.vertex_size = vertex_size;
        self
    }

    pub const fn with_normal(mut self, normal: [Real; 3]) -> Self {
        self.normal = Some(normal);
        self
    }

    pub const fn with_mesh_check(mut self, check: bool) -> Self {
        self.check_mesh = check;
        self
    }
}

impl Default for TessOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}
