use core::{fmt, iter};

use either::Either;
use nalgebra::Unit;

use super::*;

/// The kinds of optical elements that can be placed in a scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    LightSource,
    Mirror,
    Prism,
    ConvexLens,
    ConcaveLens,
}

impl ElementKind {
    pub const ALL: [Self; 5] = [
        Self::LightSource,
        Self::Mirror,
        Self::Prism,
        Self::ConvexLens,
        Self::ConcaveLens,
    ];

    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LightSource => "light_source",
            Self::Mirror => "mirror",
            Self::Prism => "prism",
            Self::ConvexLens => "convex_lens",
            Self::ConcaveLens => "concave_lens",
        }
    }

    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The outline of a lens: a quad whose left and right sides are replaced by curves.
#[derive(Clone, Debug, PartialEq)]
pub struct Lens {
    /// `[bl, br, tr, tl]`
    pub corners: [Point; 4],
    pub faces: LensFaces,
}

impl Lens {
    #[must_use]
    pub fn convex(half_width: Float, half_height: Float, bulge: Float) -> Self {
        let corners = quad(half_width, half_height);
        let faces = LensFaces::convex(
            &corners,
            &Point::new(-half_width - bulge, 0.0),
            &Point::new(half_width + bulge, 0.0),
        );
        Self { corners, faces }
    }

    #[must_use]
    pub fn concave(half_width: Float, half_height: Float) -> Self {
        let corners = quad(half_width, half_height);
        let faces = LensFaces::concave(&corners, &Point::origin());
        Self { corners, faces }
    }

    /// The outline, counter-clockwise, starting at the bottom left corner.
    ///
    /// Corners shared with the faces are not repeated.
    pub fn outline(&self) -> impl Iterator<Item = &Point> + '_ {
        let [bl, _, _, _] = &self.corners;
        iter::once(bl)
            .chain(&self.faces.right)
            .chain(&self.faces.left[..CURVE_SAMPLES - 1])
    }

    fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        let [bl, br, tr, tl] = self.corners;
        iter::once(Edge::new(bl, br))
            .chain(polyline_edges(&self.faces.right))
            .chain(iter::once(Edge::new(tr, tl)))
            .chain(polyline_edges(&self.faces.left))
    }
}

fn quad(half_width: Float, half_height: Float) -> [Point; 4] {
    [
        Point::new(-half_width, -half_height),
        Point::new(half_width, -half_height),
        Point::new(half_width, half_height),
        Point::new(-half_width, half_height),
    ]
}

fn polyline_edges(points: &[Point]) -> impl Iterator<Item = Edge> + '_ {
    points.windows(2).map(|w| Edge::new(w[0], w[1]))
}

fn polygon_edges(points: &[Point]) -> impl Iterator<Item = Edge> + '_ {
    points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(&p1, &p2)| Edge::new(p1, p2))
}

/// The local geometry of an element, one variant per [`ElementKind`].
///
/// Polygon corners are listed counter-clockwise, so that every edge's
/// [normal](Edge::normal) points out of the element.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    LightSource([Point; 4]),
    Mirror([Point; 4]),
    Prism([Point; 3]),
    ConvexLens(Lens),
    ConcaveLens(Lens),
}

impl Shape {
    /// The default footprint of `kind`, centered on the local origin.
    #[must_use]
    pub fn footprint(kind: ElementKind) -> Self {
        match kind {
            ElementKind::LightSource => Self::LightSource(quad(25.0, 25.0)),
            ElementKind::Mirror => Self::Mirror(quad(5.0, 30.0)),
            ElementKind::Prism => Self::Prism([
                Point::new(-25.0, -25.0),
                Point::new(25.0, -25.0),
                Point::new(0.0, 25.0),
            ]),
            ElementKind::ConvexLens => Self::ConvexLens(Lens::convex(5.0, 30.0, 10.0)),
            ElementKind::ConcaveLens => Self::ConcaveLens(Lens::concave(10.0, 30.0)),
        }
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::LightSource(_) => ElementKind::LightSource,
            Self::Mirror(_) => ElementKind::Mirror,
            Self::Prism(_) => ElementKind::Prism,
            Self::ConvexLens(_) => ElementKind::ConvexLens,
            Self::ConcaveLens(_) => ElementKind::ConcaveLens,
        }
    }

    /// The outline of this shape in local coordinates, counter-clockwise.
    pub fn outline(&self) -> impl Iterator<Item = &Point> + '_ {
        match self {
            Self::LightSource(c) | Self::Mirror(c) => Either::Left(c.iter()),
            Self::Prism(c) => Either::Left(c.iter()),
            Self::ConvexLens(lens) | Self::ConcaveLens(lens) => Either::Right(lens.outline()),
        }
    }

    /// Every edge of this shape in local coordinates, in outline order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        match self {
            Self::LightSource(c) | Self::Mirror(c) => Either::Left(polygon_edges(c)),
            Self::Prism(c) => Either::Left(polygon_edges(c)),
            Self::ConvexLens(lens) | Self::ConcaveLens(lens) => Either::Right(lens.edges()),
        }
    }
}

/// An optical element placed in the scene.
///
/// The geometry is stored in the element's local frame; its scene-space position is
/// always derived from the current `center` and `rotation`, so nothing needs to be
/// recomputed when either of them changes.
#[derive(Clone, Debug, PartialEq)]
pub struct OpticalElement {
    shape: Shape,
    center: Point,
    /// In degrees, counter-clockwise.
    rotation: Float,
}

impl OpticalElement {
    #[inline]
    #[must_use]
    pub fn new(shape: Shape, center: impl Into<Point>) -> Self {
        Self {
            shape,
            center: center.into(),
            rotation: 0.0,
        }
    }

    /// An element of `kind`, with its default footprint, centered on `anchor`.
    #[inline]
    #[must_use]
    pub fn footprint(kind: ElementKind, anchor: impl Into<Point>) -> Self {
        Self::new(Shape::footprint(kind), anchor)
    }

    #[inline]
    #[must_use]
    pub fn with_rotation(mut self, degrees: Float) -> Self {
        self.rotation = degrees;
        self
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> &Shape {
        &self.shape
    }

    #[inline]
    #[must_use]
    pub const fn center(&self) -> &Point {
        &self.center
    }

    #[inline]
    pub fn set_center(&mut self, center: impl Into<Point>) {
        self.center = center.into();
    }

    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Float {
        self.rotation
    }

    /// Adds `delta` degrees to this element's rotation.
    #[inline]
    pub fn rotate(&mut self, delta: Float) {
        self.rotation += delta;
    }

    #[inline]
    #[must_use]
    pub fn world_point(&self, local: &Point) -> Point {
        world_point(local, &self.center, self.rotation)
    }

    /// The outline of this element, in scene coordinates, counter-clockwise.
    pub fn world_outline(&self) -> impl Iterator<Item = Point> + '_ {
        self.shape.outline().map(|p| self.world_point(p))
    }

    /// The left and right faces of this element in scene coordinates, if it is a lens.
    #[must_use]
    pub fn world_faces(&self) -> Option<(Curve, Curve)> {
        match &self.shape {
            Shape::ConvexLens(lens) | Shape::ConcaveLens(lens) => Some((
                lens.faces.left.map(|p| self.world_point(&p)),
                lens.faces.right.map(|p| self.world_point(&p)),
            )),
            _ => None,
        }
    }

    /// Every edge of this element, in scene coordinates.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.shape
            .edges()
            .map(|e| Edge::new(self.world_point(&e.p1), self.world_point(&e.p2)))
    }

    /// The point light leaves this element from, and the direction it leaves in,
    /// if it is a light source.
    ///
    /// Light is emitted from the middle of the right side, along its outward normal.
    #[must_use]
    pub fn emission(&self) -> Option<(Point, Unit<Vector>)> {
        let Shape::LightSource([_, br, tr, _]) = &self.shape else {
            return None;
        };

        let side = Edge::new(self.world_point(br), self.world_point(tr));
        side.unit_normal()
            .map(|normal| (Point::from((side.p1.coords + side.p2.coords) * 0.5), normal))
    }
}
