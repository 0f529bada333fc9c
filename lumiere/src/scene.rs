use std::sync::Arc;

use nalgebra::Unit;

use super::*;

/// A change to a scene's contents, applied between frames.
#[derive(Clone, Debug, PartialEq)]
pub enum SceneEdit {
    /// Places a new element centered on `anchor`.
    ///
    /// Placing a light source moves the existing one instead, if any.
    Place { kind: ElementKind, anchor: Point },
    /// Turns the element at `index` by `delta_degrees`.
    Rotate { index: usize, delta_degrees: Float },
    /// Moves the light source, if there is one.
    MoveLightSource { anchor: Point },
    /// Removes every element.
    Clear,
}

/// The element struck by a beam, and where.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneHit {
    /// Position of the element in the scene.
    pub index: usize,
    pub kind: ElementKind,
    pub t: Float,
    pub edge: Edge,
}

/// An ordered collection of optical elements.
///
/// Elements are shared behind an [`Arc`]: [snapshots](Self::snapshot) are cheap
/// and never observe later edits, which copy the collection if it is shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    elements: Arc<Vec<OpticalElement>>,
}

impl Scene {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[OpticalElement] {
        &self.elements
    }

    /// The current elements, unaffected by future changes to this scene.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> Arc<Vec<OpticalElement>> {
        Arc::clone(&self.elements)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The first light source in the scene, and its index.
    #[must_use]
    pub fn light_source(&self) -> Option<(usize, &OpticalElement)> {
        self.elements
            .iter()
            .enumerate()
            .find(|(_, e)| e.kind() == ElementKind::LightSource)
    }

    /// The point and direction new beams are emitted from, if there is a light source.
    #[inline]
    #[must_use]
    pub fn emission(&self) -> Option<(Point, Unit<Vector>)> {
        self.light_source().and_then(|(_, source)| source.emission())
    }

    /// Appends `element` to the scene, returning its index.
    pub fn push(&mut self, element: OpticalElement) -> usize {
        let elements = Arc::make_mut(&mut self.elements);
        elements.push(element);
        elements.len() - 1
    }

    /// Places an element of `kind`, with its default footprint, centered on `anchor`.
    ///
    /// There is only ever one light source: placing another one moves it instead.
    /// Returns the index of the placed element.
    pub fn place(&mut self, kind: ElementKind, anchor: impl Into<Point>) -> usize {
        let anchor = anchor.into();

        if kind == ElementKind::LightSource {
            if let Some((index, _)) = self.light_source() {
                log::debug!("moving light source to {anchor}");
                Arc::make_mut(&mut self.elements)[index].set_center(anchor);
                return index;
            }
        }

        log::debug!("placing {kind} at {anchor}");
        self.push(OpticalElement::footprint(kind, anchor))
    }

    /// Turns the element at `index` by `delta` degrees.
    ///
    /// Returns `false` if there is no such element.
    pub fn rotate(&mut self, index: usize, delta: Float) -> bool {
        if index >= self.elements.len() {
            log::debug!("no element at index {index} to rotate");
            return false;
        }

        let element = &mut Arc::make_mut(&mut self.elements)[index];
        element.rotate(delta);
        log::debug!(
            "rotated {} #{index} to {} degrees",
            element.kind(),
            element.rotation()
        );
        true
    }

    /// Moves the light source to `anchor`.
    ///
    /// Returns `false` if there is no light source.
    pub fn move_light_source(&mut self, anchor: impl Into<Point>) -> bool {
        match self.light_source() {
            Some((index, _)) => {
                Arc::make_mut(&mut self.elements)[index].set_center(anchor);
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        if !self.elements.is_empty() {
            self.elements = Arc::default();
        }
    }

    /// Applies `edit`, returning `true` if the scene changed.
    pub fn apply(&mut self, edit: SceneEdit) -> bool {
        match edit {
            SceneEdit::Place { kind, anchor } => {
                self.place(kind, anchor);
                true
            }
            SceneEdit::Rotate {
                index,
                delta_degrees,
            } => self.rotate(index, delta_degrees),
            SceneEdit::MoveLightSource { anchor } => self.move_light_source(anchor),
            SceneEdit::Clear => {
                let changed = !self.is_empty();
                self.clear();
                changed
            }
        }
    }

    /// The earliest edge, among all the elements, crossed by a point moving from `origin` by `step`.
    ///
    /// Elements are scanned in order, and ties keep the edge found first.
    #[must_use]
    pub fn earliest_hit(&self, origin: &Point, step: &Vector) -> Option<SceneHit> {
        let mut ctx = HitCtx::new(*origin, *step);
        let mut struck = None;

        for (index, element) in self.elements.iter().enumerate() {
            for edge in element.edges() {
                if ctx.add_edge(edge) {
                    struck = Some((index, element.kind()));
                }
            }
        }

        struck
            .zip(ctx.into_closest())
            .map(|((index, kind), EdgeHit { t, edge })| SceneHit {
                index,
                kind,
                t,
                edge,
            })
    }
}

impl FromIterator<OpticalElement> for Scene {
    fn from_iter<I: IntoIterator<Item = OpticalElement>>(iter: I) -> Self {
        Self {
            elements: Arc::new(iter.into_iter().collect()),
        }
    }
}

impl From<Vec<OpticalElement>> for Scene {
    fn from(elements: Vec<OpticalElement>) -> Self {
        Self {
            elements: Arc::new(elements),
        }
    }
}
