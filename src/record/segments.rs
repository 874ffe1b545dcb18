use crate::error::{CalibError, Result, Stage};
use crate::types::{Axis, PixelEdge, PixelPoint};

/// Per-axis guide points, validated so every axis holds whole edges.
///
/// Points are stored flat; consecutive pairs `(2j, 2j+1)` form edge `j`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GuideSegments {
    axes: [Vec<PixelPoint>; 3],
}

impl GuideSegments {
    /// Validate axis parity. Empty axes are accepted here; how many may be
    /// empty is decided by the classifier.
    pub fn new(axes: [Vec<PixelPoint>; 3]) -> Result<Self> {
        for axis in Axis::ALL {
            let n = axes[axis.index()].len();
            if n % 2 != 0 {
                return Err(CalibError::validation(
                    Stage::Classify,
                    Some(axis),
                    format!("odd number of guide points ({n})"),
                ));
            }
        }
        Ok(Self { axes })
    }

    /// Build from per-axis edge lists; always well formed.
    pub fn from_edges(edges: [Vec<PixelEdge>; 3]) -> Self {
        let axes = edges.map(|list| list.iter().flat_map(|e| [e.p0, e.p1]).collect());
        Self { axes }
    }

    #[inline]
    pub fn points(&self, axis: Axis) -> &[PixelPoint] {
        &self.axes[axis.index()]
    }

    #[inline]
    pub fn is_empty_axis(&self, axis: Axis) -> bool {
        self.axes[axis.index()].is_empty()
    }

    #[inline]
    pub fn edge_count(&self, axis: Axis) -> usize {
        self.axes[axis.index()].len() / 2
    }

    pub fn edges(&self, axis: Axis) -> impl Iterator<Item = PixelEdge> + '_ {
        self.axes[axis.index()]
            .chunks_exact(2)
            .map(|pair| PixelEdge::new(pair[0], pair[1]))
    }

    pub fn edges_by_axis(&self) -> [Vec<PixelEdge>; 3] {
        Axis::ALL.map(|axis| self.edges(axis).collect())
    }

    /// Apply a point transform (e.g. a canvas mapping) to every guide point.
    pub fn map_points(&self, f: impl Fn(PixelPoint) -> PixelPoint) -> Self {
        let axes = Axis::ALL.map(|axis| self.points(axis).iter().map(|&p| f(p)).collect());
        Self { axes }
    }

    pub fn total_edges(&self) -> usize {
        Axis::ALL.iter().map(|&a| self.edge_count(a)).sum()
    }

    pub fn into_axes(self) -> [Vec<PixelPoint>; 3] {
        self.axes
    }
}
