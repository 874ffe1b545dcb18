//! Keypoint matching seam.
//!
//! Feature detection is not part of this crate; a [`KeypointMatcher`] supplies
//! correspondences for a pair of grayscale images. [`ratio_test_matches`]
//! implements the usual nearest / second-nearest filter for callers that bring
//! their own descriptors.
use super::correspondences::CorrespondenceSet;
use crate::error::{CalibError, Result, Stage};
use crate::image::ImageU8;
use nalgebra::Vector2;

/// Lowe's ratio for accepting a nearest-neighbour match.
pub const DEFAULT_RATIO: f32 = 0.8;

/// Produces point correspondences from `source` to `target`.
pub trait KeypointMatcher {
    fn match_images(&self, source: &ImageU8<'_>, target: &ImageU8<'_>)
        -> Result<CorrespondenceSet>;
}

/// Serves a precomputed correspondence set regardless of the images.
#[derive(Clone, Debug, Default)]
pub struct StaticMatcher {
    set: CorrespondenceSet,
}

impl StaticMatcher {
    pub fn new(set: CorrespondenceSet) -> Self {
        Self { set }
    }
}

impl KeypointMatcher for StaticMatcher {
    fn match_images(
        &self,
        _source: &ImageU8<'_>,
        _target: &ImageU8<'_>,
    ) -> Result<CorrespondenceSet> {
        Ok(self.set.clone())
    }
}

/// A detected keypoint with its descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct Keypoint {
    pub pos: Vector2<f64>,
    pub descriptor: Vec<f32>,
}

fn l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f32>()
        .sqrt()
}

/// Brute-force L2 matching with a ratio test.
///
/// A source keypoint is matched to its nearest target keypoint only when
/// `best < ratio × second_best`. Fewer than two target keypoints give no
/// matches.
pub fn ratio_test_matches(
    source: &[Keypoint],
    target: &[Keypoint],
    ratio: f32,
) -> Result<CorrespondenceSet> {
    let dim = source
        .first()
        .or(target.first())
        .map_or(0, |k| k.descriptor.len());
    if source
        .iter()
        .chain(target)
        .any(|k| k.descriptor.len() != dim)
    {
        return Err(CalibError::validation(
            Stage::Propagate,
            None,
            "keypoint descriptors differ in length",
        ));
    }
    if target.len() < 2 {
        return Ok(CorrespondenceSet::default());
    }

    let mut pairs = Vec::new();
    for s in source {
        let mut best = (f32::INFINITY, 0usize);
        let mut second = f32::INFINITY;
        for (j, t) in target.iter().enumerate() {
            let d = l2(&s.descriptor, &t.descriptor);
            if d < best.0 {
                second = best.0;
                best = (d, j);
            } else if d < second {
                second = d;
            }
        }
        if best.0 < ratio * second {
            pairs.push((s.pos, target[best.1].pos));
        }
    }
    Ok(CorrespondenceSet::from_pairs(pairs))
}
