use crate::error::{CalibError, Result, Stage};
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

/// Matched points between two images, in each image's native pixels.
///
/// `source[i]` corresponds to `target[i]`. The set may be empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CorrespondenceSet {
    source: Vec<Vector2<f64>>,
    target: Vec<Vector2<f64>>,
}

#[derive(Deserialize)]
struct RawCorrespondences {
    source: Vec<Vector2<f64>>,
    target: Vec<Vector2<f64>>,
}

impl<'de> Deserialize<'de> for CorrespondenceSet {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawCorrespondences::deserialize(deserializer)?;
        CorrespondenceSet::new(raw.source, raw.target).map_err(serde::de::Error::custom)
    }
}

impl CorrespondenceSet {
    pub fn new(source: Vec<Vector2<f64>>, target: Vec<Vector2<f64>>) -> Result<Self> {
        if source.len() != target.len() {
            return Err(CalibError::validation(
                Stage::Propagate,
                None,
                format!(
                    "correspondence lists differ in length ({} vs {})",
                    source.len(),
                    target.len()
                ),
            ));
        }
        Ok(Self { source, target })
    }

    pub fn from_pairs(pairs: impl IntoIterator<Item = (Vector2<f64>, Vector2<f64>)>) -> Self {
        let (source, target) = pairs.into_iter().unzip();
        Self { source, target }
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn source(&self) -> &[Vector2<f64>] {
        &self.source
    }

    pub fn target(&self) -> &[Vector2<f64>] {
        &self.target
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&Vector2<f64>, &Vector2<f64>)> {
        self.source.iter().zip(&self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unequal_lengths_are_rejected() {
        let err = CorrespondenceSet::new(vec![Vector2::zeros()], vec![])
            .expect_err("length mismatch");
        assert!(matches!(err, CalibError::Validation { stage: Stage::Propagate, .. }));
    }

    #[test]
    fn parses_point_lists_from_json() {
        let set: CorrespondenceSet =
            serde_json::from_str(r#"{"source": [[1, 2], [3.5, 4]], "target": [[2, 2], [4.5, 4]]}"#)
                .expect("parse");
        assert_eq!(set.len(), 2);
        assert_eq!(set.target()[1], Vector2::new(4.5, 4.0));
        assert!(serde_json::from_str::<CorrespondenceSet>(r#"{"source": [[1, 2]], "target": []}"#)
            .is_err());
    }
}
