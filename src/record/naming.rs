use crate::error::{CalibError, Result, Stage};

/// Name of the other half of a stereo pair: `scene_01_left` ↔ `scene_01_right`.
///
/// The name is split on `_` and the last token swapped; any other suffix is
/// rejected.
pub fn stereo_twin_name(name: &str) -> Result<String> {
    let (stem, side) = match name.rsplit_once('_') {
        Some((stem, side)) => (Some(stem), side),
        None => (None, name),
    };
    let twin_side = match side {
        "left" => "right",
        "right" => "left",
        other => {
            return Err(CalibError::validation(
                Stage::Propagate,
                None,
                format!("image name '{name}' does not end in _left/_right (got '{other}')"),
            ))
        }
    };
    Ok(match stem {
        Some(stem) => format!("{stem}_{twin_side}"),
        None => twin_side.to_string(),
    })
}
