//! Closest-target selection.

use crate::protocol::report::Target;

/// Distance shown when no target is visible. Only for numeric displays; the
/// library itself reports absence as `None`.
pub const NO_TARGET_DISTANCE: f64 = 65535.0;

/// Closest valid target, or `None` if every slot is empty.
///
/// Ties keep the first target encountered.
pub fn select_closest<'a, I>(targets: I) -> Option<Target>
where
    I: IntoIterator<Item = &'a Target>,
{
    let mut best: Option<(Target, f64)> = None;
    for target in targets.into_iter().filter(|t| t.is_valid()) {
        let distance = target.distance();
        match best {
            Some((_, closest)) if distance >= closest => {}
            _ => best = Some((*target, distance)),
        }
    }
    best.map(|(target, _)| target)
}

/// Distance of `target`, or [`NO_TARGET_DISTANCE`] if there is none.
pub fn distance_or_sentinel(target: Option<&Target>) -> f64 {
    target.map_or(NO_TARGET_DISTANCE, Target::distance)
}
