//! Standing on platforms and the fallback ground.

use bevy::prelude::*;

use crate::world::Bounds;

/// Snapped body height if the body rests on `bounds`.
///
/// The feet must lie between the platform's bottom and a little above its
/// top, the body must be over the platform, and it must not be rising.
pub fn platform_support(
    position: Vec3,
    vertical_velocity: f32,
    bounds: &Bounds,
    half_height: f32,
    tolerance: f32,
) -> Option<f32> {
    if vertical_velocity > 0.0 {
        return None;
    }
    let feet = position.y - half_height;
    if feet < bounds.min.y || feet > bounds.max.y + tolerance {
        return None;
    }
    if !bounds.contains_xz(position) {
        return None;
    }
    Some(bounds.max.y + half_height)
}

/// Resolve support against the fallback ground and every platform.
///
/// Returns the height to snap the body to, or None when airborne. The first
/// supporting platform wins over the ground.
pub fn resolve_support(
    position: Vec3,
    vertical_velocity: f32,
    platforms: impl IntoIterator<Item = Bounds>,
    ground_height: f32,
    half_height: f32,
    tolerance: f32,
) -> Option<f32> {
    let mut position = position;
    let mut support = None;

    if position.y <= ground_height {
        position.y = ground_height;
        support = Some(ground_height);
    }

    for bounds in platforms {
        if let Some(y) = platform_support(position, vertical_velocity, &bounds, half_height, tolerance) {
            return Some(y);
        }
    }

    support
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slab() -> Bounds {
        Bounds::from_center(Vec3::new(0.0, 3.0, 0.0), Vec3::new(4.0, 1.0, 4.0))
    }

    #[test]
    fn lands_on_platform_top() {
        // Top is 3.5, feet slightly above it
        let y = platform_support(Vec3::new(1.0, 4.05, 1.0), -0.1, &slab(), 0.5, 0.1);
        assert_eq!(y, Some(4.0));
    }

    #[test]
    fn rising_body_passes_through() {
        assert!(platform_support(Vec3::new(0.0, 3.8, 0.0), 0.2, &slab(), 0.5, 0.1).is_none());
    }

    #[test]
    fn off_the_edge_is_not_supported() {
        assert!(platform_support(Vec3::new(2.5, 4.0, 0.0), 0.0, &slab(), 0.5, 0.1).is_none());
        // Too far above
        assert!(platform_support(Vec3::new(0.0, 4.5, 0.0), -0.1, &slab(), 0.5, 0.1).is_none());
    }

    #[test]
    fn ground_fallback_catches_low_body() {
        let y = resolve_support(Vec3::new(50.0, 0.2, 50.0), -0.3, [slab()], 0.5, 0.5, 0.1);
        assert_eq!(y, Some(0.5));
    }

    #[test]
    fn airborne_without_platforms() {
        assert!(resolve_support(Vec3::new(0.0, 8.0, 0.0), -0.1, [slab()], 0.5, 0.5, 0.1).is_none());
    }
}
