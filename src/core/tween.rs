//! Frame-rate independent smoothing toward a target pose.

use bevy::prelude::*;

/// Component for smooth camera-style following.
///
/// The owning system writes `target` and `focus` each frame; the tween moves
/// the transform toward them. A rate of zero snaps immediately.
#[derive(Component, Debug, Clone, Default)]
pub struct SmoothFollow {
    /// Desired translation (None = leave translation alone)
    pub target: Option<Vec3>,
    /// Point to look at after moving (None = keep rotation)
    pub focus: Option<Vec3>,
    /// Convergence rate per second (higher = faster)
    pub rate: f32,
}

/// Fraction of the remaining distance covered in `dt` seconds.
pub fn follow_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 {
        return 1.0;
    }
    (1.0 - (-rate * dt).exp()).clamp(0.0, 1.0)
}

/// System that moves followers toward their targets.
pub fn update_smooth_follow(time: Res<Time>, mut query: Query<(&mut Transform, &SmoothFollow)>) {
    let dt = time.delta_secs();

    for (mut transform, follow) in query.iter_mut() {
        if let Some(target) = follow.target {
            let t = follow_factor(follow.rate, dt);
            transform.translation = transform.translation.lerp(target, t);
        }

        if let Some(focus) = follow.focus {
            if focus.distance_squared(transform.translation) > 1e-6 {
                transform.look_at(focus, Vec3::Y);
            }
        }
    }
}
