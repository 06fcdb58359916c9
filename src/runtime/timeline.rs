use crate::runtime::curve::lerp;
use crate::runtime::model::{Keyframe, SpatialInfo, Timeline};

/// Maps a cursor onto the animation's time range: wraps for looping
/// animations, clamps otherwise.
pub fn wrap_time(time: f32, length: f32, looping: bool) -> f32 {
    if length <= 0.0 {
        0.0
    } else if looping {
        time.rem_euclid(length)
    } else {
        time.clamp(0.0, length)
    }
}

/// Local transform of `timeline` at `time`.
///
/// Exact key times return the stored key verbatim. Before the first key the
/// first key is held; past the last key the last key is held, or for looping
/// animations the value eases toward the first key placed one length later.
pub fn resolve(timeline: &Timeline, time: f32, length: f32, looping: bool) -> SpatialInfo {
    let keys = &timeline.keys;
    let first = match keys.first() {
        Some(first) => first,
        None => return SpatialInfo::identity(),
    };
    let time = wrap_time(time, length, looping);
    if time <= first.time {
        return first.transform;
    }

    let next_id = keys.partition_point(|key| key.time <= time);
    if next_id == 0 {
        // only reachable for a NaN cursor
        return first.transform;
    }
    let key_a = &keys[next_id - 1];
    if key_a.time == time || key_a.curve.is_instant() {
        return key_a.transform;
    }

    let (key_b, time_b) = if next_id < keys.len() {
        (&keys[next_id], keys[next_id].time)
    } else if looping && length + first.time > key_a.time {
        (first, length + first.time)
    } else {
        return key_a.transform;
    };

    let factor = (time - key_a.time) / (time_b - key_a.time);
    interpolate(key_a, &key_b.transform, key_a.curve.apply(factor))
}

fn interpolate(key_a: &Keyframe, b: &SpatialInfo, t: f32) -> SpatialInfo {
    let a = &key_a.transform;
    SpatialInfo {
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        angle: angle_lerp(a.angle, b.angle, key_a.spin, t),
        scale_x: lerp(a.scale_x, b.scale_x, t),
        scale_y: lerp(a.scale_y, b.scale_y, t),
        alpha: lerp(a.alpha, b.alpha, t),
        pivot_x: lerp(a.pivot_x, b.pivot_x, t),
        pivot_y: lerp(a.pivot_y, b.pivot_y, t),
        file: a.file,
    }
}

/// Angle interpolation in degrees. Spin 0 takes the shortest arc, a positive
/// spin forces increasing angles and a negative one decreasing angles. Deltas
/// already pointing the forced way are kept as is so multi-turn spins survive.
pub fn angle_lerp(a: f32, b: f32, spin: i32, t: f32) -> f32 {
    let mut delta = b - a;
    if spin == 0 {
        delta = (delta + 180.0).rem_euclid(360.0) - 180.0;
    } else if spin > 0 && delta < 0.0 {
        delta += 360.0 * (-delta / 360.0).ceil();
    } else if spin < 0 && delta > 0.0 {
        delta -= 360.0 * (delta / 360.0).ceil();
    }
    a + delta * t
}
