//! Interpolation functions:
//! - lerp_f32 / lerp_vec2 (component-wise linear)
//! - catmull_rom_vec2 (uniform Catmull-Rom segment between p1 and p2)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp_f32(a[0], b[0], t), lerp_f32(a[1], b[1], t)]
}

#[inline]
fn catmull_rom_f32(p0: f32, p1: f32, p2: f32, p3: f32, t: f32) -> f32 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

/// Uniform Catmull-Rom on the segment `p1 -> p2`, with `p0`/`p3` as the
/// outer neighbours. `t = 0` yields `p1`, `t = 1` yields `p2`.
#[inline]
pub fn catmull_rom_vec2(p0: [f32; 2], p1: [f32; 2], p2: [f32; 2], p3: [f32; 2], t: f32) -> [f32; 2] {
    [
        catmull_rom_f32(p0[0], p1[0], p2[0], p3[0], t),
        catmull_rom_f32(p0[1], p1[1], p2[1], p3[1], t),
    ]
}
