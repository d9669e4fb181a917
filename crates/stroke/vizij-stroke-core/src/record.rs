//! Fixed-layout buffers shared between the scheduler, the kernel and the
//! renderer. Every struct is `#[repr(C)]` + `Pod` so it can be handed to a
//! GPU queue as-is; field order is part of the contract.

use serde::{Deserialize, Serialize};

/// One slot of the record buffer: 12 `f32` in three 16-byte groups.
///
/// `[strokeA, strokeB, interpolationT, totalDuration]`
/// `[elapsedTime, startX, startY, scale]`
/// `[active, phase, reserved1, reserved2]`
///
/// `reserved1` carries a per-launch wavefront edge width (0 = kernel default).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct LaunchRecord {
    pub stroke_a: f32,
    pub stroke_b: f32,
    pub interpolation_t: f32,
    pub total_duration: f32,

    pub elapsed_time: f32,
    pub start_x: f32,
    pub start_y: f32,
    pub scale: f32,

    pub active: f32,
    pub phase: f32,
    pub reserved1: f32,
    pub reserved2: f32,
}

impl LaunchRecord {
    /// Empty slot.
    pub const INACTIVE: LaunchRecord = LaunchRecord {
        stroke_a: 0.0,
        stroke_b: 0.0,
        interpolation_t: 0.0,
        total_duration: 0.0,
        elapsed_time: 0.0,
        start_x: 0.0,
        start_y: 0.0,
        scale: 0.0,
        active: 0.0,
        phase: 0.0,
        reserved1: 0.0,
        reserved2: 0.0,
    };

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active != 0.0
    }

    #[inline]
    pub fn edge_width(&self) -> Option<f32> {
        (self.reserved1 > 0.0).then_some(self.reserved1)
    }
}

/// Per-frame globals supplied alongside the record buffer (32 bytes).
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable, Serialize, Deserialize)]
pub struct FrameParams {
    pub current_time: f32,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub max_slots: f32,
    pub delta_time: f32,
    pub _padding: [f32; 3],
}

impl FrameParams {
    /// Width over height; 1 for a degenerate canvas.
    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.canvas_width > 0.0 && self.canvas_height > 0.0 {
            self.canvas_width / self.canvas_height
        } else {
            1.0
        }
    }
}

/// Device-space translation that no viewport can show.
pub const CULL_POSITION: f32 = -1.0e4;

/// Per-instance placement (64 bytes): two basis rows, a homogeneous row and
/// a translation row.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    pub rows: [[f32; 4]; 4],
}

impl InstanceTransform {
    pub const CULLED: InstanceTransform = InstanceTransform {
        rows: [
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [CULL_POSITION, CULL_POSITION, 0.0, 1.0],
        ],
    };

    /// Axis-aligned scale + translation.
    #[inline]
    pub fn placed(x: f32, y: f32, scale_x: f32, scale_y: f32) -> Self {
        Self {
            rows: [
                [scale_x, 0.0, 0.0, 0.0],
                [0.0, scale_y, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, 0.0, 1.0],
            ],
        }
    }

    #[inline]
    pub fn translation(&self) -> [f32; 2] {
        [self.rows[3][0], self.rows[3][1]]
    }

    #[inline]
    pub fn scale(&self) -> [f32; 2] {
        [self.rows[0][0], self.rows[1][1]]
    }

    /// Exactly [`Self::CULLED`]; a placed instance is never culled, however
    /// far off-canvas it lands.
    #[inline]
    pub fn is_culled(&self) -> bool {
        self.rows == Self::CULLED.rows
    }
}

impl Default for InstanceTransform {
    fn default() -> Self {
        Self::CULLED
    }
}

const _: () = assert!(std::mem::size_of::<LaunchRecord>() == 48);
const _: () = assert!(std::mem::size_of::<FrameParams>() == 32);
const _: () = assert!(std::mem::size_of::<InstanceTransform>() == 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_field_order_matches_layout() {
        let rec = LaunchRecord {
            stroke_a: 1.0,
            stroke_b: 2.0,
            interpolation_t: 3.0,
            total_duration: 4.0,
            elapsed_time: 5.0,
            start_x: 6.0,
            start_y: 7.0,
            scale: 8.0,
            active: 9.0,
            phase: 10.0,
            reserved1: 11.0,
            reserved2: 12.0,
        };
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&rec));
        assert_eq!(
            floats,
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]
        );
    }

    #[test]
    fn culled_transform_is_off_screen() {
        let t = InstanceTransform::CULLED;
        assert!(t.is_culled());
        assert_eq!(t.scale(), [0.0, 0.0]);
        assert!(!InstanceTransform::placed(0.5, -0.5, 0.01, 0.01).is_culled());
    }

    #[test]
    fn far_off_canvas_placement_is_not_culled() {
        let left = InstanceTransform::placed(CULL_POSITION * 2.0, 0.0, 0.01, 0.01);
        assert!(!left.is_culled());
        let corner = InstanceTransform::placed(CULL_POSITION, CULL_POSITION, 0.01, 0.01);
        assert!(!corner.is_culled());
        assert!(InstanceTransform::default().is_culled());
    }
}
