use glam::DVec3;

/// An orthonormal tangent frame around a surface normal.
///
/// Local directions are expressed as `(tangent, bitangent, normal)`
/// coordinates, so a local `+z` maps onto the normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub tangent: DVec3,
    pub bitangent: DVec3,
    pub normal: DVec3,
}

impl Frame {
    /// Build a frame from a unit normal and an auxiliary vector.
    ///
    /// The tangent is `normal x aux` and the bitangent `normal x tangent`.
    /// When `aux` is (nearly) parallel to the normal, a fixed orthonormal
    /// pair is used instead.
    pub fn from_normal(normal: DVec3, aux: DVec3) -> Self {
        let (tangent, bitangent) = match normal.cross(aux).try_normalize() {
            Some(tangent) => (tangent, normal.cross(tangent)),
            None => normal.any_orthonormal_pair(),
        };

        Self {
            tangent,
            bitangent,
            normal,
        }
    }

    /// Transform a local direction into world space.
    #[inline]
    pub fn to_world(&self, local: DVec3) -> DVec3 {
        self.tangent * local.x + self.bitangent * local.y + self.normal * local.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(frame: &Frame) {
        assert!((frame.tangent.length() - 1.0).abs() < 1e-9);
        assert!((frame.bitangent.length() - 1.0).abs() < 1e-9);
        assert!(frame.tangent.dot(frame.bitangent).abs() < 1e-9);
        assert!(frame.tangent.dot(frame.normal).abs() < 1e-9);
        assert!(frame.bitangent.dot(frame.normal).abs() < 1e-9);
    }

    #[test]
    fn test_frame_orthonormal() {
        let normal = DVec3::new(1.0, 2.0, -0.5).normalize();
        let frame = Frame::from_normal(normal, DVec3::new(0.3, -0.7, 0.2));
        assert_orthonormal(&frame);
    }

    #[test]
    fn test_frame_parallel_aux() {
        let frame = Frame::from_normal(DVec3::Y, DVec3::Y * 3.0);
        assert_orthonormal(&frame);
    }

    #[test]
    fn test_local_z_maps_to_normal() {
        let normal = DVec3::new(0.0, -1.0, 1.0).normalize();
        let frame = Frame::from_normal(normal, DVec3::X);
        assert!((frame.to_world(DVec3::Z) - normal).length() < 1e-12);
    }
}
