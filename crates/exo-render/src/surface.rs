//! Window surface size tracking.
//!
//! winit reports physical sizes that may be zero (minimized windows, Wayland
//! before the first configure). Everything downstream wants a non-zero
//! physical size for wgpu and a logical size for UI layout, so both are kept
//! here.

/// Smallest dimension handed to wgpu.
pub const MIN_SURFACE_DIMENSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

impl PhysicalSize {
    /// Width over height.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

/// Tracks physical size, logical size and scale factor of the window surface.
#[derive(Clone, Debug)]
pub struct SurfaceWrapper {
    physical: PhysicalSize,
    scale_factor: f64,
    /// False until a non-zero size has been seen.
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical: clamp_size(physical_width, physical_height),
            scale_factor: sanitize_scale(scale_factor),
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Record a resize. Returns the new physical size if it changed.
    pub fn handle_resize(&mut self, physical_width: u32, physical_height: u32) -> Option<PhysicalSize> {
        let size = clamp_size(physical_width, physical_height);
        if physical_width > 0 && physical_height > 0 {
            self.configured = true;
        }
        if size == self.physical {
            return None;
        }
        self.physical = size;
        Some(size)
    }

    /// Record a DPI change. The physical size changes with it, so this
    /// behaves like a resize.
    pub fn handle_scale_factor_changed(
        &mut self,
        scale_factor: f64,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<PhysicalSize> {
        self.scale_factor = sanitize_scale(scale_factor);
        self.handle_resize(physical_width, physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        self.physical
    }

    pub fn logical_size(&self) -> (f64, f64) {
        (
            f64::from(self.physical.width) / self.scale_factor,
            f64::from(self.physical.height) / self.scale_factor,
        )
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.physical.aspect_ratio()
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}

fn clamp_size(width: u32, height: u32) -> PhysicalSize {
    PhysicalSize {
        width: width.max(MIN_SURFACE_DIMENSION),
        height: height.max(MIN_SURFACE_DIMENSION),
    }
}

fn sanitize_scale(scale_factor: f64) -> f64 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_size_clamps_and_is_unconfigured() {
        let mut surface = SurfaceWrapper::new(0, 0, 1.0);
        assert_eq!(surface.physical_size(), PhysicalSize { width: 1, height: 1 });
        assert!(!surface.is_configured());

        let size = surface.handle_resize(1920, 1080).unwrap();
        assert_eq!(size, PhysicalSize { width: 1920, height: 1080 });
        assert!(surface.is_configured());
    }

    #[test]
    fn test_same_size_is_not_a_change() {
        let mut surface = SurfaceWrapper::new(1280, 720, 1.0);
        assert!(surface.handle_resize(1280, 720).is_none());
    }

    #[test]
    fn test_minimize_does_not_reach_zero() {
        let mut surface = SurfaceWrapper::new(1280, 720, 1.0);
        let size = surface.handle_resize(0, 0).unwrap();
        assert_eq!(size, PhysicalSize { width: 1, height: 1 });
        assert!(surface.is_configured());
    }

    #[test]
    fn test_logical_size_follows_scale_factor() {
        let mut surface = SurfaceWrapper::new(2880, 1800, 2.0);
        assert_eq!(surface.logical_size(), (1440.0, 900.0));

        surface.handle_scale_factor_changed(1.0, 1440, 900);
        assert_eq!(surface.logical_size(), (1440.0, 900.0));
        assert_eq!(surface.physical_size().width, 1440);
    }

    #[test]
    fn test_invalid_scale_factor_falls_back_to_one() {
        let surface = SurfaceWrapper::new(800, 600, 0.0);
        assert_eq!(surface.scale_factor(), 1.0);
    }

    #[test]
    fn test_aspect_ratio() {
        let surface = SurfaceWrapper::new(1600, 900, 1.0);
        assert!((surface.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
