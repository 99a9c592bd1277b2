use shared::Coordinate;

/// 32-bit ARGB color, the packing map widgets take for overlay strokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argb(pub u32);

impl Argb {
    pub const BLUE: Argb = Argb(0xFF00_00FF);
}

/// The map widget as seen from the core. Implemented by the host UI.
pub trait MapRenderer {
    fn set_center(&mut self, center: Coordinate);
    fn set_zoom(&mut self, level: f64);
    fn clear_overlays(&mut self);
    fn add_marker(&mut self, position: Coordinate, label: &str);
    fn draw_polyline(&mut self, points: &[Coordinate], color: Argb);
    fn invalidate(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    SetCenter(Coordinate),
    SetZoom(f64),
    ClearOverlays,
    AddMarker(Coordinate, String),
    DrawPolyline(Vec<Coordinate>, Argb),
    Invalidate,
}

/// Records every call and traces it; stands in for a map widget when there is no screen.
///
/// The log grows until [`HeadlessRenderer::take_calls`] drains it, so long-lived
/// sessions should drain it once per frame they inspect.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    calls: Vec<RenderCall>,
    frames: usize,
}

impl HeadlessRenderer {
    pub fn calls(&self) -> &[RenderCall] {
        &self.calls
    }

    /// Hands over the recorded calls and starts a fresh log. The frame count is kept.
    pub fn take_calls(&mut self) -> Vec<RenderCall> {
        std::mem::take(&mut self.calls)
    }

    /// Calls since the last [`RenderCall::ClearOverlays`], i.e. what is on the map now.
    pub fn overlays(&self) -> &[RenderCall] {
        let start = self
            .calls
            .iter()
            .rposition(|call| *call == RenderCall::ClearOverlays)
            .map_or(0, |idx| idx + 1);
        &self.calls[start..]
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl MapRenderer for HeadlessRenderer {
    fn set_center(&mut self, center: Coordinate) {
        tracing::trace!("center {center}");
        self.calls.push(RenderCall::SetCenter(center));
    }

    fn set_zoom(&mut self, level: f64) {
        tracing::trace!("zoom {level}");
        self.calls.push(RenderCall::SetZoom(level));
    }

    fn clear_overlays(&mut self) {
        self.calls.push(RenderCall::ClearOverlays);
    }

    fn add_marker(&mut self, position: Coordinate, label: &str) {
        tracing::trace!("marker {label:?} at {position}");
        self.calls.push(RenderCall::AddMarker(position, label.to_string()));
    }

    fn draw_polyline(&mut self, points: &[Coordinate], color: Argb) {
        tracing::trace!("polyline with {} points", points.len());
        self.calls.push(RenderCall::DrawPolyline(points.to_vec(), color));
    }

    fn invalidate(&mut self) {
        self.frames += 1;
        self.calls.push(RenderCall::Invalidate);
    }
}
