use shared::Coordinate;

use crate::{
    render::{Argb, MapRenderer},
    state::ViewState,
};

pub const LOCATION_LABEL: &str = "Your location";
pub const HOME_LABEL: &str = "Home";
pub const ROUTE_COLOR: Argb = Argb::BLUE;

#[derive(Debug, Clone, PartialEq)]
pub enum Overlay<'a> {
    Marker {
        position: Coordinate,
        label: &'static str,
    },
    Polyline {
        points: &'a [Coordinate],
        color: Argb,
    },
}

/// What the map should show for a given state, borrowed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene<'a> {
    pub center: Option<Coordinate>,
    pub zoom: f64,
    pub overlays: Vec<Overlay<'a>>,
}

impl<'a> Scene<'a> {
    pub fn project(state: &'a ViewState) -> Self {
        let mut overlays = Vec::with_capacity(3);

        if let Some(position) = state.current_location {
            overlays.push(Overlay::Marker {
                position,
                label: LOCATION_LABEL,
            });
        }
        if let Some(position) = state.home {
            overlays.push(Overlay::Marker {
                position,
                label: HOME_LABEL,
            });
        }
        if let Some(route) = state.route.as_ref().filter(|route| !route.is_empty()) {
            overlays.push(Overlay::Polyline {
                points: route.points(),
                color: ROUTE_COLOR,
            });
        }

        Self {
            center: state.camera.center,
            zoom: state.camera.zoom,
            overlays,
        }
    }

    /// Replays the scene onto the widget: camera, then a fresh overlay set, then a redraw.
    pub fn render<R: MapRenderer + ?Sized>(&self, renderer: &mut R) {
        if let Some(center) = self.center {
            renderer.set_center(center);
            renderer.set_zoom(self.zoom);
        }

        renderer.clear_overlays();
        for overlay in &self.overlays {
            match overlay {
                Overlay::Marker { position, label } => renderer.add_marker(*position, label),
                Overlay::Polyline { points, color } => renderer.draw_polyline(points, *color),
            }
        }
        renderer.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use shared::Route;

    use super::*;
    use crate::{
        render::{HeadlessRenderer, RenderCall},
        state::{Camera, LOCATION_ZOOM},
    };

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_blank_state_only_clears_and_redraws() {
        let state = ViewState::default();
        let mut renderer = HeadlessRenderer::default();
        Scene::project(&state).render(&mut renderer);
        assert_eq!(
            renderer.calls(),
            &[RenderCall::ClearOverlays, RenderCall::Invalidate]
        );
    }

    #[test]
    fn test_full_scene_call_order() {
        let here = coord(19.0, -99.0);
        let home = coord(20.0, -98.0);
        let route = Route::new(vec![here, coord(19.5, -98.5), home]);
        let state = ViewState {
            current_location: Some(here),
            home: Some(home),
            route: Some(route.clone()),
            camera: Camera::focused_on(here, LOCATION_ZOOM),
            ..ViewState::default()
        };

        let mut renderer = HeadlessRenderer::default();
        Scene::project(&state).render(&mut renderer);

        assert_eq!(
            renderer.calls(),
            &[
                RenderCall::SetCenter(here),
                RenderCall::SetZoom(15.0),
                RenderCall::ClearOverlays,
                RenderCall::AddMarker(here, LOCATION_LABEL.into()),
                RenderCall::AddMarker(home, HOME_LABEL.into()),
                RenderCall::DrawPolyline(route.points().to_vec(), Argb::BLUE),
                RenderCall::Invalidate,
            ]
        );
    }

    #[test]
    fn test_empty_route_draws_no_line() {
        let state = ViewState {
            home: Some(coord(20.0, -98.0)),
            route: Some(Route::default()),
            ..ViewState::default()
        };
        let scene = Scene::project(&state);
        assert_eq!(
            scene.overlays,
            vec![Overlay::Marker {
                position: coord(20.0, -98.0),
                label: HOME_LABEL,
            }]
        );
    }

    #[test]
    fn test_rerender_replaces_overlays() {
        let mut state = ViewState {
            home: Some(coord(20.0, -98.0)),
            ..ViewState::default()
        };
        let mut renderer = HeadlessRenderer::default();
        Scene::project(&state).render(&mut renderer);

        state.home = None;
        Scene::project(&state).render(&mut renderer);

        assert_eq!(renderer.overlays(), &[RenderCall::Invalidate]);
        assert_eq!(renderer.frames(), 2);
    }

    #[test]
    fn test_camera_zoom_is_clamped() {
        assert_eq!(Camera::focused_on(coord(0.0, 0.0), 25.0).zoom, 19.0);
        assert_eq!(Camera::focused_on(coord(0.0, 0.0), 1.0).zoom, 3.0);
    }
}
