//! The globe view model
//!
//! Holds everything the globe shows (rotation, accumulator lines, markers,
//! outlines, status text) and rebuilds its `DrawList` synchronously after
//! every mutation.

use glam::{Mat3, Vec2, Vec3};

use super::curves::{Run, sample_meridian, sample_parallel, split_runs};
use super::lookup::{LookupError, Place};
use super::outlines::{CountryOutlines, OutlineError, RingShape};
use super::projection::{RotationState, Viewport, project_in};
use super::rotation::RotationController;
use crate::catalog::City;
use crate::renderer::draw_list::{
    Color, DrawList, MarkerKind, PathKind, Primitive, Stroke, colors,
};
use crate::settings::Settings;
use crate::sim::state::CoordMode;
use crate::{cartesian_to_spherical, normalize_degrees};

const CURVE_WIDTH: f32 = 3.0;
const OUTLINE_WIDTH: f32 = 0.8;
const PLACEHOLDER_WIDTH: f32 = 2.0;

pub struct GlobeView {
    rotation: RotationController,
    viewport: Viewport,
    settings: Settings,
    mode: CoordMode,
    lat_line: Option<f64>,
    lon_line: Option<f64>,
    target: Option<City>,
    found: Option<Place>,
    status: String,
    outlines: Option<CountryOutlines>,
    frame: DrawList,
    hidden: bool,
    redraw_count: u64,
}

impl GlobeView {
    pub fn new(viewport: Viewport, settings: Settings) -> Self {
        let mut view = Self {
            rotation: RotationController::default(),
            viewport,
            settings,
            mode: CoordMode::Lat,
            lat_line: None,
            lon_line: None,
            target: None,
            found: None,
            status: String::new(),
            outlines: None,
            frame: DrawList::new(viewport.size),
            hidden: false,
            redraw_count: 0,
        };
        view.redraw();
        view
    }

    // === Layout ===

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Re-derive the canvas from the window height
    pub fn resize(&mut self, window_height: f32) {
        self.viewport = Viewport::from_window_height(window_height);
        self.redraw();
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.redraw();
    }

    // === Rotation ===

    pub fn rotation(&self) -> RotationState {
        self.rotation.state()
    }

    /// Manual rotation, tilt clamped to the drag limit
    pub fn rotate_by(&mut self, d_spin: f32, d_tilt: f32) {
        self.rotation.rotate(d_spin, d_tilt);
        self.redraw();
    }

    /// Pointer drag in pixels, scaled by the player's sensitivity
    pub fn drag(&mut self, dx_px: f32, dy_px: f32) {
        let (d_spin, d_tilt) = self.settings.drag_to_degrees(dx_px, dy_px);
        self.rotate_by(d_spin, d_tilt);
    }

    /// Programmatic rotation, taken as given
    pub fn set_rotation(&mut self, spin_deg: f32, tilt_deg: f32) {
        self.rotation.set_rotation(spin_deg, tilt_deg);
        self.redraw();
    }

    // === Accumulator lines ===

    pub fn mode(&self) -> CoordMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: CoordMode) {
        self.mode = mode;
        self.redraw();
    }

    pub fn latitude_line(&self) -> Option<f64> {
        self.lat_line
    }

    pub fn longitude_line(&self) -> Option<f64> {
        self.lon_line
    }

    /// Move the parallel. Out-of-range values blank the globe and keep the
    /// previous line.
    pub fn set_latitude_line(&mut self, lat: Option<f64>) -> bool {
        match lat {
            None => {
                self.lat_line = None;
                self.redraw();
                true
            }
            Some(v) if !v.is_finite() => {
                self.hide();
                false
            }
            Some(v) if !(-90.0..=90.0).contains(&v) => {
                self.hide();
                self.status = "Latitude out of range (-90..90).".to_owned();
                false
            }
            Some(v) => {
                self.lat_line = Some(v);
                self.redraw();
                self.status = format!("Latitude: {v:.4}°, finding nearest city...");
                true
            }
        }
    }

    /// Move the meridian. Out-of-range values blank the globe and keep the
    /// previous line.
    pub fn set_longitude_line(&mut self, lon: Option<f64>) -> bool {
        match lon {
            None => {
                self.lon_line = None;
                self.redraw();
                true
            }
            Some(v) if !v.is_finite() => {
                self.hide();
                false
            }
            Some(v) if !(-180.0..=180.0).contains(&v) => {
                self.hide();
                self.status = "Longitude out of range (-180..180).".to_owned();
                false
            }
            Some(v) => {
                self.lon_line = Some(v);
                self.redraw();
                let note = if self.is_visible(self.lat_line.unwrap_or(0.0), v) {
                    ""
                } else {
                    " (on back of globe)"
                };
                self.status = format!("Longitude: {v:.4}°{note}, finding nearest city...");
                true
            }
        }
    }

    /// Move the line of the active mode
    pub fn update_coordinate(&mut self, value: f64) -> bool {
        match self.mode {
            CoordMode::Lat => self.set_latitude_line(Some(value)),
            CoordMode::Lon => self.set_longitude_line(Some(value)),
        }
    }

    /// Point to search around: latitude mode searches on the prime meridian
    pub fn lookup_point(&self) -> (f64, f64) {
        let lat = self.lat_line.unwrap_or(0.0);
        match self.mode {
            CoordMode::Lat => (lat, 0.0),
            CoordMode::Lon => (lat, self.lon_line.unwrap_or(0.0)),
        }
    }

    // === Markers ===

    pub fn target_city(&self) -> Option<&City> {
        self.target.as_ref()
    }

    pub fn set_target_city(&mut self, city: City) {
        self.target = Some(city);
        self.redraw();
    }

    pub fn clear_target_city(&mut self) {
        self.target = None;
        self.redraw();
    }

    pub fn found_place(&self) -> Option<&Place> {
        self.found.as_ref()
    }

    pub fn set_found_place(&mut self, place: Option<Place>) {
        self.found = place;
        self.redraw();
    }

    /// Turn an external lookup result into status text and the found marker
    pub fn apply_lookup(&mut self, result: Result<Option<Place>, LookupError>) {
        match result {
            Ok(Some(place)) => {
                let country = place
                    .country
                    .as_deref()
                    .map(|c| format!(", {c}"))
                    .unwrap_or_default();
                let note = if self.is_visible(place.lat, place.lon) {
                    ""
                } else {
                    " (behind globe)"
                };
                self.status = format!("Nearest: {}{}{}", place.name, country, note);
                self.found = Some(place);
            }
            Ok(None) => {
                self.status = "No city found nearby".to_owned();
                self.found = None;
            }
            Err(e) => {
                log::warn!("Place lookup failed: {}", e);
                self.status = format!("City lookup failed: {e}");
            }
        }
        self.redraw();
    }

    pub fn status_text(&self) -> &str {
        &self.status
    }

    // === Outlines ===

    /// Parse and cache outlines. Later calls are no-ops returning `Ok(false)`.
    pub fn load_outlines(&mut self, geojson: &str) -> Result<bool, OutlineError> {
        if self.outlines.is_some() {
            return Ok(false);
        }
        self.outlines = Some(CountryOutlines::from_geojson(geojson)?);
        self.redraw();
        Ok(true)
    }

    pub fn has_outlines(&self) -> bool {
        self.outlines.is_some()
    }

    // === Queries ===

    /// True if the coordinate faces the viewer under the current rotation
    pub fn is_visible(&self, lat: f64, lon: f64) -> bool {
        project_in(
            &self.viewport,
            lat as f32,
            lon as f32,
            self.rotation.state(),
            false,
        )
        .is_front()
    }

    /// Coordinate at the front center of the globe (lat, lon in degrees)
    pub fn facing_coordinate(&self) -> (f64, f64) {
        let state = self.rotation.state();
        let p = Mat3::from_rotation_x(state.tilt_deg.to_radians()).transpose() * Vec3::Z;
        let (phi, lambda) = cartesian_to_spherical(p);
        let lon = normalize_degrees((lambda.to_degrees() - state.spin_deg) as f64);
        (phi.to_degrees() as f64, lon)
    }

    pub fn frame(&self) -> &DrawList {
        &self.frame
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Number of frames built so far
    pub fn redraw_count(&self) -> u64 {
        self.redraw_count
    }

    /// Blank the canvas until the next redraw
    pub fn hide(&mut self) {
        self.frame = DrawList::new(self.viewport.size);
        self.hidden = true;
    }

    // === Drawing ===

    fn hot_color(&self, kind: PathKind) -> Color {
        match (kind, self.mode) {
            (PathKind::Parallel, CoordMode::Lat) => colors::LAT_HOT,
            (PathKind::Meridian, CoordMode::Lon) => colors::LON_HOT,
            _ => colors::CURVE_IDLE,
        }
    }

    fn redraw(&mut self) {
        let rotation = self.rotation.state();
        let center = self.viewport.center();
        let r = self.viewport.radius();
        let mut list = DrawList::new(self.viewport.size);

        list.push(Primitive::Disc {
            center,
            radius: r,
            highlight: center - Vec2::new(0.3 * r, 0.0),
            inner: colors::SPHERE_INNER,
            outer: colors::SPHERE_OUTER,
        });

        let mut curves: Vec<(PathKind, Vec<Run>)> = Vec::with_capacity(2);
        if let Some(lat) = self.lat_line {
            let samples = sample_parallel(lat as f32, rotation, center, r);
            curves.push((PathKind::Parallel, split_runs(&samples)));
        } else {
            list.push(Primitive::Polyline {
                points: vec![
                    center - Vec2::new(0.95 * r, 0.0),
                    center + Vec2::new(0.95 * r, 0.0),
                ],
                stroke: Stroke::new(colors::PLACEHOLDER, PLACEHOLDER_WIDTH),
                closed: false,
                front: true,
                kind: PathKind::Placeholder,
            });
        }
        if let Some(lon) = self.lon_line {
            let samples = sample_meridian(lon as f32, rotation, center, r);
            curves.push((PathKind::Meridian, split_runs(&samples)));
        }

        if self.settings.show_back_curves {
            let back = Stroke::new(colors::CURVE_BACK, CURVE_WIDTH)
                .with_alpha_scale(self.settings.colors.back_emphasis());
            for (kind, runs) in &curves {
                for run in runs.iter().filter(|run| !run.front && run.is_drawable()) {
                    list.push(Primitive::Polyline {
                        points: run.points.clone(),
                        stroke: back,
                        closed: false,
                        front: false,
                        kind: *kind,
                    });
                }
            }
        }

        if self.settings.show_outlines {
            if let Some(outlines) = &self.outlines {
                let stroke = Stroke::new(colors::OUTLINE, OUTLINE_WIDTH);
                for shape in outlines.visible_shapes(rotation, center, r) {
                    match shape {
                        RingShape::Closed(points) => list.push(Primitive::Polyline {
                            points,
                            stroke,
                            closed: true,
                            front: true,
                            kind: PathKind::Outline,
                        }),
                        RingShape::Open(runs) => {
                            for points in runs {
                                list.push(Primitive::Polyline {
                                    points,
                                    stroke,
                                    closed: false,
                                    front: true,
                                    kind: PathKind::Outline,
                                });
                            }
                        }
                    }
                }
            }
        }

        for (kind, runs) in curves {
            let stroke = Stroke::new(self.hot_color(kind), CURVE_WIDTH);
            for run in runs.into_iter().filter(|run| run.front && run.is_drawable()) {
                list.push(Primitive::Polyline {
                    points: run.points,
                    stroke,
                    closed: false,
                    front: true,
                    kind,
                });
            }
        }

        let marker_radius = (r * 0.06).max(5.0);
        let label_offset = Vec2::new((r * 0.08).max(7.0), -(r * 0.05).max(5.0));
        let coord_offset = Vec2::new((r * 0.08).max(7.0), (r * 0.03).max(3.0));
        let markers = [
            self.target
                .map(|c| (MarkerKind::Target, c.name.to_owned(), c.lat, c.lon)),
            self.found
                .as_ref()
                .map(|p| (MarkerKind::Found, p.name.clone(), p.lat, p.lon)),
        ];
        for (kind, name, lat, lon) in markers.into_iter().flatten() {
            let p = project_in(&self.viewport, lat as f32, lon as f32, rotation, false);
            if !p.is_front() {
                continue;
            }
            let fill = match kind {
                MarkerKind::Target => colors::TARGET_MARKER,
                MarkerKind::Found => colors::FOUND_MARKER,
            };
            list.push(Primitive::Marker {
                kind,
                center: p.pos(),
                radius: marker_radius,
                fill,
            });
            list.push(Primitive::Label {
                anchor: p.pos() + label_offset,
                text: name,
                color: colors::LABEL,
                bold: true,
            });
            list.push(Primitive::Label {
                anchor: p.pos() + coord_offset,
                text: format!("({lat:.1}°, {lon:.1}°)"),
                color: colors::LABEL_DIM,
                bold: false,
            });
        }

        self.frame = list;
        self.hidden = false;
        self.redraw_count += 1;
    }
}

impl Default for GlobeView {
    fn default() -> Self {
        Self::new(Viewport::default(), Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CITIES;
    use crate::settings::ColorPreset;

    fn view() -> GlobeView {
        GlobeView::default()
    }

    #[test]
    fn initial_frame_has_sphere_and_placeholder() {
        let v = view();
        assert_eq!(v.frame().sphere_index(), Some(0));
        assert_eq!(v.frame().polylines(PathKind::Placeholder).count(), 1);
        assert_eq!(v.redraw_count(), 1);
    }

    #[test]
    fn every_mutation_redraws() {
        let mut v = view();
        v.rotate_by(10.0, 5.0);
        v.set_rotation(0.0, 0.0);
        v.set_mode(CoordMode::Lon);
        v.set_latitude_line(Some(10.0));
        v.set_target_city(CITIES[0]);
        v.clear_target_city();
        assert_eq!(v.redraw_count(), 7);
    }

    #[test]
    fn drag_scales_and_clamps() {
        let mut v = view();
        v.drag(20.0, 1000.0);
        assert_eq!(v.rotation(), RotationState::new(10.0, 60.0));
    }

    #[test]
    fn latitude_line_replaces_placeholder() {
        let mut v = view();
        assert!(v.set_latitude_line(Some(0.0)));
        assert_eq!(v.frame().polylines(PathKind::Placeholder).count(), 0);
        // Equator: one front run, back runs on both sides
        let front = v
            .frame()
            .polylines(PathKind::Parallel)
            .filter(|p| matches!(p, Primitive::Polyline { front: true, .. }))
            .count();
        assert_eq!(front, 1);
        assert!(v.status_text().starts_with("Latitude: 0.0000°"));
    }

    #[test]
    fn back_curves_are_drawn_after_the_sphere() {
        let mut v = view();
        v.set_latitude_line(Some(0.0));
        let sphere = v.frame().sphere_index().unwrap();
        let first_back = v
            .frame()
            .primitives
            .iter()
            .position(|p| matches!(p, Primitive::Polyline { front: false, .. }))
            .unwrap();
        assert!(first_back > sphere);
    }

    #[test]
    fn back_curves_follow_settings() {
        let mut v = view();
        v.set_latitude_line(Some(0.0));
        v.set_settings(Settings {
            show_back_curves: false,
            ..Settings::default()
        });
        assert!(
            !v.frame()
                .primitives
                .iter()
                .any(|p| matches!(p, Primitive::Polyline { front: false, .. }))
        );
    }

    #[test]
    fn high_contrast_strengthens_back_curves() {
        let mut v = GlobeView::new(
            Viewport::default(),
            Settings::from_preset(ColorPreset::HighContrast),
        );
        v.set_latitude_line(Some(0.0));
        let alpha = v
            .frame()
            .primitives
            .iter()
            .find_map(|p| match p {
                Primitive::Polyline {
                    front: false,
                    stroke,
                    ..
                } => Some(stroke.color[3]),
                _ => None,
            })
            .unwrap();
        assert!(alpha > colors::CURVE_BACK[3]);
    }

    #[test]
    fn active_mode_tints_its_curve() {
        let mut v = view();
        v.set_latitude_line(Some(10.0));
        v.set_longitude_line(Some(0.0));
        let color_of = |v: &GlobeView, kind| {
            v.frame().polylines(kind).find_map(|p| match p {
                Primitive::Polyline {
                    front: true,
                    stroke,
                    ..
                } => Some(stroke.color),
                _ => None,
            })
        };
        assert_eq!(color_of(&v, PathKind::Parallel), Some(colors::LAT_HOT));
        assert_eq!(color_of(&v, PathKind::Meridian), Some(colors::CURVE_IDLE));
        v.set_mode(CoordMode::Lon);
        assert_eq!(color_of(&v, PathKind::Parallel), Some(colors::CURVE_IDLE));
        assert_eq!(color_of(&v, PathKind::Meridian), Some(colors::LON_HOT));
    }

    #[test]
    fn out_of_range_blanks_and_keeps_line() {
        let mut v = view();
        v.set_latitude_line(Some(25.0));
        assert!(!v.set_latitude_line(Some(120.0)));
        assert!(v.is_hidden());
        assert!(v.frame().is_empty());
        assert_eq!(v.latitude_line(), Some(25.0));
        assert_eq!(v.status_text(), "Latitude out of range (-90..90).");

        assert!(!v.set_longitude_line(Some(-200.0)));
        assert_eq!(v.status_text(), "Longitude out of range (-180..180).");

        // Any later mutation brings the globe back
        v.rotate_by(1.0, 0.0);
        assert!(!v.is_hidden());
    }

    #[test]
    fn update_coordinate_follows_mode() {
        let mut v = view();
        v.update_coordinate(12.0);
        v.set_mode(CoordMode::Lon);
        v.update_coordinate(-40.0);
        assert_eq!(v.latitude_line(), Some(12.0));
        assert_eq!(v.longitude_line(), Some(-40.0));
        assert_eq!(v.lookup_point(), (12.0, -40.0));
        v.set_mode(CoordMode::Lat);
        assert_eq!(v.lookup_point(), (12.0, 0.0));
    }

    #[test]
    fn hidden_target_has_no_marker() {
        let mut v = view();
        let tokyo = CITIES[0];
        v.set_target_city(tokyo);
        // Default rotation faces lon 0, Tokyo is at 139.65 E
        assert!(v.frame().marker(MarkerKind::Target).is_none());
        v.set_rotation(-tokyo.lon as f32, 10.0);
        assert!(v.frame().marker(MarkerKind::Target).is_some());
        assert!(v.frame().labels().any(|l| l == "Tokyo, Japan"));
        assert!(v.frame().labels().any(|l| l == "(35.7°, 139.7°)"));
    }

    #[test]
    fn lookup_results_become_status_text() {
        let mut v = view();
        let place = Place {
            name: "Sydney, Australia".into(),
            country: Some("Australia".into()),
            lat: -33.8688,
            lon: 151.2093,
        };
        v.apply_lookup(Ok(Some(place.clone())));
        assert_eq!(
            v.status_text(),
            "Nearest: Sydney, Australia, Australia (behind globe)"
        );
        assert_eq!(v.found_place(), Some(&place));

        v.set_rotation(-151.2, 0.0);
        v.apply_lookup(Ok(Some(place)));
        assert!(!v.status_text().contains("behind"));
        assert!(v.frame().marker(MarkerKind::Found).is_some());

        v.apply_lookup(Ok(None));
        assert_eq!(v.status_text(), "No city found nearby");
        assert!(v.found_place().is_none());

        v.apply_lookup(Err(LookupError("timeout".into())));
        assert_eq!(v.status_text(), "City lookup failed: timeout");
    }

    #[test]
    fn facing_coordinate_inverts_rotation() {
        let mut v = view();
        v.set_rotation(-139.65, 12.0);
        let (lat, lon) = v.facing_coordinate();
        assert!((lat - 12.0).abs() < 1e-3);
        assert!((lon - 139.65).abs() < 1e-3);
        assert!(v.is_visible(lat, lon));
        assert!(!v.is_visible(-lat, lon - 180.0));
    }

    #[test]
    fn facing_coordinate_survives_huge_spin() {
        let mut v = view();
        v.set_rotation(-1e20, 6.0);
        let (lat, lon) = v.facing_coordinate();
        assert!((lat - 6.0).abs() < 1e-3);
        assert!((-180.0..180.0).contains(&lon));
    }

    #[test]
    fn outlines_load_once() {
        let json = r#"{"type": "FeatureCollection", "features": [
            {"type": "Feature", "properties": {"name": "Box"},
             "geometry": {"type": "Polygon",
                          "coordinates": [[[-5, -5], [5, -5], [5, 5], [-5, 5], [-5, -5]]]}}
        ]}"#;
        let mut v = view();
        assert!(v.load_outlines(json).unwrap());
        assert!(!v.load_outlines("garbage").unwrap());
        assert!(v.has_outlines());
        assert_eq!(v.frame().polylines(PathKind::Outline).count(), 1);

        v.set_settings(Settings {
            show_outlines: false,
            ..Settings::default()
        });
        assert_eq!(v.frame().polylines(PathKind::Outline).count(), 0);
    }

    #[test]
    fn bad_outlines_leave_view_unchanged() {
        let mut v = view();
        assert!(v.load_outlines("{").is_err());
        assert!(!v.has_outlines());
    }

    #[test]
    fn resize_follows_window_height() {
        let mut v = view();
        v.resize(600.0);
        assert_eq!(v.viewport().size, 280);
        assert_eq!(v.frame().size, 280);
    }
}
