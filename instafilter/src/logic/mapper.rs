//! Maps the single intensity slider onto a filter's parameter roles.

use super::session::SessionState;
use image_effect::{FilterParams, ParamRole, ParamRoles, RenderEngine};
use log::{debug, warn};

/// Scaling law from the unit slider range to a role's native range.
pub fn scale(role: ParamRole, value: f32) -> f32 {
    match role {
        ParamRole::Intensity => value,
        ParamRole::Radius => value * 200.0,
        ParamRole::Scale => value * 10.0,
    }
}

/// One value per exposed role, nothing for the others.
pub fn build_params(roles: ParamRoles, value: f32) -> FilterParams {
    let mut params = FilterParams::new();
    for role in roles.iter() {
        params.set(role, scale(role, value));
    }
    params
}

/// Renders the session's source through its filter.
///
/// All exposed roles are set before the single `execute` call. Returns
/// `false` and keeps the previous output when there is no source or the
/// engine produced nothing.
pub fn render<E: RenderEngine + ?Sized>(engine: &E, state: &mut SessionState) -> bool {
    let Some(source) = state.source.as_ref() else {
        debug!("render skipped: no source image");
        return false;
    };

    let kind = state.filter;
    let params = build_params(engine.parameter_roles(kind), state.intensity);
    state.params = params;

    match engine.execute(kind, source, &params) {
        Some(output) => {
            debug!("rendered {kind} with {params:?}");
            state.rendered = Some(output);
            true
        }
        None => {
            warn!("{kind} produced no output for {params:?}");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use image_effect::{CpuEngine, FilterKind};
    use std::sync::{Arc, Mutex};
    use strum::IntoEnumIterator;

    /// Engine double that records every `execute` call.
    #[derive(Clone, Default)]
    pub(crate) struct RecordingEngine {
        pub calls: Arc<Mutex<Vec<(FilterKind, FilterParams)>>>,
        pub fail: bool,
    }

    impl RecordingEngine {
        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        pub fn calls(&self) -> Vec<(FilterKind, FilterParams)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RenderEngine for RecordingEngine {
        fn parameter_roles(&self, kind: FilterKind) -> ParamRoles {
            CpuEngine::new().parameter_roles(kind)
        }

        fn execute(
            &self,
            kind: FilterKind,
            source: &RgbaImage,
            params: &FilterParams,
        ) -> Option<RgbaImage> {
            self.calls.lock().unwrap().push((kind, *params));
            if self.fail { None } else { Some(source.clone()) }
        }
    }

    fn state(kind: FilterKind, intensity: f32) -> SessionState {
        let mut state = SessionState::new(kind, intensity);
        state.source = Some(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255])));
        state
    }

    fn approx(a: Option<f32>, b: f32) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-4)
    }

    #[test]
    fn test_scaling_laws() {
        assert_eq!(scale(ParamRole::Intensity, 0.25), 0.25);
        assert_eq!(scale(ParamRole::Radius, 0.5), 100.0);
        assert_eq!(scale(ParamRole::Scale, 1.0), 10.0);
        assert_eq!(scale(ParamRole::Radius, 0.0), 0.0);
    }

    #[test]
    fn test_sepia_half() {
        let engine = RecordingEngine::default();
        let mut state = state(FilterKind::SepiaTone, 0.5);

        assert!(render(&engine, &mut state));

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, FilterKind::SepiaTone);
        assert_eq!(
            calls[0].1,
            FilterParams {
                intensity: Some(0.5),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_gaussian_half() {
        let engine = RecordingEngine::default();
        let mut state = state(FilterKind::GaussianBlur, 0.5);

        assert!(render(&engine, &mut state));

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(
            calls[0].1,
            FilterParams {
                radius: Some(100.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_pixellate_point_three() {
        let engine = RecordingEngine::default();
        let mut state = state(FilterKind::Pixellate, 0.3);

        assert!(render(&engine, &mut state));

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert!(approx(calls[0].1.scale, 3.0));
        assert_eq!(calls[0].1.intensity, None);
        assert_eq!(calls[0].1.radius, None);
    }

    #[test]
    fn test_every_filter_sets_exactly_its_roles() {
        let engine = RecordingEngine::default();

        for kind in FilterKind::iter() {
            for value in [0.0f32, 0.1, 0.5, 0.75, 1.0] {
                engine.calls.lock().unwrap().clear();
                let mut state = state(kind, value);
                assert!(render(&engine, &mut state));

                let calls = engine.calls();
                assert_eq!(calls.len(), 1, "{kind} at {value}");

                let (called_kind, params) = calls[0];
                let roles = engine.parameter_roles(kind);
                assert_eq!(called_kind, kind);
                assert_eq!(params.roles(), roles);
                for role in roles.iter() {
                    assert!(approx(params.get(role), scale(role, value)));
                }
            }
        }
    }

    #[test]
    fn test_multi_role_filter_renders_once() {
        let engine = RecordingEngine::default();
        let mut state = state(FilterKind::UnsharpMask, 0.5);

        assert!(render(&engine, &mut state));

        let calls = engine.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1.radius, Some(100.0));
        assert_eq!(calls[0].1.intensity, Some(0.5));
    }

    #[test]
    fn test_render_is_repeatable() {
        let engine = RecordingEngine::default();
        let mut state = state(FilterKind::Vignette, 0.4);

        assert!(render(&engine, &mut state));
        assert!(render(&engine, &mut state));

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], calls[1]);
    }

    #[test]
    fn test_no_source_no_execute() {
        let engine = RecordingEngine::default();
        let mut state = SessionState::new(FilterKind::SepiaTone, 0.5);

        assert!(!render(&engine, &mut state));
        assert!(engine.calls().is_empty());
        assert!(state.rendered.is_none());
    }

    #[test]
    fn test_engine_failure_keeps_previous_output() {
        let mut state = state(FilterKind::Edges, 0.5);
        assert!(render(&RecordingEngine::default(), &mut state));
        let previous = state.rendered.clone();

        let failing = RecordingEngine::failing();
        assert!(!render(&failing, &mut state));
        assert_eq!(failing.calls().len(), 1);
        assert_eq!(state.rendered, previous);
    }

    #[test]
    fn test_render_with_cpu_engine() {
        let mut state = state(FilterKind::Pixellate, 0.3);
        assert!(render(&CpuEngine::new(), &mut state));
        assert_eq!(state.rendered.as_ref().map(|i| i.dimensions()), Some((4, 4)));
    }
}
