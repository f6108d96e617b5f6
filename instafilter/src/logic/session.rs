use super::{
    loader::{ImageLoader, PendingImage},
    mapper,
    service::ReviewPrompt,
    share::SharePayload,
    usage::{UsageCounter, UsageStore},
};
use anyhow::Result;
use image::RgbaImage;
use image_effect::{FilterKind, FilterParams, RenderEngine};
use log::{debug, info, warn};

/// Everything the interactive surface binds to.
///
/// `rendered` only ever changes through a render, so it stays a function of
/// `source`, `filter` and `intensity`.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub source: Option<RgbaImage>,
    pub filter: FilterKind,
    pub intensity: f32,
    pub params: FilterParams,
    pub rendered: Option<RgbaImage>,

    /// The intensity slider and filter chooser stay disabled until a photo is loaded.
    pub controls_enabled: bool,
}

impl SessionState {
    pub fn new(filter: FilterKind, intensity: f32) -> Self {
        Self {
            filter,
            intensity: intensity.clamp(0.0, 1.0),
            ..Default::default()
        }
    }
}

pub struct FilterSession<E, R, U> {
    engine: E,
    review: R,
    usage: UsageCounter<U>,
    loader: ImageLoader,
    state: SessionState,
}

impl<E, R, U> FilterSession<E, R, U>
where
    E: RenderEngine,
    R: ReviewPrompt,
    U: UsageStore,
{
    pub fn new(engine: E, review: R, usage: UsageCounter<U>, state: SessionState) -> Self {
        Self {
            engine,
            review,
            usage,
            loader: ImageLoader::new(),
            state,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn usage(&self) -> &UsageCounter<U> {
        &self.usage
    }

    /// Starts decoding a newly picked photo, superseding any load still in flight.
    pub fn begin_select(&mut self, bytes: Vec<u8>) -> PendingImage {
        self.loader.load(bytes)
    }

    /// Adopts a finished load. Superseded loads and decode failures leave the
    /// session untouched and return `false`.
    pub async fn finish_select(&mut self, pending: PendingImage) -> bool {
        let id = pending.id();
        let Some(image) = pending.wait().await else {
            return false;
        };

        debug!("selection {id} loaded: {}x{}", image.width(), image.height());
        self.state.source = Some(image);
        self.state.controls_enabled = true;
        self.render();
        true
    }

    pub async fn select_image(&mut self, bytes: Vec<u8>) -> bool {
        let pending = self.begin_select(bytes);
        self.finish_select(pending).await
    }

    /// Switches filters, counts the change and asks for a review once past the threshold.
    pub fn set_filter(&mut self, kind: FilterKind) {
        if !self.state.controls_enabled {
            debug!("no photo loaded, ignore filter change to {kind}");
            return;
        }

        self.state.filter = kind;
        self.state.params = FilterParams::default();

        let count = self.usage.record_filter_change();
        info!("filter changed to {kind}, {count} changes so far");

        self.render();

        // Fires on every change past the threshold, not just the first crossing
        if self.usage.is_review_due(count) {
            debug!("review threshold reached ({count})");
            self.review.request_review();
        }
    }

    pub fn set_intensity(&mut self, value: f32) {
        if !self.state.controls_enabled {
            debug!("no photo loaded, ignore intensity {value}");
            return;
        }

        if value.is_nan() {
            warn!("ignore NaN intensity");
            return;
        }

        self.state.intensity = value.clamp(0.0, 1.0);
        self.render();
    }

    pub fn render(&mut self) -> bool {
        mapper::render(&self.engine, &mut self.state)
    }

    /// Payload for the share sheet, `None` until something has been rendered.
    pub fn share_payload(&self) -> Result<Option<SharePayload>> {
        self.state
            .rendered
            .as_ref()
            .map(SharePayload::new)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{mapper::tests::RecordingEngine, usage::MemoryUsageStore};
    use image::{ImageFormat, Rgba};
    use image_effect::CpuEngine;
    use std::{
        io::Cursor,
        sync::{
            Arc,
            atomic::{AtomicUsize, Ordering},
        },
    };

    #[derive(Clone, Default)]
    struct CountingReview(Arc<AtomicUsize>);

    impl CountingReview {
        fn count(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    impl ReviewPrompt for CountingReview {
        fn request_review(&self) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    type TestSession = FilterSession<RecordingEngine, CountingReview, MemoryUsageStore>;

    fn session(start_count: u32) -> (TestSession, RecordingEngine, CountingReview) {
        let engine = RecordingEngine::default();
        let review = CountingReview::default();
        let usage = UsageCounter::new(MemoryUsageStore::new(start_count), 20);
        let session = FilterSession::new(
            engine.clone(),
            review.clone(),
            usage,
            SessionState::new(FilterKind::SepiaTone, 0.5),
        );
        (session, engine, review)
    }

    fn png(color: [u8; 4]) -> Vec<u8> {
        let image = RgbaImage::from_pixel(3, 2, Rgba(color));
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[tokio::test]
    async fn test_select_image_renders() {
        let (mut session, engine, _) = session(0);
        assert!(!session.state().controls_enabled);

        assert!(session.select_image(png([200, 0, 0, 255])).await);

        let state = session.state();
        assert!(state.controls_enabled);
        assert_eq!(state.source.as_ref().map(|i| i.dimensions()), Some((3, 2)));
        assert!(state.rendered.is_some());
        assert_eq!(engine.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_decode_failure_is_silent() {
        let (mut session, engine, _) = session(0);

        assert!(!session.select_image(b"definitely not an image".to_vec()).await);

        let state = session.state();
        assert!(state.source.is_none());
        assert!(state.rendered.is_none());
        assert!(!state.controls_enabled);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_keeps_previous_image() {
        let (mut session, _, _) = session(0);
        assert!(session.select_image(png([1, 2, 3, 255])).await);
        let before = session.state().source.clone();

        assert!(!session.select_image(vec![0u8; 16]).await);
        assert_eq!(session.state().source, before);
    }

    #[tokio::test]
    async fn test_superseded_selection_is_discarded() {
        let (mut session, _, _) = session(0);

        let first = session.begin_select(png([255, 0, 0, 255]));
        let second = session.begin_select(png([0, 0, 255, 255]));
        assert!(first.is_superseded());
        assert!(!second.is_superseded());

        assert!(session.finish_select(second).await);
        assert!(!session.finish_select(first).await);

        let source = session.state().source.as_ref().unwrap();
        assert_eq!(*source.get_pixel(0, 0), Rgba([0, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_set_filter_counts_each_change() {
        let (mut session, _, review) = session(0);
        assert!(session.select_image(png([9, 9, 9, 255])).await);

        session.set_filter(FilterKind::Edges);
        assert_eq!(session.usage().count(), 1);

        session.set_filter(FilterKind::Edges);
        session.set_filter(FilterKind::Vignette);
        assert_eq!(session.usage().count(), 3);
        assert_eq!(review.count(), 0);
    }

    #[test]
    fn test_controls_disabled_before_photo() {
        let (mut session, engine, review) = session(19);

        session.set_filter(FilterKind::Crystallize);
        session.set_intensity(0.9);

        let state = session.state();
        assert_eq!(state.filter, FilterKind::SepiaTone);
        assert_eq!(state.intensity, 0.5);
        assert_eq!(session.usage().count(), 19);
        assert_eq!(review.count(), 0);
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_failed_decode_keeps_controls_disabled() {
        let (mut session, _, review) = session(0);
        assert!(!session.select_image(b"not an image".to_vec()).await);

        session.set_filter(FilterKind::Edges);
        assert_eq!(session.usage().count(), 0);
        assert_eq!(review.count(), 0);
    }

    #[tokio::test]
    async fn test_review_fires_on_every_change_past_threshold() {
        let (mut session, _, review) = session(18);
        assert!(session.select_image(png([9, 9, 9, 255])).await);

        session.set_filter(FilterKind::Edges);
        assert_eq!(session.usage().count(), 19);
        assert_eq!(review.count(), 0);

        session.set_filter(FilterKind::Pixellate);
        assert_eq!(session.usage().count(), 20);
        assert_eq!(review.count(), 1);

        session.set_filter(FilterKind::SepiaTone);
        session.set_filter(FilterKind::Vignette);
        assert_eq!(review.count(), 3);
    }

    #[tokio::test]
    async fn test_set_filter_resets_params_and_rerenders() {
        let (mut session, engine, _) = session(0);
        assert!(session.select_image(png([9, 9, 9, 255])).await);
        assert_eq!(session.state().params.intensity, Some(0.5));

        session.set_filter(FilterKind::GaussianBlur);

        let calls = engine.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].0, FilterKind::GaussianBlur);
        assert_eq!(session.state().params.intensity, None);
        assert_eq!(session.state().params.radius, Some(100.0));
    }

    #[tokio::test]
    async fn test_set_intensity_rerenders() {
        let (mut session, engine, _) = session(0);
        assert!(session.select_image(png([9, 9, 9, 255])).await);

        session.set_intensity(0.25);
        session.set_intensity(7.0);
        session.set_intensity(f32::NAN);

        let calls = engine.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(calls[1].1.intensity, Some(0.25));
        assert_eq!(calls[2].1.intensity, Some(1.0));
        assert_eq!(session.state().intensity, 1.0);
    }

    #[tokio::test]
    async fn test_share_payload() -> Result<()> {
        let usage = UsageCounter::new(MemoryUsageStore::default(), 20);
        let mut session = FilterSession::new(
            CpuEngine::new(),
            CountingReview::default(),
            usage,
            SessionState::new(FilterKind::Pixellate, 0.3),
        );
        assert!(session.share_payload()?.is_none());

        assert!(session.select_image(png([40, 80, 120, 255])).await);
        let payload = session.share_payload()?.expect("rendered image");
        assert_eq!(payload.title, "Instafilter image");
        assert_eq!(image::load_from_memory(&payload.png)?.to_rgba8().dimensions(), (3, 2));
        Ok(())
    }
}
