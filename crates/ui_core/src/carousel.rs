//! Scroll-snap carousel engine plus the component scaffolding around it.
//!
//! The engine owns snap geometry and the selected snap; components and
//! controls subscribe to its `Select`/`ReInit` signals and mirror the
//! boundary flags into their own state. All of this is single-threaded
//! UI state, shared through `Rc<RefCell<_>>` handles.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use thiserror::Error;

/// Snaps closer than this are treated as the same stop.
const SNAP_EPSILON: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn axis(self) -> Axis {
        match self {
            Orientation::Horizontal => Axis::X,
            Orientation::Vertical => Axis::Y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Where an item's snap point sits relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapAlign {
    #[default]
    Start,
    Center,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselOptions {
    pub orientation: Orientation,
    pub align: SnapAlign,
    pub slides_to_scroll: usize,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            orientation: Orientation::default(),
            align: SnapAlign::default(),
            slides_to_scroll: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineSignal {
    Select,
    ReInit,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundaryState {
    pub can_scroll_prev: bool,
    pub can_scroll_next: bool,
    pub selected: usize,
}

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(EngineSignal, BoundaryState)>;

/// Keys the carousel root intercepts in its capture-phase handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowKey {
    Left,
    Right,
}

pub struct CarouselEngine {
    options: CarouselOptions,
    viewport: f32,
    item_extents: Vec<f32>,
    gap: f32,
    snaps: Vec<f32>,
    selected: usize,
    next_listener_id: ListenerId,
    listeners: Vec<(ListenerId, Listener)>,
}

impl CarouselEngine {
    /// An engine with no measured geometry: a single zero snap, both
    /// boundary flags false, so navigation is inert until `reinit`.
    pub fn new(options: CarouselOptions) -> Self {
        Self {
            options,
            viewport: 0.0,
            item_extents: Vec::new(),
            gap: 0.0,
            snaps: vec![0.0],
            selected: 0,
            next_listener_id: 0,
            listeners: Vec::new(),
        }
    }

    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    pub fn axis(&self) -> Axis {
        self.options.orientation.axis()
    }

    /// Re-measures snap geometry, clamps the selected snap into the new
    /// range, and emits `ReInit`.
    pub fn reinit(&mut self, viewport: f32, item_extents: &[f32], gap: f32) {
        self.viewport = viewport;
        self.item_extents = item_extents.to_vec();
        self.gap = gap;
        self.snaps = compute_snaps(viewport, item_extents, gap, self.options.align);
        self.selected = self.selected.min(self.snaps.len() - 1);
        self.emit(EngineSignal::ReInit);
    }

    pub fn geometry_matches(&self, viewport: f32, item_extents: &[f32], gap: f32) -> bool {
        self.viewport == viewport && self.gap == gap && self.item_extents == item_extents
    }

    pub fn can_scroll_prev(&self) -> bool {
        self.selected > 0
    }

    pub fn can_scroll_next(&self) -> bool {
        self.selected + 1 < self.snaps.len()
    }

    /// One step backwards. No-op (returns false) at the first snap.
    pub fn scroll_prev(&mut self) -> bool {
        if !self.can_scroll_prev() {
            return false;
        }
        self.selected = self.selected.saturating_sub(self.options.slides_to_scroll.max(1));
        self.emit(EngineSignal::Select);
        true
    }

    /// One step forwards. No-op (returns false) at the last snap.
    pub fn scroll_next(&mut self) -> bool {
        if !self.can_scroll_next() {
            return false;
        }
        let step = self.options.slides_to_scroll.max(1);
        self.selected = (self.selected + step).min(self.snaps.len() - 1);
        self.emit(EngineSignal::Select);
        true
    }

    pub fn scroll_to(&mut self, snap: usize) -> bool {
        let clamped = snap.min(self.snaps.len() - 1);
        if clamped == self.selected {
            return false;
        }
        self.selected = clamped;
        self.emit(EngineSignal::Select);
        true
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn snap_count(&self) -> usize {
        self.snaps.len()
    }

    /// Scroll offset of the selected snap along the engine's axis.
    pub fn scroll_offset(&self) -> f32 {
        self.snaps[self.selected]
    }

    pub fn boundary_state(&self) -> BoundaryState {
        BoundaryState {
            can_scroll_prev: self.can_scroll_prev(),
            can_scroll_next: self.can_scroll_next(),
            selected: self.selected,
        }
    }

    pub fn on(&mut self, listener: Listener) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners observe the boundary state computed after the mutation,
    /// never a stale pair.
    fn emit(&mut self, signal: EngineSignal) {
        let state = self.boundary_state();
        for (_, listener) in &mut self.listeners {
            listener(signal, state);
        }
    }
}

fn compute_snaps(viewport: f32, item_extents: &[f32], gap: f32, align: SnapAlign) -> Vec<f32> {
    if item_extents.is_empty() {
        return vec![0.0];
    }
    let content: f32 =
        item_extents.iter().sum::<f32>() + gap * (item_extents.len() - 1) as f32;
    let max_scroll = (content - viewport).max(0.0);

    let mut snaps: Vec<f32> = Vec::with_capacity(item_extents.len());
    let mut leading_edge = 0.0;
    for &extent in item_extents {
        let raw = match align {
            SnapAlign::Start => leading_edge,
            SnapAlign::Center => leading_edge + (extent - viewport) / 2.0,
            SnapAlign::End => leading_edge + extent - viewport,
        };
        let snap = raw.clamp(0.0, max_scroll);
        // Items that clamp onto an existing stop collapse into it.
        if snaps.last().map_or(true, |&last| snap - last > SNAP_EPSILON) {
            snaps.push(snap);
        }
        leading_edge += extent + gap;
    }
    snaps
}

pub type CarouselHandle = Rc<RefCell<CarouselEngine>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("carousel controls must be used within a Carousel")]
pub struct CarouselScopeError;

/// Explicit handle propagation to descendant controls; the dependency-scope
/// replacement for ambient context. A detached scope models a control built
/// outside any carousel root and fails fast.
#[derive(Clone, Default)]
pub struct CarouselScope {
    handle: Option<CarouselHandle>,
}

impl CarouselScope {
    pub fn detached() -> Self {
        Self { handle: None }
    }

    fn handle(&self) -> Result<CarouselHandle, CarouselScopeError> {
        self.handle.clone().ok_or(CarouselScopeError)
    }
}

/// The mounted carousel root: owns the engine handle, mirrors the boundary
/// flags, and maps arrow keys onto navigation.
pub struct Carousel {
    engine: CarouselHandle,
    state: Rc<Cell<BoundaryState>>,
    subscription: Option<ListenerId>,
}

impl Carousel {
    pub fn new(options: CarouselOptions) -> Self {
        let engine: CarouselHandle = Rc::new(RefCell::new(CarouselEngine::new(options)));
        let state = Rc::new(Cell::new(BoundaryState::default()));

        let mirror = Rc::clone(&state);
        let subscription = engine
            .borrow_mut()
            .on(Box::new(move |_, boundary| mirror.set(boundary)));
        // Immediate recompute: the engine may already sit past its first
        // snap by the time the component mounts.
        state.set(engine.borrow().boundary_state());

        Self {
            engine,
            state,
            subscription: Some(subscription),
        }
    }

    pub fn scope(&self) -> CarouselScope {
        CarouselScope {
            handle: Some(Rc::clone(&self.engine)),
        }
    }

    pub fn handle(&self) -> CarouselHandle {
        Rc::clone(&self.engine)
    }

    pub fn state(&self) -> BoundaryState {
        self.state.get()
    }

    pub fn can_scroll_prev(&self) -> bool {
        self.state.get().can_scroll_prev
    }

    pub fn can_scroll_next(&self) -> bool {
        self.state.get().can_scroll_next
    }

    pub fn scroll_offset(&self) -> f32 {
        self.engine.borrow().scroll_offset()
    }

    /// Reinitializes the engine when the measured geometry changed.
    pub fn sync_geometry(&self, viewport: f32, item_extents: &[f32], gap: f32) {
        let matches = self.engine.borrow().geometry_matches(viewport, item_extents, gap);
        if !matches {
            self.engine.borrow_mut().reinit(viewport, item_extents, gap);
        }
    }

    pub fn scroll_prev(&self) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        self.engine.borrow_mut().scroll_prev()
    }

    pub fn scroll_next(&self) -> bool {
        if self.subscription.is_none() {
            return false;
        }
        self.engine.borrow_mut().scroll_next()
    }

    /// Capture-phase arrow handling: both arrows are always consumed, and
    /// at a boundary the corresponding arrow is inert.
    pub fn handle_key(&self, key: ArrowKey) -> bool {
        match key {
            ArrowKey::Left => {
                self.scroll_prev();
            }
            ArrowKey::Right => {
                self.scroll_next();
            }
        }
        true
    }

    /// Detaches the component's engine listener. Navigation calls become
    /// no-ops afterwards; the engine itself stays usable by other holders.
    pub fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.engine.borrow_mut().off(id);
        }
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ControlDirection {
    Prev,
    Next,
}

struct BoundaryControl {
    engine: CarouselHandle,
    direction: ControlDirection,
    can_scroll: Rc<Cell<bool>>,
    subscription: Option<ListenerId>,
}

impl BoundaryControl {
    fn new(scope: &CarouselScope, direction: ControlDirection) -> Result<Self, CarouselScopeError> {
        let engine = scope.handle()?;
        let can_scroll = Rc::new(Cell::new(false));

        let mirror = Rc::clone(&can_scroll);
        let subscription = engine.borrow_mut().on(Box::new(move |_, boundary| {
            mirror.set(match direction {
                ControlDirection::Prev => boundary.can_scroll_prev,
                ControlDirection::Next => boundary.can_scroll_next,
            });
        }));

        let initial = engine.borrow().boundary_state();
        can_scroll.set(match direction {
            ControlDirection::Prev => initial.can_scroll_prev,
            ControlDirection::Next => initial.can_scroll_next,
        });

        Ok(Self {
            engine,
            direction,
            can_scroll,
            subscription: Some(subscription),
        })
    }

    fn enabled(&self) -> bool {
        self.can_scroll.get()
    }

    fn press(&self) -> bool {
        let mut engine = self.engine.borrow_mut();
        match self.direction {
            ControlDirection::Prev => engine.scroll_prev(),
            ControlDirection::Next => engine.scroll_next(),
        }
    }

    fn unmount(&mut self) {
        if let Some(id) = self.subscription.take() {
            self.engine.borrow_mut().off(id);
        }
    }
}

impl Drop for BoundaryControl {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// "Previous slide" control; disabled while `can_scroll_prev` is false.
pub struct CarouselPrevious(BoundaryControl);

impl CarouselPrevious {
    pub fn new(scope: &CarouselScope) -> Result<Self, CarouselScopeError> {
        BoundaryControl::new(scope, ControlDirection::Prev).map(Self)
    }

    pub fn enabled(&self) -> bool {
        self.0.enabled()
    }

    pub fn press(&self) -> bool {
        self.0.press()
    }

    pub fn unmount(&mut self) {
        self.0.unmount();
    }
}

/// "Next slide" control; disabled while `can_scroll_next` is false.
pub struct CarouselNext(BoundaryControl);

impl CarouselNext {
    pub fn new(scope: &CarouselScope) -> Result<Self, CarouselScopeError> {
        BoundaryControl::new(scope, ControlDirection::Next).map(Self)
    }

    pub fn enabled(&self) -> bool {
        self.0.enabled()
    }

    pub fn press(&self) -> bool {
        self.0.press()
    }

    pub fn unmount(&mut self) {
        self.0.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measured_engine(items: usize) -> CarouselEngine {
        let mut engine = CarouselEngine::new(CarouselOptions::default());
        // Viewport shows two 100px cards of `items` with a 10px gap.
        engine.reinit(210.0, &vec![100.0; items], 10.0);
        engine
    }

    fn mounted_carousel(items: usize) -> Carousel {
        let carousel = Carousel::new(CarouselOptions::default());
        carousel.sync_geometry(210.0, &vec![100.0; items], 10.0);
        carousel
    }

    #[test]
    fn orientation_maps_to_scroll_axis() {
        assert_eq!(Orientation::Horizontal.axis(), Axis::X);
        assert_eq!(Orientation::Vertical.axis(), Axis::Y);
        assert_eq!(Orientation::default(), Orientation::Horizontal);
    }

    #[test]
    fn unmeasured_engine_is_inert() {
        let mut engine = CarouselEngine::new(CarouselOptions::default());
        assert!(!engine.can_scroll_prev());
        assert!(!engine.can_scroll_next());
        assert!(!engine.scroll_prev());
        assert!(!engine.scroll_next());
        assert_eq!(engine.scroll_offset(), 0.0);
    }

    #[test]
    fn content_smaller_than_viewport_leaves_both_flags_false() {
        let mut engine = CarouselEngine::new(CarouselOptions::default());
        engine.reinit(500.0, &[100.0, 100.0], 10.0);
        assert_eq!(engine.snap_count(), 1);
        assert!(!engine.can_scroll_prev());
        assert!(!engine.can_scroll_next());
    }

    #[test]
    fn scroll_prev_at_first_snap_is_a_noop() {
        let mut engine = measured_engine(5);
        let before = engine.boundary_state();
        assert!(!engine.scroll_prev());
        assert_eq!(engine.boundary_state(), before);
    }

    #[test]
    fn scroll_next_at_last_snap_is_a_noop() {
        let mut engine = measured_engine(5);
        while engine.scroll_next() {}
        let before = engine.boundary_state();
        assert!(!engine.scroll_next());
        assert_eq!(engine.boundary_state(), before);
    }

    #[test]
    fn trailing_items_collapse_into_the_final_stop() {
        // 5 items of 100px + 10px gaps = 540px content in a 210px viewport:
        // max scroll 330px, reached at the 4th item's leading edge.
        let engine = measured_engine(5);
        assert_eq!(engine.snap_count(), 4);
    }

    #[test]
    fn listeners_observe_true_boundary_state_after_each_signal() {
        let engine: CarouselHandle =
            Rc::new(RefCell::new(CarouselEngine::new(CarouselOptions::default())));
        let seen: Rc<RefCell<Vec<(EngineSignal, BoundaryState)>>> =
            Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        engine
            .borrow_mut()
            .on(Box::new(move |signal, state| sink.borrow_mut().push((signal, state))));

        engine.borrow_mut().reinit(210.0, &[100.0; 4], 10.0);
        engine.borrow_mut().scroll_next();
        engine.borrow_mut().scroll_next();
        engine.borrow_mut().scroll_prev();
        engine.borrow_mut().reinit(210.0, &[100.0; 2], 10.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0].0, EngineSignal::ReInit);
        assert_eq!(
            seen[1],
            (
                EngineSignal::Select,
                BoundaryState {
                    can_scroll_prev: true,
                    can_scroll_next: true,
                    selected: 1
                }
            )
        );
        // Last reinit clamps selected back into the shrunken range.
        let (signal, state) = seen[4];
        assert_eq!(signal, EngineSignal::ReInit);
        assert_eq!(state.selected, engine.borrow().selected());
        assert_eq!(state.can_scroll_prev, engine.borrow().can_scroll_prev());
        assert_eq!(state.can_scroll_next, engine.borrow().can_scroll_next());
    }

    #[test]
    fn late_mounted_control_sees_a_scrolled_engine_immediately() {
        let carousel = mounted_carousel(5);
        carousel.handle().borrow_mut().scroll_to(2);

        // Controls mounting against an engine already past its first snap
        // must observe the mid-strip position without waiting for a signal.
        let prev = CarouselPrevious::new(&carousel.scope()).expect("inside carousel");
        let next = CarouselNext::new(&carousel.scope()).expect("inside carousel");
        assert!(prev.enabled());
        assert!(next.enabled());

        let state = carousel.state();
        assert!(state.can_scroll_prev);
        assert!(state.can_scroll_next);
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn unmount_detaches_every_listener_and_freezes_state() {
        let mut carousel = mounted_carousel(5);
        let handle = carousel.handle();
        assert_eq!(handle.borrow().listener_count(), 1);

        carousel.scroll_next();
        let frozen = carousel.state();

        carousel.unmount();
        assert_eq!(handle.borrow().listener_count(), 0);

        // Engine keeps moving; the unmounted component no longer updates.
        handle.borrow_mut().scroll_next();
        assert_eq!(carousel.state(), frozen);
        assert!(!carousel.scroll_next());
    }

    #[test]
    fn dropping_the_component_also_detaches() {
        let carousel = mounted_carousel(3);
        let handle = carousel.handle();
        assert_eq!(handle.borrow().listener_count(), 1);
        drop(carousel);
        assert_eq!(handle.borrow().listener_count(), 0);
    }

    #[test]
    fn controls_track_their_own_boundary_flag() {
        let carousel = mounted_carousel(5);
        let scope = carousel.scope();
        let prev = CarouselPrevious::new(&scope).expect("inside carousel");
        let next = CarouselNext::new(&scope).expect("inside carousel");

        assert!(!prev.enabled());
        assert!(next.enabled());

        assert!(next.press());
        assert!(prev.enabled());

        while next.press() {}
        assert!(!next.enabled());
        assert!(!next.press());
        assert!(prev.enabled());
    }

    #[test]
    fn control_outside_a_carousel_fails_fast() {
        let scope = CarouselScope::detached();
        assert_eq!(
            CarouselPrevious::new(&scope).map(|_| ()).unwrap_err(),
            CarouselScopeError
        );
        assert_eq!(
            CarouselNext::new(&scope).map(|_| ()).unwrap_err(),
            CarouselScopeError
        );
    }

    #[test]
    fn arrow_keys_are_consumed_and_inert_at_boundaries() {
        let carousel = mounted_carousel(3);

        // At the leftmost boundary ArrowLeft is consumed but moves nothing.
        assert!(carousel.handle_key(ArrowKey::Left));
        assert_eq!(carousel.state().selected, 0);

        assert!(carousel.handle_key(ArrowKey::Right));
        assert_eq!(carousel.state().selected, 1);

        assert!(carousel.handle_key(ArrowKey::Left));
        assert_eq!(carousel.state().selected, 0);
    }

    #[test]
    fn sync_geometry_skips_reinit_when_unchanged() {
        let carousel = mounted_carousel(4);
        let handle = carousel.handle();

        let seen = Rc::new(Cell::new(0usize));
        let sink = Rc::clone(&seen);
        let id = handle.borrow_mut().on(Box::new(move |signal, _| {
            if signal == EngineSignal::ReInit {
                sink.set(sink.get() + 1);
            }
        }));

        carousel.sync_geometry(210.0, &[100.0; 4], 10.0);
        assert_eq!(seen.get(), 0);

        carousel.sync_geometry(300.0, &[100.0; 4], 10.0);
        assert_eq!(seen.get(), 1);

        handle.borrow_mut().off(id);
    }
}
