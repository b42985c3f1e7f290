//! Panel Navigation Module
//!
//! Finite-state machine over the ordered deck of landing-page panels.
//!
//! - Owns the active index; wheel, swipe, and menu selection all funnel
//!   through it.
//! - Wheel and swipe intents pass a dead-zone and a 450ms debounce gate;
//!   menu selection bypasses the gate but still stamps the timer.
//! - Each panel's visual transform is a pure function of its signed
//!   distance from the active index.
//!
//! The navigator never renders; the presentation layer polls
//! [`PanelNavigator::active_index`] and [`PanelNavigator::transform`].

use std::time::{Duration, Instant};

use serde::Deserialize;

/// Minimum gap between accepted wheel/swipe transitions.
pub const DEBOUNCE: Duration = Duration::from_millis(450);

/// Wheel deltas at or below this magnitude are trackpad noise.
const WHEEL_DEADZONE: f32 = 5.0;

/// Touch travel below this many pixels is a tap, not a swipe.
const SWIPE_MIN_TRAVEL: f32 = 30.0;

/// Deck position shown on first load.
pub const DEFAULT_PANEL_INDEX: usize = 2;

/// One panel's chrome content.
#[derive(Clone, Debug, Deserialize)]
pub struct PanelDescriptor {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub image: Option<String>,
    /// Rendered without the frosted card background
    #[serde(default)]
    pub transparent: bool,
}

/// Ordered, immutable deck of panels.
#[derive(Clone, Debug)]
pub struct PanelSet {
    panels: Vec<PanelDescriptor>,
}

impl PanelSet {
    /// The built-in landing-page deck.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        let panels: Vec<PanelDescriptor> = serde_json::from_str(include_str!("panels.json"))?;
        Ok(Self { panels })
    }

    pub fn from_panels(panels: Vec<PanelDescriptor>) -> Self {
        Self { panels }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PanelDescriptor> {
        self.panels.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelDescriptor> {
        self.panels.iter()
    }
}

/// Which wheel sign moves deeper into the deck. The reference product
/// maps upward scroll to advancing; the mapping stays configurable
/// rather than baked into the transition logic.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScrollDirection {
    #[default]
    UpAdvances,
    DownAdvances,
}

/// Visual placement for one panel, derived from its distance to the
/// active index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelTransform {
    /// Vertical offset as a percentage of panel height (0 = centered)
    pub offset_pct: f32,
    pub scale: f32,
    /// Stacking order; active panel on top, clamped so depth never grows
    /// unbounded
    pub z_order: i32,
}

/// The navigation state machine. Single-threaded; the debounce timer is
/// only ever read and written from the UI event stream.
#[derive(Clone, Debug)]
pub struct PanelNavigator {
    panels: PanelSet,
    active: usize,
    last_transition: Option<Instant>,
    direction: ScrollDirection,
}

impl PanelNavigator {
    pub fn new(panels: PanelSet) -> Self {
        let active = DEFAULT_PANEL_INDEX.min(panels.len().saturating_sub(1));
        Self {
            panels,
            active,
            last_transition: None,
            direction: ScrollDirection::default(),
        }
    }

    pub fn with_direction(mut self, direction: ScrollDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_panel(&self) -> Option<&PanelDescriptor> {
        self.panels.get(self.active)
    }

    /// Step toward the end of the deck, clamped at the last panel.
    /// Not debounced; gated entry points call this after their checks.
    pub fn advance(&mut self) -> usize {
        self.active = (self.active + 1).min(self.panels.len().saturating_sub(1));
        self.active
    }

    /// Step toward the front of the deck, clamped at zero.
    pub fn retreat(&mut self) -> usize {
        self.active = self.active.saturating_sub(1);
        self.active
    }

    /// Jump straight to a panel. Out-of-range requests clamp, never
    /// fail. Always accepted, but stamps the debounce timer so an
    /// immediately following wheel tick cannot double-step.
    pub fn select(&mut self, index: i64, now: Instant) -> usize {
        let max = self.panels.len().saturating_sub(1) as i64;
        self.active = index.clamp(0, max) as usize;
        self.last_transition = Some(now);
        self.active
    }

    /// Feed a vertical wheel delta. Returns the new active index when a
    /// transition was accepted.
    pub fn handle_wheel(&mut self, delta_y: f32, now: Instant) -> Option<usize> {
        // Dead-zone events are dropped before the gate so they never
        // stamp the timer.
        if delta_y.abs() <= WHEEL_DEADZONE {
            return None;
        }
        if !self.gate_open(now) {
            return None;
        }
        self.last_transition = Some(now);
        let toward_end = match self.direction {
            ScrollDirection::UpAdvances => delta_y < 0.0,
            ScrollDirection::DownAdvances => delta_y > 0.0,
        };
        self.step(toward_end)
    }

    /// Feed a completed touch gesture by its start/end y coordinates.
    /// Swipe travel is screen motion, so its sign is the inverse of the
    /// wheel convention.
    pub fn handle_swipe(&mut self, start_y: f32, end_y: f32, now: Instant) -> Option<usize> {
        let travel = end_y - start_y;
        if travel.abs() < SWIPE_MIN_TRAVEL {
            return None;
        }
        if !self.gate_open(now) {
            return None;
        }
        self.last_transition = Some(now);
        let toward_end = match self.direction {
            ScrollDirection::UpAdvances => travel > 0.0,
            ScrollDirection::DownAdvances => travel < 0.0,
        };
        self.step(toward_end)
    }

    /// Transform for the panel at `index` given the current active
    /// index. Pure in `(index - active)`.
    pub fn transform(&self, index: usize) -> PanelTransform {
        let delta = index as i64 - self.active as i64;
        let z_order = (900 - delta.unsigned_abs().min(5) as i64) as i32;
        if delta == 0 {
            return PanelTransform {
                offset_pct: 0.0,
                scale: 1.0,
                z_order,
            };
        }
        let offset_pct = if delta > 0 {
            -260.0 - (delta - 1) as f32 * 180.0
        } else {
            120.0 + (delta.unsigned_abs() - 1) as f32 * 180.0
        };
        PanelTransform {
            offset_pct,
            scale: 1.08,
            z_order,
        }
    }

    fn gate_open(&self, now: Instant) -> bool {
        match self.last_transition {
            Some(last) => now.duration_since(last) >= DEBOUNCE,
            None => true,
        }
    }

    fn step(&mut self, toward_end: bool) -> Option<usize> {
        let before = self.active;
        let after = if toward_end {
            self.advance()
        } else {
            self.retreat()
        };
        (after != before).then_some(after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator() -> PanelNavigator {
        let panels = PanelSet::builtin().unwrap();
        assert_eq!(panels.len(), 6);
        PanelNavigator::new(panels)
    }

    fn ms(base: Instant, millis: u64) -> Instant {
        base + Duration::from_millis(millis)
    }

    #[test]
    fn test_builtin_deck_starts_at_default_index() {
        let nav = navigator();
        assert_eq!(nav.active_index(), 2);
        assert_eq!(nav.active_panel().unwrap().title, "Home Card");
    }

    #[test]
    fn test_advance_clamps_at_last_panel() {
        let mut nav = navigator();
        assert_eq!(nav.advance(), 3);
        assert_eq!(nav.advance(), 4);
        assert_eq!(nav.advance(), 5);
        assert_eq!(nav.advance(), 5);
    }

    #[test]
    fn test_retreat_clamps_at_zero() {
        let mut nav = navigator();
        nav.active = 5;
        for expected in [4, 3, 2, 1, 0, 0] {
            assert_eq!(nav.retreat(), expected);
        }
    }

    #[test]
    fn test_select_clamps_out_of_range() {
        let mut nav = navigator();
        let now = Instant::now();
        assert_eq!(nav.select(-1, now), 0);
        assert_eq!(nav.select(99, now), 5);
        assert_eq!(nav.select(3, now), 3);
    }

    #[test]
    fn test_wheel_debounce_accepts_one_of_two() {
        let mut nav = navigator();
        nav.active = 0;
        let t0 = Instant::now();
        assert_eq!(nav.handle_wheel(-40.0, t0), Some(1));
        // Second tick 100ms later is inside the window.
        assert_eq!(nav.handle_wheel(-40.0, ms(t0, 100)), None);
        assert_eq!(nav.active_index(), 1);
        // After the window it goes through.
        assert_eq!(nav.handle_wheel(-40.0, ms(t0, 460)), Some(2));
    }

    #[test]
    fn test_wheel_deadzone_does_not_stamp_timer() {
        let mut nav = navigator();
        let t0 = Instant::now();
        assert_eq!(nav.handle_wheel(-40.0, t0), Some(3));
        // Noise inside the lockout must not extend it.
        assert_eq!(nav.handle_wheel(-4.0, ms(t0, 400)), None);
        assert_eq!(nav.handle_wheel(-40.0, ms(t0, 460)), Some(4));
    }

    #[test]
    fn test_wheel_sign_mapping() {
        let mut nav = navigator();
        let t0 = Instant::now();
        assert_eq!(nav.handle_wheel(-40.0, t0), Some(3));
        assert_eq!(nav.handle_wheel(40.0, ms(t0, 500)), Some(2));

        let mut inverted = navigator().with_direction(ScrollDirection::DownAdvances);
        assert_eq!(inverted.handle_wheel(40.0, t0), Some(3));
    }

    #[test]
    fn test_wheel_at_boundary_still_stamps_timer() {
        let mut nav = navigator();
        nav.active = 5;
        let t0 = Instant::now();
        // Clamped transition: no index change, but the gesture was
        // accepted, so the lockout starts.
        assert_eq!(nav.handle_wheel(-40.0, t0), None);
        assert_eq!(nav.handle_wheel(40.0, ms(t0, 100)), None);
        assert_eq!(nav.handle_wheel(40.0, ms(t0, 460)), Some(4));
    }

    #[test]
    fn test_swipe_travel_threshold() {
        let mut nav = navigator();
        let t0 = Instant::now();
        assert_eq!(nav.handle_swipe(300.0, 280.0, t0), None);
        assert_eq!(nav.handle_swipe(300.0, 340.0, t0), Some(3));
        // Swipe up retreats under the default mapping.
        assert_eq!(nav.handle_swipe(300.0, 240.0, ms(t0, 500)), Some(2));
    }

    #[test]
    fn test_select_bypasses_debounce_but_gates_wheel() {
        let mut nav = navigator();
        let t0 = Instant::now();
        assert_eq!(nav.handle_wheel(-40.0, t0), Some(3));
        // Menu selection inside the lockout is accepted...
        assert_eq!(nav.select(0, ms(t0, 100)), 0);
        // ...and restarts the lockout for wheel input.
        assert_eq!(nav.handle_wheel(-40.0, ms(t0, 200)), None);
        assert_eq!(nav.handle_wheel(-40.0, ms(t0, 600)), Some(1));
    }

    #[test]
    fn test_transform_centers_active_panel() {
        let nav = navigator();
        let t = nav.transform(2);
        assert_eq!(t.offset_pct, 0.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.z_order, 900);
    }

    #[test]
    fn test_transform_offsets_grow_with_distance() {
        let nav = navigator();
        let t3 = nav.transform(3);
        let t4 = nav.transform(4);
        assert_eq!(t3.offset_pct, -260.0);
        assert_eq!(t4.offset_pct, -440.0);
        assert!(t4.offset_pct.abs() > t3.offset_pct.abs());
        assert_eq!(t3.scale, 1.08);

        let t1 = nav.transform(1);
        let t0 = nav.transform(0);
        assert_eq!(t1.offset_pct, 120.0);
        assert_eq!(t0.offset_pct, 300.0);
    }

    #[test]
    fn test_transform_z_order_clamped() {
        let mut nav = navigator();
        let t0 = Instant::now();
        nav.select(0, t0);
        assert_eq!(nav.transform(0).z_order, 900);
        assert_eq!(nav.transform(1).z_order, 899);
        assert_eq!(nav.transform(5).z_order, 895);
        // Distance clamps at 5 even for a longer deck.
        let far = PanelNavigator::new(PanelSet::from_panels(
            (0..12)
                .map(|i| PanelDescriptor {
                    title: format!("p{i}"),
                    body: String::new(),
                    image: None,
                    transparent: false,
                })
                .collect(),
        ));
        assert_eq!(far.transform(11).z_order, 895);
    }
}
