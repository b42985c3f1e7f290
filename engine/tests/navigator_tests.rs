//! Navigator Tests - Deck Traversal, Debounce, and Panel Transforms
//!
//! End-to-end navigation scenarios against the built-in six-panel deck.

use std::time::{Duration, Instant};

use overlook_engine::panels::{PanelNavigator, PanelSet, ScrollDirection, DEBOUNCE};

fn navigator() -> PanelNavigator {
    PanelNavigator::new(PanelSet::builtin().expect("built-in deck"))
}

fn ms(base: Instant, millis: u64) -> Instant {
    base + Duration::from_millis(millis)
}

// ============================================================================
// Traversal
// ============================================================================

#[test]
fn test_full_deck_walk_clamps_both_ends() {
    let mut nav = navigator();
    assert_eq!(nav.active_index(), 2);

    // Three advances reach the end; the fourth stays clamped.
    assert_eq!(nav.advance(), 3);
    assert_eq!(nav.advance(), 4);
    assert_eq!(nav.advance(), 5);
    assert_eq!(nav.advance(), 5);

    // Five retreats reach the front; the sixth stays clamped.
    for expected in [4, 3, 2, 1, 0, 0] {
        assert_eq!(nav.retreat(), expected);
    }
}

#[test]
fn test_select_jumps_and_clamps() {
    let mut nav = navigator();
    let now = Instant::now();
    assert_eq!(nav.select(5, now), 5);
    assert_eq!(nav.select(-1, now), 0);
    assert_eq!(nav.select(99, now), 5);
}

// ============================================================================
// Gesture gating
// ============================================================================

#[test]
fn test_wheel_burst_is_one_logical_step() {
    let mut nav = navigator();
    let t0 = Instant::now();
    nav.select(0, ms(t0, 0));

    // A trackpad burst: many ticks inside one debounce window.
    let mut accepted = 0;
    for i in 0..10 {
        if nav
            .handle_wheel(-40.0, ms(t0, DEBOUNCE.as_millis() as u64 + i * 40))
            .is_some()
        {
            accepted += 1;
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(nav.active_index(), 1);
}

#[test]
fn test_alternating_wheel_directions_respect_gate() {
    let mut nav = navigator();
    let t0 = Instant::now();
    assert_eq!(nav.handle_wheel(-40.0, t0), Some(3));
    assert_eq!(nav.handle_wheel(40.0, ms(t0, 200)), None);
    assert_eq!(nav.handle_wheel(40.0, ms(t0, 500)), Some(2));
}

#[test]
fn test_swipe_and_wheel_share_the_debounce_timer() {
    let mut nav = navigator();
    let t0 = Instant::now();
    assert_eq!(nav.handle_swipe(400.0, 500.0, t0), Some(3));
    // Wheel right after the swipe is still locked out.
    assert_eq!(nav.handle_wheel(-40.0, ms(t0, 300)), None);
    assert_eq!(nav.handle_wheel(-40.0, ms(t0, 500)), Some(4));
}

#[test]
fn test_inverted_scroll_direction() {
    let mut nav = navigator().with_direction(ScrollDirection::DownAdvances);
    let t0 = Instant::now();
    assert_eq!(nav.handle_wheel(40.0, t0), Some(3));
    assert_eq!(nav.handle_wheel(-40.0, ms(t0, 500)), Some(2));
}

// ============================================================================
// Panel transforms
// ============================================================================

#[test]
fn test_transforms_stack_away_from_active() {
    let nav = navigator();
    // Active at 2: offsets grow strictly with distance on both sides.
    let ahead: Vec<f32> = (3..6).map(|i| nav.transform(i).offset_pct).collect();
    assert!(ahead[0].abs() < ahead[1].abs() && ahead[1].abs() < ahead[2].abs());

    let behind: Vec<f32> = (0..2).map(|i| nav.transform(i).offset_pct).collect();
    assert!(behind[0].abs() > behind[1].abs());

    // Z-order decreases with distance, active on top.
    assert!(nav.transform(2).z_order > nav.transform(3).z_order);
    assert!(nav.transform(3).z_order > nav.transform(5).z_order);
}

#[test]
fn test_inactive_panels_scale_up_slightly() {
    let nav = navigator();
    assert_eq!(nav.transform(2).scale, 1.0);
    for i in [0usize, 1, 3, 4, 5] {
        assert_eq!(nav.transform(i).scale, 1.08);
    }
}
