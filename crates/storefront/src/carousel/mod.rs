//! Rotating slide groups.
//!
//! A [`SlideGroup`] is a pure state machine: every operation takes the
//! current instant and updates the next rotation deadline. The
//! [`driver`] module runs one group per tokio task and feeds it timer fires
//! and visitor events.
//!
//! # Invariants
//!
//! - Exactly one slide is active and `active < len`.
//! - A deadline exists exactly when the group is running.
//! - Any change of the active slide by a visitor restarts the countdown.

mod driver;

pub use driver::{CarouselController, CarouselEvent, CarouselHandle, CarouselView, GroupSpec};

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::time::Instant;

/// Default time between automatic advances.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(3000);

/// A "buy" link inside a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallToAction {
    pub href: Option<String>,
}

/// One slide of a group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    /// Overrides the group's display title while active.
    pub title: Option<String>,
    /// Overrides the group's display price while active.
    pub price_label: Option<String>,
    pub target_url: Option<String>,
    pub initially_active: bool,
    pub call_to_action: Option<CallToAction>,
}

impl Slide {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: impl Into<String>) -> Self {
        self.price_label = Some(price.into());
        self
    }

    /// Target page, wired into the call to action on initialization.
    #[must_use]
    pub fn with_target(mut self, url: impl Into<String>) -> Self {
        self.target_url = Some(url.into());
        self.call_to_action.get_or_insert_with(CallToAction::default);
        self
    }

    #[must_use]
    pub const fn active(mut self) -> Self {
        self.initially_active = true;
        self
    }
}

/// Title and price shown in the group's info panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlideDisplay {
    pub title: String,
    pub price: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationState {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Why a group is paused. Each reason is set and cleared independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PauseReason {
    /// The pointer is over the group.
    Hover,
    /// The page is not visible.
    Hidden,
}

/// State of one carousel.
#[derive(Debug, Clone)]
pub struct SlideGroup {
    slides: Vec<Slide>,
    active: usize,
    display: SlideDisplay,
    period: Duration,
    paused_by: BTreeSet<PauseReason>,
    deadline: Option<Instant>,
}

impl SlideGroup {
    /// Prepare a group and start its rotation at `now`.
    ///
    /// Returns `None` for a group without slides; such a group is inert.
    /// The first slide flagged active is shown, or the first slide.
    #[must_use]
    pub fn initialize(
        mut slides: Vec<Slide>,
        display: SlideDisplay,
        period: Duration,
        now: Instant,
    ) -> Option<Self> {
        if slides.is_empty() {
            return None;
        }

        for slide in &mut slides {
            if let (Some(cta), Some(url)) = (slide.call_to_action.as_mut(), &slide.target_url) {
                cta.href = Some(url.clone());
            }
        }

        let initial = slides.iter().position(|s| s.initially_active).unwrap_or(0);
        let mut group = Self {
            slides,
            active: 0,
            display,
            period,
            paused_by: BTreeSet::new(),
            deadline: Some(now + period),
        };
        group.set_active(initial);
        Some(group)
    }

    /// Show slide `index`. Out-of-range indices are ignored.
    ///
    /// The display fields are overwritten only by values the slide carries.
    pub fn set_active(&mut self, index: usize) {
        let Some(slide) = self.slides.get(index) else {
            return;
        };
        self.active = index;
        if let Some(title) = &slide.title {
            self.display.title.clone_from(title);
        }
        if let Some(price) = &slide.price_label {
            self.display.price.clone_from(price);
        }
    }

    /// Move one slide in `direction`, wrapping around.
    ///
    /// A running group starts a fresh full period; a paused group stays
    /// paused.
    pub fn advance(&mut self, direction: Direction, now: Instant) {
        let len = self.slides.len();
        let next = match direction {
            Direction::Forward => (self.active + 1) % len,
            Direction::Backward => (self.active + len - 1) % len,
        };
        self.set_active(next);
        if self.deadline.is_some() {
            self.deadline = Some(now + self.period);
        }
    }

    /// Add a pause reason and cancel the pending advance.
    pub fn pause(&mut self, reason: PauseReason) {
        self.paused_by.insert(reason);
        self.deadline = None;
    }

    /// Clear a pause reason. If no reason remains and the group was paused,
    /// rotation restarts with a full period from `now`.
    pub fn resume(&mut self, reason: PauseReason, now: Instant) {
        self.paused_by.remove(&reason);
        if self.paused_by.is_empty() && self.deadline.is_none() {
            self.deadline = Some(now + self.period);
        }
    }

    /// Fire the automatic advance if the deadline has passed.
    ///
    /// Returns whether the group advanced. The next deadline is one period
    /// after `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.advance(Direction::Forward, now);
                true
            }
            _ => false,
        }
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub const fn active_index(&self) -> usize {
        self.active
    }

    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    #[must_use]
    pub const fn display(&self) -> &SlideDisplay {
        &self.display
    }

    #[must_use]
    pub const fn state(&self) -> RotationState {
        if self.deadline.is_some() {
            RotationState::Running
        } else {
            RotationState::Paused
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(3000);

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide::new().with_title(format!("Pack {i}")).with_price(format!("{i}00 €")))
            .collect()
    }

    fn group(slides: Vec<Slide>, now: Instant) -> SlideGroup {
        SlideGroup::initialize(slides, SlideDisplay::default(), PERIOD, now).unwrap()
    }

    #[test]
    fn test_empty_group_is_inert() {
        let now = Instant::now();
        assert!(SlideGroup::initialize(Vec::new(), SlideDisplay::default(), PERIOD, now).is_none());
    }

    #[test]
    fn test_initial_slide_selection() {
        let now = Instant::now();
        assert_eq!(group(slides(3), now).active_index(), 0);

        let mut flagged = slides(4);
        flagged[2].initially_active = true;
        flagged[3].initially_active = true;
        let g = group(flagged, now);
        assert_eq!(g.active_index(), 2);
        assert_eq!(g.display().title, "Pack 2");
        assert_eq!(g.state(), RotationState::Running);
        assert_eq!(g.deadline(), Some(now + PERIOD));
    }

    #[test]
    fn test_call_to_action_wired_to_target() {
        let now = Instant::now();
        let g = group(
            vec![
                Slide::new().with_target("pack-roma.html"),
                Slide { call_to_action: Some(CallToAction::default()), ..Slide::new() },
            ],
            now,
        );
        assert_eq!(
            g.slides()[0].call_to_action.as_ref().unwrap().href.as_deref(),
            Some("pack-roma.html")
        );
        assert_eq!(g.slides()[1].call_to_action.as_ref().unwrap().href, None);
    }

    #[test]
    fn test_display_kept_when_slide_has_no_override() {
        let now = Instant::now();
        let mut mixed = slides(2);
        mixed[1].price_label = None;
        let mut g = group(mixed, now);

        g.set_active(1);
        assert_eq!(g.display().title, "Pack 1");
        assert_eq!(g.display().price, "000 €");
    }

    #[test]
    fn test_set_active_out_of_range_ignored() {
        let mut g = group(slides(2), Instant::now());
        g.set_active(5);
        assert_eq!(g.active_index(), 0);
    }

    #[test]
    fn test_advance_wraps_both_ways() {
        let now = Instant::now();
        let mut g = group(slides(3), now);
        g.advance(Direction::Backward, now);
        assert_eq!(g.active_index(), 2);
        g.advance(Direction::Forward, now);
        assert_eq!(g.active_index(), 0);
    }

    #[test]
    fn test_advance_restarts_countdown() {
        let start = Instant::now();
        let mut g = group(slides(3), start);
        let later = start + Duration::from_millis(2500);
        g.advance(Direction::Forward, later);
        assert_eq!(g.deadline(), Some(later + PERIOD));
    }

    #[test]
    fn test_single_slide_advance_resets_countdown() {
        let start = Instant::now();
        let mut g = group(slides(1), start);
        let later = start + Duration::from_millis(1000);
        g.advance(Direction::Forward, later);
        assert_eq!(g.active_index(), 0);
        assert_eq!(g.deadline(), Some(later + PERIOD));
    }

    #[test]
    fn test_poll_fires_only_after_deadline() {
        let start = Instant::now();
        let mut g = group(slides(3), start);
        assert!(!g.poll(start + PERIOD - Duration::from_millis(1)));
        assert_eq!(g.active_index(), 0);

        let fire = start + PERIOD;
        assert!(g.poll(fire));
        assert_eq!(g.active_index(), 1);
        assert_eq!(g.deadline(), Some(fire + PERIOD));
    }

    #[test]
    fn test_pause_reasons_are_independent() {
        let start = Instant::now();
        let mut g = group(slides(3), start);

        g.pause(PauseReason::Hover);
        g.pause(PauseReason::Hidden);
        assert_eq!(g.state(), RotationState::Paused);
        assert!(!g.poll(start + PERIOD * 10));

        let t = start + PERIOD;
        g.resume(PauseReason::Hover, t);
        assert_eq!(g.state(), RotationState::Paused);

        g.resume(PauseReason::Hidden, t);
        assert_eq!(g.state(), RotationState::Running);
        assert_eq!(g.deadline(), Some(t + PERIOD));
    }

    #[test]
    fn test_resume_while_running_keeps_deadline() {
        let start = Instant::now();
        let mut g = group(slides(2), start);
        g.resume(PauseReason::Hover, start + Duration::from_millis(2000));
        assert_eq!(g.deadline(), Some(start + PERIOD));
    }

    #[test]
    fn test_manual_navigation_while_paused_stays_paused() {
        let start = Instant::now();
        let mut g = group(slides(3), start);
        g.pause(PauseReason::Hover);
        g.advance(Direction::Forward, start);
        assert_eq!(g.active_index(), 1);
        assert_eq!(g.state(), RotationState::Paused);
    }
}
