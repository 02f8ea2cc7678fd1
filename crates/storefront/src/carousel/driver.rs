//! Tokio driver for slide groups.
//!
//! Each group is owned by one task. Timer fires and visitor events are
//! serialized through a single `select!` loop, so a group never sees two
//! events at once. Groups share nothing.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};

use super::{Direction, PauseReason, RotationState, Slide, SlideDisplay, SlideGroup};

const EVENT_BUFFER: usize = 32;

/// Visitor and page events delivered to a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselEvent {
    /// Show the next slide. A running group restarts its countdown; a
    /// paused group (pointer still over it, or page hidden) stays paused.
    Next,
    /// Show the previous slide. Same countdown rule as [`Self::Next`].
    Prev,
    PointerEnter,
    PointerLeave,
    /// Page visibility changed; `true` when visible.
    Visibility(bool),
}

/// What a group currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarouselView {
    pub active: usize,
    pub display: SlideDisplay,
    pub state: RotationState,
}

impl CarouselView {
    fn of(group: &SlideGroup) -> Self {
        Self {
            active: group.active_index(),
            display: group.display().clone(),
            state: group.state(),
        }
    }
}

/// Handle to a running group.
///
/// Dropping the handle closes the event channel, which stops the task.
#[derive(Debug)]
pub struct CarouselHandle {
    events: mpsc::Sender<CarouselEvent>,
    view: watch::Receiver<CarouselView>,
    task: JoinHandle<()>,
}

impl CarouselHandle {
    /// Spawn a task driving `group`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn spawn(group: SlideGroup) -> Self {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (view_tx, view_rx) = watch::channel(CarouselView::of(&group));
        let task = tokio::spawn(run(group, events_rx, view_tx));
        Self {
            events: events_tx,
            view: view_rx,
            task,
        }
    }

    /// Deliver an event. Events sent after the task ended are dropped.
    pub async fn send(&self, event: CarouselEvent) {
        if self.events.send(event).await.is_err() {
            tracing::debug!(?event, "Carousel stopped; event dropped");
        }
    }

    /// Snapshot of what the group shows now.
    #[must_use]
    pub fn view(&self) -> CarouselView {
        self.view.borrow().clone()
    }

    /// Receiver notified on every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CarouselView> {
        self.view.clone()
    }

    /// Stop the task and wait for it to finish.
    pub async fn shutdown(self) {
        let Self { events, task, .. } = self;
        drop(events);
        if let Err(e) = task.await
            && e.is_panic()
        {
            tracing::error!(error = %e, "Carousel task panicked");
        }
    }
}

async fn run(
    mut group: SlideGroup,
    mut events: mpsc::Receiver<CarouselEvent>,
    view: watch::Sender<CarouselView>,
) {
    loop {
        let deadline = group.deadline();
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                apply(&mut group, event, Instant::now());
            }
            () = wait_for(deadline) => {
                group.poll(Instant::now());
            }
        }
        view.send_if_modified(|current| {
            let next = CarouselView::of(&group);
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
    tracing::debug!("Carousel task stopped");
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn apply(group: &mut SlideGroup, event: CarouselEvent, now: Instant) {
    match event {
        CarouselEvent::Next => group.advance(Direction::Forward, now),
        CarouselEvent::Prev => group.advance(Direction::Backward, now),
        CarouselEvent::PointerEnter => group.pause(PauseReason::Hover),
        CarouselEvent::PointerLeave => group.resume(PauseReason::Hover, now),
        CarouselEvent::Visibility(false) => group.pause(PauseReason::Hidden),
        CarouselEvent::Visibility(true) => group.resume(PauseReason::Hidden, now),
    }
}

/// A slide group as found on a page, before initialization.
#[derive(Debug, Clone, Default)]
pub struct GroupSpec {
    pub slides: Vec<Slide>,
    pub display: SlideDisplay,
}

/// All carousels of one page.
#[derive(Debug, Default)]
pub struct CarouselController {
    handles: Vec<CarouselHandle>,
}

impl CarouselController {
    /// Initialize every group and spawn a task for each non-empty one.
    #[must_use]
    pub fn initialize_all(groups: Vec<GroupSpec>, period: Duration) -> Self {
        let now = Instant::now();
        let handles: Vec<_> = groups
            .into_iter()
            .filter_map(|spec| SlideGroup::initialize(spec.slides, spec.display, period, now))
            .map(CarouselHandle::spawn)
            .collect();
        tracing::debug!(groups = handles.len(), "Carousels started");
        Self { handles }
    }

    #[must_use]
    pub fn handles(&self) -> &[CarouselHandle] {
        &self.handles
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&CarouselHandle> {
        self.handles.get(index)
    }

    /// Stop every group.
    pub async fn shutdown(self) {
        for handle in self.handles {
            handle.shutdown().await;
        }
    }
}
