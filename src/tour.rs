//! Tour orchestration: step navigation, the live session and its viewport
//! listeners, and the stream of displayed steps.

use std::fmt;
use std::str::FromStr;
use std::sync::mpsc;
use std::time::Duration;

use crate::debounce::{Debouncer, ViewportEvent};
use crate::defaults;
use crate::errors::UnknownAction;
use crate::geometry;
use crate::host::{Effect, Host};
use crate::overlay::Overlay;
use crate::step::{self, GlobalConfig, Step, StepDefinition, StepId, TourDefinition};
use crate::types::Position;

/// Why `run` did or did not start a tour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Started,
    /// A tour is live on this handle; call `finish` first.
    AlreadyRunning,
    /// The step list was empty.
    NoSteps,
    /// Every step pointed at a missing or invisible element.
    NothingVisible,
}

/// Something a tour subscriber is told.
#[derive(Debug, Clone, PartialEq)]
pub enum StepEvent<E> {
    /// A step was displayed. `position` is where the popup actually went.
    Step { step: Step<E>, position: Position },
    /// The tour ended. Nothing follows on this stream.
    Finished,
}

/// Receiving end of [`GuidedTour::subscribe`].
///
/// Non-blocking: the tour runs on the caller's thread, so everything it
/// emitted is already queued.
#[derive(Debug)]
pub struct StepStream<E> {
    rx: mpsc::Receiver<StepEvent<E>>,
}

impl<E> StepStream<E> {
    /// Next queued event, if any.
    pub fn try_next(&self) -> Option<StepEvent<E>> {
        self.rx.try_recv().ok()
    }

    /// Every queued event, oldest first.
    pub fn drain(&self) -> Vec<StepEvent<E>> {
        self.rx.try_iter().collect()
    }
}

impl<E> Iterator for StepStream<E> {
    type Item = StepEvent<E>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next()
    }
}

/// Fan-out with replay of the latest step, like a one-slot replay subject.
#[derive(Debug)]
struct Broadcaster<E> {
    subscribers: Vec<mpsc::Sender<StepEvent<E>>>,
    latest: Option<StepEvent<E>>,
}

impl<E> Default for Broadcaster<E> {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            latest: None,
        }
    }
}

impl<E: Clone> Broadcaster<E> {
    fn subscribe(&mut self) -> StepStream<E> {
        let (tx, rx) = mpsc::channel();
        if let Some(latest) = &self.latest {
            let _ = tx.send(latest.clone());
        }
        self.subscribers.push(tx);
        StepStream { rx }
    }

    fn send(&mut self, event: StepEvent<E>) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        self.latest = Some(event);
    }

    /// Emit the terminal event and hang up on everyone.
    fn finish(&mut self) {
        for tx in self.subscribers.drain(..) {
            let _ = tx.send(StepEvent::Finished);
        }
        self.latest = None;
    }
}

/// Which step the overlay is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Active {
    Index(usize),
    Skip,
}

/// Everything that exists only while a tour runs.
#[derive(Debug)]
struct Session<E> {
    /// The list given to `run`, kept for re-filtering on resize.
    definitions: Vec<StepDefinition>,
    options: Option<GlobalConfig>,
    steps: Vec<Step<E>>,
    skip: Option<Step<E>>,
    current: Option<usize>,
    previous: Option<usize>,
    active: Option<Active>,
    resize: Debouncer,
    scroll_end: Debouncer,
}

impl<E> Session<E> {
    fn step(&self, active: Active) -> Option<&Step<E>> {
        match active {
            Active::Index(i) => self.steps.get(i),
            Active::Skip => self.skip.as_ref(),
        }
    }

    fn ids(steps: &[Step<E>]) -> impl Iterator<Item = StepId> + '_ {
        steps.iter().map(|s| s.id)
    }
}

/// Buttons inside step components drive the tour through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TourAction {
    Next,
    Prev,
    Skip,
    Finish,
}

impl FromStr for TourAction {
    type Err = UnknownAction;

    /// Accepts `next` as well as the control name `guided-tour-next`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        let name = name.strip_prefix("guided-tour-").unwrap_or(name);
        match name {
            "next" => Ok(TourAction::Next),
            "prev" | "previous" => Ok(TourAction::Prev),
            "skip" => Ok(TourAction::Skip),
            "finish" => Ok(TourAction::Finish),
            _ => Err(UnknownAction(s.to_string())),
        }
    }
}

impl fmt::Display for TourAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TourAction::Next => "guided-tour-next",
            TourAction::Prev => "guided-tour-prev",
            TourAction::Skip => "guided-tour-skip",
            TourAction::Finish => "guided-tour-finish",
        };
        f.write_str(name)
    }
}

/// A guided tour bound to one host.
///
/// At most one tour runs per handle. Navigation calls made while no tour
/// runs do nothing.
pub struct GuidedTour<H: Host> {
    host: H,
    overlay: Overlay,
    session: Option<Session<H::Element>>,
    broadcaster: Broadcaster<H::Element>,
}

impl<H: Host> fmt::Debug for GuidedTour<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuidedTour")
            .field("running", &self.is_running())
            .field("current_step_index", &self.current_step_index())
            .field("steps_count", &self.steps_count())
            .finish_non_exhaustive()
    }
}

impl<H: Host> GuidedTour<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            overlay: Overlay::default(),
            session: None,
            broadcaster: Broadcaster::default(),
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Stream of displayed steps. A late subscriber first receives the step
    /// currently shown, if any.
    pub fn subscribe(&mut self) -> StepStream<H::Element> {
        self.broadcaster.subscribe()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Start a tour and show its first step.
    pub fn run(&mut self, definitions: Vec<StepDefinition>, options: Option<GlobalConfig>) -> RunOutcome {
        if self.session.is_some() {
            crate::log::debug!("tour already running, ignoring run()");
            return RunOutcome::AlreadyRunning;
        }
        if definitions.is_empty() {
            return RunOutcome::NoSteps;
        }

        let steps = step::resolve_steps(&self.host, &definitions, options.as_ref());
        if steps.is_empty() {
            crate::log::debug!(defined = definitions.len(), "no visible steps, tour not started");
            return RunOutcome::NothingVisible;
        }
        crate::log::debug!(defined = definitions.len(), visible = steps.len(), "starting tour");

        let skip = step::resolve_skip_step(options.as_ref());
        self.session = Some(Session {
            definitions,
            options,
            steps,
            skip,
            current: None,
            previous: None,
            active: None,
            resize: Debouncer::new(defaults::RESIZE_DEBOUNCE),
            scroll_end: Debouncer::new(defaults::SCROLL_END_DEBOUNCE),
        });
        self.host.dispatch(Effect::Mount);
        self.next();
        RunOutcome::Started
    }

    /// [`GuidedTour::run`] with a loaded [`TourDefinition`].
    pub fn run_definition(&mut self, tour: TourDefinition) -> RunOutcome {
        self.run(tour.steps, tour.options)
    }

    /// Tear the overlay down and forget everything about the tour.
    pub fn finish(&mut self) {
        if self.session.take().is_none() {
            return;
        }
        crate::log::debug!("tour finished");
        self.host.dispatch(Effect::Unmount);
        self.broadcaster.finish();
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Advance one step. On the last step, or on the skip step, finish.
    pub fn next(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let next = session.current.map_or(0, |c| c + 1);
        if session.active == Some(Active::Skip) || next >= session.steps.len() {
            self.finish();
            return;
        }
        session.previous = session.current;
        session.current = Some(next);
        self.show(Active::Index(next));
    }

    /// Go back to the recorded previous step. Repeated calls keep walking
    /// back; with nothing recorded, show the first step.
    pub fn previous(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let target = session.previous.unwrap_or(0);
        session.current = Some(target);
        if let Some(p) = session.previous.filter(|p| *p > 0) {
            session.previous = Some(p - 1);
        }
        self.show(Active::Index(target));
    }

    /// Show the skip step, or jump to the last step when none is configured.
    pub fn skip(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.previous = session.current;
        if session.skip.is_some() {
            self.show(Active::Skip);
        } else {
            let last = session.steps.len().saturating_sub(1);
            session.current = Some(last);
            self.show(Active::Index(last));
        }
    }

    /// Lay the active step out again, e.g. after the page moved.
    pub fn refresh(&mut self) {
        if let Some(active) = self.session.as_ref().and_then(|s| s.active) {
            self.show(active);
        }
    }

    /// Back to the first step.
    pub fn restart(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.current = None;
        session.active = None;
        self.next();
    }

    pub fn perform(&mut self, action: TourAction) {
        crate::log::trace!(%action, "tour action");
        match action {
            TourAction::Next => self.next(),
            TourAction::Prev => self.previous(),
            TourAction::Skip => self.skip(),
            TourAction::Finish => self.finish(),
        }
    }

    fn show(&mut self, active: Active) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.active = Some(active);
        let Some(step) = session.step(active) else {
            return;
        };
        crate::log::debug!(id = %step.id, "showing step");
        let position = self.overlay.present(&mut self.host, step);
        self.broadcaster.send(StepEvent::Step {
            step: step.clone(),
            position,
        });
    }

    // ========================================================================
    // Viewport
    // ========================================================================

    /// Feed a viewport event observed at `now`. Handled on a later
    /// [`GuidedTour::tick`], once the event has settled.
    pub fn notify(&mut self, event: ViewportEvent, now: Duration) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match event {
            ViewportEvent::Resize => session.resize.trigger(now),
            ViewportEvent::ScrollEnd => session.scroll_end.trigger(now),
        }
    }

    /// Advance the clock, running any listener whose quiet period is over.
    pub fn tick(&mut self, now: Duration) {
        if self.session.as_mut().is_some_and(|s| s.resize.poll(now)) {
            self.on_resize();
        }
        if self.session.as_mut().is_some_and(|s| s.scroll_end.poll(now)) {
            self.on_scroll_end();
        }
    }

    /// Re-filter. Same steps: refresh. Different: restart. None: finish.
    fn on_resize(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let steps = step::resolve_steps(&self.host, &session.definitions, session.options.as_ref());
        if Session::ids(&steps).eq(Session::ids(&session.steps)) {
            crate::log::trace!("resize: steps unchanged");
            self.refresh();
        } else if steps.is_empty() {
            crate::log::debug!("resize: no visible steps left");
            self.finish();
        } else {
            crate::log::debug!(visible = steps.len(), "resize: steps changed, restarting");
            session.steps = steps;
            self.restart();
        }
    }

    /// Targets that scroll with the page are re-laid out once scrolling stops.
    fn on_scroll_end(&mut self) {
        let scrolls_with_page = self
            .active_step()
            .and_then(|s| s.element.as_ref())
            .is_some_and(|e| !geometry::is_fixed_element(&self.host, e));
        if scrolls_with_page {
            self.refresh();
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Index into the visible steps, `None` before the first step.
    pub fn current_step_index(&self) -> Option<usize> {
        self.session.as_ref().and_then(|s| s.current)
    }

    /// Number of visible steps.
    pub fn steps_count(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.steps.len())
    }

    /// The step at the current index.
    pub fn current_step(&self) -> Option<&Step<H::Element>> {
        let session = self.session.as_ref()?;
        session.steps.get(session.current?)
    }

    /// The step on screen; differs from `current_step` on the skip step.
    pub fn active_step(&self) -> Option<&Step<H::Element>> {
        let session = self.session.as_ref()?;
        session.step(session.active?)
    }

    pub fn is_first_step(&self) -> bool {
        self.active() == Some(Active::Index(0))
    }

    pub fn is_last_step(&self) -> bool {
        let last = self.steps_count().checked_sub(1);
        matches!((self.active(), last), (Some(Active::Index(i)), Some(l)) if i == l)
    }

    pub fn is_skip_step(&self) -> bool {
        self.active() == Some(Active::Skip)
    }

    fn active(&self) -> Option<Active> {
        self.session.as_ref().and_then(|s| s.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names() {
        assert_eq!("next".parse::<TourAction>(), Ok(TourAction::Next));
        assert_eq!("guided-tour-prev".parse::<TourAction>(), Ok(TourAction::Prev));
        assert_eq!("guided-tour-skip".parse::<TourAction>(), Ok(TourAction::Skip));
        assert_eq!(" finish ".parse::<TourAction>(), Ok(TourAction::Finish));
        assert_eq!(
            "guided-tour-jump".parse::<TourAction>(),
            Err(UnknownAction("guided-tour-jump".to_string()))
        );
        assert_eq!(TourAction::Next.to_string(), "guided-tour-next");
    }

    #[test]
    fn broadcaster_replays_latest_to_late_subscribers() {
        let mut b: Broadcaster<u32> = Broadcaster::default();
        let early = b.subscribe();
        assert!(early.try_next().is_none());

        b.send(StepEvent::Finished);
        let late = b.subscribe();
        assert_eq!(late.drain(), vec![StepEvent::Finished]);
        assert_eq!(early.drain(), vec![StepEvent::Finished]);
    }

    #[test]
    fn broadcaster_finish_hangs_up() {
        let mut b: Broadcaster<u32> = Broadcaster::default();
        let stream = b.subscribe();
        b.finish();
        assert_eq!(stream.try_next(), Some(StepEvent::Finished));
        assert!(matches!(stream.rx.try_recv(), Err(mpsc::TryRecvError::Disconnected)));

        let fresh = b.subscribe();
        assert!(fresh.try_next().is_none(), "nothing replayed after finish");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut b: Broadcaster<u32> = Broadcaster::default();
        let kept = b.subscribe();
        drop(b.subscribe());
        b.send(StepEvent::Finished);
        assert_eq!(b.subscribers.len(), 1);
        assert_eq!(kept.drain().len(), 1);
    }
}
