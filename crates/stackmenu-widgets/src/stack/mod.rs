#![forbid(unsafe_code)]

//! Serialized, animated navigation stack.
//!
//! [`NavigationStack`] owns an ordered set of [`Frame`]s and a FIFO queue of
//! push/pop operations. Only one operation runs at a time; the host drives
//! its transition with [`tick`](NavigationStack::tick). Every enqueue returns
//! an [`OperationHandle`] synchronously, and the handle settles once the
//! operation's transition finishes or is cancelled.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use stackmenu_widgets::frame::FrameSpec;
//! use stackmenu_widgets::stack::NavigationStack;
//!
//! let mut stack = NavigationStack::new("panels");
//! let a = stack.push(FrameSpec::new("A"));
//! let b = stack.push(FrameSpec::new("B"));
//! let popped = stack.pop().expect("two frames are queued");
//!
//! while stack.tick(Duration::from_millis(16)) {}
//!
//! assert!(a.is_completed() && b.is_completed());
//! let frame = popped.take().and_then(|o| o.completed()).flatten().expect("B popped");
//! assert_eq!(*frame.content(), "B");
//! assert_eq!(*stack.peek().unwrap().content(), "A");
//! ```
//!
//! # Invariants
//!
//! - Operations on one stack settle in the order they were issued.
//! - At most one frame is `Entering` or `Leaving` at a time.
//! - `pop` and `peek` check emptiness synchronously; `pop` counts queued
//!   pushes and pops, so `push(A); push(B); pop()` is valid back to back.
//! - A cancelled transition still leaves its frame in a terminal phase
//!   (`Stable` for enter, `Detached` for exit).
//! - Cancellation and `clear` are idempotent.
//!
//! # Failure Modes
//!
//! - `pop`/`peek` on an empty stack: [`InvariantViolation::EmptyStack`].
//! - Unknown frame ids: [`InvariantViolation::UnknownFrame`].

pub mod operation;

use std::collections::VecDeque;
use std::rc::Rc;

use stackmenu_core::command::{Command, CommandTable, CommandTag, Propagation, StackId};
use stackmenu_core::error::{FrameId, InvariantViolation, Result};
use stackmenu_core::logging::STACK_TARGET;
use web_time::{Duration, Instant};

use crate::frame::{Frame, FrameFlags, FramePhase, FrameSpec};
use crate::router::CommandReceiver;
use crate::transition::{FrameTransition, TransitionConfig, TransitionDirection, TransitionValues};

pub use operation::{
    OperationHandle, OperationId, OperationOutcome, OperationStatus, OperationTicket,
};
use operation::{Settler, operation};

/// Result of a pop: the detached frame, or `None` when nothing was popped.
pub type PopHandle<C> = OperationHandle<Option<Frame<C>>>;

/// Container mutation reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackEvent {
    /// The frame entered the visual tree.
    Attached(FrameId),
    /// The frame left the visual tree and was released.
    Detached(FrameId),
    EnabledChanged { frame: FrameId, enabled: bool },
    DisplayChanged { frame: FrameId, displayed: bool },
    TransitionCompleted {
        frame: FrameId,
        direction: TransitionDirection,
    },
    TransitionCancelled {
        frame: FrameId,
        direction: TransitionDirection,
    },
}

enum QueuedKind<C> {
    Push {
        frame: Frame<C>,
        animate: bool,
        settler: Settler<FrameId>,
    },
    Pop {
        settler: Settler<Option<Frame<C>>>,
    },
}

struct Queued<C> {
    op: OperationId,
    kind: QueuedKind<C>,
}

enum Active<C> {
    Enter {
        op: OperationId,
        frame: FrameId,
        transition: FrameTransition,
        settler: Settler<FrameId>,
    },
    Exit {
        op: OperationId,
        frame: FrameId,
        transition: FrameTransition,
        settler: Settler<Option<Frame<C>>>,
    },
}

impl<C> Active<C> {
    fn frame(&self) -> FrameId {
        match self {
            Self::Enter { frame, .. } | Self::Exit { frame, .. } => *frame,
        }
    }

    fn transition(&self) -> &FrameTransition {
        match self {
            Self::Enter { transition, .. } | Self::Exit { transition, .. } => transition,
        }
    }

    fn transition_mut(&mut self) -> &mut FrameTransition {
        match self {
            Self::Enter { transition, .. } | Self::Exit { transition, .. } => transition,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Settle {
    Finished,
    Cancelled,
}

/// A LIFO stack of frames with serialized, animated mutation.
pub struct NavigationStack<C> {
    id: StackId,
    frames: Vec<Frame<C>>,
    queue: VecDeque<Queued<C>>,
    active: Option<Active<C>>,
    config: TransitionConfig,
    reduced_motion: bool,
    events: Vec<StackEvent>,
    next_frame_id: FrameId,
    next_op_id: OperationId,
    projected_depth: usize,
    current: OperationTicket,
    last_tick: Option<Instant>,
    commands: Rc<CommandTable<Self, FrameSpec<C>>>,
}

impl<C: 'static> std::fmt::Debug for NavigationStack<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationStack")
            .field("id", &self.id)
            .field("depth", &self.depth())
            .field("queued", &self.queue.len())
            .field("animating", &self.is_animating())
            .finish()
    }
}

impl<C: 'static> NavigationStack<C> {
    /// An empty stack with the default transition config.
    #[must_use]
    pub fn new(id: impl Into<StackId>) -> Self {
        Self::with_config(id, TransitionConfig::default())
    }

    #[must_use]
    pub fn with_config(id: impl Into<StackId>, config: TransitionConfig) -> Self {
        Self {
            id: id.into(),
            frames: Vec::new(),
            queue: VecDeque::new(),
            active: None,
            config,
            reduced_motion: false,
            events: Vec::new(),
            next_frame_id: 1,
            next_op_id: 1,
            projected_depth: 0,
            current: OperationTicket::settled(0),
            last_tick: None,
            commands: Rc::new(Self::command_table()),
        }
    }

    fn command_table() -> CommandTable<Self, FrameSpec<C>> {
        CommandTable::<Self, FrameSpec<C>>::new()
            .with(CommandTag::PushFrame, |stack, cmd| match cmd.take_payload() {
                Some(spec) => {
                    let _ = stack.push(spec);
                    Propagation::Stop
                }
                None => Propagation::Continue,
            })
            .with(CommandTag::PopFrame, |stack, _cmd| {
                let _ = stack.try_pop();
                Propagation::Stop
            })
            .with(CommandTag::Back, |stack, _cmd| {
                // The root frame is left for an outer receiver to handle.
                if stack.projected_depth > 1 {
                    let _ = stack.try_pop();
                    Propagation::Stop
                } else {
                    Propagation::Continue
                }
            })
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    #[must_use]
    pub fn id(&self) -> &StackId {
        &self.id
    }

    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Applies to transitions started after the call.
    pub fn set_reduced_motion(&mut self, reduced_motion: bool) {
        self.reduced_motion = reduced_motion;
    }

    /// Attached frames, bottom first. Includes a frame that is leaving.
    #[must_use]
    pub fn frames(&self) -> &[Frame<C>] {
        &self.frames
    }

    /// Look up an attached frame.
    pub fn frame(&self, id: FrameId) -> Result<&Frame<C>> {
        self.frames
            .iter()
            .find(|frame| frame.id() == id)
            .ok_or(InvariantViolation::UnknownFrame { frame_id: id })
    }

    /// Attached frames that are not leaving.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|frame| frame.phase() != FramePhase::Leaving)
            .count()
    }

    /// Depth once every queued operation has run.
    #[must_use]
    pub fn projected_depth(&self) -> usize {
        self.projected_depth
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depth() == 0
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Operations waiting behind the running one.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// The most recently issued operation. Already settled when idle.
    #[must_use]
    pub fn current_operation(&self) -> OperationTicket {
        self.current.clone()
    }

    /// The frame currently transitioning and its interpolated values.
    #[must_use]
    pub fn transition_values(&self) -> Option<(FrameId, TransitionValues)> {
        self.active
            .as_ref()
            .map(|active| (active.frame(), active.transition().values(&self.config)))
    }

    /// Take every container mutation since the last drain.
    pub fn drain_events(&mut self) -> Vec<StackEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Peek
    // ------------------------------------------------------------------

    /// The topmost frame that is not leaving.
    pub fn peek(&self) -> Result<&Frame<C>> {
        self.try_peek().ok_or_else(|| self.empty_error())
    }

    #[must_use]
    pub fn try_peek(&self) -> Option<&Frame<C>> {
        self.top_index().map(|index| &self.frames[index])
    }

    pub fn peek_mut(&mut self) -> Result<&mut Frame<C>> {
        let error = self.empty_error();
        self.try_peek_mut().ok_or(error)
    }

    pub fn try_peek_mut(&mut self) -> Option<&mut Frame<C>> {
        self.top_index().map(|index| &mut self.frames[index])
    }

    /// Change the header text of an attached frame.
    pub fn set_header_text(&mut self, id: FrameId, text: impl Into<String>) -> Result<()> {
        let frame = self
            .frames
            .iter_mut()
            .find(|frame| frame.id() == id)
            .ok_or(InvariantViolation::UnknownFrame { frame_id: id })?;
        if let Some(header) = frame.header_mut() {
            header.text = text.into();
        }
        Ok(())
    }

    /// The command an attached frame's back affordance sends.
    pub fn back_command(&self, id: FrameId) -> Result<Option<Command<FrameSpec<C>>>> {
        Ok(self.frame(id)?.back_command(&self.id))
    }

    // ------------------------------------------------------------------
    // Push / pop
    // ------------------------------------------------------------------

    /// Queue an animated push. The handle completes with the frame id once
    /// the frame has entered.
    pub fn push(&mut self, spec: FrameSpec<C>) -> OperationHandle<FrameId> {
        self.enqueue_push(spec, true)
    }

    /// Queue a push that skips the entrance transition. Settles
    /// synchronously when the stack is idle.
    pub fn push_immediate(&mut self, spec: FrameSpec<C>) -> OperationHandle<FrameId> {
        self.enqueue_push(spec, false)
    }

    /// Queue a pop of the top frame.
    ///
    /// Fails synchronously when no frame would be left to pop once the
    /// queued operations have run.
    pub fn pop(&mut self) -> Result<PopHandle<C>> {
        if self.projected_depth == 0 {
            return Err(self.empty_error());
        }
        Ok(self.enqueue_pop())
    }

    /// Queue a pop that resolves to `None` if the stack is empty when it
    /// runs.
    pub fn try_pop(&mut self) -> PopHandle<C> {
        self.enqueue_pop()
    }

    fn enqueue_push(&mut self, spec: FrameSpec<C>, animate: bool) -> OperationHandle<FrameId> {
        let op = self.next_op();
        let frame_id = self.next_frame_id;
        self.next_frame_id += 1;
        let (handle, settler) = operation(op);
        self.projected_depth += 1;
        self.current = handle.ticket();
        tracing::debug!(
            target: STACK_TARGET,
            stack_id = %self.id,
            op,
            frame_id,
            animate,
            depth = self.projected_depth,
            "push queued"
        );
        self.queue.push_back(Queued {
            op,
            kind: QueuedKind::Push {
                frame: Frame::from_spec(frame_id, spec),
                animate,
                settler,
            },
        });
        self.pump();
        handle
    }

    fn enqueue_pop(&mut self) -> PopHandle<C> {
        let op = self.next_op();
        let (handle, settler) = operation(op);
        self.projected_depth = self.projected_depth.saturating_sub(1);
        self.current = handle.ticket();
        tracing::debug!(
            target: STACK_TARGET,
            stack_id = %self.id,
            op,
            depth = self.projected_depth,
            "pop queued"
        );
        self.queue.push_back(Queued {
            op,
            kind: QueuedKind::Pop { settler },
        });
        self.pump();
        handle
    }

    // ------------------------------------------------------------------
    // Driving
    // ------------------------------------------------------------------

    /// Advance the running transition by `delta`. Returns `true` while an
    /// operation is still animating.
    pub fn tick(&mut self, delta: Duration) -> bool {
        let _span = tracing::debug_span!("stack.tick", stack_id = %self.id).entered();
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.transition_mut().tick(delta, &self.config) {
            if let Some(active) = self.active.take() {
                self.settle(active, Settle::Finished);
            }
            self.pump();
        }
        self.active.is_some()
    }

    /// [`tick`](Self::tick) with the time elapsed since the previous call.
    /// The first call only records `now`.
    pub fn tick_at(&mut self, now: Instant) -> bool {
        let delta = self
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);
        self.tick(delta)
    }

    /// Cancel the running transition, forcing its frame into a terminal
    /// phase. Queued operations then proceed. Returns `false` if nothing was
    /// running.
    pub fn cancel_transition(&mut self) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        self.settle(active, Settle::Cancelled);
        self.pump();
        true
    }

    /// Cancel every pending operation and detach every frame.
    pub fn clear(&mut self) {
        let had_work = self.active.is_some() || !self.queue.is_empty() || !self.frames.is_empty();
        if let Some(active) = self.active.take() {
            let frame = active.frame();
            let direction = active.transition().direction();
            match active {
                Active::Enter { settler, .. } => {
                    settler.cancel();
                }
                Active::Exit { settler, .. } => {
                    settler.cancel();
                }
            }
            self.events
                .push(StackEvent::TransitionCancelled { frame, direction });
        }
        for queued in self.queue.drain(..) {
            match queued.kind {
                QueuedKind::Push { settler, .. } => {
                    settler.cancel();
                }
                QueuedKind::Pop { settler } => {
                    settler.cancel();
                }
            }
        }
        while let Some(mut frame) = self.frames.pop() {
            frame.set_phase(FramePhase::Detached);
            frame.clear_flags();
            self.events.push(StackEvent::Detached(frame.id()));
        }
        self.projected_depth = 0;
        if had_work {
            tracing::debug!(target: STACK_TARGET, stack_id = %self.id, "stack cleared");
        }
    }

    /// Host teardown: same as [`clear`](Self::clear).
    pub fn detach(&mut self) {
        self.clear();
        self.last_tick = None;
    }

    /// Offer a command to this stack. Commands for other stacks continue
    /// propagating untouched.
    pub fn handle_command(&mut self, command: &mut Command<FrameSpec<C>>) -> Propagation {
        if !command.targets(&self.id) {
            return Propagation::Continue;
        }
        let table = Rc::clone(&self.commands);
        table.dispatch(self, command)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn next_op(&mut self) -> OperationId {
        let op = self.next_op_id;
        self.next_op_id += 1;
        op
    }

    fn empty_error(&self) -> InvariantViolation {
        InvariantViolation::EmptyStack {
            stack_id: self.id.clone(),
        }
    }

    fn top_index(&self) -> Option<usize> {
        self.frames
            .iter()
            .rposition(|frame| frame.phase() != FramePhase::Leaving)
    }

    fn index_of(&self, id: FrameId) -> Option<usize> {
        self.frames.iter().position(|frame| frame.id() == id)
    }

    fn set_enabled(&mut self, index: usize, enabled: bool) {
        let frame = &mut self.frames[index];
        if frame.set_flag(FrameFlags::ENABLED, enabled) {
            self.events.push(StackEvent::EnabledChanged {
                frame: frame.id(),
                enabled,
            });
        }
    }

    fn set_displayed(&mut self, index: usize, displayed: bool) {
        let frame = &mut self.frames[index];
        let changed = frame.set_flag(FrameFlags::DISPLAYED | FrameFlags::VISIBLE, displayed);
        if changed {
            self.events.push(StackEvent::DisplayChanged {
                frame: frame.id(),
                displayed,
            });
        }
    }

    /// Start queued operations until one needs time to animate.
    fn pump(&mut self) {
        while self.active.is_none() {
            let Some(queued) = self.queue.pop_front() else {
                break;
            };
            match queued.kind {
                QueuedKind::Push {
                    frame,
                    animate,
                    settler,
                } => self.start_push(queued.op, frame, animate, settler),
                QueuedKind::Pop { settler } => self.start_pop(queued.op, settler),
            }
        }
    }

    fn start_push(
        &mut self,
        op: OperationId,
        mut frame: Frame<C>,
        animate: bool,
        settler: Settler<FrameId>,
    ) {
        let below = self.top_index();
        if let Some(index) = below {
            self.set_enabled(index, false);
            if let Some(header) = frame.header_mut() {
                header.back_enabled = true;
            }
        }

        let frame_id = frame.id();
        frame.set_phase(FramePhase::Entering);
        frame.set_flag(FrameFlags::SHOWN, true);
        self.frames.push(frame);
        self.events.push(StackEvent::Attached(frame_id));
        tracing::debug!(
            target: STACK_TARGET,
            stack_id = %self.id,
            op,
            frame_id,
            depth = self.depth(),
            "push started"
        );

        let transition = FrameTransition::enter().with_reduced_motion(self.reduced_motion);
        let active = Active::Enter {
            op,
            frame: frame_id,
            transition,
            settler,
        };
        if !animate || active.transition().is_instant(&self.config) {
            self.settle(active, Settle::Finished);
        } else {
            self.active = Some(active);
        }
    }

    fn start_pop(&mut self, op: OperationId, settler: Settler<Option<Frame<C>>>) {
        let Some(index) = self.top_index() else {
            tracing::debug!(
                target: STACK_TARGET,
                stack_id = %self.id,
                op,
                depth = 0usize,
                "pop settled on empty stack"
            );
            settler.complete(None);
            return;
        };

        let frame_id = self.frames[index].id();
        self.frames[index].set_phase(FramePhase::Leaving);
        self.set_enabled(index, false);
        if let Some(beneath) = index.checked_sub(1) {
            self.set_displayed(beneath, true);
            self.set_enabled(beneath, true);
        }
        tracing::debug!(
            target: STACK_TARGET,
            stack_id = %self.id,
            op,
            frame_id,
            depth = self.depth(),
            "pop started"
        );

        let transition = FrameTransition::exit().with_reduced_motion(self.reduced_motion);
        let active = Active::Exit {
            op,
            frame: frame_id,
            transition,
            settler,
        };
        if active.transition().is_instant(&self.config) {
            self.settle(active, Settle::Finished);
        } else {
            self.active = Some(active);
        }
    }

    /// Bring the operation's frame to its terminal phase and resolve the
    /// handle.
    fn settle(&mut self, active: Active<C>, how: Settle) {
        match active {
            Active::Enter {
                op,
                frame,
                settler,
                ..
            } => {
                if let Some(index) = self.index_of(frame) {
                    self.frames[index].set_phase(FramePhase::Stable);
                    self.set_enabled(index, true);
                    if let Some(below) = index.checked_sub(1) {
                        self.set_displayed(below, false);
                    }
                }
                self.events.push(transition_event(frame, TransitionDirection::Enter, how));
                match how {
                    Settle::Finished => settler.complete(frame),
                    Settle::Cancelled => settler.cancel(),
                };
                tracing::debug!(
                    target: STACK_TARGET,
                    stack_id = %self.id,
                    op,
                    frame_id = frame,
                    cancelled = how == Settle::Cancelled,
                    depth = self.depth(),
                    "push settled"
                );
            }
            Active::Exit {
                op,
                frame,
                settler,
                ..
            } => {
                self.events.push(transition_event(frame, TransitionDirection::Exit, how));
                let detached = self.index_of(frame).map(|index| {
                    let mut detached = self.frames.remove(index);
                    detached.set_phase(FramePhase::Detached);
                    detached.clear_flags();
                    detached
                });
                if detached.is_some() {
                    self.events.push(StackEvent::Detached(frame));
                }
                match how {
                    Settle::Finished => settler.complete(detached),
                    Settle::Cancelled => settler.cancel(),
                };
                tracing::debug!(
                    target: STACK_TARGET,
                    stack_id = %self.id,
                    op,
                    frame_id = frame,
                    cancelled = how == Settle::Cancelled,
                    depth = self.depth(),
                    "pop settled"
                );
            }
        }
    }
}

fn transition_event(frame: FrameId, direction: TransitionDirection, how: Settle) -> StackEvent {
    match how {
        Settle::Finished => StackEvent::TransitionCompleted { frame, direction },
        Settle::Cancelled => StackEvent::TransitionCancelled { frame, direction },
    }
}

impl<C: 'static> CommandReceiver<FrameSpec<C>> for NavigationStack<C> {
    fn receive(&mut self, command: &mut Command<FrameSpec<C>>) -> Propagation {
        self.handle_command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackmenu_core::command::CommandKind;

    const STEP: Duration = Duration::from_millis(16);

    fn run(stack: &mut NavigationStack<&'static str>) {
        let mut guard = 0;
        while stack.tick(STEP) {
            guard += 1;
            assert!(guard < 10_000, "stack never settled");
        }
    }

    fn contents(stack: &NavigationStack<&'static str>) -> Vec<&'static str> {
        stack.frames().iter().map(|f| *f.content()).collect()
    }

    #[test]
    fn first_push_animates_and_settles() {
        let mut stack = NavigationStack::new("s");
        let handle = stack.push(FrameSpec::new("A"));
        assert!(!handle.is_settled());
        assert_eq!(stack.peek().unwrap().phase(), FramePhase::Entering);
        assert!(!stack.peek().unwrap().is_enabled());
        run(&mut stack);
        assert_eq!(handle.outcome(), Some(OperationOutcome::Completed(1)));
        let top = stack.peek().unwrap();
        assert_eq!(top.phase(), FramePhase::Stable);
        assert!(top.is_enabled());
    }

    #[test]
    fn instant_config_settles_synchronously() {
        let mut stack = NavigationStack::with_config("s", TransitionConfig::none());
        let a = stack.push(FrameSpec::new("A"));
        assert!(a.is_completed());
        let popped = stack.pop().unwrap();
        assert!(popped.is_completed());
        assert!(stack.is_empty());
    }

    #[test]
    fn pop_on_empty_fails_immediately() {
        let mut stack: NavigationStack<&'static str> = NavigationStack::new("empty");
        let err = stack.pop().unwrap_err();
        assert_eq!(
            err,
            InvariantViolation::EmptyStack {
                stack_id: "empty".into()
            }
        );
        assert!(stack.peek().is_err());
    }

    #[test]
    fn try_pop_on_empty_resolves_none() {
        let mut stack: NavigationStack<&'static str> = NavigationStack::new("s");
        let handle = stack.try_pop();
        assert!(matches!(handle.take(), Some(OperationOutcome::Completed(None))));
    }

    #[test]
    fn push_push_pop_leaves_a_stable_on_top() {
        let mut stack = NavigationStack::new("s");
        stack.push(FrameSpec::new("A"));
        stack.push(FrameSpec::new("B"));
        let popped = stack.pop().expect("projected depth is 2");
        run(&mut stack);

        assert_eq!(contents(&stack), vec!["A"]);
        let top = stack.peek().unwrap();
        assert_eq!(top.phase(), FramePhase::Stable);
        assert!(top.is_enabled() && top.is_displayed());
        let frame = popped.take().and_then(OperationOutcome::completed).flatten();
        let frame = frame.expect("B returned");
        assert_eq!(*frame.content(), "B");
        assert_eq!(frame.phase(), FramePhase::Detached);
        assert_eq!(frame.flags(), FrameFlags::NONE);
    }

    #[test]
    fn push_disables_previous_then_hides_it() {
        let mut stack = NavigationStack::new("s");
        stack.push_immediate(FrameSpec::new("root"));
        stack.drain_events();
        stack.push(FrameSpec::new("child"));
        let root = &stack.frames()[0];
        assert!(!root.is_enabled());
        assert!(root.is_displayed());
        run(&mut stack);
        assert!(!stack.frames()[0].is_displayed());
        let events = stack.drain_events();
        assert_eq!(
            events,
            vec![
                StackEvent::EnabledChanged {
                    frame: 1,
                    enabled: false
                },
                StackEvent::Attached(2),
                StackEvent::EnabledChanged {
                    frame: 2,
                    enabled: true
                },
                StackEvent::DisplayChanged {
                    frame: 1,
                    displayed: false
                },
                StackEvent::TransitionCompleted {
                    frame: 2,
                    direction: TransitionDirection::Enter
                },
            ]
        );
    }

    #[test]
    fn pop_restores_frame_beneath_immediately() {
        let mut stack = NavigationStack::new("s");
        stack.push_immediate(FrameSpec::new("root"));
        stack.push_immediate(FrameSpec::new("child"));
        let _ = stack.pop().unwrap();
        let root = &stack.frames()[0];
        assert!(root.is_enabled() && root.is_displayed());
        assert_eq!(stack.frames()[1].phase(), FramePhase::Leaving);
        assert_eq!(stack.depth(), 1);
        assert_eq!(*stack.peek().unwrap().content(), "root");
    }

    #[test]
    fn operations_wait_for_the_running_one() {
        let mut stack = NavigationStack::new("s");
        let a = stack.push(FrameSpec::new("A"));
        let b = stack.push(FrameSpec::new("B"));
        assert_eq!(stack.queued(), 1);
        assert_eq!(contents(&stack), vec!["A"]);
        assert_eq!(stack.current_operation().id(), b.id());
        stack.tick(Duration::from_secs(1));
        assert!(a.is_completed());
        assert!(!b.is_settled());
        assert_eq!(contents(&stack), vec!["A", "B"]);
    }

    #[test]
    fn cancelled_enter_still_stabilizes_frame() {
        let mut stack = NavigationStack::new("s");
        let handle = stack.push(FrameSpec::new("A"));
        stack.tick(STEP);
        assert!(stack.cancel_transition());
        assert!(handle.is_cancelled());
        let top = stack.peek().unwrap();
        assert_eq!(top.phase(), FramePhase::Stable);
        assert!(top.is_enabled());
        assert!(!stack.cancel_transition());
    }

    #[test]
    fn cancelled_exit_detaches_frame() {
        let mut stack = NavigationStack::new("s");
        stack.push_immediate(FrameSpec::new("root"));
        stack.push_immediate(FrameSpec::new("child"));
        let popped = stack.pop().unwrap();
        stack.cancel_transition();
        assert!(popped.is_cancelled());
        assert_eq!(contents(&stack), vec!["root"]);
    }

    #[test]
    fn clear_cancels_everything_and_is_idempotent() {
        let mut stack = NavigationStack::new("s");
        let a = stack.push(FrameSpec::new("A"));
        let b = stack.push(FrameSpec::new("B"));
        stack.clear();
        assert!(a.is_cancelled() && b.is_cancelled());
        assert!(stack.frames().is_empty());
        assert_eq!(stack.projected_depth(), 0);
        stack.drain_events();
        stack.clear();
        assert!(stack.drain_events().is_empty());
        assert!(stack.pop().is_err());
    }

    #[test]
    fn commands_for_other_stacks_propagate() {
        let mut stack = NavigationStack::with_config("mine", TransitionConfig::none());
        let mut cmd = Command::push_frame("theirs", FrameSpec::new("X"));
        assert_eq!(stack.handle_command(&mut cmd), Propagation::Continue);
        assert!(stack.is_empty());

        let mut cmd = Command::push_frame("mine", FrameSpec::new("X"));
        assert_eq!(stack.handle_command(&mut cmd), Propagation::Stop);
        assert_eq!(contents(&stack), vec!["X"]);

        let mut pop = Command::pop_frame("mine");
        assert_eq!(stack.handle_command(&mut pop), Propagation::Stop);
        assert!(stack.is_empty());
    }

    #[test]
    fn back_on_root_bubbles() {
        let mut stack = NavigationStack::with_config("s", TransitionConfig::none());
        stack.push(FrameSpec::new("root"));
        let mut back = Command::new(CommandKind::Back, "s");
        assert_eq!(stack.handle_command(&mut back), Propagation::Continue);
        stack.push(FrameSpec::new("child"));
        assert_eq!(stack.handle_command(&mut back), Propagation::Stop);
        assert_eq!(contents(&stack), vec!["root"]);
    }

    #[test]
    fn header_back_enabled_above_root() {
        let mut stack = NavigationStack::with_config("s", TransitionConfig::none());
        let root = stack.push(FrameSpec::new("root").titled("Root"));
        let child = stack.push(FrameSpec::new("child").titled("Child"));
        let root_id = root.outcome().and_then(OperationOutcome::completed).unwrap();
        let child_id = child.outcome().and_then(OperationOutcome::completed).unwrap();
        assert!(stack.back_command(root_id).unwrap().is_none());
        let back = stack.back_command(child_id).unwrap().expect("back affordance");
        assert_eq!(back.kind(), CommandKind::Back);
        assert!(stack.back_command(999).is_err());
    }

    #[test]
    fn transition_values_track_active_frame() {
        let mut stack = NavigationStack::new("s");
        assert!(stack.transition_values().is_none());
        stack.push(FrameSpec::new("A"));
        let (frame, values) = stack.transition_values().expect("entering");
        assert_eq!(frame, 1);
        assert!(values.opacity < 1.0);
    }
}
