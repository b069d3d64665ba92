#![forbid(unsafe_code)]

//! Bubbling command dispatch.
//!
//! A [`CommandRouter`] holds a chain of receivers. The most recently
//! registered receiver is the innermost and sees a command first; each
//! receiver either stops the command or lets it continue outward. Receivers
//! filter by [`StackId`](stackmenu_core::command::StackId) themselves, so two
//! stacks sharing a router never act on each other's commands.
//!
//! Receivers are shared (`Rc<RefCell<_>>`) so the host keeps direct access
//! to the widgets it registered.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use stackmenu_core::command::{Command, Propagation};
use stackmenu_core::logging::ROUTER_TARGET;

/// Something that can claim commands.
pub trait CommandReceiver<P = ()> {
    /// Handle `command` or let it continue to outer receivers.
    fn receive(&mut self, command: &mut Command<P>) -> Propagation;
}

/// Registration token returned by [`CommandRouter::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReceiverId(u64);

/// Shared handle to a registered receiver.
pub type SharedReceiver<P> = Rc<RefCell<dyn CommandReceiver<P>>>;

/// Ordered receiver chain, outermost first.
pub struct CommandRouter<P = ()> {
    receivers: Vec<(ReceiverId, SharedReceiver<P>)>,
    next_id: u64,
}

impl<P> Default for CommandRouter<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for CommandRouter<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ids: Vec<ReceiverId> = self.receivers.iter().map(|(id, _)| *id).collect();
        f.debug_struct("CommandRouter").field("receivers", &ids).finish()
    }
}

impl<P> CommandRouter<P> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            receivers: Vec::new(),
            next_id: 0,
        }
    }

    /// Register `receiver` as the new innermost receiver.
    pub fn register(&mut self, receiver: SharedReceiver<P>) -> ReceiverId {
        let id = ReceiverId(self.next_id);
        self.next_id += 1;
        self.receivers.push((id, receiver));
        id
    }

    /// Remove a receiver. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ReceiverId) -> bool {
        let before = self.receivers.len();
        self.receivers.retain(|(rid, _)| *rid != id);
        before != self.receivers.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.receivers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.receivers.is_empty()
    }

    /// Offer `command` to each receiver, innermost first, until one stops
    /// it.
    ///
    /// A receiver that is already borrowed (a receiver dispatching through
    /// the router from inside its own handler) is skipped.
    pub fn dispatch(&self, command: &mut Command<P>) -> Propagation {
        for (id, receiver) in self.receivers.iter().rev() {
            let Ok(mut receiver) = receiver.try_borrow_mut() else {
                tracing::warn!(
                    target: ROUTER_TARGET,
                    receiver = ?id,
                    kind = ?command.kind(),
                    "receiver busy; command skipped"
                );
                continue;
            };
            if receiver.receive(command).is_stopped() {
                return Propagation::Stop;
            }
        }
        Propagation::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stackmenu_core::command::{CommandKind, StackId};

    struct Recorder {
        stack: StackId,
        seen: Vec<CommandKind>,
    }

    impl CommandReceiver for Recorder {
        fn receive(&mut self, command: &mut Command) -> Propagation {
            if !command.targets(&self.stack) {
                return Propagation::Continue;
            }
            self.seen.push(command.kind());
            Propagation::Stop
        }
    }

    fn recorder(stack: &str) -> Rc<RefCell<Recorder>> {
        Rc::new(RefCell::new(Recorder {
            stack: stack.into(),
            seen: Vec::new(),
        }))
    }

    #[test]
    fn routes_by_stack_id() {
        let outer = recorder("outer");
        let inner = recorder("inner");
        let mut router: CommandRouter = CommandRouter::new();
        router.register(outer.clone());
        router.register(inner.clone());

        let mut up = Command::new(CommandKind::Up, "outer");
        assert_eq!(router.dispatch(&mut up), Propagation::Stop);
        assert_eq!(outer.borrow().seen, vec![CommandKind::Up]);
        assert!(inner.borrow().seen.is_empty());

        let mut stray = Command::new(CommandKind::Up, "nobody");
        assert_eq!(router.dispatch(&mut stray), Propagation::Continue);
    }

    #[test]
    fn innermost_sees_first() {
        let first = recorder("same");
        let second = recorder("same");
        let mut router: CommandRouter = CommandRouter::new();
        router.register(first.clone());
        router.register(second.clone());

        let mut cmd = Command::new(CommandKind::Top, "same");
        router.dispatch(&mut cmd);
        assert!(first.borrow().seen.is_empty());
        assert_eq!(second.borrow().seen.len(), 1);
    }

    #[test]
    fn unregister_removes_receiver() {
        let only = recorder("s");
        let mut router: CommandRouter = CommandRouter::new();
        let id = router.register(only.clone());
        assert!(router.unregister(id));
        assert!(!router.unregister(id));
        assert!(router.is_empty());
        let mut cmd = Command::new(CommandKind::Back, "s");
        assert_eq!(router.dispatch(&mut cmd), Propagation::Continue);
    }

    #[test]
    fn busy_receiver_is_skipped() {
        let busy = recorder("s");
        let mut router: CommandRouter = CommandRouter::new();
        router.register(busy.clone());
        let _guard = busy.borrow_mut();
        let mut cmd = Command::new(CommandKind::Back, "s");
        assert_eq!(router.dispatch(&mut cmd), Propagation::Continue);
    }

    /// Collects `(level, target)` of every event.
    struct Targets(std::sync::Arc<std::sync::Mutex<Vec<(tracing::Level, String)>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for Targets {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            let meta = event.metadata();
            self.0
                .lock()
                .unwrap()
                .push((*meta.level(), meta.target().to_owned()));
        }
    }

    #[test]
    fn busy_receiver_warns_under_router_target() {
        use tracing_subscriber::layer::SubscriberExt;

        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(Targets(seen.clone()));

        let busy = recorder("s");
        let mut router: CommandRouter = CommandRouter::new();
        router.register(busy.clone());
        let _guard = busy.borrow_mut();
        tracing::subscriber::with_default(subscriber, || {
            let mut cmd = Command::new(CommandKind::Up, "s");
            router.dispatch(&mut cmd);
        });

        let seen = seen.lock().unwrap();
        assert_eq!(*seen, vec![(tracing::Level::WARN, ROUTER_TARGET.to_owned())]);
    }
}
