#![forbid(unsafe_code)]

//! Handles for queued stack operations.
//!
//! Every push or pop returns an [`OperationHandle`] immediately. The stack
//! keeps the matching [`Settler`] and resolves it exactly once, either
//! [`Completed`](OperationOutcome::Completed) when the transition finishes or
//! [`Cancelled`](OperationOutcome::Cancelled) when it is torn down. Later
//! resolution attempts are no-ops.
//!
//! Handles are single-threaded (`Rc`), like the stack that drives them.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Monotonic per-stack operation number.
pub type OperationId = u64;

/// Settlement state without the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OperationStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
}

impl OperationStatus {
    #[inline]
    #[must_use]
    pub fn is_settled(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Terminal outcome of an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationOutcome<T> {
    Completed(T),
    /// Torn down before finishing. Not an error.
    Cancelled,
}

impl<T> OperationOutcome<T> {
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The completed value, if any.
    #[must_use]
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Cancelled => None,
        }
    }
}

struct Shared<T> {
    status: Cell<OperationStatus>,
    value: RefCell<Option<T>>,
}

/// Caller side of a queued operation.
pub struct OperationHandle<T> {
    id: OperationId,
    shared: Rc<Shared<T>>,
}

impl<T> Clone for OperationHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for OperationHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationHandle")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}

impl<T> OperationHandle<T> {
    #[must_use]
    pub fn id(&self) -> OperationId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> OperationStatus {
        self.shared.status.get()
    }

    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }

    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status() == OperationStatus::Completed
    }

    #[inline]
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.status() == OperationStatus::Cancelled
    }

    /// Outcome, cloning the value. `None` while pending or after the value
    /// was taken.
    #[must_use]
    pub fn outcome(&self) -> Option<OperationOutcome<T>>
    where
        T: Clone,
    {
        match self.status() {
            OperationStatus::Pending => None,
            OperationStatus::Cancelled => Some(OperationOutcome::Cancelled),
            OperationStatus::Completed => self
                .shared
                .value
                .borrow()
                .clone()
                .map(OperationOutcome::Completed),
        }
    }

    /// Outcome, moving the value out. The status stays settled; a second
    /// take of a completed operation returns `None`.
    pub fn take(&self) -> Option<OperationOutcome<T>> {
        match self.status() {
            OperationStatus::Pending => None,
            OperationStatus::Cancelled => Some(OperationOutcome::Cancelled),
            OperationStatus::Completed => self
                .shared
                .value
                .borrow_mut()
                .take()
                .map(OperationOutcome::Completed),
        }
    }

    /// Type-erased view that only reports status.
    #[must_use]
    pub fn ticket(&self) -> OperationTicket
    where
        T: 'static,
    {
        OperationTicket {
            id: self.id,
            status: Rc::clone(&self.shared) as Rc<dyn StatusSource>,
        }
    }
}

trait StatusSource {
    fn status(&self) -> OperationStatus;
}

impl<T> StatusSource for Shared<T> {
    fn status(&self) -> OperationStatus {
        self.status.get()
    }
}

/// Status-only handle, used for "what is pending on this stack".
#[derive(Clone)]
pub struct OperationTicket {
    id: OperationId,
    status: Rc<dyn StatusSource>,
}

impl fmt::Debug for OperationTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationTicket")
            .field("id", &self.id)
            .field("status", &self.status())
            .finish()
    }
}

impl OperationTicket {
    /// A ticket that is already settled, for an idle stack.
    #[must_use]
    pub fn settled(id: OperationId) -> Self {
        let (handle, settler) = operation::<()>(id);
        settler.complete(());
        handle.ticket()
    }

    #[must_use]
    pub fn id(&self) -> OperationId {
        self.id
    }

    #[must_use]
    pub fn status(&self) -> OperationStatus {
        self.status.status()
    }

    #[inline]
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.status().is_settled()
    }
}

/// Stack side of a queued operation.
pub(crate) struct Settler<T> {
    shared: Rc<Shared<T>>,
}

impl<T> fmt::Debug for Settler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settler")
            .field("status", &self.shared.status.get())
            .finish()
    }
}

impl<T> Settler<T> {
    /// Resolve as completed. Returns `false` if already settled.
    pub(crate) fn complete(self, value: T) -> bool {
        if self.shared.status.get().is_settled() {
            return false;
        }
        *self.shared.value.borrow_mut() = Some(value);
        self.shared.status.set(OperationStatus::Completed);
        true
    }

    /// Resolve as cancelled. Returns `false` if already settled.
    pub(crate) fn cancel(self) -> bool {
        if self.shared.status.get().is_settled() {
            return false;
        }
        self.shared.status.set(OperationStatus::Cancelled);
        true
    }
}

/// Create a linked handle/settler pair.
pub(crate) fn operation<T>(id: OperationId) -> (OperationHandle<T>, Settler<T>) {
    let shared = Rc::new(Shared {
        status: Cell::new(OperationStatus::Pending),
        value: RefCell::new(None),
    });
    (
        OperationHandle {
            id,
            shared: Rc::clone(&shared),
        },
        Settler { shared },
    )
}
