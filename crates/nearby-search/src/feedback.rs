//! Inline status text and transient toast notifications.
//!
//! The two channels are independent: a single event may update both.

use std::time::Duration;

use tokio::time::Instant;

/// Visual and semantic flavour of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

impl ToastKind {
    /// How long a toast of this kind stays up without manual dismissal.
    #[must_use]
    pub fn lifetime(self) -> Duration {
        match self {
            Self::Success => Duration::from_secs(4),
            Self::Error => Duration::from_secs(6),
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Success => "All set",
            Self::Error => "Heads up",
        }
    }

    /// Accessibility role announced for the toast.
    #[must_use]
    pub fn role(self) -> &'static str {
        match self {
            Self::Success => "status",
            Self::Error => "alert",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToastId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: ToastId,
    pub kind: ToastKind,
    pub message: String,
    pub expires_at: Instant,
}

/// The page region that hosts toasts.
///
/// Expiry is measured on the tokio clock; a driver calls
/// [`ToastHost::sweep`] (for instance after sleeping until
/// [`ToastHost::next_expiry`]) to drop toasts whose time is up.
#[derive(Debug, Default)]
pub struct ToastHost {
    next_id: u64,
    active: Vec<Toast>,
}

impl ToastHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: ToastKind, message: &str) -> ToastId {
        self.next_id += 1;
        let id = ToastId(self.next_id);
        self.active.push(Toast {
            id,
            kind,
            message: message.to_string(),
            expires_at: Instant::now() + kind.lifetime(),
        });
        id
    }

    /// Manual close. Returns `false` if the toast was already gone.
    pub fn dismiss(&mut self, id: ToastId) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.id != id);
        self.active.len() != before
    }

    /// Removes expired toasts and returns how many were dropped.
    pub fn sweep(&mut self) -> usize {
        let now = Instant::now();
        let before = self.active.len();
        self.active.retain(|t| t.expires_at > now);
        before - self.active.len()
    }

    #[must_use]
    pub fn next_expiry(&self) -> Option<Instant> {
        self.active.iter().map(|t| t.expires_at).min()
    }

    #[must_use]
    pub fn active(&self) -> &[Toast] {
        &self.active
    }
}

/// Blocking fallback used when the page has no toast host.
pub trait AlertSink: Send {
    fn alert(&mut self, message: &str);
}

impl<F> AlertSink for F
where
    F: FnMut(&str) + Send,
{
    fn alert(&mut self, message: &str) {
        self(message);
    }
}

/// Inline status text plus toasts.
pub struct FeedbackChannel {
    status: String,
    toasts: Option<ToastHost>,
    alert: Box<dyn AlertSink>,
}

impl FeedbackChannel {
    /// Creates a channel. Pass `None` for `toasts` when the page has no toast
    /// host; toasts then degrade to `alert`.
    #[must_use]
    pub fn new(toasts: Option<ToastHost>, alert: Box<dyn AlertSink>) -> Self {
        Self {
            status: String::new(),
            toasts,
            alert,
        }
    }

    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }

    /// Overwrites the status text; an empty message clears it.
    pub fn set_status(&mut self, message: &str) {
        message.clone_into(&mut self.status);
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    /// Shows a toast, or raises a blocking alert when no host exists.
    pub fn toast(&mut self, kind: ToastKind, message: &str) -> Option<ToastId> {
        if let Some(host) = self.toasts.as_mut() {
            return Some(host.push(kind, message));
        }
        tracing::warn!(?kind, "no toast host; falling back to alert");
        self.alert.alert(message);
        None
    }

    #[must_use]
    pub fn toasts(&self) -> Option<&ToastHost> {
        self.toasts.as_ref()
    }

    pub fn toasts_mut(&mut self) -> Option<&mut ToastHost> {
        self.toasts.as_mut()
    }
}

impl std::fmt::Debug for FeedbackChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackChannel")
            .field("status", &self.status)
            .field("toasts", &self.toasts)
            .finish_non_exhaustive()
    }
}
