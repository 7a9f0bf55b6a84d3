//! Delivery of clash notices to whoever presents them to the user.

use super::types::ClashNotice;
use std::sync::Mutex;
use tracing::info;

/// Receives one notice per rejected session, synchronously, before apply
/// returns control to its caller.
pub trait Notifier {
    fn notify_clash(&self, notice: &ClashNotice);
}

/// Writes clash notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify_clash(&self, notice: &ClashNotice) {
        info!(
            subject = %notice.subject,
            teacher = %notice.teacher,
            class = %notice.class_name,
            "{}",
            notice
        );
    }
}

/// Buffers clash notices so a host can hand them back to the user, e.g. in
/// an HTTP response.
#[derive(Debug, Default)]
pub struct CollectingNotifier {
    notices: Mutex<Vec<ClashNotice>>,
}

impl CollectingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes all notices collected so far.
    pub fn take(&self) -> Vec<ClashNotice> {
        match self.notices.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Notifier for CollectingNotifier {
    fn notify_clash(&self, notice: &ClashNotice) {
        match self.notices.lock() {
            Ok(mut guard) => guard.push(notice.clone()),
            Err(poisoned) => poisoned.into_inner().push(notice.clone()),
        }
    }
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify_clash(&self, notice: &ClashNotice) {
        (**self).notify_clash(notice)
    }
}

/// Fans a notice out to two notifiers, e.g. the log and a collecting buffer.
pub struct Both<A, B>(pub A, pub B);

impl<A: Notifier, B: Notifier> Notifier for Both<A, B> {
    fn notify_clash(&self, notice: &ClashNotice) {
        self.0.notify_clash(notice);
        self.1.notify_clash(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notice(subject: &str) -> ClashNotice {
        ClashNotice {
            subject: subject.to_string(),
            teacher: "A".to_string(),
            class_name: "C1".to_string(),
        }
    }

    #[test]
    fn test_collecting_notifier_drains() {
        let notifier = CollectingNotifier::new();
        notifier.notify_clash(&notice("Math"));
        notifier.notify_clash(&notice("Phy"));

        let taken = notifier.take();
        assert_eq!(taken, vec![notice("Math"), notice("Phy")]);
        assert!(notifier.take().is_empty());
    }

    #[test]
    fn test_both_delivers_to_each() {
        let first = CollectingNotifier::new();
        let second = CollectingNotifier::new();
        Both(&first, &second).notify_clash(&notice("Math"));

        assert_eq!(first.take().len(), 1);
        assert_eq!(second.take().len(), 1);
    }
}
