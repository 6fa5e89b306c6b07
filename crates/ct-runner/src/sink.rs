use ct_core::{Notice, NoticeLevel, NotificationSink};
use tracing::{info, warn};

/// Sends notices to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&mut self, notice: Notice) {
        let title = notice.title();
        let description = notice.description();
        match notice.level() {
            NoticeLevel::Error => warn!(title, %description, "notice"),
            NoticeLevel::Info | NoticeLevel::Success => info!(title, %description, "notice"),
        }
    }
}

/// Fan out to two sinks, e.g. the log plus a recorder for the final report.
pub struct Tee<A, B>(pub A, pub B);

impl<A: NotificationSink, B: NotificationSink> NotificationSink for Tee<A, B> {
    fn notify(&mut self, notice: Notice) {
        self.0.notify(notice.clone());
        self.1.notify(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ct_core::RecordingSink;

    #[test]
    fn test_tee_delivers_to_both() {
        let mut tee = Tee(TracingSink, RecordingSink::default());
        tee.notify(Notice::Paused);
        tee.notify(Notice::Resumed);
        assert_eq!(tee.1.titles(), ["Campaign Paused", "Campaign Resumed"]);
    }
}
