use upq_core::notify::{NoticeLevel, Notifier};

/// Prints notices: info to stdout, errors to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrintNotifier;

impl Notifier for PrintNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        tracing::debug!(%level, notice = %message, "user notice");
        match level {
            NoticeLevel::Info => println!("{message}"),
            NoticeLevel::Error => eprintln!("{message}"),
        }
    }
}
