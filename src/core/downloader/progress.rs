use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_PROGRESS_REPORT_RATE: u8 = 10;

/// Called with `(dest, bytes_done, bytes_total)`; total is `0` when unknown.
///
/// Batch downloads run concurrently, so calls for different files interleave;
/// `dest` tells them apart.
pub type DownloadProgressFn = Arc<dyn Fn(&Path, u64, u64) + Send + Sync>;
/// Called with the completed percentage of a batch operation.
pub type OperationProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

/// Progress hooks handed to the acquisition collaborator.
///
/// The resolver forwards these untouched.
#[derive(Clone)]
pub struct ProgressOptions {
    pub on_download_progress: Option<DownloadProgressFn>,
    pub on_operation_progress: Option<OperationProgressFn>,
    /// Report operation progress every this many percent.
    pub progress_report_rate: u8,
}

impl Default for ProgressOptions {
    fn default() -> Self {
        Self {
            on_download_progress: None,
            on_operation_progress: None,
            progress_report_rate: DEFAULT_PROGRESS_REPORT_RATE,
        }
    }
}

impl fmt::Debug for ProgressOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressOptions")
            .field("on_download_progress", &self.on_download_progress.is_some())
            .field("on_operation_progress", &self.on_operation_progress.is_some())
            .field("progress_report_rate", &self.progress_report_rate)
            .finish()
    }
}

impl ProgressOptions {
    pub fn report_download(&self, dest: &Path, bytes_done: u64, bytes_total: u64) {
        if let Some(callback) = &self.on_download_progress {
            callback(dest, bytes_done, bytes_total);
        }
    }

    pub fn report_operation(&self, percent: u8) {
        if let Some(callback) = &self.on_operation_progress {
            callback(percent.min(100));
        }
    }
}

/// Throttles operation progress to `progress_report_rate` steps.
#[derive(Debug)]
pub struct OperationTracker<'a> {
    options: &'a ProgressOptions,
    total: usize,
    done: usize,
    last_reported: Option<u8>,
}

impl<'a> OperationTracker<'a> {
    pub fn new(options: &'a ProgressOptions, total: usize) -> Self {
        Self {
            options,
            total,
            done: 0,
            last_reported: None,
        }
    }

    /// Mark one unit finished; reports when a new step is reached or at 100%.
    pub fn advance(&mut self) {
        self.done = (self.done + 1).min(self.total);
        let percent = if self.total == 0 {
            100
        } else {
            (self.done * 100 / self.total) as u8
        };

        let step = self.options.progress_report_rate.max(1);
        let due = match self.last_reported {
            None => percent >= step || percent == 100,
            Some(last) => percent >= last.saturating_add(step) || (percent == 100 && last < 100),
        };

        if due {
            self.last_reported = Some(percent);
            self.options.report_operation(percent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn operation_progress_is_reported_in_steps() {
        let seen = Arc::new(Mutex::new(Vec::<u8>::new()));
        let sink = seen.clone();
        let options = ProgressOptions {
            on_operation_progress: Some(Arc::new(move |p: u8| sink.lock().unwrap().push(p))),
            progress_report_rate: 25,
            ..ProgressOptions::default()
        };

        let mut tracker = OperationTracker::new(&options, 10);
        for _ in 0..10 {
            tracker.advance();
        }

        assert_eq!(*seen.lock().unwrap(), vec![30, 60, 90, 100]);
    }

    #[test]
    fn download_progress_without_callback_is_a_no_op() {
        ProgressOptions::default().report_download(Path::new("a.jar"), 1, 2);
    }
}
