use crate::git::GitCli;
use crate::ops::{self, OpContext, Operation, TaskReport};
use tokio::sync::mpsc;
use tracing::debug;

/// Runs operations off the UI loop and collects their reports
pub struct TaskRunner {
    sender: mpsc::UnboundedSender<TaskReport>,
    receiver: mpsc::UnboundedReceiver<TaskReport>,
    remote: String,
    pending: usize,
}

impl TaskRunner {
    pub fn new(remote: impl Into<String>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver,
            remote: remote.into(),
            pending: 0,
        }
    }

    /// Start `op` against the repository at `cli`'s working directory
    pub fn spawn(&mut self, op: Operation, cli: GitCli) {
        debug!(?op, workdir = %cli.workdir().display(), "spawning operation");
        let ctx = OpContext::new(cli, self.remote.clone());
        let sender = self.sender.clone();
        self.pending += 1;

        tokio::spawn(async move {
            let report = ops::execute(op, &ctx).await;
            let _ = sender.send(report);
        });
    }

    /// Reports that finished since the last call
    pub fn drain(&mut self) -> Vec<TaskReport> {
        let mut reports = Vec::new();
        while let Ok(report) = self.receiver.try_recv() {
            self.pending = self.pending.saturating_sub(1);
            reports.push(report);
        }
        reports
    }

    /// Number of operations still running
    pub fn pending(&self) -> usize {
        self.pending
    }
}
