//! Diagnostics sinks for the transforms.
//!
//! Transforms never print. They hand a structured report to an [`Observer`]
//! supplied by the caller, which decides whether to log, record or drop it.
//!
//! - `()` drops every report
//! - [`TracingObserver`] emits one `tracing` event per report
//! - [`RecordingObserver`] keeps every report for later inspection

use crate::{balance::BalanceReport, mirror::MirrorReport};

/// Receives diagnostics from the transforms.
///
/// Both methods default to doing nothing, so implementors only override the
/// reports they care about.
pub trait Observer {
    fn on_mirror(&mut self, report: &MirrorReport) {
        let _ = report;
    }

    fn on_balance(&mut self, report: &BalanceReport) {
        let _ = report;
    }
}

impl Observer for () {}

impl<O> Observer for &mut O
where
    O: Observer + ?Sized,
{
    fn on_mirror(&mut self, report: &MirrorReport) {
        (**self).on_mirror(report);
    }

    fn on_balance(&mut self, report: &BalanceReport) {
        (**self).on_balance(report);
    }
}

/// Logs reports as `tracing` events at `INFO` level.
///
/// Events use the targets `c4train::mirror` and `c4train::balance`. Installing a
/// subscriber is left to the binary driving the training run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_mirror(&mut self, report: &MirrorReport) {
        tracing::info!(
            target: "c4train::mirror",
            samples_before = report.samples_before,
            samples_after = report.samples_after,
            fields = ?report.fields,
            "mirroring complete: {} -> {} samples",
            report.samples_before,
            report.samples_after,
        );
    }

    fn on_balance(&mut self, report: &BalanceReport) {
        tracing::info!(
            target: "c4train::balance",
            samples = report.samples,
            bins = report.num_bins,
            move_range = ?report.move_range,
            bin_counts = ?report.bin_counts,
            bin_weight_range = ?report.bin_weight_range,
            mean_weight = ?report.mean_weight,
            "move-count balancing",
        );
    }
}

/// Stores every report it receives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingObserver {
    pub mirror: Vec<MirrorReport>,
    pub balance: Vec<BalanceReport>,
}

impl RecordingObserver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for RecordingObserver {
    fn on_mirror(&mut self, report: &MirrorReport) {
        self.mirror.push(report.clone());
    }

    fn on_balance(&mut self, report: &BalanceReport) {
        self.balance.push(report.clone());
    }
}
