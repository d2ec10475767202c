pub mod link;
pub mod sync;

use hcpmirror_engine::SubjectReport;

/// `[dry-run] ✓ 100307 (unproc): 2 synced, 0 pruned`
pub(crate) fn print_summary(report: &SubjectReport, dry_run: bool, counts: &str) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    println!("{prefix}✓ {} ({}): {counts}", report.subject, report.stage);
}
