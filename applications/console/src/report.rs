/// Plain-text rendering for command output
use vex_core::{ArtPattern, SourceResolver, Track};
use vex_storage_client::{BatchSummary, UploadStatus};

use crate::simulate::SimulationReport;

/// One catalog line: id, mood and title
pub fn track_line(track: &Track) -> String {
    let mood = track.mood.as_ref().map_or("-", |m| m.as_str());
    format!("{:<24} {:<14} {}", track.id, mood, track.title)
}

/// Every location a track can be played from
pub fn track_details(track: &Track, resolver: &dyn SourceResolver) -> String {
    let sources = track.sources(resolver);
    let remote = sources.remote.as_deref().unwrap_or("(no storage configured)");
    format!(
        "{}\n  title:   {}\n  file:    {}\n  remote:  {}\n  local:   {}\n  visuals: {}",
        track.id,
        track.title,
        track.filename,
        remote,
        sources.local,
        ArtPattern::for_track(track),
    )
}

pub fn upload_status(status: &UploadStatus) -> String {
    let mut out = format!(
        "{} of {} tracks uploaded, {} remaining\n",
        status.uploaded, status.total, status.remaining
    );
    for file in &status.files {
        let mark = if file.uploaded { "ok" } else { "--" };
        out.push_str(&format!("  [{mark}] {}\n", file.filename));
    }
    out
}

pub fn batch_summary(summary: &BatchSummary) -> String {
    let mut out = format!(
        "Uploaded {} of {} files ({} bytes)\n",
        summary.uploaded.len(),
        summary.total(),
        summary.bytes_uploaded
    );
    for (file, error) in &summary.failed {
        out.push_str(&format!("  failed: {file}: {error}\n"));
    }
    out
}

pub fn simulation(report: &SimulationReport) -> String {
    let mut out = format!(
        "{} steps over {:.1}s: {} track changes, {} fallbacks, {} retries, {} fail-overs\n",
        report.steps,
        report.elapsed_ms as f64 / 1000.0,
        report.track_changes,
        report.fallbacks,
        report.retries,
        report.failovers,
    );
    if let Some(state) = &report.final_state {
        out.push_str(&format!(
            "Final: {} ({}) - {}\n",
            state.status_label(),
            state.title,
            state.position_label()
        ));
    }
    out
}
