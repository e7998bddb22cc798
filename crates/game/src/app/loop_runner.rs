use std::process::ExitCode;

use engine::{run_headless, DrawLog};
use tracing::{error, info, warn};

use super::bootstrap::AppWiring;

pub(crate) fn run(mut app: AppWiring) -> ExitCode {
    let mut surface = DrawLog::default();
    let summary = match run_headless(&app.config, &mut app.scene, &mut app.input, &mut surface) {
        Ok(summary) => summary,
        Err(err) => {
            error!(error = %err, "startup_failed");
            return ExitCode::FAILURE;
        }
    };

    info!(
        ticks_run = summary.ticks_run,
        frames_rendered = summary.frames_rendered,
        stop_reason = ?summary.stop_reason,
        invalid_sprites = surface.invalid_sprite_count(),
        "run_complete"
    );
    if app.dump_state {
        dump_state(&app);
    }

    ExitCode::SUCCESS
}

fn dump_state(app: &AppWiring) {
    let Some(snapshot) = app.scene.last_snapshot() else {
        warn!("state_dump_unavailable");
        return;
    };
    match serde_json::to_string_pretty(snapshot) {
        Ok(json) => info!("state_dump\n{json}"),
        Err(err) => warn!(error = %err, "state_dump_failed"),
    }
}
