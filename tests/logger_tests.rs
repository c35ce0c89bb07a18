use stargazer::logger::Log;
use stargazer::{
    log_block_start, log_debug, log_decorated, log_end, log_error_exit, log_indented, log_info,
    log_pipe, log_version, log_warning,
};
use tempfile::tempdir;

/// Runs in its own test binary, so the process-wide file sink is ours alone.
#[test]
fn test_file_sink_receives_every_macro_without_colour() {
    let temp_dir = tempdir().unwrap();
    let path = temp_dir.path().join("stargazer.log");

    Log::set_enabled(true);
    let guard = Log::start_file_logging(path.to_string_lossy().into_owned()).unwrap();
    log_version!();
    log_block_start!("Computing {} days", 366);
    log_decorated!("Computed {} days", 366);
    log_indented!("Sunrise: {}", "05:06");
    log_pipe!();
    log_info!("Dark sky for {}", "1h 0m");
    log_warning!("Range too short");
    log_debug!("Worker pool: {} threads", 4);
    Log::set_enabled(false);
    log_info!("suppressed");
    Log::set_enabled(true);
    log_error_exit!("Year {} aborted", 2023);
    log_end!();
    drop(guard);

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    let header = format!("┏ stargazer v{} ━━╸", env!("CARGO_PKG_VERSION"));
    assert_eq!(
        lines,
        vec![
            header.as_str(),
            "┃",
            "┣ Computing 366 days",
            "┣ Computed 366 days",
            "┃   Sunrise: 05:06",
            "┃",
            "┣[INFO] Dark sky for 1h 0m",
            "┣[WARNING] Range too short",
            "┣[DEBUG] Worker pool: 4 threads",
            "┃",
            "┗[ERROR] Year 2023 aborted",
            "╹",
        ]
    );
    assert!(!content.contains('\x1b'));
}
