use std::time::{Duration, Instant};

use hostload::{Collector, Config, Error, Platform, ReadContext, SystemRunner};

fn host_collector() -> Option<Collector> {
    match Collector::new() {
        Ok(collector) => Some(collector),
        Err(err) => {
            assert!(Platform::current().is_none(), "supported host failed: {err}");
            None
        }
    }
}

#[test]
fn host_load_average_is_non_negative() {
    let Some(collector) = host_collector() else {
        return;
    };
    if collector.platform() == Platform::Linux
        && !std::path::Path::new("/proc/loadavg").exists()
        && std::env::var_os("HOST_PROC").is_none()
    {
        return;
    }

    let load = collector.load_average().expect("host load average");
    assert!(load.load1 >= 0.0);
    assert!(load.load5 >= 0.0);
    assert!(load.load15 >= 0.0);
}

#[test]
fn host_process_counts_or_missing_ps() {
    let Some(collector) = host_collector() else {
        return;
    };

    match collector.process_state_counts() {
        // At least this test process is alive.
        Ok(counts) => assert!(counts.total >= 1, "{counts}"),
        Err(Error::ToolNotFound { tool, .. }) => assert_eq!(tool, "ps"),
        Err(Error::Read { .. }) if collector.platform() == Platform::Linux => {}
        Err(err) => panic!("unexpected error: {err}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn timeout_kills_a_stuck_listing() {
    use std::os::unix::fs::PermissionsExt;

    let dir = std::env::temp_dir().join(format!("hostload_stuck_ps_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let script = dir.join("ps");
    std::fs::write(&script, "#!/bin/sh\nsleep 30\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let mut config = Config::default();
    config.tools.ps = script.to_string_lossy().into_owned();
    // Darwin reads only `ps`, so no procfs is needed.
    let collector = Collector::for_platform(Platform::Darwin, &config, SystemRunner);

    let ctx = ReadContext::with_timeout(Duration::from_millis(200));
    let started = Instant::now();
    let err = collector
        .process_state_counts_with_context(&ctx)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "{err}");
    assert!(started.elapsed() < Duration::from_secs(10));

    let _ = std::fs::remove_dir_all(&dir);
}
