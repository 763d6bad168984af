use fitts_core::Cursor;
use fitts_session::{
    ControlLoop, LoopState, Outcome, SessionConfig, SessionError, UdpCommandSource,
};
use fitts_timing::{HighPrecisionTimer, ManualClock};
use std::net::UdpSocket;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[test]
fn datagrams_steer_the_cursor() {
    let config = SessionConfig::ring();
    let source = UdpCommandSource::bind("127.0.0.1:0").unwrap();
    let addr = source.local_addr().unwrap();
    let mut session = ControlLoop::ring(&config, source, ManualClock::new()).unwrap();
    let sender = UdpSocket::bind("127.0.0.1:0").unwrap();

    let start = session.cursor();
    sender.send_to(b"2 0.5", addr).unwrap();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(session.step(), LoopState::Running);
    assert_eq!(session.cursor(), Cursor::new(start.x + 10.0, start.y));

    sender.send_to(b"not a command", addr).unwrap();
    thread::sleep(Duration::from_millis(20));
    session.step();
    session.step();
    assert_eq!(session.cursor(), Cursor::new(start.x + 10.0, start.y));

    let counters = session.counters();
    assert_eq!(counters.decoded, 1);
    assert_eq!(counters.malformed, 1);
    assert_eq!(counters.absent, 1);
}

#[test]
fn quit_signal_ends_a_live_session_and_releases_the_socket() {
    let mut config = SessionConfig::ring();
    config.tick_rate_hz = 500;
    let source = UdpCommandSource::bind("127.0.0.1:0").unwrap();
    let addr = source.local_addr().unwrap();
    let session = ControlLoop::ring(&config, source, HighPrecisionTimer::new()).unwrap();

    let quit = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&quit);
    let runner = thread::spawn(move || session.run(&flag, ()));

    thread::sleep(Duration::from_millis(50));
    quit.store(true, Ordering::SeqCst);
    let report = runner.join().unwrap();

    assert_eq!(report.outcome, Outcome::Quit);
    assert_eq!(report.completed, 0);
    assert!(report.ticks > 0);
    assert!(report.tick_stats.samples > 0);

    let rebound = UdpCommandSource::bind(&addr.to_string());
    assert!(rebound.is_ok(), "socket still held after the session ended");
}

#[test]
fn bind_failure_stops_startup() {
    let holder = UdpSocket::bind("127.0.0.1:0").unwrap();
    let addr = holder.local_addr().unwrap().to_string();
    match UdpCommandSource::bind(&addr) {
        Err(SessionError::Bind { addr: reported, .. }) => assert_eq!(reported, addr),
        other => panic!("expected bind error, got {other:?}"),
    }
}
