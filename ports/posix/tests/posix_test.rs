//! End-to-end tests of the hosted generator: commands in, waveform out

use hal::OutputStage;
use pwmgen_core::config::TIMER_CLOCK_HZ;
use pwmgen_posix::{session, PosixConfig, SimPin, Waveform};
use pwmgen_rx::RxMailbox;

fn send(line: &[u8], session: &mut pwmgen_posix::PosixSession<Vec<u8>>, rx: &RxMailbox) {
    let mut bytes = line.iter().copied();
    if let Some(first) = bytes.next() {
        rx.post(first);
    }
    session
        .poll(rx, || {
            if let Some(byte) = bytes.next() {
                rx.post(byte);
            }
        })
        .expect("pending byte should start a line");
}

#[test]
fn frequency_command_shapes_waveform() {
    let rx = RxMailbox::new();
    let mut session = session(Vec::new(), PosixConfig::default()).unwrap();

    send(b"FREQ=2000\n", &mut session, &rx);

    let wave = session.engine().timer().waveform();
    assert_eq!(wave.cycle_counts, 1000);
    assert_eq!(wave.frequency_hz, 2000);
    // output stays high for counts 0..compare
    assert_eq!(wave.high_counts, 497);
}

#[test]
fn duty_sweep_tracks_requested_fraction() {
    let rx = RxMailbox::new();
    let mut session = session(Vec::new(), PosixConfig::default()).unwrap();

    for duty in [0u32, 64, 128, 192, 254] {
        let line = format!("PWM={}\n", duty);
        send(line.as_bytes(), &mut session, &rx);

        let wave = session.engine().timer().waveform();
        let expected = duty * 1000 / 255;
        let got = wave.duty_permille();
        assert!(
            got.abs_diff(expected) <= 2,
            "duty {}: {} permille, expected about {}",
            duty,
            got,
            expected
        );
    }
}

#[test]
fn running_timer_follows_register_updates() {
    let rx = RxMailbox::new();
    let mut session = session(Vec::new(), PosixConfig::default()).unwrap();
    send(b"FREQ=40000\n", &mut session, &rx);

    let registers = session.engine().registers();
    assert_eq!(registers.period, 49);

    let mut stage = OutputStage::new(SimPin::default());
    let mut engine_timer = session.engine().timer().clone();
    engine_timer.advance(10 * 50, &mut stage);
    assert_eq!(engine_timer.dropped_edges(), 0);
    assert_eq!(Waveform::of(registers, TIMER_CLOCK_HZ).cycle_counts, 50);
}

#[test]
fn transcript_matches_device_output() {
    let rx = RxMailbox::new();
    let mut session = session(Vec::new(), PosixConfig::default()).unwrap();
    session.start();
    send(b"FREQ=2000\n", &mut session, &rx);
    send(b"bogus\n", &mut session, &rx);

    let out = String::from_utf8(session.reporter().port().get_ref().clone()).unwrap();
    assert_eq!(
        out,
        "Init done.\n\
         PWM set to 49%\nMatch A\t999\nMatch B\t497\n\
         Frequency set to 2000 Hz\n\
         FREQ=2000\r\n\
         bogus\r\n"
    );
}
