use rstest::rstest;
use stroker_hardware::SimulatedTransport;
use stroker_traits::Transport;

fn send_all<T: Transport>(t: &mut T, lines: &[&str]) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    t.open()?;
    for line in lines {
        t.write(format!("{line}\n").as_bytes())?;
    }
    t.close()
}

#[test]
fn boxed_simulated_transport_is_a_transport() {
    let mut boxed: Box<dyn Transport + Send> = Box::new(SimulatedTransport::new(Box::new(std::io::sink())));
    send_all(&mut boxed, &["L0999I300", "L0000I300"]).expect("writes succeed");
}

#[test]
fn reopen_after_close_is_allowed() {
    let mut t = SimulatedTransport::new(Box::new(std::io::sink()));
    send_all(&mut t, &["L050I50"]).expect("first run");
    send_all(&mut t, &["L060I50"]).expect("second run");
    assert_eq!(t.lines_written(), 2);
}

#[rstest]
#[case(&[])]
#[case(&["L0999I300"])]
#[case(&["L0999I300 R1500I300", "L0000I50", "L0500I50 A0250I50"])]
fn every_line_is_counted(#[case] lines: &[&str]) {
    let mut t = SimulatedTransport::new(Box::new(std::io::sink()));
    send_all(&mut t, lines).expect("writes succeed");
    assert_eq!(t.lines_written(), lines.len() as u64);
}

#[rstest]
#[case(b"L0999I300\n".as_slice())]
#[case(b"".as_slice())]
fn writes_fail_after_close(#[case] line: &[u8]) {
    let mut t = SimulatedTransport::new(Box::new(std::io::sink()));
    send_all(&mut t, &["L050I50"]).expect("open/write/close");
    assert!(t.write(line).is_err());
    assert_eq!(t.lines_written(), 1);
}
