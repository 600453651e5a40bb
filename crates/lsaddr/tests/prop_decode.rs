//! Property-based tests for the tool output decoders.
//!
//! - decoding never panics, whatever the input
//! - well-formed lsof lines always decode, with both endpoints present
//! - short lsof lines are rejected without affecting their neighbours
//! - netstat state and pid columns are told apart by the column count

use lsaddr::Format;
use lsaddr::decode::{lsof, netstat};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Proptest strategies
// ---------------------------------------------------------------------------

fn ipv4() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(a, b, c, d)| format!("{}.{}.{}.{}", a, b, c, d))
}

fn ipv6() -> impl Strategy<Value = String> {
    proptest::collection::vec(any::<u16>(), 8).prop_map(|groups| {
        let groups: Vec<String> = groups.iter().map(|g| format!("{:x}", g)).collect();
        format!("[{}]", groups.join(":"))
    })
}

fn endpoint() -> impl Strategy<Value = String> {
    (prop_oneof![ipv4(), ipv6()], 1..=u16::MAX).prop_map(|(host, port)| format!("{}:{}", host, port))
}

fn protocol() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("TCP"), Just("UDP")]
}

fn state() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("ESTABLISHED"),
        Just("LISTENING"),
        Just("TIME_WAIT"),
        Just("CLOSE_WAIT"),
        Just("SYN_SENT"),
    ]
}

fn lsof_line() -> impl Strategy<Value = (String, u32, String, String)> {
    ("[A-Za-z][A-Za-z0-9_.]{0,15}", any::<u32>(), protocol(), endpoint(), endpoint()).prop_map(
        |(command, pid, proto, local, remote)| {
            let line = format!(
                "{} {} user 12u IPv4 0x25c5bf09a4161583 0t0 {} {}->{} (ESTABLISHED)",
                command, pid, proto, local, remote
            );
            (line, pid, local, remote)
        },
    )
}

// ---------------------------------------------------------------------------
// Property: decoding never panics on arbitrary input
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn decode_never_panics(
        data in proptest::collection::vec(any::<u8>(), 0..2048),
    ) {
        for format in [Format::Lsof, Format::Netstat, Format::Tasklist] {
            let _ = format.decode(&data);
        }
    }

    #[test]
    fn tasklist_rows_never_panic(
        rows in proptest::collection::vec("\\PC{0,60}", 0..20),
    ) {
        let mut text = String::from("Image Name   PID\n=========== =====\n");
        for row in rows {
            text.push_str(&row);
            text.push('\n');
        }
        let _ = Format::Tasklist.decode(text.as_bytes());
    }
}

// ---------------------------------------------------------------------------
// Property: well-formed lsof lines decode with both endpoints
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn lsof_connected_line_decodes((line, pid, local, remote) in lsof_line()) {
        let conn = lsof::decode_line(&line).unwrap();

        prop_assert_eq!(conn.pid, pid);
        prop_assert_eq!(conn.local.to_string(), local);
        prop_assert_eq!(conn.remote.as_ref().map(|r| r.to_string()), Some(remote));
        prop_assert_eq!(conn.state.as_deref(), Some("ESTABLISHED"));
        prop_assert!(conn.protocol == "tcp" || conn.protocol == "udp");
    }

    #[test]
    fn lsof_short_line_is_skipped(
        tokens in proptest::collection::vec("[a-z0-9:.>-]{1,10}", 1..9),
        (good, pid, _, _) in lsof_line(),
    ) {
        let short = tokens.join(" ");
        prop_assert!(lsof::decode_line(&short).is_err());

        let text = format!("{}\n{}\n{}\n", short, good, short);
        let set = lsof::decode(&text);
        prop_assert_eq!(set.len(), 1);
        prop_assert_eq!(set[0].pid, pid);
    }
}

// ---------------------------------------------------------------------------
// Property: netstat state column is optional
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn netstat_with_state(
        proto in protocol(),
        local in endpoint(),
        remote in endpoint(),
        state in state(),
        pid in any::<u32>(),
    ) {
        let line = format!("  {}    {}    {}    {}    {}", proto, local, remote, state, pid);
        let conn = netstat::decode_line(&line).unwrap();

        prop_assert_eq!(conn.pid, pid);
        prop_assert_eq!(conn.state.as_deref(), Some(state));
        prop_assert_eq!(conn.local.to_string(), local);
        prop_assert!(conn.command.is_empty());
    }

    #[test]
    fn netstat_without_state(
        local in endpoint(),
        pid in any::<u32>(),
    ) {
        let line = format!("  UDP    {}    *:*    {}", local, pid);
        let conn = netstat::decode_line(&line).unwrap();

        prop_assert_eq!(conn.pid, pid);
        prop_assert_eq!(conn.state, None);
        prop_assert_eq!(conn.remote, None);
    }
}
