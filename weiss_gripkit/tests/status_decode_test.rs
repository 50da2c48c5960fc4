mod common;

use common::status_reply;
use weiss_gripkit::commands::{decode_status_code, StatusReply, WireStatus};
use weiss_gripkit::xmlrpc::Value;
use weiss_gripkit::{DeviceSnapshot, GripStatus, RpcError};

#[test]
fn test_successful_reply_is_valid() {
    let snapshot = DeviceSnapshot::from_reply(&status_reply(1, 1, 1, 1)).unwrap();

    assert_eq!(
        snapshot,
        DeviceSnapshot {
            valid: true,
            status: GripStatus::Gripped,
            activated: true,
            mounted: true,
        }
    );
}

#[test]
fn test_wire_codes_map_to_display_status() {
    let expected = [
        (0, GripStatus::Error),
        (1, GripStatus::Gripped),
        (2, GripStatus::NoPart),
        (3, GripStatus::Released),
    ];

    for (code, status) in expected {
        let snapshot = DeviceSnapshot::from_reply(&status_reply(1, code, 1, 1)).unwrap();
        assert!(snapshot.valid, "Code {} should still be a valid read", code);
        assert_eq!(snapshot.status, status, "Wire code {} decoded wrongly", code);
    }
}

#[test]
fn test_out_of_range_status_is_error() {
    for code in [-1, 4, 7, 255] {
        assert_eq!(decode_status_code(code), GripStatus::Error, "Code {}", code);
    }
    assert_eq!(decode_status_code(i64::MAX), GripStatus::Error);
}

#[test]
fn test_unsuccessful_read_is_degraded() {
    // The device sends only `success` when it could not read the status
    let reply = Value::from_members([("success", Value::from(0))]);
    let snapshot = DeviceSnapshot::from_reply(&reply).unwrap();

    assert_eq!(snapshot, DeviceSnapshot::degraded());
    assert!(!snapshot.valid);
    assert_eq!(snapshot.status, GripStatus::Error);
    assert!(snapshot.activated, "Degraded snapshot reports activated");
    assert!(snapshot.mounted, "Degraded snapshot reports mounted");
}

#[test]
fn test_unsuccessful_read_ignores_other_members() {
    let snapshot = DeviceSnapshot::from_reply(&status_reply(0, 1, 0, 0)).unwrap();

    assert_eq!(snapshot, DeviceSnapshot::degraded());
}

#[test]
fn test_flags_are_true_only_for_one() {
    let snapshot = DeviceSnapshot::from_reply(&status_reply(1, 3, 0, 2)).unwrap();

    assert!(!snapshot.activated);
    assert!(!snapshot.mounted, "Only 1 means mounted");
}

#[test]
fn test_boolean_members_are_accepted() {
    let reply = Value::from_members([
        ("success", Value::Bool(true)),
        ("status", Value::from(3)),
        ("activated", Value::Bool(true)),
        ("mounted", Value::Bool(false)),
    ]);

    let snapshot = DeviceSnapshot::from_reply(&reply).unwrap();
    assert_eq!(snapshot.status, GripStatus::Released);
    assert!(snapshot.activated);
    assert!(!snapshot.mounted);
}

#[test]
fn test_missing_member_is_malformed() {
    let reply = Value::from_members([("success", Value::from(1)), ("status", Value::from(1))]);

    assert!(matches!(
        DeviceSnapshot::from_reply(&reply),
        Err(RpcError::MalformedReply(_))
    ));
    assert_eq!(DeviceSnapshot::from_result(Ok(reply)), DeviceSnapshot::degraded());
}

#[test]
fn test_non_struct_reply_is_malformed() {
    for reply in [Value::from(1), Value::Nil, Value::from("ok")] {
        assert!(
            matches!(DeviceSnapshot::from_reply(&reply), Err(RpcError::MalformedReply(_))),
            "Expected MalformedReply for {:?}",
            reply
        );
    }
}

#[test]
fn test_call_failures_are_degraded() {
    let failures = [
        RpcError::Timeout(std::time::Duration::from_secs(2)),
        RpcError::Disconnected(),
        RpcError::Fault {
            code: -32500,
            description: "device busy".to_string(),
        },
    ];

    for failure in failures {
        assert_eq!(DeviceSnapshot::from_result(Err(failure)), DeviceSnapshot::degraded());
    }
}

#[test]
fn test_status_reply_value_decodes_back() {
    let reply = StatusReply {
        success: true,
        status: WireStatus::NoPart,
        activated: true,
        mounted: false,
    };

    let snapshot = DeviceSnapshot::from_reply(&reply.to_value()).unwrap();
    assert_eq!(snapshot.status, GripStatus::NoPart);
    assert!(snapshot.valid && snapshot.activated && !snapshot.mounted);

    let failed = StatusReply::failure().to_value();
    assert!(failed.member("status").is_none(), "Failed read carries only success");
    assert_eq!(DeviceSnapshot::from_reply(&failed).unwrap(), DeviceSnapshot::degraded());
}
