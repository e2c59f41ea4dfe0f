use std::io;

use crate::{ScanError, SplitError};

#[test]
fn messages() {
    insta::assert_snapshot!(
        ScanError::TooLong { max: 4 },
        @"token too long: no boundary within 4 bytes"
    );
    insta::assert_snapshot!(
        ScanError::AdvanceTooFar { advance: 5, available: 3 },
        @"split function advanced 5 bytes but only 3 were available"
    );
    insta::assert_snapshot!(
        ScanError::EmptyTokenLoop,
        @"split function returned too many empty tokens without progressing"
    );
    insta::assert_snapshot!(
        ScanError::NoProgress { reads: 100 },
        @"source returned no data after 100 consecutive reads"
    );
    insta::assert_snapshot!(
        ScanError::BadReadCount { read: 9, capacity: 8 },
        @"source reported 9 bytes read into a 8 byte buffer"
    );
}

#[test]
fn wrapped_errors_are_transparent() {
    let io = ScanError::from(io::Error::other("disk on fire"));
    insta::assert_snapshot!(io, @"disk on fire");

    let parse: SplitError = "999999999999".parse::<i32>().unwrap_err().into();
    let split = ScanError::Split(parse);
    insta::assert_snapshot!(split, @"number too large to fit in target type");
    assert!(!split.is_contract_violation());
}

#[test]
fn io_error_keeps_its_source_kind() {
    let err = ScanError::from(io::Error::new(io::ErrorKind::UnexpectedEof, "short"));
    match err {
        ScanError::Io(inner) => assert_eq!(inner.kind(), io::ErrorKind::UnexpectedEof),
        other => panic!("expected io error, got {other:?}"),
    }
}
