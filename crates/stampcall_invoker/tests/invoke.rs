use stampcall_invoker::{format_timestamp, Clock, FixedClock, Invoker, Report};
use stampcall_test::{parse_year, recording, string_length, take_recorded, CountingAllocator};

fn new_year() -> FixedClock {
    FixedClock::at(2024, 1, 1, 0, 0, 0).unwrap()
}

#[test]
fn prints_length_of_timestamp() {
    let invoker = unsafe { Invoker::new(string_length) };
    let mut out = Vec::new();
    let report = invoker.run_and_report(&new_year(), &mut out).unwrap();

    assert_eq!(
        report,
        Report {
            timestamp: "2024-01-01 00:00:00".to_owned(),
            result: 19,
        }
    );
    let out = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(out.trim_end(), @"Result: 19");
}

#[test]
fn system_clock_timestamp_has_fixed_length() {
    let invoker = unsafe { Invoker::new(string_length) };
    let report = invoker.run(&stampcall_invoker::SystemClock).unwrap();
    assert_eq!(report.result, 19);
}

#[test]
fn callee_receives_exactly_the_rendered_string() {
    let clock = FixedClock::at(2006, 1, 2, 15, 4, 5).unwrap();
    let invoker = unsafe { Invoker::new(recording) };
    invoker.run(&clock).unwrap();

    let mut expected = format_timestamp(&clock.now()).into_bytes();
    expected.push(0);
    assert_eq!(take_recorded(), [expected]);
}

#[test]
fn one_allocation_and_one_release_per_run() {
    let allocator = CountingAllocator::new();
    let invoker = unsafe { Invoker::with_allocator(string_length, allocator.clone()) };

    invoker.run(&new_year()).unwrap();
    assert_eq!(allocator.allocations(), 1);
    assert_eq!(allocator.releases(), 1);

    invoker.run(&new_year()).unwrap();
    assert_eq!(allocator.allocations(), 2);
    assert_eq!(allocator.live(), 0);
}

#[test]
fn rejected_argument_allocates_nothing() {
    let allocator = CountingAllocator::new();
    let invoker = unsafe { Invoker::with_allocator(string_length, allocator.clone()) };
    assert!(invoker.invoke("2024-01-01\000:00:00").is_err());
    assert_eq!(allocator.allocations(), 0);
}

#[test]
fn result_is_reported_verbatim() {
    let invoker = unsafe { Invoker::new(parse_year) };
    let mut out = Vec::new();
    invoker.run_and_report(&new_year(), &mut out).unwrap();
    let out = String::from_utf8(out).unwrap();
    insta::assert_snapshot!(out.trim_end(), @"Result: 2024");
}
