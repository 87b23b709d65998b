//! End-to-end pipeline behaviour: input events in, sink deliveries out.

use std::rc::Rc;

use gugu_runtime::{
    ErrorSignal, FnSink, Pipeline, PipelineConfig, PipelineState, RecordingSink, SinkEvent,
};
use gugu_core::Table;
use tracing::Level;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn expected_table(base: u64) -> String {
    (1..=9u64)
        .map(|row| format!("{base}X{row}={}\n", base * row))
        .collect()
}

fn pipeline() -> (Pipeline, Rc<RecordingSink>) {
    init_tracing();
    let sink = Rc::new(RecordingSink::new());
    (Pipeline::with_sink(Rc::clone(&sink)), sink)
}

#[test]
fn table_for_three() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("3");
    assert_eq!(
        sink.tables(),
        vec!["3X1=3\n3X2=6\n3X3=9\n3X4=12\n3X5=15\n3X6=18\n3X7=21\n3X8=24\n3X9=27\n".to_string()]
    );
}

#[test]
fn table_for_zero() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("0");
    assert_eq!(sink.tables(), vec![expected_table(0)]);
}

#[test]
fn every_valid_event_delivers_exactly_once() {
    let (mut pipeline, sink) = pipeline();
    for base in [1u64, 12, 7, 100, 0] {
        sink.take();
        pipeline.on_input_changed(base.to_string());
        assert_eq!(sink.events(), vec![SinkEvent::Table(expected_table(base))]);
    }
}

#[test]
fn empty_and_text_inputs_are_errors() {
    let (mut pipeline, sink) = pipeline();
    for raw in ["", "abc", "3a", " 3", "1.5"] {
        sink.take();
        pipeline.on_input_changed(raw);
        let events = sink.events();
        assert_eq!(events.len(), 1, "input {raw:?}");
        assert!(events[0].is_error(), "input {raw:?}");
    }
}

#[test]
fn negative_input_is_an_error() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("-5");
    assert_eq!(
        sink.events(),
        vec![SinkEvent::Error("negative base not allowed: \"-5\"".into())]
    );
}

#[test]
fn overflowing_input_is_rejected_before_computing() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed(u64::MAX.to_string());
    assert!(sink.tables().is_empty());
    assert_eq!(sink.errors().len(), 1);
}

#[test]
fn repeated_input_recomputes_identically() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("8");
    pipeline.on_input_changed("8");
    let tables = sink.tables();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0], tables[1]);
    assert_eq!(tables[0], expected_table(8));
}

#[test]
fn rapid_sequence_ends_on_latest_input() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("1");
    pipeline.on_input_changed("2");
    pipeline.on_input_changed("3");

    assert_eq!(
        sink.tables(),
        vec![expected_table(1), expected_table(2), expected_table(3)]
    );
    assert_eq!(
        sink.last_terminal(),
        Some(SinkEvent::Table(expected_table(3)))
    );
}

#[test]
fn pipeline_recovers_after_error() {
    let (mut pipeline, sink) = pipeline();
    pipeline.on_input_changed("x");
    assert_eq!(pipeline.state(), PipelineState::Idle);
    pipeline.on_input_changed("4");
    assert_eq!(sink.last_terminal(), Some(SinkEvent::Table(expected_table(4))));
}

#[test]
fn typing_a_number_digit_by_digit() {
    let (mut pipeline, sink) = pipeline();
    for raw in ["1", "12", "1", ""] {
        pipeline.on_input_changed(raw);
    }
    let events = sink.events();
    assert_eq!(events.len(), 4);
    assert_eq!(events[1], SinkEvent::Table(expected_table(12)));
    assert!(events[3].is_error());
    assert_eq!(pipeline.current_input(), "");
}

#[test]
fn external_observer_sees_raw_input() {
    let (mut pipeline, _sink) = pipeline();
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let seen_clone = Rc::clone(&seen);
    let _observer = pipeline
        .input()
        .subscribe(move |raw: &String| seen_clone.borrow_mut().push(raw.clone()));

    pipeline.on_input_changed("6");
    pipeline.on_input_changed("zz");
    assert_eq!(*seen.borrow(), vec!["0", "6", "zz"]);
}

#[test]
#[should_panic(expected = "from within a subscriber callback")]
fn observer_cannot_rewrite_input_mid_event() {
    let (mut pipeline, _sink) = pipeline();
    pipeline.start();
    let writer = pipeline.input();
    let _normalize = pipeline.input().subscribe(move |raw: &String| {
        if let Some(trimmed) = raw.strip_prefix('0').filter(|rest| !rest.is_empty()) {
            writer.set(trimmed.to_owned());
        }
    });
    pipeline.on_input_changed("03");
}

#[test]
fn closure_sink_receives_both_channels() {
    init_tracing();
    let tables = Rc::new(std::cell::RefCell::new(Vec::new()));
    let errors = Rc::new(std::cell::RefCell::new(Vec::new()));
    let (t, e) = (Rc::clone(&tables), Rc::clone(&errors));
    let sink = FnSink::new(
        move |table: &Table| t.borrow_mut().push(table.base().get()),
        move |err: &ErrorSignal| e.borrow_mut().push(err.input().to_owned()),
    );
    let mut pipeline = Pipeline::new(PipelineConfig::default(), sink);

    pipeline.on_input_changed("9");
    pipeline.on_input_changed("nine");
    assert_eq!(*tables.borrow(), vec![9]);
    assert_eq!(*errors.borrow(), vec!["nine".to_string()]);
}
