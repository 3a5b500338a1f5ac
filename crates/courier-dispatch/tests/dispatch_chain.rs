//! ---
//! courier_section: "03-dispatch"
//! courier_subsection: "tests"
//! courier_type: "source"
//! courier_scope: "test"
//! courier_description: "Type, command and decode chain exercised end to end."
//! courier_version: "v0.0.0-prealpha"
//! courier_owner: "tbd"
//! ---
use std::sync::{Arc, Mutex};
use std::thread;

use courier_dispatch::{
    CommandRoutes, ContentNegotiatingDecoder, DispatchMetrics, EnvelopeHandler, ObserverSet,
    SharedHandler, TracingObserver, TypeRoutes,
};
use courier_envelope::{Envelope, EnvelopeBuilder, PlainDecoder};
use courier_json::{JsonPayloadDecoder, JsonPayloadEncoder};
use prometheus::Registry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Refund {
    order: String,
    cents: u64,
}

type Log = Arc<Mutex<Vec<String>>>;

fn recorder(log: &Log, label: &'static str) -> impl EnvelopeHandler + 'static {
    let log = Arc::clone(log);
    move |envelope: &Envelope| -> anyhow::Result<()> {
        log.lock()
            .unwrap()
            .push(format!("{label}:{}", envelope.id()));
        Ok(())
    }
}

fn refund_command(id: &str, refund: Refund) -> Envelope {
    EnvelopeBuilder::command_message("refund")
        .with_id(id)
        .with_sender("billing")
        .with_encoded_payload(refund, JsonPayloadEncoder::new())
        .build()
        .expect("refund command builds")
}

#[test]
fn routes_through_every_level_and_counts() {
    let registry = Registry::new();
    let metrics = DispatchMetrics::register(&registry).expect("register metrics");
    let observers = ObserverSet::new()
        .with(TracingObserver::default())
        .with(metrics.clone());

    let log = Log::default();
    let refunds = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&refunds);
    let refund_handler = ContentNegotiatingDecoder::new(JsonPayloadDecoder::<Refund>::new())
        .with_fallback(recorder(&log, "undecodable"))
        .observed_by(observers.clone())
        .and_then(move |refund: Refund, _: &Envelope| -> anyhow::Result<()> {
            sink.lock().unwrap().push(refund);
            Ok(())
        });

    let dispatcher = TypeRoutes::new()
        .on_simple(recorder(&log, "simple"))
        .with_commands(
            CommandRoutes::new()
                .on_command_name("refund", refund_handler)
                .fallback(recorder(&log, "unknown-command"))
                .observed_by(observers.clone()),
        )
        .fallback(recorder(&log, "unknown-type"))
        .non_typed(recorder(&log, "untyped"))
        .observed_by(observers)
        .build();

    let good = refund_command(
        "r1",
        Refund {
            order: "o-1".into(),
            cents: 250,
        },
    );
    let malformed = EnvelopeBuilder::command_message("refund")
        .with_id("r2")
        .with_sender("billing")
        .json()
        .with_payload("{\"order\":")
        .build()
        .unwrap();
    let plain = EnvelopeBuilder::command_message("refund")
        .with_id("r3")
        .with_sender("billing")
        .plain_text()
        .with_payload("o-1")
        .build()
        .unwrap();
    let cancel = EnvelopeBuilder::command_message("cancel")
        .with_id("c1")
        .with_sender("billing")
        .build()
        .unwrap();
    let untyped = EnvelopeBuilder::new()
        .with_id("u1")
        .with_sender("billing")
        .build()
        .unwrap();

    for envelope in [&good, &malformed, &plain, &cancel, &untyped] {
        dispatcher.dispatch(envelope).expect("dispatch succeeds");
    }

    assert_eq!(
        *refunds.lock().unwrap(),
        [Refund {
            order: "o-1".into(),
            cents: 250
        }]
    );
    assert_eq!(
        *log.lock().unwrap(),
        [
            "undecodable:r2",
            "undecodable:r3",
            "unknown-command:c1",
            "untyped:u1"
        ]
    );

    assert_eq!(metrics.dispatch_count("type", "matched"), 4);
    assert_eq!(metrics.dispatch_count("type", "non_typed"), 1);
    assert_eq!(metrics.dispatch_count("command", "matched"), 3);
    assert_eq!(metrics.dispatch_count("command", "unmatched"), 1);
    assert_eq!(metrics.decode_count("decoded"), 1);
    assert_eq!(metrics.decode_count("decode_failed"), 1);
    assert_eq!(metrics.decode_count("content_type_mismatch"), 1);
}

#[test]
fn one_handler_can_serve_several_keys() {
    let log = Log::default();
    let audit = SharedHandler::new(recorder(&log, "audit"));
    let dispatcher = TypeRoutes::new()
        .on_type("Audit", audit.clone())
        .on_type("Trace", audit)
        .build();
    for (id, message_type) in [("a1", "Audit"), ("t1", "Trace")] {
        let envelope = EnvelopeBuilder::new()
            .with_id(id)
            .with_sender("ops")
            .message_type(message_type)
            .build()
            .unwrap();
        dispatcher.dispatch(&envelope).unwrap();
    }
    assert_eq!(*log.lock().unwrap(), ["audit:a1", "audit:t1"]);
}

#[test]
fn dispatcher_is_shared_across_threads() {
    let log = Log::default();
    let dispatcher = Arc::new(
        TypeRoutes::new()
            .on_simple(
                ContentNegotiatingDecoder::new(PlainDecoder)
                    .with_fallback(recorder(&log, "fallback"))
                    .and_then({
                        let log = Arc::clone(&log);
                        move |text: String, _: &Envelope| -> anyhow::Result<()> {
                            log.lock().unwrap().push(text);
                            Ok(())
                        }
                    }),
            )
            .build(),
    );

    let workers: Vec<_> = (0..4)
        .map(|n| {
            let dispatcher = Arc::clone(&dispatcher);
            thread::spawn(move || {
                let envelope = EnvelopeBuilder::simple()
                    .with_sender("worker")
                    .plain_text()
                    .with_payload(format!("w{n}"))
                    .build()
                    .unwrap();
                dispatcher.dispatch(&envelope)
            })
        })
        .collect();
    for worker in workers {
        worker.join().expect("worker joins").expect("dispatch succeeds");
    }

    let mut seen = log.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, ["w0", "w1", "w2", "w3"]);
}
