// src/main.rs
//
// Demo driver: a two-part light cue. An intro constraint ramps the
// intensity up; an interactive sync waits for the hall door, then a
// second constraint fades back down under its own deadline.

use scena::{
    create_bridge, Address, ClockKind, Comparator, CurvePoint, Executor, ExecutionEvent,
    Expression, MemorySink, ProcessDef, ScenarioDef, Settings, SyncDef, TimeValue, Value,
};

fn build_document() -> ScenarioDef {
    let mut def = ScenarioDef::new();

    let start = def.add_sync(SyncDef::immediate());
    let door = def.add_sync(
        SyncDef::triggered(Expression::atom(
            "hall:/door",
            Comparator::Equal,
            Value::String("open".to_owned()),
        ))
        .with_write(Address::new("light:/cue"), Value::Int(2)),
    );
    let finish = def.add_sync(SyncDef::triggered(Expression::not(Expression::True)));

    // Intro: ramp up over at most 400 units, door may cut it from 200 on.
    let intro = def.add_constraint(
        start,
        door,
        TimeValue::from_units(200),
        TimeValue::from_units(400),
    );
    def.add_process(
        intro,
        ProcessDef::Automation {
            address: Address::new("light:/intensity"),
            points: vec![
                CurvePoint {
                    position: 0.0,
                    value: 0.0,
                },
                CurvePoint {
                    position: 1.0,
                    value: 1.0,
                },
            ],
        },
    );

    // Outro: fade down, hard deadline at 300 units.
    let outro = def.add_constraint(
        door,
        finish,
        TimeValue::from_units(300),
        TimeValue::from_units(300),
    );
    def.add_process(
        outro,
        ProcessDef::Automation {
            address: Address::new("light:/intensity"),
            points: vec![
                CurvePoint {
                    position: 0.0,
                    value: 1.0,
                },
                CurvePoint {
                    position: 1.0,
                    value: 0.0,
                },
            ],
        },
    );

    def
}

fn main() {
    let mut settings = Settings::default();
    settings.clock = ClockKind::FreeRunning;

    let sink = MemorySink::new();
    let executor = Executor::new(&build_document(), settings, Box::new(sink.clone()))
        .expect("document should compile");
    let (session, mut handle) = create_bridge(executor);

    session.play();

    // 40 passes of 20 ms; the door opens midway through the intro.
    for pass in 0..40 {
        if pass == 15 {
            println!("-- door opens --");
            session.device_value(Address::new("hall:/door"), Value::String("open".to_owned()));
        }
        handle.tick(20.0);

        for event in session.poll_events() {
            match event {
                ExecutionEvent::SyncFired { sync } => println!("sync {sync:?} fired"),
                ExecutionEvent::PlaybackStarted => println!("playback started"),
                ExecutionEvent::PlaybackStopped => println!("playback stopped"),
                _ => {}
            }
        }
    }

    session.stop();
    handle.tick(0.0);

    let writes = sink.writes();
    println!(
        "{} writes committed over {} passes",
        writes.len(),
        session.readback().ticks
    );
    if let Some((address, value)) = writes.last() {
        println!("last write: {address} = {value}");
    }
}
