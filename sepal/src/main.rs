//! Sepal: demo benches for the discrete-event simulation kernel.

use argh::FromArgs;

use sepal::{
    configuration, errors::SimResult, Edge, SimError, SimHandle, Simulator,
};

#[derive(FromArgs)]
#[argh(help_triggers("-h", "--help"))]
/// The Sepal simulation kernel
pub struct Opts {
    /// silence non-error log output
    #[argh(switch, short = 'q', long = "quiet")]
    quiet: bool,

    /// enables debug logging
    #[argh(switch, long = "debug-logging")]
    debug_logging: bool,

    #[argh(subcommand)]
    bench: Option<Bench>,
}

#[derive(FromArgs)]
#[argh(subcommand)]
enum Bench {
    Counter(CounterBench),
    Toggle(ToggleBench),
}

#[derive(FromArgs)]
#[argh(subcommand, name = "counter")]
/// [default] A clocked 4-bit up-counter with synchronous reset and enable
struct CounterBench {}

#[derive(FromArgs)]
#[argh(subcommand, name = "toggle")]
/// A toggling signal observed by an any-change watcher
struct ToggleBench {}

fn main() -> SimResult<()> {
    let opts: Opts = argh::from_env();

    let runtime_config = configuration::RuntimeConfig::builder()
        .quiet(opts.quiet)
        .debug_logging(opts.debug_logging)
        .build();

    let bench = opts.bench.unwrap_or(Bench::Counter(CounterBench {}));
    match &bench {
        Bench::Counter(_) => counter_bench(runtime_config),
        Bench::Toggle(_) => toggle_bench(runtime_config),
    }
}

/// A clock generator, a 4-bit up-counter with synchronous active-high
/// reset and enable, and a master process sequencing the reset and
/// enable windows.
fn counter_bench(config: configuration::RuntimeConfig) -> SimResult<()> {
    let mut sim = Simulator::new(config);

    let clk = sim.add_signal("clk", 0); // main clock of the design
    let reset = sim.add_signal("reset", 0); // active high, synchronous
    let enable = sim.add_signal("enable", 0);
    let count = sim.add_signal("count", 0); // 4-bit counter

    sim.register_process("clock", move |sim: SimHandle| async move {
        loop {
            sim.write(clk, 1);
            sim.delay(1).await;
            sim.write(clk, 0);
            sim.delay(1).await;
        }
    })?;

    sim.register_process("counter", move |sim: SimHandle| async move {
        loop {
            // at every rising edge of the clock: reset wins, then enable
            sim.wait(clk, Edge::Rising).await;
            if sim.read(reset) != 0 {
                sim.write(count, 0);
            } else if sim.read(enable) != 0 {
                println!(
                    "({}) incrementing counter from {}",
                    sim.time(),
                    sim.read(count)
                );
                sim.write(count, (sim.read(count) + 1) & 15);
            }
        }
    })?;

    sim.register_process("master", move |sim: SimHandle| async move {
        println!("({}) started", sim.time());
        sim.delay(10).await;

        sim.write(reset, 1);
        println!("({}) asserting reset", sim.time());

        sim.delay(20).await;
        sim.write(reset, 0);
        println!("({}) de-asserting reset", sim.time());

        sim.delay(10).await;
        println!("({}) asserting enable", sim.time());
        sim.write(enable, 1);

        sim.delay(40).await;
        println!("({}) de-asserting enable", sim.time());
        sim.write(enable, 0);

        println!("({}) terminating simulation", sim.time());
        sim.finish();
    })?;

    sim.run();

    println!(
        "counter stopped at {} with value {}",
        sim.time(),
        sim.value(count)
    );
    Ok(())
}

/// A two-state toggler flipping a signal every tick while an observer
/// with an any-change sensitivity counts the transitions it sees.
fn toggle_bench(config: configuration::RuntimeConfig) -> SimResult<()> {
    let mut sim = Simulator::new(config);

    let line = sim.add_signal("line", 0);

    sim.register_process("toggler", move |sim: SimHandle| async move {
        for _ in 0..5 {
            sim.write(line, 1 - sim.read(line));
            sim.delay(1).await;
        }
        sim.finish();
    })?;

    sim.register_process("observer", move |sim: SimHandle| async move {
        let mut seen = 0_u32;
        loop {
            sim.wait(line, Edge::Any).await;
            seen += 1;
            println!(
                "({}) change #{seen}: line is now {}",
                sim.time(),
                sim.read(line)
            );
        }
    })?;

    sim.run();

    if sim.value(line) != 1 {
        return Err(SimError::GenericError(
            "toggle bench ended on an unexpected value".to_string(),
        )
        .into());
    }
    println!("toggle stopped at {} with line {}", sim.time(), sim.value(line));
    Ok(())
}
