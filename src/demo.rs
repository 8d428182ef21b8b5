//! Demonstration runs
//!
//! The binary clicks a number of counters and prints what they return. Both ways of doing so live
//! here: [closures] drives closures from the factory, [shared] spreads the clicks of each counter
//! over worker threads. Output is written line by line as the clicks happen.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use miette::Diagnostic;
use thiserror::Error;
use tracing::{debug, info};

use crate::{create, Counter, CounterError, OverflowPolicy, SharedCounter};

/// Upper limit for worker threads per shared counter
pub const MAX_THREADS: usize = 256;

#[derive(Debug, Error, Diagnostic)]
pub enum DemoError {
    #[error("At least one counter is needed")]
    NoCounters,

    #[error("At least one worker thread is needed")]
    NoThreads,

    #[error("{threads} worker threads requested, at most {max} are allowed", max = MAX_THREADS)]
    TooManyThreads { threads: usize },

    #[error("Could not spawn a worker for counter {counter}")]
    #[diagnostic(help("Try fewer worker threads"))]
    Spawn {
        counter: usize,
        source: io::Error,
    },

    #[error("A worker of counter {counter} panicked")]
    WorkerPanicked { counter: usize },

    #[error("Cannot keep track of {clicks} clicks in memory")]
    #[diagnostic(help("Try fewer clicks in shared mode"))]
    TooManyClicks { clicks: u64 },

    #[error("Counter {counter} handed out {value} more than once or outside of 1..={clicks}")]
    UnexpectedClick {
        counter: usize,
        value: u64,
        clicks: u64,
    },

    #[error("Counter {counter} never handed out {missing} of its {clicks} clicks")]
    #[diagnostic(help("Every click must be seen exactly once"))]
    LostClicks {
        counter: usize,
        missing: u64,
        clicks: u64,
    },

    #[error("Failed to write the output")]
    Output(#[from] io::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Counter(#[from] CounterError),
}

/// What to click
#[derive(Debug, Clone, Copy)]
pub struct Demo {
    pub clicks: u64,
    pub counters: usize,
    pub policy: OverflowPolicy,
}

impl Default for Demo {
    fn default() -> Self {
        Self {
            clicks: 3,
            counters: 1,
            policy: OverflowPolicy::default(),
        }
    }
}

impl Demo {
    fn write_line(&self, out: &mut impl Write, counter: usize, value: u64) -> io::Result<()> {
        if self.counters == 1 {
            writeln!(out, "{value}")
        } else {
            writeln!(out, "counter {}: {value}", counter + 1)
        }
    }
}

type Clicker = Box<dyn FnMut() -> Result<u64, CounterError>>;

fn clicker(policy: OverflowPolicy) -> Clicker {
    if policy == OverflowPolicy::default() {
        let mut click = create();
        Box::new(move || Ok::<_, CounterError>(click()))
    } else {
        let mut counter = Counter::with_policy(policy);
        Box::new(move || counter.try_increment())
    }
}

/// Click independent closures round robin, one line per click
///
/// Stops at the first overflow under [OverflowPolicy::Checked].
pub fn closures(demo: &Demo, out: &mut impl Write) -> Result<(), DemoError> {
    if demo.counters == 0 {
        return Err(DemoError::NoCounters);
    }

    let clickers = (0..demo.counters).map(|_| clicker(demo.policy)).collect();
    click_round_robin(demo, clickers, out)
}

fn click_round_robin(
    demo: &Demo,
    mut clickers: Vec<Clicker>,
    out: &mut impl Write,
) -> Result<(), DemoError> {
    for _ in 0..demo.clicks {
        for (i, click) in clickers.iter_mut().enumerate() {
            let value = click()?;
            demo.write_line(out, i, value)?;
        }
    }

    info!(clicks = demo.clicks, counters = clickers.len(), "closure run finished");
    Ok(())
}

/// Click every counter from `threads` workers, one line per counter with its final value
///
/// Every click handed out by a counter is checked to be in `1..=clicks` and seen exactly once.
/// Counters that fail are reported together, the others are still written.
pub fn shared(demo: &Demo, threads: usize, out: &mut impl Write) -> Result<(), Vec<DemoError>> {
    if demo.counters == 0 {
        return Err(vec![DemoError::NoCounters]);
    }
    if threads == 0 {
        return Err(vec![DemoError::NoThreads]);
    }
    if threads > MAX_THREADS {
        return Err(vec![DemoError::TooManyThreads { threads }]);
    }

    let mut errs = Vec::new();
    for i in 0..demo.counters {
        match run_shared_counter(demo, i + 1, threads) {
            Ok(value) => {
                if let Err(err) = demo.write_line(out, i, value) {
                    errs.push(err.into());
                    return Err(errs);
                }
            }
            Err(err) => errs.push(err),
        }
    }

    if errs.is_empty() {
        info!(counters = demo.counters, threads, "shared run finished");
        Ok(())
    } else {
        Err(errs)
    }
}

/// One bit per click value in `1..=clicks`
struct ClickLedger {
    words: Vec<AtomicU64>,
    clicks: u64,
}

impl ClickLedger {
    fn new(clicks: u64) -> Result<Self, DemoError> {
        let len = usize::try_from(clicks.div_ceil(64))
            .map_err(|_| DemoError::TooManyClicks { clicks })?;

        let mut words = Vec::new();
        words
            .try_reserve_exact(len)
            .map_err(|_| DemoError::TooManyClicks { clicks })?;
        words.resize_with(len, AtomicU64::default);

        Ok(Self { words, clicks })
    }

    /// Mark `value` as seen, false if it is out of range or was seen before
    fn record(&self, value: u64) -> bool {
        if value == 0 || value > self.clicks {
            return false;
        }

        let bit = value - 1;
        let mask = 1 << (bit % 64);
        let previous = self.words[(bit / 64) as usize].fetch_or(mask, Ordering::Relaxed);
        previous & mask == 0
    }

    fn missing(&self) -> u64 {
        let seen: u64 = self
            .words
            .iter()
            .map(|word| u64::from(word.load(Ordering::Relaxed).count_ones()))
            .sum();
        self.clicks - seen
    }
}

fn click_worker(
    handle: &SharedCounter,
    ledger: &ClickLedger,
    counter: usize,
    share: u64,
) -> Result<(), DemoError> {
    for _ in 0..share {
        let value = handle.increment()?;
        if !ledger.record(value) {
            return Err(DemoError::UnexpectedClick {
                counter,
                value,
                clicks: ledger.clicks,
            });
        }
    }
    Ok(())
}

fn run_shared_counter(demo: &Demo, counter: usize, threads: usize) -> Result<u64, DemoError> {
    let shared = SharedCounter::with_policy(demo.policy);
    let ledger = ClickLedger::new(demo.clicks)?;
    let per_worker = demo.clicks / threads as u64;
    let remainder = demo.clicks % threads as u64;

    let (spawn_err, outcomes) = thread::scope(|scope| {
        let mut workers = Vec::with_capacity(threads);
        let mut spawn_err = None;

        for w in 0..threads as u64 {
            let handle = shared.clone();
            let ledger = &ledger;
            let share = per_worker + u64::from(w < remainder);

            let spawned = thread::Builder::new()
                .spawn_scoped(scope, move || click_worker(&handle, ledger, counter, share));

            match spawned {
                Ok(worker) => workers.push(worker),
                Err(source) => {
                    spawn_err = Some(DemoError::Spawn { counter, source });
                    break;
                }
            }
        }

        // join here so a panicking worker is reported instead of tearing down the scope
        let outcomes: Vec<_> = workers.into_iter().map(|worker| worker.join()).collect();
        (spawn_err, outcomes)
    });

    if let Some(err) = spawn_err {
        return Err(err);
    }
    for outcome in outcomes {
        outcome.map_err(|_| DemoError::WorkerPanicked { counter })??;
    }

    let missing = ledger.missing();
    debug!(counter, missing, "checked worker clicks");
    if missing != 0 {
        return Err(DemoError::LostClicks {
            counter,
            missing,
            clicks: demo.clicks,
        });
    }

    Ok(shared.clicks()?)
}
