//! `linea experiment`
//!
//! Record a history on a real concurrent container, then check it.
//!
//! ```text
//!   spawn_blocking × threads ──► ConcurrentLog ──► [Slicer] ──► spawn_blocking checker(s)
//! ```

use std::path::PathBuf;
use std::sync::atomic::AtomicI8;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, ValueEnum};
use dashmap::DashSet;
use linea_core::{
    CachePolicy, CheckResult, CheckerConfig, ConcurrentLog, LinearizabilityTester, Log, LogInfo,
    Slicer, Specification, TesterStats,
};
use linea_models::register::INITIAL_VALUE;
use linea_models::Set;
use tracing::{info, info_span, warn};

use crate::workers::{self, BoundedQueue, BoundedStack, Workload};

/// Capacities the bounded stack and queue models are built for
const CAPACITIES: [usize; 4] = [8, 64, 512, 4096];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Model {
    Set,
    Stack,
    Queue,
    Register,
}

#[derive(Debug, Args)]
pub struct ExperimentArgs {
    /// Data type under test
    #[arg(value_enum)]
    pub model: Model,

    /// Worker threads
    #[arg(long, default_value_t = 4)]
    pub threads: usize,

    /// Operations per worker
    #[arg(long, default_value_t = 1000)]
    pub ops: usize,

    /// Largest value drawn
    #[arg(long, default_value_t = 20)]
    pub max_value: u8,

    /// Capacity of the bounded stack or queue (8, 64, 512 or 4096)
    #[arg(long, default_value_t = 64)]
    pub capacity: usize,

    /// State memoization: disabled, lru or always
    #[arg(long)]
    pub cache: Option<CachePolicy>,

    /// Entries kept by the LRU state cache
    #[arg(long)]
    pub lru_capacity: Option<usize>,

    /// Give up after this many seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Check the set history one partition at a time
    #[arg(long)]
    pub partitions: Option<usize>,

    /// Pre-seed the container with a value the history never records
    #[arg(long)]
    pub corrupt: bool,

    /// Print the debug trace of a negative verdict
    #[arg(long)]
    pub trace: bool,

    /// JSON checker configuration; flags override it
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl ExperimentArgs {
    fn workload(&self) -> Workload {
        Workload {
            ops: self.ops,
            max_value: self.max_value,
        }
    }

    fn log_capacity(&self) -> Result<usize> {
        self.threads
            .checked_mul(self.ops)
            .and_then(|n| n.checked_mul(2))
            .ok_or_else(|| anyhow!("history of {} x {} operations is too large", self.threads, self.ops))
    }
}

/// Result of one experiment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Linearizable,
    NotLinearizable,
    Timeout,
}

impl Outcome {
    /// Combine per-partition outcomes: any negative verdict wins
    fn merge(self, other: Self) -> Self {
        match (self, other) {
            (Self::NotLinearizable, _) | (_, Self::NotLinearizable) => Self::NotLinearizable,
            (Self::Timeout, _) | (_, Self::Timeout) => Self::Timeout,
            _ => Self::Linearizable,
        }
    }

    /// Map to the process exit status
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Linearizable => Ok(()),
            Self::NotLinearizable => bail!("history is not linearizable"),
            Self::Timeout => bail!("check timed out before reaching a verdict"),
        }
    }
}

/// Load the checker configuration, then apply flag overrides
pub fn load_config(args: &ExperimentArgs) -> Result<CheckerConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("failed to parse checker config {}", path.display()))?
        }
        None => CheckerConfig::default(),
    };

    if let Some(cache) = args.cache {
        config = config.with_cache(cache);
    }
    if let Some(capacity) = args.lru_capacity {
        config = config.with_lru_capacity(capacity);
    }
    if let Some(secs) = args.timeout_secs {
        config = config.with_timeout(Duration::from_secs(secs));
    }

    config.validate().context("invalid checker configuration")?;
    Ok(config)
}

pub async fn run(args: ExperimentArgs) -> Result<Outcome> {
    let config = load_config(&args)?;

    if args.partitions.is_some() && args.model != Model::Set {
        bail!("--partitions only applies to the set model");
    }

    info!(
        model = ?args.model,
        threads = args.threads,
        ops = args.ops,
        cache = %config.cache,
        corrupt = args.corrupt,
        "experiment started"
    );

    match args.model {
        Model::Set => run_set(&args, config).await,
        Model::Register => run_register(&args, config).await,
        Model::Stack => match args.capacity {
            8 => run_stack::<8>(&args, config).await,
            64 => run_stack::<64>(&args, config).await,
            512 => run_stack::<512>(&args, config).await,
            4096 => run_stack::<4096>(&args, config).await,
            other => bail!("unsupported capacity {other}, expected one of {CAPACITIES:?}"),
        },
        Model::Queue => match args.capacity {
            8 => run_queue::<8>(&args, config).await,
            64 => run_queue::<64>(&args, config).await,
            512 => run_queue::<512>(&args, config).await,
            4096 => run_queue::<4096>(&args, config).await,
            other => bail!("unsupported capacity {other}, expected one of {CAPACITIES:?}"),
        },
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Per-model drivers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn run_set(args: &ExperimentArgs, config: CheckerConfig) -> Result<Outcome> {
    let set = Arc::new(DashSet::new());
    if args.corrupt {
        set.insert(args.max_value);
    }

    let log = record(args, set, workers::set_worker).await?;
    match args.partitions {
        Some(partitions) => check_partitioned(log, partitions, config, args.trace).await,
        None => check_whole(log, config, args.trace).await,
    }
}

async fn run_stack<const N: usize>(args: &ExperimentArgs, config: CheckerConfig) -> Result<Outcome> {
    let stack = Arc::new(BoundedStack::new(N));
    if args.corrupt {
        stack.try_push(args.max_value);
    }

    let log = record(args, stack, workers::stack_worker::<N>).await?;
    check_whole(log, config, args.trace).await
}

async fn run_queue<const N: usize>(args: &ExperimentArgs, config: CheckerConfig) -> Result<Outcome> {
    let queue = Arc::new(BoundedQueue::new(N));
    if args.corrupt {
        queue.try_enqueue(args.max_value);
    }

    let log = record(args, queue, workers::queue_worker::<N>).await?;
    check_whole(log, config, args.trace).await
}

async fn run_register(args: &ExperimentArgs, config: CheckerConfig) -> Result<Outcome> {
    let seed = if args.corrupt {
        i8::try_from(args.max_value).unwrap_or(i8::MAX)
    } else {
        INITIAL_VALUE
    };

    let log = record(args, Arc::new(AtomicI8::new(seed)), workers::register_worker).await?;
    check_whole(log, config, args.trace).await
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Recording and checking
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one blocking worker task per thread against `container`
async fn record<S, C, W>(args: &ExperimentArgs, container: Arc<C>, worker: W) -> Result<ConcurrentLog<S>>
where
    S: Specification,
    C: Send + Sync + 'static,
    W: Fn(Workload, &C, &ConcurrentLog<S>) + Copy + Send + 'static,
{
    let log = Arc::new(ConcurrentLog::<S>::new(args.log_capacity()?));
    let workload = args.workload();

    let tasks: Vec<_> = (0..args.threads)
        .map(|_| {
            let log = Arc::clone(&log);
            let container = Arc::clone(&container);
            tokio::task::spawn_blocking(move || worker(workload, &container, &log))
        })
        .collect();

    for task in tasks {
        task.await.context("worker task failed")?;
    }

    let log = Arc::try_unwrap(log).map_err(|_| anyhow!("history is still shared after the workers finished"))?;
    info!(entries = log.number_of_entries(), "history recorded");
    Ok(log)
}

async fn check_whole<S: Specification>(
    mut log: ConcurrentLog<S>,
    config: CheckerConfig,
    trace: bool,
) -> Result<Outcome> {
    tokio::task::spawn_blocking(move || check_log(log.info(), config, trace))
        .await
        .context("checker task failed")
}

async fn check_partitioned(
    mut log: ConcurrentLog<Set>,
    partitions: usize,
    config: CheckerConfig,
    trace: bool,
) -> Result<Outcome> {
    let sublogs: Vec<Log<Set>> = Slicer::new(log.info(), partitions)?.into_sublogs();
    info!(partitions = sublogs.len(), "checking sub-histories in parallel");

    let tasks: Vec<_> = sublogs
        .into_iter()
        .enumerate()
        .map(|(partition, sublog)| {
            let config = config.clone();
            tokio::task::spawn_blocking(move || {
                let _span = info_span!("partition", partition).entered();
                check_log(sublog.info(), config, trace)
            })
        })
        .collect();

    let mut outcome = Outcome::Linearizable;
    for task in tasks {
        outcome = outcome.merge(task.await.context("checker task failed")?);
    }
    Ok(outcome)
}

fn check_log<S: Specification>(info: LogInfo<'_, S>, config: CheckerConfig, trace: bool) -> Outcome {
    let mut tester = LinearizabilityTester::with_config(info, config);
    let mut result = CheckResult::new();
    tester.check_into(&mut result);
    report(&result, &info, tester.stats(), trace)
}

fn report<S: Specification>(
    result: &CheckResult,
    info: &LogInfo<'_, S>,
    stats: TesterStats,
    trace: bool,
) -> Outcome {
    match serde_json::to_string(&stats) {
        Ok(stats) => info!(%stats, "checker statistics"),
        Err(err) => warn!(%err, "could not serialize checker statistics"),
    }

    if result.is_timeout() {
        warn!(entries = info.number_of_entries(), "check timed out");
        return Outcome::Timeout;
    }

    if result.is_linearizable() {
        info!(calls = info.number_of_calls(), "history is linearizable");
        return Outcome::Linearizable;
    }

    warn!(cutoff = result.cutoff_entry_id(), "history is not linearizable");
    if trace {
        print!("{}", result.debug(info, false));
    }
    Outcome::NotLinearizable
}
