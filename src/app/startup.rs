//! Application startup
//!
//! Stage 1 parses the command line and starts logging from its flags.
//! Stage 2 loads the configuration file, applies its log level when the
//! command line did not set one, and lays the flag overrides on top.
//! Stage 3 wires the backends, analyzer and pool, hooks shutdown signals
//! to `drain`, and submits every repository.

use crate::analysis::api::Analyzer;
use crate::app::cli::api::{load_config, Args, Config};
use crate::app::{delivery, render};
use crate::backend::api::{
    ChannelPromoter, Database, DirectoryDatabase, GitHubHost, LogPromoter, MemoryDatabase,
    ProcessTaskRunner, Promoter,
};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, reconfigure_logging};
use crate::core::shutdown::ShutdownCoordinator;
use crate::model::api::{Record, RepoId};
use crate::pool::api::{DispatchPool, PoolError};
use crate::scoring::api::{builtin_criteria, ScoringEngine};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;

/// Exit status when every repository produced a Record
const EXIT_OK: i32 = 0;
/// Exit status for startup failures and rejected repositories
const EXIT_FAILURE: i32 = 1;

/// Parse arguments, run the application and return the process exit code
pub fn startup() -> i32 {
    let args = Args::parse();
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: failed to start async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };
    runtime.block_on(run(args))
}

struct Services {
    pool: DispatchPool,
    promoted: Option<broadcast::Receiver<Record>>,
}

/// Run with already-parsed arguments
pub async fn run(args: Args) -> i32 {
    let color = args.use_color();
    let log_file = args
        .log_file
        .as_ref()
        .map(|p| p.to_string_lossy().to_string());
    if let Err(e) = init_logging(
        args.log_level.as_deref(),
        args.log_format.as_deref(),
        log_file.as_deref(),
        color,
    ) {
        eprintln!("Error: failed to initialise logging: {}", e);
        return EXIT_FAILURE;
    }
    log::debug!("reporank {}", crate::core::version::long_version());

    let mut config = match load_config(args.config_file.as_deref()).await {
        Ok((config, _)) => config,
        Err(e) => {
            log_error_with_context(&e, "Loading configuration");
            return EXIT_FAILURE;
        }
    };
    if args.log_level.is_none() {
        if let Some(level) = &config.logging.level {
            if let Err(e) = reconfigure_logging(level) {
                log::warn!("Ignoring configured log level '{}': {}", level, e);
            }
        }
    }
    args.apply_overrides(&mut config);
    if let Err(e) = config.validate() {
        log_error_with_context(&e, "Validating configuration");
        return EXIT_FAILURE;
    }

    let Some(services) = build_services(&config, args.asynchronous).await else {
        return EXIT_FAILURE;
    };
    let pool = services.pool;

    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();
    let signal_pool = pool.clone();
    tokio::spawn(async move {
        if shutdown_rx.recv().await.is_ok() {
            signal_pool.drain().await;
        }
    });

    let mut rejected = 0;
    let mut ids = Vec::new();
    for (spec, parsed) in args.repo_ids(&config.analysis.toolchain) {
        match parsed {
            Ok(id) => ids.push((spec, id)),
            Err(e) => {
                render::print_rejection(&spec, &PoolError::Validation(e), color);
                rejected += 1;
            }
        }
    }

    if args.invalidate {
        for (_, id) in &ids {
            if let Err(e) = pool.analyzer().invalidate(id).await {
                log::warn!("Could not invalidate {}: {}", id.cache_key(), e);
            }
        }
    }

    rejected += match services.promoted {
        Some(promoted) if args.asynchronous => {
            submit_async(&pool, ids, promoted, &args, color).await
        }
        _ => submit_sync(&pool, ids, &args, color).await,
    };

    pool.drain().await;
    log::debug!("Final pool state: {:?}", pool.stats());

    if rejected == 0 {
        EXIT_OK
    } else {
        EXIT_FAILURE
    }
}

async fn build_services(config: &Config, asynchronous: bool) -> Option<Services> {
    let criteria = match builtin_criteria(&config.scoring.lint_checks)
        .and_then(|set| set.select(&config.scoring.criteria))
    {
        Ok(criteria) => criteria,
        Err(e) => {
            log_error_with_context(&e, "Registering scoring criteria");
            return None;
        }
    };
    log::debug!("Active criteria: {}", criteria.names().join(", "));

    let database: Arc<dyn Database> = match &config.storage.directory {
        Some(directory) => match DirectoryDatabase::open(directory).await {
            Ok(db) => Arc::new(db),
            Err(e) => {
                log_error_with_context(&e, "Opening storage directory");
                return None;
            }
        },
        None => Arc::new(MemoryDatabase::new()),
    };

    let token = config
        .host
        .token_env
        .as_deref()
        .and_then(|var| std::env::var(var).ok())
        .filter(|token| !token.is_empty());
    let host = match GitHubHost::new(
        &config.host.api_base,
        token,
        Duration::from_secs(config.host.request_timeout_secs),
    ) {
        Ok(host) => host,
        Err(e) => {
            log_error_with_context(&e, "Creating repository host client");
            return None;
        }
    };

    let runner = ProcessTaskRunner::new(config.runner.clone());
    for kind in &config.analysis.subtasks {
        if !runner.supports(*kind) {
            log::warn!(
                "No runner command configured for {}; it will be recorded as failed",
                kind
            );
        }
    }

    let (promoter, promoted): (Arc<dyn Promoter>, _) = if asynchronous {
        let (promoter, rx) = ChannelPromoter::new(64);
        (Arc::new(promoter), Some(rx))
    } else {
        (Arc::new(LogPromoter), None)
    };

    let analyzer = Analyzer::new(
        Arc::new(runner),
        Arc::new(host),
        database,
        promoter,
        ScoringEngine::new(criteria),
        config.analyzer_config(),
    );

    Some(Services {
        pool: DispatchPool::new(Arc::new(analyzer), config.pool_config()),
        promoted,
    })
}

/// Submit everything and print Records in input order; returns rejections
async fn submit_sync(
    pool: &DispatchPool,
    ids: Vec<(String, RepoId)>,
    args: &Args,
    color: bool,
) -> usize {
    let submissions = ids.into_iter().map(|(spec, id)| async move {
        let result = pool.submit(id).await;
        (spec, result)
    });

    let mut rejected = 0;
    for (spec, result) in futures::future::join_all(submissions).await {
        match result {
            Ok(record) if args.json => render::print_record_json(&record),
            Ok(record) => render::print_record(&record, color),
            Err(e) => {
                render::print_rejection(&spec, &e, color);
                rejected += 1;
            }
        }
    }
    rejected
}

/// Enqueue everything and print Records as the promoter delivers them
async fn submit_async(
    pool: &DispatchPool,
    ids: Vec<(String, RepoId)>,
    promoted: broadcast::Receiver<Record>,
    args: &Args,
    color: bool,
) -> usize {
    delivery::submit_all_async(
        pool,
        ids,
        promoted,
        |record| {
            if args.json {
                render::print_record_json(record);
            } else {
                render::print_record(record, color);
            }
        },
        |spec, e| render::print_rejection(spec, e, color),
    )
    .await
}
