//! `lazyart config` – show config location and effective values.

use anyhow::Result;
use lazyart_core::config::{self, LazyartConfig};
use lazyart_core::logging;

pub fn run_show_config(cfg: &LazyartConfig) -> Result<()> {
    println!("config file:     {}", config::config_path()?.display());
    println!("log file:        {}", logging::log_file_path()?.display());
    println!("cache dir:       {}", cfg.cache_dir()?.display());
    println!("failure policy:  {:?}", cfg.failure_policy);
    println!("trace operations: {}", cfg.trace_operations);
    match cfg.retry_policy() {
        Some(p) => println!(
            "retry:           {} attempts, base {:?}, max {:?}",
            p.max_attempts, p.base_delay, p.max_delay
        ),
        None => println!("retry:           off"),
    }
    Ok(())
}
