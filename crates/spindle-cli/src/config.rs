//! Command line / environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use spindle_core::PoolConfig;

/// spindle - in-memory task queue with an HTTP front end
#[derive(Debug, Parser)]
#[command(name = "spindle")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "SPINDLE_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "SPINDLE_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Number of worker loops
    #[arg(short, long, env = "SPINDLE_WORKERS", default_value_t = 3)]
    pub workers: usize,

    /// Dispatch queue capacity
    #[arg(long, env = "SPINDLE_QUEUE_CAPACITY", default_value_t = 100)]
    pub queue_capacity: usize,

    /// Per-task deadline in milliseconds
    #[arg(long, env = "SPINDLE_TASK_TIMEOUT_MS", default_value_t = 5000)]
    pub task_timeout_ms: u64,

    /// How long the HTTP server may take to finish in-flight requests on shutdown
    #[arg(long, default_value_t = 10)]
    pub shutdown_grace_secs: u64,
}

impl Cli {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::default()
            .with_workers(self.workers)
            .with_queue_capacity(self.queue_capacity)
            .with_task_timeout(Duration::from_millis(self.task_timeout_ms))
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["spindle"]).unwrap();
        assert_eq!(cli.socket_addr(), "127.0.0.1:8080".parse().unwrap());
        assert_eq!(cli.pool_config(), PoolConfig::default());
        assert_eq!(cli.shutdown_grace(), Duration::from_secs(10));
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "spindle",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--workers",
            "8",
            "--queue-capacity",
            "0",
            "--task-timeout-ms",
            "100",
        ])
        .unwrap();

        assert_eq!(cli.socket_addr(), "0.0.0.0:9000".parse().unwrap());
        let config = cli.pool_config();
        assert_eq!(config.workers, 8);
        assert_eq!(config.queue_capacity, 1);
        assert_eq!(config.task_timeout, Duration::from_millis(100));
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
