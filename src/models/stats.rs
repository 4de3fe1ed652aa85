//! Streaming record types: log lines and resource usage samples

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub line: String,
    pub timestamp: DateTime<Utc>,
    pub stream: LogStream,
}

impl LogEntry {
    pub fn stdout(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            timestamp: Utc::now(),
            stream: LogStream::Stdout,
        }
    }

    pub fn is_error(&self) -> bool {
        self.stream == LogStream::Stderr
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerStats {
    pub container_id: String,
    pub cpu_percent: f64,
    pub memory_usage: u64,
    pub memory_limit: u64,
    pub memory_percent: f64,
    pub network_rx: u64,
    pub network_tx: u64,
    pub block_read: u64,
    pub block_write: u64,
    pub pids: u64,
    pub timestamp: Option<DateTime<Utc>>,
}

/// Cumulative CPU counters from one stats sample
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CpuSample {
    pub total_usage: u64,
    pub system_usage: u64,
    pub online_cpus: Option<u64>,
    pub percpu_count: usize,
}

/// CPU usage between two samples, scaled by the number of CPUs
pub fn cpu_percent(previous: CpuSample, current: CpuSample) -> f64 {
    let cpu_delta = current.total_usage as f64 - previous.total_usage as f64;
    let system_delta = current.system_usage as f64 - previous.system_usage as f64;

    if cpu_delta <= 0.0 || system_delta <= 0.0 {
        return 0.0;
    }

    let cpus = match current.online_cpus {
        Some(n) if n > 0 => n as f64,
        _ if current.percpu_count > 0 => current.percpu_count as f64,
        _ => 1.0,
    };

    (cpu_delta / system_delta) * cpus * 100.0
}

pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        0.0
    } else {
        usage as f64 / limit as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_percent_uses_online_cpus() {
        let prev = CpuSample {
            total_usage: 1_000,
            system_usage: 10_000,
            online_cpus: Some(4),
            percpu_count: 8,
        };
        let cur = CpuSample {
            total_usage: 1_500,
            system_usage: 20_000,
            ..prev
        };
        assert!((cpu_percent(prev, cur) - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cpu_percent_falls_back_to_percpu_then_one() {
        let prev = CpuSample::default();
        let cur = CpuSample {
            total_usage: 100,
            system_usage: 1_000,
            online_cpus: None,
            percpu_count: 2,
        };
        assert!((cpu_percent(prev, cur) - 20.0).abs() < 1e-9);

        let cur = CpuSample {
            percpu_count: 0,
            ..cur
        };
        assert!((cpu_percent(prev, cur) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_cpu_percent_zero_without_progress() {
        let sample = CpuSample {
            total_usage: 5,
            system_usage: 5,
            online_cpus: Some(1),
            percpu_count: 1,
        };
        assert_eq!(cpu_percent(sample, sample), 0.0);
    }

    #[test]
    fn test_memory_percent() {
        assert_eq!(memory_percent(50, 200), 25.0);
        assert_eq!(memory_percent(50, 0), 0.0);
    }
}
