use std::fs;
use std::path::PathBuf;

use insta::assert_debug_snapshot;
use syswatch::system::error::SourceError;
use syswatch::system::procfs::ProcSource;
use syswatch::system::source::CounterSource;

const SPARSE_STAT: &str = "\
cpu  60 0 30 300 6 0 0 0 0 0
cpu3 30 0 10 100 3 0 0 0 0 0
cpu1 10 0 10 100 1 0 0 0 0 0
cpu2 20 0 10 100 2 0 0 0 0 0
intr 1 2 3
ctxt 42
";

const MEMINFO: &str = "\
MemTotal:           8000 kB
MemFree:            1000 kB
MemAvailable:       2000 kB
Buffers:             100 kB
";

/// A throwaway procfs-shaped directory under the system temp dir.
struct FakeProc {
    dir: PathBuf,
}

impl FakeProc {
    fn new(name: &str, stat: Option<&str>, meminfo: Option<&str>) -> Self {
        let dir = std::env::temp_dir().join(format!("syswatch_{name}_{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        if let Some(stat) = stat {
            fs::write(dir.join("stat"), stat).unwrap();
        }
        if let Some(meminfo) = meminfo {
            fs::write(dir.join("meminfo"), meminfo).unwrap();
        }
        FakeProc { dir }
    }

    fn source(&self) -> ProcSource {
        ProcSource::new(&self.dir)
    }
}

impl Drop for FakeProc {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.dir);
    }
}

#[test]
fn sparse_unordered_cores_parse_in_id_order() {
    let fake = FakeProc::new("sparse", Some(SPARSE_STAT), Some(MEMINFO));
    let counters = fake.source().cpu_counters().unwrap();

    let ids: Vec<u32> = counters.keys().copied().collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_debug_snapshot!("proc_stat_sparse_cores", counters);
}

#[test]
fn meminfo_fixture_reads_total_and_available() {
    let fake = FakeProc::new("meminfo", Some(SPARSE_STAT), Some(MEMINFO));
    let memory = fake.source().memory().unwrap();
    assert_eq!(memory.total_kb, 8000);
    assert_eq!(memory.available_kb, 2000);
}

#[test]
fn missing_meminfo_file_is_unavailable() {
    let fake = FakeProc::new("no_meminfo", Some(SPARSE_STAT), None);
    let err = fake.source().memory().unwrap_err();
    assert!(matches!(err, SourceError::Unavailable { .. }));
    assert!(err.to_string().contains("meminfo"));
}
