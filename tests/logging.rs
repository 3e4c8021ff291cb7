use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};

use parallel_saxpy::{RunConfig, SaxpyError, Session, VectorStore};

/// Keeps every debug-or-louder record so the test can inspect it.
struct CaptureLogger {
    lines: Mutex<Vec<String>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.lines.lock().unwrap().push(record.args().to_string());
        }
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    lines: Mutex::new(Vec::new()),
};

#[tokio::test]
async fn debug_level_dumps_operands_and_final_y() -> Result<(), SaxpyError> {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Debug);

    let config = RunConfig {
        size: 2,
        seed: 0,
        threads: 1,
        max_iters: 1,
    };
    let store = VectorStore::new(vec![1., 1.], vec![0., 0.5], 2.)?;

    Session::start(config, store)?.wait().await?;

    let lines = LOGGER.lines.lock().unwrap();
    assert!(lines.iter().any(|l| l.contains(
        "vector X= [ 1.000000, 1.000000 ]\nvector Y= [ 0.000000, 0.500000 ]\na= 2.000000"
    )));
    assert!(lines
        .iter()
        .any(|l| l == "RES: final vector Y= [ 2.000000, 2.500000 ]"));
    Ok(())
}
