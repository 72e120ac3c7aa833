use std::io::Write;
use std::sync::Mutex;

use crate::engine::Projection;

/// Receiver of every projection a session computes.
pub trait ProjectionSink: Send + Sync {
    fn render(&self, projection: &Projection);
}

/// Writes one line per projection.
/// Write failures are logged and dropped, a broken display never stops the session.
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        WriterSink {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> ProjectionSink for WriterSink<W> {
    fn render(&self, projection: &Projection) {
        let mut writer = match self.writer.lock() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = writeln!(writer, "{projection}").and_then(|_| writer.flush()) {
            log::warn!("Failed to render projection: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ProjectionSink, WriterSink};
    use crate::engine::{Amount, Projection};

    #[test]
    fn test_writer_sink_writes_one_line_per_projection() {
        let sink = WriterSink::new(Vec::new());
        sink.render(&Projection::default());
        sink.render(&Projection {
            unlocked: Amount::from_wei(3_000_000_000_000_000_000),
            withdrawable: Amount::from_wei(500_000_000_000_000_000),
        });

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "unlocked=0.0000 withdrawable=0.0000 withdraw=disabled\n\
             unlocked=3.0000 withdrawable=0.5000 withdraw=enabled\n"
        );
    }
}
