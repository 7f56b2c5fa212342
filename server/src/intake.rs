//! Location intake.
//!
//! Sensor readings arrive out of band as JSON lines, either a
//! `{"latitude": .., "longitude": ..}` position or an
//! `{"error": ".."}` failure report. [`spawn_reader`] forwards them over
//! a channel from a dedicated thread and [`run_session`] applies them to a
//! [`CoverageSession`] one at a time, writing a view model line for every
//! refresh.
//!
//! The reader thread is never joined on shutdown: a blocking read on a
//! live sensor pipe can not be cancelled, and the process must still exit.

use crate::coverage::coverage_types::point::LocationUpdate;
use crate::coverage::coverage_utils::view_model::ViewModel;
use crate::session::{CoverageSession, SessionUpdate};
use serde::Deserialize;
use std::future::Future;
use std::io::BufRead;
use std::thread::JoinHandle;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

/// Buffered messages between the reader and the session loop.
pub const INTAKE_BUFFER: usize = 32;

/// One line of sensor input.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IntakeMessage {
    /// A position report.
    Location(LocationUpdate),

    /// The sensor could not produce a position.
    Failure {
        /// Reason reported by the sensor.
        error: String,
    },
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<IntakeMessage>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| format!("Could not parse [{}]: {}", line, e))
}

/// Forward every parsable line of `reader` to `tx` until end of input.
///
/// Blocks the calling thread; must not run inside the async runtime.
/// Returns the number of forwarded messages.
pub fn read_lines<R>(reader: R, tx: mpsc::Sender<IntakeMessage>) -> usize
where
    R: BufRead,
{
    let mut forwarded = 0;

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                intake_error!("(read_lines) Could not read input: {}", e);
                return forwarded;
            }
        };

        match parse_line(&line) {
            Ok(Some(message)) => {
                if tx.blocking_send(message).is_err() {
                    intake_warn!("(read_lines) Session loop is gone, stop reading.");
                    return forwarded;
                }
                forwarded += 1;
            }
            Ok(None) => {}
            Err(e) => intake_warn!("(read_lines) {}", e),
        }
    }

    intake_info!("(read_lines) End of input after {} messages.", forwarded);
    forwarded
}

/// Run [`read_lines`] on a dedicated OS thread.
pub fn spawn_reader<R>(
    reader: R,
    tx: mpsc::Sender<IntakeMessage>,
) -> std::io::Result<JoinHandle<usize>>
where
    R: BufRead + Send + 'static,
{
    std::thread::Builder::new()
        .name(String::from("intake-reader"))
        .spawn(move || read_lines(reader, tx))
}

/// Write `view` as one JSON document followed by a newline.
pub async fn write_view<W>(writer: &mut W, view: &ViewModel, pretty: bool) -> anyhow::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut json = match pretty {
        true => serde_json::to_vec_pretty(view)?,
        false => serde_json::to_vec(view)?,
    };
    json.push(b'\n');

    writer.write_all(&json).await?;
    writer.flush().await?;

    Ok(())
}

/// Apply messages from `rx` to `session` until the channel closes or
/// `shutdown` completes.
///
/// Returns the number of view models written.
pub async fn run_session<W, F>(
    session: &mut CoverageSession,
    mut rx: mpsc::Receiver<IntakeMessage>,
    writer: &mut W,
    pretty: bool,
    shutdown: F,
) -> anyhow::Result<usize>
where
    W: AsyncWrite + Unpin,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut frames = 0;

    loop {
        let message = tokio::select! {
            message = rx.recv() => message,
            _ = &mut shutdown => {
                intake_info!("(run_session) Shutdown requested.");
                break;
            }
        };

        let Some(message) = message else {
            intake_info!("(run_session) Intake closed.");
            break;
        };

        match message {
            IntakeMessage::Location(update) => match session.on_location_update(update) {
                Ok(SessionUpdate::Refreshed(view)) => {
                    write_view(writer, view, pretty).await?;
                    frames += 1;
                }
                Ok(SessionUpdate::Unchanged) => {}
                // already logged by the session
                Err(_) => {}
            },
            IntakeMessage::Failure { error } => session.on_sensor_failure(&error),
        }
    }

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::coverage_types::{
        feature::{FeatureCollection, PolygonFeature},
        point::Point,
    };
    use crate::coverage::coverage_utils::loader::Dataset;
    use crate::session::SessionSettings;
    use std::sync::Arc;

    fn point(latitude: f64, longitude: f64) -> Point {
        Point::new(latitude, longitude).unwrap()
    }

    fn session() -> CoverageSession {
        let area = PolygonFeature::new(
            Some("Centro".to_string()),
            vec![point(-20.82, -49.42), point(-20.82, -49.41), point(-20.81, -49.41)],
        );
        let dataset = Arc::new(Dataset {
            collection: FeatureCollection::new(vec![area]),
            notice: None,
        });

        CoverageSession::new(dataset, SessionSettings::new(point(-20.828997, -49.423328)))
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   "), Ok(None));
        assert_eq!(
            parse_line(r#"{"latitude": -20.8, "longitude": -49.4, "accuracy": 12}"#),
            Ok(Some(IntakeMessage::Location(LocationUpdate {
                latitude: -20.8,
                longitude: -49.4
            })))
        );
        assert_eq!(
            parse_line(r#"{"error": "User denied Geolocation"}"#),
            Ok(Some(IntakeMessage::Failure {
                error: "User denied Geolocation".to_string()
            }))
        );
        assert!(parse_line("latitude=1").is_err());
        assert!(parse_line(r#"{"latitude": -20.8}"#).is_err());
    }

    /// Reader that blocks until `release` is dropped, like a sensor pipe
    /// that stays open without sending anything.
    struct BlockedReader {
        release: std::sync::mpsc::Receiver<()>,
    }

    impl std::io::Read for BlockedReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            let _ = self.release.recv();
            Ok(0)
        }
    }

    #[test]
    fn test_read_lines_skips_garbage() {
        let input: &[u8] = b"{\"latitude\": 1.0, \"longitude\": 2.0}\n\nnot json\n{\"error\": \"timeout\"}\n";
        let (tx, mut rx) = mpsc::channel(INTAKE_BUFFER);

        let forwarded = read_lines(input, tx);
        assert_eq!(forwarded, 2);

        assert!(matches!(rx.blocking_recv(), Some(IntakeMessage::Location(_))));
        assert!(matches!(rx.blocking_recv(), Some(IntakeMessage::Failure { .. })));
        assert_eq!(rx.blocking_recv(), None);
    }

    #[test]
    fn test_shutdown_does_not_wait_for_blocked_reader() {
        let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
        let reader = std::io::BufReader::new(BlockedReader {
            release: release_rx,
        });
        let (tx, rx) = mpsc::channel(INTAKE_BUFFER);
        let handle = spawn_reader(reader, tx).unwrap();

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        shutdown_tx.send(()).unwrap();

        let mut session = session();
        let mut output: Vec<u8> = vec![];
        let frames = runtime
            .block_on(run_session(
                &mut session,
                rx,
                &mut output,
                false,
                crate::shutdown_signal("intake", Some(shutdown_rx)),
            ))
            .unwrap();
        assert_eq!(frames, 0);

        // dropping the runtime must not wait on the pending read
        drop(runtime);
        assert!(!handle.is_finished());

        drop(release_tx);
        assert_eq!(handle.join().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_run_session_writes_refreshes_only() {
        crate::get_log_handle().await;
        ut_info!("(test_run_session_writes_refreshes_only) Start.");

        let mut session = session();
        let (tx, rx) = mpsc::channel(INTAKE_BUFFER);
        let input: &[u8] = concat!(
            // jitter, ignored
            "{\"latitude\": -20.82900, \"longitude\": -49.42333}\n",
            // sensor failure, ignored
            "{\"error\": \"position unavailable\"}\n",
            // out of range, rejected
            "{\"latitude\": 95.0, \"longitude\": -49.4}\n",
            // 100 km away, refresh without matches
            "{\"latitude\": -21.73, \"longitude\": -49.42}\n",
            // back home, refresh with the area
            "{\"latitude\": -20.828997, \"longitude\": -49.423328}\n",
        )
        .as_bytes();
        let forwarded = spawn_reader(input, tx).unwrap().join().unwrap();
        assert_eq!(forwarded, 5);

        let mut output: Vec<u8> = vec![];
        let frames = run_session(
            &mut session,
            rx,
            &mut output,
            false,
            std::future::pending::<()>(),
        )
        .await
        .unwrap();
        assert_eq!(frames, 2);

        let lines: Vec<serde_json::Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["polygons"].as_array().unwrap().len(), 0);
        assert_eq!(lines[1]["polygons"][0]["label"], "Centro");

        ut_info!("(test_run_session_writes_refreshes_only) Success.");
    }

    #[tokio::test]
    async fn test_run_session_stops_on_shutdown() {
        let mut session = session();
        // sender kept alive so only the shutdown can end the loop
        let (_tx, rx) = mpsc::channel::<IntakeMessage>(INTAKE_BUFFER);
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        shutdown_tx.send(()).unwrap();

        let mut output: Vec<u8> = vec![];
        let frames = run_session(
            &mut session,
            rx,
            &mut output,
            false,
            crate::shutdown_signal("intake", Some(shutdown_rx)),
        )
        .await
        .unwrap();

        assert_eq!(frames, 0);
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_write_view_pretty() {
        let session = session();
        let mut output: Vec<u8> = vec![];
        write_view(&mut output, session.view(), true).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.lines().count() > 1);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["radius_circle"]["radius_km"], 20.0);
    }
}
