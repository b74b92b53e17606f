use crate::{
    display::{DisplayFields, DisplayUpdate},
    session::Session,
    state::EmergencyToggle,
};
use log::{debug, info, warn};
use std::{future::Future, io::BufRead};
use tokio::sync::{mpsc, oneshot};

pub(super) async fn run(
    mut session: Session,
    rx: mpsc::Receiver<DisplayUpdate>,
) -> Result<(), std::io::Error> {
    let (quit_tx, quit_rx) = oneshot::channel();

    // Blocking stdin reads get their own thread so they cannot hold up runtime shutdown
    let emergency = session.emergency();
    std::thread::spawn(move || read_commands(std::io::stdin().lock(), &emergency, quit_tx));

    info!("Press enter to toggle the emergency state, q to quit");

    let result = show_readings(&session, rx, quit_rx, tokio::signal::ctrl_c()).await;

    session.shutdown().await;

    result
}

/// Logs each complete reading until told to quit or `interrupt` resolves.
async fn show_readings(
    session: &Session,
    mut rx: mpsc::Receiver<DisplayUpdate>,
    mut quit: oneshot::Receiver<()>,
    interrupt: impl Future<Output = Result<(), std::io::Error>>,
) -> Result<(), std::io::Error> {
    tokio::pin!(interrupt);

    let mut fields = DisplayFields::default();
    let mut display_closed = false;

    loop {
        tokio::select! {
            _ = &mut quit => break,
            r = &mut interrupt => {
                r?;
                break;
            }
            update = rx.recv(), if !display_closed => match update {
                Some(update) => {
                    let complete = matches!(update, DisplayUpdate::Severity(_));
                    fields.apply(update);

                    if complete {
                        info!("{}  {}  {}", fields.heart_rate, fields.spo2, fields.status());
                    }
                }
                None => {
                    display_closed = true;

                    if session.is_running() {
                        warn!("Nothing to sample with, no readings will be shown");
                    } else {
                        warn!("Sampling has stopped, the last reading shown is final");
                    }
                }
            },
        }
    }

    Ok(())
}

/// Toggles the emergency state for every line read, until `q` or end of input.
fn read_commands<R: BufRead>(input: R, emergency: &EmergencyToggle, quit: oneshot::Sender<()>) {
    for line in input.lines() {
        match line {
            Ok(line) if line.trim().eq_ignore_ascii_case("q") => break,
            Ok(_) => {
                emergency.toggle();
                info!("Button now reads {}", emergency.button().text);
            }
            Err(e) => {
                warn!("Failed to read from stdin: {e}");
                break;
            }
        }
    }

    debug!("No more commands");
    let _ = quit.send(());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sampler::SamplerConfig, transport::tokio_channels::ChannelTransport};
    use core::time::Duration;
    use rand::{rngs::StdRng, SeedableRng};
    use std::{io::Cursor, sync::Arc};
    use vitalsim_protocol::VitalReading;

    fn inert_session() -> Session {
        let (display_tx, _) = mpsc::channel(1);
        Session::start::<ChannelTransport, _>(
            None,
            StdRng::seed_from_u64(1),
            SamplerConfig::default(),
            display_tx,
        )
    }

    #[test]
    fn each_line_toggles() {
        let emergency = Arc::new(EmergencyToggle::default());
        let (quit_tx, mut quit_rx) = oneshot::channel();

        read_commands(Cursor::new("\n\n\n"), &emergency, quit_tx);

        assert!(emergency.is_active());
        assert_eq!(quit_rx.try_recv(), Ok(()));
    }

    #[test]
    fn q_stops_reading() {
        let emergency = Arc::new(EmergencyToggle::default());
        let (quit_tx, mut quit_rx) = oneshot::channel();

        read_commands(Cursor::new("\nq\n\n"), &emergency, quit_tx);

        assert!(emergency.is_active());
        assert_eq!(quit_rx.try_recv(), Ok(()));
    }

    #[tokio::test]
    async fn interrupt_is_heard_after_many_readings() {
        let session = inert_session();
        let (display_tx, display_rx) = mpsc::channel(8);
        let (_quit_tx, quit_rx) = oneshot::channel();
        let (interrupt_tx, interrupt_rx) = oneshot::channel::<()>();

        // The interrupt can only fire once, so it must be the same future on every pass
        let interrupt = async move {
            let _ = interrupt_rx.await;
            Ok::<_, std::io::Error>(())
        };
        let task = tokio::spawn(async move {
            show_readings(&session, display_rx, quit_rx, interrupt).await
        });

        for heart_rate in 72..=82 {
            for update in DisplayUpdate::for_reading(&VitalReading::new(heart_rate, 97)) {
                display_tx.send(update).await.unwrap();
            }
        }

        interrupt_tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn interrupt_failure_is_returned() {
        let session = inert_session();
        let (_display_tx, display_rx) = mpsc::channel(8);
        let (_quit_tx, quit_rx) = oneshot::channel();

        let interrupt = async { Err::<(), _>(std::io::Error::other("no signal handler")) };
        let result = show_readings(&session, display_rx, quit_rx, interrupt).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn quit_ends_after_display_closes() {
        let session = inert_session();
        let (display_tx, display_rx) = mpsc::channel(8);
        let (quit_tx, quit_rx) = oneshot::channel();
        drop(display_tx);

        let task = tokio::spawn(async move {
            show_readings(&session, display_rx, quit_rx, std::future::pending::<Result<(), std::io::Error>>()).await
        });

        quit_tx.send(()).unwrap();

        let result = tokio::time::timeout(Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
