mod cli;
mod command;

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use async_channel::{Receiver, Sender, TryRecvError};
use clap::Parser;
use ssr_api::{Error, Result, SceneEvent};
use ssr_core::SystemClock;
use ssr_rpc::transport::TcpTransport;
use ssr_rpc::RequestSink;
use ssr_scene::SharedScene;
use ssr_view::{Controller, DrawList, Gesture, TickReport};
use tracing_error::SpanTrace;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::cli::Args;
use crate::command::Command;

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let span = tracing::info_span!("session", address = %args.address);
    let _guard = span.enter();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("remote stopped: {}", failure_report(&error));
            ExitCode::FAILURE
        }
    }
}

/// The error together with the spans that were active when it surfaced.
fn failure_report(error: &Error) -> String {
    let trace = SpanTrace::capture();
    format!("{error}\n{trace}")
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_thread_names(true))
        .with(tracing_error::ErrorLayer::default())
        .init();
}

fn run(args: &Args) -> Result<()> {
    let transport = TcpTransport::connect(&args.address)?;
    let scene = SharedScene::new();
    let handle = ssr_sync::spawn(transport, scene.clone())?;

    let clock = Arc::new(SystemClock::new());
    let mut controller = Controller::new(args.view_config(), scene, handle.requests.clone(), clock);
    controller.resize(args.size());

    let commands = spawn_stdin()?;
    let tick = Duration::from_millis(args.tick_ms.max(1));

    let result = 'outer: loop {
        loop {
            match handle.events.try_recv() {
                Ok(event) => {
                    controller.on_scene_event(&event);
                    match event {
                        SceneEvent::Ready => {}
                        SceneEvent::Disconnected => break 'outer Ok(()),
                        SceneEvent::Error { message } => break 'outer Err(Error::Io { message }),
                    }
                }
                Err(TryRecvError::Empty) => break,
                // the synchronizer always says goodbye before dropping its sender
                Err(TryRecvError::Closed) => break 'outer Ok(()),
            }
        }

        loop {
            match commands.try_recv() {
                Ok(Command::Quit) | Err(TryRecvError::Closed) => break 'outer Ok(()),
                Ok(command) => {
                    if let Err(error) = execute(&mut controller, command) {
                        tracing::warn!(%error, ?command, "command failed");
                    }
                }
                Err(TryRecvError::Empty) => break,
            }
        }

        let report = controller.tick();
        log_report(&report);

        thread::sleep(tick);
    };

    handle.shutdown();
    result
}

fn execute<S: RequestSink>(controller: &mut Controller<S>, command: Command) -> Result<()> {
    match command {
        Command::Play => controller.play(),
        Command::Pause => controller.pause(),
        Command::Rewind => controller.rewind(),
        Command::Volume(db) => controller.set_volume(db),
        Command::Head(azimuth) => controller.set_head_azimuth(azimuth),
        Command::ZoomIn => {
            controller.zoom_in();
            Ok(())
        }
        Command::ZoomOut => {
            controller.zoom_out();
            Ok(())
        }
        Command::Fit => {
            controller.fit_to_scene();
            Ok(())
        }
        Command::Orientation(orientation) => {
            if !controller.set_orientation(orientation) {
                tracing::info!(?orientation, "already in this orientation");
            }
            Ok(())
        }
        Command::Tap(position) => controller.on_gesture(Gesture::Tap { position }),
        Command::DoubleTap(position) => controller.on_gesture(Gesture::DoubleTap { position }),
        Command::Drag { from, to } => {
            controller.on_gesture(Gesture::Down { position: from })?;
            controller.on_gesture(Gesture::Drag {
                first: from,
                current: to,
            })
        }
        Command::Fling(velocity) => controller.on_gesture(Gesture::Fling { velocity }),
        Command::Show => {
            let report = controller.tick();
            log_report(&report);
            print_draw_list(&report.draw_list);
            Ok(())
        }
        Command::Quit => Ok(()),
    }
}

fn spawn_stdin() -> Result<Receiver<Command>> {
    let (sender, receiver) = async_channel::unbounded();
    thread::Builder::new()
        .name("ssr-stdin".into())
        .spawn(move || read_commands(sender))?;
    Ok(receiver)
}

fn read_commands(sender: Sender<Command>) {
    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(error) => {
                tracing::warn!(%error, "failed to read stdin");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if sender.send_blocking(command).is_err() {
                    return;
                }
            }
            Err(error) => tracing::warn!(%error, "ignoring input"),
        }
    }

    let _ = sender.send_blocking(Command::Quit);
}

fn log_report(report: &TickReport) {
    if let Some(volume) = report.volume {
        tracing::info!(volume, "scene volume");
    }

    if let Some(transport) = report.transport {
        tracing::info!(?transport, "transport state");
    }
}

fn print_draw_list(list: &DrawList) {
    if let Some(reference) = &list.reference {
        println!(
            "reference   at ({:7.1}, {:7.1}) heading {:6.1}",
            reference.position.x, reference.position.y, reference.heading
        );
    }

    for source in &list.sources {
        let mut flags = String::new();
        if source.selected {
            flags.push_str(" selected");
        }
        if source.muted {
            flags.push_str(" muted");
        }
        if source.fixed {
            flags.push_str(" fixed");
        }
        if source.clipping {
            flags.push_str(" clipping");
        }

        println!(
            "source {:>4} at ({:7.1}, {:7.1}) {:?} level {:4.2} {}{}",
            source.id,
            source.position.x,
            source.position.y,
            source.model,
            source.level,
            source.name,
            flags,
        );
    }

    for speaker in &list.loudspeakers {
        println!(
            "speaker     at ({:7.1}, {:7.1}) {:?}",
            speaker.position.x, speaker.position.y, speaker.model
        );
    }

    if let Some(scale) = &list.size_scale {
        println!("scale {} = {:.0}px", scale.label(), scale.pixels);
    }
}

#[cfg(test)]
mod tests {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::layer::SubscriberExt;

    use super::*;

    #[test]
    fn failure_report_names_active_spans() {
        let subscriber = tracing_subscriber::registry().with(ErrorLayer::default());

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("session", address = "localhost:4711");
            let _guard = span.enter();

            let report = failure_report(&Error::Disconnected);
            assert!(report.starts_with("disconnected\n"));
            assert!(report.contains("session"));
        });
    }
}
