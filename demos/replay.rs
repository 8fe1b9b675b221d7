//! Replay demo: A simulated remote shell streaming into a viewport.
//!
//! Run with: cargo run --example replay [config.toml]
//!
//! Type to send input. Commands: `clear` empties the session's output,
//! `swap` attaches a new session, `replay` replaces the output wholesale.
//! Drag with the mouse to scroll with inertia. Ctrl+Q quits.
//!
//! Set `STREAMVIEW_LOG=/path/to/file` (and `RUST_LOG=debug`) to capture logs.

use crossbeam_channel::{select, tick, unbounded, Receiver, Sender};
use std::fs::File;
use std::path::Path;
use std::thread;
use std::time::Duration;
use streamview::{Engine, EngineConfig, HostMessage, SessionId, TransportEvent, ViewportConfig};

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    if let Ok(path) = std::env::var("STREAMVIEW_LOG") {
        let file = File::create(path)?;
        env_logger::Builder::from_default_env()
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    Ok(())
}

/// The fake remote end: periodic output plus a tiny line editor.
struct Shell {
    out: Sender<TransportEvent>,
    session: u32,
    line: String,
    history: Vec<String>,
    ticks: u64,
}

impl Shell {
    fn new(out: Sender<TransportEvent>) -> Self {
        Self {
            out,
            session: 0,
            line: String::new(),
            history: Vec::new(),
            ticks: 0,
        }
    }

    fn emit(&mut self, data: impl Into<String>) {
        let data = data.into();
        self.history.push(data.clone());
        let _ = self.out.send(TransportEvent::Output(data));
    }

    fn attach(&mut self) {
        self.session += 1;
        self.history.clear();
        let _ = self
            .out
            .send(TransportEvent::Session(SessionId::new(format!("demo-{}", self.session))));
        self.emit(format!(
            "\x1b[1;36mstreamview replay\x1b[0m, session {}\r\n$ ",
            self.session
        ));
    }

    fn tick(&mut self) {
        self.ticks += 1;
        if self.ticks % 4 == 0 {
            self.emit(format!(
                "\r\x1b[2K\x1b[32m[{:>5}]\x1b[0m build step {} finished\r\n$ {}",
                self.ticks,
                self.ticks / 4,
                self.line
            ));
        }
    }

    fn input(&mut self, data: &str) {
        for c in data.chars() {
            match c {
                '\r' => self.run(),
                '\x7f' => {
                    if self.line.pop().is_some() {
                        self.emit("\x08 \x08");
                    }
                }
                c if !c.is_control() => {
                    self.line.push(c);
                    self.emit(c.to_string());
                }
                _ => {}
            }
        }
    }

    fn run(&mut self) {
        let command = std::mem::take(&mut self.line);
        match command.trim() {
            "clear" => {
                self.history.clear();
                let _ = self.out.send(TransportEvent::Replace(Vec::new()));
                self.emit("$ ");
            }
            "swap" => self.attach(),
            "replay" => {
                let history = std::mem::take(&mut self.history);
                self.history = history.clone();
                let _ = self.out.send(TransportEvent::Replace(history));
                self.emit("\r\n(replayed)\r\n$ ");
            }
            "" => self.emit("\r\n$ "),
            other => self.emit(format!("\r\n{other}: command not found\r\n$ ")),
        }
    }

    fn serve(mut self, host: &Receiver<HostMessage>) {
        let ticker = tick(Duration::from_millis(50));
        self.attach();
        loop {
            select! {
                recv(host) -> message => match message {
                    Ok(HostMessage::Input(data)) => self.input(&data),
                    Ok(HostMessage::Resize(grid)) => {
                        log::debug!("shell: resized to {grid:?}");
                    }
                    Err(_) => break,
                },
                recv(ticker) -> _ => self.tick(),
            }
        }
        let _ = self.out.send(TransportEvent::Closed);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    let config = match std::env::args().nth(1) {
        Some(path) => ViewportConfig::load(Path::new(&path))?,
        None => ViewportConfig {
            max_chunks: Some(2000),
            ..ViewportConfig::default()
        },
    };

    let (transport_tx, transport_rx) = unbounded();
    let mut engine = Engine::new(EngineConfig::default(), config)?;
    let host = engine.host_messages().clone();
    let shell = thread::spawn(move || Shell::new(transport_tx).serve(&host));

    let result = engine.run(&transport_rx);
    drop(engine);
    let _ = shell.join();
    result?;
    Ok(())
}
