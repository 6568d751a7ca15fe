use std::sync::Arc;
use tracing::{Level, span};

/// Severity of a message written to the host console.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ConsoleLevel {
    Error,
    Warning,
    Info,
    Trace,
}

/// Log output of the browsing UI (e.g. the browser's console).
pub trait HostConsole: Send + Sync {
    fn log(&self, level: ConsoleLevel, plugin: &str, message: &str);
}

/// A [tracing::Subscriber] which writes to a [HostConsole].
///
/// **Note**: only events are supported, spans are not. Hint: just use [tracing::debug],
/// [tracing::info], [tracing::warn], and [tracing::error].
pub struct HostLogger {
    pub console: Arc<dyn HostConsole>,
    /// Plugin name
    pub plugin_name: &'static str,
    /// Force [Level::INFO] to be interpreted as [ConsoleLevel::Warning]
    pub verbose: bool,
}

impl tracing::Subscriber for HostLogger {
    fn enabled(&self, _: &tracing::Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _: &span::Attributes<'_>) -> span::Id {
        span::Id::from_u64(1)
    }

    fn record(&self, _: &span::Id, _: &span::Record<'_>) {}

    fn record_follows_from(&self, _: &span::Id, _: &span::Id) {}

    fn event(&self, event: &tracing::Event<'_>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);
        let level = to_console_level(event.metadata().level(), self.verbose);
        self.console
            .log(level, self.plugin_name, &String::from(visitor));
    }

    fn enter(&self, _: &span::Id) {}

    fn exit(&self, _: &span::Id) {}
}

/// Set a [HostLogger] as the global default subscriber.
///
/// Installing twice is not an error: the first logger stays in place.
pub fn install_logger(console: Arc<dyn HostConsole>, plugin_name: &'static str, verbose: bool) {
    let logger = HostLogger {
        console,
        plugin_name,
        verbose,
    };
    if let Err(e) = tracing::subscriber::set_global_default(logger)
        && !e.to_string().contains("has already been set")
    {
        eprintln!("Failed to initialize logging: {e}");
    }
}

fn to_console_level(level: &Level, verbose: bool) -> ConsoleLevel {
    if *level == Level::ERROR {
        ConsoleLevel::Error
    } else if *level == Level::WARN || (*level == Level::INFO && verbose) {
        ConsoleLevel::Warning
    } else if *level == Level::INFO {
        ConsoleLevel::Info
    } else {
        ConsoleLevel::Trace
    }
}

#[derive(Default)]
struct FieldVisitor {
    data: Vec<String>,
    message: Option<String>,
}

impl From<FieldVisitor> for String {
    fn from(value: FieldVisitor) -> String {
        let data = value.data.join(" ");
        match value.message {
            Some(message) if data.is_empty() => message,
            Some(message) => format!("{data} {message}"),
            None => data,
        }
    }
}

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message.replace(format!("{value:?}"));
        } else {
            let s = format!("{}={value:?}", field.name());
            self.data.push(s);
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        let s = format!("{}=\"{}\"", field.name(), value.replace('"', "\\\""));
        self.data.push(s);
    }
}
