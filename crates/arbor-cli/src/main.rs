use arbor::render::{HeadlessError, Rendered, render_document};
use arbor::{Config, Document};
use serde::Serialize;
use std::io::Read;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_ENV: &str = "ARBOR_LOG";

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Arbor(HeadlessError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Arbor(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Arbor(value)
    }
}

impl From<arbor::Error> for CliError {
    fn from(value: arbor::Error) -> Self {
        Self::Arbor(value.into())
    }
}

impl From<arbor::render::RenderError> for CliError {
    fn from(value: arbor::render::RenderError) -> Self {
        Self::Arbor(value.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Command {
    Parse,
    #[default]
    Render,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Html,
    Json,
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    config: Option<String>,
    sets: Vec<(String, serde_json::Value)>,
    out: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderOut<'a> {
    nodes: usize,
    topics: usize,
    warnings: Vec<String>,
    html: &'a str,
}

fn usage() -> &'static str {
    "arbor-cli\n\
\n\
USAGE:\n\
  arbor-cli parse [--pretty] [<path>|-]\n\
  arbor-cli [render] [--format html|json] [--pretty] [--config <path>] [--set <key>=<value>]...\n\
            [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Input is a node tree as JSON, either bare or wrapped as {\"nodeData\": ...}.\n\
  - parse prints the normalized node tree.\n\
  - render prints the assembled HTML by default; --format json prints a summary instead.\n\
  - --config takes a JSON object; recognized keys are draggable, direction, editor.padding,\n\
    topic.paddingX and topic.fontSize.\n\
  - --set overrides one dotted key after --config; the value is read as JSON, else as a string.\n\
  - Set ARBOR_LOG (e.g. ARBOR_LOG=debug) to control log output on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "parse" => args.command = Command::Parse,
            "render" => args.command = Command::Render,
            "--pretty" => args.pretty = true,
            "--format" => {
                let Some(fmt) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--config" => {
                let Some(path) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.config = Some(path.clone());
            }
            "--set" => {
                let Some(assignment) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.sets.push(parse_assignment(assignment)?);
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some("-".to_string());
            }
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn parse_assignment(assignment: &str) -> Result<(String, serde_json::Value), CliError> {
    let Some((key, raw)) = assignment.split_once('=') else {
        return Err(CliError::Usage(usage()));
    };
    let value = serde_json::from_str(raw)
        .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));
    Ok((key.trim().to_string(), value))
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn read_config(
    path: Option<&str>,
    sets: &[(String, serde_json::Value)],
) -> Result<Config, CliError> {
    let mut config = Config::default();
    if let Some(path) = path {
        let text = std::fs::read_to_string(path)?;
        let loaded = Config::from_json(&text)?;
        config.deep_merge(loaded.as_value());
    }
    for (key, value) in sets {
        config.set_value(key, value.clone())?;
    }
    Ok(config)
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    Ok(if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    })
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn summary(
    doc: &Document,
    rendered: &Rendered,
    html: &str,
    pretty: bool,
) -> Result<String, CliError> {
    let out = RenderOut {
        nodes: doc.len(),
        topics: rendered.map.topic_count(),
        warnings: rendered.warnings.iter().map(ToString::to_string).collect(),
        html,
    };
    to_json(&out, pretty)
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let doc = Document::from_json(&text)?;

    match args.command {
        Command::Parse => {
            let tree = doc.to_tree(doc.root());
            let json = to_json(&tree, args.pretty)?;
            write_text(&json, args.out.as_deref())
        }
        Command::Render => {
            let config = read_config(args.config.as_deref(), &args.sets)?;
            let options = arbor::render::MindMapOptions::from_config(&config)?;
            let rendered = render_document(&doc, options)?;
            for warning in &rendered.warnings {
                tracing::warn!(%warning, "render warning");
            }
            let html = rendered.html();
            match args.render_format {
                RenderFormat::Html => write_text(&html, args.out.as_deref()),
                RenderFormat::Json => {
                    let json = summary(&doc, &rendered, &html, args.pretty)?;
                    write_text(&json, args.out.as_deref())
                }
            }
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
