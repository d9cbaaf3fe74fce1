/*!
 * AMX CLI - Command Line Interface
 *
 * Browses a tree of management beans through `AmxClient` proxies. Beans are
 * served by an in-memory connection loaded from a JSON snapshot.
 */

use amx::{
    browse::{attribute_table, info_table, meta_table, parse_value, render_tree, walk_tree},
    cli_style::{print_error, print_info, print_success, print_warning},
    config::{ClientConfig, LogLevel},
    error::{AmxError, Result, EXIT_SUCCESS},
    logging, snapshot, AmxClient, AmxMBean, MBeanConnection, ObjectName,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "amx")]
#[command(version, about = "Browse and manage trees of management beans", long_about = None)]
struct Cli {
    /// Configuration file (default: <config dir>/amx/config.toml)
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// JSON snapshot of beans to serve
    #[arg(short = 's', long = "snapshot", value_name = "FILE", global = true)]
    snapshot: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_enum, global = true)]
    log_level: Option<LogLevelArg>,

    /// Log file (JSON lines)
    #[arg(long = "log-file", value_name = "FILE", global = true)]
    log_file: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bean tree below a root bean
    Tree {
        /// Root object name (default from config)
        #[arg(long)]
        root: Option<String>,

        /// Maximum depth to descend
        #[arg(long)]
        depth: Option<usize>,
    },

    /// Show attributes of a bean (all of them when none are named)
    Get {
        /// Object name of the bean
        name: String,

        /// Attribute names
        attributes: Vec<String>,
    },

    /// Set one attribute
    Set {
        /// Object name of the bean
        name: String,

        /// Attribute name
        attribute: String,

        /// New value (JSON, e.g. 42, "text", true, {"object_name": "amx:type=x"})
        value: String,
    },

    /// Show descriptor metadata of a bean
    Meta {
        /// Object name of the bean
        name: String,
    },

    /// Show attributes and operations a bean declares
    Info {
        /// Object name of the bean
        name: String,
    },

    /// Invoke an operation
    Invoke {
        /// Object name of the bean
        name: String,

        /// Operation name
        operation: String,

        /// Parameters (JSON)
        params: Vec<String>,

        /// Parameter type names, comma separated
        #[arg(long, value_delimiter = ',')]
        signature: Vec<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

fn main() {
    let code = match run() {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            let hint = matches!(e, AmxError::NoConnection)
                .then_some("amx --snapshot beans.json tree");
            print_error(&e.to_string(), hint);
            e.exit_code()
        }
    };
    std::process::exit(code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => ClientConfig::from_file(path)?,
        None => ClientConfig::load_default().unwrap_or_else(|e| {
            print_warning(&format!("Failed to load config file: {}", e));
            ClientConfig::default()
        }),
    };
    apply_overrides(&mut config, &cli);

    logging::init_logging(&config)?;

    let snapshot_path = config.snapshot.clone().ok_or(AmxError::NoConnection)?;
    let server = snapshot::load_server(&snapshot_path)?;
    let connection: Arc<dyn MBeanConnection> = Arc::new(server);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute(cli.command, connection, &config))
}

/// Command-line flags win over config file values
fn apply_overrides(config: &mut ClientConfig, cli: &Cli) {
    if let Some(ref snapshot) = cli.snapshot {
        config.snapshot = Some(snapshot.clone());
    }
    if let Some(level) = cli.log_level {
        config.log_level = level.into();
    }
    if let Some(ref log_file) = cli.log_file {
        config.log_file = Some(log_file.clone());
    }
    if cli.verbose {
        config.verbose = true;
    }
}

async fn execute(
    command: Commands,
    connection: Arc<dyn MBeanConnection>,
    config: &ClientConfig,
) -> Result<()> {
    let proxy = |name: &str| -> Result<AmxClient> {
        let object_name: ObjectName = name.parse()?;
        Ok(AmxClient::new(connection.clone(), object_name))
    };

    match command {
        Commands::Tree { root, depth } => {
            let root = proxy(root.as_deref().unwrap_or(config.root.as_str()))?;
            let depth = depth.unwrap_or(config.max_depth);
            info!("Walking {} (max depth {})", root, depth);

            let entries = walk_tree(&root, depth).await?;
            println!("{}", render_tree(&entries));
        }

        Commands::Get { name, attributes } => {
            let bean = proxy(&name)?;
            let names = if attributes.is_empty() {
                bean.mbean_info()
                    .await?
                    .attributes
                    .into_iter()
                    .filter(|a| a.readable)
                    .map(|a| a.name)
                    .collect()
            } else {
                attributes
            };

            let values = bean.get_attributes(&names).await?;
            if values.len() < names.len() {
                print_warning(&format!(
                    "{} of {} attributes could not be read",
                    names.len() - values.len(),
                    names.len()
                ));
            }
            println!("{}", attribute_table(&values));
        }

        Commands::Set {
            name,
            attribute,
            value,
        } => {
            let bean = proxy(&name)?;
            let value = parse_value(&value)?;
            bean.set_attribute(&attribute, value).await?;
            let current = bean.get_attribute(&attribute).await?;
            print_success(&format!("{}.{} = {}", name, attribute, current));
        }

        Commands::Meta { name } => {
            let meta = proxy(&name)?.meta().await?;
            if meta.is_empty() {
                print_info("No descriptor fields");
            } else {
                println!("{}", meta_table(&meta));
            }
        }

        Commands::Info { name } => {
            let info = proxy(&name)?.mbean_info().await?;
            print_info(&format!("{} ({})", name, info.class_name));
            if !info.description.is_empty() {
                println!("{}", info.description);
            }
            println!("{}", info_table(&info));
        }

        Commands::Invoke {
            name,
            operation,
            params,
            signature,
        } => {
            let params = params
                .iter()
                .map(String::as_str)
                .map(parse_value)
                .collect::<Result<Vec<_>>>()?;
            let result = proxy(&name)?.invoke(&operation, params, signature).await?;
            println!("{}", result);
        }
    }

    Ok(())
}
