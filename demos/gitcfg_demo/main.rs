//! # gitcfg demo application
//!
//! A small `git config` look-alike built on gitcfg. It exists to demonstrate
//! and manually verify the crate, not to replace git.
//!
//! ```sh
//! cargo run --example gitcfg_demo -- config list
//! cargo run --example gitcfg_demo -- --workdir . config get core.editor
//! cargo run --example gitcfg_demo -- --workdir /tmp/repo config set user.name Jane
//! cargo run --example gitcfg_demo -- --layout my-layout.toml config --scope global list
//! ```
//!
//! | Feature              | How to exercise it                                                   |
//! |----------------------|----------------------------------------------------------------------|
//! | Scope precedence     | Set a key in `--scope global` and `--scope local`, then `get` it     |
//! | Env scope            | `GIT_CONFIG_COUNT=1 GIT_CONFIG_KEY_0=core.editor GIT_CONFIG_VALUE_0=ed` |
//! | Includes             | Add `[include] path = other.inc` to a config, then `list`            |
//! | Custom layout        | `--layout` with e.g. `name = "myapp"` and `env_prefix = "MYAPP_CONFIG"` |
//! | Presets              | `core.pager` falls back to the compiled-in preset                    |

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use gitcfg::{Config, ConfigArgs, GitcfgError, Layout, Scopes};

/// gitcfg demo: read and write git-style configuration.
#[derive(Parser, Debug)]
#[command(name = "gitcfg-demo")]
struct Cli {
    /// Repository working directory (enables the local and worktree scopes).
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// TOML file overriding file names, env prefix and include policy.
    #[arg(long, global = true)]
    layout: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Inspect or change configuration values.
    Config(ConfigArgs),
}

#[derive(Serialize)]
struct Preset {
    core: CorePreset,
}

#[derive(Serialize)]
struct CorePreset {
    pager: String,
    autocrlf: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), GitcfgError> {
    let layout = match &cli.layout {
        Some(path) => Layout::from_file(path)?,
        None => Layout::defaults()?,
    };

    let preset = Config::from_serialize(&Preset {
        core: CorePreset {
            pager: "less".into(),
            autocrlf: false,
        },
    })
    .unwrap_or_default();

    let mut scopes = Scopes::new(layout).with_preset(preset);
    scopes.load_all(cli.workdir.as_deref())?;

    match cli.command {
        Commands::Config(args) => {
            let result = scopes.handle(&args.into_action())?;
            println!("{result}");
        }
    }
    Ok(())
}
