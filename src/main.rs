// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Svcgraph and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Svcgraph CLI entrypoint.
//!
//! By default this serves the editor's MCP tools over stdio. The remaining commands work on the
//! diagram store directly.

use std::error::Error;
use std::sync::Arc;

use svcgraph::model::DiagramId;
use svcgraph::store::{DiagramFolder, WriteDurability};
use svcgraph::sync::Workspace;

const DEFAULT_STORE_DIR: &str = "./.svcgraph";

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [--store <dir>] [--durable-writes] [mcp]\n  {program} [--store <dir>] list\n  {program} [--store <dir>] export [<file>]\n  {program} [--store <dir>] [--durable-writes] import <file>\n  {program} [--store <dir>] delete <diagram-id>\n  {program} [--store <dir>] [--durable-writes] rename <diagram-id> <name>\n\n`mcp` (the default) serves MCP over stdio.\nexport writes to stdout when <file> is omitted.\n\nIf --store is omitted, {DEFAULT_STORE_DIR} is used.\n\n--durable-writes opts into slower, best-effort durable persistence (fsync/sync where supported).\nLog verbosity follows RUST_LOG (default: info); logs go to stderr."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
enum Command {
    #[default]
    Mcp,
    List,
    Export {
        file: Option<String>,
    },
    Import {
        file: String,
    },
    Delete {
        diagram_id: String,
    },
    Rename {
        diagram_id: String,
        name: String,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    store_dir: Option<String>,
    durable_writes: bool,
    command: Command,
}

fn parse_command(mut positionals: std::vec::IntoIter<String>) -> Result<Command, ()> {
    let Some(name) = positionals.next() else {
        return Ok(Command::Mcp);
    };

    let command = match name.as_str() {
        "mcp" => Command::Mcp,
        "list" => Command::List,
        "export" => Command::Export {
            file: positionals.next(),
        },
        "import" => Command::Import {
            file: positionals.next().ok_or(())?,
        },
        "delete" => Command::Delete {
            diagram_id: positionals.next().ok_or(())?,
        },
        "rename" => Command::Rename {
            diagram_id: positionals.next().ok_or(())?,
            name: positionals.next().ok_or(())?,
        },
        _ => return Err(()),
    };

    if positionals.next().is_some() {
        return Err(());
    }
    Ok(command)
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut positionals = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--store" => {
                if options.store_dir.is_some() {
                    return Err(());
                }
                let dir = args.next().ok_or(())?;
                options.store_dir = Some(dir);
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with('-') => return Err(()),
            _ => positionals.push(arg),
        }
    }

    options.command = parse_command(positionals.into_iter())?;
    Ok(options)
}

async fn run(options: CliOptions) -> Result<(), Box<dyn Error>> {
    let dir = options.store_dir.unwrap_or_else(|| DEFAULT_STORE_DIR.to_owned());
    let folder = if options.durable_writes {
        DiagramFolder::new(dir).with_durability(WriteDurability::Durable)
    } else {
        DiagramFolder::new(dir)
    };
    let mut workspace = Workspace::open(Arc::new(folder)).await?;

    match options.command {
        Command::Mcp => {
            svcgraph::mcp::SvcgraphMcp::new(workspace).serve_stdio().await?;
        }
        Command::List => {
            for summary in workspace.listing() {
                println!(
                    "{}\t{}\trev {}\t{} services, {} connections\t{}",
                    summary.diagram_id,
                    summary.name,
                    summary.rev,
                    summary.services,
                    summary.connections,
                    svcgraph::format::format_timestamp(&summary.updated_at),
                );
            }
        }
        Command::Export { file } => {
            let document = workspace.export_all().await?;
            match file {
                Some(file) => std::fs::write(file, document)?,
                None => println!("{document}"),
            }
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(file)?;
            let report = workspace.import_bundle(&text).await?;
            for summary in &report.imported {
                println!("imported {}\t{}", summary.diagram_id, summary.name);
            }
            for name in &report.skipped {
                println!("skipped {name} (name already exists)");
            }
            for rejected in &report.rejected {
                eprintln!("svcgraph: rejected diagram #{}: {}", rejected.index, rejected.reason);
            }
        }
        Command::Delete { diagram_id } => {
            let diagram_id = DiagramId::new(diagram_id)?;
            workspace.delete_diagram(&diagram_id).await?;
            println!("deleted {diagram_id}");
        }
        Command::Rename { diagram_id, name } => {
            let diagram_id = DiagramId::new(diagram_id)?;
            if workspace.rename_diagram(&diagram_id, &name).await? {
                println!("renamed {diagram_id}");
            } else {
                eprintln!("svcgraph: no diagram {diagram_id}, nothing renamed");
            }
        }
    }

    Ok(())
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "svcgraph".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };

        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .target(env_logger::Target::Stderr)
            .init();

        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        runtime.block_on(run(options))?;
        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("svcgraph: {err}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_options, CliOptions, Command};

    fn parse(args: &[&str]) -> Result<CliOptions, ()> {
        parse_options(args.iter().map(|arg| (*arg).to_owned()))
    }

    #[test]
    fn parses_empty_args() {
        let options = parse(&[]).expect("parse options");
        assert_eq!(options, CliOptions::default());
        assert_eq!(options.command, Command::Mcp);
    }

    #[test]
    fn parses_store_and_durability_around_the_command() {
        let options =
            parse(&["list", "--store", "some/dir", "--durable-writes"]).expect("parse options");
        assert_eq!(options.store_dir.as_deref(), Some("some/dir"));
        assert!(options.durable_writes);
        assert_eq!(options.command, Command::List);
    }

    #[test]
    fn parses_export_with_and_without_file() {
        assert_eq!(
            parse(&["export"]).expect("parse options").command,
            Command::Export { file: None }
        );
        assert_eq!(
            parse(&["export", "out.json"]).expect("parse options").command,
            Command::Export {
                file: Some("out.json".to_owned())
            }
        );
    }

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            parse(&["import", "in.json"]).expect("parse options").command,
            Command::Import {
                file: "in.json".to_owned()
            }
        );
        assert_eq!(
            parse(&["delete", "diagram-1"]).expect("parse options").command,
            Command::Delete {
                diagram_id: "diagram-1".to_owned()
            }
        );
        assert_eq!(
            parse(&["rename", "diagram-1", "Staging"]).expect("parse options").command,
            Command::Rename {
                diagram_id: "diagram-1".to_owned(),
                name: "Staging".to_owned()
            }
        );
    }

    #[test]
    fn rejects_missing_command_arguments() {
        parse(&["import"]).unwrap_err();
        parse(&["delete"]).unwrap_err();
        parse(&["rename", "diagram-1"]).unwrap_err();
    }

    #[test]
    fn rejects_unknown_commands_and_flags() {
        parse(&["frobnicate"]).unwrap_err();
        parse(&["--nope"]).unwrap_err();
        parse(&["list", "extra"]).unwrap_err();
    }

    #[test]
    fn rejects_duplicate_flags() {
        parse(&["--durable-writes", "--durable-writes"]).unwrap_err();
        parse(&["--store", ".", "--store", "other"]).unwrap_err();
    }

    #[test]
    fn rejects_missing_store_value() {
        parse(&["--store"]).unwrap_err();
    }
}
