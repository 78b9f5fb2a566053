//! Interactive shell over the same operations the direct CLI exposes
//!
//! Commands live in per-namespace tables, each entry tagged with its kind;
//! one dispatcher interprets the kinds. A category command (`init`,
//! `inject`) doubles as a runnable command: bare it opens its namespace,
//! with arguments it runs. Handler errors are reported at the dispatch
//! boundary and the loop continues; only `exit` (or end of input) leaves
//! the shell.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use console::{style, Emoji};

use crate::commands::{
    AddModuleCommand, ExportCommand, ExtractRulesCommand, InitCommand, InitConfigCommand,
    InjectCommand, ListCommand, ListKind, ProcessCommand, UpdateRulesCommand,
};

static SUCCESS: Emoji = Emoji("✓", "√");
static FAILURE: Emoji = Emoji("✗", "x");
static WARNING: Emoji = Emoji("⚠", "!");

/// Where the session currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    Root,
    Init,
    Inject,
}

impl Namespace {
    const fn label(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Init => "init",
            Self::Inject => "inject",
        }
    }
}

/// What a table entry does when named.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandKind {
    /// Opens a namespace when bare; runs as a command when given arguments.
    Category(Namespace),
    /// Runs a command.
    Action,
    /// Pops back to the parent namespace.
    Nav,
    /// Prints the current namespace's table.
    Help,
    /// Leaves the shell.
    Exit,
}

struct CommandSpec {
    name: &'static str,
    kind: CommandKind,
    usage: &'static str,
    description: &'static str,
}

const ROOT_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "init",
        kind: CommandKind::Category(Namespace::Init),
        usage: "init [target-dir]",
        description: "stage 1: collect the stack and stage the plan",
    },
    CommandSpec {
        name: "inject",
        kind: CommandKind::Category(Namespace::Inject),
        usage: "inject <dir> [module]",
        description: "render a module's rules into a project",
    },
    CommandSpec {
        name: "add-module",
        kind: CommandKind::Action,
        usage: "add-module",
        description: "scaffold a new module in the template library",
    },
    CommandSpec {
        name: "extract-rules",
        kind: CommandKind::Action,
        usage: "extract-rules [dir]",
        description: "copy generalizable rules back into the library",
    },
    CommandSpec {
        name: "init-config",
        kind: CommandKind::Action,
        usage: "init-config [dir]",
        description: "write project.json for an existing project",
    },
    CommandSpec {
        name: "update-rules",
        kind: CommandKind::Action,
        usage: "update-rules [dir]",
        description: "regenerate the technology rule set",
    },
    CommandSpec {
        name: "list",
        kind: CommandKind::Action,
        usage: "list [kind]",
        description: "show the catalog and installed modules",
    },
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        usage: "help",
        description: "show this list",
    },
    CommandSpec {
        name: "exit",
        kind: CommandKind::Exit,
        usage: "exit",
        description: "leave the shell",
    },
];

const INIT_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "process",
        kind: CommandKind::Action,
        usage: "process",
        description: "stage 2: render every applicable rule template",
    },
    CommandSpec {
        name: "export",
        kind: CommandKind::Action,
        usage: "export [dir]",
        description: "stage 3: copy the staged tree into the target project",
    },
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        usage: "help",
        description: "show this list",
    },
    CommandSpec {
        name: "back",
        kind: CommandKind::Nav,
        usage: "back",
        description: "return to the root prompt",
    },
];

const INJECT_COMMANDS: &[CommandSpec] = &[
    CommandSpec {
        name: "help",
        kind: CommandKind::Help,
        usage: "help",
        description: "show this list",
    },
    CommandSpec {
        name: "back",
        kind: CommandKind::Nav,
        usage: "back",
        description: "return to the root prompt",
    },
];

const fn table(namespace: Namespace) -> &'static [CommandSpec] {
    match namespace {
        Namespace::Root => ROOT_COMMANDS,
        Namespace::Init => INIT_COMMANDS,
        Namespace::Inject => INJECT_COMMANDS,
    }
}

fn lookup(namespace: Namespace, name: &str) -> Option<&'static CommandSpec> {
    table(namespace).iter().find(|spec| spec.name == name)
}

/// Whether the loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Session context: the navigation path plus the target directory given at
/// launch. Handlers read it; only navigation mutates it.
struct Session {
    path: Vec<Namespace>,
    target_dir: Option<PathBuf>,
}

impl Session {
    const fn new(target_dir: Option<PathBuf>) -> Self {
        Self {
            path: Vec::new(),
            target_dir,
        }
    }

    fn current(&self) -> Namespace {
        self.path.last().copied().unwrap_or(Namespace::Root)
    }

    fn banner(&self) {
        println!(
            "{}",
            style("coldstart - AI-assistant project scaffolding").bold()
        );
        match &self.target_dir {
            Some(dir) => println!("target project: {}", style(dir.display()).cyan()),
            None => {
                println!("{} no target project directory set", WARNING);
                println!("  export, inject, and the rule commands need one;");
                println!("  pass it with the command or launch as `coldstart <project-dir>`");
            }
        }
        println!(
            "type {} for commands, {} to leave",
            style("help").cyan(),
            style("exit").cyan()
        );
        println!();
    }

    fn prompt(&self) -> io::Result<()> {
        let label = self.current().label();
        print!("{} > ", style(format!("[{label}]")).cyan().bold());
        io::stdout().flush()
    }

    fn dispatch(&mut self, name: &str, args: &[&str]) -> Flow {
        let Some(spec) = lookup(self.current(), name) else {
            println!(
                "{} unknown command `{name}`; type {} for the list",
                FAILURE,
                style("help").cyan()
            );
            return Flow::Continue;
        };
        match spec.kind {
            CommandKind::Category(namespace) => {
                if args.is_empty() {
                    self.enter(namespace);
                } else if let Some(sub) = lookup(namespace, args[0]) {
                    // A category phrase naming a namespaced command runs it
                    // from here (`init process`, `init export <dir>`).
                    match sub.kind {
                        CommandKind::Action => self.report(namespace, args[0], &args[1..]),
                        CommandKind::Help => self.help(namespace),
                        _ => Self::reject_subword(name, args[0]),
                    }
                } else if matches!(args[0], "back" | "exit") {
                    // Navigation words never double as a target directory.
                    Self::reject_subword(name, args[0]);
                } else {
                    self.report(self.current(), name, args);
                }
            }
            CommandKind::Action => self.report(self.current(), name, args),
            CommandKind::Help => self.help(self.current()),
            CommandKind::Nav => self.back(),
            CommandKind::Exit => return Flow::Quit,
        }
        Flow::Continue
    }

    fn reject_subword(category: &str, word: &str) {
        println!(
            "{} `{category} {word}` is not a command; type {} for the list",
            FAILURE,
            style("help").cyan()
        );
    }

    fn enter(&mut self, namespace: Namespace) {
        self.path.push(namespace);
        println!(
            "{} entered the {} namespace",
            SUCCESS,
            style(namespace.label()).cyan()
        );
        println!(
            "  type {} for commands, {} to go back up",
            style("help").cyan(),
            style("back").cyan()
        );
    }

    fn back(&mut self) {
        self.path.pop();
        println!("{} back at the root prompt", SUCCESS);
    }

    fn help(&self, namespace: Namespace) {
        match namespace {
            Namespace::Root => println!("{}", style("Available commands:").bold()),
            _ => println!(
                "{} {}",
                style("Namespace:").bold(),
                style(namespace.label()).cyan()
            ),
        }
        println!();
        for spec in table(namespace) {
            println!(
                "  {} {}",
                style(format!("{:<22}", spec.usage)).cyan(),
                spec.description
            );
        }
        if namespace == Namespace::Inject {
            println!();
            println!(
                "  run {} from the root prompt to inject a module",
                style("inject <target-dir>").cyan()
            );
        }
    }

    /// Runs a handler and reports its error without leaving the loop.
    fn report(&self, namespace: Namespace, name: &str, args: &[&str]) {
        if let Err(err) = self.invoke(namespace, name, args) {
            eprintln!("{} {err:#}", style(format!("{FAILURE} command failed:")).red().bold());
        }
    }

    /// Maps a resolved table entry to its command, applying the session
    /// target-directory fallback.
    fn invoke(&self, namespace: Namespace, name: &str, args: &[&str]) -> Result<()> {
        match (namespace, name) {
            (Namespace::Root, "init") => {
                let target = args
                    .first()
                    .copied()
                    .map(PathBuf::from)
                    .or_else(|| self.target_dir.clone());
                InitCommand::new(target).execute()
            }
            (Namespace::Root, "inject") => {
                let Some(target) = self.target(args.first().copied()) else {
                    return Ok(());
                };
                InjectCommand::new(target, args.get(1).map(ToString::to_string)).execute()
            }
            (Namespace::Root, "add-module") => AddModuleCommand::execute(),
            (Namespace::Root, "extract-rules") => {
                let Some(target) = self.target(args.first().copied()) else {
                    return Ok(());
                };
                ExtractRulesCommand::new(target).execute()
            }
            (Namespace::Root, "init-config") => {
                let Some(target) = self.target(args.first().copied()) else {
                    return Ok(());
                };
                InitConfigCommand::new(target).execute()
            }
            (Namespace::Root, "update-rules") => {
                let Some(target) = self.target(args.first().copied()) else {
                    return Ok(());
                };
                UpdateRulesCommand::new(target).execute()
            }
            (Namespace::Root, "list") => {
                let kind = args.first().map(|raw| ListKind::parse(raw)).transpose()?;
                ListCommand::new(kind).execute()
            }
            (Namespace::Init, "process") => ProcessCommand::execute(),
            (Namespace::Init, "export") => {
                let Some(target) = self.target(args.first().copied()) else {
                    return Ok(());
                };
                ExportCommand::new(target).execute()
            }
            // The tables and this match cover the same names.
            _ => Ok(()),
        }
    }

    /// The explicit argument, else the session target; `None` after
    /// printing the requirement when neither is set.
    fn target(&self, arg: Option<&str>) -> Option<PathBuf> {
        arg.map(PathBuf::from)
            .or_else(|| self.target_dir.clone())
            .or_else(|| {
                println!("{} a target project directory is required", FAILURE);
                println!(
                    "  pass it with the command or launch the shell as {}",
                    style("coldstart <project-dir>").cyan()
                );
                None
            })
    }
}

/// Runs the interactive shell until `exit` or end of input.
///
/// # Errors
///
/// Returns an error only when stdin/stdout themselves fail; command errors
/// are reported inline and keep the loop alive.
pub fn run(target_dir: Option<PathBuf>) -> Result<()> {
    let mut session = Session::new(target_dir);
    session.banner();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        session.prompt().context("Failed to write the prompt")?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("Failed to read input")?;
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            continue;
        };
        let name = first.to_lowercase();
        let args: Vec<&str> = words.collect();
        match session.dispatch(&name, &args) {
            Flow::Continue => println!(),
            Flow::Quit => break,
        }
    }
    println!("{}", style("Bye!").bold());
    Ok(())
}
