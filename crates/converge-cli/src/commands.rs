use std::path::Path;
use std::process::ExitCode;

use anyhow::{bail, Context};
use colored::Colorize;
use converge_store::{Fingerprint, MemDoc, MemNode, Mutation};
use converge_sync::{classify_plain, equals, Reconciler, SyncStats};
use converge_types::ManagedValue;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cli::*;
use crate::config::{CliConfig, RootKind};

pub fn run_command(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut config = CliConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    if !config.output.color {
        colored::control::set_override(false);
    }
    match cli.command {
        Command::Sync(args) => cmd_sync(args, &config),
        Command::Equals(args) => cmd_equals(args, &config),
        Command::Fingerprint(args) => cmd_fingerprint(args, &config),
    }
}

#[derive(Debug, Serialize)]
struct SyncOutcome {
    changed: bool,
    stats: SyncStats,
    mutations: Vec<Mutation>,
    fingerprint: Fingerprint,
    #[serde(skip)]
    result: Value,
}

#[derive(Debug, Serialize)]
struct EqualsOutcome {
    equal: bool,
    current: Fingerprint,
    target: Fingerprint,
}

#[derive(Debug, Serialize)]
struct FingerprintOutcome {
    file: String,
    fingerprint: Fingerprint,
}

fn cmd_sync(args: SyncArgs, config: &CliConfig) -> anyhow::Result<ExitCode> {
    let outcome = sync_files(&args, config)?;
    if args.write {
        write_json(&args.current, &outcome.result, config.output.pretty)?;
    }

    match config.output.format {
        OutputFormat::Json => print_json(&outcome, config.output.pretty)?,
        OutputFormat::Text => {
            if outcome.changed {
                println!(
                    "{} Converged with {} mutation(s) across {} container(s)",
                    "✓".green().bold(),
                    outcome.mutations.len().to_string().bold(),
                    outcome.stats.containers
                );
            } else {
                println!("{} Already in sync.", "✓".green().bold());
            }
            for mutation in &outcome.mutations {
                println!("  {}", colorize(mutation));
            }
            println!("  Fingerprint: {}", outcome.fingerprint.short_hex().cyan());
            if args.write {
                println!("  Wrote {}", args.current.display().to_string().bold());
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_equals(args: EqualsArgs, config: &CliConfig) -> anyhow::Result<ExitCode> {
    let outcome = equals_files(&args, config)?;
    match config.output.format {
        OutputFormat::Json => print_json(&outcome, config.output.pretty)?,
        OutputFormat::Text if outcome.equal => {
            println!("{} Equal ({})", "✓".green().bold(), outcome.current.short_hex().cyan());
        }
        OutputFormat::Text => {
            println!(
                "{} Different ({} vs {})",
                "✗".red().bold(),
                outcome.current.short_hex().cyan(),
                outcome.target.short_hex().cyan()
            );
        }
    }
    Ok(if outcome.equal { ExitCode::SUCCESS } else { ExitCode::from(1) })
}

fn cmd_fingerprint(args: FingerprintArgs, config: &CliConfig) -> anyhow::Result<ExitCode> {
    let value = read_json(&args.file)?;
    let outcome = FingerprintOutcome {
        file: args.file.display().to_string(),
        fingerprint: Fingerprint::of_value(&value),
    };
    match config.output.format {
        OutputFormat::Json => print_json(&outcome, config.output.pretty)?,
        OutputFormat::Text => println!("{}  {}", outcome.fingerprint.to_hex().cyan(), outcome.file),
    }
    Ok(ExitCode::SUCCESS)
}

fn sync_files(args: &SyncArgs, config: &CliConfig) -> anyhow::Result<SyncOutcome> {
    let target = read_json(&args.target)?;
    let current = if args.current.exists() {
        Some(read_json(&args.current)?)
    } else {
        debug!(path = %args.current.display(), "current state missing, starting empty");
        None
    };

    let doc = MemDoc::new();
    let root = new_root(&doc, config.root, current.as_ref().unwrap_or(&target))?;
    if let Some(current) = &current {
        Reconciler::new()
            .run(&root, current)
            .with_context(|| format!("loading {}", args.current.display()))?;
        doc.clear_journal();
    }

    let report = Reconciler::new()
        .run(&root, &target)
        .with_context(|| format!("reconciling onto {}", args.target.display()))?;

    Ok(SyncOutcome {
        changed: report.changed,
        stats: report.stats,
        mutations: doc.mutations(),
        fingerprint: Fingerprint::of_node(&root),
        result: root.to_json(),
    })
}

fn equals_files(args: &EqualsArgs, config: &CliConfig) -> anyhow::Result<EqualsOutcome> {
    let current = read_json(&args.current)?;
    let target = read_json(&args.target)?;

    let managed = match (config.root, &current) {
        (RootKind::Auto, Value::Object(_) | Value::Array(_))
        | (RootKind::Map | RootKind::Sequence, _) => {
            let doc = MemDoc::new();
            let root = new_root(&doc, config.root, &current)?;
            Reconciler::new()
                .run(&root, &current)
                .with_context(|| format!("loading {}", args.current.display()))?;
            ManagedValue::Node(root)
        }
        (RootKind::Auto, primitive) => ManagedValue::Scalar(primitive.clone()),
    };

    Ok(EqualsOutcome {
        equal: equals(Some(&managed), Some(&target)),
        current: Fingerprint::of_value(&current),
        target: Fingerprint::of_value(&target),
    })
}

fn new_root(doc: &MemDoc, kind: RootKind, shape: &Value) -> anyhow::Result<MemNode> {
    match (kind, shape) {
        (RootKind::Map, _) | (RootKind::Auto, Value::Object(_)) => Ok(doc.new_map()),
        (RootKind::Sequence, _) | (RootKind::Auto, Value::Array(_)) => Ok(doc.new_sequence()),
        (RootKind::Auto, other) => bail!(
            "the managed root must be an object or an array, found {}",
            classify_plain(Some(other))
        ),
    }
}

fn colorize(mutation: &Mutation) -> colored::ColoredString {
    let text = mutation.to_string();
    match mutation {
        Mutation::MapSet { .. } => text.yellow(),
        Mutation::SeqInsert { .. } => text.green(),
        Mutation::MapDelete { .. } | Mutation::SeqDelete { .. } => text.red(),
    }
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn write_json(path: &Path, value: &Value, pretty: bool) -> anyhow::Result<()> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn write(dir: &tempfile::TempDir, name: &str, value: &Value) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, value.to_string()).unwrap();
        path
    }

    fn sync_args(current: PathBuf, target: PathBuf) -> SyncArgs {
        SyncArgs {
            current,
            target,
            write: true,
        }
    }

    #[test]
    fn sync_converges_and_writes_back() {
        let dir = tempfile::tempdir().unwrap();
        let current = write(&dir, "current.json", &json!({"a": 1, "b": [1, 2], "gone": true}));
        let target = json!({"a": 2, "b": [1, 2, 3]});
        let target_path = write(&dir, "target.json", &target);
        let args = sync_args(current.clone(), target_path);
        let config = CliConfig::default();

        let outcome = sync_files(&args, &config).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.mutations.len(), 3);
        assert_eq!(outcome.stats.map_sets, 1);
        assert_eq!(outcome.stats.map_deletes, 1);
        assert_eq!(outcome.stats.seq_inserts, 1);
        assert_eq!(outcome.result, target);
        assert_eq!(outcome.fingerprint, Fingerprint::of_value(&target));

        write_json(&args.current, &outcome.result, config.output.pretty).unwrap();
        assert_eq!(read_json(&current).unwrap(), target);
    }

    #[test]
    fn sync_of_equal_documents_is_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let value = json!([{"k": "v"}, 3, null]);
        let args = sync_args(write(&dir, "a.json", &value), write(&dir, "b.json", &value));

        let outcome = sync_files(&args, &CliConfig::default()).unwrap();
        assert!(!outcome.changed);
        assert!(outcome.mutations.is_empty());
    }

    #[test]
    fn sync_from_missing_current_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let target = json!(["x", ["y"]]);
        let args = sync_args(dir.path().join("absent.json"), write(&dir, "t.json", &target));

        let outcome = sync_files(&args, &CliConfig::default()).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.result, target);
    }

    #[test]
    fn primitive_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let args = sync_args(dir.path().join("absent.json"), write(&dir, "t.json", &json!("text")));

        let err = sync_files(&args, &CliConfig::default()).unwrap_err();
        assert!(err.to_string().contains("object or an array"));
    }

    #[test]
    fn forced_root_kind_reports_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let args = sync_args(
            write(&dir, "c.json", &json!([1])),
            write(&dir, "t.json", &json!([1, 2])),
        );
        let config = CliConfig {
            root: RootKind::Map,
            ..CliConfig::default()
        };

        let err = sync_files(&args, &config).unwrap_err();
        assert!(format!("{err:#}").contains("shape mismatch"));
    }

    #[test]
    fn equals_compares_structurally() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(&dir, "a.json", &json!({"n": 1, "list": ["x"]}));
        let b = write(&dir, "b.json", &json!({"list": ["x"], "n": 1.0}));
        let c = write(&dir, "c.json", &json!({"n": 1, "list": []}));
        let config = CliConfig::default();

        let same = equals_files(&EqualsArgs { current: a.clone(), target: b }, &config).unwrap();
        assert!(same.equal);

        let different = equals_files(&EqualsArgs { current: a, target: c }, &config).unwrap();
        assert!(!different.equal);
        assert_ne!(different.current, different.target);
    }

    #[test]
    fn equals_accepts_primitive_documents() {
        let dir = tempfile::tempdir().unwrap();
        let args = EqualsArgs {
            current: write(&dir, "a.json", &json!("same")),
            target: write(&dir, "b.json", &json!("same")),
        };
        assert!(equals_files(&args, &CliConfig::default()).unwrap().equal);
    }

    #[test]
    fn unreadable_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{not json").unwrap();

        let err = read_json(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
