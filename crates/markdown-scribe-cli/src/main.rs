use anyhow::{Context, Result, bail};
use markdown_scribe_config::Config;
use markdown_scribe_engine::{
    Cmd, FileStore, ImageResolver, MarkdownDocument, NodeId, Parser, Tag, TagCatalog, io,
};
use relative_path::RelativePathBuf;
use std::{
    env,
    path::{Path, PathBuf},
    process,
    sync::Arc,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Html { file: PathBuf },
    Outline { file: PathBuf },
    Tree { file: PathBuf },
    Swap { file: PathBuf, index: usize, tag: String },
    Duplicate { file: PathBuf, index: usize },
    Delete { file: PathBuf, index: usize },
}

impl Command {
    fn parse(args: &[String]) -> Result<Self> {
        let Some((name, rest)) = args.split_first() else {
            bail!("no command given");
        };
        let file = |rest: &[String]| -> Result<PathBuf> {
            rest.first()
                .map(PathBuf::from)
                .context("missing <file> argument")
        };
        let index = |rest: &[String]| -> Result<usize> {
            let raw = rest.get(1).context("missing <index> argument")?;
            raw.parse()
                .with_context(|| format!("outline index '{raw}' is not a number"))
        };

        let expected = match name.as_str() {
            "html" | "outline" | "tree" => 1,
            "duplicate" | "delete" => 2,
            "swap" => 3,
            other => bail!("unknown command '{other}'"),
        };
        if rest.len() > expected {
            bail!("too many arguments for '{name}'");
        }

        Ok(match name.as_str() {
            "html" => Command::Html { file: file(rest)? },
            "outline" => Command::Outline { file: file(rest)? },
            "tree" => Command::Tree { file: file(rest)? },
            "duplicate" => Command::Duplicate {
                file: file(rest)?,
                index: index(rest)?,
            },
            "delete" => Command::Delete {
                file: file(rest)?,
                index: index(rest)?,
            },
            _ => Command::Swap {
                file: file(rest)?,
                index: index(rest)?,
                tag: rest.get(2).cloned().context("missing <tag> argument")?,
            },
        })
    }

    fn file(&self) -> &Path {
        match self {
            Command::Html { file }
            | Command::Outline { file }
            | Command::Tree { file }
            | Command::Swap { file, .. }
            | Command::Duplicate { file, .. }
            | Command::Delete { file, .. } => file,
        }
    }
}

fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <command> <file> [args]\n\
         \n\
         Commands:\n  \
           html <file>                 print the HTML document\n  \
           outline <file>              print the outline with entry indexes\n  \
           tree <file>                 print the parsed node tree\n  \
           swap <file> <index> <tag>   retag an outline entry (h1-h6, comment, quote, code)\n  \
           duplicate <file> <index>    duplicate an outline entry\n  \
           delete <file> <index>       delete an outline entry"
    )
}

/// Catalog tag for a name given on the command line.
fn tag_named(catalog: &TagCatalog, name: &str) -> Result<Arc<Tag>> {
    let open = match name {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level: usize = name[1..].parse()?;
            "#".repeat(level)
        }
        "comment" => "<!--".to_string(),
        "quote" => ">".to_string(),
        "code" => "```".to_string(),
        other => bail!("unknown tag '{other}' (expected h1-h6, comment, quote or code)"),
    };
    catalog
        .find_by_open(&open)
        .cloned()
        .with_context(|| format!("tag '{name}' is not in the catalog"))
}

fn outline_id(doc: &MarkdownDocument, index: usize) -> Result<NodeId> {
    let outline = doc.outline();
    outline
        .get(index)
        .map(|element| element.node_id)
        .with_context(|| {
            format!(
                "outline index {index} out of range ({} entries)",
                outline.len()
            )
        })
}

/// Splits a document path into the directory a store is rooted at and the
/// file name under it.
fn store_location(path: &Path) -> Result<(PathBuf, RelativePathBuf)> {
    let name = path
        .file_name()
        .with_context(|| format!("'{}' does not name a file", path.display()))?;
    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((root, RelativePathBuf::from(name.to_string_lossy().into_owned())))
}

fn run(command: Command, config: Option<&Config>) -> Result<()> {
    let path = match config {
        Some(config) => config.resolve_document(command.file()),
        None => command.file().to_path_buf(),
    };
    let (root, name) = store_location(&path)?;

    let images = ImageResolver::new(config.map_or_else(|| root.clone(), |c| c.documents_path.clone()));
    let catalog = Arc::new(TagCatalog::builtin(images));
    let mut parser = Parser::new(Arc::clone(&catalog));
    if let Some(config) = config {
        parser = parser.with_stylesheet(config.stylesheet.as_str());
    }

    let store = FileStore::new(root, name);
    log::debug!("opening {}", store.absolute_path().display());
    let mut doc = MarkdownDocument::open(Box::new(store), parser)
        .with_context(|| format!("Failed to open '{}'", path.display()))?;

    let cmd = match command {
        Command::Html { .. } => {
            println!("{}", doc.html().context("document was not parsed")?);
            return Ok(());
        }
        Command::Outline { .. } => {
            for (index, element) in doc.outline().iter().enumerate() {
                println!(
                    "{index:>3}: {}{element}",
                    "  ".repeat(element.indentation_level)
                );
            }
            return Ok(());
        }
        Command::Tree { .. } => {
            let parsed = doc.parsed().context("document was not parsed")?;
            print!("{}", parsed.tree().dump());
            return Ok(());
        }
        Command::Swap { index, tag, .. } => Cmd::SwapTags {
            ids: vec![outline_id(&doc, index)?],
            tag: tag_named(&catalog, &tag)?,
        },
        Command::Duplicate { index, .. } => Cmd::Duplicate {
            ids: vec![outline_id(&doc, index)?],
        },
        Command::Delete { index, .. } => Cmd::Delete {
            ids: vec![outline_id(&doc, index)?],
        },
    };

    let name = cmd.name();
    let patch = doc.apply(cmd)?;
    if patch.is_noop() {
        log::info!("{name}: nothing changed");
        return Ok(());
    }
    doc.save()
        .with_context(|| format!("Failed to save '{}'", path.display()))?;
    log::info!("{name}: saved {} (version {})", path.display(), patch.version);
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map_or("markdown-scribe-cli", String::as_str);

    let command = match Command::parse(args.get(1..).unwrap_or_default()) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("{}", usage(program));
            process::exit(1);
        }
    };

    let config_path = Config::config_path();
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            process::exit(1);
        }
    };

    if let Some(config) = &config
        && let Err(e) = io::validate_documents_dir(&config.documents_path)
    {
        eprintln!(
            "Error: Documents path '{}' from config file '{}' is invalid: {e}",
            config.documents_path.display(),
            config_path.display()
        );
        process::exit(1);
    }

    run(command, config.as_ref())
}
