//! Plaintree CLI and server
//!
//! Usage:
//!   ptree serve [--addr 127.0.0.1:8080] [--config ./plaintree.toml]
//!   ptree add <path> [--branch <name>] [--only-hash]
//!   ptree refs
//!   ptree cat <revision/path>

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use plaintree::builder::TreeBuilder;
use plaintree::store::MemoryStore;
use plaintree::{
    resolve, to_hex, DirEntry, EntryMode, Hash, PathTarget, Resolved, Store,
};
use plaintree_cli::{Config, FsBlobStore, PlainServer, RefStore};
use std::future::Future;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "ptree")]
#[command(about = "Content-addressed file trees served as plain HTTP", long_about = None)]
struct Cli {
    #[arg(long, default_value = "./plaintree-data", global = true)]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        #[arg(long)]
        addr: Option<String>,
        #[arg(long, default_value = "./plaintree.toml")]
        config: PathBuf,
    },
    /// Add a file or directory tree to the store
    Add {
        /// Path to file or directory
        path: PathBuf,
        /// Point a branch at the new root
        #[arg(long)]
        branch: Option<String>,
        /// Only compute the root hash, don't store
        #[arg(long)]
        only_hash: bool,
    },
    /// List branches and tags
    Refs,
    /// Print file content for a revision/path
    Cat {
        /// Request path, e.g. main/docs/readme.txt
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, config } => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
                .init();

            let config = Config::load(&config)?;

            // Use data dir from config if not overridden by CLI
            let data_dir = if cli.data_dir.to_str() == Some("./plaintree-data") {
                PathBuf::from(&config.storage.data_dir)
            } else {
                cli.data_dir.clone()
            };
            let addr = addr.unwrap_or_else(|| config.server.bind_address.clone());

            let store: Arc<dyn Store> = Arc::new(FsBlobStore::new(data_dir.join("objects"))?);
            let refs = Arc::new(RefStore::open(&data_dir)?);

            println!("Starting plaintree server on {}", addr);
            println!("Data directory: {}", data_dir.display());

            PlainServer::new(store, refs, config.mime.types, addr)
                .with_ensure_trailing_slash(config.server.ensure_trailing_slash)
                .run()
                .await?;
        }
        Commands::Add {
            path,
            branch,
            only_hash,
        } => {
            if only_hash {
                let store = Arc::new(MemoryStore::new());
                let builder = TreeBuilder::new(store);
                let (hash, _) = add_path(&builder, &path).await?;
                println!("{}", to_hex(&hash));
            } else {
                let store = Arc::new(FsBlobStore::new(cli.data_dir.join("objects"))?);
                let builder = TreeBuilder::new(store);
                let (hash, _) = add_path(&builder, &path).await?;
                println!("added {} {}", to_hex(&hash), path.display());

                if let Some(branch) = branch {
                    let refs = RefStore::open(&cli.data_dir)?;
                    refs.set_branch(&branch, &hash)?;
                    println!("branch {} -> {}", branch, to_hex(&hash));
                }
            }
        }
        Commands::Refs => {
            let refs = RefStore::open(&cli.data_dir)?;
            for (name, hash) in refs.branches()? {
                println!("{} refs/heads/{}", to_hex(&hash), name);
            }
            for (name, hash) in refs.tags()? {
                println!("{} refs/tags/{}", to_hex(&hash), name);
            }
        }
        Commands::Cat { path } => {
            let store: Arc<dyn Store> = Arc::new(FsBlobStore::new(cli.data_dir.join("objects"))?);
            let refs = RefStore::open(&cli.data_dir)?;

            let trimmed = path.trim_matches('/');
            let Some(target) = PathTarget::parse(trimmed) else {
                bail!("Empty path: expected revision/path");
            };
            let Some(root) = refs.resolve(&target.revision)? else {
                bail!("Unknown revision: {}", target.revision);
            };

            match resolve(&store, &root, &target.target).await? {
                Resolved::File { hash, .. } => {
                    let data = store
                        .get(&hash)
                        .await?
                        .with_context(|| format!("Missing blob {}", to_hex(&hash)))?;
                    std::io::stdout().write_all(&data)?;
                }
                Resolved::Directory { entries, .. } => {
                    for entry in entries {
                        if entry.mode.is_dir() {
                            println!("{}/", entry.name);
                        } else {
                            println!("{}", entry.name);
                        }
                    }
                }
                Resolved::NotFound => bail!("Not found: {}", path),
            }
        }
    }

    Ok(())
}

fn entry_mode(metadata: &std::fs::Metadata) -> EntryMode {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if metadata.permissions().mode() & 0o111 != 0 {
            return EntryMode::Executable;
        }
    }
    let _ = metadata;
    EntryMode::Regular
}

/// Add a file or directory tree, returning the root hash and its mode.
/// Directory entries are visited in name order; hidden files are included.
fn add_path<'a, S: Store + ?Sized>(
    builder: &'a TreeBuilder<S>,
    path: &'a Path,
) -> Pin<Box<dyn Future<Output = Result<(Hash, EntryMode)>> + 'a>> {
    Box::pin(async move {
        let metadata = std::fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;

        if metadata.is_symlink() {
            let target = std::fs::read_link(path)?;
            let hash = builder
                .put_blob(target.to_string_lossy().as_bytes())
                .await?;
            return Ok((hash, EntryMode::Symlink));
        }

        if metadata.is_file() {
            let data = std::fs::read(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let hash = builder.put_blob(&data).await?;
            return Ok((hash, entry_mode(&metadata)));
        }

        let mut entries = Vec::new();
        let mut dir_entries: Vec<_> = std::fs::read_dir(path)?.collect::<std::io::Result<_>>()?;
        dir_entries.sort_by_key(|e| e.file_name());

        for dir_entry in dir_entries {
            let child = dir_entry.path();
            let name = dir_entry.file_name().to_string_lossy().to_string();
            let (hash, mode) = add_path(builder, &child).await?;

            let mut entry = DirEntry::new(&name, hash, mode);
            if mode.is_file() {
                entry = entry.with_size(dir_entry.metadata()?.len());
            }
            entries.push(entry);
        }

        let hash = builder.put_directory(entries).await?;
        Ok((hash, EntryMode::Directory))
    })
}
