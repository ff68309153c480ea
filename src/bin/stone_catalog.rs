//! Stone Catalog - Asset Inspection Tool
//!
//! Compiles a stone DSL file and prints the resulting catalog and which
//! palette hotkeys it covers. Given a saved model as well, loads it against
//! that catalog and prints its contents.
//!
//! Run with: `cargo run --bin stone_catalog -- [options] [asset.txt] [model.blcs]`
//!
//! Options:
//! - `--config <editor.json>`: editor config; its `stone_asset` is used when
//!   no asset path is given
//! - `--init-config <editor.json>`: write the default config and exit
//!
//! Set `RUST_LOG=debug` to see rejected stones while a model loads.

use std::path::PathBuf;
use std::process::ExitCode;

use block_designer_engine::game::EditorConfig;
use block_designer_engine::mesh::{MeshCatalog, compile_lenient};
use block_designer_engine::world::load_from_file;
use tracing::error;

fn print_catalog(catalog: &MeshCatalog) {
    println!("{:>5} {:>6}  {:<12} {:<10} {:>5} {:>5}  AABB", "index", "id", "name", "caption", "verts", "faces");
    for (index, def) in catalog.iter().enumerate() {
        let aabb = def.rotated_aabb(0.0);
        println!(
            "{:>5} {:>6}  {:<12} {:<10} {:>5} {:>5}  ({:.2}, {:.2}, {:.2})..({:.2}, {:.2}, {:.2})",
            index,
            def.id,
            def.name,
            def.caption,
            def.vertices.len(),
            def.faces.len(),
            aabb.min.x,
            aabb.min.y,
            aabb.min.z,
            aabb.max.x,
            aabb.max.y,
            aabb.max.z,
        );
    }
}

fn print_hotkeys(config: &EditorConfig, catalog: &MeshCatalog) {
    for key in 0..10u8 {
        let Some(type_code) = config.hotkey(key) else {
            continue;
        };
        let status = if catalog.by_id(type_code).is_some() { "ok" } else { "missing" };
        println!("  key {key} -> {type_code} ({status})");
    }
}

const USAGE: &str = "usage: stone_catalog [--config <editor.json>] [--init-config <editor.json>] [asset.txt] [model.blcs]";

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut config_path = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "--init-config" => {
                let Some(path) = args.next().map(PathBuf::from) else {
                    eprintln!("{USAGE}");
                    return ExitCode::FAILURE;
                };
                if arg == "--init-config" {
                    return match EditorConfig::default().save(&path) {
                        Ok(()) => {
                            println!("wrote {}", path.display());
                            ExitCode::SUCCESS
                        }
                        Err(e) => {
                            error!("cannot write {}: {e}", path.display());
                            ExitCode::FAILURE
                        }
                    };
                }
                config_path = Some(path);
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let config = match config_path {
        Some(path) => match EditorConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("cannot load config {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => EditorConfig::default(),
    };

    let mut positional = positional.into_iter();
    let asset = positional.next().unwrap_or_else(|| config.stone_asset.clone());
    let model_path = positional.next();

    let source = match std::fs::read_to_string(&asset) {
        Ok(source) => source,
        Err(e) => {
            error!("cannot read {}: {e}", asset.display());
            return ExitCode::FAILURE;
        }
    };

    let (catalog, errors) = compile_lenient(&source);
    println!("{}: {} definitions", asset.display(), catalog.len());
    print_catalog(&catalog);
    println!("palette hotkeys:");
    print_hotkeys(&config, &catalog);
    for e in &errors {
        println!("error: {e}");
    }

    let mut status = if errors.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    };

    if let Some(path) = model_path {
        match load_from_file(&path, &catalog) {
            Ok(document) => {
                let model = &document.model;
                println!(
                    "{}: {} stones ({} selected), {} groups, next insert id {}",
                    path.display(),
                    model.len(),
                    model.selected_count(),
                    model.groups().len(),
                    document.next_insert_id,
                );
                for group in model.groups() {
                    println!("  group {} '{}': {} members", group.id, group.name, group.members.len());
                }
            }
            Err(e) => {
                error!("cannot load {}: {e}", path.display());
                status = ExitCode::FAILURE;
            }
        }
    }

    status
}
