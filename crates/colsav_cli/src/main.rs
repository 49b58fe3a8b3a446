use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use colsav_core::core_api::{CoreError, Engine, Session};
use colsav_core::routes::Medium;
use colsav_render::{
    MapLayer, render_colonies_text, render_json_colonies, render_json_layout,
    render_json_regions, render_json_routes, render_json_summary, render_json_villages,
    render_layout, render_map, render_region_report, render_routes, render_summary_text,
    render_villages_text,
};
use serde_json::{Map as JsonMap, Value as JsonValue};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MapArg {
    Terrain,
    Regions,
    Overlays,
    Pacific,
}

impl MapArg {
    fn layer(self) -> MapLayer {
        match self {
            Self::Terrain => MapLayer::Terrain,
            Self::Regions => MapLayer::Regions,
            Self::Overlays => MapLayer::Overlays,
            Self::Pacific => MapLayer::Pacific,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum MediumArg {
    Land,
    Sea,
}

impl MediumArg {
    fn medium(self) -> Medium {
        match self {
            Self::Land => Medium::Land,
            Self::Sea => Medium::Sea,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(value_name = "SAVE.SAV")]
    path: PathBuf,
    #[arg(long)]
    json: bool,
    #[arg(long)]
    colonies: bool,
    #[arg(long)]
    villages: bool,
    #[arg(long, value_enum, value_name = "LAYER")]
    map: Option<MapArg>,
    #[arg(long, value_enum, value_name = "MEDIUM")]
    routes: Option<MediumArg>,
    #[arg(long = "check-regions")]
    check_regions: bool,
    #[arg(long)]
    layout: bool,
    #[arg(long = "set-prime", value_parser = clap::value_parser!(u8).range(0..=15))]
    set_prime: Option<u8>,
    #[arg(long = "set-lcr", value_parser = clap::value_parser!(u8).range(0..=15))]
    set_lcr: Option<u8>,
    #[arg(long = "reset-depleted")]
    reset_depleted: bool,
    #[arg(long = "reset-rumors")]
    reset_rumors: bool,
    #[arg(long = "regenerate-routes")]
    regenerate_routes: bool,
    #[arg(long = "export-mp", value_name = "PATH")]
    export_mp: Option<PathBuf>,
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn has_edits(&self) -> bool {
        self.set_prime.is_some()
            || self.set_lcr.is_some()
            || self.reset_depleted
            || self.reset_rumors
            || self.regenerate_routes
    }

    fn has_views(&self) -> bool {
        self.colonies
            || self.villages
            || self.map.is_some()
            || self.routes.is_some()
            || self.check_regions
            || self.layout
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let has_edits = cli.has_edits();
    if has_edits && cli.output.is_none() {
        eprintln!("edit flags require --output <PATH>");
        process::exit(2);
    }
    if !has_edits && cli.output.is_some() {
        eprintln!("--output requires at least one edit flag");
        process::exit(2);
    }

    let mut session = Engine::new().open_path(&cli.path).unwrap_or_else(|e| {
        eprintln!("Error loading save file: {}", cli.path.display());
        eprintln!("  {}", e.message);
        process::exit(1);
    });

    if let Err(e) = apply_edits(&cli, &mut session) {
        eprintln!("Error applying edit: {}", e.message);
        process::exit(1);
    }

    if let Some(out_path) = cli.output.as_ref() {
        let outcome = session.save().unwrap_or_else(|e| {
            eprintln!("Error creating modified save bytes: {}", e.message);
            process::exit(1);
        });
        debug!(
            tiles = outcome.tiles_written,
            colonies = outcome.colonies_written,
            routes = outcome.routes_regenerated,
            "writing edited save"
        );
        write_file(out_path, &outcome.bytes);
        if !cli.json {
            println!("Wrote edited save to {}", out_path.display());
        }
    }

    if let Some(mp_path) = cli.export_mp.as_ref() {
        let export = session.export_map();
        write_file(mp_path, &export.bytes);
        if !cli.json {
            println!("Wrote map to {}", mp_path.display());
            if !export.regions.ok {
                print!("{}", render_region_report(&export.regions));
            }
        }
    }

    let wrote_something = cli.output.is_some() || cli.export_mp.is_some();

    if cli.json {
        let json = if cli.has_views() {
            selected_json(&cli, &session)
        } else {
            render_json_summary(&session)
        };
        let rendered = serde_json::to_string_pretty(&json).unwrap_or_else(|e| {
            eprintln!("Error rendering JSON output: {e}");
            process::exit(1);
        });
        println!("{rendered}");
        return;
    }

    if cli.has_views() {
        print!("{}", selected_text(&cli, &session));
        return;
    }

    if !wrote_something {
        print!("{}", render_summary_text(&session));
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn apply_edits(cli: &Cli, session: &mut Session) -> Result<(), CoreError> {
    if let Some(prime) = cli.set_prime {
        session.set_prime(prime)?;
    }
    if let Some(lcr) = cli.set_lcr {
        session.set_lcr(lcr)?;
    }
    if cli.reset_depleted {
        let changed = session.reset_depleted_resources();
        debug!(changed, "reset depleted resources");
    }
    if cli.reset_rumors {
        let changed = session.reset_rumors();
        debug!(changed, "reset rumors");
    }
    if cli.regenerate_routes {
        session.regenerate_routes();
    }
    Ok(())
}

fn write_file(path: &Path, bytes: &[u8]) {
    fs::write(path, bytes).unwrap_or_else(|e| {
        eprintln!("Error writing {}: {e}", path.display());
        process::exit(1);
    });
}

fn selected_json(cli: &Cli, session: &Session) -> JsonValue {
    let mut out = JsonMap::new();
    if cli.colonies {
        out.insert("colonies".to_string(), render_json_colonies(session));
    }
    if cli.villages {
        out.insert("villages".to_string(), render_json_villages(session));
    }
    if let Some(map) = cli.map {
        let rows = render_map(session, map.layer())
            .lines()
            .map(|line| JsonValue::String(line.to_string()))
            .collect();
        out.insert("map".to_string(), JsonValue::Array(rows));
    }
    if let Some(medium) = cli.routes {
        out.insert(
            "routes".to_string(),
            render_json_routes(&session.stored_routes(medium.medium())),
        );
    }
    if cli.check_regions {
        out.insert(
            "regions".to_string(),
            render_json_regions(&session.check_regions()),
        );
    }
    if cli.layout {
        out.insert("layout".to_string(), render_json_layout(&session.layout()));
    }
    JsonValue::Object(out)
}

fn selected_text(cli: &Cli, session: &Session) -> String {
    let mut sections = Vec::new();
    if cli.colonies {
        sections.push(render_colonies_text(session));
    }
    if cli.villages {
        sections.push(render_villages_text(session));
    }
    if let Some(map) = cli.map {
        sections.push(render_map(session, map.layer()));
    }
    if let Some(medium) = cli.routes {
        sections.push(render_routes(&session.stored_routes(medium.medium())));
    }
    if cli.check_regions {
        sections.push(render_region_report(&session.check_regions()));
    }
    if cli.layout {
        sections.push(render_layout(&session.layout()));
    }
    sections.join("\n")
}
