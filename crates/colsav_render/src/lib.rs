use std::fmt;

use colsav_core::core_api::{ColonySummary, Session, VillageSummary};
use colsav_core::layout::FileLayout;
use colsav_core::regions::RegionReport;
use colsav_core::routes::{Direction, RouteGrid};
use colsav_core::sav::RumorState;
use colsav_core::sav::colony::GOODS_NAMES;
use colsav_core::sav::tile::Tile;
use colsav_core::sav::village::Culture;
use serde_json::{Map as JsonMap, Value as JsonValue};

const NAME_COL_WIDTH: usize = 24;
const POWER_COL_WIDTH: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapLayer {
    #[default]
    Terrain,
    Regions,
    Overlays,
    Pacific,
}

impl MapLayer {
    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Terrain => "terrain",
            Self::Regions => "regions",
            Self::Overlays => "overlays",
            Self::Pacific => "pacific",
        }
    }
}

pub fn render_json_summary(session: &Session) -> JsonValue {
    let snapshot = session.snapshot();
    let mut out = JsonMap::new();

    out.insert("map_width".to_string(), JsonValue::from(snapshot.map_width));
    out.insert(
        "map_height".to_string(),
        JsonValue::from(snapshot.map_height),
    );
    out.insert(
        "colony_count".to_string(),
        JsonValue::from(snapshot.colony_count),
    );
    out.insert("unit_count".to_string(), JsonValue::from(snapshot.unit_count));
    out.insert(
        "village_count".to_string(),
        JsonValue::from(snapshot.village_count),
    );
    out.insert("prime".to_string(), JsonValue::from(snapshot.prime));
    out.insert("lcr".to_string(), JsonValue::from(snapshot.lcr));
    out.insert(
        "powers".to_string(),
        JsonValue::Array(
            snapshot
                .powers
                .iter()
                .map(|p| {
                    let mut m = JsonMap::new();
                    m.insert(
                        "power".to_string(),
                        JsonValue::String(p.power.to_string()),
                    );
                    m.insert("adam_smith".to_string(), JsonValue::Bool(p.adam_smith));
                    m.insert(
                        "peter_stuyvesant".to_string(),
                        JsonValue::Bool(p.peter_stuyvesant),
                    );
                    JsonValue::Object(m)
                })
                .collect(),
        ),
    );
    out.insert("colonies".to_string(), render_json_colonies(session));

    JsonValue::Object(out)
}

pub fn render_json_colonies(session: &Session) -> JsonValue {
    JsonValue::Array(
        session
            .snapshot()
            .colonies
            .iter()
            .map(|summary| colony_to_json(session, summary))
            .collect(),
    )
}

fn colony_to_json(session: &Session, summary: &ColonySummary) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("index".to_string(), JsonValue::from(summary.index));
    m.insert("name".to_string(), JsonValue::String(summary.name.clone()));
    m.insert(
        "power".to_string(),
        JsonValue::String(summary.power.to_string()),
    );
    m.insert("row".to_string(), JsonValue::from(summary.row));
    m.insert("col".to_string(), JsonValue::from(summary.col));
    m.insert("population".to_string(), JsonValue::from(summary.population));
    m.insert(
        "fortification".to_string(),
        JsonValue::String(summary.fortification.tag().to_string()),
    );
    m.insert(
        "buildings".to_string(),
        JsonValue::Array(
            summary
                .buildings
                .iter()
                .map(|b| JsonValue::String(b.clone()))
                .collect(),
        ),
    );
    if let Ok(colony) = session.colony(summary.index) {
        let cargo = GOODS_NAMES
            .iter()
            .zip(colony.cargo)
            .filter(|(_, qty)| *qty > 0)
            .map(|(name, qty)| (name.to_string(), JsonValue::from(qty)))
            .collect::<JsonMap<_, _>>();
        m.insert("cargo".to_string(), JsonValue::Object(cargo));
        m.insert("hammers".to_string(), JsonValue::from(colony.hammers));
        m.insert("sentiment".to_string(), JsonValue::from(colony.sentiment));
    }
    JsonValue::Object(m)
}

pub fn render_json_villages(session: &Session) -> JsonValue {
    JsonValue::Array(session.villages().iter().map(village_to_json).collect())
}

fn village_to_json(v: &VillageSummary) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("row".to_string(), JsonValue::from(v.row));
    m.insert("col".to_string(), JsonValue::from(v.col));
    m.insert(
        "tribe".to_string(),
        JsonValue::String(v.tribe.as_str().to_string()),
    );
    m.insert(
        "culture".to_string(),
        JsonValue::String(culture_name(v.culture).to_string()),
    );
    m.insert("trained".to_string(), JsonValue::Bool(v.trained));
    m.insert("capital".to_string(), JsonValue::Bool(v.capital));
    m.insert("scouted".to_string(), JsonValue::Bool(v.scouted));
    m.insert(
        "mission".to_string(),
        match v.mission {
            Some(power) => JsonValue::String(power.to_string()),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(m)
}

pub fn render_json_regions(report: &RegionReport) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("ok".to_string(), JsonValue::Bool(report.ok));
    m.insert("areas".to_string(), JsonValue::from(report.areas));
    m.insert(
        "issue".to_string(),
        match &report.issue {
            Some(issue) => JsonValue::String(issue.to_string()),
            None => JsonValue::Null,
        },
    );
    JsonValue::Object(m)
}

pub fn render_json_layout(layout: &FileLayout) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert("file_len".to_string(), JsonValue::from(layout.file_len));
    m.insert(
        "valid".to_string(),
        JsonValue::Bool(layout.validate().is_ok()),
    );
    m.insert(
        "sections".to_string(),
        JsonValue::Array(
            layout
                .sections
                .iter()
                .map(|s| {
                    let mut sm = JsonMap::new();
                    sm.insert(
                        "id".to_string(),
                        JsonValue::String(s.id.as_str().to_string()),
                    );
                    sm.insert("start".to_string(), JsonValue::from(s.range.start));
                    sm.insert("end".to_string(), JsonValue::from(s.range.end));
                    JsonValue::Object(sm)
                })
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

pub fn render_json_routes(grid: &RouteGrid) -> JsonValue {
    let mut m = JsonMap::new();
    m.insert(
        "medium".to_string(),
        JsonValue::String(grid.medium.as_str().to_string()),
    );
    m.insert("rows".to_string(), JsonValue::from(grid.rows));
    m.insert("cols".to_string(), JsonValue::from(grid.cols));
    m.insert(
        "blocks".to_string(),
        JsonValue::Array(
            (0..grid.rows)
                .map(|row| {
                    JsonValue::Array(
                        (0..grid.cols)
                            .map(|col| {
                                JsonValue::from(grid.block(row, col).map_or(0, |b| b.byte()))
                            })
                            .collect(),
                    )
                })
                .collect(),
        ),
    );
    JsonValue::Object(m)
}

pub fn render_summary_text(session: &Session) -> String {
    SummaryView { session }.to_string()
}

pub fn render_colonies_text(session: &Session) -> String {
    ColonyTable { session }.to_string()
}

pub fn render_villages_text(session: &Session) -> String {
    VillageTable {
        villages: session.villages(),
    }
    .to_string()
}

pub fn render_map(session: &Session, layer: MapLayer) -> String {
    MapView { session, layer }.to_string()
}

pub fn render_routes(grid: &RouteGrid) -> String {
    RouteView { grid }.to_string()
}

pub fn render_region_report(report: &RegionReport) -> String {
    format!("{report}\n")
}

pub fn render_layout(layout: &FileLayout) -> String {
    LayoutView { layout }.to_string()
}

struct SummaryView<'a> {
    session: &'a Session,
}

impl fmt::Display for SummaryView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.session.snapshot();
        writeln!(f, "Map:       {}x{}", s.map_width, s.map_height)?;
        writeln!(f, "Colonies:  {}", s.colony_count)?;
        writeln!(f, "Units:     {}", s.unit_count)?;
        writeln!(f, "Villages:  {}", s.village_count)?;
        writeln!(f, "Prime:     {}", s.prime)?;
        writeln!(f, "Rumors:    {}", s.lcr)?;
        for p in &s.powers {
            let mut fathers = Vec::new();
            if p.adam_smith {
                fathers.push("Adam Smith");
            }
            if p.peter_stuyvesant {
                fathers.push("Peter Stuyvesant");
            }
            let fathers = if fathers.is_empty() {
                "none".to_string()
            } else {
                fathers.join(", ")
            };
            writeln!(f, "{:<w$}  {fathers}", p.power.as_str(), w = POWER_COL_WIDTH)?;
        }
        Ok(())
    }
}

struct ColonyTable<'a> {
    session: &'a Session,
}

impl fmt::Display for ColonyTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let colonies = &self.session.snapshot().colonies;
        if colonies.is_empty() {
            return writeln!(f, "no colonies");
        }
        writeln!(
            f,
            "{:>3}  {:<nw$}{:<pw$}{:>9}  {:>4}  {:<9}",
            "#",
            "Name",
            "Power",
            "Position",
            "Pop",
            "Defense",
            nw = NAME_COL_WIDTH,
            pw = POWER_COL_WIDTH,
        )?;
        for c in colonies {
            writeln!(
                f,
                "{:>3}  {:<nw$}{:<pw$}{:>9}  {:>4}  {:<9}",
                c.index,
                fit_column(&c.name, NAME_COL_WIDTH),
                c.power.as_str(),
                format!("{},{}", c.row, c.col),
                c.population,
                c.fortification.tag(),
                nw = NAME_COL_WIDTH,
                pw = POWER_COL_WIDTH,
            )?;
            if !c.buildings.is_empty() {
                writeln!(f, "     {}", c.buildings.join(" "))?;
            }
        }
        Ok(())
    }
}

struct VillageTable {
    villages: Vec<VillageSummary>,
}

impl fmt::Display for VillageTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.villages.is_empty() {
            return writeln!(f, "no villages");
        }
        for v in &self.villages {
            let mut flags = Vec::new();
            if v.capital {
                flags.push("capital");
            }
            if v.trained {
                flags.push("trained");
            }
            if v.scouted {
                flags.push("scouted");
            }
            let mission = v
                .mission
                .map(|p| format!(" mission:{}", p.as_str()))
                .unwrap_or_default();
            writeln!(
                f,
                "{:>7}  {:<9}{:<13}{}{mission}",
                format!("{},{}", v.row, v.col),
                v.tribe.as_str(),
                culture_name(v.culture),
                flags.join(" "),
            )?;
        }
        Ok(())
    }
}

struct MapView<'a> {
    session: &'a Session,
    layer: MapLayer,
}

impl fmt::Display for MapView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = self.session.document().grid();
        for row in 0..grid.height() {
            let mut line = String::with_capacity(grid.width());
            for col in 0..grid.width() {
                let Some(tile) = grid.get(row, col) else {
                    continue;
                };
                line.push(match self.layer {
                    MapLayer::Terrain => terrain_glyph(tile),
                    MapLayer::Regions => region_glyph(tile.path_region),
                    MapLayer::Pacific => pacific_glyph(tile),
                    MapLayer::Overlays => self.overlay_glyph(tile),
                });
            }
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

impl MapView<'_> {
    fn overlay_glyph(&self, tile: &Tile) -> char {
        let Ok(overlay) = self.session.overlay(tile.row, tile.col) else {
            return ' ';
        };
        match overlay.rumor {
            Some(RumorState::Active) => return '?',
            Some(RumorState::Explored) => return '!',
            None => {}
        }
        if overlay.prime_depleted {
            'x'
        } else if overlay.prime {
            '*'
        } else if overlay.suppressed_prime {
            '+'
        } else if tile.is_water() {
            '~'
        } else {
            '.'
        }
    }
}

fn terrain_glyph(tile: &Tile) -> char {
    if tile.colony.is_some() {
        return '#';
    }
    if tile.village.is_some() {
        return '@';
    }
    if tile.hills && tile.prominent {
        return '^';
    }
    if tile.hills {
        return 'n';
    }
    let glyph = match tile.base {
        0 => 't',
        1 => 'd',
        2 => 'p',
        3 => 'r',
        4 => 'g',
        5 => 's',
        6 => 'm',
        7 => 'w',
        24 => 'a',
        25 => '~',
        26 => '=',
        _ => '?',
    };
    if tile.forested {
        glyph.to_ascii_uppercase()
    } else {
        glyph
    }
}

fn region_glyph(region: u8) -> char {
    char::from_digit(region as u32, 16)
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('?')
}

fn pacific_glyph(tile: &Tile) -> char {
    match (tile.is_water(), tile.pacific) {
        (false, _) => '.',
        (true, true) => 'P',
        (true, false) => '~',
    }
}

struct RouteView<'a> {
    grid: &'a RouteGrid,
}

impl fmt::Display for RouteView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} routes ({}x{} blocks)",
            self.grid.medium.as_str(),
            self.grid.rows,
            self.grid.cols
        )?;
        for row in 0..self.grid.rows {
            let cells: Vec<String> = (0..self.grid.cols)
                .map(|col| {
                    self.grid
                        .block(row, col)
                        .map_or_else(|| "--".to_string(), |b| format!("{:02X}", b.byte()))
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        writeln!(
            f,
            "bits: {}",
            Direction::ALL
                .iter()
                .map(|d| format!("{}={:02X}", d.as_str(), d.bit()))
                .collect::<Vec<_>>()
                .join(" ")
        )
    }
}

struct LayoutView<'a> {
    layout: &'a FileLayout,
}

impl fmt::Display for LayoutView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for s in &self.layout.sections {
            writeln!(
                f,
                "{:<12} {:#07x}..{:#07x} {:>7} bytes",
                s.id.as_str(),
                s.range.start,
                s.range.end,
                s.range.len()
            )?;
        }
        match self.layout.validate() {
            Ok(()) => writeln!(f, "layout ok ({} bytes)", self.layout.file_len),
            Err(e) => writeln!(f, "layout invalid: {e}"),
        }
    }
}

fn culture_name(culture: Culture) -> &'static str {
    match culture {
        Culture::Civilized => "civilized",
        Culture::Advanced => "advanced",
        Culture::Agrarian => "agrarian",
        Culture::SemiNomadic => "semi-nomadic",
    }
}

fn fit_column(value: &str, width: usize) -> String {
    if value.chars().count() < width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(2)).collect();
    out.push('~');
    out
}
