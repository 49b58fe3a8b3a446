use std::fs;
use std::path::Path;

use crate::layout::FileLayout;
use crate::power::Power;
use crate::regions::RegionReport;
use crate::routes::{Medium, RouteGrid};
use crate::sav::buildings::{Building, BuildingAvailability, BuildingGroup};
use crate::sav::colony::Colony;
use crate::sav::tile::{Feature, Terrain, Tile};
use crate::sav::{Document, MapExport, SaveOutcome, TileOverlay};

use super::error::{CoreError, CoreErrorCode};
use super::types::{ColonySummary, PowerSummary, Snapshot, VillageSummary};

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine;

#[derive(Debug)]
pub struct Session {
    snapshot: Snapshot,
    document: Document,
}

impl Engine {
    pub fn new() -> Self {
        Self
    }

    pub fn open_bytes<B: Into<Vec<u8>>>(&self, bytes: B) -> Result<Session, CoreError> {
        let document = Document::load(bytes.into())?;
        Ok(Session::from_document(document))
    }

    pub fn open_path(&self, path: impl AsRef<Path>) -> Result<Session, CoreError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read {}: {e}", path.display()),
            )
        })?;
        self.open_bytes(bytes)
    }
}

impl Session {
    fn from_document(document: Document) -> Self {
        let snapshot = build_snapshot(&document);
        Self { snapshot, document }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn layout(&self) -> FileLayout {
        self.document.layout()
    }

    pub fn tile(&self, row: usize, col: usize) -> Result<&Tile, CoreError> {
        Ok(self.document.tile(row, col)?)
    }

    pub fn overlay(&self, row: usize, col: usize) -> Result<TileOverlay, CoreError> {
        Ok(self.document.overlay(row, col)?)
    }

    pub fn colony(&self, index: usize) -> Result<&Colony, CoreError> {
        Ok(self.document.colony(index)?)
    }

    pub fn villages(&self) -> Vec<VillageSummary> {
        self.document
            .villages()
            .iter()
            .map(|v| VillageSummary {
                row: v.row,
                col: v.col,
                tribe: v.marker.tribe,
                culture: v.marker.tribe.culture(),
                trained: v.marker.trained,
                capital: v.marker.capital,
                scouted: v.marker.scouted,
                mission: v.marker.mission,
            })
            .collect()
    }

    pub fn building_availability(&self, index: usize) -> Result<BuildingAvailability, CoreError> {
        Ok(self.document.building_availability(index)?)
    }

    /// Route grid as currently stored in the save.
    pub fn stored_routes(&self, medium: Medium) -> RouteGrid {
        self.document.stored_route_grid(medium)
    }

    /// Route grid regenerated from the current tiles.
    pub fn generated_routes(&self, medium: Medium) -> RouteGrid {
        self.document.route_grid(medium)
    }

    pub fn check_regions(&self) -> RegionReport {
        self.document.check_regions()
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn paint_tile(
        &mut self,
        row: usize,
        col: usize,
        terrain: Terrain,
        feature: Feature,
    ) -> Result<(), CoreError> {
        Ok(self.document.paint_tile(row, col, terrain, feature)?)
    }

    pub fn toggle_road(&mut self, row: usize, col: usize) -> Result<bool, CoreError> {
        Ok(self.document.toggle_road(row, col)?)
    }

    pub fn toggle_plow(&mut self, row: usize, col: usize) -> Result<bool, CoreError> {
        Ok(self.document.toggle_plow(row, col)?)
    }

    pub fn toggle_pacific(&mut self, row: usize, col: usize) -> Result<bool, CoreError> {
        Ok(self.document.toggle_pacific(row, col)?)
    }

    pub fn toggle_depleted(&mut self, row: usize, col: usize) -> Result<bool, CoreError> {
        Ok(self.document.toggle_depleted(row, col)?)
    }

    pub fn step_path_region(&mut self, row: usize, col: usize, up: bool) -> Result<u8, CoreError> {
        Ok(self.document.step_path_region(row, col, up)?)
    }

    pub fn select_building(
        &mut self,
        colony: usize,
        group: BuildingGroup,
        tier: Option<Building>,
    ) -> Result<(), CoreError> {
        self.document.select_building(colony, group, tier)?;
        self.snapshot.colonies = colony_summaries(&self.document);
        Ok(())
    }

    pub fn set_prime(&mut self, prime: u8) -> Result<(), CoreError> {
        self.document.set_prime(prime)?;
        self.snapshot.prime = prime;
        Ok(())
    }

    pub fn set_lcr(&mut self, lcr: u8) -> Result<(), CoreError> {
        self.document.set_lcr(lcr)?;
        self.snapshot.lcr = lcr;
        Ok(())
    }

    pub fn reset_depleted_resources(&mut self) -> usize {
        self.document.reset_depleted_resources()
    }

    pub fn reset_rumors(&mut self) -> usize {
        self.document.reset_rumors()
    }

    pub fn regenerate_routes(&mut self) {
        self.document.regenerate_routes();
    }

    pub fn save(&mut self) -> Result<SaveOutcome, CoreError> {
        Ok(self.document.save())
    }

    pub fn export_map(&self) -> MapExport {
        self.document.export_map()
    }
}

fn build_snapshot(doc: &Document) -> Snapshot {
    let header = doc.header();
    Snapshot {
        map_width: header.map_width,
        map_height: header.map_height,
        colony_count: header.colony_count,
        unit_count: header.unit_count,
        village_count: header.village_count,
        prime: doc.prime(),
        lcr: doc.lcr(),
        powers: Power::ALL
            .iter()
            .map(|&power| {
                let fathers = doc.founding_fathers(power);
                PowerSummary {
                    power,
                    adam_smith: fathers.adam_smith,
                    peter_stuyvesant: fathers.peter_stuyvesant,
                }
            })
            .collect(),
        colonies: colony_summaries(doc),
    }
}

fn colony_summaries(doc: &Document) -> Vec<ColonySummary> {
    doc.colonies()
        .iter()
        .enumerate()
        .map(|(index, c)| ColonySummary {
            index,
            name: c.name.clone(),
            power: c.power,
            row: c.row,
            col: c.col,
            population: c.population,
            fortification: c.fortification(),
            buildings: c.buildings.iter().map(|b| b.key().to_string()).collect(),
        })
        .collect()
}
