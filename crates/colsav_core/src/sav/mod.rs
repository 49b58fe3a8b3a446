pub mod buildings;
pub mod colony;
pub mod grid;
pub mod header;
pub mod tile;
pub mod types;
pub mod village;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{EditError, FormatError};
use crate::export::encode_mp;
use crate::layout::FileLayout;
use crate::pattern::{matches_prime, matches_rumor, matches_suppressed_prime};
use crate::power::{FoundingFathers, Power};
use crate::reader::LittleEndianSlice;
use crate::regions::{RegionReport, RegionValidator};
use crate::routes::{Direction, Medium, RouteGraphBuilder, RouteGrid};
use buildings::{BUILDING_BYTES_OFFSET, Building, BuildingAvailability, BuildingGroup};
use colony::Colony;
use grid::TileGrid;
use header::SaveHeader;
use tile::{Feature, Terrain, Tile, TileBytes, compose_terrain};
use types::{
    COLONY_RECORD_SIZE, OPEN_OCEAN_REGION, POWER_COUNT, POWER_FATHERS_OFFSET, RUMOR_UNEXPLORED,
    TERRAIN_OCEAN,
};
use village::Village;

const NIBBLE_MAX: u8 = 0x0F;

/// Result of writing a document back to bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub bytes: Vec<u8>,
    pub tiles_written: usize,
    pub colonies_written: usize,
    pub routes_regenerated: bool,
    pub regions: RegionReport,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapExport {
    pub bytes: Vec<u8>,
    pub regions: RegionReport,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RumorState {
    /// Not yet visited; the game will roll the rumor when entered.
    Active,
    Explored,
}

/// Pattern-driven overlays the game draws on one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TileOverlay {
    pub prime: bool,
    pub prime_depleted: bool,
    pub suppressed_prime: bool,
    pub rumor: Option<RumorState>,
}

/// A decoded save held together with its backing buffer.
///
/// Offsets are never stored: every read and write goes through
/// [`SaveHeader`], whose accessors derive them from the five header counts.
#[derive(Debug, Clone)]
pub struct Document {
    bytes: Vec<u8>,
    header: SaveHeader,
    grid: TileGrid,
    colonies: Vec<Colony>,
    villages: Vec<Village>,
    fathers: [FoundingFathers; POWER_COUNT],
    prime: u8,
    lcr: u8,
    routes_stale: bool,
}

impl Document {
    pub fn load(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let r = LittleEndianSlice::new(&bytes);
        let header = SaveHeader::parse(&r)?;
        r.require(header.prime_lcr_offset() + 1, "prime/lcr byte")?;
        FileLayout::from_header(&header, bytes.len()).validate()?;

        debug!(
            width = header.map_width,
            height = header.map_height,
            colonies = header.colony_count,
            units = header.unit_count,
            villages = header.village_count,
            "parsed header"
        );
        debug!(
            colony_table = header.colony_table_start(),
            village_table = header.village_table_start(),
            terrain_map = header.terrain_map_start(),
            sea_routes = header.sea_route_start(),
            land_routes = header.land_route_start(),
            prime_lcr = header.prime_lcr_offset(),
            "computed section offsets"
        );

        let grid = parse_grid(&r, &header)?;

        let mut colonies = Vec::with_capacity(header.colony_count as usize);
        for i in 0..header.colony_count as usize {
            let record = r.read_bytes(header.colony_offset(i), COLONY_RECORD_SIZE, "colony table")?;
            colonies.push(Colony::decode(record)?);
        }

        let mut fathers = [FoundingFathers::default(); POWER_COUNT];
        for (i, slot) in fathers.iter_mut().enumerate() {
            let raw = r.read_u8(header.power_offset(i) + POWER_FATHERS_OFFSET, "power table")?;
            *slot = FoundingFathers::from_byte(raw);
        }

        let mut villages = Vec::with_capacity(header.village_count as usize);
        for i in 0..header.village_count as usize {
            villages.push(Village::parse(&r, header.village_offset(i))?);
        }

        let packed = r.read_u8(header.prime_lcr_offset(), "prime/lcr byte")?;

        let mut doc = Self {
            bytes,
            header,
            grid,
            colonies,
            villages,
            fathers,
            prime: packed & NIBBLE_MAX,
            lcr: packed >> 4,
            routes_stale: false,
        };
        doc.link_markers();
        debug!(prime = doc.prime, lcr = doc.lcr, "loaded save");
        Ok(doc)
    }

    /// Copy colony and village state onto the tiles they occupy.
    fn link_markers(&mut self) {
        for colony in &self.colonies {
            match self.grid.get_mut(colony.row, colony.col) {
                Some(tile) => tile.colony = Some(colony.marker()),
                None => warn!(
                    name = %colony.name,
                    row = colony.row,
                    col = colony.col,
                    "colony lies outside the map"
                ),
            }
        }
        for village in &self.villages {
            match self.grid.get_mut(village.row, village.col) {
                Some(tile) => tile.village = Some(village.marker),
                None => warn!(
                    row = village.row,
                    col = village.col,
                    "village lies outside the map"
                ),
            }
        }
    }

    pub fn header(&self) -> &SaveHeader {
        &self.header
    }

    pub fn layout(&self) -> FileLayout {
        FileLayout::from_header(&self.header, self.bytes.len())
    }

    /// The backing buffer as of the last load or save.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn grid(&self) -> &TileGrid {
        &self.grid
    }

    pub fn tile(&self, row: usize, col: usize) -> Result<&Tile, EditError> {
        self.grid.tile(row, col)
    }

    pub fn colonies(&self) -> &[Colony] {
        &self.colonies
    }

    pub fn colony(&self, index: usize) -> Result<&Colony, EditError> {
        self.colonies.get(index).ok_or(EditError::UnknownColony {
            index,
            count: self.colonies.len(),
        })
    }

    pub fn villages(&self) -> &[Village] {
        &self.villages
    }

    pub fn founding_fathers(&self, power: Power) -> FoundingFathers {
        self.fathers[power.raw() as usize]
    }

    pub fn prime(&self) -> u8 {
        self.prime
    }

    pub fn lcr(&self) -> u8 {
        self.lcr
    }

    fn packed_prime_lcr(&self) -> u8 {
        (self.lcr << 4) | (self.prime & NIBBLE_MAX)
    }

    pub fn is_modified(&self) -> bool {
        self.grid.any_modified() || self.colonies.iter().any(|c| c.modified)
    }

    // Tile edits

    pub fn paint_tile(
        &mut self,
        row: usize,
        col: usize,
        terrain: Terrain,
        feature: Feature,
    ) -> Result<(), EditError> {
        let byte = compose_terrain(terrain, feature)?;
        let tile = self.grid.tile_mut(row, col)?;
        tile.update(byte);
        if tile.is_water() {
            tile.road = false;
            tile.plowed = false;
        }
        if tile.forested {
            tile.plowed = false;
        }
        Ok(())
    }

    /// Returns the new road state.
    pub fn toggle_road(&mut self, row: usize, col: usize) -> Result<bool, EditError> {
        let tile = self.grid.tile_mut(row, col)?;
        if tile.is_water() {
            return Err(EditError::NotApplicable(format!(
                "no road on water at ({row}, {col})"
            )));
        }
        tile.road = !tile.road;
        tile.modified = true;
        Ok(tile.road)
    }

    /// Plowing clears any forest. Returns the new plow state.
    pub fn toggle_plow(&mut self, row: usize, col: usize) -> Result<bool, EditError> {
        let tile = self.grid.tile_mut(row, col)?;
        if tile.is_water() || tile.hills {
            return Err(EditError::NotApplicable(format!(
                "tile ({row}, {col}) cannot be plowed"
            )));
        }
        tile.plowed = !tile.plowed;
        tile.forested = false;
        tile.modified = true;
        Ok(tile.plowed)
    }

    pub fn toggle_pacific(&mut self, row: usize, col: usize) -> Result<bool, EditError> {
        let tile = self.grid.tile_mut(row, col)?;
        if !tile.is_water() {
            return Err(EditError::NotApplicable(format!(
                "pacific flag only applies to water, ({row}, {col}) is land"
            )));
        }
        tile.pacific = !tile.pacific;
        tile.modified = true;
        Ok(tile.pacific)
    }

    pub fn toggle_depleted(&mut self, row: usize, col: usize) -> Result<bool, EditError> {
        let tile = self.grid.tile_mut(row, col)?;
        tile.depleted = !tile.depleted;
        tile.modified = true;
        Ok(tile.depleted)
    }

    /// Step the path region by one, wrapping within 0..=15.
    pub fn step_path_region(&mut self, row: usize, col: usize, up: bool) -> Result<u8, EditError> {
        let tile = self.grid.tile_mut(row, col)?;
        let step = if up { 1 } else { NIBBLE_MAX };
        tile.path_region = (tile.path_region + step) % (NIBBLE_MAX + 1);
        tile.modified = true;
        Ok(tile.path_region)
    }

    pub fn set_path_region(&mut self, row: usize, col: usize, region: u8) -> Result<(), EditError> {
        check_nibble("path region", region)?;
        let tile = self.grid.tile_mut(row, col)?;
        tile.path_region = region;
        tile.modified = true;
        Ok(())
    }

    // Colony edits

    /// Harbour, factory and custom house tiers are refused when the colony's
    /// surroundings or its power's founding fathers do not allow them.
    pub fn select_building(
        &mut self,
        index: usize,
        group: BuildingGroup,
        tier: Option<Building>,
    ) -> Result<(), EditError> {
        if let Some(building) = tier {
            let availability = self.building_availability(index)?;
            if !availability.allows(building) {
                return Err(EditError::NotApplicable(format!(
                    "{} is not available to this colony",
                    building.label()
                )));
            }
        }
        let count = self.colonies.len();
        let colony = self
            .colonies
            .get_mut(index)
            .ok_or(EditError::UnknownColony { index, count })?;
        colony.buildings.select(group, tier)?;
        colony.modified = true;

        let marker = colony.marker();
        if let Some(tile) = self.grid.get_mut(colony.row, colony.col) {
            tile.colony = Some(marker);
        }
        debug!(
            colony = %colony.name,
            group = group.as_str(),
            tier = tier.map(|b| b.key()).unwrap_or("none"),
            "selected building tier"
        );
        Ok(())
    }

    pub fn building_availability(&self, index: usize) -> Result<BuildingAvailability, EditError> {
        let colony = self.colony(index)?;
        let fathers = self.founding_fathers(colony.power);
        let mut availability = BuildingAvailability {
            adam_smith: fathers.adam_smith,
            peter_stuyvesant: fathers.peter_stuyvesant,
            ..BuildingAvailability::default()
        };
        for dir in Direction::ALL {
            let (dr, dc) = dir.delta();
            let Some(tile) = self.grid.get_offset(colony.row, colony.col, dr, dc) else {
                continue;
            };
            if tile.is_water() {
                availability.coastal = true;
                if tile.path_region == OPEN_OCEAN_REGION {
                    availability.ocean_access = true;
                }
            }
        }
        Ok(availability)
    }

    // Global pattern edits

    /// Changing the prime salt moves every fish bank, so offshore depletion
    /// is recomputed.
    pub fn set_prime(&mut self, prime: u8) -> Result<(), EditError> {
        check_nibble("prime", prime)?;
        self.prime = prime;
        let changed = self.recompute_offshore_fish_depletion();
        debug!(prime, changed, "set prime");
        Ok(())
    }

    pub fn set_lcr(&mut self, lcr: u8) -> Result<(), EditError> {
        check_nibble("lcr", lcr)?;
        self.lcr = lcr;
        Ok(())
    }

    /// Clear `depleted` on interior land. Returns the number of tiles changed.
    pub fn reset_depleted_resources(&mut self) -> usize {
        let mut changed = 0;
        for tile in self.grid.interior_mut() {
            if !tile.is_water() && tile.depleted {
                tile.depleted = false;
                tile.modified = true;
                changed += 1;
            }
        }
        changed
    }

    /// Mark every rumor site on interior land as unexplored again.
    pub fn reset_rumors(&mut self) -> usize {
        let (lcr, prime) = (self.lcr, self.prime);
        let mut changed = 0;
        for tile in self.grid.interior_mut() {
            if !tile.is_water()
                && matches_rumor(tile.row, tile.col, lcr, prime)
                && tile.explorer != RUMOR_UNEXPLORED
            {
                tile.explorer = RUMOR_UNEXPLORED;
                tile.modified = true;
                changed += 1;
            }
        }
        changed
    }

    /// Hide prime fish far from land and restore depleted ocean that no
    /// longer carries a prime resource.
    pub fn recompute_offshore_fish_depletion(&mut self) -> usize {
        let prime = self.prime;
        let (width, height) = (self.grid.width(), self.grid.height());
        let mut updates = Vec::new();

        for tile in self.grid.iter() {
            if self.grid.is_border(tile.row, tile.col) || tile.base != TERRAIN_OCEAN {
                continue;
            }
            if matches_prime(tile.row, tile.col, prime) {
                if !tile.depleted && !self.land_nearby(tile.row, tile.col, width, height) {
                    updates.push((tile.row, tile.col, true));
                }
            } else if tile.depleted {
                updates.push((tile.row, tile.col, false));
            }
        }

        for &(row, col, depleted) in &updates {
            if let Some(tile) = self.grid.get_mut(row, col) {
                tile.depleted = depleted;
                tile.modified = true;
            }
        }
        updates.len()
    }

    /// Any land in the window two tiles around `(row, col)`, clipped to the
    /// interior.
    fn land_nearby(&self, row: usize, col: usize, width: usize, height: usize) -> bool {
        let cols = col.saturating_sub(2).max(1)..(col + 3).min(width - 1);
        (row.saturating_sub(2).max(1)..(row + 3).min(height - 1)).any(|r| {
            cols.clone()
                .any(|c| self.grid.get(r, c).is_some_and(|t| !t.is_water()))
        })
    }

    pub fn overlay(&self, row: usize, col: usize) -> Result<TileOverlay, EditError> {
        let tile = self.grid.tile(row, col)?;
        let prime = matches_prime(row, col, self.prime);
        let interior_row = row > 0 && row + 1 < self.grid.height();
        let rumor = (interior_row
            && !tile.is_water()
            && matches_rumor(row, col, self.lcr, self.prime))
        .then(|| {
            if tile.explorer == RUMOR_UNEXPLORED {
                RumorState::Active
            } else {
                RumorState::Explored
            }
        });

        Ok(TileOverlay {
            prime,
            prime_depleted: prime && tile.depleted,
            suppressed_prime: matches_suppressed_prime(row, col, self.prime),
            rumor,
        })
    }

    // Routes and regions

    /// Route table as currently stored in the buffer.
    pub fn stored_route_grid(&self, medium: Medium) -> RouteGrid {
        let start = match medium {
            Medium::Sea => self.header.sea_route_start(),
            Medium::Land => self.header.land_route_start(),
        };
        let len = self.header.route_table_len();
        let bytes = self.bytes.get(start..start + len).unwrap_or_default();
        RouteGrid::from_bytes(medium, self.header.route_rows(), self.header.route_cols(), bytes)
    }

    /// Route table synthesized from the current tiles.
    pub fn route_grid(&self, medium: Medium) -> RouteGrid {
        RouteGraphBuilder::new(&self.grid).build(medium)
    }

    pub fn check_regions(&self) -> RegionReport {
        RegionValidator::new(&self.grid).validate()
    }

    /// Rebuild both route tables on the next save even if no tile changed.
    pub fn regenerate_routes(&mut self) {
        self.routes_stale = true;
    }

    // Write back

    pub fn save(&mut self) -> SaveOutcome {
        let header = self.header;
        let map_size = header.map_size();
        let terrain_start = header.terrain_map_start();
        let mut tiles_written = 0;

        // Every offset below was bounds-checked against the buffer at load.
        for tile in self.grid.iter().filter(|t| t.modified) {
            let idx = header.tile_index(tile.row, tile.col);
            let TileBytes {
                terrain,
                mask,
                path,
            } = tile.encode();
            debug!(
                row = tile.row,
                col = tile.col,
                old_terrain = self.bytes[terrain_start + idx],
                terrain,
                old_mask = self.bytes[terrain_start + map_size + idx],
                mask,
                old_path = self.bytes[terrain_start + 2 * map_size + idx],
                path,
                "writing tile"
            );
            self.bytes[terrain_start + idx] = terrain;
            self.bytes[terrain_start + map_size + idx] = mask;
            self.bytes[terrain_start + 2 * map_size + idx] = path;
            tiles_written += 1;
        }

        let mut colonies_written = 0;
        for (i, colony) in self.colonies.iter().enumerate() {
            if !colony.modified {
                continue;
            }
            debug!(colony = %colony.name, "writing building flags");
            let start = header.colony_offset(i) + BUILDING_BYTES_OFFSET;
            let building_bytes = colony.building_bytes();
            self.bytes[start..start + building_bytes.len()].copy_from_slice(&building_bytes);
            colonies_written += 1;
        }

        self.bytes[header.prime_lcr_offset()] = self.packed_prime_lcr();

        let routes_regenerated = tiles_written > 0 || self.routes_stale;
        if routes_regenerated {
            let builder = RouteGraphBuilder::new(&self.grid);
            for (medium, start) in [
                (Medium::Sea, header.sea_route_start()),
                (Medium::Land, header.land_route_start()),
            ] {
                let table = builder.build(medium).to_bytes();
                self.bytes[start..start + table.len()].copy_from_slice(&table);
            }
        }

        info!(
            tiles = tiles_written,
            colonies = colonies_written,
            prime = self.prime,
            lcr = self.lcr,
            routes_regenerated,
            "saved document"
        );

        let regions = self.check_regions();
        if !regions.ok {
            warn!(%regions, "path regions look broken; saving anyway");
        }

        for tile in self.grid.iter_mut() {
            tile.modified = false;
        }
        for colony in &mut self.colonies {
            colony.modified = false;
        }
        self.routes_stale = false;

        SaveOutcome {
            bytes: self.bytes.clone(),
            tiles_written,
            colonies_written,
            routes_regenerated,
            regions,
        }
    }

    pub fn export_map(&self) -> MapExport {
        let regions = self.check_regions();
        if !regions.ok {
            warn!(%regions, "path regions look broken; exporting anyway");
        }
        MapExport {
            bytes: encode_mp(&self.grid),
            regions,
        }
    }
}

fn parse_grid(r: &LittleEndianSlice<'_>, header: &SaveHeader) -> Result<TileGrid, FormatError> {
    let terrain = r.read_bytes(header.terrain_map_start(), header.map_size(), "terrain map")?;
    let mask = r.read_bytes(header.mask_map_start(), header.map_size(), "mask map")?;
    let path = r.read_bytes(header.path_map_start(), header.map_size(), "path map")?;

    let mut tiles = Vec::with_capacity(header.map_size());
    for row in 0..header.height() {
        for col in 0..header.width() {
            let idx = header.tile_index(row, col);
            tiles.push(Tile::decode(
                row,
                col,
                TileBytes {
                    terrain: terrain[idx],
                    mask: mask[idx],
                    path: path[idx],
                },
            ));
        }
    }
    Ok(TileGrid::from_tiles(header.width(), header.height(), tiles))
}

fn check_nibble(field: &'static str, value: u8) -> Result<(), EditError> {
    if value > NIBBLE_MAX {
        return Err(EditError::OutOfRange {
            field,
            value: value as u32,
            max: NIBBLE_MAX as u32,
        });
    }
    Ok(())
}
